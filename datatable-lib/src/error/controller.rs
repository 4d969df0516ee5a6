//! Table controller error types

/// Errors that can occur while constructing a table controller.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ControllerError {
    /// The controller needs a tokio runtime to schedule URL synchronization.
    #[error("No tokio runtime available to schedule URL synchronization")]
    NoRuntime,
}
