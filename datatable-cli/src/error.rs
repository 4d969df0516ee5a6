//! CLI error type

/// Errors that stop the CLI.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// The log file could not be created.
    #[error("Failed to create log file: {0}")]
    LogFile(#[from] std::io::Error),

    /// A logger was already installed.
    #[error("Failed to initialize logger: {0}")]
    Logger(#[from] log::SetLoggerError),

    /// The table engine failed.
    #[error(transparent)]
    Table(#[from] datatable_lib::Error),
}

impl From<datatable_lib::error::ControllerError> for CliError {
    fn from(e: datatable_lib::error::ControllerError) -> Self {
        Self::Table(e.into())
    }
}

impl From<datatable_lib::error::NavigationError> for CliError {
    fn from(e: datatable_lib::error::NavigationError) -> Self {
        Self::Table(e.into())
    }
}
