//! Error types
//!
//! Decoding query parameters and evaluating filters never fail; they fall
//! back to defaults instead. The errors here only cover the boundaries that
//! can genuinely fail: building a controller and talking to the navigation
//! layer.

mod controller;
mod navigation;

pub use controller::*;
pub use navigation::*;

/// Crate-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The navigation layer failed to apply a URL.
    #[error(transparent)]
    Navigation(#[from] NavigationError),

    /// The table controller could not be built.
    #[error(transparent)]
    Controller(#[from] ControllerError),
}
