//! Navigation error types

/// Errors reported by a [`Navigator`](crate::table::Navigator) when a URL
/// replacement cannot be carried out.
#[derive(Debug, Clone, thiserror::Error)]
pub enum NavigationError {
    /// The navigation layer refused the target URL.
    #[error("Navigation to '{url}' rejected: {reason}")]
    Rejected { url: String, reason: String },
}

impl NavigationError {
    /// Creates a new rejected navigation error.
    pub fn rejected(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Rejected {
            url: url.into(),
            reason: reason.into(),
        }
    }
}
