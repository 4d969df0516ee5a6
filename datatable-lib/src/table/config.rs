//! Controller configuration

use std::time::Duration;

use super::NavigateOptions;
use crate::codec::QueryKeys;

/// Configuration for a [`TableController`](super::TableController).
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use datatable_lib::codec::QueryKeys;
/// use datatable_lib::table::TableConfig;
///
/// let config = TableConfig::default()
///     .with_debounce(Duration::from_millis(150))
///     .with_query_keys(QueryKeys::default().with_prefix("tasks_"));
/// ```
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// Quiet period after the last change before the URL is rewritten.
    ///
    /// Default: 300 milliseconds
    pub debounce: Duration,

    /// Names of the URL query parameters.
    pub query_keys: QueryKeys,

    /// Options passed to the navigator on every synchronization.
    pub navigate_options: NavigateOptions,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(300),
            query_keys: QueryKeys::default(),
            navigate_options: NavigateOptions::default(),
        }
    }
}

impl TableConfig {
    /// Creates a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the debounce interval.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Sets the query parameter names.
    pub fn with_query_keys(mut self, keys: QueryKeys) -> Self {
        self.query_keys = keys;
        self
    }

    /// Sets the navigation options.
    pub fn with_navigate_options(mut self, options: NavigateOptions) -> Self {
        self.navigate_options = options;
        self
    }
}
