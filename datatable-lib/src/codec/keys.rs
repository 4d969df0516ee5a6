//! Query parameter names.

use serde::Deserialize;
use serde::Serialize;

/// Names of the URL query parameters that carry table state.
///
/// Two tables on the same page need distinct keys; give one of them a
/// prefix.
///
/// # Example
///
/// ```
/// use datatable_lib::codec::QueryKeys;
///
/// let keys = QueryKeys::default().with_prefix("tasks_");
/// assert_eq!(keys.page, "tasks_page");
/// assert_eq!(keys.join_operator, "tasks_joinOperator");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryKeys {
    /// 1-based page number. Default: `page`
    pub page: String,
    /// Page size. Default: `perPage`
    pub per_page: String,
    /// Comma-separated `column.asc|desc` tokens. Default: `sort`
    pub sort: String,
    /// JSON array of filter predicates. Default: `filters`
    pub filters: String,
    /// `and` or `or`. Default: `joinOperator`
    pub join_operator: String,
}

impl Default for QueryKeys {
    fn default() -> Self {
        Self {
            page: "page".to_string(),
            per_page: "perPage".to_string(),
            sort: "sort".to_string(),
            filters: "filters".to_string(),
            join_operator: "joinOperator".to_string(),
        }
    }
}

impl QueryKeys {
    /// Creates the default keys.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page key.
    pub fn with_page(mut self, key: impl Into<String>) -> Self {
        self.page = key.into();
        self
    }

    /// Sets the page size key.
    pub fn with_per_page(mut self, key: impl Into<String>) -> Self {
        self.per_page = key.into();
        self
    }

    /// Sets the sort key.
    pub fn with_sort(mut self, key: impl Into<String>) -> Self {
        self.sort = key.into();
        self
    }

    /// Sets the filters key.
    pub fn with_filters(mut self, key: impl Into<String>) -> Self {
        self.filters = key.into();
        self
    }

    /// Sets the join operator key.
    pub fn with_join_operator(mut self, key: impl Into<String>) -> Self {
        self.join_operator = key.into();
        self
    }

    /// Prefixes every key.
    pub fn with_prefix(self, prefix: &str) -> Self {
        Self {
            page: format!("{prefix}{}", self.page),
            per_page: format!("{prefix}{}", self.per_page),
            sort: format!("{prefix}{}", self.sort),
            filters: format!("{prefix}{}", self.filters),
            join_operator: format!("{prefix}{}", self.join_operator),
        }
    }
}
