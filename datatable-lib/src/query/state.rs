//! Serializable table query state.

use serde::Deserialize;
use serde::Serialize;

use super::FilterPredicate;

/// Default 1-based page number.
pub const DEFAULT_PAGE: u32 = 1;

/// Default page size.
pub const DEFAULT_PER_PAGE: u32 = 10;

/// How multiple filter predicates combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinOperator {
    /// Every predicate must match.
    #[default]
    And,
    /// At least one predicate must match.
    Or,
}

impl JoinOperator {
    /// Parses a join operator leniently: only the literal `"or"` selects
    /// [`JoinOperator::Or`], anything else is [`JoinOperator::And`].
    pub fn parse_lenient(s: &str) -> Self {
        if s == "or" { JoinOperator::Or } else { JoinOperator::And }
    }

    /// Returns the query-string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            JoinOperator::And => "and",
            JoinOperator::Or => "or",
        }
    }
}

/// One sort key.
///
/// The position of an entry in [`TableQueryState::sort`] is its tie-break
/// precedence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortEntry {
    /// The column to sort on.
    #[serde(rename = "id")]
    pub column_id: String,
    /// Sort descending instead of ascending.
    #[serde(rename = "desc")]
    pub descending: bool,
}

impl SortEntry {
    /// Creates an ascending sort on a column.
    pub fn asc(column_id: impl Into<String>) -> Self {
        Self {
            column_id: column_id.into(),
            descending: false,
        }
    }

    /// Creates a descending sort on a column.
    pub fn desc(column_id: impl Into<String>) -> Self {
        Self {
            column_id: column_id.into(),
            descending: true,
        }
    }

    /// Returns `"asc"` or `"desc"`.
    pub fn direction(&self) -> &'static str {
        if self.descending { "desc" } else { "asc" }
    }
}

/// The canonical, serializable state of a table query.
///
/// Created once per page view (decoded from the URL or defaulted) and
/// rewritten whenever sort, filters or pagination change.
///
/// # Example
///
/// ```
/// use datatable_lib::query::{FilterPredicate, SortEntry, TableQueryState};
///
/// let state = TableQueryState::default()
///     .with_page(2)
///     .with_sort(vec![SortEntry::desc("estimatedHours")])
///     .with_filters(vec![FilterPredicate::contains("title", "bug")]);
///
/// assert_eq!(state.offset(), 10);
/// assert_eq!(state.page_count(25), 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TableQueryState {
    /// 1-based page number, always at least 1.
    pub page: u32,
    /// Page size, always at least 1.
    pub per_page: u32,
    /// Sort keys in precedence order. Empty means unsorted.
    pub sort: Vec<SortEntry>,
    /// Filter predicates.
    pub filters: Vec<FilterPredicate>,
    /// Combinator applied across `filters`.
    pub join_operator: JoinOperator,
}

impl Default for TableQueryState {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
            sort: Vec::new(),
            filters: Vec::new(),
            join_operator: JoinOperator::And,
        }
    }
}

impl TableQueryState {
    /// Sets the page number. Values below 1 become 1.
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    /// Sets the page size. Values below 1 become 1.
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page.max(1);
        self
    }

    /// Sets the sort keys.
    pub fn with_sort(mut self, sort: Vec<SortEntry>) -> Self {
        self.sort = sort;
        self
    }

    /// Sets the filter predicates.
    pub fn with_filters(mut self, filters: Vec<FilterPredicate>) -> Self {
        self.filters = filters;
        self
    }

    /// Sets the join operator.
    pub fn with_join_operator(mut self, join_operator: JoinOperator) -> Self {
        self.join_operator = join_operator;
        self
    }

    /// Index of the first row of the current page.
    pub fn offset(&self) -> usize {
        (self.page.max(1) as usize - 1).saturating_mul(self.per_page.max(1) as usize)
    }

    /// Number of pages needed to show `total` rows.
    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.per_page.max(1) as usize)
    }
}

/// A query state where every field may be absent.
///
/// Produced by [`decode_partial`](crate::codec::decode_partial). A field is
/// `None` when its parameter was missing or failed to parse, and for
/// `sort`/`filters` also when they parsed to an empty list. Callers layer
/// several sources with [`or`](Self::or) and finish with
/// [`resolve`](Self::resolve).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialQueryState {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub sort: Option<Vec<SortEntry>>,
    pub filters: Option<Vec<FilterPredicate>>,
    pub join_operator: Option<JoinOperator>,
}

impl PartialQueryState {
    /// Fills every absent field from `fallback`.
    pub fn or(self, fallback: PartialQueryState) -> Self {
        Self {
            page: self.page.or(fallback.page),
            per_page: self.per_page.or(fallback.per_page),
            sort: self.sort.or(fallback.sort),
            filters: self.filters.or(fallback.filters),
            join_operator: self.join_operator.or(fallback.join_operator),
        }
    }

    /// Produces a complete state, taking absent fields from `defaults`.
    pub fn resolve(self, defaults: &TableQueryState) -> TableQueryState {
        TableQueryState {
            page: self.page.unwrap_or(defaults.page).max(1),
            per_page: self.per_page.unwrap_or(defaults.per_page).max(1),
            sort: self.sort.unwrap_or_else(|| defaults.sort.clone()),
            filters: self.filters.unwrap_or_else(|| defaults.filters.clone()),
            join_operator: self.join_operator.unwrap_or(defaults.join_operator),
        }
    }
}

impl From<TableQueryState> for PartialQueryState {
    fn from(state: TableQueryState) -> Self {
        Self {
            page: Some(state.page),
            per_page: Some(state.per_page),
            sort: Some(state.sort),
            filters: Some(state.filters),
            join_operator: Some(state.join_operator),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_and_page_count() {
        let state = TableQueryState::default().with_page(3).with_per_page(20);
        assert_eq!(state.offset(), 40);
        assert_eq!(state.page_count(0), 0);
        assert_eq!(state.page_count(41), 3);
        assert_eq!(state.page_count(60), 3);
    }

    #[test]
    fn test_builders_clamp_to_one() {
        let state = TableQueryState::default().with_page(0).with_per_page(0);
        assert_eq!(state.page, 1);
        assert_eq!(state.per_page, 1);
    }

    #[test]
    fn test_join_operator_lenient() {
        assert_eq!(JoinOperator::parse_lenient("or"), JoinOperator::Or);
        assert_eq!(JoinOperator::parse_lenient("OR"), JoinOperator::And);
        assert_eq!(JoinOperator::parse_lenient("xor"), JoinOperator::And);
    }

    #[test]
    fn test_partial_layering() {
        let url = PartialQueryState {
            page: Some(4),
            ..Default::default()
        };
        let initial = PartialQueryState {
            page: Some(2),
            per_page: Some(25),
            sort: Some(vec![SortEntry::asc("title")]),
            ..Default::default()
        };

        let state = url.or(initial).resolve(&TableQueryState::default());
        assert_eq!(state.page, 4);
        assert_eq!(state.per_page, 25);
        assert_eq!(state.sort, vec![SortEntry::asc("title")]);
        assert!(state.filters.is_empty());
    }
}
