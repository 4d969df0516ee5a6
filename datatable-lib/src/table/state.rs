//! Live table state held by the controller.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::query::DEFAULT_PAGE;
use crate::query::DEFAULT_PER_PAGE;
use crate::query::FilterOperator;
use crate::query::FilterPredicate;
use crate::query::FilterValue;
use crate::query::JoinOperator;
use crate::query::PartialQueryState;
use crate::query::SortEntry;
use crate::query::TableQueryState;

/// Column visibility, keyed by column id. Missing columns are visible.
pub type VisibilityState = BTreeMap<String, bool>;

/// Selected rows, keyed by row id.
pub type RowSelectionState = BTreeMap<String, bool>;

/// Zero-based pagination as the rendering engine sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationState {
    pub page_index: u32,
    pub page_size: u32,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            page_index: DEFAULT_PAGE - 1,
            page_size: DEFAULT_PER_PAGE,
        }
    }
}

impl PaginationState {
    /// Creates pagination state from a zero-based index and a page size.
    pub fn new(page_index: u32, page_size: u32) -> Self {
        Self { page_index, page_size }
    }

    /// The 1-based page number used in URLs.
    pub fn page(&self) -> u32 {
        self.page_index.saturating_add(1)
    }
}

/// A generic column filter as the rendering engine reports it.
///
/// When `operator` is `None` it is inferred from the value's shape when the
/// filter is turned into a [`FilterPredicate`]; see [`infer_operator`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnFilter {
    pub id: String,
    pub value: FilterValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<FilterOperator>,
}

impl ColumnFilter {
    /// Creates a filter whose operator will be inferred.
    pub fn new(id: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self {
            id: id.into(),
            value: value.into(),
            operator: None,
        }
    }

    /// Creates a filter with an explicit operator.
    pub fn with_operator(id: impl Into<String>, operator: FilterOperator, value: impl Into<FilterValue>) -> Self {
        Self {
            id: id.into(),
            value: value.into(),
            operator: Some(operator),
        }
    }

    /// Returns the explicit operator, or the one inferred from the value.
    pub fn effective_operator(&self) -> FilterOperator {
        self.operator.unwrap_or_else(|| infer_operator(&self.value))
    }

    /// Converts to a predicate for serialization and evaluation.
    pub fn to_predicate(&self) -> FilterPredicate {
        FilterPredicate {
            column_id: self.id.clone(),
            operator: self.effective_operator(),
            value: self.value.clone(),
        }
    }
}

impl From<FilterPredicate> for ColumnFilter {
    fn from(predicate: FilterPredicate) -> Self {
        Self {
            id: predicate.column_id,
            value: predicate.value,
            operator: Some(predicate.operator),
        }
    }
}

/// Picks an operator for a filter value that carries none.
///
/// Arrays become `inSet`, strings `containsCI`, anything else `equals`.
/// This cannot express comparisons or ranges, so range filters should carry
/// [`FilterOperator::Between`] explicitly.
pub fn infer_operator(value: &FilterValue) -> FilterOperator {
    match value {
        FilterValue::Set(_) | FilterValue::Range(..) => FilterOperator::InSet,
        FilterValue::Text(_) => FilterOperator::ContainsCi,
        _ => FilterOperator::Equals,
    }
}

/// Which side a column is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinSide {
    Left,
    Right,
}

/// Columns pinned to either edge of the table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnPinning {
    #[serde(default)]
    pub left: Vec<String>,
    #[serde(default)]
    pub right: Vec<String>,
}

impl ColumnPinning {
    /// Returns the side a column is pinned to, if any.
    pub fn position_of(&self, column_id: &str) -> Option<PinSide> {
        if self.left.iter().any(|c| c == column_id) {
            Some(PinSide::Left)
        } else if self.right.iter().any(|c| c == column_id) {
            Some(PinSide::Right)
        } else {
            None
        }
    }

    /// Returns `true` if the column is pinned to either side.
    pub fn is_pinned(&self, column_id: &str) -> bool {
        self.position_of(column_id).is_some()
    }
}

/// The controller's live state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableState {
    pub sorting: Vec<SortEntry>,
    pub pagination: PaginationState,
    pub column_filters: Vec<ColumnFilter>,
    pub column_visibility: VisibilityState,
    pub row_selection: RowSelectionState,
    pub column_pinning: ColumnPinning,
    pub join_operator: JoinOperator,
}

impl TableState {
    /// Merges the three sources of initial state, field by field: values
    /// from the URL win over the caller's initial state, which wins over
    /// the defaults.
    pub fn resolve(url: PartialQueryState, initial: InitialState) -> Self {
        let initial_pagination = initial.pagination;
        let page = url
            .page
            .or(initial_pagination.map(|p| p.page()))
            .unwrap_or(DEFAULT_PAGE);
        let page_size = url
            .per_page
            .or(initial_pagination.map(|p| p.page_size))
            .unwrap_or(DEFAULT_PER_PAGE);

        let column_filters = url
            .filters
            .map(|filters| filters.into_iter().map(ColumnFilter::from).collect())
            .or(initial.column_filters)
            .unwrap_or_default();

        Self {
            sorting: url.sort.or(initial.sorting).unwrap_or_default(),
            pagination: PaginationState::new(page.max(1) - 1, page_size.max(1)),
            column_filters,
            column_visibility: initial.column_visibility.unwrap_or_default(),
            row_selection: initial.row_selection.unwrap_or_default(),
            column_pinning: initial.column_pinning.unwrap_or_default(),
            join_operator: url.join_operator.or(initial.join_operator).unwrap_or_default(),
        }
    }

    /// Projects the URL-relevant part of the state.
    pub fn to_query_state(&self) -> TableQueryState {
        TableQueryState {
            page: self.pagination.page().max(1),
            per_page: self.pagination.page_size.max(1),
            sort: self.sorting.clone(),
            filters: self.column_filters.iter().map(ColumnFilter::to_predicate).collect(),
            join_operator: self.join_operator,
        }
    }

    /// Returns `true` if the column is visible.
    pub fn is_column_visible(&self, column_id: &str) -> bool {
        self.column_visibility.get(column_id).copied().unwrap_or(true)
    }

    /// Returns the ids of the selected rows.
    pub fn selected_row_ids(&self) -> impl Iterator<Item = &str> {
        self.row_selection
            .iter()
            .filter(|(_, selected)| **selected)
            .map(|(id, _)| id.as_str())
    }
}

/// State supplied by the caller, used where the URL says nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InitialState {
    pub sorting: Option<Vec<SortEntry>>,
    pub pagination: Option<PaginationState>,
    pub column_filters: Option<Vec<ColumnFilter>>,
    pub column_visibility: Option<VisibilityState>,
    pub row_selection: Option<RowSelectionState>,
    pub column_pinning: Option<ColumnPinning>,
    pub join_operator: Option<JoinOperator>,
}

impl InitialState {
    /// Creates an empty initial state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the initial sort keys.
    pub fn with_sorting(mut self, sorting: Vec<SortEntry>) -> Self {
        self.sorting = Some(sorting);
        self
    }

    /// Sets the initial pagination.
    pub fn with_pagination(mut self, pagination: PaginationState) -> Self {
        self.pagination = Some(pagination);
        self
    }

    /// Sets the initial column filters.
    pub fn with_column_filters(mut self, filters: Vec<ColumnFilter>) -> Self {
        self.column_filters = Some(filters);
        self
    }

    /// Sets the initial column visibility.
    pub fn with_column_visibility(mut self, visibility: VisibilityState) -> Self {
        self.column_visibility = Some(visibility);
        self
    }

    /// Sets the initial row selection.
    pub fn with_row_selection(mut self, selection: RowSelectionState) -> Self {
        self.row_selection = Some(selection);
        self
    }

    /// Sets the pinned columns.
    pub fn with_column_pinning(mut self, pinning: ColumnPinning) -> Self {
        self.column_pinning = Some(pinning);
        self
    }

    /// Sets the initial join operator.
    pub fn with_join_operator(mut self, join_operator: JoinOperator) -> Self {
        self.join_operator = Some(join_operator);
        self
    }
}
