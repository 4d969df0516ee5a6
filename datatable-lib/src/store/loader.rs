//! Server-side page loader.

use std::collections::BTreeMap;

use log::debug;
use url::Url;

use super::NumericRange;
use super::RecordStore;
use crate::codec::QueryKeys;
use crate::codec::QueryParams;
use crate::codec::decode;
use crate::model::Row;
use crate::query::TableQueryState;

/// Which aggregates a loader reports next to each page.
#[derive(Debug, Clone, Default)]
pub struct FacetSpec {
    counts: Vec<(String, Vec<String>)>,
    ranges: Vec<String>,
}

impl FacetSpec {
    /// Creates an empty facet list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports per-value counts for a categorical field.
    pub fn count(mut self, field: impl Into<String>) -> Self {
        self.counts.push((field.into(), Vec::new()));
        self
    }

    /// Reports per-value counts for a categorical field with a known
    /// domain; unused domain values are reported with a count of zero.
    pub fn count_with_domain<S: Into<String>>(
        mut self,
        field: impl Into<String>,
        domain: impl IntoIterator<Item = S>,
    ) -> Self {
        self.counts
            .push((field.into(), domain.into_iter().map(Into::into).collect()));
        self
    }

    /// Reports the numeric range of a field.
    pub fn range(mut self, field: impl Into<String>) -> Self {
        self.ranges.push(field.into());
        self
    }
}

/// Aggregates over the full, unfiltered store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCounts {
    /// Per-value counts, keyed by field.
    pub counts: BTreeMap<String, BTreeMap<String, usize>>,
    /// Numeric ranges, keyed by field. `None` when no row has a number.
    pub ranges: BTreeMap<String, Option<NumericRange>>,
}

/// Everything a table view needs for one request.
#[derive(Debug, Clone)]
pub struct LoadResponse<R> {
    /// The rows of the requested page.
    pub rows: Vec<R>,
    /// Rows matching the filters, across all pages.
    pub total: usize,
    /// `ceil(total / per_page)`.
    pub page_count: usize,
    /// The decoded state the page was computed from.
    pub state: TableQueryState,
    /// Full-store aggregates.
    pub filter_counts: FilterCounts,
}

/// Decodes a request's query parameters and answers it from a store.
///
/// # Example
///
/// ```
/// use datatable_lib::codec::QueryParams;
/// use datatable_lib::model::Record;
/// use datatable_lib::store::{FacetSpec, RecordStore, TableLoader};
///
/// let store = RecordStore::new(
///     (1..=12).map(|i| Record::new().set("id", i).set("status", "todo")).collect(),
/// );
/// let loader = TableLoader::new(store)
///     .with_facets(FacetSpec::new().count_with_domain("status", ["todo", "done"]).range("id"));
///
/// let response = loader.load(&QueryParams::from_query("page=2&perPage=5"));
/// assert_eq!(response.rows.len(), 5);
/// assert_eq!(response.page_count, 3);
/// assert_eq!(response.filter_counts.counts["status"]["done"], 0);
/// ```
#[derive(Debug, Clone)]
pub struct TableLoader<R> {
    store: RecordStore<R>,
    facets: FacetSpec,
    keys: QueryKeys,
}

impl<R: Row + Clone> TableLoader<R> {
    /// Creates a loader with no facets and the default query keys.
    pub fn new(store: RecordStore<R>) -> Self {
        Self {
            store,
            facets: FacetSpec::default(),
            keys: QueryKeys::default(),
        }
    }

    /// Sets the aggregates to report.
    pub fn with_facets(mut self, facets: FacetSpec) -> Self {
        self.facets = facets;
        self
    }

    /// Sets the query parameter names.
    pub fn with_query_keys(mut self, keys: QueryKeys) -> Self {
        self.keys = keys;
        self
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &RecordStore<R> {
        &self.store
    }

    /// Answers a request given its query parameters.
    pub fn load(&self, params: &QueryParams) -> LoadResponse<R> {
        let state = decode(params, &self.keys);
        debug!(
            "Loading page {} ({} per page, {} sort keys, {} filters)",
            state.page,
            state.per_page,
            state.sort.len(),
            state.filters.len()
        );

        let page = self.store.run_query(&state);
        let total = page.total();

        LoadResponse {
            rows: page.into_rows(),
            total,
            page_count: state.page_count(total),
            state,
            filter_counts: self.filter_counts(),
        }
    }

    /// Answers a request given its URL.
    pub fn load_url(&self, url: &Url) -> LoadResponse<R> {
        self.load(&QueryParams::from_url(url))
    }

    /// Computes the configured aggregates over the whole store.
    pub fn filter_counts(&self) -> FilterCounts {
        let counts = self
            .facets
            .counts
            .iter()
            .map(|(field, domain)| (field.clone(), self.store.count_by_field_with_domain(field, domain.as_slice())))
            .collect();
        let ranges = self
            .facets
            .ranges
            .iter()
            .map(|field| (field.clone(), self.store.range_of_field(field)))
            .collect();
        FilterCounts { counts, ranges }
    }
}
