//! Page type for paginated query results.

/// A page of query results with the total row count.
///
/// `total` counts every row that passed the filters, before pagination, so
/// it is the figure to derive a page count from.
///
/// # Example
///
/// ```
/// use datatable_lib::model::Record;
/// use datatable_lib::query::TableQueryState;
/// use datatable_lib::store::RecordStore;
///
/// let store = RecordStore::new((1..=5).map(|i| Record::new().set("id", i)).collect());
/// let page = store.run_query(&TableQueryState::default().with_page(100));
///
/// assert!(page.is_empty());
/// assert_eq!(page.total(), 5);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Page<R> {
    rows: Vec<R>,
    total: usize,
}

impl<R> Page<R> {
    /// Creates a new page.
    pub fn new(rows: Vec<R>, total: usize) -> Self {
        Self { rows, total }
    }

    /// Returns a reference to the rows in this page.
    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    /// Consumes the page and returns the rows.
    pub fn into_rows(self) -> Vec<R> {
        self.rows
    }

    /// Returns the number of rows matching the filters, across all pages.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Returns `true` if this page has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the number of rows in this page.
    pub fn len(&self) -> usize {
        self.rows.len()
    }
}
