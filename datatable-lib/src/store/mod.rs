//! In-memory record store and query executor.
//!
//! The store is read-only once built. [`RecordStore::run_query`] filters,
//! sorts and paginates; the aggregate methods scan the whole store and
//! ignore any filter, so filter pickers can show counts for the full
//! domain.

mod aggregate;
mod loader;

pub use aggregate::*;
pub use loader::*;

use std::collections::BTreeMap;
use std::sync::Arc;

use log::trace;

use crate::model::Row;
use crate::query::Page;
use crate::query::TableQueryState;
use crate::query::evaluate_all;
use crate::query::sort_rows;

/// A fixed collection of rows, cheap to clone and share.
///
/// # Example
///
/// ```
/// use datatable_lib::model::Record;
/// use datatable_lib::query::{FilterPredicate, SortEntry, TableQueryState};
/// use datatable_lib::store::RecordStore;
///
/// let store = RecordStore::new(vec![
///     Record::new().set("title", "Add unit tests").set("estimatedHours", 3),
///     Record::new().set("title", "Fix responsive layout").set("estimatedHours", 8),
///     Record::new().set("title", "Add data export").set("estimatedHours", 5),
/// ]);
///
/// let state = TableQueryState::default()
///     .with_filters(vec![FilterPredicate::contains("title", "add")])
///     .with_sort(vec![SortEntry::desc("estimatedHours")]);
/// let page = store.run_query(&state);
///
/// assert_eq!(page.total(), 2);
/// ```
#[derive(Debug)]
pub struct RecordStore<R> {
    rows: Arc<Vec<R>>,
}

impl<R> Clone for RecordStore<R> {
    fn clone(&self) -> Self {
        Self {
            rows: Arc::clone(&self.rows),
        }
    }
}

impl<R> RecordStore<R> {
    /// Creates a store holding the given rows.
    pub fn new(rows: Vec<R>) -> Self {
        Self { rows: Arc::new(rows) }
    }

    /// Returns every row in insertion order.
    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the store holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<R: Row + Clone> RecordStore<R> {
    /// Runs a query and returns one page of rows plus the filtered total.
    ///
    /// 1. An empty filter list keeps every row; otherwise rows are kept
    ///    when the predicates hold under the state's join operator.
    /// 2. A non-empty sort list orders the rows stably.
    /// 3. The page `[offset, offset + per_page)` is cut out, clamped to the
    ///    available rows. A page past the end is empty, not an error.
    pub fn run_query(&self, state: &TableQueryState) -> Page<R> {
        let mut matched: Vec<&R> = if state.filters.is_empty() {
            self.rows.iter().collect()
        } else {
            self.rows
                .iter()
                .filter(|row| evaluate_all(&state.filters, state.join_operator, *row))
                .collect()
        };

        sort_rows(&mut matched, &state.sort);

        let total = matched.len();
        let start = state.offset().min(total);
        let end = start.saturating_add(state.per_page as usize).min(total);
        trace!(
            "Query matched {} of {} rows, returning [{}, {})",
            total,
            self.rows.len(),
            start,
            end
        );

        let rows = matched[start..end].iter().map(|row| (*row).clone()).collect();
        Page::new(rows, total)
    }
}

impl<R: Row> RecordStore<R> {
    /// Counts rows per distinct value of a field. See [`count_by_field`].
    pub fn count_by_field(&self, field: &str) -> BTreeMap<String, usize> {
        count_by_field(self.rows(), field)
    }

    /// Counts rows per value, reporting every domain value even when unused.
    /// See [`count_by_field_with_domain`].
    pub fn count_by_field_with_domain<S: AsRef<str>>(&self, field: &str, domain: &[S]) -> BTreeMap<String, usize> {
        count_by_field_with_domain(self.rows(), field, domain)
    }

    /// Returns the numeric range of a field. See [`range_of_field`].
    pub fn range_of_field(&self, field: &str) -> Option<NumericRange> {
        range_of_field(self.rows(), field)
    }
}

impl<R> From<Vec<R>> for RecordStore<R> {
    fn from(rows: Vec<R>) -> Self {
        Self::new(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Record;
    use crate::model::Value;
    use crate::query::FilterPredicate;
    use crate::query::JoinOperator;
    use crate::query::SortEntry;

    fn store(n: i64) -> RecordStore<Record> {
        RecordStore::new(
            (1..=n)
                .map(|i| Record::new().set("id", i).set("parity", if i % 2 == 0 { "even" } else { "odd" }))
                .collect(),
        )
    }

    fn ids(page: &Page<Record>) -> Vec<Value> {
        page.rows().iter().map(|r| r.value("id")).collect()
    }

    #[test]
    fn test_out_of_range_page_is_empty() {
        let page = store(5).run_query(&TableQueryState::default().with_per_page(10).with_page(100));
        assert!(page.is_empty());
        assert_eq!(page.total(), 5);
    }

    #[test]
    fn test_last_partial_page() {
        let page = store(25).run_query(&TableQueryState::default().with_page(3));
        assert_eq!(page.len(), 5);
        assert_eq!(page.rows()[0].value("id"), Value::Int(21));
        assert_eq!(page.total(), 25);
    }

    #[test]
    fn test_empty_or_filter_list_keeps_everything() {
        let state = TableQueryState::default().with_join_operator(JoinOperator::Or);
        assert_eq!(store(5).run_query(&state).total(), 5);
    }

    #[test]
    fn test_filter_then_sort_then_page() {
        let state = TableQueryState::default()
            .with_per_page(2)
            .with_filters(vec![FilterPredicate::eq("parity", "even")])
            .with_sort(vec![SortEntry::desc("id")]);
        let page = store(9).run_query(&state);
        assert_eq!(page.total(), 4);
        assert_eq!(ids(&page), vec![Value::Int(8), Value::Int(6)]);
    }

    #[test]
    fn test_join_operator_applies() {
        let filters = vec![FilterPredicate::lt("id", 3), FilterPredicate::gt("id", 8)];
        let and = TableQueryState::default().with_filters(filters.clone());
        let or = and.clone().with_join_operator(JoinOperator::Or);

        assert_eq!(store(10).run_query(&and).total(), 0);
        let page = store(10).run_query(&or);
        assert_eq!(ids(&page), vec![Value::Int(1), Value::Int(2), Value::Int(9), Value::Int(10)]);
    }
}
