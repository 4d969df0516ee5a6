//! Multi-column row ordering.

use std::cmp::Ordering;

use super::SortEntry;
use crate::model::Row;

/// Compares two rows by a list of sort keys.
///
/// The first key that does not tie decides, with its `descending` flag
/// inverting the comparison. Rows that tie on every key compare equal.
pub fn compare_rows<R: Row + ?Sized>(a: &R, b: &R, sort: &[SortEntry]) -> Ordering {
    for entry in sort {
        let ordering = a.value(&entry.column_id).compare(&b.value(&entry.column_id));
        let ordering = if entry.descending { ordering.reverse() } else { ordering };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

/// Sorts rows in place by a list of sort keys.
///
/// The sort is stable: rows that tie on every key keep their relative
/// order. An empty key list leaves the slice untouched.
pub fn sort_rows<R: Row>(rows: &mut [R], sort: &[SortEntry]) {
    if sort.is_empty() {
        return;
    }
    rows.sort_by(|a, b| compare_rows(a, b, sort));
}
