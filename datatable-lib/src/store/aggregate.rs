//! Aggregates over a whole row set.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::model::Row;

/// Minimum and maximum of a numeric field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericRange {
    pub min: f64,
    pub max: f64,
}

/// Counts rows per distinct value of `field`.
///
/// Keys are the string form of the value, so `Int(3)` and `Text("3")` share
/// a bucket. Rows where the field is null or missing count under `""`.
pub fn count_by_field<R: Row>(rows: &[R], field: &str) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for row in rows {
        *counts.entry(row.value(field).to_string()).or_insert(0) += 1;
    }
    counts
}

/// Like [`count_by_field`], but every value of `domain` is present in the
/// result, with a count of zero when no row has it.
pub fn count_by_field_with_domain<R: Row, S: AsRef<str>>(
    rows: &[R],
    field: &str,
    domain: &[S],
) -> BTreeMap<String, usize> {
    let mut counts: BTreeMap<String, usize> = domain.iter().map(|value| (value.as_ref().to_string(), 0)).collect();
    for (value, count) in count_by_field(rows, field) {
        *counts.entry(value).or_insert(0) += count;
    }
    counts
}

/// Returns the minimum and maximum of `field` over values with a numeric
/// reading, or `None` if there are none.
pub fn range_of_field<R: Row>(rows: &[R], field: &str) -> Option<NumericRange> {
    rows.iter()
        .filter_map(|row| row.value(field).as_number())
        .filter(|n| !n.is_nan())
        .fold(None, |range, n| match range {
            None => Some(NumericRange { min: n, max: n }),
            Some(r) => Some(NumericRange {
                min: r.min.min(n),
                max: r.max.max(n),
            }),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Record;

    fn rows() -> Vec<Record> {
        vec![
            Record::new().set("status", "todo").set("estimatedHours", 4),
            Record::new().set("status", "done").set("estimatedHours", 40),
            Record::new().set("status", "todo").set("estimatedHours", 1),
            Record::new().set("status", "todo"),
        ]
    }

    #[test]
    fn test_count_by_field() {
        let counts = count_by_field(&rows(), "status");
        assert_eq!(counts.get("todo"), Some(&3));
        assert_eq!(counts.get("done"), Some(&1));
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn test_count_with_domain_reports_zero_buckets() {
        let counts = count_by_field_with_domain(&rows(), "status", &["todo", "in_progress", "done", "canceled"]);
        assert_eq!(counts.get("in_progress"), Some(&0));
        assert_eq!(counts.get("canceled"), Some(&0));
        assert_eq!(counts.get("todo"), Some(&3));
        assert_eq!(counts.len(), 4);
    }

    #[test]
    fn test_range_skips_missing_values() {
        assert_eq!(
            range_of_field(&rows(), "estimatedHours"),
            Some(NumericRange { min: 1.0, max: 40.0 })
        );
        assert_eq!(range_of_field(&rows(), "status"), None);
        assert_eq!(range_of_field::<Record>(&[], "estimatedHours"), None);
    }
}
