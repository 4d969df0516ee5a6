//! Exact encoding of table state into query parameter changes.

use super::QueryKeys;
use super::QueryUpdate;
use crate::query::FilterPredicate;
use crate::query::JoinOperator;
use crate::query::SortEntry;
use crate::query::TableQueryState;

/// Encodes table state as a set of query parameter changes.
///
/// `page` and `perPage` are always set. `sort` and `filters` are set when
/// non-empty and deleted otherwise. `joinOperator` is set to `or` when the
/// state uses `or` and deleted otherwise, since `and` is implied.
///
/// `decode(encode(state)) == state` for every state.
///
/// # Example
///
/// ```
/// use datatable_lib::codec::{QueryKeys, encode};
/// use datatable_lib::query::{SortEntry, TableQueryState};
///
/// let state = TableQueryState::default()
///     .with_page(2)
///     .with_sort(vec![SortEntry::asc("title"), SortEntry::desc("estimatedHours")]);
/// let update = encode(&state, &QueryKeys::default());
///
/// assert_eq!(update.get("page"), Some(Some("2")));
/// assert_eq!(update.get("sort"), Some(Some("title.asc,estimatedHours.desc")));
/// assert_eq!(update.get("filters"), Some(None));
/// ```
pub fn encode(state: &TableQueryState, keys: &QueryKeys) -> QueryUpdate {
    let mut update = QueryUpdate::new();

    update.set(&keys.page, state.page.to_string());
    update.set(&keys.per_page, state.per_page.to_string());

    if state.sort.is_empty() {
        update.remove(&keys.sort);
    } else {
        update.set(&keys.sort, serialize_sort(&state.sort));
    }

    if state.filters.is_empty() {
        update.remove(&keys.filters);
    } else {
        update.set(&keys.filters, serialize_filters(&state.filters));
    }

    match state.join_operator {
        JoinOperator::Or => update.set(&keys.join_operator, JoinOperator::Or.as_str()),
        JoinOperator::And => update.remove(&keys.join_operator),
    }

    update
}

/// Serializes sort keys as comma-separated `column.asc|desc` tokens.
pub fn serialize_sort(sort: &[SortEntry]) -> String {
    sort.iter()
        .map(|entry| format!("{}.{}", entry.column_id, entry.direction()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Serializes predicates as a JSON array. An empty list gives `""`.
pub fn serialize_filters(filters: &[FilterPredicate]) -> String {
    if filters.is_empty() {
        return String::new();
    }
    serde_json::to_string(filters).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::decode;
    use crate::query::FilterOperator;

    fn round_trip(state: &TableQueryState) -> TableQueryState {
        let keys = QueryKeys::default();
        decode(&encode(state, &keys).to_params(), &keys)
    }

    #[test]
    fn test_round_trip_full_state() {
        let state = TableQueryState::default()
            .with_page(4)
            .with_per_page(25)
            .with_sort(vec![SortEntry::desc("priority"), SortEntry::asc("code")])
            .with_filters(vec![
                FilterPredicate::in_set("status", ["todo", "in_progress"]),
                FilterPredicate::between("estimatedHours", 4.0, 12.5),
                FilterPredicate::contains("title", "dark mode"),
                FilterPredicate::is_empty("assignee"),
                FilterPredicate::new("estimatedHours", FilterOperator::GreaterOrEqual, 3),
            ])
            .with_join_operator(JoinOperator::Or);

        assert_eq!(round_trip(&state), state);
    }

    #[test]
    fn test_round_trip_keeps_date_shaped_text() {
        let state = TableQueryState::default().with_filters(vec![
            FilterPredicate::eq("title", "2024-01-01T00:00:00+00:00"),
            FilterPredicate::contains("notes", "2024-01-01"),
        ]);
        let back = round_trip(&state);
        assert_eq!(back, state);

        let row = crate::model::Record::new().set("title", "2024-01-01T00:00:00+00:00");
        assert!(back.filters[0].matches(&row));
    }

    #[test]
    fn test_round_trip_default_state() {
        let state = TableQueryState::default();
        assert_eq!(round_trip(&state), state);
    }

    #[test]
    fn test_empty_lists_are_removed() {
        let update = encode(&TableQueryState::default(), &QueryKeys::default());
        assert_eq!(update.get("sort"), Some(None));
        assert_eq!(update.get("filters"), Some(None));
        assert_eq!(update.get("joinOperator"), Some(None));
        assert_eq!(update.get("perPage"), Some(Some("10")));
    }

    #[test]
    fn test_filters_use_wire_names() {
        let json = serialize_filters(&[FilterPredicate::contains("title", "bug")]);
        assert_eq!(json, r#"[{"id":"title","operator":"iLike","value":"bug"}]"#);
    }

    #[test]
    fn test_respects_custom_keys() {
        let keys = QueryKeys::default().with_page("p").with_sort("order");
        let state = TableQueryState::default().with_sort(vec![SortEntry::asc("a")]);
        let update = encode(&state, &keys);
        assert_eq!(update.get("p"), Some(Some("1")));
        assert_eq!(update.get("order"), Some(Some("a.asc")));
        assert_eq!(update.get("page"), None);
    }
}
