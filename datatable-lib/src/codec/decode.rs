//! Lenient decoding of table state from query parameters.

use log::debug;

use super::QueryKeys;
use super::QueryParams;
use crate::query::FilterPredicate;
use crate::query::JoinOperator;
use crate::query::PartialQueryState;
use crate::query::SortEntry;
use crate::query::TableQueryState;

/// Decodes table state from query parameters.
///
/// Never fails. Each field is parsed independently and falls back to its
/// default on bad input: page 1, page size 10, no sort, no filters, `and`.
///
/// # Example
///
/// ```
/// use datatable_lib::codec::{QueryKeys, QueryParams, decode};
/// use datatable_lib::query::{JoinOperator, SortEntry};
///
/// let params = QueryParams::from_query("page=abc&perPage=25&sort=title.asc,bogus,hours.up&joinOperator=or");
/// let state = decode(&params, &QueryKeys::default());
///
/// assert_eq!(state.page, 1);
/// assert_eq!(state.per_page, 25);
/// assert_eq!(state.sort, vec![SortEntry::asc("title")]);
/// assert_eq!(state.join_operator, JoinOperator::Or);
/// ```
pub fn decode(params: &QueryParams, keys: &QueryKeys) -> TableQueryState {
    decode_partial(params, keys).resolve(&TableQueryState::default())
}

/// Decodes table state, leaving out every field that is absent or invalid.
///
/// `sort` and `filters` are also left out when they decode to an empty
/// list, so that a lower-precedence source can supply them.
pub fn decode_partial(params: &QueryParams, keys: &QueryKeys) -> PartialQueryState {
    PartialQueryState {
        page: params.get(&keys.page).and_then(parse_positive_int),
        per_page: params.get(&keys.per_page).and_then(parse_positive_int),
        sort: params
            .get(&keys.sort)
            .map(parse_sort)
            .filter(|sort| !sort.is_empty()),
        filters: params
            .get(&keys.filters)
            .map(parse_filters)
            .filter(|filters| !filters.is_empty()),
        join_operator: params.get(&keys.join_operator).map(JoinOperator::parse_lenient),
    }
}

/// Parses a leading integer the way browsers' `parseInt` does (`"12abc"`
/// reads as 12) and keeps it only if it is at least 1.
pub fn parse_positive_int(s: &str) -> Option<u32> {
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 || negative {
        return None;
    }
    rest[..digits].parse::<u32>().ok().filter(|n| *n >= 1)
}

/// Parses a `sort` parameter: comma-separated `column.asc|desc` tokens.
///
/// Tokens with no column, no direction or an unknown direction are dropped
/// one by one; the rest keep their order.
pub fn parse_sort(s: &str) -> Vec<SortEntry> {
    s.split(',')
        .filter_map(|token| {
            let mut parts = token.split('.');
            let column_id = parts.next().filter(|id| !id.is_empty())?;
            match parts.next() {
                Some("asc") => Some(SortEntry::asc(column_id)),
                Some("desc") => Some(SortEntry::desc(column_id)),
                _ => {
                    debug!("Dropping malformed sort token {:?}", token);
                    None
                }
            }
        })
        .collect()
}

/// Parses a `filters` parameter: a JSON array of predicates.
///
/// Invalid JSON or any element that does not fit the predicate shape yields
/// an empty list.
pub fn parse_filters(s: &str) -> Vec<FilterPredicate> {
    if s.is_empty() {
        return Vec::new();
    }
    match serde_json::from_str::<Vec<FilterPredicate>>(s) {
        Ok(filters) => filters,
        Err(e) => {
            debug!("Ignoring malformed filters parameter: {}", e);
            Vec::new()
        }
    }
}
