//! Filter predicates and their evaluation against rows.

use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::JoinOperator;
use crate::model::Row;
use crate::model::Value;
use crate::model::format_number;

/// A filter operator.
///
/// Serialized with the short names used in table URLs (`eq`, `iLike`,
/// `inArray`, ...). The descriptive names (`equals`, `containsCI`,
/// `inSet`, ...) are also accepted when decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterOperator {
    /// Strict equality.
    #[serde(rename = "eq", alias = "equals")]
    Equals,
    /// Strict inequality.
    #[serde(rename = "ne", alias = "notEquals")]
    NotEquals,
    /// Case-insensitive substring.
    #[serde(rename = "iLike", alias = "containsCI")]
    ContainsCi,
    /// Case-insensitive substring, negated.
    #[serde(rename = "notILike", alias = "notContainsCI")]
    NotContainsCi,
    /// Membership in a set of strings.
    #[serde(rename = "inArray", alias = "inSet")]
    InSet,
    /// Non-membership in a set of strings.
    #[serde(rename = "notInArray", alias = "notInSet")]
    NotInSet,
    /// Numeric `<`.
    #[serde(rename = "lt", alias = "lessThan")]
    LessThan,
    /// Numeric `<=`.
    #[serde(rename = "lte", alias = "lessOrEqual")]
    LessOrEqual,
    /// Numeric `>`.
    #[serde(rename = "gt", alias = "greaterThan")]
    GreaterThan,
    /// Numeric `>=`.
    #[serde(rename = "gte", alias = "greaterOrEqual")]
    GreaterOrEqual,
    /// Inclusive numeric range.
    #[serde(rename = "isBetween", alias = "between")]
    Between,
    /// Null, missing or empty string.
    #[serde(rename = "isEmpty")]
    IsEmpty,
    /// Anything but null, missing or empty string.
    #[serde(rename = "isNotEmpty")]
    IsNotEmpty,
    /// Date relative to today. Not implemented: always matches.
    #[serde(rename = "isRelativeToToday", alias = "relativeToToday")]
    RelativeToToday,
}

impl FilterOperator {
    /// Returns the name used in URLs.
    pub fn wire_name(&self) -> &'static str {
        match self {
            Self::Equals => "eq",
            Self::NotEquals => "ne",
            Self::ContainsCi => "iLike",
            Self::NotContainsCi => "notILike",
            Self::InSet => "inArray",
            Self::NotInSet => "notInArray",
            Self::LessThan => "lt",
            Self::LessOrEqual => "lte",
            Self::GreaterThan => "gt",
            Self::GreaterOrEqual => "gte",
            Self::Between => "isBetween",
            Self::IsEmpty => "isEmpty",
            Self::IsNotEmpty => "isNotEmpty",
            Self::RelativeToToday => "isRelativeToToday",
        }
    }

    /// Returns the descriptive name.
    pub fn descriptive_name(&self) -> &'static str {
        match self {
            Self::Equals => "equals",
            Self::NotEquals => "notEquals",
            Self::ContainsCi => "containsCI",
            Self::NotContainsCi => "notContainsCI",
            Self::InSet => "inSet",
            Self::NotInSet => "notInSet",
            Self::LessThan => "lessThan",
            Self::LessOrEqual => "lessOrEqual",
            Self::GreaterThan => "greaterThan",
            Self::GreaterOrEqual => "greaterOrEqual",
            Self::Between => "between",
            Self::IsEmpty => "isEmpty",
            Self::IsNotEmpty => "isNotEmpty",
            Self::RelativeToToday => "relativeToToday",
        }
    }

    /// Returns true if this operator reads the predicate value.
    pub fn requires_value(&self) -> bool {
        !matches!(self, Self::IsEmpty | Self::IsNotEmpty | Self::RelativeToToday)
    }

    /// All operators in declaration order.
    pub fn all() -> &'static [FilterOperator] {
        &[
            Self::Equals,
            Self::NotEquals,
            Self::ContainsCi,
            Self::NotContainsCi,
            Self::InSet,
            Self::NotInSet,
            Self::LessThan,
            Self::LessOrEqual,
            Self::GreaterThan,
            Self::GreaterOrEqual,
            Self::Between,
            Self::IsEmpty,
            Self::IsNotEmpty,
            Self::RelativeToToday,
        ]
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Error returned when parsing an unknown operator name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown filter operator '{0}'")]
pub struct UnknownOperator(pub String);

impl FromStr for FilterOperator {
    type Err = UnknownOperator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|op| op.wire_name() == s || op.descriptive_name() == s)
            .ok_or_else(|| UnknownOperator(s.to_string()))
    }
}

/// The operand of a filter predicate.
///
/// The JSON shape picks the variant: `null`, a number, a two-number array
/// (range), an array of strings (set) or a string.
///
/// Dates travel as RFC 3339 text and are only read as dates when a
/// predicate is evaluated: numeric operators compare them as epoch
/// milliseconds and `eq` matches them against date fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    #[default]
    Null,
    Number(f64),
    Range(f64, f64),
    Set(Vec<String>),
    Text(String),
}

impl FilterValue {
    /// Numeric reading of the operand, if any.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FilterValue::Number(n) => Some(*n),
            FilterValue::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    trimmed
                        .parse::<f64>()
                        .ok()
                        .or_else(|| parse_date(trimmed).map(|dt| dt.timestamp_millis() as f64))
                }
            }
            FilterValue::Null | FilterValue::Range(..) | FilterValue::Set(_) => None,
        }
    }

    /// Returns `true` if this is an array-shaped operand.
    pub fn is_array(&self) -> bool {
        matches!(self, FilterValue::Set(_) | FilterValue::Range(..))
    }

    /// Strict, type-aware equality with a row value.
    ///
    /// Numbers compare numerically whatever their representation; text
    /// never equals a number. Text equals a date field when it parses as
    /// the same instant.
    pub fn strictly_equals(&self, value: &Value) -> bool {
        match (self, value) {
            (FilterValue::Null, Value::Null) => true,
            (FilterValue::Number(x), v) if v.is_number() => v.as_number() == Some(*x),
            (FilterValue::Text(x), Value::Text(v)) => x == v,
            (FilterValue::Text(x), Value::Date(v)) => parse_date(x.trim()) == Some(*v),
            _ => false,
        }
    }

    /// Reads a two-element array operand as numeric bounds.
    ///
    /// Accepts a `Range` and a two-item `Set` whose items are numeric,
    /// which is how a range arrives when its bounds were sent as strings.
    pub fn as_bounds(&self) -> Option<(f64, f64)> {
        match self {
            FilterValue::Range(lo, hi) => Some((*lo, *hi)),
            FilterValue::Set(items) => match items.as_slice() {
                [lo, hi] => {
                    let lo = FilterValue::Text(lo.clone()).as_number()?;
                    let hi = FilterValue::Text(hi.clone()).as_number()?;
                    Some((lo, hi))
                }
                _ => None,
            },
            _ => None,
        }
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Null => Ok(()),
            FilterValue::Number(n) => f.write_str(&format_number(*n)),
            FilterValue::Range(lo, hi) => write!(f, "{},{}", format_number(*lo), format_number(*hi)),
            FilterValue::Set(items) => f.write_str(&items.join(",")),
            FilterValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(v: &str) -> Self {
        FilterValue::Text(v.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(v: String) -> Self {
        FilterValue::Text(v)
    }
}

impl From<f64> for FilterValue {
    fn from(v: f64) -> Self {
        FilterValue::Number(v)
    }
}

impl From<i32> for FilterValue {
    fn from(v: i32) -> Self {
        FilterValue::Number(v.into())
    }
}

impl From<i64> for FilterValue {
    fn from(v: i64) -> Self {
        FilterValue::Number(v as f64)
    }
}

impl From<(f64, f64)> for FilterValue {
    fn from((lo, hi): (f64, f64)) -> Self {
        FilterValue::Range(lo, hi)
    }
}

impl From<Vec<String>> for FilterValue {
    fn from(v: Vec<String>) -> Self {
        FilterValue::Set(v)
    }
}

impl From<Vec<&str>> for FilterValue {
    fn from(v: Vec<&str>) -> Self {
        FilterValue::Set(v.into_iter().map(String::from).collect())
    }
}

impl From<DateTime<Utc>> for FilterValue {
    fn from(v: DateTime<Utc>) -> Self {
        FilterValue::Text(v.to_rfc3339())
    }
}

/// A single filter condition: column, operator and operand.
///
/// Serialized as `{"id": ..., "operator": ..., "value": ...}`. A missing
/// `value` reads as `null`.
///
/// # Example
///
/// ```
/// use datatable_lib::model::Record;
/// use datatable_lib::query::FilterPredicate;
///
/// let task = Record::new().set("title", "Fix authentication bug").set("estimatedHours", 15);
///
/// assert!(FilterPredicate::contains("title", "AUTH").matches(&task));
/// assert!(FilterPredicate::between("estimatedHours", 10.0, 20.0).matches(&task));
/// assert!(!FilterPredicate::gt("estimatedHours", 20).matches(&task));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterPredicate {
    /// The column the predicate reads.
    #[serde(rename = "id")]
    pub column_id: String,
    /// The operator.
    pub operator: FilterOperator,
    /// The operand.
    #[serde(default)]
    pub value: FilterValue,
}

impl FilterPredicate {
    /// Creates a predicate.
    pub fn new(column_id: impl Into<String>, operator: FilterOperator, value: impl Into<FilterValue>) -> Self {
        Self {
            column_id: column_id.into(),
            operator,
            value: value.into(),
        }
    }

    /// Creates an equality predicate.
    pub fn eq(column_id: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(column_id, FilterOperator::Equals, value)
    }

    /// Creates an inequality predicate.
    pub fn ne(column_id: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(column_id, FilterOperator::NotEquals, value)
    }

    /// Creates a case-insensitive contains predicate.
    pub fn contains(column_id: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(column_id, FilterOperator::ContainsCi, FilterValue::Text(value.into()))
    }

    /// Creates a set membership predicate.
    pub fn in_set<S: Into<String>>(column_id: impl Into<String>, values: impl IntoIterator<Item = S>) -> Self {
        let set = values.into_iter().map(Into::into).collect::<Vec<_>>();
        Self::new(column_id, FilterOperator::InSet, FilterValue::Set(set))
    }

    /// Creates a numeric less-than predicate.
    pub fn lt(column_id: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(column_id, FilterOperator::LessThan, value)
    }

    /// Creates a numeric greater-than predicate.
    pub fn gt(column_id: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(column_id, FilterOperator::GreaterThan, value)
    }

    /// Creates an inclusive range predicate.
    pub fn between(column_id: impl Into<String>, lo: f64, hi: f64) -> Self {
        Self::new(column_id, FilterOperator::Between, FilterValue::Range(lo, hi))
    }

    /// Creates an emptiness predicate.
    pub fn is_empty(column_id: impl Into<String>) -> Self {
        Self::new(column_id, FilterOperator::IsEmpty, FilterValue::Null)
    }

    /// Creates a non-emptiness predicate.
    pub fn is_not_empty(column_id: impl Into<String>) -> Self {
        Self::new(column_id, FilterOperator::IsNotEmpty, FilterValue::Null)
    }

    /// Evaluates this predicate against a row. See [`evaluate`].
    pub fn matches<R: Row + ?Sized>(&self, row: &R) -> bool {
        evaluate(self, row)
    }
}

/// Evaluates one predicate against one row.
///
/// Total: an operand whose shape does not fit the operator makes the
/// predicate false instead of failing. Numeric comparisons are false when
/// either side has no numeric reading. `between` takes its bounds
/// literally, so a reversed range only matches when both bounds are equal.
pub fn evaluate<R: Row + ?Sized>(predicate: &FilterPredicate, row: &R) -> bool {
    let v = row.value(&predicate.column_id);
    let x = &predicate.value;

    match predicate.operator {
        FilterOperator::Equals => x.strictly_equals(&v),
        FilterOperator::NotEquals => !x.strictly_equals(&v),
        FilterOperator::ContainsCi => contains_ci(&v, x),
        FilterOperator::NotContainsCi => !contains_ci(&v, x),
        FilterOperator::InSet => match x {
            FilterValue::Set(items) => items.contains(&v.to_string()),
            _ => false,
        },
        FilterOperator::NotInSet => match x {
            FilterValue::Set(items) => !items.contains(&v.to_string()),
            _ => false,
        },
        FilterOperator::LessThan => compare_numbers(&v, x, |a, b| a < b),
        FilterOperator::LessOrEqual => compare_numbers(&v, x, |a, b| a <= b),
        FilterOperator::GreaterThan => compare_numbers(&v, x, |a, b| a > b),
        FilterOperator::GreaterOrEqual => compare_numbers(&v, x, |a, b| a >= b),
        FilterOperator::Between => match x.as_bounds() {
            Some((lo, hi)) => v.as_number().is_some_and(|n| n >= lo && n <= hi),
            None => false,
        },
        FilterOperator::IsEmpty => v.is_empty(),
        FilterOperator::IsNotEmpty => !v.is_empty(),
        // TODO: needs a product decision on the relative window ("last N days"?)
        FilterOperator::RelativeToToday => true,
    }
}

/// Evaluates a set of predicates with the given join.
///
/// `And` is vacuously true for no predicates, `Or` vacuously false. Callers
/// that mean "no filtering" for an empty list must skip the call, as
/// [`RecordStore::run_query`](crate::store::RecordStore::run_query) does.
pub fn evaluate_all<R: Row + ?Sized>(predicates: &[FilterPredicate], join: JoinOperator, row: &R) -> bool {
    match join {
        JoinOperator::And => predicates.iter().all(|p| evaluate(p, row)),
        JoinOperator::Or => predicates.iter().any(|p| evaluate(p, row)),
    }
}

fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.with_timezone(&Utc))
}

fn contains_ci(v: &Value, x: &FilterValue) -> bool {
    v.to_string().to_lowercase().contains(&x.to_string().to_lowercase())
}

fn compare_numbers(v: &Value, x: &FilterValue, cmp: impl Fn(f64, f64) -> bool) -> bool {
    match (v.as_number(), x.as_number()) {
        (Some(a), Some(b)) => cmp(a, b),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::model::Record;

    fn task() -> Record {
        Record::new()
            .set("title", "Fix Authentication Bug")
            .set("status", "todo")
            .set("estimatedHours", 15)
            .set("notes", "")
            .set("zero", 0)
            .set("zeroText", "0")
    }

    #[test]
    fn test_equals_is_type_aware() {
        let row = task();
        assert!(FilterPredicate::eq("estimatedHours", 15).matches(&row));
        assert!(FilterPredicate::eq("estimatedHours", 15.0).matches(&row));
        assert!(!FilterPredicate::eq("estimatedHours", "15").matches(&row));
        assert!(FilterPredicate::ne("estimatedHours", "15").matches(&row));
        assert!(FilterPredicate::eq("status", "todo").matches(&row));
    }

    #[test]
    fn test_contains_is_case_insensitive() {
        let row = task();
        assert!(FilterPredicate::contains("title", "authentication").matches(&row));
        assert!(FilterPredicate::contains("estimatedHours", "5").matches(&row));
        let negated = FilterPredicate::new("title", FilterOperator::NotContainsCi, "BUG");
        assert!(!negated.matches(&row));
    }

    #[test]
    fn test_set_membership() {
        let row = task();
        assert!(FilterPredicate::in_set("status", ["todo", "done"]).matches(&row));
        assert!(!FilterPredicate::in_set("status", ["done"]).matches(&row));
        let not_in = FilterPredicate::new("status", FilterOperator::NotInSet, vec!["done"]);
        assert!(not_in.matches(&row));
        // Set operators need a set operand.
        let malformed = FilterPredicate::new("status", FilterOperator::NotInSet, "todo");
        assert!(!malformed.matches(&row));
    }

    #[test]
    fn test_numeric_comparisons() {
        let row = task();
        assert!(FilterPredicate::lt("estimatedHours", 16).matches(&row));
        assert!(FilterPredicate::new("estimatedHours", FilterOperator::LessOrEqual, 15).matches(&row));
        assert!(FilterPredicate::new("estimatedHours", FilterOperator::GreaterOrEqual, "15").matches(&row));
        assert!(!FilterPredicate::gt("estimatedHours", 15).matches(&row));
        assert!(!FilterPredicate::gt("title", 1).matches(&row));
    }

    #[test]
    fn test_between() {
        let at = |hours: i64| Record::new().set("estimatedHours", hours);
        let range = FilterPredicate::between("estimatedHours", 10.0, 20.0);
        assert!(range.matches(&at(15)));
        assert!(range.matches(&at(10)));
        assert!(range.matches(&at(20)));
        assert!(!range.matches(&at(25)));

        let reversed = FilterPredicate::between("estimatedHours", 20.0, 10.0);
        assert!(!reversed.matches(&at(15)));
        assert!(FilterPredicate::between("estimatedHours", 15.0, 15.0).matches(&at(15)));

        let malformed = FilterPredicate::new("estimatedHours", FilterOperator::Between, 15);
        assert!(!malformed.matches(&at(15)));
    }

    #[test]
    fn test_between_accepts_string_bounds() {
        let at = |hours: i64| Record::new().set("estimatedHours", hours);
        let filters = crate::codec::parse_filters(r#"[{"id":"estimatedHours","operator":"isBetween","value":["10","20"]}]"#);
        assert_eq!(filters[0].value, FilterValue::from(vec!["10", "20"]));
        assert!(filters[0].matches(&at(15)));
        assert!(!filters[0].matches(&at(25)));

        let three = FilterPredicate::new("estimatedHours", FilterOperator::Between, vec!["10", "15", "20"]);
        assert!(!three.matches(&at(15)));
        let words = FilterPredicate::new("estimatedHours", FilterOperator::Between, vec!["low", "high"]);
        assert!(!words.matches(&at(15)));
    }

    #[test]
    fn test_date_operands_are_read_at_evaluation() {
        let created = Utc.with_ymd_and_hms(2024, 3, 10, 8, 0, 0).unwrap();
        let row = Record::new().set("createdAt", created).set("title", "2024-03-10T08:00:00+00:00");

        assert!(FilterPredicate::eq("createdAt", created).matches(&row));
        assert!(FilterPredicate::eq("createdAt", "2024-03-10T08:00:00Z").matches(&row));
        assert!(FilterPredicate::eq("title", "2024-03-10T08:00:00+00:00").matches(&row));
        assert!(!FilterPredicate::eq("title", "2024-03-10T08:00:00Z").matches(&row));
        assert!(FilterPredicate::gt("createdAt", "2024-03-01T00:00:00Z").matches(&row));
        assert!(!FilterPredicate::lt("createdAt", "2024-03-01T00:00:00Z").matches(&row));
    }

    #[test]
    fn test_emptiness() {
        let row = task();
        assert!(FilterPredicate::is_empty("notes").matches(&row));
        assert!(FilterPredicate::is_empty("missing").matches(&row));
        assert!(FilterPredicate::is_empty("nulled").matches(&row.clone().set("nulled", Value::Null)));
        assert!(FilterPredicate::is_not_empty("zero").matches(&row));
        assert!(FilterPredicate::is_not_empty("zeroText").matches(&row));
    }

    #[test]
    fn test_relative_to_today_always_matches() {
        let p = FilterPredicate::new("createdAt", FilterOperator::RelativeToToday, FilterValue::Null);
        assert!(p.matches(&task()));
    }

    #[test]
    fn test_join_semantics() {
        let rows = [
            Record::new().set("id", 1).set("a", true).set("b", false),
            Record::new().set("id", 2).set("a", true).set("b", true),
            Record::new().set("id", 3).set("a", false).set("b", true),
        ];
        let p1 = FilterPredicate::in_set("a", ["true"]);
        let p2 = FilterPredicate::in_set("b", ["true"]);
        let predicates = [p1, p2];

        let and: Vec<_> = rows
            .iter()
            .filter(|r| evaluate_all(&predicates, JoinOperator::And, *r))
            .map(|r| r.value("id"))
            .collect();
        assert_eq!(and, vec![Value::Int(2)]);

        let or = rows.iter().filter(|r| evaluate_all(&predicates, JoinOperator::Or, *r)).count();
        assert_eq!(or, 3);
    }

    #[test]
    fn test_vacuous_joins() {
        let row = task();
        assert!(evaluate_all(&[], JoinOperator::And, &row));
        assert!(!evaluate_all(&[], JoinOperator::Or, &row));
    }

    #[test]
    fn test_operator_names() {
        assert_eq!("iLike".parse::<FilterOperator>(), Ok(FilterOperator::ContainsCi));
        assert_eq!("containsCI".parse::<FilterOperator>(), Ok(FilterOperator::ContainsCi));
        assert!("like".parse::<FilterOperator>().is_err());
        for op in FilterOperator::all() {
            assert_eq!(op.wire_name().parse::<FilterOperator>().as_ref(), Ok(op));
        }
    }
}
