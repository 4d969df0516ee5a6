//! Dynamic records and the `Row` trait

use std::collections::HashMap;

use super::Value;

/// A queryable row.
///
/// The executor and the filter evaluator only ever read rows through this
/// trait, so any structured type can be stored and queried. Unknown columns
/// must read as [`Value::Null`].
///
/// # Example
///
/// ```
/// use datatable_lib::model::{Row, Value};
///
/// struct Task {
///     title: String,
///     hours: i64,
/// }
///
/// impl Row for Task {
///     fn value(&self, column_id: &str) -> Value {
///         match column_id {
///             "title" => Value::from(self.title.as_str()),
///             "hours" => Value::from(self.hours),
///             _ => Value::Null,
///         }
///     }
/// }
/// ```
pub trait Row {
    /// Returns the value of the given column, or `Value::Null` if the row
    /// has no such column.
    fn value(&self, column_id: &str) -> Value;
}

impl<R: Row + ?Sized> Row for &R {
    fn value(&self, column_id: &str) -> Value {
        (**self).value(column_id)
    }
}

/// A dynamic row backed by a field map.
///
/// # Example
///
/// ```
/// use datatable_lib::model::{Record, Row, Value};
///
/// let record = Record::new()
///     .set("code", "TASK-0001")
///     .set("estimatedHours", 8);
///
/// assert_eq!(record.value("estimatedHours"), Value::Int(8));
/// assert_eq!(record.value("nope"), Value::Null);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: HashMap<String, Value>,
}

impl Record {
    /// Creates a new empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field value (builder pattern).
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Inserts a field value.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Returns a reference to the field value, if it exists.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Returns `true` if the record contains the given field.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Returns a reference to all fields.
    pub fn fields(&self) -> &HashMap<String, Value> {
        &self.fields
    }
}

impl Row for Record {
    fn value(&self, column_id: &str) -> Value {
        self.fields.get(column_id).cloned().unwrap_or_default()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}
