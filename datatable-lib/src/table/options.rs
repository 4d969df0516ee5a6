//! Rendering engine configuration.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;

use super::TableState;

/// One selectable value of a categorical filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    pub label: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl FilterOption {
    /// Creates an option without a count.
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            count: None,
        }
    }
}

/// A column definition with the metadata filter pickers need.
///
/// # Example
///
/// ```
/// use std::collections::BTreeMap;
/// use datatable_lib::table::{ColumnDef, FilterOption};
///
/// let counts: BTreeMap<String, usize> = [("todo".to_string(), 7)].into_iter().collect();
/// let status = ColumnDef::new("status")
///     .with_label("Status")
///     .with_options(vec![FilterOption::new("Todo", "todo"), FilterOption::new("Done", "done")])
///     .with_counts(&counts);
///
/// assert_eq!(status.options[0].count, Some(7));
/// assert_eq!(status.options[1].count, Some(0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDef {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FilterOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<(f64, f64)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub enable_sorting: bool,
    pub enable_hiding: bool,
}

impl ColumnDef {
    /// Creates a sortable, hideable column.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: None,
            placeholder: None,
            options: Vec::new(),
            range: None,
            unit: None,
            enable_sorting: true,
            enable_hiding: true,
        }
    }

    /// Sets the header label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets the filter input placeholder.
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Sets the selectable filter options.
    pub fn with_options(mut self, options: Vec<FilterOption>) -> Self {
        self.options = options;
        self
    }

    /// Sets the numeric range offered by a range filter.
    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.range = Some((min, max));
        self
    }

    /// Sets the unit shown next to range values.
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Enables or disables sorting on this column.
    pub fn with_sorting(mut self, enabled: bool) -> Self {
        self.enable_sorting = enabled;
        self
    }

    /// Enables or disables hiding this column.
    pub fn with_hiding(mut self, enabled: bool) -> Self {
        self.enable_hiding = enabled;
        self
    }

    /// Fills option counts from full-store facet counts. Options missing
    /// from `counts` get zero.
    pub fn with_counts(mut self, counts: &BTreeMap<String, usize>) -> Self {
        for option in &mut self.options {
            option.count = Some(counts.get(&option.value).copied().unwrap_or(0));
        }
        self
    }

    /// Returns the label, falling back to the id.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }
}

/// An immutable configuration snapshot handed to the rendering engine.
///
/// The `manual_*` flags are always `true`: filtering, sorting and
/// pagination happen on the server, so the engine must render `data` as
/// given rather than derive its own row models.
#[derive(Debug)]
pub struct TableOptions<R> {
    pub data: Arc<Vec<R>>,
    pub columns: Arc<Vec<ColumnDef>>,
    pub page_count: usize,
    pub state: TableState,
    pub enable_row_selection: bool,
    pub manual_pagination: bool,
    pub manual_sorting: bool,
    pub manual_filtering: bool,
}

impl<R> TableOptions<R> {
    /// Returns the columns the user has not hidden.
    pub fn visible_columns(&self) -> impl Iterator<Item = &ColumnDef> {
        self.columns
            .iter()
            .filter(|column| self.state.is_column_visible(&column.id))
    }
}

/// The rendering engine the controller drives.
///
/// `configure` receives a fresh snapshot after every state change.
pub trait TableEngine<R> {
    fn configure(&mut self, options: Arc<TableOptions<R>>);
}

impl<R, F: FnMut(Arc<TableOptions<R>>)> TableEngine<R> for F {
    fn configure(&mut self, options: Arc<TableOptions<R>>) {
        self(options)
    }
}
