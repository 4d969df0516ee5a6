//! The table state controller.

use std::fmt;
use std::sync::Arc;

use log::debug;
use tokio::runtime::Handle;

use super::ColumnDef;
use super::ColumnFilter;
use super::InitialState;
use super::Navigator;
use super::PaginationState;
use super::RowSelectionState;
use super::StateUpdate;
use super::TableConfig;
use super::TableEngine;
use super::TableOptions;
use super::TableState;
use super::VisibilityState;
use super::sync::PendingSync;
use super::sync::SyncJob;
use crate::codec::QueryParams;
use crate::codec::decode_partial;
use crate::codec::encode;
use crate::error::ControllerError;
use crate::error::NavigationError;
use crate::query::JoinOperator;
use crate::query::SortEntry;
use crate::query::TableQueryState;

/// What the caller hands the controller: one server-loaded page and the
/// column definitions.
#[derive(Debug, Clone)]
pub struct DataTableOptions<R> {
    pub data: Vec<R>,
    pub columns: Vec<ColumnDef>,
    pub page_count: usize,
    pub initial_state: InitialState,
}

impl<R> DataTableOptions<R> {
    /// Creates options for a page of rows.
    pub fn new(data: Vec<R>, columns: Vec<ColumnDef>, page_count: usize) -> Self {
        Self {
            data,
            columns,
            page_count,
            initial_state: InitialState::default(),
        }
    }

    /// Sets the state used where the URL says nothing.
    pub fn with_initial_state(mut self, initial_state: InitialState) -> Self {
        self.initial_state = initial_state;
        self
    }
}

/// Holds live table state, feeds it to a rendering engine and keeps the
/// URL in sync with it.
///
/// State is read from the URL once, at construction. Afterwards every change
/// reported by the engine updates the state and hands the engine a fresh
/// [`TableOptions`] snapshot. Changes to sorting, pagination, filters and
/// the join operator also schedule a URL rewrite, debounced by
/// [`TableConfig::debounce`]. Visibility and selection stay local.
///
/// The controller must be created inside a tokio runtime; the rewrite runs
/// as a task on it.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use datatable_lib::model::Record;
/// use datatable_lib::query::SortEntry;
/// use datatable_lib::table::{DataTableOptions, MemoryNavigator, Navigator, TableConfig, TableController};
/// use url::Url;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let navigator = Arc::new(MemoryNavigator::new(Url::parse("https://example.com/tasks?page=2").unwrap()));
/// let options = DataTableOptions::new(vec![Record::new().set("title", "Write docs")], Vec::new(), 4);
///
/// let mut table = TableController::new(options, navigator.clone(), TableConfig::default()).unwrap();
/// assert_eq!(table.state().pagination.page(), 2);
///
/// table.on_sorting_change(vec![SortEntry::desc("title")]);
/// table.flush_now().unwrap();
/// assert_eq!(navigator.current_url().query(), Some("page=2&perPage=10&sort=title.desc"));
/// # }
/// ```
pub struct TableController<R> {
    state: TableState,
    data: Arc<Vec<R>>,
    columns: Arc<Vec<ColumnDef>>,
    page_count: usize,
    options: Arc<TableOptions<R>>,
    engine: Option<Box<dyn TableEngine<R>>>,
    navigator: Arc<dyn Navigator>,
    config: TableConfig,
    pending: PendingSync,
}

impl<R> TableController<R> {
    /// Creates a controller, resolving its initial state from the
    /// navigator's current URL, then `source.initial_state`, then defaults.
    ///
    /// Fails with [`ControllerError::NoRuntime`] outside a tokio runtime.
    pub fn new(
        source: DataTableOptions<R>,
        navigator: Arc<dyn Navigator>,
        config: TableConfig,
    ) -> Result<Self, ControllerError> {
        let runtime = Handle::try_current().map_err(|_| ControllerError::NoRuntime)?;

        let url = navigator.current_url();
        let from_url = decode_partial(&QueryParams::from_url(&url), &config.query_keys);
        let state = TableState::resolve(from_url, source.initial_state);
        debug!("Table state resolved from {}: {:?}", url, state.to_query_state());

        let data = Arc::new(source.data);
        let columns = Arc::new(source.columns);
        let options = Arc::new(snapshot(&state, &data, &columns, source.page_count));

        Ok(Self {
            state,
            data,
            columns,
            page_count: source.page_count,
            options,
            engine: None,
            navigator,
            config,
            pending: PendingSync::new(runtime),
        })
    }

    /// Attaches the rendering engine and hands it the current configuration.
    pub fn with_engine(mut self, engine: impl TableEngine<R> + 'static) -> Self {
        self.engine = Some(Box::new(engine));
        self.rebuild_configuration();
        self
    }

    /// Returns the live state.
    pub fn state(&self) -> &TableState {
        &self.state
    }

    /// Returns the latest configuration snapshot.
    pub fn options(&self) -> Arc<TableOptions<R>> {
        Arc::clone(&self.options)
    }

    /// Returns the URL-relevant part of the live state.
    pub fn query_state(&self) -> TableQueryState {
        self.state.to_query_state()
    }

    /// Returns the controller configuration.
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Returns `true` while a URL rewrite is scheduled.
    pub fn has_pending_sync(&self) -> bool {
        self.pending.is_pending()
    }

    /// Applies a sorting change and schedules a URL sync.
    pub fn on_sorting_change(&mut self, update: impl Into<StateUpdate<Vec<SortEntry>>>) {
        self.apply("sorting", update.into(), |s| &mut s.sorting, true);
    }

    /// Applies a pagination change and schedules a URL sync.
    pub fn on_pagination_change(&mut self, update: impl Into<StateUpdate<PaginationState>>) {
        self.apply("pagination", update.into(), |s| &mut s.pagination, true);
    }

    /// Applies a column filter change and schedules a URL sync.
    pub fn on_column_filters_change(&mut self, update: impl Into<StateUpdate<Vec<ColumnFilter>>>) {
        self.apply("columnFilters", update.into(), |s| &mut s.column_filters, true);
    }

    /// Applies a column visibility change. Not written to the URL.
    pub fn on_column_visibility_change(&mut self, update: impl Into<StateUpdate<VisibilityState>>) {
        self.apply("columnVisibility", update.into(), |s| &mut s.column_visibility, false);
    }

    /// Applies a row selection change. Not written to the URL.
    pub fn on_row_selection_change(&mut self, update: impl Into<StateUpdate<RowSelectionState>>) {
        self.apply("rowSelection", update.into(), |s| &mut s.row_selection, false);
    }

    /// Switches between AND and OR filter combination.
    pub fn set_join_operator(&mut self, join_operator: JoinOperator) {
        self.apply("joinOperator", StateUpdate::Set(join_operator), |s| &mut s.join_operator, true);
    }

    /// Replaces the displayed rows after the server loaded a new page.
    ///
    /// The state is left alone and nothing is written to the URL.
    pub fn set_data(&mut self, data: Vec<R>, page_count: usize) {
        self.data = Arc::new(data);
        self.page_count = page_count;
        self.rebuild_configuration();
    }

    /// Cancels the debounce timer and rewrites the URL immediately.
    pub fn flush_now(&mut self) -> Result<(), NavigationError> {
        self.pending.cancel();
        self.sync_job().run()
    }

    /// Builds a fresh configuration snapshot from the live state and hands
    /// it to the engine, if one is attached.
    pub fn rebuild_configuration(&mut self) -> Arc<TableOptions<R>> {
        self.options = Arc::new(snapshot(&self.state, &self.data, &self.columns, self.page_count));
        if let Some(engine) = self.engine.as_mut() {
            engine.configure(Arc::clone(&self.options));
        }
        Arc::clone(&self.options)
    }

    fn apply<T>(
        &mut self,
        name: &str,
        update: StateUpdate<T>,
        field: fn(&mut TableState) -> &mut T,
        persist: bool,
    ) {
        let slot = field(&mut self.state);
        let next = update.apply(slot);
        *slot = next;
        debug!("Table {} changed", name);

        self.rebuild_configuration();
        if persist {
            self.pending.arm(self.config.debounce, self.sync_job());
        }
    }

    fn sync_job(&self) -> SyncJob {
        SyncJob {
            navigator: Arc::clone(&self.navigator),
            update: encode(&self.state.to_query_state(), &self.config.query_keys),
            options: self.config.navigate_options,
        }
    }
}

impl<R> fmt::Debug for TableController<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableController")
            .field("state", &self.state)
            .field("rows", &self.data.len())
            .field("page_count", &self.page_count)
            .field("config", &self.config)
            .field("pending_sync", &self.pending.is_pending())
            .finish_non_exhaustive()
    }
}

fn snapshot<R>(state: &TableState, data: &Arc<Vec<R>>, columns: &Arc<Vec<ColumnDef>>, page_count: usize) -> TableOptions<R> {
    TableOptions {
        data: Arc::clone(data),
        columns: Arc::clone(columns),
        page_count,
        state: state.clone(),
        enable_row_selection: true,
        manual_pagination: true,
        manual_sorting: true,
        manual_filtering: true,
    }
}
