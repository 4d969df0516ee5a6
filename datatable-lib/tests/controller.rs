//! Table controller tests against an in-memory navigator.
//!
//! Time is paused, so sleeping advances the clock instantly and the debounce
//! timer fires deterministically.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use datatable_lib::codec::QueryKeys;
use datatable_lib::codec::QueryParams;
use datatable_lib::codec::decode;
use datatable_lib::error::ControllerError;
use datatable_lib::error::NavigationError;
use datatable_lib::model::Record;
use datatable_lib::query::FilterOperator;
use datatable_lib::query::FilterPredicate;
use datatable_lib::query::JoinOperator;
use datatable_lib::query::SortEntry;
use datatable_lib::table::ColumnDef;
use datatable_lib::table::ColumnFilter;
use datatable_lib::table::DataTableOptions;
use datatable_lib::table::InitialState;
use datatable_lib::table::MemoryNavigator;
use datatable_lib::table::NavigateOptions;
use datatable_lib::table::Navigator;
use datatable_lib::table::PaginationState;
use datatable_lib::table::StateUpdate;
use datatable_lib::table::TableConfig;
use datatable_lib::table::TableController;
use datatable_lib::table::TableOptions;
use url::Url;

const DEBOUNCE: Duration = Duration::from_millis(300);

fn navigator(url: &str) -> Arc<MemoryNavigator> {
    Arc::new(MemoryNavigator::new(Url::parse(url).unwrap()))
}

fn source() -> DataTableOptions<Record> {
    let rows = vec![
        Record::new().set("code", "TASK-0001").set("title", "Fix authentication bug"),
        Record::new().set("code", "TASK-0002").set("title", "Update documentation"),
    ];
    let columns = vec![ColumnDef::new("code"), ColumnDef::new("title")];
    DataTableOptions::new(rows, columns, 7)
}

fn controller(navigator: &Arc<MemoryNavigator>) -> TableController<Record> {
    TableController::new(source(), navigator.clone(), TableConfig::default()).unwrap()
}

fn url_state(navigator: &MemoryNavigator) -> datatable_lib::query::TableQueryState {
    decode(&QueryParams::from_url(&navigator.current_url()), &QueryKeys::default())
}

async fn wait_for_debounce() {
    tokio::time::sleep(DEBOUNCE + Duration::from_millis(1)).await;
}

#[tokio::test(start_paused = true)]
async fn test_bursts_coalesce_into_one_navigation() {
    let navigator = navigator("https://example.com/tasks");
    let mut table = controller(&navigator);

    table.on_sorting_change(vec![SortEntry::asc("title")]);
    tokio::time::sleep(Duration::from_millis(100)).await;
    table.on_sorting_change(StateUpdate::update(|sort: &Vec<SortEntry>| {
        sort.iter().map(|s| SortEntry::desc(s.column_id.clone())).collect()
    }));
    tokio::time::sleep(Duration::from_millis(100)).await;
    table.on_pagination_change(PaginationState::new(2, 20));

    assert!(table.has_pending_sync());
    assert_eq!(navigator.navigation_count(), 0);

    wait_for_debounce().await;

    assert!(!table.has_pending_sync());
    assert_eq!(navigator.navigation_count(), 1);
    let state = url_state(&navigator);
    assert_eq!(state.sort, vec![SortEntry::desc("title")]);
    assert_eq!(state.page, 3);
    assert_eq!(state.per_page, 20);
    assert_eq!(state, table.query_state());
}

#[tokio::test(start_paused = true)]
async fn test_navigation_uses_configured_options() {
    let navigator = navigator("https://example.com/tasks");
    let mut table = controller(&navigator);

    table.on_pagination_change(PaginationState::new(1, 10));
    wait_for_debounce().await;

    let navigations = navigator.navigations();
    assert_eq!(navigations.len(), 1);
    assert_eq!(navigations[0].1, NavigateOptions::default());
    assert!(navigations[0].1.replace_state && navigations[0].1.keep_focus);
}

#[tokio::test(start_paused = true)]
async fn test_visibility_and_selection_stay_local() {
    let navigator = navigator("https://example.com/tasks");
    let mut table = controller(&navigator);

    table.on_column_visibility_change([("title".to_string(), false)].into_iter().collect::<std::collections::BTreeMap<_, _>>());
    table.on_row_selection_change([("0".to_string(), true)].into_iter().collect::<std::collections::BTreeMap<_, _>>());
    assert!(!table.has_pending_sync());

    wait_for_debounce().await;
    assert_eq!(navigator.navigation_count(), 0);
    assert!(!table.state().is_column_visible("title"));
    assert_eq!(table.state().selected_row_ids().collect::<Vec<_>>(), ["0"]);
}

#[tokio::test(start_paused = true)]
async fn test_url_wins_over_initial_state() {
    let navigator = navigator("https://example.com/tasks?page=4&sort=code.desc&joinOperator=or");
    let initial = InitialState::new()
        .with_sorting(vec![SortEntry::asc("title")])
        .with_pagination(PaginationState::new(0, 50))
        .with_column_filters(vec![ColumnFilter::new("status", vec!["todo"])]);

    let table = TableController::new(
        source().with_initial_state(initial),
        navigator.clone(),
        TableConfig::default(),
    )
    .unwrap();

    let state = table.state();
    assert_eq!(state.sorting, vec![SortEntry::desc("code")]);
    assert_eq!(state.pagination, PaginationState::new(3, 50));
    assert_eq!(state.column_filters, vec![ColumnFilter::new("status", vec!["todo"])]);
    assert_eq!(state.join_operator, JoinOperator::Or);
}

#[tokio::test(start_paused = true)]
async fn test_filters_keep_operators_and_unrelated_params() {
    let navigator = navigator("https://example.com/tasks?tab=mine&joinOperator=or");
    let mut table = controller(&navigator);

    table.on_column_filters_change(vec![
        ColumnFilter::new("title", "bug"),
        ColumnFilter::with_operator("estimatedHours", FilterOperator::Between, (2.0, 8.0)),
    ]);
    wait_for_debounce().await;

    let url = navigator.current_url();
    assert_eq!(url.query_pairs().next().unwrap().0, "tab");
    let state = url_state(&navigator);
    assert_eq!(
        state.filters,
        vec![
            FilterPredicate::contains("title", "bug"),
            FilterPredicate::between("estimatedHours", 2.0, 8.0),
        ]
    );
    assert_eq!(state.join_operator, JoinOperator::Or);
}

#[tokio::test(start_paused = true)]
async fn test_join_operator_change_is_persisted() {
    let navigator = navigator("https://example.com/tasks?joinOperator=or");
    let mut table = controller(&navigator);

    table.set_join_operator(JoinOperator::And);
    wait_for_debounce().await;

    let url = navigator.current_url();
    assert!(!url.query_pairs().any(|(k, _)| k == "joinOperator"));
}

#[tokio::test(start_paused = true)]
async fn test_flush_now_skips_the_timer() {
    let navigator = navigator("https://example.com/tasks");
    let mut table = controller(&navigator);

    table.on_sorting_change(vec![SortEntry::asc("code")]);
    table.flush_now().unwrap();
    assert!(!table.has_pending_sync());
    assert_eq!(navigator.navigation_count(), 1);

    wait_for_debounce().await;
    assert_eq!(navigator.navigation_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_drop_cancels_pending_sync() {
    let navigator = navigator("https://example.com/tasks");
    let mut table = controller(&navigator);

    table.on_sorting_change(vec![SortEntry::asc("code")]);
    drop(table);

    wait_for_debounce().await;
    assert_eq!(navigator.navigation_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_engine_receives_every_snapshot() {
    let navigator = navigator("https://example.com/tasks");
    let seen: Rc<RefCell<Vec<Arc<TableOptions<Record>>>>> = Rc::default();

    let sink = Rc::clone(&seen);
    let mut table = controller(&navigator).with_engine(move |options: Arc<TableOptions<Record>>| {
        sink.borrow_mut().push(options);
    });
    assert_eq!(seen.borrow().len(), 1);

    table.on_sorting_change(vec![SortEntry::asc("code")]);
    table.on_column_visibility_change(StateUpdate::update(|v: &std::collections::BTreeMap<String, bool>| {
        let mut v = v.clone();
        v.insert("code".into(), false);
        v
    }));
    table.set_data(Vec::new(), 0);

    let seen = seen.borrow();
    assert_eq!(seen.len(), 4);
    let last = seen.last().unwrap();
    assert!(last.manual_pagination && last.manual_sorting && last.manual_filtering);
    assert_eq!(last.page_count, 0);
    assert!(last.data.is_empty());
    assert_eq!(last.state.sorting, vec![SortEntry::asc("code")]);
    assert_eq!(last.visible_columns().map(|c| c.id.as_str()).collect::<Vec<_>>(), ["title"]);
    assert_eq!(seen[0].page_count, 7);
}

struct RejectingNavigator;

impl Navigator for RejectingNavigator {
    fn current_url(&self) -> Url {
        Url::parse("https://example.com/tasks").unwrap()
    }

    fn replace(&self, url: Url, _options: NavigateOptions) -> Result<(), NavigationError> {
        Err(NavigationError::rejected(url.as_str(), "read-only"))
    }
}

#[tokio::test(start_paused = true)]
async fn test_navigation_errors_are_reported_by_flush() {
    let mut table = TableController::new(source(), Arc::new(RejectingNavigator), TableConfig::default()).unwrap();
    table.on_pagination_change(PaginationState::new(1, 10));

    let err = table.flush_now().unwrap_err();
    assert!(matches!(err, NavigationError::Rejected { .. }));
}

#[test]
fn test_requires_a_runtime() {
    let navigator = navigator("https://example.com/tasks");
    let err = TableController::new(source(), navigator, TableConfig::default()).unwrap_err();
    assert!(matches!(err, ControllerError::NoRuntime));
}
