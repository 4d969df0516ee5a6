mod cli;
mod error;
mod render;
mod tasks;

use std::fs::File;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use clap::Parser;
use datatable_lib::codec::parse_sort;
use datatable_lib::store::FacetSpec;
use datatable_lib::store::RecordStore;
use datatable_lib::store::TableLoader;
use datatable_lib::table::DataTableOptions;
use datatable_lib::table::MemoryNavigator;
use datatable_lib::table::Navigator;
use datatable_lib::table::PaginationState;
use datatable_lib::table::StateUpdate;
use datatable_lib::table::TableConfig;
use datatable_lib::table::TableController;
use datatable_lib::table::TableOptions;
use datatable_lib::table::VisibilityState;
use log::debug;
use log::info;
use simplelog::Config;
use simplelog::LevelFilter;
use simplelog::WriteLogger;

use crate::cli::Cli;
use crate::error::CliError;
use crate::render::describe;
use crate::render::print_facets;
use crate::render::print_page;
use crate::tasks::LABELS;
use crate::tasks::PRIORITIES;
use crate::tasks::STATUSES;
use crate::tasks::Task;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    init_logging(&cli)?;

    let store = RecordStore::new(tasks::generate_tasks(cli.rows, cli.seed, Utc::now()));
    let loader = TableLoader::new(store).with_facets(
        FacetSpec::new()
            .count_with_domain("status", STATUSES)
            .count_with_domain("priority", PRIORITIES)
            .count_with_domain("label", LABELS)
            .range("estimatedHours"),
    );
    info!("Seeded {} tasks (seed {})", cli.rows, cli.seed);

    let response = loader.load_url(&cli.url);
    info!("Loaded {}", describe(&response));
    let columns = tasks::columns(&response.filter_counts);
    let total = response.total;

    let navigator = Arc::new(MemoryNavigator::new(cli.url.clone()));
    let config = TableConfig::new().with_debounce(cli.debounce());
    let source = DataTableOptions::new(response.rows, columns.clone(), response.page_count);
    let mut table = TableController::new(source, navigator.clone(), config)?.with_engine(
        |options: Arc<TableOptions<Task>>| {
            debug!("Engine configured: {} rows, {} pages", options.data.len(), options.page_count);
        },
    );

    println!("{}", cli.url);
    print_facets(&columns);
    println!();
    print_page(&table.options(), total);

    if !cli.has_interaction() {
        return Ok(());
    }

    replay(&cli, &mut table);
    if table.has_pending_sync() {
        tokio::time::sleep(cli.debounce() + Duration::from_millis(10)).await;
    }
    if table.has_pending_sync() {
        table.flush_now()?;
    }

    let url = navigator.current_url();
    let response = loader.load_url(&url);
    info!("Reloaded {}", describe(&response));
    table.set_data(response.rows, response.page_count);

    println!();
    println!("{}", url);
    print_page(&table.options(), response.total);
    Ok(())
}

fn init_logging(cli: &Cli) -> Result<(), CliError> {
    let level = match cli.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let log_file = File::create(&cli.log_file)?;
    WriteLogger::init(level, Config::default(), log_file)?;
    Ok(())
}

/// Feeds the requested interactions to the table as engine events.
fn replay(cli: &Cli, table: &mut TableController<Task>) {
    if let Some(sort) = &cli.sort {
        table.on_sorting_change(parse_sort(sort));
    }

    let filters_changed = cli.clear_filters || !cli.filters.is_empty();
    if cli.clear_filters {
        table.on_column_filters_change(Vec::new());
    } else if !cli.filters.is_empty() {
        table.on_column_filters_change(cli.filters.clone());
    }

    if let Some(join) = cli.join {
        table.set_join_operator(join.into());
    }

    // A new filter set starts from the first page unless a page was asked for.
    let page_index = match cli.page {
        Some(page) => Some(page.max(1) - 1),
        None if filters_changed => Some(0),
        None => None,
    };
    if page_index.is_some() || cli.per_page.is_some() {
        let per_page = cli.per_page;
        table.on_pagination_change(StateUpdate::update(move |p: &PaginationState| {
            PaginationState::new(
                page_index.unwrap_or(p.page_index),
                per_page.map(|n| n.max(1)).unwrap_or(p.page_size),
            )
        }));
    }

    if !cli.hidden.is_empty() {
        let hidden = cli.hidden.clone();
        table.on_column_visibility_change(StateUpdate::update(move |visibility: &VisibilityState| {
            let mut visibility = visibility.clone();
            for column in hidden {
                visibility.insert(column, false);
            }
            visibility
        }));
    }
}
