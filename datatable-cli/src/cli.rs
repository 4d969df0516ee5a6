//! Command-line arguments.

use std::path::PathBuf;
use std::time::Duration;

use clap::ArgAction;
use clap::Parser;
use clap::ValueEnum;
use datatable_lib::query::FilterOperator;
use datatable_lib::query::FilterValue;
use datatable_lib::query::JoinOperator;
use datatable_lib::table::ColumnFilter;
use url::Url;

#[derive(Debug, Parser)]
#[command(
    name = "datatable",
    version,
    about = "Query an in-memory task table the way a data table page does",
    long_about = "Loads the page of tasks selected by URL's query string and prints it.\n\n\
                  Interaction flags (--sort, --filter, --page, ...) are then replayed as\n\
                  table events; the URL the table settles on is printed and loaded."
)]
pub struct Cli {
    /// Page URL; its query string selects sort, filters and page.
    #[arg(value_name = "URL", default_value = "http://localhost/tasks")]
    pub url: Url,

    /// Number of tasks in the store.
    #[arg(long, default_value_t = 100)]
    pub rows: usize,

    /// Seed for the generated tasks.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Quiet period before the URL is rewritten.
    #[arg(long = "debounce-ms", value_name = "MS", default_value_t = 300)]
    pub debounce_ms: u64,

    /// Write logs to this file.
    #[arg(long = "log-file", value_name = "PATH", default_value = "datatable.log")]
    pub log_file: PathBuf,

    /// Log more (-v for debug, -vv for trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Sort the table, e.g. `estimatedHours.desc,title.asc`.
    #[arg(long, value_name = "SORT")]
    pub sort: Option<String>,

    /// Filter a column: `ID:OPERATOR[:VALUE]`, where VALUE is JSON or plain
    /// text. Repeatable.
    #[arg(long = "filter", value_name = "FILTER", value_parser = parse_filter)]
    pub filters: Vec<ColumnFilter>,

    /// Clear all filters.
    #[arg(long, conflicts_with = "filters")]
    pub clear_filters: bool,

    /// How filters combine.
    #[arg(long, value_enum)]
    pub join: Option<JoinArg>,

    /// Go to a 1-based page.
    #[arg(long)]
    pub page: Option<u32>,

    /// Change the page size.
    #[arg(long = "per-page")]
    pub per_page: Option<u32>,

    /// Hide a column. Repeatable. Never written to the URL.
    #[arg(long = "hide", value_name = "COLUMN")]
    pub hidden: Vec<String>,
}

impl Cli {
    /// The sync debounce delay.
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Returns `true` if any table event was requested.
    pub fn has_interaction(&self) -> bool {
        self.sort.is_some()
            || !self.filters.is_empty()
            || self.clear_filters
            || self.join.is_some()
            || self.page.is_some()
            || self.per_page.is_some()
            || !self.hidden.is_empty()
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum JoinArg {
    And,
    Or,
}

impl From<JoinArg> for JoinOperator {
    fn from(arg: JoinArg) -> Self {
        match arg {
            JoinArg::And => JoinOperator::And,
            JoinArg::Or => JoinOperator::Or,
        }
    }
}

fn parse_filter(s: &str) -> Result<ColumnFilter, String> {
    let mut parts = s.splitn(3, ':');
    let id = parts.next().filter(|id| !id.is_empty()).ok_or("missing column id")?;
    let operator: FilterOperator = parts
        .next()
        .ok_or("missing operator")?
        .parse()
        .map_err(|e| format!("{}", e))?;
    let value = match parts.next() {
        Some(raw) => serde_json::from_str(raw).unwrap_or_else(|_| FilterValue::from(raw)),
        None if operator.requires_value() => return Err(format!("operator '{}' needs a value", operator)),
        None => FilterValue::Null,
    };
    Ok(ColumnFilter::with_operator(id, operator, value))
}
