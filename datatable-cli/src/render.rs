//! Plain-text rendering of a loaded page.

use datatable_lib::store::LoadResponse;
use datatable_lib::table::ColumnDef;
use datatable_lib::table::TableOptions;

use crate::tasks::Task;

/// Prints the rows of a page with the visible columns.
pub fn print_page(options: &TableOptions<Task>, total: usize) {
    let columns: Vec<&ColumnDef> = options.visible_columns().collect();

    let header: Vec<String> = columns.iter().map(|c| pad(c.display_label(), width(&c.id))).collect();
    println!("{}", header.join("  ").trim_end());
    for task in options.data.iter() {
        let cells: Vec<String> = columns.iter().map(|c| pad(&cell(task, &c.id), width(&c.id))).collect();
        println!("{}", cells.join("  ").trim_end());
    }

    let page = options.state.pagination.page();
    println!(
        "Page {} of {} ({} matching, {} per page)",
        page,
        options.page_count.max(1),
        total,
        options.state.pagination.page_size
    );
}

/// Prints full-store option counts and ranges next to each filterable column.
pub fn print_facets(columns: &[ColumnDef]) {
    for column in columns {
        if !column.options.is_empty() {
            let options: Vec<String> = column
                .options
                .iter()
                .map(|o| format!("{} {}", o.label, o.count.unwrap_or(0)))
                .collect();
            println!("{}: {}", column.display_label(), options.join(", "));
        }
        if let Some((min, max)) = column.range {
            println!("{}: {}-{}{}", column.display_label(), min, max, column.unit.as_deref().unwrap_or(""));
        }
    }
}

/// One-line summary of a load, for the log.
pub fn describe(response: &LoadResponse<Task>) -> String {
    format!(
        "{} rows of {} on page {}/{}",
        response.rows.len(),
        response.total,
        response.state.page,
        response.page_count
    )
}

fn cell(task: &Task, column: &str) -> String {
    match column {
        "code" => task.code.clone(),
        "title" => task.title.to_string(),
        "status" => task.status.to_string(),
        "priority" => task.priority.to_string(),
        "label" => task.label.to_string(),
        "estimatedHours" => format!("{}h", task.estimated_hours),
        "createdAt" => task.created_at.format("%Y-%m-%d").to_string(),
        _ => String::new(),
    }
}

fn width(column: &str) -> usize {
    match column {
        "code" => 9,
        "title" => 26,
        "status" | "priority" | "label" => 13,
        "estimatedHours" => 10,
        _ => 10,
    }
}

fn pad(s: &str, width: usize) -> String {
    format!("{:<width$}", s, width = width)
}
