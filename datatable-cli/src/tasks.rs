//! The demo task table.

use chrono::DateTime;
use chrono::TimeDelta;
use chrono::Utc;
use datatable_lib::model::Row;
use datatable_lib::model::Value;
use datatable_lib::store::FilterCounts;
use datatable_lib::table::ColumnDef;
use datatable_lib::table::FilterOption;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Facet domains of the task columns, in display order.
pub const STATUSES: [&str; 4] = ["todo", "in_progress", "done", "canceled"];
pub const PRIORITIES: [&str; 3] = ["low", "medium", "high"];
pub const LABELS: [&str; 4] = ["bug", "feature", "enhancement", "documentation"];

const TITLES: [&str; 10] = [
    "Fix authentication bug",
    "Add dark mode support",
    "Improve performance",
    "Update documentation",
    "Refactor API endpoints",
    "Add unit tests",
    "Fix responsive layout",
    "Implement search feature",
    "Add data export",
    "Optimize database queries",
];

const MAX_AGE_MS: i64 = 30 * 24 * 60 * 60 * 1000;

#[derive(Debug, Clone)]
pub struct Task {
    pub id: String,
    pub code: String,
    pub title: &'static str,
    pub status: &'static str,
    pub priority: &'static str,
    pub label: &'static str,
    pub estimated_hours: u32,
    pub created_at: DateTime<Utc>,
}

impl Row for Task {
    fn value(&self, column_id: &str) -> Value {
        match column_id {
            "id" => Value::from(self.id.as_str()),
            "code" => Value::from(self.code.as_str()),
            "title" => Value::from(self.title),
            "status" => Value::from(self.status),
            "priority" => Value::from(self.priority),
            "label" => Value::from(self.label),
            "estimatedHours" => Value::from(self.estimated_hours),
            "createdAt" => Value::from(self.created_at),
            _ => Value::Null,
        }
    }
}

/// Generates `count` tasks. The same seed and `now` give the same tasks.
pub fn generate_tasks(count: usize, seed: u64, now: DateTime<Utc>) -> Vec<Task> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|i| Task {
            id: format!("task-{}", i + 1),
            code: format!("TASK-{:04}", i + 1),
            title: TITLES[i % TITLES.len()],
            status: STATUSES[rng.random_range(0..STATUSES.len())],
            priority: PRIORITIES[rng.random_range(0..PRIORITIES.len())],
            label: LABELS[rng.random_range(0..LABELS.len())],
            estimated_hours: rng.random_range(1..=40),
            created_at: now - TimeDelta::milliseconds(rng.random_range(0..MAX_AGE_MS)),
        })
        .collect()
}

/// Column definitions, with option counts and the hours range taken from
/// full-store aggregates.
pub fn columns(counts: &FilterCounts) -> Vec<ColumnDef> {
    let categorical = |id: &str, label: &str, domain: &[&str]| {
        let column = ColumnDef::new(id)
            .with_label(label)
            .with_placeholder(format!("Filter {}...", label.to_lowercase()))
            .with_options(domain.iter().map(|v| FilterOption::new(option_label(v), *v)).collect());
        match counts.counts.get(id) {
            Some(counts) => column.with_counts(counts),
            None => column,
        }
    };

    let mut hours = ColumnDef::new("estimatedHours").with_label("Est. Hours").with_unit("h");
    if let Some(Some(range)) = counts.ranges.get("estimatedHours") {
        hours = hours.with_range(range.min, range.max);
    }

    vec![
        ColumnDef::new("code").with_label("Task").with_hiding(false),
        ColumnDef::new("title").with_label("Title").with_placeholder("Search titles..."),
        categorical("status", "Status", &STATUSES),
        categorical("priority", "Priority", &PRIORITIES),
        categorical("label", "Label", &LABELS),
        hours,
        ColumnDef::new("createdAt").with_label("Created"),
    ]
}

/// `in_progress` -> `In Progress`.
fn option_label(value: &str) -> String {
    value
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_generation_is_seeded() {
        let a = generate_tasks(20, 7, now());
        let b = generate_tasks(20, 7, now());
        assert_eq!(a.len(), 20);
        assert!(a.iter().zip(&b).all(|(x, y)| x.status == y.status && x.created_at == y.created_at));
        assert_eq!(a[0].code, "TASK-0001");
        assert_eq!(a[10].title, "Fix authentication bug");
    }

    #[test]
    fn test_generated_values_in_domain() {
        for task in generate_tasks(200, 1, now()) {
            assert!((1..=40).contains(&task.estimated_hours));
            assert!(task.created_at <= now());
            assert!(now() - task.created_at < TimeDelta::days(30));
            assert!(STATUSES.contains(&task.status));
        }
    }

    #[test]
    fn test_option_label() {
        assert_eq!(option_label("in_progress"), "In Progress");
        assert_eq!(option_label("bug"), "Bug");
    }
}
