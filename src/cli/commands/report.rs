//! Reporting commands: history and today.

use chrono::Duration;

use super::resolve_task;
use crate::cli::args::OutputFormat;
use crate::error::TallyError;
use crate::output::{format_history, format_today, HistoryRow, TodayRow};
use crate::storage::KeyValueStore;
use crate::tracker::{views, Clock, TaskStore};

/// Show completed entries, newest first.
///
/// # Errors
///
/// Returns an error if the task filter cannot be resolved or output
/// formatting fails.
pub fn history<K: KeyValueStore, C: Clock>(
    store: &TaskStore<K, C>,
    task: Option<&str>,
    limit: usize,
    format: OutputFormat,
) -> Result<String, TallyError> {
    let filter_id = task
        .map(|reference| resolve_task(store, reference).map(|t| t.id.as_str()))
        .transpose()?;

    let rows: Vec<HistoryRow<'_>> = store
        .history()
        .iter()
        .rev()
        .filter(|entry| filter_id.map_or(true, |id| entry.task_id == id))
        .take(limit)
        .map(|entry| HistoryRow {
            entry,
            task_name: store.task(&entry.task_id).map(|t| t.name.as_str()),
            duration_ms: entry.duration().num_milliseconds(),
        })
        .collect();

    format_history(&rows, format)
}

/// Show time tracked per task today.
///
/// Only completed entries count. Tasks appear in list order.
///
/// # Errors
///
/// Returns an error if output formatting fails.
pub fn today<K: KeyValueStore, C: Clock>(
    store: &TaskStore<K, C>,
    format: OutputFormat,
) -> Result<String, TallyError> {
    let now = store.now();
    let totals = views::totals_on_day(store.history(), views::day_key(now));

    let mut rows: Vec<TodayRow<'_>> = store
        .tasks()
        .iter()
        .filter_map(|task| {
            totals.get(&task.id).map(|total| TodayRow {
                task_id: task.id.as_str(),
                task_name: Some(task.name.as_str()),
                total_ms: total.num_milliseconds(),
            })
        })
        .collect();

    // Time left behind by entries whose task no longer resolves
    let known: usize = rows.len();
    if known < totals.len() {
        let orphaned = totals
            .iter()
            .filter(|(id, _)| store.task(id).is_none())
            .fold(Duration::zero(), |acc, (_, d)| acc + *d);
        rows.push(TodayRow {
            task_id: "",
            task_name: None,
            total_ms: orphaned.num_milliseconds(),
        });
    }

    let total = views::today_total(store.history(), now);
    format_today(total.num_milliseconds(), &rows, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::test_support::store;

    #[test]
    fn test_history_newest_first_with_limit() {
        let mut store = store();
        let a = store.add_task("A").unwrap();
        let b = store.add_task("B").unwrap();

        store.start_task(&a.id).unwrap();
        store.clock().advance(Duration::seconds(10));
        store.start_task(&b.id).unwrap();
        store.clock().advance(Duration::seconds(20));
        store.stop_task().unwrap();

        let output = history(&store, None, 1, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["count"], 1);
        assert_eq!(value["items"][0]["taskName"], "B");
        assert_eq!(value["items"][0]["durationMs"], 20_000);
    }

    #[test]
    fn test_history_filtered_by_task() {
        let mut store = store();
        let a = store.add_task("A").unwrap();
        let b = store.add_task("B").unwrap();

        store.start_task(&a.id).unwrap();
        store.start_task(&b.id).unwrap();
        store.start_task(&a.id).unwrap();
        store.stop_task().unwrap();

        let output = history(&store, Some("a"), 20, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["count"], 2);
        assert!(history(&store, Some("missing"), 20, OutputFormat::Json)
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_history_empty() {
        let store = store();
        let output = history(&store, None, 20, OutputFormat::Pretty).unwrap();
        assert!(output.contains("No entries"));
    }

    #[test]
    fn test_today_totals() {
        let mut store = store();
        let a = store.add_task("A").unwrap();

        store.start_task(&a.id).unwrap();
        store.clock().advance(Duration::seconds(90));
        store.stop_task().unwrap();

        let output = today(&store, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["totalMs"], 90_000);
        assert_eq!(value["tasks"][0]["taskName"], "A");
        assert_eq!(value["tasks"][0]["totalMs"], 90_000);
    }

    #[test]
    fn test_today_ignores_running_session() {
        let mut store = store();
        let a = store.add_task("A").unwrap();
        store.start_task(&a.id).unwrap();
        store.clock().advance(Duration::seconds(30));

        let output = today(&store, OutputFormat::Pretty).unwrap();
        assert!(output.contains("Nothing tracked yet today"));
    }
}
