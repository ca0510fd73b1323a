//! Task management commands: add, list, rename, delete.

use chrono::Duration;
use colored::Colorize;
use serde_json::json;

use super::{resolve_task, task_name};
use crate::cli::args::OutputFormat;
use crate::error::TallyError;
use crate::output::{format_task, format_task_list, to_json, DayRows, TaskRow};
use crate::storage::KeyValueStore;
use crate::tracker::{views, Clock, TaskStore, TaskUpdate};

/// Create a task, optionally starting it.
///
/// # Errors
///
/// Returns an error if the name is empty or the store cannot be written.
pub fn add<K: KeyValueStore, C: Clock>(
    store: &mut TaskStore<K, C>,
    words: &[String],
    start: bool,
    format: OutputFormat,
) -> Result<String, TallyError> {
    let name = task_name(words)?;
    let task = store.add_task(&name)?;

    if start {
        store.start_task(&task.id)?;
    }

    match format {
        OutputFormat::Json => to_json(&task),
        OutputFormat::Pretty => {
            let mut output = format!("{} {}", "Added:".green(), format_task(&task, format)?);
            if start {
                output.push_str(&format!("Tracking on {}", task.name.green()));
            }
            Ok(output.trim_end().to_string())
        },
    }
}

/// List tasks grouped by creation day, with totals.
///
/// # Errors
///
/// Returns an error if output formatting fails.
pub fn list<K: KeyValueStore, C: Clock>(
    store: &TaskStore<K, C>,
    search: Option<&str>,
    format: OutputFormat,
) -> Result<String, TallyError> {
    let totals = views::total_by_task(store.history());
    let active_id = store.active().map(|a| a.task_id.as_str());
    let query = search.unwrap_or_default();

    let groups = views::group_by_created_day(
        store
            .tasks()
            .iter()
            .filter(|t| views::matches_search(t, query)),
    );

    let days: Vec<DayRows<'_>> = groups
        .into_iter()
        .map(|group| DayRows {
            day: group.day,
            tasks: group
                .tasks
                .into_iter()
                .map(|task| TaskRow {
                    task,
                    total_ms: totals.get(&task.id).map_or(0, Duration::num_milliseconds),
                    active: active_id == Some(task.id.as_str()),
                })
                .collect(),
        })
        .collect();

    format_task_list(&days, format)
}

/// Rename a task.
///
/// # Errors
///
/// Returns an error if the task cannot be resolved, the new name is empty
/// or unchanged, or the store cannot be written.
pub fn rename<K: KeyValueStore, C: Clock>(
    store: &mut TaskStore<K, C>,
    reference: &str,
    words: &[String],
    format: OutputFormat,
) -> Result<String, TallyError> {
    let name = task_name(words)?;
    let task = resolve_task(store, reference)?.clone();

    if task.name == name {
        return Err(TallyError::InvalidInput(format!(
            "Task is already named \"{name}\""
        )));
    }

    store.update_task(TaskUpdate {
        id: task.id.clone(),
        name,
    })?;

    let updated = store
        .task(&task.id)
        .ok_or_else(|| TallyError::task_not_found(&task.id))?;

    match format {
        OutputFormat::Json => to_json(updated),
        OutputFormat::Pretty => Ok(format!(
            "{} {} → {}",
            "Renamed:".green(),
            task.name,
            updated.name.bold()
        )),
    }
}

/// Delete a task and all of its tracked time.
///
/// # Errors
///
/// Returns an error if the task cannot be resolved, `force` is not set, or
/// the store cannot be written.
pub fn delete<K: KeyValueStore, C: Clock>(
    store: &mut TaskStore<K, C>,
    reference: &str,
    force: bool,
    format: OutputFormat,
) -> Result<String, TallyError> {
    let task = resolve_task(store, reference)?.clone();

    if !force {
        return Err(TallyError::InvalidInput(format!(
            "This will delete \"{}\" and all of its tracked time.\nUse --force to confirm.",
            task.name
        )));
    }

    let was_active = store.active().is_some_and(|a| a.task_id == task.id);
    store.delete_task(&task.id)?;

    match format {
        OutputFormat::Json => to_json(&json!({
            "deleted": task,
            "stoppedTracking": was_active
        })),
        OutputFormat::Pretty => {
            let mut output = format!("{} {}", "Deleted:".red(), task.name);
            if was_active {
                output.push_str("\n   Tracking stopped.");
            }
            Ok(output)
        },
    }
}
