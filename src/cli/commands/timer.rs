//! Timer commands: start, stop, toggle, status.

use std::io::Write;

use colored::Colorize;
use crossterm::{
    cursor::MoveToColumn,
    execute,
    terminal::{Clear, ClearType},
};
use serde_json::json;

use super::resolve_task;
use crate::cli::args::OutputFormat;
use crate::error::TallyError;
use crate::output::{format_status, to_json};
use crate::storage::KeyValueStore;
use crate::tracker::{format_duration, Clock, HistoryEntry, Summary, TaskStore};

/// Start timing a task.
///
/// # Errors
///
/// Returns an error if the task cannot be resolved or the store cannot be
/// written.
pub fn start<K: KeyValueStore, C: Clock>(
    store: &mut TaskStore<K, C>,
    reference: &str,
    format: OutputFormat,
) -> Result<String, TallyError> {
    let task = resolve_task(store, reference)?.clone();
    let history_before = store.history().len();

    store.start_task(&task.id)?;

    let switched_from = store
        .history()
        .get(history_before..)
        .and_then(<[HistoryEntry]>::first)
        .cloned();

    match format {
        OutputFormat::Json => to_json(&json!({
            "task": task,
            "active": store.active(),
            "stopped": switched_from,
        })),
        OutputFormat::Pretty => {
            let mut output = Vec::new();
            if let Some(entry) = &switched_from {
                let name = store
                    .task(&entry.task_id)
                    .map_or("previous task", |t| t.name.as_str());
                output.push(format!(
                    "Stopped {} after {}",
                    name,
                    format_duration(entry.duration())
                ));
            }
            output.push(format!("Tracking on {}", task.name.green().bold()));
            Ok(output.join("\n"))
        },
    }
}

/// Stop the running timer.
///
/// # Errors
///
/// Returns an error if the store cannot be written.
pub fn stop<K: KeyValueStore, C: Clock>(
    store: &mut TaskStore<K, C>,
    format: OutputFormat,
) -> Result<String, TallyError> {
    let entry = store.stop_task()?;
    describe_stop(store, entry.as_ref(), format)
}

/// Start a task, or stop it if it is the one running.
///
/// # Errors
///
/// Returns an error if the task cannot be resolved or the store cannot be
/// written.
pub fn toggle<K: KeyValueStore, C: Clock>(
    store: &mut TaskStore<K, C>,
    reference: &str,
    format: OutputFormat,
) -> Result<String, TallyError> {
    let task_id = resolve_task(store, reference)?.id.clone();

    if store.active().is_some_and(|a| a.task_id == task_id) {
        stop(store, format)
    } else {
        start(store, &task_id, format)
    }
}

/// Show the running timer.
///
/// # Errors
///
/// Returns an error if output formatting fails.
pub fn status<K: KeyValueStore, C: Clock>(
    store: &TaskStore<K, C>,
    format: OutputFormat,
) -> Result<String, TallyError> {
    let summary = Summary::from_snapshot(store.snapshot(), store.now());
    format_status(&summary, format)
}

/// Redraw the running timer on one line every `interval` until interrupted.
///
/// # Errors
///
/// Returns an error if the store cannot be read or the terminal cannot be
/// written.
pub fn watch_status<K: KeyValueStore, C: Clock>(
    store: &mut TaskStore<K, C>,
    interval: std::time::Duration,
) -> Result<(), TallyError> {
    let mut stdout = std::io::stdout();

    loop {
        let line = watch_line(store)?;

        execute!(stdout, MoveToColumn(0), Clear(ClearType::CurrentLine))?;
        write!(stdout, "{line}")?;
        stdout.flush()?;

        std::thread::sleep(interval);
    }
}

/// Re-read storage and render one frame of the watch line.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn watch_line<K: KeyValueStore, C: Clock>(
    store: &mut TaskStore<K, C>,
) -> Result<String, TallyError> {
    store.reload()?;
    let summary = Summary::from_snapshot(store.snapshot(), store.now());
    Ok(match &summary.active {
        Some(active) => format!(
            "{}  {}",
            crate::tracker::FormattedTime::from_millis(active.elapsed_ms)
                .to_string()
                .bold(),
            active.task_name.as_deref().unwrap_or("(deleted task)").green()
        ),
        None => format!("{}  {}", "00:00:00".dimmed(), "No active task."),
    })
}

fn describe_stop<K: KeyValueStore, C: Clock>(
    store: &TaskStore<K, C>,
    entry: Option<&HistoryEntry>,
    format: OutputFormat,
) -> Result<String, TallyError> {
    match format {
        OutputFormat::Json => to_json(&json!({ "stopped": entry })),
        OutputFormat::Pretty => Ok(match entry {
            Some(entry) => {
                let name = store
                    .task(&entry.task_id)
                    .map_or("(deleted task)", |t| t.name.as_str());
                format!(
                    "{} {}\n   Duration: {}",
                    "Stopped:".yellow(),
                    name,
                    format_duration(entry.duration())
                )
            },
            None => "No active task.".to_string(),
        }),
    }
}
