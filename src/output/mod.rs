//! Output formatting for tally.
//!
//! This module provides formatters for displaying tracker data in various
//! formats.

mod json;
mod pretty;

use chrono::NaiveDate;
use serde::Serialize;

use crate::cli::args::OutputFormat;
use crate::error::TallyError;
use crate::tracker::{HistoryEntry, Summary, Task};

pub use json::*;
pub use pretty::*;

/// A task with its tracked total, for listings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRow<'a> {
    /// The task.
    #[serde(flatten)]
    pub task: &'a Task,
    /// Total tracked milliseconds.
    pub total_ms: i64,
    /// Whether this task is running.
    pub active: bool,
}

/// Task rows created on one day.
#[derive(Debug, Clone, Serialize)]
pub struct DayRows<'a> {
    /// Creation day.
    pub day: NaiveDate,
    /// Tasks created that day.
    pub tasks: Vec<TaskRow<'a>>,
}

/// A history entry with its task name resolved.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRow<'a> {
    /// The entry.
    #[serde(flatten)]
    pub entry: &'a HistoryEntry,
    /// Name of the task, if it still exists.
    pub task_name: Option<&'a str>,
    /// Length of the entry in milliseconds.
    pub duration_ms: i64,
}

/// Time tracked on one task today.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayRow<'a> {
    /// Task id.
    pub task_id: &'a str,
    /// Task name, if it still exists.
    pub task_name: Option<&'a str>,
    /// Tracked milliseconds.
    pub total_ms: i64,
}

/// Format a single task.
///
/// # Errors
///
/// Returns `TallyError::Parse` if JSON serialization fails.
pub fn format_task(task: &Task, format: OutputFormat) -> Result<String, TallyError> {
    match format {
        OutputFormat::Pretty => Ok(format_task_pretty(task)),
        OutputFormat::Json => to_json(task),
    }
}

/// Format the task list.
///
/// # Errors
///
/// Returns `TallyError::Parse` if JSON serialization fails.
pub fn format_task_list(days: &[DayRows<'_>], format: OutputFormat) -> Result<String, TallyError> {
    match format {
        OutputFormat::Pretty => Ok(format_task_list_pretty(days)),
        OutputFormat::Json => format_task_list_json(days),
    }
}

/// Format the tracker status.
///
/// # Errors
///
/// Returns `TallyError::Parse` if JSON serialization fails.
pub fn format_status(summary: &Summary, format: OutputFormat) -> Result<String, TallyError> {
    match format {
        OutputFormat::Pretty => Ok(format_status_pretty(summary)),
        OutputFormat::Json => to_json(summary),
    }
}

/// Format history entries.
///
/// # Errors
///
/// Returns `TallyError::Parse` if JSON serialization fails.
pub fn format_history(rows: &[HistoryRow<'_>], format: OutputFormat) -> Result<String, TallyError> {
    match format {
        OutputFormat::Pretty => Ok(format_history_pretty(rows)),
        OutputFormat::Json => format_history_json(rows),
    }
}

/// Format today's totals.
///
/// # Errors
///
/// Returns `TallyError::Parse` if JSON serialization fails.
pub fn format_today(
    total_ms: i64,
    rows: &[TodayRow<'_>],
    format: OutputFormat,
) -> Result<String, TallyError> {
    match format {
        OutputFormat::Pretty => Ok(format_today_pretty(total_ms, rows)),
        OutputFormat::Json => format_today_json(total_ms, rows),
    }
}
