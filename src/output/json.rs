//! JSON output formatting for tally.

use serde::Serialize;
use serde_json::json;

use super::{DayRows, HistoryRow, TodayRow};
use crate::error::TallyError;

/// Format the grouped task list as JSON
///
/// # Errors
///
/// Returns `TallyError::Parse` if JSON serialization fails.
pub fn format_task_list_json(days: &[DayRows<'_>]) -> Result<String, TallyError> {
    let count: usize = days.iter().map(|d| d.tasks.len()).sum();
    let output = json!({
        "count": count,
        "days": days
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format history entries as JSON
///
/// # Errors
///
/// Returns `TallyError::Parse` if JSON serialization fails.
pub fn format_history_json(rows: &[HistoryRow<'_>]) -> Result<String, TallyError> {
    let output = json!({
        "count": rows.len(),
        "items": rows
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format today's totals as JSON
///
/// # Errors
///
/// Returns `TallyError::Parse` if JSON serialization fails.
pub fn format_today_json(total_ms: i64, rows: &[TodayRow<'_>]) -> Result<String, TallyError> {
    let output = json!({
        "totalMs": total_ms,
        "tasks": rows
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Generic JSON formatter for any serializable type
///
/// # Errors
///
/// Returns `TallyError::Parse` if JSON serialization fails.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, TallyError> {
    Ok(serde_json::to_string_pretty(value)?)
}
