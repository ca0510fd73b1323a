use colored::Colorize;

use super::{DayRows, HistoryRow, TodayRow};
use crate::tracker::{FormattedTime, Summary, Task};

/// Format a single task as pretty output
pub fn format_task_pretty(task: &Task) -> String {
    let mut output = format!("{}\n", task.name.bold());
    output.push_str(&format!("  {}: {}\n", "ID".dimmed(), task.id));
    output.push_str(&format!(
        "  {}: {}\n",
        "Created".dimmed(),
        task.created_at_local().format("%Y-%m-%d %H:%M")
    ));
    output
}

/// Format the grouped task list as pretty output
pub fn format_task_list_pretty(days: &[DayRows<'_>]) -> String {
    let count: usize = days.iter().map(|d| d.tasks.len()).sum();
    if count == 0 {
        return "Tasks (0)\n  No tasks".to_string();
    }

    let mut output = format!("Tasks ({count})\n");

    for day in days.iter().filter(|d| !d.tasks.is_empty()) {
        output.push_str(&"─".repeat(60));
        output.push('\n');
        output.push_str(&format!("{}\n", day.day.format("%d %B %Y").to_string().cyan()));

        for row in &day.tasks {
            let time = FormattedTime::from_millis(row.total_ms).to_string();
            let marker = if row.active {
                "▶".green()
            } else {
                " ".normal()
            };
            let name = if row.active {
                row.task.name.bold().green()
            } else {
                row.task.name.bold()
            };

            output.push_str(&format!(
                "{marker} {}  {}  {}\n",
                time,
                name,
                row.task.short_id().dimmed()
            ));
        }
    }

    output
}

/// Format the tracker status as pretty output
pub fn format_status_pretty(summary: &Summary) -> String {
    let mut output = Vec::new();

    match &summary.active {
        Some(active) => {
            output.push(FormattedTime::from_millis(active.elapsed_ms).to_string().bold().to_string());
            let name = active.task_name.as_deref().unwrap_or("(deleted task)");
            output.push(format!("Tracking on {}", name.green()));
            output.push(format!(
                "{} {}",
                "Started".dimmed(),
                active
                    .started_at
                    .with_timezone(&chrono::Local)
                    .format("%H:%M:%S")
            ));
        },
        None => {
            output.push("00:00:00".dimmed().to_string());
            output.push("No active task.".to_string());
        },
    }

    output.push(String::new());
    output.push(format!(
        "{}: {}",
        "Total time today".dimmed(),
        FormattedTime::from_millis(summary.today_ms)
    ));

    output.join("\n")
}

/// Format history entries as pretty output
pub fn format_history_pretty(rows: &[HistoryRow<'_>]) -> String {
    if rows.is_empty() {
        return "History (0)\n  No entries".to_string();
    }

    let mut output = format!("History ({})\n", rows.len());
    output.push_str(&format!(
        "{:<12} {:<8} {:<8} {:>8}  {}\n",
        "Date", "Start", "Stop", "Time", "Task"
    ));
    output.push_str(&"─".repeat(60));
    output.push('\n');

    for row in rows {
        let start = row.entry.started_at_local();
        let stop = row.entry.stopped_at.with_timezone(&chrono::Local);
        let name = row
            .task_name
            .map_or_else(|| "(deleted task)".dimmed().to_string(), ToString::to_string);

        output.push_str(&format!(
            "{:<12} {:<8} {:<8} {:>8}  {}\n",
            start.format("%Y-%m-%d"),
            start.format("%H:%M:%S"),
            stop.format("%H:%M:%S"),
            FormattedTime::from_millis(row.duration_ms).to_string(),
            name
        ));
    }

    output
}

/// Format today's totals as pretty output
pub fn format_today_pretty(total_ms: i64, rows: &[TodayRow<'_>]) -> String {
    let mut output = format!(
        "{}: {}\n",
        "Total time today".bold(),
        FormattedTime::from_millis(total_ms)
    );

    if rows.is_empty() {
        output.push_str("  Nothing tracked yet today");
        return output;
    }

    output.push_str(&"─".repeat(60));
    output.push('\n');

    for row in rows {
        output.push_str(&format!(
            "  {}  {}\n",
            FormattedTime::from_millis(row.total_ms),
            row.task_name.unwrap_or("(deleted task)")
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::TaskRow;
    use crate::tracker::views::ActiveSummary;
    use crate::tracker::TrackerState;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn sample_task() -> Task {
        Task {
            id: "0123456789abcdef".to_string(),
            name: "Write report".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 6, 15, 9, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_format_task_pretty() {
        let output = format_task_pretty(&sample_task());
        assert!(output.contains("Write report"));
        assert!(output.contains("0123456789abcdef"));
    }

    #[test]
    fn test_task_list_empty() {
        assert!(format_task_list_pretty(&[]).contains("No tasks"));
    }

    #[test]
    fn test_task_list_shows_totals() {
        let task = sample_task();
        let days = vec![DayRows {
            day: NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
            tasks: vec![TaskRow {
                task: &task,
                total_ms: 3_723_000,
                active: false,
            }],
        }];

        let output = format_task_list_pretty(&days);

        assert!(output.contains("Tasks (1)"));
        assert!(output.contains("15 June 2024"));
        assert!(output.contains("01:02:03"));
        assert!(output.contains("Write report"));
        assert!(output.contains("01234567"));
    }

    #[test]
    fn test_status_idle() {
        let summary = Summary {
            state: TrackerState::Idle,
            task_count: 0,
            active: None,
            today_ms: 5000,
            total_ms: 5000,
        };

        let output = format_status_pretty(&summary);

        assert!(output.contains("No active task."));
        assert!(output.contains("00:00:05"));
    }

    #[test]
    fn test_status_tracking() {
        let summary = Summary {
            state: TrackerState::Tracking,
            task_count: 1,
            active: Some(ActiveSummary {
                task_id: "a".to_string(),
                task_name: Some("Write report".to_string()),
                started_at: Utc::now(),
                elapsed_ms: 5000,
            }),
            today_ms: 0,
            total_ms: 0,
        };

        let output = format_status_pretty(&summary);

        assert!(output.contains("00:00:05"));
        assert!(output.contains("Tracking on"));
        assert!(output.contains("Write report"));
    }

    #[test]
    fn test_today_empty() {
        let output = format_today_pretty(0, &[]);
        assert!(output.contains("00:00:00"));
        assert!(output.contains("Nothing tracked yet today"));
    }

    #[test]
    fn test_history_empty() {
        assert!(format_history_pretty(&[]).contains("No entries"));
    }
}
