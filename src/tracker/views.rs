//! Derived, read-only views over tracker state.
//!
//! Nothing here is stored; every view is recomputed from a snapshot.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Local, NaiveDate, Utc};
use serde::Serialize;

use super::model::{ActiveSession, HistoryEntry, Task, TrackerState};
use super::store::Snapshot;

/// Local calendar day a timestamp falls on.
#[must_use]
pub fn day_key(ts: DateTime<Utc>) -> NaiveDate {
    ts.with_timezone(&Local).date_naive()
}

/// Time elapsed on the running session at `now`.
#[must_use]
pub fn active_elapsed(active: Option<&ActiveSession>, now: DateTime<Utc>) -> Duration {
    active.map_or_else(Duration::zero, |a| a.elapsed(now))
}

/// Total tracked time per task id.
#[must_use]
pub fn total_by_task(history: &[HistoryEntry]) -> HashMap<String, Duration> {
    let mut totals: HashMap<String, Duration> = HashMap::new();
    for entry in history {
        *totals.entry(entry.task_id.clone()).or_insert_with(Duration::zero) += entry.duration();
    }
    totals
}

/// Total tracked time for one task.
#[must_use]
pub fn task_total(history: &[HistoryEntry], task_id: &str) -> Duration {
    history
        .iter()
        .filter(|h| h.task_id == task_id)
        .fold(Duration::zero(), |acc, h| acc + h.duration())
}

/// Tracked time per task for entries that started on `day`.
#[must_use]
pub fn totals_on_day(history: &[HistoryEntry], day: NaiveDate) -> HashMap<String, Duration> {
    let on_day: Vec<HistoryEntry> = history
        .iter()
        .filter(|h| day_key(h.started_at) == day)
        .cloned()
        .collect();
    total_by_task(&on_day)
}

/// Tracked time for entries that started on `day`.
#[must_use]
pub fn total_on_day(history: &[HistoryEntry], day: NaiveDate) -> Duration {
    history
        .iter()
        .filter(|h| day_key(h.started_at) == day)
        .fold(Duration::zero(), |acc, h| acc + h.duration())
}

/// Tracked time for entries that started on the same local day as `now`.
#[must_use]
pub fn today_total(history: &[HistoryEntry], now: DateTime<Utc>) -> Duration {
    total_on_day(history, day_key(now))
}

/// Whether a task name contains `query`, ignoring case.
#[must_use]
pub fn matches_search(task: &Task, query: &str) -> bool {
    task.name.to_lowercase().contains(&query.to_lowercase())
}

/// Tasks created on the same local day.
#[derive(Debug, Clone, Serialize)]
pub struct DayGroup<'a> {
    /// The creation day.
    pub day: NaiveDate,
    /// Tasks created that day, in list order.
    pub tasks: Vec<&'a Task>,
}

/// Group tasks by creation day.
///
/// Groups appear in the order their first task appears.
#[must_use]
pub fn group_by_created_day<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Vec<DayGroup<'a>> {
    let mut groups: Vec<DayGroup<'a>> = Vec::new();

    for task in tasks {
        let day = day_key(task.created_at);
        match groups.iter_mut().find(|g| g.day == day) {
            Some(group) => group.tasks.push(task),
            None => groups.push(DayGroup {
                day,
                tasks: vec![task],
            }),
        }
    }

    groups
}

/// The running session, resolved for display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveSummary {
    /// Task being timed.
    pub task_id: String,
    /// Its name, if the task still exists.
    pub task_name: Option<String>,
    /// When timing started.
    pub started_at: DateTime<Utc>,
    /// Elapsed milliseconds.
    pub elapsed_ms: i64,
}

/// Headline numbers for the whole tracker.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// Whether a timer is running.
    pub state: TrackerState,
    /// Number of tasks.
    pub task_count: usize,
    /// Running session, if any.
    pub active: Option<ActiveSummary>,
    /// Milliseconds tracked today (completed entries only).
    pub today_ms: i64,
    /// Milliseconds tracked overall (completed entries only).
    pub total_ms: i64,
}

impl Summary {
    /// Compute the summary at `now`.
    #[must_use]
    pub fn from_snapshot(snapshot: &Snapshot, now: DateTime<Utc>) -> Self {
        let active = snapshot.active.as_ref().map(|a| ActiveSummary {
            task_id: a.task_id.clone(),
            task_name: snapshot
                .tasks
                .iter()
                .find(|t| t.id == a.task_id)
                .map(|t| t.name.clone()),
            started_at: a.started_at,
            elapsed_ms: a.elapsed(now).num_milliseconds(),
        });

        let total = snapshot
            .history
            .iter()
            .fold(Duration::zero(), |acc, h| acc + h.duration());

        Self {
            state: if active.is_some() {
                TrackerState::Tracking
            } else {
                TrackerState::Idle
            },
            task_count: snapshot.tasks.len(),
            active,
            today_ms: today_total(&snapshot.history, now).num_milliseconds(),
            total_ms: total.num_milliseconds(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    /// Noon local time on the given day, as UTC.
    fn local_noon(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Local
            .with_ymd_and_hms(y, m, d, 12, 0, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    fn entry(task_id: &str, start: DateTime<Utc>, secs: i64) -> HistoryEntry {
        HistoryEntry {
            task_id: task_id.to_string(),
            started_at: start,
            stopped_at: start + Duration::seconds(secs),
        }
    }

    fn task(id: &str, name: &str, created_at: DateTime<Utc>) -> Task {
        Task {
            id: id.to_string(),
            name: name.to_string(),
            created_at,
        }
    }

    #[test]
    fn test_day_key_uses_local_day() {
        let noon = local_noon(2024, 6, 15);
        assert_eq!(day_key(noon), NaiveDate::from_ymd_opt(2024, 6, 15).unwrap());
    }

    #[test]
    fn test_active_elapsed() {
        let start = local_noon(2024, 6, 15);
        let session = ActiveSession::new("a", start);

        assert_eq!(
            active_elapsed(Some(&session), start + Duration::seconds(5)),
            Duration::seconds(5)
        );
        assert_eq!(active_elapsed(None, start), Duration::zero());
    }

    #[test]
    fn test_total_by_task() {
        let day = local_noon(2024, 6, 15);
        let history = vec![entry("a", day, 10), entry("b", day, 20), entry("a", day, 5)];

        let totals = total_by_task(&history);

        assert_eq!(totals["a"], Duration::seconds(15));
        assert_eq!(totals["b"], Duration::seconds(20));
        assert_eq!(task_total(&history, "a"), Duration::seconds(15));
        assert_eq!(task_total(&history, "missing"), Duration::zero());
    }

    #[test]
    fn test_today_is_calendar_day_not_rolling_window() {
        let today = local_noon(2024, 6, 15);
        let yesterday = local_noon(2024, 6, 14);
        let history = vec![entry("a", today, 60), entry("a", yesterday, 600)];

        // Yesterday noon is within 24h of today's evening, but not the same day
        let evening = today + Duration::hours(6);
        assert_eq!(today_total(&history, evening), Duration::seconds(60));
    }

    #[test]
    fn test_totals_on_day() {
        let today = local_noon(2024, 6, 15);
        let yesterday = local_noon(2024, 6, 14);
        let history = vec![
            entry("a", today, 60),
            entry("b", today, 30),
            entry("a", yesterday, 600),
        ];

        let totals = totals_on_day(&history, day_key(today));

        assert_eq!(totals["a"], Duration::seconds(60));
        assert_eq!(totals["b"], Duration::seconds(30));
    }

    #[test]
    fn test_group_by_created_day() {
        let d1 = local_noon(2024, 6, 14);
        let d2 = local_noon(2024, 6, 15);
        let tasks = vec![
            task("1", "one", d1),
            task("2", "two", d2),
            task("3", "three", d1 + Duration::hours(1)),
        ];

        let groups = group_by_created_day(&tasks);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].day, day_key(d1));
        assert_eq!(
            groups[0].tasks.iter().map(|t| t.id.as_str()).collect::<Vec<_>>(),
            vec!["1", "3"]
        );
        assert_eq!(groups[1].tasks[0].id, "2");
    }

    #[test]
    fn test_search() {
        let t = task("1", "Write Report", local_noon(2024, 6, 15));

        assert!(matches_search(&t, "report"));
        assert!(matches_search(&t, "WRITE"));
        assert!(matches_search(&t, ""));
        assert!(!matches_search(&t, "email"));
    }

    #[test]
    fn test_summary() {
        let now = local_noon(2024, 6, 15);
        let snapshot = Snapshot {
            tasks: vec![task("a", "A", now)],
            active: Some(ActiveSession::new("a", now - Duration::seconds(5))),
            history: vec![
                entry("a", now - Duration::hours(1), 60),
                entry("a", local_noon(2024, 6, 10), 120),
            ],
        };

        let summary = Summary::from_snapshot(&snapshot, now);

        assert_eq!(summary.state, TrackerState::Tracking);
        assert_eq!(summary.task_count, 1);
        assert_eq!(summary.today_ms, 60_000);
        assert_eq!(summary.total_ms, 180_000);
        let active = summary.active.unwrap();
        assert_eq!(active.task_name.as_deref(), Some("A"));
        assert_eq!(active.elapsed_ms, 5000);
    }
}
