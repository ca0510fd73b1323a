//! Tracker data model.
//!
//! Field names serialize in camelCase so the persisted slots keep the
//! `taskId` / `startedAt` / `createdAt` layout.

use chrono::{DateTime, Duration, Local, Utc};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use uuid::Uuid;

/// A named task that time can be tracked against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Opaque unique identifier, never reassigned.
    pub id: String,
    /// Display name.
    pub name: String,
    /// When the task was created.
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Create a task with a fresh random id.
    #[must_use]
    pub fn new(name: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            created_at,
        }
    }

    /// Creation time in the local timezone.
    #[must_use]
    pub fn created_at_local(&self) -> DateTime<Local> {
        self.created_at.with_timezone(&Local)
    }

    /// First eight characters of the id, for display.
    #[must_use]
    pub fn short_id(&self) -> &str {
        self.id.get(..8).unwrap_or(&self.id)
    }
}

/// A rename request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskUpdate {
    /// Id of the task to rename.
    pub id: String,
    /// New name.
    pub name: String,
}

/// The running timer, bound to one task.
///
/// Persists as `{ taskId, startedAt, stoppedAt: null }`. The `stoppedAt`
/// field is always null while the session runs and is ignored on load.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveSession {
    /// Task being timed.
    pub task_id: String,
    /// When timing started.
    pub started_at: DateTime<Utc>,
}

impl ActiveSession {
    /// Start a session for `task_id` at `started_at`.
    #[must_use]
    pub fn new(task_id: impl Into<String>, started_at: DateTime<Utc>) -> Self {
        Self {
            task_id: task_id.into(),
            started_at,
        }
    }

    /// Time elapsed at `now`, never negative.
    #[must_use]
    pub fn elapsed(&self, now: DateTime<Utc>) -> Duration {
        (now - self.started_at).max(Duration::zero())
    }

    /// Close the session at `now`.
    ///
    /// A clock that went backwards closes the entry at its start time, so the
    /// entry never has a negative duration.
    #[must_use]
    pub fn close(self, now: DateTime<Utc>) -> HistoryEntry {
        let stopped_at = now.max(self.started_at);
        HistoryEntry {
            task_id: self.task_id,
            started_at: self.started_at,
            stopped_at,
        }
    }
}

impl Serialize for ActiveSession {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ActiveSession", 3)?;
        state.serialize_field("taskId", &self.task_id)?;
        state.serialize_field("startedAt", &self.started_at)?;
        state.serialize_field("stoppedAt", &Option::<DateTime<Utc>>::None)?;
        state.end()
    }
}

/// A completed, immutable tracked interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Task the time is attributed to.
    pub task_id: String,
    /// When timing started.
    pub started_at: DateTime<Utc>,
    /// When timing stopped.
    pub stopped_at: DateTime<Utc>,
}

impl HistoryEntry {
    /// Length of the interval.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.stopped_at - self.started_at
    }

    /// Whether the interval is well-formed (`stopped_at >= started_at`).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.stopped_at >= self.started_at
    }

    /// Start time in the local timezone.
    #[must_use]
    pub fn started_at_local(&self) -> DateTime<Local> {
        self.started_at.with_timezone(&Local)
    }
}

/// Whether a timer is currently running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackerState {
    /// No active session.
    Idle,
    /// A session is running.
    Tracking,
}

impl std::fmt::Display for TrackerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Tracking => write!(f, "Tracking"),
        }
    }
}
