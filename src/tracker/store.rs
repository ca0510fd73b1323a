//! The task session store.
//!
//! Holds the authoritative in-memory tracker state and mirrors it into three
//! key-value slots. Every mutation builds the complete next state first,
//! writes the affected slots in one batch, and only then replaces the state
//! in memory. A failed write leaves the store unchanged.

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::clock::{Clock, SystemClock};
use super::model::{ActiveSession, HistoryEntry, Task, TaskUpdate, TrackerState};
use crate::error::TallyError;
use crate::storage::{KeyValueStore, SlotWrite};

/// Slot holding the task list.
pub const TASKS_KEY: &str = "tasks";
/// Slot holding the active session (or `null`).
pub const ACTIVE_KEY: &str = "activeTask";
/// Slot holding completed history entries.
pub const HISTORY_KEY: &str = "taskHistory";

/// A complete copy of the tracker state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    /// All tasks, in creation order.
    pub tasks: Vec<Task>,
    /// The running session, if any.
    pub active: Option<ActiveSession>,
    /// Completed intervals, in the order they were closed.
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Tasks,
    Active,
    History,
}

/// The task session store.
pub struct TaskStore<K, C = SystemClock> {
    kv: K,
    clock: C,
    state: Snapshot,
}

impl<K: KeyValueStore, C: Clock> TaskStore<K, C> {
    /// Load the store from its durable mirror.
    ///
    /// Missing or malformed slots load as empty. Entries that break the
    /// store's invariants are dropped with a warning.
    ///
    /// # Errors
    ///
    /// Returns an error only if the backend itself cannot be read.
    pub fn open(kv: K, clock: C) -> Result<Self, TallyError> {
        let state = load(&kv)?;
        debug!(
            tasks = state.tasks.len(),
            history = state.history.len(),
            tracking = state.active.is_some(),
            "loaded tracker state"
        );
        Ok(Self { kv, clock, state })
    }

    /// All tasks, in creation order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.state.tasks
    }

    /// The running session, if any.
    #[must_use]
    pub const fn active(&self) -> Option<&ActiveSession> {
        self.state.active.as_ref()
    }

    /// Completed intervals, oldest first.
    #[must_use]
    pub fn history(&self) -> &[HistoryEntry] {
        &self.state.history
    }

    /// The whole state.
    #[must_use]
    pub const fn snapshot(&self) -> &Snapshot {
        &self.state
    }

    /// Look up a task by id.
    #[must_use]
    pub fn task(&self, id: &str) -> Option<&Task> {
        self.state.tasks.iter().find(|t| t.id == id)
    }

    /// The task behind the running session.
    #[must_use]
    pub fn active_task(&self) -> Option<&Task> {
        self.active().and_then(|a| self.task(&a.task_id))
    }

    /// Whether a timer is running.
    #[must_use]
    pub const fn state(&self) -> TrackerState {
        if self.state.active.is_some() {
            TrackerState::Tracking
        } else {
            TrackerState::Idle
        }
    }

    /// The store's clock.
    pub const fn clock(&self) -> &C {
        &self.clock
    }

    /// Current instant according to the store's clock.
    #[must_use]
    pub fn now(&self) -> chrono::DateTime<chrono::Utc> {
        self.clock.now()
    }

    /// Create a task and append it to the list.
    ///
    /// The name is stored as given. Callers reject empty names.
    ///
    /// # Errors
    ///
    /// Returns an error if the task list cannot be persisted.
    pub fn add_task(&mut self, name: &str) -> Result<Task, TallyError> {
        let task = Task::new(name, self.clock.now());

        let mut next = self.state.clone();
        next.tasks.push(task.clone());
        self.commit(next, &[Slot::Tasks])?;

        debug!(id = %task.id, name = %task.name, "added task");
        Ok(task)
    }

    /// Start timing `task_id`.
    ///
    /// Starting the task that is already running does nothing. Starting a
    /// different task closes the running session at the same instant the new
    /// one begins.
    ///
    /// # Errors
    ///
    /// Returns `TallyError::NotFound` if no task has this id, in which case
    /// the running session is left alone. Returns a storage error if the
    /// state cannot be persisted.
    pub fn start_task(&mut self, task_id: &str) -> Result<(), TallyError> {
        if self
            .state
            .active
            .as_ref()
            .is_some_and(|a| a.task_id == task_id)
        {
            debug!(id = %task_id, "task already active");
            return Ok(());
        }

        if self.task(task_id).is_none() {
            return Err(TallyError::task_not_found(task_id));
        }

        let now = self.clock.now();
        let mut next = self.state.clone();
        let mut slots = vec![Slot::Active];

        if let Some(previous) = next.active.take() {
            debug!(id = %previous.task_id, "switching away from active task");
            next.history.push(previous.close(now));
            slots.push(Slot::History);
        }
        next.active = Some(ActiveSession::new(task_id, now));

        self.commit(next, &slots)?;
        debug!(id = %task_id, "started task");
        Ok(())
    }

    /// Stop the running session and record it in history.
    ///
    /// Returns the recorded entry, or `None` if nothing was running.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be persisted.
    pub fn stop_task(&mut self) -> Result<Option<HistoryEntry>, TallyError> {
        if self.state.active.is_none() {
            return Ok(None);
        }

        let now = self.clock.now();
        let mut next = self.state.clone();
        let entry = next.active.take().map(|a| a.close(now));
        next.history.extend(entry.clone());

        self.commit(next, &[Slot::Active, Slot::History])?;
        debug!(?entry, "stopped task");
        Ok(entry)
    }

    /// Delete a task and every history entry attributed to it.
    ///
    /// If the task is running, its session is closed first and the closing
    /// entry is discarded with the rest of its history. Returns the removed
    /// task, or `None` if no task has this id.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be persisted.
    pub fn delete_task(&mut self, task_id: &str) -> Result<Option<Task>, TallyError> {
        let Some(task) = self.task(task_id).cloned() else {
            return Ok(None);
        };

        let mut next = self.state.clone();

        if next.active.as_ref().is_some_and(|a| a.task_id == task_id) {
            let now = self.clock.now();
            next.history.extend(next.active.take().map(|a| a.close(now)));
            debug!(id = %task_id, "closed active session before delete");
        }

        next.tasks.retain(|t| t.id != task_id);
        let before = next.history.len();
        next.history.retain(|h| h.task_id != task_id);
        let removed = before - next.history.len();

        self.commit(next, &[Slot::Tasks, Slot::Active, Slot::History])?;
        debug!(id = %task_id, removed_entries = removed, "deleted task");
        Ok(Some(task))
    }

    /// Rename a task in place.
    ///
    /// Unknown ids are ignored. The name is not validated.
    ///
    /// # Errors
    ///
    /// Returns an error if the task list cannot be persisted.
    pub fn update_task(&mut self, update: TaskUpdate) -> Result<(), TallyError> {
        let Some(index) = self.state.tasks.iter().position(|t| t.id == update.id) else {
            debug!(id = %update.id, "rename of unknown task ignored");
            return Ok(());
        };

        let mut next = self.state.clone();
        next.tasks[index].name = update.name;

        self.commit(next, &[Slot::Tasks])?;
        debug!(id = %update.id, "renamed task");
        Ok(())
    }

    /// Re-read the state from the durable mirror.
    ///
    /// Picks up changes written by another process since the store was
    /// opened.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    pub fn reload(&mut self) -> Result<(), TallyError> {
        self.state = load(&self.kv)?;
        debug!(tasks = self.state.tasks.len(), "reloaded tracker state");
        Ok(())
    }

    fn commit(&mut self, next: Snapshot, slots: &[Slot]) -> Result<(), TallyError> {
        let writes = slots
            .iter()
            .map(|slot| {
                Ok(match slot {
                    Slot::Tasks => SlotWrite::new(TASKS_KEY, serde_json::to_string(&next.tasks)?),
                    Slot::Active => {
                        SlotWrite::new(ACTIVE_KEY, serde_json::to_string(&next.active)?)
                    },
                    Slot::History => {
                        SlotWrite::new(HISTORY_KEY, serde_json::to_string(&next.history)?)
                    },
                })
            })
            .collect::<Result<Vec<_>, TallyError>>()?;

        self.kv.write_batch(&writes)?;
        self.state = next;
        Ok(())
    }
}

fn load<K: KeyValueStore>(kv: &K) -> Result<Snapshot, TallyError> {
    let tasks: Vec<Task> = read_slot(kv, TASKS_KEY)?;
    let mut active: Option<ActiveSession> = read_slot(kv, ACTIVE_KEY)?;
    let mut history: Vec<HistoryEntry> = read_slot(kv, HISTORY_KEY)?;

    let before = history.len();
    history.retain(HistoryEntry::is_valid);
    if history.len() < before {
        warn!(
            dropped = before - history.len(),
            "dropped history entries that stop before they start"
        );
    }

    if let Some(session) = &active {
        if !tasks.iter().any(|t| t.id == session.task_id) {
            warn!(id = %session.task_id, "discarded active session for a missing task");
            active = None;
        }
    }

    Ok(Snapshot {
        tasks,
        active,
        history,
    })
}

/// Read and parse a slot. Absent, `null`, and unparseable slots all read as
/// the type's default.
fn read_slot<K, T>(kv: &K, key: &str) -> Result<T, TallyError>
where
    K: KeyValueStore,
    T: DeserializeOwned + Default,
{
    let Some(text) = kv.get(key)? else {
        return Ok(T::default());
    };

    match serde_json::from_str::<Option<T>>(&text) {
        Ok(value) => Ok(value.unwrap_or_default()),
        Err(e) => {
            warn!(slot = key, error = %e, "ignoring malformed slot");
            Ok(T::default())
        },
    }
}
