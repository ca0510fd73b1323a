//! Application state for the TUI.

use chrono::{Duration, NaiveDate};

use crate::error::TallyError;
use crate::storage::KeyValueStore;
use crate::tracker::{views, Clock, Summary, Task, TaskStore};

/// One line of the dashboard list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    /// A day header with the time tracked on tasks created that day.
    Day {
        /// The creation day.
        day: NaiveDate,
        /// Tracked milliseconds across the day's tasks.
        total_ms: i64,
    },
    /// A selectable task.
    Task {
        /// Task id.
        id: String,
        /// Task name.
        name: String,
        /// Tracked milliseconds.
        total_ms: i64,
        /// Whether this task is running.
        active: bool,
    },
}

/// Application state.
pub struct App<'a, K, C> {
    store: &'a mut TaskStore<K, C>,
    /// Rows in display order.
    pub rows: Vec<Row>,
    /// Index into the task rows only.
    pub selected: usize,
    /// Status message to display.
    pub status: Option<String>,
    /// Task awaiting a second `d` to confirm deletion.
    pub pending_delete: Option<String>,
}

impl<'a, K: KeyValueStore, C: Clock> App<'a, K, C> {
    /// Create a new app instance.
    pub fn new(store: &'a mut TaskStore<K, C>) -> Self {
        let mut app = Self {
            store,
            rows: Vec::new(),
            selected: 0,
            status: Some("Press ? for help".to_string()),
            pending_delete: None,
        };
        app.rebuild();
        app
    }

    /// Headline numbers at the current instant.
    pub fn summary(&self) -> Summary {
        Summary::from_snapshot(self.store.snapshot(), self.store.now())
    }

    /// Number of selectable task rows.
    pub fn task_count(&self) -> usize {
        self.store.tasks().len()
    }

    /// The selected task's id.
    pub fn selected_id(&self) -> Option<&str> {
        self.rows
            .iter()
            .filter_map(|row| match row {
                Row::Task { id, .. } => Some(id.as_str()),
                Row::Day { .. } => None,
            })
            .nth(self.selected)
    }

    /// Position of the selected task among all rows.
    pub fn selected_row(&self) -> Option<usize> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| matches!(row, Row::Task { .. }))
            .nth(self.selected)
            .map(|(i, _)| i)
    }

    /// Re-read the store from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn reload(&mut self) -> Result<(), TallyError> {
        self.store.reload()?;
        self.rebuild();
        self.status = Some(format!("Reloaded {} tasks", self.task_count()));
        Ok(())
    }

    /// Move selection up.
    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
        self.pending_delete = None;
    }

    /// Move selection down.
    pub fn select_next(&mut self) {
        if self.selected + 1 < self.task_count() {
            self.selected += 1;
        }
        self.pending_delete = None;
    }

    /// Start the selected task, or stop it if it is running.
    ///
    /// Storage is re-read first so writes made by other processes since the
    /// last refresh are kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written.
    pub fn toggle_selected(&mut self) -> Result<(), TallyError> {
        self.pending_delete = None;
        let Some(id) = self.selected_id().map(str::to_string) else {
            return Ok(());
        };

        self.store.reload()?;
        if self.store.active().is_some_and(|a| a.task_id == id) {
            self.stop_running()?;
        } else {
            self.store.start_task(&id)?;
            self.status = self
                .store
                .task(&id)
                .map(|t| format!("Tracking on {}", t.name));
        }

        self.rebuild();
        Ok(())
    }

    /// Stop the running task.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written.
    pub fn stop(&mut self) -> Result<(), TallyError> {
        self.pending_delete = None;
        self.store.reload()?;
        self.stop_running()?;
        self.rebuild();
        Ok(())
    }

    fn stop_running(&mut self) -> Result<(), TallyError> {
        let name = self.store.active_task().map(|t| t.name.clone());
        self.status = Some(match self.store.stop_task()? {
            Some(entry) => format!(
                "Stopped {} after {}",
                name.unwrap_or_default(),
                crate::tracker::format_duration(entry.duration())
            ),
            None => "No active task.".to_string(),
        });
        Ok(())
    }

    /// Delete the selected task on the second consecutive request.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written.
    pub fn delete_selected(&mut self) -> Result<(), TallyError> {
        let Some(id) = self.selected_id().map(str::to_string) else {
            return Ok(());
        };

        if self.pending_delete.as_deref() != Some(id.as_str()) {
            let name = self.store.task(&id).map_or("task", |t| t.name.as_str());
            self.status = Some(format!("Press d again to delete \"{name}\""));
            self.pending_delete = Some(id);
            return Ok(());
        }

        self.pending_delete = None;
        self.store.reload()?;
        self.status = Some(match self.store.delete_task(&id)? {
            Some(task) => format!("Deleted: {}", task.name),
            None => "Task no longer exists".to_string(),
        });
        self.rebuild();
        self.selected = self.selected.min(self.task_count().saturating_sub(1));
        Ok(())
    }

    /// Drop a pending delete confirmation.
    pub fn cancel_pending(&mut self) {
        if self.pending_delete.take().is_some() {
            self.status = None;
        }
    }

    fn rebuild(&mut self) {
        let totals = views::total_by_task(self.store.history());
        let total_of = |task: &Task| totals.get(&task.id).map_or(0, Duration::num_milliseconds);
        let active_id = self.store.active().map(|a| a.task_id.as_str());

        let mut rows = Vec::new();
        for group in views::group_by_created_day(self.store.tasks()) {
            rows.push(Row::Day {
                day: group.day,
                total_ms: group.tasks.iter().map(|&t| total_of(t)).sum(),
            });
            rows.extend(group.tasks.into_iter().map(|task| Row::Task {
                id: task.id.clone(),
                name: task.name.clone(),
                total_ms: total_of(task),
                active: active_id == Some(task.id.as_str()),
            }));
        }

        self.rows = rows;
        if self.selected >= self.task_count() {
            self.selected = self.task_count().saturating_sub(1);
        }
    }
}
