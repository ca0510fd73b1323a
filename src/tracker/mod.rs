//! Time tracking core.
//!
//! Tasks, the single running session, and completed history:
//! - `model`: the stored records
//! - `store`: the task session store and its durable mirror
//! - `views`: totals, day grouping, and search computed from the store
//! - `format`: `HH:MM:SS` rendering of elapsed time

pub mod clock;
pub mod format;
pub mod model;
pub mod store;
pub mod views;

pub use clock::{Clock, ManualClock, SystemClock};
pub use format::{format_duration, FormattedTime};
pub use model::{ActiveSession, HistoryEntry, Task, TaskUpdate, TrackerState};
pub use store::{Snapshot, TaskStore, ACTIVE_KEY, HISTORY_KEY, TASKS_KEY};
pub use views::{DayGroup, Summary};

use crate::config::Paths;
use crate::error::TallyError;
use crate::storage::{Database, SqliteStore};

/// The store as used by the application: `SQLite` slots and the wall clock.
pub type Tracker = TaskStore<SqliteStore, SystemClock>;

/// Open the application's store under `paths`.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or read.
pub fn open(paths: &Paths) -> Result<Tracker, TallyError> {
    let db = Database::open(paths)?;
    TaskStore::open(SqliteStore::new(db), SystemClock)
}
