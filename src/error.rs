//! Error types for tally.

use thiserror::Error;

/// Errors produced by tally.
#[derive(Debug, Error)]
pub enum TallyError {
    /// A task or other item could not be found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User input was rejected before reaching the store.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The durable store failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration, path, or terminal setup failed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization or deserialization failed.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TallyError {
    /// Shorthand for a missing task.
    #[must_use]
    pub fn task_not_found(id: &str) -> Self {
        Self::NotFound(format!("Task not found: {id}"))
    }

    /// Whether this error means the target does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<rusqlite::Error> for TallyError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Storage(err.to_string())
    }
}
