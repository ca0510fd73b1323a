//! Key-value slot storage.
//!
//! The tracker mirrors its state into a handful of named text slots. Any
//! backend that can read a slot and write several slots atomically can hold
//! it.

use std::collections::HashMap;

use chrono::Utc;
use rusqlite::{params, OptionalExtension};

use super::Database;
use crate::error::TallyError;

/// A single slot write inside a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotWrite<'a> {
    /// Slot key.
    pub key: &'a str,
    /// Serialized slot value.
    pub value: String,
}

impl<'a> SlotWrite<'a> {
    /// Create a new slot write.
    #[must_use]
    pub const fn new(key: &'a str, value: String) -> Self {
        Self { key, value }
    }
}

/// A durable mirror of named text slots.
pub trait KeyValueStore {
    /// Read a slot. Returns `None` if the slot has never been written.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, TallyError>;

    /// Write every slot in `writes`, or none of them.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the write. No slot changes in
    /// that case.
    fn write_batch(&mut self, writes: &[SlotWrite<'_>]) -> Result<(), TallyError>;

    /// Write a single slot.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the write.
    fn set(&mut self, key: &str, value: String) -> Result<(), TallyError> {
        self.write_batch(&[SlotWrite::new(key, value)])
    }
}

/// Slot storage backed by the `kv_slots` table.
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    /// Create slot storage over an open database.
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    /// Open an in-memory store (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn in_memory() -> Result<Self, TallyError> {
        Ok(Self::new(Database::open_in_memory()?))
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, TallyError> {
        self.db
            .connection()
            .query_row("SELECT value FROM kv_slots WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()
            .map_err(|e| TallyError::Storage(format!("Failed to read slot {key}: {e}")))
    }

    fn write_batch(&mut self, writes: &[SlotWrite<'_>]) -> Result<(), TallyError> {
        let now = Utc::now().to_rfc3339();
        let tx = self
            .db
            .connection_mut()
            .transaction()
            .map_err(|e| TallyError::Storage(format!("Failed to begin transaction: {e}")))?;

        for write in writes {
            tx.execute(
                r"INSERT INTO kv_slots (key, value, updated_at) VALUES (?1, ?2, ?3)
                  ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at",
                params![write.key, write.value, now],
            )
            .map_err(|e| TallyError::Storage(format!("Failed to write slot {}: {e}", write.key)))?;
        }

        tx.commit()
            .map_err(|e| TallyError::Storage(format!("Failed to commit slots: {e}")))
    }
}

/// Slot storage held in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    slots: HashMap<String, String>,
    batches: usize,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of batches written so far.
    #[must_use]
    pub const fn batch_count(&self) -> usize {
        self.batches
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, TallyError> {
        Ok(self.slots.get(key).cloned())
    }

    fn write_batch(&mut self, writes: &[SlotWrite<'_>]) -> Result<(), TallyError> {
        for write in writes {
            self.slots.insert(write.key.to_string(), write.value.clone());
        }
        self.batches += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlite_missing_slot() {
        let store = SqliteStore::in_memory().unwrap();
        assert!(store.get("tasks").unwrap().is_none());
    }

    #[test]
    fn test_sqlite_set_and_overwrite() {
        let mut store = SqliteStore::in_memory().unwrap();

        store.set("tasks", "[]".to_string()).unwrap();
        assert_eq!(store.get("tasks").unwrap().as_deref(), Some("[]"));

        store.set("tasks", "[1]".to_string()).unwrap();
        assert_eq!(store.get("tasks").unwrap().as_deref(), Some("[1]"));
    }

    #[test]
    fn test_sqlite_batch_writes_every_slot() {
        let mut store = SqliteStore::in_memory().unwrap();

        store
            .write_batch(&[
                SlotWrite::new("tasks", "[]".to_string()),
                SlotWrite::new("activeTask", "null".to_string()),
            ])
            .unwrap();

        assert_eq!(store.get("tasks").unwrap().as_deref(), Some("[]"));
        assert_eq!(store.get("activeTask").unwrap().as_deref(), Some("null"));
    }

    #[test]
    fn test_sqlite_persists_across_reopen() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("tally.db");

        {
            let mut store = SqliteStore::new(Database::open_at(&path).unwrap());
            store.set("taskHistory", "[]".to_string()).unwrap();
        }

        let store = SqliteStore::new(Database::open_at(&path).unwrap());
        assert_eq!(store.get("taskHistory").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_memory_store_counts_batches() {
        let mut store = MemoryStore::new();
        assert_eq!(store.batch_count(), 0);

        store.set("a", "1".to_string()).unwrap();
        store
            .write_batch(&[
                SlotWrite::new("a", "2".to_string()),
                SlotWrite::new("b", "3".to_string()),
            ])
            .unwrap();

        assert_eq!(store.batch_count(), 2);
        assert_eq!(store.get("a").unwrap().as_deref(), Some("2"));
        assert_eq!(store.get("b").unwrap().as_deref(), Some("3"));
    }
}
