//! Storage layer for tally.
//!
//! The tracker state is mirrored into named text slots. The default backend
//! keeps them in a `SQLite` table; tests use the in-memory backend.

mod database;
mod kv;
mod migrations;

pub use database::Database;
pub use kv::{KeyValueStore, MemoryStore, SlotWrite, SqliteStore};
