//! tally - a local time tracker for the command line
//!
//! Tasks are timed one at a time. Completed intervals are kept as history and
//! everything is mirrored into a local `SQLite` key-value store.

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod storage;
pub mod tracker;
pub mod tui;

pub use cli::args::{Cli, Commands, OutputFormat};
pub use error::TallyError;
pub use tracker::{TaskStore, Tracker};
