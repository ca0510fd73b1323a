//! Path resolution for tally configuration and data files.
//!
//! All tally data is stored in `~/.tally/` (or `$TALLY_HOME`):
//! - `config.yaml` - Main configuration file
//! - `tally.db` - `SQLite` database holding the tracker slots

use std::path::PathBuf;

use crate::error::TallyError;

/// Environment variable that overrides the data directory.
pub const HOME_ENV: &str = "TALLY_HOME";

/// Paths to tally configuration and data files.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Root directory: `~/.tally/`
    pub root: PathBuf,
    /// Config file: `~/.tally/config.yaml`
    pub config_file: PathBuf,
    /// Database file: `~/.tally/tally.db`
    pub database: PathBuf,
}

impl Paths {
    /// Resolve paths from `$TALLY_HOME`, falling back to `$HOME/.tally`.
    ///
    /// # Errors
    ///
    /// Returns an error if neither variable is set.
    pub fn new() -> Result<Self, TallyError> {
        if let Some(root) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
            return Ok(Self::with_root(PathBuf::from(root)));
        }

        let home = std::env::var("HOME").map_err(|_| {
            TallyError::Config("Could not determine home directory".to_string())
        })?;

        Ok(Self::with_root(PathBuf::from(home).join(".tally")))
    }

    /// Create paths with a custom root directory.
    #[must_use]
    pub fn with_root(root: PathBuf) -> Self {
        Self {
            config_file: root.join("config.yaml"),
            database: root.join("tally.db"),
            root,
        }
    }

    /// Ensure the data directory exists, creating it if necessary.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation fails.
    pub fn ensure_dirs(&self) -> Result<(), TallyError> {
        if !self.root.exists() {
            std::fs::create_dir_all(&self.root).map_err(|e| {
                TallyError::Config(format!(
                    "Failed to create directory {}: {e}",
                    self.root.display()
                ))
            })?;
        }

        Ok(())
    }
}
