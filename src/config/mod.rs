//! Configuration management for tally.
//!
//! This module handles loading configuration from `~/.tally/`.

mod paths;
mod settings;

pub use paths::{Paths, HOME_ENV};
pub use settings::{ColorSetting, Config, DisplayConfig, GeneralConfig};
