use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "A local time tracker for the command line")]
#[command(long_about = "tally - A local time tracker

Create tasks, start and stop a timer against one task at a time, and see how
much time went into each task and each day. Everything is stored locally.

QUICK START:
  tally add \"Write report\"     Create a task
  tally start \"Write report\"   Start timing it
  tally status --watch         Watch the live timer
  tally stop                   Stop timing
  tally list                   Tasks grouped by day with totals

OUTPUT FORMATS:
  --output pretty    Human-readable colored output (default)
  --output json      Machine-readable JSON for scripting

For more information on a specific command, run:
  tally <command> --help")]
#[command(version, propagate_version = true)]
pub struct Cli {
    /// Output format for command results
    ///
    /// Defaults to the `general.default_output` config setting.
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Data directory (defaults to ~/.tally)
    #[arg(long, global = true, env = "TALLY_HOME")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for command results.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable colored output.
    #[default]
    Pretty,
    /// Machine-readable JSON output.
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new task
    ///
    /// Empty names are rejected.
    ///
    /// # Examples
    ///
    ///   tally add Write report
    ///   tally add "Review PR" --start
    #[command(alias = "a")]
    Add {
        /// Task name
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,

        /// Start timing the new task right away
        #[arg(long, short = 's')]
        start: bool,
    },

    /// List tasks grouped by creation day
    ///
    /// Each task shows its total tracked time. The running task is marked.
    ///
    /// # Examples
    ///
    ///   tally list
    ///   tally ls --search report
    #[command(alias = "ls")]
    List {
        /// Only show tasks whose name contains this text (case-insensitive)
        #[arg(long, short = 's')]
        search: Option<String>,
    },

    /// Start timing a task
    ///
    /// If another task is running it is stopped first. Starting the task
    /// that is already running does nothing.
    ///
    /// TASK is an id, an id prefix, or an exact task name.
    Start {
        /// Task to start
        task: String,
    },

    /// Stop the running timer
    Stop,

    /// Start a task, or stop it if it is the one running
    Toggle {
        /// Task to toggle
        task: String,
    },

    /// Show the running timer
    Status {
        /// Keep redrawing the timer until interrupted
        #[arg(long, short = 'w')]
        watch: bool,
    },

    /// Rename a task
    Rename {
        /// Task to rename
        task: String,

        /// New name
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },

    /// Delete a task and all of its tracked time
    ///
    /// This cannot be undone. If the task is running it is stopped first.
    #[command(alias = "rm")]
    Delete {
        /// Task to delete
        task: String,

        /// Confirm the deletion
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Show completed time entries, newest first
    History {
        /// Only show entries for this task
        #[arg(long, short = 't')]
        task: Option<String>,

        /// Number of entries to show (defaults to `display.history_limit`)
        #[arg(long, short = 'n')]
        limit: Option<usize>,
    },

    /// Show time tracked today
    Today,

    /// Open the live dashboard
    Tui,

    /// Generate shell completions
    ///
    /// # Examples
    ///
    ///   tally completions bash > ~/.local/share/bash-completion/completions/tally
    ///   tally completions zsh > ~/.zfunc/_tally
    Completions {
        /// Target shell
        shell: Shell,
    },
}
