//! Terminal User Interface (TUI) for tally.
//!
//! A live dashboard: the running timer, today's total, and every task grouped
//! by creation day. Built with ratatui and crossterm.

mod app;
mod event;
mod ui;

pub use app::{App, Row};

use std::io;
use std::time::Duration;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

use crate::config::Config;
use crate::error::TallyError;
use crate::storage::KeyValueStore;
use crate::tracker::{Clock, TaskStore};

/// Run the TUI application.
///
/// # Errors
///
/// Returns an error if the TUI fails to initialize or run.
pub fn run<K: KeyValueStore, C: Clock>(
    store: &mut TaskStore<K, C>,
    config: &Config,
) -> Result<(), TallyError> {
    enable_raw_mode().map_err(|e| TallyError::Config(format!("Failed to enable raw mode: {e}")))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)
        .map_err(|e| TallyError::Config(format!("Failed to setup terminal: {e}")))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)
        .map_err(|e| TallyError::Config(format!("Failed to create terminal: {e}")))?;

    let mut app = App::new(store);
    let result = run_app(&mut terminal, &mut app, config.display.refresh_interval());

    // Restore terminal
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    result
}

/// Redraw on every key press and at least once per `tick`.
fn run_app<B: Backend, K: KeyValueStore, C: Clock>(
    terminal: &mut Terminal<B>,
    app: &mut App<'_, K, C>,
    tick: Duration,
) -> Result<(), TallyError> {
    loop {
        terminal
            .draw(|frame| ui::render(frame, app))
            .map_err(|e| TallyError::Config(format!("Failed to draw: {e}")))?;

        if let Some(action) = event::handle_events(app, tick)? {
            let outcome = match action {
                event::Action::Quit => break,
                event::Action::Reload => app.reload(),
                event::Action::Toggle => app.toggle_selected(),
                event::Action::Stop => app.stop(),
                event::Action::Delete => app.delete_selected(),
            };

            // A failed write leaves the store as it was; keep the dashboard up
            if let Err(e) = outcome {
                tracing::debug!(error = %e, "dashboard action failed");
                app.status = Some(format!("Error: {e}"));
            }
        }
    }

    Ok(())
}
