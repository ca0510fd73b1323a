//! Event handling for the TUI.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::error::TallyError;
use crate::storage::KeyValueStore;
use crate::tracker::Clock;
use crate::tui::app::App;

const HELP: &str = "j/k:nav | Enter/space:start/stop | s:stop | d:delete | r:reload | q:quit";

/// Action to take after handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Quit the application.
    Quit,
    /// Reload state from disk.
    Reload,
    /// Start or stop the selected task.
    Toggle,
    /// Stop the running task.
    Stop,
    /// Delete the selected task (after confirmation).
    Delete,
}

/// Wait up to `timeout` for a key press.
///
/// Returns an action to take, or None when the timeout passes first so the
/// caller can redraw the timer.
///
/// # Errors
///
/// Returns an error if event polling fails.
pub fn handle_events<K: KeyValueStore, C: Clock>(
    app: &mut App<'_, K, C>,
    timeout: Duration,
) -> Result<Option<Action>, TallyError> {
    if !event::poll(timeout)
        .map_err(|e| TallyError::Config(format!("Event poll failed: {e}")))?
    {
        return Ok(None);
    }

    match event::read().map_err(|e| TallyError::Config(format!("Event read failed: {e}")))? {
        Event::Key(key) if key.kind == KeyEventKind::Press => Ok(handle_key(app, key)),
        _ => Ok(None),
    }
}

fn handle_key<K: KeyValueStore, C: Clock>(app: &mut App<'_, K, C>, key: KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),

        KeyCode::Char('j') | KeyCode::Down => {
            app.select_next();
            None
        },
        KeyCode::Char('k') | KeyCode::Up => {
            app.select_previous();
            None
        },

        KeyCode::Enter | KeyCode::Char(' ') => Some(Action::Toggle),
        KeyCode::Char('s') => Some(Action::Stop),
        KeyCode::Char('d') => Some(Action::Delete),
        KeyCode::Char('r') => {
            app.cancel_pending();
            Some(Action::Reload)
        },

        KeyCode::Char('?') => {
            app.cancel_pending();
            app.status = Some(HELP.to_string());
            None
        },

        _ => {
            app.cancel_pending();
            None
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::tracker::{ManualClock, TaskStore};
    use chrono::{TimeZone, Utc};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_key_bindings() {
        let t0 = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let mut store = TaskStore::open(MemoryStore::new(), ManualClock::new(t0)).unwrap();
        let mut app = App::new(&mut store);

        assert_eq!(handle_key(&mut app, press(KeyCode::Char('q'))), Some(Action::Quit));
        assert_eq!(handle_key(&mut app, press(KeyCode::Esc)), Some(Action::Quit));
        assert_eq!(handle_key(&mut app, press(KeyCode::Enter)), Some(Action::Toggle));
        assert_eq!(handle_key(&mut app, press(KeyCode::Char(' '))), Some(Action::Toggle));
        assert_eq!(handle_key(&mut app, press(KeyCode::Char('s'))), Some(Action::Stop));
        assert_eq!(handle_key(&mut app, press(KeyCode::Char('d'))), Some(Action::Delete));
        assert_eq!(handle_key(&mut app, press(KeyCode::Char('r'))), Some(Action::Reload));
        assert_eq!(handle_key(&mut app, press(KeyCode::Char('j'))), None);
        assert_eq!(
            handle_key(&mut app, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Action::Quit)
        );
    }

    #[test]
    fn test_help_sets_status() {
        let t0 = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let mut store = TaskStore::open(MemoryStore::new(), ManualClock::new(t0)).unwrap();
        let mut app = App::new(&mut store);

        handle_key(&mut app, press(KeyCode::Char('?')));
        assert_eq!(app.status.as_deref(), Some(HELP));
    }
}
