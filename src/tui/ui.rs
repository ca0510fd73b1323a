//! UI rendering for the TUI.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::storage::KeyValueStore;
use crate::tracker::{Clock, FormattedTime};
use crate::tui::app::{App, Row};

/// Render the application UI.
pub fn render<K: KeyValueStore, C: Clock>(frame: &mut Frame<'_>, app: &App<'_, K, C>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Timer
            Constraint::Min(0),    // Tasks
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_timer(frame, app, chunks[0]);
    render_list(frame, app, chunks[1]);
    render_status_bar(frame, app, chunks[2]);
}

/// Render the live timer card.
fn render_timer<K: KeyValueStore, C: Clock>(frame: &mut Frame<'_>, app: &App<'_, K, C>, area: Rect) {
    let summary = app.summary();

    let (elapsed, label) = match &summary.active {
        Some(active) => (
            Span::styled(
                FormattedTime::from_millis(active.elapsed_ms).to_string(),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ),
            Line::from(vec![
                Span::raw("Tracking on "),
                Span::styled(
                    active.task_name.clone().unwrap_or_default(),
                    Style::default().fg(Color::Green),
                ),
            ]),
        ),
        None => (
            Span::styled("00:00:00", Style::default().fg(Color::DarkGray)),
            Line::from("No active task."),
        ),
    };

    let today = Line::from(vec![
        Span::styled("Total time today: ", Style::default().fg(Color::DarkGray)),
        Span::raw(FormattedTime::from_millis(summary.today_ms).to_string()),
    ]);

    let card = Paragraph::new(vec![Line::from(elapsed), label, today]).block(
        Block::default()
            .title(format!(" tally: {} ", summary.state))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    frame.render_widget(card, area);
}

/// Render tasks grouped by day.
fn render_list<K: KeyValueStore, C: Clock>(frame: &mut Frame<'_>, app: &App<'_, K, C>, area: Rect) {
    let selected_row = app.selected_row();

    let items: Vec<ListItem<'_>> = app
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| match row {
            Row::Day { day, total_ms } => ListItem::new(Line::from(vec![
                Span::styled(
                    day.format("%d %B %Y").to_string(),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  {}", FormattedTime::from_millis(*total_ms)),
                    Style::default().fg(Color::DarkGray),
                ),
            ])),
            Row::Task {
                name,
                total_ms,
                active,
                ..
            } => {
                let is_selected = selected_row == Some(i);
                let marker = if *active { "▶ " } else { "  " };
                let name_style = Style::default()
                    .fg(if *active { Color::Green } else { Color::White })
                    .add_modifier(if is_selected {
                        Modifier::BOLD
                    } else {
                        Modifier::empty()
                    });

                let line = Line::from(vec![
                    Span::styled(marker, Style::default().fg(Color::Green)),
                    Span::styled(
                        format!("{}  ", FormattedTime::from_millis(*total_ms)),
                        Style::default().fg(Color::Yellow),
                    ),
                    Span::styled(name.as_str(), name_style),
                ]);

                let style = if is_selected {
                    Style::default().bg(Color::DarkGray)
                } else {
                    Style::default()
                };
                ListItem::new(line).style(style)
            },
        })
        .collect();

    let title = format!(" Tasks ({}) ", app.task_count());
    let list = List::new(items)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White)),
        )
        .highlight_style(Style::default().bg(Color::DarkGray));

    let mut state = ListState::default();
    state.select(selected_row);

    frame.render_stateful_widget(list, area, &mut state);
}

/// Render the status bar.
fn render_status_bar<K: KeyValueStore, C: Clock>(
    frame: &mut Frame<'_>,
    app: &App<'_, K, C>,
    area: Rect,
) {
    let status_text = app.status.as_deref().unwrap_or(
        "j/k:nav | Enter:start/stop | s:stop | d:delete | r:reload | ?:help | q:quit",
    );

    let status = Paragraph::new(status_text).style(Style::default().fg(Color::DarkGray));

    frame.render_widget(status, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::tracker::{ManualClock, TaskStore};
    use chrono::{Duration, TimeZone, Utc};
    use ratatui::{backend::TestBackend, Terminal};

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect()
    }

    #[test]
    fn test_render_shows_running_timer() {
        let t0 = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let mut store = TaskStore::open(MemoryStore::new(), ManualClock::new(t0)).unwrap();
        let task = store.add_task("Write report").unwrap();
        store.start_task(&task.id).unwrap();
        store.clock().advance(Duration::seconds(5));

        let app = App::new(&mut store);
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal.draw(|frame| render(frame, &app)).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("00:00:05"));
        assert!(text.contains("Tracking on Write report"));
        assert!(text.contains("Total time today"));
    }

    #[test]
    fn test_render_idle() {
        let t0 = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let mut store = TaskStore::open(MemoryStore::new(), ManualClock::new(t0)).unwrap();

        let app = App::new(&mut store);
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal.draw(|frame| render(frame, &app)).unwrap();

        assert!(buffer_text(&terminal).contains("No active task."));
    }
}
