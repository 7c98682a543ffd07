//! The shared text input (new task, filter, or edit).

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::theme;
use crate::app::{App, InputMode};

/// Render the input box with its cursor.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let title = match app.mode {
        InputMode::Editing { .. } => "Edit task",
        InputMode::Filtering { .. } => "New task / filter",
        InputMode::Browsing => "Todo List",
    };

    let line = if app.in_flight {
        Line::from(Span::styled(app.input(), theme::dimmed()))
    } else if app.input().is_empty() {
        Line::from(vec![
            Span::styled("█", theme::input_cursor()),
            Span::styled(app.placeholder(), theme::dimmed()),
        ])
    } else {
        let (before, after) = split_at_char(app.input(), app.cursor_position);
        Line::from(vec![
            Span::styled(before, theme::normal()),
            Span::styled("█", theme::input_cursor()),
            Span::styled(after, theme::normal()),
        ])
    };

    let block = Block::default()
        .title(Span::styled(title, theme::bold()))
        .borders(Borders::ALL)
        .border_style(if app.in_flight {
            theme::dimmed()
        } else {
            theme::highlighted()
        });

    frame.render_widget(Paragraph::new(line).block(block), area);
}

/// Split `s` at a character index.
fn split_at_char(s: &str, chars: usize) -> (&str, &str) {
    let byte = s.char_indices().nth(chars).map_or(s.len(), |(i, _)| i);
    s.split_at(byte)
}
