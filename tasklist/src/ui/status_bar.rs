//! Status bar rendering.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

use super::theme;
use crate::app::{App, InputMode};

/// Render the status bar at the bottom of the screen.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let help_text = match app.mode {
        InputMode::Browsing => "Enter: add | ↑↓: select | ^E edit | ^D remove | ^T toggle | ^C: quit",
        InputMode::Filtering { .. } => "Enter: add | Esc: clear | ↑↓: select | ^C: quit",
        InputMode::Editing { .. } => "Enter: save | Esc: cancel | ↑↓: select | ^C: quit",
    };

    let (dot_color, state_text) = if app.loading {
        (theme::WARNING, "Loading".to_string())
    } else if app.in_flight {
        (theme::WARNING, "Saving...".to_string())
    } else if let Some(message) = &app.status_message {
        (theme::ERROR, message.clone())
    } else {
        (theme::SUCCESS, format!("{} tasks", app.tasks.len()))
    };

    let status_line = Line::from(vec![
        Span::styled(concat!("Tasklist v", env!("CARGO_PKG_VERSION")), theme::bold()),
        Span::raw(" | "),
        Span::styled("●", theme::normal().fg(dot_color)),
        Span::raw(format!(" {state_text}")),
        Span::raw(" | "),
        Span::styled(help_text, theme::dimmed()),
    ]);

    let paragraph = Paragraph::new(status_line).style(theme::status_bar_bg());
    frame.render_widget(paragraph, area);
}
