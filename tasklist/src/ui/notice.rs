//! Blocking alert popup.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::theme;

/// Render `text` centered over the UI. Dismissed with Enter or Esc.
pub fn render(frame: &mut Frame, text: &str) {
    let area = centered(frame.area(), 40, 5);

    let lines = vec![
        Line::from(Span::styled(text, theme::bold())),
        Line::from(Span::styled("Enter/Esc: OK", theme::dimmed())),
    ];

    let block = Block::default()
        .title("Alert")
        .borders(Borders::ALL)
        .border_style(theme::notice_border());

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block),
        area,
    );
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    cell
}
