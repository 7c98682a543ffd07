//! Task list rendering.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use super::theme;
use crate::app::App;

/// Shown while filtering with no matches.
pub const NO_RESULT: &str = "No result. Create a new one instead!";

/// Spinner frames for the loading indicator.
const SPINNER: [&str; 4] = ["◐", "◓", "◑", "◒"];

/// Render the task list, or a loading indicator before the first delivery.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(Span::styled("Task List", theme::panel_title(theme::TASKS_TITLE)))
        .borders(Borders::ALL)
        .border_style(theme::normal());

    if app.loading {
        let spinner = SPINNER[spinner_frame()];
        let paragraph = Paragraph::new(Line::from(vec![
            Span::styled(spinner, theme::highlighted()),
            Span::styled(" Loading tasks...", theme::dimmed()),
        ]))
        .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let visible = app.visible_tasks();
    if visible.is_empty() && !app.input().is_empty() && app.mode.editing_id().is_none() {
        frame.render_widget(
            Paragraph::new(Span::styled(NO_RESULT, theme::dimmed())).block(block),
            area,
        );
        return;
    }

    let editing = app.mode.editing_id();
    let items: Vec<ListItem> = visible
        .iter()
        .map(|task| {
            let checkbox = if task.completed { "[✓]" } else { "[ ]" };
            let text_style = if task.completed {
                theme::completed()
            } else {
                theme::normal()
            };
            let hint = if editing == Some(&task.id) {
                "Esc: Cancel".to_string()
            } else {
                let toggle = if task.completed {
                    "Mark as Incomplete"
                } else {
                    "Mark as Complete"
                };
                format!("^D Remove  ^E Edit  ^T {toggle}")
            };

            ListItem::new(Line::from(vec![
                Span::styled(checkbox, text_style),
                Span::raw(" "),
                Span::styled(task.text.as_str(), text_style),
                Span::raw("  "),
                Span::styled(hint, theme::dimmed()),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(theme::selected());
    let mut state = ListState::default().with_selected(Some(app.selected));
    frame.render_stateful_widget(list, area, &mut state);
}

/// Current spinner frame, advancing every 150ms of wall time.
fn spinner_frame() -> usize {
    let ms = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    usize::try_from(ms / 150).unwrap_or(0) % SPINNER.len()
}
