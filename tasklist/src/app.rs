//! Application state and event handling.
//!
//! The UI offers a single text input that serves three purposes. Which one
//! is active is carried by [`InputMode`]:
//!
//! - `Browsing`: the input is empty and the full list is shown.
//! - `Filtering`: the input holds a pending new task, and the list shows
//!   only tasks containing it (case-insensitive). Enter creates the task.
//! - `Editing`: the input holds replacement text for one task. Enter saves
//!   it, Esc cancels. No filtering happens while editing.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use tasklist_proto::task::{Task, TaskId};

use crate::tasks::filter_tasks;
use crate::worker::{Outcome, SubmitKind, TaskCommand, TaskEvent};

/// Placeholder shown while the input is empty outside edit mode.
pub const PLACEHOLDER_NEW: &str = "Type a new task and press Enter";

/// Placeholder shown while editing.
pub const PLACEHOLDER_EDIT: &str = "Edit the task and press Enter";

/// What the shared text input currently means.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Empty input, full list.
    #[default]
    Browsing,
    /// Non-empty pending task text, which also filters the list.
    Filtering {
        /// Pending new task text, also the filter query.
        query: String,
    },
    /// Replacement text for one task.
    Editing {
        /// Task being edited.
        id: TaskId,
        /// Replacement text.
        buffer: String,
        /// Pending new task text, restored when editing ends.
        draft: String,
    },
}

impl InputMode {
    /// The text shown in the input box.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Browsing => "",
            Self::Filtering { query } => query,
            Self::Editing { buffer, .. } => buffer,
        }
    }

    /// The task being edited, if any.
    #[must_use]
    pub const fn editing_id(&self) -> Option<&TaskId> {
        match self {
            Self::Editing { id, .. } => Some(id),
            _ => None,
        }
    }
}

/// Main application state.
pub struct App {
    /// Current input mode and its text.
    pub mode: InputMode,
    /// Cursor position in the input (character index).
    pub cursor_position: usize,
    /// Latest ordered task list from the store.
    pub tasks: Vec<Task>,
    /// True until the first list delivery.
    pub loading: bool,
    /// Selected row in the visible list.
    pub selected: usize,
    /// A create or edit is waiting on the store; input is disabled.
    pub in_flight: bool,
    /// Blocking alert text; while set, keys only dismiss it.
    pub notice: Option<String>,
    /// Last store failure, shown in the status bar.
    pub status_message: Option<String>,
    /// Whether the app should quit.
    pub should_quit: bool,
}

impl App {
    /// Create an application waiting for its first list delivery.
    #[must_use]
    pub fn new() -> Self {
        Self {
            mode: InputMode::Browsing,
            cursor_position: 0,
            tasks: Vec::new(),
            loading: true,
            selected: 0,
            in_flight: false,
            notice: None,
            status_message: None,
            should_quit: false,
        }
    }

    /// The current input text.
    #[must_use]
    pub fn input(&self) -> &str {
        self.mode.text()
    }

    /// Placeholder for the input box in the current mode.
    #[must_use]
    pub const fn placeholder(&self) -> &'static str {
        match self.mode {
            InputMode::Editing { .. } => PLACEHOLDER_EDIT,
            _ => PLACEHOLDER_NEW,
        }
    }

    /// Tasks currently on screen, in creation order.
    #[must_use]
    pub fn visible_tasks(&self) -> Vec<&Task> {
        match &self.mode {
            InputMode::Filtering { query } => filter_tasks(&self.tasks, query),
            InputMode::Browsing | InputMode::Editing { .. } => self.tasks.iter().collect(),
        }
    }

    /// The task under the selection cursor.
    #[must_use]
    pub fn selected_task(&self) -> Option<&Task> {
        self.visible_tasks().get(self.selected).copied()
    }

    /// Handle a key event.
    ///
    /// Returns a [`TaskCommand`] when the key requires a store operation.
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Option<TaskCommand> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return None;
        }

        if self.notice.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.notice = None;
            }
            return None;
        }

        match key.code {
            KeyCode::Up => {
                self.select_prev();
                return None;
            }
            KeyCode::Down => {
                self.select_next();
                return None;
            }
            _ => {}
        }

        // Input is disabled while a submit is in flight.
        if self.in_flight {
            return None;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('e') => {
                    self.begin_edit();
                    None
                }
                KeyCode::Char('d') => self.remove_selected(),
                KeyCode::Char('t') => self.toggle_selected(),
                _ => None,
            };
        }

        match key.code {
            KeyCode::Enter => return self.submit(),
            KeyCode::Esc => {
                if self.mode.editing_id().is_some() {
                    self.cancel_edit();
                } else {
                    self.set_text(String::new());
                }
            }
            KeyCode::Char(c) => self.enter_char(c),
            KeyCode::Backspace => self.delete_char(),
            KeyCode::Delete => self.delete_char_forward(),
            KeyCode::Left => self.cursor_position = self.cursor_position.saturating_sub(1),
            KeyCode::Right => {
                self.cursor_position = (self.cursor_position + 1).min(self.input().chars().count());
            }
            KeyCode::Home => self.cursor_position = 0,
            KeyCode::End => self.cursor_position = self.input().chars().count(),
            _ => {}
        }
        None
    }

    /// Replace the input text, moving between `Browsing` and `Filtering`
    /// as it becomes empty or non-empty. In `Editing` only the buffer changes.
    pub fn set_text(&mut self, text: String) {
        let len = text.chars().count();
        match &mut self.mode {
            InputMode::Editing { buffer, .. } => *buffer = text,
            mode => {
                *mode = if text.is_empty() {
                    InputMode::Browsing
                } else {
                    InputMode::Filtering { query: text }
                };
            }
        }
        self.cursor_position = self.cursor_position.min(len);
        self.clamp_selection();
    }

    /// Submit the input: create in `Filtering`, save in `Editing`.
    ///
    /// Ignored while another submit is in flight or when the text is blank.
    pub fn submit(&mut self) -> Option<TaskCommand> {
        if self.in_flight {
            return None;
        }
        let cmd = match &self.mode {
            InputMode::Browsing => return None,
            InputMode::Filtering { query } => {
                if query.trim().is_empty() {
                    return None;
                }
                TaskCommand::Create {
                    text: query.clone(),
                }
            }
            InputMode::Editing { id, buffer, .. } => {
                if buffer.trim().is_empty() {
                    return None;
                }
                TaskCommand::Edit {
                    id: id.clone(),
                    text: buffer.clone(),
                }
            }
        };
        self.in_flight = true;
        Some(cmd)
    }

    /// Enter edit mode for the selected task, seeding the input with its text.
    ///
    /// Any pending new task text is kept aside and comes back when editing
    /// ends.
    pub fn begin_edit(&mut self) {
        let Some(task) = self.selected_task() else {
            return;
        };
        let (id, buffer) = (task.id.clone(), task.text.clone());
        let draft = match std::mem::take(&mut self.mode) {
            InputMode::Browsing => String::new(),
            InputMode::Filtering { query } => query,
            InputMode::Editing { draft, .. } => draft,
        };
        // The selection indexes the unfiltered list from here on.
        self.selected = self.tasks.iter().position(|t| t.id == id).unwrap_or(0);
        self.cursor_position = buffer.chars().count();
        self.mode = InputMode::Editing { id, buffer, draft };
    }

    /// Leave edit mode without writing, restoring the pending new task text.
    pub fn cancel_edit(&mut self) {
        let InputMode::Editing { draft, .. } = &mut self.mode else {
            return;
        };
        let draft = std::mem::take(draft);
        self.mode = InputMode::Browsing;
        self.cursor_position = draft.chars().count();
        self.set_text(draft);
    }

    /// Remove the selected task, unless it is the one being edited.
    pub fn remove_selected(&mut self) -> Option<TaskCommand> {
        let id = self.actionable_selection()?;
        Some(TaskCommand::Remove { id })
    }

    /// Toggle the selected task, unless it is the one being edited.
    pub fn toggle_selected(&mut self) -> Option<TaskCommand> {
        let id = self.actionable_selection()?;
        Some(TaskCommand::Toggle { id })
    }

    /// Apply an event from the store worker.
    pub fn apply_event(&mut self, event: TaskEvent) {
        match event {
            TaskEvent::ListUpdated(tasks) => {
                self.tasks = tasks;
                self.loading = false;
                self.status_message = None;
                self.clamp_selection();
            }
            TaskEvent::Settled { kind, outcome } => {
                self.in_flight = false;
                if outcome == Outcome::Succeeded {
                    self.status_message = None;
                }
                match kind {
                    SubmitKind::Create => {
                        if outcome == Outcome::Succeeded {
                            self.set_text(String::new());
                        }
                    }
                    // Every edit outcome leaves edit mode, even a rejection.
                    SubmitKind::Edit => self.cancel_edit(),
                }
            }
            TaskEvent::Rejected(notice) => self.notice = Some(notice),
            TaskEvent::Failed(message) => self.status_message = Some(message),
        }
    }

    fn actionable_selection(&self) -> Option<TaskId> {
        let task = self.selected_task()?;
        if self.mode.editing_id() == Some(&task.id) {
            return None;
        }
        Some(task.id.clone())
    }

    /// Byte offset of the cursor within the input.
    fn cursor_byte(&self) -> usize {
        let input = self.input();
        input
            .char_indices()
            .nth(self.cursor_position)
            .map_or(input.len(), |(i, _)| i)
    }

    /// Insert a character at the cursor position.
    fn enter_char(&mut self, c: char) {
        let mut text = self.input().to_string();
        text.insert(self.cursor_byte(), c);
        self.cursor_position += 1;
        self.set_text(text);
    }

    /// Delete the character before the cursor.
    fn delete_char(&mut self) {
        if self.cursor_position == 0 {
            return;
        }
        self.cursor_position -= 1;
        let mut text = self.input().to_string();
        text.remove(self.cursor_byte());
        self.set_text(text);
    }

    /// Delete the character under the cursor.
    fn delete_char_forward(&mut self) {
        if self.cursor_position >= self.input().chars().count() {
            return;
        }
        let mut text = self.input().to_string();
        text.remove(self.cursor_byte());
        self.set_text(text);
    }

    fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn select_next(&mut self) {
        if self.selected + 1 < self.visible_tasks().len() {
            self.selected += 1;
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.visible_tasks().len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
