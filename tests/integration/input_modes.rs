//! Integration tests for the TUI's input handling.
//!
//! Drives [`App`] with key events and worker events, without a terminal,
//! checking the commands it emits and the state it shows.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use tasklist::app::{App, InputMode, PLACEHOLDER_EDIT, PLACEHOLDER_NEW};
use tasklist::worker::{Outcome, SubmitKind, TaskCommand, TaskEvent};
use tasklist_proto::task::{Task, TaskId, Timestamp};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn ctrl(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
}

fn typed(app: &mut App, text: &str) {
    for c in text.chars() {
        assert!(app.handle_key_event(key(KeyCode::Char(c))).is_none());
    }
}

fn task(id: &str, text: &str, completed: bool, ts: u64) -> Task {
    Task {
        id: TaskId::new(id),
        text: text.to_string(),
        completed,
        created_at: Timestamp::from_millis(ts),
    }
}

fn groceries() -> Vec<Task> {
    vec![
        task("1", "Buy milk", false, 1),
        task("2", "Buy bread", true, 2),
        task("3", "Walk dog", false, 3),
    ]
}

fn loaded() -> App {
    let mut app = App::new();
    app.apply_event(TaskEvent::ListUpdated(groceries()));
    app
}

fn visible(app: &App) -> Vec<&str> {
    app.visible_tasks().iter().map(|t| t.text.as_str()).collect()
}

fn settle(app: &mut App, kind: SubmitKind, outcome: Outcome) {
    app.apply_event(TaskEvent::Settled { kind, outcome });
}

// ---------------------------------------------------------------------------
// Loading and filtering
// ---------------------------------------------------------------------------

#[test]
fn loading_until_first_delivery() {
    let mut app = App::new();
    assert!(app.loading);
    app.apply_event(TaskEvent::ListUpdated(Vec::new()));
    assert!(!app.loading);
    assert!(app.visible_tasks().is_empty());
}

#[test]
fn filter_then_clear_restores_full_list() {
    let mut app = loaded();
    typed(&mut app, "buy");
    assert_eq!(visible(&app), ["Buy milk", "Buy bread"]);

    app.handle_key_event(key(KeyCode::Esc));
    assert_eq!(app.mode, InputMode::Browsing);
    assert_eq!(visible(&app), ["Buy milk", "Buy bread", "Walk dog"]);
}

#[test]
fn backspacing_to_empty_returns_to_browsing() {
    let mut app = loaded();
    typed(&mut app, "wa");
    assert_eq!(visible(&app), ["Walk dog"]);

    app.handle_key_event(key(KeyCode::Backspace));
    app.handle_key_event(key(KeyCode::Backspace));
    assert_eq!(app.mode, InputMode::Browsing);
    assert_eq!(visible(&app).len(), 3);
}

#[test]
fn filter_tracks_live_list_changes() {
    let mut app = loaded();
    typed(&mut app, "buy");

    let mut tasks = groceries();
    tasks.push(task("4", "Buy eggs", false, 4));
    app.apply_event(TaskEvent::ListUpdated(tasks));
    assert_eq!(visible(&app), ["Buy milk", "Buy bread", "Buy eggs"]);
}

#[test]
fn filter_with_no_match_is_empty() {
    let mut app = loaded();
    typed(&mut app, "zzz");
    assert!(app.visible_tasks().is_empty());
    assert!(app.selected_task().is_none());
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[test]
fn enter_creates_from_input() {
    let mut app = loaded();
    typed(&mut app, "Call mom");

    let cmd = app.handle_key_event(key(KeyCode::Enter));
    assert_eq!(
        cmd,
        Some(TaskCommand::Create {
            text: "Call mom".to_string()
        })
    );
    assert!(app.in_flight);

    settle(&mut app, SubmitKind::Create, Outcome::Succeeded);
    assert!(!app.in_flight);
    assert_eq!(app.input(), "");
    assert_eq!(app.placeholder(), PLACEHOLDER_NEW);
}

#[test]
fn input_is_ignored_while_in_flight() {
    let mut app = loaded();
    typed(&mut app, "x");
    app.handle_key_event(key(KeyCode::Enter));

    assert!(app.handle_key_event(key(KeyCode::Char('y'))).is_none());
    assert!(app.handle_key_event(key(KeyCode::Enter)).is_none());
    assert!(app.handle_key_event(ctrl('d')).is_none());
    assert_eq!(app.input(), "x");
}

#[test]
fn blank_enter_does_nothing() {
    let mut app = loaded();
    assert!(app.handle_key_event(key(KeyCode::Enter)).is_none());

    typed(&mut app, "   ");
    assert!(app.handle_key_event(key(KeyCode::Enter)).is_none());
    assert!(!app.in_flight);
}

#[test]
fn rejected_create_shows_notice_and_keeps_text() {
    let mut app = loaded();
    typed(&mut app, "buy milk");
    app.handle_key_event(key(KeyCode::Enter));

    app.apply_event(TaskEvent::Rejected("Task already exists!".to_string()));
    settle(&mut app, SubmitKind::Create, Outcome::Rejected);
    assert_eq!(app.notice.as_deref(), Some("Task already exists!"));
    assert_eq!(app.input(), "buy milk");

    // Keys other than Enter/Esc leave the notice up.
    app.handle_key_event(key(KeyCode::Char('q')));
    assert!(app.notice.is_some());
    assert_eq!(app.input(), "buy milk");

    app.handle_key_event(key(KeyCode::Enter));
    assert!(app.notice.is_none());
}

#[test]
fn failed_create_reports_in_status_bar() {
    let mut app = loaded();
    typed(&mut app, "A");
    app.handle_key_event(key(KeyCode::Enter));

    app.apply_event(TaskEvent::Failed("Error adding task: offline".to_string()));
    settle(&mut app, SubmitKind::Create, Outcome::Failed);
    assert!(!app.in_flight);
    assert_eq!(app.input(), "A");
    assert!(app.status_message.is_some());
}

// ---------------------------------------------------------------------------
// Edit
// ---------------------------------------------------------------------------

#[test]
fn edit_seeds_input_and_saves() {
    let mut app = loaded();
    app.handle_key_event(key(KeyCode::Down));
    app.handle_key_event(ctrl('e'));

    assert_eq!(app.input(), "Buy bread");
    assert_eq!(app.placeholder(), PLACEHOLDER_EDIT);
    assert_eq!(app.mode.editing_id(), Some(&TaskId::new("2")));

    typed(&mut app, "s");
    let cmd = app.handle_key_event(key(KeyCode::Enter));
    assert_eq!(
        cmd,
        Some(TaskCommand::Edit {
            id: TaskId::new("2"),
            text: "Buy breads".to_string(),
        })
    );

    settle(&mut app, SubmitKind::Edit, Outcome::Succeeded);
    assert_eq!(app.mode, InputMode::Browsing);
}

#[test]
fn editing_does_not_filter() {
    let mut app = loaded();
    app.handle_key_event(ctrl('e'));
    assert_eq!(visible(&app).len(), 3);
}

#[test]
fn edit_started_from_filter_edits_the_filtered_task() {
    let mut app = loaded();
    typed(&mut app, "walk");
    app.handle_key_event(ctrl('e'));

    assert_eq!(app.mode.editing_id(), Some(&TaskId::new("3")));
    assert_eq!(app.selected_task().map(|t| t.text.as_str()), Some("Walk dog"));
}

#[test]
fn esc_cancels_edit_without_command() {
    let mut app = loaded();
    app.handle_key_event(ctrl('e'));
    typed(&mut app, "!!!");

    assert!(app.handle_key_event(key(KeyCode::Esc)).is_none());
    assert_eq!(app.mode, InputMode::Browsing);
    assert_eq!(app.input(), "");
}

#[test]
fn pending_text_survives_an_edit() {
    let mut app = loaded();
    typed(&mut app, "walk");
    app.handle_key_event(ctrl('e'));
    typed(&mut app, "ing");
    app.handle_key_event(key(KeyCode::Enter));

    settle(&mut app, SubmitKind::Edit, Outcome::Succeeded);
    assert_eq!(app.input(), "walk");
    assert_eq!(visible(&app), ["Walk dog"]);

    // Enter now creates the restored text.
    assert_eq!(
        app.handle_key_event(key(KeyCode::Enter)),
        Some(TaskCommand::Create {
            text: "walk".to_string()
        })
    );
}

#[test]
fn retargeting_an_edit_keeps_pending_text() {
    let mut app = loaded();
    typed(&mut app, "b");
    app.handle_key_event(ctrl('e'));
    app.handle_key_event(key(KeyCode::Down));
    app.handle_key_event(ctrl('e'));
    assert_eq!(app.input(), "Buy bread");

    app.handle_key_event(key(KeyCode::Esc));
    assert_eq!(app.input(), "b");
}

#[test]
fn failure_notice_clears_on_next_success() {
    let mut app = loaded();
    typed(&mut app, "A");
    app.handle_key_event(key(KeyCode::Enter));
    app.apply_event(TaskEvent::Failed("Error adding task: offline".to_string()));
    settle(&mut app, SubmitKind::Create, Outcome::Failed);
    assert!(app.status_message.is_some());

    app.handle_key_event(key(KeyCode::Enter));
    settle(&mut app, SubmitKind::Create, Outcome::Succeeded);
    assert!(app.status_message.is_none());
}

#[test]
fn rejected_edit_still_leaves_edit_mode() {
    let mut app = loaded();
    app.handle_key_event(ctrl('e'));
    app.handle_key_event(key(KeyCode::Enter));

    app.apply_event(TaskEvent::Rejected("Duplicate todo value!".to_string()));
    settle(&mut app, SubmitKind::Edit, Outcome::Rejected);
    assert_eq!(app.mode, InputMode::Browsing);
    assert_eq!(app.notice.as_deref(), Some("Duplicate todo value!"));
}

#[test]
fn edited_task_cannot_be_removed_or_toggled() {
    let mut app = loaded();
    app.handle_key_event(ctrl('e'));
    assert!(app.handle_key_event(ctrl('d')).is_none());
    assert!(app.handle_key_event(ctrl('t')).is_none());

    // Other rows stay actionable.
    app.handle_key_event(key(KeyCode::Down));
    assert_eq!(
        app.handle_key_event(ctrl('t')),
        Some(TaskCommand::Toggle {
            id: TaskId::new("2")
        })
    );
}

// ---------------------------------------------------------------------------
// Toggle, remove, quit
// ---------------------------------------------------------------------------

#[test]
fn toggle_and_remove_target_selection() {
    let mut app = loaded();
    app.handle_key_event(key(KeyCode::Down));
    app.handle_key_event(key(KeyCode::Down));

    assert_eq!(
        app.handle_key_event(ctrl('t')),
        Some(TaskCommand::Toggle {
            id: TaskId::new("3")
        })
    );
    assert_eq!(
        app.handle_key_event(ctrl('d')),
        Some(TaskCommand::Remove {
            id: TaskId::new("3")
        })
    );
    // Toggle and remove do not take the in-flight guard.
    assert!(!app.in_flight);
}

#[test]
fn selection_clamps_when_list_shrinks() {
    let mut app = loaded();
    app.handle_key_event(key(KeyCode::Down));
    app.handle_key_event(key(KeyCode::Down));
    assert_eq!(app.selected, 2);

    app.apply_event(TaskEvent::ListUpdated(vec![task("1", "Buy milk", false, 1)]));
    assert_eq!(app.selected, 0);
}

#[test]
fn ctrl_c_quits_from_any_state() {
    let mut app = loaded();
    app.notice = Some("Task already exists!".to_string());
    app.in_flight = true;
    app.handle_key_event(ctrl('c'));
    assert!(app.should_quit);
}
