//! Integration tests for the store worker's command/event bridge.
//!
//! Sends [`TaskCommand`]s the way the TUI main loop does and checks the
//! [`TaskEvent`]s that come back.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use tasklist::store::memory::MemoryStore;
use tasklist::worker::{Outcome, SubmitKind, TaskCommand, TaskEvent, WorkerConfig, spawn_worker};
use tasklist_proto::task::{Task, TaskId};

const TIMEOUT: Duration = Duration::from_secs(5);

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

struct Bridge {
    store: Arc<MemoryStore>,
    tx: mpsc::Sender<TaskCommand>,
    rx: mpsc::Receiver<TaskEvent>,
}

impl Bridge {
    async fn start() -> Self {
        let store = Arc::new(MemoryStore::new());
        let (tx, rx) = spawn_worker(Arc::clone(&store), WorkerConfig::default())
            .await
            .unwrap();
        let mut bridge = Self { store, tx, rx };
        let first = bridge.list_where(|_| true).await;
        assert!(first.is_empty());
        bridge
    }

    async fn recv(&mut self) -> TaskEvent {
        tokio::time::timeout(TIMEOUT, self.rx.recv())
            .await
            .expect("timed out waiting for worker event")
            .expect("worker event channel closed")
    }

    async fn send(&self, cmd: TaskCommand) {
        self.tx.send(cmd).await.unwrap();
    }

    /// Skip events until a list delivery satisfies `pred`.
    async fn list_where(&mut self, pred: impl Fn(&[Task]) -> bool) -> Vec<Task> {
        loop {
            if let TaskEvent::ListUpdated(tasks) = self.recv().await
                && pred(tasks.as_slice())
            {
                return tasks;
            }
        }
    }

    /// Collect events until the next `Settled`, returning the non-list ones.
    async fn until_settled(&mut self) -> Vec<TaskEvent> {
        let mut seen = Vec::new();
        loop {
            let event = self.recv().await;
            match event {
                TaskEvent::ListUpdated(_) => {}
                TaskEvent::Settled { .. } => {
                    seen.push(event);
                    return seen;
                }
                other => seen.push(other),
            }
        }
    }

    async fn create(&mut self, text: &str) -> Vec<Task> {
        self.send(TaskCommand::Create {
            text: text.to_string(),
        })
        .await;
        let settled = self.until_settled().await;
        assert_eq!(
            settled,
            [TaskEvent::Settled {
                kind: SubmitKind::Create,
                outcome: Outcome::Succeeded,
            }]
        );
        self.list_where(|tasks| tasks.iter().any(|t| t.text == text))
            .await
    }
}

fn id_of(tasks: &[Task], text: &str) -> TaskId {
    tasks
        .iter()
        .find(|t| t.text == text)
        .map(|t| t.id.clone())
        .expect("task present")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_settles_and_delivers_list() {
    let mut bridge = Bridge::start().await;
    let tasks = bridge.create("Buy milk").await;

    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].text, "Buy milk");
    assert!(!tasks[0].completed);
}

#[tokio::test]
async fn duplicate_create_raises_notice() {
    let mut bridge = Bridge::start().await;
    bridge.create("Buy milk").await;

    bridge
        .send(TaskCommand::Create {
            text: "  BUY MILK ".to_string(),
        })
        .await;
    let events = bridge.until_settled().await;
    assert_eq!(
        events,
        [
            TaskEvent::Rejected("Task already exists!".to_string()),
            TaskEvent::Settled {
                kind: SubmitKind::Create,
                outcome: Outcome::Rejected,
            },
        ]
    );
    assert_eq!(bridge.store.len("todos").await, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn back_to_back_case_variant_creates_write_once() {
    for _ in 0..50 {
        let mut bridge = Bridge::start().await;
        bridge
            .send(TaskCommand::Create {
                text: "Buy milk".to_string(),
            })
            .await;
        bridge
            .send(TaskCommand::Create {
                text: "buy milk".to_string(),
            })
            .await;

        let first = bridge.until_settled().await;
        let second = bridge.until_settled().await;
        assert_eq!(
            first,
            [TaskEvent::Settled {
                kind: SubmitKind::Create,
                outcome: Outcome::Succeeded,
            }]
        );
        assert_eq!(second[0], TaskEvent::Rejected("Task already exists!".to_string()));
        assert_eq!(bridge.store.len("todos").await, 1);
    }
}

#[tokio::test]
async fn duplicate_edit_raises_notice() {
    let mut bridge = Bridge::start().await;
    bridge.create("Buy milk").await;
    let tasks = bridge.create("Walk dog").await;

    bridge
        .send(TaskCommand::Edit {
            id: id_of(&tasks, "Walk dog"),
            text: "buy milk".to_string(),
        })
        .await;
    let events = bridge.until_settled().await;
    assert_eq!(
        events,
        [
            TaskEvent::Rejected("Duplicate todo value!".to_string()),
            TaskEvent::Settled {
                kind: SubmitKind::Edit,
                outcome: Outcome::Rejected,
            },
        ]
    );
}

#[tokio::test]
async fn edit_and_toggle_arrive_as_list_updates() {
    let mut bridge = Bridge::start().await;
    let tasks = bridge.create("A").await;
    let id = id_of(&tasks, "A");

    bridge
        .send(TaskCommand::Edit {
            id: id.clone(),
            text: "A2".to_string(),
        })
        .await;
    bridge.list_where(|t| t.len() == 1 && t[0].text == "A2").await;

    bridge.send(TaskCommand::Toggle { id }).await;
    let tasks = bridge.list_where(|t| t.len() == 1 && t[0].completed).await;
    assert_eq!(tasks[0].text, "A2");
}

#[tokio::test]
async fn remove_delivers_pruned_list() {
    let mut bridge = Bridge::start().await;
    bridge.create("A").await;
    let tasks = bridge.create("B").await;

    bridge
        .send(TaskCommand::Remove {
            id: id_of(&tasks, "A"),
        })
        .await;
    let tasks = bridge
        .list_where(|t| t.iter().all(|task| task.text != "A"))
        .await;
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].text, "B");
}

#[tokio::test]
async fn store_failure_reports_and_releases_guard() {
    let mut bridge = Bridge::start().await;
    bridge.store.set_unavailable(true);

    bridge
        .send(TaskCommand::Create {
            text: "A".to_string(),
        })
        .await;
    let events = bridge.until_settled().await;
    assert_eq!(events.len(), 2);
    assert!(matches!(&events[0], TaskEvent::Failed(msg) if msg.starts_with("Error adding task")));
    assert_eq!(
        events[1],
        TaskEvent::Settled {
            kind: SubmitKind::Create,
            outcome: Outcome::Failed,
        }
    );
}

#[tokio::test]
async fn failed_toggle_and_remove_report_without_settling() {
    let mut bridge = Bridge::start().await;
    let tasks = bridge.create("A").await;
    let id = id_of(&tasks, "A");
    bridge.store.set_unavailable(true);

    bridge.send(TaskCommand::Toggle { id: id.clone() }).await;
    assert!(matches!(bridge.recv().await, TaskEvent::Failed(msg) if msg.starts_with("Error toggling task")));

    bridge.send(TaskCommand::Remove { id }).await;
    assert!(matches!(bridge.recv().await, TaskEvent::Failed(msg) if msg.starts_with("Error removing task")));
}

#[tokio::test]
async fn shutdown_closes_event_channel() {
    let mut bridge = Bridge::start().await;
    bridge.send(TaskCommand::Shutdown).await;

    let closed = tokio::time::timeout(TIMEOUT, bridge.rx.recv()).await.unwrap();
    assert!(closed.is_none());
}
