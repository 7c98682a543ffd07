//! Store worker bridging the TUI to the async task stack.
//!
//! The TUI event loop is synchronous (crossterm polling). This module spawns
//! one background tokio task that owns a [`TaskStoreAdapter`] and a
//! [`TaskListSync`], and talks to the main thread over channels.
//!
//! # Architecture
//!
//! ```text
//! TUI (main thread)  ←── TaskEvent ───  store worker (tokio task)
//!                     ─── TaskCommand →
//! ```
//!
//! Commands are executed one at a time in arrival order. Every `Create` and
//! `Edit` command is answered by exactly one [`TaskEvent::Settled`], which is
//! what releases the UI's in-flight guard. Store failures are logged and
//! reported, never retried.

use std::sync::Arc;

use tokio::sync::mpsc;

use tasklist_proto::task::{Task, TaskId};

use crate::store::{DocumentStore, StoreError};
use crate::tasks::{DEFAULT_COLLECTION, TaskError, TaskListSync, TaskStoreAdapter};

/// Commands sent from the TUI main loop to the store worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskCommand {
    /// Create a task with the given text.
    Create {
        /// Text as typed.
        text: String,
    },
    /// Replace the text of an existing task.
    Edit {
        /// Task being edited.
        id: TaskId,
        /// New text as typed.
        text: String,
    },
    /// Delete a task.
    Remove {
        /// Task to delete.
        id: TaskId,
    },
    /// Flip a task's completion flag.
    Toggle {
        /// Task to toggle.
        id: TaskId,
    },
    /// Stop the worker.
    Shutdown,
}

/// Which guarded submit a [`TaskEvent::Settled`] answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitKind {
    /// A create submit.
    Create,
    /// An edit submit.
    Edit,
}

/// How a submit ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The write committed.
    Succeeded,
    /// Validation rejected it before any write.
    Rejected,
    /// The store failed.
    Failed,
}

/// Events sent from the store worker to the TUI main loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskEvent {
    /// The full ordered task list, after a delivery or an optimistic prune.
    ListUpdated(Vec<Task>),
    /// A create or edit finished.
    Settled {
        /// Which submit finished.
        kind: SubmitKind,
        /// How it ended.
        outcome: Outcome,
    },
    /// A validation failure to show as a blocking alert.
    Rejected(String),
    /// A store failure, already logged.
    Failed(String),
}

/// Configuration for the store worker.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Collection holding task documents.
    pub collection: String,
    /// Capacity of the command and event channels.
    pub channel_capacity: usize,
}

/// Default channel capacity for commands and events.
const DEFAULT_CHANNEL_CAPACITY: usize = 64;

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            collection: DEFAULT_COLLECTION.to_string(),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

/// Spawn the store worker and return its channel handles.
///
/// Opens the live query before returning so that a refused subscription is
/// reported to the caller rather than lost in the background.
///
/// # Errors
///
/// Returns [`StoreError`] if the live query cannot be opened.
pub async fn spawn_worker<S>(
    store: Arc<S>,
    config: WorkerConfig,
) -> Result<(mpsc::Sender<TaskCommand>, mpsc::Receiver<TaskEvent>), StoreError>
where
    S: DocumentStore + 'static,
{
    let sync = TaskListSync::open(store.as_ref(), &config.collection).await?;
    let adapter = TaskStoreAdapter::new(store, config.collection.clone());

    let (cmd_tx, cmd_rx) = mpsc::channel(config.channel_capacity);
    let (evt_tx, evt_rx) = mpsc::channel(config.channel_capacity);

    tokio::spawn(run(adapter, sync, cmd_rx, evt_tx));

    tracing::info!(collection = %config.collection, "store worker started");
    Ok((cmd_tx, evt_rx))
}

/// Worker loop: forward deliveries, execute commands.
async fn run<S: DocumentStore>(
    mut adapter: TaskStoreAdapter<S>,
    mut sync: TaskListSync,
    mut cmd_rx: mpsc::Receiver<TaskCommand>,
    evt_tx: mpsc::Sender<TaskEvent>,
) {
    let mut live = true;

    loop {
        tokio::select! {
            delivery = sync.next(), if live => {
                if let Some(tasks) = delivery {
                    let tasks = tasks.to_vec();
                    if evt_tx.send(TaskEvent::ListUpdated(tasks)).await.is_err() {
                        break;
                    }
                } else {
                    tracing::warn!("live query closed by store");
                    live = false;
                }
            }
            cmd = cmd_rx.recv() => {
                let Some(cmd) = cmd else { break };
                if cmd == TaskCommand::Shutdown {
                    break;
                }
                let events = execute(&mut adapter, &mut sync, cmd).await;
                for event in events {
                    if evt_tx.send(event).await.is_err() {
                        tracing::info!("store worker stopped: UI gone");
                        return;
                    }
                }
            }
        }
    }

    tracing::info!("store worker stopped");
}

/// Run one command and collect the events it produces.
///
/// A delivery still pending from an earlier write is applied first, so
/// duplicate checks and the remove prune see every completed write. The
/// applied list leads the returned events.
async fn execute<S: DocumentStore>(
    adapter: &mut TaskStoreAdapter<S>,
    sync: &mut TaskListSync,
    cmd: TaskCommand,
) -> Vec<TaskEvent> {
    let mut events = Vec::new();
    if sync.poll() {
        events.push(TaskEvent::ListUpdated(sync.tasks().to_vec()));
    }
    events.extend(run_command(adapter, sync, cmd).await);
    events
}

async fn run_command<S: DocumentStore>(
    adapter: &mut TaskStoreAdapter<S>,
    sync: &mut TaskListSync,
    cmd: TaskCommand,
) -> Vec<TaskEvent> {
    match cmd {
        TaskCommand::Create { text } => {
            let result = adapter.create(&text, sync.tasks()).await;
            settle(SubmitKind::Create, result)
        }
        TaskCommand::Edit { id, text } => {
            let result = adapter.edit(&id, &text, sync.tasks()).await;
            settle(SubmitKind::Edit, result)
        }
        TaskCommand::Remove { id } => match adapter.remove(&id).await {
            Ok(()) => {
                sync.prune(&id);
                vec![TaskEvent::ListUpdated(sync.tasks().to_vec())]
            }
            Err(e) => vec![failed("removing", &id, &e)],
        },
        TaskCommand::Toggle { id } => match adapter.toggle_complete(&id).await {
            Ok(_) => Vec::new(),
            Err(e) => vec![failed("toggling", &id, &e)],
        },
        TaskCommand::Shutdown => Vec::new(),
    }
}

/// Map a submit result to the events that answer it.
fn settle(kind: SubmitKind, result: Result<(), TaskError>) -> Vec<TaskEvent> {
    match result {
        Ok(()) => vec![TaskEvent::Settled {
            kind,
            outcome: Outcome::Succeeded,
        }],
        Err(e) => {
            if let Some(notice) = e.notice() {
                vec![
                    TaskEvent::Rejected(notice.to_string()),
                    TaskEvent::Settled {
                        kind,
                        outcome: Outcome::Rejected,
                    },
                ]
            } else {
                let what = match kind {
                    SubmitKind::Create => "adding",
                    SubmitKind::Edit => "updating",
                };
                tracing::error!(error = %e, "error {what} task");
                vec![
                    TaskEvent::Failed(format!("Error {what} task: {e}")),
                    TaskEvent::Settled {
                        kind,
                        outcome: Outcome::Failed,
                    },
                ]
            }
        }
    }
}

fn failed(what: &str, id: &TaskId, e: &TaskError) -> TaskEvent {
    tracing::error!(task_id = %id, error = %e, "error {what} task");
    TaskEvent::Failed(format!("Error {what} task: {e}"))
}
