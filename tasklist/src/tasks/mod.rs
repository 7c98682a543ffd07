//! Task list operations on top of a [`DocumentStore`](crate::store::DocumentStore).
//!
//! [`TaskStoreAdapter`] is the only writer of task documents;
//! [`TaskListSync`] keeps a local ordered copy of the collection current by
//! consuming the store's live query.

pub mod adapter;
pub mod sync;

pub use adapter::TaskStoreAdapter;
pub use sync::TaskListSync;

use tasklist_proto::task::{Task, TaskId};
use thiserror::Error;

use crate::store::StoreError;

/// Collection that holds task documents.
pub const DEFAULT_COLLECTION: &str = "todos";

/// Alert shown when a new task duplicates an existing one.
pub const NOTICE_ALREADY_EXISTS: &str = "Task already exists!";

/// Alert shown when an edit would duplicate another task.
pub const NOTICE_DUPLICATE_EDIT: &str = "Duplicate todo value!";

/// Errors that can occur during task operations.
#[derive(Debug, Error)]
pub enum TaskError {
    /// Task text is empty after trimming.
    #[error("task text cannot be empty")]
    TextEmpty,
    /// A new task would duplicate an existing task's text.
    #[error("task already exists: {0}")]
    AlreadyExists(String),
    /// An edit would duplicate a different task's text.
    #[error("duplicate task text: {0}")]
    DuplicateEdit(String),
    /// The backing store rejected the operation.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl TaskError {
    /// The user-facing alert for validation failures, if this is one.
    #[must_use]
    pub const fn notice(&self) -> Option<&'static str> {
        match self {
            Self::AlreadyExists(_) => Some(NOTICE_ALREADY_EXISTS),
            Self::DuplicateEdit(_) => Some(NOTICE_DUPLICATE_EDIT),
            Self::TextEmpty | Self::Store(_) => None,
        }
    }
}

/// Whether any task other than `except` has `text`, ignoring case.
#[must_use]
pub fn has_duplicate(tasks: &[Task], text: &str, except: Option<&TaskId>) -> bool {
    tasks
        .iter()
        .filter(|t| except != Some(&t.id))
        .any(|t| t.same_text(text))
}

/// The subsequence of `tasks` whose text contains `query`, ignoring case.
///
/// An empty query matches everything.
#[must_use]
pub fn filter_tasks<'a>(tasks: &'a [Task], query: &str) -> Vec<&'a Task> {
    if query.is_empty() {
        return tasks.iter().collect();
    }
    tasks.iter().filter(|t| t.matches(query)).collect()
}
