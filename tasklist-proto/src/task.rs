//! The task entity and its document representation.
//!
//! Tasks are stored as schemaless JSON documents. The field names below are
//! the on-disk layout of the `todos` collection; [`TaskDocument`] decodes a
//! stored document back into a [`Task`].

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Document field holding the task text.
pub const FIELD_TEXT: &str = "todo";

/// Document field holding the completion flag.
pub const FIELD_COMPLETED: &str = "isCompleted";

/// Document field holding the server-assigned creation time.
pub const FIELD_CREATED_AT: &str = "createdAt";

/// Document field holding the client-side creation counter (diagnostic only).
pub const FIELD_SEQUENCE: &str = "task_id";

/// Opaque task identifier, assigned by the backing store on creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Wraps an identifier handed out by a store.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Mints a fresh time-ordered identifier (UUID v7).
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Returns the string form of this identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Milliseconds since the Unix epoch, as assigned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Creates a timestamp from epoch milliseconds.
    #[must_use]
    pub const fn from_millis(ms: u64) -> Self {
        Self(ms)
    }

    /// Returns the epoch milliseconds.
    #[must_use]
    pub const fn as_millis(self) -> u64 {
        self.0
    }
}

/// One entry of the to-do list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Store-assigned identifier.
    pub id: TaskId,
    /// User-entered text, unique case-insensitively.
    pub text: String,
    /// Whether the task has been marked complete.
    pub completed: bool,
    /// Server-assigned creation time; the list is ordered by it.
    pub created_at: Timestamp,
}

impl Task {
    /// Whether this task's text equals `text`, ignoring case and
    /// surrounding whitespace.
    #[must_use]
    pub fn same_text(&self, text: &str) -> bool {
        fold_case(&self.text) == fold_case(text)
    }

    /// Whether this task's text contains `query` as a case-insensitive
    /// substring.
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        self.text.to_lowercase().contains(&query.to_lowercase())
    }
}

/// Normalizes text for duplicate comparison.
#[must_use]
pub fn fold_case(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Errors raised when a stored document does not have the task layout.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// A field is missing or has the wrong JSON type.
    #[error("malformed task document: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// A stored task document, before the `createdAt` check.
///
/// `created_at` is `None` for a record the server has not stamped yet;
/// such a record is not part of the visible list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDocument {
    /// Task text.
    #[serde(rename = "todo")]
    pub text: String,
    /// Completion flag; absent means not completed.
    #[serde(rename = "isCompleted", default)]
    pub completed: bool,
    /// Server creation time.
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<Timestamp>,
}

impl TaskDocument {
    /// Decodes a raw JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Malformed`] if `todo` is missing or a field
    /// has an unexpected type.
    pub fn from_fields(fields: &serde_json::Map<String, serde_json::Value>) -> Result<Self, DecodeError> {
        Ok(serde_json::from_value(serde_json::Value::Object(fields.clone()))?)
    }

    /// Attaches the store identifier, dropping records with no creation time.
    #[must_use]
    pub fn into_task(self, id: TaskId) -> Option<Task> {
        let created_at = self.created_at?;
        Some(Task {
            id,
            text: self.text,
            completed: self.completed,
            created_at,
        })
    }
}
