//! Document store abstraction for `Tasklist`.
//!
//! Defines the [`DocumentStore`] trait that the task adapter writes through
//! and the [`Subscription`] live query that keeps the list in sync.
//! Concrete implementations include:
//! - [`memory::MemoryStore`]: in-process store used by the TUI and tests
//!
//! # Live query contract
//!
//! A subscription delivers the *entire* current contents of a collection on
//! every change, never a diff. Deliveries may be coalesced: a slow reader
//! only ever sees the latest set.

pub mod memory;

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::watch;

use tasklist_proto::task::TaskId;

/// A stored document: a JSON object of named fields.
pub type Document = serde_json::Map<String, Value>;

/// A value to write into a document field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Store this JSON value as-is.
    Value(Value),
    /// Replace with the server's current time (epoch ms) at commit.
    ServerTimestamp,
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

/// A set of field writes for a create or partial update.
pub type DocumentWrite = BTreeMap<String, FieldValue>;

/// A document together with its store-assigned identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSnapshot {
    /// Store-assigned identifier.
    pub id: TaskId,
    /// Document fields.
    pub fields: Document,
}

/// Errors that can occur during store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store cannot be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The addressed document does not exist.
    #[error("not found: {0}")]
    NotFound(String),
}

/// Async collection-scoped document store.
///
/// Any document database offering these primitives can back the task list.
/// Timestamps written via [`FieldValue::ServerTimestamp`] MUST be strictly
/// increasing across creates so that they can serve as a sort key.
pub trait DocumentStore: Send + Sync {
    /// Insert a new document and return its assigned identifier.
    fn create(
        &self,
        collection: &str,
        fields: DocumentWrite,
    ) -> impl std::future::Future<Output = Result<TaskId, StoreError>> + Send;

    /// Physically delete a document.
    ///
    /// Returns [`StoreError::NotFound`] if no such document exists.
    fn delete(
        &self,
        collection: &str,
        id: &TaskId,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Overwrite the given fields of a document, leaving the others intact.
    fn update(
        &self,
        collection: &str,
        id: &TaskId,
        fields: DocumentWrite,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Point read of a single document.
    fn get(
        &self,
        collection: &str,
        id: &TaskId,
    ) -> impl std::future::Future<Output = Result<Option<Document>, StoreError>> + Send;

    /// Open a live query over a collection ordered by `order_by` ascending.
    fn subscribe(
        &self,
        collection: &str,
        order_by: &str,
    ) -> impl std::future::Future<Output = Result<Subscription, StoreError>> + Send;
}

/// A standing query that yields the full ordered result set on each change.
///
/// Built by a store from the receiving half of a `watch` channel over the
/// collection contents. The first call to [`next`](Self::next) returns the
/// current contents immediately, even if empty.
pub struct Subscription {
    rx: watch::Receiver<Arc<[DocumentSnapshot]>>,
    order_by: String,
}

impl Subscription {
    /// Wraps a collection watcher. The current value counts as undelivered.
    #[must_use]
    pub fn new(mut rx: watch::Receiver<Arc<[DocumentSnapshot]>>, order_by: impl Into<String>) -> Self {
        rx.mark_changed();
        Self {
            rx,
            order_by: order_by.into(),
        }
    }

    /// Wait for the next delivery.
    ///
    /// Returns `None` once the store side has been dropped. Cancel safe.
    pub async fn next(&mut self) -> Option<Vec<DocumentSnapshot>> {
        self.rx.changed().await.ok()?;
        Some(self.take())
    }

    /// Return the pending delivery, if any, without waiting.
    pub fn try_next(&mut self) -> Option<Vec<DocumentSnapshot>> {
        if self.rx.has_changed().unwrap_or(false) {
            Some(self.take())
        } else {
            None
        }
    }

    fn take(&mut self) -> Vec<DocumentSnapshot> {
        let docs = self.rx.borrow_and_update().clone();
        let mut ordered = docs.to_vec();
        // Stable: ties keep insertion order.
        ordered.sort_by(|a, b| {
            compare_field(a.fields.get(&self.order_by), b.fields.get(&self.order_by))
        });
        ordered
    }
}

/// Orders field values: missing and null first, then booleans, numbers,
/// and strings. Values of other types compare equal.
fn compare_field(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(v: Option<&Value>) -> u8 {
        match v {
            None | Some(Value::Null) => 0,
            Some(Value::Bool(_)) => 1,
            Some(Value::Number(_)) => 2,
            Some(Value::String(_)) => 3,
            Some(_) => 4,
        }
    }

    match (a, b) {
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => match (x.as_u64(), y.as_u64()) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => x
                .as_f64()
                .partial_cmp(&y.as_f64())
                .unwrap_or(Ordering::Equal),
        },
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}
