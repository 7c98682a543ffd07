//! In-process document store.
//!
//! [`MemoryStore`] keeps every collection in memory behind a
//! [`tokio::sync::RwLock`] and publishes the full contents of a collection
//! through a `watch` channel after each committed write, which is exactly
//! the live query contract of [`Subscription`].

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;
use tokio::sync::{RwLock, watch};

use tasklist_proto::task::TaskId;

use super::{
    Document, DocumentSnapshot, DocumentStore, DocumentWrite, FieldValue, StoreError,
    Subscription,
};

/// One collection: documents in insertion order plus its watchers.
struct Collection {
    docs: Vec<DocumentSnapshot>,
    tx: watch::Sender<Arc<[DocumentSnapshot]>>,
}

impl Collection {
    fn new() -> Self {
        let (tx, _rx) = watch::channel(Arc::from(Vec::new()));
        Self {
            docs: Vec::new(),
            tx,
        }
    }

    fn position(&self, id: &TaskId) -> Option<usize> {
        self.docs.iter().position(|d| d.id == *id)
    }

    fn publish(&self) {
        self.tx.send_replace(Arc::from(self.docs.clone()));
    }
}

struct Inner {
    collections: HashMap<String, Collection>,
    /// Last timestamp handed out, used to keep server time strictly increasing.
    last_timestamp: u64,
}

impl Inner {
    fn collection(&mut self, name: &str) -> &mut Collection {
        self.collections
            .entry(name.to_string())
            .or_insert_with(Collection::new)
    }

    fn next_timestamp(&mut self) -> u64 {
        let now = now_ms();
        self.last_timestamp = now.max(self.last_timestamp + 1);
        self.last_timestamp
    }

    fn resolve(&mut self, fields: DocumentWrite, into: &mut Document) {
        let mut stamp = None;
        for (name, value) in fields {
            let value = match value {
                FieldValue::Value(v) => v,
                FieldValue::ServerTimestamp => {
                    Value::from(*stamp.get_or_insert_with(|| self.next_timestamp()))
                }
            };
            into.insert(name, value);
        }
    }
}

/// Thread-safe in-memory [`DocumentStore`].
///
/// Identifiers are UUID v7 strings. `set_unavailable(true)` makes every
/// subsequent operation fail, which simulates a lost connection.
pub struct MemoryStore {
    inner: RwLock<Inner>,
    unavailable: AtomicBool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                collections: HashMap::new(),
                last_timestamp: 0,
            }),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Toggle simulated unavailability.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Insert a document verbatim under a caller-chosen id, bypassing
    /// server timestamps. Useful for seeding records that the server has not
    /// stamped yet.
    pub async fn insert_raw(&self, collection: &str, id: TaskId, fields: Document) {
        let mut inner = self.inner.write().await;
        let coll = inner.collection(collection);
        coll.docs.push(DocumentSnapshot { id, fields });
        coll.publish();
    }

    /// Number of documents currently stored in `collection`.
    pub async fn len(&self, collection: &str) -> usize {
        let inner = self.inner.read().await;
        inner.collections.get(collection).map_or(0, |c| c.docs.len())
    }

    fn ensure_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("memory store offline".to_string()))
        } else {
            Ok(())
        }
    }
}

impl DocumentStore for MemoryStore {
    async fn create(&self, collection: &str, fields: DocumentWrite) -> Result<TaskId, StoreError> {
        self.ensure_available()?;
        let mut inner = self.inner.write().await;
        let mut doc = Document::new();
        inner.resolve(fields, &mut doc);

        let id = TaskId::generate();
        let coll = inner.collection(collection);
        coll.docs.push(DocumentSnapshot {
            id: id.clone(),
            fields: doc,
        });
        coll.publish();
        drop(inner);

        tracing::debug!(collection, id = %id, "document created");
        Ok(id)
    }

    async fn delete(&self, collection: &str, id: &TaskId) -> Result<(), StoreError> {
        self.ensure_available()?;
        let mut inner = self.inner.write().await;
        let coll = inner.collection(collection);
        let Some(pos) = coll.position(id) else {
            return Err(StoreError::NotFound(id.to_string()));
        };
        coll.docs.remove(pos);
        coll.publish();
        drop(inner);

        tracing::debug!(collection, id = %id, "document deleted");
        Ok(())
    }

    async fn update(
        &self,
        collection: &str,
        id: &TaskId,
        fields: DocumentWrite,
    ) -> Result<(), StoreError> {
        self.ensure_available()?;
        let mut inner = self.inner.write().await;
        let pos = inner
            .collection(collection)
            .position(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        let mut doc = std::mem::take(&mut inner.collection(collection).docs[pos].fields);
        inner.resolve(fields, &mut doc);
        let coll = inner.collection(collection);
        coll.docs[pos].fields = doc;
        coll.publish();
        drop(inner);

        tracing::debug!(collection, id = %id, "document updated");
        Ok(())
    }

    async fn get(&self, collection: &str, id: &TaskId) -> Result<Option<Document>, StoreError> {
        self.ensure_available()?;
        let inner = self.inner.read().await;
        Ok(inner
            .collections
            .get(collection)
            .and_then(|c| c.docs.iter().find(|d| d.id == *id))
            .map(|d| d.fields.clone()))
    }

    async fn subscribe(&self, collection: &str, order_by: &str) -> Result<Subscription, StoreError> {
        self.ensure_available()?;
        let mut inner = self.inner.write().await;
        let rx = inner.collection(collection).tx.subscribe();
        drop(inner);

        tracing::debug!(collection, order_by, "live query opened");
        Ok(Subscription::new(rx, order_by))
    }
}

/// Current wall-clock time in epoch milliseconds.
fn now_ms() -> u64 {
    u64::try_from(
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis(),
    )
    .unwrap_or(u64::MAX)
}
