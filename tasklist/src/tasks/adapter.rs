//! Task store adapter: the four task mutations as document writes.
//!
//! Duplicate checks run against the caller's current list before any store
//! call. They are client-side only; two clients creating the same text at
//! the same time can both succeed.

use std::sync::Arc;

use serde_json::Value;
use tasklist_proto::task::{FIELD_COMPLETED, FIELD_CREATED_AT, FIELD_SEQUENCE, FIELD_TEXT, Task, TaskId};

use super::{TaskError, has_duplicate};
use crate::store::{DocumentStore, DocumentWrite, FieldValue, StoreError};

/// Translates task intents into operations on a [`DocumentStore`].
pub struct TaskStoreAdapter<S: DocumentStore> {
    store: Arc<S>,
    collection: String,
    /// Creation counter written into each new document for diagnostics.
    counter: u64,
}

impl<S: DocumentStore> TaskStoreAdapter<S> {
    /// Creates an adapter writing into `collection`.
    pub fn new(store: Arc<S>, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
            counter: 1,
        }
    }

    /// Number of create attempts that reached the store, plus one.
    #[must_use]
    pub const fn counter(&self) -> u64 {
        self.counter
    }

    /// Creates a new, incomplete task.
    ///
    /// The new task is not returned; it arrives through the live query.
    ///
    /// # Errors
    ///
    /// - [`TaskError::TextEmpty`] if `text` is blank.
    /// - [`TaskError::AlreadyExists`] if a task in `existing` has the same
    ///   text ignoring case. The store is not contacted.
    /// - [`TaskError::Store`] if the write fails.
    pub async fn create(&mut self, text: &str, existing: &[Task]) -> Result<(), TaskError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(TaskError::TextEmpty);
        }
        if has_duplicate(existing, text, None) {
            tracing::info!(text, "create rejected: duplicate text");
            return Err(TaskError::AlreadyExists(text.to_string()));
        }

        let sequence = self.counter;
        self.counter += 1;

        let mut fields = DocumentWrite::new();
        fields.insert(FIELD_SEQUENCE.to_string(), Value::from(sequence).into());
        fields.insert(FIELD_TEXT.to_string(), Value::from(text).into());
        fields.insert(FIELD_COMPLETED.to_string(), Value::Bool(false).into());
        fields.insert(FIELD_CREATED_AT.to_string(), FieldValue::ServerTimestamp);

        let id = self.store.create(&self.collection, fields).await?;
        tracing::info!(task_id = %id, sequence, "task created");
        Ok(())
    }

    /// Physically deletes a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::Store`] if the delete fails, including
    /// [`StoreError::NotFound`] for an unknown id.
    pub async fn remove(&self, id: &TaskId) -> Result<(), TaskError> {
        self.store.delete(&self.collection, id).await?;
        tracing::info!(task_id = %id, "task removed");
        Ok(())
    }

    /// Replaces a task's text, leaving completion and creation time alone.
    ///
    /// Editing a task to its own text in a different case is allowed.
    ///
    /// # Errors
    ///
    /// - [`TaskError::TextEmpty`] if `text` is blank.
    /// - [`TaskError::DuplicateEdit`] if a *different* task in `existing`
    ///   has the same text ignoring case. No write happens.
    /// - [`TaskError::Store`] if the write fails.
    pub async fn edit(&self, id: &TaskId, text: &str, existing: &[Task]) -> Result<(), TaskError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(TaskError::TextEmpty);
        }
        if has_duplicate(existing, text, Some(id)) {
            tracing::info!(task_id = %id, text, "edit rejected: duplicate text");
            return Err(TaskError::DuplicateEdit(text.to_string()));
        }

        let mut fields = DocumentWrite::new();
        fields.insert(FIELD_TEXT.to_string(), Value::from(text).into());
        self.store.update(&self.collection, id, fields).await?;
        tracing::info!(task_id = %id, "task edited");
        Ok(())
    }

    /// Flips a task's completion flag and returns the new value.
    ///
    /// The current flag is read from the store rather than from any local
    /// copy. Read and write are separate calls: concurrent toggles from two
    /// clients race and the last write wins.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::Store`] if the read or write fails, or
    /// [`StoreError::NotFound`] if the task does not exist.
    pub async fn toggle_complete(&self, id: &TaskId) -> Result<bool, TaskError> {
        let doc = self
            .store
            .get(&self.collection, id)
            .await?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let completed = doc
            .get(FIELD_COMPLETED)
            .and_then(Value::as_bool)
            .unwrap_or(false);

        let mut fields = DocumentWrite::new();
        fields.insert(FIELD_COMPLETED.to_string(), Value::Bool(!completed).into());
        self.store.update(&self.collection, id, fields).await?;
        tracing::info!(task_id = %id, completed = !completed, "task toggled");
        Ok(!completed)
    }
}
