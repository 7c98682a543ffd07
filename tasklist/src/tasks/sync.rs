//! Live, ordered local copy of the task collection.

use tasklist_proto::task::{FIELD_CREATED_AT, Task, TaskDocument, TaskId};

use crate::store::{DocumentSnapshot, DocumentStore, StoreError, Subscription};

/// Keeps a local task list in step with the store's live query.
///
/// Every delivery replaces the list wholesale. Until the first delivery
/// arrives the list is considered loading.
pub struct TaskListSync {
    subscription: Subscription,
    tasks: Vec<Task>,
    loading: bool,
}

impl TaskListSync {
    /// Opens the live query over `collection`, ordered by creation time.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store refuses the subscription.
    pub async fn open<S: DocumentStore>(store: &S, collection: &str) -> Result<Self, StoreError> {
        let subscription = store.subscribe(collection, FIELD_CREATED_AT).await?;
        Ok(Self {
            subscription,
            tasks: Vec::new(),
            loading: true,
        })
    }

    /// Wait for the next delivery and apply it.
    ///
    /// Returns `None` if the store has gone away. Cancel safe.
    pub async fn next(&mut self) -> Option<&[Task]> {
        let docs = self.subscription.next().await?;
        self.apply(docs);
        Some(&self.tasks)
    }

    /// Apply a pending delivery without waiting. Returns whether one was applied.
    pub fn poll(&mut self) -> bool {
        match self.subscription.try_next() {
            Some(docs) => {
                self.apply(docs);
                true
            }
            None => false,
        }
    }

    /// Replace the local list with a delivered result set.
    pub fn apply(&mut self, docs: Vec<DocumentSnapshot>) {
        self.tasks = tasks_from_snapshot(docs);
        self.loading = false;
    }

    /// Drop `id` from the local list ahead of the next delivery.
    ///
    /// Returns whether a task was removed.
    pub fn prune(&mut self, id: &TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != *id);
        self.tasks.len() != before
    }

    /// The current ordered task list.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Whether no delivery has arrived yet.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }
}

/// Decode an ordered result set, skipping unstamped and malformed records.
#[must_use]
pub fn tasks_from_snapshot(docs: Vec<DocumentSnapshot>) -> Vec<Task> {
    docs.into_iter()
        .filter_map(|doc| match TaskDocument::from_fields(&doc.fields) {
            Ok(task) => task.into_task(doc.id),
            Err(e) => {
                tracing::warn!(id = %doc.id, error = %e, "skipping malformed task document");
                None
            }
        })
        .collect()
}
