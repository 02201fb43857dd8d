//! `TaskStore` trait — the checklist's only view of task storage.

use async_trait::async_trait;
use tokio::sync::broadcast;

use super::model::{Task, TaskDraft, TaskEvent, TaskId, TaskPatch, TaskSnapshot};
use crate::error::TaskStoreError;

/// Backend-agnostic task store.
///
/// Implementations publish a [`TaskEvent`] on every successful mutation so
/// that subscribers can re-derive state without polling.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Create a task from a draft and return its new id.
    ///
    /// Fails with [`TaskStoreError::Validation`] when `title` or `assignee` is empty.
    async fn create(&self, draft: TaskDraft) -> Result<TaskId, TaskStoreError>;

    /// Apply a partial update to an existing task.
    async fn update(&self, id: &TaskId, patch: TaskPatch) -> Result<(), TaskStoreError>;

    /// Delete a task. Returns false if it did not exist.
    async fn delete(&self, id: &TaskId) -> Result<bool, TaskStoreError>;

    /// Full list of tasks.
    async fn list(&self) -> Result<Vec<Task>, TaskStoreError>;

    /// Look up one task.
    async fn find_by_id(&self, id: &TaskId) -> Result<Option<Task>, TaskStoreError>;

    /// Subscribe to change notifications.
    fn subscribe(&self) -> broadcast::Receiver<TaskEvent>;

    /// Tasks matching a predicate.
    async fn list_matching(
        &self,
        predicate: &(dyn for<'t> Fn(&'t Task) -> bool + Send + Sync),
    ) -> Result<Vec<Task>, TaskStoreError> {
        Ok(self.list().await?.into_iter().filter(|t| predicate(t)).collect())
    }

    /// Id-indexed snapshot of every task.
    async fn snapshot(&self) -> Result<TaskSnapshot, TaskStoreError> {
        Ok(self.list().await?.into_iter().collect())
    }
}

/// Check the fields every task store requires before creating a task.
pub fn validate_draft(draft: &TaskDraft) -> Result<(), TaskStoreError> {
    if draft.title.trim().is_empty() {
        return Err(TaskStoreError::Validation { field: "title".into() });
    }
    if draft.assignee.trim().is_empty() {
        return Err(TaskStoreError::Validation { field: "assignee".into() });
    }
    Ok(())
}
