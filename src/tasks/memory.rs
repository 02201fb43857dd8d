//! In-memory task store backed by a broadcast channel for change fan-out.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info};

use super::model::{Task, TaskDraft, TaskEvent, TaskId, TaskPatch};
use super::store::{validate_draft, TaskStore};
use crate::error::TaskStoreError;

/// Default broadcast channel capacity.
const DEFAULT_BROADCAST_CAPACITY: usize = 256;

/// Task store that keeps everything in a `HashMap`.
pub struct InMemoryTaskStore {
    tasks: RwLock<HashMap<TaskId, Task>>,
    tx: broadcast::Sender<TaskEvent>,
}

impl InMemoryTaskStore {
    /// Create an empty store.
    pub fn new() -> Arc<Self> {
        Self::with_tasks(Vec::<Task>::new())
    }

    /// Create a store pre-populated with tasks. No events are published for them.
    pub fn with_tasks(tasks: impl IntoIterator<Item = Task>) -> Arc<Self> {
        Self::with_capacity(tasks, DEFAULT_BROADCAST_CAPACITY)
    }

    /// Like [`with_tasks`](Self::with_tasks) with a custom event channel capacity.
    /// Subscribers that fall more than `capacity` events behind see `Lagged`.
    pub fn with_capacity(tasks: impl IntoIterator<Item = Task>, capacity: usize) -> Arc<Self> {
        let (tx, _rx) = broadcast::channel(capacity);
        Arc::new(Self {
            tasks: RwLock::new(tasks.into_iter().map(|t| (t.id.clone(), t)).collect()),
            tx,
        })
    }

    /// Insert (or replace) a fully specified task, keeping its id.
    pub async fn insert(&self, task: Task) {
        let msg = TaskEvent::TaskCreated { task: task.clone() };
        {
            let mut tasks = self.tasks.write().await;
            tasks.insert(task.id.clone(), task);
        }
        // Ok if nobody is subscribed
        let _ = self.tx.send(msg);
    }

    /// Number of tasks held.
    pub async fn len(&self) -> usize {
        self.tasks.read().await.len()
    }

    /// Check if the store is empty.
    pub async fn is_empty(&self) -> bool {
        self.tasks.read().await.is_empty()
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn create(&self, draft: TaskDraft) -> Result<TaskId, TaskStoreError> {
        validate_draft(&draft)?;

        let id = TaskId::generate();
        let task = draft.into_task(id.clone());
        info!(task_id = %id, title = %task.title, assignee = %task.assignee, "Task created");

        let msg = TaskEvent::TaskCreated { task: task.clone() };
        {
            let mut tasks = self.tasks.write().await;
            tasks.insert(id.clone(), task);
        }
        let _ = self.tx.send(msg);

        Ok(id)
    }

    async fn update(&self, id: &TaskId, patch: TaskPatch) -> Result<(), TaskStoreError> {
        let updated = {
            let mut tasks = self.tasks.write().await;
            let task = tasks
                .get_mut(id)
                .ok_or_else(|| TaskStoreError::NotFound(id.clone()))?;
            if !patch.apply_to(task) {
                debug!(task_id = %id, "Task update changed nothing");
                return Ok(());
            }
            task.clone()
        };

        info!(task_id = %id, status = %updated.status, "Task updated");
        let _ = self.tx.send(TaskEvent::TaskUpdated { task: updated });
        Ok(())
    }

    async fn delete(&self, id: &TaskId) -> Result<bool, TaskStoreError> {
        let removed = self.tasks.write().await.remove(id).is_some();
        if removed {
            info!(task_id = %id, "Task deleted");
            let _ = self.tx.send(TaskEvent::TaskDeleted { id: id.clone() });
        }
        Ok(removed)
    }

    async fn list(&self) -> Result<Vec<Task>, TaskStoreError> {
        let tasks = self.tasks.read().await;
        let mut all: Vec<Task> = tasks.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(all)
    }

    async fn find_by_id(&self, id: &TaskId) -> Result<Option<Task>, TaskStoreError> {
        Ok(self.tasks.read().await.get(id).cloned())
    }

    fn subscribe(&self) -> broadcast::Receiver<TaskEvent> {
        self.tx.subscribe()
    }
}
