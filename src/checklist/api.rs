//! Checklist API — the facade the UI layer talks to.
//!
//! Every command takes the checklist write lock for its whole duration, so
//! commands against one checklist never interleave. A command that returns
//! `Err` has left the checklist exactly as it found it.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tokio::sync::{broadcast, Mutex, RwLock};
use tracing::{debug, info, warn};

use super::commands::{ChecklistAction, ChecklistEvent, CommandResult};
use super::link::{self, PromoteDetails};
use super::model::{Checklist, ChecklistItem, ItemEdit};
use super::sync::{self, OrphanedLink, SyncOutcome};
use super::view::{self, ProgressSummary, StatusGlyph};
use crate::config::{ChecklistConfig, OrphanPolicy};
use crate::error::ChecklistError;
use crate::tasks::model::{Task, TaskId};
use crate::tasks::store::TaskStore;

/// Result of a successful link.
#[derive(Debug, Clone)]
pub struct LinkOutcome {
    pub item: ChecklistItem,
    pub task_title: String,
}

/// Result of a successful promote.
#[derive(Debug, Clone)]
pub struct PromoteOutcome {
    pub item: ChecklistItem,
    pub task_id: TaskId,
}

/// One project's checklist bound to a task store.
pub struct ChecklistApi {
    store: Arc<dyn TaskStore>,
    config: ChecklistConfig,
    checklist: RwLock<Checklist>,
    /// Orphans seen by the previous sync pass. Locked only under the checklist lock.
    known_orphans: Mutex<Vec<OrphanedLink>>,
    tx: broadcast::Sender<ChecklistEvent>,
}

impl ChecklistApi {
    /// Empty checklist for `project_id`.
    pub fn new(
        project_id: impl Into<String>,
        store: Arc<dyn TaskStore>,
        config: ChecklistConfig,
    ) -> Arc<Self> {
        Self::with_checklist(Checklist::new(project_id), store, config)
    }

    /// Wrap an existing checklist.
    pub fn with_checklist(
        checklist: Checklist,
        store: Arc<dyn TaskStore>,
        config: ChecklistConfig,
    ) -> Arc<Self> {
        let (tx, _rx) = broadcast::channel(config.event_capacity);
        Arc::new(Self {
            store,
            config,
            checklist: RwLock::new(checklist),
            known_orphans: Mutex::new(Vec::new()),
            tx,
        })
    }

    pub fn store(&self) -> &Arc<dyn TaskStore> {
        &self.store
    }

    pub fn config(&self) -> &ChecklistConfig {
        &self.config
    }

    /// Subscribe to checklist events.
    pub fn subscribe(&self) -> broadcast::Receiver<ChecklistEvent> {
        self.tx.subscribe()
    }

    pub async fn project_id(&self) -> String {
        self.checklist.read().await.project_id.clone()
    }

    /// Current item list for rendering.
    pub async fn items(&self) -> Arc<Vec<ChecklistItem>> {
        Arc::clone(self.checklist.read().await.items())
    }

    pub async fn get_item(&self, id: u32) -> Option<ChecklistItem> {
        self.checklist.read().await.get(id).cloned()
    }

    // ── Item CRUD ───────────────────────────────────────────────────

    pub async fn add_item(
        &self,
        text: &str,
        due_date: Option<NaiveDate>,
    ) -> Result<ChecklistItem, ChecklistError> {
        let mut list = self.checklist.write().await;
        let item = list.add_item(text, due_date).inspect_err(|e| {
            warn!(error = %e, "Rejected checklist item");
        })?;
        info!(item_id = item.id, text = %item.text, "Checklist item added");
        self.publish_items(&list);
        Ok(item)
    }

    /// Add an item whose due date is typed in the configured display format.
    pub async fn add_item_from_display(
        &self,
        text: &str,
        due_date: &str,
    ) -> Result<ChecklistItem, ChecklistError> {
        let format = &self.config.date_display_format;
        let date = super::model::parse_display_date(due_date, format)?;
        self.add_item(text, Some(date)).await
    }

    pub async fn remove_item(&self, id: u32) -> Result<ChecklistItem, ChecklistError> {
        let mut list = self.checklist.write().await;
        let item = list.remove_item(id)?;
        info!(item_id = id, linked = item.is_linked(), "Checklist item removed");
        self.publish_items(&list);
        Ok(item)
    }

    pub async fn edit_item(
        &self,
        id: u32,
        edit: ItemEdit,
    ) -> Result<ChecklistItem, ChecklistError> {
        let mut list = self.checklist.write().await;
        let item = list.edit_item(id, edit).inspect_err(|e| {
            warn!(item_id = id, error = %e, "Rejected checklist edit");
        })?;
        self.publish_items(&list);
        Ok(item)
    }

    pub async fn toggle_manual(&self, id: u32) -> Result<ChecklistItem, ChecklistError> {
        let mut list = self.checklist.write().await;
        let item = list.toggle_manual(id).inspect_err(|e| {
            warn!(item_id = id, error = %e, "Rejected manual toggle");
        })?;
        debug!(item_id = id, completed = item.manual_completed, "Manual completion toggled");
        self.publish_items(&list);
        Ok(item)
    }

    // ── Link / unlink / promote ─────────────────────────────────────

    /// Link an unlinked item to an existing task.
    pub async fn link_to_task(
        &self,
        item_id: u32,
        task_id: &TaskId,
    ) -> Result<LinkOutcome, ChecklistError> {
        let mut list = self.checklist.write().await;
        link::unlinked_item(&list, item_id)?;

        let task = self
            .store
            .find_by_id(task_id)
            .await?
            .ok_or_else(|| ChecklistError::TaskNotFound(task_id.clone()))?;

        let item = link::link_item(&mut list, item_id, task_id, Some(&task), Utc::now())?;
        info!(
            item_id,
            task_id = %task_id,
            status = %task.status,
            "Checklist item linked to task"
        );

        self.publish_items(&list);
        let _ = self.tx.send(ChecklistEvent::ItemLinked {
            item_id,
            item_text: item.text.clone(),
            task_id: task_id.clone(),
            task_title: task.title.clone(),
        });

        Ok(LinkOutcome {
            item,
            task_title: task.title,
        })
    }

    /// Unlink an item, restoring manual control.
    pub async fn unlink_from_task(&self, item_id: u32) -> Result<ChecklistItem, ChecklistError> {
        let mut list = self.checklist.write().await;
        let item = link::unlink_item(&mut list, item_id, self.config.reset_manual_on_unlink)?;
        info!(
            item_id,
            manual_completed = item.manual_completed,
            "Checklist item unlinked"
        );

        self.publish_items(&list);
        let _ = self.tx.send(ChecklistEvent::ItemUnlinked { item_id });
        Ok(item)
    }

    /// Create a task from the item and link the item to it.
    ///
    /// The lock is held across the store call, and the item is only linked
    /// once the store has returned the new id.
    pub async fn promote_to_task(
        &self,
        item_id: u32,
        details: PromoteDetails,
    ) -> Result<PromoteOutcome, ChecklistError> {
        let mut list = self.checklist.write().await;
        let item = link::unlinked_item(&list, item_id)?;
        let draft = link::promote_draft(item, &list.project_id, details).inspect_err(|e| {
            warn!(item_id, error = %e, "Rejected promote");
        })?;

        let task_id = self.store.create(draft).await.map_err(|source| {
            warn!(item_id, error = %source, "Task creation failed; item stays unlinked");
            ChecklistError::PromoteFailed { item_id, source }
        })?;

        // The task exists now; a failed read only delays derivation to the next pass.
        let task = match self.store.find_by_id(&task_id).await {
            Ok(task) => task,
            Err(e) => {
                warn!(task_id = %task_id, error = %e, "Could not read back promoted task");
                None
            }
        };

        let item = link::link_item(&mut list, item_id, &task_id, task.as_ref(), Utc::now())?;
        info!(item_id, task_id = %task_id, "Checklist item promoted to task");

        self.publish_items(&list);
        let _ = self.tx.send(ChecklistEvent::ItemPromoted {
            item_id,
            task_id: task_id.clone(),
        });

        Ok(PromoteOutcome { item, task_id })
    }

    // ── Synchronization ─────────────────────────────────────────────

    /// Re-derive every linked item from the current store contents.
    pub async fn sync(&self) -> Result<SyncOutcome, ChecklistError> {
        let mut list = self.checklist.write().await;
        let snapshot = self.store.snapshot().await?;

        let mut outcome = sync::synchronize(list.items(), &snapshot, Utc::now());
        let mut changed = outcome.is_changed();
        list.replace_items(Arc::clone(&outcome.items));

        if self.config.orphan_policy == OrphanPolicy::Unlink && !outcome.orphaned.is_empty() {
            for orphan in &outcome.orphaned {
                link::unlink_item(&mut list, orphan.item_id, self.config.reset_manual_on_unlink)?;
                info!(
                    item_id = orphan.item_id,
                    task_id = %orphan.task_id,
                    "Unlinked item whose task was deleted"
                );
                let _ = self.tx.send(ChecklistEvent::ItemUnlinked {
                    item_id: orphan.item_id,
                });
            }
            outcome.items = Arc::clone(list.items());
            changed = true;
        } else {
            let known = self.known_orphans.lock().await;
            for orphan in outcome.orphaned.iter().filter(|o| !known.contains(o)) {
                warn!(
                    item_id = orphan.item_id,
                    task_id = %orphan.task_id,
                    "Linked task not found; keeping last derived state"
                );
                let _ = self.tx.send(ChecklistEvent::LinkOrphaned {
                    item_id: orphan.item_id,
                    task_id: orphan.task_id.clone(),
                });
            }
        }
        *self.known_orphans.lock().await = outcome.orphaned.clone();

        if changed {
            info!(
                changed = outcome.changed.len(),
                orphaned = outcome.orphaned.len(),
                "Checklist synchronized"
            );
            self.publish_items(&list);
        } else {
            debug!("Checklist sync pass changed nothing");
        }
        Ok(outcome)
    }

    /// Links whose task no longer exists in the store.
    pub async fn orphaned_links(&self) -> Result<Vec<OrphanedLink>, ChecklistError> {
        let snapshot = self.store.snapshot().await?;
        let list = self.checklist.read().await;
        Ok(list
            .items()
            .iter()
            .filter_map(|i| {
                let task_id = i.linked_task_id.as_ref()?;
                snapshot.get(task_id).is_none().then(|| OrphanedLink {
                    item_id: i.id,
                    task_id: task_id.clone(),
                })
            })
            .collect())
    }

    // ── Queries ─────────────────────────────────────────────────────

    pub async fn progress_summary(&self) -> ProgressSummary {
        view::progress_summary(self.checklist.read().await.items())
    }

    /// Presentation tier of an item as of today (UTC).
    pub fn status_glyph(&self, item: &ChecklistItem) -> StatusGlyph {
        view::status_glyph(item, Utc::now().date_naive())
    }

    /// The task behind a linked item, for the linked-task card.
    pub async fn linked_task(&self, item_id: u32) -> Result<Option<Task>, ChecklistError> {
        let task_id = {
            let list = self.checklist.read().await;
            let item = list.get(item_id).ok_or(ChecklistError::ItemNotFound(item_id))?;
            match &item.linked_task_id {
                Some(id) => id.clone(),
                None => return Ok(None),
            }
        };
        Ok(self.store.find_by_id(&task_id).await?)
    }

    /// Tasks of this project that no item links to yet, filtered by a
    /// case-insensitive match on title or assignee.
    pub async fn link_candidates(&self, query: &str) -> Result<Vec<Task>, ChecklistError> {
        let (project_id, linked): (String, Vec<TaskId>) = {
            let list = self.checklist.read().await;
            let linked = list
                .items()
                .iter()
                .filter_map(|i| i.linked_task_id.clone())
                .collect();
            (list.project_id.clone(), linked)
        };
        let needle = query.trim().to_lowercase();

        let predicate = move |t: &Task| {
            let in_project = t.project_id.as_deref().is_none_or(|p| p == project_id);
            let matches = needle.is_empty()
                || t.title.to_lowercase().contains(&needle)
                || t.assignee.to_lowercase().contains(&needle);
            in_project && matches && !linked.contains(&t.id)
        };
        Ok(self.store.list_matching(&predicate).await?)
    }

    // ── Command dispatch ────────────────────────────────────────────

    /// Run a UI command and turn its outcome into a user-facing result.
    pub async fn apply(&self, action: ChecklistAction) -> CommandResult {
        let result = match action {
            ChecklistAction::Add { text, due_date } => self
                .add_item(&text, due_date)
                .await
                .map(|item| CommandResult::success(format!("Added \"{}\"", item.text), Some(item))),
            ChecklistAction::Remove { id } => self
                .remove_item(id)
                .await
                .map(|item| CommandResult::success(format!("Removed \"{}\"", item.text), None)),
            ChecklistAction::Edit { id, edit } => self
                .edit_item(id, edit)
                .await
                .map(|item| CommandResult::success("Item updated", Some(item))),
            ChecklistAction::Toggle { id } => self
                .toggle_manual(id)
                .await
                .map(|item| CommandResult::success("Item updated", Some(item))),
            ChecklistAction::Link { id, task_id } => {
                self.link_to_task(id, &task_id).await.map(|out| {
                    CommandResult::success(
                        format!("\"{}\" linked to task \"{}\"", out.item.text, out.task_title),
                        Some(out.item),
                    )
                })
            }
            ChecklistAction::Unlink { id } => self.unlink_from_task(id).await.map(|item| {
                CommandResult::success(format!("\"{}\" unlinked", item.text), Some(item))
            }),
            ChecklistAction::Promote { id, details } => {
                self.promote_to_task(id, details).await.map(|out| {
                    CommandResult::success(
                        format!("Task created from \"{}\"", out.item.text),
                        Some(out.item),
                    )
                })
            }
        };

        result.unwrap_or_else(|e| CommandResult::failure(&e))
    }

    fn publish_items(&self, list: &Checklist) {
        // Ok if no subscribers yet
        let _ = self.tx.send(ChecklistEvent::ItemsChanged {
            project_id: list.project_id.clone(),
            items: Vec::clone(list.items()),
        });
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::error::TaskStoreError;
    use crate::tasks::memory::InMemoryTaskStore;
    use crate::tasks::model::{TaskDraft, TaskEvent, TaskPatch, TaskStatus};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn api_with(tasks: Vec<Task>) -> (Arc<ChecklistApi>, Arc<InMemoryTaskStore>) {
        let store = InMemoryTaskStore::with_tasks(tasks);
        let api = ChecklistApi::new("p1", store.clone(), ChecklistConfig::default());
        (api, store)
    }

    /// Store whose `create` always fails.
    struct FailingCreateStore(Arc<InMemoryTaskStore>);

    #[async_trait]
    impl TaskStore for FailingCreateStore {
        async fn create(&self, _draft: TaskDraft) -> Result<TaskId, TaskStoreError> {
            Err(TaskStoreError::Backend("disk full".into()))
        }
        async fn update(&self, id: &TaskId, patch: TaskPatch) -> Result<(), TaskStoreError> {
            self.0.update(id, patch).await
        }
        async fn delete(&self, id: &TaskId) -> Result<bool, TaskStoreError> {
            self.0.delete(id).await
        }
        async fn list(&self) -> Result<Vec<Task>, TaskStoreError> {
            self.0.list().await
        }
        async fn find_by_id(&self, id: &TaskId) -> Result<Option<Task>, TaskStoreError> {
            self.0.find_by_id(id).await
        }
        fn subscribe(&self) -> broadcast::Receiver<TaskEvent> {
            self.0.subscribe()
        }
    }

    #[tokio::test]
    async fn add_then_link_then_sync() {
        let (api, store) =
            api_with(vec![Task::new("t1", "Kickoff", "Ana").with_status(TaskStatus::Doing)]);
        let item = api.add_item("Kickoff call", Some(date(2025, 1, 10))).await.unwrap();

        let out = api.link_to_task(item.id, &TaskId::from("t1")).await.unwrap();
        assert_eq!(out.task_title, "Kickoff");
        assert_eq!(out.item.derived_status, Some(TaskStatus::Doing));
        assert!(!out.item.derived_completed);

        store
            .update(&TaskId::from("t1"), TaskPatch::status(TaskStatus::Done))
            .await
            .unwrap();
        let outcome = api.sync().await.unwrap();
        assert_eq!(outcome.changed, vec![item.id]);
        assert!(api.get_item(item.id).await.unwrap().derived_completed);
    }

    #[tokio::test]
    async fn sync_twice_keeps_identity() {
        let (api, _store) = api_with(vec![Task::new("t1", "Kickoff", "Ana")]);
        let item = api.add_item("Kickoff", Some(date(2025, 1, 10))).await.unwrap();
        api.link_to_task(item.id, &TaskId::from("t1")).await.unwrap();

        let before = api.items().await;
        let first = api.sync().await.unwrap();
        assert!(!first.is_changed());
        assert!(Arc::ptr_eq(&before, &api.items().await));
    }

    #[tokio::test]
    async fn link_unknown_task_fails() {
        let (api, _store) = api_with(vec![]);
        let item = api.add_item("Kickoff", Some(date(2025, 1, 10))).await.unwrap();
        let err = api.link_to_task(item.id, &TaskId::from("missing")).await.unwrap_err();
        assert!(matches!(err, ChecklistError::TaskNotFound(_)));
        assert!(!api.get_item(item.id).await.unwrap().is_linked());
    }

    #[tokio::test]
    async fn unlink_restores_toggle() {
        let (api, _store) = api_with(vec![Task::new("t1", "Kickoff", "Ana")]);
        let item = api.add_item("Kickoff", Some(date(2025, 1, 10))).await.unwrap();
        api.link_to_task(item.id, &TaskId::from("t1")).await.unwrap();
        assert!(api.toggle_manual(item.id).await.is_err());

        api.unlink_from_task(item.id).await.unwrap();
        assert!(api.toggle_manual(item.id).await.unwrap().manual_completed);
    }

    #[tokio::test]
    async fn promote_creates_and_links() {
        let (api, store) = api_with(vec![]);
        let item = api.add_item("Design review", Some(date(2025, 2, 1))).await.unwrap();

        let out = api
            .promote_to_task(item.id, PromoteDetails::for_assignee("Ana"))
            .await
            .unwrap();
        let task = store.find_by_id(&out.task_id).await.unwrap().unwrap();
        assert_eq!(task.title, "Design review");
        assert_eq!(task.assignee, "Ana");
        assert_eq!(task.due_date.unwrap().date_naive(), date(2025, 2, 1));
        assert_eq!(task.project_id.as_deref(), Some("p1"));
        assert_eq!(out.item.linked_task_id, Some(out.task_id.clone()));
        assert_eq!(out.item.derived_status, Some(TaskStatus::Todo));
    }

    #[tokio::test]
    async fn promote_without_assignee_creates_nothing() {
        let (api, store) = api_with(vec![]);
        let item = api.add_item("Design review", Some(date(2025, 2, 1))).await.unwrap();

        let err = api
            .promote_to_task(item.id, PromoteDetails::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ChecklistError::Validation { .. }));
        assert!(store.is_empty().await);
        assert!(!api.get_item(item.id).await.unwrap().is_linked());
    }

    #[tokio::test]
    async fn promote_store_failure_leaves_item_unlinked() {
        let inner = InMemoryTaskStore::new();
        let store = Arc::new(FailingCreateStore(inner));
        let api = ChecklistApi::new("p1", store, ChecklistConfig::default());
        let item = api.add_item("Design review", Some(date(2025, 2, 1))).await.unwrap();

        let err = api
            .promote_to_task(item.id, PromoteDetails::for_assignee("Ana"))
            .await
            .unwrap_err();
        assert!(matches!(err, ChecklistError::PromoteFailed { item_id, .. } if item_id == item.id));
        assert!(!api.get_item(item.id).await.unwrap().is_linked());
    }

    #[tokio::test]
    async fn orphan_policy_keep_stale() {
        let (api, store) =
            api_with(vec![Task::new("t1", "Kickoff", "Ana").with_status(TaskStatus::Review)]);
        let item = api.add_item("Kickoff", Some(date(2025, 1, 10))).await.unwrap();
        api.link_to_task(item.id, &TaskId::from("t1")).await.unwrap();

        store.delete(&TaskId::from("t1")).await.unwrap();
        let outcome = api.sync().await.unwrap();
        assert_eq!(outcome.orphaned.len(), 1);

        let kept = api.get_item(item.id).await.unwrap();
        assert!(kept.is_linked());
        assert_eq!(kept.derived_status, Some(TaskStatus::Review));
        assert_eq!(api.orphaned_links().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn orphaned_link_reported_once() {
        let (api, store) = api_with(vec![
            Task::new("t1", "Kickoff", "Ana"),
            Task::new("t2", "Invoice", "Rui"),
        ]);
        let item = api.add_item("Kickoff", Some(date(2025, 1, 10))).await.unwrap();
        api.link_to_task(item.id, &TaskId::from("t1")).await.unwrap();
        store.delete(&TaskId::from("t1")).await.unwrap();

        let mut rx = api.subscribe();
        api.sync().await.unwrap();
        match rx.try_recv().unwrap() {
            ChecklistEvent::LinkOrphaned { item_id, task_id } => {
                assert_eq!(item_id, item.id);
                assert_eq!(task_id, TaskId::from("t1"));
            }
            other => panic!("Expected LinkOrphaned, got {other:?}"),
        }

        // Unrelated task changes keep triggering passes; the orphan stays quiet.
        store
            .update(&TaskId::from("t2"), TaskPatch::status(TaskStatus::Doing))
            .await
            .unwrap();
        let outcome = api.sync().await.unwrap();
        assert_eq!(outcome.orphaned.len(), 1);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn orphan_policy_unlink() {
        let store = InMemoryTaskStore::with_tasks([Task::new("t1", "Kickoff", "Ana")]);
        let config = ChecklistConfig {
            orphan_policy: OrphanPolicy::Unlink,
            ..Default::default()
        };
        let api = ChecklistApi::new("p1", store.clone(), config);
        let item = api.add_item("Kickoff", Some(date(2025, 1, 10))).await.unwrap();
        api.link_to_task(item.id, &TaskId::from("t1")).await.unwrap();

        store.delete(&TaskId::from("t1")).await.unwrap();
        api.sync().await.unwrap();
        assert!(!api.get_item(item.id).await.unwrap().is_linked());
        assert!(api.orphaned_links().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn link_candidates_exclude_linked_and_other_projects() {
        let (api, _store) = api_with(vec![
            Task::new("t1", "Kickoff", "Ana").with_project("p1"),
            Task::new("t2", "Wireframes", "Rui").with_project("p1"),
            Task::new("t3", "Invoice", "Ana").with_project("p2"),
        ]);
        let item = api.add_item("Kickoff", Some(date(2025, 1, 10))).await.unwrap();
        api.link_to_task(item.id, &TaskId::from("t1")).await.unwrap();

        let all = api.link_candidates("").await.unwrap();
        assert_eq!(all.iter().map(|t| t.id.as_str()).collect::<Vec<_>>(), vec!["t2"]);

        assert!(api.link_candidates("ana").await.unwrap().is_empty());
        assert_eq!(api.link_candidates("WIRE").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn linked_task_card() {
        let (api, _store) = api_with(vec![Task::new("t1", "Kickoff", "Ana")]);
        let item = api.add_item("Kickoff", Some(date(2025, 1, 10))).await.unwrap();
        assert!(api.linked_task(item.id).await.unwrap().is_none());

        api.link_to_task(item.id, &TaskId::from("t1")).await.unwrap();
        assert_eq!(api.linked_task(item.id).await.unwrap().unwrap().assignee, "Ana");
    }

    #[tokio::test]
    async fn apply_reports_failures() {
        let (api, _store) = api_with(vec![]);
        let result = api
            .apply(ChecklistAction::Add {
                text: "".into(),
                due_date: Some(date(2025, 1, 10)),
            })
            .await;
        assert!(!result.ok);
        assert_eq!(result.message, "Invalid text: must not be empty");
        assert!(api.items().await.is_empty());

        let result = api
            .apply(ChecklistAction::Add {
                text: "Kickoff".into(),
                due_date: Some(date(2025, 1, 10)),
            })
            .await;
        assert!(result.ok);
        assert_eq!(result.item.unwrap().id, 1);
    }

    #[tokio::test]
    async fn add_from_display_date() {
        let (api, _store) = api_with(vec![]);
        let item = api.add_item_from_display("Kickoff", "10/01/2025").await.unwrap();
        assert_eq!(item.due_date, date(2025, 1, 10));
        assert!(api.add_item_from_display("Kickoff", "2025-01-10").await.is_err());
    }

    #[tokio::test]
    async fn mutations_broadcast_items() {
        let (api, _store) = api_with(vec![Task::new("t1", "Kickoff", "Ana")]);
        let mut rx = api.subscribe();

        let item = api.add_item("Kickoff", Some(date(2025, 1, 10))).await.unwrap();
        match rx.recv().await.unwrap() {
            ChecklistEvent::ItemsChanged { items, .. } => assert_eq!(items.len(), 1),
            other => panic!("Expected ItemsChanged, got {other:?}"),
        }

        api.link_to_task(item.id, &TaskId::from("t1")).await.unwrap();
        assert!(matches!(rx.recv().await.unwrap(), ChecklistEvent::ItemsChanged { .. }));
        match rx.recv().await.unwrap() {
            ChecklistEvent::ItemLinked { item_text, task_title, .. } => {
                assert_eq!(item_text, "Kickoff");
                assert_eq!(task_title, "Kickoff");
            }
            other => panic!("Expected ItemLinked, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn progress_summary_counts_links() {
        let (api, _store) = api_with(vec![Task::new("t1", "Kickoff", "Ana")]);
        let a = api.add_item("a", Some(date(2025, 1, 10))).await.unwrap();
        api.add_item("b", Some(date(2025, 1, 11))).await.unwrap();
        api.link_to_task(a.id, &TaskId::from("t1")).await.unwrap();

        let summary = api.progress_summary().await;
        assert_eq!(summary.linked_count, 1);
        assert_eq!(summary.total_count, 2);
    }
}
