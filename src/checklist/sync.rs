//! Synchronizer — re-derives linked items from a task store snapshot.
//!
//! Derived fields (`derived_status`, `derived_completed`, `last_synced_at`)
//! are written here and nowhere else. A pass only writes an item when one of
//! its derived values actually differs, and hands back the caller's own list
//! when nothing differs, so repeated passes over an unchanged store are free
//! and never churn timestamps.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::model::ChecklistItem;
use crate::tasks::model::{Task, TaskId, TaskSnapshot};

/// A linked item whose task no longer resolves in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrphanedLink {
    pub item_id: u32,
    pub task_id: TaskId,
}

/// Result of one synchronization pass.
#[derive(Debug, Clone)]
pub struct SyncOutcome {
    /// The new list, or the input list itself when nothing changed.
    pub items: Arc<Vec<ChecklistItem>>,
    /// Ids of items whose derived fields were rewritten.
    pub changed: Vec<u32>,
    /// Links that point at missing tasks. Left untouched.
    pub orphaned: Vec<OrphanedLink>,
}

impl SyncOutcome {
    pub fn is_changed(&self) -> bool {
        !self.changed.is_empty()
    }
}

/// Derive one item from its task. Returns `None` when the item is already
/// up to date.
pub fn derive_item(item: &ChecklistItem, task: &Task, now: DateTime<Utc>) -> Option<ChecklistItem> {
    let status = task.status;
    let completed = status.is_done();

    if item.derived_status == Some(status)
        && item.derived_completed == completed
        && item.last_synced_at.is_some()
    {
        return None;
    }

    let mut next = item.clone();
    next.derived_status = Some(status);
    next.derived_completed = completed;
    next.last_synced_at = Some(now);
    Some(next)
}

/// Run one pass over `items` against `snapshot`.
pub fn synchronize(
    items: &Arc<Vec<ChecklistItem>>,
    snapshot: &TaskSnapshot,
    now: DateTime<Utc>,
) -> SyncOutcome {
    let mut next: Option<Vec<ChecklistItem>> = None;
    let mut changed = Vec::new();
    let mut orphaned = Vec::new();

    for (idx, item) in items.iter().enumerate() {
        let Some(task_id) = &item.linked_task_id else {
            continue;
        };

        let Some(task) = snapshot.get(task_id) else {
            debug!(item_id = item.id, task_id = %task_id, "Linked task not found");
            orphaned.push(OrphanedLink {
                item_id: item.id,
                task_id: task_id.clone(),
            });
            continue;
        };

        if let Some(derived) = derive_item(item, task, now) {
            debug!(
                item_id = item.id,
                task_id = %task_id,
                status = %task.status,
                "Checklist item re-derived"
            );
            changed.push(item.id);
            next.get_or_insert_with(|| (**items).clone())[idx] = derived;
        }
    }

    let items = match next {
        Some(list) if list != **items => Arc::new(list),
        _ => Arc::clone(items),
    };

    SyncOutcome {
        items,
        changed,
        orphaned,
    }
}
