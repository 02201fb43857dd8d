//! Link, unlink, and promote transitions on a checklist.
//!
//! These are the synchronous halves of the operations; `ChecklistApi` wraps
//! them with task store calls.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::model::{Checklist, ChecklistItem};
use super::sync::derive_item;
use crate::error::ChecklistError;
use crate::tasks::model::{Task, TaskDraft, TaskId, TaskPriority, TaskStatus};

/// Task fields supplied by the quick-task form when promoting an item.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromoteDetails {
    /// Required.
    pub assignee: String,
    #[serde(default)]
    pub priority: TaskPriority,
    /// Defaults to the item text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Defaults to the item due date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PromoteDetails {
    pub fn for_assignee(assignee: impl Into<String>) -> Self {
        Self {
            assignee: assignee.into(),
            ..Default::default()
        }
    }
}

/// Look up an item that must exist and be unlinked.
pub fn unlinked_item(list: &Checklist, item_id: u32) -> Result<&ChecklistItem, ChecklistError> {
    let item = list.get(item_id).ok_or(ChecklistError::ItemNotFound(item_id))?;
    if item.is_linked() {
        return Err(ChecklistError::ItemLinked(item_id));
    }
    Ok(item)
}

/// Item of this checklist, other than `except`, already linked to `task_id`.
pub fn item_linked_to<'a>(
    list: &'a Checklist,
    task_id: &TaskId,
    except: u32,
) -> Option<&'a ChecklistItem> {
    list.items()
        .iter()
        .find(|i| i.id != except && i.linked_task_id.as_ref() == Some(task_id))
}

/// Link an unlinked item to `task_id` and derive it right away from `task`
/// when one is given.
pub fn link_item(
    list: &mut Checklist,
    item_id: u32,
    task_id: &TaskId,
    task: Option<&Task>,
    now: DateTime<Utc>,
) -> Result<ChecklistItem, ChecklistError> {
    unlinked_item(list, item_id)?;
    if let Some(other) = item_linked_to(list, task_id, item_id) {
        return Err(ChecklistError::TaskAlreadyLinked {
            task_id: task_id.clone(),
            item_id: other.id,
        });
    }

    let item = list.get_mut(item_id).ok_or(ChecklistError::ItemNotFound(item_id))?;
    item.linked_task_id = Some(task_id.clone());
    if let Some(derived) = task.and_then(|t| derive_item(item, t, now)) {
        *item = derived;
    }
    Ok(item.clone())
}

/// Clear the link and derived fields, handing completion back to the manual flag.
pub fn unlink_item(
    list: &mut Checklist,
    item_id: u32,
    reset_manual: bool,
) -> Result<ChecklistItem, ChecklistError> {
    let current = list.get(item_id).ok_or(ChecklistError::ItemNotFound(item_id))?;
    if !current.is_linked() {
        return Err(ChecklistError::ItemNotLinked(item_id));
    }

    let item = list.get_mut(item_id).ok_or(ChecklistError::ItemNotFound(item_id))?;
    item.clear_link();
    if reset_manual {
        item.manual_completed = false;
    }
    Ok(item.clone())
}

/// Build the task draft for promoting `item`.
///
/// Fails with a validation error when no assignee is given; nothing is
/// created in that case.
pub fn promote_draft(
    item: &ChecklistItem,
    project_id: &str,
    details: PromoteDetails,
) -> Result<TaskDraft, ChecklistError> {
    let assignee = details.assignee.trim();
    if assignee.is_empty() {
        return Err(ChecklistError::validation("assignee", "is required to create a task"));
    }

    let title = details
        .title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| item.text.clone());
    let due_date = details
        .due_date
        .map(|d| d.and_time(NaiveTime::MIN).and_utc())
        .unwrap_or_else(|| item.due_date_utc());

    Ok(TaskDraft {
        title,
        description: details.description,
        status: Some(TaskStatus::Todo),
        priority: details.priority,
        assignee: assignee.to_string(),
        due_date: Some(due_date),
        project_id: Some(project_id.to_string()),
    })
}
