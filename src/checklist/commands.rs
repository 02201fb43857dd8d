//! UI-facing command and event types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::link::PromoteDetails;
use super::model::{ChecklistItem, ItemEdit};
use crate::error::ChecklistError;
use crate::tasks::model::TaskId;

/// Commands the UI can issue against one checklist.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ChecklistAction {
    /// Append a manual item.
    Add {
        text: String,
        #[serde(default)]
        due_date: Option<NaiveDate>,
    },
    Remove { id: u32 },
    Edit { id: u32, edit: ItemEdit },
    /// Flip the manual completion flag of an unlinked item.
    Toggle { id: u32 },
    Link { id: u32, task_id: TaskId },
    Unlink { id: u32 },
    /// Create a task from the item and link to it.
    Promote { id: u32, details: PromoteDetails },
}

/// Events broadcast to checklist subscribers (server → UI).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChecklistEvent {
    /// Full item list after a mutation or a sync pass that changed something.
    ItemsChanged {
        project_id: String,
        items: Vec<ChecklistItem>,
    },
    /// An item was linked; carries names for user feedback.
    ItemLinked {
        item_id: u32,
        item_text: String,
        task_id: TaskId,
        task_title: String,
    },
    ItemUnlinked { item_id: u32 },
    ItemPromoted { item_id: u32, task_id: TaskId },
    /// A linked task disappeared from the store. Sent once per link.
    LinkOrphaned { item_id: u32, task_id: TaskId },
}

/// Outcome of a dispatched command, ready for a toast or banner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResult {
    pub ok: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<ChecklistItem>,
}

impl CommandResult {
    pub fn success(message: impl Into<String>, item: Option<ChecklistItem>) -> Self {
        Self {
            ok: true,
            message: message.into(),
            item,
        }
    }

    pub fn failure(err: &ChecklistError) -> Self {
        Self {
            ok: false,
            message: err.to_string(),
            item: None,
        }
    }
}
