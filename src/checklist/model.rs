//! Checklist data model — items, the per-project checklist, and its primitive mutators.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ChecklistError;
use crate::tasks::model::{TaskId, TaskStatus};

/// One row of a project's milestone checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    /// Unique within its checklist.
    pub id: u32,
    /// User-editable label.
    pub text: String,
    pub due_date: NaiveDate,
    /// Authoritative only while `linked_task_id` is unset.
    pub manual_completed: bool,
    /// Weak reference to a task in the task store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_task_id: Option<TaskId>,
    /// Copy of the linked task's status. Written only by the synchronizer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub derived_status: Option<TaskStatus>,
    /// Whether `derived_status` is a done state. Written only by the synchronizer.
    #[serde(default)]
    pub derived_completed: bool,
    /// When the derived fields last changed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_synced_at: Option<DateTime<Utc>>,
}

impl ChecklistItem {
    /// New unlinked item.
    pub fn new(id: u32, text: impl Into<String>, due_date: NaiveDate) -> Self {
        Self {
            id,
            text: text.into(),
            due_date,
            manual_completed: false,
            linked_task_id: None,
            derived_status: None,
            derived_completed: false,
            last_synced_at: None,
        }
    }

    pub fn is_linked(&self) -> bool {
        self.linked_task_id.is_some()
    }

    /// Completion as the UI should show it: derived while linked, manual otherwise.
    pub fn is_completed(&self) -> bool {
        if self.is_linked() {
            self.derived_completed
        } else {
            self.manual_completed
        }
    }

    /// Due date rendered with a chrono format string.
    pub fn display_due_date(&self, format: &str) -> String {
        self.due_date.format(format).to_string()
    }

    /// Due date in the task store's representation (midnight UTC).
    pub fn due_date_utc(&self) -> DateTime<Utc> {
        self.due_date.and_time(NaiveTime::MIN).and_utc()
    }

    /// Drop the link and every derived field.
    pub(crate) fn clear_link(&mut self) {
        self.linked_task_id = None;
        self.derived_status = None;
        self.derived_completed = false;
        self.last_synced_at = None;
    }
}

/// Parse a user-entered date with the configured display format.
pub fn parse_display_date(input: &str, format: &str) -> Result<NaiveDate, ChecklistError> {
    NaiveDate::parse_from_str(input.trim(), format).map_err(|e| {
        ChecklistError::validation(
            "due_date",
            format!("'{}' does not match {}: {}", input, format, e),
        )
    })
}

/// A user edit to one of an item's manual fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum ItemEdit {
    Text(String),
    DueDate(NaiveDate),
}

/// Ordered checklist items belonging to one project.
///
/// Items live behind an `Arc` so an unchanged list can be handed out
/// (and compared by identity) without copying.
#[derive(Debug, Clone)]
pub struct Checklist {
    pub project_id: String,
    items: Arc<Vec<ChecklistItem>>,
}

impl Checklist {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self::with_items(project_id, Vec::new())
    }

    pub fn with_items(project_id: impl Into<String>, items: Vec<ChecklistItem>) -> Self {
        Self {
            project_id: project_id.into(),
            items: Arc::new(items),
        }
    }

    /// Shared handle to the current item list.
    pub fn items(&self) -> &Arc<Vec<ChecklistItem>> {
        &self.items
    }

    pub fn get(&self, id: u32) -> Option<&ChecklistItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Swap in a new item list (used by the synchronizer).
    pub(crate) fn replace_items(&mut self, items: Arc<Vec<ChecklistItem>>) {
        self.items = items;
    }

    /// Next id: one past the largest existing id. `None` once `u32::MAX` is taken.
    pub fn next_id(&self) -> Option<u32> {
        self.items.iter().map(|i| i.id).max().unwrap_or(0).checked_add(1)
    }

    /// Append a new unlinked item.
    pub fn add_item(
        &mut self,
        text: &str,
        due_date: Option<NaiveDate>,
    ) -> Result<ChecklistItem, ChecklistError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ChecklistError::validation("text", "must not be empty"));
        }
        let due_date =
            due_date.ok_or_else(|| ChecklistError::validation("due_date", "is required"))?;
        let id = self
            .next_id()
            .ok_or_else(|| ChecklistError::validation("id", "checklist has no ids left"))?;

        let item = ChecklistItem::new(id, text, due_date);
        Arc::make_mut(&mut self.items).push(item.clone());
        Ok(item)
    }

    /// Remove an item whatever its link state. The linked task is not touched.
    pub fn remove_item(&mut self, id: u32) -> Result<ChecklistItem, ChecklistError> {
        let pos = self
            .items
            .iter()
            .position(|i| i.id == id)
            .ok_or(ChecklistError::ItemNotFound(id))?;
        Ok(Arc::make_mut(&mut self.items).remove(pos))
    }

    /// Edit text or due date. Linked items are read-only.
    pub fn edit_item(&mut self, id: u32, edit: ItemEdit) -> Result<ChecklistItem, ChecklistError> {
        let current = self.get(id).ok_or(ChecklistError::ItemNotFound(id))?;
        if current.is_linked() {
            return Err(ChecklistError::ItemLinked(id));
        }
        if let ItemEdit::Text(text) = &edit {
            if text.trim().is_empty() {
                return Err(ChecklistError::validation("text", "must not be empty"));
            }
        }

        let item = self.get_mut(id).ok_or(ChecklistError::ItemNotFound(id))?;
        match edit {
            ItemEdit::Text(text) => item.text = text.trim().to_string(),
            ItemEdit::DueDate(date) => item.due_date = date,
        }
        Ok(item.clone())
    }

    /// Flip the manual completion flag. Rejected while linked.
    pub fn toggle_manual(&mut self, id: u32) -> Result<ChecklistItem, ChecklistError> {
        let current = self.get(id).ok_or(ChecklistError::ItemNotFound(id))?;
        if current.is_linked() {
            return Err(ChecklistError::ItemLinked(id));
        }

        let item = self.get_mut(id).ok_or(ChecklistError::ItemNotFound(id))?;
        item.manual_completed = !item.manual_completed;
        Ok(item.clone())
    }

    /// Mutable access; clones the list first if it is shared.
    pub(crate) fn get_mut(&mut self, id: u32) -> Option<&mut ChecklistItem> {
        Arc::make_mut(&mut self.items).iter_mut().find(|i| i.id == id)
    }
}
