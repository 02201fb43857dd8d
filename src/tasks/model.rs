//! Task data model — records, drafts, patches, and change events.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a task in the task store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Generate a fresh random id.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Workflow status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Todo,
    Doing,
    Review,
    #[serde(alias = "completed")]
    Done,
}

impl TaskStatus {
    /// Whether this status counts as finished work.
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Whether work has started but not finished.
    pub fn is_in_progress(&self) -> bool {
        matches!(self, Self::Doing | Self::Review)
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Todo => "todo",
            Self::Doing => "doing",
            Self::Review => "review",
            Self::Done => "done",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "todo" => Ok(Self::Todo),
            "doing" => Ok(Self::Doing),
            "review" => Ok(Self::Review),
            "done" | "completed" => Ok(Self::Done),
            _ => Err(format!("Unknown task status: {}", s)),
        }
    }
}

/// Task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

/// A task record as held by the task store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub assignee: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Create a `todo` task with the given id.
    pub fn new(
        id: impl Into<TaskId>,
        title: impl Into<String>,
        assignee: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            status: TaskStatus::Todo,
            priority: TaskPriority::default(),
            assignee: assignee.into(),
            due_date: None,
            project_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Builder: set status.
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Builder: set priority.
    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Builder: set due date.
    pub fn with_due_date(mut self, due: DateTime<Utc>) -> Self {
        self.due_date = Some(due);
        self
    }

    /// Builder: set owning project.
    pub fn with_project(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }
}

/// Everything needed to create a task; the store assigns the id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskDraft {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    #[serde(default)]
    pub priority: TaskPriority,
    pub assignee: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
}

impl TaskDraft {
    /// Materialize the draft into a task with the given id.
    pub fn into_task(self, id: TaskId) -> Task {
        let now = Utc::now();
        Task {
            id,
            title: self.title,
            description: self.description,
            status: self.status.unwrap_or(TaskStatus::Todo),
            priority: self.priority,
            assignee: self.assignee,
            due_date: self.due_date,
            project_id: self.project_id,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(default)]
    pub priority: Option<TaskPriority>,
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
}

impl TaskPatch {
    /// Patch that only changes the status.
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    /// Apply the patch in place. Returns whether any field changed.
    pub fn apply_to(&self, task: &mut Task) -> bool {
        let before = task.clone();
        if let Some(t) = &self.title {
            task.title = t.clone();
        }
        if let Some(s) = self.status {
            task.status = s;
        }
        if let Some(p) = self.priority {
            task.priority = p;
        }
        if let Some(a) = &self.assignee {
            task.assignee = a.clone();
        }
        if let Some(dd) = self.due_date {
            task.due_date = Some(dd);
        }
        let changed = *task != before;
        if changed {
            task.updated_at = Utc::now();
        }
        changed
    }
}

/// Change notifications published by a task store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaskEvent {
    TaskCreated { task: Task },
    TaskUpdated { task: Task },
    TaskDeleted { id: TaskId },
}

impl TaskEvent {
    /// Id of the task the event is about.
    pub fn task_id(&self) -> &TaskId {
        match self {
            Self::TaskCreated { task } | Self::TaskUpdated { task } => &task.id,
            Self::TaskDeleted { id } => id,
        }
    }
}

/// Immutable, id-indexed view of the task store at one point in time.
#[derive(Debug, Clone, Default)]
pub struct TaskSnapshot {
    tasks: HashMap<TaskId, Task>,
}

impl TaskSnapshot {
    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.get(id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values()
    }
}

impl FromIterator<Task> for TaskSnapshot {
    fn from_iter<I: IntoIterator<Item = Task>>(iter: I) -> Self {
        Self {
            tasks: iter.into_iter().map(|t| (t.id.clone(), t)).collect(),
        }
    }
}
