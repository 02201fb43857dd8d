//! Error types for checklist synchronization.

use crate::tasks::model::TaskId;

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Checklist error: {0}")]
    Checklist(#[from] ChecklistError),

    #[error("Task store error: {0}")]
    TaskStore(#[from] TaskStoreError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors raised by a task store backend.
#[derive(Debug, thiserror::Error)]
pub enum TaskStoreError {
    #[error("Task field '{field}' is required")]
    Validation { field: String },

    #[error("Task {0} not found")]
    NotFound(TaskId),

    #[error("Task store backend failed: {0}")]
    Backend(String),
}

/// Errors returned by checklist commands.
///
/// The display text is the human-readable reason the UI shows the user.
/// A command that returns one of these has left the checklist unchanged.
#[derive(Debug, thiserror::Error)]
pub enum ChecklistError {
    #[error("Invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("Checklist item {0} not found")]
    ItemNotFound(u32),

    #[error("Checklist item {0} is linked to a task and follows its status")]
    ItemLinked(u32),

    #[error("Checklist item {0} is not linked to a task")]
    ItemNotLinked(u32),

    #[error("Task {0} not found")]
    TaskNotFound(TaskId),

    #[error("Task {task_id} is already linked from checklist item {item_id}")]
    TaskAlreadyLinked { task_id: TaskId, item_id: u32 },

    #[error("Could not create a task for checklist item {item_id}: {source}")]
    PromoteFailed {
        item_id: u32,
        #[source]
        source: TaskStoreError,
    },

    #[error("Task store error: {0}")]
    Store(#[from] TaskStoreError),
}

impl ChecklistError {
    /// Shorthand for a validation failure on a named field.
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn promote_failure_names_item_and_cause() {
        let err = ChecklistError::PromoteFailed {
            item_id: 3,
            source: TaskStoreError::Validation {
                field: "assignee".into(),
            },
        };
        assert_eq!(
            err.to_string(),
            "Could not create a task for checklist item 3: Task field 'assignee' is required"
        );
    }

    #[test]
    fn store_error_converts_into_top_level() {
        let err: Error = TaskStoreError::NotFound(TaskId::from("t9")).into();
        assert!(matches!(err, Error::TaskStore(TaskStoreError::NotFound(_))));
        assert_eq!(err.to_string(), "Task store error: Task t9 not found");
    }
}
