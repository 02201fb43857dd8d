//! Task records and the task store boundary.

pub mod memory;
pub mod model;
pub mod store;

pub use memory::InMemoryTaskStore;
pub use model::{
    Task, TaskDraft, TaskEvent, TaskId, TaskPatch, TaskPriority, TaskSnapshot, TaskStatus,
};
pub use store::TaskStore;
