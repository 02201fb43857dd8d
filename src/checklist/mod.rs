//! Project checklists whose items can be linked to tasks.
//!
//! - `model` — items, the checklist, and manual-field mutators
//! - `sync` — derivation of linked items from a task snapshot
//! - `link` — link / unlink / promote transitions
//! - `view` — status glyphs and progress counts
//! - `api` — the facade the UI calls
//! - `watcher` — reactive sync loop driven by task store events

pub mod api;
pub mod commands;
pub mod link;
pub mod model;
pub mod sync;
pub mod view;
pub mod watcher;

pub use api::{ChecklistApi, LinkOutcome, PromoteOutcome};
pub use commands::{ChecklistAction, ChecklistEvent, CommandResult};
pub use link::PromoteDetails;
pub use model::{Checklist, ChecklistItem, ItemEdit};
pub use sync::{OrphanedLink, SyncOutcome};
pub use view::{ProgressSummary, StatusGlyph};
pub use watcher::spawn_sync_loop;
