//! Checklist sync — project checklists kept consistent with linked tasks.

pub mod checklist;
pub mod config;
pub mod error;
pub mod logging;
pub mod tasks;
