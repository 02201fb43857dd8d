//! Read-only projections of a checklist for display.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::model::ChecklistItem;

/// Presentation tier of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusGlyph {
    Completed,
    InProgress,
    Overdue,
    NotStarted,
}

impl std::fmt::Display for StatusGlyph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Completed => "completed",
            Self::InProgress => "in_progress",
            Self::Overdue => "overdue",
            Self::NotStarted => "not_started",
        };
        write!(f, "{s}")
    }
}

/// Tier for `item` as of `today`.
///
/// Overdue applies to items that are not effectively completed (the derived
/// state while linked, the manual flag otherwise) once the due date is
/// strictly in the past.
pub fn status_glyph(item: &ChecklistItem, today: NaiveDate) -> StatusGlyph {
    if item.is_completed() {
        return StatusGlyph::Completed;
    }
    if item.due_date < today {
        return StatusGlyph::Overdue;
    }
    match item.derived_status {
        Some(status) if item.is_linked() && status.is_in_progress() => StatusGlyph::InProgress,
        _ => StatusGlyph::NotStarted,
    }
}

/// Counts shown in the checklist header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProgressSummary {
    pub linked_count: usize,
    pub completed_count: usize,
    pub total_count: usize,
}

pub fn progress_summary(items: &[ChecklistItem]) -> ProgressSummary {
    ProgressSummary {
        linked_count: items.iter().filter(|i| i.is_linked()).count(),
        completed_count: items.iter().filter(|i| i.is_completed()).count(),
        total_count: items.len(),
    }
}
