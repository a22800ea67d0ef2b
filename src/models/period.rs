//! Academic period model.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// An academic period; one construction run targets exactly one period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Period {
    /// Unique period identifier.
    pub id: String,
    /// Display name (e.g., "2026-I").
    pub name: String,
    /// Window in which timetables for this period may be built.
    pub schedule_creation: Option<CreationWindow>,
}

/// Inclusive window during which a period accepts timetable construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreationWindow {
    /// Opening instant.
    pub start: NaiveDateTime,
    /// Closing instant.
    pub end: NaiveDateTime,
}

impl Period {
    /// Creates a period with no creation window.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            schedule_creation: None,
        }
    }

    /// Sets the schedule-creation window.
    pub fn with_creation_window(mut self, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        self.schedule_creation = Some(CreationWindow { start, end });
        self
    }

    /// Whether timetable construction is open at `now`.
    pub fn is_open_at(&self, now: NaiveDateTime) -> bool {
        self.schedule_creation
            .is_some_and(|w| w.start <= now && now <= w.end)
    }
}
