//! Room and teacher models.
//!
//! Rooms and teachers are the two resources a placement binds. Rooms
//! are typed: lecture rooms host theory, labs host practice.

use serde::{Deserialize, Serialize};

use super::SessionType;

/// A physical teaching space.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    /// Unique room identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Room classification.
    pub category: RoomCategory,
    /// Seats available.
    pub capacity: u32,
}

/// Room classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomCategory {
    /// Lecture room.
    Room,
    /// Laboratory.
    Lab,
}

impl RoomCategory {
    /// Category a session of the given type must be held in.
    pub fn for_session(session_type: SessionType) -> Self {
        match session_type {
            SessionType::Theory => RoomCategory::Room,
            SessionType::Practice => RoomCategory::Lab,
        }
    }
}

impl std::fmt::Display for RoomCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoomCategory::Room => f.write_str("room"),
            RoomCategory::Lab => f.write_str("lab"),
        }
    }
}

/// A teacher who may be bound to placements.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Teacher {
    /// Unique teacher identifier.
    pub id: String,
    /// Display name.
    pub name: String,
}

impl Room {
    /// Creates a room of the given category with capacity 1.
    pub fn new(id: impl Into<String>, category: RoomCategory) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            category,
            capacity: 1,
        }
    }

    /// Creates a lecture room.
    pub fn lecture(id: impl Into<String>) -> Self {
        Self::new(id, RoomCategory::Room)
    }

    /// Creates a lab.
    pub fn lab(id: impl Into<String>) -> Self {
        Self::new(id, RoomCategory::Lab)
    }

    /// Sets the room name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the seat count.
    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity;
        self
    }

    /// Whether this room can host `seats` students of the given category.
    pub fn fits(&self, category: RoomCategory, seats: u32) -> bool {
        self.category == category && self.capacity >= seats
    }
}

impl Teacher {
    /// Creates a teacher.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}
