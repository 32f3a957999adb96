//! Classroom model.
//!
//! Rooms come in two flavours: lecture halls and labs. A room's type
//! must match the subject category it hosts; the fitness function
//! rewards correct usage and the candidate builder pre-assigns one
//! room of each type per class-section.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Room classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomType {
    /// Lecture hall for lecture/theory sessions.
    Lecture,
    /// Laboratory for practical sessions.
    Lab,
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoomType::Lecture => f.write_str("lecture"),
            RoomType::Lab => f.write_str("lab"),
        }
    }
}

/// A schedulable room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classroom {
    /// Unique room identifier (e.g. "LH-101").
    pub room_id: String,
    /// Human-readable name.
    pub name: String,
    /// Seating capacity.
    pub capacity: u32,
    /// Room classification.
    pub room_type: RoomType,
}

impl Classroom {
    /// Creates a room of the given type.
    pub fn new(room_id: impl Into<String>, room_type: RoomType) -> Self {
        Self {
            room_id: room_id.into(),
            name: String::new(),
            capacity: 0,
            room_type,
        }
    }

    /// Creates a lecture hall.
    pub fn lecture(room_id: impl Into<String>) -> Self {
        Self::new(room_id, RoomType::Lecture)
    }

    /// Creates a lab.
    pub fn lab(room_id: impl Into<String>) -> Self {
        Self::new(room_id, RoomType::Lab)
    }

    /// Sets the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the seating capacity.
    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity;
        self
    }
}
