//! Teacher availability.
//!
//! Blackout records list the (day, period) slots a teacher cannot be
//! scheduled into. They are folded into an [`AvailabilityIndex`] once
//! per run so the builder and evaluator get O(1) membership checks.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::{Day, Period};

/// A single blocked (teacher, day, period) slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlackoutSlot {
    /// Teacher identifier.
    pub teacher_id: String,
    /// Blocked day.
    pub day: Day,
    /// Blocked period (1-indexed).
    pub period: Period,
}

impl BlackoutSlot {
    /// Creates a blackout record.
    pub fn new(teacher_id: impl Into<String>, day: Day, period: Period) -> Self {
        Self {
            teacher_id: teacher_id.into(),
            day,
            period,
        }
    }
}

/// Precomputed lookup of blocked slots: teacher → day → periods.
#[derive(Debug, Clone, Default)]
pub struct AvailabilityIndex {
    blocked: HashMap<String, HashMap<Day, HashSet<Period>>>,
}

impl AvailabilityIndex {
    /// Creates an empty index (every teacher fully available).
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the index from blackout records.
    pub fn from_blackouts(slots: &[BlackoutSlot]) -> Self {
        let mut index = Self::new();
        for slot in slots {
            index.block(&slot.teacher_id, slot.day, slot.period);
        }
        index
    }

    /// Marks a slot as blocked.
    pub fn block(&mut self, teacher_id: &str, day: Day, period: Period) {
        self.blocked
            .entry(teacher_id.to_string())
            .or_default()
            .entry(day)
            .or_default()
            .insert(period);
    }

    /// Whether the teacher is blocked at (day, period).
    pub fn is_blocked(&self, teacher_id: &str, day: Day, period: Period) -> bool {
        self.blocked
            .get(teacher_id)
            .and_then(|days| days.get(&day))
            .is_some_and(|periods| periods.contains(&period))
    }

    /// Total number of blocked slots across all teachers.
    pub fn blocked_slot_count(&self) -> usize {
        self.blocked
            .values()
            .flat_map(|days| days.values())
            .map(|periods| periods.len())
            .sum()
    }
}
