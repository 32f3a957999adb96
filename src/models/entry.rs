//! Schedule entries and the timetable container.
//!
//! A [`ScheduleEntry`] is the atomic unit of a candidate schedule: one
//! class sitting one course with one teacher in one room at one (day,
//! period) slot. A [`Timetable`] is an ordered collection of entries —
//! one class's week, or several classes' during crossover.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{ClassKey, Day, Period};

/// Which half of a paired 2-hour lab block an entry is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabSession {
    /// First hour of the pair.
    First,
    /// Second hour of the pair.
    Second,
}

impl LabSession {
    /// Session number (1 or 2).
    pub fn number(self) -> u8 {
        match self {
            LabSession::First => 1,
            LabSession::Second => 2,
        }
    }
}

/// One scheduled hour: class × course × teacher × room × (day, period).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// The class attending.
    pub class: ClassKey,
    /// Scheduled day.
    pub day: Day,
    /// Scheduled period (1-indexed).
    pub period: Period,
    /// Course code taught in this slot.
    pub course_code: String,
    /// Teacher delivering the session.
    pub teacher_id: String,
    /// Room hosting the session.
    pub room_id: String,
    /// Whether this is a practical (lab) session.
    pub is_lab: bool,
    /// Lab pair half, set only when `is_lab` is true.
    pub lab_session: Option<LabSession>,
}

impl ScheduleEntry {
    /// Creates a lecture entry.
    pub fn lecture(
        class: ClassKey,
        day: Day,
        period: Period,
        course_code: impl Into<String>,
        teacher_id: impl Into<String>,
        room_id: impl Into<String>,
    ) -> Self {
        Self {
            class,
            day,
            period,
            course_code: course_code.into(),
            teacher_id: teacher_id.into(),
            room_id: room_id.into(),
            is_lab: false,
            lab_session: None,
        }
    }

    /// Creates one half of a lab pair.
    pub fn lab(
        class: ClassKey,
        day: Day,
        period: Period,
        course_code: impl Into<String>,
        teacher_id: impl Into<String>,
        room_id: impl Into<String>,
        session: LabSession,
    ) -> Self {
        Self {
            class,
            day,
            period,
            course_code: course_code.into(),
            teacher_id: teacher_id.into(),
            room_id: room_id.into(),
            is_lab: true,
            lab_session: Some(session),
        }
    }
}

/// An ordered collection of schedule entries (a candidate schedule).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timetable {
    /// The entries, in placement order.
    pub entries: Vec<ScheduleEntry>,
}

impl Timetable {
    /// Creates an empty timetable.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an entry list.
    pub fn from_entries(entries: Vec<ScheduleEntry>) -> Self {
        Self { entries }
    }

    /// Appends an entry.
    pub fn push(&mut self, entry: ScheduleEntry) {
        self.entries.push(entry);
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the timetable has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries for one class.
    pub fn for_class(&self, class: &ClassKey) -> Vec<&ScheduleEntry> {
        self.entries.iter().filter(|e| e.class == *class).collect()
    }

    /// All entries taught by one teacher.
    pub fn for_teacher(&self, teacher_id: &str) -> Vec<&ScheduleEntry> {
        self.entries
            .iter()
            .filter(|e| e.teacher_id == teacher_id)
            .collect()
    }

    /// All entries hosted in one room.
    pub fn for_room(&self, room_id: &str) -> Vec<&ScheduleEntry> {
        self.entries
            .iter()
            .filter(|e| e.room_id == room_id)
            .collect()
    }

    /// Groups entries by class key, preserving entry order within each
    /// class. Deterministic iteration order (keys sorted).
    pub fn by_class(&self) -> BTreeMap<ClassKey, Vec<ScheduleEntry>> {
        let mut grouped: BTreeMap<ClassKey, Vec<ScheduleEntry>> = BTreeMap::new();
        for entry in &self.entries {
            grouped
                .entry(entry.class.clone())
                .or_default()
                .push(entry.clone());
        }
        grouped
    }

    /// Distinct class keys present, in sorted order.
    pub fn class_keys(&self) -> Vec<ClassKey> {
        self.by_class().into_keys().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class_a() -> ClassKey {
        ClassKey::new("3rd", "CSE", "A")
    }

    fn class_b() -> ClassKey {
        ClassKey::new("3rd", "CSE", "B")
    }

    fn sample_timetable() -> Timetable {
        let mut tt = Timetable::new();
        tt.push(ScheduleEntry::lecture(
            class_a(),
            Day::Monday,
            1,
            "CS301",
            "T1",
            "LH-101",
        ));
        tt.push(ScheduleEntry::lab(
            class_a(),
            Day::Tuesday,
            2,
            "CS302L",
            "T2",
            "LAB-1",
            LabSession::First,
        ));
        tt.push(ScheduleEntry::lab(
            class_a(),
            Day::Tuesday,
            3,
            "CS302L",
            "T2",
            "LAB-1",
            LabSession::Second,
        ));
        tt.push(ScheduleEntry::lecture(
            class_b(),
            Day::Monday,
            1,
            "CS301",
            "T1",
            "LH-102",
        ));
        tt
    }

    #[test]
    fn test_entry_constructors() {
        let lec = ScheduleEntry::lecture(class_a(), Day::Monday, 1, "CS301", "T1", "LH-101");
        assert!(!lec.is_lab);
        assert!(lec.lab_session.is_none());

        let lab = ScheduleEntry::lab(
            class_a(),
            Day::Monday,
            2,
            "CS302L",
            "T2",
            "LAB-1",
            LabSession::Second,
        );
        assert!(lab.is_lab);
        assert_eq!(lab.lab_session.map(LabSession::number), Some(2));
    }

    #[test]
    fn test_views() {
        let tt = sample_timetable();
        assert_eq!(tt.len(), 4);
        assert_eq!(tt.for_class(&class_a()).len(), 3);
        assert_eq!(tt.for_teacher("T1").len(), 2);
        assert_eq!(tt.for_room("LAB-1").len(), 2);
        assert!(tt.for_teacher("T9").is_empty());
    }

    #[test]
    fn test_by_class_grouping() {
        let tt = sample_timetable();
        let grouped = tt.by_class();
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[&class_a()].len(), 3);
        assert_eq!(grouped[&class_b()].len(), 1);
        // Entry order preserved within a class
        assert_eq!(grouped[&class_a()][0].course_code, "CS301");
        assert_eq!(grouped[&class_a()][1].course_code, "CS302L");
    }

    #[test]
    fn test_entry_roundtrip_json() {
        let entry = ScheduleEntry::lab(
            class_a(),
            Day::Friday,
            5,
            "CS302L",
            "T2",
            "LAB-1",
            LabSession::First,
        );
        let json = serde_json::to_string(&entry).unwrap();
        let back: ScheduleEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(entry, back);
    }
}
