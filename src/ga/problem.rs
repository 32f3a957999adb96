//! Problem container for one search run.
//!
//! Owns the static inputs (obligations, subject catalog, room catalog,
//! availability index) and the derived lookups the builder and
//! evaluator share. All data is read-only for the duration of a run.

use std::collections::{BTreeMap, HashMap};

use crate::models::{AvailabilityIndex, Classroom, RoomType, Subject, TeachingObligation};

/// Static inputs for a timetable search.
#[derive(Debug, Clone)]
pub struct TimetableProblem {
    /// Obligations to place (one class's, or several for a merged run).
    pub obligations: Vec<TeachingObligation>,
    /// Subject catalog keyed by course code.
    subjects: HashMap<String, Subject>,
    /// Full room catalog.
    pub classrooms: Vec<Classroom>,
    /// Blocked (teacher, day, period) lookup.
    pub availability: AvailabilityIndex,
}

impl TimetableProblem {
    /// Assembles a problem from catalog slices.
    pub fn new(
        obligations: Vec<TeachingObligation>,
        subjects: &[Subject],
        classrooms: &[Classroom],
        availability: AvailabilityIndex,
    ) -> Self {
        let subjects = subjects
            .iter()
            .map(|s| (s.course_code.clone(), s.clone()))
            .collect();
        Self {
            obligations,
            subjects,
            classrooms: classrooms.to_vec(),
            availability,
        }
    }

    /// Looks up a subject by course code.
    pub fn subject(&self, course_code: &str) -> Option<&Subject> {
        self.subjects.get(course_code)
    }

    /// Rooms of the given type, in catalog order.
    pub fn rooms_of(&self, room_type: RoomType) -> Vec<&Classroom> {
        self.classrooms
            .iter()
            .filter(|r| r.room_type == room_type)
            .collect()
    }

    /// Whether any obligation needs a room of the given type.
    ///
    /// Obligations whose subject is missing from the catalog are
    /// ignored, matching the builder's skip behavior. A lecture room is
    /// only needed by subjects that actually carry contact hours.
    pub fn requires_room_type(&self, room_type: RoomType) -> bool {
        self.obligations.iter().any(|ob| {
            self.subject(&ob.course_code).is_some_and(|s| match room_type {
                RoomType::Lab => s.is_lab(),
                RoomType::Lecture => !s.is_lab() && s.contact_hours() > 0,
            })
        })
    }

    /// Total weekly hours a complete candidate would contain.
    ///
    /// Counted per distinct (class, course) pair: a lab pair contributes
    /// 2 hours, a lecture subject `min(cap, lecture_hr + theory_hr)`.
    /// The difference between this and a candidate's entry count is the
    /// candidate's unplaced-hour total.
    pub fn total_required_hours(&self, max_lectures_per_week: u32) -> u32 {
        let mut per_pair: BTreeMap<(&str, &str, &str, &str), u32> = BTreeMap::new();
        for ob in &self.obligations {
            let Some(subject) = self.subject(&ob.course_code) else {
                continue;
            };
            let hours = if subject.is_lab() {
                2
            } else {
                max_lectures_per_week.min(subject.contact_hours())
            };
            per_pair.insert(
                (
                    ob.class.semester.as_str(),
                    ob.class.branch.as_str(),
                    ob.class.section.as_str(),
                    ob.course_code.as_str(),
                ),
                hours,
            );
        }
        per_pair.values().sum()
    }
}
