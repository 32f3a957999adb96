//! Teaching obligation model.
//!
//! An obligation records that a teacher must teach a course to a
//! specific class. Obligations are the atomic scheduling demand: one
//! search run operates over a fixed obligation set.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies a class-section: (semester, branch, section).
///
/// Used as a map key throughout the optimizer, so it derives `Hash`,
/// `Eq` and `Ord`; `Ord` keeps grouped iteration deterministic under a
/// seeded random source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClassKey {
    /// Semester label (e.g. "3rd").
    pub semester: String,
    /// Branch / programme (e.g. "CSE").
    pub branch: String,
    /// Section within the branch (e.g. "A").
    pub section: String,
}

impl ClassKey {
    /// Creates a class key.
    pub fn new(
        semester: impl Into<String>,
        branch: impl Into<String>,
        section: impl Into<String>,
    ) -> Self {
        Self {
            semester: semester.into(),
            branch: branch.into(),
            section: section.into(),
        }
    }
}

impl fmt::Display for ClassKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.semester, self.branch, self.section)
    }
}

/// A (teacher, course, class) teaching relationship to be scheduled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeachingObligation {
    /// Teacher identifier.
    pub teacher_id: String,
    /// Course code of the subject taught.
    pub course_code: String,
    /// The class receiving the course.
    pub class: ClassKey,
}

impl TeachingObligation {
    /// Creates a new obligation.
    pub fn new(
        teacher_id: impl Into<String>,
        course_code: impl Into<String>,
        class: ClassKey,
    ) -> Self {
        Self {
            teacher_id: teacher_id.into(),
            course_code: course_code.into(),
            class,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_key_display() {
        let key = ClassKey::new("3rd", "CSE", "A");
        assert_eq!(key.to_string(), "3rd-CSE-A");
    }

    #[test]
    fn test_class_key_equality() {
        let a = ClassKey::new("3rd", "CSE", "A");
        let b = ClassKey::new("3rd", "CSE", "A");
        let c = ClassKey::new("3rd", "CSE", "B");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_class_key_ordering() {
        let a = ClassKey::new("3rd", "CSE", "A");
        let b = ClassKey::new("3rd", "CSE", "B");
        assert!(a < b);
    }

    #[test]
    fn test_obligation_construction() {
        let ob = TeachingObligation::new("T1", "CS301", ClassKey::new("3rd", "CSE", "A"));
        assert_eq!(ob.teacher_id, "T1");
        assert_eq!(ob.course_code, "CS301");
        assert_eq!(ob.class.section, "A");
    }
}
