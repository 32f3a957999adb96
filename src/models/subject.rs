//! Subject (course) model.
//!
//! A subject carries the weekly hour split that drives scheduling:
//! lecture and theory hours fill single-period slots, a positive
//! practical hour count marks the subject as lab-taught and demands a
//! paired 2-period block.

use serde::{Deserialize, Serialize};

/// A course in the subject catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    /// Unique course code (e.g. "CS301").
    pub course_code: String,
    /// Human-readable title.
    pub name: String,
    /// Curriculum category (e.g. "Core", "Elective").
    pub category: String,
    /// Weekly lecture hours.
    pub lecture_hr: u32,
    /// Weekly theory/tutorial hours.
    pub theory_hr: u32,
    /// Weekly practical hours. A positive value marks a lab subject.
    pub practical_hr: u32,
    /// Credit value.
    pub credits: u32,
}

impl Subject {
    /// Creates a subject with the given course code.
    pub fn new(course_code: impl Into<String>) -> Self {
        Self {
            course_code: course_code.into(),
            name: String::new(),
            category: String::new(),
            lecture_hr: 0,
            theory_hr: 0,
            practical_hr: 0,
            credits: 0,
        }
    }

    /// Sets the title.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the curriculum category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Sets the weekly hour split (lecture, theory, practical).
    pub fn with_hours(mut self, lecture: u32, theory: u32, practical: u32) -> Self {
        self.lecture_hr = lecture;
        self.theory_hr = theory;
        self.practical_hr = practical;
        self
    }

    /// Sets the credit value.
    pub fn with_credits(mut self, credits: u32) -> Self {
        self.credits = credits;
        self
    }

    /// Whether this subject is lab-taught.
    #[inline]
    pub fn is_lab(&self) -> bool {
        self.practical_hr > 0
    }

    /// Combined lecture and theory hours per week.
    #[inline]
    pub fn contact_hours(&self) -> u32 {
        self.lecture_hr + self.theory_hr
    }

    /// Total weekly hours across all components.
    pub fn weekly_hours(&self) -> u32 {
        self.lecture_hr + self.theory_hr + self.practical_hr
    }
}
