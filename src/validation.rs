//! Input integrity checks.
//!
//! Structural validation of the catalogs feeding a run: duplicate
//! identifiers, dangling course references, subjects that carry no
//! weekly hours. Advisory — the search tolerates unknown subjects by
//! skipping their obligations — but running it first surfaces data
//! problems that would otherwise show up only as silently unplaced
//! hours. All detected issues are collected, not just the first.

use std::collections::HashSet;

use crate::models::{Classroom, Subject, TeachingObligation};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two subjects share a course code.
    DuplicateCourseCode,
    /// Two rooms share an identifier.
    DuplicateRoomId,
    /// An obligation references a course missing from the catalog.
    UnknownSubject,
    /// A subject has zero weekly hours in every component.
    NoWeeklyHours,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the catalogs feeding a scheduling run.
///
/// Checks:
/// 1. No duplicate course codes in the subject catalog
/// 2. No duplicate room identifiers
/// 3. Every obligation's course exists in the subject catalog
/// 4. Every subject carries at least one weekly hour
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_inputs(
    obligations: &[TeachingObligation],
    subjects: &[Subject],
    classrooms: &[Classroom],
) -> ValidationResult {
    let mut errors = Vec::new();

    let mut course_codes = HashSet::new();
    for subject in subjects {
        if !course_codes.insert(subject.course_code.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateCourseCode,
                format!("Duplicate course code: {}", subject.course_code),
            ));
        }
        if subject.weekly_hours() == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::NoWeeklyHours,
                format!("Subject '{}' has no weekly hours", subject.course_code),
            ));
        }
    }

    let mut room_ids = HashSet::new();
    for room in classrooms {
        if !room_ids.insert(room.room_id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateRoomId,
                format!("Duplicate room ID: {}", room.room_id),
            ));
        }
    }

    for ob in obligations {
        if !course_codes.contains(ob.course_code.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownSubject,
                format!(
                    "Obligation for class {} references unknown course '{}'",
                    ob.class, ob.course_code
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
