//! Error taxonomy.
//!
//! Input and configuration problems are surfaced before any search
//! begins. A degraded search result (residual conflicts, unplaced
//! hours) is NOT an error — it is reported on the returned outcome for
//! the caller to judge.

use crate::models::{ClassKey, RoomType};

/// Errors raised before or around a search run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    /// No teaching obligations exist for the requested class.
    #[error("no teaching obligations found for class {0}")]
    NoObligations(ClassKey),

    /// The classroom catalog is empty.
    #[error("no classrooms available")]
    NoClassrooms,

    /// Obligations require a room type with no rooms in the catalog.
    #[error("no {0} rooms available")]
    NoRoomsOfType(RoomType),

    /// A tunable is outside its valid domain.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The persistence collaborator rejected a write.
    #[error("schedule store error: {0}")]
    Store(String),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, ScheduleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ScheduleError::NoObligations(ClassKey::new("3rd", "CSE", "A"));
        assert_eq!(
            err.to_string(),
            "no teaching obligations found for class 3rd-CSE-A"
        );

        let err = ScheduleError::NoRoomsOfType(RoomType::Lab);
        assert_eq!(err.to_string(), "no lab rooms available");

        let err = ScheduleError::InvalidConfig("population size must be positive".into());
        assert!(err.to_string().contains("population size"));
    }
}
