//! Constraint-aware weekly timetable construction.
//!
//! Given teaching obligations (teacher × course × class), a room pool,
//! and per-teacher blackout slots, produces a weekly schedule assigning
//! each obligation to (day, period, room) slots. The search is a
//! population-based heuristic: candidates are built by randomized
//! greedy placement, scored against a weighted battery of hard and soft
//! constraints, and evolved under elitism until conflict-free or out of
//! budget. Results are best-effort — callers inspect residual conflict
//! and unplaced-hour counts before accepting.
//!
//! # Modules
//!
//! - **`models`**: domain records — `TeachingObligation`, `Subject`,
//!   `Classroom`, `BlackoutSlot`/`AvailabilityIndex`, `ScheduleEntry`,
//!   `Timetable`
//! - **`ga`**: the optimizer core — candidate builder, fitness
//!   evaluator, population operators, search driver
//! - **`generator`**: per-class and bulk-roster entry points, progress
//!   events, the persistence seam
//! - **`validation`**: catalog integrity checks
//!
//! # References
//!
//! - Colorni et al. (1998), "Metaheuristics for High School Timetabling"
//! - Burke & Petrovic (2002), "Recent Research Directions in Automated
//!   Timetabling"

pub mod error;
pub mod ga;
pub mod generator;
pub mod models;
pub mod validation;

pub use error::{Result, ScheduleError};
