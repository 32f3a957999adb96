//! Timetabling domain models.
//!
//! Immutable value records describing the scheduling problem (who must
//! teach what to whom, in which rooms, around which blackouts) and its
//! solution (schedule entries grouped into a timetable).

mod availability;
mod classroom;
mod entry;
mod obligation;
mod subject;
mod timeslot;

pub use availability::{AvailabilityIndex, BlackoutSlot};
pub use classroom::{Classroom, RoomType};
pub use entry::{LabSession, ScheduleEntry, Timetable};
pub use obligation::{ClassKey, TeachingObligation};
pub use subject::Subject;
pub use timeslot::{time_label, Day, Period, LUNCH_BREAK_PERIOD, PERIODS_PER_DAY};
