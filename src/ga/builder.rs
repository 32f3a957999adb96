//! Candidate construction.
//!
//! Builds one random-but-constraint-aware candidate timetable from the
//! full obligation set. Placement is randomized greedy: obligations are
//! shuffled, grouped per class-section (so room affinity can be
//! pre-assigned), then each required hour retries random (day, period)
//! picks until a slot passes every validity check or the attempt budget
//! runs out. Exhaustion skips the hour; the fitness function absorbs
//! under-scheduled candidates and the search outcome reports the total.

use std::collections::{BTreeMap, HashMap, HashSet};

use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;

use super::problem::TimetableProblem;
use super::search::GaConfig;
use crate::models::{
    ClassKey, Day, LabSession, Period, RoomType, ScheduleEntry, TeachingObligation, Timetable,
};

/// Builds random candidate timetables for a problem.
#[derive(Debug, Clone, Copy)]
pub struct CandidateBuilder<'a> {
    problem: &'a TimetableProblem,
    config: &'a GaConfig,
}

/// Per-section room picks, fixed for the duration of one build.
struct SectionRooms {
    lecture: Option<String>,
    lab: Option<String>,
}

impl<'a> CandidateBuilder<'a> {
    /// Creates a builder over a problem and configuration.
    pub fn new(problem: &'a TimetableProblem, config: &'a GaConfig) -> Self {
        Self { problem, config }
    }

    /// Constructs one candidate timetable.
    pub fn build<R: Rng + ?Sized>(&self, rng: &mut R) -> Timetable {
        let mut timetable = Timetable::new();

        let mut shuffled: Vec<TeachingObligation> = self.problem.obligations.clone();
        shuffled.shuffle(rng);

        let mut by_class: BTreeMap<ClassKey, Vec<TeachingObligation>> = BTreeMap::new();
        for ob in shuffled {
            by_class.entry(ob.class.clone()).or_default().push(ob);
        }

        let lecture_pool: Vec<&str> = self
            .problem
            .rooms_of(RoomType::Lecture)
            .iter()
            .map(|r| r.room_id.as_str())
            .collect();
        let lab_pool: Vec<&str> = self
            .problem
            .rooms_of(RoomType::Lab)
            .iter()
            .map(|r| r.room_id.as_str())
            .collect();

        for (_, class_obligations) in &by_class {
            // One lecture room and one lab room per section, reused for
            // every entry of that kind (room affinity).
            let mut rooms = SectionRooms {
                lecture: lecture_pool.choose(rng).map(|r| r.to_string()),
                lab: lab_pool.choose(rng).map(|r| r.to_string()),
            };
            let mut subjects_on_day: HashMap<Day, HashSet<String>> = HashMap::new();
            let mut lecture_counts: HashMap<String, u32> = HashMap::new();

            for ob in class_obligations {
                let Some(subject) = self.problem.subject(&ob.course_code) else {
                    continue;
                };

                if subject.is_lab() {
                    let Some(room_id) = pick_room(&mut rooms.lab, &lab_pool, rng) else {
                        continue;
                    };
                    self.place_lab(&mut timetable, &mut subjects_on_day, ob, &room_id, rng);
                } else {
                    let placed = lecture_counts.get(ob.course_code.as_str()).copied().unwrap_or(0);
                    let hours = self
                        .config
                        .max_lectures_per_week
                        .saturating_sub(placed)
                        .min(subject.contact_hours());
                    if hours == 0 {
                        continue;
                    }
                    let Some(room_id) = pick_room(&mut rooms.lecture, &lecture_pool, rng) else {
                        continue;
                    };
                    for _ in 0..hours {
                        if self.place_lecture(&mut timetable, &mut subjects_on_day, ob, &room_id, rng)
                        {
                            *lecture_counts.entry(ob.course_code.clone()).or_insert(0) += 1;
                        }
                    }
                }
            }
        }

        timetable
    }

    /// Places one 2-period lab block. Returns false when the attempt
    /// budget is exhausted without a valid slot.
    fn place_lab<R: Rng + ?Sized>(
        &self,
        timetable: &mut Timetable,
        subjects_on_day: &mut HashMap<Day, HashSet<String>>,
        ob: &TeachingObligation,
        room_id: &str,
        rng: &mut R,
    ) -> bool {
        let days = self.config.days.as_slice();
        let periods = self.config.periods_per_day;
        let lunch = self.config.lunch_break_period;

        // A lab cannot start on the lunch period or in the last period.
        let valid_starts: Vec<Period> = (1..periods).filter(|&p| p != lunch).collect();
        if days.is_empty() || valid_starts.is_empty() {
            return false;
        }

        let max_attempts = days.len() * (periods as usize - 1);
        for _ in 0..max_attempts {
            let day = *days.choose(rng).unwrap();
            let start = *valid_starts.choose(rng).unwrap();
            let end = start + 1;

            if self.problem.availability.is_blocked(&ob.teacher_id, day, start)
                || self.problem.availability.is_blocked(&ob.teacher_id, day, end)
            {
                continue;
            }
            if teacher_adjacent_conflict(timetable, &ob.teacher_id, day, start, Some(&ob.course_code))
                || teacher_adjacent_conflict(
                    timetable,
                    &ob.teacher_id,
                    day,
                    end,
                    Some(&ob.course_code),
                )
            {
                continue;
            }
            if start < lunch && end > lunch {
                continue;
            }
            if has_collision(timetable, day, start, room_id, &ob.teacher_id, &ob.class)
                || has_collision(timetable, day, end, room_id, &ob.teacher_id, &ob.class)
            {
                continue;
            }
            if subject_already_on_day(subjects_on_day, day, &ob.course_code) {
                continue;
            }

            timetable.push(ScheduleEntry::lab(
                ob.class.clone(),
                day,
                start,
                &ob.course_code,
                &ob.teacher_id,
                room_id,
                LabSession::First,
            ));
            timetable.push(ScheduleEntry::lab(
                ob.class.clone(),
                day,
                end,
                &ob.course_code,
                &ob.teacher_id,
                room_id,
                LabSession::Second,
            ));
            subjects_on_day
                .entry(day)
                .or_default()
                .insert(ob.course_code.clone());
            return true;
        }
        false
    }

    /// Places one single-period lecture hour. Returns false when the
    /// attempt budget is exhausted without a valid slot.
    fn place_lecture<R: Rng + ?Sized>(
        &self,
        timetable: &mut Timetable,
        subjects_on_day: &mut HashMap<Day, HashSet<String>>,
        ob: &TeachingObligation,
        room_id: &str,
        rng: &mut R,
    ) -> bool {
        let days = self.config.days.as_slice();
        let periods = self.config.periods_per_day;
        let lunch = self.config.lunch_break_period;

        let valid_periods: Vec<Period> = (1..=periods).filter(|&p| p != lunch).collect();
        if days.is_empty() || valid_periods.is_empty() {
            return false;
        }

        let max_attempts = days.len() * periods as usize;
        for _ in 0..max_attempts {
            let day = *days.choose(rng).unwrap();
            let period = *valid_periods.choose(rng).unwrap();

            if self.problem.availability.is_blocked(&ob.teacher_id, day, period) {
                continue;
            }
            if teacher_adjacent_conflict(timetable, &ob.teacher_id, day, period, None) {
                continue;
            }
            if has_collision(timetable, day, period, room_id, &ob.teacher_id, &ob.class) {
                continue;
            }
            if subject_already_on_day(subjects_on_day, day, &ob.course_code) {
                continue;
            }

            timetable.push(ScheduleEntry::lecture(
                ob.class.clone(),
                day,
                period,
                &ob.course_code,
                &ob.teacher_id,
                room_id,
            ));
            subjects_on_day
                .entry(day)
                .or_default()
                .insert(ob.course_code.clone());
            return true;
        }
        false
    }
}

/// Returns the section's sticky room of a kind, drawing one from the
/// pool on first use. `None` when no room of the kind exists.
fn pick_room<R: Rng + ?Sized>(
    slot: &mut Option<String>,
    pool: &[&str],
    rng: &mut R,
) -> Option<String> {
    if let Some(room) = slot {
        return Some(room.clone());
    }
    let picked = pool.choose(rng)?.to_string();
    *slot = Some(picked.clone());
    Some(picked)
}

/// Whether (day, period) collides with an existing entry on room,
/// teacher, or class.
fn has_collision(
    timetable: &Timetable,
    day: Day,
    period: Period,
    room_id: &str,
    teacher_id: &str,
    class: &ClassKey,
) -> bool {
    timetable.entries.iter().any(|e| {
        e.day == day
            && e.period == period
            && (e.room_id == room_id || e.teacher_id == teacher_id || e.class == *class)
    })
}

/// Whether the teacher already holds the immediately adjacent period on
/// that day. The other half of the same lab course is exempt.
fn teacher_adjacent_conflict(
    timetable: &Timetable,
    teacher_id: &str,
    day: Day,
    period: Period,
    lab_course: Option<&str>,
) -> bool {
    let adjacent = timetable.entries.iter().find(|e| {
        e.teacher_id == teacher_id
            && e.day == day
            && (e.period + 1 == period || e.period == period + 1)
    });
    match (adjacent, lab_course) {
        (None, _) => false,
        (Some(e), Some(course)) if e.course_code == course => false,
        (Some(_), _) => true,
    }
}

fn subject_already_on_day(
    subjects_on_day: &HashMap<Day, HashSet<String>>,
    day: Day,
    course_code: &str,
) -> bool {
    subjects_on_day
        .get(&day)
        .is_some_and(|courses| courses.contains(course_code))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AvailabilityIndex, BlackoutSlot, Classroom, Subject};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use std::collections::BTreeMap;

    fn class_a() -> ClassKey {
        ClassKey::new("3rd", "CSE", "A")
    }

    fn sample_problem() -> TimetableProblem {
        let obligations = vec![
            TeachingObligation::new("T1", "CS301", class_a()),
            TeachingObligation::new("T2", "CS302L", class_a()),
            TeachingObligation::new("T3", "CS303", class_a()),
        ];
        let subjects = vec![
            Subject::new("CS301").with_hours(3, 1, 0),
            Subject::new("CS302L").with_hours(0, 0, 2),
            Subject::new("CS303").with_hours(2, 0, 0),
        ];
        let classrooms = vec![
            Classroom::lecture("LH-101"),
            Classroom::lecture("LH-102"),
            Classroom::lab("LAB-1"),
        ];
        let blackouts = vec![BlackoutSlot::new("T2", Day::Monday, 2)];
        TimetableProblem::new(
            obligations,
            &subjects,
            &classrooms,
            AvailabilityIndex::from_blackouts(&blackouts),
        )
    }

    #[test]
    fn test_lab_blocks_are_paired_and_consecutive() {
        let problem = sample_problem();
        let config = GaConfig::default();
        let builder = CandidateBuilder::new(&problem, &config);
        let mut rng = SmallRng::seed_from_u64(7);

        for _ in 0..30 {
            let tt = builder.build(&mut rng);
            let mut lab_groups: BTreeMap<Day, Vec<Period>> = BTreeMap::new();
            for e in tt.entries.iter().filter(|e| e.is_lab) {
                lab_groups.entry(e.day).or_default().push(e.period);
            }
            // Zero (skip) or exactly one lab block; never a lone half.
            assert!(lab_groups.len() <= 1);
            for (_, mut periods) in lab_groups {
                periods.sort_unstable();
                assert_eq!(periods.len(), 2);
                assert_eq!(periods[1], periods[0] + 1);
                // No straddling the lunch break, no lunch-period start.
                assert_ne!(periods[0], config.lunch_break_period);
                assert!(!(periods[0] < config.lunch_break_period
                    && periods[1] > config.lunch_break_period));
            }
        }
    }

    #[test]
    fn test_lab_sessions_ordered() {
        let problem = sample_problem();
        let config = GaConfig::default();
        let builder = CandidateBuilder::new(&problem, &config);
        let mut rng = SmallRng::seed_from_u64(11);

        for _ in 0..20 {
            let tt = builder.build(&mut rng);
            let labs: Vec<_> = tt.entries.iter().filter(|e| e.is_lab).collect();
            if labs.len() == 2 {
                let first = labs.iter().find(|e| e.lab_session == Some(LabSession::First));
                let second = labs.iter().find(|e| e.lab_session == Some(LabSession::Second));
                let (first, second) = (first.unwrap(), second.unwrap());
                assert_eq!(second.period, first.period + 1);
                assert_eq!(first.day, second.day);
                assert_eq!(first.room_id, second.room_id);
            }
        }
    }

    #[test]
    fn test_blackouts_respected() {
        let problem = sample_problem();
        let config = GaConfig::default();
        let builder = CandidateBuilder::new(&problem, &config);
        let mut rng = SmallRng::seed_from_u64(13);

        for _ in 0..30 {
            let tt = builder.build(&mut rng);
            for e in tt.entries.iter() {
                assert!(
                    !problem.availability.is_blocked(&e.teacher_id, e.day, e.period),
                    "entry placed on blocked slot: {:?}",
                    e
                );
            }
        }
    }

    #[test]
    fn test_lectures_avoid_lunch_and_repeat_days() {
        let problem = sample_problem();
        let config = GaConfig::default();
        let builder = CandidateBuilder::new(&problem, &config);
        let mut rng = SmallRng::seed_from_u64(17);

        for _ in 0..30 {
            let tt = builder.build(&mut rng);
            let mut per_course_day: BTreeMap<(&str, Day), u32> = BTreeMap::new();
            let mut per_course: BTreeMap<&str, u32> = BTreeMap::new();
            for e in tt.entries.iter().filter(|e| !e.is_lab) {
                assert_ne!(e.period, config.lunch_break_period);
                *per_course_day.entry((e.course_code.as_str(), e.day)).or_insert(0) += 1;
                *per_course.entry(e.course_code.as_str()).or_insert(0) += 1;
            }
            for (_, count) in per_course_day {
                assert_eq!(count, 1);
            }
            for (_, count) in per_course {
                assert!(count <= config.max_lectures_per_week);
            }
        }
    }

    #[test]
    fn test_room_affinity_within_candidate() {
        let problem = sample_problem();
        let config = GaConfig::default();
        let builder = CandidateBuilder::new(&problem, &config);
        let mut rng = SmallRng::seed_from_u64(19);

        for _ in 0..30 {
            let tt = builder.build(&mut rng);
            let lecture_rooms: std::collections::HashSet<_> = tt
                .entries
                .iter()
                .filter(|e| !e.is_lab)
                .map(|e| e.room_id.as_str())
                .collect();
            let lab_rooms: std::collections::HashSet<_> = tt
                .entries
                .iter()
                .filter(|e| e.is_lab)
                .map(|e| e.room_id.as_str())
                .collect();
            assert!(lecture_rooms.len() <= 1);
            assert!(lab_rooms.len() <= 1);
            for room in &lab_rooms {
                assert_eq!(*room, "LAB-1");
            }
        }
    }

    #[test]
    fn test_no_intra_candidate_collisions() {
        let problem = sample_problem();
        let config = GaConfig::default();
        let builder = CandidateBuilder::new(&problem, &config);
        let mut rng = SmallRng::seed_from_u64(23);

        for _ in 0..30 {
            let tt = builder.build(&mut rng);
            for (i, a) in tt.entries.iter().enumerate() {
                for b in tt.entries.iter().skip(i + 1) {
                    if a.day == b.day && a.period == b.period {
                        assert_ne!(a.room_id, b.room_id);
                        assert_ne!(a.teacher_id, b.teacher_id);
                        assert_ne!(a.class, b.class);
                    }
                }
            }
        }
    }

    #[test]
    fn test_no_rooms_of_needed_type_skips() {
        let obligations = vec![TeachingObligation::new("T2", "CS302L", class_a())];
        let subjects = vec![Subject::new("CS302L").with_hours(0, 0, 2)];
        // Only lecture rooms: the lab obligation cannot be placed.
        let classrooms = vec![Classroom::lecture("LH-101")];
        let problem =
            TimetableProblem::new(obligations, &subjects, &classrooms, AvailabilityIndex::new());
        let config = GaConfig::default();
        let builder = CandidateBuilder::new(&problem, &config);
        let mut rng = SmallRng::seed_from_u64(29);

        let tt = builder.build(&mut rng);
        assert!(tt.is_empty());
    }

    #[test]
    fn test_unknown_subject_skipped() {
        let obligations = vec![TeachingObligation::new("T1", "GHOST", class_a())];
        let subjects = vec![Subject::new("CS301").with_hours(3, 0, 0)];
        let classrooms = vec![Classroom::lecture("LH-101")];
        let problem =
            TimetableProblem::new(obligations, &subjects, &classrooms, AvailabilityIndex::new());
        let config = GaConfig::default();
        let builder = CandidateBuilder::new(&problem, &config);
        let mut rng = SmallRng::seed_from_u64(31);

        let tt = builder.build(&mut rng);
        assert!(tt.is_empty());
    }

    #[test]
    fn test_seeded_builds_reproducible() {
        let problem = sample_problem();
        let config = GaConfig::default();
        let builder = CandidateBuilder::new(&problem, &config);

        let mut rng1 = SmallRng::seed_from_u64(99);
        let mut rng2 = SmallRng::seed_from_u64(99);
        assert_eq!(builder.build(&mut rng1), builder.build(&mut rng2));
    }
}
