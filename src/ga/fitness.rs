//! Candidate scoring.
//!
//! A candidate's fitness is a signed weighted sum over a battery of
//! hard and soft criteria; higher is better. Every criterion is a pure
//! function of the candidate and the static problem inputs, so a fixed
//! candidate always scores identically. The weights are hand-tuned and
//! their relative magnitudes are load-bearing: hard conflicts dominate
//! everything else, blackout violations dominate the soft criteria.

use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::problem::TimetableProblem;
use super::search::GaConfig;
use crate::models::{ClassKey, Day, Period, RoomType, Timetable};

/// Weight per pairwise room/teacher/class collision.
pub const CONFLICT_WEIGHT: f64 = 100.0;
/// Weight per idle period inside a class's day.
pub const GAP_WEIGHT: f64 = 20.0;
/// Weight on the day-load balance reward.
pub const DAY_BALANCE_WEIGHT: f64 = 5.0;
/// Weight per correctly-typed room usage.
pub const ROOM_TYPE_WEIGHT: f64 = 20.0;
/// Weight per same-day subject repetition beyond the expected count.
pub const REPETITION_WEIGHT: f64 = 50.0;
/// Weight per room-affinity inconsistency point.
pub const ROOM_AFFINITY_WEIGHT: f64 = 60.0;
/// Weight per malformed lab block.
pub const LAB_INTEGRITY_WEIGHT: f64 = 40.0;
/// Weight per lecture hour over the weekly cap.
pub const LECTURE_CAP_WEIGHT: f64 = 30.0;
/// Weight per entry on a blacked-out teacher slot.
pub const BLACKOUT_WEIGHT: f64 = 80.0;
/// Weight per teacher period beyond two consecutive.
pub const CONSECUTIVE_RUN_WEIGHT: f64 = 60.0;

/// Scores candidates against a problem.
#[derive(Debug, Clone, Copy)]
pub struct FitnessEvaluator<'a> {
    problem: &'a TimetableProblem,
    config: &'a GaConfig,
}

impl<'a> FitnessEvaluator<'a> {
    /// Creates an evaluator over a problem and configuration.
    pub fn new(problem: &'a TimetableProblem, config: &'a GaConfig) -> Self {
        Self { problem, config }
    }

    /// Computes the weighted fitness of a candidate. Higher is better.
    pub fn evaluate(&self, timetable: &Timetable) -> f64 {
        let mut fitness = 0.0;
        fitness -= self.count_conflicts(timetable) as f64 * CONFLICT_WEIGHT;
        fitness -= self.count_student_gaps(timetable) as f64 * GAP_WEIGHT;
        fitness += self.day_balance(timetable) * DAY_BALANCE_WEIGHT;
        fitness += self.room_allocation_score(timetable) as f64 * ROOM_TYPE_WEIGHT;
        fitness -= self.count_subject_repetitions(timetable) as f64 * REPETITION_WEIGHT;
        fitness -= self.count_room_inconsistencies(timetable) as f64 * ROOM_AFFINITY_WEIGHT;
        fitness -= self.count_lab_violations(timetable) as f64 * LAB_INTEGRITY_WEIGHT;
        fitness -= self.count_lecture_cap_violations(timetable) as f64 * LECTURE_CAP_WEIGHT;
        fitness -= self.count_blackout_violations(timetable) as f64 * BLACKOUT_WEIGHT;
        fitness -= self.count_teacher_overruns(timetable) as f64 * CONSECUTIVE_RUN_WEIGHT;
        fitness
    }

    /// Pairwise hard conflicts: two entries in the same (day, period)
    /// sharing a room, a teacher, or a class. Each shared dimension
    /// counts separately.
    pub fn count_conflicts(&self, timetable: &Timetable) -> u32 {
        let entries = &timetable.entries;
        let mut conflicts = 0;
        for (i, a) in entries.iter().enumerate() {
            for b in entries.iter().skip(i + 1) {
                if a.day != b.day || a.period != b.period {
                    continue;
                }
                if a.room_id == b.room_id {
                    conflicts += 1;
                }
                if a.teacher_id == b.teacher_id {
                    conflicts += 1;
                }
                if a.class == b.class {
                    conflicts += 1;
                }
            }
        }
        conflicts
    }

    /// Idle periods between a class's sessions within a day. A gap that
    /// spans the lunch break is shortened by one period.
    pub fn count_student_gaps(&self, timetable: &Timetable) -> i64 {
        let lunch = self.config.lunch_break_period as i64;
        let mut per_class_day: HashMap<(&ClassKey, Day), Vec<Period>> = HashMap::new();
        for e in &timetable.entries {
            per_class_day
                .entry((&e.class, e.day))
                .or_default()
                .push(e.period);
        }

        let mut total = 0i64;
        for periods in per_class_day.values_mut() {
            periods.sort_unstable();
            for w in periods.windows(2) {
                let (prev, cur) = (w[0] as i64, w[1] as i64);
                let gap = if prev < lunch && cur > lunch {
                    cur - prev - 2
                } else {
                    cur - prev - 1
                };
                if gap > 0 {
                    total += gap;
                }
            }
        }
        total
    }

    /// Day-load balance reward: `10 − mean(per-class std-dev of daily
    /// entry counts)`. Only days that carry entries are counted.
    pub fn day_balance(&self, timetable: &Timetable) -> f64 {
        let mut per_class: BTreeMap<&ClassKey, BTreeMap<Day, u32>> = BTreeMap::new();
        for e in &timetable.entries {
            *per_class
                .entry(&e.class)
                .or_default()
                .entry(e.day)
                .or_insert(0) += 1;
        }
        if per_class.is_empty() {
            return 0.0;
        }

        let mut total_std_dev = 0.0;
        for counts in per_class.values() {
            let values: Vec<f64> = counts.values().map(|&c| c as f64).collect();
            let mean = values.iter().sum::<f64>() / values.len() as f64;
            let variance =
                values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
            total_std_dev += variance.sqrt();
        }
        10.0 - total_std_dev / per_class.len() as f64
    }

    /// Correct room-type usage: +1 for a lab subject in a lab room, +1
    /// for a lecture/theory subject in a lecture room.
    pub fn room_allocation_score(&self, timetable: &Timetable) -> u32 {
        let mut score = 0;
        for e in &timetable.entries {
            let subject = self.problem.subject(&e.course_code);
            let room = self
                .problem
                .classrooms
                .iter()
                .find(|r| r.room_id == e.room_id);
            if let (Some(subject), Some(room)) = (subject, room) {
                if subject.practical_hr > 0 && room.room_type == RoomType::Lab {
                    score += 1;
                }
                if (subject.lecture_hr > 0 || subject.theory_hr > 0)
                    && room.room_type == RoomType::Lecture
                {
                    score += 1;
                }
            }
        }
        score
    }

    /// Same-day repetitions beyond the expected count: one occurrence
    /// for a lecture, two (the pair) for a lab.
    pub fn count_subject_repetitions(&self, timetable: &Timetable) -> u32 {
        let mut counts: HashMap<(&ClassKey, Day, &str), u32> = HashMap::new();
        let mut repetitions = 0;
        for e in &timetable.entries {
            let count = counts
                .entry((&e.class, e.day, e.course_code.as_str()))
                .or_insert(0);
            *count += 1;
            if e.is_lab {
                if *count > 2 {
                    repetitions += 1;
                }
            } else if *count > 1 {
                repetitions += 1;
            }
        }
        repetitions
    }

    /// Room-affinity inconsistency points: +2 per entry contradicting
    /// the first room seen for its (class, subject), +3 per entry
    /// contradicting the class's established lecture or lab room.
    pub fn count_room_inconsistencies(&self, timetable: &Timetable) -> u32 {
        let mut subject_rooms: HashMap<(&ClassKey, &str), &str> = HashMap::new();
        let mut section_rooms: HashMap<&ClassKey, (Option<&str>, Option<&str>)> = HashMap::new();
        let mut inconsistencies = 0;

        for e in &timetable.entries {
            match subject_rooms.entry((&e.class, e.course_code.as_str())) {
                Entry::Vacant(slot) => {
                    slot.insert(e.room_id.as_str());
                }
                Entry::Occupied(slot) => {
                    if *slot.get() != e.room_id {
                        inconsistencies += 2;
                    }
                }
            }

            let (lecture_room, lab_room) = section_rooms.entry(&e.class).or_insert((None, None));
            let established = if e.is_lab { lab_room } else { lecture_room };
            match *established {
                None => *established = Some(e.room_id.as_str()),
                Some(room) => {
                    if room != e.room_id {
                        inconsistencies += 3;
                    }
                }
            }
        }
        inconsistencies
    }

    /// Malformed lab blocks: a (class, course, day) lab group that is
    /// not exactly two entries, or whose periods are not consecutive.
    pub fn count_lab_violations(&self, timetable: &Timetable) -> u32 {
        let mut groups: HashMap<(&ClassKey, &str, Day), Vec<Period>> = HashMap::new();
        for e in timetable.entries.iter().filter(|e| e.is_lab) {
            groups
                .entry((&e.class, e.course_code.as_str(), e.day))
                .or_default()
                .push(e.period);
        }

        let mut violations = 0;
        for periods in groups.values_mut() {
            periods.sort_unstable();
            if periods.len() != 2 {
                violations += 1;
            } else if periods[1] - periods[0] != 1 {
                violations += 1;
            }
        }
        violations
    }

    /// Lecture hours over the weekly per-(class, course) cap.
    pub fn count_lecture_cap_violations(&self, timetable: &Timetable) -> u32 {
        let cap = self.config.max_lectures_per_week;
        let mut counts: HashMap<(&ClassKey, &str), u32> = HashMap::new();
        for e in timetable.entries.iter().filter(|e| !e.is_lab) {
            *counts
                .entry((&e.class, e.course_code.as_str()))
                .or_insert(0) += 1;
        }
        counts.values().map(|&c| c.saturating_sub(cap)).sum()
    }

    /// Entries placed on a blacked-out teacher slot.
    pub fn count_blackout_violations(&self, timetable: &Timetable) -> u32 {
        timetable
            .entries
            .iter()
            .filter(|e| {
                self.problem
                    .availability
                    .is_blocked(&e.teacher_id, e.day, e.period)
            })
            .count() as u32
    }

    /// Teacher periods beyond two consecutive in a day: a run of length
    /// n > 2 contributes n − 2.
    pub fn count_teacher_overruns(&self, timetable: &Timetable) -> u32 {
        let mut per_teacher_day: HashMap<(&str, Day), BTreeSet<Period>> = HashMap::new();
        for e in &timetable.entries {
            per_teacher_day
                .entry((e.teacher_id.as_str(), e.day))
                .or_default()
                .insert(e.period);
        }

        let mut violations = 0;
        for periods in per_teacher_day.values() {
            let mut run = 1u32;
            let mut prev: Option<Period> = None;
            for &p in periods {
                if let Some(q) = prev {
                    if p == q + 1 {
                        run += 1;
                    } else {
                        if run > 2 {
                            violations += run - 2;
                        }
                        run = 1;
                    }
                }
                prev = Some(p);
            }
            if run > 2 {
                violations += run - 2;
            }
        }
        violations
    }
}
