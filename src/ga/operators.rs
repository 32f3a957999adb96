//! Genetic operators over candidate timetables.
//!
//! - **Selection**: tournament of three, sampled with replacement.
//! - **Crossover**: class-blocked — each class's whole sub-schedule is
//!   inherited from one parent, chosen by a fair coin flip, so a class
//!   week is never stitched together from two parents.
//! - **Mutation**: per-entry day/period resampling. Rooms are never
//!   mutated, preserving room affinity. Mutation is not
//!   constraint-aware; the fitness function penalizes bad landings.

use std::collections::BTreeSet;

use rand::seq::IndexedRandom;
use rand::Rng;

use super::search::GaConfig;
use crate::models::{ClassKey, Timetable};

/// Number of candidates sampled per tournament.
pub const TOURNAMENT_SIZE: usize = 3;

/// Tournament selection: samples [`TOURNAMENT_SIZE`] candidates with
/// replacement and returns the index of the fittest.
///
/// `population` must be non-empty and `fitnesses` parallel to it.
pub fn tournament_select<R: Rng + ?Sized>(
    population: &[Timetable],
    fitnesses: &[f64],
    rng: &mut R,
) -> usize {
    debug_assert_eq!(population.len(), fitnesses.len());
    let mut best = rng.random_range(0..population.len());
    for _ in 1..TOURNAMENT_SIZE {
        let contender = rng.random_range(0..population.len());
        if fitnesses[contender] > fitnesses[best] {
            best = contender;
        }
    }
    best
}

/// Class-blocked crossover: for every class key present in either
/// parent, the child inherits that class's entire entry block from one
/// parent chosen by a fair coin flip. A class absent from the chosen
/// parent contributes nothing.
pub fn class_crossover<R: Rng + ?Sized>(
    parent1: &Timetable,
    parent2: &Timetable,
    rng: &mut R,
) -> Timetable {
    let by_class1 = parent1.by_class();
    let by_class2 = parent2.by_class();

    let all_classes: BTreeSet<ClassKey> = by_class1.keys().chain(by_class2.keys()).cloned().collect();

    let mut child = Timetable::new();
    for class in &all_classes {
        let source = if rng.random_bool(0.5) {
            by_class1.get(class)
        } else {
            by_class2.get(class)
        };
        if let Some(entries) = source {
            for entry in entries {
                child.push(entry.clone());
            }
        }
    }
    child
}

/// Per-entry mutation: with probability `mutation_rate`, resample the
/// entry's day or period (coin flip which) uniformly from the
/// configured domain. The room is never touched.
pub fn mutate<R: Rng + ?Sized>(timetable: &mut Timetable, config: &GaConfig, rng: &mut R) {
    for entry in &mut timetable.entries {
        if !rng.random_bool(config.mutation_rate) {
            continue;
        }
        if rng.random_bool(0.5) {
            if let Some(day) = config.days.as_slice().choose(rng) {
                entry.day = *day;
            }
        } else {
            entry.period = rng.random_range(1..=config.periods_per_day);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Day, LabSession, ScheduleEntry};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn class_a() -> ClassKey {
        ClassKey::new("3rd", "CSE", "A")
    }

    fn class_b() -> ClassKey {
        ClassKey::new("3rd", "CSE", "B")
    }

    fn class_week(class: ClassKey, course: &str, teacher: &str, room: &str) -> Vec<ScheduleEntry> {
        vec![
            ScheduleEntry::lecture(class.clone(), Day::Monday, 1, course, teacher, room),
            ScheduleEntry::lecture(class.clone(), Day::Wednesday, 2, course, teacher, room),
            ScheduleEntry::lecture(class, Day::Friday, 3, course, teacher, room),
        ]
    }

    #[test]
    fn test_tournament_returns_valid_index() {
        let population = vec![
            Timetable::from_entries(class_week(class_a(), "CS301", "T1", "LH-101")),
            Timetable::from_entries(class_week(class_b(), "CS303", "T2", "LH-102")),
        ];
        let fitnesses = vec![10.0, 50.0];
        let mut rng = SmallRng::seed_from_u64(42);

        for _ in 0..50 {
            let winner = tournament_select(&population, &fitnesses, &mut rng);
            assert!(winner < population.len());
        }
    }

    #[test]
    fn test_tournament_prefers_fitter() {
        let population = vec![
            Timetable::from_entries(class_week(class_a(), "CS301", "T1", "LH-101")),
            Timetable::from_entries(class_week(class_b(), "CS303", "T2", "LH-102")),
        ];
        let fitnesses = vec![-100.0, 100.0];
        let mut rng = SmallRng::seed_from_u64(42);

        // Over repeated draws the dominant candidate must win at least
        // once; each draw misses it only when all three samples land on
        // the weak one.
        let mut saw_fit = false;
        for _ in 0..20 {
            if tournament_select(&population, &fitnesses, &mut rng) == 1 {
                saw_fit = true;
            }
        }
        assert!(saw_fit);
    }

    #[test]
    fn test_tournament_single_candidate() {
        let population = vec![Timetable::from_entries(class_week(
            class_a(),
            "CS301",
            "T1",
            "LH-101",
        ))];
        let mut rng = SmallRng::seed_from_u64(1);
        assert_eq!(tournament_select(&population, &[5.0], &mut rng), 0);
    }

    #[test]
    fn test_crossover_class_keys_from_parents() {
        let p1 = Timetable::from_entries(class_week(class_a(), "CS301", "T1", "LH-101"));
        let p2 = Timetable::from_entries(class_week(class_b(), "CS303", "T2", "LH-102"));
        let mut rng = SmallRng::seed_from_u64(42);

        for _ in 0..20 {
            let child = class_crossover(&p1, &p2, &mut rng);
            for key in child.class_keys() {
                assert!(key == class_a() || key == class_b());
            }
        }
    }

    #[test]
    fn test_crossover_blocks_are_atomic() {
        // The same class in both parents, distinguishable by room.
        let p1 = Timetable::from_entries(class_week(class_a(), "CS301", "T1", "LH-101"));
        let p2 = Timetable::from_entries(class_week(class_a(), "CS301", "T1", "LH-102"));
        let mut rng = SmallRng::seed_from_u64(42);

        for _ in 0..20 {
            let child = class_crossover(&p1, &p2, &mut rng);
            assert_eq!(child.len(), 3);
            let rooms: BTreeSet<&str> =
                child.entries.iter().map(|e| e.room_id.as_str()).collect();
            // All three entries come from exactly one parent.
            assert_eq!(rooms.len(), 1);
        }
    }

    #[test]
    fn test_crossover_multi_class_mixes_per_class() {
        let mut entries1 = class_week(class_a(), "CS301", "T1", "LH-101");
        entries1.extend(class_week(class_b(), "CS303", "T2", "LH-102"));
        let p1 = Timetable::from_entries(entries1);

        let mut entries2 = class_week(class_a(), "CS301", "T1", "LH-103");
        entries2.extend(class_week(class_b(), "CS303", "T2", "LH-104"));
        let p2 = Timetable::from_entries(entries2);

        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..20 {
            let child = class_crossover(&p1, &p2, &mut rng);
            assert_eq!(child.len(), 6);
            // Each class block is internally consistent.
            for class in [class_a(), class_b()] {
                let rooms: BTreeSet<&str> = child
                    .for_class(&class)
                    .iter()
                    .map(|e| e.room_id.as_str())
                    .collect();
                assert_eq!(rooms.len(), 1);
            }
        }
    }

    #[test]
    fn test_mutation_never_touches_rooms() {
        let mut tt = Timetable::from_entries(class_week(class_a(), "CS301", "T1", "LH-101"));
        tt.push(ScheduleEntry::lab(
            class_a(),
            Day::Tuesday,
            5,
            "CS302L",
            "T2",
            "LAB-1",
            LabSession::First,
        ));
        let original_rooms: Vec<String> =
            tt.entries.iter().map(|e| e.room_id.clone()).collect();

        let config = GaConfig::default().with_mutation_rate(1.0);
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..50 {
            mutate(&mut tt, &config, &mut rng);
            let rooms: Vec<String> = tt.entries.iter().map(|e| e.room_id.clone()).collect();
            assert_eq!(rooms, original_rooms);
        }
    }

    #[test]
    fn test_mutation_stays_in_domain() {
        let mut tt = Timetable::from_entries(class_week(class_a(), "CS301", "T1", "LH-101"));
        let config = GaConfig::default().with_mutation_rate(1.0);
        let mut rng = SmallRng::seed_from_u64(42);

        for _ in 0..100 {
            mutate(&mut tt, &config, &mut rng);
            for e in &tt.entries {
                assert!(config.days.contains(&e.day));
                assert!(e.period >= 1 && e.period <= config.periods_per_day);
            }
        }
    }

    #[test]
    fn test_mutation_changes_something_at_full_rate() {
        let tt = Timetable::from_entries(class_week(class_a(), "CS301", "T1", "LH-101"));
        let config = GaConfig::default().with_mutation_rate(1.0);
        let mut rng = SmallRng::seed_from_u64(42);

        let mut changed = false;
        for _ in 0..20 {
            let mut mutated = tt.clone();
            mutate(&mut mutated, &config, &mut rng);
            if mutated != tt {
                changed = true;
                break;
            }
        }
        assert!(changed);
    }

    #[test]
    fn test_zero_rate_is_identity() {
        let tt = Timetable::from_entries(class_week(class_a(), "CS301", "T1", "LH-101"));
        let config = GaConfig::default().with_mutation_rate(0.0);
        let mut rng = SmallRng::seed_from_u64(42);

        let mut mutated = tt.clone();
        mutate(&mut mutated, &config, &mut rng);
        assert_eq!(mutated, tt);
    }
}
