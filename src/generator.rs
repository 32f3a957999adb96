//! Run orchestration.
//!
//! Entry points for scheduling one class or a full roster. Each class's
//! search owns its population and only reads the shared catalogs, so a
//! bulk run fans classes out across rayon workers and joins the
//! per-class outcomes before anything touches the store. Persistence
//! goes through the [`ScheduleStore`] seam with replace-not-merge
//! semantics.

use std::collections::BTreeMap;
use std::fmt;

use rayon::prelude::*;

use crate::error::{Result, ScheduleError};
use crate::ga::{GaConfig, SearchDriver, SearchOutcome, TimetableProblem};
use crate::models::{
    AvailabilityIndex, ClassKey, Classroom, RoomType, ScheduleEntry, Subject, TeachingObligation,
};

/// Per-class status notification emitted during a bulk run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassProgress {
    /// The class's obligations are being collected.
    FetchingAssignments,
    /// The class has no obligations and was skipped.
    Skipped,
    /// The class's schedule was produced.
    Completed,
}

impl ClassProgress {
    /// Human-readable status string.
    pub fn message(self) -> &'static str {
        match self {
            ClassProgress::FetchingAssignments => "Fetching assignments...",
            ClassProgress::Skipped => "Skipped: No assignments",
            ClassProgress::Completed => "Completed",
        }
    }
}

impl fmt::Display for ClassProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// What a bulk run produced for one class.
#[derive(Debug, Clone)]
pub enum ClassOutcome {
    /// A schedule was found (possibly degraded; inspect the outcome).
    Scheduled(SearchOutcome),
    /// The class had no obligations.
    Skipped,
}

/// One class's slot in a bulk report.
#[derive(Debug, Clone)]
pub struct ClassRun {
    /// The class scheduled.
    pub class: ClassKey,
    /// Its outcome or error.
    pub outcome: Result<ClassOutcome>,
}

/// Aggregate result of a bulk run.
#[derive(Debug, Clone, Default)]
pub struct BulkReport {
    /// Per-class results, in roster order.
    pub runs: Vec<ClassRun>,
}

impl BulkReport {
    /// Whether every class was scheduled or skipped.
    pub fn all_succeeded(&self) -> bool {
        self.runs.iter().all(|r| r.outcome.is_ok())
    }

    /// Number of classes that received a schedule.
    pub fn scheduled_count(&self) -> usize {
        self.runs
            .iter()
            .filter(|r| matches!(r.outcome, Ok(ClassOutcome::Scheduled(_))))
            .count()
    }

    /// Number of classes skipped for lack of obligations.
    pub fn skipped_count(&self) -> usize {
        self.runs
            .iter()
            .filter(|r| matches!(r.outcome, Ok(ClassOutcome::Skipped)))
            .count()
    }

    /// Number of classes that failed outright.
    pub fn failed_count(&self) -> usize {
        self.runs.iter().filter(|r| r.outcome.is_err()).count()
    }

    /// Writes every scheduled class to the store. Skipped and failed
    /// classes keep whatever the store already holds.
    pub fn commit_to<S: ScheduleStore>(&self, store: &mut S) -> Result<()> {
        for run in &self.runs {
            if let Ok(ClassOutcome::Scheduled(outcome)) = &run.outcome {
                store.replace_class_schedule(&run.class, &outcome.best.entries)?;
            }
        }
        Ok(())
    }
}

/// Persistence collaborator for finished schedules.
///
/// Implementations must honor replace-not-merge semantics: any entries
/// previously stored for the class are cleared before the new set is
/// written.
pub trait ScheduleStore {
    /// Replaces the stored schedule for one class.
    fn replace_class_schedule(&mut self, class: &ClassKey, entries: &[ScheduleEntry]) -> Result<()>;
}

/// In-memory store, mainly for tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    schedules: BTreeMap<ClassKey, Vec<ScheduleEntry>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// The stored schedule for a class (empty if none).
    pub fn class_schedule(&self, class: &ClassKey) -> &[ScheduleEntry] {
        self.schedules.get(class).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of classes with a stored schedule.
    pub fn class_count(&self) -> usize {
        self.schedules.len()
    }
}

impl ScheduleStore for MemoryStore {
    fn replace_class_schedule(&mut self, class: &ClassKey, entries: &[ScheduleEntry]) -> Result<()> {
        self.schedules.insert(class.clone(), entries.to_vec());
        Ok(())
    }
}

/// Schedules classes against shared catalogs.
#[derive(Debug, Clone, Default)]
pub struct TimetableGenerator {
    config: GaConfig,
}

impl TimetableGenerator {
    /// Creates a generator with the given tunables.
    pub fn new(config: GaConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &GaConfig {
        &self.config
    }

    /// Schedules a single class.
    ///
    /// Fails fast — before any search — on an invalid configuration, an
    /// empty obligation set for the class, or a missing room type the
    /// class's subjects require. The returned outcome may still be
    /// degraded (residual conflicts, unplaced hours); callers decide
    /// whether to accept it.
    pub fn generate_for_class(
        &self,
        class: &ClassKey,
        obligations: &[TeachingObligation],
        subjects: &[Subject],
        classrooms: &[Classroom],
        availability: &AvailabilityIndex,
    ) -> Result<SearchOutcome> {
        self.config.validate()?;
        let class_obligations: Vec<TeachingObligation> = obligations
            .iter()
            .filter(|ob| ob.class == *class)
            .cloned()
            .collect();
        run_class(
            &self.config,
            class,
            class_obligations,
            subjects,
            classrooms,
            availability,
        )
    }

    /// Schedules every class on the roster, one independent search per
    /// class on rayon workers.
    ///
    /// `progress` is invoked per class with status notifications. A
    /// class with no obligations is skipped, not failed; a per-class
    /// error is captured in the report without aborting the batch. With
    /// a fixed base seed, each class derives its own seed from its
    /// roster position, so a bulk run is reproducible regardless of
    /// worker interleaving.
    pub fn generate_all<F>(
        &self,
        roster: &[ClassKey],
        obligations: &[TeachingObligation],
        subjects: &[Subject],
        classrooms: &[Classroom],
        availability: &AvailabilityIndex,
        progress: F,
    ) -> Result<BulkReport>
    where
        F: Fn(&ClassKey, ClassProgress) + Sync,
    {
        self.config.validate()?;

        let runs: Vec<ClassRun> = roster
            .par_iter()
            .enumerate()
            .map(|(position, class)| {
                progress(class, ClassProgress::FetchingAssignments);

                let class_obligations: Vec<TeachingObligation> = obligations
                    .iter()
                    .filter(|ob| ob.class == *class)
                    .cloned()
                    .collect();
                if class_obligations.is_empty() {
                    tracing::info!(class = %class, "skipped: no assignments");
                    progress(class, ClassProgress::Skipped);
                    return ClassRun {
                        class: class.clone(),
                        outcome: Ok(ClassOutcome::Skipped),
                    };
                }

                let mut config = self.config.clone();
                config.seed = self.config.seed.map(|s| s.wrapping_add(position as u64));

                match run_class(
                    &config,
                    class,
                    class_obligations,
                    subjects,
                    classrooms,
                    availability,
                ) {
                    Ok(outcome) => {
                        progress(class, ClassProgress::Completed);
                        ClassRun {
                            class: class.clone(),
                            outcome: Ok(ClassOutcome::Scheduled(outcome)),
                        }
                    }
                    Err(err) => {
                        tracing::warn!(class = %class, error = %err, "class scheduling failed");
                        ClassRun {
                            class: class.clone(),
                            outcome: Err(err),
                        }
                    }
                }
            })
            .collect();

        Ok(BulkReport { runs })
    }
}

/// Pre-checks one class's inputs and runs the search.
fn run_class(
    config: &GaConfig,
    class: &ClassKey,
    class_obligations: Vec<TeachingObligation>,
    subjects: &[Subject],
    classrooms: &[Classroom],
    availability: &AvailabilityIndex,
) -> Result<SearchOutcome> {
    if class_obligations.is_empty() {
        return Err(ScheduleError::NoObligations(class.clone()));
    }
    if classrooms.is_empty() {
        return Err(ScheduleError::NoClassrooms);
    }

    let problem = TimetableProblem::new(
        class_obligations,
        subjects,
        classrooms,
        availability.clone(),
    );
    for room_type in [RoomType::Lecture, RoomType::Lab] {
        if problem.requires_room_type(room_type) && problem.rooms_of(room_type).is_empty() {
            return Err(ScheduleError::NoRoomsOfType(room_type));
        }
    }

    tracing::info!(
        class = %class,
        obligations = problem.obligations.len(),
        "scheduling class"
    );
    SearchDriver::new(&problem, config).run()
}
