//! Generation loop and tunables.
//!
//! Drives the population through score → select → crossover → mutate
//! cycles with elitism, tracking the best-ever candidate (replaced only
//! on strict improvement). Terminates early once the best candidate is
//! free of hard conflicts, on an optional wall-clock limit, or after
//! the generation cap.
//!
//! The driver never fails on an infeasible instance: it degrades to
//! best-effort and reports residual conflicts and unplaced hours on the
//! outcome for the caller to judge.

use std::time::{Duration, Instant};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::builder::CandidateBuilder;
use super::fitness::FitnessEvaluator;
use super::operators::{class_crossover, mutate, tournament_select};
use super::problem::TimetableProblem;
use crate::error::{Result, ScheduleError};
use crate::models::{Day, Period, Timetable, LUNCH_BREAK_PERIOD, PERIODS_PER_DAY};

/// Tunables for one search run. All knobs have working defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaConfig {
    /// Number of candidates per generation.
    pub population_size: usize,
    /// Generation cap before the search gives up improving.
    pub max_generations: u32,
    /// Per-entry probability of a day/period resample.
    pub mutation_rate: f64,
    /// Number of top candidates carried unchanged each generation.
    pub elitism_count: usize,
    /// Teaching days, in week order.
    pub days: Vec<Day>,
    /// Periods per teaching day.
    pub periods_per_day: Period,
    /// Period immediately before the lunch break (1-indexed).
    pub lunch_break_period: Period,
    /// Weekly single-period cap per (class, subject) pair.
    pub max_lectures_per_week: u32,
    /// Seed for the random source; `None` draws a fresh OS seed.
    pub seed: Option<u64>,
    /// Optional wall-clock bound; exceeding it mid-run returns the
    /// current best-ever candidate.
    pub time_limit: Option<Duration>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            max_generations: 100,
            mutation_rate: 0.1,
            elitism_count: 5,
            days: Day::WEEK.to_vec(),
            periods_per_day: PERIODS_PER_DAY,
            lunch_break_period: LUNCH_BREAK_PERIOD,
            max_lectures_per_week: 3,
            seed: None,
            time_limit: None,
        }
    }
}

impl GaConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    /// Sets the generation cap.
    pub fn with_max_generations(mut self, generations: u32) -> Self {
        self.max_generations = generations;
        self
    }

    /// Sets the per-entry mutation probability.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    /// Sets the elite count carried unchanged per generation.
    pub fn with_elitism_count(mut self, count: usize) -> Self {
        self.elitism_count = count;
        self
    }

    /// Sets the teaching days.
    pub fn with_days(mut self, days: Vec<Day>) -> Self {
        self.days = days;
        self
    }

    /// Sets the weekly lecture cap per (class, subject).
    pub fn with_max_lectures_per_week(mut self, cap: u32) -> Self {
        self.max_lectures_per_week = cap;
        self
    }

    /// Sets the random seed for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the wall-clock bound.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Fails fast on a tunable outside its valid domain.
    pub fn validate(&self) -> Result<()> {
        if self.population_size == 0 {
            return Err(ScheduleError::InvalidConfig(
                "population size must be positive".into(),
            ));
        }
        if self.elitism_count >= self.population_size {
            return Err(ScheduleError::InvalidConfig(
                "elitism count must be smaller than the population size".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(ScheduleError::InvalidConfig(
                "mutation rate must lie in [0, 1]".into(),
            ));
        }
        if self.days.is_empty() {
            return Err(ScheduleError::InvalidConfig(
                "day list must not be empty".into(),
            ));
        }
        if self.periods_per_day < 2 {
            return Err(ScheduleError::InvalidConfig(
                "at least two periods per day are required".into(),
            ));
        }
        if self.lunch_break_period == 0 || self.lunch_break_period > self.periods_per_day {
            return Err(ScheduleError::InvalidConfig(
                "lunch break period is out of range".into(),
            ));
        }
        Ok(())
    }
}

/// Why a search run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Best-ever candidate reached zero hard conflicts.
    Converged,
    /// Generation cap reached; the result may carry conflicts.
    Exhausted,
    /// Wall-clock limit reached mid-run.
    TimedOut,
}

/// Result of one search run.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Best candidate found across all generations.
    pub best: Timetable,
    /// Fitness of the best candidate.
    pub best_fitness: f64,
    /// Residual pairwise hard conflicts in the best candidate.
    pub hard_conflicts: u32,
    /// Generations actually evolved.
    pub generations_run: u32,
    /// Why the run stopped.
    pub termination: Termination,
    /// Required hours the best candidate failed to place.
    pub unplaced_hours: u32,
    /// Best-ever fitness after init and after each generation.
    /// Monotonically non-decreasing.
    pub best_history: Vec<f64>,
}

/// Evolves candidate populations for a problem.
#[derive(Debug, Clone, Copy)]
pub struct SearchDriver<'a> {
    problem: &'a TimetableProblem,
    config: &'a GaConfig,
}

impl<'a> SearchDriver<'a> {
    /// Creates a driver over a problem and configuration.
    pub fn new(problem: &'a TimetableProblem, config: &'a GaConfig) -> Self {
        Self { problem, config }
    }

    /// Runs the search to completion.
    ///
    /// Validates the configuration, seeds the random source from
    /// `config.seed` (or the OS), and evolves until convergence,
    /// exhaustion, or the time limit.
    pub fn run(&self) -> Result<SearchOutcome> {
        self.config.validate()?;
        let mut rng = match self.config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        Ok(self.evolve(&mut rng))
    }

    fn evolve<R: Rng + ?Sized>(&self, rng: &mut R) -> SearchOutcome {
        let builder = CandidateBuilder::new(self.problem, self.config);
        let evaluator = FitnessEvaluator::new(self.problem, self.config);
        let started = Instant::now();

        let mut population: Vec<Timetable> = (0..self.config.population_size)
            .map(|_| builder.build(rng))
            .collect();
        let mut fitnesses: Vec<f64> = population.iter().map(|t| evaluator.evaluate(t)).collect();

        let best_idx = best_index(&fitnesses);
        let mut best = population[best_idx].clone();
        let mut best_fitness = fitnesses[best_idx];
        let mut best_history = vec![best_fitness];

        let mut generations_run = 0u32;
        let mut termination = Termination::Exhausted;

        for generation in 0..self.config.max_generations {
            if self
                .config
                .time_limit
                .is_some_and(|limit| started.elapsed() >= limit)
            {
                termination = Termination::TimedOut;
                break;
            }

            // Elites survive unchanged; the rest of the next generation
            // is bred from tournament winners.
            let mut order: Vec<usize> = (0..population.len()).collect();
            order.sort_by(|&a, &b| fitnesses[b].total_cmp(&fitnesses[a]));

            let mut next: Vec<Timetable> = order
                .iter()
                .take(self.config.elitism_count)
                .map(|&i| population[i].clone())
                .collect();
            while next.len() < self.config.population_size {
                let p1 = &population[tournament_select(&population, &fitnesses, rng)];
                let p2 = &population[tournament_select(&population, &fitnesses, rng)];
                let mut child = class_crossover(p1, p2, rng);
                mutate(&mut child, self.config, rng);
                next.push(child);
            }

            population = next;
            fitnesses = population.iter().map(|t| evaluator.evaluate(t)).collect();

            let gen_best = best_index(&fitnesses);
            if fitnesses[gen_best] > best_fitness {
                best = population[gen_best].clone();
                best_fitness = fitnesses[gen_best];
            }
            generations_run = generation + 1;
            best_history.push(best_fitness);
            tracing::debug!(generation, best_fitness, "generation scored");

            if evaluator.count_conflicts(&best) == 0 {
                termination = Termination::Converged;
                break;
            }
        }

        let hard_conflicts = evaluator.count_conflicts(&best);
        let required = self
            .problem
            .total_required_hours(self.config.max_lectures_per_week);
        let unplaced_hours = required.saturating_sub(best.len() as u32);
        tracing::info!(
            best_fitness,
            hard_conflicts,
            unplaced_hours,
            generations = generations_run,
            "search finished"
        );

        SearchOutcome {
            best,
            best_fitness,
            hard_conflicts,
            generations_run,
            termination,
            unplaced_hours,
            best_history,
        }
    }
}

/// Index of the highest fitness; first wins on ties.
fn best_index(fitnesses: &[f64]) -> usize {
    let mut best = 0;
    for (i, &f) in fitnesses.iter().enumerate().skip(1) {
        if f > fitnesses[best] {
            best = i;
        }
    }
    best
}
