//! Population-based timetable search.
//!
//! A candidate schedule is a flat entry list; the population evolves
//! through score → select → crossover → mutate cycles with elitism.
//! Construction is constraint-aware, mutation deliberately is not —
//! the weighted fitness battery arbitrates.
//!
//! # Submodules
//!
//! - [`problem`]: static inputs for one run
//! - [`builder`]: randomized greedy candidate construction
//! - [`fitness`]: weighted hard/soft criterion battery
//! - [`operators`]: tournament selection, class-blocked crossover,
//!   day/period mutation
//! - [`search`]: generation loop, elitism, convergence
//!
//! # Reference
//! - Colorni et al. (1998), "Metaheuristics for High School Timetabling"
//! - Burke & Petrovic (2002), "Recent Research Directions in Automated Timetabling"

pub mod builder;
pub mod fitness;
pub mod operators;
pub mod problem;
pub mod search;

pub use builder::CandidateBuilder;
pub use fitness::FitnessEvaluator;
pub use operators::{class_crossover, mutate, tournament_select, TOURNAMENT_SIZE};
pub use problem::TimetableProblem;
pub use search::{GaConfig, SearchDriver, SearchOutcome, Termination};
