//! quboforge - A decomposing QUBO solver in Rust
//!
//! Large QUBO and Ising problems are split into bounded, connected
//! sub-problems, each re-optimized by tabu search (or a pluggable
//! sub-solver) against the best assignment found so far.
//!
//! # Example
//!
//! ```rust
//! use quboforge::prelude::*;
//!
//! // a ring of ten variables that all want to be on
//! let mut terms: Vec<(u32, u32, f64)> = (0..10).map(|i| (i, i, -1.0)).collect();
//! terms.extend((0..10).map(|i| (i, (i + 1) % 10, -1.0)));
//!
//! let samples = QuboSampler::new().with_seed(7).sample_qubo(terms).unwrap();
//! assert_eq!(samples.first().unwrap().energy, -20.0);
//! ```

// Problem model
pub use quboforge_core::format::{parse_qubo, write_qubo};
pub use quboforge_core::{
    Direction, IsingProblem, LabeledIsing, LabeledQubo, Qubo, QuboBuilder, QuboError, Result,
    SubSolverError, Variables,
};

// Configuration
pub use quboforge_config::{
    ConfigError, DecompositionAlgorithm, InitialStateConfig, SolverConfig, TabuConfig,
};

// Solver
pub use quboforge_solver::{
    BestSolution, FnSubSolver, QuboSolver, Sample, SampleSet, SamplerSubSolver, SolveOutcome,
    SolverStatistics, StateRecord, SubSolution, SubSolver, SubproblemRequest, SubproblemSampler,
    TabuSubSolver, TerminationReason, Vartype,
};

mod sampler;
pub use sampler::QuboSampler;

#[cfg(feature = "console")]
pub mod console;

pub mod prelude {
    pub use super::{
        DecompositionAlgorithm, LabeledQubo, Qubo, QuboError, QuboSampler, QuboSolver, Sample,
        SampleSet, SolverConfig, SubSolver,
    };
}
