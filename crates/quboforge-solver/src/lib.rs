//! quboforge Solver Engine
//!
//! This crate provides the decomposing QUBO solver:
//! - Tabu search over single-bit flips
//! - Connected sub-problem selection (energy impact, solution diversity)
//! - Pluggable sub-solvers (tabu, callback, external sampler)
//! - Termination conditions
//! - Occurrence ledger and labeled sample output

pub mod arena;
pub mod decomposition;
pub mod interrupt;
pub mod ledger;
pub mod sample_set;
pub mod scope;
pub mod solver;
pub mod statistics;
pub mod subsolver;
pub mod tabu;
pub mod termination;

pub use arena::StateArena;
pub use decomposition::{
    ChangeHistory, Decomposer, EnergyImpactRanking, RankingStrategy, SolutionDiversityRanking,
    VariableRanking,
};
pub use interrupt::Interrupt;
pub use ledger::{ResultLedger, StateRecord};
pub use sample_set::{Sample, SampleSet, Vartype};
pub use scope::{Acceptance, BestSolution, SolverScope};
pub use solver::{QuboSolver, SolveOutcome};
pub use statistics::{SolverStatistics, TerminationReason};
pub use subsolver::{
    FnSubSolver, SamplerSubSolver, SubSolution, SubSolver, SubproblemRequest, SubproblemSampler,
    TabuSubSolver,
};
pub use tabu::{
    default_tenure, one_flip_descent, DescentOutcome, TabuOutcome, TabuParams, TabuSearch,
};
pub use termination::{
    BestEnergyTermination, ExternalTermination, OrTermination, Termination, TimeTermination,
    UnimprovedCountTermination,
};
