//! Scope hierarchy for solver state management.
//!
//! [`SolverScope`] is the single owner of run-wide mutable state: the
//! best-known assignment, the occurrence ledger, the seeded random stream and
//! the statistics. Decomposer, sub-solvers and terminations receive borrows.

mod solver;

pub use solver::{Acceptance, BestSolution, SolverScope};

#[cfg(test)]
mod tests;
