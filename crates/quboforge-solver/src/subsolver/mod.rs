//! Pluggable sub-problem solvers.
//!
//! A [`SubSolver`] has one capability: given a sub-QUBO over local indices
//! `0..len` and an initial assignment, return an assignment of the same
//! length. Implementations:
//! - [`TabuSubSolver`], the internal tabu search
//! - [`FnSubSolver`], a user callback
//! - [`SamplerSubSolver`], an adapter over an external multi-sample service
//!
//! Calls are synchronous. The orchestrator checks the returned length and
//! the wall clock as soon as a call returns.

mod callback;
mod sampler;


pub use callback::FnSubSolver;
pub use sampler::{SamplerSubSolver, SubproblemSampler};

use std::fmt::Debug;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Instant;

use quboforge_config::TabuConfig;
use quboforge_core::{Direction, Qubo, SubSolverError, Subproblem};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::interrupt::Interrupt;
use crate::tabu::TabuSearch;

/// One sub-problem handed to a [`SubSolver`].
#[derive(Debug, Clone, Copy)]
pub struct SubproblemRequest<'a> {
    /// Run-wide sequence number of this sub-problem, starting at 0.
    pub index: u64,
    pub subproblem: &'a Subproblem,
    /// Best-known assignment restricted to the subset.
    pub initial: &'a [bool],
    pub direction: Direction,
    pub deadline: Option<Instant>,
    pub cancel: Option<&'a AtomicBool>,
    /// Seed for any randomness the solver needs, drawn from the run's stream.
    pub seed: u64,
}

impl<'a> SubproblemRequest<'a> {
    /// The sub-QUBO over local indices.
    pub fn qubo(&self) -> &'a Qubo {
        self.subproblem.qubo()
    }

    /// Global ordinals of the local indices.
    pub fn variables(&self) -> &'a [usize] {
        self.subproblem.variables()
    }

    pub fn len(&self) -> usize {
        self.subproblem.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subproblem.is_empty()
    }

    pub fn interrupt(&self) -> Interrupt<'a> {
        Interrupt::new(self.deadline, self.cancel)
    }

    /// A generator seeded for this request.
    pub fn rng(&self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.seed)
    }
}

/// Assignment returned by a [`SubSolver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubSolution {
    pub assignment: Vec<bool>,
    /// Inner search iterations spent, if the solver counts them.
    pub iterations: u64,
}

impl SubSolution {
    pub fn new(assignment: Vec<bool>) -> Self {
        Self {
            assignment,
            iterations: 0,
        }
    }

    pub fn with_iterations(mut self, iterations: u64) -> Self {
        self.iterations = iterations;
        self
    }
}

/// Solves sub-QUBOs for the orchestrator.
///
/// Implementations must be shareable across threads: parallel rounds call
/// `solve` concurrently on independent requests.
pub trait SubSolver: Send + Sync + Debug {
    /// Returns an assignment for `request`, of length `request.len()`.
    ///
    /// A wrong length is reported by the caller as a contract violation;
    /// an `Err` aborts the run without retry.
    fn solve(&self, request: &SubproblemRequest<'_>) -> Result<SubSolution, SubSolverError>;
}

impl<T: SubSolver + ?Sized> SubSolver for Arc<T> {
    fn solve(&self, request: &SubproblemRequest<'_>) -> Result<SubSolution, SubSolverError> {
        (**self).solve(request)
    }
}

/// Internal tabu search as a sub-solver.
#[derive(Debug, Clone, Default)]
pub struct TabuSubSolver {
    search: TabuSearch,
}

impl TabuSubSolver {
    pub fn new(config: TabuConfig) -> Self {
        Self {
            search: TabuSearch::new(config),
        }
    }
}

impl SubSolver for TabuSubSolver {
    fn solve(&self, request: &SubproblemRequest<'_>) -> Result<SubSolution, SubSolverError> {
        let mut state = request.initial.to_vec();
        let mut rng = request.rng();
        let outcome = self.search.search(
            request.qubo(),
            &mut state,
            request.direction,
            &mut rng,
            request.interrupt(),
        );
        Ok(SubSolution::new(state).with_iterations(outcome.iterations))
    }
}
