//! User callback sub-solver.

use std::fmt::Debug;

use quboforge_core::{Qubo, SubSolverError};

use super::{SubSolution, SubSolver, SubproblemRequest};

/// Wraps a closure `(sub_qubo, initial) -> assignment` as a [`SubSolver`].
///
/// # Example
///
/// ```
/// use quboforge_core::{Qubo, SubSolverError};
/// use quboforge_solver::FnSubSolver;
///
/// // Sets every variable with a negative linear bias.
/// let solver = FnSubSolver::new(|qubo: &Qubo, _initial: &[bool]| {
///     Ok::<_, SubSolverError>((0..qubo.num_variables()).map(|i| qubo.linear(i) < 0.0).collect())
/// });
/// ```
pub struct FnSubSolver<F> {
    solve_fn: F,
}

impl<F> FnSubSolver<F>
where
    F: Fn(&Qubo, &[bool]) -> Result<Vec<bool>, SubSolverError> + Send + Sync,
{
    pub fn new(solve_fn: F) -> Self {
        Self { solve_fn }
    }
}

impl<F> Debug for FnSubSolver<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnSubSolver").finish_non_exhaustive()
    }
}

impl<F> SubSolver for FnSubSolver<F>
where
    F: Fn(&Qubo, &[bool]) -> Result<Vec<bool>, SubSolverError> + Send + Sync,
{
    fn solve(&self, request: &SubproblemRequest<'_>) -> Result<SubSolution, SubSolverError> {
        (self.solve_fn)(request.qubo(), request.initial).map(SubSolution::new)
    }
}
