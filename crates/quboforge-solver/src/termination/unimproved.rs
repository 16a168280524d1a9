//! Termination after consecutive outer iterations without improvement.

use super::Termination;
use crate::scope::SolverScope;
use crate::statistics::TerminationReason;

/// Terminates once `limit` outer iterations in a row failed to improve the best energy.
///
/// Ties count as non-improving.
///
/// # Example
///
/// ```
/// use quboforge_solver::termination::UnimprovedCountTermination;
///
/// // The default repeat budget
/// let term = UnimprovedCountTermination::new(50);
/// assert_eq!(term.limit(), 50);
/// ```
#[derive(Debug, Clone)]
pub struct UnimprovedCountTermination {
    limit: u32,
}

impl UnimprovedCountTermination {
    pub fn new(limit: u32) -> Self {
        Self { limit }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }
}

impl Termination for UnimprovedCountTermination {
    fn triggered(&self, solver_scope: &SolverScope<'_>) -> Option<TerminationReason> {
        (solver_scope.unimproved_count() >= self.limit)
            .then_some(TerminationReason::RepeatBudgetExhausted)
    }
}
