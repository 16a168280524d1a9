//! Target energy termination.

use super::Termination;
use crate::scope::SolverScope;
use crate::statistics::TerminationReason;

/// Terminates when the best energy reaches or passes a target under the
/// run's optimization direction.
///
/// # Example
///
/// ```
/// use quboforge_solver::termination::BestEnergyTermination;
///
/// let term = BestEnergyTermination::new(-18.0);
/// assert_eq!(term.target(), -18.0);
/// ```
#[derive(Debug, Clone)]
pub struct BestEnergyTermination {
    target: f64,
}

impl BestEnergyTermination {
    pub fn new(target: f64) -> Self {
        Self { target }
    }

    pub fn target(&self) -> f64 {
        self.target
    }
}

impl Termination for BestEnergyTermination {
    fn triggered(&self, solver_scope: &SolverScope<'_>) -> Option<TerminationReason> {
        solver_scope
            .direction()
            .reached(solver_scope.best_energy(), self.target)
            .then_some(TerminationReason::TargetReached)
    }
}
