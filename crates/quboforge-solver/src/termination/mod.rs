//! Termination conditions for the outer solve loop.

mod best_energy;
mod composite;
mod external;
mod time;
mod unimproved;

use std::fmt::Debug;

use crate::scope::SolverScope;
use crate::statistics::TerminationReason;

pub use best_energy::BestEnergyTermination;
pub use composite::OrTermination;
pub use external::ExternalTermination;
pub use time::TimeTermination;
pub use unimproved::UnimprovedCountTermination;

/// Trait for determining when to stop solving.
pub trait Termination: Send + Debug {
    /// Returns the reason to stop, or `None` to keep going.
    fn triggered(&self, solver_scope: &SolverScope<'_>) -> Option<TerminationReason>;

    /// Returns true if solving should terminate.
    fn is_terminated(&self, solver_scope: &SolverScope<'_>) -> bool {
        self.triggered(solver_scope).is_some()
    }
}

/// An absent condition never fires.
impl<T: Termination> Termination for Option<T> {
    fn triggered(&self, solver_scope: &SolverScope<'_>) -> Option<TerminationReason> {
        self.as_ref().and_then(|t| t.triggered(solver_scope))
    }
}

#[cfg(test)]
mod tests;
