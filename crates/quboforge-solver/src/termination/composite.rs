//! Composite termination (OR).
//!
//! Uses macro-generated tuple implementations for zero type erasure.

use super::Termination;
use crate::scope::SolverScope;
use crate::statistics::TerminationReason;

/// Combines multiple terminations with OR logic (any must terminate).
///
/// Children are checked in tuple order; the first that fires supplies the reason.
///
/// # Examples
///
/// ```
/// use quboforge_solver::termination::{OrTermination, TimeTermination, UnimprovedCountTermination};
///
/// // Terminate after 30 seconds OR 50 unimproved iterations
/// let termination = OrTermination((
///     UnimprovedCountTermination::new(50),
///     TimeTermination::seconds(30),
/// ));
/// ```
#[derive(Debug)]
pub struct OrTermination<T>(pub T);

impl<T> OrTermination<T> {
    /// Creates a new OR termination from a tuple of terminations.
    pub fn new(terminations: T) -> Self {
        Self(terminations)
    }
}

/// Generates `Termination` implementations for OR tuples.
macro_rules! impl_or_termination {
    ($($idx:tt: $T:ident),+) => {
        impl<$($T),+> Termination for OrTermination<($($T,)+)>
        where
            $($T: Termination,)+
        {
            fn triggered(&self, solver_scope: &SolverScope<'_>) -> Option<TerminationReason> {
                None $(.or_else(|| (self.0).$idx.triggered(solver_scope)))+
            }
        }
    };
}

impl_or_termination!(0: T0);
impl_or_termination!(0: T0, 1: T1);
impl_or_termination!(0: T0, 1: T1, 2: T2);
impl_or_termination!(0: T0, 1: T1, 2: T2, 3: T3);
impl_or_termination!(0: T0, 1: T1, 2: T2, 3: T3, 4: T4);
