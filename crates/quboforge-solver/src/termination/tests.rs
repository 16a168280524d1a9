//! Tests for termination conditions.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use quboforge_core::{Direction, Qubo};

use super::*;

fn qubo() -> Qubo {
    Qubo::build(2, [(0, 0, -1.0), (1, 1, -2.0)]).unwrap()
}

fn reject(scope: &mut SolverScope<'_>, times: usize) {
    for _ in 0..times {
        scope.arena_mut().load_candidate();
        scope.accept_candidate(10.0);
    }
}

#[test]
fn test_unimproved_count() {
    let qubo = qubo();
    let mut scope = SolverScope::with_seed(&qubo, Direction::Minimize, 0);
    scope.start_solving(&[false, false]);
    let term = UnimprovedCountTermination::new(3);

    reject(&mut scope, 2);
    assert!(!term.is_terminated(&scope));
    reject(&mut scope, 1);
    assert_eq!(
        term.triggered(&scope),
        Some(TerminationReason::RepeatBudgetExhausted)
    );
}

#[test]
fn test_best_energy_minimize() {
    let qubo = qubo();
    let mut scope = SolverScope::with_seed(&qubo, Direction::Minimize, 0);
    scope.start_solving(&[false, true]);

    assert!(!BestEnergyTermination::new(-3.0).is_terminated(&scope));
    assert_eq!(
        BestEnergyTermination::new(-2.0).triggered(&scope),
        Some(TerminationReason::TargetReached)
    );
    assert!(BestEnergyTermination::new(-1.0).is_terminated(&scope));
}

#[test]
fn test_best_energy_maximize() {
    let qubo = qubo();
    let mut scope = SolverScope::with_seed(&qubo, Direction::Maximize, 0);
    scope.start_solving(&[false, true]);

    assert!(BestEnergyTermination::new(-3.0).is_terminated(&scope));
    assert!(!BestEnergyTermination::new(0.0).is_terminated(&scope));
}

#[test]
fn test_time_termination() {
    let qubo = qubo();
    let mut scope = SolverScope::with_seed(&qubo, Direction::Minimize, 0);
    let term = TimeTermination::new(Duration::ZERO);
    assert!(!term.is_terminated(&scope));
    scope.start_solving(&[false, false]);
    assert_eq!(term.triggered(&scope), Some(TerminationReason::TimedOut));
    assert!(!TimeTermination::seconds(3600).is_terminated(&scope));
}

#[test]
fn test_external_termination() {
    let qubo = qubo();
    let scope = SolverScope::with_seed(&qubo, Direction::Minimize, 0);
    let flag = Arc::new(AtomicBool::new(false));
    let term = ExternalTermination::new(flag.clone());
    assert!(!term.is_terminated(&scope));
    flag.store(true, Ordering::SeqCst);
    assert_eq!(term.triggered(&scope), Some(TerminationReason::Cancelled));
}

#[test]
fn test_optional_termination() {
    let qubo = qubo();
    let mut scope = SolverScope::with_seed(&qubo, Direction::Minimize, 0);
    scope.start_solving(&[false, false]);
    let absent: Option<TimeTermination> = None;
    assert!(!absent.is_terminated(&scope));
    assert!(Some(TimeTermination::new(Duration::ZERO)).is_terminated(&scope));
}

#[test]
fn test_or_reports_first_reason() {
    let qubo = qubo();
    let mut scope = SolverScope::with_seed(&qubo, Direction::Minimize, 0);
    scope.start_solving(&[true, true]);

    let term = OrTermination((
        UnimprovedCountTermination::new(5),
        Some(BestEnergyTermination::new(-3.0)),
        Some(TimeTermination::new(Duration::ZERO)),
    ));
    assert_eq!(term.triggered(&scope), Some(TerminationReason::TargetReached));

    let term = OrTermination((
        UnimprovedCountTermination::new(5),
        None::<BestEnergyTermination>,
        TimeTermination::seconds(3600),
    ));
    assert!(!term.is_terminated(&scope));
}
