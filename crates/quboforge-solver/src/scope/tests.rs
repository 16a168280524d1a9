//! Tests for the solver scope.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use quboforge_core::{Direction, Qubo};
use tokio::sync::mpsc;

use super::*;
use crate::statistics::TerminationReason;

fn two_var_qubo() -> Qubo {
    Qubo::build(2, [(0, 0, -1.0), (1, 1, -1.0), (0, 1, 3.0)]).unwrap()
}

fn set_candidate(scope: &mut SolverScope<'_>, bits: &[bool]) {
    let (_, candidate) = scope.arena_mut().load_candidate();
    candidate.copy_from_slice(bits);
}

#[test]
fn test_start_solving_records_initial() {
    let qubo = two_var_qubo();
    let mut scope = SolverScope::with_seed(&qubo, Direction::Minimize, 1);
    scope.start_solving(&[true, true]);

    assert_eq!(scope.best_energy(), 1.0);
    assert_eq!(scope.ledger().occurrences(&[true, true]), 1);
    assert!(scope.elapsed().is_some());
}

#[test]
fn test_improvement_promotes_and_resets() {
    let qubo = two_var_qubo();
    let mut scope = SolverScope::with_seed(&qubo, Direction::Minimize, 1);
    scope.start_solving(&[false, false]);

    set_candidate(&mut scope, &[false, false]);
    assert_eq!(scope.accept_candidate(0.0), Acceptance::Tied);
    assert_eq!(scope.unimproved_count(), 1);

    set_candidate(&mut scope, &[true, false]);
    assert_eq!(scope.accept_candidate(-1.0), Acceptance::Improved);
    assert_eq!(scope.best_state(), &[true, false]);
    assert_eq!(scope.best_energy(), -1.0);
    assert_eq!(scope.unimproved_count(), 0);
    assert_eq!(scope.statistics().improvements, 1);
}

#[test]
fn test_tie_counts_without_promoting() {
    let qubo = two_var_qubo();
    let mut scope = SolverScope::with_seed(&qubo, Direction::Minimize, 1);
    scope.start_solving(&[true, false]);

    set_candidate(&mut scope, &[false, true]);
    assert_eq!(scope.accept_candidate(-1.0), Acceptance::Tied);
    assert_eq!(scope.best_state(), &[true, false]);
    assert_eq!(scope.ledger().occurrences(&[false, true]), 1);

    set_candidate(&mut scope, &[true, false]);
    scope.accept_candidate(-1.0);
    assert_eq!(scope.ledger().occurrences(&[true, false]), 2);
    assert_eq!(scope.unimproved_count(), 2);
    assert_eq!(scope.statistics().ties, 2);
}

#[test]
fn test_worse_candidate_rejected() {
    let qubo = two_var_qubo();
    let mut scope = SolverScope::with_seed(&qubo, Direction::Minimize, 1);
    scope.start_solving(&[true, false]);

    set_candidate(&mut scope, &[true, true]);
    assert_eq!(scope.accept_candidate(1.0), Acceptance::Rejected);
    assert_eq!(scope.ledger().occurrences(&[true, true]), 0);
    assert_eq!(scope.unimproved_count(), 1);
}

#[test]
fn test_maximize_direction() {
    let qubo = two_var_qubo();
    let mut scope = SolverScope::with_seed(&qubo, Direction::Maximize, 1);
    scope.start_solving(&[false, false]);

    set_candidate(&mut scope, &[true, true]);
    assert_eq!(scope.accept_candidate(1.0), Acceptance::Improved);
    set_candidate(&mut scope, &[true, false]);
    assert_eq!(scope.accept_candidate(-1.0), Acceptance::Rejected);
}

#[test]
fn test_best_solutions_streamed() {
    let qubo = two_var_qubo();
    let (sender, mut receiver) = mpsc::unbounded_channel();
    let mut scope = SolverScope::with_seed(&qubo, Direction::Minimize, 1);
    scope.set_best_sender(sender);
    scope.start_solving(&[false, false]);
    scope.begin_iteration();
    set_candidate(&mut scope, &[false, true]);
    scope.accept_candidate(-1.0);

    let first = receiver.try_recv().unwrap();
    assert_eq!(first.energy, 0.0);
    assert_eq!(first.outer_iteration, 0);
    let second = receiver.try_recv().unwrap();
    assert_eq!(second.state, vec![false, true]);
    assert_eq!(second.outer_iteration, 1);
    assert!(receiver.try_recv().is_err());
}

#[test]
fn test_terminate_early_flag() {
    let qubo = two_var_qubo();
    let flag = Arc::new(AtomicBool::new(false));
    let mut scope = SolverScope::with_seed(&qubo, Direction::Minimize, 1);
    scope.set_terminate_early_flag(flag.clone());
    assert!(!scope.is_terminate_early());
    flag.store(true, std::sync::atomic::Ordering::SeqCst);
    assert!(scope.is_terminate_early());
}

#[test]
fn test_deadline_after_start() {
    let qubo = two_var_qubo();
    let mut scope = SolverScope::with_seed(&qubo, Direction::Minimize, 1)
        .with_time_limit(Some(Duration::ZERO));
    assert!(scope.deadline().is_none());
    scope.start_solving(&[false, false]);
    assert!(scope.is_past_deadline());
}

#[test]
fn test_finish_sorts_records() {
    let qubo = two_var_qubo();
    let mut scope = SolverScope::with_seed(&qubo, Direction::Minimize, 1);
    scope.start_solving(&[false, false]);
    set_candidate(&mut scope, &[true, false]);
    scope.accept_candidate(-1.0);

    let (records, stats) = scope.finish(TerminationReason::RepeatBudgetExhausted);
    assert_eq!(records[0].state, vec![true, false]);
    assert_eq!(records[1].state, vec![false, false]);
    assert_eq!(stats.termination, Some(TerminationReason::RepeatBudgetExhausted));
}
