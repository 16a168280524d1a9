//! Run statistics.

use std::fmt;
use std::time::{Duration, Instant};

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerminationReason {
    /// `n_repeats` outer iterations passed without improvement.
    RepeatBudgetExhausted,
    /// The best energy reached the target.
    TargetReached,
    /// The wall-clock budget ran out.
    TimedOut,
    /// The terminate-early flag was raised.
    Cancelled,
    /// The problem has no variables.
    EmptyProblem,
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TerminationReason::RepeatBudgetExhausted => "repeat_budget_exhausted",
            TerminationReason::TargetReached => "target_reached",
            TerminationReason::TimedOut => "timed_out",
            TerminationReason::Cancelled => "cancelled",
            TerminationReason::EmptyProblem => "empty_problem",
        };
        f.write_str(name)
    }
}

/// Aggregate metrics of one solve run.
///
/// # Example
///
/// ```
/// use quboforge_solver::SolverStatistics;
///
/// let mut stats = SolverStatistics::default();
/// stats.start();
/// stats.record_iteration();
/// stats.record_subproblem(250);
/// stats.record_subproblem(100);
/// stats.record_improvement();
///
/// assert_eq!(stats.outer_iterations, 1);
/// assert_eq!(stats.subproblem_calls, 2);
/// assert_eq!(stats.tabu_iterations, 350);
/// assert_eq!(stats.improvements, 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SolverStatistics {
    start_time: Option<Instant>,
    /// Outer decompose-solve-accept cycles.
    pub outer_iterations: u64,
    /// Sub-solver invocations.
    pub subproblem_calls: u64,
    /// Inner iterations reported by sub-solvers.
    pub tabu_iterations: u64,
    /// Candidates promoted to best-known.
    pub improvements: u64,
    /// Candidates tied with best-known.
    pub ties: u64,
    /// Wall time of the run, set when it ends.
    pub elapsed: Duration,
    /// Set when the run ends.
    pub termination: Option<TerminationReason>,
}

impl SolverStatistics {
    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
    }

    pub fn record_iteration(&mut self) {
        self.outer_iterations += 1;
    }

    pub fn record_subproblem(&mut self, iterations: u64) {
        self.subproblem_calls += 1;
        self.tabu_iterations += iterations;
    }

    pub fn record_improvement(&mut self) {
        self.improvements += 1;
    }

    pub fn record_tie(&mut self) {
        self.ties += 1;
    }

    /// Freezes elapsed time and records the reason.
    pub fn finish(&mut self, reason: TerminationReason) {
        self.elapsed = self.start_time.map(|t| t.elapsed()).unwrap_or_default();
        self.termination = Some(reason);
    }

    /// Inner iterations per second over the run.
    pub fn iterations_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.tabu_iterations as f64 / secs
        } else {
            0.0
        }
    }
}
