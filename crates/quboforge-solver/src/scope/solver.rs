//! Solver-level scope.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use quboforge_core::{Comparison, Direction, Qubo};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tokio::sync::mpsc;
use tracing::{info, trace};

use crate::arena::StateArena;
use crate::ledger::{ResultLedger, StateRecord};
use crate::statistics::{SolverStatistics, TerminationReason};

/// A new best-known assignment, streamed while the run is in progress.
#[derive(Debug, Clone, PartialEq)]
pub struct BestSolution {
    pub state: Vec<bool>,
    pub energy: f64,
    pub outer_iteration: u64,
}

/// Result of the acceptance rule for one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acceptance {
    Improved,
    Tied,
    Rejected,
}

/// Top-level context of one run.
///
/// Owns the best-known state, the occurrence ledger and the seeded random
/// stream; everything else borrows from it explicitly.
pub struct SolverScope<'a> {
    qubo: &'a Qubo,
    direction: Direction,
    rng: ChaCha8Rng,
    start_time: Option<Instant>,
    time_limit: Option<Duration>,
    arena: StateArena,
    best_energy: f64,
    unimproved_count: u32,
    ledger: ResultLedger,
    stats: SolverStatistics,
    terminate_early_flag: Option<Arc<AtomicBool>>,
    best_sender: Option<mpsc::UnboundedSender<BestSolution>>,
}

impl<'a> SolverScope<'a> {
    pub fn new(qubo: &'a Qubo, direction: Direction) -> Self {
        Self::with_rng(qubo, direction, ChaCha8Rng::from_os_rng())
    }

    pub fn with_seed(qubo: &'a Qubo, direction: Direction, seed: u64) -> Self {
        Self::with_rng(qubo, direction, ChaCha8Rng::seed_from_u64(seed))
    }

    fn with_rng(qubo: &'a Qubo, direction: Direction, rng: ChaCha8Rng) -> Self {
        Self {
            qubo,
            direction,
            rng,
            start_time: None,
            time_limit: None,
            arena: StateArena::new(qubo.num_variables()),
            best_energy: 0.0,
            unimproved_count: 0,
            ledger: ResultLedger::new(),
            stats: SolverStatistics::default(),
            terminate_early_flag: None,
            best_sender: None,
        }
    }

    pub fn with_time_limit(mut self, limit: Option<Duration>) -> Self {
        self.time_limit = limit;
        self
    }

    pub fn set_terminate_early_flag(&mut self, flag: Arc<AtomicBool>) {
        self.terminate_early_flag = Some(flag);
    }

    pub fn set_best_sender(&mut self, sender: mpsc::UnboundedSender<BestSolution>) {
        self.best_sender = Some(sender);
    }

    /// Seeds the best-known record with `initial` and starts the clock.
    ///
    /// `initial` must cover the problem.
    pub fn start_solving(&mut self, initial: &[bool]) {
        self.start_time = Some(Instant::now());
        self.stats.start();
        self.arena.best_mut().copy_from_slice(initial);
        self.best_energy = self.qubo.energy(initial);
        self.unimproved_count = 0;
        self.ledger.record(initial, self.best_energy);
        self.publish_best();
    }

    pub fn qubo(&self) -> &'a Qubo {
        self.qubo
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn rng(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    /// Borrows the best-known state and the random stream together.
    pub fn best_state_and_rng(&mut self) -> (&[bool], &mut ChaCha8Rng) {
        (self.arena.best(), &mut self.rng)
    }

    pub fn elapsed(&self) -> Option<Duration> {
        self.start_time.map(|t| t.elapsed())
    }

    /// Instant the time limit expires, once solving started.
    pub fn deadline(&self) -> Option<Instant> {
        self.start_time
            .zip(self.time_limit)
            .and_then(|(start, limit)| start.checked_add(limit))
    }

    pub fn is_past_deadline(&self) -> bool {
        self.deadline().is_some_and(|d| Instant::now() >= d)
    }

    pub fn terminate_early_flag(&self) -> Option<&AtomicBool> {
        self.terminate_early_flag.as_deref()
    }

    pub fn is_terminate_early(&self) -> bool {
        self.terminate_early_flag
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }

    pub fn best_state(&self) -> &[bool] {
        self.arena.best()
    }

    pub fn best_energy(&self) -> f64 {
        self.best_energy
    }

    pub fn arena_mut(&mut self) -> &mut StateArena {
        &mut self.arena
    }

    pub fn unimproved_count(&self) -> u32 {
        self.unimproved_count
    }

    pub fn ledger(&self) -> &ResultLedger {
        &self.ledger
    }

    pub fn statistics(&self) -> &SolverStatistics {
        &self.stats
    }

    pub fn statistics_mut(&mut self) -> &mut SolverStatistics {
        &mut self.stats
    }

    /// Starts an outer iteration and returns its 1-based number.
    pub fn begin_iteration(&mut self) -> u64 {
        self.stats.record_iteration();
        self.stats.outer_iterations
    }

    /// Applies the acceptance rule to the arena's candidate.
    ///
    /// `estimate` is the candidate energy derived incrementally. Promoted and
    /// tied assignments are re-evaluated in full before they enter the ledger.
    pub fn accept_candidate(&mut self, estimate: f64) -> Acceptance {
        let iteration = self.stats.outer_iterations;
        match self.direction.compare(estimate, self.best_energy) {
            Comparison::Better => {
                let energy = self.qubo.energy(self.arena.candidate());
                let previous = self.best_energy;
                self.arena.promote();
                self.best_energy = energy;
                self.unimproved_count = 0;
                self.ledger.record(self.arena.best(), energy);
                self.stats.record_improvement();
                info!(
                    event = "improvement",
                    iteration = iteration,
                    energy = energy,
                    previous = previous,
                );
                self.publish_best();
                Acceptance::Improved
            }
            Comparison::Tie => {
                let candidate = self.arena.candidate();
                let energy = if candidate == self.arena.best() {
                    self.best_energy
                } else {
                    self.qubo.energy(candidate)
                };
                let count = self.ledger.record(candidate, energy);
                self.unimproved_count = self.unimproved_count.saturating_add(1);
                self.stats.record_tie();
                trace!(
                    event = "tie",
                    iteration = iteration,
                    energy = energy,
                    occurrences = count,
                );
                Acceptance::Tied
            }
            Comparison::Worse => {
                self.unimproved_count = self.unimproved_count.saturating_add(1);
                Acceptance::Rejected
            }
        }
    }

    fn publish_best(&self) {
        if let Some(sender) = &self.best_sender {
            let _ = sender.send(BestSolution {
                state: self.arena.best().to_vec(),
                energy: self.best_energy,
                outer_iteration: self.stats.outer_iterations,
            });
        }
    }

    /// Ends the run, returning the sorted records and the statistics.
    pub fn finish(mut self, reason: TerminationReason) -> (Vec<StateRecord>, SolverStatistics) {
        self.stats.finish(reason);
        (self.ledger.finalize(self.direction), self.stats)
    }
}
