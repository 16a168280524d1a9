//! Outer decompose-solve-accept loop.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use quboforge_config::{InitialStateConfig, SolverConfig};
use quboforge_core::{LabeledQubo, Qubo, QuboError, Result};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use smallvec::SmallVec;
use tokio::sync::mpsc;
use tracing::{debug, info, trace};

use crate::decomposition::{Decomposer, RankingStrategy};
use crate::ledger::StateRecord;
use crate::sample_set::SampleSet;
use crate::scope::{BestSolution, SolverScope};
use crate::statistics::{SolverStatistics, TerminationReason};
use crate::subsolver::{SubSolution, SubSolver, SubproblemRequest, TabuSubSolver};
use crate::tabu::one_flip_descent;
use crate::termination::{
    BestEnergyTermination, ExternalTermination, OrTermination, Termination, TimeTermination,
    UnimprovedCountTermination,
};

/// Distinct assignments of a finished run with its statistics.
#[derive(Debug, Clone)]
pub struct SolveOutcome {
    /// Best first; equal energies keep first-seen order.
    pub records: Vec<StateRecord>,
    pub statistics: SolverStatistics,
}

impl SolveOutcome {
    pub fn best(&self) -> Option<&StateRecord> {
        self.records.first()
    }
}

/// Decomposing QUBO solver.
///
/// Each outer iteration picks bounded connected subsets of variables, solves
/// the induced sub-QUBOs against the best-known assignment, splices the
/// results into a candidate and accepts it when it is at least as good.
///
/// # Example
///
/// ```
/// use quboforge_config::SolverConfig;
/// use quboforge_core::Qubo;
/// use quboforge_solver::QuboSolver;
///
/// let qubo = Qubo::build(3, [(0, 0, -1.0), (1, 1, -1.0), (2, 2, -1.0)]).unwrap();
/// let solver = QuboSolver::new(SolverConfig::new().with_random_seed(1));
///
/// let outcome = solver.solve(&qubo).unwrap();
/// let best = outcome.best().unwrap();
/// assert_eq!(best.energy, -3.0);
/// assert_eq!(best.state, vec![true; 3]);
/// ```
#[derive(Debug)]
pub struct QuboSolver {
    config: SolverConfig,
    sub_solver: Box<dyn SubSolver>,
    initial_state: Option<Vec<bool>>,
    terminate_early_flag: Option<Arc<AtomicBool>>,
    best_sender: Option<mpsc::UnboundedSender<BestSolution>>,
}

impl QuboSolver {
    /// Creates a solver that re-optimizes sub-problems with tabu search.
    pub fn new(config: SolverConfig) -> Self {
        let sub_solver = Box::new(TabuSubSolver::new(config.tabu.clone()));
        Self {
            config,
            sub_solver,
            initial_state: None,
            terminate_early_flag: None,
            best_sender: None,
        }
    }

    /// Replaces the internal tabu search with another sub-solver.
    pub fn with_sub_solver(mut self, sub_solver: impl SubSolver + 'static) -> Self {
        self.sub_solver = Box::new(sub_solver);
        self
    }

    /// Starts from `state` instead of the configured initial state.
    pub fn with_initial_state(mut self, state: Vec<bool>) -> Self {
        self.initial_state = Some(state);
        self
    }

    /// Stops the run at the next check once `flag` is raised.
    pub fn with_terminate_early_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.terminate_early_flag = Some(flag);
        self
    }

    /// Streams every new best-known assignment, starting with the initial one.
    pub fn with_best_solution_sender(
        mut self,
        sender: mpsc::UnboundedSender<BestSolution>,
    ) -> Self {
        self.best_sender = Some(sender);
        self
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Solves `qubo` and returns every promoted or tied assignment.
    ///
    /// # Errors
    ///
    /// - [`QuboError::InvalidConfiguration`] for bad options or an initial
    ///   state of the wrong length
    /// - [`QuboError::ExternalSolverContractViolation`] when a sub-solver
    ///   returns an assignment of the wrong length
    /// - [`QuboError::SubSolverFailed`] when a sub-solver reports failure
    pub fn solve(&self, qubo: &Qubo) -> Result<SolveOutcome> {
        self.config.validate()?;
        let n = qubo.num_variables();
        if let Some(state) = &self.initial_state {
            if state.len() != n {
                return Err(QuboError::InvalidConfiguration(format!(
                    "initial state has {} values, problem has {n} variables",
                    state.len()
                )));
            }
        }

        let direction = self.config.direction();
        let mut scope = match self.config.random_seed {
            Some(seed) => SolverScope::with_seed(qubo, direction, seed),
            None => SolverScope::new(qubo, direction),
        }
        .with_time_limit(self.config.timeout());
        if let Some(flag) = &self.terminate_early_flag {
            scope.set_terminate_early_flag(Arc::clone(flag));
        }
        if let Some(sender) = &self.best_sender {
            scope.set_best_sender(sender.clone());
        }

        info!(
            event = "solve_start",
            variables = n,
            couplers = qubo.num_couplers(),
            solver_limit = self.config.solver_limit,
            n_repeats = self.config.n_repeats,
            algorithm = ?self.config.algorithm,
            direction = ?direction,
        );

        let initial = self.initial_assignment(n, scope.rng());
        scope.start_solving(&initial);

        let reason = if n == 0 {
            TerminationReason::EmptyProblem
        } else {
            self.run(&mut scope)?
        };

        let best_energy = scope.best_energy();
        let (records, statistics) = scope.finish(reason);
        info!(
            event = "solve_end",
            energy = best_energy,
            reason = %reason,
            iterations = statistics.outer_iterations,
            subproblems = statistics.subproblem_calls,
            improvements = statistics.improvements,
            distinct_states = records.len(),
            elapsed_ms = statistics.elapsed.as_millis() as u64,
        );
        Ok(SolveOutcome {
            records,
            statistics,
        })
    }

    /// Solves a labeled problem and reports samples keyed by label.
    pub fn solve_labeled<L: Clone + Ord>(&self, problem: &LabeledQubo<L>) -> Result<SampleSet<L>> {
        let outcome = self.solve(problem.qubo())?;
        Ok(SampleSet::from_binary(
            problem.variables(),
            outcome.records,
            outcome.statistics,
        ))
    }

    fn initial_assignment(&self, n: usize, rng: &mut ChaCha8Rng) -> Vec<bool> {
        if let Some(state) = &self.initial_state {
            return state.clone();
        }
        match self.config.initial_state {
            InitialStateConfig::Zeros => vec![false; n],
            InitialStateConfig::Random => (0..n).map(|_| rng.random_bool(0.5)).collect(),
        }
    }

    fn termination(&self) -> impl Termination {
        OrTermination((
            self.terminate_early_flag
                .as_ref()
                .map(|flag| ExternalTermination::new(Arc::clone(flag))),
            self.config.target.map(BestEnergyTermination::new),
            self.config.timeout().map(TimeTermination::new),
            UnimprovedCountTermination::new(self.config.n_repeats),
        ))
    }

    /// Runs outer iterations until a termination fires.
    fn run(&self, scope: &mut SolverScope<'_>) -> Result<TerminationReason> {
        let qubo = scope.qubo();
        let n = qubo.num_variables();
        let direction = scope.direction();
        let termination = self.termination();
        let mut decomposer = Decomposer::new(
            RankingStrategy::from_algorithm(
                self.config.algorithm,
                n,
                self.config.diversity_window,
            ),
            n,
            self.config.solver_limit,
        );
        let per_round = self.config.subproblems_per_round;
        let mut next_index = 0u64;

        loop {
            if let Some(reason) = termination.triggered(scope) {
                return Ok(reason);
            }
            let iteration = scope.begin_iteration();

            let (best, rng) = scope.best_state_and_rng();
            let subsets = decomposer.next_subsets(qubo, best, per_round, rng);
            let seeds: Vec<u64> = subsets.iter().map(|_| scope.rng().random()).collect();

            let best = scope.best_state();
            let subproblems = subsets
                .iter()
                .map(|vars| qubo.extract_subproblem(vars, best))
                .collect::<Result<Vec<_>>>()?;
            let initials: Vec<Vec<bool>> =
                subproblems.iter().map(|s| s.local_state(best)).collect();

            let deadline = scope.deadline();
            let cancel = scope.terminate_early_flag();
            let requests: Vec<SubproblemRequest<'_>> = subproblems
                .iter()
                .zip(&initials)
                .zip(seeds)
                .enumerate()
                .map(|(k, ((subproblem, initial), seed))| SubproblemRequest {
                    index: next_index + k as u64,
                    subproblem,
                    initial,
                    direction,
                    deadline,
                    cancel,
                    seed,
                })
                .collect();
            next_index += requests.len() as u64;

            let solutions = self.solve_subproblems(&requests)?;
            for solution in &solutions {
                scope.statistics_mut().record_subproblem(solution.iterations);
            }

            // a hook may overrun the deadline; its result is still accepted
            let polish = self.config.polish && !scope.is_past_deadline();
            let best_energy = scope.best_energy();
            let (best, candidate) = scope.arena_mut().load_candidate();
            for (subproblem, solution) in subproblems.iter().zip(&solutions) {
                subproblem.splice(&solution.assignment, candidate);
            }
            if polish {
                one_flip_descent(qubo, candidate, direction);
            }
            let changed: SmallVec<[usize; 16]> = best
                .iter()
                .zip(candidate.iter())
                .enumerate()
                .filter(|(_, (b, c))| b != c)
                .map(|(i, _)| i)
                .collect();
            let estimate = best_energy + qubo.delta(best, &changed);

            decomposer.observe(&changed);
            let acceptance = scope.accept_candidate(estimate);
            debug!(
                event = "iteration",
                iteration = iteration,
                subproblems = subproblems.len(),
                changed = changed.len(),
                acceptance = ?acceptance,
                unimproved = scope.unimproved_count(),
            );
        }
    }

    /// Solves one round of requests, in parallel when there are several.
    ///
    /// Every result is checked before any is applied, so a failing round
    /// leaves the best-known state untouched.
    fn solve_subproblems(&self, requests: &[SubproblemRequest<'_>]) -> Result<Vec<SubSolution>> {
        let sub_solver = self.sub_solver.as_ref();
        let results: Vec<_> = if requests.len() > 1 {
            requests.par_iter().map(|r| sub_solver.solve(r)).collect()
        } else {
            requests.iter().map(|r| sub_solver.solve(r)).collect()
        };

        requests
            .iter()
            .zip(results)
            .map(|(request, result)| {
                let solution = result.map_err(|source| QuboError::SubSolverFailed {
                    subproblem: request.index,
                    source,
                })?;
                if solution.assignment.len() != request.len() {
                    return Err(QuboError::ExternalSolverContractViolation {
                        subproblem: request.index,
                        expected: request.len(),
                        actual: solution.assignment.len(),
                    });
                }
                trace!(
                    event = "subproblem",
                    index = request.index,
                    variables = request.len(),
                    iterations = solution.iterations,
                );
                Ok(solution)
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "solver_tests.rs"]
mod tests;
