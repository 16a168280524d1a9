//! Top-level sampling entry point.

use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use quboforge_config::{DecompositionAlgorithm, SolverConfig};
use quboforge_core::format::parse_qubo;
use quboforge_core::{LabeledIsing, LabeledQubo, Result, Variables};
use quboforge_solver::{BestSolution, QuboSolver, SampleSet, SubSolver};
use tokio::sync::mpsc;
use tracing::debug;

/// Samples QUBO and Ising problems with the decomposing solver.
///
/// Options mirror [`SolverConfig`]; every call builds a fresh run, so one
/// sampler can serve many problems.
///
/// # Example
///
/// ```
/// use quboforge::QuboSampler;
///
/// let sampler = QuboSampler::new().with_seed(42);
/// let samples = sampler
///     .sample_qubo([("a", "a", -1.0), ("b", "b", -1.0), ("a", "b", 2.0)])
///     .unwrap();
///
/// let best = samples.first().unwrap();
/// assert_eq!(best.energy, -1.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct QuboSampler {
    config: SolverConfig,
    sub_solver: Option<Arc<dyn SubSolver>>,
    terminate_early_flag: Option<Arc<AtomicBool>>,
    best_sender: Option<mpsc::UnboundedSender<BestSolution>>,
}

impl QuboSampler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: SolverConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Loads options from a TOML or YAML file, chosen by extension.
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::from_config(SolverConfig::load(path)?))
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Outer iterations without improvement before stopping.
    pub fn with_n_repeats(mut self, n_repeats: u32) -> Self {
        self.config.n_repeats = n_repeats;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.random_seed = Some(seed);
        self
    }

    pub fn with_algorithm(mut self, algorithm: DecompositionAlgorithm) -> Self {
        self.config.algorithm = algorithm;
        self
    }

    /// Largest sub-problem handed to the sub-solver.
    pub fn with_solver_limit(mut self, solver_limit: usize) -> Self {
        self.config.solver_limit = solver_limit;
        self
    }

    /// Stops once the best energy reaches `target`.
    ///
    /// For Ising problems the target is an Ising energy.
    pub fn with_target(mut self, target: f64) -> Self {
        self.config.target = Some(target);
        self
    }

    pub fn with_find_max(mut self, find_max: bool) -> Self {
        self.config.find_max = find_max;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout_seconds = Some(timeout.as_secs_f64());
        self
    }

    /// Solves sub-problems with `solver` instead of the internal tabu search.
    pub fn with_solver(mut self, solver: impl SubSolver + 'static) -> Self {
        self.sub_solver = Some(Arc::new(solver));
        self
    }

    pub fn with_terminate_early_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.terminate_early_flag = Some(flag);
        self
    }

    pub fn with_best_solution_sender(
        mut self,
        sender: mpsc::UnboundedSender<BestSolution>,
    ) -> Self {
        self.best_sender = Some(sender);
        self
    }

    /// Samples a QUBO given as `(u, v, bias)` terms over caller labels.
    ///
    /// `u == v` is a linear bias; repeated pairs are summed.
    pub fn sample_qubo<L, I>(&self, terms: I) -> Result<SampleSet<L>>
    where
        L: Clone + Ord,
        I: IntoIterator<Item = (L, L, f64)>,
    {
        self.config.validate()?;
        let problem = LabeledQubo::from_terms(terms)?;
        self.sample_labeled_qubo(&problem)
    }

    /// Samples an already built labeled QUBO.
    pub fn sample_labeled_qubo<L: Clone + Ord>(
        &self,
        problem: &LabeledQubo<L>,
    ) -> Result<SampleSet<L>> {
        init_console();
        self.solver(self.config.clone()).solve_labeled(problem)
    }

    /// Samples a QUBO in the text format; variables are labeled by index.
    pub fn sample_qubo_str(&self, text: &str) -> Result<SampleSet<usize>> {
        self.config.validate()?;
        let qubo = parse_qubo(text)?;
        let variables = Variables::new(0..qubo.num_variables())?;
        init_console();
        let outcome = self.solver(self.config.clone()).solve(&qubo)?;
        Ok(SampleSet::from_binary(
            &variables,
            outcome.records,
            outcome.statistics,
        ))
    }

    /// Samples an Ising model with fields `h` and couplings `j`.
    ///
    /// The model is solved as its equivalent QUBO; samples hold spins and
    /// Ising energies.
    pub fn sample_ising<L, H, J>(&self, h: H, j: J) -> Result<SampleSet<L>>
    where
        L: Clone + Ord,
        H: IntoIterator<Item = (L, f64)>,
        J: IntoIterator<Item = ((L, L), f64)>,
    {
        self.config.validate()?;
        let problem = LabeledIsing::from_fields(h, j)?;
        let (qubo, offset) = problem.ising().to_qubo()?;
        debug!(
            event = "ising_converted",
            variables = qubo.num_variables(),
            offset = offset,
        );

        let mut config = self.config.clone();
        config.target = config.target.map(|t| t - offset);
        init_console();
        let outcome = self.solver(config).solve(&qubo)?;
        Ok(SampleSet::from_spin(
            problem.variables(),
            outcome.records,
            offset,
            outcome.statistics,
        ))
    }

    fn solver(&self, config: SolverConfig) -> QuboSolver {
        let mut solver = QuboSolver::new(config);
        if let Some(sub_solver) = &self.sub_solver {
            solver = solver.with_sub_solver(Arc::clone(sub_solver));
        }
        if let Some(flag) = &self.terminate_early_flag {
            solver = solver.with_terminate_early_flag(Arc::clone(flag));
        }
        if let Some(sender) = &self.best_sender {
            solver = solver.with_best_solution_sender(sender.clone());
        }
        solver
    }
}

#[cfg(feature = "console")]
fn init_console() {
    crate::console::init();
}

#[cfg(not(feature = "console"))]
fn init_console() {}
