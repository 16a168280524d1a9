//! Configuration system for quboforge.
//!
//! Load solver configuration from TOML or YAML to control decomposition,
//! termination and the inner tabu search without code changes.
//!
//! # Examples
//!
//! Load configuration from TOML string:
//!
//! ```
//! use quboforge_config::{DecompositionAlgorithm, SolverConfig};
//! use std::time::Duration;
//!
//! let config = SolverConfig::from_toml_str(r#"
//!     n_repeats = 20
//!     random_seed = 7
//!     algorithm = "solution_diversity"
//!     solver_limit = 30
//!     timeout_seconds = 2.5
//!
//!     [tabu]
//!     tenure = 8
//! "#).unwrap();
//!
//! assert_eq!(config.n_repeats, 20);
//! assert_eq!(config.algorithm, DecompositionAlgorithm::SolutionDiversity);
//! assert_eq!(config.timeout(), Some(Duration::from_millis(2500)));
//! assert!(config.validate().is_ok());
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use quboforge_config::SolverConfig;
//!
//! let config = SolverConfig::load("quboforge.toml").unwrap_or_default();
//! assert_eq!(config.n_repeats, 50);
//! ```

use std::path::Path;
use std::time::Duration;

use quboforge_core::{Direction, QuboError};
use serde::{Deserialize, Serialize};
use thiserror::Error;


/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl From<ConfigError> for QuboError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Invalid(msg) => QuboError::InvalidConfiguration(msg),
            other => QuboError::InvalidConfiguration(other.to_string()),
        }
    }
}

/// Default no-improvement budget.
pub const DEFAULT_N_REPEATS: u32 = 50;

/// Default sub-problem size bound.
pub const DEFAULT_SOLVER_LIMIT: usize = 47;

/// Default diversity window.
pub const DEFAULT_DIVERSITY_WINDOW: usize = 16;

/// Main solver configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SolverConfig {
    /// Outer iterations without improvement before the run stops.
    pub n_repeats: u32,

    /// Random seed for reproducible results.
    pub random_seed: Option<u64>,

    /// Variable ranking used by the decomposer.
    pub algorithm: DecompositionAlgorithm,

    /// Largest sub-problem handed to a sub-solver.
    pub solver_limit: usize,

    /// Stop as soon as the best energy reaches this value.
    pub target: Option<f64>,

    /// Maximize instead of minimize.
    pub find_max: bool,

    /// Wall-clock budget in seconds.
    pub timeout_seconds: Option<f64>,

    /// Starting assignment when none is supplied.
    pub initial_state: InitialStateConfig,

    /// Run a one-flip descent over the full problem after each splice.
    pub polish: bool,

    /// Disjoint sub-problems solved per outer iteration.
    pub subproblems_per_round: usize,

    /// Outer iterations remembered by the diversity ranking.
    pub diversity_window: usize,

    /// Inner tabu search settings.
    pub tabu: TabuConfig,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            n_repeats: DEFAULT_N_REPEATS,
            random_seed: None,
            algorithm: DecompositionAlgorithm::default(),
            solver_limit: DEFAULT_SOLVER_LIMIT,
            target: None,
            find_max: false,
            timeout_seconds: None,
            initial_state: InitialStateConfig::default(),
            polish: true,
            subproblems_per_round: 1,
            diversity_window: DEFAULT_DIVERSITY_WINDOW,
            tabu: TabuConfig::default(),
        }
    }
}

impl SolverConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file, YAML for `.yaml`/`.yml` and TOML otherwise.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist or doesn't parse.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml" | "yml") => Self::from_yaml_file(path),
            _ => Self::from_toml_file(path),
        }
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    pub fn with_n_repeats(mut self, n_repeats: u32) -> Self {
        self.n_repeats = n_repeats;
        self
    }

    /// Sets the random seed.
    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    pub fn with_algorithm(mut self, algorithm: DecompositionAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_solver_limit(mut self, solver_limit: usize) -> Self {
        self.solver_limit = solver_limit;
        self
    }

    pub fn with_target(mut self, target: f64) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_find_max(mut self, find_max: bool) -> Self {
        self.find_max = find_max;
        self
    }

    /// Sets the wall-clock budget.
    pub fn with_timeout_seconds(mut self, seconds: f64) -> Self {
        self.timeout_seconds = Some(seconds);
        self
    }

    pub fn with_initial_state(mut self, initial_state: InitialStateConfig) -> Self {
        self.initial_state = initial_state;
        self
    }

    pub fn with_polish(mut self, polish: bool) -> Self {
        self.polish = polish;
        self
    }

    pub fn with_subproblems_per_round(mut self, count: usize) -> Self {
        self.subproblems_per_round = count;
        self
    }

    pub fn with_diversity_window(mut self, window: usize) -> Self {
        self.diversity_window = window;
        self
    }

    pub fn with_tabu(mut self, tabu: TabuConfig) -> Self {
        self.tabu = tabu;
        self
    }

    /// Returns the wall-clock budget, if any.
    ///
    /// Invalid values (negative, non-finite) yield `None`; [`validate`](Self::validate)
    /// reports them.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds
            .and_then(|s| Duration::try_from_secs_f64(s).ok())
    }

    pub fn direction(&self) -> Direction {
        Direction::from_find_max(self.find_max)
    }

    /// Checks option values.
    ///
    /// # Errors
    ///
    /// Returns [`QuboError::InvalidConfiguration`] naming the first bad option.
    pub fn validate(&self) -> Result<(), QuboError> {
        let invalid = |msg: String| Err(QuboError::InvalidConfiguration(msg));

        if self.n_repeats == 0 {
            return invalid("n_repeats must be a positive integer".into());
        }
        if self.solver_limit == 0 {
            return invalid("solver_limit must be at least 1".into());
        }
        if let Some(target) = self.target {
            if !target.is_finite() {
                return invalid(format!("target must be finite, got {target}"));
            }
        }
        if let Some(seconds) = self.timeout_seconds {
            if !seconds.is_finite() || seconds < 0.0 {
                return invalid(format!(
                    "timeout_seconds must be finite and non-negative, got {seconds}"
                ));
            }
        }
        if self.subproblems_per_round == 0 {
            return invalid("subproblems_per_round must be at least 1".into());
        }
        if self.diversity_window == 0 {
            return invalid("diversity_window must be at least 1".into());
        }
        self.tabu.validate()
    }
}

/// Variable ranking strategy used to grow sub-problems.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecompositionAlgorithm {
    /// Rank by the magnitude of each variable's single-flip energy change.
    #[default]
    EnergyImpact,
    /// Rank by how rarely each variable changed across recent iterations.
    SolutionDiversity,
}

/// How the starting assignment is chosen when none is supplied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InitialStateConfig {
    #[default]
    Zeros,
    /// Uniform random bits drawn from the seeded stream.
    Random,
}

/// Inner tabu search configuration. Unset values are sized from the sub-problem.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct TabuConfig {
    /// Iterations a flipped variable stays forbidden.
    pub tenure: Option<usize>,

    /// Non-improving iterations before the search stops.
    pub stagnation_limit: Option<u64>,

    /// Hard iteration cap.
    pub max_iterations: Option<u64>,
}

impl TabuConfig {
    pub fn with_tenure(mut self, tenure: usize) -> Self {
        self.tenure = Some(tenure);
        self
    }

    pub fn with_stagnation_limit(mut self, limit: u64) -> Self {
        self.stagnation_limit = Some(limit);
        self
    }

    pub fn with_max_iterations(mut self, max: u64) -> Self {
        self.max_iterations = Some(max);
        self
    }

    pub fn validate(&self) -> Result<(), QuboError> {
        if self.stagnation_limit == Some(0) {
            return Err(QuboError::InvalidConfiguration(
                "tabu.stagnation_limit must be at least 1".into(),
            ));
        }
        if self.max_iterations == Some(0) {
            return Err(QuboError::InvalidConfiguration(
                "tabu.max_iterations must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
