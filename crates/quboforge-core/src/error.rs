//! Error types for quboforge

use thiserror::Error;

/// Main error type for quboforge operations.
///
/// Stagnation and external cancellation are ordinary terminations and never
/// surface through this type.
#[derive(Debug, Error)]
pub enum QuboError {
    /// Bad coefficients, indices, labels or text-format input
    #[error("Malformed problem: {0}")]
    MalformedProblem(String),

    /// Bad option values
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A sub-solver returned an assignment of the wrong length
    #[error(
        "External solver contract violation on sub-problem {subproblem}: \
         expected {expected} values, got {actual}"
    )]
    ExternalSolverContractViolation {
        subproblem: u64,
        expected: usize,
        actual: usize,
    },

    /// A sub-solver reported its own failure. No retry is attempted.
    #[error("Sub-solver failed on sub-problem {subproblem}: {source}")]
    SubSolverFailed {
        subproblem: u64,
        #[source]
        source: SubSolverError,
    },
}

/// Failure reported by a sub-solver implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SubSolverError {
    message: String,
}

impl SubSolverError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Result type alias for quboforge operations
pub type Result<T> = std::result::Result<T, QuboError>;
