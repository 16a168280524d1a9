//! quboforge core - problem model and energy evaluation
//!
//! This crate provides the building blocks shared by the solver crates:
//! - [`Qubo`], the immutable sparse problem model with adjacency lists
//! - energy and incremental flip deltas over binary assignments
//! - Ising ↔ QUBO conversion and caller label mapping
//! - the QUBO text format
//! - [`QuboError`], the error taxonomy

pub mod direction;
pub mod energy;
pub mod error;
pub mod format;
pub mod ising;
pub mod labels;
pub mod qubo;

pub use direction::{tolerance, Comparison, Direction, ENERGY_TOLERANCE};
pub use energy::{ising_energy, FlipDeltas};
pub use error::{QuboError, Result, SubSolverError};
pub use ising::{bit_of, spin_of, IsingProblem, LabeledIsing};
pub use labels::{LabeledQubo, Variables};
pub use qubo::{Coupler, Neighbor, Qubo, QuboBuilder, Subproblem};
