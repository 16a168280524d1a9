//! Shared test fixtures for quboforge crates.
//!
//! This crate provides problem generators with known optima and a
//! brute-force reference solver for small problems.
//!
//! - [`problems`] - rings, independent variables, disjoint components and seeded random QUBOs
//! - [`exact`] - exhaustive enumeration for problems of up to 24 variables
//!
//! # Usage
//!
//! Add as a dev-dependency in your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! quboforge-test = { workspace = true }
//! ```

pub mod exact;
pub mod problems;

pub use exact::brute_force_minimum;
pub use problems::{frustrated_ring, independent, random_sparse, ring, two_components};
