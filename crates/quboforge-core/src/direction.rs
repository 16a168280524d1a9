//! Optimization direction.
//!
//! Maximization never rewrites the coefficients. Every comparison in the
//! solver goes through [`Direction`] so reported energies keep the caller's
//! sign convention.

use std::cmp::Ordering;

/// Relative tolerance used when comparing energies.
pub const ENERGY_TOLERANCE: f64 = 1e-9;

/// Returns the absolute tolerance for comparisons around `energy`.
#[inline]
pub fn tolerance(energy: f64) -> f64 {
    ENERGY_TOLERANCE * energy.abs().max(1.0)
}

/// Whether lower or higher energies are preferred.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Direction {
    #[default]
    Minimize,
    Maximize,
}

/// Outcome of comparing a candidate energy to an incumbent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Better,
    Tie,
    Worse,
}

impl Direction {
    pub fn from_find_max(find_max: bool) -> Self {
        if find_max {
            Direction::Maximize
        } else {
            Direction::Minimize
        }
    }

    pub fn is_maximize(self) -> bool {
        self == Direction::Maximize
    }

    /// Gain of moving from energy `from` to energy `to`. Positive means better.
    #[inline]
    pub fn gain(self, from: f64, to: f64) -> f64 {
        match self {
            Direction::Minimize => from - to,
            Direction::Maximize => to - from,
        }
    }

    /// Gain of applying an energy change of `delta`. Positive means better.
    #[inline]
    pub fn gain_of_delta(self, delta: f64) -> f64 {
        match self {
            Direction::Minimize => -delta,
            Direction::Maximize => delta,
        }
    }

    /// Compares `candidate` against `incumbent` with the energy tolerance.
    pub fn compare(self, candidate: f64, incumbent: f64) -> Comparison {
        let gain = self.gain(incumbent, candidate);
        let tol = tolerance(incumbent);
        if gain > tol {
            Comparison::Better
        } else if gain < -tol {
            Comparison::Worse
        } else {
            Comparison::Tie
        }
    }

    /// True when `candidate` is strictly better than `incumbent`, beyond tolerance.
    #[inline]
    pub fn is_better(self, candidate: f64, incumbent: f64) -> bool {
        self.compare(candidate, incumbent) == Comparison::Better
    }

    /// True when `energy` is at or past `target`.
    pub fn reached(self, energy: f64, target: f64) -> bool {
        self.compare(energy, target) != Comparison::Worse
    }

    /// Orders energies best first.
    pub fn order(self, a: f64, b: f64) -> Ordering {
        match self {
            Direction::Minimize => a.total_cmp(&b),
            Direction::Maximize => b.total_cmp(&a),
        }
    }
}
