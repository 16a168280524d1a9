//! Canonical in-memory QUBO model.
//!
//! A [`Qubo`] stores linear biases densely, couplers as a sorted upper-triangular
//! list, and a compressed adjacency (CSR) so that per-variable work is
//! proportional to degree. The model is immutable once built.

mod subproblem;

#[cfg(test)]
mod tests;

pub use subproblem::Subproblem;

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{QuboError, Result};

/// An off-diagonal coefficient with `u < v`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coupler {
    pub u: usize,
    pub v: usize,
    pub bias: f64,
}

/// One adjacency entry of a variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub index: usize,
    pub bias: f64,
}

/// A QUBO problem over variables `0..num_variables`.
///
/// Duplicate entries for the same unordered pair are summed, `(j, i)` is
/// folded onto `(i, j)`, and couplers whose summed bias is zero are dropped.
///
/// # Example
///
/// ```
/// use quboforge_core::Qubo;
///
/// let qubo = Qubo::build(3, [(0, 0, -1.0), (0, 1, 2.0), (1, 0, 0.5), (2, 2, 1.0)]).unwrap();
/// assert_eq!(qubo.num_variables(), 3);
/// assert_eq!(qubo.quadratic(1, 0), 2.5);
/// assert_eq!(qubo.energy(&[true, false, false]), -1.0);
/// ```
#[derive(Clone, PartialEq)]
pub struct Qubo {
    linear: Vec<f64>,
    couplers: Vec<Coupler>,
    offsets: Vec<usize>,
    neighbors: Vec<Neighbor>,
}

impl Qubo {
    /// Builds a QUBO from `(i, j, bias)` triples.
    ///
    /// Fails with [`QuboError::MalformedProblem`] if an index is out of range
    /// or a bias (or a summed bias) is not finite.
    pub fn build<I>(num_variables: usize, coefficients: I) -> Result<Self>
    where
        I: IntoIterator<Item = (usize, usize, f64)>,
    {
        let mut linear = vec![0.0; num_variables];
        let mut pairs: BTreeMap<(usize, usize), f64> = BTreeMap::new();

        for (i, j, bias) in coefficients {
            if i >= num_variables || j >= num_variables {
                return Err(QuboError::MalformedProblem(format!(
                    "coefficient ({i}, {j}) references a variable outside 0..{num_variables}"
                )));
            }
            if !bias.is_finite() {
                return Err(QuboError::MalformedProblem(format!(
                    "coefficient ({i}, {j}) has non-finite bias {bias}"
                )));
            }
            if i == j {
                linear[i] += bias;
            } else {
                *pairs.entry((i.min(j), i.max(j))).or_insert(0.0) += bias;
            }
        }

        if let Some(i) = linear.iter().position(|b| !b.is_finite()) {
            return Err(QuboError::MalformedProblem(format!(
                "summed linear bias of variable {i} overflows"
            )));
        }

        let mut couplers = Vec::with_capacity(pairs.len());
        for ((u, v), bias) in pairs {
            if !bias.is_finite() {
                return Err(QuboError::MalformedProblem(format!(
                    "summed coupler ({u}, {v}) overflows"
                )));
            }
            if bias != 0.0 {
                couplers.push(Coupler { u, v, bias });
            }
        }

        Ok(Self::from_sorted(linear, couplers))
    }

    /// Creates an empty builder for `num_variables` variables.
    pub fn builder(num_variables: usize) -> QuboBuilder {
        QuboBuilder::new(num_variables)
    }

    /// Assembles the adjacency from validated, sorted, non-zero couplers.
    pub(crate) fn from_sorted(linear: Vec<f64>, couplers: Vec<Coupler>) -> Self {
        let n = linear.len();
        let mut degree = vec![0usize; n];
        for c in &couplers {
            degree[c.u] += 1;
            degree[c.v] += 1;
        }

        let mut offsets = Vec::with_capacity(n + 1);
        offsets.push(0);
        for d in &degree {
            let last = offsets[offsets.len() - 1];
            offsets.push(last + d);
        }

        // Couplers are sorted by (u, v), so every row is filled in ascending order.
        let mut cursor = offsets[..n].to_vec();
        let mut neighbors = vec![
            Neighbor {
                index: 0,
                bias: 0.0
            };
            offsets[n]
        ];
        for c in &couplers {
            neighbors[cursor[c.u]] = Neighbor {
                index: c.v,
                bias: c.bias,
            };
            cursor[c.u] += 1;
            neighbors[cursor[c.v]] = Neighbor {
                index: c.u,
                bias: c.bias,
            };
            cursor[c.v] += 1;
        }

        Self {
            linear,
            couplers,
            offsets,
            neighbors,
        }
    }

    pub fn num_variables(&self) -> usize {
        self.linear.len()
    }

    pub fn num_couplers(&self) -> usize {
        self.couplers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.linear.is_empty()
    }

    /// Linear bias of variable `i`.
    #[inline]
    pub fn linear(&self, i: usize) -> f64 {
        self.linear[i]
    }

    pub fn linear_biases(&self) -> &[f64] {
        &self.linear
    }

    /// Coupling bias between `i` and `j`, zero when absent.
    pub fn quadratic(&self, i: usize, j: usize) -> f64 {
        if i == j || i >= self.num_variables() || j >= self.num_variables() {
            return 0.0;
        }
        let row = self.neighbors(i);
        match row.binary_search_by_key(&j, |n| n.index) {
            Ok(pos) => row[pos].bias,
            Err(_) => 0.0,
        }
    }

    /// Couplers sorted by `(u, v)`.
    pub fn couplers(&self) -> &[Coupler] {
        &self.couplers
    }

    /// Neighbors of `i`, sorted by index.
    #[inline]
    pub fn neighbors(&self, i: usize) -> &[Neighbor] {
        &self.neighbors[self.offsets[i]..self.offsets[i + 1]]
    }

    pub fn degree(&self, i: usize) -> usize {
        self.offsets[i + 1] - self.offsets[i]
    }

    /// Iterates non-zero terms as `(i, j, bias)`: linear terms first, then couplers.
    pub fn terms(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.linear
            .iter()
            .enumerate()
            .filter(|(_, b)| **b != 0.0)
            .map(|(i, b)| (i, i, *b))
            .chain(self.couplers.iter().map(|c| (c.u, c.v, c.bias)))
    }

    /// Same problem with every bias negated.
    pub fn negated(&self) -> Qubo {
        Qubo {
            linear: self.linear.iter().map(|b| -b).collect(),
            couplers: self
                .couplers
                .iter()
                .map(|c| Coupler {
                    bias: -c.bias,
                    ..*c
                })
                .collect(),
            offsets: self.offsets.clone(),
            neighbors: self
                .neighbors
                .iter()
                .map(|n| Neighbor {
                    bias: -n.bias,
                    ..*n
                })
                .collect(),
        }
    }
}

impl fmt::Debug for Qubo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Qubo")
            .field("num_variables", &self.num_variables())
            .field("num_couplers", &self.num_couplers())
            .finish()
    }
}

/// Incremental builder for [`Qubo`]. Validation happens in [`QuboBuilder::build`].
#[derive(Debug, Clone)]
pub struct QuboBuilder {
    num_variables: usize,
    entries: Vec<(usize, usize, f64)>,
}

impl QuboBuilder {
    pub fn new(num_variables: usize) -> Self {
        Self {
            num_variables,
            entries: Vec::new(),
        }
    }

    pub fn with_linear(mut self, i: usize, bias: f64) -> Self {
        self.entries.push((i, i, bias));
        self
    }

    pub fn with_quadratic(mut self, i: usize, j: usize, bias: f64) -> Self {
        self.entries.push((i, j, bias));
        self
    }

    pub fn add(&mut self, i: usize, j: usize, bias: f64) -> &mut Self {
        self.entries.push((i, j, bias));
        self
    }

    pub fn build(self) -> Result<Qubo> {
        Qubo::build(self.num_variables, self.entries)
    }
}
