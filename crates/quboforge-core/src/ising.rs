//! Ising models and their conversion to and from QUBO.
//!
//! With `s = 2x - 1`, `ising.energy(s) == qubo.energy(x) + offset` for the
//! pair returned by [`IsingProblem::to_qubo`], and
//! `qubo.energy(x) == ising.energy(s) + offset` for [`Qubo::to_ising`].

use std::collections::BTreeMap;

use crate::energy::ising_energy;
use crate::error::{QuboError, Result};
use crate::labels::Variables;
use crate::qubo::Qubo;

/// An Ising problem over spins `0..num_variables`.
#[derive(Debug, Clone, PartialEq)]
pub struct IsingProblem {
    h: Vec<f64>,
    couplings: Vec<(usize, usize, f64)>,
}

impl IsingProblem {
    /// Builds from linear fields and `(i, j, J)` couplings.
    ///
    /// Couplings are folded onto `i < j` and summed. Self-couplings, non-finite
    /// values and out-of-range indices are rejected.
    pub fn new<I>(h: Vec<f64>, couplings: I) -> Result<Self>
    where
        I: IntoIterator<Item = (usize, usize, f64)>,
    {
        let n = h.len();
        if let Some(i) = h.iter().position(|v| !v.is_finite()) {
            return Err(QuboError::MalformedProblem(format!(
                "field h[{i}] is not finite"
            )));
        }
        let mut summed: BTreeMap<(usize, usize), f64> = BTreeMap::new();
        for (i, j, value) in couplings {
            if i >= n || j >= n {
                return Err(QuboError::MalformedProblem(format!(
                    "coupling ({i}, {j}) references a spin outside 0..{n}"
                )));
            }
            if i == j {
                return Err(QuboError::MalformedProblem(format!(
                    "coupling ({i}, {i}) couples a spin to itself"
                )));
            }
            if !value.is_finite() {
                return Err(QuboError::MalformedProblem(format!(
                    "coupling ({i}, {j}) is not finite"
                )));
            }
            *summed.entry((i.min(j), i.max(j))).or_insert(0.0) += value;
        }
        let couplings = summed
            .into_iter()
            .filter(|(_, v)| *v != 0.0)
            .map(|((i, j), v)| (i, j, v))
            .collect();
        Ok(Self { h, couplings })
    }

    pub fn num_variables(&self) -> usize {
        self.h.len()
    }

    pub fn h(&self) -> &[f64] {
        &self.h
    }

    /// Couplings with `i < j`, sorted.
    pub fn couplings(&self) -> &[(usize, usize, f64)] {
        &self.couplings
    }

    pub fn energy(&self, spins: &[i8]) -> f64 {
        ising_energy(&self.h, &self.couplings, spins)
    }

    /// Equivalent QUBO and the constant `offset` with `ising = qubo + offset`.
    pub fn to_qubo(&self) -> Result<(Qubo, f64)> {
        let mut terms = Vec::with_capacity(self.h.len() + 3 * self.couplings.len());
        let mut offset = 0.0;
        for (i, &field) in self.h.iter().enumerate() {
            terms.push((i, i, 2.0 * field));
            offset -= field;
        }
        for &(i, j, coupling) in &self.couplings {
            terms.push((i, j, 4.0 * coupling));
            terms.push((i, i, -2.0 * coupling));
            terms.push((j, j, -2.0 * coupling));
            offset += coupling;
        }
        Ok((Qubo::build(self.h.len(), terms)?, offset))
    }
}

impl Qubo {
    /// Equivalent Ising problem and the constant `offset` with `qubo = ising + offset`.
    pub fn to_ising(&self) -> (IsingProblem, f64) {
        let mut h: Vec<f64> = self.linear_biases().iter().map(|b| b / 2.0).collect();
        let mut offset: f64 = self.linear_biases().iter().sum::<f64>() / 2.0;
        let mut couplings = Vec::with_capacity(self.num_couplers());
        for c in self.couplers() {
            h[c.u] += c.bias / 4.0;
            h[c.v] += c.bias / 4.0;
            offset += c.bias / 4.0;
            couplings.push((c.u, c.v, c.bias / 4.0));
        }
        (IsingProblem { h, couplings }, offset)
    }
}

/// Maps a binary value to its spin.
#[inline]
pub fn spin_of(bit: bool) -> i8 {
    if bit {
        1
    } else {
        -1
    }
}

/// Maps a spin to its binary value. Any non-negative spin maps to `true`.
#[inline]
pub fn bit_of(spin: i8) -> bool {
    spin >= 0
}

/// An Ising problem over caller labels.
#[derive(Debug, Clone)]
pub struct LabeledIsing<L> {
    variables: Variables<L>,
    ising: IsingProblem,
}

impl<L: Clone + Ord> LabeledIsing<L> {
    /// Builds from label-keyed fields and couplings; variables are ordered by label.
    pub fn from_fields<H, J>(h: H, j: J) -> Result<Self>
    where
        H: IntoIterator<Item = (L, f64)>,
        J: IntoIterator<Item = ((L, L), f64)>,
    {
        let h: Vec<(L, f64)> = h.into_iter().collect();
        let j: Vec<((L, L), f64)> = j.into_iter().collect();
        let variables = Variables::sorted(
            h.iter()
                .map(|(l, _)| l.clone())
                .chain(j.iter().flat_map(|((u, v), _)| [u.clone(), v.clone()])),
        );

        let mut fields = vec![0.0; variables.len()];
        for (label, value) in &h {
            fields[variables.require(label)?] += value;
        }
        let mut couplings = Vec::with_capacity(j.len());
        for ((u, v), value) in &j {
            couplings.push((variables.require(u)?, variables.require(v)?, *value));
        }

        Ok(Self {
            ising: IsingProblem::new(fields, couplings)?,
            variables,
        })
    }

    pub fn variables(&self) -> &Variables<L> {
        &self.variables
    }

    pub fn ising(&self) -> &IsingProblem {
        &self.ising
    }
}
