//! Sub-QUBO extraction against a fixed background assignment.

use std::collections::HashMap;

use super::{Coupler, Qubo};
use crate::error::{QuboError, Result};

/// A QUBO projected onto a subset of variables.
///
/// Local index `k` stands for global variable `variables()[k]`. Couplings to
/// variables outside the subset are folded into the local linear biases, so
/// for any assignment that agrees with the background outside the subset:
/// `full.energy(state) == sub.qubo().energy(local) + sub.offset()`.
#[derive(Debug, Clone)]
pub struct Subproblem {
    variables: Vec<usize>,
    qubo: Qubo,
    offset: f64,
}

impl Subproblem {
    /// Global ordinals of the subset, in local index order.
    pub fn variables(&self) -> &[usize] {
        &self.variables
    }

    pub fn qubo(&self) -> &Qubo {
        &self.qubo
    }

    /// Energy contributed by the fixed background.
    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Restricts a full assignment to the subset.
    pub fn local_state(&self, state: &[bool]) -> Vec<bool> {
        self.variables.iter().map(|&v| state[v]).collect()
    }

    /// Writes a local assignment into the subset positions of `state`.
    pub fn splice(&self, local: &[bool], state: &mut [bool]) {
        for (&v, &bit) in self.variables.iter().zip(local) {
            state[v] = bit;
        }
    }
}

impl Qubo {
    /// Extracts the sub-QUBO induced by `variables` with the rest of `state` held fixed.
    ///
    /// The local linear bias of `v` is `linear(v) + Σ_{w ∉ S} quadratic(v, w)·state[w]`.
    /// Fails with [`QuboError::MalformedProblem`] on out-of-range or repeated
    /// variables, or when `state` does not cover the problem.
    pub fn extract_subproblem(&self, variables: &[usize], state: &[bool]) -> Result<Subproblem> {
        let n = self.num_variables();
        if state.len() != n {
            return Err(QuboError::MalformedProblem(format!(
                "background assignment has {} values, problem has {n} variables",
                state.len()
            )));
        }

        let mut local_of: HashMap<usize, usize> = HashMap::with_capacity(variables.len());
        for (k, &v) in variables.iter().enumerate() {
            if v >= n {
                return Err(QuboError::MalformedProblem(format!(
                    "sub-problem variable {v} outside 0..{n}"
                )));
            }
            if local_of.insert(v, k).is_some() {
                return Err(QuboError::MalformedProblem(format!(
                    "sub-problem variable {v} listed twice"
                )));
            }
        }

        let mut linear = Vec::with_capacity(variables.len());
        let mut couplers = Vec::new();
        for (k, &v) in variables.iter().enumerate() {
            let mut bias = self.linear(v);
            for nb in self.neighbors(v) {
                match local_of.get(&nb.index) {
                    Some(&l) if k < l => couplers.push(Coupler {
                        u: k,
                        v: l,
                        bias: nb.bias,
                    }),
                    Some(_) => {}
                    None => {
                        if state[nb.index] {
                            bias += nb.bias;
                        }
                    }
                }
            }
            linear.push(bias);
        }
        couplers.sort_by(|a, b| (a.u, a.v).cmp(&(b.u, b.v)));

        let qubo = Qubo::from_sorted(linear, couplers);
        let local: Vec<bool> = variables.iter().map(|&v| state[v]).collect();
        let offset = self.energy(state) - qubo.energy(&local);

        Ok(Subproblem {
            variables: variables.to_vec(),
            qubo,
            offset,
        })
    }
}
