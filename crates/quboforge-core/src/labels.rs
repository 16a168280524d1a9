//! Label ↔ ordinal mapping for caller-facing problems.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::error::{QuboError, Result};
use crate::qubo::Qubo;

/// Immutable mapping between caller labels and ordinals `0..len`.
#[derive(Clone, PartialEq, Eq)]
pub struct Variables<L> {
    labels: Vec<L>,
    index: BTreeMap<L, usize>,
}

impl<L: Clone + Ord> Variables<L> {
    /// Assigns ordinals in the given order. Repeated labels are rejected.
    pub fn new<I: IntoIterator<Item = L>>(labels: I) -> Result<Self> {
        let labels: Vec<L> = labels.into_iter().collect();
        let mut index = BTreeMap::new();
        for (i, label) in labels.iter().enumerate() {
            if index.insert(label.clone(), i).is_some() {
                return Err(QuboError::MalformedProblem(format!(
                    "variable label at position {i} is repeated"
                )));
            }
        }
        Ok(Self { labels, index })
    }

    /// Assigns ordinals in label order, collapsing repeats.
    pub fn sorted<I: IntoIterator<Item = L>>(labels: I) -> Self {
        let set: BTreeSet<L> = labels.into_iter().collect();
        let labels: Vec<L> = set.into_iter().collect();
        let index = labels
            .iter()
            .enumerate()
            .map(|(i, l)| (l.clone(), i))
            .collect();
        Self { labels, index }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn ordinal(&self, label: &L) -> Option<usize> {
        self.index.get(label).copied()
    }

    pub fn label(&self, ordinal: usize) -> Option<&L> {
        self.labels.get(ordinal)
    }

    pub fn labels(&self) -> &[L] {
        &self.labels
    }

    pub(crate) fn require(&self, label: &L) -> Result<usize> {
        self.ordinal(label).ok_or_else(|| {
            QuboError::MalformedProblem("coefficient references an unknown variable label".into())
        })
    }
}

impl<L: fmt::Debug> fmt::Debug for Variables<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.labels).finish()
    }
}

/// A QUBO over caller labels.
///
/// # Example
///
/// ```
/// use quboforge_core::LabeledQubo;
///
/// let problem = LabeledQubo::from_terms([("a", "a", -1.0), ("a", "b", 2.0)]).unwrap();
/// assert_eq!(problem.variables().ordinal(&"b"), Some(1));
/// assert_eq!(problem.qubo().quadratic(0, 1), 2.0);
/// ```
#[derive(Debug, Clone)]
pub struct LabeledQubo<L> {
    variables: Variables<L>,
    qubo: Qubo,
}

impl<L: Clone + Ord> LabeledQubo<L> {
    /// Builds from `(u, v, bias)` terms; every label mentioned becomes a variable,
    /// ordered by label.
    pub fn from_terms<I>(terms: I) -> Result<Self>
    where
        I: IntoIterator<Item = (L, L, f64)>,
    {
        let terms: Vec<(L, L, f64)> = terms.into_iter().collect();
        let variables = Variables::sorted(
            terms
                .iter()
                .flat_map(|(u, v, _)| [u.clone(), v.clone()]),
        );
        Self::with_variables(variables, terms)
    }

    /// Builds over an explicit variable set, which may include isolated variables.
    pub fn with_variables<I>(variables: Variables<L>, terms: I) -> Result<Self>
    where
        I: IntoIterator<Item = (L, L, f64)>,
    {
        let mut indexed = Vec::new();
        for (u, v, bias) in terms {
            indexed.push((variables.require(&u)?, variables.require(&v)?, bias));
        }
        let qubo = Qubo::build(variables.len(), indexed)?;
        Ok(Self { variables, qubo })
    }

    pub fn variables(&self) -> &Variables<L> {
        &self.variables
    }

    pub fn qubo(&self) -> &Qubo {
        &self.qubo
    }

    pub fn into_parts(self) -> (Variables<L>, Qubo) {
        (self.variables, self.qubo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_repeats() {
        assert!(Variables::new(["x", "y", "x"]).is_err());
        let vars = Variables::new(["y", "x"]).unwrap();
        assert_eq!(vars.ordinal(&"y"), Some(0));
        assert_eq!(vars.label(1), Some(&"x"));
    }

    #[test]
    fn test_sorted_collapses_repeats() {
        let vars = Variables::sorted([3, 1, 3, 2]);
        assert_eq!(vars.labels(), &[1, 2, 3]);
    }

    #[test]
    fn test_from_terms() {
        let problem =
            LabeledQubo::from_terms([("b", "b", 1.0), ("a", "c", -2.0), ("c", "a", -1.0)]).unwrap();
        assert_eq!(problem.variables().labels(), &["a", "b", "c"]);
        assert_eq!(problem.qubo().linear(1), 1.0);
        assert_eq!(problem.qubo().quadratic(0, 2), -3.0);
    }

    #[test]
    fn test_with_variables_rejects_unknown_label() {
        let vars = Variables::new(["a"]).unwrap();
        let err = LabeledQubo::with_variables(vars, [("a", "z", 1.0)]).unwrap_err();
        assert!(matches!(err, QuboError::MalformedProblem(_)));
    }

    #[test]
    fn test_isolated_variable_kept() {
        let vars = Variables::new(["a", "b"]).unwrap();
        let problem = LabeledQubo::with_variables(vars, [("a", "a", -1.0)]).unwrap();
        assert_eq!(problem.qubo().num_variables(), 2);
    }
}
