//! Labeled sample output.

use std::collections::BTreeMap;

use quboforge_core::{spin_of, Variables};

use crate::ledger::StateRecord;
use crate::statistics::SolverStatistics;

/// Value domain of reported samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vartype {
    /// Values in `{0, 1}`.
    Binary,
    /// Values in `{-1, +1}`.
    Spin,
}

/// One distinct assignment keyed by caller label.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample<L> {
    pub assignment: BTreeMap<L, i8>,
    pub energy: f64,
    pub num_occurrences: u64,
}

/// Finished result of a run: distinct samples, best first.
///
/// The set is finite and fully materialized; iterating it again yields the
/// same samples.
#[derive(Debug, Clone)]
pub struct SampleSet<L> {
    samples: Vec<Sample<L>>,
    vartype: Vartype,
    statistics: SolverStatistics,
}

impl<L: Clone + Ord> SampleSet<L> {
    /// Labels binary records.
    pub fn from_binary(
        variables: &Variables<L>,
        records: Vec<StateRecord>,
        statistics: SolverStatistics,
    ) -> Self {
        let samples = records
            .into_iter()
            .map(|r| Sample {
                assignment: label(variables, &r.state, i8::from),
                energy: r.energy,
                num_occurrences: r.num_occurrences,
            })
            .collect();
        Self {
            samples,
            vartype: Vartype::Binary,
            statistics,
        }
    }

    /// Labels records solved as a QUBO converted from an Ising model.
    ///
    /// `offset` is the constant with `ising = qubo + offset`.
    pub fn from_spin(
        variables: &Variables<L>,
        records: Vec<StateRecord>,
        offset: f64,
        statistics: SolverStatistics,
    ) -> Self {
        let samples = records
            .into_iter()
            .map(|r| Sample {
                assignment: label(variables, &r.state, spin_of),
                energy: r.energy + offset,
                num_occurrences: r.num_occurrences,
            })
            .collect();
        Self {
            samples,
            vartype: Vartype::Spin,
            statistics,
        }
    }
}

fn label<L: Clone + Ord>(
    variables: &Variables<L>,
    state: &[bool],
    value: impl Fn(bool) -> i8,
) -> BTreeMap<L, i8> {
    variables
        .labels()
        .iter()
        .zip(state)
        .map(|(l, &bit)| (l.clone(), value(bit)))
        .collect()
}

impl<L> SampleSet<L> {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// The best sample.
    pub fn first(&self) -> Option<&Sample<L>> {
        self.samples.first()
    }

    pub fn samples(&self) -> &[Sample<L>] {
        &self.samples
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sample<L>> {
        self.samples.iter()
    }

    pub fn vartype(&self) -> Vartype {
        self.vartype
    }

    pub fn statistics(&self) -> &SolverStatistics {
        &self.statistics
    }

    pub fn into_samples(self) -> Vec<Sample<L>> {
        self.samples
    }
}

impl<'s, L> IntoIterator for &'s SampleSet<L> {
    type Item = &'s Sample<L>;
    type IntoIter = std::slice::Iter<'s, Sample<L>>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

impl<L> IntoIterator for SampleSet<L> {
    type Item = Sample<L>;
    type IntoIter = std::vec::IntoIter<Sample<L>>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.into_iter()
    }
}
