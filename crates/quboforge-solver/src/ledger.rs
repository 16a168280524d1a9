//! Occurrence ledger of accepted and tied assignments.

use std::collections::HashMap;

use quboforge_core::{Comparison, Direction};

/// One distinct assignment with its energy and occurrence count.
#[derive(Debug, Clone, PartialEq)]
pub struct StateRecord {
    pub state: Vec<bool>,
    pub energy: f64,
    pub num_occurrences: u64,
}

/// Deduplicates assignments and counts how often each was produced.
///
/// Entries keep first-seen order until [`ResultLedger::finalize`] sorts them.
#[derive(Debug, Default)]
pub struct ResultLedger {
    index: HashMap<Vec<bool>, usize>,
    records: Vec<StateRecord>,
}

impl ResultLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one occurrence of `state`, inserting it on first sight.
    ///
    /// Returns the occurrence count after recording.
    pub fn record(&mut self, state: &[bool], energy: f64) -> u64 {
        if let Some(&idx) = self.index.get(state) {
            let record = &mut self.records[idx];
            record.num_occurrences += 1;
            return record.num_occurrences;
        }
        self.index.insert(state.to_vec(), self.records.len());
        self.records.push(StateRecord {
            state: state.to_vec(),
            energy,
            num_occurrences: 1,
        });
        1
    }

    pub fn occurrences(&self, state: &[bool]) -> u64 {
        self.index
            .get(state)
            .map_or(0, |&idx| self.records[idx].num_occurrences)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records sorted best first.
    ///
    /// Energies within tolerance of a run's best-ordered member are ties and
    /// keep first-seen order, the same notion of a tie the acceptance rule uses.
    pub fn finalize(self, direction: Direction) -> Vec<StateRecord> {
        let mut indexed: Vec<(usize, StateRecord)> =
            self.records.into_iter().enumerate().collect();
        indexed.sort_by(|(_, a), (_, b)| direction.order(a.energy, b.energy));

        let mut start = 0;
        while start < indexed.len() {
            let anchor = indexed[start].1.energy;
            let end = start
                + indexed[start..]
                    .iter()
                    .take_while(|(_, r)| direction.compare(r.energy, anchor) == Comparison::Tie)
                    .count();
            indexed[start..end].sort_by_key(|&(seen, _)| seen);
            start = end;
        }

        indexed.into_iter().map(|(_, record)| record).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_counts_repeats() {
        let mut ledger = ResultLedger::new();
        assert_eq!(ledger.record(&[true, false], -1.0), 1);
        assert_eq!(ledger.record(&[true, false], -1.0), 2);
        assert_eq!(ledger.record(&[false, true], -1.0), 1);
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.occurrences(&[true, false]), 2);
        assert_eq!(ledger.occurrences(&[true, true]), 0);
    }

    #[test]
    fn test_finalize_sorts_stably() {
        let mut ledger = ResultLedger::new();
        ledger.record(&[false, false], 0.0);
        ledger.record(&[true, false], -2.0);
        ledger.record(&[false, true], -2.0);
        ledger.record(&[true, true], -1.0);

        let records = ledger.finalize(Direction::Minimize);
        let states: Vec<_> = records.iter().map(|r| r.state.clone()).collect();
        assert_eq!(
            states,
            vec![
                vec![true, false],
                vec![false, true],
                vec![true, true],
                vec![false, false]
            ]
        );
    }

    #[test]
    fn test_finalize_treats_rounding_noise_as_tie() {
        let mut ledger = ResultLedger::new();
        ledger.record(&[false, false, false], 0.0);
        ledger.record(&[false, false, true], -0.3);
        ledger.record(&[true, true, false], -0.1 + -0.2);
        ledger.record(&[true, true, false], -0.1 + -0.2);

        let records = ledger.finalize(Direction::Minimize);
        assert_eq!(records[0].state, vec![false, false, true]);
        assert_eq!(records[1].state, vec![true, true, false]);
        assert_eq!(records[1].num_occurrences, 2);
        assert_eq!(records[2].state, vec![false, false, false]);
    }

    #[test]
    fn test_finalize_maximize() {
        let mut ledger = ResultLedger::new();
        ledger.record(&[false], 0.0);
        ledger.record(&[true], 3.0);
        let records = ledger.finalize(Direction::Maximize);
        assert_eq!(records[0].energy, 3.0);
    }
}
