//! Sliding window of per-iteration value changes.

use std::collections::VecDeque;

use smallvec::SmallVec;

/// Changed positions of the last `window` outer iterations, with per-variable counts.
#[derive(Debug, Clone)]
pub struct ChangeHistory {
    window: usize,
    entries: VecDeque<SmallVec<[usize; 16]>>,
    counts: Vec<u32>,
}

impl ChangeHistory {
    pub fn new(num_variables: usize, window: usize) -> Self {
        Self {
            window: window.max(1),
            entries: VecDeque::with_capacity(window.max(1) + 1),
            counts: vec![0; num_variables],
        }
    }

    /// Records one iteration's changed positions, dropping the oldest beyond the window.
    pub fn push(&mut self, changed: &[usize]) {
        let entry: SmallVec<[usize; 16]> = changed
            .iter()
            .copied()
            .filter(|&i| i < self.counts.len())
            .collect();
        for &i in &entry {
            self.counts[i] += 1;
        }
        self.entries.push_back(entry);

        if self.entries.len() > self.window {
            if let Some(old) = self.entries.pop_front() {
                for i in old {
                    self.counts[i] -= 1;
                }
            }
        }
    }

    /// How many remembered iterations changed variable `i`.
    pub fn count(&self, i: usize) -> u32 {
        self.counts.get(i).copied().unwrap_or(0)
    }

    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
