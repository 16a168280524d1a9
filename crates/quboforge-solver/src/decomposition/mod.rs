//! Sub-problem selection.
//!
//! The [`Decomposer`] ranks variables with a run-level [`RankingStrategy`],
//! then grows each subset from a seed by adding the best-ranked unused
//! neighbor, so subsets stay connected under the coupler graph. The seed
//! walks the ranking: its rank offset advances by `solver_limit` per subset
//! and wraps.

mod growth;
mod history;
mod ranking;

#[cfg(test)]
mod tests;

pub use history::ChangeHistory;
pub use ranking::{
    EnergyImpactRanking, RankingStrategy, SolutionDiversityRanking, VariableRanking,
};

use quboforge_core::Qubo;
use rand_chacha::ChaCha8Rng;

use growth::grow_connected;

/// Chooses bounded, connected variable subsets to re-optimize.
#[derive(Debug)]
pub struct Decomposer {
    ranking: RankingStrategy,
    limit: usize,
    cursor: usize,
    order: Vec<usize>,
    position: Vec<usize>,
    used: Vec<bool>,
    queued: Vec<bool>,
}

impl Decomposer {
    /// Creates a decomposer for `num_variables` variables and subsets of at most `limit`.
    pub fn new(ranking: RankingStrategy, num_variables: usize, limit: usize) -> Self {
        Self {
            ranking,
            limit: limit.max(1),
            cursor: 0,
            order: Vec::with_capacity(num_variables),
            position: vec![0; num_variables],
            used: vec![false; num_variables],
            queued: vec![false; num_variables],
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn ranking(&self) -> &RankingStrategy {
        &self.ranking
    }

    /// Whether every subset is the whole problem.
    pub fn is_whole_problem(&self) -> bool {
        self.position.len() <= self.limit
    }

    /// Returns up to `count` disjoint subsets, each sorted by ordinal.
    ///
    /// When the problem fits in one sub-problem the only subset is the whole
    /// problem, whatever `count` is.
    pub fn next_subsets(
        &mut self,
        qubo: &Qubo,
        best: &[bool],
        count: usize,
        rng: &mut ChaCha8Rng,
    ) -> Vec<Vec<usize>> {
        let n = qubo.num_variables();
        if n == 0 {
            return Vec::new();
        }
        if self.is_whole_problem() {
            return vec![(0..n).collect()];
        }

        self.ranking.rank(qubo, best, rng, &mut self.order);
        for (rank, &v) in self.order.iter().enumerate() {
            self.position[v] = rank;
        }
        self.used.fill(false);

        let mut subsets = Vec::with_capacity(count);
        for k in 0..count.max(1) {
            let start = (self.cursor + k * self.limit) % n;
            let subset = grow_connected(
                qubo,
                &self.order,
                &self.position,
                &mut self.used,
                &mut self.queued,
                start,
                self.limit,
            );
            if subset.is_empty() {
                break;
            }
            subsets.push(subset);
        }

        self.cursor = (self.cursor + subsets.len() * self.limit) % n;
        subsets
    }

    /// Feeds the positions an outer iteration changed to the ranking.
    pub fn observe(&mut self, changed: &[usize]) {
        self.ranking.observe(changed);
    }
}
