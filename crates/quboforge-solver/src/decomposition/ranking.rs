//! Variable ranking strategies.

use std::fmt::Debug;

use quboforge_config::DecompositionAlgorithm;
use quboforge_core::Qubo;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use super::history::ChangeHistory;

/// Orders variables by preference for the next sub-problem.
pub trait VariableRanking: Send + Debug {
    /// Fills `order` with every variable, most preferred first.
    fn rank(&mut self, qubo: &Qubo, best: &[bool], rng: &mut ChaCha8Rng, order: &mut Vec<usize>);

    /// Records the positions an outer iteration changed relative to the best state.
    fn observe(&mut self, _changed: &[usize]) {}
}

/// Ranks by `|flip_delta|` against the best state, largest first.
///
/// Equal impacts keep ordinal order.
#[derive(Debug, Clone, Default)]
pub struct EnergyImpactRanking {
    impact: Vec<f64>,
}

impl EnergyImpactRanking {
    pub fn new() -> Self {
        Self::default()
    }
}

impl VariableRanking for EnergyImpactRanking {
    fn rank(&mut self, qubo: &Qubo, best: &[bool], _rng: &mut ChaCha8Rng, order: &mut Vec<usize>) {
        let n = qubo.num_variables();
        self.impact.clear();
        self.impact
            .extend((0..n).map(|i| qubo.flip_delta(best, i).abs()));
        order.clear();
        order.extend(0..n);
        let impact = &self.impact;
        order.sort_by(|&a, &b| impact[b].total_cmp(&impact[a]));
    }
}

/// Ranks variables that changed least often in recent iterations first.
///
/// Ties are broken by keys drawn from the seeded stream.
#[derive(Debug, Clone)]
pub struct SolutionDiversityRanking {
    history: ChangeHistory,
    keys: Vec<u64>,
}

impl SolutionDiversityRanking {
    pub fn new(num_variables: usize, window: usize) -> Self {
        Self {
            history: ChangeHistory::new(num_variables, window),
            keys: Vec::with_capacity(num_variables),
        }
    }

    pub fn history(&self) -> &ChangeHistory {
        &self.history
    }
}

impl VariableRanking for SolutionDiversityRanking {
    fn rank(&mut self, qubo: &Qubo, _best: &[bool], rng: &mut ChaCha8Rng, order: &mut Vec<usize>) {
        let n = qubo.num_variables();
        self.keys.clear();
        self.keys.extend((0..n).map(|_| rng.random::<u64>()));
        order.clear();
        order.extend(0..n);
        let (history, keys) = (&self.history, &self.keys);
        order.sort_by_key(|&i| (history.count(i), keys[i]));
    }

    fn observe(&mut self, changed: &[usize]) {
        self.history.push(changed);
    }
}

/// Run-level choice of ranking, fixed for the whole run.
#[derive(Debug, Clone)]
pub enum RankingStrategy {
    EnergyImpact(EnergyImpactRanking),
    SolutionDiversity(SolutionDiversityRanking),
}

impl RankingStrategy {
    pub fn from_algorithm(
        algorithm: DecompositionAlgorithm,
        num_variables: usize,
        diversity_window: usize,
    ) -> Self {
        match algorithm {
            DecompositionAlgorithm::EnergyImpact => {
                RankingStrategy::EnergyImpact(EnergyImpactRanking::new())
            }
            DecompositionAlgorithm::SolutionDiversity => RankingStrategy::SolutionDiversity(
                SolutionDiversityRanking::new(num_variables, diversity_window),
            ),
        }
    }

    pub fn algorithm(&self) -> DecompositionAlgorithm {
        match self {
            RankingStrategy::EnergyImpact(_) => DecompositionAlgorithm::EnergyImpact,
            RankingStrategy::SolutionDiversity(_) => DecompositionAlgorithm::SolutionDiversity,
        }
    }
}

impl VariableRanking for RankingStrategy {
    fn rank(&mut self, qubo: &Qubo, best: &[bool], rng: &mut ChaCha8Rng, order: &mut Vec<usize>) {
        match self {
            RankingStrategy::EnergyImpact(r) => r.rank(qubo, best, rng, order),
            RankingStrategy::SolutionDiversity(r) => r.rank(qubo, best, rng, order),
        }
    }

    fn observe(&mut self, changed: &[usize]) {
        match self {
            RankingStrategy::EnergyImpact(r) => r.observe(changed),
            RankingStrategy::SolutionDiversity(r) => r.observe(changed),
        }
    }
}
