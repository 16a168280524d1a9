//! Tests for the decomposer.

use std::collections::{BTreeSet, VecDeque};

use quboforge_config::DecompositionAlgorithm;
use quboforge_core::Qubo;
use quboforge_test::{random_sparse, ring, two_components};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::*;

/// Sizes of the connected components of the subgraph induced by `subset`.
fn component_sizes(qubo: &Qubo, subset: &[usize]) -> Vec<usize> {
    let members: BTreeSet<usize> = subset.iter().copied().collect();
    let mut seen = BTreeSet::new();
    let mut sizes = Vec::new();
    for &s in subset {
        if !seen.insert(s) {
            continue;
        }
        let mut size = 0;
        let mut queue = VecDeque::from([s]);
        while let Some(v) = queue.pop_front() {
            size += 1;
            for nb in qubo.neighbors(v) {
                if members.contains(&nb.index) && seen.insert(nb.index) {
                    queue.push_back(nb.index);
                }
            }
        }
        sizes.push(size);
    }
    sizes.sort_unstable();
    sizes
}

fn decomposer(algorithm: DecompositionAlgorithm, n: usize, limit: usize) -> Decomposer {
    Decomposer::new(RankingStrategy::from_algorithm(algorithm, n, 8), n, limit)
}

#[test]
fn test_whole_problem_when_small() {
    let qubo = ring(6);
    let mut d = decomposer(DecompositionAlgorithm::EnergyImpact, 6, 6);
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    assert!(d.is_whole_problem());
    let subsets = d.next_subsets(&qubo, &[false; 6], 3, &mut rng);
    assert_eq!(subsets, vec![vec![0, 1, 2, 3, 4, 5]]);
}

#[test]
fn test_subsets_connected_and_bounded() {
    for algorithm in [
        DecompositionAlgorithm::EnergyImpact,
        DecompositionAlgorithm::SolutionDiversity,
    ] {
        let qubo = ring(30);
        let mut d = decomposer(algorithm, 30, 7);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let best: Vec<bool> = (0..30).map(|i| i % 4 == 0).collect();
        for _ in 0..20 {
            let subsets = d.next_subsets(&qubo, &best, 1, &mut rng);
            assert_eq!(subsets.len(), 1);
            assert_eq!(subsets[0].len(), 7);
            assert_eq!(component_sizes(&qubo, &subsets[0]), vec![7]);
            d.observe(&subsets[0][..2]);
        }
    }
}

#[test]
fn test_connected_on_random_graph() {
    let qubo = random_sparse(80, 0.06, 4);
    let mut d = decomposer(DecompositionAlgorithm::EnergyImpact, 80, 15);
    let mut rng = ChaCha8Rng::seed_from_u64(2);
    let best = vec![false; 80];
    for _ in 0..10 {
        let subset = d.next_subsets(&qubo, &best, 1, &mut rng).remove(0);
        assert_eq!(subset.len(), 15);
        // growth only jumps once a component has no unused neighbor left,
        // so at most one component of the subset still borders the rest
        let open = open_components(&qubo, &subset);
        assert!(open <= 1, "{open} components border the rest");
    }
}

/// Number of induced components of `subset` with a neighbor outside it.
fn open_components(qubo: &Qubo, subset: &[usize]) -> usize {
    let members: BTreeSet<usize> = subset.iter().copied().collect();
    let mut seen = BTreeSet::new();
    let mut open = 0;
    for &s in subset {
        if !seen.insert(s) {
            continue;
        }
        let mut borders = false;
        let mut queue = VecDeque::from([s]);
        while let Some(v) = queue.pop_front() {
            for nb in qubo.neighbors(v) {
                if !members.contains(&nb.index) {
                    borders = true;
                } else if seen.insert(nb.index) {
                    queue.push_back(nb.index);
                }
            }
        }
        if borders {
            open += 1;
        }
    }
    open
}

#[test]
fn test_disconnected_graph_exhausts_component_first() {
    let qubo = two_components(5);
    let mut d = decomposer(DecompositionAlgorithm::EnergyImpact, 10, 7);
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let subset = d.next_subsets(&qubo, &[false; 10], 1, &mut rng).remove(0);
    assert_eq!(subset.len(), 7);
    assert_eq!(component_sizes(&qubo, &subset), vec![2, 5]);
}

#[test]
fn test_energy_impact_seeds_at_top_ranked() {
    // path with one dominant variable
    let mut terms: Vec<(usize, usize, f64)> = (0..12).map(|i| (i, i, -1.0)).collect();
    terms[7].2 = -5.0;
    terms.extend((1..12).map(|i| (i - 1, i, -0.1)));
    let qubo = Qubo::build(12, terms).unwrap();

    let mut d = decomposer(DecompositionAlgorithm::EnergyImpact, 12, 4);
    let mut rng = ChaCha8Rng::seed_from_u64(4);
    let subset = d.next_subsets(&qubo, &[false; 12], 1, &mut rng).remove(0);
    assert!(subset.contains(&7));
    assert_eq!(component_sizes(&qubo, &subset), vec![4]);
}

#[test]
fn test_cursor_advances() {
    let qubo = ring(20);
    let mut d = decomposer(DecompositionAlgorithm::EnergyImpact, 20, 5);
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    // all impacts equal, so the ranking is ordinal order
    let best = vec![false; 20];
    let first = d.next_subsets(&qubo, &best, 1, &mut rng).remove(0);
    let second = d.next_subsets(&qubo, &best, 1, &mut rng).remove(0);
    assert!(first.contains(&0));
    assert!(second.contains(&5));
    assert_ne!(first, second);
}

#[test]
fn test_parallel_subsets_disjoint() {
    let qubo = ring(40);
    let mut d = decomposer(DecompositionAlgorithm::EnergyImpact, 40, 8);
    let mut rng = ChaCha8Rng::seed_from_u64(6);
    let subsets = d.next_subsets(&qubo, &vec![false; 40], 3, &mut rng);
    assert_eq!(subsets.len(), 3);
    let all: BTreeSet<usize> = subsets.iter().flatten().copied().collect();
    assert_eq!(all.len(), 24);
    for subset in &subsets {
        assert_eq!(subset.len(), 8);
    }
}

#[test]
fn test_energy_impact_ranking_order() {
    let qubo = Qubo::build(4, [(0, 0, 1.0), (1, 1, -3.0), (2, 2, 1.0), (3, 3, 2.0)]).unwrap();
    let mut ranking = EnergyImpactRanking::new();
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let mut order = Vec::new();
    ranking.rank(&qubo, &[false; 4], &mut rng, &mut order);
    assert_eq!(order, vec![1, 3, 0, 2]);
}

#[test]
fn test_diversity_ranking_prefers_static_variables() {
    let qubo = ring(5);
    let mut ranking = SolutionDiversityRanking::new(5, 4);
    ranking.observe(&[0, 1]);
    ranking.observe(&[0]);
    ranking.observe(&[0, 2]);

    let mut rng = ChaCha8Rng::seed_from_u64(9);
    let mut order = Vec::new();
    ranking.rank(&qubo, &[false; 5], &mut rng, &mut order);
    assert_eq!(order.len(), 5);
    let tail = &order[2..];
    assert_eq!(tail[2], 0);
    assert!(tail[..2].contains(&1) && tail[..2].contains(&2));
    assert!(order[..2].contains(&3) && order[..2].contains(&4));
}

#[test]
fn test_diversity_ranking_seeded() {
    let qubo = ring(12);
    let rank_with = |seed| {
        let mut ranking = SolutionDiversityRanking::new(12, 4);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut order = Vec::new();
        ranking.rank(&qubo, &[false; 12], &mut rng, &mut order);
        order
    };
    assert_eq!(rank_with(11), rank_with(11));
}
