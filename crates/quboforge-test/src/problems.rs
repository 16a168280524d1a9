//! Problem generators with known optima.

use quboforge_core::Qubo;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Ring of `n` variables, bias -1 on every node and every adjacent pair.
///
/// Optimum: all ones, energy `-2n`.
pub fn ring(n: usize) -> Qubo {
    ring_with_last_edge(n, -1.0)
}

/// [`ring`] with the closing edge `(n-1, 0)` set to +1.
///
/// Optimum: all ones, energy `-2n + 2`.
pub fn frustrated_ring(n: usize) -> Qubo {
    ring_with_last_edge(n, 1.0)
}

fn ring_with_last_edge(n: usize, last: f64) -> Qubo {
    assert!(n >= 3, "a ring needs at least three variables");
    let mut terms: Vec<(usize, usize, f64)> = (0..n).map(|i| (i, i, -1.0)).collect();
    for i in 0..n - 1 {
        terms.push((i, i + 1, -1.0));
    }
    terms.push((n - 1, 0, last));
    Qubo::build(n, terms).unwrap()
}

/// `n` uncoupled variables with the same linear bias.
pub fn independent(n: usize, bias: f64) -> Qubo {
    Qubo::build(n, (0..n).map(|i| (i, i, bias))).unwrap()
}

/// Two disjoint [`ring`]s of `n` variables each: `0..n` and `n..2n`.
///
/// Optimum: all ones, energy `-4n`.
pub fn two_components(n: usize) -> Qubo {
    assert!(n >= 3, "a ring needs at least three variables");
    let mut terms = Vec::new();
    for base in [0, n] {
        for i in 0..n {
            terms.push((base + i, base + i, -1.0));
            terms.push((base + i, base + (i + 1) % n, -1.0));
        }
    }
    Qubo::build(2 * n, terms).unwrap()
}

/// Seeded random QUBO with biases uniform in `[-1, 1)` and the given coupler density.
pub fn random_sparse(n: usize, density: f64, seed: u64) -> Qubo {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut terms = Vec::new();
    for i in 0..n {
        terms.push((i, i, rng.random_range(-1.0..1.0)));
        for j in (i + 1)..n {
            if rng.random_bool(density) {
                terms.push((i, j, rng.random_range(-1.0..1.0)));
            }
        }
    }
    Qubo::build(n, terms).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_optimum() {
        let all_ones = vec![true; 10];
        assert_eq!(ring(10).energy(&all_ones), -20.0);
        assert_eq!(frustrated_ring(10).energy(&all_ones), -18.0);
    }

    #[test]
    fn test_two_components_disjoint() {
        let qubo = two_components(4);
        assert_eq!(qubo.num_variables(), 8);
        assert_eq!(qubo.quadratic(3, 4), 0.0);
        assert_eq!(qubo.energy(&[true; 8]), -16.0);
    }

    #[test]
    fn test_random_sparse_is_seeded() {
        assert_eq!(random_sparse(30, 0.1, 5), random_sparse(30, 0.1, 5));
    }
}
