//! Exhaustive reference solver.

use quboforge_core::{FlipDeltas, Qubo};

/// Largest problem [`brute_force_minimum`] accepts.
pub const MAX_EXACT_VARIABLES: usize = 24;

/// Enumerates every assignment in Gray-code order and returns the minimum
/// energy with the first assignment that attains it.
pub fn brute_force_minimum(qubo: &Qubo) -> (f64, Vec<bool>) {
    let n = qubo.num_variables();
    assert!(
        n <= MAX_EXACT_VARIABLES,
        "brute force limited to {MAX_EXACT_VARIABLES} variables, got {n}"
    );

    let mut state = vec![false; n];
    let mut deltas = FlipDeltas::new(qubo, &state);
    let mut energy = 0.0;
    let mut best = (energy, state.clone());

    for step in 1u64..(1u64 << n) {
        let bit = step.trailing_zeros() as usize;
        energy += deltas.flip(qubo, &mut state, bit);
        if energy < best.0 {
            best = (energy, state.clone());
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problems::{frustrated_ring, independent, random_sparse, ring};

    #[test]
    fn test_known_optima() {
        assert_eq!(brute_force_minimum(&ring(8)).0, -16.0);
        assert_eq!(brute_force_minimum(&frustrated_ring(8)).0, -14.0);
        assert_eq!(brute_force_minimum(&independent(6, -1.0)).0, -6.0);
        assert_eq!(brute_force_minimum(&independent(6, 2.0)), (0.0, vec![false; 6]));
    }

    #[test]
    fn test_energy_matches_state() {
        let qubo = random_sparse(12, 0.3, 9);
        let (energy, state) = brute_force_minimum(&qubo);
        assert!((qubo.energy(&state) - energy).abs() < 1e-9);
    }
}
