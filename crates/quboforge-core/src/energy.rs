//! Energy evaluation.
//!
//! Full energies cost O(terms); single and multi-flip deltas cost O(degree of
//! the touched variables). All functions are pure over `&Qubo` and an
//! assignment, so concurrent sub-solves may share one model.

use crate::qubo::Qubo;

impl Qubo {
    /// Energy of a full assignment.
    ///
    /// # Panics
    ///
    /// Panics if `state` is shorter than the problem.
    pub fn energy(&self, state: &[bool]) -> f64 {
        let mut energy = 0.0;
        for (i, &bias) in self.linear_biases().iter().enumerate() {
            if state[i] {
                energy += bias;
            }
        }
        for c in self.couplers() {
            if state[c.u] && state[c.v] {
                energy += c.bias;
            }
        }
        energy
    }

    /// Energy change from flipping variable `i`.
    #[inline]
    pub fn flip_delta(&self, state: &[bool], i: usize) -> f64 {
        let mut field = self.linear(i);
        for nb in self.neighbors(i) {
            if state[nb.index] {
                field += nb.bias;
            }
        }
        if state[i] {
            -field
        } else {
            field
        }
    }

    /// Energy change from flipping every variable in `flipped` at once.
    ///
    /// Repeated entries are ignored.
    pub fn delta(&self, state: &[bool], flipped: &[usize]) -> f64 {
        let mut set = flipped.to_vec();
        set.sort_unstable();
        set.dedup();

        let mut delta = 0.0;
        for &k in &set {
            delta += self.flip_delta(state, k);
            let s_k = direction(state[k]);
            // Pair correction, each pair counted once from its lower end.
            for nb in self.neighbors(k) {
                if nb.index > k && set.binary_search(&nb.index).is_ok() {
                    delta += nb.bias * s_k * direction(state[nb.index]);
                }
            }
        }
        delta
    }
}

/// +1 for a 0 → 1 flip, -1 for 1 → 0.
#[inline]
fn direction(bit: bool) -> f64 {
    if bit {
        -1.0
    } else {
        1.0
    }
}

/// Ising energy `Σ h_i s_i + Σ J_ij s_i s_j` over ±1 spins.
pub fn ising_energy(h: &[f64], couplings: &[(usize, usize, f64)], spins: &[i8]) -> f64 {
    let mut energy = 0.0;
    for (i, &field) in h.iter().enumerate() {
        energy += field * f64::from(spins[i]);
    }
    for &(i, j, coupling) in couplings {
        energy += coupling * f64::from(spins[i]) * f64::from(spins[j]);
    }
    energy
}

/// Cached single-flip deltas for every variable of a QUBO.
///
/// [`FlipDeltas::flip`] updates the flipped variable and its neighbors only.
#[derive(Debug, Clone)]
pub struct FlipDeltas {
    deltas: Vec<f64>,
}

impl FlipDeltas {
    pub fn new(qubo: &Qubo, state: &[bool]) -> Self {
        Self {
            deltas: (0..qubo.num_variables())
                .map(|i| qubo.flip_delta(state, i))
                .collect(),
        }
    }

    #[inline]
    pub fn get(&self, i: usize) -> f64 {
        self.deltas[i]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.deltas
    }

    /// Flips `state[k]` and returns the applied energy change.
    pub fn flip(&mut self, qubo: &Qubo, state: &mut [bool], k: usize) -> f64 {
        let applied = self.deltas[k];
        let change = direction(state[k]);
        state[k] = !state[k];
        for nb in qubo.neighbors(k) {
            self.deltas[nb.index] += direction(state[nb.index]) * nb.bias * change;
        }
        self.deltas[k] = -applied;
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn random_qubo(rng: &mut ChaCha8Rng, n: usize, density: f64) -> Qubo {
        let mut terms = Vec::new();
        for i in 0..n {
            terms.push((i, i, rng.random_range(-2.0..2.0)));
            for j in (i + 1)..n {
                if rng.random_bool(density) {
                    terms.push((i, j, rng.random_range(-2.0..2.0)));
                }
            }
        }
        Qubo::build(n, terms).unwrap()
    }

    fn random_state(rng: &mut ChaCha8Rng, n: usize) -> Vec<bool> {
        (0..n).map(|_| rng.random_bool(0.5)).collect()
    }

    #[test]
    fn test_energy_of_small_problem() {
        let qubo = Qubo::build(3, [(0, 0, -1.0), (1, 1, 2.0), (0, 1, -3.0), (1, 2, 4.0)]).unwrap();
        assert_eq!(qubo.energy(&[false, false, false]), 0.0);
        assert_eq!(qubo.energy(&[true, true, false]), -2.0);
        assert_eq!(qubo.energy(&[true, true, true]), 2.0);
    }

    #[test]
    fn test_flip_delta_matches_recompute() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..20 {
            let qubo = random_qubo(&mut rng, 12, 0.3);
            let state = random_state(&mut rng, 12);
            let base = qubo.energy(&state);
            for i in 0..12 {
                let mut flipped = state.clone();
                flipped[i] = !flipped[i];
                let expected = qubo.energy(&flipped) - base;
                assert!((qubo.flip_delta(&state, i) - expected).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_multi_flip_delta_matches_recompute() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..50 {
            let qubo = random_qubo(&mut rng, 15, 0.4);
            let state = random_state(&mut rng, 15);
            let flipped: Vec<usize> = (0..15).filter(|_| rng.random_bool(0.4)).collect();
            let mut next = state.clone();
            for &k in &flipped {
                next[k] = !next[k];
            }
            let expected = qubo.energy(&next) - qubo.energy(&state);
            assert!((qubo.delta(&state, &flipped) - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_delta_ignores_repeats() {
        let qubo = Qubo::build(2, [(0, 0, -1.0), (0, 1, 3.0)]).unwrap();
        let state = [false, false];
        assert_eq!(qubo.delta(&state, &[0, 0, 1]), qubo.delta(&state, &[0, 1]));
    }

    #[test]
    fn test_flip_deltas_track_state() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let qubo = random_qubo(&mut rng, 20, 0.25);
        let mut state = random_state(&mut rng, 20);
        let mut deltas = FlipDeltas::new(&qubo, &state);
        let mut energy = qubo.energy(&state);

        for _ in 0..200 {
            let k = rng.random_range(0..20);
            energy += deltas.flip(&qubo, &mut state, k);
        }

        assert!((energy - qubo.energy(&state)).abs() < 1e-9);
        let fresh = FlipDeltas::new(&qubo, &state);
        for i in 0..20 {
            assert!((deltas.get(i) - fresh.get(i)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_ising_energy() {
        let h = [0.0, 1.0, -1.0];
        let j = [(0, 1, -1.0), (1, 2, -1.0)];
        assert_eq!(ising_energy(&h, &j, &[1, 1, 1]), -2.0);
        assert_eq!(ising_energy(&h, &j, &[1, -1, 1]), 0.0);
    }
}
