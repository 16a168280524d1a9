//! Greedy one-flip descent.

use quboforge_core::{tolerance, Direction, FlipDeltas, Qubo};

/// Outcome of [`one_flip_descent`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DescentOutcome {
    /// Total energy change applied to the state.
    pub delta: f64,
    pub flips: u64,
}

/// Repeatedly applies the best improving single flip until none is left.
///
/// Ties between equal gains go to the lowest ordinal. The result is a local
/// optimum under single flips.
pub fn one_flip_descent(qubo: &Qubo, state: &mut [bool], direction: Direction) -> DescentOutcome {
    let n = qubo.num_variables();
    let mut deltas = FlipDeltas::new(qubo, state);
    let mut energy = qubo.energy(state);
    let mut outcome = DescentOutcome {
        delta: 0.0,
        flips: 0,
    };

    loop {
        let mut best: Option<(usize, f64)> = None;
        for i in 0..n {
            let gain = direction.gain_of_delta(deltas.get(i));
            if best.map_or(true, |(_, g)| gain > g) {
                best = Some((i, gain));
            }
        }
        match best {
            Some((k, gain)) if gain > tolerance(energy) => {
                let applied = deltas.flip(qubo, state, k);
                energy += applied;
                outcome.delta += applied;
                outcome.flips += 1;
            }
            _ => return outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descends_to_local_optimum() {
        let qubo = Qubo::build(3, [(0, 0, -1.0), (1, 1, -1.0), (2, 2, 1.0), (0, 1, 0.5)]).unwrap();
        let mut state = vec![false, false, true];
        let outcome = one_flip_descent(&qubo, &mut state, Direction::Minimize);

        assert_eq!(state, vec![true, true, false]);
        assert_eq!(outcome.flips, 3);
        assert!((outcome.delta - (-1.5 - 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_lowest_ordinal_wins_ties() {
        // flipping either variable gains 1, but not both
        let qubo = Qubo::build(2, [(0, 0, -1.0), (1, 1, -1.0), (0, 1, 5.0)]).unwrap();
        let mut state = vec![false, false];
        one_flip_descent(&qubo, &mut state, Direction::Minimize);
        assert_eq!(state, vec![true, false]);
    }

    #[test]
    fn test_maximize() {
        let qubo = Qubo::build(2, [(0, 0, -1.0), (1, 1, 2.0)]).unwrap();
        let mut state = vec![true, false];
        let outcome = one_flip_descent(&qubo, &mut state, Direction::Maximize);
        assert_eq!(state, vec![false, true]);
        assert!((outcome.delta - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_local_optimum_untouched() {
        let qubo = Qubo::build(2, [(0, 0, 1.0), (1, 1, 1.0)]).unwrap();
        let mut state = vec![false, false];
        let outcome = one_flip_descent(&qubo, &mut state, Direction::Minimize);
        assert_eq!(outcome.flips, 0);
        assert_eq!(state, vec![false, false]);
    }
}
