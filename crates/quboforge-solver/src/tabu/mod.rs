//! Tabu search over single-bit flips.
//!
//! Each iteration takes the best non-tabu flip. When no non-tabu flip
//! improves, a tabu flip may still be taken if it beats the best energy of
//! this search (aspiration). Flipped variables stay tabu for a tenure that is
//! jittered by one iteration either way from the seeded stream.

mod descent;
mod tabu_list;


pub use descent::{one_flip_descent, DescentOutcome};
pub use tabu_list::TabuList;

use quboforge_config::TabuConfig;
use quboforge_core::{tolerance, Direction, FlipDeltas, Qubo};
use rand::Rng;
use tracing::trace;

use crate::interrupt::Interrupt;

/// Iterations between interrupt checks.
const INTERRUPT_CHECK_INTERVAL: u64 = 256;

/// Default tenure for a problem of `n` variables.
///
/// Follows a size table, then clamps so small problems keep free moves.
pub fn default_tenure(n: usize) -> usize {
    let table = match n {
        0..=99 => 10,
        100..=249 => 12,
        250..=499 => 13,
        500..=999 => 21,
        1000..=2499 => 29,
        2500..=7999 => 34,
        _ => 35,
    };
    table.min((n / 4).max(1)).min(n.saturating_sub(1))
}

/// Search limits resolved for one problem size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabuParams {
    pub tenure: usize,
    pub stagnation_limit: u64,
    pub max_iterations: u64,
}

impl TabuParams {
    pub fn for_size(n: usize, config: &TabuConfig) -> Self {
        let n64 = n as u64;
        Self {
            tenure: config
                .tenure
                .unwrap_or_else(|| default_tenure(n))
                .min(n.saturating_sub(1)),
            stagnation_limit: config
                .stagnation_limit
                .unwrap_or_else(|| (10 * n64).max(100)),
            max_iterations: config
                .max_iterations
                .unwrap_or_else(|| (100 * n64).max(1000)),
        }
    }
}

/// Result of one tabu search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TabuOutcome {
    /// Energy of the returned state.
    pub energy: f64,
    pub iterations: u64,
    /// Whether the returned state beats the initial one.
    pub improved: bool,
}

/// Tabu search engine.
///
/// # Example
///
/// ```
/// use quboforge_core::{Direction, Qubo};
/// use quboforge_solver::{Interrupt, TabuSearch};
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
///
/// let qubo = Qubo::build(3, [(0, 0, -1.0), (1, 1, -1.0), (2, 2, -1.0), (0, 1, 3.0)]).unwrap();
/// let mut state = vec![false; 3];
/// let mut rng = ChaCha8Rng::seed_from_u64(7);
///
/// let outcome = TabuSearch::default().search(
///     &qubo,
///     &mut state,
///     Direction::Minimize,
///     &mut rng,
///     Interrupt::never(),
/// );
/// assert_eq!(outcome.energy, -2.0);
/// assert!(state[2]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TabuSearch {
    config: TabuConfig,
}

impl TabuSearch {
    pub fn new(config: TabuConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TabuConfig {
        &self.config
    }

    /// Searches from `state` and leaves the best state found in it.
    ///
    /// Never fails; the state is unchanged when nothing better is found.
    pub fn search<R: Rng + ?Sized>(
        &self,
        qubo: &Qubo,
        state: &mut [bool],
        direction: Direction,
        rng: &mut R,
        interrupt: Interrupt<'_>,
    ) -> TabuOutcome {
        let n = qubo.num_variables();
        let initial_energy = qubo.energy(state);
        if n == 0 {
            return TabuOutcome {
                energy: initial_energy,
                iterations: 0,
                improved: false,
            };
        }

        let params = TabuParams::for_size(n, &self.config);
        let mut deltas = FlipDeltas::new(qubo, state);
        let mut tabu = TabuList::new(n);
        let mut current = initial_energy;
        let mut best = initial_energy;
        let mut best_state = state.to_vec();
        let mut iteration = 0u64;
        let mut stagnant = 0u64;

        while iteration < params.max_iterations && stagnant < params.stagnation_limit {
            if iteration % INTERRUPT_CHECK_INTERVAL == 0 && interrupt.should_stop() {
                break;
            }
            iteration += 1;

            let k = select_move(&deltas, &tabu, iteration, current, best, direction);
            current += deltas.flip(qubo, state, k);
            tabu.forbid(k, iteration, jittered(params.tenure, n, rng));

            if direction.is_better(current, best) {
                best = current;
                best_state.copy_from_slice(state);
                stagnant = 0;
            } else {
                stagnant += 1;
            }
        }

        state.copy_from_slice(&best_state);
        // Re-evaluate once to shed accumulated rounding.
        let energy = qubo.energy(state);
        trace!(
            event = "tabu_end",
            variables = n,
            iterations = iteration,
            tenure = params.tenure,
            energy = energy,
        );
        TabuOutcome {
            energy,
            iterations: iteration,
            improved: direction.is_better(energy, initial_energy),
        }
    }
}

/// Picks the flip for one iteration.
///
/// Order of preference: the best improving non-tabu flip, then the best tabu
/// flip that beats `best`, then the best non-tabu flip, then the best flip.
fn select_move(
    deltas: &FlipDeltas,
    tabu: &TabuList,
    iteration: u64,
    current: f64,
    best: f64,
    direction: Direction,
) -> usize {
    let mut free: Option<(usize, f64)> = None;
    let mut forbidden: Option<(usize, f64)> = None;

    for (i, &delta) in deltas.as_slice().iter().enumerate() {
        let gain = direction.gain_of_delta(delta);
        let slot = if tabu.is_tabu(i, iteration) {
            &mut forbidden
        } else {
            &mut free
        };
        if slot.map_or(true, |(_, g)| gain > g) {
            *slot = Some((i, gain));
        }
    }

    match (free, forbidden) {
        (Some((i, gain)), _) if gain > tolerance(current) => i,
        (_, Some((i, _))) if direction.is_better(current + deltas.get(i), best) => i,
        (Some((i, _)), _) => i,
        (None, Some((i, _))) => i,
        // n > 0 guarantees at least one candidate
        (None, None) => 0,
    }
}

fn jittered<R: Rng + ?Sized>(tenure: usize, n: usize, rng: &mut R) -> usize {
    if tenure == 0 {
        return 0;
    }
    let t = tenure as i64 + rng.random_range(-1i64..=1);
    t.clamp(1, (n - 1).max(1) as i64) as usize
}
