//! Connectivity-bounded subset growth.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use quboforge_core::Qubo;

/// Grows one subset of at most `limit` unused variables.
///
/// The seed is the first unused variable in `order` at or after rank
/// `start` (wrapping). The subset then grows by the best-ranked unused
/// neighbor of the subset. Only when the subset's component is exhausted does
/// growth restart from the next unused ranked variable, so every component
/// of the result is connected. Chosen variables are marked in `used`.
/// Returns the subset sorted by ordinal.
pub(crate) fn grow_connected(
    qubo: &Qubo,
    order: &[usize],
    position: &[usize],
    used: &mut [bool],
    queued: &mut [bool],
    start: usize,
    limit: usize,
) -> Vec<usize> {
    let n = order.len();
    let mut subset = Vec::with_capacity(limit.min(n));
    let mut frontier: BinaryHeap<Reverse<usize>> = BinaryHeap::new();
    let mut scanned = 0usize;
    queued.fill(false);

    while subset.len() < limit {
        let mut next = None;
        while let Some(Reverse(rank)) = frontier.pop() {
            let v = order[rank];
            if !used[v] {
                next = Some(v);
                break;
            }
        }
        if next.is_none() {
            while scanned < n {
                let v = order[(start + scanned) % n];
                scanned += 1;
                if !used[v] {
                    next = Some(v);
                    break;
                }
            }
        }
        let Some(v) = next else {
            break;
        };

        used[v] = true;
        subset.push(v);
        for nb in qubo.neighbors(v) {
            if !used[nb.index] && !queued[nb.index] {
                queued[nb.index] = true;
                frontier.push(Reverse(position[nb.index]));
            }
        }
    }

    subset.sort_unstable();
    subset
}
