//! Reusable assignment buffers.
//!
//! The arena holds the best-known assignment and one candidate buffer that
//! every sub-result of a round is spliced into. Buffers are allocated once
//! per run; loading a candidate copies in place and promoting swaps.

use std::fmt::Debug;

/// Best-known and candidate bit buffers of equal length.
///
/// # Example
///
/// ```
/// use quboforge_solver::StateArena;
///
/// let mut arena = StateArena::new(3);
/// arena.best_mut().copy_from_slice(&[true, false, false]);
///
/// let (best, candidate) = arena.load_candidate();
/// assert_eq!(best, &[true, false, false]);
/// candidate[2] = true;
///
/// arena.promote();
/// assert_eq!(arena.best(), &[true, false, true]);
/// ```
pub struct StateArena {
    best: Vec<bool>,
    candidate: Vec<bool>,
    len: usize,
}

impl StateArena {
    /// Creates an arena of all-zero buffers of `len` bits.
    pub fn new(len: usize) -> Self {
        Self {
            best: vec![false; len],
            candidate: vec![false; len],
            len,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn best(&self) -> &[bool] {
        &self.best
    }

    pub fn best_mut(&mut self) -> &mut [bool] {
        &mut self.best
    }

    pub fn candidate(&self) -> &[bool] {
        &self.candidate
    }

    /// Resets the candidate to the best state and returns both.
    pub fn load_candidate(&mut self) -> (&[bool], &mut [bool]) {
        self.candidate.copy_from_slice(&self.best);
        (&self.best, &mut self.candidate)
    }

    /// Makes the candidate the new best state.
    pub fn promote(&mut self) {
        std::mem::swap(&mut self.best, &mut self.candidate);
    }
}

impl Debug for StateArena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateArena").field("len", &self.len).finish()
    }
}
