//! Recency-based forbiddance list.

/// Per-variable expiry iterations.
///
/// Variable `i` is tabu at iteration `t` while `t <= expires[i]`.
#[derive(Debug, Clone)]
pub struct TabuList {
    expires: Vec<u64>,
}

impl TabuList {
    pub fn new(len: usize) -> Self {
        Self {
            expires: vec![0; len],
        }
    }

    #[inline]
    pub fn is_tabu(&self, i: usize, iteration: u64) -> bool {
        iteration <= self.expires[i]
    }

    /// Forbids `i` for the `tenure` iterations after `iteration`.
    #[inline]
    pub fn forbid(&mut self, i: usize, iteration: u64, tenure: usize) {
        self.expires[i] = iteration + tenure as u64;
    }

    pub fn clear(&mut self) {
        self.expires.fill(0);
    }
}
