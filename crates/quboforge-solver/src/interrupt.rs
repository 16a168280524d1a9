//! Cooperative stop signal for long-running searches.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

/// Deadline and cancellation flag checked between search iterations.
#[derive(Debug, Clone, Copy, Default)]
pub struct Interrupt<'a> {
    deadline: Option<Instant>,
    cancel: Option<&'a AtomicBool>,
}

impl<'a> Interrupt<'a> {
    pub fn new(deadline: Option<Instant>, cancel: Option<&'a AtomicBool>) -> Self {
        Self { deadline, cancel }
    }

    /// An interrupt that never fires.
    pub fn never() -> Self {
        Self::default()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_expired(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_some_and(|flag| flag.load(Ordering::SeqCst))
    }

    pub fn should_stop(&self) -> bool {
        self.is_cancelled() || self.is_expired()
    }
}
