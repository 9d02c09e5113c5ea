use std::time::{Duration, Instant};

use crate::foundation::core::ViewportMetrics;

/// Trailing-edge debounce for viewport resize signals.
///
/// Every signal restarts the quiet period; only the last metrics of a burst are released, once
/// the quiet period has elapsed. Time is passed in by the caller.
#[derive(Clone, Debug)]
pub struct ResizeCoalescer {
    quiet: Duration,
    pending: Option<PendingResize>,
    coalesced_count: u64,
}

#[derive(Clone, Copy, Debug)]
struct PendingResize {
    metrics: ViewportMetrics,
    deadline: Instant,
}

impl ResizeCoalescer {
    /// Coalescer releasing a burst after `quiet` without new signals.
    pub const fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
            coalesced_count: 0,
        }
    }

    /// Configured quiet period.
    pub const fn quiet_period(&self) -> Duration {
        self.quiet
    }

    /// Record a resize at `now`, replacing any metrics still waiting.
    pub fn signal(&mut self, metrics: ViewportMetrics, now: Instant) {
        if self.pending.is_some() {
            self.coalesced_count = self.coalesced_count.saturating_add(1);
        }
        self.pending = Some(PendingResize {
            metrics,
            deadline: now + self.quiet,
        });
    }

    /// When the pending resize becomes due, if one is waiting.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.map(|p| p.deadline)
    }

    /// Take the pending metrics if the quiet period has elapsed at `now`.
    pub fn take_due(&mut self, now: Instant) -> Option<ViewportMetrics> {
        match self.pending {
            Some(p) if now >= p.deadline => {
                self.pending = None;
                Some(p.metrics)
            }
            _ => None,
        }
    }

    /// Take the pending metrics now, due or not.
    pub fn take_pending(&mut self) -> Option<ViewportMetrics> {
        self.pending.take().map(|p| p.metrics)
    }

    /// Drop any pending resize.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Signals that were superseded by a later one before becoming due.
    pub const fn coalesced(&self) -> u64 {
        self.coalesced_count
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/coalesce.rs"]
mod tests;
