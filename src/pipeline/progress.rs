use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// One consistent reading of a [`Progress`] counter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProgressSnapshot {
    /// Frames handed to the sink so far.
    pub processed: u64,
    /// Frames the run will process in total, `0` before the run starts.
    pub total: u64,
}

impl ProgressSnapshot {
    /// Completed fraction in `0.0..=1.0`; `0.0` while the total is unknown.
    pub fn fraction(self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.processed as f64 / self.total as f64).min(1.0)
        }
    }

    /// `true` once every frame has been processed.
    pub fn is_complete(self) -> bool {
        self.total > 0 && self.processed >= self.total
    }
}

/// Shared `(processed, total)` counter.
///
/// Clones share the same state, so a UI thread can poll a clone while the driver runs. Both
/// halves live in one atomic word (total in the high 32 bits), so readers never observe a
/// processed count paired with another run's total.
#[derive(Clone, Debug, Default)]
pub struct Progress {
    state: Arc<AtomicU64>,
}

impl Progress {
    /// A fresh counter at `0 / 0`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value.
    pub fn snapshot(&self) -> ProgressSnapshot {
        let word = self.state.load(Ordering::Acquire);
        ProgressSnapshot {
            processed: word & u64::from(u32::MAX),
            total: word >> 32,
        }
    }

    /// Shorthand for `snapshot().fraction()`.
    pub fn fraction(&self) -> f64 {
        self.snapshot().fraction()
    }

    pub(crate) fn start(&self, total: u32) {
        self.state.store(u64::from(total) << 32, Ordering::Release);
    }

    pub(crate) fn set_processed(&self, processed: u32) {
        let total = self.state.load(Ordering::Relaxed) >> 32;
        debug_assert!(u64::from(processed) <= total);
        self.state
            .store((total << 32) | u64::from(processed), Ordering::Release);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/progress.rs"]
mod tests;
