//! Loading flags with guaranteed reset
//!
//! A [`PendingFlag`] is raised by [`PendingFlag::begin`] and lowered when the
//! returned [`PendingGuard`] drops, so every exit path of an operation
//! (success, error, early `?` return) clears it.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Counts in-flight operations; pending while the count is non-zero
#[derive(Debug, Clone, Default)]
pub struct PendingFlag {
    in_flight: Arc<AtomicUsize>,
}

impl PendingFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Mark an operation as started
    #[must_use = "the flag is lowered as soon as the guard is dropped"]
    pub fn begin(&self) -> PendingGuard {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        PendingGuard {
            in_flight: Arc::clone(&self.in_flight),
        }
    }
}

/// Lowers its [`PendingFlag`] on drop
#[derive(Debug)]
pub struct PendingGuard {
    in_flight: Arc<AtomicUsize>,
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}
