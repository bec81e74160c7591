//! Session-scoped streak counter.

use std::sync::atomic::{AtomicU64, Ordering};

/// Count of successful resolutions in the current session.
///
/// The counter lives as long as the session that owns it and starts at zero.
/// There is no decrement or reset: a new session gets a new counter. It is
/// deliberately independent of the history ledger, so clearing history leaves
/// the streak untouched.
#[derive(Debug, Default)]
pub struct SessionStreakCounter {
    value: AtomicU64,
}

impl SessionStreakCounter {
    /// Create a counter starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current streak.
    pub fn get(&self) -> u64 {
        self.value.load(Ordering::SeqCst)
    }

    /// Add one and return the new value.
    pub fn increment(&self) -> u64 {
        self.value.fetch_add(1, Ordering::SeqCst) + 1
    }
}
