//! Monotonic Clock Sources
//!
//! The wheel emulator measures how long a direction key has been held in
//! nanoseconds. Time comes through [`Clock`] so tests can drive it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Monotonic nanosecond time source
pub trait Clock: Send + Sync {
    /// Nanoseconds since an arbitrary fixed origin
    fn now_ns(&self) -> u64;
}

/// Clock backed by the tokio time driver
///
/// Follows tokio's paused/advanced time in tests, so emulator ticks and
/// elapsed-time measurements stay consistent.
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    origin: tokio::time::Instant,
}

impl MonotonicClock {
    /// Create a clock whose origin is now
    pub fn new() -> Self {
        Self {
            origin: tokio::time::Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ns(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_nanos()).unwrap_or(u64::MAX)
    }
}

/// Manually driven clock
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    /// Create a clock at the given time
    pub fn new(start_ns: u64) -> Self {
        Self {
            now: AtomicU64::new(start_ns),
        }
    }

    /// Jump to an absolute time
    pub fn set(&self, now_ns: u64) {
        self.now.store(now_ns, Ordering::SeqCst);
    }

    /// Move time forward
    pub fn advance(&self, by: Duration) {
        let by = u64::try_from(by.as_nanos()).unwrap_or(u64::MAX);
        self.now.fetch_add(by, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ns(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}
