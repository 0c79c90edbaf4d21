//! Time source for `write_ts` and `read_ts` stamps.

use parking_lot::Mutex;
use std::time::SystemTime;

/// A source of wall-clock time in seconds since the Unix epoch.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> f64;
}

/// The system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs_f64()
    }
}

/// A manually driven clock for tests.
///
/// # Example
///
/// ```rust
/// use usercache_core::{Clock, ManualClock};
///
/// let clock = ManualClock::new(10.0);
/// clock.advance(5.0);
/// assert_eq!(clock.now(), 15.0);
/// ```
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Mutex<f64>,
}

impl ManualClock {
    /// Creates a clock frozen at `now`.
    #[must_use]
    pub fn new(now: f64) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Sets the current time.
    pub fn set(&self, now: f64) {
        *self.now.lock() = now;
    }

    /// Moves the clock forward by `secs`.
    pub fn advance(&self, secs: f64) {
        *self.now.lock() += secs;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        *self.now.lock()
    }
}
