//! Clock - time source for holding-period checks
//!
//! The ledger never calls `Utc::now()` directly. Production wiring uses
//! [`SystemClock`]; tests and the demo command use [`ManualClock`] so the
//! 24-hour lock can be crossed without waiting.

use chrono::{DateTime, Duration, Utc};
use std::sync::{Mutex, MutexGuard};

/// Source of the current time.
///
/// Implementations must be monotonically non-decreasing.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

fn lock(m: &Mutex<DateTime<Utc>>) -> MutexGuard<'_, DateTime<Utc>> {
    // A poisoned guard still holds a valid timestamp
    m.lock().unwrap_or_else(|e| e.into_inner())
}

/// Wall clock, clamped so it never reports a time earlier than one it
/// already returned (NTP steps backwards are absorbed).
#[derive(Debug)]
pub struct SystemClock {
    last: Mutex<DateTime<Utc>>,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            last: Mutex::new(DateTime::<Utc>::MIN_UTC),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        let mut last = lock(&self.last);
        let now = Utc::now().max(*last);
        *last = now;
        now
    }
}

/// Manually driven clock for tests and simulations
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// Create a clock frozen at `start`
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Create a clock frozen at the Unix epoch
    pub fn at_epoch() -> Self {
        Self::new(DateTime::<Utc>::UNIX_EPOCH)
    }

    /// Move the clock forward by `by`
    pub fn advance(&self, by: Duration) {
        let mut now = lock(&self.now);
        *now += by;
    }

    /// Jump to an absolute time.
    ///
    /// Unlike [`advance`](Self::advance) this can move backwards, which lets
    /// tests check how callers cope with a misbehaving clock.
    pub fn set(&self, to: DateTime<Utc>) {
        *lock(&self.now) = to;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *lock(&self.now)
    }
}
