//! Live-time refresh
//!
//! Holds the "now" the dial highlights. Polled from the update loop; it only
//! advances once the refresh interval has passed, independent of any drag.

use chrono::{DateTime, Duration, Utc};

pub const DEFAULT_REFRESH_SECS: i64 = 60;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiveClock {
    interval: Duration,
    now: DateTime<Utc>,
}

impl LiveClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self::with_interval(now, Duration::seconds(DEFAULT_REFRESH_SECS))
    }

    /// Intervals shorter than a second are raised to one second
    pub fn with_interval(now: DateTime<Utc>, interval: Duration) -> Self {
        Self {
            interval: interval.max(Duration::seconds(1)),
            now,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Advance to `instant` if the interval has elapsed. Returns whether it did.
    ///
    /// A clock that jumped backwards is followed immediately.
    pub fn poll(&mut self, instant: DateTime<Utc>) -> bool {
        let elapsed = instant - self.now;
        if elapsed >= self.interval || elapsed < Duration::zero() {
            self.now = instant;
            true
        } else {
            false
        }
    }
}
