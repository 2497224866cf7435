//! Deterministic clock for tests
//!
//! Allows time-sensitive logic (expiry, cache TTLs, audit stamps) to be
//! tested without relying on actual time passage.
//!
//! # Examples
//!
//! ```
//! # #[cfg(feature = "test-utils")]
//! # {
//! use chrono::{Duration, TimeZone, Utc};
//! use recess_common::testing::MockClock;
//! use recess_common::time::Clock;
//!
//! let clock = MockClock::at(Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap());
//! clock.advance(Duration::minutes(30));
//! assert_eq!(clock.now_utc().to_rfc3339(), "2024-01-01T12:30:00+00:00");
//! # }
//! ```

// Allow missing panics docs for test utilities - panicking on a poisoned
// mutex fails tests early, which is the desired behavior
#![allow(clippy::missing_panics_doc)]

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};

use crate::time::Clock;

/// Mock clock for deterministic testing
///
/// The clock reports a fixed instant until advanced or reset. Clones
/// share the same underlying instant, so a clock handed to a service
/// under test can still be advanced from the test body.
#[derive(Debug, Clone)]
pub struct MockClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl MockClock {
    /// Create a mock clock starting at the current real time
    pub fn new() -> Self {
        Self::at(Utc::now())
    }

    /// Create a mock clock pinned at a specific instant
    pub fn at(now: DateTime<Utc>) -> Self {
        Self { now: Arc::new(Mutex::new(now)) }
    }

    /// Advance the mock clock by a duration
    ///
    /// Simulates time passing without actually waiting.
    pub fn advance(&self, duration: Duration) {
        // Test utility: panic on poisoned mutex to fail tests early
        let mut now = self.now.lock().expect("mutex poisoned");
        *now += duration;
    }

    /// Move the mock clock to an absolute instant
    pub fn set_now(&self, instant: DateTime<Utc>) {
        // Test utility: panic on poisoned mutex to fail tests early
        let mut now = self.now.lock().expect("mutex poisoned");
        *now = instant;
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MockClock {
    fn now_utc(&self) -> DateTime<Utc> {
        // Test utility: panic on poisoned mutex to fail tests early
        *self.now.lock().expect("mutex poisoned")
    }
}
