//! Wall-clock abstraction for testability
//!
//! Provides a trait-based approach to reading the current time so that
//! time-sensitive logic can run against a deterministic clock in tests
//! instead of the real system clock.
//!
//! # Examples
//!
//! ```
//! # #[cfg(feature = "foundation")]
//! # {
//! use recess_common::time::{Clock, SystemClock};
//!
//! let clock = SystemClock;
//! let now = clock.now_utc();
//! assert!(now.timestamp() > 0);
//! # }
//! ```

use chrono::{DateTime, Utc};

/// Trait for reading the current wall-clock time
///
/// Code that stamps records or decides expiry should take a `Clock`
/// rather than calling `Utc::now()` directly, so tests can substitute
/// a mock and control time explicitly.
pub trait Clock: Send + Sync {
    /// Current wall-clock time as a UTC instant.
    fn now_utc(&self) -> DateTime<Utc>;

    /// Seconds since the UNIX epoch
    ///
    /// Convenience for storage layers that persist unix-second
    /// timestamps.
    fn timestamp(&self) -> i64 {
        self.now_utc().timestamp()
    }
}

/// Real system clock implementation
///
/// Uses the actual system clock. Use this in production code.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
