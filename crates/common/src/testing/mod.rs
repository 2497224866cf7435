//! Test utilities
//!
//! Deterministic clocks and logging setup for tests across the
//! workspace. Gated behind the `test-utils` feature.

pub mod clock;
#[cfg(feature = "test-utils")]
pub mod logging;

pub use clock::MockClock;
#[cfg(feature = "test-utils")]
pub use logging::init_test_logging;
