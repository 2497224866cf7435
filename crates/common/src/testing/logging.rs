//! Test logging setup
//!
//! Installs a `tracing` subscriber for integration tests so that
//! `RUST_LOG`-style filtering works while tests run. Safe to call from
//! every test; only the first call installs the subscriber.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Initialize tracing output for tests
///
/// Respects `RUST_LOG`; defaults to `info` when unset. Subsequent calls
/// are no-ops.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}
