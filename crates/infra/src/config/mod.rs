//! Environment-driven engine configuration
//!
//! Reads the infra knobs from the environment with logged defaults, the
//! same env-first loading the rest of the platform uses. Nothing here is
//! required: every value has a production-safe default.

use std::time::Duration;

use crate::cache::AnalysisCacheConfig;

/// Default bound on one calendar round trip (10 seconds)
///
/// Override via `RECESS_CALENDAR_TIMEOUT_SECS`.
pub const DEFAULT_CALENDAR_TIMEOUT_SECS: u64 = 10;

/// Engine-wide infrastructure configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Analysis cache knobs (TTL, capacity).
    pub cache: AnalysisCacheConfig,

    /// Upper bound on calendar fetch/create calls.
    pub calendar_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

impl EngineConfig {
    /// Load configuration from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        let calendar_timeout = Duration::from_secs(
            std::env::var("RECESS_CALENDAR_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_CALENDAR_TIMEOUT_SECS),
        );

        let config = Self { cache: AnalysisCacheConfig::default(), calendar_timeout };
        tracing::info!(
            calendar_timeout_secs = config.calendar_timeout.as_secs(),
            "engine configuration loaded"
        );
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_production_safe() {
        // Read without env overrides in the test environment
        let config = EngineConfig::from_env();

        assert!(config.calendar_timeout >= Duration::from_secs(1));
        assert!(config.cache.ttl >= Duration::from_secs(1));
        assert!(config.cache.max_capacity > 0);
    }
}
