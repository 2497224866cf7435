//! Analysis result caching with moka
//!
//! Short-TTL in-memory cache of full analysis results, keyed by
//! (user, calendar set, range, window parameters). moka's `try_get_with`
//! provides the single-flight contract: concurrent misses on one key
//! share a single computation, and every waiter sees its outcome.
//!
//! # Error Handling
//!
//! Only successful results are cached. A failed computation propagates
//! to every concurrent waiter and leaves no entry behind, so transient
//! calendar failures never get cached and hidden.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use recess_core::{AnalysisCache, AnalysisComputation, AnalysisKey};
use recess_domain::{AnalysisResult, GapError, Result};

/// Default TTL for cached analyses (5 minutes)
///
/// Override via `RECESS_GAP_CACHE_TTL_SECS`. Long enough to absorb
/// duplicate UI requests, short enough that calendar changes surface
/// promptly.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Default max capacity (1000 entries)
///
/// Override via `RECESS_GAP_CACHE_CAPACITY`.
pub const DEFAULT_CACHE_CAPACITY: u64 = 1000;

/// Analysis cache configuration
#[derive(Debug, Clone)]
pub struct AnalysisCacheConfig {
    /// Time-to-live for cache entries
    pub ttl: Duration,

    /// Maximum number of cached analyses
    pub max_capacity: u64,
}

impl Default for AnalysisCacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(
                std::env::var("RECESS_GAP_CACHE_TTL_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_CACHE_TTL_SECS),
            ),
            max_capacity: std::env::var("RECESS_GAP_CACHE_CAPACITY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_CACHE_CAPACITY),
        }
    }
}

impl AnalysisCacheConfig {
    /// Config with a custom TTL (useful for testing)
    pub fn with_ttl(ttl: Duration) -> Self {
        Self { ttl, max_capacity: DEFAULT_CACHE_CAPACITY }
    }

    /// Log configuration at startup
    pub fn log_config(&self) {
        tracing::info!(
            ttl_seconds = self.ttl.as_secs(),
            max_capacity = self.max_capacity,
            "analysis cache configuration loaded"
        );
    }
}

/// moka-backed implementation of `AnalysisCache`
pub struct MokaAnalysisCache {
    cache: Cache<AnalysisKey, Arc<AnalysisResult>>,
}

impl MokaAnalysisCache {
    /// Create a new analysis cache
    pub fn new(config: AnalysisCacheConfig) -> Self {
        config.log_config();
        let cache = Cache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .support_invalidation_closures()
            .build();
        Self { cache }
    }

    /// Number of live entries (approximate, for diagnostics).
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}

#[async_trait]
impl AnalysisCache for MokaAnalysisCache {
    async fn get_or_compute(
        &self,
        key: AnalysisKey,
        compute: AnalysisComputation,
    ) -> Result<Arc<AnalysisResult>> {
        self.cache
            .try_get_with(key, compute)
            .await
            .map_err(|err: Arc<GapError>| (*err).clone())
    }

    async fn invalidate_user(&self, user_id: &str) -> Result<()> {
        let user = user_id.to_string();
        self.cache
            .invalidate_entries_if(move |key, _| key.user_id == user)
            .map_err(|err| GapError::Storage(format!("cache invalidation: {err}")))?;
        Ok(())
    }
}
