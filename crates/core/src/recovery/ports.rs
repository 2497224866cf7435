//! Port interfaces for gap recovery
//!
//! These traits define the boundaries between core business logic
//! and infrastructure implementations. The service receives them as
//! `Arc<dyn Trait>` constructor parameters so tests can substitute
//! in-memory fakes.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use recess_domain::{AnalysisResult, BusyInterval, EventDraft, Gap, RecoverySettings, Result};

/// Cache key for one analysis
///
/// Two requests share a cached result only when the user, the analyzed
/// calendar set, the instant range, and the window-parameter fingerprint
/// all match. The request `limit` is deliberately excluded: it is
/// applied after retrieval so requests differing only in limit coalesce.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AnalysisKey {
    pub user_id: String,
    /// Sorted, de-duplicated calendar set.
    pub calendar_ids: Vec<String>,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    /// Output of [`window_params_hash`](crate::analysis::window_params_hash).
    pub params_hash: String,
}

/// Boxed computation handed to the cache on a miss.
pub type AnalysisComputation = BoxFuture<'static, Result<Arc<AnalysisResult>>>;

/// Trait for the external calendar provider
///
/// Busy intervals arrive already expanded; token refresh and OAuth live
/// behind this boundary and never inside the engine.
/// `CalendarAuthExpired` propagates through untouched.
#[async_trait]
pub trait CalendarClient: Send + Sync {
    /// List busy intervals across `calendar_ids` within `[from, to]`.
    async fn list_busy(
        &self,
        user_id: &str,
        calendar_ids: &[String],
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<BusyInterval>>;

    /// Create an event on `calendar_id`, returning the provider's event id.
    async fn create_event(
        &self,
        user_id: &str,
        calendar_id: &str,
        draft: &EventDraft,
    ) -> Result<String>;
}

/// Trait for durable gap lifecycle storage
///
/// The sole mutator of gap state. Every transition is conditional on the
/// current state (compare-and-swap), never a blind overwrite; that is
/// the mechanism that prevents double-fill races.
#[async_trait]
pub trait GapStore: Send + Sync {
    /// Reconcile proposed candidates against stored lifecycle state.
    ///
    /// First expires every stored pending gap of the user whose `end`
    /// precedes `horizon`. Then, per candidate id: insert unknown ids as
    /// pending, refresh `last_seen_at` on ids still pending, and
    /// suppress ids in a terminal state. Returns the surviving pending
    /// gaps in the order received. Atomic with respect to concurrent
    /// transitions.
    async fn reconcile(
        &self,
        user_id: &str,
        horizon: DateTime<Utc>,
        candidates: Vec<Gap>,
    ) -> Result<Vec<Gap>>;

    /// Point lookup of one gap.
    async fn get(&self, user_id: &str, gap_id: &str) -> Result<Option<Gap>>;

    /// Transition `pending -> filled`, recording the created event id.
    ///
    /// A concurrent `fill`/`skip`/`dismiss` on the same id produces
    /// exactly one winner; the loser receives `GapAlreadyHandled`.
    async fn fill(&self, user_id: &str, gap_id: &str, event_id: &str) -> Result<Gap>;

    /// Transition `pending -> skipped`, recording the optional reason.
    async fn skip(&self, user_id: &str, gap_id: &str, reason: Option<String>) -> Result<Gap>;

    /// Bulk `pending -> dismissed`; returns the number affected.
    ///
    /// Atomic from the caller's point of view: an analyze that starts
    /// after this call returns cannot report any of them pending.
    async fn dismiss_all(&self, user_id: &str) -> Result<usize>;

    /// Per-user recovery settings, defaults when no row exists.
    async fn settings(&self, user_id: &str) -> Result<RecoverySettings>;

    /// Persist the full settings value for the user.
    async fn save_settings(&self, user_id: &str, settings: &RecoverySettings) -> Result<()>;

    /// Flip the per-user analysis master switch.
    async fn set_analysis_enabled(&self, user_id: &str, enabled: bool) -> Result<()>;
}

/// Trait for the short-TTL analysis result cache
#[async_trait]
pub trait AnalysisCache: Send + Sync {
    /// Return the cached result for `key`, or run `compute` to produce it.
    ///
    /// Single-flight: concurrent callers with the same key share exactly
    /// one execution of `compute`; every waiter receives the same result.
    /// Errors propagate to every waiter and are never cached.
    async fn get_or_compute(
        &self,
        key: AnalysisKey,
        compute: AnalysisComputation,
    ) -> Result<Arc<AnalysisResult>>;

    /// Drop every cached entry belonging to `user_id`.
    async fn invalidate_user(&self, user_id: &str) -> Result<()>;
}
