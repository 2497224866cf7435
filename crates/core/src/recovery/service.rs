//! Gap recovery service - core business logic

use std::future::Future;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Timelike, Utc};
use futures::FutureExt;
use recess_common::time::Clock;
use recess_domain::constants::{DEFAULT_CALENDAR_ID, DEFAULT_RESULT_LIMIT};
use recess_domain::{
    AnalysisResult, AnalysisWindow, AnalyzeRequest, EventDraft, FillGapRequest, Gap, GapError,
    GapState, RecoverySettings, RecoverySettingsUpdate, Result, SkipGapRequest,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::analysis::{compute_free_slots, gap_id, merge_busy_intervals, window_params_hash};
use super::ports::{AnalysisCache, AnalysisComputation, AnalysisKey, CalendarClient, GapStore};

/// Upper bound on one calendar round trip unless overridden.
const DEFAULT_CALENDAR_TIMEOUT: StdDuration = StdDuration::from_secs(10);

/// Outcome of a successful `fill`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillOutcome {
    /// Id of the event created on the calendar.
    pub event_id: String,
    /// The gap after its `pending -> filled` transition.
    pub gap: Gap,
}

/// Gap recovery service
///
/// Orchestrates the analysis algorithms and the injected collaborators
/// into the public operations. Cheap to share: all state lives behind
/// `Arc`s.
pub struct GapRecoveryService {
    calendar: Arc<dyn CalendarClient>,
    store: Arc<dyn GapStore>,
    cache: Arc<dyn AnalysisCache>,
    clock: Arc<dyn Clock>,
    calendar_timeout: StdDuration,
}

impl GapRecoveryService {
    /// Create a new gap recovery service
    pub fn new(
        calendar: Arc<dyn CalendarClient>,
        store: Arc<dyn GapStore>,
        cache: Arc<dyn AnalysisCache>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { calendar, store, cache, clock, calendar_timeout: DEFAULT_CALENDAR_TIMEOUT }
    }

    /// Override the bound on calendar round trips.
    pub fn with_calendar_timeout(mut self, timeout: StdDuration) -> Self {
        self.calendar_timeout = timeout;
        self
    }

    /// Analyze the user's calendars for recoverable gaps
    ///
    /// Disabled users get an empty result without any calendar, store,
    /// or cache traffic beyond the settings read. On a cache miss the
    /// expensive path (fetch, merge, compute, reconcile) runs once per
    /// key regardless of how many callers race (single-flight).
    pub async fn analyze(&self, user_id: &str, request: &AnalyzeRequest) -> Result<AnalysisResult> {
        request.validate()?;

        let settings = self.store.settings(user_id).await?;
        let limit = request.limit.unwrap_or(DEFAULT_RESULT_LIMIT);

        // Anchor the range to the minute so duplicate UI requests within
        // the cache TTL share a key
        let anchor = minute_floor(self.clock.now_utc());
        let (window, calendar_ids) = effective_window(&settings, request, anchor)?;
        window.validate()?;

        if !settings.enabled {
            debug!(user_id = %user_id, "gap analysis disabled, returning empty result");
            return Ok(AnalysisResult::empty(window, self.clock.now_utc()));
        }

        let key = AnalysisKey {
            user_id: user_id.to_string(),
            calendar_ids: calendar_ids.clone(),
            from: window.from,
            to: window.to,
            params_hash: window_params_hash(&window),
        };

        let compute = self.analysis_computation(user_id.to_string(), calendar_ids, window);
        let result = self.cache.get_or_compute(key, compute).await?;
        Ok(result.with_limit(limit))
    }

    /// Fill a pending gap by creating a calendar event in it
    ///
    /// Re-checks freshness against the live calendar before creating
    /// anything: if a meeting appeared in the slot since the last
    /// analysis, the caller gets `GapStale` instead of a double-booking.
    /// If the event is created but the state transition loses a race,
    /// `GapFillConflict` carries the created event id for compensation.
    pub async fn fill(&self, user_id: &str, request: &FillGapRequest) -> Result<FillOutcome> {
        request.validate()?;

        let gap = self
            .store
            .get(user_id, &request.gap_id)
            .await?
            .ok_or_else(|| GapError::GapNotFound { id: request.gap_id.clone() })?;
        if gap.state.is_terminal() {
            return Err(GapError::GapAlreadyHandled { id: gap.id, state: gap.state });
        }
        if !gap.contains_range(request.start, request.end) {
            return Err(GapError::invalid_window(format!(
                "requested range {}..{} lies outside gap {}..{}",
                request.start, request.end, gap.start, gap.end
            )));
        }

        // Freshness: the slot must still be free on every analyzed calendar
        let busy = bounded(
            self.calendar_timeout,
            "list_busy",
            self.calendar.list_busy(user_id, &gap.calendar_ids, request.start, request.end),
        )
        .await?;
        if let Some(conflict) =
            busy.iter().find(|b| b.is_valid() && b.intersects(request.start, request.end))
        {
            warn!(
                user_id = %user_id,
                gap_id = %gap.id,
                calendar_id = %conflict.calendar_id,
                "slot no longer free, refusing to fill"
            );
            return Err(GapError::GapStale { id: gap.id, conflict: conflict.clone() });
        }

        let calendar_id =
            request.calendar_id.clone().unwrap_or_else(|| DEFAULT_CALENDAR_ID.to_string());
        let draft = EventDraft {
            summary: request.summary.trim().to_string(),
            description: request.description.clone(),
            location: request.location.clone(),
            start: request.start,
            end: request.end,
        };
        let event_id = bounded(
            self.calendar_timeout,
            "create_event",
            self.calendar.create_event(user_id, &calendar_id, &draft),
        )
        .await?;

        let filled = match self.store.fill(user_id, &gap.id, &event_id).await {
            Ok(gap) => gap,
            Err(GapError::GapAlreadyHandled { id, .. }) => {
                // The event now exists but the gap was handled
                // concurrently; surface the orphan for undo/cleanup
                return Err(GapError::GapFillConflict { id, event_id });
            }
            Err(err) => return Err(err),
        };

        self.invalidate_cache_best_effort(user_id).await;
        info!(user_id = %user_id, gap_id = %filled.id, event_id = %event_id, "gap filled");
        Ok(FillOutcome { event_id, gap: filled })
    }

    /// Skip a pending gap; no calendar side effect.
    pub async fn skip(&self, user_id: &str, request: &SkipGapRequest) -> Result<Gap> {
        request.validate()?;

        let skipped =
            self.store.skip(user_id, &request.gap_id, request.reason.clone()).await?;
        self.invalidate_cache_best_effort(user_id).await;
        info!(user_id = %user_id, gap_id = %skipped.id, "gap skipped");
        Ok(skipped)
    }

    /// Dismiss every pending gap of the user; returns the count affected.
    pub async fn dismiss_all(&self, user_id: &str) -> Result<usize> {
        let dismissed = self.store.dismiss_all(user_id).await?;
        self.invalidate_cache_best_effort(user_id).await;
        info!(user_id = %user_id, count = dismissed, "pending gaps dismissed");
        Ok(dismissed)
    }

    /// Turn gap analysis off for the user.
    pub async fn disable(&self, user_id: &str) -> Result<()> {
        self.store.set_analysis_enabled(user_id, false).await?;
        self.invalidate_cache_best_effort(user_id).await;
        info!(user_id = %user_id, "gap analysis disabled");
        Ok(())
    }

    /// Turn gap analysis back on for the user.
    pub async fn enable(&self, user_id: &str) -> Result<()> {
        self.store.set_analysis_enabled(user_id, true).await?;
        info!(user_id = %user_id, "gap analysis enabled");
        Ok(())
    }

    /// Effective recovery settings for the user.
    pub async fn settings(&self, user_id: &str) -> Result<RecoverySettings> {
        self.store.settings(user_id).await
    }

    /// Apply a partial settings patch; returns the merged settings.
    pub async fn update_settings(
        &self,
        user_id: &str,
        update: &RecoverySettingsUpdate,
    ) -> Result<RecoverySettings> {
        let current = self.store.settings(user_id).await?;
        let merged = update.apply(&current)?;
        self.store.save_settings(user_id, &merged).await?;
        self.invalidate_cache_best_effort(user_id).await;
        Ok(merged)
    }

    /// Drop the user's cached analyses
    ///
    /// A capability for callers that know the user's calendar just
    /// changed; the engine never triggers it on its own.
    pub async fn invalidate_cache(&self, user_id: &str) -> Result<()> {
        self.cache.invalidate_user(user_id).await
    }

    /// The single-flight computation run on a cache miss.
    fn analysis_computation(
        &self,
        user_id: String,
        calendar_ids: Vec<String>,
        window: AnalysisWindow,
    ) -> AnalysisComputation {
        let calendar = Arc::clone(&self.calendar);
        let store = Arc::clone(&self.store);
        let clock = Arc::clone(&self.clock);
        let timeout = self.calendar_timeout;

        async move {
            let busy = bounded(
                timeout,
                "list_busy",
                calendar.list_busy(&user_id, &calendar_ids, window.from, window.to),
            )
            .await?;

            let merged = merge_busy_intervals(busy);
            let slots = compute_free_slots(&merged, &window);

            let now = clock.now_utc();
            let candidates: Vec<Gap> = slots
                .into_iter()
                .map(|(start, end)| Gap {
                    id: gap_id(&user_id, &calendar_ids, start, end),
                    user_id: user_id.clone(),
                    start,
                    end,
                    calendar_ids: calendar_ids.clone(),
                    state: GapState::Pending,
                    created_at: now,
                    last_seen_at: now,
                    resolved_at: None,
                    filled_event_id: None,
                    skip_reason: None,
                })
                .collect();
            debug!(user_id = %user_id, candidates = candidates.len(), "proposing candidate gaps");

            let gaps = store.reconcile(&user_id, window.from, candidates).await?;
            let total_count = gaps.len();
            Ok(Arc::new(AnalysisResult {
                gaps,
                analyzed_range: window,
                total_count,
                computed_at: clock.now_utc(),
            }))
        }
        .boxed()
    }

    async fn invalidate_cache_best_effort(&self, user_id: &str) {
        if let Err(err) = self.cache.invalidate_user(user_id).await {
            warn!(user_id = %user_id, error = %err, "cache invalidation failed");
        }
    }
}

/// Bound an external call so a slow provider never hangs the caller.
async fn bounded<T>(
    limit: StdDuration,
    operation: &str,
    fut: impl Future<Output = Result<T>>,
) -> Result<T> {
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(GapError::calendar_unavailable(
            operation,
            format!("timed out after {}s", limit.as_secs()),
        )),
    }
}

/// Truncate an instant to the start of its minute.
fn minute_floor(instant: DateTime<Utc>) -> DateTime<Utc> {
    instant.with_second(0).and_then(|t| t.with_nanosecond(0)).unwrap_or(instant)
}

/// Resolve the effective window: request override, then stored setting,
/// then built-in default. Also normalizes the analyzed calendar set.
fn effective_window(
    settings: &RecoverySettings,
    request: &AnalyzeRequest,
    anchor: DateTime<Utc>,
) -> Result<(AnalysisWindow, Vec<String>)> {
    let mut calendar_ids = if request.calendar_ids.is_empty() {
        vec![DEFAULT_CALENDAR_ID.to_string()]
    } else {
        request.calendar_ids.clone()
    };
    calendar_ids.sort();
    calendar_ids.dedup();

    let timezone = match &request.timezone {
        Some(tz) => tz
            .parse()
            .map_err(|_| GapError::invalid_window(format!("unknown timezone '{tz}'")))?,
        None => settings.timezone.parse().unwrap_or_else(|_| {
            warn!(zone = %settings.timezone, "stored timezone invalid, falling back to UTC");
            chrono_tz::UTC
        }),
    };

    let lookback = request.lookback_days.unwrap_or(settings.lookback_days);
    let window = AnalysisWindow {
        from: anchor - Duration::days(i64::from(lookback)),
        to: anchor,
        timezone,
        working_hours_start: request.working_hours_start.unwrap_or(settings.working_hours_start),
        working_hours_end: request.working_hours_end.unwrap_or(settings.working_hours_end),
        min_gap_minutes: request.min_gap_minutes.unwrap_or(settings.min_gap_minutes),
        buffer_minutes: request.buffer_minutes.unwrap_or(settings.buffer_minutes),
        max_gap_minutes: request.max_gap_minutes.or(settings.max_gap_minutes),
        ignored_weekdays: request
            .ignored_weekdays
            .clone()
            .unwrap_or_else(|| settings.ignored_weekdays.clone()),
    };
    Ok((window, calendar_ids))
}
