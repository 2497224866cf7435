use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use recess_common::time::Clock;
use recess_core::GapStore;
use recess_domain::{Gap, GapError, GapState, RecoverySettings, Result as DomainResult};

#[derive(Default)]
struct StoreInner {
    /// user_id -> gap_id -> record
    gaps: HashMap<String, HashMap<String, Gap>>,
    settings: HashMap<String, RecoverySettings>,
}

/// In-memory mock for `GapStore`.
///
/// One mutex guards all state, which makes every method atomic with
/// respect to the others: the same compare-and-swap semantics the
/// SQLite adapter gets from conditional updates.
pub struct InMemoryGapStore {
    clock: Arc<dyn Clock>,
    inner: Mutex<StoreInner>,
}

impl InMemoryGapStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock, inner: Mutex::new(StoreInner::default()) }
    }

    /// Count of stored gaps in `state` for the user.
    pub fn count_in_state(&self, user_id: &str, state: GapState) -> usize {
        self.inner
            .lock()
            .expect("mutex poisoned")
            .gaps
            .get(user_id)
            .map_or(0, |gaps| gaps.values().filter(|g| g.state == state).count())
    }

    fn transition(
        &self,
        user_id: &str,
        gap_id: &str,
        next: GapState,
        event_id: Option<&str>,
        reason: Option<String>,
    ) -> DomainResult<Gap> {
        let mut inner = self.inner.lock().expect("mutex poisoned");
        let now = self.clock.now_utc();

        let gap = inner
            .gaps
            .get_mut(user_id)
            .and_then(|gaps| gaps.get_mut(gap_id))
            .ok_or_else(|| GapError::GapNotFound { id: gap_id.to_string() })?;

        if gap.state != GapState::Pending {
            return Err(GapError::GapAlreadyHandled { id: gap.id.clone(), state: gap.state });
        }

        gap.state = next;
        gap.resolved_at = Some(now);
        gap.filled_event_id = event_id.map(str::to_string);
        gap.skip_reason = reason;
        Ok(gap.clone())
    }
}

#[async_trait]
impl GapStore for InMemoryGapStore {
    async fn reconcile(
        &self,
        user_id: &str,
        horizon: DateTime<Utc>,
        candidates: Vec<Gap>,
    ) -> DomainResult<Vec<Gap>> {
        let mut inner = self.inner.lock().expect("mutex poisoned");
        let now = self.clock.now_utc();
        let user_gaps = inner.gaps.entry(user_id.to_string()).or_default();

        for gap in user_gaps.values_mut() {
            if gap.state == GapState::Pending && gap.end < horizon {
                gap.state = GapState::Expired;
                gap.resolved_at = Some(now);
            }
        }

        let mut surviving = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            match user_gaps.get_mut(&candidate.id) {
                None => {
                    user_gaps.insert(candidate.id.clone(), candidate.clone());
                    surviving.push(candidate);
                }
                Some(stored) if stored.state == GapState::Pending => {
                    stored.last_seen_at = now;
                    surviving.push(stored.clone());
                }
                Some(_) => {} // terminal: suppressed
            }
        }
        Ok(surviving)
    }

    async fn get(&self, user_id: &str, gap_id: &str) -> DomainResult<Option<Gap>> {
        Ok(self
            .inner
            .lock()
            .expect("mutex poisoned")
            .gaps
            .get(user_id)
            .and_then(|gaps| gaps.get(gap_id))
            .cloned())
    }

    async fn fill(&self, user_id: &str, gap_id: &str, event_id: &str) -> DomainResult<Gap> {
        self.transition(user_id, gap_id, GapState::Filled, Some(event_id), None)
    }

    async fn skip(
        &self,
        user_id: &str,
        gap_id: &str,
        reason: Option<String>,
    ) -> DomainResult<Gap> {
        self.transition(user_id, gap_id, GapState::Skipped, None, reason)
    }

    async fn dismiss_all(&self, user_id: &str) -> DomainResult<usize> {
        let mut inner = self.inner.lock().expect("mutex poisoned");
        let now = self.clock.now_utc();

        let mut dismissed = 0;
        if let Some(gaps) = inner.gaps.get_mut(user_id) {
            for gap in gaps.values_mut() {
                if gap.state == GapState::Pending {
                    gap.state = GapState::Dismissed;
                    gap.resolved_at = Some(now);
                    dismissed += 1;
                }
            }
        }
        Ok(dismissed)
    }

    async fn settings(&self, user_id: &str) -> DomainResult<RecoverySettings> {
        Ok(self
            .inner
            .lock()
            .expect("mutex poisoned")
            .settings
            .get(user_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn save_settings(
        &self,
        user_id: &str,
        settings: &RecoverySettings,
    ) -> DomainResult<()> {
        self.inner
            .lock()
            .expect("mutex poisoned")
            .settings
            .insert(user_id.to_string(), settings.clone());
        Ok(())
    }

    async fn set_analysis_enabled(&self, user_id: &str, enabled: bool) -> DomainResult<()> {
        let mut inner = self.inner.lock().expect("mutex poisoned");
        let settings = inner.settings.entry(user_id.to_string()).or_default();
        settings.enabled = enabled;
        Ok(())
    }
}
