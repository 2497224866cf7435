use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use recess_core::CalendarClient;
use recess_domain::{BusyInterval, EventDraft, GapError, Result as DomainResult};

type CreateHook = Box<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>;

/// In-memory mock for `CalendarClient`.
///
/// Serves a fixed set of busy intervals (filtered to the requested
/// range and calendars) and records created events. Call counters let
/// tests assert the single-flight and disabled-short-circuit contracts.
#[derive(Default)]
pub struct MockCalendarClient {
    busy: Mutex<Vec<BusyInterval>>,
    created: Mutex<Vec<(String, EventDraft)>>,
    list_calls: AtomicUsize,
    next_error: Mutex<Option<GapError>>,
    on_create: Mutex<Option<CreateHook>>,
}

impl MockCalendarClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed one busy interval.
    pub fn add_busy(&self, interval: BusyInterval) {
        self.busy.lock().expect("mutex poisoned").push(interval);
    }

    /// Builder-style seeding.
    pub fn with_busy(self, interval: BusyInterval) -> Self {
        self.add_busy(interval);
        self
    }

    /// Fail the next calendar call with `error`.
    pub fn fail_next(&self, error: GapError) {
        *self.next_error.lock().expect("mutex poisoned") = Some(error);
    }

    /// Run `hook` between event creation and its return, letting tests
    /// interleave a racing store mutation deterministically.
    pub fn on_create(&self, hook: CreateHook) {
        *self.on_create.lock().expect("mutex poisoned") = Some(hook);
    }

    pub fn list_call_count(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn created_events(&self) -> Vec<(String, EventDraft)> {
        self.created.lock().expect("mutex poisoned").clone()
    }
}

#[async_trait]
impl CalendarClient for MockCalendarClient {
    async fn list_busy(
        &self,
        _user_id: &str,
        calendar_ids: &[String],
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> DomainResult<Vec<BusyInterval>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.next_error.lock().expect("mutex poisoned").take() {
            return Err(error);
        }

        Ok(self
            .busy
            .lock()
            .expect("mutex poisoned")
            .iter()
            .filter(|b| calendar_ids.contains(&b.calendar_id) && b.intersects(from, to))
            .cloned()
            .collect())
    }

    async fn create_event(
        &self,
        _user_id: &str,
        calendar_id: &str,
        draft: &EventDraft,
    ) -> DomainResult<String> {
        if let Some(error) = self.next_error.lock().expect("mutex poisoned").take() {
            return Err(error);
        }

        let event_id = uuid::Uuid::new_v4().to_string();
        self.created
            .lock()
            .expect("mutex poisoned")
            .push((calendar_id.to_string(), draft.clone()));

        let hook = self.on_create.lock().expect("mutex poisoned").take();
        if let Some(hook) = hook {
            hook().await;
        }

        Ok(event_id)
    }
}
