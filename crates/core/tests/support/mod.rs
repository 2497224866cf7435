//! Shared in-memory doubles for service-level tests.
#![allow(dead_code)]

pub mod cache;
pub mod calendar;
pub mod store;

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use recess_common::testing::{init_test_logging, MockClock};
use recess_common::time::Clock;
use recess_core::GapRecoveryService;

pub use cache::InMemoryAnalysisCache;
pub use calendar::MockCalendarClient;
pub use store::InMemoryGapStore;

/// A fully wired service plus handles to its collaborators.
pub struct TestEngine {
    pub service: GapRecoveryService,
    pub calendar: Arc<MockCalendarClient>,
    pub store: Arc<InMemoryGapStore>,
    pub cache: Arc<InMemoryAnalysisCache>,
    pub clock: MockClock,
}

/// Wire a service around in-memory doubles, pinned at `now`.
pub fn engine_at(now: DateTime<Utc>) -> TestEngine {
    init_test_logging();

    let clock = MockClock::at(now);
    let calendar = Arc::new(MockCalendarClient::new());
    let store = Arc::new(InMemoryGapStore::new(Arc::new(clock.clone())));
    let cache = Arc::new(InMemoryAnalysisCache::new());

    let service = GapRecoveryService::new(
        Arc::clone(&calendar) as Arc<dyn recess_core::CalendarClient>,
        Arc::clone(&store) as Arc<dyn recess_core::GapStore>,
        Arc::clone(&cache) as Arc<dyn recess_core::AnalysisCache>,
        Arc::new(clock.clone()) as Arc<dyn Clock>,
    );

    TestEngine { service, calendar, store, cache, clock }
}

/// Default engine pinned at midnight UTC, 2024-01-02 (a Tuesday), so a
/// one-day lookback covers all of Monday 2024-01-01.
pub fn engine() -> TestEngine {
    engine_at(Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).single().expect("valid instant"))
}

/// Instant helper for the 2024-01-01 test day.
pub fn jan1(h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, h, m, 0).single().expect("valid instant")
}
