//! Free-slot computation over a working-hours window
//!
//! Subtracts a merged busy timeline from the per-day working hours of an
//! analysis window. The walk is day by day in the window's timezone, so
//! a run of free time spanning midnight is split per day and a slot
//! never crosses into non-working hours.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use recess_domain::AnalysisWindow;
use tracing::warn;

/// Compute the free slots of `window` given a merged busy timeline
///
/// `busy` must be sorted and non-overlapping (the output of
/// [`merge_busy_intervals`](crate::analysis::merge_busy_intervals)).
/// Each slot is shrunk by the window's buffer on both ends and then
/// filtered by the min/max duration thresholds. Slots are emitted in
/// ascending start order; that ordering is part of the contract.
pub fn compute_free_slots(
    busy: &[(DateTime<Utc>, DateTime<Utc>)],
    window: &AnalysisWindow,
) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
    let tz = window.timezone;
    let buffer = Duration::minutes(i64::from(window.buffer_minutes));
    let min_len = Duration::minutes(i64::from(window.min_gap_minutes));
    let max_len = window.max_gap_minutes.map(|m| Duration::minutes(i64::from(m)));

    let first_day = window.from.with_timezone(&tz).date_naive();
    let last_day = window.to.with_timezone(&tz).date_naive();

    let mut slots = Vec::new();
    let mut day = first_day;
    while day <= last_day {
        if !window.ignored_weekdays.contains(&day.weekday()) {
            let day_start = resolve_local(tz, day, window.working_hours_start).max(window.from);
            let day_end = resolve_local(tz, day, window.working_hours_end).min(window.to);
            if day_start < day_end {
                collect_day_slots(busy, day_start, day_end, buffer, min_len, max_len, &mut slots);
            }
        }
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }
    slots
}

/// Complement of the busy timeline within one day's working hours.
fn collect_day_slots(
    busy: &[(DateTime<Utc>, DateTime<Utc>)],
    day_start: DateTime<Utc>,
    day_end: DateTime<Utc>,
    buffer: Duration,
    min_len: Duration,
    max_len: Option<Duration>,
    out: &mut Vec<(DateTime<Utc>, DateTime<Utc>)>,
) {
    let mut cursor = day_start;
    for &(start, end) in busy {
        if end <= day_start {
            continue;
        }
        if start >= day_end {
            break;
        }
        if start > cursor {
            push_slot(cursor, start, buffer, min_len, max_len, out);
        }
        if end > cursor {
            cursor = end;
        }
    }
    if day_end > cursor {
        push_slot(cursor, day_end, buffer, min_len, max_len, out);
    }
}

/// Apply buffer shrink and duration filters before emitting a slot.
fn push_slot(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    buffer: Duration,
    min_len: Duration,
    max_len: Option<Duration>,
    out: &mut Vec<(DateTime<Utc>, DateTime<Utc>)>,
) {
    let start = start + buffer;
    let end = end - buffer;
    if start >= end {
        return;
    }
    let len = end - start;
    if len < min_len {
        return;
    }
    if let Some(max) = max_len {
        if len > max {
            return;
        }
    }
    out.push((start, end));
}

/// Resolve a local date + time to a UTC instant, handling DST edges
///
/// Ambiguous local times (fall-back hour) resolve to the earliest valid
/// instant. Nonexistent local times (spring-forward gap) resolve to the
/// latest, i.e. the post-transition instant. As a last resort the naive
/// time is interpreted as UTC.
fn resolve_local(tz: Tz, date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
    let naive = NaiveDateTime::new(date, time);

    if let Some(dt) = tz.from_local_datetime(&naive).single() {
        return dt.with_timezone(&Utc);
    }
    if let Some(dt) = tz.from_local_datetime(&naive).earliest() {
        return dt.with_timezone(&Utc);
    }
    if let Some(dt) = tz.from_local_datetime(&naive).latest() {
        warn!(%date, %time, zone = %tz, "DST gap: using post-transition instant");
        return dt.with_timezone(&Utc);
    }

    warn!(%date, %time, zone = %tz, "unresolvable local time, interpreting as UTC");
    Utc.from_utc_datetime(&naive)
}
