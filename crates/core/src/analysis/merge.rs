//! Busy-interval merging

use chrono::{DateTime, Utc};
use recess_domain::BusyInterval;
use tracing::warn;

/// Merge an unordered set of busy intervals into a sorted,
/// non-overlapping timeline
///
/// Intervals from different calendars are treated uniformly; provenance
/// is discarded here because gap-to-calendar attribution is carried on
/// the gap records instead. Touching intervals merge into one block.
/// Zero-length or inverted intervals are dropped with a warning, never
/// fatally. O(n log n) in the number of inputs.
pub fn merge_busy_intervals(intervals: Vec<BusyInterval>) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
    let mut spans: Vec<(DateTime<Utc>, DateTime<Utc>)> = Vec::with_capacity(intervals.len());
    for interval in intervals {
        if !interval.is_valid() {
            warn!(
                calendar_id = %interval.calendar_id,
                start = %interval.start,
                end = %interval.end,
                "dropping malformed busy interval"
            );
            continue;
        }
        spans.push((interval.start, interval.end));
    }

    spans.sort_by_key(|(start, _)| *start);

    let mut merged: Vec<(DateTime<Utc>, DateTime<Utc>)> = Vec::with_capacity(spans.len());
    for (start, end) in spans {
        if let Some((_, current_end)) = merged.last_mut() {
            // Touching counts as overlapping
            if start <= *current_end {
                if end > *current_end {
                    *current_end = end;
                }
                continue;
            }
        }
        merged.push((start, end));
    }

    merged
}
