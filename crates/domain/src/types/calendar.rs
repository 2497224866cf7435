//! Calendar-facing types
//!
//! Inputs and outputs exchanged with the external calendar collaborator.
//! Busy intervals arrive already expanded (recurrences resolved upstream)
//! and are treated as opaque occupied ranges.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A time range already occupied on one calendar
///
/// Invariant: `start < end`. Intervals violating it are dropped (with a
/// warning) during merging rather than failing the analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub calendar_id: String,
}

impl BusyInterval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, calendar_id: impl Into<String>) -> Self {
        Self { start, end, calendar_id: calendar_id.into() }
    }

    /// Whether the interval is well-formed (`start < end`).
    pub fn is_valid(&self) -> bool {
        self.start < self.end
    }

    /// Whether this interval overlaps the half-open range `[start, end)`.
    pub fn intersects(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start < end && self.end > start
    }
}

/// Payload for creating a calendar event when filling a gap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDraft {
    pub summary: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, h, m, 0).single().expect("valid instant")
    }

    #[test]
    fn intersects_is_half_open() {
        let busy = BusyInterval::new(at(10, 0), at(11, 0), "primary");

        // Touching boundaries do not intersect
        assert!(!busy.intersects(at(9, 0), at(10, 0)));
        assert!(!busy.intersects(at(11, 0), at(12, 0)));

        // Any shared minute does
        assert!(busy.intersects(at(10, 30), at(10, 45)));
        assert!(busy.intersects(at(9, 0), at(10, 1)));
        assert!(busy.intersects(at(10, 59), at(12, 0)));
    }

    #[test]
    fn validity_requires_positive_duration() {
        assert!(BusyInterval::new(at(10, 0), at(10, 1), "primary").is_valid());
        assert!(!BusyInterval::new(at(10, 0), at(10, 0), "primary").is_valid());
        assert!(!BusyInterval::new(at(11, 0), at(10, 0), "primary").is_valid());
    }
}
