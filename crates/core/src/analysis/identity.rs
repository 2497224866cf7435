//! Content-addressed gap identity
//!
//! Gap ids are derived from content, never minted randomly, so that
//! recomputing the same analysis yields the same id for an unchanged
//! gap. Exactness is the point: a one-minute shift in either endpoint
//! must produce a different id, because `fill`/`skip` reference an
//! unambiguous gap.

use chrono::{DateTime, SecondsFormat, Utc};
use recess_domain::AnalysisWindow;
use sha2::{Digest, Sha256};

/// Hex length of a gap id (truncated SHA-256).
const GAP_ID_LEN: usize = 32;

/// Hex length of a window-parameter fingerprint.
const PARAMS_HASH_LEN: usize = 16;

/// Stable id for the gap `(start, end)` of `user_id` over a calendar set
///
/// `calendar_ids` must already be sorted and de-duplicated; the service
/// normalizes the analyzed set once per request.
pub fn gap_id(
    user_id: &str,
    calendar_ids: &[String],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(user_id.as_bytes());
    hasher.update(b"|");
    hasher.update(calendar_ids.join(",").as_bytes());
    hasher.update(b"|");
    hasher.update(start.to_rfc3339_opts(SecondsFormat::Secs, true).as_bytes());
    hasher.update(b"|");
    hasher.update(end.to_rfc3339_opts(SecondsFormat::Secs, true).as_bytes());

    let digest = format!("{:x}", hasher.finalize());
    digest[..GAP_ID_LEN].to_string()
}

/// Fingerprint of the non-range window parameters
///
/// Part of the analysis cache key: two requests over the same instant
/// range but different thresholds, working hours, zone, or skipped
/// weekdays must not share a cached result.
pub fn window_params_hash(window: &AnalysisWindow) -> String {
    let mut weekdays: Vec<u32> =
        window.ignored_weekdays.iter().map(|d| d.num_days_from_monday()).collect();
    weekdays.sort_unstable();
    weekdays.dedup();

    let mut hasher = Sha256::new();
    hasher.update(window.timezone.name().as_bytes());
    hasher.update(b"|");
    hasher.update(window.working_hours_start.to_string().as_bytes());
    hasher.update(b"|");
    hasher.update(window.working_hours_end.to_string().as_bytes());
    hasher.update(b"|");
    hasher.update(window.min_gap_minutes.to_le_bytes());
    hasher.update(window.buffer_minutes.to_le_bytes());
    hasher.update(window.max_gap_minutes.unwrap_or(0).to_le_bytes());
    hasher.update(b"|");
    for day in weekdays {
        hasher.update(day.to_le_bytes());
    }

    let digest = format!("{:x}", hasher.finalize());
    digest[..PARAMS_HASH_LEN].to_string()
}
