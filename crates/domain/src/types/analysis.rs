//! Analysis window and result types

use chrono::{DateTime, NaiveTime, Utc, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::errors::{GapError, Result};
use crate::types::gap::Gap;

/// Parameters of one gap analysis
///
/// `[from, to]` bounds the instant range; the remaining fields describe
/// how free time inside that range is interpreted (working hours in the
/// window's timezone, buffer trimming, duration filters, skipped
/// weekdays).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisWindow {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    pub timezone: Tz,
    pub working_hours_start: NaiveTime,
    pub working_hours_end: NaiveTime,
    pub min_gap_minutes: u32,
    pub buffer_minutes: u32,
    /// Slots longer than this are dropped; `None` disables the cap.
    pub max_gap_minutes: Option<u32>,
    /// Weekdays excluded from analysis entirely.
    pub ignored_weekdays: Vec<Weekday>,
}

impl AnalysisWindow {
    /// Check the structural invariants of the window.
    ///
    /// # Errors
    /// Returns `GapError::InvalidWindow` naming the violated rule.
    pub fn validate(&self) -> Result<()> {
        if self.from >= self.to {
            return Err(GapError::invalid_window(format!(
                "'from' ({}) must precede 'to' ({})",
                self.from, self.to
            )));
        }
        if self.min_gap_minutes == 0 {
            return Err(GapError::invalid_window("min_gap_minutes must be positive"));
        }
        if self.working_hours_start >= self.working_hours_end {
            return Err(GapError::invalid_window(format!(
                "working hours start ({}) must precede end ({})",
                self.working_hours_start, self.working_hours_end
            )));
        }
        if let Some(max) = self.max_gap_minutes {
            if max < self.min_gap_minutes {
                return Err(GapError::invalid_window(format!(
                    "max_gap_minutes ({max}) must be >= min_gap_minutes ({})",
                    self.min_gap_minutes
                )));
            }
        }
        Ok(())
    }
}

/// Outcome of one gap analysis
///
/// Immutable once produced; this is the unit the analysis cache stores.
/// `gaps` holds pending gaps only, in ascending start order.
/// `total_count` reports the full surviving count even when `gaps` has
/// been truncated to a request limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub gaps: Vec<Gap>,
    pub analyzed_range: AnalysisWindow,
    pub total_count: usize,
    pub computed_at: DateTime<Utc>,
}

impl AnalysisResult {
    /// An empty result over `window`, used when analysis is disabled.
    pub fn empty(window: AnalysisWindow, computed_at: DateTime<Utc>) -> Self {
        Self { gaps: Vec::new(), analyzed_range: window, total_count: 0, computed_at }
    }

    /// Copy of this result with at most `limit` gaps.
    ///
    /// `total_count` is preserved so callers can tell truncation from a
    /// genuinely small result.
    pub fn with_limit(&self, limit: usize) -> Self {
        if self.gaps.len() <= limit {
            return self.clone();
        }
        Self {
            gaps: self.gaps[..limit].to_vec(),
            analyzed_range: self.analyzed_range.clone(),
            total_count: self.total_count,
            computed_at: self.computed_at,
        }
    }
}
