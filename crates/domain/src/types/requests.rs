//! Typed requests for the public operations
//!
//! Boundary validation lives here as explicit range checks, independent
//! of any HTTP framework. Every check runs before the engine performs
//! I/O of any kind.

use chrono::{DateTime, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::constants::{
    MAX_BUFFER_MINUTES, MAX_CALENDARS_PER_ANALYSIS, MAX_DESCRIPTION_LENGTH, MAX_GAP_MINUTES_CEILING,
    MAX_GAP_MINUTES_FLOOR, MAX_LOCATION_LENGTH, MAX_LOOKBACK_DAYS, MAX_RESULT_LIMIT,
    MAX_SKIP_REASON_LENGTH, MAX_SUMMARY_LENGTH, MIN_GAP_MINUTES_CEILING, MIN_GAP_MINUTES_FLOOR,
    MIN_LOOKBACK_DAYS, MIN_RESULT_LIMIT,
};
use crate::errors::{GapError, Result};

/// Request for `analyze`
///
/// Absent fields fall back to the user's stored settings, then to the
/// built-in defaults. `calendar_ids` left empty means the user's primary
/// calendar.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub lookback_days: Option<u32>,
    #[serde(default)]
    pub calendar_ids: Vec<String>,
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub working_hours_start: Option<NaiveTime>,
    #[serde(default)]
    pub working_hours_end: Option<NaiveTime>,
    #[serde(default)]
    pub min_gap_minutes: Option<u32>,
    #[serde(default)]
    pub max_gap_minutes: Option<u32>,
    #[serde(default)]
    pub buffer_minutes: Option<u32>,
    #[serde(default)]
    pub ignored_weekdays: Option<Vec<Weekday>>,
}

impl AnalyzeRequest {
    /// Check every provided field against its schema bounds.
    ///
    /// # Errors
    /// Returns `GapError::InvalidWindow` naming the violated rule.
    pub fn validate(&self) -> Result<()> {
        if let Some(days) = self.lookback_days {
            if !(MIN_LOOKBACK_DAYS..=MAX_LOOKBACK_DAYS).contains(&days) {
                return Err(GapError::invalid_window(format!(
                    "lookback_days must be between {MIN_LOOKBACK_DAYS} and {MAX_LOOKBACK_DAYS}"
                )));
            }
        }
        if let Some(limit) = self.limit {
            if !(MIN_RESULT_LIMIT..=MAX_RESULT_LIMIT).contains(&limit) {
                return Err(GapError::invalid_window(format!(
                    "limit must be between {MIN_RESULT_LIMIT} and {MAX_RESULT_LIMIT}"
                )));
            }
        }
        if self.calendar_ids.len() > MAX_CALENDARS_PER_ANALYSIS {
            return Err(GapError::invalid_window(format!(
                "at most {MAX_CALENDARS_PER_ANALYSIS} calendars per analysis"
            )));
        }
        if self.calendar_ids.iter().any(|id| id.trim().is_empty()) {
            return Err(GapError::invalid_window("calendar ids must not be blank"));
        }
        if let Some(min) = self.min_gap_minutes {
            if !(MIN_GAP_MINUTES_FLOOR..=MIN_GAP_MINUTES_CEILING).contains(&min) {
                return Err(GapError::invalid_window(format!(
                    "min_gap_minutes must be between {MIN_GAP_MINUTES_FLOOR} and {MIN_GAP_MINUTES_CEILING}"
                )));
            }
        }
        if let Some(max) = self.max_gap_minutes {
            if !(MAX_GAP_MINUTES_FLOOR..=MAX_GAP_MINUTES_CEILING).contains(&max) {
                return Err(GapError::invalid_window(format!(
                    "max_gap_minutes must be between {MAX_GAP_MINUTES_FLOOR} and {MAX_GAP_MINUTES_CEILING}"
                )));
            }
        }
        if let Some(buffer) = self.buffer_minutes {
            if buffer > MAX_BUFFER_MINUTES {
                return Err(GapError::invalid_window(format!(
                    "buffer_minutes must be at most {MAX_BUFFER_MINUTES}"
                )));
            }
        }
        if let Some(tz) = &self.timezone {
            if tz.parse::<chrono_tz::Tz>().is_err() {
                return Err(GapError::invalid_window(format!("unknown timezone '{tz}'")));
            }
        }
        Ok(())
    }
}

/// Request for `fill`
///
/// `[start, end]` may be a sub-range of the gap, letting the user fill
/// part of a long gap. `calendar_id` defaults to the user's primary
/// calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillGapRequest {
    pub gap_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub summary: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub calendar_id: Option<String>,
}

impl FillGapRequest {
    /// Check payload bounds.
    ///
    /// # Errors
    /// Returns `GapError::InvalidWindow` naming the violated rule.
    pub fn validate(&self) -> Result<()> {
        if self.gap_id.trim().is_empty() {
            return Err(GapError::invalid_window("gap_id must not be blank"));
        }
        if self.start >= self.end {
            return Err(GapError::invalid_window(format!(
                "'start' ({}) must precede 'end' ({})",
                self.start, self.end
            )));
        }
        let summary = self.summary.trim();
        if summary.is_empty() || summary.len() > MAX_SUMMARY_LENGTH {
            return Err(GapError::invalid_window(format!(
                "summary must be 1 to {MAX_SUMMARY_LENGTH} characters"
            )));
        }
        if let Some(description) = &self.description {
            if description.len() > MAX_DESCRIPTION_LENGTH {
                return Err(GapError::invalid_window(format!(
                    "description must be at most {MAX_DESCRIPTION_LENGTH} characters"
                )));
            }
        }
        if let Some(location) = &self.location {
            if location.len() > MAX_LOCATION_LENGTH {
                return Err(GapError::invalid_window(format!(
                    "location must be at most {MAX_LOCATION_LENGTH} characters"
                )));
            }
        }
        if let Some(calendar_id) = &self.calendar_id {
            if calendar_id.trim().is_empty() {
                return Err(GapError::invalid_window("calendar_id must not be blank"));
            }
        }
        Ok(())
    }
}

/// Request for `skip`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkipGapRequest {
    pub gap_id: String,
    #[serde(default)]
    pub reason: Option<String>,
}

impl SkipGapRequest {
    /// Check payload bounds.
    ///
    /// # Errors
    /// Returns `GapError::InvalidWindow` naming the violated rule.
    pub fn validate(&self) -> Result<()> {
        if self.gap_id.trim().is_empty() {
            return Err(GapError::invalid_window("gap_id must not be blank"));
        }
        if let Some(reason) = &self.reason {
            if reason.len() > MAX_SKIP_REASON_LENGTH {
                return Err(GapError::invalid_window(format!(
                    "reason must be at most {MAX_SKIP_REASON_LENGTH} characters"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, h, 0, 0).single().expect("valid instant")
    }

    fn fill_request() -> FillGapRequest {
        FillGapRequest {
            gap_id: "gap".into(),
            start: at(9),
            end: at(10),
            summary: "Deep work".into(),
            description: None,
            location: None,
            calendar_id: None,
        }
    }

    #[test]
    fn analyze_defaults_are_valid() {
        assert!(AnalyzeRequest::default().validate().is_ok());
    }

    #[test]
    fn analyze_rejects_out_of_bounds_lookback() {
        let request = AnalyzeRequest { lookback_days: Some(0), ..Default::default() };
        assert!(request.validate().is_err());

        let request = AnalyzeRequest { lookback_days: Some(91), ..Default::default() };
        assert!(request.validate().is_err());

        let request = AnalyzeRequest { lookback_days: Some(90), ..Default::default() };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn analyze_rejects_bad_limit_and_blank_calendars() {
        let request = AnalyzeRequest { limit: Some(0), ..Default::default() };
        assert!(request.validate().is_err());

        let request = AnalyzeRequest { limit: Some(51), ..Default::default() };
        assert!(request.validate().is_err());

        let request =
            AnalyzeRequest { calendar_ids: vec!["primary".into(), "  ".into()], ..Default::default() };
        assert!(request.validate().is_err());
    }

    #[test]
    fn analyze_rejects_unknown_timezone() {
        let request =
            AnalyzeRequest { timezone: Some("Nowhere/Void".into()), ..Default::default() };
        assert!(request.validate().is_err());

        let request =
            AnalyzeRequest { timezone: Some("Europe/Berlin".into()), ..Default::default() };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn fill_requires_ordered_range_and_summary() {
        assert!(fill_request().validate().is_ok());

        let mut inverted = fill_request();
        inverted.end = inverted.start;
        assert!(inverted.validate().is_err());

        let mut blank = fill_request();
        blank.summary = "   ".into();
        assert!(blank.validate().is_err());

        let mut oversized = fill_request();
        oversized.summary = "x".repeat(MAX_SUMMARY_LENGTH + 1);
        assert!(oversized.validate().is_err());
    }

    #[test]
    fn skip_bounds_the_reason() {
        let ok = SkipGapRequest { gap_id: "gap".into(), reason: Some("lunch".into()) };
        assert!(ok.validate().is_ok());

        let too_long = SkipGapRequest {
            gap_id: "gap".into(),
            reason: Some("x".repeat(MAX_SKIP_REASON_LENGTH + 1)),
        };
        assert!(too_long.validate().is_err());

        let blank = SkipGapRequest { gap_id: " ".into(), reason: None };
        assert!(blank.validate().is_err());
    }
}
