//! Per-user recovery settings

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BUFFER_MINUTES, DEFAULT_IGNORED_WEEKDAYS, DEFAULT_LOOKBACK_DAYS,
    DEFAULT_MAX_GAP_MINUTES, DEFAULT_MIN_GAP_MINUTES, DEFAULT_TIMEZONE,
    DEFAULT_WORKING_HOURS_END, DEFAULT_WORKING_HOURS_START, MAX_BUFFER_MINUTES,
    MAX_GAP_MINUTES_CEILING, MAX_GAP_MINUTES_FLOOR, MAX_LOOKBACK_DAYS, MIN_GAP_MINUTES_CEILING,
    MIN_GAP_MINUTES_FLOOR, MIN_LOOKBACK_DAYS,
};
use crate::errors::{GapError, Result};

fn hm((hours, minutes): (u32, u32)) -> NaiveTime {
    NaiveTime::from_hms_opt(hours, minutes, 0).unwrap_or(NaiveTime::MIN)
}

/// How gap analysis behaves for one user
///
/// Stored by the gap store; defaults apply when no row exists. Request
/// fields override these per call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoverySettings {
    /// Master switch; when false, `analyze` short-circuits to an empty
    /// result.
    pub enabled: bool,
    pub min_gap_minutes: u32,
    pub max_gap_minutes: Option<u32>,
    pub buffer_minutes: u32,
    pub ignored_weekdays: Vec<Weekday>,
    pub lookback_days: u32,
    pub working_hours_start: NaiveTime,
    pub working_hours_end: NaiveTime,
    /// IANA zone id; parse-checked when settings are updated.
    pub timezone: String,
}

impl Default for RecoverySettings {
    fn default() -> Self {
        Self {
            enabled: true,
            min_gap_minutes: DEFAULT_MIN_GAP_MINUTES,
            max_gap_minutes: Some(DEFAULT_MAX_GAP_MINUTES),
            buffer_minutes: DEFAULT_BUFFER_MINUTES,
            ignored_weekdays: DEFAULT_IGNORED_WEEKDAYS.to_vec(),
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            working_hours_start: hm(DEFAULT_WORKING_HOURS_START),
            working_hours_end: hm(DEFAULT_WORKING_HOURS_END),
            timezone: DEFAULT_TIMEZONE.to_string(),
        }
    }
}

/// Partial update of `RecoverySettings`
///
/// Absent fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecoverySettingsUpdate {
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub min_gap_minutes: Option<u32>,
    #[serde(default)]
    pub max_gap_minutes: Option<u32>,
    #[serde(default)]
    pub buffer_minutes: Option<u32>,
    #[serde(default)]
    pub ignored_weekdays: Option<Vec<Weekday>>,
    #[serde(default)]
    pub lookback_days: Option<u32>,
    #[serde(default)]
    pub working_hours_start: Option<NaiveTime>,
    #[serde(default)]
    pub working_hours_end: Option<NaiveTime>,
    #[serde(default)]
    pub timezone: Option<String>,
}

impl RecoverySettingsUpdate {
    /// Check every provided field against its schema bounds.
    ///
    /// # Errors
    /// Returns `GapError::InvalidWindow` naming the violated rule.
    pub fn validate(&self) -> Result<()> {
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
        if let Some(days) = self.lookback_days {
            if !(MIN_LOOKBACK_DAYS..=MAX_LOOKBACK_DAYS).contains(&days) {
                return Err(GapError::invalid_window(format!(
                    "lookback_days must be between {MIN_LOOKBACK_DAYS} and {MAX_LOOKBACK_DAYS}"
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

    /// Apply this patch on top of `current`, re-checking cross-field
    /// invariants on the merged value.
    ///
    /// # Errors
    /// Returns `GapError::InvalidWindow` when the merged settings are
    /// inconsistent (working hours inverted, cap below minimum).
    pub fn apply(&self, current: &RecoverySettings) -> Result<RecoverySettings> {
        self.validate()?;

        let merged = RecoverySettings {
            enabled: self.enabled.unwrap_or(current.enabled),
            min_gap_minutes: self.min_gap_minutes.unwrap_or(current.min_gap_minutes),
            max_gap_minutes: self.max_gap_minutes.or(current.max_gap_minutes),
            buffer_minutes: self.buffer_minutes.unwrap_or(current.buffer_minutes),
            ignored_weekdays: self
                .ignored_weekdays
                .clone()
                .unwrap_or_else(|| current.ignored_weekdays.clone()),
            lookback_days: self.lookback_days.unwrap_or(current.lookback_days),
            working_hours_start: self.working_hours_start.unwrap_or(current.working_hours_start),
            working_hours_end: self.working_hours_end.unwrap_or(current.working_hours_end),
            timezone: self.timezone.clone().unwrap_or_else(|| current.timezone.clone()),
        };

        if merged.working_hours_start >= merged.working_hours_end {
            return Err(GapError::invalid_window(format!(
                "working hours start ({}) must precede end ({})",
                merged.working_hours_start, merged.working_hours_end
            )));
        }
        if let Some(max) = merged.max_gap_minutes {
            if max < merged.min_gap_minutes {
                return Err(GapError::invalid_window(format!(
                    "max_gap_minutes ({max}) must be >= min_gap_minutes ({})",
                    merged.min_gap_minutes
                )));
            }
        }
        Ok(merged)
    }
}
