//! Domain constants
//!
//! Centralized location for defaults and validation bounds used by the
//! gap recovery engine. Defaults mirror the product's per-user settings;
//! bounds mirror the product's request schemas.

use chrono::Weekday;

// Analysis defaults
pub const DEFAULT_CALENDAR_ID: &str = "primary";
pub const DEFAULT_TIMEZONE: &str = "UTC";
pub const DEFAULT_LOOKBACK_DAYS: u32 = 7;
pub const DEFAULT_RESULT_LIMIT: usize = 10;
pub const DEFAULT_MIN_GAP_MINUTES: u32 = 30;
pub const DEFAULT_MAX_GAP_MINUTES: u32 = 480;
pub const DEFAULT_BUFFER_MINUTES: u32 = 0;
pub const DEFAULT_WORKING_HOURS_START: (u32, u32) = (9, 0);
pub const DEFAULT_WORKING_HOURS_END: (u32, u32) = (17, 0);
pub const DEFAULT_IGNORED_WEEKDAYS: [Weekday; 2] = [Weekday::Sat, Weekday::Sun];

// Validation bounds
pub const MIN_LOOKBACK_DAYS: u32 = 1;
pub const MAX_LOOKBACK_DAYS: u32 = 90;
pub const MIN_RESULT_LIMIT: usize = 1;
pub const MAX_RESULT_LIMIT: usize = 50;
pub const MIN_GAP_MINUTES_FLOOR: u32 = 5;
pub const MIN_GAP_MINUTES_CEILING: u32 = 480;
pub const MAX_GAP_MINUTES_FLOOR: u32 = 60;
pub const MAX_GAP_MINUTES_CEILING: u32 = 1440;
pub const MAX_BUFFER_MINUTES: u32 = 120;
pub const MAX_CALENDARS_PER_ANALYSIS: usize = 50;

// Event payload bounds
pub const MAX_SUMMARY_LENGTH: usize = 1000;
pub const MAX_DESCRIPTION_LENGTH: usize = 10_000;
pub const MAX_LOCATION_LENGTH: usize = 1000;
pub const MAX_SKIP_REASON_LENGTH: usize = 500;
