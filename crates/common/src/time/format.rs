//! Human-readable duration formatting
//!
//! Formats minute counts into compact human-readable strings for
//! user-facing summaries.

/// Format a minute count into a human-readable string
///
/// Negative inputs clamp to zero.
///
/// # Examples
///
/// ```
/// # #[cfg(feature = "foundation")]
/// # {
/// use recess_common::time::format::format_minutes;
///
/// assert_eq!(format_minutes(45), "45m");
/// assert_eq!(format_minutes(60), "1h");
/// assert_eq!(format_minutes(95), "1h 35m");
/// assert_eq!(format_minutes(1500), "1d 1h");
/// # }
/// ```
pub fn format_minutes(minutes: i64) -> String {
    let total = minutes.max(0);

    let days = total / 1440;
    let hours = (total % 1440) / 60;
    let mins = total % 60;

    let mut parts = Vec::with_capacity(2);
    if days > 0 {
        parts.push(format!("{days}d"));
    }
    if hours > 0 {
        parts.push(format!("{hours}h"));
    }
    if mins > 0 || parts.is_empty() {
        parts.push(format!("{mins}m"));
    }

    // Keep the two most significant components
    parts.truncate(2);
    parts.join(" ")
}
