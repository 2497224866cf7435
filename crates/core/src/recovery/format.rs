//! Chat-facing analysis formatting
//!
//! A deterministic, locale-free rendering of an analysis result for the
//! product's chat surface. Pure function over read-only input; any LLM
//! rephrasing happens outside the engine.

use recess_common::time::format_minutes;
use recess_domain::AnalysisResult;

/// Render an analysis result as plain text
///
/// Lists each pending gap with its weekday, date, local-time range in
/// the analyzed timezone, and duration. Notes how many gaps were
/// truncated away when the result was limited.
pub fn format_analysis(result: &AnalysisResult) -> String {
    if result.gaps.is_empty() {
        return "No recoverable gaps found in the analyzed window.".to_string();
    }

    let tz = result.analyzed_range.timezone;
    let noun = if result.total_count == 1 { "gap" } else { "gaps" };
    let mut lines = Vec::with_capacity(result.gaps.len() + 2);
    lines.push(format!("Found {} open {noun} worth reclaiming:", result.total_count));

    for gap in &result.gaps {
        let start = gap.start.with_timezone(&tz);
        let end = gap.end.with_timezone(&tz);
        lines.push(format!(
            "- {} {} to {} ({})",
            start.format("%a %b %-d"),
            start.format("%H:%M"),
            end.format("%H:%M"),
            format_minutes(gap.duration_minutes()),
        ));
    }

    let shown = result.gaps.len();
    if shown < result.total_count {
        lines.push(format!("...and {} more.", result.total_count - shown));
    }

    lines.join("\n")
}
