//! Benchmarks for the analysis hot path: merge a busy timeline and
//! compute the free slots of a multi-day window.

use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use recess_core::{compute_free_slots, merge_busy_intervals};
use recess_domain::{AnalysisWindow, BusyInterval};

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().expect("valid instant")
}

/// A week of meetings: `per_day` slots of 30 minutes on each of 7 days,
/// alternating between two calendars, deliberately unsorted.
fn busy_week(per_day: usize) -> Vec<BusyInterval> {
    let mut intervals = Vec::with_capacity(per_day * 7);
    for day in 0..7 {
        for slot in 0..per_day {
            let start = base()
                + Duration::days(day)
                + Duration::hours(9)
                + Duration::minutes(45 * slot as i64);
            let calendar = if slot % 2 == 0 { "primary" } else { "work" };
            intervals.push(BusyInterval::new(start, start + Duration::minutes(30), calendar));
        }
    }
    intervals.reverse();
    intervals
}

fn week_window() -> AnalysisWindow {
    AnalysisWindow {
        from: base(),
        to: base() + Duration::days(7),
        timezone: chrono_tz::America::New_York,
        working_hours_start: NaiveTime::from_hms_opt(9, 0, 0).expect("valid"),
        working_hours_end: NaiveTime::from_hms_opt(17, 0, 0).expect("valid"),
        min_gap_minutes: 15,
        buffer_minutes: 5,
        max_gap_minutes: Some(480),
        ignored_weekdays: Vec::new(),
    }
}

fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge_busy_intervals");
    for per_day in [4, 10, 24] {
        let intervals = busy_week(per_day);
        group.bench_with_input(
            BenchmarkId::from_parameter(intervals.len()),
            &intervals,
            |b, intervals| b.iter(|| merge_busy_intervals(black_box(intervals.clone()))),
        );
    }
    group.finish();
}

fn bench_full_analysis(c: &mut Criterion) {
    let window = week_window();
    let intervals = busy_week(10);

    c.bench_function("merge_and_compute_week", |b| {
        b.iter(|| {
            let merged = merge_busy_intervals(black_box(intervals.clone()));
            compute_free_slots(&merged, black_box(&window))
        })
    });
}

criterion_group!(benches, bench_merge, bench_full_analysis);
criterion_main!(benches);
