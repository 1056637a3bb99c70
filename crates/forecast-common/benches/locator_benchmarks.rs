//! Benchmarks for nearest-sample lookup.
//!
//! Run with: cargo bench --package forecast-common
//! Or: cargo bench --package forecast-common --bench locator_benchmarks

use chrono::Duration;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use forecast_common::{closest_index, LocationKey};
use test_utils::{compact_time_structure, instant};

// =============================================================================
// LOCATOR BENCHMARKS
// =============================================================================

fn bench_closest_index(c: &mut Criterion) {
    let mut group = c.benchmark_group("closest_index");
    let times = compact_time_structure();

    let targets = [
        ("exact", instant("2024-11-28T20:00:00Z")),
        ("hourly_between", instant("2024-11-28T20:32:00Z")),
        ("six_hourly_midpoint", instant("2024-12-02T15:00:00Z")),
        ("past_end", instant("2024-12-08T10:00:00Z")),
    ];

    for (name, target) in targets {
        group.bench_with_input(BenchmarkId::new("compact", name), &target, |b, &target| {
            b.iter(|| closest_index(black_box(&times), black_box(target)))
        });
    }

    group.finish();
}

fn bench_closest_index_long_series(c: &mut Criterion) {
    let mut group = c.benchmark_group("closest_index_long");
    let origin = instant("2024-11-28T00:00:00Z");

    for len in [100usize, 1_000, 10_000] {
        let times: Vec<_> = (0..len as i64).map(|i| origin + Duration::minutes(i * 10)).collect();
        let target = origin + Duration::minutes(len as i64 * 5 + 3);

        group.bench_with_input(BenchmarkId::from_parameter(len), &times, |b, times| {
            b.iter(|| closest_index(black_box(times), black_box(target)))
        });
    }

    group.finish();
}

// =============================================================================
// LOCATION KEY BENCHMARKS
// =============================================================================

fn bench_location_key(c: &mut Criterion) {
    c.bench_function("location_key_new", |b| {
        b.iter(|| LocationKey::new(black_box(60.05), black_box(10.87)))
    });
}

criterion_group!(
    benches,
    bench_closest_index,
    bench_closest_index_long_series,
    bench_location_key
);
criterion_main!(benches);
