//! Benchmarks for the curve transforms.
//!
//! Run with: cargo bench -p curvelab-analytics

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use curvelab_analytics::prelude::*;
use curvelab_core::{CurveTable, Date, RawRow};

// =============================================================================
// TEST DATA GENERATORS
// =============================================================================

const LABELS: [&str; 8] = ["3m", "6m", "1y", "2y", "5y", "10y", "20y", "30y"];

fn create_test_table(days: usize) -> CurveTable {
    let start = Date::from_ymd(2000, 1, 3).unwrap();
    let rows = (0..days).map(|i| {
        let t = i as f64 / 250.0;
        let mut row = RawRow::new(start.add_days(i as i64));
        for (j, label) in LABELS.iter().enumerate() {
            let base = 2.0 + 0.3 * j as f64;
            let value = base + (t + j as f64 * 0.1).sin() * 0.8;
            // sprinkle gaps
            let value = if (i + j) % 97 == 0 { None } else { Some(value) };
            row.push(*label, value);
        }
        row
    });
    CurveTable::load(rows).unwrap()
}

// =============================================================================
// BENCHMARKS
// =============================================================================

fn bench_spreads(c: &mut Criterion) {
    let mut group = c.benchmark_group("spreads_all_named");
    let engine = SpreadEngine::standard();

    for days in [1_000, 10_000] {
        let table = create_test_table(days);
        group.throughput(Throughput::Elements(days as u64));
        group.bench_with_input(BenchmarkId::from_parameter(days), &table, |b, table| {
            b.iter(|| engine.all_named(black_box(table)))
        });
    }
    group.finish();
}

fn bench_factors_and_regimes(c: &mut Criterion) {
    let table = create_test_table(10_000);
    let anchors = FactorAnchors::default();
    let thresholds = RegimeThresholds::default();

    c.bench_function("decompose_10k", |b| {
        b.iter(|| FactorEngine::decompose(black_box(&table), &anchors))
    });

    let factors = FactorEngine::decompose(&table, &anchors).unwrap();
    c.bench_function("classify_timeline_10k", |b| {
        b.iter(|| {
            let regimes = RegimeEngine::classify(black_box(&factors), &thresholds).unwrap();
            RegimeEngine::to_timeline(&regimes)
        })
    });
}

fn bench_volatility(c: &mut Criterion) {
    let mut group = c.benchmark_group("rolling_vol_all");
    group.sample_size(50);
    let table = create_test_table(10_000);

    for window in [21, 63, 252] {
        let spec = VolatilitySpec::new(window).in_basis_points();
        group.bench_with_input(BenchmarkId::from_parameter(window), &spec, |b, spec| {
            b.iter(|| VolatilityEngine::rolling_vol_all(black_box(&table), *spec))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_spreads,
    bench_factors_and_regimes,
    bench_volatility
);
criterion_main!(benches);
