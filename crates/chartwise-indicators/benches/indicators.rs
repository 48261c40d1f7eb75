//! Benchmarks for indicator implementations.

use chartwise_core::traits::{Indicator, MultiOutputIndicator};
use chartwise_core::types::{Bar, PriceSeries, Timeframe};
use chartwise_indicators::{BollingerBands, Ema, IndicatorEngine, IndicatorRequest, Sma};
use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn generate_test_data(size: usize) -> Vec<f64> {
    (0..size)
        .map(|i| 100.0 + (i as f64 * 0.1).sin() * 10.0)
        .collect()
}

fn generate_series(size: usize) -> PriceSeries {
    let start = Utc.with_ymd_and_hms(2020, 1, 1, 3, 45, 0).unwrap().fixed_offset();
    let bars = generate_test_data(size)
        .into_iter()
        .enumerate()
        .map(|(i, c)| Bar::new(start + Duration::minutes(i as i64), c, c + 1.0, c - 1.0, c, 1000.0))
        .collect();
    PriceSeries::new("BENCH", Timeframe::Minute1, bars).unwrap()
}

fn benchmark_moving_averages(c: &mut Criterion) {
    let mut group = c.benchmark_group("MovingAverage");

    for size in [1000, 10000, 100000].iter() {
        let data = generate_test_data(*size);

        group.bench_with_input(BenchmarkId::new("sma20", size), &data, |b, data| {
            let sma = Sma::new(20);
            b.iter(|| sma.calculate(black_box(data)))
        });

        group.bench_with_input(BenchmarkId::new("ema20", size), &data, |b, data| {
            let ema = Ema::new(20);
            b.iter(|| ema.calculate(black_box(data)))
        });
    }

    group.finish();
}

fn benchmark_bollinger(c: &mut Criterion) {
    let mut group = c.benchmark_group("Bollinger");

    for size in [1000, 10000].iter() {
        let data = generate_test_data(*size);

        group.bench_with_input(BenchmarkId::new("standard", size), &data, |b, data| {
            let bb = BollingerBands::new();
            b.iter(|| bb.calculate(black_box(data)))
        });
    }

    group.finish();
}

fn benchmark_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("Engine");
    let request = IndicatorRequest::all();

    for size in [375, 10000].iter() {
        let series = generate_series(*size);

        group.bench_with_input(BenchmarkId::new("all", size), &series, |b, series| {
            let engine = IndicatorEngine::new();
            b.iter(|| engine.compute(black_box(series), &request))
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_moving_averages, benchmark_bollinger, benchmark_engine);
criterion_main!(benches);
