//! Criterion benchmarks for the per-view recomputation path.
//!
//! Run with: `cargo bench -p fxjournal-analytics`
//!
//! Every view recomputes from the full snapshot, so these measure:
//! - Normalizing a raw table
//! - Portfolio metrics (sort + cumulative pass)
//! - Each breakdown dimension
//! - Streak detection and filtering

use chrono::{Duration, TimeZone};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fxjournal_analytics::aggregate::{breakdown, Dimension, Period};
use fxjournal_analytics::{detect_streaks, FilterSpec, PortfolioMetrics};
use fxjournal_core::data::canonical_table;
use fxjournal_core::domain::default_reference_offset;
use fxjournal_core::{Normalizer, TradeId, TradeRecord};

/// Synthetic journal: a few pairs and strategies, hourly starts, mixed P&L.
fn generate_trades(count: usize) -> Vec<TradeRecord> {
    let offset = default_reference_offset();
    let Some(origin) = offset.with_ymd_and_hms(2022, 1, 3, 0, 0, 0).single() else {
        return Vec::new();
    };
    let pairs = ["USDJPY", "EURUSD", "GBPJPY", "AUDUSD"];
    let strategies = ["breakout", "range", "trend", ""];
    (0..count)
        .map(|i| {
            let start = origin + Duration::hours(i as i64 * 7);
            let end = start + Duration::minutes((i % 180) as i64);
            let net = ((i * 37) % 200) as f64 - 95.0;
            TradeRecord {
                trade_id: Some(TradeId(i as i64 + 1)),
                currency_pair: Some(pairs[i % pairs.len()].to_string()),
                trade_type: Some(if i % 2 == 0 { "buy" } else { "sell" }.to_string()),
                start_time: Some(start),
                end_time: Some(end),
                date: Some(start.date_naive()),
                holding_time_seconds: Some((end - start).num_seconds()),
                profit_loss: Some(net),
                pips: Some(net / 10.0),
                net_profit_loss: Some(net),
                strategy: Some(strategies[i % strategies.len()].to_string()),
                ..Default::default()
            }
        })
        .collect()
}

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");
    for size in [100, 1000, 10000].iter() {
        let table = canonical_table(&generate_trades(*size));
        let normalizer = Normalizer::default();
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| normalizer.normalize(black_box(&table)));
        });
    }
    group.finish();
}

fn bench_metrics(c: &mut Criterion) {
    let mut group = c.benchmark_group("portfolio_metrics");
    for size in [100, 1000, 10000].iter() {
        let trades = generate_trades(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| PortfolioMetrics::compute(black_box(&trades)));
        });
    }
    group.finish();
}

fn bench_breakdowns(c: &mut Criterion) {
    let mut group = c.benchmark_group("breakdown");
    let trades = generate_trades(10000);
    let offset = default_reference_offset();
    let dimensions = [
        Dimension::Strategy,
        Dimension::CurrencyPair,
        Dimension::Period(Period::Weekly),
        Dimension::Weekday,
        Dimension::Session,
        Dimension::HoldingTime,
    ];
    for dim in dimensions {
        group.bench_function(dim.name(), |b| {
            b.iter(|| breakdown(black_box(&trades), dim, offset));
        });
    }
    group.finish();
}

fn bench_streaks_and_filter(c: &mut Criterion) {
    let trades = generate_trades(10000);
    c.bench_function("detect_streaks_10k", |b| {
        b.iter(|| detect_streaks(black_box(&trades), 3));
    });

    let spec = FilterSpec::new().currency_pair("USDJPY").only_losses(true);
    c.bench_function("filter_10k", |b| {
        b.iter(|| spec.apply(black_box(&trades)).len());
    });
}

criterion_group!(
    benches,
    bench_normalize,
    bench_metrics,
    bench_breakdowns,
    bench_streaks_and_filter
);

criterion_main!(benches);
