//! # Staging Benchmarks
//!
//! Performance benchmarks for renalis-core staging operations.
//!
//! Run with: `cargo bench -p renalis-core`

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use renalis_core::{
    HistoryStore, MeasurementInput, MemoryHistory, PatientId, Session, Sex, assess, classify,
    estimate_egfr, history_to_bytes,
};
use std::hint::black_box;

fn bench_classify(c: &mut Criterion) {
    c.bench_function("classify", |b| {
        b.iter(|| {
            for egfr in [5.0, 20.0, 45.0, 75.0, 120.0] {
                black_box(classify(black_box(egfr)));
            }
        });
    });
}

fn bench_estimate(c: &mut Criterion) {
    c.bench_function("estimate_egfr", |b| {
        b.iter(|| black_box(estimate_egfr(black_box(1.3), black_box(62), Sex::Female)));
    });
}

fn bench_assess(c: &mut Criterion) {
    let mut group = c.benchmark_group("assess");
    let inputs = [
        ("direct", MeasurementInput::egfr(45.0)),
        ("creatinine", MeasurementInput::creatinine(1.3, 62, Sex::Male)),
    ];
    for (name, input) in inputs {
        group.bench_with_input(BenchmarkId::from_parameter(name), &input, |b, input| {
            b.iter(|| black_box(assess(black_box(input))));
        });
    }
    group.finish();
}

fn populated_history(entries: u64) -> MemoryHistory {
    let mut session = Session::new();
    for i in 0..entries {
        let egfr = 10.0 + (i % 110) as f64;
        let _ = session.record(PatientId(i % 50), &MeasurementInput::egfr(egfr), i);
    }
    session.snapshot().unwrap_or_default()
}

fn bench_history(c: &mut Criterion) {
    let mut group = c.benchmark_group("history");
    for size in [100u64, 1000, 10000] {
        let history = populated_history(size);
        group.bench_with_input(BenchmarkId::new("entries", size), &history, |b, h| {
            b.iter(|| black_box(h.entries(PatientId(7))));
        });
        group.bench_with_input(BenchmarkId::new("snapshot", size), &history, |b, h| {
            b.iter(|| black_box(history_to_bytes(h)));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_classify,
    bench_estimate,
    bench_assess,
    bench_history
);
criterion_main!(benches);
