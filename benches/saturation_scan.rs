//! Benchmarks for saturation point detection.
//!
//! Run:
//! - cargo bench --bench saturation_scan

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use memsat::core::saturation::{SaturationParams, find_saturation_point};

const MODULE_COUNTS: [usize; 3] = [128, 512, 4096];
const WINDOWS: [usize; 3] = [5, 10, 40];

/// Decays until `knee`, flat afterwards.
fn build_curve(len: usize, knee: usize) -> Vec<f64> {
    (0..len)
        .map(|i| {
            let steps = knee.saturating_sub(i) as i32;
            25.0 * 1.03f64.powi(steps)
        })
        .collect()
}

/// Never settles, so every window gets scanned.
fn build_steep(len: usize) -> Vec<f64> {
    (0..len).map(|i| 1e6 * 0.98f64.powi(i as i32)).collect()
}

fn bench_plateau(c: &mut Criterion) {
    let mut group = c.benchmark_group("saturation_plateau");
    for &len in &MODULE_COUNTS {
        let curve = build_curve(len, len * 3 / 4);
        for &window in &WINDOWS {
            let params = SaturationParams {
                threshold: 0.01,
                window,
            };
            let id = BenchmarkId::new("case", format!("n{len}_w{window}"));
            group.bench_with_input(id, &curve, |b, curve| {
                b.iter(|| find_saturation_point(black_box(curve), &params));
            });
        }
    }
    group.finish();
}

fn bench_no_saturation(c: &mut Criterion) {
    let mut group = c.benchmark_group("saturation_none");
    for &len in &MODULE_COUNTS {
        let curve = build_steep(len);
        let params = SaturationParams::default();
        group.bench_with_input(BenchmarkId::new("len", len), &curve, |b, curve| {
            b.iter(|| find_saturation_point(black_box(curve), &params));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_plateau, bench_no_saturation);
criterion_main!(benches);
