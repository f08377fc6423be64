//! Signed-rank comparison benchmark
//!
//! Measures both p-value regimes of the paired comparison:
//!
//! 1. Exact null distribution (n <= 50, no ties)
//! 2. Normal approximation with tie correction (large n)
//!
//! # Run Instructions
//!
//! ```bash
//! cargo bench --bench signed_rank
//! ```

use benchstrata::comparison::{compare_variants, exact_null_counts, ComparisonConfig};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::collections::BTreeMap;

/// Deterministic paired estimates with distinct, mostly positive differences
fn paired(n: usize) -> (BTreeMap<String, f64>, BTreeMap<String, f64>) {
    let mut a = BTreeMap::new();
    let mut b = BTreeMap::new();
    let mut state = 0x2545_f491_u64;
    for i in 0..n {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let noise = (state >> 33) as f64 / (1u64 << 31) as f64;
        let base = 1.0 + i as f64 * 0.37;
        a.insert(format!("file_{:05}", i), base * (1.05 + noise * 0.2 - 0.08));
        b.insert(format!("file_{:05}", i), base);
    }
    (a, b)
}

fn bench_exact_null_counts(c: &mut Criterion) {
    let mut group = c.benchmark_group("exact_null_counts");
    for n in [10usize, 30, 50] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |bencher, &n| {
            bencher.iter(|| exact_null_counts(black_box(n)));
        });
    }
    group.finish();
}

fn bench_compare_variants(c: &mut Criterion) {
    let config = ComparisonConfig::default();
    let mut group = c.benchmark_group("compare_variants");
    for n in [12usize, 50, 1_000, 10_000] {
        let (a, b) = paired(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |bencher, _| {
            bencher.iter(|| compare_variants("A", black_box(&a), "B", black_box(&b), &config));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_exact_null_counts, bench_compare_variants);
criterion_main!(benches);
