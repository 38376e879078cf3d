//! Formatter performance benchmarks.
//!
//! Measures the error-driven layout choice and the explicit-format paths.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use scicat::format::{round_to_sig_figs, Formatter, FormatterConfig, NumberFormat};

/// Values spanning the fixed-point and scientific layouts.
fn sample_values() -> Vec<(f64, f64, f64)> {
    (0..200)
        .map(|i| {
            let scale = 10f64.powi(i % 16 - 8);
            let value = (1.0 + i as f64 * 0.037) * scale;
            (value, value * 0.013, value * 0.021)
        })
        .collect()
}

/// Benchmark formatting values with errors.
fn bench_format_with_errors(c: &mut Criterion) {
    let mut group = c.benchmark_group("format_with_errors");
    let values = sample_values();

    for sig_figs in [1, 2, 3].iter() {
        let formatter =
            Formatter::with_config(FormatterConfig::default().with_error_sig_figs(*sig_figs));
        group.bench_with_input(BenchmarkId::new("sig_figs", sig_figs), &values, |b, values| {
            b.iter(|| {
                for &(value, neg, pos) in values {
                    black_box(formatter.format(value, Some(neg), Some(pos), None).unwrap());
                }
            })
        });
    }

    group.finish();
}

/// Benchmark explicit formats on bare values.
fn bench_format_explicit(c: &mut Criterion) {
    let mut group = c.benchmark_group("format_explicit");
    let values = sample_values();
    let formatter = Formatter::new();

    for format in [
        NumberFormat::Fixed(3),
        NumberFormat::General(3),
        NumberFormat::Scientific(2),
    ] {
        group.bench_with_input(
            BenchmarkId::new("format", format.to_string()),
            &values,
            |b, values| {
                b.iter(|| {
                    for &(value, _, _) in values {
                        black_box(formatter.format(value, None, None, Some(&format)).unwrap());
                    }
                })
            },
        );
    }

    group.finish();
}

/// Benchmark significant-figure rounding alone.
fn bench_round_to_sig_figs(c: &mut Criterion) {
    let values = sample_values();
    c.bench_function("round_to_sig_figs", |b| {
        b.iter(|| {
            for &(value, _, _) in &values {
                black_box(round_to_sig_figs(value, 2));
            }
        })
    });
}

criterion_group!(
    benches,
    bench_format_with_errors,
    bench_format_explicit,
    bench_round_to_sig_figs
);
criterion_main!(benches);
