//! Criterion benchmarks for exact probability and RTP evaluation

use bigdecimal::BigDecimal;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use num_bigint::BigInt;
use plinko_engine::fixtures::{fair_board, v_shaped_table};
use plinko_engine::{Configuration, ProbabilityEngine, RtpEvaluator};

fn skewed_bias() -> BigDecimal {
    BigDecimal::new(BigInt::from(499_975), 6)
}

fn benchmark_single_probability(c: &mut Criterion) {
    let engine = ProbabilityEngine::default();
    let bias = skewed_bias();
    c.bench_function("probability_16_rows_center_bucket", |b| {
        b.iter(|| engine.probability(black_box(16), black_box(8), &bias))
    });
}

fn benchmark_evaluate_by_precision(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate_16_rows");
    let config = Configuration::new(16, skewed_bias(), v_shaped_table(16)).unwrap();
    for digits in [50u64, 100, 200] {
        let evaluator = RtpEvaluator::new(ProbabilityEngine::with_digits(digits).unwrap());
        group.bench_with_input(BenchmarkId::from_parameter(digits), &config, |b, config| {
            b.iter(|| evaluator.evaluate(black_box(config)))
        });
    }
    group.finish();
}

fn benchmark_batch(c: &mut Criterion) {
    let configs: Vec<Configuration> = (8..=20).map(fair_board).collect();
    let evaluator = RtpEvaluator::default();
    c.bench_function("evaluate_batch_8_to_20_rows", |b| {
        b.iter(|| {
            let results = evaluator.evaluate_batch(black_box(&configs));
            black_box(results.len())
        })
    });
}

criterion_group!(
    benches,
    benchmark_single_probability,
    benchmark_evaluate_by_precision,
    benchmark_batch,
);
criterion_main!(benches);
