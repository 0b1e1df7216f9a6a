//! Benchmarks for fuzzy evaluation

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use fuzzy_advisor::config::{MARKET_INDEX, STOCK_TREND};
use fuzzy_advisor::ModelConfig;

fn evaluate_benchmark(c: &mut Criterion) {
    let engine = ModelConfig::reference().build().expect("reference model");

    let scenarios = [
        ("buy", (4500.0, 5.0)),
        ("hold", (3500.0, 0.0)),
        ("sell", (3000.0, -10.0)),
        ("no_rule", (4000.0, -10.0)),
    ];

    let mut group = c.benchmark_group("evaluate");

    for (name, (market, trend)) in scenarios {
        group.bench_with_input(BenchmarkId::new("reference", name), &(market, trend), |b, &(m, t)| {
            b.iter(|| {
                let result = engine.evaluate_pairs(&[(MARKET_INDEX, black_box(m)), (STOCK_TREND, black_box(t))]);
                black_box(result.is_ok())
            });
        });
    }

    group.finish();
}

fn build_benchmark(c: &mut Criterion) {
    let model = ModelConfig::reference();

    c.bench_function("build_reference_model", |b| {
        b.iter(|| black_box(model.build().is_ok()));
    });
}

fn fuzzify_benchmark(c: &mut Criterion) {
    let engine = ModelConfig::reference().build().expect("reference model");
    let market = engine.variable(MARKET_INDEX).expect("market index variable");

    c.bench_function("fuzzify_market_index", |b| {
        b.iter(|| black_box(market.fuzzify(black_box(4213.0))));
    });
}

criterion_group!(
    benches,
    evaluate_benchmark,
    build_benchmark,
    fuzzify_benchmark,
);

criterion_main!(benches);
