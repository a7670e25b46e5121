//! # Evaluator Benchmarks
//!
//! Run with: `cargo bench -p storesetup-core`

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use storesetup_core::{
    CatalogStore, CheckFn, MemoryCatalog, StepCompletionEvaluator, store_setup_wizard,
};

/// Evaluator whose only incomplete step is the last one.
fn evaluator_with_tail_gap(size: usize) -> StepCompletionEvaluator<'static> {
    (0..size).fold(StepCompletionEvaluator::new(), |evaluator, i| {
        let complete = i + 1 < size;
        evaluator.with_step(CheckFn::new(format!("step {}", i + 1), move || Ok(complete)))
    })
}

fn bench_next_incomplete_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("next_incomplete_step");

    for size in [4usize, 16, 64] {
        let evaluator = evaluator_with_tail_gap(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &evaluator, |b, ev| {
            b.iter(|| black_box(ev.next_incomplete_step()));
        });
    }

    group.finish();
}

fn bench_default_wizard(c: &mut Criterion) {
    let mut group = c.benchmark_group("default_wizard");

    for products in [0usize, 100, 10_000] {
        let mut catalog = MemoryCatalog::new();
        for i in 0..products {
            // Only the last product is enabled, so the scan sees every row.
            catalog
                .insert_product(&format!("product {}", i), i + 1 == products)
                .expect("insert");
        }
        catalog.insert_carrier("Post", true).expect("insert");

        group.bench_with_input(
            BenchmarkId::from_parameter(products),
            &catalog,
            |b, catalog| {
                b.iter(|| {
                    let evaluator = store_setup_wizard(catalog).expect("build");
                    black_box(evaluator.state())
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_next_incomplete_step, bench_default_wizard);
criterion_main!(benches);
