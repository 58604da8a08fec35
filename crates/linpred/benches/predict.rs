//! Batch prediction throughput: sequential vs parallel, f32 vs f64, and
//! row-major vs column-major input.
//!
//! Run with: `cargo bench --bench predict`

mod common;

use common::criterion_config::default_criterion;

use linpred::testing::{random_model, random_table};
use linpred::{
    BatchPredictor, DataLayout, Element, LinearModelPredict, Parallelism, Precision,
    PredictionMethod,
};

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

// =============================================================================
// Configurations
// =============================================================================

const BATCH_SIZES: &[usize] = &[100, 1_000, 10_000];
const N_FEATURES: usize = 100;
const N_RESPONSES: usize = 4;

// =============================================================================
// Kernel Benchmarks
// =============================================================================

fn bench_kernel<T: Element>(c: &mut Criterion, label: &str) {
    let model = random_model::<T>(N_FEATURES, N_RESPONSES, 42).unwrap();
    let mut group = c.benchmark_group(format!("predict/kernel/{label}"));

    for &rows in BATCH_SIZES {
        let input = random_table::<T>(rows, N_FEATURES, DataLayout::RowMajor, 7, -5.0, 5.0).unwrap();
        group.throughput(Throughput::Elements(rows as u64));

        group.bench_with_input(BenchmarkId::new("sequential", rows), &input, |b, input| {
            b.iter(|| black_box(model.predict_with(black_box(input), Parallelism::Sequential)))
        });
        group.bench_with_input(BenchmarkId::new("parallel", rows), &input, |b, input| {
            b.iter(|| black_box(model.predict_with(black_box(input), Parallelism::Parallel)))
        });
    }

    group.finish();
}

fn bench_kernel_f32(c: &mut Criterion) {
    bench_kernel::<f32>(c, "f32");
}

fn bench_kernel_f64(c: &mut Criterion) {
    bench_kernel::<f64>(c, "f64");
}

// =============================================================================
// Layout Benchmark
// =============================================================================

fn bench_layout(c: &mut Criterion) {
    let rows = 10_000;
    let model = random_model::<f64>(N_FEATURES, N_RESPONSES, 42).unwrap();
    let mut group = c.benchmark_group("predict/layout");
    group.throughput(Throughput::Elements(rows as u64));

    for layout in [DataLayout::RowMajor, DataLayout::ColumnMajor] {
        let input = random_table::<f64>(rows, N_FEATURES, layout, 7, -5.0, 5.0).unwrap();
        group.bench_with_input(
            BenchmarkId::new("sequential", format!("{layout:?}")),
            &input,
            |b, input| b.iter(|| black_box(model.predict(black_box(input)))),
        );
    }

    group.finish();
}

// =============================================================================
// Predictor Overhead
// =============================================================================

fn bench_predictor(c: &mut Criterion) {
    let rows = 1_000;
    let model = random_model::<f32>(N_FEATURES, N_RESPONSES, 42).unwrap();
    let input = random_table::<f32>(rows, N_FEATURES, DataLayout::RowMajor, 7, -5.0, 5.0).unwrap();

    let mut predictor = BatchPredictor::new(Precision::Single, PredictionMethod::DefaultDense).unwrap();
    predictor.bind_model(model).unwrap();
    predictor.bind_input(input).unwrap();

    let mut group = c.benchmark_group("predict/predictor");
    group.throughput(Throughput::Elements(rows as u64));
    group.bench_function("compute", |b| {
        b.iter(|| {
            predictor.compute().unwrap();
        })
    });
    group.finish();
}

criterion_group! {
    name = benches;
    config = default_criterion();
    targets = bench_kernel_f32, bench_kernel_f64, bench_layout, bench_predictor
}
criterion_main!(benches);
