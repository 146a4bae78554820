//! Criterion benchmarks for the WSP pipeline.
//!
//! Measures encoding alone and the full encode-solve pipeline over
//! generated workloads, for both encoder variants.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use wsp_kit::adapter::solve_instance;
use wsp_kit::cp::{BacktrackSolver, SolverConfig};
use wsp_kit::encoder::{encode, EncoderVariant};
use wsp_kit::instance::{GeneratorConfig, Instance};

fn workload(steps: usize, seed: u64) -> Instance {
    GeneratorConfig::default()
        .with_steps(steps)
        .with_users(steps * 2)
        .with_density(0.4)
        .with_not_equals(steps / 2)
        .with_at_most(1)
        .with_sual(1)
        .with_wang_li(1)
        .with_assignment_dependent(1)
        .with_seed(seed)
        .generate()
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    for steps in [4, 6, 8] {
        let instance = workload(steps, 7);
        for (name, variant) in [
            ("direct", EncoderVariant::Direct),
            ("relational", EncoderVariant::Relational),
        ] {
            group.bench_with_input(
                BenchmarkId::new(name, steps),
                &instance,
                |b, instance| {
                    b.iter(|| encode(black_box(instance), variant));
                },
            );
        }
    }
    group.finish();
}

fn bench_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("solve");
    group.sample_size(10);
    let solver = BacktrackSolver::new();
    let config = SolverConfig::default().with_time_limit_ms(10_000);

    for steps in [4, 6] {
        let instance = workload(steps, 7);
        for (name, variant) in [
            ("direct", EncoderVariant::Direct),
            ("relational", EncoderVariant::Relational),
        ] {
            group.bench_with_input(
                BenchmarkId::new(name, steps),
                &instance,
                |b, instance| {
                    b.iter(|| {
                        solve_instance(black_box(instance), variant, &solver, &config).unwrap()
                    });
                },
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_encode, bench_solve);
criterion_main!(benches);
