//! Criterion benchmarks for the genetist engine.
//!
//! Uses synthetic objectives (Sphere over float genes, multi-objective
//! trade-off) to measure engine overhead independent of any model.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use genetist::ga::{Concurrency, Crossover, Direction, EnvironmentConfig, OptimizeOptions};
use genetist::{BoxError, Environment, Params, SearchSpace};

// ===========================================================================
// Problems
// ===========================================================================

fn sphere_space(dim: usize) -> SearchSpace {
    (0..dim)
        .fold(SearchSpace::builder(), |b, i| b.float(format!("x{i}"), -5.0, 5.0))
        .build()
        .expect("valid sphere space")
}

fn sphere(p: &Params) -> Result<f64, BoxError> {
    Ok(p.values().filter_map(|v| v.as_f64()).map(|x| x * x).sum())
}

fn tradeoff(p: &Params) -> Result<(f64, f64), BoxError> {
    let xs: Vec<f64> = p.values().filter_map(|v| v.as_f64()).collect();
    let cost: f64 = xs.iter().map(|x| x * x).sum();
    let reach: f64 = xs.iter().map(|x| (x - 2.0).abs()).sum();
    Ok((cost, -reach))
}

fn env(dim: usize, pop: usize, crossover: Crossover) -> Environment {
    let config = EnvironmentConfig::default()
        .with_population_size(pop)
        .with_crossover(crossover)
        .with_seed(42)
        .with_verbose(0);
    Environment::new(sphere_space(dim), config).expect("valid environment")
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_ga_sphere(c: &mut Criterion) {
    let mut group = c.benchmark_group("ga_sphere");
    group.sample_size(10);

    for (dim, pop, gen) in [(10usize, 50usize, 50usize), (50, 100, 30), (100, 100, 20)] {
        let env = env(dim, pop, Crossover::Uniform);
        let options = OptimizeOptions::minimize().with_max_generations(gen);
        group.bench_with_input(
            BenchmarkId::new(format!("d{}_p{}_g{}", dim, pop, gen), dim),
            &(env, options),
            |b, (e, o)| {
                b.iter(|| {
                    let result = e.optimize(sphere, black_box(o));
                    black_box(result)
                })
            },
        );
    }
    group.finish();
}

fn bench_ga_sphere_parallel(c: &mut Criterion) {
    let mut group = c.benchmark_group("ga_sphere_parallel");
    group.sample_size(10);

    for threads in [1usize, 2, 4] {
        let env = env(50, 100, Crossover::TwoPoint);
        let options = OptimizeOptions::minimize()
            .with_max_generations(20)
            .with_concurrency(Concurrency::Threads(threads));
        group.bench_with_input(BenchmarkId::from_parameter(threads), &(env, options), |b, (e, o)| {
            b.iter(|| black_box(e.optimize(sphere, black_box(o))))
        });
    }
    group.finish();
}

fn bench_ga_multi_objective(c: &mut Criterion) {
    let mut group = c.benchmark_group("ga_multi_objective");
    group.sample_size(10);

    for pop in [50usize, 200] {
        let env = env(20, pop, Crossover::OnePoint);
        let options = OptimizeOptions::new([Direction::Minimize, Direction::Maximize])
            .with_weights([0.7, 0.3])
            .with_max_generations(20);
        group.bench_with_input(BenchmarkId::from_parameter(pop), &(env, options), |b, (e, o)| {
            b.iter(|| black_box(e.optimize(tradeoff, black_box(o))))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_ga_sphere,
    bench_ga_sphere_parallel,
    bench_ga_multi_objective
);
criterion_main!(benches);
