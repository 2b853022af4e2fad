use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use descent::math::optimization::{Algorithm, LineSearch, OptimizationConfig, Optimizer};

fn rosenbrock(x: &[f64]) -> f64 {
    (1.0 - x[0]).powi(2) + 100.0 * (x[1] - x[0] * x[0]).powi(2)
}

fn rosenbrock_gradient(x: &[f64]) -> Vec<f64> {
    vec![
        -2.0 * (1.0 - x[0]) - 400.0 * x[0] * (x[1] - x[0] * x[0]),
        200.0 * (x[1] - x[0] * x[0]),
    ]
}

/// Diagonal quadratic whose condition number equals its dimension.
fn scaled_sphere(x: &[f64]) -> f64 {
    x.iter()
        .enumerate()
        .map(|(i, xi)| (i + 1) as f64 * xi * xi)
        .sum()
}

fn scaled_sphere_gradient(x: &[f64]) -> Vec<f64> {
    x.iter()
        .enumerate()
        .map(|(i, xi)| 2.0 * (i + 1) as f64 * xi)
        .collect()
}

const METHODS: [(Algorithm, LineSearch); 4] = [
    (Algorithm::SteepestDescent, LineSearch::CubicInterpolation),
    (Algorithm::SteepestDescent, LineSearch::Exact),
    (Algorithm::ConjugateGradient, LineSearch::CubicInterpolation),
    (Algorithm::ConjugateGradient, LineSearch::Exact),
];

fn bench_rosenbrock(c: &mut Criterion) {
    let mut group = c.benchmark_group("rosenbrock");
    let optimizer = Optimizer::new(OptimizationConfig {
        max_steps: 25_000,
        tolerance: 1e-4,
    })
    .expect("valid config");

    for (algorithm, line_search) in METHODS {
        group.bench_function(format!("{algorithm:?}/{line_search:?}"), |b| {
            b.iter(|| {
                optimizer.minimize(
                    rosenbrock,
                    rosenbrock_gradient,
                    black_box(&[-1.2, 1.0]),
                    algorithm,
                    line_search,
                    false,
                )
            })
        });
    }
    group.finish();
}

fn bench_scaled_sphere(c: &mut Criterion) {
    let mut group = c.benchmark_group("scaled_sphere");
    let optimizer = Optimizer::default();

    for size in [4, 16, 64] {
        let start = vec![1.0; size];
        for (algorithm, line_search) in METHODS {
            group.bench_with_input(
                BenchmarkId::new(format!("{algorithm:?}/{line_search:?}"), size),
                &start,
                |b, start| {
                    b.iter(|| {
                        optimizer.minimize(
                            scaled_sphere,
                            scaled_sphere_gradient,
                            black_box(start),
                            algorithm,
                            line_search,
                            false,
                        )
                    })
                },
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_rosenbrock, bench_scaled_sphere);
criterion_main!(benches);
