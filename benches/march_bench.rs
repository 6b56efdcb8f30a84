// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use eikonal_fmm::{
    signed_distance, unsigned_distance, HighAccuracyUniformSpeedSolver, UniformSpeedSolver,
    VaryingSpeedSolver,
};

/// Grid size scaling: unsigned 2D point source at the center.
fn bench_grid_size_scaling_2d(c: &mut Criterion) {
    let mut group = c.benchmark_group("unsigned_2d_point_source");
    for &n in &[128usize, 256, 512] {
        let center = [(n / 2) as i32, (n / 2) as i32];
        group.bench_function(format!("{}x{}", n, n), |b| {
            let solver = UniformSpeedSolver::new([1.0, 1.0], 1.0).unwrap();
            b.iter(|| {
                unsigned_distance(black_box([n, n]), &[center], &[0.0], &solver).unwrap()
            });
        });
    }
    group.finish();
}

/// Solver variant comparison on a fixed 256x256 grid.
fn bench_solver_variants_2d(c: &mut Criterion) {
    let n = 256usize;
    let center = [(n / 2) as i32, (n / 2) as i32];
    let speed_buffer = vec![1.0; n * n];

    let mut group = c.benchmark_group("solver_variants_256x256");
    group.bench_function("first_order_uniform", |b| {
        let solver = UniformSpeedSolver::new([1.0, 1.0], 1.0).unwrap();
        b.iter(|| unsigned_distance(black_box([n, n]), &[center], &[0.0], &solver).unwrap());
    });
    group.bench_function("high_accuracy_uniform", |b| {
        let solver = HighAccuracyUniformSpeedSolver::new([1.0, 1.0], 1.0).unwrap();
        b.iter(|| unsigned_distance(black_box([n, n]), &[center], &[0.0], &solver).unwrap());
    });
    group.bench_function("first_order_varying", |b| {
        let solver = VaryingSpeedSolver::new([1.0, 1.0], [n, n], &speed_buffer).unwrap();
        b.iter(|| unsigned_distance(black_box([n, n]), &[center], &[0.0], &solver).unwrap());
    });
    group.finish();
}

/// Unsigned 3D point source, 64^3.
fn bench_unsigned_3d(c: &mut Criterion) {
    let n = 64usize;
    let center = [(n / 2) as i32; 3];
    c.bench_function("unsigned_3d_64x64x64", |b| {
        let solver = UniformSpeedSolver::new([1.0; 3], 1.0).unwrap();
        b.iter(|| unsigned_distance(black_box([n; 3]), &[center], &[0.0], &solver).unwrap());
    });
}

/// Signed distance to a square contour, 256x256 (two marches plus the
/// topology analysis).
fn bench_signed_2d(c: &mut Criterion) {
    let n = 256usize;
    let (lo, hi) = (64i32, 192i32);
    let mut contour = Vec::new();
    for i in lo..=hi {
        for j in lo..=hi {
            if i == lo || i == hi || j == lo || j == hi {
                contour.push([i, j]);
            }
        }
    }
    let distances = vec![0.0; contour.len()];

    c.bench_function("signed_2d_square_256x256", |b| {
        b.iter(|| {
            signed_distance(
                black_box([n, n]),
                [1.0, 1.0],
                1.0,
                &contour,
                &distances,
            )
            .unwrap()
        });
    });
}

criterion_group!(
    benches,
    bench_grid_size_scaling_2d,
    bench_solver_variants_2d,
    bench_unsigned_3d,
    bench_signed_2d,
);
criterion_main!(benches);
