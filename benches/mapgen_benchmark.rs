//! Benchmarks for map generation and its building blocks.

#![allow(missing_docs)] // Benchmark macros generate undocumented functions

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use pasture::mapgen::poisson::sample_points;
use pasture::mapgen::{EdgeCost, Triangulation, shortest_path};
use pasture::{GeneratorConfig, generate_seeded};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn bench_generate(c: &mut Criterion) {
    let config = GeneratorConfig::default();
    let mut group = c.benchmark_group("generate_map");
    for size in [64, 128, 256] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| black_box(generate_seeded(size, size, black_box(&config), 42)));
        });
    }
    group.finish();
}

fn bench_triangulate(c: &mut Criterion) {
    // Same point set the default generator sees on a 256×256 map
    let points = sample_points(256, 256, 1000, 4, &mut ChaCha8Rng::seed_from_u64(7));

    c.bench_function("triangulate_poisson", |b| {
        b.iter(|| black_box(Triangulation::new(black_box(&points))));
    });
}

fn bench_route(c: &mut Criterion) {
    let points = sample_points(256, 256, 1000, 4, &mut ChaCha8Rng::seed_from_u64(7));
    let tri = Triangulation::new(&points);
    let map = generate_seeded(256, 256, &GeneratorConfig::default(), 7)
        .unwrap_or_else(|| unreachable!("256×256 is a valid size"));
    let hull = tri.hull();
    let (start, goal) = (hull[0], hull[hull.len() / 2]);

    let mut group = c.benchmark_group("shortest_path");
    for (name, cost) in [
        ("euclidean", EdgeCost::Euclidean),
        ("avoid_water", EdgeCost::AvoidWater { penalty: 100 }),
    ] {
        group.bench_function(name, |b| {
            b.iter(|| black_box(shortest_path(&tri, start, goal, cost, &map)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_generate, bench_triangulate, bench_route);
criterion_main!(benches);
