use criterion::{criterion_group, criterion_main, Criterion};
use point_index::{naive, NearestNeighborIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn generate_points(n: usize, seed: u64) -> Vec<[f64; 2]> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            [
                rng.gen_range(-1000.0..1000.0),
                rng.gen_range(-1000.0..1000.0),
            ]
        })
        .collect()
}

fn construct_index(points: &[[f64; 2]]) -> NearestNeighborIndex<f64> {
    NearestNeighborIndex::build_index(points).unwrap()
}

fn search_batch(index: &NearestNeighborIndex<f64>, queries: &[[f64; 2]]) -> f64 {
    let mut acc = 0.;
    for query in queries {
        acc += index.nearest(query).unwrap().sq_dist;
    }
    acc
}

fn scan_batch(points: &[[f64; 2]], queries: &[[f64; 2]]) -> f64 {
    let mut acc = 0.;
    for query in queries {
        acc += naive::find_nearest(query, points).unwrap()[0];
    }
    acc
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let points = generate_points(10_000, 42);
    let queries = generate_points(1_000, 7);

    c.bench_function("construction (10k points)", |b| {
        b.iter(|| construct_index(&points))
    });

    let index = construct_index(&points);

    c.bench_function("nearest, 1k queries (kdtree)", |b| {
        b.iter(|| search_batch(&index, &queries))
    });

    c.bench_function("nearest, 1k queries (linear scan)", |b| {
        b.iter(|| scan_batch(&points, &queries))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
