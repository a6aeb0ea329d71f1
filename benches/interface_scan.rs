use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ndarray::Array1;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;

use flowfield::{DetectorConfig, Grid, GridBuilder, GridInfo, InterfaceDetector};

fn noisy_grid(n: usize) -> Grid {
    let mass: Array1<f64> = Array1::random(n * n, Uniform::new(0., 10.));
    let xs: Vec<f64> = (0..n * n).map(|k| (k % n) as f64).collect();
    let ys: Vec<f64> = (0..n * n).map(|k| (k / n) as f64).collect();

    let info = GridInfo::default()
        .with_shape(n, n)
        .unwrap()
        .with_spacing(1., 1.)
        .unwrap()
        .with_origin(0., 0.)
        .unwrap();

    GridBuilder::new()
        .field("X", xs)
        .field("Y", ys)
        .field("M", mass)
        .info(info)
        .build()
        .unwrap()
}

fn scan(grid: &Grid, config: &DetectorConfig) -> usize {
    InterfaceDetector::new(grid, "M", config)
        .unwrap()
        .layers()
        .count()
}

fn interface_scan_bench(c: &mut Criterion) {
    let grid = noisy_grid(100);
    let config = DetectorConfig::default().with_cutoff(5.);

    c.bench_function("interface scan 100", |b| {
        b.iter(|| scan(black_box(&grid), &config))
    });

    let periodic = config.clone().periodic(true);
    c.bench_function("periodic interface scan 100", |b| {
        b.iter(|| scan(black_box(&grid), &periodic))
    });

    let wide = config.with_radius(3.).with_min_neighbors(4);
    c.bench_function("interface scan 100 radius 3", |b| {
        b.iter(|| scan(black_box(&grid), &wide))
    });
}

criterion_group!(benches, interface_scan_bench);
criterion_main!(benches);
