use criterion::Criterion;
use criterion::{criterion_group, criterion_main};
use flapwing::regularize::Regularizer;
use std::f64::consts::PI;

const SIZES: [usize; 3] = [100, 1000, 10000];

pub fn bench_regularize(c: &mut Criterion) {
    let mut group = c.benchmark_group("Regularize");
    group.significance_level(0.1).sample_size(10);
    for n in SIZES.iter() {
        let theta: Vec<f64> = (0..*n).map(|i| 2. * PI * i as f64 / *n as f64).collect();
        let x: Vec<f64> = theta.iter().map(|t| 0.5 * t.cos()).collect();
        let y: Vec<f64> = theta.iter().map(|t| t.sin()).collect();
        let regularizer = Regularizer::with_points(n / 4);
        let name = format!("Size: {}", *n);
        group.bench_function(&name, |b| b.iter(|| regularizer.regularize(&x, &y)));
    }
    group.finish();
}

criterion_group!(benches, bench_regularize);
criterion_main!(benches);
