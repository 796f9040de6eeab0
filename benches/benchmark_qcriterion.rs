use criterion::Criterion;
use criterion::{criterion_group, criterion_main};
use flapwing::field::qcriterion;
use flapwing::{Field3, Grid3};
use ndarray::{Array1, Array3};

const SIZES: [usize; 3] = [32, 64, 128];

pub fn bench_qcriterion(c: &mut Criterion) {
    let mut group = c.benchmark_group("Qcriterion");
    group.significance_level(0.1).sample_size(10);
    for n in SIZES.iter() {
        let x = Array1::linspace(-1., 1., *n);
        let grid = Grid3::new(x.clone(), x.clone(), x);
        let field = |f: fn(f64, f64, f64) -> f64| {
            let v = Array3::from_shape_fn(grid.shape(), |(k, j, i)| f(grid.x[i], grid.y[j], grid.z[k]));
            Field3::from_array(v, grid.clone())
        };
        let u = field(|_, y, z| -y * z.cos());
        let v = field(|x, _, z| x * z.sin());
        let w = field(|x, y, _| x * y);
        let name = format!("Size: {}", *n);
        group.bench_function(&name, |b| b.iter(|| qcriterion(&u, &v, &w)));
    }
    group.finish();
}

criterion_group!(benches, bench_qcriterion);
criterion_main!(benches);
