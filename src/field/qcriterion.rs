//! Q-criterion of a velocity field
//!
//! Q = 0.5 (|Ω|² - |S|²), with S and Ω the symmetric and antisymmetric
//! parts of the velocity-gradient tensor. Positive values mark
//! rotation-dominated regions.
use super::Field3;
use crate::grid::Grid3;
use ndarray::{Array, ArrayView, Axis, Dimension, Zip};

/// Derivative of `v` along `axis` with coordinates `x`
///
/// Second-order central differences on (possibly non-uniform)
/// interior points, first-order one-sided differences at both ends.
/// An axis with a single point has zero derivative.
///
/// # Panics
/// Size of `v` along `axis` differs from length of `x`.
pub fn gradient<D: Dimension>(v: &ArrayView<f64, D>, x: &[f64], axis: usize) -> Array<f64, D> {
    assert!(
        v.len_of(Axis(axis)) == x.len(),
        "Array has {} points along axis {}, coordinates have {}.",
        v.len_of(Axis(axis)),
        axis,
        x.len()
    );
    let n = x.len();
    let mut out = Array::<f64, D>::zeros(v.raw_dim());
    if n < 2 {
        return out;
    }
    Zip::from(v.lanes(Axis(axis)))
        .and(out.lanes_mut(Axis(axis)))
        .par_for_each(|f, mut df| {
            df[0] = (f[1] - f[0]) / (x[1] - x[0]);
            df[n - 1] = (f[n - 1] - f[n - 2]) / (x[n - 1] - x[n - 2]);
            for i in 1..n - 1 {
                let hs = x[i] - x[i - 1];
                let hd = x[i + 1] - x[i];
                df[i] = (hs * hs * (f[i + 1] - f[i]) + hd * hd * (f[i] - f[i - 1]))
                    / (hs * hd * (hd + hs));
            }
        });
    out
}

/// Q-criterion of the velocity components `u`, `v`, `w`
/// defined on a common grid
///
/// # Panics
/// Components are not defined on the same grid.
pub fn qcriterion(u: &Field3, v: &Field3, w: &Field3) -> Field3 {
    assert!(
        u.grid == v.grid && v.grid == w.grid,
        "Velocity components must be defined on the same grid."
    );
    let grid: &Grid3 = &u.grid;
    let (x, y, z) = (grid.x.to_vec(), grid.y.to_vec(), grid.z.to_vec());
    let grad = |f: &Field3| {
        (
            gradient(&f.v.view(), &x, 2),
            gradient(&f.v.view(), &y, 1),
            gradient(&f.v.view(), &z, 0),
        )
    };
    let (ux, uy, uz) = grad(u);
    let (vx, vy, vz) = grad(v);
    let (wx, wy, wz) = grad(w);

    // 0.5 (|Ω|² - |S|²) = -0.5 tr(G G)
    let mut q = Field3::new(grid);
    Zip::from(&mut q.v)
        .and(&ux)
        .and(&vy)
        .and(&wz)
        .par_for_each(|qi, &a, &b, &c| *qi = -0.5 * (a * a + b * b + c * c));
    Zip::from(&mut q.v)
        .and(&uy)
        .and(&vx)
        .and(&uz)
        .and(&wx)
        .par_for_each(|qi, &a, &b, &c, &d| *qi -= a * b + c * d);
    Zip::from(&mut q.v)
        .and(&vz)
        .and(&wy)
        .par_for_each(|qi, &a, &b| *qi -= a * b);
    q
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array1, Array3};

    fn grid() -> Grid3 {
        Grid3::new(
            array![0.0, 0.1, 0.25, 0.5, 0.6],
            array![-1.0, -0.2, 0.0, 0.3],
            array![0.0, 0.5, 0.75],
        )
    }

    fn field(grid: &Grid3, f: impl Fn(f64, f64, f64) -> f64) -> Field3 {
        let v = Array3::from_shape_fn(grid.shape(), |(k, j, i)| f(grid.x[i], grid.y[j], grid.z[k]));
        Field3::from_array(v, grid.clone())
    }

    #[test]
    fn test_gradient_quadratic_interior() {
        // second order: exact for quadratics in the interior
        let x = array![0.0, 0.1, 0.3, 0.35, 1.0];
        let f: Array1<f64> = x.mapv(|x| 3.0 * x * x - x + 2.0);
        let df = gradient(&f.view(), x.as_slice().unwrap(), 0);
        for i in 1..4 {
            assert_abs_diff_eq!(df[i], 6.0 * x[i] - 1.0, epsilon = 1e-12);
        }
        assert_abs_diff_eq!(df[0], (f[1] - f[0]) / 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_uniform_flow() {
        let g = grid();
        let u = field(&g, |_, _, _| 1.0);
        let v = field(&g, |_, _, _| 0.0);
        let w = field(&g, |_, _, _| 0.0);
        let q = qcriterion(&u, &v, &w);
        assert!(q.v.iter().all(|x| *x == 0.0));
    }

    #[test]
    fn test_solid_body_rotation() {
        let g = grid();
        let omega = 2.0;
        let u = field(&g, |_, y, _| -omega * y);
        let v = field(&g, |x, _, _| omega * x);
        let w = field(&g, |_, _, _| 0.5);
        let q = qcriterion(&u, &v, &w);
        for qi in q.v.iter() {
            assert_abs_diff_eq!(*qi, omega * omega, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_pure_strain() {
        let g = grid();
        let u = field(&g, |x, _, _| x);
        let v = field(&g, |_, y, _| -y);
        let w = field(&g, |_, _, _| 0.0);
        let q = qcriterion(&u, &v, &w);
        for qi in q.v.iter() {
            assert_abs_diff_eq!(*qi, -1.0, epsilon = 1e-10);
        }
    }
}
