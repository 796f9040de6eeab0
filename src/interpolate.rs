//! Piecewise-linear interpolation on rectilinear grids
//!
//! Multi-dimensional interpolation is carried out one axis at a time,
//! which is equivalent to multilinear interpolation.
//!
//! # Example
//! ```
//! use flapwing::interpolate::{interp1d, Extrapolation};
//! let x = [0., 1., 2.];
//! let f = [0., 10., 40.];
//! let fi = interp1d(&x, &f, &[0.5, 1.0, 3.0], Extrapolation::Linear);
//! assert!(fi[0] == 5.);
//! assert!(fi[1] == 10.);
//! assert!(fi[2] == 70.);
//! ```
use crate::grid::Grid3;
use ndarray::{Array, Array1, Array3, ArrayView, ArrayView2, ArrayView3, Axis, Dimension, Zip};

/// Treatment of query points outside of the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Extrapolation {
    /// Use the value at the nearest boundary point
    Clamp,
    /// Extend the first/last interval linearly
    #[default]
    Linear,
}

/// Interval `[lo, hi]` bracketing a query point, and the
/// weight `w` of the upper point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bracket {
    /// Index of lower point
    pub lo: usize,
    /// Index of upper point
    pub hi: usize,
    /// Weight of upper point
    pub w: f64,
}

impl Bracket {
    /// Locate `xi` in the increasing coordinates `x`
    ///
    /// # Panics
    /// `x` is empty.
    pub fn new(x: &[f64], xi: f64, extrapolation: Extrapolation) -> Self {
        assert!(!x.is_empty(), "Cannot interpolate on empty coordinates.");
        let n = x.len();
        if n == 1 {
            return Self { lo: 0, hi: 0, w: 0. };
        }
        let lo = x.partition_point(|v| *v <= xi).saturating_sub(1).min(n - 2);
        let hi = lo + 1;
        let mut w = (xi - x[lo]) / (x[hi] - x[lo]);
        if extrapolation == Extrapolation::Clamp {
            w = w.clamp(0., 1.);
        }
        Self { lo, hi, w }
    }

    /// Interpolate between `f[lo]` and `f[hi]`
    #[inline]
    pub fn eval(&self, f0: f64, f1: f64) -> f64 {
        (1. - self.w) * f0 + self.w * f1
    }
}

/// Interpolate `f(x)` at the points `xi`
///
/// # Panics
/// Length of `x` and `f` differ.
pub fn interp1d(x: &[f64], f: &[f64], xi: &[f64], extrapolation: Extrapolation) -> Array1<f64> {
    assert!(
        x.len() == f.len(),
        "Coordinates and values differ in size: {} != {}.",
        x.len(),
        f.len()
    );
    xi.iter()
        .map(|&p| {
            let b = Bracket::new(x, p, extrapolation);
            b.eval(f[b.lo], f[b.hi])
        })
        .collect()
}

/// Interpolate array `v` along `axis`, from coordinates `x` to `xi`
///
/// # Panics
/// Size of `v` along `axis` differs from length of `x`.
pub fn interpolate_axis<D: Dimension>(
    v: &ArrayView<f64, D>,
    axis: usize,
    x: &[f64],
    xi: &[f64],
    extrapolation: Extrapolation,
) -> Array<f64, D> {
    assert!(
        v.len_of(Axis(axis)) == x.len(),
        "Array has {} points along axis {}, coordinates have {}.",
        v.len_of(Axis(axis)),
        axis,
        x.len()
    );
    let brackets: Vec<Bracket> = xi
        .iter()
        .map(|&p| Bracket::new(x, p, extrapolation))
        .collect();
    let mut shape = v.raw_dim();
    shape[axis] = xi.len();
    let mut out = Array::<f64, D>::zeros(shape);
    Zip::from(v.lanes(Axis(axis)))
        .and(out.lanes_mut(Axis(axis)))
        .par_for_each(|lane, mut lane_out| {
            for (o, b) in lane_out.iter_mut().zip(brackets.iter()) {
                *o = b.eval(lane[b.lo], lane[b.hi]);
            }
        });
    out
}

/// Interpolate field `v` from grid `source` onto grid `target`
///
/// # Panics
/// Shape of `v` does not match `source`.
pub fn interpolate3d(
    v: &ArrayView3<f64>,
    source: &Grid3,
    target: &Grid3,
    extrapolation: Extrapolation,
) -> Array3<f64> {
    assert!(
        v.shape() == source.shape(),
        "Field shape {:?} does not match grid shape {:?}.",
        v.shape(),
        source.shape()
    );
    let mut out = v.to_owned();
    for axis in [2, 1, 0] {
        let x = source.axis(axis).to_vec();
        let xi = target.axis(axis).to_vec();
        out = interpolate_axis(&out.view(), axis, &x, &xi, extrapolation);
    }
    out
}

/// Trilinear interpolation of `v` at the point `(x, y, z)`
///
/// # Panics
/// Shape of `v` does not match `grid`.
pub fn trilinear(
    v: &ArrayView3<f64>,
    grid: &Grid3,
    point: [f64; 3],
    extrapolation: Extrapolation,
) -> f64 {
    assert_grid_shape(v, grid);
    let (x, y, z) = (grid.x.to_vec(), grid.y.to_vec(), grid.z.to_vec());
    trilinear_on(v, [x.as_slice(), y.as_slice(), z.as_slice()], point, extrapolation)
}

/// Trilinear interpolation at many points, given as rows `(n, 3)`
///
/// # Panics
/// Shape of `v` does not match `grid`.
pub fn trilinear_points(
    v: &ArrayView3<f64>,
    grid: &Grid3,
    points: &ArrayView2<f64>,
    extrapolation: Extrapolation,
) -> Array1<f64> {
    assert_grid_shape(v, grid);
    let (x, y, z) = (grid.x.to_vec(), grid.y.to_vec(), grid.z.to_vec());
    let lines = [x.as_slice(), y.as_slice(), z.as_slice()];
    points
        .rows()
        .into_iter()
        .map(|p| trilinear_on(v, lines, [p[0], p[1], p[2]], extrapolation))
        .collect()
}

fn assert_grid_shape(v: &ArrayView3<f64>, grid: &Grid3) {
    assert!(
        v.shape() == grid.shape(),
        "Field shape {:?} does not match grid shape {:?}.",
        v.shape(),
        grid.shape()
    );
}

/// Gridlines are given as `[x, y, z]`
fn trilinear_on(
    v: &ArrayView3<f64>,
    lines: [&[f64]; 3],
    point: [f64; 3],
    extrapolation: Extrapolation,
) -> f64 {
    let bx = Bracket::new(lines[0], point[0], extrapolation);
    let by = Bracket::new(lines[1], point[1], extrapolation);
    let bz = Bracket::new(lines[2], point[2], extrapolation);
    let along_x = |k: usize, j: usize| bx.eval(v[[k, j, bx.lo]], v[[k, j, bx.hi]]);
    let along_y = |k: usize| by.eval(along_x(k, by.lo), along_x(k, by.hi));
    bz.eval(along_y(bz.lo), along_y(bz.hi))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array2};

    fn grid() -> Grid3 {
        Grid3::new(
            array![0.0, 0.3, 1.0, 1.7],
            array![-1.0, 0.0, 0.5],
            array![2.0, 2.2, 3.0],
        )
    }

    fn linear_field(grid: &Grid3) -> Array3<f64> {
        Array3::from_shape_fn(grid.shape(), |(k, j, i)| {
            1.0 + 2.0 * grid.x[i] - 3.0 * grid.y[j] + 0.5 * grid.z[k]
        })
    }

    #[test]
    fn test_identity_at_nodes() {
        let x = [0.0, 0.1, 0.7, 2.0];
        let f = [0.3, -1.7, 11.1, 0.123456789];
        let fi = interp1d(&x, &f, &x, Extrapolation::Linear);
        assert_eq!(fi.to_vec(), f.to_vec());

        let g = grid();
        let v = Array3::from_shape_fn(g.shape(), |(k, j, i)| (k * 100 + j * 10 + i) as f64 * 0.37);
        let vi = interpolate3d(&v.view(), &g, &g, Extrapolation::Clamp);
        assert_eq!(vi, v);
        for (k, zk) in g.z.iter().enumerate() {
            for (j, yj) in g.y.iter().enumerate() {
                for (i, xi) in g.x.iter().enumerate() {
                    let p = trilinear(&v.view(), &g, [*xi, *yj, *zk], Extrapolation::Clamp);
                    assert_eq!(p, v[[k, j, i]]);
                }
            }
        }
    }

    #[test]
    fn test_extrapolation() {
        let x = [0.0, 1.0];
        let f = [1.0, 3.0];
        let lin = interp1d(&x, &f, &[-1.0, 2.0], Extrapolation::Linear);
        let clamp = interp1d(&x, &f, &[-1.0, 2.0], Extrapolation::Clamp);
        assert_eq!(lin, array![-1.0, 5.0]);
        assert_eq!(clamp, array![1.0, 3.0]);
    }

    #[test]
    fn test_single_point_axis() {
        let v = Array3::from_elem((1, 2, 2), 4.0);
        let g = Grid3::new(array![0.0, 1.0], array![0.0, 1.0], array![0.5]);
        let p = trilinear(&v.view(), &g, [0.5, 0.5, 0.7], Extrapolation::Linear);
        assert_eq!(p, 4.0);
    }

    #[test]
    fn test_linear_field_is_reproduced() {
        let g = grid();
        let v = linear_field(&g);
        let target = Grid3::new(
            array![0.1, 0.5, 1.2, 2.0],
            array![-1.2, -0.25, 0.4],
            array![2.1, 2.9],
        );
        let vi = interpolate3d(&v.view(), &g, &target, Extrapolation::Linear);
        let expected = linear_field(&target);
        for (a, b) in vi.iter().zip(expected.iter()) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-12);
        }

        let points: Array2<f64> = array![[0.2, -0.5, 2.5], [1.5, 0.25, 2.1]];
        let p = trilinear_points(&v.view(), &g, &points.view(), Extrapolation::Linear);
        for (pi, row) in p.iter().zip(points.rows()) {
            let exact = 1.0 + 2.0 * row[0] - 3.0 * row[1] + 0.5 * row[2];
            assert_abs_diff_eq!(*pi, exact, epsilon = 1e-12);
        }
    }
}
