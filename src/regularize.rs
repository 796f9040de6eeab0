//! # Regularization of boundary points
//!
//! Re-sample a polyline (closed automatically) so that consecutive
//! points are (approximately) equally spaced.
//!
//! # Example
//! ```
//! use flapwing::regularize::Regularizer;
//! let x = [0.0, 1.0, 1.0, 0.0];
//! let y = [0.0, 0.0, 1.0, 1.0];
//! let (xr, yr) = Regularizer::with_spacing(0.25).regularize(&x, &y).unwrap();
//! assert_eq!(xr.len(), 16);
//! assert_eq!((xr[0], yr[0]), (0.0, 0.0));
//! ```
use crate::{Error, Result};
use log::debug;
use ndarray::Array1;

/// Tolerance to decide whether a boundary is already closed
const CLOSED_TOL: f64 = 1e-6;

/// Number of decimal digits the interpolation coefficient is refined to
const MAX_PRECISION: i32 = 6;

/// Return the perimeter of the boundary.
///
/// The first point is appended when first and last
/// points are further apart than `1e-6`.
pub fn perimeter(x: &[f64], y: &[f64]) -> f64 {
    assert!(
        x.len() == y.len(),
        "Coordinate arrays differ in size: {} and {}.",
        x.len(),
        y.len()
    );
    if x.is_empty() {
        return 0.;
    }
    let (xc, yc) = close(x, y, CLOSED_TOL);
    xc.windows(2)
        .zip(yc.windows(2))
        .map(|(xs, ys)| distance(xs[0], ys[0], xs[1], ys[1]))
        .sum()
}

/// Regularize a boundary to a number of points or to a target spacing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Regularizer {
    /// Number of divisions
    pub n: Option<usize>,
    /// Desired segment length
    pub ds: Option<f64>,
    /// Tolerance of the discretization
    pub atol: f64,
}

impl Default for Regularizer {
    fn default() -> Self {
        Self {
            n: None,
            ds: None,
            atol: 1e-6,
        }
    }
}

impl Regularizer {
    /// Regularize to `n` points
    pub fn with_points(n: usize) -> Self {
        Self {
            n: Some(n),
            ..Self::default()
        }
    }

    /// Regularize to a spacing close to `ds`
    pub fn with_spacing(ds: f64) -> Self {
        Self {
            ds: Some(ds),
            ..Self::default()
        }
    }

    /// Set tolerance
    pub fn atol(mut self, atol: f64) -> Self {
        self.atol = atol;
        self
    }

    /// Return the regularized coordinates.
    ///
    /// The spacing is `perimeter / n`, where `n` is either given or
    /// `ceil(perimeter / ds)`. The first point is kept. A projected point
    /// closer than half a spacing to the first point is dropped, so the
    /// output may hold one point less than `n`.
    ///
    /// # Errors
    /// Neither a positive `n` nor a positive finite `ds` is set,
    /// or the boundary has less than two points.
    pub fn regularize(&self, xo: &[f64], yo: &[f64]) -> Result<(Array1<f64>, Array1<f64>)> {
        assert!(
            xo.len() == yo.len(),
            "Coordinate arrays differ in size: {} and {}.",
            xo.len(),
            yo.len()
        );
        if xo.len() < 2 {
            return Err(Error::TooFewPoints(xo.len()));
        }
        let length = perimeter(xo, yo);
        // A zero count or a non-positive spacing counts as not given
        let n = match (
            self.n.filter(|&n| n > 0),
            self.ds.filter(|ds| ds.is_finite() && *ds > 0.),
        ) {
            (Some(n), _) => n,
            (None, Some(ds)) => (length / ds).ceil() as usize,
            (None, None) => return Err(Error::MissingResolution),
        };
        let ds = length / n as f64;
        let atol = self.atol;
        let (xo, yo) = close(xo, yo, atol);

        let last_idx = xo.len() - 1;
        let mut next_idx = 1;
        let mut x = vec![xo[0]];
        let mut y = vec![yo[0]];
        for _ in 1..n {
            if next_idx > last_idx {
                break;
            }
            // Start point
            let (xs, ys) = (x[x.len() - 1], y[y.len() - 1]);
            // End point
            let (mut xe, mut ye) = (xo[next_idx], yo[next_idx]);
            let mut length = distance(xs, ys, xe, ye);
            if (ds - length).abs() <= atol {
                // Copy
                x.push(xe);
                y.push(ye);
                next_idx += 1;
            } else if ds < length {
                // Interpolate between start and end points
                x.push(xs + ds / length * (xe - xs));
                y.push(ys + ds / length * (ye - ys));
            } else {
                // Find the segment which brackets the spacing
                while length < ds && next_idx < last_idx {
                    next_idx += 1;
                    length = distance(xs, ys, xo[next_idx], yo[next_idx]);
                }
                let (xp, yp) = (xo[next_idx - 1], yo[next_idx - 1]);
                xe = xo[next_idx];
                ye = yo[next_idx];
                // Refine the interpolation coefficient digit by digit
                let (mut xn, mut yn) = (xe, ye);
                let mut precision = 1;
                let mut coeff = 0.0;
                while (ds - length).abs() > atol && precision < MAX_PRECISION {
                    xn = xp + coeff * (xe - xp);
                    yn = yp + coeff * (ye - yp);
                    length = distance(xs, ys, xn, yn);
                    if length > ds {
                        coeff -= 0.1_f64.powi(precision);
                        precision += 1;
                    }
                    coeff += 0.1_f64.powi(precision);
                }
                // New point must not be too close to the first point
                if distance(xn, yn, x[0], y[0]) > 0.5 * ds {
                    x.push(xn);
                    y.push(yn);
                } else {
                    debug!("Dropped point ({}, {}) next to the first point", xn, yn);
                }
            }
        }
        Ok((Array1::from(x), Array1::from(y)))
    }
}

/// Regularize a boundary, see [`Regularizer::regularize`]
///
/// # Errors
/// Neither `n` nor `ds` is given.
pub fn regularize(
    x: &[f64],
    y: &[f64],
    n: Option<usize>,
    ds: Option<f64>,
) -> Result<(Array1<f64>, Array1<f64>)> {
    Regularizer {
        n,
        ds,
        ..Regularizer::default()
    }
    .regularize(x, y)
}

/// Append the first point when the boundary is open
fn close(x: &[f64], y: &[f64], atol: f64) -> (Vec<f64>, Vec<f64>) {
    let mut x = x.to_vec();
    let mut y = y.to_vec();
    let (x0, y0) = (x[0], y[0]);
    let (xl, yl) = (x[x.len() - 1], y[y.len() - 1]);
    if (x0 - xl).abs() > atol || (y0 - yl).abs() > atol {
        x.push(x0);
        y.push(y0);
    }
    (x, y)
}

fn distance(xa: f64, ya: f64, xb: f64, yb: f64) -> f64 {
    ((xb - xa).powi(2) + (yb - ya).powi(2)).sqrt()
}
