//! # Scalar field on a rectilinear grid
//!
//! Field arrays are stored with shape `(nz, ny, nx)`.
pub mod qcriterion;
pub mod read;
pub mod write;
pub use qcriterion::{gradient, qcriterion};

use crate::grid::Grid3;
use crate::interpolate::{interpolate3d, trilinear_points, Extrapolation};
use ndarray::{Array1, Array3, ArrayView2};

/// Field struct
///
/// v: ndarray
///
///   Values at the grid points
///
/// grid: Grid3
///
///   Gridlines the values are defined on
#[derive(Debug, Clone, PartialEq)]
pub struct Field3 {
    /// Values `(nz, ny, nx)`
    pub v: Array3<f64>,
    /// Grid
    pub grid: Grid3,
}

impl Field3 {
    /// Zero-initialized field on `grid`
    pub fn new(grid: &Grid3) -> Self {
        Self {
            v: Array3::zeros(grid.shape()),
            grid: grid.clone(),
        }
    }

    /// Field from values and grid
    ///
    /// # Panics
    /// Shape of `v` does not match the grid.
    pub fn from_array(v: Array3<f64>, grid: Grid3) -> Self {
        assert!(
            v.shape() == grid.shape(),
            "Field shape {:?} does not match grid shape {:?}.",
            v.shape(),
            grid.shape()
        );
        Self { v, grid }
    }

    /// Linearly interpolate the field onto another grid
    pub fn interpolate(&self, target: &Grid3, extrapolation: Extrapolation) -> Self {
        Self {
            v: interpolate3d(&self.v.view(), &self.grid, target, extrapolation),
            grid: target.clone(),
        }
    }

    /// Trilinear interpolation at points `(n, 3)`
    pub fn at_points(&self, points: &ArrayView2<f64>, extrapolation: Extrapolation) -> Array1<f64> {
        trilinear_points(&self.v.view(), &self.grid, points, extrapolation)
    }

    /// Smallest and largest value
    pub fn min_max(&self) -> (f64, f64) {
        self.v
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
                (lo.min(x), hi.max(x))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_interpolate_staggered_to_centers() {
        let grid_u = Grid3::new(array![0., 1., 2.], array![0.5, 1.5], array![0.5]);
        let grid_p = Grid3::new(array![0.5, 1.5], array![0.5, 1.5], array![0.5]);
        let u = Field3::from_array(array![[[0., 2., 4.], [1., 3., 5.]]], grid_u);
        let uc = u.interpolate(&grid_p, Extrapolation::Linear);
        assert_eq!(uc.v, array![[[1., 3.], [2., 4.]]]);
        assert_eq!(uc.grid, grid_p);
        assert_eq!(uc.min_max(), (1., 4.));
    }

    #[test]
    #[should_panic]
    fn test_shape_mismatch() {
        let grid = Grid3::new(array![0., 1.], array![0.], array![0.]);
        let _ = Field3::from_array(Array3::zeros((1, 1, 3)), grid);
    }
}
