//! Positions of the wake vortices in cross-flow slices
//!
//! The streamwise vorticity is sliced at given x-locations. In each
//! slice a vortex core is the point with the smallest (or largest)
//! value inside a search box, and the distance of a pair of vortices
//! is measured along z.
//!
//! Slices are stored with shape `(ny, nz)`; the horizontal coordinate
//! is z, the vertical one is y.
use crate::field::Field3;
use crate::interpolate::{interpolate_axis, Extrapolation};
use crate::{Error, Result};
use log::debug;
use ndarray::{s, Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Cross-flow slice of a field at constant x
#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    /// Horizontal coordinates (z)
    pub h: Array1<f64>,
    /// Vertical coordinates (y)
    pub v: Array1<f64>,
    /// Values `(nv, nh)`
    pub values: Array2<f64>,
}

/// Point of a slice
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    /// Horizontal coordinate
    pub h: f64,
    /// Vertical coordinate
    pub v: f64,
}

/// Value which marks a vortex core
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Extreme {
    /// Smallest value (negative vorticity)
    Min,
    /// Largest value (positive vorticity)
    Max,
}

impl Slice {
    /// Slice `field` at `xloc`; the z-coordinates are shifted by
    /// `-z_shift`
    pub fn at_x(field: &Field3, xloc: f64, z_shift: f64) -> Self {
        let g = &field.grid;
        let v = interpolate_axis(
            &field.v.view(),
            2,
            &g.x.to_vec(),
            &[xloc],
            Extrapolation::Linear,
        );
        // (nz, ny) -> (ny, nz)
        let values = v.index_axis(Axis(2), 0).t().to_owned();
        Self {
            h: g.z.mapv(|z| z - z_shift),
            v: g.y.clone(),
            values,
        }
    }

    /// Part of the slice inside `bounds = [[h0, h1], [v0, v1]]`
    ///
    /// Indices follow a left-sided search: the lower bound is
    /// included, the upper bound is not.
    pub fn within(&self, bounds: [[f64; 2]; 2]) -> Self {
        let left = |x: &Array1<f64>, value: f64| x.iter().take_while(|&&xi| xi < value).count();
        let (i0, i1) = (left(&self.h, bounds[0][0]), left(&self.h, bounds[0][1]));
        let (j0, j1) = (left(&self.v, bounds[1][0]), left(&self.v, bounds[1][1]));
        let (i1, j1) = (i1.max(i0), j1.max(j0));
        Self {
            h: self.h.slice(s![i0..i1]).to_owned(),
            v: self.v.slice(s![j0..j1]).to_owned(),
            values: self.values.slice(s![j0..j1, i0..i1]).to_owned(),
        }
    }

    /// Location of the smallest or the largest value, `None` for an
    /// empty slice
    pub fn extreme(&self, extreme: Extreme) -> Option<Point2> {
        let better = |a: f64, b: f64| match extreme {
            Extreme::Min => a < b,
            Extreme::Max => a > b,
        };
        let mut best: Option<((usize, usize), f64)> = None;
        for ((j, i), &value) in self.values.indexed_iter() {
            match best {
                Some((_, b)) if !better(value, b) => {}
                _ => best = Some(((j, i), value)),
            }
        }
        best.map(|((j, i), _)| Point2 {
            h: self.h[i],
            v: self.v[j],
        })
    }
}

/// Search box of a vortex core
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VortexBox {
    /// Limits `[[z0, z1], [y0, y1]]`
    #[serde(rename = "box")]
    pub bounds: [[f64; 2]; 2],
    /// Value marking the core
    pub extreme: Extreme,
}

impl VortexBox {
    fn new(bounds: [[f64; 2]; 2], extreme: Extreme) -> Self {
        Self { bounds, extreme }
    }

    /// Vortex core of `slice` inside the box
    ///
    /// # Errors
    /// No gridpoint of the slice lies inside the box.
    pub fn locate(&self, slice: &Slice) -> Result<Point2> {
        let point = slice
            .within(self.bounds)
            .extreme(self.extreme)
            .ok_or(Error::EmptyBox(self.bounds))?;
        debug!("{:?} in {:?} at {:?}", self.extreme, self.bounds, point);
        Ok(point)
    }
}

/// Pair of vortices whose spanwise distance is measured
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VortexPair {
    /// Label of the distance
    pub name: String,
    /// Index of the slice (into the x-locations)
    pub slice: usize,
    /// First vortex
    pub first: VortexBox,
    /// Second vortex
    pub second: VortexBox,
}

impl VortexPair {
    /// Distance along z between the two cores
    ///
    /// # Errors
    /// A search box holds no gridpoint.
    ///
    /// # Panics
    /// Slice index is out of range.
    pub fn distance(&self, slices: &[Slice]) -> Result<f64> {
        let slice = &slices[self.slice];
        let p1 = self.first.locate(slice)?;
        let p2 = self.second.locate(slice)?;
        Ok((p2.h - p1.h).abs())
    }
}

/// Slices and vortex pairs of the distance measurement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WxDistances {
    /// Time (in flapping periods)
    pub time: f64,
    /// Slice locations (x/c)
    pub xlocs: Vec<f64>,
    /// Measured pairs
    pub pairs: Vec<VortexPair>,
}

impl Default for WxDistances {
    fn default() -> Self {
        use Extreme::{Max, Min};
        let pair = |name: &str, slice: usize, first: VortexBox, second: VortexBox| VortexPair {
            name: name.to_string(),
            slice,
            first,
            second,
        };
        Self {
            time: 4.25,
            xlocs: vec![0.3, 1.3],
            pairs: vec![
                pair(
                    "d1",
                    0,
                    VortexBox::new([[-0.6, -0.4], [-0.4, 0.1]], Max),
                    VortexBox::new([[0.0, 0.5], [-0.8, -0.2]], Max),
                ),
                pair(
                    "d2",
                    0,
                    VortexBox::new([[0.1, 0.5], [-1.0, -0.6]], Min),
                    VortexBox::new([[-0.5, 0.4], [-0.35, -0.1]], Min),
                ),
                pair(
                    "d3",
                    1,
                    VortexBox::new([[-0.2, 0.2], [0.2, 0.9]], Max),
                    VortexBox::new([[0.1, 0.4], [0.25, 0.65]], Min),
                ),
                pair(
                    "d4",
                    1,
                    VortexBox::new([[-0.6, -0.1], [0.3, 0.9]], Min),
                    VortexBox::new([[0.3, 0.8], [0.7, 1.3]], Max),
                ),
            ],
        }
    }
}

impl WxDistances {
    /// Slice the streamwise vorticity at the x-locations; z is measured
    /// from the middle of the span `z_mid`
    pub fn slices(&self, wx: &Field3, z_mid: f64) -> Vec<Slice> {
        self.xlocs
            .iter()
            .map(|&xloc| Slice::at_x(wx, xloc, z_mid))
            .collect()
    }

    /// Distance of each pair, labelled
    ///
    /// # Errors
    /// A search box holds no gridpoint.
    ///
    /// # Panics
    /// A pair refers to a missing slice.
    pub fn measure(&self, wx: &Field3, z_mid: f64) -> Result<Vec<(String, f64)>> {
        let slices = self.slices(wx, z_mid);
        self.pairs
            .iter()
            .map(|pair| Ok((pair.name.clone(), pair.distance(&slices)?)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid3;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array3};

    /// Two Gaussian vortices of opposite sign at z = -0.5 and z = 0.25
    /// (y = 0), constant along x
    fn vortices() -> Field3 {
        let lin = |a: f64, b: f64, n: usize| Array1::linspace(a, b, n);
        let grid = Grid3::new(lin(0., 2., 5), lin(-1., 1., 41), lin(0., 2., 81));
        let v = Array3::from_shape_fn(grid.shape(), |(k, j, _)| {
            let (y, z) = (grid.y[j], grid.z[k] - 1.);
            let g = |zc: f64| (-((z - zc).powi(2) + y * y) / 0.02).exp();
            g(-0.5) - g(0.25)
        });
        Field3::from_array(v, grid)
    }

    #[test]
    fn test_slice_orientation() {
        let grid = Grid3::new(array![0., 1.], array![0., 1., 2.], array![10., 20.]);
        let v = Array3::from_shape_fn(grid.shape(), |(k, j, i)| (100 * k + 10 * j + i) as f64);
        let slice = Slice::at_x(&Field3::from_array(v, grid), 0.5, 10.);
        assert_eq!(slice.h, array![0., 10.]);
        assert_eq!(slice.v, array![0., 1., 2.]);
        assert_eq!(slice.values.shape(), &[3, 2]);
        assert_eq!(slice.values[[2, 1]], 120.5);
    }

    #[test]
    fn test_within_box() {
        let slice = Slice {
            h: array![0., 1., 2., 3.],
            v: array![0., 1., 2.],
            values: Array2::from_shape_fn((3, 4), |(j, i)| (10 * j + i) as f64),
        };
        let part = slice.within([[1., 3.], [0.5, 2.5]]);
        assert_eq!(part.h, array![1., 2.]);
        assert_eq!(part.v, array![1., 2.]);
        assert_eq!(part.values, array![[11., 12.], [21., 22.]]);
        assert_eq!(part.extreme(Extreme::Min), Some(Point2 { h: 1., v: 1. }));
        assert_eq!(part.extreme(Extreme::Max), Some(Point2 { h: 2., v: 2. }));
        assert_eq!(slice.within([[5., 6.], [0., 1.]]).extreme(Extreme::Max), None);
    }

    #[test]
    fn test_pair_distance() {
        let wx = vortices();
        let config = WxDistances {
            time: 0.,
            xlocs: vec![1.3],
            pairs: vec![VortexPair {
                name: "d".to_string(),
                slice: 0,
                first: VortexBox::new([[-1., 0.], [-0.5, 0.5]], Extreme::Max),
                second: VortexBox::new([[0., 1.], [-0.5, 0.5]], Extreme::Min),
            }],
        };
        let d = config.measure(&wx, 1.).unwrap();
        assert_eq!(d[0].0, "d");
        assert_abs_diff_eq!(d[0].1, 0.75, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_box() {
        let wx = vortices();
        let slices = WxDistances::default().slices(&wx, 1.);
        let b = VortexBox::new([[5., 6.], [0., 1.]], Extreme::Min);
        assert!(matches!(b.locate(&slices[0]), Err(Error::EmptyBox(_))));
    }

    #[test]
    fn test_default_yaml() {
        let config = WxDistances::default();
        let s = serde_yaml::to_string(&config).unwrap();
        assert!(s.contains("extreme: max"));
        let back: WxDistances = serde_yaml::from_str(&s).unwrap();
        assert_eq!(back, config);
        assert_eq!(back.pairs.len(), 4);
    }
}
