//! Rectilinear grids of the staggered solver output
//!
//! Grid files hold one group per field (`u`, `v`, `w`, `p`, `wx`, ...),
//! each group with the datasets `x`, `y` and `z`.
pub mod stretching;
pub use stretching::{resize_for_uniform, GridlineConfig, Segment, SubDomain};

use crate::{Error, Result};
use hdf5_interface::{read_from_hdf5, write_to_hdf5};
use log::info;
use ndarray::{Array1, Ix1};
use std::fmt;
use std::path::Path;

/// Gridlines along x, y and z
#[derive(Debug, Clone, PartialEq)]
pub struct Grid3 {
    /// Gridline x-coordinates
    pub x: Array1<f64>,
    /// Gridline y-coordinates
    pub y: Array1<f64>,
    /// Gridline z-coordinates
    pub z: Array1<f64>,
}

impl Grid3 {
    /// Grid from coordinate arrays
    pub fn new(x: Array1<f64>, y: Array1<f64>, z: Array1<f64>) -> Self {
        Self { x, y, z }
    }

    /// Grid from the gridline configuration of x, y and z
    pub fn from_configs(configs: &[GridlineConfig; 3]) -> Self {
        Self {
            x: configs[0].gridlines(),
            y: configs[1].gridlines(),
            z: configs[2].gridlines(),
        }
    }

    /// Grid described by a mesh YAML file, a list of gridline
    /// configurations for the directions `x`, `y` and `z` in any order
    ///
    /// # Errors
    /// File cannot be read, is not valid, or misses a direction.
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let mut configs: Vec<GridlineConfig> = serde_yaml::from_str(&content)?;
        let mut take = |direction: &str| -> Result<GridlineConfig> {
            let i = configs
                .iter()
                .position(|c| c.direction == direction)
                .ok_or_else(|| Error::MissingDirection {
                    path: path.to_path_buf(),
                    direction: direction.to_string(),
                })?;
            Ok(configs.swap_remove(i))
        };
        let configs = [take("x")?, take("y")?, take("z")?];
        info!("Read mesh {:?}", path);
        Ok(Self::from_configs(&configs))
    }

    /// Shape of a field defined on this grid, `[nz, ny, nx]`
    pub fn shape(&self) -> [usize; 3] {
        [self.z.len(), self.y.len(), self.x.len()]
    }

    /// Total number of points
    pub fn size(&self) -> usize {
        self.x.len() * self.y.len() * self.z.len()
    }

    /// Coordinates along axis of the field array (0 = z, 1 = y, 2 = x)
    pub fn axis(&self, axis: usize) -> &Array1<f64> {
        match axis {
            0 => &self.z,
            1 => &self.y,
            2 => &self.x,
            _ => panic!("Axis must be 0, 1 or 2, got {}.", axis),
        }
    }

    /// Point `(x, y, z)` lies inside the grid or on its boundary
    pub fn contains(&self, point: [f64; 3]) -> bool {
        [&self.x, &self.y, &self.z]
            .iter()
            .zip(point)
            .all(|(v, p)| match (v.first(), v.last()) {
                (Some(lo), Some(hi)) => *lo <= p && p <= *hi,
                _ => false,
            })
    }

    /// Grid made of the midpoints of the gridlines
    pub fn cell_centers(&self) -> Self {
        let mid = |v: &Array1<f64>| -> Array1<f64> {
            v.windows(2).into_iter().map(|w| 0.5 * (w[0] + w[1])).collect()
        };
        Self {
            x: mid(&self.x),
            y: mid(&self.y),
            z: mid(&self.z),
        }
    }

    /// Read grid of field `name`
    ///
    /// # Errors
    /// File or group does not exist.
    pub fn read<P: AsRef<Path>>(filename: P, name: &str) -> Result<Self> {
        let filename = filename.as_ref();
        let x = read_from_hdf5::<f64, Ix1, _>(filename, "x", Some(name))?;
        let y = read_from_hdf5::<f64, Ix1, _>(filename, "y", Some(name))?;
        let z = read_from_hdf5::<f64, Ix1, _>(filename, "z", Some(name))?;
        Ok(Self { x, y, z })
    }

    /// Write grid of field `name`
    ///
    /// # Errors
    /// File cannot be opened or created.
    pub fn write<P: AsRef<Path>>(&self, filename: P, name: &str) -> Result<()> {
        let filename = filename.as_ref();
        write_to_hdf5(filename, "x", Some(name), &self.x)?;
        write_to_hdf5(filename, "y", Some(name), &self.y)?;
        write_to_hdf5(filename, "z", Some(name), &self.z)?;
        info!("Wrote grid {:?} to {:?}", name, filename);
        Ok(())
    }
}

impl fmt::Display for Grid3 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (label, v) in [("x", &self.x), ("y", &self.y), ("z", &self.z)] {
            let first = v.first().copied().unwrap_or(f64::NAN);
            let last = v.last().copied().unwrap_or(f64::NAN);
            writeln!(f, "{}: [{}, {}] ({} points)", label, first, last, v.len())?;
        }
        write!(f, "size: {}", self.size())
    }
}
