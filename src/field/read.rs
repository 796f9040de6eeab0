//! Implement reading from hdf5 file for struct Field
use super::Field3;
use crate::grid::Grid3;
use crate::Result;
use hdf5_interface::read_from_hdf5;
use log::info;
use ndarray::Ix3;
use std::path::Path;

impl Field3 {
    /// Read field `name` from a solution file, with its grid
    /// read from the grid file
    ///
    /// # Errors
    /// Files or datasets do not exist.
    ///
    /// # Panics
    /// Shape of the stored field does not match its grid.
    pub fn read<P: AsRef<Path>, Q: AsRef<Path>>(filename: P, gridname: Q, name: &str) -> Result<Self> {
        let grid = Grid3::read(gridname, name)?;
        Self::read_on_grid(filename, name, grid)
    }

    /// Read field `name` from a solution file which is defined on `grid`
    ///
    /// # Errors
    /// File or dataset does not exist.
    ///
    /// # Panics
    /// Shape of the stored field does not match the grid.
    pub fn read_on_grid<P: AsRef<Path>>(filename: P, name: &str, grid: Grid3) -> Result<Self> {
        let filename = filename.as_ref();
        let v = read_from_hdf5::<f64, Ix3, _>(filename, name, None)?;
        info!("Read {:?} from {:?}", name, filename);
        Ok(Self::from_array(v, grid))
    }
}
