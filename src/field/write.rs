//! Implement writing to hdf5 file for struct Field
use super::Field3;
use crate::Result;
use hdf5_interface::write_to_hdf5;
use log::info;
use std::path::Path;

impl Field3 {
    /// Write values to a solution file under `name`
    ///
    /// # Errors
    /// File cannot be opened or created.
    pub fn write<P: AsRef<Path>>(&self, filename: P, name: &str) -> Result<()> {
        let filename = filename.as_ref();
        write_to_hdf5(filename, name, None, &self.v)?;
        info!("Wrote {:?} to {:?}", name, filename);
        Ok(())
    }

    /// Write values to a solution file and the grid to a grid file,
    /// both under `name`
    ///
    /// # Errors
    /// Files cannot be opened or created.
    pub fn write_with_grid<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        filename: P,
        gridname: Q,
        name: &str,
    ) -> Result<()> {
        self.grid.write(gridname, name)?;
        self.write(filename, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid3;
    use ndarray::{array, Array3};

    #[test]
    fn test_read_write() {
        let dir = std::env::temp_dir();
        let (fname, gname) = (dir.join("flapwing_test_field.h5"), dir.join("flapwing_test_field_grid.h5"));
        let grid = Grid3::new(array![0., 1., 2.], array![0., 1.], array![0.]);
        let v = Array3::from_shape_fn((1, 2, 3), |(_, j, i)| (i + 10 * j) as f64);
        let field = Field3::from_array(v, grid);
        field.write_with_grid(&fname, &gname, "u").unwrap();
        let read = Field3::read(&fname, &gname, "u").unwrap();
        assert_eq!(read, field);
    }
}
