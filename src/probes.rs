//! Volume probes recorded by the solver
//!
//! A probe file holds the gridlines of the probed sub-volume in the group
//! `mesh` (`x`, `y`, `z`) and one dataset per recorded time in the group
//! named after the field, keyed by the time value.
pub mod volume;
pub use volume::{ProbeVolume, ProbesConfig};

use crate::field::Field3;
use crate::grid::Grid3;
use crate::{Error, Result};
use hdf5_interface::{member_names, read_from_hdf5, variable_exists, write_to_hdf5};
use log::{debug, info};
use ndarray::{Ix1, Ix3};
use std::path::{Path, PathBuf};

/// Name of the group holding the probe gridlines
const MESH: &str = "mesh";

/// Key of a time record
pub fn time_key(time: f64) -> String {
    format!("{:.6}", time)
}

/// Sorted times recorded for `field`, with their keys
///
/// # Errors
/// File or group does not exist.
pub fn probe_records<P: AsRef<Path>>(filename: P, field: &str) -> Result<Vec<(f64, String)>> {
    let mut records: Vec<(f64, String)> = member_names(filename, Some(field))?
        .into_iter()
        .filter_map(|key| key.parse::<f64>().ok().map(|t| (t, key)))
        .collect();
    records.sort_by(|a, b| a.0.total_cmp(&b.0));
    Ok(records)
}

/// Sorted times recorded for `field`
///
/// # Errors
/// File or group does not exist.
pub fn probe_times<P: AsRef<Path>>(filename: P, field: &str) -> Result<Vec<f64>> {
    Ok(probe_records(filename, field)?
        .into_iter()
        .map(|(t, _)| t)
        .collect())
}

/// Gridlines of the probed volume
///
/// # Errors
/// File or mesh group does not exist.
pub fn read_probe_grid<P: AsRef<Path>>(filename: P) -> Result<Grid3> {
    let filename = filename.as_ref();
    Ok(Grid3::new(
        read_from_hdf5::<f64, Ix1, _>(filename, "x", Some(MESH))?,
        read_from_hdf5::<f64, Ix1, _>(filename, "y", Some(MESH))?,
        read_from_hdf5::<f64, Ix1, _>(filename, "z", Some(MESH))?,
    ))
}

/// Records of one field in a probe file
///
/// Times and gridlines are read once, records are then looked up
/// by time.
#[derive(Debug, Clone)]
pub struct ProbeReader {
    path: PathBuf,
    field: String,
    records: Vec<(f64, String)>,
    grid: Grid3,
}

impl ProbeReader {
    /// List the records of `field`
    ///
    /// # Errors
    /// File, field group or mesh group does not exist.
    pub fn open<P: AsRef<Path>>(filename: P, field: &str) -> Result<Self> {
        let path = filename.as_ref().to_path_buf();
        let records = probe_records(&path, field)?;
        let grid = read_probe_grid(&path)?;
        debug!("{:?} holds {} records of {:?}", path, records.len(), field);
        Ok(Self {
            path,
            field: field.to_string(),
            records,
            grid,
        })
    }

    /// Gridlines of the probed volume
    pub fn grid(&self) -> &Grid3 {
        &self.grid
    }

    /// Sorted record times
    pub fn times(&self) -> Vec<f64> {
        self.records.iter().map(|(t, _)| *t).collect()
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// No records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Read the record closest to `time`, together with the time
    /// actually stored
    ///
    /// # Errors
    /// No record lies within `1e-6 * max(1, |time|)` of `time`, or the
    /// file cannot be read.
    pub fn read(&self, time: f64) -> Result<(f64, Field3)> {
        let tol = 1e-6 * time.abs().max(1.0);
        let i = self.records.partition_point(|(t, _)| *t < time);
        let closest = [i.checked_sub(1), Some(i)]
            .into_iter()
            .flatten()
            .filter_map(|j| self.records.get(j))
            .min_by(|a, b| (a.0 - time).abs().total_cmp(&(b.0 - time).abs()))
            .filter(|(t, _)| (t - time).abs() <= tol);
        let (t, key) = closest.ok_or_else(|| Error::TimeNotFound {
            path: self.path.clone(),
            name: self.field.clone(),
            time,
        })?;
        debug!("Reading {}/{} from {:?}", self.field, key, self.path);
        let v = read_from_hdf5::<f64, Ix3, _>(&self.path, key, Some(&self.field))?;
        Ok((*t, Field3::from_array(v, self.grid.clone())))
    }
}

/// Read the record of `field` closest to `time`, see [`ProbeReader::read`]
///
/// # Errors
/// No record matches `time`, or the file cannot be read.
pub fn read_probe<P: AsRef<Path>>(filename: P, field: &str, time: f64) -> Result<(f64, Field3)> {
    ProbeReader::open(filename, field)?.read(time)
}

/// Append a record of `field` at `time`; the gridlines are written
/// on first use
///
/// # Errors
/// File cannot be opened or created.
pub fn write_probe<P: AsRef<Path>>(filename: P, field: &str, time: f64, data: &Field3) -> Result<()> {
    let filename = filename.as_ref();
    let has_mesh = filename.exists() && variable_exists(filename, "x", Some(MESH))?;
    if !has_mesh {
        write_to_hdf5(filename, "x", Some(MESH), &data.grid.x)?;
        write_to_hdf5(filename, "y", Some(MESH), &data.grid.y)?;
        write_to_hdf5(filename, "z", Some(MESH), &data.grid.z)?;
    } else {
        assert!(
            read_probe_grid(filename)? == data.grid,
            "Record does not match the gridlines stored in {:?}.",
            filename
        );
    }
    write_to_hdf5(filename, &time_key(time), Some(field), &data.v)?;
    info!("[t = {:.6}] Wrote probe {:?} to {:?}", time, field, filename);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array3};

    fn record(value: f64) -> Field3 {
        let grid = Grid3::new(array![1.0], array![-1.0, 0.0, 1.0], array![0.5, 0.6]);
        Field3::from_array(Array3::from_elem((2, 3, 1), value), grid)
    }

    #[test]
    fn test_write_read() {
        let path = std::env::temp_dir().join("flapwing_test_probe.h5");
        let _ = std::fs::remove_file(&path);
        for (i, t) in [0.25, 0.5, 0.125].iter().enumerate() {
            write_probe(&path, "u", *t, &record(i as f64)).unwrap();
        }
        assert_eq!(probe_times(&path, "u").unwrap(), vec![0.125, 0.25, 0.5]);

        let (t, field) = read_probe(&path, "u", 0.5 + 1e-8).unwrap();
        assert_eq!(t, 0.5);
        assert_eq!(field, record(1.0));

        assert!(matches!(
            read_probe(&path, "u", 0.3),
            Err(Error::TimeNotFound { .. })
        ));
    }

    #[test]
    fn test_reader_lookup() {
        let path = std::env::temp_dir().join("flapwing_test_probe_reader.h5");
        let _ = std::fs::remove_file(&path);
        let times = [0.0, 0.1, 0.2, 0.3, 0.4];
        for (i, t) in times.iter().enumerate() {
            write_probe(&path, "v", *t, &record(i as f64)).unwrap();
        }
        let reader = ProbeReader::open(&path, "v").unwrap();
        assert_eq!(reader.len(), 5);
        assert_eq!(reader.times(), times.to_vec());
        assert_eq!(reader.grid(), &record(0.0).grid);
        // Closest record on either side of the query
        for (i, t) in times.iter().enumerate() {
            for query in [t - 5e-7, *t, t + 5e-7] {
                let (found, field) = reader.read(query).unwrap();
                assert_eq!(found, *t);
                assert_eq!(field, record(i as f64));
            }
        }
        for query in [-0.05, 0.15, 0.5] {
            assert!(matches!(reader.read(query), Err(Error::TimeNotFound { .. })));
        }
    }
}
