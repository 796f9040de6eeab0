//! Error type shared by all modules
use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while reading, processing or writing data
#[derive(Error, Debug)]
pub enum Error {
    /// Reading from or writing to hdf5 failed
    #[error("hdf5: {0}")]
    Hdf5(#[from] hdf5_interface::Error),
    /// Plain file i/o failed
    #[error("failed to access {path:?}: {source}")]
    Io {
        /// File which was accessed
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },
    /// YAML configuration could not be parsed or written
    #[error("yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// A row of a text file could not be parsed
    #[error("{path:?}, line {line}: {reason}")]
    Parse {
        /// File which was parsed
        path: PathBuf,
        /// Line number (starting at 1)
        line: usize,
        /// What went wrong
        reason: String,
    },
    /// Neither a number of points nor a target spacing was given
    #[error("regularization needs either a number of points or a target spacing")]
    MissingResolution,
    /// Boundary has too few points to be regularized
    #[error("boundary needs at least two points, got {0}")]
    TooFewPoints(usize),
    /// Rolling and pitching amplitudes are both zero
    #[error("rolling and pitching amplitudes are both zero, frequency is undefined")]
    DegenerateKinematics,
    /// Mesh file has no gridlines for a direction
    #[error("{path:?} has no gridlines along {direction}")]
    MissingDirection {
        /// Mesh file
        path: PathBuf,
        /// Missing direction
        direction: String,
    },
    /// Point to sample lies outside of the probed volume
    #[error("point {point:?} at time {time} lies outside of the volume of {path:?}")]
    OutsideProbe {
        /// Probe file
        path: PathBuf,
        /// Time of the record
        time: f64,
        /// Coordinates of the point
        point: [f64; 3],
    },
    /// Search box of a vortex core holds no gridpoint
    #[error("no gridpoint inside the box {0:?}")]
    EmptyBox([[f64; 2]; 2]),
    /// Probe file does not contain the requested time
    #[error("no record at time {time} for {name:?} in {path:?}")]
    TimeNotFound {
        /// Probe file
        path: PathBuf,
        /// Name of the variable
        name: String,
        /// Requested time
        time: f64,
    },
}

impl Error {
    /// Attach a path to an i/o error
    pub fn io<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
