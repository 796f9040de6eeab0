//! Run configuration read from `<simudir>/flapwing.yaml`
//!
//! ```yaml
//! kinematics:
//!   St: 0.6
//!   psi: 110.0
//!   nt_period: 2000
//! timesteps: [8500, 9000]
//! averaging: [4.0, 5.0]
//! ```
use crate::kinematics::KinematicsParams;
use crate::vortex::WxDistances;
use crate::{Error, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the configuration file inside a simulation directory
pub const CONFIG_FILE: &str = "flapwing.yaml";

/// Paths of digitized reference data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReferenceData {
    /// Thrust coefficient history `(t/T, C_T)`
    pub thrust: Option<PathBuf>,
    /// Lift coefficient history `(t/T, C_L)`
    pub lift: Option<PathBuf>,
}

/// Configuration of a post-processing run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Wing kinematics
    pub kinematics: KinematicsParams,
    /// Time-step indices of the solution files to process
    pub timesteps: Vec<usize>,
    /// Time-averaging window (in flapping periods)
    pub averaging: [f64; 2],
    /// Wake locations of the profiles (x/c)
    pub xlocs: Vec<f64>,
    /// Marker spacing of the discretized plate
    pub body_spacing: f64,
    /// Thickness of the wing (in chords), zero for a flat plate
    pub thickness: f64,
    /// Distance of the virtual boundary from the plate (in chords)
    pub virtual_distance: f64,
    /// Reference data
    pub reference: ReferenceData,
    /// Vortex distances in slices of the streamwise vorticity
    pub wx_distances: WxDistances,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            kinematics: KinematicsParams::default(),
            timesteps: vec![],
            averaging: [4.0, 5.0],
            xlocs: vec![1.0, 2.0, 3.0, 4.0, 5.0],
            body_spacing: 0.01,
            thickness: 0.0,
            virtual_distance: 0.03,
            reference: ReferenceData::default(),
            wx_distances: WxDistances::default(),
        }
    }
}

impl RunConfig {
    /// Read configuration from YAML file
    ///
    /// # Errors
    /// File cannot be read or is not valid.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Read `flapwing.yaml` of a simulation directory, or use the
    /// defaults if there is none
    ///
    /// # Errors
    /// File exists but is not valid.
    pub fn load_or_default<P: AsRef<Path>>(simudir: P) -> Result<Self> {
        let path = simudir.as_ref().join(CONFIG_FILE);
        if path.exists() {
            info!("Reading configuration {:?}", path);
            Self::read(&path)
        } else {
            info!("No {:?}, using default configuration", path);
            Ok(Self::default())
        }
    }

    /// Write configuration to YAML file
    ///
    /// # Errors
    /// File cannot be written.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, serde_yaml::to_string(self)?).map_err(|e| Error::io(path, e))
    }

    /// Reference path relative to the simulation directory
    pub fn resolve<P: AsRef<Path>>(simudir: P, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            simudir.as_ref().join(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml() {
        let config: RunConfig = serde_yaml::from_str(
            "kinematics:\n  St: 0.8\n  psi: 110.0\ntimesteps: [8500]\nreference:\n  thrust: data/ct.csv\n",
        )
        .unwrap();
        assert_eq!(config.kinematics.strouhal, 0.8);
        assert_eq!(config.kinematics.psi, 110.0);
        assert_eq!(config.kinematics.reynolds, 200.0);
        assert_eq!(config.timesteps, vec![8500]);
        assert_eq!(config.averaging, [4.0, 5.0]);
        assert_eq!(config.reference.thrust, Some(PathBuf::from("data/ct.csv")));
        assert_eq!(config.reference.lift, None);
    }

    #[test]
    fn test_unknown_key() {
        assert!(serde_yaml::from_str::<RunConfig>("timestep: [1]\n").is_err());
    }

    #[test]
    fn test_load_or_default() {
        let dir = std::env::temp_dir().join("flapwing_test_simudir");
        std::fs::create_dir_all(&dir).unwrap();
        let _ = std::fs::remove_file(dir.join(CONFIG_FILE));
        assert_eq!(RunConfig::load_or_default(&dir).unwrap(), RunConfig::default());

        let mut config = RunConfig::default();
        config.timesteps = vec![100, 200];
        config.write(dir.join(CONFIG_FILE)).unwrap();
        assert_eq!(RunConfig::load_or_default(&dir).unwrap(), config);
    }
}
