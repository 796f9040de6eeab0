//! Configuration of volume probes
use crate::grid::Grid3;
use crate::{Error, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

fn default_kind() -> String {
    "VOLUME".to_string()
}

fn default_viewer() -> String {
    "hdf5".to_string()
}

fn default_n_monitor() -> usize {
    1
}

/// Sub-volume of the domain in which a field is recorded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeVolume {
    /// Name of the probe
    pub name: String,
    /// Type of probe
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
    /// Name of the recorded field
    pub field: String,
    /// Output format
    #[serde(default = "default_viewer")]
    pub viewer: String,
    /// Output file (relative to the output directory)
    pub path: String,
    /// Record every `n_monitor` time steps
    #[serde(default = "default_n_monitor")]
    pub n_monitor: usize,
    /// Average over `n_sum` time steps before recording (0: no average)
    #[serde(default, skip_serializing_if = "is_zero")]
    pub n_sum: usize,
    /// Start recording at this time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t_start: Option<f64>,
    /// Stop recording at this time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t_end: Option<f64>,
    /// Limits `[[x0, x1], [y0, y1], [z0, z1]]`
    #[serde(rename = "box")]
    pub bounds: [[f64; 2]; 3],
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_zero(n: &usize) -> bool {
    *n == 0
}

impl ProbeVolume {
    /// Probe recording `field` inside `bounds`, written to `<name>.h5`
    pub fn new(name: &str, field: &str, bounds: [[f64; 2]; 3]) -> Self {
        Self {
            name: name.to_string(),
            kind: default_kind(),
            field: field.to_string(),
            viewer: default_viewer(),
            path: format!("{}.h5", name),
            n_monitor: default_n_monitor(),
            n_sum: 0,
            t_start: None,
            t_end: None,
            bounds,
        }
    }

    /// Set number of time steps to average over
    pub fn with_n_sum(mut self, n_sum: usize) -> Self {
        self.n_sum = n_sum;
        self
    }

    /// Set recording frequency
    pub fn with_n_monitor(mut self, n_monitor: usize) -> Self {
        self.n_monitor = n_monitor;
        self
    }

    /// Set recording window
    pub fn with_window(mut self, t_start: f64, t_end: f64) -> Self {
        self.t_start = Some(t_start);
        self.t_end = Some(t_end);
        self
    }

    /// Enlarge the box to the closest enclosing gridlines of `grid`
    pub fn adjust_box(mut self, grid: &Grid3) -> Self {
        for (limits, x) in self.bounds.iter_mut().zip([&grid.x, &grid.y, &grid.z]) {
            let x = x.as_slice().unwrap_or(&[]);
            *limits = enclosing(x, limits[0], limits[1]);
        }
        self
    }
}

/// Largest gridline `<= start` and smallest gridline `>= end`,
/// bounded by the first and last gridlines
fn enclosing(x: &[f64], start: f64, end: f64) -> [f64; 2] {
    if x.is_empty() {
        return [start, end];
    }
    let i = x.partition_point(|v| *v <= start).saturating_sub(1);
    let j = x.partition_point(|v| *v < end).min(x.len() - 1);
    [x[i], x[j]]
}

/// Content of a probes YAML file
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProbesConfig {
    /// Probes
    pub probes: Vec<ProbeVolume>,
}

impl ProbesConfig {
    /// Read probes from YAML file
    ///
    /// # Errors
    /// File cannot be read or is not valid YAML.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Write probes to YAML file
    ///
    /// # Errors
    /// File cannot be written.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = serde_yaml::to_string(self)?;
        fs::write(path, content).map_err(|e| Error::io(path, e))?;
        info!("Wrote {} probes to {:?}", self.probes.len(), path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array1};

    #[test]
    fn test_adjust_box() {
        let grid = Grid3::new(
            Array1::linspace(0.0, 1.0, 11),
            array![-1.0, 0.0, 1.0],
            array![0.0, 0.3, 0.6],
        );
        let probe = ProbeVolume::new("p", "u", [[0.25, 0.25], [-0.5, 0.5], [0.0, 2.0]]).adjust_box(&grid);
        assert_eq!(probe.bounds[0], [grid.x[2], grid.x[3]]);
        assert_eq!(probe.bounds[1], [-1.0, 1.0]);
        assert_eq!(probe.bounds[2], [0.0, 0.6]);
    }

    #[test]
    fn test_yaml() {
        let probes = ProbesConfig {
            probes: vec![
                ProbeVolume::new("probe1-u", "u", [[1.0, 1.0], [-3.0, 3.0], [0.5, 0.5]]).with_n_sum(2000),
                ProbeVolume::new("probe-p", "p", [[0.0, 1.0], [0.0, 1.0], [0.0, 1.0]])
                    .with_window(4.0, 5.0)
                    .with_n_monitor(20),
            ],
        };
        let s = serde_yaml::to_string(&probes).unwrap();
        assert!(s.contains("type: VOLUME"));
        assert!(s.contains("box:"));
        assert!(!s.contains("t_start: null"));
        let back: ProbesConfig = serde_yaml::from_str(&s).unwrap();
        assert_eq!(back, probes);
    }
}
