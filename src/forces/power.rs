//! Hydrodynamic power and propulsive efficiency
//!
//! The pressure is sampled on a virtual boundary made of the plate
//! markers shifted by `-d` and `+d` along the plate normal direction
//! (y at rest). The power is the sum over the markers of `p (n . u) ds`,
//! with the normal pointing away from the plate on each side.
use crate::field::Field3;
use crate::interpolate::Extrapolation;
use crate::kinematics::{Body, WingKinematics};
use crate::probes::ProbeReader;
use crate::{Error, Result};
use log::info;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis, Zip};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Sum of `p (n . u) ds` over all markers
///
/// # Panics
/// Number of markers differs between the arrays.
pub fn hydrodynamic_power(
    pressure: &ArrayView1<f64>,
    normals: &ArrayView2<f64>,
    velocity: &ArrayView2<f64>,
    ds: f64,
) -> f64 {
    assert!(
        pressure.len() == normals.nrows() && normals.shape() == velocity.shape(),
        "Pressure, normals and velocity differ in size."
    );
    let mut power = 0.;
    Zip::from(pressure)
        .and(normals.lanes(Axis(1)))
        .and(velocity.lanes(Axis(1)))
        .for_each(|p, n, u| power += p * n.dot(&u) * ds);
    power
}

/// Propulsive efficiency, mean thrust times freestream velocity over
/// mean hydrodynamic power
pub fn propulsive_efficiency(thrust_avg: f64, u_inf: f64, power_avg: f64) -> f64 {
    thrust_avg * u_inf / power_avg
}

/// Hydrodynamic power at the times recorded by a pressure probe
#[derive(Debug, Clone, PartialEq)]
pub struct PowerHistory {
    /// Time
    pub t: Array1<f64>,
    /// Hydrodynamic power
    pub power: Array1<f64>,
}

/// Normals of the virtual boundary, `-n` on the lower half
/// and `+n` on the upper half
fn virtual_normals(n: [f64; 3], size: usize) -> Array2<f64> {
    let half = size / 2;
    Array2::from_shape_fn((size, 3), |(i, j)| if i < half { -n[j] } else { n[j] })
}

impl PowerHistory {
    /// Hydrodynamic power of the plate `body` at each pressure record
    /// of the probe file
    ///
    /// `d` is the distance of the virtual boundary from the plate; the
    /// surface associated with each marker is `A_plan / body.len()`.
    ///
    /// # Errors
    /// Probe file cannot be read, or a marker of the virtual boundary
    /// lies outside of the probed volume.
    pub fn compute<P: AsRef<Path>>(
        wing: &WingKinematics,
        body: &Body,
        d: f64,
        filename: P,
        field: &str,
    ) -> Result<Self> {
        let filename = filename.as_ref();
        assert!(!body.is_empty(), "Body has no markers.");
        let ds = wing.planform_area() / body.len() as f64;
        let virt = body.virtual_boundary(d);

        let reader = ProbeReader::open(filename, field)?;
        let times = reader.times();
        let mut t = Array1::<f64>::zeros(times.len());
        let mut power = Array1::<f64>::zeros(times.len());
        for (i, &time) in times.iter().enumerate() {
            info!("[t/T = {:.6}] Computing hydrodynamic power", time / wing.period());
            let state = wing.state_at(&virt, time);
            if let Some(p) = state
                .position
                .rows()
                .into_iter()
                .map(|p| [p[0], p[1], p[2]])
                .find(|p| !reader.grid().contains(*p))
            {
                return Err(Error::OutsideProbe {
                    path: filename.to_path_buf(),
                    time,
                    point: p,
                });
            }
            let (_, pressure): (f64, Field3) = reader.read(time)?;
            let p = pressure.at_points(&state.position.view(), Extrapolation::Linear);
            let normals = virtual_normals(wing.normal(time), virt.len());
            t[i] = time;
            power[i] = hydrodynamic_power(&p.view(), &normals.view(), &state.velocity.view(), ds);
        }
        Ok(Self { t, power })
    }

    /// Mean over the positive values
    pub fn mean_positive(&self) -> f64 {
        let positive: Vec<f64> = self.power.iter().copied().filter(|p| *p > 0.).collect();
        if positive.is_empty() {
            return f64::NAN;
        }
        positive.iter().sum::<f64>() / positive.len() as f64
    }

    /// Write `t P` rows
    ///
    /// # Errors
    /// File cannot be written.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| Error::io(path, e))?;
        let mut file = BufWriter::new(file);
        let mut write = || -> std::io::Result<()> {
            for (t, p) in self.t.iter().zip(self.power.iter()) {
                writeln!(file, "{:.12e} {:.12e}", t, p)?;
            }
            file.flush()
        };
        write().map_err(|e| Error::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid3;
    use crate::kinematics::KinematicsParams;
    use crate::probes::write_probe;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array3};

    #[test]
    fn test_hydrodynamic_power() {
        let p = array![2.0, -1.0];
        let n = array![[0.0, -1.0, 0.0], [0.0, 1.0, 0.0]];
        let u = array![[1.0, 3.0, 0.0], [0.0, 3.0, 5.0]];
        let power = hydrodynamic_power(&p.view(), &n.view(), &u.view(), 0.5);
        assert_abs_diff_eq!(power, 2.0 * -3.0 * 0.5 + -1.0 * 3.0 * 0.5, epsilon = 1e-14);
    }

    #[test]
    fn test_virtual_normals() {
        let n = virtual_normals([0.0, 1.0, 0.0], 4);
        assert_eq!(n.column(1).to_vec(), vec![-1.0, -1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_efficiency() {
        assert_eq!(propulsive_efficiency(0.5, 2.0, 4.0), 0.25);
        let history = PowerHistory {
            t: array![0.0, 1.0, 2.0],
            power: array![-1.0, 1.0, 3.0],
        };
        assert_eq!(history.mean_positive(), 2.0);
    }

    #[test]
    fn test_uniform_pressure_does_no_work() {
        // Equal pressure on both sides cancels out.
        let wing = WingKinematics::new(KinematicsParams::default()).unwrap();
        let body = Body::new(array![[0.0, 0.0, 0.5], [0.2, 0.0, 0.8], [-0.2, 0.0, 0.3]]);
        let grid = Grid3::new(array![-2.0, 2.0], array![-2.0, 2.0], array![-2.0, 2.0]);
        let path = std::env::temp_dir().join("flapwing_test_power_probe.h5");
        let _ = std::fs::remove_file(&path);
        for t in [0.1, 0.2] {
            let p = Field3::from_array(Array3::from_elem((2, 2, 2), 3.0), grid.clone());
            write_probe(&path, "p", t * wing.period(), &p).unwrap();
        }
        let history = PowerHistory::compute(&wing, &body, 0.03, &path, "p").unwrap();
        assert_eq!(history.t.len(), 2);
        for p in history.power.iter() {
            assert_abs_diff_eq!(*p, 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_body_outside_probe_volume() {
        let wing = WingKinematics::new(KinematicsParams::default()).unwrap();
        let body = Body::new(array![[0.0, 0.0, 0.5], [0.2, 0.0, 3.0]]);
        let grid = Grid3::new(array![-2.0, 2.0], array![-2.0, 2.0], array![-2.0, 2.0]);
        let path = std::env::temp_dir().join("flapwing_test_power_outside.h5");
        let _ = std::fs::remove_file(&path);
        let p = Field3::from_array(Array3::from_elem((2, 2, 2), 1.0), grid);
        write_probe(&path, "p", 0.1 * wing.period(), &p).unwrap();
        assert!(matches!(
            PowerHistory::compute(&wing, &body, 0.03, &path, "p"),
            Err(Error::OutsideProbe { .. })
        ));
    }
}
