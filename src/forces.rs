//! Force histories and force coefficients
//!
//! Force files have one row per time step, `t fx fy fz`, separated by
//! whitespace or commas. Rows starting with `#` are skipped.
pub mod power;
pub use power::{hydrodynamic_power, propulsive_efficiency, PowerHistory};

use crate::kinematics::WingKinematics;
use crate::{Error, Result};
use log::info;
use ndarray::Array1;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Force history
#[derive(Debug, Clone, PartialEq)]
pub struct Forces {
    /// Time
    pub t: Array1<f64>,
    /// Force along x
    pub fx: Array1<f64>,
    /// Force along y
    pub fy: Array1<f64>,
    /// Force along z
    pub fz: Array1<f64>,
}

/// Thrust, lift and spanwise force coefficients
#[derive(Debug, Clone, PartialEq)]
pub struct ForceCoefficients {
    /// Time normalized by the flapping period
    pub t: Array1<f64>,
    /// Thrust coefficient
    pub ct: Array1<f64>,
    /// Lift coefficient
    pub cl: Array1<f64>,
    /// Spanwise force coefficient
    pub cz: Array1<f64>,
}

/// Mean and RMS of the force coefficients
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stats {
    /// Time-averaged values `[ct, cl, cz]`
    pub mean: [f64; 3],
    /// RMS values `[ct, cl, cz]`
    pub rms: [f64; 3],
}

/// Split a row at whitespace or commas and parse all entries
fn parse_row(line: &str) -> std::result::Result<Vec<f64>, std::num::ParseFloatError> {
    line.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(str::parse::<f64>)
        .collect()
}

/// Read columns of a text file with at least `ncols` numbers per row
///
/// # Errors
/// File cannot be read or a row is malformed.
pub fn read_columns<P: AsRef<Path>>(path: P, ncols: usize) -> Result<Vec<Array1<f64>>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); ncols];
    for (i, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| Error::io(path, e))?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let row = parse_row(line).map_err(|e| Error::Parse {
            path: path.to_path_buf(),
            line: i + 1,
            reason: e.to_string(),
        })?;
        if row.len() < ncols {
            return Err(Error::Parse {
                path: path.to_path_buf(),
                line: i + 1,
                reason: format!("expected {} columns, got {}", ncols, row.len()),
            });
        }
        for (col, value) in columns.iter_mut().zip(row) {
            col.push(value);
        }
    }
    Ok(columns.into_iter().map(Array1::from_vec).collect())
}

/// Average of `values` over samples with `limits.0 <= t <= limits.1`
pub fn time_average(t: &Array1<f64>, values: &Array1<f64>, limits: (f64, f64)) -> f64 {
    let selected = select(t, values, limits);
    if selected.is_empty() {
        return f64::NAN;
    }
    selected.iter().sum::<f64>() / selected.len() as f64
}

/// Root mean square of the fluctuations of `values` over samples with
/// `limits.0 <= t <= limits.1`
pub fn rms(t: &Array1<f64>, values: &Array1<f64>, limits: (f64, f64)) -> f64 {
    let selected = select(t, values, limits);
    if selected.is_empty() {
        return f64::NAN;
    }
    let n = selected.len() as f64;
    let mean = selected.iter().sum::<f64>() / n;
    (selected.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n).sqrt()
}

fn select(t: &Array1<f64>, values: &Array1<f64>, limits: (f64, f64)) -> Vec<f64> {
    assert!(t.len() == values.len(), "Times and values differ in size.");
    t.iter()
        .zip(values.iter())
        .filter(|(ti, _)| **ti >= limits.0 && **ti <= limits.1)
        .map(|(_, v)| *v)
        .collect()
}

impl Forces {
    /// Read force history
    ///
    /// # Errors
    /// File cannot be read or is malformed.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut cols = read_columns(path, 4)?.into_iter();
        let mut next = || cols.next().unwrap_or_else(|| Array1::zeros(0));
        let forces = Self {
            t: next(),
            fx: next(),
            fy: next(),
            fz: next(),
        };
        info!("Read {} force records from {:?}", forces.t.len(), path);
        Ok(forces)
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.t.len()
    }

    /// No records
    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    /// Thrust (negative drag)
    pub fn thrust(&self) -> Array1<f64> {
        -&self.fx
    }

    /// Force coefficients, scaled with `0.5 rho U² A_plan`, time in periods
    pub fn coefficients(&self, wing: &WingKinematics) -> ForceCoefficients {
        let scale = wing.force_scale();
        ForceCoefficients {
            t: &self.t / wing.period(),
            ct: self.thrust() * scale,
            cl: &self.fy * scale,
            cz: &self.fz * scale,
        }
    }
}

impl ForceCoefficients {
    /// Mean and RMS over the window `limits` (in periods)
    pub fn stats(&self, limits: (f64, f64)) -> Stats {
        let arrays = [&self.ct, &self.cl, &self.cz];
        Stats {
            mean: arrays.map(|c| time_average(&self.t, c, limits)),
            rms: arrays.map(|c| rms(&self.t, c, limits)),
        }
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, label) in ["C_T", "C_L", "C_Z"].iter().enumerate() {
            writeln!(
                f,
                "<{label}> = {:.3}, ({label})_rms = {:.3}",
                self.mean[i],
                self.rms[i],
                label = label
            )?;
        }
        Ok(())
    }
}

/// Read a reference curve `(t, value)`
///
/// # Errors
/// File cannot be read or is malformed.
pub fn read_reference<P: AsRef<Path>>(path: P) -> Result<(Array1<f64>, Array1<f64>)> {
    let mut cols = read_columns(path, 2)?.into_iter();
    match (cols.next(), cols.next()) {
        (Some(t), Some(v)) => Ok((t, v)),
        _ => Ok((Array1::zeros(0), Array1::zeros(0))),
    }
}

/// RMS deviation between `(t, values)` and a reference curve linearly
/// interpolated onto `t`; only times inside the reference range count
pub fn deviation_from_reference(
    t: &Array1<f64>,
    values: &Array1<f64>,
    t_ref: &Array1<f64>,
    v_ref: &Array1<f64>,
) -> f64 {
    use crate::interpolate::{interp1d, Extrapolation};
    if t_ref.len() < 2 {
        return f64::NAN;
    }
    let (lo, hi) = (t_ref[0], t_ref[t_ref.len() - 1]);
    let (ts, vs): (Vec<f64>, Vec<f64>) = t
        .iter()
        .zip(values.iter())
        .filter(|(ti, _)| **ti >= lo && **ti <= hi)
        .unzip();
    if ts.is_empty() {
        return f64::NAN;
    }
    let r = interp1d(&t_ref.to_vec(), &v_ref.to_vec(), &ts, Extrapolation::Clamp);
    let sum: f64 = vs.iter().zip(r.iter()).map(|(a, b)| (a - b).powi(2)).sum();
    (sum / ts.len() as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinematics::KinematicsParams;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_read_whitespace_and_commas() {
        let path = std::env::temp_dir().join("flapwing_test_forces.txt");
        std::fs::write(&path, "# t fx fy fz\n0.0\t1.0\t2.0\t3.0\n0.5,-1.0,  2.5,0\n").unwrap();
        let forces = Forces::read(&path).unwrap();
        assert_eq!(forces.t, array![0.0, 0.5]);
        assert_eq!(forces.fx, array![1.0, -1.0]);
        assert_eq!(forces.fy, array![2.0, 2.5]);
        assert_eq!(forces.fz, array![3.0, 0.0]);
    }

    #[test]
    fn test_read_malformed() {
        let path = std::env::temp_dir().join("flapwing_test_forces_bad.txt");
        std::fs::write(&path, "0.0 1.0 2.0\n").unwrap();
        assert!(matches!(Forces::read(&path), Err(Error::Parse { line: 1, .. })));
    }

    #[test]
    fn test_coefficients() {
        let wing = WingKinematics::new(KinematicsParams::default()).unwrap();
        let forces = Forces {
            t: array![0.0, wing.period()],
            fx: array![-1.0, 2.0],
            fy: array![1.0, 1.0],
            fz: array![0.0, 0.0],
        };
        let coeffs = forces.coefficients(&wing);
        let scale = 1.0 / (0.5 * wing.planform_area());
        assert_abs_diff_eq!(coeffs.t[1], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(coeffs.ct[0], scale, epsilon = 1e-12);
        assert_abs_diff_eq!(coeffs.ct[1], -2.0 * scale, epsilon = 1e-12);
        assert_abs_diff_eq!(coeffs.cl[0], scale, epsilon = 1e-12);
    }

    #[test]
    fn test_stats() {
        let t = array![0.0, 1.0, 2.0, 3.0];
        let v = array![10.0, 1.0, 3.0, 10.0];
        assert_eq!(time_average(&t, &v, (1.0, 2.0)), 2.0);
        assert_eq!(rms(&t, &v, (1.0, 2.0)), 1.0);
        assert!(time_average(&t, &v, (5.0, 6.0)).is_nan());

        let coeffs = ForceCoefficients {
            t: t.clone(),
            ct: v.clone(),
            cl: v.clone(),
            cz: v,
        };
        let stats = coeffs.stats((1.0, 2.0));
        assert_eq!(stats.mean, [2.0; 3]);
        assert!(stats.to_string().contains("<C_T> = 2.000, (C_T)_rms = 1.000"));
    }

    #[test]
    fn test_deviation_from_reference() {
        let t = array![0.0, 0.5, 1.0, 2.0];
        let v = array![1.0, 2.0, 3.0, 100.0];
        let t_ref = array![0.0, 1.0];
        let v_ref = array![1.0, 3.0];
        assert_abs_diff_eq!(deviation_from_reference(&t, &v, &t_ref, &v_ref), 0.0, epsilon = 1e-12);
    }
}
