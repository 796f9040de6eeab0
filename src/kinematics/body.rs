//! Lagrangian markers of the wing
//!
//! Body files hold the number of markers on the first line,
//! followed by one `x y z` row per marker.
use super::WingKinematics;
use crate::regularize::Regularizer;
use crate::{Error, Result};
use log::info;
use ndarray::{concatenate, s, Array1, Array2, ArrayView1, ArrayView2, Axis};
use std::f64::consts::PI;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Marker coordinates `(n, 3)` in the original (undeformed) frame
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    coords: Array2<f64>,
}

/// Position and velocity of all markers at one instant
#[derive(Debug, Clone, PartialEq)]
pub struct BodyState {
    /// Time
    pub time: f64,
    /// Rolling angle
    pub phi: f64,
    /// Pitching angle
    pub theta: f64,
    /// Rotated coordinates `(n, 3)`
    pub position: Array2<f64>,
    /// Marker velocities `(n, 3)`
    pub velocity: Array2<f64>,
}

impl Body {
    /// Create body from coordinates stored row-wise
    pub fn new(coords: Array2<f64>) -> Self {
        assert!(
            coords.ncols() == 3,
            "Markers must have 3 coordinates, got {}.",
            coords.ncols()
        );
        Self { coords }
    }

    /// Create body from separate coordinate arrays
    pub fn from_xyz(x: &Array1<f64>, y: &Array1<f64>, z: &Array1<f64>) -> Self {
        assert!(
            x.len() == y.len() && y.len() == z.len(),
            "Coordinate arrays differ in size: {}, {}, {}.",
            x.len(),
            y.len(),
            z.len()
        );
        let mut coords = Array2::<f64>::zeros((x.len(), 3));
        coords.column_mut(0).assign(x);
        coords.column_mut(1).assign(y);
        coords.column_mut(2).assign(z);
        Self { coords }
    }

    /// Number of markers
    pub fn len(&self) -> usize {
        self.coords.nrows()
    }

    /// Body has no markers
    pub fn is_empty(&self) -> bool {
        self.coords.nrows() == 0
    }

    /// Coordinates `(n, 3)`
    pub fn coords(&self) -> ArrayView2<f64> {
        self.coords.view()
    }

    /// x-coordinates
    pub fn x(&self) -> ArrayView1<f64> {
        self.coords.column(0)
    }

    /// y-coordinates
    pub fn y(&self) -> ArrayView1<f64> {
        self.coords.column(1)
    }

    /// z-coordinates
    pub fn z(&self) -> ArrayView1<f64> {
        self.coords.column(2)
    }

    /// Discretize the elliptical flat plate of the wing.
    ///
    /// The plate lies in the plane `y = hook_y`, its semi-axes are c/2
    /// (along x) and S/2 (along z), its root touches the hook. Markers
    /// are placed on ellipses whose semi-axes shrink by the same step
    /// close to `ds`, regularized to spacing `ds`. The remaining
    /// segment of the major axis is filled with markers spaced by `ds`.
    ///
    /// # Errors
    /// `ds` is not positive, or regularization of a ring failed.
    pub fn flat_plate(wing: &WingKinematics, ds: f64) -> Result<Self> {
        let [_, yh, _] = wing.hook();
        let (plate, _) = plate_layout(wing, ds)?;
        let rows: Vec<[f64; 3]> = plate.iter().map(|&(x, z)| [x, yh, z]).collect();
        let body = Self::from_rows(&rows);
        info!("Discretized flat plate with {} markers", body.len());
        Ok(body)
    }

    /// Discretize a disk of `thickness` (in chords) with the elliptical
    /// plate as cross-section.
    ///
    /// Bottom and top faces are flat plates at `y = hook_y -+ thickness / 2`.
    /// The lateral face repeats the outer contour at equally spaced
    /// levels in between, with a spacing of at most `ds`. A disk
    /// without thickness is the flat plate.
    ///
    /// # Errors
    /// `ds` is not positive, or regularization of a ring failed.
    pub fn disk(wing: &WingKinematics, ds: f64, thickness: f64) -> Result<Self> {
        if thickness <= 0. {
            return Self::flat_plate(wing, ds);
        }
        let [_, yh, _] = wing.hook();
        let t = thickness * wing.chord();
        let (plate, n_outer) = plate_layout(wing, ds)?;
        let (y0, y1) = (yh - 0.5 * t, yh + 0.5 * t);
        // Round down when t/ds is an integer up to machine precision
        let n_levels = ((t / ds - 1e-8).ceil() as usize).saturating_sub(1);
        let dy = t / (n_levels + 1) as f64;

        let mut rows: Vec<[f64; 3]> = Vec::with_capacity(2 * plate.len() + n_levels * n_outer);
        rows.extend(plate.iter().map(|&(x, z)| [x, y0, z]));
        rows.extend(plate.iter().map(|&(x, z)| [x, y1, z]));
        for level in 1..=n_levels {
            let y = y0 + level as f64 * dy;
            rows.extend(plate[..n_outer].iter().map(|&(x, z)| [x, y, z]));
        }
        let body = Self::from_rows(&rows);
        info!(
            "Discretized disk of thickness {} with {} markers ({} lateral levels)",
            t,
            body.len(),
            n_levels
        );
        Ok(body)
    }

    fn from_rows(rows: &[[f64; 3]]) -> Self {
        let mut coords = Array2::<f64>::zeros((rows.len(), 3));
        for (mut row, p) in coords.rows_mut().into_iter().zip(rows.iter()) {
            row[0] = p[0];
            row[1] = p[1];
            row[2] = p[2];
        }
        Self { coords }
    }

    /// Sort markers by distance from the marker with the lowest z
    pub fn sorted_from_root(&self) -> Self {
        if self.is_empty() {
            return self.clone();
        }
        let z = self.z();
        let mut idx_min = 0;
        for (i, zi) in z.iter().enumerate() {
            if *zi < z[idx_min] {
                idx_min = i;
            }
        }
        let reference = self.coords.row(idx_min);
        let dist: Vec<f64> = self
            .coords
            .rows()
            .into_iter()
            .map(|p| ((p[0] - reference[0]).powi(2) + (p[2] - reference[2]).powi(2)).sqrt())
            .collect();
        let mut perm: Vec<usize> = (0..dist.len()).collect();
        perm.sort_by(|i, j| dist[*i].total_cmp(&dist[*j]));
        Self {
            coords: self.coords.select(Axis(0), &perm),
        }
    }

    /// Virtual boundary: the markers shifted by `-d` along y,
    /// followed by the markers shifted by `+d`
    pub fn virtual_boundary(&self, d: f64) -> Self {
        let mut lower = self.coords.clone();
        let mut upper = self.coords.clone();
        lower.column_mut(1).mapv_inplace(|y| y - d);
        upper.column_mut(1).mapv_inplace(|y| y + d);
        Self {
            coords: concatenate![Axis(0), lower, upper],
        }
    }

    /// Read body file
    ///
    /// # Errors
    /// File cannot be read, a row is malformed, or the number of
    /// rows differs from the header.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        let parse_error = |line: usize, reason: String| Error::Parse {
            path: path.to_path_buf(),
            line,
            reason,
        };

        let mut expected: Option<usize> = None;
        let mut rows: Vec<f64> = Vec::new();
        for (i, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| Error::io(path, e))?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if expected.is_none() {
                let n = line
                    .parse::<usize>()
                    .map_err(|e| parse_error(i + 1, format!("number of points: {}", e)))?;
                expected = Some(n);
                continue;
            }
            let values = line
                .split_whitespace()
                .map(str::parse::<f64>)
                .collect::<std::result::Result<Vec<f64>, _>>()
                .map_err(|e| parse_error(i + 1, e.to_string()))?;
            if values.len() != 3 {
                return Err(parse_error(
                    i + 1,
                    format!("expected 3 coordinates, got {}", values.len()),
                ));
            }
            rows.extend(values);
        }
        let n = rows.len() / 3;
        match expected {
            Some(m) if m == n => {}
            Some(m) => return Err(parse_error(1, format!("header says {} points, found {}", m, n))),
            None => return Err(parse_error(1, "empty body file".to_string())),
        }
        let coords = Array2::from_shape_vec((n, 3), rows)
            .map_err(|e| parse_error(1, e.to_string()))?;
        Ok(Self { coords })
    }

    /// Write body file
    ///
    /// # Errors
    /// File cannot be written.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| Error::io(path, e))?;
        let mut file = BufWriter::new(file);
        let mut write = || -> std::io::Result<()> {
            writeln!(file, "{}", self.len())?;
            for p in self.coords.rows() {
                writeln!(file, "{:.10} {:.10} {:.10}", p[0], p[1], p[2])?;
            }
            file.flush()
        };
        write().map_err(|e| Error::io(path, e))?;
        info!("Wrote {} markers to {:?}", self.len(), path);
        Ok(())
    }
}

/// Points `(x, z)` of the elliptical plate, outer contour first, and
/// the number of points on the outer contour
fn plate_layout(wing: &WingKinematics, ds: f64) -> Result<(Vec<(f64, f64)>, usize)> {
    if !(ds.is_finite() && ds > 0.) {
        return Err(Error::MissingResolution);
    }
    let (a, b) = (wing.chord() / 2., wing.span() / 2.);
    let [xh, _, zh] = wing.hook();
    let center = (xh, zh + b);
    let minor = a.min(b);
    let n_rings = (minor / ds).round().max(1.) as usize;
    let step = minor / n_rings as f64;

    let mut points: Vec<(f64, f64)> = Vec::new();
    let mut n_outer = 0;
    for k in 0..n_rings {
        let shrink = k as f64 * step;
        let (x, z) = ellipse_contour(a - shrink, b - shrink, center, ds)?;
        if k == 0 {
            n_outer = x.len();
        }
        points.extend(x.iter().copied().zip(z.iter().copied()));
    }
    // What is left of the major axis inside the innermost ring
    let half = (b - a).abs();
    let n_core = (2. * half / ds).round() as usize;
    for i in 0..=n_core {
        let offset = if n_core == 0 {
            0.
        } else {
            -half + 2. * half * i as f64 / n_core as f64
        };
        points.push(if b > a {
            (center.0, center.1 + offset)
        } else {
            (center.0 + offset, center.1)
        });
    }
    Ok((points, n_outer))
}

/// Discretized ellipse (open contour, the first point is not repeated)
/// with a spacing close to `ds`
///
/// # Errors
/// Regularization failed.
pub fn ellipse_contour(
    a: f64,
    b: f64,
    center: (f64, f64),
    ds: f64,
) -> Result<(Array1<f64>, Array1<f64>)> {
    // Ramanujan's approximation of the circumference
    let h = ((a - b) / (a + b)).powi(2);
    let circumference = PI * (a + b) * (1. + 3. * h / (10. + (4. - 3. * h).sqrt()));
    let n_dense = (16. * circumference / ds).ceil().max(64.) as usize;
    let theta = Array1::linspace(0., 2. * PI, n_dense + 1);
    let theta = theta.slice(s![..n_dense]);
    let x: Vec<f64> = theta.iter().map(|t| center.0 + a * t.cos()).collect();
    let y: Vec<f64> = theta.iter().map(|t| center.1 + b * t.sin()).collect();
    Regularizer::with_spacing(ds).regularize(&x, &y)
}
