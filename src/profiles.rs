//! Velocity profiles in the wake, extracted from volume probes
use crate::field::Field3;
use crate::interpolate::{interp1d, interpolate_axis, Extrapolation};
use crate::probes::ProbeReader;
use crate::Result;
use log::info;
use ndarray::{Array1, Array2, Axis};
use std::path::Path;

/// Profile along y at `(xloc, zloc)`: interpolated along z, then along x
pub fn vertical_profile(field: &Field3, xloc: f64, zloc: f64) -> (Array1<f64>, Array1<f64>) {
    let g = &field.grid;
    let v = interpolate_axis(
        &field.v.view(),
        0,
        &g.z.to_vec(),
        &[zloc],
        Extrapolation::Linear,
    );
    let v = interpolate_axis(&v.view(), 2, &g.x.to_vec(), &[xloc], Extrapolation::Linear);
    let values = v.index_axis(Axis(2), 0).index_axis(Axis(0), 0).to_owned();
    (g.y.clone(), values)
}

/// Profile along z at `(xloc, yloc)`: interpolated along y, then along x
pub fn spanwise_profile(field: &Field3, xloc: f64, yloc: f64) -> (Array1<f64>, Array1<f64>) {
    let g = &field.grid;
    let v = interpolate_axis(
        &field.v.view(),
        1,
        &g.y.to_vec(),
        &[yloc],
        Extrapolation::Linear,
    );
    let v = interpolate_axis(&v.view(), 2, &g.x.to_vec(), &[xloc], Extrapolation::Linear);
    let values = v.index_axis(Axis(2), 0).index_axis(Axis(1), 0).to_owned();
    (g.z.clone(), values)
}

/// Vertical profile of the probe record of `field` at `time`, see
/// [`vertical_profile`]
///
/// # Errors
/// File cannot be read or the time is missing.
pub fn probe_vertical_profile<P: AsRef<Path>>(
    filename: P,
    field: &str,
    time: f64,
    xloc: f64,
    zloc: f64,
) -> Result<(Array1<f64>, Array1<f64>)> {
    let (_, data) = ProbeReader::open(filename, field)?.read(time)?;
    Ok(vertical_profile(&data, xloc, zloc))
}

/// Spanwise profile of the probe record of `field` at `time`, see
/// [`spanwise_profile`]
///
/// # Errors
/// File cannot be read or the time is missing.
pub fn probe_spanwise_profile<P: AsRef<Path>>(
    filename: P,
    field: &str,
    time: f64,
    xloc: f64,
    yloc: f64,
) -> Result<(Array1<f64>, Array1<f64>)> {
    let (_, data) = ProbeReader::open(filename, field)?.read(time)?;
    Ok(spanwise_profile(&data, xloc, yloc))
}

/// Time series of vertical profiles resampled on `y_ref`, shape
/// `(times, y_ref)`
///
/// # Errors
/// A time is missing from the probe file.
pub fn vertical_profile_series<P: AsRef<Path>>(
    filename: P,
    field: &str,
    times: &[f64],
    xloc: f64,
    zloc: f64,
    y_ref: &Array1<f64>,
) -> Result<Array2<f64>> {
    let reader = ProbeReader::open(filename, field)?;
    let y_ref = y_ref.to_vec();
    let mut series = Array2::<f64>::zeros((times.len(), y_ref.len()));
    for (mut row, &time) in series.rows_mut().into_iter().zip(times) {
        let (_, data) = reader.read(time)?;
        let (y, values) = vertical_profile(&data, xloc, zloc);
        row.assign(&interp1d(&y.to_vec(), &values.to_vec(), &y_ref, Extrapolation::Clamp));
    }
    Ok(series)
}

/// Half the time-averaged squared fluctuation of a series of profiles
/// `(times, points)`
pub fn fluctuation_energy(series: &Array2<f64>) -> Array1<f64> {
    let n = series.nrows();
    if n == 0 {
        return Array1::zeros(series.ncols());
    }
    let mean = series.sum_axis(Axis(0)) / n as f64;
    let fluct = series - &mean;
    (&fluct * &fluct).sum_axis(Axis(0)) / n as f64 * 0.5
}

/// Profile of the fluctuation of kinetic energy at `xloc`, in the plane
/// `z = zloc`
///
/// `files` holds the probe file of each velocity component with the
/// name of the recorded field. Profiles are resampled onto the
/// y-locations of the first component.
///
/// # Errors
/// A file cannot be read or a time is missing.
pub fn kinetic_energy_profile<P: AsRef<Path>>(
    files: &[(P, &str)],
    times: &[f64],
    xloc: f64,
    zloc: f64,
) -> Result<(Array1<f64>, Array1<f64>)> {
    assert!(!files.is_empty(), "Need at least one velocity component.");
    assert!(!times.is_empty(), "Need at least one time value.");
    let (first, name) = &files[0];
    let (_, data) = ProbeReader::open(first, name)?.read(times[0])?;
    let (y_ref, _) = vertical_profile(&data, xloc, zloc);

    let mut kin = Array1::<f64>::zeros(y_ref.len());
    for (path, name) in files {
        info!("[x = {}] Collecting {} profiles of {:?}", xloc, times.len(), name);
        let series = vertical_profile_series(path, name, times, xloc, zloc, &y_ref)?;
        kin += &fluctuation_energy(&series);
    }
    Ok((y_ref, kin))
}
