//! # Kinematics of the rolling-pitching wing
//!
//! The wing rolls about the x-axis and pitches about the z-axis,
//! both harmonically with the same frequency:
//! $$
//! \phi(t) = -A_\phi \cos(2\pi f t), \quad
//! \theta(t) = -A_\theta \cos(2\pi f t + \psi) + \theta_0
//! $$
//! Angular velocities and accelerations are the exact derivatives.
//!
//! # Example
//! ```
//! use flapwing::kinematics::{Body, KinematicsParams, WingKinematics};
//! use ndarray::array;
//! let wing = WingKinematics::new(KinematicsParams::default()).unwrap();
//! let body = Body::new(array![[0.0, 0.0, 0.5], [0.5, 0.0, 0.5]]);
//! let state = wing.state_at(&body, 0.25 * wing.period());
//! assert_eq!(state.position.shape(), &[2, 3]);
//! ```
pub mod body;
pub mod rotation;
pub use body::{Body, BodyState};
pub use rotation::{rotation, Rotation};

use crate::{Error, Result};
use ndarray::{Array1, Array2, ArrayView2, Axis, Zip};
use num_traits::{Float, FloatConst};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Amplitudes below this value (radians) count as zero
const AMPLITUDE_TOL: f64 = 1e-6;

fn angular_frequency<T: Float + FloatConst>(f: T) -> T {
    (T::one() + T::one()) * T::PI() * f
}

/// Return the instantaneous rolling angle (radians)
pub fn rolling<T: Float + FloatConst>(t: T, amplitude: T, f: T) -> T {
    -amplitude * (angular_frequency(f) * t).cos()
}

/// Return the instantaneous pitching angle (radians)
///
/// `psi` is the phase difference with the rolling motion,
/// `bias` a static pitching angle.
pub fn pitching<T: Float + FloatConst>(t: T, amplitude: T, f: T, psi: T, bias: T) -> T {
    -amplitude * (angular_frequency(f) * t + psi).cos() + bias
}

/// Return the instantaneous rolling angular velocity
pub fn rolling_angular_velocity<T: Float + FloatConst>(t: T, amplitude: T, f: T) -> T {
    let w = angular_frequency(f);
    w * amplitude * (w * t).sin()
}

/// Return the instantaneous pitching angular velocity
pub fn pitching_angular_velocity<T: Float + FloatConst>(t: T, amplitude: T, f: T, psi: T) -> T {
    let w = angular_frequency(f);
    w * amplitude * (w * t + psi).sin()
}

/// Return the instantaneous rolling angular acceleration
pub fn rolling_angular_acceleration<T: Float + FloatConst>(t: T, amplitude: T, f: T) -> T {
    let w = angular_frequency(f);
    w * w * amplitude * (w * t).cos()
}

/// Return the instantaneous pitching angular acceleration
pub fn pitching_angular_acceleration<T: Float + FloatConst>(
    t: T,
    amplitude: T,
    f: T,
    psi: T,
) -> T {
    let w = angular_frequency(f);
    w * w * amplitude * (w * t + psi).cos()
}

/// Input parameters of the wing kinematics.
///
/// Angles are given in degrees. Every key is optional
/// when read from YAML.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KinematicsParams {
    /// Chord length
    pub c: f64,
    /// Aspect ratio (AR = 1.27 gives a span equal to the chord)
    #[serde(rename = "AR")]
    pub aspect_ratio: f64,
    /// Center of rotation
    pub hook: [f64; 3],
    /// Rolling amplitude (degrees)
    #[serde(rename = "A_phi")]
    pub rolling_amplitude: f64,
    /// Pitching amplitude (degrees)
    #[serde(rename = "A_theta")]
    pub pitching_amplitude: f64,
    /// Phase difference between pitching and rolling (degrees)
    pub psi: f64,
    /// Static pitching bias (degrees)
    pub theta_bias: f64,
    /// Reynolds number
    #[serde(rename = "Re")]
    pub reynolds: f64,
    /// Freestream velocity
    #[serde(rename = "U_inf")]
    pub u_inf: f64,
    /// Fluid density
    pub rho: f64,
    /// Strouhal number
    #[serde(rename = "St")]
    pub strouhal: f64,
    /// Number of flapping periods
    pub n_periods: usize,
    /// Number of time steps per period
    pub nt_period: usize,
}

impl Default for KinematicsParams {
    fn default() -> Self {
        Self {
            c: 1.0,
            aspect_ratio: 1.27,
            hook: [0.0; 3],
            rolling_amplitude: 45.0,
            pitching_amplitude: 45.0,
            psi: 90.0,
            theta_bias: 0.0,
            reynolds: 200.0,
            u_inf: 1.0,
            rho: 1.0,
            strouhal: 0.6,
            n_periods: 5,
            nt_period: 2000,
        }
    }
}

/// Wing kinematics with all derived quantities.
///
/// Created once from [`KinematicsParams`], read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct WingKinematics {
    params: KinematicsParams,
    span: f64,
    a_plan: f64,
    r_avg: f64,
    nu: f64,
    a_phi: f64,
    a_theta: f64,
    psi: f64,
    theta_bias: f64,
    f: f64,
    period: f64,
    tf: f64,
    nt: usize,
    dt: f64,
}

impl WingKinematics {
    /// Compute derived quantities from the input parameters
    ///
    /// # Errors
    /// Rolling and pitching amplitudes are both zero.
    pub fn new(params: KinematicsParams) -> Result<Self> {
        let c = params.c;
        let span = std::f64::consts::PI * c * params.aspect_ratio / 4.;
        let a_plan = std::f64::consts::PI * c * span / 4.;
        let r_avg = span / 2.;
        let nu = params.u_inf * c / params.reynolds;

        let a_phi = params.rolling_amplitude.to_radians();
        let a_theta = params.pitching_amplitude.to_radians();
        let amplitude = if a_phi > AMPLITUDE_TOL {
            a_phi
        } else if a_theta > AMPLITUDE_TOL {
            a_theta
        } else {
            return Err(Error::DegenerateKinematics);
        };

        let f = params.strouhal * params.u_inf / (2. * amplitude * r_avg);
        let period = 1. / f;
        let tf = params.n_periods as f64 * period;
        let nt = params.n_periods * params.nt_period;
        let dt = tf / nt as f64;

        Ok(Self {
            params,
            span,
            a_plan,
            r_avg,
            nu,
            a_phi,
            a_theta,
            psi: params.psi.to_radians(),
            theta_bias: params.theta_bias.to_radians(),
            f,
            period,
            tf,
            nt,
            dt,
        })
    }

    /// Input parameters
    pub fn params(&self) -> &KinematicsParams {
        &self.params
    }

    /// Chord length
    pub fn chord(&self) -> f64 {
        self.params.c
    }

    /// Span
    pub fn span(&self) -> f64 {
        self.span
    }

    /// Planform area of the elliptical plate
    pub fn planform_area(&self) -> f64 {
        self.a_plan
    }

    /// Average rotational radius
    pub fn average_radius(&self) -> f64 {
        self.r_avg
    }

    /// Center of rotation
    pub fn hook(&self) -> [f64; 3] {
        self.params.hook
    }

    /// Freestream velocity
    pub fn u_inf(&self) -> f64 {
        self.params.u_inf
    }

    /// Fluid density
    pub fn rho(&self) -> f64 {
        self.params.rho
    }

    /// Kinematic viscosity
    pub fn nu(&self) -> f64 {
        self.nu
    }

    /// Rolling amplitude (radians)
    pub fn rolling_amplitude(&self) -> f64 {
        self.a_phi
    }

    /// Pitching amplitude (radians)
    pub fn pitching_amplitude(&self) -> f64 {
        self.a_theta
    }

    /// Phase difference (radians)
    pub fn psi(&self) -> f64 {
        self.psi
    }

    /// Flapping frequency
    pub fn frequency(&self) -> f64 {
        self.f
    }

    /// Flapping period
    pub fn period(&self) -> f64 {
        self.period
    }

    /// Final time of the simulation
    pub fn final_time(&self) -> f64 {
        self.tf
    }

    /// Total number of time steps
    pub fn nt(&self) -> usize {
        self.nt
    }

    /// Time-step size
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Scale factor turning forces into force coefficients,
    /// 1 / (0.5 rho U^2 A_plan)
    pub fn force_scale(&self) -> f64 {
        1. / (0.5 * self.params.rho * self.params.u_inf.powi(2) * self.a_plan)
    }

    /// Rolling angle at time t
    pub fn rolling(&self, t: f64) -> f64 {
        rolling(t, self.a_phi, self.f)
    }

    /// Pitching angle at time t
    pub fn pitching(&self, t: f64) -> f64 {
        pitching(t, self.a_theta, self.f, self.psi, self.theta_bias)
    }

    /// Rolling angular velocity at time t
    pub fn rolling_angular_velocity(&self, t: f64) -> f64 {
        rolling_angular_velocity(t, self.a_phi, self.f)
    }

    /// Pitching angular velocity at time t
    pub fn pitching_angular_velocity(&self, t: f64) -> f64 {
        pitching_angular_velocity(t, self.a_theta, self.f, self.psi)
    }

    /// Rolling angular acceleration at time t
    pub fn rolling_angular_acceleration(&self, t: f64) -> f64 {
        rolling_angular_acceleration(t, self.a_phi, self.f)
    }

    /// Pitching angular acceleration at time t
    pub fn pitching_angular_acceleration(&self, t: f64) -> f64 {
        pitching_angular_acceleration(t, self.a_theta, self.f, self.psi)
    }

    /// Rolling and pitching angles for a batch of time values
    pub fn angles(&self, times: &Array1<f64>) -> (Array1<f64>, Array1<f64>) {
        (
            times.mapv(|t| self.rolling(t)),
            times.mapv(|t| self.pitching(t)),
        )
    }

    /// Rigid-body rotation of the wing at time t (yaw is zero)
    pub fn rotation_at(&self, t: f64) -> Rotation {
        Rotation::new(self.rolling(t), 0.0, self.pitching(t), self.params.hook)
    }

    /// Rotate the original marker coordinates `(n, 3)` to time t
    pub fn compute_position(&self, points: &ArrayView2<f64>, t: f64) -> Array2<f64> {
        self.rotation_at(t).apply_points(points)
    }

    /// Rigid-body velocity of markers located at `position` `(n, 3)`
    /// (coordinates in the rotated frame at time t)
    pub fn compute_velocity(&self, position: &ArrayView2<f64>, t: f64) -> Array2<f64> {
        assert!(
            position.ncols() == 3,
            "Markers must have 3 coordinates, got {}.",
            position.ncols()
        );
        let phi = self.rolling(t);
        let phi_dot = self.rolling_angular_velocity(t);
        let theta_dot = self.pitching_angular_velocity(t);
        let (sin_phi, cos_phi) = phi.sin_cos();
        let [xc, yc, zc] = self.params.hook;

        let mut velocity = Array2::<f64>::zeros(position.raw_dim());
        Zip::from(velocity.lanes_mut(Axis(1)))
            .and(position.lanes(Axis(1)))
            .for_each(|mut u, p| {
                let (dx, dy, dz) = (p[0] - xc, p[1] - yc, p[2] - zc);
                u[0] = -theta_dot * (sin_phi * dz - cos_phi * dy);
                u[1] = -theta_dot * cos_phi * dx + phi_dot * dz;
                u[2] = theta_dot * sin_phi * dx - phi_dot * dy;
            });
        velocity
    }

    /// Position and velocity of the body at time t
    pub fn state_at(&self, body: &Body, t: f64) -> BodyState {
        let position = self.compute_position(&body.coords(), t);
        let velocity = self.compute_velocity(&position.view(), t);
        BodyState {
            time: t,
            phi: self.rolling(t),
            theta: self.pitching(t),
            position,
            velocity,
        }
    }

    /// Unit normal of the wing surface at time t.
    ///
    /// Obtained by rotating the reference triangle
    /// (0, 0, 0), (0.5, 0, 0.5), (-0.5, 0, 0.5) lying in the plate.
    pub fn normal(&self, t: f64) -> [f64; 3] {
        let rot = self.rotation_at(t);
        let p1 = rot.apply([0.0, 0.0, 0.0]);
        let p2 = rot.apply([0.5, 0.0, 0.5]);
        let p3 = rot.apply([-0.5, 0.0, 0.5]);
        let v1 = normalize(sub(p1, p2));
        let v2 = normalize(sub(p3, p1));
        normalize(cross(v1, v2))
    }
}

impl fmt::Display for WingKinematics {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let p = &self.params;
        writeln!(f, "Kinematics:")?;
        writeln!(f, "- chord length: c = {}", p.c)?;
        writeln!(f, "- span length: S = {}", self.span)?;
        writeln!(f, "- aspect ratio: AR = {}", p.aspect_ratio)?;
        writeln!(f, "- planform area: A_plan = {}", self.a_plan)?;
        writeln!(f, "- avg. rot. radius: R_avg = {}", self.r_avg)?;
        writeln!(f, "- center of rotation: CoR = {:?}", p.hook)?;
        writeln!(f, "- freestream speed: U_inf = {}", p.u_inf)?;
        writeln!(f, "- Reynolds number: Re = {}", p.reynolds)?;
        writeln!(f, "- kinematic viscosity: nu = {}", self.nu)?;
        writeln!(f, "- fluid density: rho = {}", p.rho)?;
        writeln!(f, "- rolling amplitude: A_phi = {}", self.a_phi)?;
        writeln!(f, "- pitching amplitude: A_theta = {}", self.a_theta)?;
        writeln!(f, "- phase difference: psi = {}", self.psi)?;
        writeln!(f, "- pitching bias: theta_bias = {}", self.theta_bias)?;
        writeln!(f, "- Strouhal number: St = {}", p.strouhal)?;
        writeln!(f, "- flapping frequency: f = {}", self.f)?;
        writeln!(f, "- flapping period: T = {}", self.period)?;
        writeln!(f, "- number of periods: n_periods = {}", p.n_periods)?;
        writeln!(f, "- final time: tf = {}", self.tf)?;
        writeln!(f, "- time steps / period: nt_period = {}", p.nt_period)?;
        writeln!(f, "- time steps: nt = {}", self.nt)?;
        write!(f, "- time-step size: dt = {}", self.dt)
    }
}

fn sub(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn normalize(a: [f64; 3]) -> [f64; 3] {
    let norm = (a[0] * a[0] + a[1] * a[1] + a[2] * a[2]).sqrt();
    [a[0] / norm, a[1] / norm, a[2] / norm]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    fn wing() -> WingKinematics {
        WingKinematics::new(KinematicsParams::default()).unwrap()
    }

    #[test]
    fn test_rolling_quarter_period() {
        assert_abs_diff_eq!(rolling(0.0, FRAC_PI_4, 1.0), -FRAC_PI_4, epsilon = 1e-15);
        assert_abs_diff_eq!(rolling(0.25, FRAC_PI_4, 1.0), 0.0, epsilon = 1e-15);
    }

    #[test]
    fn test_periodicity() {
        let wing = wing();
        let period = wing.period();
        for &t in &[0.0, 0.13, 0.7, 1.9, 3.3] {
            assert_abs_diff_eq!(wing.rolling(t + period), wing.rolling(t), epsilon = 1e-12);
            assert_abs_diff_eq!(wing.pitching(t + period), wing.pitching(t), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_angular_velocity_matches_finite_difference() {
        let (amp, f, psi) = (FRAC_PI_4, 0.8, FRAC_PI_2);
        let h = 1e-6;
        for &t in &[0.0, 0.1, 0.37, 0.9] {
            let droll = (rolling(t + h, amp, f) - rolling(t - h, amp, f)) / (2. * h);
            assert_abs_diff_eq!(rolling_angular_velocity(t, amp, f), droll, epsilon = 1e-6);
            let dpitch = (pitching(t + h, amp, f, psi, 0.1) - pitching(t - h, amp, f, psi, 0.1))
                / (2. * h);
            assert_abs_diff_eq!(
                pitching_angular_velocity(t, amp, f, psi),
                dpitch,
                epsilon = 1e-6
            );
            let ddroll = (rolling_angular_velocity(t + h, amp, f)
                - rolling_angular_velocity(t - h, amp, f))
                / (2. * h);
            assert_abs_diff_eq!(rolling_angular_acceleration(t, amp, f), ddroll, epsilon = 1e-5);
            let ddpitch = (pitching_angular_velocity(t + h, amp, f, psi)
                - pitching_angular_velocity(t - h, amp, f, psi))
                / (2. * h);
            assert_abs_diff_eq!(
                pitching_angular_acceleration(t, amp, f, psi),
                ddpitch,
                epsilon = 1e-5
            );
        }
    }

    #[test]
    fn test_derived_quantities() {
        let wing = wing();
        let span = PI * 1.27 / 4.;
        assert_abs_diff_eq!(wing.span(), span, epsilon = 1e-15);
        assert_abs_diff_eq!(wing.planform_area(), PI * span / 4., epsilon = 1e-15);
        let f = 0.6 / (2. * FRAC_PI_4 * span / 2.);
        assert_abs_diff_eq!(wing.frequency(), f, epsilon = 1e-12);
        assert_abs_diff_eq!(wing.dt() * wing.nt() as f64, wing.final_time(), epsilon = 1e-12);
        assert_eq!(wing.nt(), 10000);
    }

    #[test]
    fn test_pitching_amplitude_sets_frequency_without_rolling() {
        let params = KinematicsParams {
            rolling_amplitude: 0.0,
            pitching_amplitude: 30.0,
            ..KinematicsParams::default()
        };
        let wing = WingKinematics::new(params).unwrap();
        let expected = 0.6 / (2. * 30f64.to_radians() * wing.average_radius());
        assert_abs_diff_eq!(wing.frequency(), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_amplitudes_is_error() {
        let params = KinematicsParams {
            rolling_amplitude: 0.0,
            pitching_amplitude: 0.0,
            ..KinematicsParams::default()
        };
        assert!(matches!(
            WingKinematics::new(params),
            Err(Error::DegenerateKinematics)
        ));
    }

    #[test]
    fn test_velocity_matches_finite_difference_of_position() {
        let wing = wing();
        let points = array![[0.0, 0.0, 0.5], [0.3, 0.0, 0.9], [-0.4, 0.0, 0.2]];
        let h = 1e-6;
        for &t in &[0.1, 0.45, 1.2] {
            let velocity = wing.compute_velocity(&wing.compute_position(&points.view(), t).view(), t);
            let forward = wing.compute_position(&points.view(), t + h);
            let backward = wing.compute_position(&points.view(), t - h);
            let fd = (forward - backward) / (2. * h);
            // Markers lie in the plane y = 0, where the analytic
            // velocity is exact.
            for (a, b) in velocity.iter().zip(fd.iter()) {
                assert_abs_diff_eq!(a, b, epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn test_state_at_is_consistent() {
        let wing = wing();
        let body = Body::new(array![[0.1, 0.0, 0.4], [0.2, 0.0, 0.8]]);
        let t = 0.3 * wing.period();
        let state = wing.state_at(&body, t);
        let position = wing.compute_position(&body.coords(), t);
        assert_eq!(state.position, position);
        assert_eq!(state.velocity, wing.compute_velocity(&position.view(), t));
        assert_eq!(state.phi, wing.rolling(t));
        // Original coordinates untouched
        assert_eq!(body.coords(), array![[0.1, 0.0, 0.4], [0.2, 0.0, 0.8]]);
    }

    #[test]
    fn test_normal_is_orthogonal_to_plate() {
        let wing = wing();
        let n = wing.normal(0.0);
        let norm = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
        assert_abs_diff_eq!(norm, 1.0, epsilon = 1e-12);
        // The normal is orthogonal to the rotated plate
        let rot = wing.rotation_at(0.0);
        let a = rot.apply([0.2, 0.0, 0.3]);
        let b = rot.apply([-0.1, 0.0, 0.7]);
        let d = sub(a, b);
        assert_abs_diff_eq!(d[0] * n[0] + d[1] * n[1] + d[2] * n[2], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_yaml_params_with_defaults() {
        let params: KinematicsParams = serde_yaml::from_str("AR: 1.91\nSt: 0.8\npsi: 110.0\n").unwrap();
        assert_eq!(params.aspect_ratio, 1.91);
        assert_eq!(params.strouhal, 0.8);
        assert_eq!(params.psi, 110.0);
        assert_eq!(params.c, 1.0);
        assert_eq!(params.nt_period, 2000);
    }
}
