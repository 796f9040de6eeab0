//! Rigid rotation of points about a center
use ndarray::{Array2, ArrayView2, Axis, Zip};

/// Rotation `R = Rx(roll) Ry(yaw) Rz(pitch)` about a center point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    matrix: [[f64; 3]; 3],
    center: [f64; 3],
}

impl Rotation {
    /// Compose roll, yaw and pitch (radians) about `center`
    pub fn new(roll: f64, yaw: f64, pitch: f64, center: [f64; 3]) -> Self {
        let (sr, cr) = roll.sin_cos();
        let (sy, cy) = yaw.sin_cos();
        let (sp, cp) = pitch.sin_cos();
        let rx = [[1.0, 0.0, 0.0], [0.0, cr, sr], [0.0, -sr, cr]];
        let ry = [[cy, 0.0, sy], [0.0, 1.0, 0.0], [-sy, 0.0, cy]];
        let rz = [[cp, sp, 0.0], [-sp, cp, 0.0], [0.0, 0.0, 1.0]];
        Self {
            matrix: matmul(&rx, &matmul(&ry, &rz)),
            center,
        }
    }

    /// Rotation matrix
    pub fn matrix(&self) -> &[[f64; 3]; 3] {
        &self.matrix
    }

    /// Center of rotation
    pub fn center(&self) -> [f64; 3] {
        self.center
    }

    /// Inverse rotation (transposed matrix, same center)
    pub fn inverse(&self) -> Self {
        let m = &self.matrix;
        let mut t = [[0.0; 3]; 3];
        for (i, row) in t.iter_mut().enumerate() {
            for (j, v) in row.iter_mut().enumerate() {
                *v = m[j][i];
            }
        }
        Self {
            matrix: t,
            center: self.center,
        }
    }

    /// Rotate a single point
    pub fn apply(&self, point: [f64; 3]) -> [f64; 3] {
        let c = self.center;
        let d = [point[0] - c[0], point[1] - c[1], point[2] - c[2]];
        let m = &self.matrix;
        let mut out = c;
        for (o, row) in out.iter_mut().zip(m.iter()) {
            *o += row[0] * d[0] + row[1] * d[1] + row[2] * d[2];
        }
        out
    }

    /// Rotate a batch of points stored row-wise `(n, 3)`
    pub fn apply_points(&self, points: &ArrayView2<f64>) -> Array2<f64> {
        assert!(
            points.ncols() == 3,
            "Points must have 3 coordinates, got {}.",
            points.ncols()
        );
        let mut out = Array2::<f64>::zeros(points.raw_dim());
        Zip::from(out.lanes_mut(Axis(1)))
            .and(points.lanes(Axis(1)))
            .for_each(|mut o, p| {
                let r = self.apply([p[0], p[1], p[2]]);
                o[0] = r[0];
                o[1] = r[1];
                o[2] = r[2];
            });
        out
    }
}

/// Rotate `point` about `center` (angles in radians)
pub fn rotation(point: [f64; 3], roll: f64, yaw: f64, pitch: f64, center: [f64; 3]) -> [f64; 3] {
    Rotation::new(roll, yaw, pitch, center).apply(point)
}

fn matmul(a: &[[f64; 3]; 3], b: &[[f64; 3]; 3]) -> [[f64; 3]; 3] {
    let mut c = [[0.0; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            c[i][j] = (0..3).map(|k| a[i][k] * b[k][j]).sum();
        }
    }
    c
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_zero_angles_is_identity() {
        let p = [0.3, -1.2, 4.5];
        assert_eq!(rotation(p, 0.0, 0.0, 0.0, [0.0; 3]), p);
        let r = rotation(p, 0.0, 0.0, 0.0, [1.0, 2.0, 3.0]);
        for i in 0..3 {
            assert_abs_diff_eq!(r[i], p[i], epsilon = 1e-15);
        }
    }

    #[test]
    fn test_inverse_restores_point() {
        let rot = Rotation::new(0.4, 0.0, -0.9, [0.1, 0.2, 0.3]);
        let p = [0.7, -0.5, 1.1];
        let back = rot.inverse().apply(rot.apply(p));
        for (a, b) in back.iter().zip(p.iter()) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_single_axis_negated_angle_is_inverse() {
        let center = [0.5, 0.0, -0.5];
        let p = [1.0, 2.0, 3.0];
        let roll = rotation(rotation(p, 0.6, 0.0, 0.0, center), -0.6, 0.0, 0.0, center);
        let pitch = rotation(rotation(p, 0.0, 0.0, 1.3, center), 0.0, 0.0, -1.3, center);
        for i in 0..3 {
            assert_abs_diff_eq!(roll[i], p[i], epsilon = 1e-14);
            assert_abs_diff_eq!(pitch[i], p[i], epsilon = 1e-14);
        }
    }

    #[test]
    fn test_quarter_turn_roll() {
        // Rx maps (0, 0, 1) to (0, sin, cos)
        let r = rotation([0.0, 0.0, 1.0], FRAC_PI_2, 0.0, 0.0, [0.0; 3]);
        assert_abs_diff_eq!(r[1], 1.0, epsilon = 1e-15);
        assert_abs_diff_eq!(r[2], 0.0, epsilon = 1e-15);
    }

    #[test]
    fn test_batch_matches_single() {
        let rot = Rotation::new(0.2, 0.1, 0.3, [0.0, 0.0, 0.5]);
        let points = array![[0.0, 0.0, 0.0], [1.0, 0.5, -0.5], [0.2, 0.0, 1.0]];
        let out = rot.apply_points(&points.view());
        for (row, p) in out.rows().into_iter().zip(points.rows()) {
            let r = rot.apply([p[0], p[1], p[2]]);
            assert_eq!(row.to_vec(), r.to_vec());
        }
    }
}
