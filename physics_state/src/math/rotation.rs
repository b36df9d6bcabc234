/*!
Quaternion, rotation matrix and Euler angle conversions.

Conventions
- Quaternions are scalar-first `(w, x, y, z)`, held in `nalgebra::Quaternion`
  (`w`, `i`, `j`, `k`).
- Euler angles are ordered `[pitch, yaw, roll]`. Pitch and roll carry flipped
  signs relative to the textbook ZYX extraction to match the left-handed axes
  of the telemetry source; yaw does not.
- Rotation matrix columns are the body's basis vectors:
  column 0 = forward, column 1 = left, column 2 = up.

Every conversion here agrees with the others under these conventions:
`quat_to_rot_mtx(euler_to_quaternion(e)) == euler_to_rotation(e)` and
`quat_to_euler(euler_to_quaternion(e)) == e` away from gimbal lock.
*/

use std::f64::consts::FRAC_PI_2;

use nalgebra::{Matrix3, Quaternion, Vector3};

/// Decompose `q` into `[pitch, yaw, roll]` (radians).
///
/// Near gimbal lock (`|sinp| > 1` from rounding) the raw pitch is pinned to `+π/2`
/// before the sign flip, whatever the sign of `sinp`.
pub fn quat_to_euler(q: &Quaternion<f64>) -> Vector3<f64> {
    let (w, x, y, z) = (q.w, q.i, q.j, q.k);

    let sinr_cosp = 2.0 * (w * x + y * z);
    let cosr_cosp = 1.0 - 2.0 * (x * x + y * y);
    let roll = sinr_cosp.atan2(cosr_cosp);

    let sinp = 2.0 * (w * y - z * x);
    let pitch = if sinp.abs() > 1.0 {
        FRAC_PI_2
    } else {
        sinp.asin()
    };

    let siny_cosp = 2.0 * (w * z + x * y);
    let cosy_cosp = 1.0 - 2.0 * (y * y + z * z);
    let yaw = siny_cosp.atan2(cosy_cosp);

    Vector3::new(-pitch, yaw, -roll)
}

/// Rotation matrix (forward/left/up columns) of a possibly non-normalized quaternion.
///
/// The quaternion is scaled by `1 / |q|^2` internally. A zero quaternion means "no
/// orientation known" and yields the zero matrix.
pub fn quat_to_rot_mtx(q: &Quaternion<f64>) -> Matrix3<f64> {
    // Axis convention correction; the products below are sign-symmetric.
    let (w, x, y, z) = (-q.w, -q.i, -q.j, -q.k);

    let norm = w * w + x * x + y * y + z * z;
    if norm == 0.0 {
        return Matrix3::zeros();
    }
    let s = 1.0 / norm;

    let forward = Vector3::new(
        1.0 - 2.0 * s * (y * y + z * z),
        2.0 * s * (x * y + z * w),
        2.0 * s * (x * z - y * w),
    );
    let left = Vector3::new(
        2.0 * s * (x * y - z * w),
        1.0 - 2.0 * s * (x * x + z * z),
        2.0 * s * (y * z + x * w),
    );
    let up = Vector3::new(
        2.0 * s * (x * z + y * w),
        2.0 * s * (y * z - x * w),
        1.0 - 2.0 * s * (x * x + y * y),
    );

    Matrix3::from_columns(&[forward, left, up])
}

/// Inverse of [`quat_to_rot_mtx`] for orthonormal `m`, up to overall sign.
///
/// Uses the trace when it is positive, otherwise the largest diagonal entry to pick
/// the component that is derived first. The result is negated to mirror the
/// correction in [`quat_to_rot_mtx`].
pub fn rotation_to_quaternion(m: &Matrix3<f64>) -> Quaternion<f64> {
    let trace = m.trace();

    let (w, x, y, z) = if trace > 0.0 {
        let s = (trace + 1.0).sqrt();
        let inv_s = 0.5 / s;
        (
            0.5 * s,
            (m[(2, 1)] - m[(1, 2)]) * inv_s,
            (m[(0, 2)] - m[(2, 0)]) * inv_s,
            (m[(1, 0)] - m[(0, 1)]) * inv_s,
        )
    } else if m[(0, 0)] >= m[(1, 1)] && m[(0, 0)] >= m[(2, 2)] {
        let s = (1.0 + m[(0, 0)] - m[(1, 1)] - m[(2, 2)]).sqrt();
        let inv_s = 0.5 / s;
        (
            (m[(2, 1)] - m[(1, 2)]) * inv_s,
            0.5 * s,
            (m[(1, 0)] + m[(0, 1)]) * inv_s,
            (m[(2, 0)] + m[(0, 2)]) * inv_s,
        )
    } else if m[(1, 1)] > m[(2, 2)] {
        let s = (1.0 + m[(1, 1)] - m[(0, 0)] - m[(2, 2)]).sqrt();
        let inv_s = 0.5 / s;
        (
            (m[(0, 2)] - m[(2, 0)]) * inv_s,
            (m[(0, 1)] + m[(1, 0)]) * inv_s,
            0.5 * s,
            (m[(1, 2)] + m[(2, 1)]) * inv_s,
        )
    } else {
        let s = (1.0 + m[(2, 2)] - m[(0, 0)] - m[(1, 1)]).sqrt();
        let inv_s = 0.5 / s;
        (
            (m[(1, 0)] - m[(0, 1)]) * inv_s,
            (m[(0, 2)] + m[(2, 0)]) * inv_s,
            (m[(1, 2)] + m[(2, 1)]) * inv_s,
            0.5 * s,
        )
    };

    -Quaternion::new(w, x, y, z)
}

/// Rotation matrix built directly from `[pitch, yaw, roll]`.
pub fn euler_to_rotation(pyr: &Vector3<f64>) -> Matrix3<f64> {
    let (sp, cp) = pyr[0].sin_cos();
    let (sy, cy) = pyr[1].sin_cos();
    let (sr, cr) = pyr[2].sin_cos();

    let forward = Vector3::new(cp * cy, cp * sy, sp);
    let left = Vector3::new(cy * sp * sr - cr * sy, sy * sp * sr + cr * cy, -cp * sr);
    let up = Vector3::new(-cr * cy * sp - sr * sy, -cr * sy * sp + sr * cy, cp * cr);

    Matrix3::from_columns(&[forward, left, up])
}

/// Unit quaternion for `[pitch, yaw, roll]`, the inverse of [`quat_to_euler`].
pub fn euler_to_quaternion(pyr: &Vector3<f64>) -> Quaternion<f64> {
    // Undo the pitch/roll sign flips, then compose the textbook ZYX half angles.
    let (sp, cp) = (-pyr[0] * 0.5).sin_cos();
    let (sy, cy) = (pyr[1] * 0.5).sin_cos();
    let (sr, cr) = (-pyr[2] * 0.5).sin_cos();

    Quaternion::new(
        cr * cp * cy + sr * sp * sy,
        sr * cp * cy - cr * sp * sy,
        cr * sp * cy + sr * cp * sy,
        cr * cp * sy - sr * sp * cy,
    )
}
