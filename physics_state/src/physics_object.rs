//! Decoded physics state of one tracked body (car or ball) for a single tick.
//!
//! # Model
//! - Raw fields (`position`, `quaternion`, `linear_velocity`, `angular_velocity`) are
//!   public and filled by the decoders.
//! - Euler angles and the rotation matrix are derived from `quaternion` on first access
//!   and cached. Each cache is an exactly-once cell, so a snapshot shared by reference
//!   across threads still derives each field at most once.
//!
//! # Staleness
//! Nothing invalidates the caches automatically. Writing `quaternion` (directly or via
//! [`PhysicsObject::decode_car_data`]) after a derived field was read leaves that field
//! stale until [`PhysicsObject::reset_derived`] is called. The intended lifecycle is one
//! object per body per tick, decoded once and then only read.

use std::sync::OnceLock;

use nalgebra::{Matrix3, Quaternion, Vector3};

use crate::{
    constants::{
        BALL_ANGULAR_VELOCITY_OFFSET, BALL_LINEAR_VELOCITY_OFFSET, BALL_POSITION_OFFSET,
        BALL_STATE_LENGTH, CAR_ANGULAR_VELOCITY_OFFSET, CAR_LINEAR_VELOCITY_OFFSET,
        CAR_POSITION_OFFSET, CAR_QUATERNION_OFFSET, CAR_STATE_LENGTH, DEFAULT_LINEAR_VELOCITY,
        DEFAULT_QUATERNION, SERIALIZED_LENGTH,
    },
    error::{Body, Result, TelemetryError},
    math::{quat_to_euler, quat_to_rot_mtx},
};

/// How the raw fields of a [`PhysicsObject`] were last populated.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Source {
    /// Built in code (`Default` or [`PhysicsObject::new`]); no telemetry decoded yet.
    Constructed,
    /// Filled from a vehicle telemetry slice.
    Car,
    /// Filled from a ball telemetry slice. `quaternion` keeps its previous value.
    Ball,
}

/// Position, orientation and velocities of one car or ball for one tick.
#[derive(Clone, Debug)]
pub struct PhysicsObject {
    /// World-space position.
    pub position: Vector3<f64>,
    /// Orientation, scalar-first. Not necessarily normalized.
    pub quaternion: Quaternion<f64>,
    pub linear_velocity: Vector3<f64>,
    pub angular_velocity: Vector3<f64>,
    source: Source,
    euler_angles: OnceLock<Vector3<f64>>,
    rotation_mtx: OnceLock<Matrix3<f64>>,
}

impl Default for PhysicsObject {
    fn default() -> Self {
        let [w, x, y, z] = DEFAULT_QUATERNION;
        Self::new(
            Vector3::zeros(),
            Quaternion::new(w, x, y, z),
            Vector3::from(DEFAULT_LINEAR_VELOCITY),
            Vector3::zeros(),
        )
    }
}

impl PhysicsObject {
    pub fn new(
        position: Vector3<f64>,
        quaternion: Quaternion<f64>,
        linear_velocity: Vector3<f64>,
        angular_velocity: Vector3<f64>,
    ) -> Self {
        Self {
            position,
            quaternion,
            linear_velocity,
            angular_velocity,
            source: Source::Constructed,
            euler_angles: OnceLock::new(),
            rotation_mtx: OnceLock::new(),
        }
    }

    /// Fresh object decoded from a vehicle telemetry slice.
    pub fn from_car_data(car_data: &[f64]) -> Result<Self> {
        let mut obj = Self::default();
        obj.decode_car_data(car_data)?;
        Ok(obj)
    }

    /// Fresh object decoded from a ball telemetry slice.
    ///
    /// The ball has no orientation, so `quaternion` stays at the default placeholder.
    pub fn from_ball_data(ball_data: &[f64]) -> Result<Self> {
        let mut obj = Self::default();
        obj.decode_ball_data(ball_data)?;
        Ok(obj)
    }

    #[inline]
    pub fn source(&self) -> Source {
        self.source
    }

    /// Decode a 13-float vehicle slice:
    /// `[pos.xyz, quat.wxyz, linvel.xyz, angvel.xyz]`.
    ///
    /// On error the object is left untouched. Derived caches are not reset.
    pub fn decode_car_data(&mut self, car_data: &[f64]) -> Result<()> {
        check_len(Body::Car, car_data, CAR_STATE_LENGTH)?;

        let q = &car_data[CAR_QUATERNION_OFFSET..CAR_QUATERNION_OFFSET + 4];
        self.position = vec3_at(car_data, CAR_POSITION_OFFSET);
        self.quaternion = Quaternion::new(q[0], q[1], q[2], q[3]);
        self.linear_velocity = vec3_at(car_data, CAR_LINEAR_VELOCITY_OFFSET);
        self.angular_velocity = vec3_at(car_data, CAR_ANGULAR_VELOCITY_OFFSET);
        self.source = Source::Car;

        Ok(())
    }

    /// Decode a 9-float ball slice: `[pos.xyz, linvel.xyz, angvel.xyz]`.
    ///
    /// `quaternion` is not touched. On error the object is left untouched.
    pub fn decode_ball_data(&mut self, ball_data: &[f64]) -> Result<()> {
        check_len(Body::Ball, ball_data, BALL_STATE_LENGTH)?;

        self.position = vec3_at(ball_data, BALL_POSITION_OFFSET);
        self.linear_velocity = vec3_at(ball_data, BALL_LINEAR_VELOCITY_OFFSET);
        self.angular_velocity = vec3_at(ball_data, BALL_ANGULAR_VELOCITY_OFFSET);
        self.source = Source::Ball;

        Ok(())
    }

    /// `[pitch, yaw, roll]` in radians, derived once from `quaternion`.
    pub fn euler_angles(&self) -> Vector3<f64> {
        *self.euler_angles.get_or_init(|| {
            #[cfg(test)]
            tests::EULER_DERIVATIONS.with(|c| c.set(c.get() + 1));

            let euler = quat_to_euler(&self.quaternion);
            log::trace!("derived euler angles {euler:?} from {:?}", self.quaternion);
            euler
        })
    }

    /// Rotation matrix with forward/left/up columns, derived once from `quaternion`.
    ///
    /// A zero quaternion yields the zero matrix.
    pub fn rotation_mtx(&self) -> Matrix3<f64> {
        *self.rotation_mtx.get_or_init(|| {
            #[cfg(test)]
            tests::ROTATION_DERIVATIONS.with(|c| c.set(c.get() + 1));

            let mtx = quat_to_rot_mtx(&self.quaternion);
            log::trace!("derived rotation matrix from {:?}", self.quaternion);
            mtx
        })
    }

    /// Drop both derived caches so the next access recomputes from `quaternion`.
    pub fn reset_derived(&mut self) {
        self.euler_angles.take();
        self.rotation_mtx.take();
    }

    #[inline]
    pub fn forward(&self) -> Vector3<f64> {
        self.rotation_mtx().column(0).into_owned()
    }

    /// Column 1 of the rotation matrix, as stored.
    #[inline]
    pub fn right(&self) -> Vector3<f64> {
        self.rotation_mtx().column(1).into_owned()
    }

    /// Negated column 1 of the rotation matrix.
    #[inline]
    pub fn left(&self) -> Vector3<f64> {
        -self.right()
    }

    #[inline]
    pub fn up(&self) -> Vector3<f64> {
        self.rotation_mtx().column(2).into_owned()
    }

    #[inline]
    pub fn pitch(&self) -> f64 {
        self.euler_angles()[0]
    }

    #[inline]
    pub fn yaw(&self) -> f64 {
        self.euler_angles()[1]
    }

    #[inline]
    pub fn roll(&self) -> f64 {
        self.euler_angles()[2]
    }

    /// Flatten into `[position(3), quaternion wxyz(4), linear_velocity(3),
    /// angular_velocity(3), euler_angles(3), rotation matrix row-major(9)]`.
    ///
    /// The derived parts are emitted as currently cached: a field that was never
    /// accessed serializes as zeros. Use [`PhysicsObject::serialize_derived`] to force
    /// derivation first.
    pub fn serialize(&self) -> [f64; SERIALIZED_LENGTH] {
        let quat = [
            self.quaternion.w,
            self.quaternion.i,
            self.quaternion.j,
            self.quaternion.k,
        ];
        let euler = self.euler_angles.get().copied().unwrap_or_else(Vector3::zeros);
        // Column-major storage of the transpose is row-major order of the matrix.
        let rot_rows = self
            .rotation_mtx
            .get()
            .copied()
            .unwrap_or_else(Matrix3::zeros)
            .transpose();

        let values = self
            .position
            .iter()
            .chain(&quat)
            .chain(self.linear_velocity.iter())
            .chain(self.angular_velocity.iter())
            .chain(euler.iter())
            .chain(rot_rows.iter());

        let mut out = [0.0; SERIALIZED_LENGTH];
        for (slot, v) in out.iter_mut().zip(values) {
            *slot = *v;
        }
        out
    }

    /// Same layout as [`PhysicsObject::serialize`], deriving Euler angles and the rotation
    /// matrix first if needed.
    pub fn serialize_derived(&self) -> [f64; SERIALIZED_LENGTH] {
        self.euler_angles();
        self.rotation_mtx();
        self.serialize()
    }
}

fn check_len(body: Body, data: &[f64], expected: usize) -> Result<()> {
    if data.len() != expected {
        log::warn!(
            "Rejecting {body} telemetry: got {} values, expected {expected}",
            data.len()
        );
        return Err(TelemetryError::MalformedTelemetry {
            body,
            expected,
            got: data.len(),
        });
    }

    Ok(())
}

/// Caller guarantees `offset + 3 <= data.len()`.
#[inline]
fn vec3_at(data: &[f64], offset: usize) -> Vector3<f64> {
    Vector3::from_column_slice(&data[offset..offset + 3])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::euler_to_quaternion;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use std::cell::Cell;

    thread_local! {
        pub(super) static EULER_DERIVATIONS: Cell<usize> = const { Cell::new(0) };
        pub(super) static ROTATION_DERIVATIONS: Cell<usize> = const { Cell::new(0) };
    }

    const CAR: [f64; CAR_STATE_LENGTH] = [
        100.0, -2048.5, 17.0, // position
        0.5, 0.5, -0.5, 0.5, // quaternion wxyz
        1200.0, 0.0, -3.25, // linear velocity
        0.1, 5.5, -0.01, // angular velocity
    ];

    const BALL: [f64; BALL_STATE_LENGTH] = [
        0.0, 0.0, 92.75, // position
        -400.0, 250.0, 0.0, // linear velocity
        0.0, 1.5, -6.0, // angular velocity
    ];

    fn euler_derivations() -> usize {
        EULER_DERIVATIONS.with(Cell::get)
    }

    fn rotation_derivations() -> usize {
        ROTATION_DERIVATIONS.with(Cell::get)
    }

    fn yawed(pyr: Vector3<f64>) -> PhysicsObject {
        PhysicsObject::new(
            Vector3::zeros(),
            euler_to_quaternion(&pyr),
            Vector3::zeros(),
            Vector3::zeros(),
        )
    }

    #[test]
    fn default_table() {
        let obj = PhysicsObject::default();
        assert_eq!(obj.position, Vector3::zeros());
        assert_eq!(obj.quaternion, Quaternion::new(1.0, 1.0, 1.0, 1.0));
        assert_eq!(obj.linear_velocity, Vector3::zeros());
        assert_eq!(obj.angular_velocity, Vector3::zeros());
        assert_eq!(obj.source(), Source::Constructed);
        assert!(obj.serialize()[13..].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn decode_car_data_reproduces_fields() {
        let mut obj = PhysicsObject::default();
        obj.decode_car_data(&CAR).unwrap();

        assert_eq!(obj.position, Vector3::new(100.0, -2048.5, 17.0));
        assert_eq!(obj.quaternion, Quaternion::new(0.5, 0.5, -0.5, 0.5));
        assert_eq!(obj.quaternion.w, 0.5);
        assert_eq!(obj.quaternion.j, -0.5);
        assert_eq!(obj.linear_velocity, Vector3::new(1200.0, 0.0, -3.25));
        assert_eq!(obj.angular_velocity, Vector3::new(0.1, 5.5, -0.01));
        assert_eq!(obj.source(), Source::Car);
    }

    #[test]
    fn decode_ball_data_keeps_quaternion() {
        let mut obj = PhysicsObject::from_car_data(&CAR).unwrap();
        let quat_before = obj.quaternion;

        obj.decode_ball_data(&BALL).unwrap();

        assert_eq!(obj.position, Vector3::new(0.0, 0.0, 92.75));
        assert_eq!(obj.linear_velocity, Vector3::new(-400.0, 250.0, 0.0));
        assert_eq!(obj.angular_velocity, Vector3::new(0.0, 1.5, -6.0));
        assert_eq!(obj.quaternion, quat_before);
        assert_eq!(obj.source(), Source::Ball);
    }

    #[test]
    fn from_ball_data_keeps_placeholder_orientation() {
        let obj = PhysicsObject::from_ball_data(&BALL).unwrap();
        assert_eq!(obj.quaternion, Quaternion::new(1.0, 1.0, 1.0, 1.0));
    }

    #[test]
    fn wrong_lengths_are_rejected_without_side_effects() {
        let mut obj = PhysicsObject::from_ball_data(&BALL).unwrap();
        let before = obj.serialize();

        let err = obj.decode_car_data(&CAR[..12]).unwrap_err();
        assert_eq!(
            err,
            TelemetryError::MalformedTelemetry {
                body: Body::Car,
                expected: 13,
                got: 12
            }
        );

        let mut too_long = BALL.to_vec();
        too_long.push(1.0);
        let err = obj.decode_ball_data(&too_long).unwrap_err();
        assert_eq!(
            err,
            TelemetryError::MalformedTelemetry {
                body: Body::Ball,
                expected: 9,
                got: 10
            }
        );

        assert!(obj.decode_ball_data(&CAR).is_err());
        assert!(obj.decode_car_data(&[]).is_err());
        assert!(PhysicsObject::from_car_data(&BALL).is_err());

        assert_eq!(obj.serialize(), before);
        assert_eq!(obj.source(), Source::Ball);
    }

    #[test]
    fn euler_angles_are_computed_once() {
        let obj = PhysicsObject::from_car_data(&CAR).unwrap();
        let start = euler_derivations();

        let first = obj.euler_angles();
        let second = obj.euler_angles();
        let _ = obj.pitch() + obj.yaw() + obj.roll();

        assert_eq!(first, second);
        assert_eq!(euler_derivations() - start, 1);
    }

    #[test]
    fn mutating_quaternion_leaves_cache_stale_until_reset() {
        let mut obj = yawed(Vector3::new(0.0, 0.5, 0.0));
        let first = obj.euler_angles();
        let first_mtx = obj.rotation_mtx();

        obj.quaternion = euler_to_quaternion(&Vector3::new(0.0, -1.0, 0.0));
        assert_eq!(obj.euler_angles(), first);
        assert_eq!(obj.rotation_mtx(), first_mtx);

        obj.reset_derived();
        assert_relative_eq!(obj.yaw(), -1.0, epsilon = 1.0e-12);
        assert_ne!(obj.rotation_mtx(), first_mtx);
    }

    #[test]
    fn decoding_again_does_not_invalidate() {
        let mut obj = PhysicsObject::from_car_data(&CAR).unwrap();
        let first = obj.euler_angles();

        let mut next = CAR;
        next[3..7].copy_from_slice(&[1.0, 0.0, 0.0, 0.0]);
        obj.decode_car_data(&next).unwrap();
        assert_eq!(obj.euler_angles(), first);

        obj.reset_derived();
        assert_abs_diff_eq!(obj.euler_angles(), Vector3::zeros());
    }

    #[test]
    fn rotation_mtx_is_computed_once() {
        let obj = PhysicsObject::from_car_data(&CAR).unwrap();
        let start = rotation_derivations();

        let m = obj.rotation_mtx();
        let _ = (obj.forward(), obj.right(), obj.left(), obj.up());

        assert_eq!(obj.rotation_mtx(), m);
        assert_eq!(rotation_derivations() - start, 1);
    }

    #[test]
    fn basis_vectors_follow_matrix_columns() {
        let obj = yawed(Vector3::zeros());

        assert_abs_diff_eq!(obj.forward(), Vector3::new(1.0, 0.0, 0.0));
        assert_abs_diff_eq!(obj.right(), Vector3::new(0.0, 1.0, 0.0));
        assert_abs_diff_eq!(obj.left(), Vector3::new(0.0, -1.0, 0.0));
        assert_abs_diff_eq!(obj.up(), Vector3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn basis_vectors_after_yaw() {
        let obj = yawed(Vector3::new(0.0, std::f64::consts::FRAC_PI_2, 0.0));

        assert_abs_diff_eq!(obj.forward(), Vector3::new(0.0, 1.0, 0.0), epsilon = 1.0e-12);
        assert_abs_diff_eq!(obj.left(), Vector3::new(1.0, 0.0, 0.0), epsilon = 1.0e-12);
        assert_abs_diff_eq!(obj.left(), obj.forward().cross(&obj.up()), epsilon = 1.0e-12);
        assert_relative_eq!(obj.yaw(), std::f64::consts::FRAC_PI_2, epsilon = 1.0e-12);
    }

    #[test]
    fn pitch_yaw_roll_index_euler_angles() {
        let pyr = Vector3::new(0.25, -1.5, 2.0);
        let obj = yawed(pyr);

        assert_relative_eq!(obj.pitch(), 0.25, epsilon = 1.0e-12);
        assert_relative_eq!(obj.yaw(), -1.5, epsilon = 1.0e-12);
        assert_relative_eq!(obj.roll(), 2.0, epsilon = 1.0e-12);
        assert_eq!(obj.euler_angles(), Vector3::new(obj.pitch(), obj.yaw(), obj.roll()));
    }

    #[test]
    fn serialize_before_derivation_emits_zero_derived_fields() {
        let obj = PhysicsObject::from_car_data(&CAR).unwrap();
        let out = obj.serialize();

        assert_eq!(out.len(), SERIALIZED_LENGTH);
        assert_eq!(out[..13], CAR);
        assert_eq!(out[13..], [0.0; 12]);
        // Serializing does not derive anything as a side effect.
        assert_eq!(obj.serialize()[13..], [0.0; 12]);
    }

    #[test]
    fn serialize_after_derivation_emits_cached_values_row_major() {
        let obj = PhysicsObject::from_car_data(&CAR).unwrap();
        let euler = obj.euler_angles();
        let m = obj.rotation_mtx();
        let out = obj.serialize();

        assert_eq!(out[13..16], [euler[0], euler[1], euler[2]]);
        for r in 0..3 {
            for c in 0..3 {
                assert_eq!(out[16 + r * 3 + c], m[(r, c)]);
            }
        }
    }

    #[test]
    fn serialize_only_includes_what_was_derived() {
        let obj = PhysicsObject::from_car_data(&CAR).unwrap();
        let m = obj.rotation_mtx();
        let out = obj.serialize();

        assert_eq!(out[13..16], [0.0; 3]);
        assert_eq!(out[16], m[(0, 0)]);
    }

    #[test]
    fn serialize_derived_forces_computation() {
        let obj = PhysicsObject::from_car_data(&CAR).unwrap();
        let out = obj.serialize_derived();

        let euler = obj.euler_angles();
        assert_eq!(out[13..16], [euler[0], euler[1], euler[2]]);
        assert_eq!(out[16..], obj.rotation_mtx().transpose().as_slice()[..]);
        assert_eq!(obj.serialize(), out);
    }

    #[test]
    fn zero_quaternion_derives_zero_matrix() {
        let obj = PhysicsObject::new(
            Vector3::zeros(),
            Quaternion::new(0.0, 0.0, 0.0, 0.0),
            Vector3::zeros(),
            Vector3::zeros(),
        );
        assert_eq!(obj.rotation_mtx(), Matrix3::zeros());
        assert_eq!(obj.forward(), Vector3::zeros());
    }

    #[test]
    fn shared_snapshot_derives_consistently_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PhysicsObject>();

        let obj = PhysicsObject::from_car_data(&CAR).unwrap();
        let results: Vec<_> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| s.spawn(|| (obj.euler_angles(), obj.rotation_mtx())))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        for r in &results {
            assert_eq!(*r, results[0]);
        }
        assert_eq!(results[0].0, obj.euler_angles());
    }

    #[test]
    fn clone_carries_cached_values() {
        let mut obj = PhysicsObject::from_car_data(&CAR).unwrap();
        let euler = obj.euler_angles();
        let copy = obj.clone();

        obj.reset_derived();
        assert_eq!(copy.serialize()[13..16], [euler[0], euler[1], euler[2]]);
        assert_eq!(obj.serialize()[13..16], [0.0; 3]);
    }
}
