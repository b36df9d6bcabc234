/// Number of floats in one vehicle telemetry slice.
///
/// Layout: `[pos.x, pos.y, pos.z, quat.w, quat.x, quat.y, quat.z,
/// linvel.x, linvel.y, linvel.z, angvel.x, angvel.y, angvel.z]`.
pub const CAR_STATE_LENGTH: usize = 13;

/// Number of floats in one ball telemetry slice.
///
/// Layout: `[pos.x, pos.y, pos.z, linvel.x, linvel.y, linvel.z, angvel.x, angvel.y, angvel.z]`.
/// The ball carries no orientation.
pub const BALL_STATE_LENGTH: usize = 9;

// Offsets into a vehicle telemetry slice.

/// Start of `pos.xyz` in a vehicle slice.
pub const CAR_POSITION_OFFSET: usize = 0;
/// Start of `quat.wxyz` in a vehicle slice.
pub const CAR_QUATERNION_OFFSET: usize = 3;
/// Start of `linvel.xyz` in a vehicle slice.
pub const CAR_LINEAR_VELOCITY_OFFSET: usize = 7;
/// Start of `angvel.xyz` in a vehicle slice.
pub const CAR_ANGULAR_VELOCITY_OFFSET: usize = 10;

// Offsets into a ball telemetry slice.

/// Start of `pos.xyz` in a ball slice.
pub const BALL_POSITION_OFFSET: usize = 0;
/// Start of `linvel.xyz` in a ball slice.
pub const BALL_LINEAR_VELOCITY_OFFSET: usize = 3;
/// Start of `angvel.xyz` in a ball slice.
pub const BALL_ANGULAR_VELOCITY_OFFSET: usize = 6;

/// Length of `PhysicsObject::serialize()` output:
/// position (3) + quaternion (4) + linear velocity (3) + angular velocity (3)
/// + euler angles (3) + row-major rotation matrix (9).
pub const SERIALIZED_LENGTH: usize = 3 + 4 + 3 + 3 + 3 + 9;

/// Placeholder orientation used before any vehicle telemetry has been decoded.
///
/// Convention: `(w, x, y, z)`. This is deliberately not the identity rotation;
/// it only guarantees a non-zero norm so rotation derivation on an empty state
/// stays finite.
pub const DEFAULT_QUATERNION: [f64; 4] = [1.0, 1.0, 1.0, 1.0];

/// Default linear velocity for a freshly constructed state.
///
/// The one canonical default for every body kind.
pub const DEFAULT_LINEAR_VELOCITY: [f64; 3] = [0.0, 0.0, 0.0];
