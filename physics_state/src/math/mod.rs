/*!
Vector and orientation math used by [`crate::PhysicsObject`] and its consumers.

- vector:   norms, projections, cosine similarity, element-wise clipping
- rotation: quaternion / rotation matrix / Euler angle conversions
- random:   random unit and bounded vectors

All routines are plain local arithmetic over `f64` nalgebra types.
*/

pub mod random;
pub mod rotation;
pub mod vector;

pub use random::{rand_uvec3, rand_uvec3_with, rand_vec3, rand_vec3_with};
pub use rotation::{
    euler_to_quaternion, euler_to_rotation, quat_to_euler, quat_to_rot_mtx, rotation_to_quaternion,
};
pub use vector::{
    clip, clip_rows, cosine_similarity, get_dist, scalar_projection, squared_vecmag, unitvec,
    vecmag, vector_projection, vector_projection_with_mag_sq,
};
