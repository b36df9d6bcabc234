use nalgebra::Vector3;
use rand::Rng;

/// Redraws allowed for an all-zero cube sample before falling back to [`FALLBACK_UVEC3`].
pub const MAX_UVEC3_REDRAWS: usize = 16;

/// Direction returned when every draw was the zero vector (e.g. a constant generator).
pub const FALLBACK_UVEC3: [f64; 3] = [1.0, 0.0, 0.0];

/// Random unit vector using the thread-local generator. See [`rand_uvec3_with`].
pub fn rand_uvec3() -> Vector3<f64> {
    rand_uvec3_with(&mut rand::rng())
}

/// Random unit vector: each component uniform in `[-0.5, 0.5)`, then normalized.
///
/// NOTE: normalizing a cube sample is not uniform over the sphere; it leans toward
/// the cube's corner directions.
///
/// An all-zero draw has no direction and is redrawn, at most [`MAX_UVEC3_REDRAWS`] times;
/// after that [`FALLBACK_UVEC3`] is returned so a degenerate generator cannot hang the caller.
pub fn rand_uvec3_with<R: Rng + ?Sized>(rng: &mut R) -> Vector3<f64> {
    for _ in 0..=MAX_UVEC3_REDRAWS {
        let v = Vector3::new(
            rng.random::<f64>() - 0.5,
            rng.random::<f64>() - 0.5,
            rng.random::<f64>() - 0.5,
        );
        let norm = v.norm();
        if norm > 0.0 {
            return v / norm;
        }
    }

    log::warn!("rand_uvec3: generator kept producing the zero vector, using fallback direction");
    Vector3::from(FALLBACK_UVEC3)
}

/// Random vector with a uniform random length in `[0, max_norm)`.
pub fn rand_vec3(max_norm: f64) -> Vector3<f64> {
    rand_vec3_with(&mut rand::rng(), max_norm)
}

pub fn rand_vec3_with<R: Rng + ?Sized>(rng: &mut R, max_norm: f64) -> Vector3<f64> {
    let dir = rand_uvec3_with(rng);
    dir * (rng.random::<f64>() * max_norm)
}
