use nalgebra::SVector;

/// Component-wise difference `a - b`.
#[inline]
pub fn get_dist<const D: usize>(a: &SVector<f64, D>, b: &SVector<f64, D>) -> SVector<f64, D> {
    a - b
}

/// Euclidean norm.
#[inline]
pub fn vecmag<const D: usize>(v: &SVector<f64, D>) -> f64 {
    v.norm()
}

#[inline]
pub fn squared_vecmag<const D: usize>(v: &SVector<f64, D>) -> f64 {
    v.norm_squared()
}

/// `v / |v|`.
///
/// The caller must guard against a zero-length input; the result is NaN in that case.
#[inline]
pub fn unitvec<const D: usize>(v: &SVector<f64, D>) -> SVector<f64, D> {
    v / vecmag(v)
}

/// Projection of `v` onto `onto`.
///
/// If `onto` has zero length it is returned unchanged (which is itself the zero vector),
/// so callers never see a division by zero.
#[inline]
pub fn vector_projection<const D: usize>(
    v: &SVector<f64, D>,
    onto: &SVector<f64, D>,
) -> SVector<f64, D> {
    vector_projection_with_mag_sq(v, onto, squared_vecmag(onto))
}

/// Same as [`vector_projection`], reusing an already known `|onto|^2`.
///
/// A zero `mag_sq` returns `onto` unchanged.
#[inline]
pub fn vector_projection_with_mag_sq<const D: usize>(
    v: &SVector<f64, D>,
    onto: &SVector<f64, D>,
    mag_sq: f64,
) -> SVector<f64, D> {
    if mag_sq == 0.0 {
        return *onto;
    }

    onto * (v.dot(onto) / mag_sq)
}

/// Signed length of `v` along `onto`. Returns `0.0` if `onto` has zero length.
#[inline]
pub fn scalar_projection<const D: usize>(v: &SVector<f64, D>, onto: &SVector<f64, D>) -> f64 {
    let norm = vecmag(onto);
    if norm == 0.0 {
        return 0.0;
    }

    v.dot(onto) / norm
}

/// Cosine of the angle between `a` and `b`.
///
/// Undefined (NaN) if either input has zero length; guarding is the caller's job.
#[inline]
pub fn cosine_similarity<const D: usize>(a: &SVector<f64, D>, b: &SVector<f64, D>) -> f64 {
    unitvec(a).dot(&unitvec(b))
}

/// Clamp every element into `[min, max]` in place.
///
/// Rule per element: `v > max` becomes `max`, then `min > v` becomes `min`.
/// With `min > max` the lower bound wins.
pub fn clip<T: PartialOrd + Copy>(values: &mut [T], min: T, max: T) {
    for v in values.iter_mut() {
        if *v > max {
            *v = max;
        }
        if min > *v {
            *v = min;
        }
    }
}

/// [`clip`] applied to every row of a two-level sequence (e.g. a batch of action vectors).
pub fn clip_rows<T: PartialOrd + Copy, R: AsMut<[T]>>(rows: &mut [R], min: T, max: T) {
    for row in rows.iter_mut() {
        clip(row.as_mut(), min, max);
    }
}
