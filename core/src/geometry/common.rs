//! Common geometry functions.

use super::*;

/// Constructs a local coordinate system given only a single 3-D vector.
/// Returns the two additional vectors.
///
/// * `v1` - A normalized vector.
pub fn coordinate_system(v1: &Vector3f) -> (Vector3f, Vector3f) {
    let v2 = if abs(v1.x) > abs(v1.y) {
        Vector3f::new(-v1.z, 0.0, v1.x) / (v1.x * v1.x + v1.z * v1.z).sqrt()
    } else {
        Vector3f::new(0.0, v1.z, -v1.y) / (v1.y * v1.y + v1.z * v1.z).sqrt()
    };
    (v2, v1.cross(&v2))
}

/// Returns a direction from spherical coordinates about the z-axis.
///
/// * `sin_theta` - Sine of polar angle.
/// * `cos_theta` - Cosine of polar angle.
/// * `phi`       - Azimuth angle.
pub fn spherical_direction(sin_theta: Float, cos_theta: Float, phi: Float) -> Vector3f {
    Vector3f::new(
        clamp(sin_theta, -1.0, 1.0) * phi.cos(),
        clamp(sin_theta, -1.0, 1.0) * phi.sin(),
        clamp(cos_theta, -1.0, 1.0),
    )
}

/// Returns a direction from spherical coordinates about an arbitrary frame.
///
/// * `sin_theta` - Sine of polar angle.
/// * `cos_theta` - Cosine of polar angle.
/// * `phi`       - Azimuth angle.
/// * `x`         - Basis vector for x-axis.
/// * `y`         - Basis vector for y-axis.
/// * `z`         - Basis vector for z-axis.
pub fn spherical_direction_in_frame(
    sin_theta: Float,
    cos_theta: Float,
    phi: Float,
    x: &Vector3f,
    y: &Vector3f,
    z: &Vector3f,
) -> Vector3f {
    *x * (sin_theta * phi.cos()) + *y * (sin_theta * phi.sin()) + *z * cos_theta
}

/// Returns the polar angle of a normalized direction.
///
/// * `v` - The direction.
pub fn spherical_theta(v: &Vector3f) -> Float {
    safe_acos(v.z)
}

/// Returns the azimuth angle of a direction in `[0, 2π)`.
///
/// * `v` - The direction.
pub fn spherical_phi(v: &Vector3f) -> Float {
    let p = v.y.atan2(v.x);
    if p < 0.0 {
        p + TWO_PI
    } else {
        p
    }
}

/// Flips `v` so it lies in the same hemisphere as `n`.
///
/// * `v` - The vector to flip.
/// * `n` - The reference normal.
pub fn face_forward(v: &Vector3f, n: &Normal3f) -> Vector3f {
    if v.dot_normal(n) < 0.0 {
        -*v
    } else {
        *v
    }
}

// ---- Tests ----

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use proptest::prelude::*;

    prop_hemisphere_direction!(direction);

    proptest! {
        #[test]
        fn coordinate_system_is_orthonormal(v in direction()) {
            let (a, b) = coordinate_system(&v);
            prop_assert!(approx_eq!(f32, a.dot(&v), 0.0, epsilon = 1e-5));
            prop_assert!(approx_eq!(f32, b.dot(&v), 0.0, epsilon = 1e-5));
            prop_assert!(approx_eq!(f32, a.dot(&b), 0.0, epsilon = 1e-5));
            prop_assert!(approx_eq!(f32, a.length(), 1.0, epsilon = 1e-4));
            prop_assert!(approx_eq!(f32, b.length(), 1.0, epsilon = 1e-4));
        }

        #[test]
        fn spherical_round_trip(v in direction()) {
            let w = spherical_direction(spherical_theta(&v).sin(), v.z, spherical_phi(&v));
            prop_assert!(approx_eq!(f32, (w - v).length(), 0.0, epsilon = 1e-3));
        }
    }
}
