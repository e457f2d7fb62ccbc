//! Common functions for working in the local shading frame, where the
//! shading normal is the z-axis.

use crate::geometry::*;
use crate::pbrt::*;

/// Returns cos(θ) for a normalized vector in the shading coordinate system.
///
/// * `w` - The normalized vector.
#[inline(always)]
pub fn cos_theta(w: &Vector3f) -> Float {
    w.z
}

/// Returns cos^2(θ) for a normalized vector in the shading coordinate system.
///
/// * `w` - The normalized vector.
#[inline(always)]
pub fn cos_2_theta(w: &Vector3f) -> Float {
    w.z * w.z
}

/// Returns |cos(θ)| for a normalized vector in the shading coordinate system.
///
/// * `w` - The normalized vector.
#[inline(always)]
pub fn abs_cos_theta(w: &Vector3f) -> Float {
    abs(w.z)
}

/// Returns sin^2(θ) for a normalized vector in the shading coordinate system.
///
/// * `w` - The normalized vector.
#[inline(always)]
pub fn sin_2_theta(w: &Vector3f) -> Float {
    max(0.0, 1.0 - cos_2_theta(w))
}

/// Returns sin(θ) for a normalized vector in the shading coordinate system.
///
/// * `w` - The normalized vector.
#[inline(always)]
pub fn sin_theta(w: &Vector3f) -> Float {
    sin_2_theta(w).sqrt()
}

/// Returns tan^2(θ) for a normalized vector in the shading coordinate system.
///
/// * `w` - The normalized vector.
#[inline(always)]
pub fn tan_2_theta(w: &Vector3f) -> Float {
    sin_2_theta(w) / cos_2_theta(w)
}

/// Returns cos(φ) for a normalized vector in the shading coordinate system.
///
/// * `w` - The normalized vector.
#[inline(always)]
pub fn cos_phi(w: &Vector3f) -> Float {
    let sin_theta = sin_theta(w);
    if sin_theta == 0.0 {
        1.0
    } else {
        clamp(w.x / sin_theta, -1.0, 1.0)
    }
}

/// Returns sin(φ) for a normalized vector in the shading coordinate system.
///
/// * `w` - The normalized vector.
#[inline(always)]
pub fn sin_phi(w: &Vector3f) -> Float {
    let sin_theta = sin_theta(w);
    if sin_theta == 0.0 {
        0.0
    } else {
        clamp(w.y / sin_theta, -1.0, 1.0)
    }
}

/// Returns the cosine of the angle between two vectors projected onto the
/// shading plane.
///
/// * `wa` - The first vector.
/// * `wb` - The second vector.
#[inline(always)]
pub fn cos_d_phi(wa: &Vector3f, wb: &Vector3f) -> Float {
    let waxy = wa.x * wa.x + wa.y * wa.y;
    let wbxy = wb.x * wb.x + wb.y * wb.y;
    if waxy == 0.0 || wbxy == 0.0 {
        1.0
    } else {
        clamp((wa.x * wb.x + wa.y * wb.y) / (waxy * wbxy).sqrt(), -1.0, 1.0)
    }
}

/// Returns true if two vectors are in the same hemisphere.
///
/// * `w`  - First vector.
/// * `wp` - Second vector.
#[inline(always)]
pub fn same_hemisphere(w: &Vector3f, wp: &Vector3f) -> bool {
    w.z * wp.z > 0.0
}

/// Reflect a vector about a normal.
///
/// * `wo` - The vector to reflect.
/// * `n`  - The normal.
#[inline(always)]
pub fn reflect(wo: &Vector3f, n: &Vector3f) -> Vector3f {
    -(*wo) + *n * (2.0 * wo.dot(n))
}

/// Computes the refracted direction given an incident direction, a normal on
/// the incident side and the relative index of refraction. Returns the
/// transmitted direction and the relative index along the path, or `None`
/// on total internal reflection.
///
/// * `wi`  - Incident direction.
/// * `n`   - Surface normal.
/// * `eta` - Relative index of refraction (transmitted over incident).
pub fn refract(wi: &Vector3f, n: &Vector3f, eta: Float) -> Option<(Vector3f, Float)> {
    let mut cos_theta_i = n.dot(wi);
    let mut eta = eta;
    let mut n = *n;

    // Potentially flip interface orientation.
    if cos_theta_i < 0.0 {
        eta = 1.0 / eta;
        cos_theta_i = -cos_theta_i;
        n = -n;
    }

    // Compute cos(θt) using Snell's law.
    let sin2_theta_i = max(0.0, 1.0 - cos_theta_i * cos_theta_i);
    let sin2_theta_t = sin2_theta_i / (eta * eta);

    // Handle total internal reflection for transmission.
    if sin2_theta_t >= 1.0 {
        return None;
    }

    let cos_theta_t = safe_sqrt(1.0 - sin2_theta_t);
    let wt = -(*wi) / eta + n * (cos_theta_i / eta - cos_theta_t);
    Some((wt, eta))
}

// ---- Tests ----

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use proptest::prelude::*;

    prop_hemisphere_direction!(direction);

    #[test]
    fn refract_straight_through_at_normal_incidence() {
        let z = Vector3f::new(0.0, 0.0, 1.0);
        let (wt, etap) = refract(&z, &z, 1.5).unwrap();
        assert!(approx_eq!(f32, wt.z, -1.0, epsilon = 1e-6));
        assert_eq!(etap, 1.5);
    }

    #[test]
    fn refract_total_internal_reflection() {
        let z = Vector3f::new(0.0, 0.0, 1.0);
        let w = Vector3f::new(0.9, 0.0, -(1.0f32 - 0.81).sqrt());
        assert!(refract(&w, &z, 1.5).is_none());
    }

    proptest! {
        #[test]
        fn reflect_preserves_cosine(w in direction()) {
            let n = Vector3f::new(0.0, 0.0, 1.0);
            let r = reflect(&w, &n);
            prop_assert!(approx_eq!(f32, r.z, w.z, epsilon = 1e-6));
            prop_assert!(approx_eq!(f32, r.x, -w.x, epsilon = 1e-6));
        }

        #[test]
        fn refraction_obeys_snell(w in direction(), eta in 1.01f32..2.5f32) {
            let n = Vector3f::new(0.0, 0.0, 1.0);
            let (wt, _) = refract(&w, &n, eta).unwrap();
            prop_assert!(approx_eq!(f32, sin_theta(&w), eta * sin_theta(&wt), epsilon = 1e-4));
        }
    }
}
