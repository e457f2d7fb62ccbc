//! Trowbridge-Reitz Distribution

use super::MicrofacetDistribution;
use crate::geometry::*;
use crate::pbrt::*;
use crate::reflection::*;

/// Roughness below which a surface is treated as perfectly specular.
const SMOOTH_ALPHA: Float = 1e-3;

/// Implements the anisotropic variant of the Trowbridge-Reitz (GGX)
/// distribution.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct TrowbridgeReitzDistribution {
    /// For microfacets oriented perpendicular to the x-axis and where
    /// α = sqrt(2) * σ and σ is the RMS slope of microfacets.
    alpha_x: Float,

    /// For microfacets oriented perpendicular to the y-axis and where
    /// α = sqrt(2) * σ and σ is the RMS slope of microfacets.
    alpha_y: Float,
}

impl TrowbridgeReitzDistribution {
    /// Create a new `TrowbridgeReitzDistribution`.
    ///
    /// * `alpha_x` - Roughness along the x-axis.
    /// * `alpha_y` - Roughness along the y-axis.
    pub fn new(alpha_x: Float, alpha_y: Float) -> Self {
        let mut d = Self { alpha_x, alpha_y };
        if !d.effectively_smooth() {
            // Keep rough surfaces away from numerical trouble near zero.
            d.alpha_x = max(d.alpha_x, 1e-4);
            d.alpha_y = max(d.alpha_y, 1e-4);
        }
        d
    }

    /// Maps a perceptually linear roughness in [0, 1] to α.
    ///
    /// * `roughness` - Roughness parameter value.
    pub fn roughness_to_alpha(roughness: Float) -> Float {
        roughness.max(0.0).sqrt()
    }

    /// Returns the roughness along the x-axis.
    pub fn alpha_x(&self) -> Float {
        self.alpha_x
    }

    /// Returns the roughness along the y-axis.
    pub fn alpha_y(&self) -> Float {
        self.alpha_y
    }
}

impl MicrofacetDistribution for TrowbridgeReitzDistribution {
    /// Return the differential area of microfacets oriented with the surface
    /// normal `wm`.
    ///
    /// * `wm` - A microfacet normal.
    fn d(&self, wm: &Vector3f) -> Float {
        let tan2_theta = tan_2_theta(wm);
        if tan2_theta.is_infinite() || tan2_theta.is_nan() {
            return 0.0;
        }
        let cos4_theta = sqr(cos_2_theta(wm));
        if cos4_theta < 1e-16 {
            return 0.0;
        }
        let e = tan2_theta * (sqr(cos_phi(wm) / self.alpha_x) + sqr(sin_phi(wm) / self.alpha_y));
        1.0 / (PI * self.alpha_x * self.alpha_y * cos4_theta * sqr(1.0 + e))
    }

    /// Returns the invisible masked microfacet area per visible microfacet area.
    ///
    /// * `w` - The direction from camera/viewer.
    fn lambda(&self, w: &Vector3f) -> Float {
        let tan2_theta = tan_2_theta(w);
        if tan2_theta.is_infinite() || tan2_theta.is_nan() {
            return 0.0;
        }
        let alpha2 = sqr(cos_phi(w) * self.alpha_x) + sqr(sin_phi(w) * self.alpha_y);
        ((1.0 + alpha2 * tan2_theta).sqrt() - 1.0) / 2.0
    }

    fn effectively_smooth(&self) -> bool {
        max(self.alpha_x, self.alpha_y) < SMOOTH_ALPHA
    }

    /// Samples the visible normals by projecting a uniform disk sample onto
    /// the hemisphere of the stretched configuration.
    ///
    /// * `w` - The direction from camera/viewer.
    /// * `u` - The 2D uniform random values.
    fn sample_wm(&self, w: &Vector3f, u: &Point2f) -> Vector3f {
        // Transform `w` to the hemispherical configuration.
        let mut wh = Vector3f::new(self.alpha_x * w.x, self.alpha_y * w.y, w.z).normalize();
        if wh.z < 0.0 {
            wh = -wh;
        }

        // Find an orthonormal basis for the visible normal sample.
        let t1 = if wh.z < 0.99999 {
            Vector3f::new(0.0, 0.0, 1.0).cross(&wh).normalize()
        } else {
            Vector3f::new(1.0, 0.0, 0.0)
        };
        let t2 = wh.cross(&t1);

        // Generate a uniformly distributed point on the unit disk.
        let r = u[0].sqrt();
        let theta = TWO_PI * u[1];
        let px = r * theta.cos();
        let mut py = r * theta.sin();

        // Warp the disk point to the visible hemisphere projection.
        let h = (1.0 - px * px).max(0.0).sqrt();
        py = lerp((1.0 + wh.z) / 2.0, h, py);

        // Reproject to the hemisphere and transform the normal back.
        let pz = max(0.0, 1.0 - px * px - py * py).sqrt();
        let nh = t1 * px + t2 * py + wh * pz;
        Vector3f::new(self.alpha_x * nh.x, self.alpha_y * nh.y, max(1e-6, nh.z)).normalize()
    }

    fn regularize(&mut self) {
        if self.alpha_x < 0.3 {
            self.alpha_x = clamp(2.0 * self.alpha_x, 0.1, 0.3);
        }
        if self.alpha_y < 0.3 {
            self.alpha_y = clamp(2.0 * self.alpha_y, 0.1, 0.3);
        }
    }
}

// ---- Tests ----

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::RNG;
    use float_cmp::*;
    use proptest::prelude::*;

    prop_hemisphere_direction!(direction);

    #[test]
    fn smooth_detection_and_regularize() {
        let mut d = TrowbridgeReitzDistribution::new(0.0, 0.0);
        assert!(d.effectively_smooth());
        d.regularize();
        assert!(!d.effectively_smooth());
        assert!(approx_eq!(f32, d.alpha_x(), 0.1, ulps = 2));
    }

    #[test]
    fn projected_normals_integrate_to_one() {
        // ∫ D(wm) cos θm dωm = 1 over the hemisphere.
        let d = TrowbridgeReitzDistribution::new(0.3, 0.5);
        let mut rng = RNG::new(5, 1);
        let n = 200_000;
        let mut sum = 0.0;
        for _ in 0..n {
            let u = Point2f::new(rng.uniform_float(), rng.uniform_float());
            let wm = crate::sampling::uniform_sample_hemisphere(&u);
            sum += d.d(&wm) * wm.z / crate::sampling::uniform_hemisphere_pdf();
        }
        let estimate = sum / n as Float;
        assert!(approx_eq!(f32, estimate, 1.0, epsilon = 0.05), "estimate = {}", estimate);
    }

    proptest! {
        #[test]
        fn sampled_normals_face_viewer(w in direction(), u0 in 0.0f32..1.0f32, u1 in 0.0f32..1.0f32) {
            let d = TrowbridgeReitzDistribution::new(0.4, 0.2);
            let wm = d.sample_wm(&w, &Point2f::new(u0, u1));
            prop_assert!(wm.z > 0.0);
            prop_assert!(approx_eq!(f32, wm.length(), 1.0, epsilon = 1e-4));
            prop_assert!(d.pdf(&w, &wm) >= 0.0);
        }
    }
}
