//! BSSRDF Adapter

use super::*;
use std::fmt;

/// Diffuse-like lobe used at the exit point of a subsurface scattering path.
/// It accounts for Fresnel transmission out of the medium.
#[derive(Copy, Clone, Debug)]
pub struct BSSRDFAdapter {
    /// Relative index of refraction of the scattering medium.
    eta: Float,
}

impl BSSRDFAdapter {
    /// Create a new `BSSRDFAdapter`.
    ///
    /// * `eta` - Relative index of refraction.
    pub fn new(eta: Float) -> Self {
        Self { eta }
    }
}

impl BxDFModel for BSSRDFAdapter {
    fn flags(&self) -> BxDFFlags {
        BxDFFlags::DIFFUSE_REFLECTION
    }

    fn f(&self, wo: &Vector3f, wi: &Vector3f, mode: TransportMode) -> Spectrum {
        if !same_hemisphere(wo, wi) {
            return Spectrum::ZERO;
        }

        // Normalized Fresnel-weighted diffuse lobe.
        let c = 1.0 - 2.0 * fresnel_moment1(1.0 / self.eta);
        let mut f = (1.0 - fr_dielectric(cos_theta(wi), self.eta)) / (c * PI);

        // Account for solid angle compression on the way out.
        if mode == TransportMode::Radiance {
            f *= sqr(self.eta);
        }
        Spectrum::new(f)
    }

    fn sample_f(
        &self,
        wo: &Vector3f,
        _uc: Float,
        u: &Point2f,
        mode: TransportMode,
        sample_flags: BxDFReflTransFlags,
    ) -> Option<BSDFSample> {
        if !sample_flags.contains(BxDFReflTransFlags::REFLECTION) {
            return None;
        }

        let mut wi = cosine_sample_hemisphere(u);
        if wo.z < 0.0 {
            wi.z *= -1.0;
        }
        let pdf = self.pdf(wo, &wi, mode, sample_flags);
        Some(BSDFSample::new(self.f(wo, &wi, mode), wi, pdf, BxDFFlags::DIFFUSE_REFLECTION))
            .filter(BSDFSample::is_valid)
    }

    fn pdf(&self, wo: &Vector3f, wi: &Vector3f, _mode: TransportMode, sample_flags: BxDFReflTransFlags) -> Float {
        if !sample_flags.contains(BxDFReflTransFlags::REFLECTION) || !same_hemisphere(wo, wi) {
            0.0
        } else {
            abs_cos_theta(wi) * INV_PI
        }
    }
}

impl fmt::Display for BSSRDFAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ BSSRDFAdapter eta: {} ]", self.eta)
    }
}

// ---- Tests ----

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    #[test]
    fn zero_across_hemispheres() {
        let bxdf = BSSRDFAdapter::new(1.33);
        let wo = Vector3f::new(0.0, 0.0, 1.0);
        let wi = Vector3f::new(0.0, 0.6, -0.8);
        assert!(bxdf.f(&wo, &wi, TransportMode::Radiance).is_black());
        assert_eq!(bxdf.pdf(&wo, &wi, TransportMode::Radiance, BxDFReflTransFlags::ALL), 0.0);
    }

    #[test]
    fn radiance_mode_scales_by_eta_squared() {
        let bxdf = BSSRDFAdapter::new(1.33);
        let wo = Vector3f::new(0.0, 0.0, 1.0);
        let wi = Vector3f::new(0.0, 0.6, 0.8);
        let r = bxdf.f(&wo, &wi, TransportMode::Radiance)[0];
        let i = bxdf.f(&wo, &wi, TransportMode::Importance)[0];
        assert!(approx_eq!(Float, r, i * 1.33 * 1.33, epsilon = 1e-6));
    }

    #[test]
    fn samples_are_cosine_weighted() {
        let bxdf = BSSRDFAdapter::new(1.5);
        let wo = Vector3f::new(0.0, 0.0, -1.0);
        let bs = bxdf
            .sample_f(&wo, 0.5, &Point2f::new(0.3, 0.7), TransportMode::Radiance, BxDFReflTransFlags::ALL)
            .unwrap();
        assert!(bs.wi.z < 0.0);
        assert!(bs.is_reflection());
        assert!(approx_eq!(Float, bs.pdf, abs_cos_theta(&bs.wi) * INV_PI, epsilon = 1e-6));

        let none = bxdf.sample_f(
            &wo,
            0.5,
            &Point2f::new(0.3, 0.7),
            TransportMode::Radiance,
            BxDFReflTransFlags::TRANSMISSION,
        );
        assert!(none.is_none());
    }
}
