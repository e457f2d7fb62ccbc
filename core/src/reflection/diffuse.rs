//! Diffuse BxDFs

use super::*;

/// Lambertian reflection. Scatters light equally in all directions of the
/// hemisphere.
#[derive(Copy, Clone, Debug)]
pub struct IdealDiffuseBxDF {
    /// Reflectance spectrum which gives the fraction of incident light that
    /// is scattered.
    r: Spectrum,
}

impl IdealDiffuseBxDF {
    /// Create a new `IdealDiffuseBxDF`.
    ///
    /// * `r` - Reflectance.
    pub fn new(r: Spectrum) -> Self {
        Self { r }
    }
}

impl BxDFModel for IdealDiffuseBxDF {
    fn flags(&self) -> BxDFFlags {
        if self.r.is_black() {
            BxDFFlags::empty()
        } else {
            BxDFFlags::DIFFUSE_REFLECTION
        }
    }

    fn f(&self, wo: &Vector3f, wi: &Vector3f, _mode: TransportMode) -> Spectrum {
        if same_hemisphere(wo, wi) {
            self.r * INV_PI
        } else {
            Spectrum::ZERO
        }
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

        // Cosine-sample the hemisphere, flipping the direction if necessary.
        let mut wi = cosine_sample_hemisphere(u);
        if wo.z < 0.0 {
            wi.z *= -1.0;
        }
        let pdf = abs_cos_theta(&wi) * INV_PI;
        let bs = BSDFSample::new(self.f(wo, &wi, mode), wi, pdf, BxDFFlags::DIFFUSE_REFLECTION);
        Some(bs).filter(BSDFSample::is_valid)
    }

    fn pdf(&self, wo: &Vector3f, wi: &Vector3f, _mode: TransportMode, sample_flags: BxDFReflTransFlags) -> Float {
        if !sample_flags.contains(BxDFReflTransFlags::REFLECTION) || !same_hemisphere(wo, wi) {
            0.0
        } else {
            abs_cos_theta(wi) * INV_PI
        }
    }
}

/// Oren-Nayar microfacet model for rough diffuse surfaces with an optional
/// diffuse transmission lobe.
#[derive(Copy, Clone, Debug)]
pub struct DiffuseBxDF {
    /// Reflectance.
    r: Spectrum,

    /// Transmittance.
    t: Spectrum,

    /// Oren-Nayar A term.
    a: Float,

    /// Oren-Nayar B term. Zero reduces to the Lambertian model.
    b: Float,
}

impl DiffuseBxDF {
    /// Create a new `DiffuseBxDF`.
    ///
    /// * `r`     - Reflectance.
    /// * `t`     - Transmittance.
    /// * `sigma` - Standard deviation of the microfacet orientation angle in
    ///             degrees.
    pub fn new(r: Spectrum, t: Spectrum, sigma: Float) -> Self {
        let sigma2 = sqr(radians(sigma));
        Self {
            r,
            t,
            a: 1.0 - sigma2 / (2.0 * (sigma2 + 0.33)),
            b: 0.45 * sigma2 / (sigma2 + 0.09),
        }
    }

    /// Returns the lobe selection weights for reflection and transmission.
    ///
    /// * `sample_flags` - Lobes that may be sampled.
    fn lobe_weights(&self, sample_flags: BxDFReflTransFlags) -> (Float, Float) {
        let pr = if sample_flags.contains(BxDFReflTransFlags::REFLECTION) {
            self.r.max_component_value()
        } else {
            0.0
        };
        let pt = if sample_flags.contains(BxDFReflTransFlags::TRANSMISSION) {
            self.t.max_component_value()
        } else {
            0.0
        };
        (pr, pt)
    }
}

impl BxDFModel for DiffuseBxDF {
    fn flags(&self) -> BxDFFlags {
        let mut flags = BxDFFlags::empty();
        if !self.r.is_black() {
            flags |= BxDFFlags::DIFFUSE_REFLECTION;
        }
        if !self.t.is_black() {
            flags |= BxDFFlags::DIFFUSE_TRANSMISSION;
        }
        flags
    }

    fn f(&self, wo: &Vector3f, wi: &Vector3f, _mode: TransportMode) -> Spectrum {
        let same = same_hemisphere(wo, wi);
        let scale = if same { self.r } else { self.t };
        if self.b == 0.0 || scale.is_black() {
            return scale * INV_PI;
        }

        // Compute cosine term of Oren-Nayar model.
        let sin_theta_i = sin_theta(wi);
        let sin_theta_o = sin_theta(wo);
        let max_cos = if sin_theta_i > 0.0 && sin_theta_o > 0.0 {
            max(0.0, cos_d_phi(wi, wo))
        } else {
            0.0
        };

        // Compute sine and tangent terms of Oren-Nayar model.
        let (sin_alpha, tan_beta) = if abs_cos_theta(wi) > abs_cos_theta(wo) {
            (sin_theta_o, sin_theta_i / abs_cos_theta(wi))
        } else {
            (sin_theta_i, sin_theta_o / abs_cos_theta(wo))
        };
        if !tan_beta.is_finite() {
            return Spectrum::ZERO;
        }

        scale * INV_PI * (self.a + self.b * max_cos * sin_alpha * tan_beta)
    }

    fn sample_f(
        &self,
        wo: &Vector3f,
        uc: Float,
        u: &Point2f,
        mode: TransportMode,
        sample_flags: BxDFReflTransFlags,
    ) -> Option<BSDFSample> {
        let (pr, pt) = self.lobe_weights(sample_flags);
        let (lobe, cpdf, _) = sample_discrete(&[pr, pt], uc)?;

        let mut wi = cosine_sample_hemisphere(u);
        let flags = if lobe == 0 {
            if wo.z < 0.0 {
                wi.z *= -1.0;
            }
            BxDFFlags::DIFFUSE_REFLECTION
        } else {
            if wo.z > 0.0 {
                wi.z *= -1.0;
            }
            BxDFFlags::DIFFUSE_TRANSMISSION
        };

        let pdf = abs_cos_theta(&wi) * INV_PI * cpdf;
        Some(BSDFSample::new(self.f(wo, &wi, mode), wi, pdf, flags)).filter(BSDFSample::is_valid)
    }

    fn pdf(&self, wo: &Vector3f, wi: &Vector3f, _mode: TransportMode, sample_flags: BxDFReflTransFlags) -> Float {
        let (pr, pt) = self.lobe_weights(sample_flags);
        if pr == 0.0 && pt == 0.0 {
            return 0.0;
        }

        let p = if same_hemisphere(wo, wi) { pr } else { pt };
        p / (pr + pt) * abs_cos_theta(wi) * INV_PI
    }
}

// ---- Tests ----

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::RNG;
    use float_cmp::*;
    use proptest::prelude::*;

    prop_hemisphere_direction!(upper_direction);

    fn estimate_albedo(bxdf: &dyn BxDFModel, wo: &Vector3f, n: usize) -> Spectrum {
        let mut rng = RNG::new(7, 0);
        let mut sum = Spectrum::ZERO;
        for _ in 0..n {
            let uc = rng.uniform_float();
            let u = Point2f::new(rng.uniform_float(), rng.uniform_float());
            if let Some(bs) = bxdf.sample_f(wo, uc, &u, TransportMode::Radiance, BxDFReflTransFlags::ALL) {
                sum += bs.f * abs_cos_theta(&bs.wi) / bs.pdf;
            }
        }
        sum / n as Float
    }

    #[test]
    fn ideal_diffuse_albedo_matches_reflectance() {
        let bxdf = IdealDiffuseBxDF::new(Spectrum::new(0.5));
        let wo = Vector3f::new(0.3, 0.2, 0.9).normalize();
        let albedo = estimate_albedo(&bxdf, &wo, 10_000);
        for i in 0..3 {
            assert!(approx_eq!(Float, albedo[i], 0.5, epsilon = 1e-3));
        }
    }

    #[test]
    fn oren_nayar_albedo_is_bounded_by_reflectance() {
        let bxdf = DiffuseBxDF::new(Spectrum::new(0.8), Spectrum::ZERO, 20.0);
        let wo = Vector3f::new(0.5, -0.1, 0.6).normalize();
        let albedo = estimate_albedo(&bxdf, &wo, 10_000);
        assert!(albedo[0] > 0.6 && albedo[0] < 0.82, "albedo {}", albedo[0]);
    }

    #[test]
    fn diffuse_transmission_splits_by_lobe_weight() {
        let bxdf = DiffuseBxDF::new(Spectrum::new(0.3), Spectrum::new(0.6), 0.0);
        let wo = Vector3f::new(0.0, 0.0, 1.0);
        let down = Vector3f::new(0.0, 0.0, -1.0);
        let up = Vector3f::new(0.0, 0.0, 1.0);
        let mode = TransportMode::Radiance;
        let all = BxDFReflTransFlags::ALL;
        assert!(approx_eq!(Float, bxdf.pdf(&wo, &up, mode, all), INV_PI / 3.0, ulps = 4));
        assert!(approx_eq!(Float, bxdf.pdf(&wo, &down, mode, all), 2.0 * INV_PI / 3.0, ulps = 4));
        assert_eq!(bxdf.pdf(&wo, &down, mode, BxDFReflTransFlags::REFLECTION), 0.0);
        assert!(bxdf
            .sample_f(&wo, 0.5, &Point2f::new(0.5, 0.5), mode, BxDFReflTransFlags::empty())
            .is_none());
    }

    proptest! {
        #[test]
        fn oren_nayar_is_reciprocal(wo in upper_direction(), wi in upper_direction()) {
            let bxdf = DiffuseBxDF::new(Spectrum::new(0.7), Spectrum::ZERO, 30.0);
            let a = bxdf.f(&wo, &wi, TransportMode::Radiance);
            let b = bxdf.f(&wi, &wo, TransportMode::Radiance);
            prop_assert!(approx_eq!(Float, a[0], b[0], epsilon = 1e-5));
        }

        #[test]
        fn ideal_diffuse_pdf_matches_sample(wo in upper_direction(), u in (0.0f32..1.0, 0.0f32..1.0)) {
            let bxdf = IdealDiffuseBxDF::new(Spectrum::new(0.5));
            let mode = TransportMode::Radiance;
            if let Some(bs) = bxdf.sample_f(&wo, 0.5, &Point2f::new(u.0, u.1), mode, BxDFReflTransFlags::ALL) {
                let pdf = bxdf.pdf(&wo, &bs.wi, mode, BxDFReflTransFlags::ALL);
                prop_assert!(approx_eq!(Float, pdf, bs.pdf, epsilon = 1e-5));
            }
        }
    }
}
