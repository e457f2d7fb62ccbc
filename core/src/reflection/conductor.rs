//! Conductor BxDF

use super::*;
use crate::microfacet::*;

/// Reflection from a metal described by a complex index of refraction.
/// Smooth distributions yield a perfect mirror.
#[derive(Copy, Clone, Debug)]
pub struct ConductorBxDF<D: MicrofacetDistribution = TrowbridgeReitzDistribution> {
    /// Microfacet distribution.
    mf_distrib: D,

    /// Real part of the index of refraction.
    eta: Spectrum,

    /// Absorption coefficient.
    k: Spectrum,
}

impl<D: MicrofacetDistribution> ConductorBxDF<D> {
    /// Create a new `ConductorBxDF`.
    ///
    /// * `mf_distrib` - Microfacet distribution.
    /// * `eta`        - Real part of the index of refraction.
    /// * `k`          - Absorption coefficient.
    pub fn new(mf_distrib: D, eta: Spectrum, k: Spectrum) -> Self {
        Self { mf_distrib, eta, k }
    }

    /// Evaluates the Torrance-Sparrow term for a reflected pair.
    ///
    /// * `wo` - Outgoing direction.
    /// * `wi` - Incident direction.
    /// * `wm` - Normalized half vector.
    fn torrance_sparrow(&self, wo: &Vector3f, wi: &Vector3f, wm: &Vector3f) -> Spectrum {
        let cos_theta_o = abs_cos_theta(wo);
        let cos_theta_i = abs_cos_theta(wi);
        if cos_theta_i == 0.0 || cos_theta_o == 0.0 {
            return Spectrum::ZERO;
        }

        let wf = face_forward(wm, &Normal3f::new(0.0, 0.0, 1.0));
        let f = fr_complex_spectrum(wi.abs_dot(&wf), &self.eta, &self.k);
        f * (self.mf_distrib.d(wm) * self.mf_distrib.g(wo, wi) / (4.0 * cos_theta_i * cos_theta_o))
    }
}

impl<D: MicrofacetDistribution> BxDFModel for ConductorBxDF<D> {
    fn flags(&self) -> BxDFFlags {
        if self.mf_distrib.effectively_smooth() {
            BxDFFlags::SPECULAR_REFLECTION
        } else {
            BxDFFlags::GLOSSY_REFLECTION
        }
    }

    fn f(&self, wo: &Vector3f, wi: &Vector3f, _mode: TransportMode) -> Spectrum {
        if !same_hemisphere(wo, wi) || self.mf_distrib.effectively_smooth() {
            return Spectrum::ZERO;
        }

        let wm = *wi + *wo;
        if wm.length_squared() == 0.0 {
            return Spectrum::ZERO;
        }
        self.torrance_sparrow(wo, wi, &wm.normalize())
    }

    fn sample_f(
        &self,
        wo: &Vector3f,
        _uc: Float,
        u: &Point2f,
        _mode: TransportMode,
        sample_flags: BxDFReflTransFlags,
    ) -> Option<BSDFSample> {
        if !sample_flags.contains(BxDFReflTransFlags::REFLECTION) {
            return None;
        }

        if self.mf_distrib.effectively_smooth() {
            // Sample perfect specular conductor BRDF.
            let wi = Vector3f::new(-wo.x, -wo.y, wo.z);
            let cos = abs_cos_theta(&wi);
            let f = fr_complex_spectrum(cos, &self.eta, &self.k) / cos;
            return Some(BSDFSample::new(f, wi, 1.0, BxDFFlags::SPECULAR_REFLECTION)).filter(BSDFSample::is_valid);
        }

        // Sample rough conductor BRDF.
        if wo.z == 0.0 {
            return None;
        }
        let wm = self.mf_distrib.sample_wm(wo, u);
        let wi = reflect(wo, &wm);
        if !same_hemisphere(wo, &wi) || wo.dot(&wm) <= 0.0 {
            return None;
        }

        let pdf = self.mf_distrib.pdf(wo, &wm) / (4.0 * wo.dot(&wm));
        let f = self.torrance_sparrow(wo, &wi, &wm);
        Some(BSDFSample::new(f, wi, pdf, BxDFFlags::GLOSSY_REFLECTION)).filter(BSDFSample::is_valid)
    }

    fn pdf(&self, wo: &Vector3f, wi: &Vector3f, _mode: TransportMode, sample_flags: BxDFReflTransFlags) -> Float {
        if !sample_flags.contains(BxDFReflTransFlags::REFLECTION)
            || !same_hemisphere(wo, wi)
            || self.mf_distrib.effectively_smooth()
        {
            return 0.0;
        }

        let wm = *wo + *wi;
        if wm.length_squared() == 0.0 {
            return 0.0;
        }
        let wm = wm.normalize();
        if wo.dot(&wm) <= 0.0 {
            return 0.0;
        }
        self.mf_distrib.pdf(wo, &wm) / (4.0 * wo.dot(&wm))
    }

    fn regularize(&mut self) {
        self.mf_distrib.regularize();
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

    fn gold(alpha: Float) -> ConductorBxDF {
        ConductorBxDF::new(
            TrowbridgeReitzDistribution::new(alpha, alpha),
            Spectrum::from_rgb(0.143, 0.374, 1.442),
            Spectrum::from_rgb(3.983, 2.385, 1.603),
        )
    }

    #[test]
    fn smooth_conductor_is_a_tinted_mirror() {
        let bxdf = gold(0.0);
        assert_eq!(bxdf.flags(), BxDFFlags::SPECULAR_REFLECTION);
        let wo = Vector3f::new(0.2, 0.1, 0.9).normalize();
        let bs = bxdf
            .sample_f(&wo, 0.5, &Point2f::new(0.5, 0.5), TransportMode::Radiance, BxDFReflTransFlags::ALL)
            .unwrap();
        assert!(approx_eq!(Float, bs.pdf, 1.0, ulps = 1));
        assert!(approx_eq!(Float, bs.wi.z, wo.z, ulps = 1));
        let weight = bs.f * abs_cos_theta(&bs.wi);
        assert!(weight[0] > weight[2]);
        assert!(weight.max_component_value() <= 1.0);
    }

    #[test]
    fn transmission_only_sampling_fails() {
        let bxdf = gold(0.3);
        let wo = Vector3f::new(0.0, 0.0, 1.0);
        assert!(bxdf
            .sample_f(&wo, 0.5, &Point2f::new(0.5, 0.5), TransportMode::Radiance, BxDFReflTransFlags::TRANSMISSION)
            .is_none());
    }

    #[test]
    fn rough_albedo_is_bounded() {
        let bxdf = BxDF::from(gold(0.2));
        let mut rng = RNG::new(11, 0);
        let n = 10_000;
        let uc: Vec<Float> = (0..n).map(|_| rng.uniform_float()).collect();
        let u2: Vec<Point2f> = (0..n)
            .map(|_| Point2f::new(rng.uniform_float(), rng.uniform_float()))
            .collect();
        let rho = bxdf.rho_hd(&Vector3f::new(0.3, 0.0, 0.8).normalize(), &uc, &u2);
        assert!(rho.max_component_value() <= 1.0);
        assert!(rho[0] > 0.5);
    }

    proptest! {
        #[test]
        fn rough_conductor_is_reciprocal(wo in upper_direction(), wi in upper_direction()) {
            let bxdf = gold(0.3);
            let a = bxdf.f(&wo, &wi, TransportMode::Radiance);
            let b = bxdf.f(&wi, &wo, TransportMode::Radiance);
            for c in 0..3 {
                prop_assert!(approx_eq!(Float, a[c], b[c], epsilon = 1e-4 * max(1.0, a[c])));
            }
        }

        #[test]
        fn rough_pdf_matches_sample(wo in upper_direction(), u in (0.0f32..1.0, 0.0f32..1.0)) {
            let bxdf = gold(0.3);
            let mode = TransportMode::Radiance;
            let all = BxDFReflTransFlags::ALL;
            if let Some(bs) = bxdf.sample_f(&wo, 0.5, &Point2f::new(u.0, u.1), mode, all) {
                let pdf = bxdf.pdf(&wo, &bs.wi, mode, all);
                prop_assert!(approx_eq!(Float, pdf, bs.pdf, epsilon = 1e-3 * max(1.0, pdf)));
            }
        }
    }
}
