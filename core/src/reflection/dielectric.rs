//! Dielectric Interface BxDF

use super::*;
use crate::microfacet::*;

/// Reflection and transmission at the boundary between two dielectrics. The
/// interface is perfectly specular when the microfacet distribution is
/// effectively smooth, and a rough microfacet interface otherwise.
#[derive(Copy, Clone, Debug)]
pub struct DielectricInterfaceBxDF<D: MicrofacetDistribution = TrowbridgeReitzDistribution> {
    /// Relative index of refraction (inside over outside).
    eta: Float,

    /// Microfacet distribution.
    mf_distrib: D,
}

impl<D: MicrofacetDistribution> DielectricInterfaceBxDF<D> {
    /// Create a new `DielectricInterfaceBxDF`. An index of exactly 1 is nudged
    /// to 1.001 so the interface stays visible.
    ///
    /// * `eta`        - Relative index of refraction.
    /// * `mf_distrib` - Microfacet distribution.
    pub fn new(eta: Float, mf_distrib: D) -> Self {
        Self {
            eta: if eta == 1.0 { 1.001 } else { eta },
            mf_distrib,
        }
    }

    /// Returns the relative index of refraction.
    pub fn eta(&self) -> Float {
        self.eta
    }

    /// Returns the reflection and transmission selection weights.
    ///
    /// * `r`            - Fresnel reflectance.
    /// * `sample_flags` - Lobes that may be sampled.
    fn lobe_weights(r: Float, sample_flags: BxDFReflTransFlags) -> (Float, Float) {
        let pr = if sample_flags.contains(BxDFReflTransFlags::REFLECTION) {
            r
        } else {
            0.0
        };
        let pt = if sample_flags.contains(BxDFReflTransFlags::TRANSMISSION) {
            1.0 - r
        } else {
            0.0
        };
        (pr, pt)
    }

    /// Returns the generalized half vector for a pair of directions together
    /// with the relative index along the path, or `None` for degenerate and
    /// back-facing configurations.
    ///
    /// * `wo` - Outgoing direction.
    /// * `wi` - Incident direction.
    fn half_vector(&self, wo: &Vector3f, wi: &Vector3f) -> Option<(Vector3f, Float)> {
        let cos_theta_o = cos_theta(wo);
        let cos_theta_i = cos_theta(wi);
        let reflect = cos_theta_i * cos_theta_o > 0.0;
        let etap = if reflect {
            1.0
        } else if cos_theta_o > 0.0 {
            self.eta
        } else {
            1.0 / self.eta
        };

        let wm = *wi * etap + *wo;
        if cos_theta_i == 0.0 || cos_theta_o == 0.0 || wm.length_squared() == 0.0 {
            return None;
        }
        let wm = face_forward(&wm.normalize(), &Normal3f::new(0.0, 0.0, 1.0));

        // Discard back-facing microfacets.
        if wm.dot(wi) * cos_theta_i < 0.0 || wm.dot(wo) * cos_theta_o < 0.0 {
            return None;
        }
        Some((wm, etap))
    }

    /// Samples the perfectly specular interface.
    ///
    /// * `wo`           - Outgoing direction.
    /// * `uc`           - 1D sample used to choose a lobe.
    /// * `mode`         - Transport mode.
    /// * `sample_flags` - Lobes that may be sampled.
    fn sample_specular(
        &self,
        wo: &Vector3f,
        uc: Float,
        mode: TransportMode,
        sample_flags: BxDFReflTransFlags,
    ) -> Option<BSDFSample> {
        let r = fr_dielectric(cos_theta(wo), self.eta);
        let (pr, pt) = Self::lobe_weights(r, sample_flags);
        if pr == 0.0 && pt == 0.0 {
            return None;
        }

        if uc < pr / (pr + pt) {
            // Sample perfect specular reflection at interface.
            let wi = Vector3f::new(-wo.x, -wo.y, wo.z);
            let fr = Spectrum::new(r / abs_cos_theta(&wi));
            Some(BSDFSample::new(fr, wi, pr / (pr + pt), BxDFFlags::SPECULAR_REFLECTION))
        } else {
            // Sample perfect specular transmission at interface.
            let (wi, etap) = refract(wo, &Vector3f::new(0.0, 0.0, 1.0), self.eta)?;
            let mut ft = Spectrum::new((1.0 - r) / abs_cos_theta(&wi));

            // Account for non-symmetry with transmission to different medium.
            if mode == TransportMode::Radiance {
                ft /= sqr(etap);
            }
            let bs = BSDFSample::new(ft, wi, pt / (pr + pt), BxDFFlags::SPECULAR_TRANSMISSION).with_eta(etap);
            Some(bs).filter(BSDFSample::is_valid)
        }
    }

    /// Samples the rough interface.
    ///
    /// * `wo`           - Outgoing direction.
    /// * `uc`           - 1D sample used to choose a lobe.
    /// * `u`            - 2D sample used to choose a microfacet normal.
    /// * `mode`         - Transport mode.
    /// * `sample_flags` - Lobes that may be sampled.
    fn sample_rough(
        &self,
        wo: &Vector3f,
        uc: Float,
        u: &Point2f,
        mode: TransportMode,
        sample_flags: BxDFReflTransFlags,
    ) -> Option<BSDFSample> {
        let wm = self.mf_distrib.sample_wm(wo, u);
        let r = fr_dielectric(wo.dot(&wm), self.eta);
        let (pr, pt) = Self::lobe_weights(r, sample_flags);
        if pr == 0.0 && pt == 0.0 {
            return None;
        }

        if uc < pr / (pr + pt) {
            // Sample reflection at rough dielectric interface.
            let wi = reflect(wo, &wm);
            if !same_hemisphere(wo, &wi) {
                return None;
            }

            let pdf = self.mf_distrib.pdf(wo, &wm) / (4.0 * wo.abs_dot(&wm)) * pr / (pr + pt);
            let f = Spectrum::new(
                self.mf_distrib.d(&wm) * self.mf_distrib.g(wo, &wi) * r
                    / (4.0 * cos_theta(&wi) * cos_theta(wo)),
            );
            Some(BSDFSample::new(f, wi, pdf, BxDFFlags::GLOSSY_REFLECTION)).filter(BSDFSample::is_valid)
        } else {
            // Sample transmission at rough dielectric interface.
            let (wi, etap) = refract(wo, &wm, self.eta)?;
            if same_hemisphere(wo, &wi) || wi.z == 0.0 {
                return None;
            }

            let denom = sqr(wi.dot(&wm) + wo.dot(&wm) / etap);
            let dwm_dwi = wi.abs_dot(&wm) / denom;
            let pdf = self.mf_distrib.pdf(wo, &wm) * dwm_dwi * pt / (pr + pt);

            let mut ft = Spectrum::new(
                (1.0 - r)
                    * self.mf_distrib.d(&wm)
                    * self.mf_distrib.g(wo, &wi)
                    * abs(wi.dot(&wm) * wo.dot(&wm) / (cos_theta(&wi) * cos_theta(wo) * denom)),
            );

            // Account for non-symmetry with transmission to different medium.
            if mode == TransportMode::Radiance {
                ft /= sqr(etap);
            }

            let bs = BSDFSample::new(ft, wi, pdf, BxDFFlags::GLOSSY_TRANSMISSION).with_eta(etap);
            Some(bs).filter(BSDFSample::is_valid)
        }
    }
}

impl<D: MicrofacetDistribution> BxDFModel for DielectricInterfaceBxDF<D> {
    fn flags(&self) -> BxDFFlags {
        let flags = BxDFFlags::REFLECTION | BxDFFlags::TRANSMISSION;
        if self.mf_distrib.effectively_smooth() {
            flags | BxDFFlags::SPECULAR
        } else {
            flags | BxDFFlags::GLOSSY
        }
    }

    fn f(&self, wo: &Vector3f, wi: &Vector3f, mode: TransportMode) -> Spectrum {
        if self.mf_distrib.effectively_smooth() {
            return Spectrum::ZERO;
        }

        // Evaluate rough dielectric BSDF.
        let (wm, etap) = match self.half_vector(wo, wi) {
            Some(h) => h,
            None => return Spectrum::ZERO,
        };
        let cos_theta_o = cos_theta(wo);
        let cos_theta_i = cos_theta(wi);
        let f = fr_dielectric(wo.dot(&wm), self.eta);

        if cos_theta_i * cos_theta_o > 0.0 {
            // Compute reflection at rough dielectric interface.
            Spectrum::new(
                self.mf_distrib.d(&wm) * self.mf_distrib.g(wo, wi) * f
                    / abs(4.0 * cos_theta_i * cos_theta_o),
            )
        } else {
            // Compute transmission at rough dielectric interface.
            let denom = sqr(wi.dot(&wm) + wo.dot(&wm) / etap) * cos_theta_i * cos_theta_o;
            let mut ft = self.mf_distrib.d(&wm)
                * (1.0 - f)
                * self.mf_distrib.g(wo, wi)
                * abs(wi.dot(&wm) * wo.dot(&wm) / denom);

            // Account for non-symmetry with transmission to different medium.
            if mode == TransportMode::Radiance {
                ft /= sqr(etap);
            }
            if ft.is_finite() {
                Spectrum::new(ft)
            } else {
                Spectrum::ZERO
            }
        }
    }

    fn sample_f(
        &self,
        wo: &Vector3f,
        uc: Float,
        u: &Point2f,
        mode: TransportMode,
        sample_flags: BxDFReflTransFlags,
    ) -> Option<BSDFSample> {
        if wo.z == 0.0 {
            None
        } else if self.mf_distrib.effectively_smooth() {
            self.sample_specular(wo, uc, mode, sample_flags)
        } else {
            self.sample_rough(wo, uc, u, mode, sample_flags)
        }
    }

    fn pdf(&self, wo: &Vector3f, wi: &Vector3f, _mode: TransportMode, sample_flags: BxDFReflTransFlags) -> Float {
        if self.mf_distrib.effectively_smooth() {
            return 0.0;
        }

        let (wm, etap) = match self.half_vector(wo, wi) {
            Some(h) => h,
            None => return 0.0,
        };

        // Determine Fresnel reflectance of rough dielectric boundary.
        let r = fr_dielectric(wo.dot(&wm), self.eta);
        let (pr, pt) = Self::lobe_weights(r, sample_flags);
        if pr == 0.0 && pt == 0.0 {
            return 0.0;
        }

        let pdf = if same_hemisphere(wo, wi) {
            self.mf_distrib.pdf(wo, &wm) / (4.0 * wo.abs_dot(&wm)) * pr / (pr + pt)
        } else {
            let denom = sqr(wi.dot(&wm) + wo.dot(&wm) / etap);
            let dwm_dwi = wi.abs_dot(&wm) / denom;
            self.mf_distrib.pdf(wo, &wm) * dwm_dwi * pt / (pr + pt)
        };
        if pdf.is_finite() {
            pdf
        } else {
            0.0
        }
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

    fn rough(alpha: Float) -> DielectricInterfaceBxDF {
        DielectricInterfaceBxDF::new(1.5, TrowbridgeReitzDistribution::new(alpha, alpha))
    }

    #[test]
    fn unit_eta_is_nudged() {
        let bxdf = DielectricInterfaceBxDF::new(1.0, TrowbridgeReitzDistribution::new(0.0, 0.0));
        assert!(bxdf.eta() > 1.0);
        assert!(bxdf.flags().is_specular());
    }

    #[test]
    fn specular_sample_weights_at_normal_incidence() {
        let bxdf = DielectricInterfaceBxDF::new(1.5, TrowbridgeReitzDistribution::new(0.0, 0.0));
        let wo = Vector3f::new(0.0, 0.0, 1.0);
        let u = Point2f::new(0.5, 0.5);
        let all = BxDFReflTransFlags::ALL;

        let r = bxdf.sample_f(&wo, 0.01, &u, TransportMode::Radiance, all).unwrap();
        assert!(r.is_reflection());
        let weight = r.f[0] * abs_cos_theta(&r.wi) / r.pdf;
        assert!(approx_eq!(Float, weight, 1.0, epsilon = 1e-5));

        let t = bxdf.sample_f(&wo, 0.99, &u, TransportMode::Radiance, all).unwrap();
        assert!(t.is_transmission());
        assert!(approx_eq!(Float, t.eta, 1.5, ulps = 2));
        let weight = t.f[0] * abs_cos_theta(&t.wi) / t.pdf;
        assert!(approx_eq!(Float, weight, 1.0 / 2.25, epsilon = 1e-5));

        let t = bxdf.sample_f(&wo, 0.99, &u, TransportMode::Importance, all).unwrap();
        let weight = t.f[0] * abs_cos_theta(&t.wi) / t.pdf;
        assert!(approx_eq!(Float, weight, 1.0, epsilon = 1e-5));

        assert_eq!(bxdf.f(&wo, &r.wi, TransportMode::Radiance), Spectrum::ZERO);
        assert_eq!(bxdf.pdf(&wo, &r.wi, TransportMode::Radiance, all), 0.0);
    }

    #[test]
    fn specular_reflection_only_when_transmission_is_masked() {
        let bxdf = DielectricInterfaceBxDF::new(1.5, TrowbridgeReitzDistribution::new(0.0, 0.0));
        let wo = Vector3f::new(0.3, 0.0, 0.8).normalize();
        let bs = bxdf
            .sample_f(&wo, 0.99, &Point2f::new(0.1, 0.2), TransportMode::Radiance, BxDFReflTransFlags::REFLECTION)
            .unwrap();
        assert!(bs.is_reflection());
        assert!(approx_eq!(Float, bs.pdf, 1.0, ulps = 2));
    }

    #[test]
    fn rough_albedo_does_not_exceed_one() {
        let bxdf = BxDF::from(rough(0.3));
        let mut rng = RNG::new(3, 0);
        let n = 10_000;
        let uc: Vec<Float> = (0..n).map(|_| rng.uniform_float()).collect();
        let u2: Vec<Point2f> = (0..n)
            .map(|_| Point2f::new(rng.uniform_float(), rng.uniform_float()))
            .collect();
        let wo = Vector3f::new(0.4, 0.1, 0.7).normalize();
        let rho = bxdf.rho_hd(&wo, &uc, &u2);
        assert!(rho[0] > 0.3 && rho[0] <= 1.01, "rho {}", rho[0]);
    }

    proptest! {
        #[test]
        fn rough_reflection_is_reciprocal(wo in upper_direction(), wi in upper_direction()) {
            let bxdf = rough(0.4);
            let a = bxdf.f(&wo, &wi, TransportMode::Radiance)[0];
            let b = bxdf.f(&wi, &wo, TransportMode::Radiance)[0];
            prop_assert!(approx_eq!(Float, a, b, epsilon = 1e-4 * max(1.0, a)));
        }

        #[test]
        fn rough_transmission_obeys_adjoint(wo in upper_direction(), wi in upper_direction()) {
            let bxdf = rough(0.4);
            let wi = Vector3f::new(wi.x, wi.y, -wi.z);
            let a = bxdf.f(&wo, &wi, TransportMode::Importance)[0];
            let b = bxdf.f(&wi, &wo, TransportMode::Radiance)[0];
            prop_assert!(approx_eq!(Float, a, b, epsilon = 1e-3 * max(1.0, a)));
        }

        #[test]
        fn rough_pdf_matches_sample(wo in upper_direction(), uc in 0.0f32..1.0, u in (0.0f32..1.0, 0.0f32..1.0)) {
            let bxdf = rough(0.5);
            let mode = TransportMode::Radiance;
            let all = BxDFReflTransFlags::ALL;
            if let Some(bs) = bxdf.sample_f(&wo, uc, &Point2f::new(u.0, u.1), mode, all) {
                let pdf = bxdf.pdf(&wo, &bs.wi, mode, all);
                prop_assert!(approx_eq!(Float, pdf, bs.pdf, epsilon = 1e-3 * max(1.0, pdf)));
            }
        }
    }
}
