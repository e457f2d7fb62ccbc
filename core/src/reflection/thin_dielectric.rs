//! Thin Dielectric BxDF

use super::*;

/// A thin dielectric slab such as a window pane. Both interfaces are smooth
/// and parallel, so light leaves along the reflected direction or continues
/// straight through.
#[derive(Copy, Clone, Debug)]
pub struct ThinDielectricBxDF {
    /// Relative index of refraction of the slab.
    eta: Float,
}

impl ThinDielectricBxDF {
    /// Create a new `ThinDielectricBxDF`.
    ///
    /// * `eta` - Relative index of refraction.
    pub fn new(eta: Float) -> Self {
        Self { eta }
    }
}

impl BxDFModel for ThinDielectricBxDF {
    fn flags(&self) -> BxDFFlags {
        BxDFFlags::REFLECTION | BxDFFlags::TRANSMISSION | BxDFFlags::SPECULAR
    }

    fn f(&self, _wo: &Vector3f, _wi: &Vector3f, _mode: TransportMode) -> Spectrum {
        Spectrum::ZERO
    }

    fn sample_f(
        &self,
        wo: &Vector3f,
        uc: Float,
        _u: &Point2f,
        _mode: TransportMode,
        sample_flags: BxDFReflTransFlags,
    ) -> Option<BSDFSample> {
        let mut r = fr_dielectric(cos_theta(wo), self.eta);
        let mut t = 1.0 - r;

        // Account for the geometric series of bounces inside the slab.
        if r < 1.0 {
            r += t * t * r / (1.0 - r * r);
            t = 1.0 - r;
        }

        let pr = if sample_flags.contains(BxDFReflTransFlags::REFLECTION) {
            r
        } else {
            0.0
        };
        let pt = if sample_flags.contains(BxDFReflTransFlags::TRANSMISSION) {
            t
        } else {
            0.0
        };
        if pr == 0.0 && pt == 0.0 {
            return None;
        }

        let bs = if uc < pr / (pr + pt) {
            let wi = Vector3f::new(-wo.x, -wo.y, wo.z);
            BSDFSample::new(
                Spectrum::new(r / abs_cos_theta(&wi)),
                wi,
                pr / (pr + pt),
                BxDFFlags::SPECULAR_REFLECTION,
            )
        } else {
            let wi = -*wo;
            BSDFSample::new(
                Spectrum::new(t / abs_cos_theta(&wi)),
                wi,
                pt / (pr + pt),
                BxDFFlags::SPECULAR_TRANSMISSION,
            )
        };
        Some(bs).filter(BSDFSample::is_valid)
    }

    fn pdf(&self, _wo: &Vector3f, _wi: &Vector3f, _mode: TransportMode, _sample_flags: BxDFReflTransFlags) -> Float {
        0.0
    }
}

// ---- Tests ----

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use proptest::prelude::*;

    prop_hemisphere_direction!(upper_direction);

    #[test]
    fn transmission_passes_straight_through() {
        let bxdf = ThinDielectricBxDF::new(1.5);
        let wo = Vector3f::new(0.3, -0.2, 0.9).normalize();
        let bs = bxdf
            .sample_f(&wo, 0.999, &Point2f::new(0.5, 0.5), TransportMode::Radiance, BxDFReflTransFlags::ALL)
            .unwrap();
        assert!(bs.is_transmission());
        assert_eq!(bs.wi, -wo);
        assert!(approx_eq!(Float, bs.eta, 1.0, ulps = 1));
    }

    #[test]
    fn slab_reflects_more_than_single_interface() {
        let bxdf = ThinDielectricBxDF::new(1.5);
        let wo = Vector3f::new(0.0, 0.0, 1.0);
        let bs = bxdf
            .sample_f(&wo, 0.0, &Point2f::new(0.5, 0.5), TransportMode::Radiance, BxDFReflTransFlags::ALL)
            .unwrap();
        assert!(bs.is_reflection());
        let single = fr_dielectric(1.0, 1.5);
        assert!(bs.pdf > single);
        assert!(approx_eq!(Float, bs.pdf, 2.0 * single / (1.0 + single), epsilon = 1e-5));
    }

    proptest! {
        #[test]
        fn sampled_weight_is_unity(wo in upper_direction(), uc in 0.0f32..1.0) {
            let bxdf = ThinDielectricBxDF::new(1.33);
            if let Some(bs) = bxdf.sample_f(&wo, uc, &Point2f::new(0.5, 0.5), TransportMode::Radiance, BxDFReflTransFlags::ALL) {
                let weight = bs.f[0] * abs_cos_theta(&bs.wi) / bs.pdf;
                prop_assert!(approx_eq!(Float, weight, 1.0, epsilon = 1e-4));
                prop_assert_eq!(bxdf.f(&wo, &bs.wi, TransportMode::Radiance), Spectrum::ZERO);
            }
        }
    }
}
