//! Conductor Material

use crate::common::*;
use strata_core::interaction::*;
use strata_core::material::*;
use strata_core::microfacet::*;
use strata_core::paramset::*;
use strata_core::reflection::*;
use strata_core::spectrum::*;

/// Metals described by a complex index of refraction.
#[derive(Clone, Debug)]
pub struct ConductorMaterial {
    /// Microfacet distribution.
    distrib: TrowbridgeReitzDistribution,

    /// Index of refraction.
    eta: Spectrum,

    /// Absorption coefficient.
    k: Spectrum,
}

impl ConductorMaterial {
    /// Create a new `ConductorMaterial`.
    ///
    /// * `distrib` - Microfacet distribution.
    /// * `eta`     - Index of refraction.
    /// * `k`       - Absorption coefficient.
    pub fn new(distrib: TrowbridgeReitzDistribution, eta: Spectrum, k: Spectrum) -> Self {
        Self { distrib, eta, k }
    }
}

impl Material for ConductorMaterial {
    fn compute_scattering_functions<'scene>(
        &self,
        si: &SurfaceInteraction<'scene>,
        _mode: TransportMode,
    ) -> ScatteringFunctions<'scene> {
        let bxdf = ConductorBxDF::new(self.distrib, self.eta, self.k);
        ScatteringFunctions::surface(BSDF::new(si, BxDF::from(bxdf), None))
    }
}

impl From<&ParamSet> for ConductorMaterial {
    /// Create a new `ConductorMaterial` from parameters.
    ///
    /// * `params` - Parameter set.
    fn from(params: &ParamSet) -> Self {
        let (eta, k) = conductor_ior(params, "");
        Self::new(roughness_distribution(params, 0.0), eta, k)
    }
}

// ---- Tests ----

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::geometry::*;
    use strata_core::pbrt::*;

    #[test]
    fn smooth_metal_is_specular() {
        let material = ConductorMaterial::from(&ParamSet::new());
        let sf = material.compute_scattering_functions(&test_interaction(), TransportMode::Radiance);
        let bsdf = sf.bsdf.expect("conductor has a BSDF");

        let wo = Vector3f::new(0.0, 0.6, 0.8);
        let bs = bsdf
            .sample_f(&wo, 0.5, &Point2f::new(0.5, 0.5), TransportMode::Radiance, BxDFReflTransFlags::ALL)
            .expect("specular reflection");
        assert!(bs.is_specular());
        assert!((bs.wi.y + 0.6).abs() < 1e-4);
        assert!((bs.wi.z - 0.8).abs() < 1e-4);
    }

    #[test]
    fn reflectance_overrides_ior() {
        let mut params = ParamSet::new();
        params.add_spectrum("reflectance", &[Spectrum::new(0.5)]);
        let material = ConductorMaterial::from(&params);
        assert_eq!(material.eta, Spectrum::ONE);
        // k = 2 sqrt(r) / sqrt(1 - r) gives normal-incidence reflectance r.
        let k: Float = material.k[0];
        let r = k * k / (4.0 + k * k);
        assert!((r - 0.5).abs() < 1e-4);
    }
}
