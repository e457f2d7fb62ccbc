//! Dielectric Material

use crate::common::*;
use strata_core::interaction::*;
use strata_core::material::*;
use strata_core::microfacet::*;
use strata_core::paramset::*;
use strata_core::pbrt::*;
use strata_core::reflection::*;

/// Glass-like boundaries between two dielectrics, smooth or rough.
#[derive(Clone, Debug)]
pub struct DielectricMaterial {
    /// Microfacet distribution.
    distrib: TrowbridgeReitzDistribution,

    /// Index of refraction.
    eta: Float,
}

impl DielectricMaterial {
    /// Create a new `DielectricMaterial`.
    ///
    /// * `distrib` - Microfacet distribution.
    /// * `eta`     - Index of refraction.
    pub fn new(distrib: TrowbridgeReitzDistribution, eta: Float) -> Self {
        Self { distrib, eta }
    }
}

impl Material for DielectricMaterial {
    fn compute_scattering_functions<'scene>(
        &self,
        si: &SurfaceInteraction<'scene>,
        _mode: TransportMode,
    ) -> ScatteringFunctions<'scene> {
        let bxdf = DielectricInterfaceBxDF::new(self.eta, self.distrib);
        ScatteringFunctions::surface(BSDF::new(si, BxDF::from(bxdf), Some(self.eta)))
    }
}

impl From<(&ParamSet, &Options)> for DielectricMaterial {
    /// Create a new `DielectricMaterial` from parameters.
    ///
    /// * `p` - Tuple containing the parameter set and rendering options.
    fn from(p: (&ParamSet, &Options)) -> Self {
        let (params, options) = p;
        Self::new(roughness_distribution(params, 0.0), index_of_refraction(params, options, 1.5))
    }
}

// ---- Tests ----

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::geometry::*;

    #[test]
    fn smooth_glass_refracts_towards_normal() {
        let options = Options::new(0, 1, true, false, None);
        let material = DielectricMaterial::from((&ParamSet::new(), &options));
        let sf = material.compute_scattering_functions(&test_interaction(), TransportMode::Radiance);
        let bsdf = sf.bsdf.expect("dielectric has a BSDF");

        // A high `uc` selects transmission.
        let wo = Vector3f::new(0.0, 0.6, 0.8);
        let bs = bsdf
            .sample_f(&wo, 0.99, &Point2f::new(0.5, 0.5), TransportMode::Radiance, BxDFReflTransFlags::ALL)
            .expect("specular transmission");
        assert!(bs.is_specular());
        assert!(bs.wi.z < 0.0);

        // Snell's law: sin(θt) = sin(θi) / η.
        let sin_t = (bs.wi.x * bs.wi.x + bs.wi.y * bs.wi.y).sqrt();
        assert!((sin_t - 0.6 / 1.5).abs() < 1e-4);
    }
}
