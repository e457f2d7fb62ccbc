//! Coated Diffuse Material

use crate::common::*;
use strata_core::interaction::*;
use strata_core::material::*;
use strata_core::microfacet::*;
use strata_core::paramset::*;
use strata_core::pbrt::*;
use strata_core::reflection::*;
use strata_core::spectrum::*;

/// A diffuse base under a dielectric coating, with an optional scattering
/// medium between the two.
#[derive(Clone, Debug)]
pub struct CoatedDiffuseMaterial {
    /// Reflectance of the diffuse base.
    reflectance: Spectrum,

    /// Microfacet distribution of the coating.
    distrib: TrowbridgeReitzDistribution,

    /// Thickness of the medium between coating and base.
    thickness: Float,

    /// Index of refraction of the coating.
    eta: Float,

    /// Single-scattering albedo of the medium.
    albedo: Spectrum,

    /// Henyey-Greenstein asymmetry of the medium.
    g: Float,

    /// Random walk settings.
    config: LayeredBxDFConfig,

    /// Seed for the random walks.
    seed: u64,
}

impl CoatedDiffuseMaterial {
    /// Create a new `CoatedDiffuseMaterial`.
    ///
    /// * `reflectance` - Reflectance of the diffuse base.
    /// * `distrib`     - Microfacet distribution of the coating.
    /// * `thickness`   - Thickness of the medium.
    /// * `eta`         - Index of refraction of the coating.
    /// * `albedo`      - Single-scattering albedo of the medium.
    /// * `g`           - Henyey-Greenstein asymmetry of the medium.
    /// * `config`      - Random walk settings.
    /// * `seed`        - Seed for the random walks.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        reflectance: Spectrum,
        distrib: TrowbridgeReitzDistribution,
        thickness: Float,
        eta: Float,
        albedo: Spectrum,
        g: Float,
        config: LayeredBxDFConfig,
        seed: u64,
    ) -> Self {
        Self {
            reflectance: reflectance.clamp(0.0, 1.0),
            distrib,
            thickness: max(thickness, Float::MIN_POSITIVE),
            eta,
            albedo: albedo.clamp(0.0, 1.0),
            g: clamp(g, -1.0, 1.0),
            config,
            seed,
        }
    }
}

impl Material for CoatedDiffuseMaterial {
    fn compute_scattering_functions<'scene>(
        &self,
        si: &SurfaceInteraction<'scene>,
        _mode: TransportMode,
    ) -> ScatteringFunctions<'scene> {
        let bxdf = CoatedDiffuseBxDF::new(
            DielectricInterfaceBxDF::new(self.eta, self.distrib),
            IdealDiffuseBxDF::new(self.reflectance),
            self.thickness,
            self.albedo,
            self.g,
            self.config,
            self.seed,
        );
        ScatteringFunctions::surface(BSDF::new(si, BxDF::from(bxdf), None))
    }
}

impl From<(&ParamSet, &Options)> for CoatedDiffuseMaterial {
    /// Create a new `CoatedDiffuseMaterial` from parameters.
    ///
    /// * `p` - Tuple containing the parameter set and rendering options.
    fn from(p: (&ParamSet, &Options)) -> Self {
        let (params, options) = p;
        Self::new(
            params.find_one_spectrum("reflectance", Spectrum::new(0.5)),
            roughness_distribution(params, 0.0),
            params.find_one_float("thickness", 0.01),
            index_of_refraction(params, options, 1.5),
            params.find_one_spectrum("albedo", Spectrum::ZERO),
            params.find_one_float("g", 0.0),
            layered_config(params, options),
            layered_seed(options),
        )
    }
}

// ---- Tests ----

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::geometry::*;

    #[test]
    fn reflects_light_above_the_surface() {
        let options = Options::new(7, 1, true, false, None);
        let material = CoatedDiffuseMaterial::from((&ParamSet::new(), &options));
        let sf = material.compute_scattering_functions(&test_interaction(), TransportMode::Radiance);
        let bsdf = sf.bsdf.expect("coated diffuse has a BSDF");

        let wo = Vector3f::new(0.0, 0.6, 0.8);
        let wi = Vector3f::new(0.3, -0.4, 0.866).normalize();
        let f = bsdf.f(&wo, &wi, TransportMode::Radiance);
        assert!(!f.is_black());
        assert!(!f.has_nans());
        assert!(f[0] <= 1.0);
    }

    #[test]
    fn coating_defaults() {
        let options = Options::new(0, 1, true, false, None);
        let material = CoatedDiffuseMaterial::from((&ParamSet::new(), &options));
        assert_eq!(material.eta, 1.5);
        assert_eq!(material.thickness, 0.01);
        assert!(material.albedo.is_black());
        assert_eq!(material.config.max_depth, 10);
    }

    #[test]
    fn evaluation_is_repeatable() {
        let options = Options::new(3, 1, true, false, None);
        let mut params = ParamSet::new();
        params.add_float("roughness", &[0.2]);
        params.add_spectrum("albedo", &[Spectrum::new(0.5)]);
        let material = CoatedDiffuseMaterial::from((&params, &options));
        let si = test_interaction();

        let wo = Vector3f::new(0.0, 0.6, 0.8);
        let wi = Vector3f::new(0.6, 0.0, 0.8);
        let f0 = material
            .compute_scattering_functions(&si, TransportMode::Radiance)
            .bsdf
            .map(|b| b.f(&wo, &wi, TransportMode::Radiance));
        let f1 = material
            .compute_scattering_functions(&si, TransportMode::Radiance)
            .bsdf
            .map(|b| b.f(&wo, &wi, TransportMode::Radiance));
        assert_eq!(f0, f1);
    }
}
