//! Coated Conductor Material

use crate::common::*;
use strata_core::interaction::*;
use strata_core::material::*;
use strata_core::microfacet::*;
use strata_core::paramset::*;
use strata_core::pbrt::*;
use strata_core::reflection::*;
use strata_core::spectrum::*;

/// A metal base under a dielectric coating. Parameters of the two layers
/// are prefixed with `interface.` and `conductor.`.
#[derive(Clone, Debug)]
pub struct CoatedConductorMaterial {
    /// Microfacet distribution of the coating.
    interface_distrib: TrowbridgeReitzDistribution,

    /// Index of refraction of the coating.
    interface_eta: Float,

    /// Microfacet distribution of the metal.
    conductor_distrib: TrowbridgeReitzDistribution,

    /// Index of refraction of the metal.
    conductor_eta: Spectrum,

    /// Absorption coefficient of the metal.
    conductor_k: Spectrum,

    /// Thickness of the medium between coating and base.
    thickness: Float,

    /// Single-scattering albedo of the medium.
    albedo: Spectrum,

    /// Henyey-Greenstein asymmetry of the medium.
    g: Float,

    /// Random walk settings.
    config: LayeredBxDFConfig,

    /// Seed for the random walks.
    seed: u64,
}

impl Material for CoatedConductorMaterial {
    fn compute_scattering_functions<'scene>(
        &self,
        si: &SurfaceInteraction<'scene>,
        _mode: TransportMode,
    ) -> ScatteringFunctions<'scene> {
        // The metal sits below a medium of the coating's index.
        let bxdf = CoatedConductorBxDF::new(
            DielectricInterfaceBxDF::new(self.interface_eta, self.interface_distrib),
            ConductorBxDF::new(
                self.conductor_distrib,
                self.conductor_eta / self.interface_eta,
                self.conductor_k / self.interface_eta,
            ),
            self.thickness,
            self.albedo,
            self.g,
            self.config,
            self.seed,
        );
        ScatteringFunctions::surface(BSDF::new(si, BxDF::from(bxdf), None))
    }
}

impl From<(&ParamSet, &Options)> for CoatedConductorMaterial {
    /// Create a new `CoatedConductorMaterial` from parameters.
    ///
    /// * `p` - Tuple containing the parameter set and rendering options.
    fn from(p: (&ParamSet, &Options)) -> Self {
        let (params, options) = p;

        let interface_eta = params.find_one_float("interface.eta", 1.5);
        let interface_eta = if interface_eta > 0.0 {
            interface_eta
        } else {
            options.error(&format!("interface.eta {} must be positive. Using 1.5.", interface_eta));
            1.5
        };
        let (conductor_eta, conductor_k) = conductor_ior(params, "conductor.");

        Self {
            interface_distrib: prefixed_roughness_distribution(params, "interface.", 0.0),
            interface_eta,
            conductor_distrib: prefixed_roughness_distribution(params, "conductor.", 0.0),
            conductor_eta,
            conductor_k,
            thickness: max(params.find_one_float("thickness", 0.01), Float::MIN_POSITIVE),
            albedo: params.find_one_spectrum("albedo", Spectrum::ZERO).clamp(0.0, 1.0),
            g: clamp(params.find_one_float("g", 0.0), -1.0, 1.0),
            config: layered_config(params, options),
            seed: layered_seed(options),
        }
    }
}

// ---- Tests ----

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::geometry::*;

    #[test]
    fn rough_coated_metal_reflects_off_specular_directions() {
        let options = Options::new(11, 1, true, false, None);
        let mut params = ParamSet::new();
        params.add_float("conductor.roughness", &[0.3]);
        params.add_float("interface.roughness", &[0.1]);
        let material = CoatedConductorMaterial::from((&params, &options));
        let sf = material.compute_scattering_functions(&test_interaction(), TransportMode::Radiance);
        let bsdf = sf.bsdf.expect("coated conductor has a BSDF");

        let wo = Vector3f::new(0.0, 0.6, 0.8);
        let wi = Vector3f::new(0.5, -0.3, 0.8124).normalize();
        let f = bsdf.f(&wo, &wi, TransportMode::Radiance);
        assert!(!f.has_nans());
        assert!(f.y() >= 0.0);
    }

    #[test]
    fn layers_read_prefixed_parameters() {
        let options = Options::new(0, 1, true, false, None);
        let mut params = ParamSet::new();
        params.add_float("interface.eta", &[1.3]);
        params.add_spectrum("conductor.eta", &[Spectrum::new(0.2)]);
        params.add_spectrum("conductor.k", &[Spectrum::new(3.0)]);
        let material = CoatedConductorMaterial::from((&params, &options));
        assert_eq!(material.interface_eta, 1.3);
        assert_eq!(material.conductor_eta, Spectrum::new(0.2));
        assert_eq!(material.conductor_k, Spectrum::new(3.0));
        assert_eq!(material.conductor_distrib, TrowbridgeReitzDistribution::new(0.0, 0.0));
    }
}
