//! Subsurface Material

use crate::common::*;
use strata_core::bssrdf::*;
use strata_core::interaction::*;
use strata_core::material::*;
use strata_core::microfacet::*;
use strata_core::paramset::*;
use strata_core::pbrt::*;
use strata_core::reflection::*;
use strata_core::spectrum::*;

/// Translucent materials where light enters the surface, scatters below it
/// and leaves at another point. The boundary is a dielectric interface.
#[derive(Clone, Debug)]
pub struct SubsurfaceMaterial {
    /// Microfacet distribution of the boundary.
    distrib: TrowbridgeReitzDistribution,

    /// Index of refraction of the scattering medium.
    eta: Float,

    /// Multiple scattering albedo per channel.
    albedo: Spectrum,

    /// Mean free path per channel.
    mfp: Spectrum,
}

impl SubsurfaceMaterial {
    /// Create a new `SubsurfaceMaterial`.
    ///
    /// * `distrib` - Microfacet distribution of the boundary.
    /// * `eta`     - Index of refraction.
    /// * `albedo`  - Multiple scattering albedo.
    /// * `mfp`     - Mean free path.
    pub fn new(distrib: TrowbridgeReitzDistribution, eta: Float, albedo: Spectrum, mfp: Spectrum) -> Self {
        Self {
            distrib,
            eta,
            albedo: albedo.clamp(0.0, 1.0),
            mfp,
        }
    }

    /// Returns the albedo and mean free path of a medium with the given
    /// scattering coefficients.
    ///
    /// * `sigma_a` - Absorption coefficient.
    /// * `sigma_s` - Scattering coefficient.
    pub fn from_coefficients(sigma_a: Spectrum, sigma_s: Spectrum) -> (Spectrum, Spectrum) {
        let sigma_t = sigma_a + sigma_s;
        let albedo = sigma_s.safe_div(&sigma_t);
        let mfp = sigma_t.map(|s| if s > 0.0 { 1.0 / s } else { INFINITY });
        (albedo, mfp)
    }
}

impl Material for SubsurfaceMaterial {
    fn compute_scattering_functions<'scene>(
        &self,
        si: &SurfaceInteraction<'scene>,
        _mode: TransportMode,
    ) -> ScatteringFunctions<'scene> {
        let bxdf = DielectricInterfaceBxDF::new(self.eta, self.distrib);
        let bsdf = BSDF::new(si, BxDF::from(bxdf), Some(self.eta));

        // Exit points are found by matching this material on the scene.
        let bssrdf = si
            .get_material()
            .map(|material| SeparableBSSRDF::new(si, self.eta, self.albedo, self.mfp, material));

        ScatteringFunctions {
            bsdf: Some(bsdf),
            bssrdf,
        }
    }
}

impl From<(&ParamSet, &Options)> for SubsurfaceMaterial {
    /// Create a new `SubsurfaceMaterial` from parameters. The medium is given
    /// either by `mfp` and `reflectance`, or by `sigma_a` and `sigma_s`
    /// multiplied by `scale`.
    ///
    /// * `p` - Tuple containing the parameter set and rendering options.
    fn from(p: (&ParamSet, &Options)) -> Self {
        let (params, options) = p;

        let (albedo, mfp) = match params.find_spectrum("mfp").first().copied() {
            Some(mfp) => {
                let reflectance = params.find_one_spectrum("reflectance", Spectrum::ONE);
                (reflectance, mfp)
            }
            None => {
                let scale = params.find_one_float("scale", 1.0);
                let sigma_a = params.find_one_spectrum("sigma_a", Spectrum::from_rgb(0.0011, 0.0024, 0.014));
                let sigma_s = params.find_one_spectrum("sigma_s", Spectrum::from_rgb(2.55, 3.21, 3.77));
                Self::from_coefficients(sigma_a * scale, sigma_s * scale)
            }
        };

        Self::new(
            roughness_distribution(params, 0.0),
            index_of_refraction(params, options, 1.33),
            albedo,
            mfp,
        )
    }
}

// ---- Tests ----

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    #[test]
    fn coefficients_give_albedo_and_mean_free_path() {
        let (albedo, mfp) =
            SubsurfaceMaterial::from_coefficients(Spectrum::new(1.0), Spectrum::from_rgb(3.0, 1.0, 0.0));
        assert!(approx_eq!(Float, albedo[0], 0.75));
        assert!(approx_eq!(Float, albedo[1], 0.5));
        assert!(approx_eq!(Float, albedo[2], 0.0));
        assert!(approx_eq!(Float, mfp[0], 0.25));
        assert!(approx_eq!(Float, mfp[2], 1.0));
    }

    #[test]
    fn mean_free_path_parameter_wins() {
        let options = Options::new(0, 1, true, false, None);
        let mut params = ParamSet::new();
        params.add_spectrum("mfp", &[Spectrum::new(0.1)]);
        params.add_spectrum("reflectance", &[Spectrum::new(0.8)]);
        let material = SubsurfaceMaterial::from((&params, &options));
        assert_eq!(material.mfp, Spectrum::new(0.1));
        assert_eq!(material.albedo, Spectrum::new(0.8));
        assert_eq!(material.eta, 1.33);
    }

    #[test]
    fn bssrdf_needs_a_primitive() {
        let options = Options::new(0, 1, true, false, None);
        let material = SubsurfaceMaterial::from((&ParamSet::new(), &options));
        let sf = material.compute_scattering_functions(&test_interaction(), TransportMode::Radiance);
        assert!(sf.bsdf.is_some());
        assert!(sf.bssrdf.is_none());
    }
}
