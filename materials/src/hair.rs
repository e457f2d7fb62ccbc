//! Hair Material

use strata_core::interaction::*;
use strata_core::material::*;
use strata_core::paramset::*;
use strata_core::pbrt::*;
use strata_core::reflection::*;
use strata_core::spectrum::*;

/// Hair and fur fibers. The fiber runs along ∂p/∂u and the `v` coordinate
/// spans its width.
#[derive(Clone, Debug)]
pub struct HairMaterial {
    /// Absorption coefficient of the fiber interior.
    sigma_a: Spectrum,

    /// Index of refraction of the fiber interior.
    eta: Float,

    /// Longitudinal roughness.
    beta_m: Float,

    /// Azimuthal roughness.
    beta_n: Float,

    /// Cuticle scale tilt in degrees.
    alpha: Float,
}

impl HairMaterial {
    /// Create a new `HairMaterial`. Roughness values are clamped to [0, 1].
    ///
    /// * `sigma_a` - Absorption coefficient of the fiber interior.
    /// * `eta`     - Index of refraction.
    /// * `beta_m`  - Longitudinal roughness.
    /// * `beta_n`  - Azimuthal roughness.
    /// * `alpha`   - Cuticle scale tilt in degrees.
    pub fn new(sigma_a: Spectrum, eta: Float, beta_m: Float, beta_n: Float, alpha: Float) -> Self {
        Self {
            sigma_a,
            eta,
            beta_m: clamp(beta_m, 0.0, 1.0),
            beta_n: clamp(beta_n, 0.0, 1.0),
            alpha,
        }
    }
}

impl Material for HairMaterial {
    fn compute_scattering_functions<'scene>(
        &self,
        si: &SurfaceInteraction<'scene>,
        _mode: TransportMode,
    ) -> ScatteringFunctions<'scene> {
        let h = clamp(-1.0 + 2.0 * si.uv[1], -1.0, 1.0);
        let bxdf = HairBxDF::new(h, self.eta, self.sigma_a, self.beta_m, self.beta_n, self.alpha);
        ScatteringFunctions::surface(BSDF::new(si, BxDF::from(bxdf), Some(self.eta)))
    }
}

impl From<(&ParamSet, &Options)> for HairMaterial {
    /// Create a new `HairMaterial` from parameters. The absorption comes
    /// from `sigma_a`, `reflectance` or the pigment concentrations
    /// `eumelanin` and `pheomelanin`, in that order of precedence.
    ///
    /// * `p` - Tuple containing the parameter set and rendering options.
    fn from(p: (&ParamSet, &Options)) -> Self {
        let (params, options) = p;

        let beta_m = params.find_one_float("beta_m", 0.3);
        let beta_n = params.find_one_float("beta_n", 0.3);
        let sigma_a = params.find_spectrum("sigma_a").first().copied();
        let reflectance = params.find_spectrum("reflectance").first().copied();

        let sigma_a = match (sigma_a, reflectance) {
            (Some(sigma_a), reflectance) => {
                if reflectance.is_some() {
                    options.warning("Ignoring \"reflectance\" parameter since \"sigma_a\" was provided.");
                }
                sigma_a
            }
            (None, Some(r)) => HairBxDF::sigma_a_from_reflectance(&r.clamp(1e-4, 1.0), beta_n),
            (None, None) => {
                let ce = params.find_one_float("eumelanin", 1.3);
                let cp = params.find_one_float("pheomelanin", 0.0);
                HairBxDF::sigma_a_from_concentration(ce, cp)
            }
        };

        Self::new(
            sigma_a,
            params.find_one_float("eta", 1.55),
            beta_m,
            beta_n,
            params.find_one_float("alpha", 2.0),
        )
    }
}

// ---- Tests ----

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::test_interaction;
    use strata_core::geometry::*;

    #[test]
    fn default_hair_is_brown() {
        let options = Options::new(0, 1, true, false, None);
        let material = HairMaterial::from((&ParamSet::new(), &options));
        assert_eq!(material.sigma_a, HairBxDF::sigma_a_from_concentration(1.3, 0.0));
        assert_eq!(material.eta, 1.55);
        assert_eq!(material.beta_m, 0.3);
    }

    #[test]
    fn sigma_a_takes_precedence() {
        let options = Options::new(0, 1, true, false, None);
        let mut params = ParamSet::new();
        params.add_spectrum("sigma_a", &[Spectrum::new(0.25)]);
        params.add_spectrum("reflectance", &[Spectrum::new(0.5)]);
        let material = HairMaterial::from((&params, &options));
        assert_eq!(material.sigma_a, Spectrum::new(0.25));
    }

    #[test]
    fn fiber_scatters_finite_energy() {
        let material = HairMaterial::new(Spectrum::new(0.5), 1.55, 0.3, 0.3, 2.0);
        let sf = material.compute_scattering_functions(&test_interaction(), TransportMode::Radiance);
        let bsdf = sf.bsdf.expect("hair has a BSDF");

        let wo = Vector3f::new(0.3, 0.5, 0.8124).normalize();
        let wi = Vector3f::new(-0.2, -0.4, 0.8944).normalize();
        let f = bsdf.f(&wo, &wi, TransportMode::Radiance);
        assert!(!f.has_nans());
        assert!(f.y() >= 0.0);
    }
}
