//! Matte Material

use strata_core::interaction::*;
use strata_core::material::*;
use strata_core::paramset::*;
use strata_core::pbrt::*;
use strata_core::reflection::*;
use strata_core::spectrum::*;

/// Implements purely diffuse surfaces, optionally with diffuse transmission.
#[derive(Clone, Debug)]
pub struct MatteMaterial {
    /// Spectral diffuse reflection.
    kd: Spectrum,

    /// Spectral diffuse transmission.
    kt: Spectrum,

    /// Oren-Nayar roughness in degrees.
    sigma: Float,
}

impl MatteMaterial {
    /// Create a new `MatteMaterial`. Reflectances are clamped to [0, 1].
    ///
    /// * `kd`    - Spectral diffuse reflection.
    /// * `kt`    - Spectral diffuse transmission.
    /// * `sigma` - Roughness in degrees.
    pub fn new(kd: Spectrum, kt: Spectrum, sigma: Float) -> Self {
        Self {
            kd: kd.clamp(0.0, 1.0),
            kt: kt.clamp(0.0, 1.0),
            sigma: clamp(sigma, 0.0, 90.0),
        }
    }
}

impl Material for MatteMaterial {
    fn compute_scattering_functions<'scene>(
        &self,
        si: &SurfaceInteraction<'scene>,
        _mode: TransportMode,
    ) -> ScatteringFunctions<'scene> {
        let bxdf = if self.sigma == 0.0 && self.kt.is_black() {
            BxDF::from(IdealDiffuseBxDF::new(self.kd))
        } else {
            BxDF::from(DiffuseBxDF::new(self.kd, self.kt, self.sigma))
        };
        ScatteringFunctions::surface(BSDF::new(si, bxdf, None))
    }
}

impl From<&ParamSet> for MatteMaterial {
    /// Create a new `MatteMaterial` from parameters.
    ///
    /// * `params` - Parameter set.
    fn from(params: &ParamSet) -> Self {
        let kd = params.find_one_spectrum("Kd", Spectrum::new(0.5));
        let kt = params.find_one_spectrum("Kt", Spectrum::ZERO);
        let sigma = params.find_one_float("sigma", 0.0);
        Self::new(kd, kt, sigma)
    }
}

// ---- Tests ----

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use crate::common::test_interaction;
    use strata_core::geometry::*;

    #[test]
    fn smooth_matte_is_lambertian() {
        let material = MatteMaterial::new(Spectrum::new(0.5), Spectrum::ZERO, 0.0);
        let sf = material.compute_scattering_functions(&test_interaction(), TransportMode::Radiance);
        assert!(sf.bssrdf.is_none());

        let bsdf = sf.bsdf.expect("matte has a BSDF");
        let wo = Vector3f::new(0.0, 0.0, 1.0);
        let wi = Vector3f::new(0.6, 0.0, 0.8);
        let f = bsdf.f(&wo, &wi, TransportMode::Radiance);
        assert!(approx_eq!(Float, f[0], 0.5 * INV_PI, epsilon = 1e-5));
    }

    #[test]
    fn translucent_matte_transmits() {
        let material = MatteMaterial::new(Spectrum::new(0.4), Spectrum::new(0.3), 20.0);
        let sf = material.compute_scattering_functions(&test_interaction(), TransportMode::Radiance);
        let bsdf = sf.bsdf.expect("matte has a BSDF");
        let wo = Vector3f::new(0.0, 0.0, 1.0);
        let wi = Vector3f::new(0.0, 0.0, -1.0);
        assert!(!bsdf.f(&wo, &wi, TransportMode::Radiance).is_black());
    }

    #[test]
    fn reflectance_is_clamped() {
        let mut params = ParamSet::new();
        params.add_spectrum("Kd", &[Spectrum::new(3.0)]);
        let material = MatteMaterial::from(&params);
        assert!(approx_eq!(Float, material.kd[0], 1.0));
    }
}
