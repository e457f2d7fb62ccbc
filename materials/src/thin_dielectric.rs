//! Thin Dielectric Material

use crate::common::*;
use strata_core::interaction::*;
use strata_core::material::*;
use strata_core::paramset::*;
use strata_core::pbrt::*;
use strata_core::reflection::*;

/// Thin sheets such as window panes. Light leaves in its incident direction
/// or the mirror direction.
#[derive(Clone, Debug)]
pub struct ThinDielectricMaterial {
    /// Index of refraction.
    eta: Float,
}

impl ThinDielectricMaterial {
    /// Create a new `ThinDielectricMaterial`.
    ///
    /// * `eta` - Index of refraction.
    pub fn new(eta: Float) -> Self {
        Self { eta }
    }
}

impl Material for ThinDielectricMaterial {
    fn compute_scattering_functions<'scene>(
        &self,
        si: &SurfaceInteraction<'scene>,
        _mode: TransportMode,
    ) -> ScatteringFunctions<'scene> {
        let bxdf = ThinDielectricBxDF::new(self.eta);
        ScatteringFunctions::surface(BSDF::new(si, BxDF::from(bxdf), None))
    }
}

impl From<(&ParamSet, &Options)> for ThinDielectricMaterial {
    /// Create a new `ThinDielectricMaterial` from parameters.
    ///
    /// * `p` - Tuple containing the parameter set and rendering options.
    fn from(p: (&ParamSet, &Options)) -> Self {
        let (params, options) = p;
        Self::new(index_of_refraction(params, options, 1.5))
    }
}

// ---- Tests ----

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::geometry::*;

    #[test]
    fn transmission_keeps_direction() {
        let material = ThinDielectricMaterial::new(1.5);
        let sf = material.compute_scattering_functions(&test_interaction(), TransportMode::Radiance);
        let bsdf = sf.bsdf.expect("thin dielectric has a BSDF");

        let wo = Vector3f::new(0.0, 0.6, 0.8);
        let bs = bsdf
            .sample_f(&wo, 0.99, &Point2f::new(0.5, 0.5), TransportMode::Radiance, BxDFReflTransFlags::ALL)
            .expect("specular transmission");
        assert!(bs.is_specular());
        assert!((bs.wi.y + 0.6).abs() < 1e-4);
        assert!((bs.wi.z + 0.8).abs() < 1e-4);
    }
}
