//! Material

use crate::bssrdf::*;
use crate::interaction::*;
use crate::reflection::*;
use std::sync::Arc;

/// The light scattering functions at a surface point.
///
/// The lifetime specifiers:
/// * `'scene` - Shared reference to the scene containing the material.
#[derive(Clone, Default)]
pub struct ScatteringFunctions<'scene> {
    /// The BSDF. `None` for surfaces that only delimit participating media.
    pub bsdf: Option<BSDF>,

    /// The BSSRDF for materials with subsurface light transport.
    pub bssrdf: Option<SeparableBSSRDF<'scene>>,
}

impl<'scene> ScatteringFunctions<'scene> {
    /// Returns scattering functions with only a BSDF.
    ///
    /// * `bsdf` - The BSDF.
    pub fn surface(bsdf: BSDF) -> Self {
        Self {
            bsdf: Some(bsdf),
            bssrdf: None,
        }
    }
}

/// Material trait provides common behavior.
pub trait Material {
    /// Initializes representations of the light-scattering properties of the
    /// material at the intersection point on the surface.
    ///
    /// * `si`   - The surface interaction at the intersection.
    /// * `mode` - Transport mode.
    fn compute_scattering_functions<'scene>(
        &self,
        si: &SurfaceInteraction<'scene>,
        mode: TransportMode,
    ) -> ScatteringFunctions<'scene>;
}

/// Atomic reference counted `Material`.
pub type ArcMaterial = Arc<dyn Material + Send + Sync>;
