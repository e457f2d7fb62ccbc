//! Surface Interactions

use super::Hit;
use crate::geometry::*;
use crate::material::*;
use crate::pbrt::*;
use crate::primitive::*;
use crate::reflection::*;
use crate::spectrum::*;

/// Shading geometry used for perturbed values.
#[derive(Copy, Clone, Debug, Default)]
pub struct Shading {
    /// Shading normal.
    pub n: Normal3f,

    /// Shading parametric partial derivative of the point ∂p/∂u.
    pub dpdu: Vector3f,
}

/// SurfaceInteraction represents geometry of a particular point on a surface.
///
/// The lifetime specifiers:
/// * `'scene` - Shared reference to the scene containing primitive.
#[derive(Clone)]
pub struct SurfaceInteraction<'scene> {
    /// The common interaction data.
    pub hit: Hit,

    /// The uv coordinates from surface parametrization.
    pub uv: Point2f,

    /// Parametric partial derivative of the point ∂p/∂u.
    pub dpdu: Vector3f,

    /// Shading geometry used for perturbed values.
    pub shading: Shading,

    /// The primitive.
    pub primitive: Option<&'scene dyn Primitive>,
}

impl<'scene> SurfaceInteraction<'scene> {
    /// Create a new surface interaction. The shading geometry starts out equal
    /// to the true geometry.
    ///
    /// * `p`       - Point of interaction.
    /// * `p_error` - Floating point error for ray intersection points.
    /// * `uv`      - The uv coordinates from surface parametrization.
    /// * `wo`      - The negative ray direction.
    /// * `n`       - Surface normal.
    /// * `dpdu`    - Parametric partial derivative of the point ∂p/∂u.
    /// * `time`    - Time when interaction occurred.
    pub fn new(
        p: Point3f,
        p_error: Vector3f,
        uv: Point2f,
        wo: Vector3f,
        n: Normal3f,
        dpdu: Vector3f,
        time: Float,
    ) -> Self {
        Self {
            hit: Hit::new(p, time, p_error, wo, n, None),
            uv,
            dpdu,
            shading: Shading { n, dpdu },
            primitive: None,
        }
    }

    /// Returns the emitted radiance at a surface point intersected by a ray.
    ///
    /// * `w` - Outgoing direction.
    pub fn le(&self, w: &Vector3f) -> Spectrum {
        self.primitive
            .and_then(|primitive| primitive.get_area_light())
            .map_or(Spectrum::ZERO, |area| area.l(&self.hit, w))
    }

    /// Returns the material of the intersected primitive. Surfaces without a
    /// material only delimit participating media.
    pub fn get_material(&self) -> Option<&'scene ArcMaterial> {
        self.primitive.and_then(|primitive| primitive.get_material())
    }

    /// Initializes representations of the light-scattering properties of the
    /// material at the intersection point on the surface.
    ///
    /// * `mode` - Transport mode.
    pub fn compute_scattering_functions(&self, mode: TransportMode) -> ScatteringFunctions<'scene> {
        match self.get_material() {
            Some(material) => material.compute_scattering_functions(self, mode),
            None => ScatteringFunctions::default(),
        }
    }
}
