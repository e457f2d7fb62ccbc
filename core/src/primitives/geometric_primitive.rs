//! Geometric Primitives

use crate::geometry::*;
use crate::interaction::*;
use crate::light::*;
use crate::material::*;
use crate::medium::*;
use crate::primitive::*;
use crate::shape::*;

/// GeometricPrimitive represents a single shape in a scene.
#[derive(Clone)]
pub struct GeometricPrimitive {
    /// The shape.
    pub shape: ArcShape,

    /// The material. Primitives without one only mark medium boundaries.
    pub material: Option<ArcMaterial>,

    /// Optional area light that describes emmission characterisitics if it
    /// emits light.
    pub area_light: Option<ArcAreaLight>,

    /// Information about the participating media on the inside and outside
    /// the primitive.
    pub medium_interface: MediumInterface,
}

impl GeometricPrimitive {
    /// Create a new geometric primitive.
    ///
    /// * `shape`            - The shape.
    /// * `material`         - The material.
    /// * `area_light`       - Optional area light that describes emmission
    ///                        characterisitics if it emits light.
    /// * `medium_interface` - Information about the participating media on the
    ///                        inside and outside the primitive.
    pub fn new(
        shape: ArcShape,
        material: Option<ArcMaterial>,
        area_light: Option<ArcAreaLight>,
        medium_interface: MediumInterface,
    ) -> Self {
        Self {
            shape,
            material,
            area_light,
            medium_interface,
        }
    }
}

impl Primitive for GeometricPrimitive {
    /// Returns a bounding box in the world space.
    fn world_bound(&self) -> Bounds3f {
        self.shape.world_bound()
    }

    /// Returns geometric details if a ray intersects the primitive and updates
    /// the t_max parameter of the ray.
    ///
    /// * `r` - The ray.
    fn intersect(&self, r: &mut Ray) -> Option<SurfaceInteraction<'_>> {
        let mut it = self.shape.intersect(r)?;
        r.t_max = it.t;
        it.isect.primitive = Some(self);

        // Initialize the medium interface after shape intersection. Primitives
        // that are not a medium transition inherit the ray's medium.
        it.isect.hit.medium_interface = if self.medium_interface.is_medium_transition() {
            Some(self.medium_interface.clone())
        } else {
            Some(MediumInterface::from(r.medium.clone()))
        };

        Some(it.isect)
    }

    /// Returns `true` if a ray-primitive intersection succeeds.
    ///
    /// * `r` - The ray.
    fn intersect_p(&self, r: &Ray) -> bool {
        self.shape.intersect_p(r)
    }

    /// Returns the area light if the primitive is emissive.
    fn get_area_light(&self) -> Option<ArcAreaLight> {
        self.area_light.clone()
    }

    /// Returns the material.
    fn get_material(&self) -> Option<&ArcMaterial> {
        self.material.as_ref()
    }

    /// Returns the participating media on either side of the primitive.
    fn medium_interface(&self) -> Option<&MediumInterface> {
        Some(&self.medium_interface)
    }
}
