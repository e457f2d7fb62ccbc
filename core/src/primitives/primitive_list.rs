//! Primitive List

use crate::geometry::*;
use crate::interaction::*;
use crate::light::*;
use crate::material::*;
use crate::primitive::*;

/// An aggregate that tests every primitive in turn.
#[derive(Clone, Default)]
pub struct PrimitiveList {
    /// The primitives.
    pub primitives: Vec<ArcPrimitive>,

    /// Union of the primitive bounds.
    bounds: Bounds3f,
}

impl PrimitiveList {
    /// Create a new aggregate.
    ///
    /// * `primitives` - The primitives.
    pub fn new(primitives: Vec<ArcPrimitive>) -> Self {
        let bounds = primitives
            .iter()
            .fold(Bounds3f::default(), |b, p| b.union(&p.world_bound()));
        Self { primitives, bounds }
    }
}

impl Primitive for PrimitiveList {
    /// Returns a bounding box in the world space.
    fn world_bound(&self) -> Bounds3f {
        self.bounds
    }

    /// Returns the closest intersection. Each hit shortens `r.t_max` so later
    /// primitives only report nearer hits.
    ///
    /// * `r` - The ray.
    fn intersect(&self, r: &mut Ray) -> Option<SurfaceInteraction<'_>> {
        let mut closest = None;
        for primitive in self.primitives.iter() {
            if let Some(si) = primitive.intersect(r) {
                closest = Some(si);
            }
        }
        closest
    }

    /// Returns `true` if any primitive is hit.
    ///
    /// * `r` - The ray.
    fn intersect_p(&self, r: &Ray) -> bool {
        self.primitives.iter().any(|p| p.intersect_p(r))
    }

    /// Aggregates are not emissive.
    fn get_area_light(&self) -> Option<ArcAreaLight> {
        None
    }

    /// Aggregates have no material of their own.
    fn get_material(&self) -> Option<&ArcMaterial> {
        None
    }
}
