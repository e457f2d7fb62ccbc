//! Medium Interactions

use super::Hit;
use crate::geometry::*;
use crate::medium::*;
use crate::pbrt::*;

/// MediumInteraction represents an interaction point in a scattering medium.
#[derive(Clone)]
pub struct MediumInteraction {
    /// The common interaction data.
    pub hit: Hit,

    /// The phase function.
    pub phase: PhaseFunction,
}

impl MediumInteraction {
    /// Create a new medium interaction.
    ///
    /// * `p`      - The point of interaction.
    /// * `wo`     - The negative ray direction.
    /// * `time`   - Time when interaction occurred.
    /// * `medium` - The medium containing the point.
    /// * `phase`  - The phase function.
    pub fn new(
        p: Point3f,
        wo: Vector3f,
        time: Float,
        medium: Option<ArcMedium>,
        phase: PhaseFunction,
    ) -> Self {
        Self {
            hit: Hit::new(
                p,
                time,
                Vector3f::ZERO,
                wo,
                Normal3f::ZERO,
                Some(MediumInterface::from(medium)),
            ),
            phase,
        }
    }

    /// Spawn's a new ray in the given direction.
    ///
    /// * `d` - The new direction.
    pub fn spawn_ray(&self, d: &Vector3f) -> Ray {
        self.hit.spawn_ray(d)
    }
}
