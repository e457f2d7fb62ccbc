//! Interactions

use crate::geometry::*;
use crate::medium::*;
use crate::pbrt::*;

mod medium_interaction;
mod surface_interaction;

pub use medium_interaction::*;
pub use surface_interaction::*;

/// Hit provides common data shared by surface and medium interactions.
#[derive(Clone, Default)]
pub struct Hit {
    /// Point of interaction.
    pub p: Point3f,

    /// Time when interaction occurred.
    pub time: Float,

    /// Floating point error for ray intersection points.
    pub p_error: Vector3f,

    /// The negative ray direction (outgoing direction used when computing
    /// lighting at points).
    pub wo: Vector3f,

    /// Surface normal at the point `p`. Zero for medium interactions.
    pub n: Normal3f,

    /// The medium interface used for scattering media.
    pub medium_interface: Option<MediumInterface>,
}

impl Hit {
    /// Create a new hit.
    ///
    /// NOTE: If you need to contruct a new `Hit` without `wo`, `n` and `p_error`
    /// use `Hit::new_minimal()`. This function calls `wo.normalize()` and will
    /// generate weird values for zero vectors.
    ///
    /// `p`                - Point of interaction.
    /// `time`             - Time when interaction occurred.
    /// `p_error`          - Floating point error for ray intersection points.
    /// `wo`               - The negative ray direction.
    /// `n`                - Surface normal at the point `p`.
    /// `medium_interface` - The medium interface used for scattering media.
    pub fn new(
        p: Point3f,
        time: Float,
        p_error: Vector3f,
        wo: Vector3f,
        n: Normal3f,
        medium_interface: Option<MediumInterface>,
    ) -> Self {
        Self {
            p,
            time,
            p_error,
            wo: wo.normalize(),
            n,
            medium_interface,
        }
    }

    /// Create a new hit from minimal fields.
    ///
    /// `p`                - Point of interaction.
    /// `time`             - Time when interaction occurred.
    /// `medium_interface` - The medium interface used for scattering media.
    pub fn new_minimal(p: Point3f, time: Float, medium_interface: Option<MediumInterface>) -> Self {
        Self {
            p,
            time,
            p_error: Vector3f::ZERO,
            wo: Vector3f::ZERO,
            n: Normal3f::ZERO,
            medium_interface,
        }
    }

    /// Create a hit for a point sampled on a surface. It has no outgoing
    /// direction.
    ///
    /// `p`       - Point on the surface.
    /// `p_error` - Floating point error bounds for `p`.
    /// `n`       - Surface normal.
    pub fn on_surface(p: Point3f, p_error: Vector3f, n: Normal3f) -> Self {
        Self {
            p,
            time: 0.0,
            p_error,
            wo: Vector3f::ZERO,
            n,
            medium_interface: None,
        }
    }

    /// Returns `true` if this is a surface interaction.
    pub fn is_surface_interaction(&self) -> bool {
        self.n != Normal3f::ZERO
    }

    /// Returns `true` if this is a medium interaction.
    pub fn is_medium_interaction(&self) -> bool {
        !self.is_surface_interaction()
    }

    /// Spawn's a new ray in the given direction.
    ///
    /// * `d` - The new direction.
    pub fn spawn_ray(&self, d: &Vector3f) -> Ray {
        let origin = Ray::offset_origin(&self.p, &self.p_error, &self.n, d);
        Ray::new(origin, *d, INFINITY, self.time, self.get_medium_in_direction(d))
    }

    /// Spawn's a new ray towards another point.
    ///
    /// * `p` - The target point.
    pub fn spawn_ray_to_point(&self, p: &Point3f) -> Ray {
        let d = *p - self.p;
        let origin = Ray::offset_origin(&self.p, &self.p_error, &self.n, &d);
        Ray::new(
            origin,
            d,
            1.0 - SHADOW_EPSILON,
            self.time,
            self.get_medium_in_direction(&d),
        )
    }

    /// Spawn's a new ray towards another interaction.
    ///
    /// * `hit` - The interaction.
    pub fn spawn_ray_to_hit(&self, hit: &Hit) -> Ray {
        let origin = Ray::offset_origin(&self.p, &self.p_error, &self.n, &(hit.p - self.p));
        let target = Ray::offset_origin(&hit.p, &hit.p_error, &hit.n, &(origin - hit.p));
        let d = target - origin;
        Ray::new(
            origin,
            d,
            1.0 - SHADOW_EPSILON,
            self.time,
            self.get_medium_in_direction(&d),
        )
    }

    /// Returns the medium towards a direction. Medium interactions have no
    /// normal and report the medium on either side.
    ///
    /// * `w` - The direction.
    pub fn get_medium_in_direction(&self, w: &Vector3f) -> Option<ArcMedium> {
        let mi = self.medium_interface.as_ref()?;
        if self.is_medium_interaction() || w.dot_normal(&self.n) > 0.0 {
            mi.outside.clone()
        } else {
            mi.inside.clone()
        }
    }

    /// Returns the medium when interior and exterior are the same.
    pub fn get_medium(&self) -> Option<ArcMedium> {
        let mi = self.medium_interface.as_ref()?;
        if mi.is_medium_transition() {
            None
        } else {
            mi.inside.clone()
        }
    }
}

// ---- Tests ----

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawned_ray_leaves_surface_on_the_side_of_the_direction() {
        let hit = Hit::new(
            Point3f::new(0.0, 0.0, 1.0),
            0.0,
            Vector3f::new(1e-4, 1e-4, 1e-4),
            Vector3f::new(0.0, 0.0, 1.0),
            Normal3f::new(0.0, 0.0, 1.0),
            None,
        );

        let up = hit.spawn_ray(&Vector3f::new(0.0, 0.0, 1.0));
        assert!(up.o.z > 1.0);

        let down = hit.spawn_ray(&Vector3f::new(0.0, 0.0, -1.0));
        assert!(down.o.z < 1.0);
    }

    #[test]
    fn vacuum_has_no_medium() {
        let hit = Hit::new_minimal(Point3f::ZERO, 0.0, Some(MediumInterface::vacuum()));
        assert!(hit.is_medium_interaction());
        assert!(hit.get_medium().is_none());
        assert!(hit.get_medium_in_direction(&Vector3f::new(0.0, 1.0, 0.0)).is_none());
    }
}
