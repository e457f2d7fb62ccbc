//! Rays

use super::*;
use crate::medium::ArcMedium;
use std::fmt;

/// A semi-infinite line specified by its origin and direction.
#[derive(Clone, Default)]
pub struct Ray {
    /// Origin.
    pub o: Point3f,

    /// Direction.
    pub d: Vector3f,

    /// Maximum extent of the ray.
    pub t_max: Float,

    /// Time value.
    pub time: Float,

    /// The medium containing the ray origin.
    pub medium: Option<ArcMedium>,
}

impl Ray {
    /// Create a new ray.
    ///
    /// * `o`      - Origin.
    /// * `d`      - Direction.
    /// * `t_max`  - Maximum extent of the ray.
    /// * `time`   - Time value.
    /// * `medium` - The medium containing the ray origin.
    pub fn new(o: Point3f, d: Vector3f, t_max: Float, time: Float, medium: Option<ArcMedium>) -> Self {
        Self {
            o,
            d,
            t_max,
            time,
            medium,
        }
    }

    /// Returns the position along the ray at given parameter.
    ///
    /// * `t` - The parameter.
    pub fn at(&self, t: Float) -> Point3f {
        self.o + self.d * t
    }

    /// Offsets a ray origin along the normal by the floating point error
    /// bounds so the spawned ray does not re-intersect the surface it left.
    ///
    /// * `p`       - The ray origin.
    /// * `p_error` - Floating point error bounds for `p`.
    /// * `n`       - Surface normal at `p`.
    /// * `w`       - The ray direction.
    pub fn offset_origin(p: &Point3f, p_error: &Vector3f, n: &Normal3f, w: &Vector3f) -> Point3f {
        let d = Vector3f::from(*n).abs().dot(p_error);

        let mut offset = Vector3f::from(*n) * d;
        if w.dot_normal(n) < 0.0 {
            offset = -offset;
        }

        let mut po = *p + offset;

        // Round offset point po away from p.
        for axis in 0..3 {
            if offset[axis] > 0.0 {
                po[axis] = next_float_up(po[axis]);
            } else if offset[axis] < 0.0 {
                po[axis] = next_float_down(po[axis]);
            }
        }

        po
    }
}

impl fmt::Debug for Ray {
    /// Display the ray parameters.
    ///
    /// * `f` - Formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ray")
            .field("o", &self.o)
            .field("d", &self.d)
            .field("t_max", &self.t_max)
            .field("time", &self.time)
            .field("medium", &self.medium.is_some())
            .finish()
    }
}
