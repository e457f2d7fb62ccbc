//! 3-D Axis Aligned Bounding Boxes.

use super::{max, min, Float, Point3f};

/// 3-D Axis Aligned Bounding Box.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds3f {
    /// Minimum bounds.
    pub p_min: Point3f,

    /// Maximum bounds.
    pub p_max: Point3f,
}

impl Default for Bounds3f {
    /// Returns an empty bounding box.
    fn default() -> Self {
        Self {
            p_min: Point3f::new(Float::MAX, Float::MAX, Float::MAX),
            p_max: Point3f::new(Float::MIN, Float::MIN, Float::MIN),
        }
    }
}

impl Bounds3f {
    /// Creates a new 3-D bounding box from 2 points.
    ///
    /// * `p1` - First point.
    /// * `p2` - Second point.
    pub fn new(p1: Point3f, p2: Point3f) -> Self {
        Self {
            p_min: Point3f::new(min(p1.x, p2.x), min(p1.y, p2.y), min(p1.z, p2.z)),
            p_max: Point3f::new(max(p1.x, p2.x), max(p1.y, p2.y), max(p1.z, p2.z)),
        }
    }

    /// Returns the union with another bounding box.
    ///
    /// * `other` - The other bounding box.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            p_min: Point3f::new(
                min(self.p_min.x, other.p_min.x),
                min(self.p_min.y, other.p_min.y),
                min(self.p_min.z, other.p_min.z),
            ),
            p_max: Point3f::new(
                max(self.p_max.x, other.p_max.x),
                max(self.p_max.y, other.p_max.y),
                max(self.p_max.z, other.p_max.z),
            ),
        }
    }

    /// Returns the center and radius of a sphere that bounds the box.
    pub fn bounding_sphere(&self) -> (Point3f, Float) {
        let center = 0.5 * (self.p_min + self.p_max);
        let radius = if self.p_min.x <= self.p_max.x {
            center.distance(&self.p_max)
        } else {
            0.0
        };
        (center, radius)
    }
}
