//! 2-D Axis Aligned Bounding Boxes.

use super::{max, min, Int, Point2, Point2i};
use num_traits::Num;

/// 2-D Axis Aligned Bounding Box.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Bounds2<T> {
    /// Minimum bounds.
    pub p_min: Point2<T>,

    /// Maximum bounds.
    pub p_max: Point2<T>,
}

/// 2-D bounding box containing `Int` points.
pub type Bounds2i = Bounds2<Int>;

impl<T: Num + PartialOrd + Copy> Bounds2<T> {
    /// Creates a new 2-D bounding box from 2 points. The minimum and maximum
    /// bounds are used for each coordinate axis.
    ///
    /// * `p1` - First point.
    /// * `p2` - Second point.
    pub fn new(p1: Point2<T>, p2: Point2<T>) -> Self {
        Self {
            p_min: Point2::new(min(p1.x, p2.x), min(p1.y, p2.y)),
            p_max: Point2::new(max(p1.x, p2.x), max(p1.y, p2.y)),
        }
    }

    /// Returns the intersection of this box with another.
    ///
    /// * `other` - The other bounding box.
    pub fn intersect(&self, other: &Self) -> Self {
        Self {
            p_min: Point2::new(max(self.p_min.x, other.p_min.x), max(self.p_min.y, other.p_min.y)),
            p_max: Point2::new(min(self.p_max.x, other.p_max.x), min(self.p_max.y, other.p_max.y)),
        }
    }

    /// Returns `true` if the box encloses no area.
    pub fn is_empty(&self) -> bool {
        self.p_min.x >= self.p_max.x || self.p_min.y >= self.p_max.y
    }

    /// Returns the area of the box.
    pub fn area(&self) -> T {
        let d = self.p_max - self.p_min;
        d.x * d.y
    }
}

impl Bounds2i {
    /// Returns an iterator over the pixels enclosed by the half-open box.
    pub fn iter(&self) -> impl Iterator<Item = Point2i> + '_ {
        (self.p_min.y..self.p_max.y)
            .flat_map(move |y| (self.p_min.x..self.p_max.x).map(move |x| Point2i::new(x, y)))
    }
}

// ---- Tests ----

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intersect_and_empty() {
        let a = Bounds2i::new(Point2i::new(0, 0), Point2i::new(8, 8));
        let b = Bounds2i::new(Point2i::new(4, 2), Point2i::new(12, 6));
        let c = a.intersect(&b);
        assert_eq!(c.p_min, Point2i::new(4, 2));
        assert_eq!(c.p_max, Point2i::new(8, 6));
        assert_eq!(c.area(), 16);
        assert_eq!(c.iter().count(), 16);

        let d = Bounds2i::new(Point2i::new(9, 9), Point2i::new(12, 12));
        assert!(a.intersect(&d).is_empty());
    }
}
