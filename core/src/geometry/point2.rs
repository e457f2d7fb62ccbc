//! 2-D Points

#![allow(dead_code)]
use super::{Float, Int, Vector2};
use num_traits::Num;
use std::ops::{Add, Index, IndexMut, Sub};

/// A 2-D point containing numeric values.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Point2<T> {
    /// X-coordinate.
    pub x: T,

    /// Y-coordinate.
    pub y: T,
}

/// 2-D point containing `Float` values.
pub type Point2f = Point2<Float>;

/// 2-D point containing `Int` values.
pub type Point2i = Point2<Int>;

impl<T: Num> Point2<T> {
    /// Creates a new 2-D point.
    ///
    /// * `x` - X-coordinate.
    /// * `y` - Y-coordinate.
    pub fn new(x: T, y: T) -> Self {
        Self { x, y }
    }
}

impl<T: Num> Add<Vector2<T>> for Point2<T> {
    type Output = Self;

    /// Offsets the point by a vector.
    ///
    /// * `v` - The vector.
    fn add(self, v: Vector2<T>) -> Self::Output {
        Self::new(self.x + v.x, self.y + v.y)
    }
}

impl<T: Num> Sub for Point2<T> {
    type Output = Vector2<T>;

    /// Returns the vector between two points.
    ///
    /// * `p` - The point to subtract.
    fn sub(self, p: Self) -> Self::Output {
        Vector2::new(self.x - p.x, self.y - p.y)
    }
}

impl<T> Index<usize> for Point2<T> {
    type Output = T;

    /// Index the point by an axis.
    ///
    /// * `axis` - A 2-D coordinate axis.
    fn index(&self, axis: usize) -> &Self::Output {
        match axis {
            0 => &self.x,
            _ => &self.y,
        }
    }
}

impl<T> IndexMut<usize> for Point2<T> {
    /// Index the point by an axis to get a mutable coordinate.
    ///
    /// * `axis` - A 2-D coordinate axis.
    fn index_mut(&mut self, axis: usize) -> &mut Self::Output {
        match axis {
            0 => &mut self.x,
            _ => &mut self.y,
        }
    }
}

impl From<Point2i> for Point2f {
    /// Convert an integer point to a floating point one.
    ///
    /// * `p` - The integer point.
    fn from(p: Point2i) -> Self {
        Self::new(p.x as Float, p.y as Float)
    }
}
