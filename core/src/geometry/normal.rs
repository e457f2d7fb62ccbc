//! 3-D Normals

#![allow(dead_code)]
use super::{abs, Float, Vector3};
use num_traits::{Num, Zero};
use std::ops::{Add, Mul, MulAssign, Neg, Sub};

/// A 3-D normal containing numeric values.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Normal3<T> {
    /// X-coordinate.
    pub x: T,

    /// Y-coordinate.
    pub y: T,

    /// Z-coordinate.
    pub z: T,
}

/// 3-D normal containing `Float` values.
pub type Normal3f = Normal3<Float>;

impl Normal3f {
    /// Zero normal.
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };
}

impl<T: Num + Copy> Normal3<T> {
    /// Creates a new 3-D normal.
    ///
    /// * `x` - X-coordinate.
    /// * `y` - Y-coordinate.
    /// * `z` - Z-coordinate.
    pub fn new(x: T, y: T, z: T) -> Self {
        Self { x, y, z }
    }

    /// Creates a new 3-D zero normal.
    pub fn zero() -> Self
    where
        T: Zero,
    {
        Self::new(T::zero(), T::zero(), T::zero())
    }

    /// Returns the dot product with a vector.
    ///
    /// * `v` - The vector.
    pub fn dot(&self, v: &Vector3<T>) -> T {
        self.x * v.x + self.y * v.y + self.z * v.z
    }

    /// Returns the absolute value of the dot product with a vector.
    ///
    /// * `v` - The vector.
    pub fn abs_dot(&self, v: &Vector3<T>) -> T
    where
        T: Neg<Output = T> + PartialOrd,
    {
        abs(self.dot(v))
    }

    /// Returns the cross product with a vector.
    ///
    /// * `v` - The vector.
    pub fn cross(&self, v: &Vector3<T>) -> Vector3<T> {
        Vector3::new(
            (self.y * v.z) - (self.z * v.y),
            (self.z * v.x) - (self.x * v.z),
            (self.x * v.y) - (self.y * v.x),
        )
    }

    /// Returns the square of the normal's length.
    pub fn length_squared(&self) -> T {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Returns the unit normal.
    pub fn normalize(&self) -> Self
    where
        T: num_traits::Float,
    {
        let len = self.length_squared().sqrt();
        Self::new(self.x / len, self.y / len, self.z / len)
    }

    /// Flip the normal so it lies in the same hemisphere as the given vector.
    ///
    /// * `v` - The vector.
    pub fn face_forward(&self, v: &Vector3<T>) -> Self
    where
        T: Neg<Output = T> + PartialOrd,
    {
        if self.dot(v) < T::zero() {
            -*self
        } else {
            *self
        }
    }
}

impl<T: Num> Add for Normal3<T> {
    type Output = Self;

    /// Adds the given normal and returns the result.
    ///
    /// * `other` - The normal to add.
    fn add(self, other: Self) -> Self::Output {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl<T: Num> Sub for Normal3<T> {
    type Output = Self;

    /// Subtracts the given normal and returns the result.
    ///
    /// * `other` - The normal to subtract.
    fn sub(self, other: Self) -> Self::Output {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl<T: Num + Copy> Mul<T> for Normal3<T> {
    type Output = Self;

    /// Scale the normal.
    ///
    /// * `f` - The scaling factor.
    fn mul(self, f: T) -> Self::Output {
        Self::new(self.x * f, self.y * f, self.z * f)
    }
}

impl<T: Num + Copy> MulAssign<T> for Normal3<T> {
    /// Scale the normal.
    ///
    /// * `f` - The scaling factor.
    fn mul_assign(&mut self, f: T) {
        *self = Self::new(self.x * f, self.y * f, self.z * f);
    }
}

impl<T: Num + Neg<Output = T>> Neg for Normal3<T> {
    type Output = Self;

    /// Flip the normal's direction (scale by -1).
    fn neg(self) -> Self::Output {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}

impl<T: Num> From<Vector3<T>> for Normal3<T> {
    /// Convert a 3-D vector to a 3-D normal.
    ///
    /// * `v` - 3-D vector.
    fn from(v: Vector3<T>) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}
