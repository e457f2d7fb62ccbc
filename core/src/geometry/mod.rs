//! Geometry

use crate::pbrt::*;

// Define macros for property based testing.
#[cfg(test)]
#[macro_export]
macro_rules! prop_range {
    ($name: ident, $t: ty, $r: expr) => {
        prop_compose! {
            fn $name()(f in $r) -> $t {
                f
            }
        }
    };
}

#[cfg(test)]
#[macro_export]
macro_rules! prop_vector3 {
    ($name: ident, $t: ty, $xr: expr, $yr: expr, $zr: expr) => {
        prop_compose! {
            fn $name()(x in $xr, y in $yr, z in $zr) -> Vector3<$t> {
                Vector3 { x, y, z }
            }
        }
    };
}

#[cfg(test)]
#[macro_export]
macro_rules! prop_point2 {
    ($name: ident, $t: ty, $xr: expr, $yr: expr) => {
        prop_compose! {
            fn $name()(x in $xr, y in $yr) -> Point2<$t> {
                Point2 { x, y }
            }
        }
    };
}

/// Generates unit directions in the upper (`z > 0`) hemisphere that are not
/// grazing.
#[cfg(test)]
#[macro_export]
macro_rules! prop_hemisphere_direction {
    ($name: ident) => {
        prop_compose! {
            fn $name()(
                cos_theta in 0.05f32..1.0f32,
                phi in 0.0f32..6.2831f32,
            ) -> Vector3f {
                let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
                Vector3f::new(sin_theta * phi.cos(), sin_theta * phi.sin(), cos_theta)
            }
        }
    };
}

mod bounds2;
mod bounds3;
mod common;
mod normal;
mod point2;
mod point3;
mod ray;
mod vector2;
mod vector3;

// Re-export
pub use bounds2::*;
pub use bounds3::*;
pub use common::*;
pub use normal::*;
pub use point2::*;
pub use point3::*;
pub use ray::*;
pub use vector2::*;
pub use vector3::*;
