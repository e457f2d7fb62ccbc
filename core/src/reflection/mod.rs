//! Reflection and surface scattering models

use crate::geometry::*;
use crate::microfacet::*;
use crate::pbrt::*;
use crate::sampling::*;
use crate::spectrum::*;

mod bsdf;
mod bsdf_sample;
mod bssrdf_adapter;
mod bxdf;
mod bxdf_flags;
mod common;
mod conductor;
mod dielectric;
mod diffuse;
mod fourier_table;
mod fresnel;
mod hair;
mod layered;
mod measured;
mod thin_dielectric;

// Re-export
pub use bsdf::*;
pub use bsdf_sample::*;
pub use bssrdf_adapter::*;
pub use bxdf::*;
pub use bxdf_flags::*;
pub use common::*;
pub use conductor::*;
pub use dielectric::*;
pub use diffuse::*;
pub use fourier_table::*;
pub use fresnel::*;
pub use hair::*;
pub use layered::*;
pub use measured::*;
pub use thin_dielectric::*;
