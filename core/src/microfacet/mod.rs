//! Microfacet Distribution Models

use crate::geometry::*;
use crate::pbrt::*;
use crate::reflection::*;

mod trowbridge_reitz;

// Re-exports
pub use trowbridge_reitz::*;

/// Interface for microfacet distribution models. Scattering models consume
/// microfacet statistics only through this trait.
pub trait MicrofacetDistribution {
    /// Return the differential area of microfacets oriented with the surface
    /// normal `wm`.
    ///
    /// * `wm` - A microfacet normal.
    fn d(&self, wm: &Vector3f) -> Float;

    /// Returns the invisible masked microfacet area per visible microfacet area.
    ///
    /// * `w` - The direction from camera/viewer.
    fn lambda(&self, w: &Vector3f) -> Float;

    /// Returns true when the surface is smooth enough to be treated as a
    /// perfect specular interface.
    fn effectively_smooth(&self) -> bool;

    /// Returns a microfacet normal sampled from the distribution of normals
    /// visible from `w`.
    ///
    /// * `w` - The direction from camera/viewer.
    /// * `u` - The 2D uniform random values.
    fn sample_wm(&self, w: &Vector3f, u: &Point2f) -> Vector3f;

    /// Increases roughness to trade bias for lower variance.
    fn regularize(&mut self);

    /// Evaluates Smith's masking function which gives the fraction of
    /// microfacets that are visible from a given direction.
    ///
    /// * `w` - The direction from camera/viewer.
    fn g1(&self, w: &Vector3f) -> Float {
        1.0 / (1.0 + self.lambda(w))
    }

    /// Returns the fraction of microfacets in a differential area that are
    /// visible from both directions `wo` and `wi`.
    ///
    /// * `wo` - Outgoing direction.
    /// * `wi` - Incident direction.
    fn g(&self, wo: &Vector3f, wi: &Vector3f) -> Float {
        1.0 / (1.0 + self.lambda(wo) + self.lambda(wi))
    }

    /// Returns the distribution of normals visible from `w`.
    ///
    /// * `w`  - The direction from camera/viewer.
    /// * `wm` - A microfacet normal.
    fn d_visible(&self, w: &Vector3f, wm: &Vector3f) -> Float {
        let cos = abs_cos_theta(w);
        if cos == 0.0 {
            return 0.0;
        }
        self.g1(w) / cos * self.d(wm) * w.abs_dot(wm)
    }

    /// Evaluates the PDF of `sample_wm()`.
    ///
    /// * `w`  - The direction from camera/viewer.
    /// * `wm` - A microfacet normal.
    fn pdf(&self, w: &Vector3f, wm: &Vector3f) -> Float {
        self.d_visible(w, wm)
    }
}
