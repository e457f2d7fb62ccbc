//! Uniform Infinite Light Source

use strata_core::geometry::*;
use strata_core::interaction::*;
use strata_core::light::*;
use strata_core::paramset::*;
use strata_core::pbrt::*;
use strata_core::sampling::*;
use strata_core::scene::*;
use strata_core::spectrum::*;
use std::sync::{PoisonError, RwLock};

/// Implements an infinitely far away light source that surrounds the scene
/// and emits the same radiance from every direction.
pub struct UniformInfiniteLight {
    /// Emitted radiance.
    pub l_emit: Spectrum,

    /// Bounding sphere of the scene as (center, radius). Calculated in
    /// `preprocess()`.
    world_bounds: RwLock<(Point3f, Float)>,
}

impl UniformInfiniteLight {
    /// Returns a new `UniformInfiniteLight`.
    ///
    /// * `l_emit` - Emitted radiance.
    pub fn new(l_emit: Spectrum) -> Self {
        Self {
            l_emit,
            world_bounds: RwLock::new((Point3f::ZERO, 1.0)),
        }
    }

    /// Returns the scene's bounding sphere.
    fn world_bounds(&self) -> (Point3f, Float) {
        *self.world_bounds.read().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Light for UniformInfiniteLight {
    /// Records the scene's bounding sphere.
    ///
    /// * `scene` - The scene.
    fn preprocess(&self, scene: &Scene) {
        *self.world_bounds.write().unwrap_or_else(PoisonError::into_inner) = scene.world_bound.bounding_sphere();
    }

    /// Returns the type of light.
    fn light_type(&self) -> LightType {
        LightType::INFINITE
    }

    /// Samples a direction uniformly over the sphere.
    ///
    /// * `hit` - The interaction hit point.
    /// * `u`   - Sample value for Monte Carlo integration.
    fn sample_li(&self, hit: &Hit, u: &Point2f) -> Option<LiSample> {
        let wi = uniform_sample_sphere(u);
        let (_, world_radius) = self.world_bounds();
        let p1 = Hit::new_minimal(hit.p + wi * (2.0 * world_radius), hit.time, hit.medium_interface.clone());
        let vis = VisibilityTester::new(hit.clone(), p1);
        Some(LiSample::new(self.l_emit, wi, uniform_sphere_pdf(), vis))
    }

    /// Return the total emitted power.
    fn power(&self) -> Spectrum {
        let (_, world_radius) = self.world_bounds();
        self.l_emit * (PI * world_radius * world_radius)
    }

    /// Returns the uniform sphere density.
    ///
    /// * `_hit` - Unused.
    /// * `_wi`  - Unused.
    fn pdf_li(&self, _hit: &Hit, _wi: &Vector3f) -> Float {
        uniform_sphere_pdf()
    }

    /// Returns the radiance along a ray that escapes the scene.
    ///
    /// * `_ray` - Unused.
    fn le(&self, _ray: &Ray) -> Spectrum {
        self.l_emit
    }
}

impl From<&ParamSet> for UniformInfiniteLight {
    /// Create a `UniformInfiniteLight` from given parameter set.
    ///
    /// * `params` - The parameter set.
    fn from(params: &ParamSet) -> Self {
        let l = params.find_one_spectrum("L", Spectrum::ONE);
        let sc = params.find_one_spectrum("scale", Spectrum::ONE);
        Self::new(l * sc)
    }
}

// ---- Tests ----

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    #[test]
    fn radiance_is_constant() {
        let light = UniformInfiniteLight::new(Spectrum::new(0.5));
        let hit = Hit::new_minimal(Point3f::ZERO, 0.0, None);
        let s = light.sample_li(&hit, &Point2f::new(0.3, 0.7)).expect("sample");
        assert_eq!(s.li[0], 0.5);
        assert!(approx_eq!(f32, s.pdf, INV_FOUR_PI, ulps = 4));
        assert!(approx_eq!(f32, light.pdf_li(&hit, &s.wi), s.pdf, ulps = 4));
        assert!(!light.is_delta_light());
        assert!(light.light_type().matches(LightType::INFINITE));
    }
}
