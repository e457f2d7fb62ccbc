//! Integrator

mod common;
mod sampler_integrator;

use crate::geometry::*;
use crate::scene::Scene;

// Re-export.
pub use common::*;
pub use sampler_integrator::*;

/// Integrator interface.
pub trait Integrator {
    /// Preprocess and render the scene.
    ///
    /// * `scene` - The scene.
    fn render(&mut self, scene: &Scene);

    /// Returns the cropped pixel bounds of the image.
    fn get_cropped_pixel_bounds(&self) -> Bounds2i;
}

impl<T: SamplerIntegrator> Integrator for T {
    fn render(&mut self, scene: &Scene) {
        self.preprocess(scene);
        self.render_samples(scene);
    }

    fn get_cropped_pixel_bounds(&self) -> Bounds2i {
        self.get_data().pixel_bounds
    }
}
