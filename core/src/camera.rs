//! Camera

use crate::film::*;
use crate::geometry::*;
use crate::pbrt::*;
use std::sync::Arc;

/// Holds all of the sample values needed to specify a camera ray.
#[derive(Copy, Clone, Debug, Default)]
pub struct CameraSample {
    /// The point on the film to which the generated ray carries radiance.
    pub p_film: Point2f,

    /// Time at which the ray should sample the scene.
    pub time: Float,
}

impl CameraSample {
    /// Create a new `CameraSample`.
    ///
    /// * `p_film` - The point on the film.
    /// * `time`   - Time at which the ray should sample the scene.
    pub fn new(p_film: Point2f, time: Float) -> Self {
        Self { p_film, time }
    }
}

/// Camera trait interface.
pub trait Camera {
    /// Returns a ray corresponding to a given sample and a weight for how much
    /// the radiance arriving along it contributes to the image. Returns `None`
    /// when no ray is generated for the sample.
    ///
    /// * `sample` - The sample.
    fn generate_ray(&self, sample: &CameraSample) -> Option<(Ray, Float)>;

    /// Returns the film.
    fn get_film(&self) -> &Film;
}

/// Atomic reference counted `Camera`.
pub type ArcCamera = Arc<dyn Camera + Send + Sync>;
