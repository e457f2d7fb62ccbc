//! Light

use crate::geometry::*;
use crate::interaction::*;
use crate::pbrt::*;
use crate::scene::*;
use crate::spectrum::*;
use std::sync::Arc;

mod light_type;
mod visibility_tester;

// Re-export
pub use light_type::*;
pub use visibility_tester::*;

/// Return value for `Light::sample_li()`.
#[derive(Clone)]
pub struct LiSample {
    /// Radiance arriving at the interaction point.
    pub li: Spectrum,

    /// Incident direction.
    pub wi: Vector3f,

    /// PDF with respect to solid angle.
    pub pdf: Float,

    /// Visibility tester for the shadow ray.
    pub vis: VisibilityTester,
}

impl LiSample {
    /// Return a new `LiSample`.
    ///
    /// * `li`  - Radiance arriving at the interaction point.
    /// * `wi`  - Incident direction.
    /// * `pdf` - PDF with respect to solid angle.
    /// * `vis` - Visibility tester.
    pub fn new(li: Spectrum, wi: Vector3f, pdf: Float, vis: VisibilityTester) -> Self {
        Self { li, wi, pdf, vis }
    }
}

/// Light trait provides common behavior.
pub trait Light {
    /// Initialize the light source before rendering begins.
    ///
    /// * `scene` - The scene.
    fn preprocess(&self, _scene: &Scene) {}

    /// Returns the type of light.
    fn light_type(&self) -> LightType;

    /// Samples an incident direction at the interaction point. Returns `None`
    /// if the sample carries no radiance.
    ///
    /// * `hit` - The interaction hit point.
    /// * `u`   - Sample value for Monte Carlo integration.
    fn sample_li(&self, hit: &Hit, u: &Point2f) -> Option<LiSample>;

    /// Returns the probability density with respect to solid angle for the
    /// light's `sample_li()`.
    ///
    /// * `hit` - The interaction hit point.
    /// * `wi`  - The incident direction.
    fn pdf_li(&self, hit: &Hit, wi: &Vector3f) -> Float;

    /// Return the total emitted power.
    fn power(&self) -> Spectrum;

    /// Returns emitted radiance due to that light along a ray that escapes the
    /// scene bounds.
    ///
    /// * `ray` - The ray.
    fn le(&self, _ray: &Ray) -> Spectrum {
        Spectrum::ZERO
    }

    /// Returns whether light source is a delta light.
    fn is_delta_light(&self) -> bool {
        self.light_type().is_delta_light()
    }
}

/// Atomic reference counted `Light`.
pub type ArcLight = Arc<dyn Light + Send + Sync>;

/// AreaLight trait provides common behavior for area lights.
pub trait AreaLight: Light {
    /// Returns the area light's emitted radiance in a given outgoing direction.
    ///
    /// * `hit` - Point on a surface to evaluate emitted radiance.
    /// * `w`   - Outgoing direction.
    fn l(&self, hit: &Hit, w: &Vector3f) -> Spectrum;
}

/// Atomic reference counted `AreaLight`.
pub type ArcAreaLight = Arc<dyn AreaLight + Send + Sync>;
