//! Power Light Distribution.

use super::LightDistribution;
use crate::geometry::*;
use crate::pbrt::*;
use crate::sampling::*;
use crate::scene::*;
use std::sync::Arc;

/// Returns a distribution with sampling probability proportional to the total
/// emitted power for each light, ignoring the provided point.
pub struct PowerLightDistribution {
    distrib: Option<Arc<Distribution1D>>,
}

impl PowerLightDistribution {
    /// Create a new instance of `PowerLightDistribution`.
    ///
    /// * `scene` - The scene.
    pub fn new(scene: &Scene) -> Self {
        Self {
            distrib: compute_light_power_distribution(scene).map(Arc::new),
        }
    }
}

impl LightDistribution for PowerLightDistribution {
    /// Returns the same distribution for every point.
    ///
    /// * `_p` - The point.
    fn lookup(&self, _p: &Point3f) -> Option<Arc<Distribution1D>> {
        self.distrib.as_ref().map(Arc::clone)
    }
}

/// Returns a distribution proportional to the luminance of each light's
/// power, or `None` if the scene has no lights. Falls back to a uniform
/// distribution when no light reports positive power.
///
/// * `scene` - The scene.
pub fn compute_light_power_distribution(scene: &Scene) -> Option<Distribution1D> {
    if scene.lights.is_empty() {
        None
    } else {
        let light_power: Vec<Float> = scene.lights.iter().map(|light| light.power().y()).collect();
        if light_power.iter().all(|p| *p <= 0.0) {
            Some(Distribution1D::new(vec![1.0; light_power.len()]))
        } else {
            Some(Distribution1D::new(light_power))
        }
    }
}
