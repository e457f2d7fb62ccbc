//! Light Distribution.

mod power;
mod uniform;

pub use power::*;
pub use uniform::*;

use crate::geometry::*;
use crate::pbrt::*;
use crate::sampling::*;
use crate::scene::*;
use std::fmt;
use std::sync::Arc;

/// Light sampling strategy.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum LightSampleStrategy {
    /// Sample all light sources uniformly.
    Uniform,

    /// Samples light sources according to their emitted power.
    Power,

    /// Compute light contributions in regions of the scene and samples from a
    /// related distribution.
    Spatial,
}

impl LightSampleStrategy {
    /// Returns a `LightSampleStrategy` given a string name. Unknown names are
    /// reported and fall back to `Power`.
    ///
    /// * `name`    - The strategy name.
    /// * `options` - The rendering options used for error reporting.
    pub fn parse(name: &str, options: &Options) -> Self {
        match name {
            "uniform" => Self::Uniform,
            "power" => Self::Power,
            "spatial" => Self::Spatial,
            _ => {
                options.error(&format!(
                    "Light sample distribution type '{}' unknown. Using 'power'.",
                    name
                ));
                Self::Power
            }
        }
    }
}

impl fmt::Display for LightSampleStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uniform => write!(f, "uniform"),
            Self::Power => write!(f, "power"),
            Self::Spatial => write!(f, "spatial"),
        }
    }
}

/// Interface of light distribution implementations that provide probability
/// distributions for sampling light sources at a given point in space.
pub trait LightDistribution {
    /// Given a point `p` in space, this method returns a sampling distribution
    /// for light sources at that point.
    ///
    /// * `p` - The point.
    fn lookup(&self, p: &Point3f) -> Option<Arc<Distribution1D>>;
}

/// Atomic reference counted `LightDistribution `.
pub type ArcLightDistribution = Arc<dyn LightDistribution + Send + Sync>;

/// Returns a smart pointer to a new `LightDistribution` implementation.
///
/// * `strategy` - The strategy to use for light sampling.
/// * `scene`    - The scene.
/// * `options`  - The rendering options used for error reporting.
pub fn create_light_sample_distribution(
    strategy: LightSampleStrategy,
    scene: &Scene,
    options: &Options,
) -> ArcLightDistribution {
    let strategy = if scene.lights.len() == 1 {
        LightSampleStrategy::Uniform
    } else {
        strategy
    };

    match strategy {
        LightSampleStrategy::Uniform => Arc::new(UniformLightDistribution::new(scene)),
        LightSampleStrategy::Power => Arc::new(PowerLightDistribution::new(scene)),
        LightSampleStrategy::Spatial => {
            options.warning("Spatial light sampling is not available. Using 'power'.");
            Arc::new(PowerLightDistribution::new(scene))
        }
    }
}
