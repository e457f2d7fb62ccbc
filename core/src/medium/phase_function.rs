//! Phase Function

use super::HGPhaseFunction;
use crate::geometry::*;
use crate::pbrt::*;
use std::fmt;

/// A sampled phase function direction.
#[derive(Copy, Clone, Debug)]
pub struct PhaseFunctionSample {
    /// Phase function value.
    pub p: Float,

    /// Sampled incident direction.
    pub wi: Vector3f,

    /// The value of the PDF.
    pub pdf: Float,
}

/// Models scattering properties in volumetric media.
#[derive(Copy, Clone, Debug)]
pub enum PhaseFunction {
    HenyeyGreenstein(HGPhaseFunction),
}

impl PhaseFunction {
    /// Returns the value of the phase function for the given pair of directions.
    ///
    /// * `wo` - Outgoing direction.
    /// * `wi` - Incident direction.
    pub fn p(&self, wo: &Vector3f, wi: &Vector3f) -> Float {
        match self {
            PhaseFunction::HenyeyGreenstein(f) => f.p(wo, wi),
        }
    }

    /// Samples an incident direction given the outgoing direction and a
    /// sample value in [0, 1)^2. Returns `None` when the density is zero.
    ///
    /// * `wo` - Outgoing direction.
    /// * `u`  - Sample value in [0, 1)^2.
    pub fn sample_p(&self, wo: &Vector3f, u: &Point2f) -> Option<PhaseFunctionSample> {
        match self {
            PhaseFunction::HenyeyGreenstein(f) => f.sample_p(wo, u),
        }
    }

    /// Returns the PDF of `sample_p()`.
    ///
    /// * `wo` - Outgoing direction.
    /// * `wi` - Incident direction.
    pub fn pdf(&self, wo: &Vector3f, wi: &Vector3f) -> Float {
        match self {
            PhaseFunction::HenyeyGreenstein(f) => f.pdf(wo, wi),
        }
    }
}

impl From<HGPhaseFunction> for PhaseFunction {
    fn from(hg: HGPhaseFunction) -> Self {
        Self::HenyeyGreenstein(hg)
    }
}

impl fmt::Display for PhaseFunction {
    /// Formats the value using the given formatter.
    ///
    /// * `f` - Formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[PhaseFunction ")?;
        match self {
            Self::HenyeyGreenstein(h) => write!(f, "{}", h)?,
        }
        write!(f, "]")
    }
}
