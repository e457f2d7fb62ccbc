//! BSDF Sample

use super::*;

/// A sampled incident direction with the distribution value and density.
#[derive(Copy, Clone, Debug, Default)]
pub struct BSDFSample {
    /// The sample value.
    pub f: Spectrum,

    /// The sampled incident direction.
    pub wi: Vector3f,

    /// The value of the PDF.
    pub pdf: Float,

    /// The lobe that was sampled.
    pub flags: BxDFFlags,

    /// Relative index of refraction along the sampled direction.
    pub eta: Float,

    /// Set when `pdf` is only proportional to the true sampling density.
    pub pdf_is_proportional: bool,
}

impl BSDFSample {
    /// Create a new `BSDFSample`.
    ///
    /// * `f`     - The sample value.
    /// * `wi`    - The sampled incident direction.
    /// * `pdf`   - The value of the PDF.
    /// * `flags` - The lobe that was sampled.
    pub fn new(f: Spectrum, wi: Vector3f, pdf: Float, flags: BxDFFlags) -> Self {
        Self {
            f,
            wi,
            pdf,
            flags,
            eta: 1.0,
            pdf_is_proportional: false,
        }
    }

    /// Sets the relative index of refraction.
    ///
    /// * `eta` - Relative index of refraction.
    pub fn with_eta(mut self, eta: Float) -> Self {
        self.eta = eta;
        self
    }

    /// Marks the density as proportional only.
    pub fn proportional(mut self) -> Self {
        self.pdf_is_proportional = true;
        self
    }

    /// Returns true if the sample carries a usable contribution.
    pub fn is_valid(&self) -> bool {
        self.pdf > 0.0 && !self.f.is_black() && self.wi.z != 0.0
    }

    /// Returns true if the sampled lobe is reflective.
    pub fn is_reflection(&self) -> bool {
        self.flags.is_reflective()
    }

    /// Returns true if the sampled lobe is transmissive.
    pub fn is_transmission(&self) -> bool {
        self.flags.is_transmissive()
    }

    /// Returns true if the sampled lobe is a delta distribution.
    pub fn is_specular(&self) -> bool {
        self.flags.is_specular()
    }
}
