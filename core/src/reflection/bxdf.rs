//! BxDF

use super::*;
use std::fmt;

/// The four operations shared by every scattering distribution, expressed in
/// the local shading frame where the normal is the z-axis.
pub trait BxDFModel {
    /// Returns the capabilities of the distribution.
    fn flags(&self) -> BxDFFlags;

    /// Returns the value of the distribution function for the given pair of
    /// directions.
    ///
    /// * `wo`   - Outgoing direction.
    /// * `wi`   - Incident direction.
    /// * `mode` - Transport mode.
    fn f(&self, wo: &Vector3f, wi: &Vector3f, mode: TransportMode) -> Spectrum;

    /// Samples an incident direction. Returns `None` when no valid direction
    /// could be generated.
    ///
    /// * `wo`           - Outgoing direction.
    /// * `uc`           - 1D uniform sample used to choose a lobe.
    /// * `u`            - 2D uniform sample used to choose a direction.
    /// * `mode`         - Transport mode.
    /// * `sample_flags` - Lobes that may be sampled.
    fn sample_f(
        &self,
        wo: &Vector3f,
        uc: Float,
        u: &Point2f,
        mode: TransportMode,
        sample_flags: BxDFReflTransFlags,
    ) -> Option<BSDFSample>;

    /// Returns the density of `sample_f()` for the given pair of directions.
    ///
    /// * `wo`           - Outgoing direction.
    /// * `wi`           - Incident direction.
    /// * `mode`         - Transport mode.
    /// * `sample_flags` - Lobes that may be sampled.
    fn pdf(
        &self,
        wo: &Vector3f,
        wi: &Vector3f,
        mode: TransportMode,
        sample_flags: BxDFReflTransFlags,
    ) -> Float;

    /// Increases roughness to trade bias for lower variance.
    fn regularize(&mut self) {}

    /// Returns true when `pdf()` is only proportional to the density of
    /// `sample_f()`.
    fn sampled_pdf_is_proportional(&self) -> bool {
        false
    }
}

/// The closed set of scattering distributions.
#[derive(Clone)]
pub enum BxDF {
    IdealDiffuse(IdealDiffuseBxDF),
    Diffuse(DiffuseBxDF),
    DielectricInterface(DielectricInterfaceBxDF),
    ThinDielectric(ThinDielectricBxDF),
    Conductor(ConductorBxDF),
    CoatedDiffuse(CoatedDiffuseBxDF),
    CoatedConductor(CoatedConductorBxDF),
    Hair(HairBxDF),
    Measured(MeasuredBxDF),
    BSSRDFAdapter(BSSRDFAdapter),
}

macro_rules! dispatch {
    ($self: ident, $bxdf: ident => $e: expr) => {
        match $self {
            BxDF::IdealDiffuse($bxdf) => $e,
            BxDF::Diffuse($bxdf) => $e,
            BxDF::DielectricInterface($bxdf) => $e,
            BxDF::ThinDielectric($bxdf) => $e,
            BxDF::Conductor($bxdf) => $e,
            BxDF::CoatedDiffuse($bxdf) => $e,
            BxDF::CoatedConductor($bxdf) => $e,
            BxDF::Hair($bxdf) => $e,
            BxDF::Measured($bxdf) => $e,
            BxDF::BSSRDFAdapter($bxdf) => $e,
        }
    };
}

impl BxDFModel for BxDF {
    fn flags(&self) -> BxDFFlags {
        dispatch!(self, bxdf => bxdf.flags())
    }

    fn f(&self, wo: &Vector3f, wi: &Vector3f, mode: TransportMode) -> Spectrum {
        dispatch!(self, bxdf => bxdf.f(wo, wi, mode))
    }

    fn sample_f(
        &self,
        wo: &Vector3f,
        uc: Float,
        u: &Point2f,
        mode: TransportMode,
        sample_flags: BxDFReflTransFlags,
    ) -> Option<BSDFSample> {
        dispatch!(self, bxdf => bxdf.sample_f(wo, uc, u, mode, sample_flags))
    }

    fn pdf(
        &self,
        wo: &Vector3f,
        wi: &Vector3f,
        mode: TransportMode,
        sample_flags: BxDFReflTransFlags,
    ) -> Float {
        dispatch!(self, bxdf => bxdf.pdf(wo, wi, mode, sample_flags))
    }

    fn regularize(&mut self) {
        dispatch!(self, bxdf => bxdf.regularize())
    }

    fn sampled_pdf_is_proportional(&self) -> bool {
        dispatch!(self, bxdf => bxdf.sampled_pdf_is_proportional())
    }
}

impl BxDF {
    /// Returns the variant name.
    pub fn name(&self) -> &'static str {
        match self {
            BxDF::IdealDiffuse(_) => "IdealDiffuseBxDF",
            BxDF::Diffuse(_) => "DiffuseBxDF",
            BxDF::DielectricInterface(_) => "DielectricInterfaceBxDF",
            BxDF::ThinDielectric(_) => "ThinDielectricBxDF",
            BxDF::Conductor(_) => "ConductorBxDF",
            BxDF::CoatedDiffuse(_) => "CoatedDiffuseBxDF",
            BxDF::CoatedConductor(_) => "CoatedConductorBxDF",
            BxDF::Hair(_) => "HairBxDF",
            BxDF::Measured(_) => "MeasuredBxDF",
            BxDF::BSSRDFAdapter(_) => "BSSRDFAdapter",
        }
    }

    /// Estimates the hemispherical-directional reflectance ρ with the
    /// distribution's own sampling routine.
    ///
    /// * `wo` - Outgoing direction.
    /// * `uc` - 1D samples used by Monte Carlo algorithm.
    /// * `u2` - 2D samples used by Monte Carlo algorithm.
    pub fn rho_hd(&self, wo: &Vector3f, uc: &[Float], u2: &[Point2f]) -> Spectrum {
        debug_assert!(uc.len() == u2.len());
        if wo.z == 0.0 || uc.is_empty() {
            return Spectrum::ZERO;
        }

        let mut r = Spectrum::ZERO;
        for (c, u) in uc.iter().zip(u2.iter()) {
            // Estimate one term of `rho_hd`.
            if let Some(bs) = self.sample_f(wo, *c, u, TransportMode::Radiance, BxDFReflTransFlags::ALL) {
                if bs.is_valid() {
                    r += bs.f * abs_cos_theta(&bs.wi) / bs.pdf;
                }
            }
        }
        r / uc.len() as Float
    }
}

impl fmt::Display for BxDF {
    /// Formats the value using the given formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BxDF {{ {} flags: {:?} }}", self.name(), self.flags())
    }
}

macro_rules! impl_from_bxdf {
    ($t: ty, $variant: ident) => {
        impl From<$t> for BxDF {
            fn from(bxdf: $t) -> Self {
                BxDF::$variant(bxdf)
            }
        }
    };
}

impl_from_bxdf!(IdealDiffuseBxDF, IdealDiffuse);
impl_from_bxdf!(DiffuseBxDF, Diffuse);
impl_from_bxdf!(DielectricInterfaceBxDF, DielectricInterface);
impl_from_bxdf!(ThinDielectricBxDF, ThinDielectric);
impl_from_bxdf!(ConductorBxDF, Conductor);
impl_from_bxdf!(CoatedDiffuseBxDF, CoatedDiffuse);
impl_from_bxdf!(CoatedConductorBxDF, CoatedConductor);
impl_from_bxdf!(HairBxDF, Hair);
impl_from_bxdf!(MeasuredBxDF, Measured);
impl_from_bxdf!(BSSRDFAdapter, BSSRDFAdapter);
