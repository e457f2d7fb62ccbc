//! BSDF

use super::*;
use crate::interaction::*;
use std::fmt;

/// A `BxDF` placed in the shading frame of a surface point.
#[derive(Clone)]
pub struct BSDF {
    /// The shading normal given by per-vertex normals and/or bump mapping.
    /// It is the z-axis of the local frame and defines the hemispheres used
    /// for integrating incident illumination.
    pub ns: Normal3f,

    /// The geometric normal defined by surface geometry.
    pub ng: Normal3f,

    /// First tangent axis of the local frame.
    pub ss: Vector3f,

    /// Second tangent axis of the local frame.
    pub ts: Vector3f,

    /// Relative index of refraction over the surface boundary. 1 for opaque
    /// surfaces.
    pub eta: Float,

    /// The scattering distribution.
    bxdf: BxDF,
}

impl BSDF {
    /// Creates a new `BSDF` in the shading frame of a surface interaction.
    ///
    /// * `si`   - The surface interaction.
    /// * `bxdf` - The scattering distribution.
    /// * `eta`  - Optional relative index of refraction over the surface
    ///            boundary. If not provided, defaults to 1.0; used for
    ///            opaque surfaces.
    pub fn new(si: &SurfaceInteraction, bxdf: BxDF, eta: Option<Float>) -> Self {
        Self::from_frame(si.shading.n, si.hit.n, &si.shading.dpdu, bxdf, eta.unwrap_or(1.0))
    }

    /// Creates a new `BSDF` from explicit frame vectors. The tangent is
    /// orthogonalized against the shading normal.
    ///
    /// * `ns`   - Shading normal.
    /// * `ng`   - Geometric normal.
    /// * `dpdu` - Shading tangent.
    /// * `bxdf` - The scattering distribution.
    /// * `eta`  - Relative index of refraction.
    pub fn from_frame(ns: Normal3f, ng: Normal3f, dpdu: &Vector3f, bxdf: BxDF, eta: Float) -> Self {
        let n = Vector3f::from(ns);
        let tangent = *dpdu - n * n.dot(dpdu);
        let ss = if tangent.length_squared() > 0.0 {
            tangent.normalize()
        } else {
            coordinate_system(&n).0
        };

        Self {
            ns,
            ng,
            ss,
            ts: n.cross(&ss),
            eta,
            bxdf,
        }
    }

    /// Returns the scattering distribution.
    pub fn bxdf(&self) -> &BxDF {
        &self.bxdf
    }

    /// Returns the capabilities of the distribution.
    pub fn flags(&self) -> BxDFFlags {
        self.bxdf.flags()
    }

    /// Increases roughness to trade bias for lower variance.
    pub fn regularize(&mut self) {
        self.bxdf.regularize();
    }

    /// Returns true when `pdf()` is only proportional to the sampling density.
    pub fn sampled_pdf_is_proportional(&self) -> bool {
        self.bxdf.sampled_pdf_is_proportional()
    }

    /// Transforms a vector from world space to local space.
    ///
    /// * `v` - The vector to transform.
    pub fn world_to_local(&self, v: &Vector3f) -> Vector3f {
        Vector3f::new(v.dot(&self.ss), v.dot(&self.ts), v.dot_normal(&self.ns))
    }

    /// Transforms a vector from local space to world space.
    ///
    /// * `v` - The vector to transform.
    pub fn local_to_world(&self, v: &Vector3f) -> Vector3f {
        Vector3f::new(
            self.ss.x * v.x + self.ts.x * v.y + self.ns.x * v.z,
            self.ss.y * v.x + self.ts.y * v.y + self.ns.y * v.z,
            self.ss.z * v.x + self.ts.z * v.y + self.ns.z * v.z,
        )
    }

    /// Returns the BSDF evaluated for a pair of world-space directions.
    ///
    /// * `wo_w` - Outgoing direction in world-space.
    /// * `wi_w` - Incident direction in world-space.
    /// * `mode` - Transport mode.
    pub fn f(&self, wo_w: &Vector3f, wi_w: &Vector3f, mode: TransportMode) -> Spectrum {
        let wo = self.world_to_local(wo_w);
        if wo.z == 0.0 {
            return Spectrum::ZERO;
        }
        let wi = self.world_to_local(wi_w);
        self.bxdf.f(&wo, &wi, mode)
    }

    /// Samples an incident direction. The returned direction is in world
    /// space.
    ///
    /// * `wo_w`         - Outgoing direction in world-space.
    /// * `u`            - 1D uniform sample used to choose a lobe.
    /// * `u2`           - 2D uniform sample used to choose a direction.
    /// * `mode`         - Transport mode.
    /// * `sample_flags` - Lobes that may be sampled.
    pub fn sample_f(
        &self,
        wo_w: &Vector3f,
        u: Float,
        u2: &Point2f,
        mode: TransportMode,
        sample_flags: BxDFReflTransFlags,
    ) -> Option<BSDFSample> {
        let wo = self.world_to_local(wo_w);
        if wo.z == 0.0 || !self.flags().intersects(BxDFFlags::from_bits_truncate(sample_flags.bits())) {
            return None;
        }

        let mut bs = self.bxdf.sample_f(&wo, u, u2, mode, sample_flags)?;
        if bs.f.is_black() || bs.pdf == 0.0 || bs.wi.z == 0.0 {
            return None;
        }
        debug_assert!(bs.pdf >= 0.0);

        bs.wi = self.local_to_world(&bs.wi);
        Some(bs)
    }

    /// Returns the density of `sample_f()` for a pair of world-space
    /// directions.
    ///
    /// * `wo_w`         - Outgoing direction in world-space.
    /// * `wi_w`         - Incident direction in world-space.
    /// * `mode`         - Transport mode.
    /// * `sample_flags` - Lobes that may be sampled.
    pub fn pdf(&self, wo_w: &Vector3f, wi_w: &Vector3f, mode: TransportMode, sample_flags: BxDFReflTransFlags) -> Float {
        let wo = self.world_to_local(wo_w);
        if wo.z == 0.0 {
            return 0.0;
        }
        let wi = self.world_to_local(wi_w);
        self.bxdf.pdf(&wo, &wi, mode, sample_flags)
    }

    /// Computes the hemispherical-directional reflectance function ρ.
    ///
    /// * `wo_w` - Outgoing direction in world-space.
    /// * `uc`   - 1D samples used by Monte Carlo algorithm.
    /// * `u2`   - 2D samples used by Monte Carlo algorithm.
    pub fn rho_hd(&self, wo_w: &Vector3f, uc: &[Float], u2: &[Point2f]) -> Spectrum {
        let wo = self.world_to_local(wo_w);
        self.bxdf.rho_hd(&wo, uc, u2)
    }
}

impl fmt::Display for BSDF {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[ BSDF eta: {} ns: {:?} ng: {:?} ss: {:?} ts: {:?} bxdf: {} ]",
            self.eta, self.ns, self.ng, self.ss, self.ts, self.bxdf
        )
    }
}

// ---- Tests ----

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    fn tilted_bsdf() -> BSDF {
        let n = Normal3f::new(0.0, 0.6, 0.8);
        BSDF::from_frame(
            n,
            n,
            &Vector3f::new(1.0, 0.3, 0.0),
            BxDF::from(IdealDiffuseBxDF::new(Spectrum::new(0.5))),
            1.0,
        )
    }

    #[test]
    fn frame_is_orthonormal() {
        let bsdf = tilted_bsdf();
        let n = Vector3f::from(bsdf.ns);
        assert!(approx_eq!(Float, bsdf.ss.dot(&n), 0.0, epsilon = 1e-6));
        assert!(approx_eq!(Float, bsdf.ts.dot(&n), 0.0, epsilon = 1e-6));
        assert!(approx_eq!(Float, bsdf.ss.dot(&bsdf.ts), 0.0, epsilon = 1e-6));
        assert!(approx_eq!(Float, bsdf.ss.length(), 1.0, epsilon = 1e-6));
        assert!(approx_eq!(Float, bsdf.ts.length(), 1.0, epsilon = 1e-6));
    }

    #[test]
    fn local_world_round_trip() {
        let bsdf = tilted_bsdf();
        let v = Vector3f::new(0.2, -0.4, 0.7);
        let back = bsdf.local_to_world(&bsdf.world_to_local(&v));
        assert!(approx_eq!(Float, back.x, v.x, epsilon = 1e-5));
        assert!(approx_eq!(Float, back.y, v.y, epsilon = 1e-5));
        assert!(approx_eq!(Float, back.z, v.z, epsilon = 1e-5));
    }

    #[test]
    fn grazing_outgoing_direction_is_black() {
        let n = Normal3f::new(0.0, 0.0, 1.0);
        let bsdf = BSDF::from_frame(
            n,
            n,
            &Vector3f::new(1.0, 0.0, 0.0),
            BxDF::from(IdealDiffuseBxDF::new(Spectrum::new(0.5))),
            1.0,
        );
        let wo = Vector3f::new(0.6, 0.8, 0.0);
        let wi = Vector3f::new(0.0, 0.0, 1.0);
        assert_eq!(bsdf.world_to_local(&wo).z, 0.0);
        assert!(bsdf.f(&wo, &wi, TransportMode::Radiance).is_black());
        assert_eq!(bsdf.pdf(&wo, &wi, TransportMode::Radiance, BxDFReflTransFlags::ALL), 0.0);
    }

    #[test]
    fn samples_are_returned_in_world_space() {
        let bsdf = tilted_bsdf();
        let n = Vector3f::from(bsdf.ns);
        let bs = bsdf
            .sample_f(&n, 0.5, &Point2f::new(0.25, 0.75), TransportMode::Radiance, BxDFReflTransFlags::ALL)
            .unwrap();
        assert!(bs.wi.dot(&n) > 0.0);
        assert!(approx_eq!(Float, bs.pdf, bs.wi.dot(&n) * INV_PI, epsilon = 1e-5));

        let none = bsdf.sample_f(
            &n,
            0.5,
            &Point2f::new(0.25, 0.75),
            TransportMode::Radiance,
            BxDFReflTransFlags::TRANSMISSION,
        );
        assert!(none.is_none());
    }
}
