//! Bidirectional scattering surface reflectance distribution function.

use crate::geometry::*;
use crate::interaction::*;
use crate::material::*;
use crate::pbrt::*;
use crate::reflection::*;
use crate::sampling::*;
use crate::scene::*;
use crate::spectrum::*;
use bumpalo::collections::Vec as ArenaVec;
use bumpalo::Bump;
use std::sync::Arc;

/// Probability of choosing each probe axis: the two tangents and the normal.
const AXIS_PROB: [Float; 3] = [0.25, 0.25, 0.5];

/// Fraction of the radial profile covered by probe rays.
const PROFILE_COVERAGE: Float = 0.999;

/// Result of sampling an exit point.
///
/// The lifetime specifiers:
/// * `'scene` - Shared reference to the scene containing the exit surface.
pub struct BSSRDFSample<'scene> {
    /// The spatial profile value at the exit point.
    pub s: Spectrum,

    /// Density of having chosen the exit point, per unit area.
    pub pdf: Float,

    /// The exit point.
    pub si: SurfaceInteraction<'scene>,

    /// BSDF for directional scattering out of the exit point.
    pub bsdf: BSDF,
}

/// Subsurface light transport between an entry and an exit point.
pub trait BSSRDF<'scene> {
    /// Samples an exit point for light that entered the surface at the
    /// point this BSSRDF was created for. Returns `None` when no exit point
    /// was found.
    ///
    /// * `scene` - The scene.
    /// * `u1`    - 1D sample used to choose a probe axis and channel.
    /// * `u2`    - 2D sample used to choose the probe position.
    /// * `arena` - Scratch memory for collecting probe hits.
    fn sample_s(&self, scene: &'scene Scene, u1: Float, u2: &Point2f, arena: &Bump) -> Option<BSSRDFSample<'scene>>;
}

/// A BSSRDF separable into a radial spatial profile and a directional
/// exit lobe. The radial profile is exponential per channel.
///
/// The lifetime specifiers:
/// * `'scene` - Shared reference to the scene containing the material.
#[derive(Clone)]
pub struct SeparableBSSRDF<'scene> {
    /// The entry point.
    po: Hit,

    /// Shading normal at the entry point.
    ns: Normal3f,

    /// First tangent at the entry point.
    ss: Vector3f,

    /// Second tangent at the entry point.
    ts: Vector3f,

    /// Index of refraction of the scattering medium.
    eta: Float,

    /// Multiple scattering albedo per channel.
    albedo: Spectrum,

    /// Mean free path per channel.
    mfp: Spectrum,

    /// The material the entry point belongs to. Exit points must have the
    /// same material.
    material: &'scene ArcMaterial,
}

impl<'scene> SeparableBSSRDF<'scene> {
    /// Create a new `SeparableBSSRDF`.
    ///
    /// * `po`       - The entry point.
    /// * `eta`      - Index of refraction of the scattering medium.
    /// * `albedo`   - Multiple scattering albedo.
    /// * `mfp`      - Mean free path per channel.
    /// * `material` - The material at the entry point.
    pub fn new(
        po: &SurfaceInteraction<'scene>,
        eta: Float,
        albedo: Spectrum,
        mfp: Spectrum,
        material: &'scene ArcMaterial,
    ) -> Self {
        let ns = po.shading.n;
        let n = Vector3f::from(ns);
        let tangent = po.shading.dpdu - n * n.dot(&po.shading.dpdu);
        let ss = if tangent.length_squared() > 0.0 {
            tangent.normalize()
        } else {
            coordinate_system(&n).0
        };

        Self {
            po: po.hit.clone(),
            ns,
            ss,
            ts: n.cross(&ss),
            eta,
            albedo,
            mfp: mfp.map(|d| max(d, 1e-6)),
            material,
        }
    }

    /// Returns the radial profile for one channel, per unit area.
    ///
    /// * `ch` - Channel.
    /// * `r`  - Radius.
    fn sr_channel(&self, ch: usize, r: Float) -> Float {
        self.albedo[ch] * self.pdf_sr(ch, r)
    }

    /// Returns the radial profile, per unit area.
    ///
    /// * `r` - Radius.
    pub fn sr(&self, r: Float) -> Spectrum {
        let mut s = Spectrum::ZERO;
        for ch in 0..SPECTRUM_SAMPLES {
            s[ch] = self.sr_channel(ch, r);
        }
        s
    }

    /// Samples a radius for a channel. Returns a negative value when the
    /// channel does not scatter.
    ///
    /// * `ch` - Channel.
    /// * `u`  - Uniform sample.
    fn sample_sr(&self, ch: usize, u: Float) -> Float {
        if self.albedo[ch] <= 0.0 {
            return -1.0;
        }
        sample_exponential(u, 1.0 / self.mfp[ch])
    }

    /// Returns the density of `sample_sr()` per unit area.
    ///
    /// * `ch` - Channel.
    /// * `r`  - Radius.
    fn pdf_sr(&self, ch: usize, r: Float) -> Float {
        let d = self.mfp[ch];
        let r = max(r, 1e-6 * d);
        (-r / d).exp() / (TWO_PI * d * r)
    }

    /// Returns the spatial profile at an exit point.
    ///
    /// * `pi` - The exit point.
    pub fn sp(&self, pi: &Point3f) -> Spectrum {
        self.sr(self.po.p.distance(pi))
    }

    /// Returns the density of choosing an exit point with the probe
    /// strategy of `sample_s()`, summed over all axes and channels.
    ///
    /// * `pi` - The exit point.
    /// * `ni` - Surface normal at the exit point.
    pub fn pdf_sp(&self, pi: &Point3f, ni: &Normal3f) -> Float {
        // Express `pi - po` and `ni` with respect to the local coordinates at `po`.
        let d = *pi - self.po.p;
        let n = Vector3f::from(self.ns);
        let d_local = Vector3f::new(self.ss.dot(&d), self.ts.dot(&d), n.dot(&d));
        let n_local = Vector3f::new(ni.dot(&self.ss), ni.dot(&self.ts), ni.dot(&n));

        // Compute BSSRDF profile radius under projection along each axis.
        let r_proj = [
            (sqr(d_local.y) + sqr(d_local.z)).sqrt(),
            (sqr(d_local.z) + sqr(d_local.x)).sqrt(),
            (sqr(d_local.x) + sqr(d_local.y)).sqrt(),
        ];

        // Return combined probability from all BSSRDF sampling strategies.
        let ch_prob = 1.0 / SPECTRUM_SAMPLES as Float;
        let mut pdf = 0.0;
        for axis in 0..3 {
            for ch in 0..SPECTRUM_SAMPLES {
                if self.albedo[ch] > 0.0 {
                    pdf += self.pdf_sr(ch, r_proj[axis]) * abs(n_local[axis]) * ch_prob * AXIS_PROB[axis];
                }
            }
        }
        pdf
    }

    /// Returns the probe frame `(vx, vy, vz)` for a sampled axis and remaps
    /// `u1` for reuse.
    ///
    /// * `u1` - Uniform sample.
    fn probe_axis(&self, u1: Float) -> ((Vector3f, Vector3f, Vector3f), Float) {
        let n = Vector3f::from(self.ns);
        if u1 < 0.5 {
            ((self.ss, self.ts, n), u1 * 2.0)
        } else if u1 < 0.75 {
            ((self.ts, n, self.ss), (u1 - 0.5) * 4.0)
        } else {
            ((n, self.ss, self.ts), (u1 - 0.75) * 4.0)
        }
    }
}

impl<'scene> BSSRDF<'scene> for SeparableBSSRDF<'scene> {
    fn sample_s(&self, scene: &'scene Scene, u1: Float, u2: &Point2f, arena: &Bump) -> Option<BSSRDFSample<'scene>> {
        // Choose projection axis for BSSRDF sampling.
        let ((vx, vy, vz), u1) = self.probe_axis(u1);

        // Choose spectral channel for BSSRDF sampling.
        let n = SPECTRUM_SAMPLES;
        let ch = clamp((u1 * n as Float) as usize, 0, n - 1);
        let u1 = u1 * n as Float - ch as Float;

        // Sample BSSRDF profile in polar coordinates.
        let r = self.sample_sr(ch, u2[0]);
        if r < 0.0 {
            return None;
        }
        let phi = TWO_PI * u2[1];

        // Compute BSSRDF profile bounds and intersection height.
        let r_max = self.sample_sr(ch, PROFILE_COVERAGE);
        if r >= r_max {
            return None;
        }
        let l = 2.0 * (sqr(r_max) - sqr(r)).sqrt();

        // Compute BSSRDF sampling ray segment.
        let p_start = self.po.p + r * (vx * phi.cos() + vy * phi.sin()) - l * vz * 0.5;
        let p_target = p_start + l * vz;

        // Accumulate chain of intersections along the probe segment.
        let mut hits = ArenaVec::new_in(arena);
        let mut base = Hit::new_minimal(p_start, self.po.time, None);
        loop {
            let mut ray = base.spawn_ray_to_point(&p_target);
            if ray.d == Vector3f::ZERO {
                break;
            }
            match scene.intersect(&mut ray) {
                Some(si) => {
                    base = si.hit.clone();
                    if si.get_material().is_some_and(|m| Arc::ptr_eq(m, self.material)) {
                        hits.push(si);
                    }
                }
                None => break,
            }
        }
        if hits.is_empty() {
            return None;
        }

        // Randomly choose one of several intersections during BSSRDF sampling.
        let found = hits.len();
        let selected = clamp((u1 * found as Float) as usize, 0, found - 1);
        let mut si = hits.swap_remove(selected);

        // Compute sample PDF and return the spatial BSSRDF term `Sp`.
        let pdf = self.pdf_sp(&si.hit.p, &si.hit.n) / found as Float;
        let s = self.sp(&si.hit.p);
        if pdf <= 0.0 || s.is_black() {
            return None;
        }

        si.hit.wo = Vector3f::from(si.shading.n);
        let bsdf = BSDF::new(&si, BxDF::from(BSSRDFAdapter::new(self.eta)), Some(self.eta));
        Some(BSSRDFSample { s, pdf, si, bsdf })
    }
}

// ---- Tests ----
