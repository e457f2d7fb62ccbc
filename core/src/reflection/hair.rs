//! Hair BxDF

use super::*;
use crate::rng::ONE_MINUS_EPSILON;
use std::fmt;

/// Number of explicitly modelled scattering paths (R, TT, TRT). Higher
/// orders are folded into one extra term.
pub const P_MAX: usize = 3;

/// `sqrt(π/8)`.
const SQRT_PI_OVER_8: Float = 0.626657069;

/// Absorption coefficients of eumelanin.
const EUMELANIN_SIGMA_A: [Float; 3] = [0.419, 0.697, 1.37];

/// Absorption coefficients of pheomelanin.
const PHEOMELANIN_SIGMA_A: [Float; 3] = [0.187, 0.4, 1.05];

/// Scattering from a hair fiber modelled as a dielectric cylinder with tilted
/// cuticle scales. The local frame has the fiber axis along x, so
/// `sin(θ) = w.x`.
#[derive(Copy, Clone, Debug)]
pub struct HairBxDF {
    /// Offset along the curve width where the ray hit, in [-1, 1].
    h: Float,

    /// Azimuth of the incident ray relative to the fiber normal, `asin(h)`.
    gamma_o: Float,

    /// Index of refraction of the fiber interior.
    eta: Float,

    /// Absorption coefficient of the fiber interior.
    sigma_a: Spectrum,

    /// Longitudinal variance for each scattering order.
    v: [Float; P_MAX + 1],

    /// Azimuthal logistic scale.
    s: Float,

    /// `sin(2^k α)` for k in 0..3.
    sin_2k_alpha: [Float; 3],

    /// `cos(2^k α)` for k in 0..3.
    cos_2k_alpha: [Float; 3],
}

impl HairBxDF {
    /// Create a new `HairBxDF`.
    ///
    /// * `h`       - Offset across the fiber width in [-1, 1].
    /// * `eta`     - Index of refraction of the interior.
    /// * `sigma_a` - Absorption coefficient of the interior.
    /// * `beta_m`  - Longitudinal roughness in [0, 1].
    /// * `beta_n`  - Azimuthal roughness in [0, 1].
    /// * `alpha`   - Cuticle scale tilt in degrees.
    pub fn new(h: Float, eta: Float, sigma_a: Spectrum, beta_m: Float, beta_n: Float, alpha: Float) -> Self {
        debug_assert!((-1.0..=1.0).contains(&h));
        debug_assert!((0.0..=1.0).contains(&beta_m));
        debug_assert!((0.0..=1.0).contains(&beta_n));

        // Compute longitudinal variance from `beta_m`.
        let v0 = sqr(0.726 * beta_m + 0.812 * sqr(beta_m) + 3.7 * beta_m.powi(20));
        let v = [v0, 0.25 * v0, 4.0 * v0, 4.0 * v0];

        // Compute azimuthal logistic scale factor from `beta_n`.
        let s = SQRT_PI_OVER_8 * (0.265 * beta_n + 1.194 * sqr(beta_n) + 5.372 * beta_n.powi(22));

        // Compute `α` terms for hair scales.
        let mut sin_2k_alpha = [0.0; 3];
        let mut cos_2k_alpha = [0.0; 3];
        sin_2k_alpha[0] = radians(alpha).sin();
        cos_2k_alpha[0] = safe_sqrt(1.0 - sqr(sin_2k_alpha[0]));
        for i in 1..3 {
            sin_2k_alpha[i] = 2.0 * cos_2k_alpha[i - 1] * sin_2k_alpha[i - 1];
            cos_2k_alpha[i] = sqr(cos_2k_alpha[i - 1]) - sqr(sin_2k_alpha[i - 1]);
        }

        Self {
            h,
            gamma_o: safe_asin(h),
            eta,
            sigma_a,
            v,
            s,
            sin_2k_alpha,
            cos_2k_alpha,
        }
    }

    /// Returns the absorption coefficient for the given pigment concentrations.
    ///
    /// * `ce` - Eumelanin concentration.
    /// * `cp` - Pheomelanin concentration.
    pub fn sigma_a_from_concentration(ce: Float, cp: Float) -> Spectrum {
        Spectrum::from_rgb(
            ce * EUMELANIN_SIGMA_A[0] + cp * PHEOMELANIN_SIGMA_A[0],
            ce * EUMELANIN_SIGMA_A[1] + cp * PHEOMELANIN_SIGMA_A[1],
            ce * EUMELANIN_SIGMA_A[2] + cp * PHEOMELANIN_SIGMA_A[2],
        )
    }

    /// Returns the absorption coefficient that yields roughly the given
    /// multiple-scattering color.
    ///
    /// * `c`      - Desired color.
    /// * `beta_n` - Azimuthal roughness.
    pub fn sigma_a_from_reflectance(c: &Spectrum, beta_n: Float) -> Spectrum {
        let denom = 5.969 - 0.215 * beta_n + 2.532 * sqr(beta_n) - 10.73 * beta_n.powi(3)
            + 5.574 * beta_n.powi(4)
            + 0.245 * beta_n.powi(5);
        c.map(|v| sqr(v.ln() / denom))
    }

    /// Returns `sin(θo)` and `cos(θo)` rotated by the scale tilt for order `p`.
    ///
    /// * `p`           - Scattering order.
    /// * `sin_theta_o` - Sine of the outgoing longitudinal angle.
    /// * `cos_theta_o` - Cosine of the outgoing longitudinal angle.
    fn tilt(&self, p: usize, sin_theta_o: Float, cos_theta_o: Float) -> (Float, Float) {
        let (s, c) = match p {
            0 => (
                sin_theta_o * self.cos_2k_alpha[1] - cos_theta_o * self.sin_2k_alpha[1],
                cos_theta_o * self.cos_2k_alpha[1] + sin_theta_o * self.sin_2k_alpha[1],
            ),
            1 => (
                sin_theta_o * self.cos_2k_alpha[0] + cos_theta_o * self.sin_2k_alpha[0],
                cos_theta_o * self.cos_2k_alpha[0] - sin_theta_o * self.sin_2k_alpha[0],
            ),
            2 => (
                sin_theta_o * self.cos_2k_alpha[2] + cos_theta_o * self.sin_2k_alpha[2],
                cos_theta_o * self.cos_2k_alpha[2] - sin_theta_o * self.sin_2k_alpha[2],
            ),
            _ => (sin_theta_o, cos_theta_o),
        };
        (s, abs(c))
    }

    /// Returns `γt`, the azimuth of the refracted ray, and the transmittance
    /// of one pass through the interior.
    ///
    /// * `sin_theta_o` - Sine of the outgoing longitudinal angle.
    /// * `cos_theta_o` - Cosine of the outgoing longitudinal angle.
    fn refracted(&self, sin_theta_o: Float, cos_theta_o: Float) -> (Float, Spectrum) {
        let sin_theta_t = sin_theta_o / self.eta;
        let cos_theta_t = safe_sqrt(1.0 - sqr(sin_theta_t));

        let etap = safe_sqrt(sqr(self.eta) - sqr(sin_theta_o)) / cos_theta_o;
        let sin_gamma_t = self.h / etap;
        let cos_gamma_t = safe_sqrt(1.0 - sqr(sin_gamma_t));
        let gamma_t = safe_asin(sin_gamma_t);

        let t = (-self.sigma_a * (2.0 * cos_gamma_t / cos_theta_t)).exp();
        (gamma_t, t)
    }

    /// Returns the discrete probabilities of sampling each scattering order.
    ///
    /// * `cos_theta_o` - Cosine of the outgoing longitudinal angle.
    fn ap_pdf(&self, cos_theta_o: Float) -> [Float; P_MAX + 1] {
        let sin_theta_o = safe_sqrt(1.0 - sqr(cos_theta_o));
        let (_, t) = self.refracted(sin_theta_o, cos_theta_o);
        let ap = ap(cos_theta_o, self.eta, self.h, &t);

        let sum_y: Float = ap.iter().map(|a| a.average()).sum();
        let mut pdf = [0.0; P_MAX + 1];
        if sum_y > 0.0 {
            for (p, a) in ap.iter().enumerate() {
                pdf[p] = a.average() / sum_y;
            }
        }
        pdf
    }

    /// Evaluates the sampling density for a direction pair expressed in fiber
    /// angles.
    ///
    /// * `wo` - Outgoing direction.
    /// * `wi` - Incident direction.
    fn density(&self, wo: &Vector3f, wi: &Vector3f) -> Float {
        let sin_theta_o = wo.x;
        let cos_theta_o = safe_sqrt(1.0 - sqr(sin_theta_o));
        let phi_o = wo.z.atan2(wo.y);

        let sin_theta_i = wi.x;
        let cos_theta_i = safe_sqrt(1.0 - sqr(sin_theta_i));
        let phi_i = wi.z.atan2(wi.y);

        let (gamma_t, _) = self.refracted(sin_theta_o, cos_theta_o);
        let ap_pdf = self.ap_pdf(cos_theta_o);
        let phi = phi_i - phi_o;

        let mut pdf = 0.0;
        for p in 0..P_MAX {
            let (sin_thetap_o, cos_thetap_o) = self.tilt(p, sin_theta_o, cos_theta_o);
            pdf += mp(cos_theta_i, cos_thetap_o, sin_theta_i, sin_thetap_o, self.v[p])
                * ap_pdf[p]
                * np(phi, p, self.s, self.gamma_o, gamma_t);
        }
        pdf += mp(cos_theta_i, cos_theta_o, sin_theta_i, sin_theta_o, self.v[P_MAX]) * ap_pdf[P_MAX] * INV_TWO_PI;
        pdf
    }
}

/// Modified Bessel function of the first kind, order zero.
///
/// * `x` - The argument.
fn i0(x: Float) -> Float {
    let mut val = 0.0;
    let mut x2i = 1.0;
    let mut ifact: Float = 1.0;
    let mut i4 = 1.0;
    for i in 0..10 {
        if i > 1 {
            ifact *= i as Float;
        }
        val += x2i / (i4 * sqr(ifact));
        x2i *= x * x;
        i4 *= 4.0;
    }
    val
}

/// Natural logarithm of `i0()` that stays finite for large arguments.
///
/// * `x` - The argument.
fn log_i0(x: Float) -> Float {
    if x > 12.0 {
        x + 0.5 * (-(TWO_PI.ln()) + (1.0 / x).ln() + 1.0 / (8.0 * x))
    } else {
        i0(x).ln()
    }
}

/// Longitudinal scattering function.
///
/// * `cos_theta_i` - Cosine of incident longitudinal angle.
/// * `cos_theta_o` - Cosine of outgoing longitudinal angle.
/// * `sin_theta_i` - Sine of incident longitudinal angle.
/// * `sin_theta_o` - Sine of outgoing longitudinal angle.
/// * `v`           - Variance.
fn mp(cos_theta_i: Float, cos_theta_o: Float, sin_theta_i: Float, sin_theta_o: Float, v: Float) -> Float {
    let a = cos_theta_i * cos_theta_o / v;
    let b = sin_theta_i * sin_theta_o / v;
    let mp = if v <= 0.1 {
        (log_i0(a) - b - 1.0 / v + 0.6931 + (1.0 / (2.0 * v)).ln()).exp()
    } else {
        ((-b).exp() * i0(a)) / ((1.0 / v).sinh() * 2.0 * v)
    };
    debug_assert!(mp.is_finite());
    mp
}

/// Attenuation for each scattering order.
///
/// * `cos_theta_o` - Cosine of outgoing longitudinal angle.
/// * `eta`         - Index of refraction.
/// * `h`           - Offset across the fiber width.
/// * `t`           - Transmittance of one pass through the interior.
fn ap(cos_theta_o: Float, eta: Float, h: Float, t: &Spectrum) -> [Spectrum; P_MAX + 1] {
    let mut ap = [Spectrum::ZERO; P_MAX + 1];

    // Reflection at the initial cylinder intersection.
    let cos_gamma_o = safe_sqrt(1.0 - h * h);
    let cos_theta = cos_theta_o * cos_gamma_o;
    let f = fr_dielectric(cos_theta, eta);
    ap[0] = Spectrum::new(f);

    // Transmission straight through.
    ap[1] = *t * sqr(1.0 - f);

    // Higher orders up to `P_MAX`.
    for p in 2..P_MAX {
        ap[p] = ap[p - 1] * *t * f;
    }

    // Remaining orders as a geometric series.
    let tf = *t * f;
    ap[P_MAX] = (ap[P_MAX - 1] * tf).safe_div(&(Spectrum::ONE - tf));
    ap
}

/// Azimuthal offset of the exit point for order `p`.
///
/// * `p`       - Scattering order.
/// * `gamma_o` - Azimuth of the incident ray.
/// * `gamma_t` - Azimuth of the refracted ray.
#[inline]
fn phi(p: usize, gamma_o: Float, gamma_t: Float) -> Float {
    let p = p as Float;
    2.0 * p * gamma_t - 2.0 * gamma_o + p * PI
}

/// Azimuthal scattering function.
///
/// * `phi_d`   - Azimuth difference.
/// * `p`       - Scattering order.
/// * `s`       - Logistic scale.
/// * `gamma_o` - Azimuth of the incident ray.
/// * `gamma_t` - Azimuth of the refracted ray.
fn np(phi_d: Float, p: usize, s: Float, gamma_o: Float, gamma_t: Float) -> Float {
    let mut dphi = phi_d - phi(p, gamma_o, gamma_t);

    // Remap `dphi` to [-π, π].
    while dphi > PI {
        dphi -= TWO_PI;
    }
    while dphi < -PI {
        dphi += TWO_PI;
    }
    trimmed_logistic(dphi, s, -PI, PI)
}

impl BxDFModel for HairBxDF {
    fn flags(&self) -> BxDFFlags {
        BxDFFlags::GLOSSY_REFLECTION
    }

    fn f(&self, wo: &Vector3f, wi: &Vector3f, _mode: TransportMode) -> Spectrum {
        // Compute hair coordinate system terms related to `wo`.
        let sin_theta_o = wo.x;
        let cos_theta_o = safe_sqrt(1.0 - sqr(sin_theta_o));
        let phi_o = wo.z.atan2(wo.y);

        // Compute hair coordinate system terms related to `wi`.
        let sin_theta_i = wi.x;
        let cos_theta_i = safe_sqrt(1.0 - sqr(sin_theta_i));
        let phi_i = wi.z.atan2(wi.y);

        let (gamma_t, t) = self.refracted(sin_theta_o, cos_theta_o);

        // Evaluate hair BSDF.
        let phi_d = phi_i - phi_o;
        let ap = ap(cos_theta_o, self.eta, self.h, &t);
        let mut fsum = Spectrum::ZERO;
        for p in 0..P_MAX {
            let (sin_thetap_o, cos_thetap_o) = self.tilt(p, sin_theta_o, cos_theta_o);
            fsum += ap[p]
                * (mp(cos_theta_i, cos_thetap_o, sin_theta_i, sin_thetap_o, self.v[p])
                    * np(phi_d, p, self.s, self.gamma_o, gamma_t));
        }

        // Compute contribution of remaining terms after `P_MAX`.
        fsum += ap[P_MAX] * (mp(cos_theta_i, cos_theta_o, sin_theta_i, sin_theta_o, self.v[P_MAX]) * INV_TWO_PI);
        if abs_cos_theta(wi) > 0.0 {
            fsum /= abs_cos_theta(wi);
        }
        debug_assert!(!fsum.has_nans());
        fsum
    }

    fn sample_f(
        &self,
        wo: &Vector3f,
        uc: Float,
        u: &Point2f,
        mode: TransportMode,
        sample_flags: BxDFReflTransFlags,
    ) -> Option<BSDFSample> {
        if !sample_flags.contains(BxDFReflTransFlags::REFLECTION) {
            return None;
        }

        // Compute hair coordinate system terms related to `wo`.
        let sin_theta_o = wo.x;
        let cos_theta_o = safe_sqrt(1.0 - sqr(sin_theta_o));
        let phi_o = wo.z.atan2(wo.y);

        // Determine which term `p` to sample for hair scattering.
        let ap_pdf = self.ap_pdf(cos_theta_o);
        let (p, _, uc) = sample_discrete(&ap_pdf, uc)?;
        let uc = min(uc, ONE_MINUS_EPSILON);

        // Rotate `sin(θo)` and `cos(θo)` to account for hair scale tilt.
        let (sin_thetap_o, cos_thetap_o) = self.tilt(p, sin_theta_o, cos_theta_o);

        // Sample `Mp` to compute `θi`.
        let v = self.v[p];
        let cos_theta = 1.0 + v * (max(u[0], 1e-5) + (1.0 - u[0]) * (-2.0 / v).exp()).ln();
        let sin_theta = safe_sqrt(1.0 - sqr(cos_theta));
        let cos_phi = (TWO_PI * u[1]).cos();
        let sin_theta_i = -cos_theta * sin_thetap_o + sin_theta * cos_phi * cos_thetap_o;
        let cos_theta_i = safe_sqrt(1.0 - sqr(sin_theta_i));

        // Sample `Np` to compute `Δϕ`.
        let (gamma_t, _) = self.refracted(sin_theta_o, cos_theta_o);
        let dphi = if p < P_MAX {
            phi(p, self.gamma_o, gamma_t) + sample_trimmed_logistic(uc, self.s, -PI, PI)
        } else {
            TWO_PI * uc
        };

        // Compute `wi` from sampled hair scattering angles.
        let phi_i = phi_o + dphi;
        let wi = Vector3f::new(sin_theta_i, cos_theta_i * phi_i.cos(), cos_theta_i * phi_i.sin());

        let pdf = self.density(wo, &wi);
        Some(BSDFSample::new(self.f(wo, &wi, mode), wi, pdf, self.flags())).filter(BSDFSample::is_valid)
    }

    fn pdf(&self, wo: &Vector3f, wi: &Vector3f, _mode: TransportMode, sample_flags: BxDFReflTransFlags) -> Float {
        if !sample_flags.contains(BxDFReflTransFlags::REFLECTION) {
            return 0.0;
        }
        self.density(wo, wi)
    }
}

impl fmt::Display for HairBxDF {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[ HairBxDF h: {} gamma_o: {} eta: {} sigma_a: {} s: {} ]",
            self.h, self.gamma_o, self.eta, self.sigma_a, self.s
        )
    }
}

// ---- Tests ----

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::RNG;
    use float_cmp::*;
    use proptest::prelude::*;

    prop_range!(roughness, Float, 0.2f32..0.8f32);
    prop_range!(offset, Float, -0.95f32..0.95f32);
    prop_point2!(unit_square, Float, 0.0f32..1.0f32, 0.0f32..1.0f32);

    #[test]
    fn bessel_matches_known_values() {
        assert!(approx_eq!(Float, i0(0.0), 1.0, ulps = 2));
        assert!(approx_eq!(Float, i0(1.0), 1.2660658, epsilon = 1e-5));
        assert!(approx_eq!(Float, log_i0(2.0), i0(2.0).ln(), epsilon = 1e-6));
        assert!(approx_eq!(Float, log_i0(13.0), 13.0 + 0.5 * (-(TWO_PI.ln()) + (1.0 / 13.0 as Float).ln() + 1.0 / 104.0), ulps = 4));
    }

    #[test]
    fn attenuation_sums_to_one_without_absorption() {
        let ap = ap(0.7, 1.55, 0.3, &Spectrum::ONE);
        let sum: Float = ap.iter().map(|a| a[0]).sum();
        assert!(approx_eq!(Float, sum, 1.0, epsilon = 1e-5));
    }

    #[test]
    fn pigment_absorption() {
        let sigma_a = HairBxDF::sigma_a_from_concentration(1.3, 0.0);
        assert!(approx_eq!(Float, sigma_a[0], 1.3 * 0.419, ulps = 2));
        assert!(sigma_a[2] > sigma_a[0]);

        let c = Spectrum::from_rgb(0.8, 0.5, 0.2);
        let sigma_a = HairBxDF::sigma_a_from_reflectance(&c, 0.3);
        assert!(sigma_a[0] < sigma_a[1] && sigma_a[1] < sigma_a[2]);
    }

    #[test]
    fn white_furnace() {
        // Without absorption the fiber scatters all incident energy.
        let mut rng = RNG::new(0, 0);
        let wo = uniform_sample_sphere(&Point2f::new(rng.uniform_float(), rng.uniform_float()));
        let bxdf = HairBxDF::new(0.2, 1.55, Spectrum::ZERO, 0.5, 0.5, 0.0);
        let count = 100_000;
        let mut sum = 0.0;
        for _ in 0..count {
            let wi = uniform_sample_sphere(&Point2f::new(rng.uniform_float(), rng.uniform_float()));
            sum += bxdf.f(&wo, &wi, TransportMode::Radiance)[0] * abs_cos_theta(&wi) / uniform_sphere_pdf();
        }
        let avg = sum / count as Float;
        assert!(avg > 0.93 && avg < 1.07, "avg {}", avg);
    }

    proptest! {
        #[test]
        fn sampling_weights_are_unity(
            beta_m in roughness(),
            beta_n in roughness(),
            h in offset(),
            u_wo in unit_square(),
            u in unit_square(),
            uc in 0.0f32..1.0,
        ) {
            let bxdf = HairBxDF::new(h, 1.55, Spectrum::ZERO, beta_m, beta_n, 2.0);
            let wo = uniform_sample_sphere(&u_wo);
            if let Some(bs) = bxdf.sample_f(&wo, uc, &u, TransportMode::Radiance, BxDFReflTransFlags::ALL) {
                let weight = bs.f[0] * abs_cos_theta(&bs.wi) / bs.pdf;
                prop_assert!(approx_eq!(Float, weight, 1.0, epsilon = 0.02), "weight {}", weight);
                let pdf = bxdf.pdf(&wo, &bs.wi, TransportMode::Radiance, BxDFReflTransFlags::ALL);
                prop_assert!(approx_eq!(Float, pdf, bs.pdf, epsilon = 1e-3 * max(1.0, pdf)));
            }
        }
    }
}
