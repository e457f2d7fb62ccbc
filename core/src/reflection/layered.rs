//! Layered BxDF

use super::*;
use crate::hash::*;
use crate::medium::HGPhaseFunction;
use crate::rng::*;
use crate::{stat_counter, stat_inc, stat_register_fns};
use std::fmt;

stat_counter!("Layered BSDF/Random walks", RANDOM_WALKS, layered_stats_random_walks);
stat_counter!(
    "Layered BSDF/Russian roulette terminations",
    RR_TERMINATIONS,
    layered_stats_rr_terminations
);

stat_register_fns!(layered_stats_random_walks, layered_stats_rr_terminations);

/// Coated diffuse: a dielectric interface over a Lambertian base.
pub type CoatedDiffuseBxDF = LayeredBxDF<DielectricInterfaceBxDF, IdealDiffuseBxDF>;

/// Coated conductor: a dielectric interface over a metal base.
pub type CoatedConductorBxDF = LayeredBxDF<DielectricInterfaceBxDF, ConductorBxDF>;

/// Controls the stochastic evaluation of a `LayeredBxDF`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LayeredBxDFConfig {
    /// Maximum number of scattering events inside the slab.
    pub max_depth: usize,

    /// Number of random walks averaged per query.
    pub n_samples: usize,

    /// Treat both sides of the surface as the top.
    pub two_sided: bool,

    /// Weight of the uniform sphere density mixed into `pdf()`.
    pub pdf_isotropic_weight: Float,

    /// Internal bounce after which Russian roulette may terminate a walk.
    pub rr_depth: usize,

    /// Throughput below which Russian roulette is applied.
    pub rr_threshold: Float,
}

impl Default for LayeredBxDFConfig {
    fn default() -> Self {
        Self {
            max_depth: 10,
            n_samples: 1,
            two_sided: true,
            pdf_isotropic_weight: 0.1,
            rr_depth: 3,
            rr_threshold: 0.25,
        }
    }
}

impl LayeredBxDFConfig {
    /// Replaces unusable values with their defaults, reporting each one.
    ///
    /// * `options` - Render options used for diagnostics.
    pub fn validated(self, options: &Options) -> Self {
        let default = Self::default();
        let mut config = self;
        if config.max_depth == 0 {
            options.error("Layered BSDF maxdepth must be positive. Using default.");
            config.max_depth = default.max_depth;
        }
        if config.n_samples == 0 {
            options.error("Layered BSDF nsamples must be positive. Using default.");
            config.n_samples = default.n_samples;
        }
        if !(0.0..=1.0).contains(&config.pdf_isotropic_weight) {
            options.error("Layered BSDF pdfisotropicweight must be in [0, 1]. Using default.");
            config.pdf_isotropic_weight = default.pdf_isotropic_weight;
        }
        config
    }
}

/// One of the two interfaces of a layered slab.
enum Interface<'a, T, B> {
    Top(&'a T),
    Bottom(&'a B),
}

impl<'a, T: BxDFModel, B: BxDFModel> Interface<'a, T, B> {
    fn flags(&self) -> BxDFFlags {
        match self {
            Self::Top(t) => t.flags(),
            Self::Bottom(b) => b.flags(),
        }
    }

    fn f(&self, wo: &Vector3f, wi: &Vector3f, mode: TransportMode) -> Spectrum {
        match self {
            Self::Top(t) => t.f(wo, wi, mode),
            Self::Bottom(b) => b.f(wo, wi, mode),
        }
    }

    fn sample_f(
        &self,
        wo: &Vector3f,
        uc: Float,
        u: &Point2f,
        mode: TransportMode,
        sample_flags: BxDFReflTransFlags,
    ) -> Option<BSDFSample> {
        match self {
            Self::Top(t) => t.sample_f(wo, uc, u, mode, sample_flags),
            Self::Bottom(b) => b.sample_f(wo, uc, u, mode, sample_flags),
        }
    }

    fn pdf(&self, wo: &Vector3f, wi: &Vector3f, mode: TransportMode, sample_flags: BxDFReflTransFlags) -> Float {
        match self {
            Self::Top(t) => t.pdf(wo, wi, mode, sample_flags),
            Self::Bottom(b) => b.pdf(wo, wi, mode, sample_flags),
        }
    }
}

/// A stack of two scattering interfaces separated by a slab of homogeneous
/// medium. Transport between the interfaces is estimated with a random walk,
/// so `f()` and `pdf()` are stochastic but repeatable for the same query.
#[derive(Copy, Clone, Debug)]
pub struct LayeredBxDF<T, B> {
    /// Upper interface.
    top: T,

    /// Lower interface.
    bottom: B,

    /// Slab thickness in units of mean free path.
    thickness: Float,

    /// Henyey-Greenstein asymmetry of the slab medium.
    g: Float,

    /// Single-scattering albedo of the slab medium. Zero means no scattering.
    albedo: Spectrum,

    /// Evaluation settings.
    config: LayeredBxDFConfig,

    /// Seed mixed into the per-query random streams.
    seed: u64,
}

impl<T: BxDFModel, B: BxDFModel> LayeredBxDF<T, B> {
    /// Create a new `LayeredBxDF`.
    ///
    /// * `top`       - Upper interface.
    /// * `bottom`    - Lower interface.
    /// * `thickness` - Slab thickness.
    /// * `albedo`    - Medium single-scattering albedo.
    /// * `g`         - Medium asymmetry parameter.
    /// * `config`    - Evaluation settings.
    /// * `seed`      - Seed for the per-query random streams.
    pub fn new(
        top: T,
        bottom: B,
        thickness: Float,
        albedo: Spectrum,
        g: Float,
        config: LayeredBxDFConfig,
        seed: u64,
    ) -> Self {
        register_stats();
        Self {
            top,
            bottom,
            thickness: max(thickness, Float::MIN_POSITIVE),
            g,
            albedo,
            config,
            seed,
        }
    }

    /// Returns the evaluation settings.
    pub fn config(&self) -> &LayeredBxDFConfig {
        &self.config
    }

    /// Transmittance through a slab of depth `dz` along `w`.
    ///
    /// * `dz` - Depth travelled.
    /// * `w`  - Direction of travel.
    fn tr(dz: Float, w: &Vector3f) -> Float {
        if abs(dz) <= Float::MIN_POSITIVE {
            1.0
        } else {
            (-abs(dz) / abs_cos_theta(w)).exp()
        }
    }

    /// Returns true when the slab medium scatters.
    fn has_medium(&self) -> bool {
        !self.albedo.is_black()
    }

    /// Applies Russian roulette to a walk throughput. Returns `None` when
    /// the walk is terminated, otherwise the survival probability.
    ///
    /// * `depth` - Current bounce.
    /// * `value` - Throughput magnitude.
    /// * `u`     - Uniform sample.
    fn russian_roulette(&self, depth: usize, value: Float, u: Float) -> Option<Float> {
        if depth > self.config.rr_depth && value < self.config.rr_threshold {
            let q = max(0.0, 1.0 - value);
            if u < q {
                stat_inc!(RR_TERMINATIONS, 1);
                return None;
            }
            Some(1.0 - q)
        } else {
            Some(1.0)
        }
    }

    /// Returns the interface at depth `z`.
    ///
    /// * `z` - Either 0 or the slab thickness.
    fn interface_at(&self, z: Float) -> Interface<'_, T, B> {
        if z == 0.0 {
            Interface::Bottom(&self.bottom)
        } else {
            Interface::Top(&self.top)
        }
    }
}

/// Draws uniform samples clamped below one.
fn next_float(rng: &mut RNG) -> Float {
    min(rng.uniform_float(), ONE_MINUS_EPSILON)
}

/// Draws a 2D uniform sample clamped below one.
fn next_point(rng: &mut RNG) -> Point2f {
    let x = next_float(rng);
    let y = next_float(rng);
    Point2f::new(x, y)
}

impl<T: BxDFModel, B: BxDFModel> BxDFModel for LayeredBxDF<T, B> {
    fn flags(&self) -> BxDFFlags {
        let top_flags = self.top.flags();
        let bottom_flags = self.bottom.flags();
        debug_assert!(top_flags.is_transmissive() || bottom_flags.is_transmissive());

        let mut flags = BxDFFlags::REFLECTION;
        if top_flags.is_specular() {
            flags |= BxDFFlags::SPECULAR;
        }

        if top_flags.is_diffuse() || bottom_flags.is_diffuse() || self.has_medium() {
            flags |= BxDFFlags::DIFFUSE;
        } else if top_flags.is_glossy() || bottom_flags.is_glossy() {
            flags |= BxDFFlags::GLOSSY;
        }

        if top_flags.is_transmissive() && bottom_flags.is_transmissive() {
            flags |= BxDFFlags::TRANSMISSION;
        }
        flags
    }

    fn f(&self, wo: &Vector3f, wi: &Vector3f, mode: TransportMode) -> Spectrum {
        let (mut wo, mut wi) = (*wo, *wi);
        if self.config.two_sided && wo.z < 0.0 {
            wo = -wo;
            wi = -wi;
        }

        // Determine entrance and exit interfaces.
        let entered_top = wo.z > 0.0;
        let enter_interface = if entered_top {
            Interface::Top(&self.top)
        } else {
            Interface::Bottom(&self.bottom)
        };
        let same = same_hemisphere(&wo, &wi);
        let (exit_interface, non_exit_interface) = if same ^ entered_top {
            (Interface::Bottom(&self.bottom), Interface::Top(&self.top))
        } else {
            (Interface::Top(&self.top), Interface::Bottom(&self.bottom))
        };
        let exit_z = if same ^ entered_top { 0.0 } else { self.thickness };
        let exit_specular = exit_interface.flags().is_specular();
        let non_exit_specular = non_exit_interface.flags().is_specular();

        // Account for reflection at the entrance interface.
        let n_samples = self.config.n_samples as Float;
        let mut f = if same {
            enter_interface.f(&wo, &wi, mode) * n_samples
        } else {
            Spectrum::ZERO
        };

        let mut rng = RNG::new(
            HashBuffer::new().u64(self.seed).vector(&wo).finish(),
            HashBuffer::new().vector(&wi).finish(),
        );
        let phase = HGPhaseFunction::new(self.g);

        for _ in 0..self.config.n_samples {
            stat_inc!(RANDOM_WALKS, 1);

            // Sample transmission direction through entrance interface.
            let uc = next_float(&mut rng);
            let u = next_point(&mut rng);
            let wos = match enter_interface.sample_f(&wo, uc, &u, mode, BxDFReflTransFlags::TRANSMISSION) {
                Some(bs) if bs.wi.z != 0.0 => bs,
                _ => continue,
            };

            // Sample exit direction from `wi` for next event estimation.
            let uc = next_float(&mut rng);
            let u = next_point(&mut rng);
            let wis = match exit_interface.sample_f(&wi, uc, &u, !mode, BxDFReflTransFlags::TRANSMISSION) {
                Some(bs) if bs.wi.z != 0.0 => bs,
                _ => continue,
            };

            let mut beta = wos.f * abs_cos_theta(&wos.wi) / wos.pdf;
            let beta_exit = wis.f / wis.pdf;
            let mut w = wos.wi;
            let mut z = if entered_top { self.thickness } else { 0.0 };

            for depth in 0..self.config.max_depth {
                match self.russian_roulette(depth, beta.max_component_value(), next_float(&mut rng)) {
                    Some(survival) => beta /= survival,
                    None => break,
                }

                if self.has_medium() {
                    // Sample medium scattering inside the slab.
                    let sigma_t = 1.0;
                    let dz = sample_exponential(next_float(&mut rng), sigma_t / abs_cos_theta(&w));
                    let zp = if w.z > 0.0 { z + dz } else { z - dz };
                    if zp == z {
                        continue;
                    }
                    if 0.0 < zp && zp < self.thickness {
                        // Connect the scattering event to the pre-sampled exit direction.
                        let wt = if exit_specular {
                            1.0
                        } else {
                            power_heuristic(1, wis.pdf, 1, phase.pdf(&-w, &-wis.wi))
                        };
                        let te = Self::tr(zp - exit_z, &wis.wi);
                        f += beta * self.albedo * phase.p(&-w, &-wis.wi) * wt * te * beta_exit;

                        // Sample phase function for a new direction.
                        let ps = match phase.sample_p(&-w, &next_point(&mut rng)) {
                            Some(ps) if ps.pdf > 0.0 && ps.wi.z != 0.0 => ps,
                            _ => continue,
                        };
                        beta *= self.albedo * ps.p / ps.pdf;
                        w = ps.wi;
                        z = zp;

                        // Account for scattering through the exit interface from `w`.
                        let toward_exit = (z < exit_z && w.z > 0.0) || (z > exit_z && w.z < 0.0);
                        if !exit_specular && toward_exit {
                            let f_exit = exit_interface.f(&-w, &wi, mode);
                            if !f_exit.is_black() {
                                let exit_pdf = exit_interface.pdf(&-w, &wi, mode, BxDFReflTransFlags::TRANSMISSION);
                                let wt = power_heuristic(1, ps.pdf, 1, exit_pdf);
                                f += beta * Self::tr(zp - exit_z, &ps.wi) * f_exit * wt;
                            }
                        }
                        continue;
                    }
                    z = clamp(zp, 0.0, self.thickness);
                } else {
                    // Advance to the other interface.
                    z = if z == self.thickness { 0.0 } else { self.thickness };
                    beta *= Self::tr(self.thickness, &w);
                }

                if z == exit_z {
                    // Reflect off the inside of the exit interface.
                    let uc = next_float(&mut rng);
                    let u = next_point(&mut rng);
                    match exit_interface.sample_f(&-w, uc, &u, mode, BxDFReflTransFlags::REFLECTION) {
                        Some(bs) if bs.pdf > 0.0 && bs.wi.z != 0.0 => {
                            beta *= bs.f * abs_cos_theta(&bs.wi) / bs.pdf;
                            w = bs.wi;
                        }
                        _ => break,
                    }
                } else {
                    if !non_exit_specular {
                        // Next event estimate through the pre-sampled exit direction.
                        let wt = if exit_specular {
                            1.0
                        } else {
                            power_heuristic(
                                1,
                                wis.pdf,
                                1,
                                non_exit_interface.pdf(&-w, &-wis.wi, mode, BxDFReflTransFlags::ALL),
                            )
                        };
                        f += beta
                            * non_exit_interface.f(&-w, &-wis.wi, mode)
                            * abs_cos_theta(&wis.wi)
                            * wt
                            * Self::tr(self.thickness, &wis.wi)
                            * beta_exit;
                    }

                    // Sample a new direction at the non-exit interface.
                    let uc = next_float(&mut rng);
                    let u = next_point(&mut rng);
                    let bs = match non_exit_interface.sample_f(&-w, uc, &u, mode, BxDFReflTransFlags::REFLECTION) {
                        Some(bs) if bs.wi.z != 0.0 => bs,
                        _ => break,
                    };
                    beta *= bs.f * abs_cos_theta(&bs.wi) / bs.pdf;
                    w = bs.wi;

                    if !exit_specular {
                        // Next event estimate along the sampled direction.
                        let f_exit = exit_interface.f(&-w, &wi, mode);
                        if !f_exit.is_black() {
                            let wt = if non_exit_specular {
                                1.0
                            } else {
                                let exit_pdf = exit_interface.pdf(&-w, &wi, mode, BxDFReflTransFlags::TRANSMISSION);
                                power_heuristic(1, bs.pdf, 1, exit_pdf)
                            };
                            f += beta * Self::tr(self.thickness, &bs.wi) * f_exit * wt;
                        }
                    }
                }
            }
        }

        let f = f / n_samples;
        debug_assert!(!f.has_nans());
        if f.has_nans() || f.has_infs() {
            Spectrum::ZERO
        } else {
            f
        }
    }

    fn sample_f(
        &self,
        wo: &Vector3f,
        uc: Float,
        u: &Point2f,
        mode: TransportMode,
        sample_flags: BxDFReflTransFlags,
    ) -> Option<BSDFSample> {
        if sample_flags != BxDFReflTransFlags::ALL {
            return None;
        }

        let mut wo = *wo;
        let flip_wi = self.config.two_sided && wo.z < 0.0;
        if flip_wi {
            wo = -wo;
        }

        // Sample entrance interface for the initial direction.
        let entered_top = wo.z > 0.0;
        let mut bs = if entered_top {
            self.top.sample_f(&wo, uc, u, mode, BxDFReflTransFlags::ALL)
        } else {
            self.bottom.sample_f(&wo, uc, u, mode, BxDFReflTransFlags::ALL)
        }?;
        if bs.is_reflection() {
            if flip_wi {
                bs.wi = -bs.wi;
            }
            return Some(bs);
        }
        let mut w = bs.wi;

        stat_inc!(RANDOM_WALKS, 1);
        let mut rng = RNG::new(
            HashBuffer::new().u64(self.seed).vector(&wo).finish(),
            HashBuffer::new().float(uc).point2(u).finish(),
        );

        let mut f = bs.f * abs_cos_theta(&bs.wi);
        let mut pdf = bs.pdf;
        let mut z = if entered_top { self.thickness } else { 0.0 };
        let phase = HGPhaseFunction::new(self.g);

        for depth in 0..self.config.max_depth {
            let rr_beta = f.max_component_value() / pdf;
            pdf *= self.russian_roulette(depth, rr_beta, next_float(&mut rng))?;
            if w.z == 0.0 {
                return None;
            }

            if self.has_medium() {
                // Sample a potential scattering event in the slab.
                let sigma_t = 1.0;
                let dz = sample_exponential(next_float(&mut rng), sigma_t / abs_cos_theta(&w));
                let zp = if w.z > 0.0 { z + dz } else { z - dz };
                if zp == z {
                    return None;
                }
                if 0.0 < zp && zp < self.thickness {
                    let ps = phase
                        .sample_p(&-w, &next_point(&mut rng))
                        .filter(|ps| ps.pdf > 0.0 && ps.wi.z != 0.0)?;
                    f *= self.albedo * ps.p;
                    pdf *= ps.pdf;
                    w = ps.wi;
                    z = zp;
                    continue;
                }
                z = clamp(zp, 0.0, self.thickness);
            } else {
                // Bounce to the other interface.
                z = if z == self.thickness { 0.0 } else { self.thickness };
                f *= Self::tr(self.thickness, &w);
            }

            let interface = self.interface_at(z);
            let uc = next_float(&mut rng);
            let u = next_point(&mut rng);
            let bs = interface
                .sample_f(&-w, uc, &u, mode, BxDFReflTransFlags::ALL)
                .filter(|bs| bs.wi.z != 0.0)?;
            f *= bs.f;
            pdf *= bs.pdf;
            w = bs.wi;

            // Return the sample once the walk leaves the slab.
            if bs.is_transmission() {
                let flags = if same_hemisphere(&wo, &w) {
                    BxDFFlags::GLOSSY_REFLECTION
                } else {
                    BxDFFlags::GLOSSY_TRANSMISSION
                };
                if flip_wi {
                    w = -w;
                }
                let sample = BSDFSample::new(f, w, pdf, flags).proportional();
                return Some(sample).filter(BSDFSample::is_valid);
            }

            f *= abs_cos_theta(&bs.wi);
        }
        None
    }

    fn pdf(&self, wo: &Vector3f, wi: &Vector3f, mode: TransportMode, sample_flags: BxDFReflTransFlags) -> Float {
        if sample_flags != BxDFReflTransFlags::ALL {
            return 0.0;
        }

        let (mut wo, mut wi) = (*wo, *wi);
        if self.config.two_sided && wo.z < 0.0 {
            wo = -wo;
            wi = -wi;
        }

        let mut rng = RNG::new(
            HashBuffer::new().u64(self.seed).vector(&wo).finish(),
            HashBuffer::new().vector(&wi).finish(),
        );

        let entered_top = wo.z > 0.0;
        let same = same_hemisphere(&wo, &wi);
        let n_samples = self.config.n_samples as Float;

        // Reflection at the entrance interface.
        let mut pdf_sum = if same {
            let p = if entered_top {
                self.top.pdf(&wo, &wi, mode, BxDFReflTransFlags::REFLECTION)
            } else {
                self.bottom.pdf(&wo, &wi, mode, BxDFReflTransFlags::REFLECTION)
            };
            n_samples * p
        } else {
            0.0
        };

        for _ in 0..self.config.n_samples {
            if same {
                // Estimate the transmit-reflect-transmit term.
                let (r_interface, t_interface) = if entered_top {
                    (Interface::Bottom(&self.bottom), Interface::Top(&self.top))
                } else {
                    (Interface::Top(&self.top), Interface::Bottom(&self.bottom))
                };

                let uc = next_float(&mut rng);
                let u = next_point(&mut rng);
                match t_interface.sample_f(&wo, uc, &u, mode, BxDFReflTransFlags::ALL) {
                    Some(wos) if wos.wi.z != 0.0 && wos.is_transmission() => {
                        let uc = next_float(&mut rng);
                        let u = next_point(&mut rng);
                        match t_interface.sample_f(&wi, uc, &u, !mode, BxDFReflTransFlags::ALL) {
                            Some(wis) if wis.wi.z != 0.0 && wis.is_transmission() => {
                                pdf_sum += r_interface.pdf(&-wos.wi, &-wis.wi, mode, BxDFReflTransFlags::ALL);
                            }
                            _ => continue,
                        }
                    }
                    _ => pdf_sum += t_interface.pdf(&wo, &wi, mode, BxDFReflTransFlags::ALL),
                }
            } else {
                // Estimate the transmit-transmit term.
                let (to_interface, ti_interface) = if entered_top {
                    (Interface::Top(&self.top), Interface::Bottom(&self.bottom))
                } else {
                    (Interface::Bottom(&self.bottom), Interface::Top(&self.top))
                };

                let uc = next_float(&mut rng);
                let u = next_point(&mut rng);
                let wos = match to_interface.sample_f(&wo, uc, &u, mode, BxDFReflTransFlags::ALL) {
                    Some(bs) if bs.wi.z != 0.0 && bs.is_transmission() => bs,
                    _ => continue,
                };

                let uc = next_float(&mut rng);
                let u = next_point(&mut rng);
                let wis = match ti_interface.sample_f(&wi, uc, &u, !mode, BxDFReflTransFlags::ALL) {
                    Some(bs) if bs.wi.z != 0.0 && bs.is_transmission() => bs,
                    _ => continue,
                };

                pdf_sum += if to_interface.flags().is_specular() {
                    ti_interface.pdf(&-wos.wi, &wi, mode, BxDFReflTransFlags::ALL)
                } else if ti_interface.flags().is_specular() {
                    to_interface.pdf(&wo, &-wis.wi, mode, BxDFReflTransFlags::ALL)
                } else {
                    (to_interface.pdf(&wo, &-wis.wi, mode, BxDFReflTransFlags::ALL)
                        + ti_interface.pdf(&-wos.wi, &wi, mode, BxDFReflTransFlags::ALL))
                        / 2.0
                };
            }
        }

        // Mix with a uniform density so the estimate is never zero.
        lerp(
            1.0 - self.config.pdf_isotropic_weight,
            INV_FOUR_PI,
            pdf_sum / n_samples,
        )
    }

    fn regularize(&mut self) {
        self.top.regularize();
        self.bottom.regularize();
    }

    fn sampled_pdf_is_proportional(&self) -> bool {
        true
    }
}

impl<T, B> fmt::Display for LayeredBxDF<T, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[ LayeredBxDF thickness: {} albedo: {} g: {} max_depth: {} n_samples: {} ]",
            self.thickness, self.albedo, self.g, self.config.max_depth, self.config.n_samples
        )
    }
}

// ---- Tests ----

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use proptest::prelude::*;

    prop_hemisphere_direction!(upper_direction);

    fn smooth_coat() -> DielectricInterfaceBxDF {
        DielectricInterfaceBxDF::new(1.5, TrowbridgeReitzDistribution::new(0.0, 0.0))
    }

    fn coated_diffuse(thickness: Float, albedo: Float, config: LayeredBxDFConfig, seed: u64) -> CoatedDiffuseBxDF {
        LayeredBxDF::new(
            smooth_coat(),
            IdealDiffuseBxDF::new(Spectrum::new(0.8)),
            thickness,
            Spectrum::new(albedo),
            0.0,
            config,
            seed,
        )
    }

    fn rough_coated_conductor() -> CoatedConductorBxDF {
        LayeredBxDF::new(
            DielectricInterfaceBxDF::new(1.5, TrowbridgeReitzDistribution::new(0.3, 0.3)),
            ConductorBxDF::new(
                TrowbridgeReitzDistribution::new(0.2, 0.2),
                Spectrum::from_rgb(0.2, 0.9, 1.1),
                Spectrum::from_rgb(3.9, 2.4, 2.2),
            ),
            0.01,
            Spectrum::ZERO,
            0.0,
            LayeredBxDFConfig::default(),
            0,
        )
    }

    #[test]
    fn flags_follow_interfaces() {
        let bxdf = coated_diffuse(0.01, 0.0, LayeredBxDFConfig::default(), 0);
        let flags = bxdf.flags();
        assert!(flags.is_reflective());
        assert!(flags.is_specular());
        assert!(flags.is_diffuse());
        assert!(!flags.is_transmissive());
        assert!(bxdf.sampled_pdf_is_proportional());

        let flags = rough_coated_conductor().flags();
        assert!(flags.is_glossy());
        assert!(!flags.is_specular());
    }

    #[test]
    fn evaluation_is_repeatable() {
        let bxdf = rough_coated_conductor();
        let wo = Vector3f::new(0.3, 0.2, 0.9).normalize();
        let wi = Vector3f::new(-0.4, 0.1, 0.8).normalize();
        let mode = TransportMode::Radiance;
        assert_eq!(bxdf.f(&wo, &wi, mode), bxdf.f(&wo, &wi, mode));
        assert_eq!(
            bxdf.pdf(&wo, &wi, mode, BxDFReflTransFlags::ALL),
            bxdf.pdf(&wo, &wi, mode, BxDFReflTransFlags::ALL)
        );
    }

    #[test]
    fn coated_diffuse_at_normal_incidence() {
        // Fresnel-attenuated Lambertian response with interreflection.
        let config = LayeredBxDFConfig {
            n_samples: 64,
            ..LayeredBxDFConfig::default()
        };
        let w = Vector3f::new(0.0, 0.0, 1.0);
        let n_seeds = 64;
        let mean = (0..n_seeds)
            .map(|seed| coated_diffuse(1e-4, 0.0, config, seed).f(&w, &w, TransportMode::Radiance)[0])
            .sum::<Float>()
            / n_seeds as Float;

        let t = 1.0 - fr_dielectric(1.0, 1.5);
        let single = t * t / 2.25 * 0.8 * INV_PI;
        assert!(mean > single * 0.99, "mean {} single {}", mean, single);
        assert!(mean < single * 2.1, "mean {} single {}", mean, single);
        assert!(approx_eq!(Float, mean, 0.195, epsilon = 0.02), "mean {}", mean);
    }

    #[test]
    fn coated_diffuse_conserves_energy() {
        let bxdf = BxDF::from(coated_diffuse(0.1, 0.5, LayeredBxDFConfig::default(), 7));
        let mut rng = RNG::new(5, 0);
        let n = 20_000;
        for wo in [Vector3f::new(0.0, 0.0, 1.0), Vector3f::new(0.6, 0.0, 0.8), Vector3f::new(0.0, 0.95, 0.3122)] {
            let uc: Vec<Float> = (0..n).map(|_| rng.uniform_float()).collect();
            let u2: Vec<Point2f> = (0..n)
                .map(|_| Point2f::new(rng.uniform_float(), rng.uniform_float()))
                .collect();
            let rho = bxdf.rho_hd(&wo.normalize(), &uc, &u2);
            assert!(rho[0] > 0.0);
            assert!(rho[0] <= 1.05, "rho {}", rho[0]);
        }
    }

    #[test]
    fn scattering_slab_evaluation_matches_sampling() {
        // Rough coat over a white base with a scattering medium in between.
        let bxdf = LayeredBxDF::new(
            DielectricInterfaceBxDF::new(1.5, TrowbridgeReitzDistribution::new(0.3, 0.3)),
            IdealDiffuseBxDF::new(Spectrum::ONE),
            1.0,
            Spectrum::new(0.9),
            0.0,
            LayeredBxDFConfig::default(),
            3,
        );
        let wo = Vector3f::new(0.0, 0.0, 1.0);
        let mode = TransportMode::Radiance;
        let mut rng = RNG::new(11, 0);
        let n = 200_000;

        // Estimate of the integral of f |cos| over uniformly sampled directions.
        let mut integral = 0.0;
        for _ in 0..n {
            let wi = uniform_sample_sphere(&Point2f::new(rng.uniform_float(), rng.uniform_float()));
            integral += bxdf.f(&wo, &wi, mode)[0] * abs_cos_theta(&wi) / uniform_sphere_pdf();
        }
        integral /= n as Float;

        // Mean weight of the importance sampled directions.
        let mut weight = 0.0;
        for _ in 0..n {
            let u = Point2f::new(rng.uniform_float(), rng.uniform_float());
            if let Some(bs) = bxdf.sample_f(&wo, rng.uniform_float(), &u, mode, BxDFReflTransFlags::ALL) {
                weight += bs.f[0] * abs_cos_theta(&bs.wi) / bs.pdf;
            }
        }
        weight /= n as Float;

        assert!(weight > 0.0);
        assert!(
            (integral - weight).abs() < 0.07 * weight,
            "integral {} weight {}",
            integral,
            weight
        );
    }

    #[test]
    fn restricted_sampling_is_rejected() {
        let bxdf = rough_coated_conductor();
        let wo = Vector3f::new(0.0, 0.0, 1.0);
        let u = Point2f::new(0.3, 0.6);
        assert!(bxdf
            .sample_f(&wo, 0.5, &u, TransportMode::Radiance, BxDFReflTransFlags::REFLECTION)
            .is_none());
        assert_eq!(bxdf.pdf(&wo, &wo, TransportMode::Radiance, BxDFReflTransFlags::REFLECTION), 0.0);
    }

    #[test]
    fn zero_config_values_are_replaced() {
        let options = Options::default();
        let config = LayeredBxDFConfig {
            max_depth: 0,
            n_samples: 0,
            ..LayeredBxDFConfig::default()
        }
        .validated(&options);
        assert_eq!(config, LayeredBxDFConfig::default());
    }

    proptest! {
        #[test]
        fn pdf_is_positive(wo in upper_direction(), wi in upper_direction(), flip in proptest::bool::ANY) {
            let bxdf = rough_coated_conductor();
            let wi = if flip { -wi } else { wi };
            let pdf = bxdf.pdf(&wo, &wi, TransportMode::Radiance, BxDFReflTransFlags::ALL);
            prop_assert!(pdf > 0.0 && pdf.is_finite());
        }

        #[test]
        fn two_sided_evaluation_is_symmetric(wo in upper_direction(), wi in upper_direction()) {
            let bxdf = rough_coated_conductor();
            let mode = TransportMode::Radiance;
            prop_assert_eq!(bxdf.f(&wo, &wi, mode), bxdf.f(&-wo, &-wi, mode));
        }

        #[test]
        fn samples_are_finite(wo in upper_direction(), uc in 0.0f32..1.0, u in (0.0f32..1.0, 0.0f32..1.0)) {
            let bxdf = coated_diffuse(0.05, 0.3, LayeredBxDFConfig::default(), 1);
            if let Some(bs) = bxdf.sample_f(&wo, uc, &Point2f::new(u.0, u.1), TransportMode::Radiance, BxDFReflTransFlags::ALL) {
                prop_assert!(bs.pdf > 0.0);
                prop_assert!(!bs.f.has_nans() && !bs.f.has_infs());
                prop_assert!(bs.wi.z > 0.0);
            }
        }
    }
}
