//! Homogeneous Medium

use strata_core::geometry::*;
use strata_core::interaction::MediumInteraction;
use strata_core::medium::*;
use strata_core::paramset::*;
use strata_core::pbrt::*;
use strata_core::sampler::*;
use strata_core::spectrum::*;

/// Implements a homogeneous medium representing a region of space with constant
/// σa and σs values throughout its extent.
#[derive(Clone, Debug)]
pub struct HomogeneousMedium {
    /// Scattering coefficient `σs` is the probability of an out-scattering
    /// event occurring per unit distance
    sigma_s: Spectrum,

    /// Total reduction in radiance due to absorption and out-scattering
    /// `σt = σs + σa`.
    sigma_t: Spectrum,

    /// The asymmetry parameter for Henyey-Greenstein phase function.
    g: Float,
}

impl HomogeneousMedium {
    /// Create a new `HomogeneousMedium `.
    ///
    /// * `sigma_a` - Absorption cross section `σa`.
    /// * `sigma_s` - Scattering coefficient `σs`.
    /// * `g`       - The asymmetry parameter for Henyey-Greenstein phase
    ///               function.
    pub fn new(sigma_a: Spectrum, sigma_s: Spectrum, g: Float) -> Self {
        Self {
            sigma_s,
            sigma_t: sigma_s + sigma_a,
            g: clamp(g, -0.99, 0.99),
        }
    }

    /// Returns the transmittance over a distance.
    ///
    /// * `d` - The distance.
    fn transmittance(&self, d: Float) -> Spectrum {
        (-self.sigma_t * min(d, Float::MAX)).exp()
    }

    /// Returns the channel-averaged probability of travelling a distance
    /// without an interaction.
    ///
    /// * `d` - The distance.
    fn escape_pdf(&self, d: Float) -> Float {
        let pdf = self.transmittance(d).average();
        if pdf == 0.0 {
            1.0
        } else {
            pdf
        }
    }
}

impl Medium for HomogeneousMedium {
    /// Returns the beam transmittance along a given ray.
    ///
    /// * `ray`      - The ray.
    /// * `_sampler` - Unused.
    fn tr(&self, ray: &Ray, _sampler: &mut dyn Sampler) -> Spectrum {
        self.transmittance(ray.t_max * ray.d.length())
    }

    /// Samples a medium scattering interaction along a world-space ray up to
    /// its `t_max`. A channel is chosen uniformly and the distance is sampled
    /// from its extinction, so the returned weight uses the density averaged
    /// over all channels.
    ///
    /// * `ray`     - The ray.
    /// * `sampler` - The sampler.
    fn sample(&self, ray: &Ray, sampler: &mut dyn Sampler) -> (Spectrum, Option<MediumInteraction>) {
        // Sample a channel and distance along the ray.
        let channel = min(
            (sampler.get_1d() * SPECTRUM_SAMPLES as Float) as usize,
            SPECTRUM_SAMPLES - 1,
        );
        let u = sampler.get_1d();
        if self.sigma_t[channel] == 0.0 {
            // Channel cannot scatter. The ray passes through.
            return (self.tr(ray, sampler) / self.escape_pdf(ray.t_max * ray.d.length()), None);
        }
        let dist = -(1.0 - u).ln() / self.sigma_t[channel];
        let d_len = ray.d.length();
        let t = min(dist / d_len, ray.t_max);
        let sampled_medium = t < ray.t_max;

        // Compute the transmittance and sampling density.
        let tr = self.transmittance(t * d_len);
        let density = if sampled_medium { self.sigma_t * tr } else { tr };
        let mut pdf = density.average();
        if pdf == 0.0 {
            debug_assert!(tr.is_black());
            pdf = 1.0;
        }

        if sampled_medium {
            let phase = PhaseFunction::from(HGPhaseFunction::new(self.g));
            let mi = MediumInteraction::new(ray.at(t), -ray.d, ray.time, ray.medium.clone(), phase);
            (tr * self.sigma_s / pdf, Some(mi))
        } else {
            (tr / pdf, None)
        }
    }
}

impl From<(&ParamSet, Float)> for HomogeneousMedium {
    /// Create a `HomogeneousMedium` from a parameter set and a scale applied
    /// to both coefficients.
    ///
    /// * `p` - A tuple containing the parameter set and the scale.
    fn from(p: (&ParamSet, Float)) -> Self {
        let (params, scale) = p;
        let sigma_a = params.find_one_spectrum("sigma_a", Spectrum::from_rgb(0.0011, 0.0024, 0.014));
        let sigma_s = params.find_one_spectrum("sigma_s", Spectrum::from_rgb(2.55, 3.21, 3.77));
        let scale = params.find_one_float("scale", scale);
        let g = params.find_one_float("g", 0.0);
        if !(-1.0..=1.0).contains(&g) {
            warn!("Henyey-Greenstein g {} is outside [-1, 1]. Clamping.", g);
        }
        Self::new(sigma_a * scale, sigma_s * scale, g)
    }
}

// ---- Tests ----

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use strata_samplers::RandomSampler;

    fn ray(t_max: Float) -> Ray {
        Ray::new(Point3f::ZERO, Vector3f::new(0.0, 0.0, 1.0), t_max, 0.0, None)
    }

    #[test]
    fn transmittance_follows_beer_lambert() {
        let medium = HomogeneousMedium::new(Spectrum::new(0.5), Spectrum::new(0.5), 0.0);
        let mut sampler = RandomSampler::new(1, 0);
        let tr = medium.tr(&ray(2.0), &mut sampler);
        assert!(approx_eq!(f32, tr[0], (-2.0f32).exp(), epsilon = 1e-6));
    }

    #[test]
    fn sampled_weights_are_unbiased() {
        // E[weight of escaping] + scattering leaves the beam estimate intact:
        // the mean of escape weights equals the transmittance.
        let medium = HomogeneousMedium::new(Spectrum::new(0.2), Spectrum::new(0.6), 0.3);
        let mut sampler = RandomSampler::new(1, 3);
        let r = ray(1.5);

        let n = 200_000;
        let mut escaped = Spectrum::ZERO;
        for i in 0..n {
            sampler.start_pixel_sample(&Point2i::new(0, 0), i);
            let (w, mi) = medium.sample(&r, &mut sampler);
            if mi.is_none() {
                escaped += w;
            }
        }
        let estimate = escaped / n as Float;
        let expected = (-0.8f32 * 1.5).exp();
        assert!((estimate[1] - expected).abs() < 0.01, "{} vs {}", estimate[1], expected);
    }

    #[test]
    fn scattering_points_lie_inside_segment() {
        let medium = HomogeneousMedium::new(Spectrum::ZERO, Spectrum::new(4.0), 0.0);
        let mut sampler = RandomSampler::new(1, 1);
        for i in 0..100 {
            sampler.start_pixel_sample(&Point2i::new(2, 2), i);
            if let (w, Some(mi)) = medium.sample(&ray(1.0), &mut sampler) {
                assert!(mi.hit.p.z > 0.0 && mi.hit.p.z < 1.0);

                // Pure scatterer: σs / σt = 1.
                assert!(approx_eq!(f32, w[0], 1.0, epsilon = 1e-5));
            }
        }
    }
}
