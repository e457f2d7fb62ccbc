//! Henyey-Greenstein

use super::PhaseFunctionSample;
use crate::geometry::*;
use crate::pbrt::*;
use std::fmt;

/// Henyey-Greenstein phase function.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct HGPhaseFunction {
    /// The asymmetry parameter. It is the average value of the product of the
    /// phase function being approximated and the cosine of the angle between two
    /// directions. Isotropic phase functions use g = 0.
    g: Float,
}

impl HGPhaseFunction {
    /// Returns a new `HGPhaseFunction`.
    ///
    /// * `g` - The asymmetry parameter in (-1, 1).
    pub fn new(g: Float) -> Self {
        Self { g: clamp(g, -0.99, 0.99) }
    }

    /// Returns the asymmetry parameter.
    pub fn g(&self) -> Float {
        self.g
    }

    /// Returns the value of the phase function for the given pair of
    /// directions, both pointing away from the scattering point.
    ///
    /// * `wo` - Outgoing direction.
    /// * `wi` - Incident direction.
    pub fn p(&self, wo: &Vector3f, wi: &Vector3f) -> Float {
        henyey_greenstein(wo.dot(wi), self.g)
    }

    /// Samples an incident direction proportional to the phase function.
    ///
    /// * `wo` - Outgoing direction.
    /// * `u`  - Sample value in [0, 1)^2.
    pub fn sample_p(&self, wo: &Vector3f, u: &Point2f) -> Option<PhaseFunctionSample> {
        let g = self.g;

        // Compute cos(θ) for Henyey-Greenstein sample.
        let cos_theta = if abs(g) < 1e-3 {
            1.0 - 2.0 * u[0]
        } else {
            -1.0 / (2.0 * g) * (1.0 + g * g - sqr((1.0 - g * g) / (1.0 + g - 2.0 * g * u[0])))
        };
        let cos_theta = clamp(cos_theta, -1.0, 1.0);

        // Compute direction `wi` for Henyey-Greenstein sample.
        let sin_theta = safe_sqrt(1.0 - cos_theta * cos_theta);
        let phi = TWO_PI * u[1];
        let (v1, v2) = coordinate_system(wo);
        let wi = spherical_direction_in_frame(sin_theta, cos_theta, phi, &v1, &v2, wo);

        let pdf = henyey_greenstein(cos_theta, g);
        if pdf > 0.0 {
            Some(PhaseFunctionSample { p: pdf, wi, pdf })
        } else {
            None
        }
    }

    /// Returns the PDF of `sample_p()`, equal to the phase function value.
    ///
    /// * `wo` - Outgoing direction.
    /// * `wi` - Incident direction.
    pub fn pdf(&self, wo: &Vector3f, wi: &Vector3f) -> Float {
        self.p(wo, wi)
    }
}

impl fmt::Display for HGPhaseFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ HGPhaseFunction g: {} ]", self.g)
    }
}

/// Evaluates the Henyey-Greenstein phase function.
///
/// * `cos_theta` - Cosine of the angle between the two directions.
/// * `g`         - Asymmetry parameter.
#[inline]
pub fn henyey_greenstein(cos_theta: Float, g: Float) -> Float {
    let denom = 1.0 + g * g + 2.0 * g * cos_theta;
    INV_FOUR_PI * (1.0 - g * g) / (denom * safe_sqrt(denom))
}

// ---- Tests ----

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::RNG;
    use crate::sampling::*;
    use float_cmp::*;
    use proptest::prelude::*;

    prop_hemisphere_direction!(direction);

    #[test]
    fn isotropic_is_constant() {
        let hg = HGPhaseFunction::new(0.0);
        let a = Vector3f::new(0.0, 0.0, 1.0);
        let b = Vector3f::new(1.0, 0.0, 0.0);
        assert!(approx_eq!(f32, hg.p(&a, &b), INV_FOUR_PI, ulps = 4));
    }

    #[test]
    fn integrates_to_one() {
        let hg = HGPhaseFunction::new(0.6);
        let wo = Vector3f::new(0.0, 0.0, 1.0);
        let mut rng = RNG::new(3, 0);
        let n = 100_000;
        let mut sum = 0.0;
        for _ in 0..n {
            let u = Point2f::new(rng.uniform_float(), rng.uniform_float());
            let wi = uniform_sample_sphere(&u);
            sum += hg.p(&wo, &wi) / uniform_sphere_pdf();
        }
        assert!(approx_eq!(f32, sum / n as Float, 1.0, epsilon = 0.05));
    }

    proptest! {
        #[test]
        fn sampled_pdf_matches_value(
            wo in direction(),
            g in -0.9f32..0.9f32,
            u0 in 0.0f32..1.0f32,
            u1 in 0.0f32..1.0f32,
        ) {
            let hg = HGPhaseFunction::new(g);
            let ps = hg.sample_p(&wo, &Point2f::new(u0, u1)).unwrap();
            prop_assert!(approx_eq!(f32, ps.wi.length(), 1.0, epsilon = 1e-3));
            let p = hg.pdf(&wo, &ps.wi);
            prop_assert!((p - ps.pdf).abs() <= 1e-2 * ps.pdf.max(1.0));
        }
    }
}
