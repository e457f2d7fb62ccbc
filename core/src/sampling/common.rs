//! Common sampling functions.

use crate::geometry::*;
use crate::pbrt::*;
use crate::rng::*;

/// Uniformly sample a direction on a hemisphere.
///
/// * `u` - The random sample point.
pub fn uniform_sample_hemisphere(u: &Point2f) -> Vector3f {
    let z = u[0];
    let r = max(0.0, 1.0 - z * z).sqrt();
    let phi = TWO_PI * u[1];
    Vector3f::new(r * phi.cos(), r * phi.sin(), z)
}

/// Returns the PDF for uniformly sampling a direction from a hemisphere.
#[inline]
pub fn uniform_hemisphere_pdf() -> Float {
    INV_TWO_PI
}

/// Uniformly sample a direction from a sphere.
///
/// * `u` - The random sample point.
pub fn uniform_sample_sphere(u: &Point2f) -> Vector3f {
    let z = 1.0 - 2.0 * u[0];
    let r = max(0.0, 1.0 - z * z).sqrt();
    let phi = TWO_PI * u[1];
    Vector3f::new(r * phi.cos(), r * phi.sin(), z)
}

/// Returns the PDF for uniformly sampling a direction from a sphere.
#[inline]
pub fn uniform_sphere_pdf() -> Float {
    INV_FOUR_PI
}

/// Sample a point on a unit disk by mapping from a unit square to the unit
/// circle. The concentric mapping takes points in [-1, 1]^2 to unit disk by
/// uniformly mapping concentric squares to concentric circles.
///
/// * `u` - The random sample point.
pub fn concentric_sample_disk(u: &Point2f) -> Point2f {
    // Map uniform random numbers to [-1,1]^2.
    let ox = 2.0 * u.x - 1.0;
    let oy = 2.0 * u.y - 1.0;

    // Handle degeneracy at the origin.
    if ox == 0.0 && oy == 0.0 {
        return Point2f::new(0.0, 0.0);
    }

    // Apply concentric mapping to point
    let (r, theta) = if abs(ox) > abs(oy) {
        (ox, PI_OVER_FOUR * (oy / ox))
    } else {
        (oy, PI_OVER_TWO - PI_OVER_FOUR * (ox / oy))
    };

    Point2f::new(r * theta.cos(), r * theta.sin())
}

/// Returns the PDF for sampling a direction from a cone of directions.
#[inline]
pub fn uniform_cone_pdf(cos_theta_max: Float) -> Float {
    1.0 / (TWO_PI * (1.0 - cos_theta_max))
}

/// Sample a direction on a hemisphere using cosine-weighted sampling.
///
/// * `u` - The random sample point.
#[inline]
pub fn cosine_sample_hemisphere(u: &Point2f) -> Vector3f {
    let d = concentric_sample_disk(u);
    let z = max(0.0, 1.0 - d.x * d.x - d.y * d.y).sqrt();
    Vector3f::new(d.x, d.y, z)
}

/// Weight samples using the power heuristic.
///
/// An infinite `f_pdf` (a delta distribution) gets full weight and two
/// zero densities give zero weight.
///
/// * `nf`    - Number of samples taken from `f_pdf`.
/// * `f_pdf` - First sampling distribution.
/// * `ng`    - Number of samples taken from `g_pdf`.
/// * `g_pdf` - Second sampling distribution.
#[inline]
pub fn power_heuristic(nf: Int, f_pdf: Float, ng: Int, g_pdf: Float) -> Float {
    let f = nf as Float * f_pdf;
    let g = ng as Float * g_pdf;
    if f.is_infinite() {
        return 1.0;
    }
    let d = f * f + g * g;
    if d == 0.0 {
        0.0
    } else {
        (f * f) / d
    }
}

/// Samples a distance from the exponential distribution `a e^{-a x}`.
///
/// * `u` - Uniform sample in `[0, 1)`.
/// * `a` - Rate.
#[inline]
pub fn sample_exponential(u: Float, a: Float) -> Float {
    -(1.0 - u).ln() / a
}

/// Picks an index with probability proportional to `weights`. Returns the
/// index, its probability and `u` remapped to `[0, 1)` for reuse, or `None`
/// when all weights are zero.
///
/// * `weights` - Non-negative weights.
/// * `u`       - Uniform sample in `[0, 1)`.
pub fn sample_discrete(weights: &[Float], u: Float) -> Option<(usize, Float, Float)> {
    let sum: Float = weights.iter().sum();
    if weights.is_empty() || sum <= 0.0 {
        return None;
    }

    let up = u * sum;
    let up = if up == sum { next_float_down(up) } else { up };

    let mut offset = 0;
    let mut acc = 0.0;
    while offset + 1 < weights.len() && acc + weights[offset] <= up {
        acc += weights[offset];
        offset += 1;
    }
    while weights[offset] == 0.0 && offset > 0 {
        offset -= 1;
        acc -= weights[offset];
    }

    let pmf = weights[offset] / sum;
    let u_remapped = min((up - acc) / weights[offset], ONE_MINUS_EPSILON);
    Some((offset, pmf, max(0.0, u_remapped)))
}

/// Returns the density of the logistic distribution restricted to `[a, b]`.
///
/// * `x` - Evaluation point.
/// * `s` - Scale.
/// * `a` - Lower bound.
/// * `b` - Upper bound.
pub fn trimmed_logistic(x: Float, s: Float, a: Float, b: Float) -> Float {
    debug_assert!(a < b);
    logistic(x, s) / (logistic_cdf(b, s) - logistic_cdf(a, s))
}

/// Samples the logistic distribution restricted to `[a, b]`.
///
/// * `u` - Uniform sample in `[0, 1)`.
/// * `s` - Scale.
/// * `a` - Lower bound.
/// * `b` - Upper bound.
pub fn sample_trimmed_logistic(u: Float, s: Float, a: Float, b: Float) -> Float {
    debug_assert!(a < b);
    let k = logistic_cdf(b, s) - logistic_cdf(a, s);
    let x = -s * (1.0 / (u * k + logistic_cdf(a, s)) - 1.0).ln();
    debug_assert!(!x.is_nan());
    clamp(x, a, b)
}

/// Logistic density.
fn logistic(x: Float, s: Float) -> Float {
    let x = abs(x);
    (-x / s).exp() / (s * sqr(1.0 + (-x / s).exp()))
}

/// Logistic cumulative distribution.
fn logistic_cdf(x: Float, s: Float) -> Float {
    1.0 / (1.0 + (-x / s).exp())
}

// ---- Tests ----

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use proptest::prelude::*;

    #[test]
    fn power_heuristic_degenerate_cases() {
        assert_eq!(power_heuristic(1, 0.0, 1, 0.0), 0.0);
        assert_eq!(power_heuristic(1, INFINITY, 1, 3.0), 1.0);
        assert_eq!(power_heuristic(1, 2.0, 1, 0.0), 1.0);
        assert!(approx_eq!(f32, power_heuristic(1, 1.0, 1, 1.0), 0.5, ulps = 2));
    }

    #[test]
    fn sample_discrete_skips_zero_weights() {
        let w = [0.0, 1.0, 0.0, 3.0];
        let (i, pmf, _) = sample_discrete(&w, 0.1).unwrap();
        assert_eq!(i, 1);
        assert!(approx_eq!(f32, pmf, 0.25, ulps = 2));
        let (i, pmf, _) = sample_discrete(&w, 0.9).unwrap();
        assert_eq!(i, 3);
        assert!(approx_eq!(f32, pmf, 0.75, ulps = 2));
        assert!(sample_discrete(&[0.0, 0.0], 0.5).is_none());
    }

    #[test]
    fn exponential_mean_matches_rate() {
        let mut rng = RNG::new(11, 0);
        let n = 20_000;
        let mean: Float = (0..n)
            .map(|_| sample_exponential(rng.uniform_float(), 2.0))
            .sum::<Float>()
            / n as Float;
        assert!(approx_eq!(f32, mean, 0.5, epsilon = 0.02));
    }

    proptest! {
        #[test]
        fn cosine_samples_in_upper_hemisphere(u0 in 0.0f32..1.0f32, u1 in 0.0f32..1.0f32) {
            let w = cosine_sample_hemisphere(&Point2f::new(u0, u1));
            prop_assert!(w.z >= 0.0);
            prop_assert!(approx_eq!(f32, w.length(), 1.0, epsilon = 1e-4));
        }

        #[test]
        fn trimmed_logistic_stays_in_range(u in 0.0f32..1.0f32, s in 0.05f32..1.0f32) {
            let x = sample_trimmed_logistic(u, s, -PI, PI);
            prop_assert!((-PI..=PI).contains(&x));
            prop_assert!(trimmed_logistic(x, s, -PI, PI) >= 0.0);
        }
    }
}
