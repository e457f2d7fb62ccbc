//! Interpolation Functions

use crate::pbrt::*;

/// Upper bound on Newton-bisection steps when inverting splines and series.
const MAX_NEWTON_ITERATIONS: usize = 64;

/// Returns the weights and the index offset for Catmull-Rom spline. The
/// offset is the node index of the first weight and may be `-1` at the lower
/// boundary, in which case that weight is zero.
///
/// * `nodes` - Interpolations nodes.
/// * `x`     - Variable to interpolate.
pub fn catmull_rom_weights(nodes: &[Float], x: Float) -> Option<([Float; 4], isize)> {
    // Return None if `x` is out of bounds.
    let size = nodes.len();
    if !(x >= nodes[0] && x <= nodes[size - 1]) {
        return None;
    }

    // Search for the interval `idx` containing `x`.
    let idx = find_interval(size, |i| nodes[i] <= x);
    let offset = idx as isize - 1;
    let x0 = nodes[idx];
    let x1 = nodes[idx + 1];

    // Compute the `t` parameter and powers.
    let t = (x - x0) / (x1 - x0);
    let t2 = t * t;
    let t3 = t2 * t;

    // Compute initial node weights `w_1` and `w_2`.
    let mut weights = [0.0; 4];
    weights[1] = 2.0 * t3 - 3.0 * t2 + 1.0;
    weights[2] = -2.0 * t3 + 3.0 * t2;

    // Compute first node weight `w_0`.
    if idx > 0 {
        let w0 = (t3 - 2.0 * t2 + t) * (x1 - x0) / (x1 - nodes[idx - 1]);
        weights[0] = -w0;
        weights[2] += w0;
    } else {
        let w0 = t3 - 2.0 * t2 + t;
        weights[0] = 0.0;
        weights[1] -= w0;
        weights[2] += w0;
    }

    // Compute last node weight `w_3`.
    if idx + 2 < size {
        let w3 = (t3 - t2) * (x1 - x0) / (nodes[idx + 2] - x0);
        weights[1] -= w3;
        weights[3] = w3;
    } else {
        let w3 = t3 - t2;
        weights[1] -= w3;
        weights[2] += w3;
        weights[3] = 0.0;
    }

    Some((weights, offset))
}

/// Returns sampled Catmull-Rom spline value, fval and pdf in 2D.
///
/// * `nodes1` - Locations x0, ..., xn where the function `f` is evaluated.
/// * `nodes2` - Locations y0, ..., yn where the function `f` is evaluated.
/// * `values` - Matrix of values in row-major order of the function at each
///              point (`xi`, `yi`).
/// * `cdf`    - Matrix in row-major order of discrete CDFs where each row is
///              computed via `integrate_catmull_rom()` on corresponding row
///              of `values`.
/// * `u`      - Uniform random variate ξ.
#[allow(non_snake_case)]
pub fn sample_catmull_rom_2d(
    nodes1: &[Float],
    nodes2: &[Float],
    values: &[Float],
    cdf: &[Float],
    alpha: Float,
    u: Float,
) -> (Float, Float, Float) {
    // Get number of nodes.
    let size2 = nodes2.len();

    // Determine offset and coefficients for the `alpha` parameter.
    let (weights, offset) = if let Some((w, o)) = catmull_rom_weights(nodes1, alpha) {
        (w, o)
    } else {
        return (0.0, 0.0, 0.0);
    };

    // Interpolate table entries across the four weighted rows.
    let interpolate = |array: &[Float], idx: usize| -> Float {
        (0..4).fold(0.0, |a, i| {
            if weights[i] != 0.0 {
                a + array[(offset + i as isize) as usize * size2 + idx] * weights[i]
            } else {
                a
            }
        })
    };

    // Map `u` to a spline interval by inverting the interpolated `cdf`.
    let maximum = interpolate(cdf, size2 - 1);
    if maximum <= 0.0 {
        return (0.0, 0.0, 0.0);
    }
    let u = u * maximum;
    let idx = find_interval(size2, |i| interpolate(cdf, i) <= u);

    // Look up node positions and interpolated function values.
    let f0 = interpolate(values, idx);
    let f1 = interpolate(values, idx + 1);
    let x0 = nodes2[idx];
    let x1 = nodes2[idx + 1];
    let width = x1 - x0;

    // Re-scale `u` using the interpolated `cdf`.
    let u = (u - interpolate(cdf, idx)) / width;

    // Approximate derivatives using finite differences of the interpolant.
    let d0 = if idx > 0 {
        width * (f1 - interpolate(values, idx - 1)) / (x1 - nodes2[idx - 1])
    } else {
        f1 - f0
    };
    let d1 = if idx + 2 < size2 {
        width * (interpolate(values, idx + 2) - f0) / (nodes2[idx + 2] - x0)
    } else {
        f1 - f0
    };

    // Invert definite integral over spline segment and return solution.

    // Set initial guess for `t` by importance sampling a linear interpolant.
    let mut t = if f0 != f1 {
        (f0 - (max(0.0, f0 * f0 + 2.0 * u * (f1 - f0))).sqrt()) / (f0 - f1)
    } else if f0 != 0.0 {
        u / f0
    } else {
        0.5
    };
    let mut a: Float = 0.0;
    let mut b: Float = 1.0;
    let mut Fhat: Float;
    let mut fhat: Float = f0;
    for _ in 0..MAX_NEWTON_ITERATIONS {
        // Fall back to a bisection step when `t` is out of bounds.
        if !(t >= a && t <= b) {
            t = 0.5 * (a + b);
        }

        // Evaluate target function and its derivative in Horner form.
        Fhat = t
            * (f0
                + t * (0.5 * d0
                    + t * ((1.0 / 3.0) * (-2.0 * d0 - d1) + f1 - f0
                        + t * (0.25 * (d0 + d1) + 0.5 * (f0 - f1)))));
        fhat = f0
            + t * (d0 + t * (-2.0 * d0 - d1 + 3.0 * (f1 - f0) + t * (d0 + d1 + 2.0 * (f0 - f1))));

        // Stop the iteration if converged.
        if abs(Fhat - u) < 1e-6 || b - a < 1e-6 {
            break;
        }

        // Update bisection bounds using updated `t`.
        if Fhat - u < 0.0 {
            a = t;
        } else {
            b = t;
        }

        // Perform a Newton step.
        t -= (Fhat - u) / fhat;
    }

    // Return the sample position and function value.
    let fval = fhat;
    let pdf = fhat / maximum;
    let sample = x0 + width * t;
    (sample, fval, pdf)
}

/// Computes the integral and the auxilliary CDF for importance sampling.
///
/// * `x`      - Samples values.
/// * `values` - Value of the function.
pub fn integrate_catmull_rom(x: &[Float], values: &[Float]) -> (Vec<Float>, Float) {
    let n = x.len();
    let mut sum = 0.0;
    let mut cdf = vec![0.0; n];

    for i in 0..n - 1 {
        // Look up `x_i` and function values of spline segment `i`.
        let x0 = x[i];
        let x1 = x[i + 1];
        let f0 = values[i];
        let f1 = values[i + 1];
        let width = x1 - x0;

        // Approximate derivatives using finite differences.
        let d0 = if i > 0 {
            width * (f1 - values[i - 1]) / (x1 - x[i - 1])
        } else {
            f1 - f0
        };
        let d1 = if i + 2 < n {
            width * (values[i + 2] - f0) / (x[i + 2] - x0)
        } else {
            f1 - f0
        };

        // Keep a running sum and build a cumulative distribution function.
        sum += ((d0 - d1) * (1.0 / 12.0) + (f0 + f1) * 0.5) * width;
        cdf[i + 1] = sum;
    }

    (cdf, sum)
}

/// Compute the BSDF value using Fourier interpolation.
///
/// * `a`       - The weighted coefficients from a Fourier BSDF for order `m`.
/// * `cos_phi` - Cosine of the angle ΔΦ between pair of directions.
pub fn fourier(a: &[Float], cos_phi: f64) -> Float {
    let mut value = 0.0_f64;

    // Initialize cosine iterates.
    let mut cos_k_minus_one_phi = cos_phi;
    let mut cos_k_phi = 1.0_f64;
    for ak in a {
        // Add the current summand and update the cosine iterates.
        value += (*ak as f64) * cos_k_phi;
        let cos_k_plus_one_phi = 2.0_f64 * cos_phi * cos_k_phi - cos_k_minus_one_phi;
        cos_k_minus_one_phi = cos_k_phi;
        cos_k_phi = cos_k_plus_one_phi;
    }

    value as Float
}

/// Sample fourier
///
/// * `ak`    - The weighted coefficients from a Fourier BSDF for order `m`.
/// * `recip` - Contains 1 / i for i in [0..`m_max`].
/// * `u`     - Uniform random variate ξ.
#[allow(non_snake_case)]
pub fn sample_fourier(ak: &[Float], recip: &[Float], u: Float) -> (Float, Float, Float) {
    let m = ak.len();

    // Pick a side and declare bisection variables.
    let flip = u >= 0.5;
    let u = if flip { 1.0 - 2.0 * (u - 0.5) } else { u * 2.0 };

    let mut a: f64 = 0.0;
    let mut b = PI as f64;
    let mut phi = 0.5 * PI as f64;
    let mut F: f64;
    let mut f: f64 = ak[0] as f64;
    for _ in 0..MAX_NEWTON_ITERATIONS {
        // Evaluate `F(ϕ)` and its derivative `f(ϕ)`.

        // Initialize sine and cosine iterates.
        let cos_phi = phi.cos(); // Use f64 variant.
        let sin_phi = (max(0.0, 1.0 - cos_phi * cos_phi)).sqrt();
        let mut cos_phi_prev = cos_phi;
        let mut cos_phi_cur: f64 = 1.0;
        let mut sin_phi_prev = -sin_phi;
        let mut sin_phi_cur: f64 = 0.0;

        // Initialize `F` and `f` with the first series term.
        F = ak[0] as f64 * phi;
        f = ak[0] as f64;
        for k in 1..m {
            // Compute next sine and cosine iterates.
            let sin_phi_next = 2.0 * cos_phi * sin_phi_cur - sin_phi_prev;
            let cos_phi_next = 2.0 * cos_phi * cos_phi_cur - cos_phi_prev;
            sin_phi_prev = sin_phi_cur;
            sin_phi_cur = sin_phi_next;
            cos_phi_prev = cos_phi_cur;
            cos_phi_cur = cos_phi_next;

            // Add the next series term to `F` and `f`.
            F += ak[k] as f64 * recip[k] as f64 * sin_phi_next;
            f += ak[k] as f64 * cos_phi_next;
        }
        F -= (u * ak[0] * PI) as f64;

        // Update bisection bounds using updated ϕ.
        if F > 0.0 {
            b = phi;
        } else {
            a = phi;
        }

        // Stop the Fourier bisection iteration if converged.
        if abs(F) < 1e-6 || b - a < 1e-6 {
            break;
        }

        // Perform a Newton step given `f(ϕ)` and `F(ϕ)`.
        if f != 0.0 {
            phi -= F / f;
        }

        // Fall back to a bisection step when ϕ is out of bounds.
        if !(phi > a && phi < b) {
            phi = 0.5 * (a + b);
        }
    }

    // Potentially flip `ϕ` and return the result.
    if flip {
        phi = TWO_PI as f64 - phi;
    }
    let pdf = (INV_TWO_PI as f64 * f / ak[0] as f64) as Float;
    (f as Float, pdf, phi as Float)
}

// ---- Tests ----

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    #[test]
    fn weights_reproduce_nodes() {
        let nodes = [-1.0, -0.5, 0.0, 0.5, 1.0];
        let (w, offset) = catmull_rom_weights(&nodes, 0.0).unwrap();
        let sum: Float = w.iter().sum();
        assert!(approx_eq!(f32, sum, 1.0, epsilon = 1e-5));
        // At a node the weight falls on that node alone.
        let hit = (0..4)
            .find(|i| (offset + *i as isize) == 2)
            .map(|i| w[i])
            .unwrap();
        assert!(approx_eq!(f32, hit, 1.0, epsilon = 1e-5));
        assert!(catmull_rom_weights(&nodes, 1.5).is_none());
        let (_, offset) = catmull_rom_weights(&nodes, -0.9).unwrap();
        assert_eq!(offset, -1);
    }

    #[test]
    fn integrate_constant() {
        let x = [0.0, 0.25, 0.5, 1.0];
        let (cdf, sum) = integrate_catmull_rom(&x, &[2.0; 4]);
        assert!(approx_eq!(f32, sum, 2.0, epsilon = 1e-5));
        assert!(approx_eq!(f32, cdf[2], 1.0, epsilon = 1e-5));
    }

    #[test]
    fn fourier_constant_series() {
        assert!(approx_eq!(f32, fourier(&[0.5], 0.3), 0.5, ulps = 2));
        let (f, pdf, phi) = sample_fourier(&[0.5], &[0.0], 0.25);
        assert!(approx_eq!(f32, f, 0.5, epsilon = 1e-5));
        assert!(approx_eq!(f32, pdf, INV_TWO_PI, epsilon = 1e-5));
        assert!(approx_eq!(f32, phi, PI_OVER_TWO, epsilon = 1e-3));
    }
}
