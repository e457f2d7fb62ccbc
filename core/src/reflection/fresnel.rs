//! Fresnel reflectance for dielectrics and conductors.

use super::*;
use num::complex::Complex;

/// Complex number type used for conductor indices of refraction.
pub type ComplexFloat = Complex<Float>;

/// Returns the unpolarized Fresnel reflectance of a dielectric interface.
/// Directions below the interface (`cos_theta_i < 0`) are handled by
/// inverting `eta`. Total internal reflection returns 1.
///
/// * `cos_theta_i` - Cosine of the incident angle relative to the normal.
/// * `eta`         - Relative index of refraction (transmitted over incident).
pub fn fr_dielectric(cos_theta_i: Float, eta: Float) -> Float {
    let mut cos_theta_i = clamp(cos_theta_i, -1.0, 1.0);
    let mut eta = eta;

    // Potentially flip interface orientation.
    if cos_theta_i < 0.0 {
        eta = 1.0 / eta;
        cos_theta_i = -cos_theta_i;
    }

    // Compute cos(θt) using Snell's law.
    let sin2_theta_i = 1.0 - cos_theta_i * cos_theta_i;
    let sin2_theta_t = sin2_theta_i / (eta * eta);
    if sin2_theta_t >= 1.0 {
        return 1.0;
    }
    let cos_theta_t = safe_sqrt(1.0 - sin2_theta_t);

    let r_parl = (eta * cos_theta_i - cos_theta_t) / (eta * cos_theta_i + cos_theta_t);
    let r_perp = (cos_theta_i - eta * cos_theta_t) / (cos_theta_i + eta * cos_theta_t);
    (r_parl * r_parl + r_perp * r_perp) / 2.0
}

/// Returns the Fresnel reflectance of a conductor with complex index of
/// refraction.
///
/// * `cos_theta_i` - Cosine of the incident angle relative to the normal.
/// * `eta`         - Complex relative index of refraction.
pub fn fr_complex(cos_theta_i: Float, eta: ComplexFloat) -> Float {
    let cos_theta_i = clamp(cos_theta_i, 0.0, 1.0);
    let sin2_theta_i = 1.0 - cos_theta_i * cos_theta_i;
    let sin2_theta_t = Complex::new(sin2_theta_i, 0.0) / (eta * eta);
    let cos_theta_t = (Complex::new(1.0, 0.0) - sin2_theta_t).sqrt();

    let ci = Complex::new(cos_theta_i, 0.0);
    let r_parl = (eta * ci - cos_theta_t) / (eta * ci + cos_theta_t);
    let r_perp = (ci - eta * cos_theta_t) / (ci + eta * cos_theta_t);
    (r_parl.norm_sqr() + r_perp.norm_sqr()) / 2.0
}

/// Evaluates `fr_complex` per spectral channel.
///
/// * `cos_theta_i` - Cosine of the incident angle relative to the normal.
/// * `eta`         - Real part of the index of refraction.
/// * `k`           - Absorption coefficient.
pub fn fr_complex_spectrum(cos_theta_i: Float, eta: &Spectrum, k: &Spectrum) -> Spectrum {
    let mut r = Spectrum::ZERO;
    for i in 0..SPECTRUM_SAMPLES {
        r[i] = fr_complex(cos_theta_i, Complex::new(eta[i], k[i]));
    }
    r
}

/// Returns the first Fresnel moment, the cosine-weighted hemispherical
/// average of dielectric reflectance, using a polynomial fit.
///
/// * `eta` - Relative index of refraction.
pub fn fresnel_moment1(eta: Float) -> Float {
    let eta2 = eta * eta;
    let eta3 = eta2 * eta;
    let eta4 = eta3 * eta;
    let eta5 = eta4 * eta;
    if eta < 1.0 {
        0.45966 - 1.73965 * eta + 3.37668 * eta2 - 3.904945 * eta3 + 2.49277 * eta4
            - 0.68441 * eta5
    } else {
        -4.61686 + 11.1136 * eta - 10.4646 * eta2 + 5.11455 * eta3 - 1.27198 * eta4
            + 0.12746 * eta5
    }
}

// ---- Tests ----

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use proptest::prelude::*;

    #[test]
    fn dielectric_normal_incidence() {
        // ((1.5 - 1) / (1.5 + 1))^2 = 0.04
        assert!(approx_eq!(f32, fr_dielectric(1.0, 1.5), 0.04, epsilon = 1e-5));
        // Same value from below.
        assert!(approx_eq!(f32, fr_dielectric(-1.0, 1.0 / 1.5), 0.04, epsilon = 1e-5));
    }

    #[test]
    fn dielectric_total_internal_reflection() {
        assert_eq!(fr_dielectric(-0.1, 1.5), 1.0);
    }

    #[test]
    fn conductor_matches_dielectric_without_absorption() {
        for cos in [0.2, 0.5, 0.9, 1.0] {
            let a = fr_complex(cos, Complex::new(1.5, 0.0));
            let b = fr_dielectric(cos, 1.5);
            assert!(approx_eq!(f32, a, b, epsilon = 1e-4));
        }
    }

    proptest! {
        #[test]
        fn reflectance_in_unit_interval(cos in -1.0f32..1.0f32, eta in 1.0f32..3.0f32, k in 0.0f32..5.0f32) {
            let r = fr_dielectric(cos, eta);
            prop_assert!((0.0..=1.0).contains(&r));
            let c = fr_complex(abs(cos), Complex::new(eta, k));
            prop_assert!((0.0..=1.0 + 1e-4).contains(&c));
        }
    }
}
