//! Measured BxDF

use super::*;
use crate::interpolation::*;
use std::fmt;
use std::sync::Arc;

/// Scattering from measured data represented in a Fourier basis. Handles
/// both reflection and transmission and supports monochromatic or RGB data.
#[derive(Clone)]
pub struct MeasuredBxDF {
    /// The tabulated data.
    table: Arc<FourierBSDFTable>,
}

impl MeasuredBxDF {
    /// Create a new `MeasuredBxDF`.
    ///
    /// * `table` - The tabulated data.
    pub fn new(table: Arc<FourierBSDFTable>) -> Self {
        Self { table }
    }

    /// Returns the scale applied to the Fourier expansion: the cosine
    /// division plus the adjoint correction for radiance transmission.
    ///
    /// * `mu_i` - Incident zenith cosine.
    /// * `mu_o` - Outgoing zenith cosine.
    /// * `mode` - Transport mode.
    fn scale(&self, mu_i: Float, mu_o: Float, mode: TransportMode) -> Float {
        let mut scale = if mu_i != 0.0 { 1.0 / abs(mu_i) } else { 0.0 };
        if mode == TransportMode::Radiance && mu_i * mu_o > 0.0 {
            let eta = if mu_i > 0.0 { 1.0 / self.table.eta } else { self.table.eta };
            scale *= eta * eta;
        }
        scale
    }

    /// Converts interpolated coefficients to a spectrum.
    ///
    /// * `ak`      - Interpolated coefficients.
    /// * `m_max`   - Largest order in `ak`.
    /// * `y`       - Luminance already evaluated from the first channel.
    /// * `cos_phi` - Cosine of the azimuth difference.
    /// * `scale`   - Value scale.
    fn to_spectrum(&self, ak: &[Float], m_max: usize, y: Float, cos_phi: f64, scale: Float) -> Spectrum {
        if self.table.n_channels == 1 {
            return Spectrum::new(y * scale);
        }

        let stride = self.table.m_max;
        let r = fourier(&ak[stride..stride + m_max], cos_phi);
        let b = fourier(&ak[2 * stride..2 * stride + m_max], cos_phi);
        let g = 1.39829 * y - 0.100913 * b - 0.297375 * r;
        Spectrum::from_rgb(r * scale, g * scale, b * scale).clamp(0.0, INFINITY)
    }
}

impl BxDFModel for MeasuredBxDF {
    fn flags(&self) -> BxDFFlags {
        BxDFFlags::REFLECTION | BxDFFlags::TRANSMISSION | BxDFFlags::GLOSSY
    }

    fn f(&self, wo: &Vector3f, wi: &Vector3f, mode: TransportMode) -> Spectrum {
        // Find the zenith angle cosines and azimuth difference angle.
        let mu_i = cos_theta(&-*wi);
        let mu_o = cos_theta(wo);
        let cos_phi = cos_d_phi(&-*wi, wo) as f64;

        let (ak, m_max) = match self.table.interpolate_ak(mu_i, mu_o, self.table.n_channels) {
            Some(r) => r,
            None => return Spectrum::ZERO,
        };

        let y = max(0.0, fourier(&ak[0..m_max], cos_phi));
        self.to_spectrum(&ak, m_max, y, cos_phi, self.scale(mu_i, mu_o, mode))
    }

    fn sample_f(
        &self,
        wo: &Vector3f,
        _uc: Float,
        u: &Point2f,
        mode: TransportMode,
        _sample_flags: BxDFReflTransFlags,
    ) -> Option<BSDFSample> {
        // Sample zenith angle component.
        let mu_o = cos_theta(wo);
        let (mu_i, _, pdf_mu) = sample_catmull_rom_2d(
            &self.table.mu,
            &self.table.mu,
            &self.table.a0,
            &self.table.cdf,
            mu_o,
            u[1],
        );

        let (ak, m_max) = self.table.interpolate_ak(mu_i, mu_o, self.table.n_channels)?;
        if m_max == 0 {
            return None;
        }

        // Importance sample the luminance Fourier expansion.
        let (y, pdf_phi, phi) = sample_fourier(&ak[0..m_max], &self.table.recip, u[0]);
        let pdf_phi = if pdf_phi.is_nan() { 0.0 } else { pdf_phi };
        let pdf = max(0.0, pdf_phi * pdf_mu);

        // Compute the scattered direction.
        let sin2_theta_i = max(0.0, 1.0 - mu_i * mu_i);
        let norm = (sin2_theta_i / sin_2_theta(wo)).sqrt();
        let norm = if norm.is_finite() { norm } else { 0.0 };
        let (sin_phi, cos_phi) = phi.sin_cos();
        let wi = -Vector3f::new(
            norm * (cos_phi * wo.x - sin_phi * wo.y),
            norm * (sin_phi * wo.x + cos_phi * wo.y),
            mu_i,
        );

        // Renormalize to keep rounding error from compounding across bounces.
        let wi = wi.normalize();

        let f = self.to_spectrum(&ak, m_max, max(0.0, y), cos_phi as f64, self.scale(mu_i, mu_o, mode));
        let flags = if same_hemisphere(wo, &wi) {
            BxDFFlags::GLOSSY_REFLECTION
        } else {
            BxDFFlags::GLOSSY_TRANSMISSION
        };
        Some(BSDFSample::new(f, wi, pdf, flags)).filter(BSDFSample::is_valid)
    }

    fn pdf(&self, wo: &Vector3f, wi: &Vector3f, _mode: TransportMode, _sample_flags: BxDFReflTransFlags) -> Float {
        let mu_i = cos_theta(&-*wi);
        let mu_o = cos_theta(wo);
        let cos_phi = cos_d_phi(&-*wi, wo) as f64;

        let (ak, m_max) = match self.table.interpolate_ak(mu_i, mu_o, 1) {
            Some(r) => r,
            None => return 0.0,
        };
        let (weights_o, offset_o) = match self.table.get_weights_and_offset(mu_o) {
            Some(r) => r,
            None => return 0.0,
        };

        // Normalize by the total probability of the outgoing row.
        let n_mu = self.table.mu.len();
        let rho = (0..4)
            .filter(|o| weights_o[*o] != 0.0)
            .map(|o| {
                let row = (offset_o + o as isize) as usize;
                weights_o[o] * self.table.cdf[row * n_mu + n_mu - 1] * TWO_PI
            })
            .sum::<Float>();

        let y = fourier(&ak[0..m_max], cos_phi);
        if rho > 0.0 && y > 0.0 {
            y / rho
        } else {
            0.0
        }
    }
}

impl fmt::Display for MeasuredBxDF {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[ MeasuredBxDF eta: {} m_max: {} n_channels: {} n_mu: {} ]",
            self.table.eta,
            self.table.m_max,
            self.table.n_channels,
            self.table.mu.len()
        )
    }
}

// ---- Tests ----

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflection::fourier_table::tests::constant_table_bytes;
    use float_cmp::*;
    use proptest::prelude::*;

    prop_hemisphere_direction!(upper_direction);

    fn constant_bxdf(value: Float) -> MeasuredBxDF {
        let bytes = constant_table_bytes(value, 1.0);
        let table = FourierBSDFTable::from_reader(&mut bytes.as_slice()).unwrap();
        MeasuredBxDF::new(Arc::new(table))
    }

    #[test]
    fn constant_table_evaluates_everywhere() {
        let bxdf = constant_bxdf(0.1);
        let wo = Vector3f::new(0.3, 0.4, 0.866).normalize();
        let wi = Vector3f::new(-0.5, 0.1, 0.7).normalize();
        let f = bxdf.f(&wo, &wi, TransportMode::Radiance);
        assert!(approx_eq!(Float, f[0] * abs_cos_theta(&wi), 0.1, epsilon = 1e-4));

        let wt = Vector3f::new(wi.x, wi.y, -wi.z);
        let f = bxdf.f(&wo, &wt, TransportMode::Radiance);
        assert!(approx_eq!(Float, f[0] * abs_cos_theta(&wt), 0.1, epsilon = 1e-4));
        assert!(bxdf.flags().is_transmissive());
    }

    #[test]
    fn constant_table_density_is_uniform() {
        let bxdf = constant_bxdf(0.1);
        let wo = Vector3f::new(0.0, 0.6, 0.8);
        let wi = Vector3f::new(0.6, 0.0, 0.8);
        let pdf = bxdf.pdf(&wo, &wi, TransportMode::Radiance, BxDFReflTransFlags::ALL);
        assert!(approx_eq!(Float, pdf, INV_FOUR_PI, epsilon = 1e-4));
    }

    proptest! {
        #[test]
        fn sampled_density_matches_pdf(wo in upper_direction(), u in (0.01f32..0.99, 0.01f32..0.99)) {
            let bxdf = constant_bxdf(0.1);
            let mode = TransportMode::Radiance;
            if let Some(bs) = bxdf.sample_f(&wo, 0.5, &Point2f::new(u.0, u.1), mode, BxDFReflTransFlags::ALL) {
                prop_assert!(approx_eq!(Float, bs.wi.length(), 1.0, epsilon = 1e-4));
                prop_assert!(approx_eq!(Float, bs.pdf, INV_FOUR_PI, epsilon = 1e-3));
                let pdf = bxdf.pdf(&wo, &bs.wi, mode, BxDFReflTransFlags::ALL);
                prop_assert!(approx_eq!(Float, pdf, bs.pdf, epsilon = 1e-3));
            }
        }
    }
}
