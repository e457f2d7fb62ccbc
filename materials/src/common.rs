//! Common

#[cfg(test)]
use strata_core::geometry::*;
#[cfg(test)]
use strata_core::interaction::*;
use strata_core::microfacet::*;
use strata_core::paramset::*;
use strata_core::pbrt::*;
use strata_core::reflection::*;
use strata_core::spectrum::*;

/// Returns a Trowbridge-Reitz distribution from the `roughness`,
/// `uroughness`, `vroughness` and `remaproughness` parameters.
///
/// * `params`            - Parameter set.
/// * `default_roughness` - Roughness used when none is given.
pub(crate) fn roughness_distribution(params: &ParamSet, default_roughness: Float) -> TrowbridgeReitzDistribution {
    prefixed_roughness_distribution(params, "", default_roughness)
}

/// Same as `roughness_distribution()` for one layer of a layered material,
/// e.g. `interface.roughness`.
///
/// * `params`            - Parameter set.
/// * `prefix`            - Parameter name prefix.
/// * `default_roughness` - Roughness used when none is given.
pub(crate) fn prefixed_roughness_distribution(
    params: &ParamSet,
    prefix: &str,
    default_roughness: Float,
) -> TrowbridgeReitzDistribution {
    let roughness = params.find_one_float(&format!("{}roughness", prefix), default_roughness);
    let u_roughness = params.find_one_float(&format!("{}uroughness", prefix), roughness);
    let v_roughness = params.find_one_float(&format!("{}vroughness", prefix), roughness);
    let remap = params.find_one_bool("remaproughness", true);

    let (alpha_x, alpha_y) = if remap {
        (
            TrowbridgeReitzDistribution::roughness_to_alpha(u_roughness),
            TrowbridgeReitzDistribution::roughness_to_alpha(v_roughness),
        )
    } else {
        (u_roughness, v_roughness)
    };
    TrowbridgeReitzDistribution::new(alpha_x, alpha_y)
}

/// Returns the complex index of refraction of a metal. A `reflectance`
/// parameter takes precedence over `eta` and `k` and is converted to an
/// equivalent absorption coefficient with unit `eta`. The defaults are those
/// of copper.
///
/// * `params` - Parameter set.
/// * `prefix` - Parameter name prefix.
pub(crate) fn conductor_ior(params: &ParamSet, prefix: &str) -> (Spectrum, Spectrum) {
    let reflectance = params.find_spectrum("reflectance");
    if let Some(r) = reflectance.first() {
        let r = r.clamp(0.0, 0.9999);
        let k = r.map(|v| 2.0 * v.sqrt() / (1.0 - v).sqrt());
        return (Spectrum::ONE, k);
    }
    let eta = params.find_one_spectrum(&format!("{}eta", prefix), COPPER_ETA);
    let k = params.find_one_spectrum(&format!("{}k", prefix), COPPER_K);
    (eta, k)
}

/// Index of refraction of copper.
pub(crate) const COPPER_ETA: Spectrum = Spectrum::from_rgb(0.200438, 0.924033, 1.10221);

/// Absorption coefficient of copper.
pub(crate) const COPPER_K: Spectrum = Spectrum::from_rgb(3.91295, 2.45285, 2.14219);

/// Returns the layered evaluator settings read from `maxdepth`, `nsamples`,
/// `twosided` and `pdfisotropicweight`. Unusable values are reported and
/// replaced with defaults.
///
/// * `params`  - Parameter set.
/// * `options` - Rendering options.
pub(crate) fn layered_config(params: &ParamSet, options: &Options) -> LayeredBxDFConfig {
    let default = LayeredBxDFConfig::default();
    LayeredBxDFConfig {
        max_depth: params.find_one_int("maxdepth", default.max_depth as Int).max(0) as usize,
        n_samples: params.find_one_int("nsamples", default.n_samples as Int).max(0) as usize,
        two_sided: params.find_one_bool("twosided", default.two_sided),
        pdf_isotropic_weight: params.find_one_float("pdfisotropicweight", default.pdf_isotropic_weight),
        ..default
    }
    .validated(options)
}

/// Returns the seed for the random walks of layered materials.
///
/// * `options` - Rendering options.
pub(crate) fn layered_seed(options: &Options) -> u64 {
    options.seed as u32 as u64
}

/// Reads the index of refraction from `eta`. A non-positive value is
/// reported and replaced with `default`.
///
/// * `params`  - Parameter set.
/// * `options` - Rendering options.
/// * `default` - Default index of refraction.
pub(crate) fn index_of_refraction(params: &ParamSet, options: &Options, default: Float) -> Float {
    let eta = params.find_one_float("eta", default);
    if eta > 0.0 {
        eta
    } else {
        options.error(&format!("Index of refraction {} must be positive. Using {}.", eta, default));
        default
    }
}

/// Returns a surface interaction at the origin facing +z, seen from above.
#[cfg(test)]
pub(crate) fn test_interaction() -> SurfaceInteraction<'static> {
    SurfaceInteraction::new(
        Point3f::ZERO,
        Vector3f::ZERO,
        Point2f::new(0.5, 0.5),
        Vector3f::new(0.0, 0.0, 1.0),
        Normal3f::new(0.0, 0.0, 1.0),
        Vector3f::new(1.0, 0.0, 0.0),
        0.0,
    )
}

// ---- Tests ----

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    #[test]
    fn roughness_is_remapped_by_default() {
        let mut params = ParamSet::new();
        params.add_float("roughness", &[0.25]);
        let distrib = roughness_distribution(&params, 0.0);
        assert!(approx_eq!(Float, distrib.alpha_x(), 0.5, epsilon = 1e-6));
        assert!(approx_eq!(Float, distrib.alpha_y(), 0.5, epsilon = 1e-6));
    }

    #[test]
    fn anisotropic_roughness_without_remapping() {
        let mut params = ParamSet::new();
        params.add_float("uroughness", &[0.1]);
        params.add_float("vroughness", &[0.3]);
        params.add_bool("remaproughness", &[false]);
        let distrib = roughness_distribution(&params, 0.0);
        assert!(approx_eq!(Float, distrib.alpha_x(), 0.1, epsilon = 1e-6));
        assert!(approx_eq!(Float, distrib.alpha_y(), 0.3, epsilon = 1e-6));
    }

    #[test]
    fn invalid_layered_settings_fall_back_to_defaults() {
        let options = Options::new(0, 1, true, false, None);
        let mut params = ParamSet::new();
        params.add_int("maxdepth", &[0]);
        params.add_int("nsamples", &[4]);
        params.add_float("pdfisotropicweight", &[2.0]);
        let config = layered_config(&params, &options);
        assert_eq!(config.max_depth, 10);
        assert_eq!(config.n_samples, 4);
        assert!(approx_eq!(Float, config.pdf_isotropic_weight, 0.1));
    }

    #[test]
    fn non_positive_eta_uses_default() {
        let options = Options::new(0, 1, true, false, None);
        let mut params = ParamSet::new();
        params.add_float("eta", &[-1.0]);
        assert!(approx_eq!(Float, index_of_refraction(&params, &options, 1.5), 1.5));
    }
}
