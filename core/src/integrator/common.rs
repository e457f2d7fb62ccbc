//! Common

use crate::geometry::*;
use crate::interaction::*;
use crate::light::*;
use crate::medium::*;
use crate::pbrt::*;
use crate::reflection::*;
use crate::sampler::*;
use crate::sampling::*;
use crate::scene::*;
use crate::spectrum::*;
use std::sync::Arc;

/// A path vertex at which direct lighting is estimated.
#[derive(Clone, Copy)]
pub enum ScatteringVertex<'a> {
    /// A point on a surface with its BSDF.
    Surface {
        /// The interaction.
        hit: &'a Hit,

        /// Shading normal.
        ns: Normal3f,

        /// The BSDF.
        bsdf: &'a BSDF,
    },

    /// A point inside a participating medium with its phase function.
    Medium {
        /// The interaction.
        hit: &'a Hit,

        /// The phase function.
        phase: &'a PhaseFunction,
    },
}

impl<'a> ScatteringVertex<'a> {
    /// Returns the interaction.
    pub fn hit(&self) -> &'a Hit {
        match self {
            Self::Surface { hit, .. } => hit,
            Self::Medium { hit, .. } => hit,
        }
    }

    /// Returns the scattering function value times the cosine term and its
    /// density for a pair of directions.
    ///
    /// * `wo` - Outgoing direction.
    /// * `wi` - Incident direction.
    fn f_and_pdf(&self, wo: &Vector3f, wi: &Vector3f) -> (Spectrum, Float) {
        match self {
            Self::Surface { ns, bsdf, .. } => {
                let f = bsdf.f(wo, wi, TransportMode::Radiance) * wi.abs_dot_normal(ns);
                let pdf = bsdf.pdf(wo, wi, TransportMode::Radiance, BxDFReflTransFlags::ALL);
                (f, pdf)
            }
            Self::Medium { phase, .. } => {
                let p = phase.p(wo, wi);
                (Spectrum::new(p), p)
            }
        }
    }

    /// Samples an incident direction. Returns the scattering function value
    /// times the cosine term, the direction, the density used for the
    /// estimate, the density used for MIS weights and whether the sampled lobe
    /// is specular.
    ///
    /// * `wo` - Outgoing direction.
    /// * `uc` - 1D uniform sample.
    /// * `u`  - 2D uniform sample.
    fn sample(&self, wo: &Vector3f, uc: Float, u: &Point2f) -> Option<(Spectrum, Vector3f, Float, Float, bool)> {
        match self {
            Self::Surface { ns, bsdf, .. } => {
                let bs = bsdf.sample_f(wo, uc, u, TransportMode::Radiance, BxDFReflTransFlags::ALL)?;
                let f = bs.f * bs.wi.abs_dot_normal(ns);
                let mis_pdf = if bs.pdf_is_proportional {
                    bsdf.pdf(wo, &bs.wi, TransportMode::Radiance, BxDFReflTransFlags::ALL)
                } else {
                    bs.pdf
                };
                Some((f, bs.wi, bs.pdf, mis_pdf, bs.is_specular()))
            }
            Self::Medium { phase, .. } => {
                let ps = phase.sample_p(wo, u)?;
                Some((Spectrum::new(ps.p), ps.wi, ps.pdf, ps.pdf, false))
            }
        }
    }
}

/// Uniformly sample from one random light in the scene for direct lighting and
/// divide by the probability of having chosen it.
///
/// * `vertex`        - The path vertex.
/// * `scene`         - The scene.
/// * `sampler`       - The sampler.
/// * `handle_media`  - Indicates whether effects of volumetric attenuation
///                     should be considered.
/// * `light_distrib` - Distribution for choosing lights. Uniform if `None`.
pub fn uniform_sample_one_light(
    vertex: &ScatteringVertex,
    scene: &Scene,
    sampler: &mut dyn Sampler,
    handle_media: bool,
    light_distrib: Option<&Distribution1D>,
) -> Spectrum {
    // Randomly choose a single light to sample, `light`.
    let n_lights = scene.lights.len();
    if n_lights == 0 {
        return Spectrum::ZERO;
    }

    let u = sampler.get_1d();
    let (light_num, light_pdf) = match light_distrib {
        Some(distrib) => {
            let (light_num, pdf, _) = distrib.sample_discrete(u);
            (light_num, pdf)
        }
        None => (
            min((u * n_lights as Float) as usize, n_lights - 1),
            1.0 / n_lights as Float,
        ),
    };
    if light_pdf == 0.0 {
        return Spectrum::ZERO;
    }

    let light = &scene.lights[light_num];
    let u_light = sampler.get_2d();
    let uc_scattering = sampler.get_1d();
    let u_scattering = sampler.get_2d();
    estimate_direct(
        vertex,
        uc_scattering,
        &u_scattering,
        light,
        &u_light,
        scene,
        sampler,
        handle_media,
    ) / light_pdf
}

/// Computes the direct lighting contribution of one light with multiple
/// importance sampling of the light against the scattering function.
/// Specular lobes are left to the caller's path continuation.
///
/// * `vertex`        - The path vertex.
/// * `uc_scattering` - 1D sample used to choose a scattering lobe.
/// * `u_scattering`  - 2D sample used to sample the scattering function.
/// * `light`         - The light.
/// * `u_light`       - 2D sample used to sample the light.
/// * `scene`         - The scene.
/// * `sampler`       - The sampler.
/// * `handle_media`  - Indicates whether effects of volumetric attenuation
///                     should be considered.
#[allow(clippy::too_many_arguments)]
pub fn estimate_direct(
    vertex: &ScatteringVertex,
    uc_scattering: Float,
    u_scattering: &Point2f,
    light: &ArcLight,
    u_light: &Point2f,
    scene: &Scene,
    sampler: &mut dyn Sampler,
    handle_media: bool,
) -> Spectrum {
    let hit = vertex.hit();
    let wo = hit.wo;
    let mut ld = Spectrum::ZERO;

    // Sample light source with multiple importance sampling.
    if let Some(LiSample { li, wi, pdf: light_pdf, vis }) = light.sample_li(hit, u_light) {
        if light_pdf > 0.0 && !li.is_black() {
            // Compute scattering function value for light sample.
            let (f, scattering_pdf) = vertex.f_and_pdf(&wo, &wi);
            if !f.is_black() {
                // Compute effect of visibility for light source sample.
                let li = if handle_media {
                    li * vis.tr(scene, sampler)
                } else if vis.unoccluded(scene) {
                    li
                } else {
                    Spectrum::ZERO
                };

                // Add light's contribution to reflected radiance.
                if !li.is_black() {
                    if light.is_delta_light() {
                        ld += f * li / light_pdf;
                    } else {
                        let weight = power_heuristic(1, light_pdf, 1, scattering_pdf);
                        ld += f * li * weight / light_pdf;
                    }
                }
            }
        }
    }

    // Sample scattering function with multiple importance sampling.
    if light.is_delta_light() {
        return ld;
    }
    let (f, wi, scattering_pdf, mis_pdf, sampled_specular) = match vertex.sample(&wo, uc_scattering, u_scattering) {
        Some(sample) => sample,
        None => return ld,
    };
    if f.is_black() || scattering_pdf <= 0.0 || sampled_specular {
        return ld;
    }

    let light_pdf = light.pdf_li(hit, &wi);
    if light_pdf == 0.0 {
        return ld;
    }
    let weight = power_heuristic(1, mis_pdf, 1, light_pdf);

    // Find intersection and compute transmittance.
    let mut ray = hit.spawn_ray(&wi);
    let (light_isect, tr) = if handle_media {
        scene.intersect_tr(&mut ray, sampler)
    } else {
        (scene.intersect(&mut ray), Spectrum::ONE)
    };

    // Add light contribution from material sampling.
    let li = match light_isect {
        Some(isect) => match isect.primitive.and_then(|p| p.get_area_light()) {
            Some(area) if same_light(&area, light) => isect.le(&-wi),
            _ => Spectrum::ZERO,
        },
        None => light.le(&ray),
    };
    if !li.is_black() {
        ld += f * li * tr * weight / scattering_pdf;
    }
    ld
}

/// Returns true if an area light and a light are the same object.
///
/// * `area`  - The area light.
/// * `light` - The light.
pub fn same_light(area: &ArcAreaLight, light: &ArcLight) -> bool {
    Arc::as_ptr(area) as *const () == Arc::as_ptr(light) as *const ()
}
