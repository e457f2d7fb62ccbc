//! Volumetric Path Integrator

use bumpalo::Bump;
use std::sync::Arc;
use strata_core::bssrdf::*;
use strata_core::camera::*;
use strata_core::geometry::*;
use strata_core::integrator::*;
use strata_core::light_distrib::*;
use strata_core::medium::*;
use strata_core::paramset::*;
use strata_core::pbrt::*;
use strata_core::reflection::*;
use strata_core::sampler::*;
use strata_core::sampling::*;
use strata_core::scene::*;
use strata_core::spectrum::*;
use strata_core::{stat_counter, stat_dist, stat_inc, stat_int_distribution, stat_percent, stat_register_fns};

stat_int_distribution!("Integrator/Path length", PATH_LENGTH, volpath_stats_path_length);
stat_counter!("Integrator/Volume interactions", VOLUME_INTERACTIONS, volpath_stats_volume_interactions);
stat_counter!("Integrator/Surface interactions", SURFACE_INTERACTIONS, volpath_stats_surface_interactions);
stat_percent!(
    "Integrator/Zero-radiance paths",
    ZERO_RADIANCE_PATHS,
    TOTAL_PATHS,
    volpath_stats_zero_radiance_paths
);
stat_register_fns!(
    volpath_stats_path_length,
    volpath_stats_volume_interactions,
    volpath_stats_surface_interactions,
    volpath_stats_zero_radiance_paths,
);

/// Russian roulette settings for path termination.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RussianRoulette {
    /// Paths whose throughput falls below this value may be terminated.
    pub threshold: Float,

    /// Minimum termination probability.
    pub floor: Float,

    /// Roulette only applies after this many bounces.
    pub depth: usize,
}

impl Default for RussianRoulette {
    fn default() -> Self {
        Self {
            threshold: 1.0,
            floor: 0.05,
            depth: 3,
        }
    }
}

/// Implements volumetric light transport path tracing algorithm.
pub struct VolPathIntegrator {
    /// Common data for sampler integrators.
    pub data: SamplerIntegratorData,

    /// Russian roulette settings.
    rr: RussianRoulette,

    /// Light sampling strategy.
    light_sample_strategy: LightSampleStrategy,

    /// Light distribution. Set in `preprocess()`.
    light_distribution: Option<ArcLightDistribution>,
}

impl VolPathIntegrator {
    /// Create a new `VolPathIntegrator`.
    ///
    /// * `max_depth`             - Maximum number of scattering events.
    /// * `camera`                - The camera.
    /// * `sampler`               - The sampler.
    /// * `pixel_bounds`          - Pixel bounds for the image.
    /// * `options`               - Rendering options.
    /// * `rr`                    - Russian roulette settings.
    /// * `light_sample_strategy` - Light sampling strategy.
    pub fn new(
        max_depth: usize,
        camera: ArcCamera,
        sampler: ArcSampler,
        pixel_bounds: Bounds2i,
        options: ArcOptions,
        rr: RussianRoulette,
        light_sample_strategy: LightSampleStrategy,
    ) -> Self {
        register_stats();
        Self {
            data: SamplerIntegratorData::new(max_depth, camera, sampler, pixel_bounds, options),
            rr,
            light_sample_strategy,
            light_distribution: None,
        }
    }

    /// Returns the light selection distribution at a point.
    ///
    /// * `p` - The point.
    fn light_distrib(&self, p: &Point3f) -> Option<Arc<Distribution1D>> {
        self.light_distribution.as_ref().and_then(|d| d.lookup(p))
    }

    /// Traces one path and returns the radiance along it and the number of
    /// bounces it took.
    ///
    /// * `ray`     - The camera ray.
    /// * `scene`   - The scene.
    /// * `sampler` - The sampler.
    /// * `arena`   - Scratch memory for the path.
    fn trace(&self, ray: &mut Ray, scene: &Scene, sampler: &mut dyn Sampler, arena: &Bump) -> (Spectrum, usize) {
        let max_depth = self.data.max_depth;
        let mut l = Spectrum::ZERO;
        let mut beta = Spectrum::ONE;
        let mut specular_bounce = false;

        // Radiance scaling from refraction, removed from `beta` before
        // Russian roulette.
        let mut eta_scale: Float = 1.0;

        let mut depth = 0_usize;
        loop {
            debug!("Volpath bounce {}, L = {}, beta = {}", depth, l, beta);

            // Intersect `ray` with scene.
            let isect = scene.intersect(ray);

            // Sample the participating medium, if present.
            let mut mi = None;
            if let Some(medium) = ray.medium.clone() {
                let (tr, interaction) = medium.sample(ray, sampler);
                beta *= tr;
                mi = interaction;
            }
            if beta.is_black() {
                break;
            }

            if let Some(mi) = mi {
                // Scattering inside a medium.
                if depth >= max_depth {
                    break;
                }
                stat_inc!(VOLUME_INTERACTIONS, 1);

                let distrib = self.light_distrib(&mi.hit.p);
                let vertex = ScatteringVertex::Medium {
                    hit: &mi.hit,
                    phase: &mi.phase,
                };
                l += beta * uniform_sample_one_light(&vertex, scene, sampler, true, distrib.as_deref());

                let wo = -ray.d;
                let u = sampler.get_2d();
                match mi.phase.sample_p(&wo, &u) {
                    Some(ps) if ps.pdf > 0.0 => {
                        beta *= ps.p / ps.pdf;
                        specular_bounce = false;
                        *ray = mi.spawn_ray(&ps.wi);
                    }
                    _ => break,
                }
            } else {
                // Possibly add emitted light at intersection or from the
                // environment.
                if depth == 0 || specular_bounce {
                    match isect.as_ref() {
                        Some(isect) => l += beta * isect.le(&-ray.d),
                        None => {
                            for light in scene.infinite_lights.iter() {
                                l += beta * light.le(ray);
                            }
                        }
                    }
                }

                // Terminate path if ray escaped or `max_depth` was reached.
                let isect = match isect {
                    Some(isect) if depth < max_depth => isect,
                    _ => break,
                };
                stat_inc!(SURFACE_INTERACTIONS, 1);

                // Compute scattering functions and skip over medium
                // boundaries without counting a bounce.
                let sf = isect.compute_scattering_functions(TransportMode::Radiance);
                let bsdf = match sf.bsdf {
                    Some(bsdf) => bsdf,
                    None => {
                        debug!("Skipping medium boundary at {:?}", isect.hit.p);
                        *ray = isect.hit.spawn_ray(&ray.d);
                        continue;
                    }
                };

                // Sample illumination from lights to find attenuated path
                // contribution.
                if bsdf.flags().is_non_specular() {
                    let distrib = self.light_distrib(&isect.hit.p);
                    let vertex = ScatteringVertex::Surface {
                        hit: &isect.hit,
                        ns: isect.shading.n,
                        bsdf: &bsdf,
                    };
                    let ld = beta * uniform_sample_one_light(&vertex, scene, sampler, true, distrib.as_deref());
                    debug!("Sampled direct lighting Ld = {}", ld);
                    l += ld;
                }

                // Sample BSDF to get new path direction. The sample's own
                // f/pdf ratio is used, which also holds for BSDFs whose `pdf()`
                // is only proportional to the sampled density.
                let wo = -ray.d;
                let uc = sampler.get_1d();
                let u = sampler.get_2d();
                let bs = match bsdf.sample_f(&wo, uc, &u, TransportMode::Radiance, BxDFReflTransFlags::ALL) {
                    Some(bs) if bs.pdf > 0.0 => bs,
                    _ => break,
                };
                beta *= bs.f * bs.wi.abs_dot_normal(&isect.shading.n) / bs.pdf;
                debug_assert!(!beta.y().is_infinite());
                specular_bounce = bs.is_specular();
                if bs.is_specular() && bs.is_transmission() {
                    eta_scale *= sqr(bs.eta);
                }
                *ray = isect.hit.spawn_ray(&bs.wi);

                // Account for attenuated subsurface scattering, if applicable.
                if let Some(bssrdf) = sf.bssrdf.as_ref().filter(|_| bs.is_transmission()) {
                    // Importance sample the BSSRDF.
                    let u1 = sampler.get_1d();
                    let u2 = sampler.get_2d();
                    let BSSRDFSample {
                        s,
                        pdf,
                        si: pi,
                        bsdf: pi_bsdf,
                    } = match bssrdf.sample_s(scene, u1, &u2, arena) {
                        Some(sample) => sample,
                        None => break,
                    };
                    beta *= s / pdf;
                    debug_assert!(!beta.y().is_infinite());

                    // Account for the attenuated direct subsurface scattering
                    // component.
                    let distrib = self.light_distrib(&pi.hit.p);
                    let vertex = ScatteringVertex::Surface {
                        hit: &pi.hit,
                        ns: pi.shading.n,
                        bsdf: &pi_bsdf,
                    };
                    l += beta * uniform_sample_one_light(&vertex, scene, sampler, true, distrib.as_deref());

                    // Account for the indirect subsurface scattering component.
                    let uc = sampler.get_1d();
                    let u = sampler.get_2d();
                    let bs = match pi_bsdf.sample_f(&pi.hit.wo, uc, &u, TransportMode::Radiance, BxDFReflTransFlags::ALL) {
                        Some(bs) if bs.pdf > 0.0 => bs,
                        _ => break,
                    };
                    beta *= bs.f * bs.wi.abs_dot_normal(&pi.shading.n) / bs.pdf;
                    debug_assert!(!beta.y().is_infinite());
                    specular_bounce = bs.is_specular();
                    *ray = pi.hit.spawn_ray(&bs.wi);
                }
            }

            // Possibly terminate the path with Russian roulette. Refraction
            // scaling is factored out of the throughput.
            let rr_beta = beta * eta_scale;
            let rr_max = rr_beta.max_component_value();
            if rr_max < self.rr.threshold && depth > self.rr.depth {
                let q = max(self.rr.floor, 1.0 - rr_max);
                if sampler.get_1d() < q {
                    break;
                }
                beta /= 1.0 - q;
                debug_assert!(!beta.y().is_infinite());
            }

            depth += 1;
        }

        (l, depth)
    }
}

impl SamplerIntegrator for VolPathIntegrator {
    fn get_data(&self) -> &SamplerIntegratorData {
        &self.data
    }

    fn preprocess(&mut self, scene: &Scene) {
        self.light_distribution = Some(create_light_sample_distribution(
            self.light_sample_strategy,
            scene,
            &self.data.options,
        ));
    }

    fn li(&self, ray: &mut Ray, scene: &Scene, sampler: &mut dyn Sampler, arena: &Bump, _depth: usize) -> Spectrum {
        let (l, depth) = self.trace(ray, scene, sampler, arena);

        stat_dist!(PATH_LENGTH, depth as i64);
        stat_inc!(ZERO_RADIANCE_PATHS, l.is_black() as i64);
        stat_inc!(TOTAL_PATHS, 1);
        l
    }
}

/// Returns the pixel bounds given by `pixelbounds` as `x0 x1 y0 y1`, clipped
/// to the film. Malformed or degenerate bounds are reported and the full film
/// is used.
///
/// * `params`       - Parameter set.
/// * `film_bounds`  - Sample bounds of the film.
/// * `options`      - Rendering options.
pub fn pixel_bounds_param(params: &ParamSet, film_bounds: Bounds2i, options: &Options) -> Bounds2i {
    let pb = params.find_int("pixelbounds");
    match pb.len() {
        0 => film_bounds,
        4 => {
            let bounds = film_bounds.intersect(&Bounds2i::new(Point2i::new(pb[0], pb[2]), Point2i::new(pb[1], pb[3])));
            if bounds.is_empty() {
                options.error("Degenerate \"pixelbounds\" specified. Using the full film.");
                film_bounds
            } else {
                bounds
            }
        }
        n => {
            options.error(&format!(
                "Expected four values for \"pixelbounds\" parameter. Got {}.",
                n
            ));
            film_bounds
        }
    }
}

impl From<(&ParamSet, ArcSampler, ArcCamera, ArcOptions)> for VolPathIntegrator {
    /// Create a `VolPathIntegrator` from given parameter set, sampler, camera
    /// and rendering options.
    ///
    /// * `p` - A tuple containing parameter set, sampler, camera and options.
    fn from(p: (&ParamSet, ArcSampler, ArcCamera, ArcOptions)) -> Self {
        let (params, sampler, camera, options) = p;

        let max_depth = params.find_one_int("maxdepth", 5);
        let max_depth = if max_depth < 0 {
            options.error(&format!("\"maxdepth\" {} must not be negative. Using 5.", max_depth));
            5
        } else {
            max_depth as usize
        };
        let max_depth = if options.quick_render { min(max_depth, 3) } else { max_depth };

        let pixel_bounds = pixel_bounds_param(params, camera.get_film().get_sample_bounds(), &options);

        let default = RussianRoulette::default();
        let rr = RussianRoulette {
            threshold: params.find_one_float("rrthreshold", default.threshold),
            floor: clamp(params.find_one_float("rrfloor", default.floor), 0.0, 1.0),
            depth: max(0, params.find_one_int("rrdepth", default.depth as Int)) as usize,
        };

        let strategy = params.find_one_string("lightsamplestrategy", String::from("spatial"));
        let light_sample_strategy = LightSampleStrategy::parse(&strategy, &options);

        info!(
            "Volumetric path tracer: maxdepth {}, pixel bounds {:?}, {:?}, light sampling '{}'",
            max_depth, pixel_bounds, rr, light_sample_strategy
        );
        Self::new(max_depth, camera, sampler, pixel_bounds, options, rr, light_sample_strategy)
    }
}

// ---- Tests ----

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use strata_cameras::*;
    use strata_core::film::*;
    use strata_core::light::*;
    use strata_core::material::*;
    use strata_core::medium::*;
    use strata_core::microfacet::*;
    use strata_core::primitive::*;
    use strata_core::primitives::*;
    use strata_core::shape::*;
    use strata_lights::*;
    use strata_materials::*;
    use strata_media::*;
    use strata_samplers::*;
    use strata_shapes::*;

    fn options() -> ArcOptions {
        Arc::new(Options::new(0, 1, true, false, None))
    }

    fn integrator(params: &ParamSet, scene: &Scene) -> VolPathIntegrator {
        let film = Film::new(&Point2i::new(8, 8), "test.png", 1.0);
        let camera: ArcCamera = Arc::new(PerspectiveCamera::new(
            Point3f::new(0.0, 0.0, 5.0),
            Point3f::ZERO,
            Vector3f::new(0.0, 1.0, 0.0),
            30.0,
            film,
            None,
        ));
        let sampler: ArcSampler = Arc::new(RandomSampler::new(1, 0));
        let mut integrator = VolPathIntegrator::from((params, sampler, camera, options()));
        integrator.preprocess(scene);
        integrator
    }

    fn sphere(radius: Float, material: Option<ArcMaterial>, mi: MediumInterface) -> ArcPrimitive {
        let shape: ArcShape = Arc::new(Sphere::new(Point3f::ZERO, radius, false));
        Arc::new(GeometricPrimitive::new(shape, material, None, mi))
    }

    fn sphere_at(center: Point3f, radius: Float, material: Option<ArcMaterial>) -> ArcPrimitive {
        let shape: ArcShape = Arc::new(Sphere::new(center, radius, false));
        Arc::new(GeometricPrimitive::new(shape, material, None, MediumInterface::vacuum()))
    }

    fn matte(albedo: Float) -> Option<ArcMaterial> {
        Some(Arc::new(MatteMaterial::new(Spectrum::new(albedo), Spectrum::ZERO, 0.0)))
    }

    fn point_light(p: Point3f) -> ArcLight {
        Arc::new(PointLight::new(p, MediumInterface::vacuum(), Spectrum::ONE))
    }

    /// Averages `n` radiance estimates along a ray.
    fn mean_radiance(
        integrator: &VolPathIntegrator,
        scene: &Scene,
        o: Point3f,
        d: Vector3f,
        medium: Option<ArcMedium>,
        n: usize,
    ) -> Spectrum {
        let mut sampler = RandomSampler::new(n, 17);
        let arena = Bump::new();
        let mut sum = Spectrum::ZERO;
        for i in 0..n {
            sampler.start_pixel_sample(&Point2i::new(3, 5), i);
            let mut ray = Ray::new(o, d, INFINITY, 0.0, medium.clone());
            sum += integrator.li(&mut ray, scene, &mut sampler, &arena, 0);
        }
        sum / n as Float
    }

    #[test]
    fn single_bounce_matches_point_light_irradiance() {
        let light_p = Point3f::new(2.0, 0.0, 3.0);
        let scene = Scene::new(
            sphere(1.0, matte(0.5), MediumInterface::vacuum()),
            vec![point_light(light_p)],
        );
        let mut params = ParamSet::new();
        params.add_int("maxdepth", &[1]);
        let integrator = integrator(&params, &scene);

        // The camera ray hits the sphere at (0, 0, 1) with normal +z.
        let l = mean_radiance(
            &integrator,
            &scene,
            Point3f::new(0.0, 0.0, 5.0),
            Vector3f::new(0.0, 0.0, -1.0),
            None,
            1000,
        );

        let to_light = light_p - Point3f::new(0.0, 0.0, 1.0);
        let cos_theta = to_light.normalize().z;
        let expected = cos_theta / to_light.length_squared() * 0.5 * INV_PI;
        assert!(approx_eq!(Float, l[0], expected, epsilon = 1e-3 * expected));
        assert!(approx_eq!(Float, l[1], expected, epsilon = 1e-3 * expected));
    }

    #[test]
    fn escaped_rays_see_infinite_lights() {
        let scene = Scene::new(
            sphere(1.0, matte(0.5), MediumInterface::vacuum()),
            vec![Arc::new(UniformInfiniteLight::new(Spectrum::new(0.25))) as ArcLight],
        );
        let integrator = integrator(&ParamSet::new(), &scene);
        let l = mean_radiance(
            &integrator,
            &scene,
            Point3f::new(0.0, 0.0, 5.0),
            Vector3f::new(0.0, 1.0, 0.0),
            None,
            4,
        );
        assert!(approx_eq!(Float, l[0], 0.25, epsilon = 1e-6));
    }

    #[test]
    fn black_surface_reflects_nothing() {
        // A black surface has no valid BSDF sample and reflects nothing.
        let scene = Scene::new(
            sphere(1.0, matte(0.0), MediumInterface::vacuum()),
            vec![Arc::new(UniformInfiniteLight::new(Spectrum::ONE)) as ArcLight],
        );
        let integrator = integrator(&ParamSet::new(), &scene);
        let l = mean_radiance(
            &integrator,
            &scene,
            Point3f::new(0.0, 0.0, 5.0),
            Vector3f::new(0.0, 0.0, -1.0),
            None,
            64,
        );
        assert!(l.is_black());
    }

    #[test]
    fn medium_boundaries_are_free_bounces() {
        let light_p = Point3f::new(2.0, 0.0, 3.0);
        let surface = sphere(1.0, matte(0.5), MediumInterface::vacuum());
        let boundary = sphere(2.0, None, MediumInterface::vacuum());

        let mut params = ParamSet::new();
        params.add_int("maxdepth", &[1]);

        let plain = Scene::new(Arc::clone(&surface), vec![point_light(light_p)]);
        let bounded = Scene::new(
            Arc::new(PrimitiveList::new(vec![surface, boundary])),
            vec![point_light(light_p)],
        );

        let o = Point3f::new(0.0, 0.0, 5.0);
        let d = Vector3f::new(0.0, 0.0, -1.0);
        let l_plain = mean_radiance(&integrator(&params, &plain), &plain, o, d, None, 16);
        let l_bounded = mean_radiance(&integrator(&params, &bounded), &bounded, o, d, None, 16);
        assert!(!l_plain.is_black());
        assert!(approx_eq!(Float, l_plain[0], l_bounded[0], epsilon = 1e-4 * l_plain[0]));
    }

    #[test]
    fn absorbing_medium_attenuates_radiance() {
        let light_p = Point3f::new(2.0, 0.0, 3.0);
        let fog: ArcMedium = Arc::new(HomogeneousMedium::new(Spectrum::new(0.3), Spectrum::ZERO, 0.0));
        let surface = sphere(1.0, matte(0.5), MediumInterface::vacuum());
        let boundary = sphere(2.0, None, MediumInterface::new(Some(fog), None));

        let mut params = ParamSet::new();
        params.add_int("maxdepth", &[1]);

        let plain = Scene::new(Arc::clone(&surface), vec![point_light(light_p)]);
        let foggy = Scene::new(
            Arc::new(PrimitiveList::new(vec![surface, boundary])),
            vec![point_light(light_p)],
        );

        let o = Point3f::new(0.0, 0.0, 5.0);
        let d = Vector3f::new(0.0, 0.0, -1.0);
        let l_plain = mean_radiance(&integrator(&params, &plain), &plain, o, d, None, 16);
        let l_foggy = mean_radiance(&integrator(&params, &foggy), &foggy, o, d, None, 16);
        assert!(l_foggy[0] > 0.0);
        assert!(l_foggy[0] < l_plain[0]);
    }

    #[test]
    fn russian_roulette_is_unbiased() {
        // Light and viewer inside a closed diffuse sphere, so paths bounce
        // until the depth limit.
        let scene = Scene::new(
            sphere(1.0, matte(0.5), MediumInterface::vacuum()),
            vec![point_light(Point3f::ZERO)],
        );

        let mut no_rr = ParamSet::new();
        no_rr.add_int("maxdepth", &[8]);
        no_rr.add_float("rrthreshold", &[0.0]);
        let mut rr = ParamSet::new();
        rr.add_int("maxdepth", &[8]);
        rr.add_float("rrthreshold", &[1.0]);
        rr.add_int("rrdepth", &[1]);

        let o = Point3f::ZERO;
        let d = Vector3f::new(0.0, 0.0, 1.0);
        let n = 20_000;
        let l_no_rr = mean_radiance(&integrator(&no_rr, &scene), &scene, o, d, None, n);
        let l_rr = mean_radiance(&integrator(&rr, &scene), &scene, o, d, None, n);
        assert!(l_no_rr[0] > 0.5 * INV_PI);
        assert!((l_rr[0] - l_no_rr[0]).abs() < 0.03 * l_no_rr[0]);
    }

    #[test]
    fn roulette_ignores_refraction_scaling() {
        // Two glass spheres under a uniform sky. Every path carries exactly the
        // sky radiance once the refraction scaling is factored out, so no path
        // may be terminated by roulette while inside the second sphere.
        let glass: ArcMaterial = Arc::new(DielectricMaterial::new(TrowbridgeReitzDistribution::new(0.0, 0.0), 1.5));
        let scene = Scene::new(
            Arc::new(PrimitiveList::new(vec![
                sphere_at(Point3f::ZERO, 1.0, Some(Arc::clone(&glass))),
                sphere_at(Point3f::new(0.0, 0.0, -3.0), 1.0, Some(glass)),
            ])),
            vec![Arc::new(UniformInfiniteLight::new(Spectrum::ONE)) as ArcLight],
        );
        let mut params = ParamSet::new();
        params.add_int("maxdepth", &[100]);
        params.add_float("rrthreshold", &[0.5]);
        params.add_int("rrdepth", &[0]);
        let integrator = integrator(&params, &scene);

        let mut sampler = RandomSampler::new(1, 3);
        let arena = Bump::new();
        for i in 0..256 {
            sampler.start_pixel_sample(&Point2i::new(1, 1), i);
            let mut ray = Ray::new(Point3f::new(0.0, 0.0, 5.0), Vector3f::new(0.0, 0.0, -1.0), INFINITY, 0.0, None);
            let l = integrator.li(&mut ray, &scene, &mut sampler, &arena, 0);
            assert!(approx_eq!(Float, l[0], 1.0, epsilon = 1e-3), "sample {} radiance {}", i, l);
        }
    }

    #[test]
    fn subsurface_light_leaves_through_exit_points() {
        // A smooth boundary reflects the point light nowhere, so all radiance
        // comes from light scattered below the surface.
        let material: ArcMaterial = Arc::new(SubsurfaceMaterial::new(
            TrowbridgeReitzDistribution::new(0.0, 0.0),
            1.33,
            Spectrum::new(0.8),
            Spectrum::new(0.05),
        ));
        let scene = Scene::new(
            sphere(1.0, Some(material), MediumInterface::vacuum()),
            vec![point_light(Point3f::new(2.0, 0.0, 3.0))],
        );
        let mut params = ParamSet::new();
        params.add_int("maxdepth", &[1]);
        let integrator = integrator(&params, &scene);

        let l = mean_radiance(
            &integrator,
            &scene,
            Point3f::new(0.0, 0.0, 5.0),
            Vector3f::new(0.0, 0.0, -1.0),
            None,
            512,
        );
        assert!(l[0] > 0.0);
        assert!(!l.has_nans() && !l.has_infs());
    }

    #[test]
    fn coated_surface_estimate_is_independent_of_light_selection() {
        let material: ArcMaterial = Arc::new(CoatedDiffuseMaterial::new(
            Spectrum::new(0.6),
            TrowbridgeReitzDistribution::new(0.0, 0.0),
            0.01,
            1.5,
            Spectrum::ZERO,
            0.0,
            LayeredBxDFConfig::default(),
            0,
        ));
        let scene = Scene::new(
            sphere(1.0, Some(material), MediumInterface::vacuum()),
            vec![
                point_light(Point3f::new(2.0, 0.0, 3.0)),
                Arc::new(PointLight::new(
                    Point3f::new(-1.0, 2.0, 3.0),
                    MediumInterface::vacuum(),
                    Spectrum::new(3.0),
                )) as ArcLight,
                Arc::new(UniformInfiniteLight::new(Spectrum::new(0.2))) as ArcLight,
            ],
        );

        let o = Point3f::new(0.0, 0.0, 5.0);
        let d = Vector3f::new(0.0, 0.0, -1.0);
        let estimate = |strategy: &str| {
            let mut params = ParamSet::new();
            params.add_int("maxdepth", &[1]);
            params.add_string("lightsamplestrategy", &[String::from(strategy)]);
            mean_radiance(&integrator(&params, &scene), &scene, o, d, None, 10_000)
        };
        let uniform = estimate("uniform");
        let power = estimate("power");
        assert!(uniform[0] > 0.0);
        assert!((uniform[0] - power[0]).abs() < 0.06 * power[0], "uniform {} power {}", uniform, power);
    }

    #[test]
    fn pixel_bounds_are_validated() {
        let opts = options();
        let film = Bounds2i::new(Point2i::new(0, 0), Point2i::new(64, 32));

        let mut params = ParamSet::new();
        params.add_int("pixelbounds", &[8, 16, 4, 40]);
        assert_eq!(
            pixel_bounds_param(&params, film, &opts),
            Bounds2i::new(Point2i::new(8, 4), Point2i::new(16, 32))
        );

        let mut params = ParamSet::new();
        params.add_int("pixelbounds", &[8, 16, 4]);
        assert_eq!(pixel_bounds_param(&params, film, &opts), film);

        let mut params = ParamSet::new();
        params.add_int("pixelbounds", &[100, 200, 0, 10]);
        assert_eq!(pixel_bounds_param(&params, film, &opts), film);
    }

    #[test]
    fn roulette_settings_from_parameters() {
        let scene = Scene::new(
            sphere(1.0, matte(0.5), MediumInterface::vacuum()),
            vec![point_light(Point3f::new(0.0, 0.0, 3.0))],
        );
        let mut params = ParamSet::new();
        params.add_float("rrthreshold", &[0.5]);
        params.add_float("rrfloor", &[0.1]);
        params.add_int("rrdepth", &[5]);
        params.add_string("lightsamplestrategy", &[String::from("uniform")]);
        let integrator = integrator(&params, &scene);
        assert_eq!(
            integrator.rr,
            RussianRoulette {
                threshold: 0.5,
                floor: 0.1,
                depth: 5
            }
        );
        assert_eq!(integrator.light_sample_strategy, LightSampleStrategy::Uniform);
        assert_eq!(integrator.data.max_depth, 5);
    }

    #[test]
    fn quick_render_caps_depth() {
        let film = Film::new(&Point2i::new(8, 8), "test.png", 1.0);
        let camera: ArcCamera = Arc::new(PerspectiveCamera::new(
            Point3f::new(0.0, 0.0, 5.0),
            Point3f::ZERO,
            Vector3f::new(0.0, 1.0, 0.0),
            30.0,
            film,
            None,
        ));
        let sampler: ArcSampler = Arc::new(RandomSampler::new(1, 0));
        let quick = Arc::new(Options::new(0, 1, true, true, None));
        let mut params = ParamSet::new();
        params.add_int("maxdepth", &[10]);
        let integrator = VolPathIntegrator::from((&params, sampler, camera, quick));
        assert_eq!(integrator.data.max_depth, 3);
    }
}
