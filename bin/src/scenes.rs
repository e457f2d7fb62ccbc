//! Built-in scenes

use clap::ValueEnum;
use std::sync::Arc;
use strata_core::geometry::*;
use strata_core::light::*;
use strata_core::material::*;
use strata_core::medium::*;
use strata_core::paramset::*;
use strata_core::pbrt::*;
use strata_core::primitive::*;
use strata_core::primitives::*;
use strata_core::scene::*;
use strata_core::shape::*;
use strata_core::spectrum::*;
use strata_lights::*;
use strata_materials::*;
use strata_media::*;
use strata_shapes::*;

/// Names of the built-in scenes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum SceneName {
    /// Coated diffuse and coated conductor spheres.
    Coated,

    /// Diffuse and glass spheres inside scattering fog.
    Fog,

    /// Spheres covered in hair fibers with increasing melanin.
    Hair,

    /// Smooth and thin dielectric spheres in front of a diffuse sphere.
    Glass,

    /// A translucent subsurface sphere next to a diffuse one.
    Subsurface,
}

/// A scene with the camera placement that frames it.
pub struct SceneDescription {
    /// The scene.
    pub scene: Scene,

    /// Parameters for the perspective camera.
    pub camera_params: ParamSet,

    /// Medium the camera sits in.
    pub camera_medium: Option<ArcMedium>,
}

/// Collects primitives and lights for a scene.
struct SceneBuilder<'a> {
    /// Rendering options used for reporting.
    options: &'a Options,

    /// Shapes with their materials.
    primitives: Vec<ArcPrimitive>,

    /// Light sources.
    lights: Vec<ArcLight>,
}

impl<'a> SceneBuilder<'a> {
    /// Create an empty `SceneBuilder`.
    ///
    /// * `options` - Rendering options.
    fn new(options: &'a Options) -> Self {
        Self {
            options,
            primitives: vec![],
            lights: vec![],
        }
    }

    /// Returns a material by name.
    ///
    /// * `name`   - Material name.
    /// * `params` - Material parameters.
    fn material(&self, name: &str, params: &ParamSet) -> Option<ArcMaterial> {
        let material = create_material(name, params, self.options);
        params.report_unused();
        material
    }

    /// Returns a diffuse material with the given reflectance.
    ///
    /// * `kd` - Reflectance.
    fn matte(&self, kd: Spectrum) -> Option<ArcMaterial> {
        let mut params = ParamSet::new();
        params.add_spectrum("Kd", &[kd]);
        self.material("matte", &params)
    }

    /// Adds a sphere.
    ///
    /// * `center`           - Center.
    /// * `radius`           - Radius.
    /// * `material`         - Material. `None` marks a medium boundary.
    /// * `medium_interface` - Media inside and outside the sphere.
    fn sphere(
        &mut self,
        center: Point3f,
        radius: Float,
        material: Option<ArcMaterial>,
        medium_interface: MediumInterface,
    ) {
        let shape = sphere_shape(center, radius);
        self.primitives
            .push(Arc::new(GeometricPrimitive::new(shape, material, None, medium_interface)));
    }

    /// Adds a spherical diffuse emitter.
    ///
    /// * `center` - Center.
    /// * `radius` - Radius.
    /// * `l`      - Emitted radiance.
    /// * `medium` - Medium surrounding the emitter.
    fn emitter(&mut self, center: Point3f, radius: Float, l: Spectrum, medium: Option<ArcMedium>) {
        let shape = sphere_shape(center, radius);
        let mut params = ParamSet::new();
        params.add_spectrum("L", &[l]);
        let light = Arc::new(DiffuseAreaLight::from((&params, medium.clone(), Arc::clone(&shape))));

        let area_light: ArcAreaLight = light.clone();
        let material = self.matte(Spectrum::ZERO);
        self.primitives.push(Arc::new(GeometricPrimitive::new(
            shape,
            material,
            Some(area_light),
            MediumInterface::from(medium),
        )));
        self.lights.push(light);
    }

    /// Adds a uniform environment light.
    ///
    /// * `l` - Emitted radiance.
    fn sky(&mut self, l: Spectrum) {
        let mut params = ParamSet::new();
        params.add_spectrum("L", &[l]);
        self.lights.push(Arc::new(UniformInfiniteLight::from(&params)));
    }

    /// Adds the ground and the lights shared by all scenes.
    ///
    /// * `medium` - Medium surrounding the key light.
    fn stage(&mut self, medium: Option<ArcMedium>) {
        let ground = self.matte(Spectrum::new(0.4));
        self.sphere(Point3f::new(0.0, -100.0, 0.0), 100.0, ground, MediumInterface::vacuum());
        self.emitter(Point3f::new(-3.0, 6.0, 4.0), 1.0, Spectrum::new(8.0), medium);
        self.sky(Spectrum::new(0.15));
    }

    /// Returns the scene.
    fn build(self) -> Scene {
        info!(
            "Built scene with {} primitives and {} lights",
            self.primitives.len(),
            self.lights.len()
        );
        Scene::new(Arc::new(PrimitiveList::new(self.primitives)), self.lights)
    }
}

/// Returns a sphere shape.
///
/// * `center` - Center.
/// * `radius` - Radius.
fn sphere_shape(center: Point3f, radius: Float) -> ArcShape {
    let mut params = ParamSet::new();
    params.add_point3f("center", &[center]);
    params.add_float("radius", &[radius]);
    Arc::new(Sphere::from((&params, false)))
}

/// Returns the default camera placement.
fn camera_params() -> ParamSet {
    let mut params = ParamSet::new();
    params.add_point3f("eye", &[Point3f::new(0.0, 1.2, 6.0)]);
    params.add_point3f("look", &[Point3f::new(0.0, 0.8, 0.0)]);
    params.add_point3f("up", &[Point3f::new(0.0, 1.0, 0.0)]);
    params.add_float("fov", &[35.0]);
    params
}

/// Builds a built-in scene. When `bsdf_file` is given, the right-hand sphere
/// uses the measured BSDF in that file instead.
///
/// * `name`      - Scene name.
/// * `bsdf_file` - Optional measured BSDF table.
/// * `options`   - Rendering options.
pub fn build_scene(name: SceneName, bsdf_file: Option<&str>, options: &Options) -> SceneDescription {
    let mut builder = SceneBuilder::new(options);
    let mut camera_medium = None;

    let left = Point3f::new(-1.2, 1.0, 0.0);
    let right = Point3f::new(1.2, 1.0, 0.0);
    let mut right_material = None;

    match name {
        SceneName::Coated => {
            builder.stage(None);

            let mut params = ParamSet::new();
            params.add_spectrum("reflectance", &[Spectrum::from_rgb(0.8, 0.25, 0.1)]);
            params.add_float("roughness", &[0.05]);
            let material = builder.material("coateddiffuse", &params);
            builder.sphere(left, 1.0, material, MediumInterface::vacuum());

            let mut params = ParamSet::new();
            params.add_float("interface.roughness", &[0.1]);
            params.add_float("conductor.roughness", &[0.2]);
            right_material = builder.material("coatedconductor", &params);
        }
        SceneName::Fog => {
            let mut params = ParamSet::new();
            params.add_spectrum("sigma_a", &[Spectrum::new(0.02)]);
            params.add_spectrum("sigma_s", &[Spectrum::from_rgb(0.08, 0.1, 0.12)]);
            params.add_float("g", &[0.4]);
            let fog: ArcMedium = Arc::new(HomogeneousMedium::from((&params, 1.0)));

            // Everything in view sits inside the fog boundary.
            builder.sphere(Point3f::ZERO, 12.0, None, MediumInterface::new(Some(Arc::clone(&fog)), None));
            builder.stage(Some(Arc::clone(&fog)));
            camera_medium = Some(fog);

            let material = builder.matte(Spectrum::from_rgb(0.2, 0.5, 0.3));
            builder.sphere(left, 1.0, material, MediumInterface::vacuum());

            let mut params = ParamSet::new();
            params.add_float("eta", &[1.5]);
            right_material = builder.material("dielectric", &params);
        }
        SceneName::Hair => {
            builder.stage(None);

            for (i, eumelanin) in [0.3, 1.3, 8.0].iter().enumerate() {
                let mut params = ParamSet::new();
                params.add_float("eumelanin", &[*eumelanin]);
                let material = builder.material("hair", &params);
                let center = Point3f::new(-1.6 + 1.6 * i as Float, 0.7, 0.0);
                builder.sphere(center, 0.7, material, MediumInterface::vacuum());
            }
        }
        SceneName::Glass => {
            builder.stage(None);

            let backdrop = builder.matte(Spectrum::from_rgb(0.2, 0.4, 0.8));
            builder.sphere(Point3f::new(0.0, 1.0, -3.0), 1.0, backdrop, MediumInterface::vacuum());

            let mut params = ParamSet::new();
            params.add_float("eta", &[1.5]);
            let material = builder.material("dielectric", &params);
            builder.sphere(left, 1.0, material, MediumInterface::vacuum());

            right_material = builder.material("thindielectric", &params);
        }
        SceneName::Subsurface => {
            builder.stage(None);

            let mut params = ParamSet::new();
            params.add_spectrum("mfp", &[Spectrum::from_rgb(0.2, 0.1, 0.05)]);
            params.add_spectrum("reflectance", &[Spectrum::from_rgb(0.9, 0.6, 0.5)]);
            params.add_float("roughness", &[0.1]);
            let material = builder.material("subsurface", &params);
            builder.sphere(left, 1.0, material, MediumInterface::vacuum());

            right_material = builder.matte(Spectrum::from_rgb(0.9, 0.6, 0.5));
        }
    }

    if let Some(path) = bsdf_file {
        let mut params = ParamSet::new();
        params.add_string("filename", &[path.to_string()]);
        right_material = builder.material("measured", &params);
    }
    if right_material.is_some() {
        builder.sphere(right, 1.0, right_material, MediumInterface::vacuum());
    }

    SceneDescription {
        scene: builder.build(),
        camera_params: camera_params(),
        camera_medium,
    }
}

// ---- Tests ----

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_scene_has_lights_and_geometry() {
        let options = Options::new(0, 1, true, false, None);
        for name in SceneName::value_variants() {
            let description = build_scene(*name, None, &options);
            assert_eq!(description.scene.lights.len(), 2, "{:?}", name);
            assert_eq!(description.scene.infinite_lights.len(), 1, "{:?}", name);
            assert!(description.scene.world_bound.p_max.y > 1.0, "{:?}", name);
        }
    }

    #[test]
    fn fog_camera_sits_in_the_medium() {
        let options = Options::new(0, 1, true, false, None);
        assert!(build_scene(SceneName::Fog, None, &options).camera_medium.is_some());
        assert!(build_scene(SceneName::Coated, None, &options).camera_medium.is_none());
    }

    #[test]
    fn unreadable_measured_file_falls_back() {
        let options = Options::new(0, 1, true, false, None);
        let description = build_scene(SceneName::Coated, Some("/nonexistent/table.bsdf"), &options);
        assert_eq!(description.scene.lights.len(), 2);
    }
}
