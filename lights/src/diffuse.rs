//! Diffuse Area Light Source

use strata_core::geometry::*;
use strata_core::interaction::*;
use strata_core::light::*;
use strata_core::medium::*;
use strata_core::paramset::*;
use strata_core::pbrt::*;
use strata_core::shape::*;
use strata_core::spectrum::*;

/// Implements a basic area light source with uniform spatial and directional
/// radiance distribution.
#[derive(Clone)]
pub struct DiffuseAreaLight {
    /// Participating medium.
    pub medium_interface: MediumInterface,

    /// Emitted radiance.
    pub l_emit: Spectrum,

    /// Shape describing surface of the light source.
    pub shape: ArcShape,

    /// Surface area of the shape.
    pub area: Float,

    /// Indicates whether light source 2-sided.
    pub two_sided: bool,
}

impl DiffuseAreaLight {
    /// Returns a new `DiffuseAreaLight`.
    ///
    /// * `medium_interface` - Participating medium.
    /// * `l_emit`           - Emitted radiance.
    /// * `shape`            - Shape describing surface of the light source.
    /// * `two_sided`        - Indicates whether light source 2-sided.
    pub fn new(medium_interface: MediumInterface, l_emit: Spectrum, shape: ArcShape, two_sided: bool) -> Self {
        let area = shape.area();
        Self {
            medium_interface,
            l_emit,
            shape,
            area,
            two_sided,
        }
    }
}

impl AreaLight for DiffuseAreaLight {
    /// Returns emitted radiance based on `two_sided` flag.
    ///
    /// * `hit` - The interaction point.
    /// * `w`   - Direction.
    fn l(&self, hit: &Hit, w: &Vector3f) -> Spectrum {
        if self.two_sided || hit.n.dot(w) > 0.0 {
            self.l_emit
        } else {
            Spectrum::ZERO
        }
    }
}

impl Light for DiffuseAreaLight {
    /// Returns the type of light.
    fn light_type(&self) -> LightType {
        LightType::AREA
    }

    /// Return the radiance arriving at an interaction point.
    ///
    /// * `hit` - The interaction hit point.
    /// * `u`   - Sample value for Monte Carlo integration.
    fn sample_li(&self, hit: &Hit, u: &Point2f) -> Option<LiSample> {
        let (mut p_shape, pdf) = self.shape.sample_solid_angle(hit, u);
        p_shape.medium_interface = Some(self.medium_interface.clone());
        p_shape.time = hit.time;

        let wi = p_shape.p - hit.p;
        if pdf == 0.0 || wi.length_squared() == 0.0 {
            return None;
        }
        let wi = wi.normalize();
        let li = self.l(&p_shape, &(-wi));
        if li.is_black() {
            return None;
        }
        let vis = VisibilityTester::new(hit.clone(), p_shape);
        Some(LiSample::new(li, wi, pdf, vis))
    }

    /// Return the total emitted power.
    fn power(&self) -> Spectrum {
        let sides = if self.two_sided { 2.0 } else { 1.0 };
        self.l_emit * (sides * self.area * PI)
    }

    /// Returns the probability density with respect to solid angle for the
    /// light's `sample_li()`.
    ///
    /// * `hit` - The interaction hit point.
    /// * `wi`  - The incident direction.
    fn pdf_li(&self, hit: &Hit, wi: &Vector3f) -> Float {
        self.shape.pdf_solid_angle(hit, wi)
    }
}

impl From<(&ParamSet, Option<ArcMedium>, ArcShape)> for DiffuseAreaLight {
    /// Create a `DiffuseAreaLight` from given parameter set, medium and shape.
    ///
    /// * `p` - A tuple containing the parameter set, medium and shape.
    fn from(p: (&ParamSet, Option<ArcMedium>, ArcShape)) -> Self {
        let (params, medium, shape) = p;

        let l = params.find_one_spectrum("L", Spectrum::ONE);
        let sc = params.find_one_spectrum("scale", Spectrum::ONE);
        let two_sided = params.find_one_bool("twosided", false);
        if shape.area() <= 0.0 {
            warn!("Area light attached to a {} with no surface area emits nothing.", shape.get_type());
        }
        Self::new(MediumInterface::from(medium), l * sc, shape, two_sided)
    }
}

// ---- Tests ----

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use std::sync::Arc;
    use strata_shapes::Sphere;

    fn sphere_light(two_sided: bool) -> DiffuseAreaLight {
        let shape: ArcShape = Arc::new(Sphere::new(Point3f::new(0.0, 0.0, 5.0), 1.0, false));
        DiffuseAreaLight::new(MediumInterface::vacuum(), Spectrum::new(3.0), shape, two_sided)
    }

    #[test]
    fn samples_agree_with_pdf() {
        let light = sphere_light(false);
        let hit = Hit::new_minimal(Point3f::ZERO, 0.0, None);
        let s = light.sample_li(&hit, &Point2f::new(0.25, 0.6)).expect("sample");
        assert_eq!(s.li[0], 3.0);
        assert!(approx_eq!(f32, light.pdf_li(&hit, &s.wi), s.pdf, epsilon = 1e-3));
        assert!(approx_eq!(f32, light.pdf_li(&hit, &Vector3f::new(0.0, 0.0, -1.0)), 0.0));
    }

    #[test]
    fn one_sided_emission_faces_outward() {
        let light = sphere_light(false);
        let hit = Hit::on_surface(Point3f::new(0.0, 0.0, 4.0), Vector3f::ZERO, Normal3f::new(0.0, 0.0, -1.0));
        assert_eq!(light.l(&hit, &Vector3f::new(0.0, 0.0, -1.0))[0], 3.0);
        assert!(light.l(&hit, &Vector3f::new(0.0, 0.0, 1.0)).is_black());
        assert!(!sphere_light(true).l(&hit, &Vector3f::new(0.0, 0.0, 1.0)).is_black());

        let expected = 3.0 * 4.0 * PI * PI;
        assert!(approx_eq!(f32, light.power()[0], expected, epsilon = 1e-2));
    }
}
