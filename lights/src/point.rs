//! Point Light Source

use strata_core::geometry::*;
use strata_core::interaction::*;
use strata_core::light::*;
use strata_core::medium::*;
use strata_core::paramset::*;
use strata_core::pbrt::*;
use strata_core::spectrum::*;

/// Implements an isotropic point light source that emits the same amount of
/// light in all directions.
#[derive(Clone)]
pub struct PointLight {
    /// Participating medium.
    pub medium_interface: MediumInterface,

    /// Position.
    pub p_light: Point3f,

    /// Intensity.
    pub intensity: Spectrum,
}

impl PointLight {
    /// Returns a new `PointLight`.
    ///
    /// * `p_light`          - Position.
    /// * `medium_interface` - Participating medium.
    /// * `intensity`        - Intensity.
    pub fn new(p_light: Point3f, medium_interface: MediumInterface, intensity: Spectrum) -> Self {
        Self {
            medium_interface,
            p_light,
            intensity,
        }
    }
}

impl Light for PointLight {
    /// Returns the type of light.
    fn light_type(&self) -> LightType {
        LightType::DELTA_POSITION
    }

    /// Return the radiance arriving at an interaction point.
    ///
    /// * `hit` - The interaction hit point.
    /// * `_u`  - Unused.
    fn sample_li(&self, hit: &Hit, _u: &Point2f) -> Option<LiSample> {
        let d2 = self.p_light.distance_squared(&hit.p);
        if d2 == 0.0 {
            return None;
        }
        let wi = (self.p_light - hit.p).normalize();

        let p1 = Hit::new_minimal(self.p_light, hit.time, Some(self.medium_interface.clone()));
        let vis = VisibilityTester::new(hit.clone(), p1);
        Some(LiSample::new(self.intensity / d2, wi, 1.0, vis))
    }

    /// Return the total emitted power.
    fn power(&self) -> Spectrum {
        FOUR_PI * self.intensity
    }

    /// Returns zero since no direction can be sampled by chance.
    ///
    /// * `_hit` - Unused.
    /// * `_wi`  - Unused.
    fn pdf_li(&self, _hit: &Hit, _wi: &Vector3f) -> Float {
        0.0
    }
}

impl From<(&ParamSet, Option<ArcMedium>)> for PointLight {
    /// Create a `PointLight` from given parameter set and medium.
    ///
    /// * `p` - A tuple containing the parameter set and medium.
    fn from(p: (&ParamSet, Option<ArcMedium>)) -> Self {
        let (params, medium) = p;

        let intensity = params.find_one_spectrum("I", Spectrum::ONE);
        let sc = params.find_one_spectrum("scale", Spectrum::ONE);
        let p = params.find_one_point3f("from", Point3f::ZERO);
        Self::new(p, MediumInterface::from(medium), intensity * sc)
    }
}

// ---- Tests ----

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    #[test]
    fn falls_off_with_inverse_square() {
        let light = PointLight::new(Point3f::new(0.0, 0.0, 2.0), MediumInterface::vacuum(), Spectrum::new(8.0));
        let hit = Hit::new_minimal(Point3f::ZERO, 0.0, None);
        let s = light.sample_li(&hit, &Point2f::new(0.5, 0.5)).expect("sample");
        assert!(approx_eq!(f32, s.li[0], 2.0, epsilon = 1e-6));
        assert!(approx_eq!(f32, s.wi.z, 1.0, epsilon = 1e-6));
        assert!(light.is_delta_light());
        assert_eq!(light.pdf_li(&hit, &s.wi), 0.0);
    }
}
