//! Perspective Camera

use strata_core::camera::*;
use strata_core::film::*;
use strata_core::geometry::*;
use strata_core::medium::*;
use strata_core::paramset::*;
use strata_core::pbrt::*;

/// A pinhole perspective camera.
pub struct PerspectiveCamera {
    /// Camera position.
    pub eye: Point3f,

    /// Unit viewing direction.
    pub forward: Vector3f,

    /// Unit image plane x-axis in world space, scaled by the half extent of
    /// the screen window.
    pub right: Vector3f,

    /// Unit image plane y-axis in world space, scaled by the half extent of
    /// the screen window.
    pub up: Vector3f,

    /// The film to capture the rendered image.
    pub film: Film,

    /// Scattering medium the camera lies in.
    pub medium: Option<ArcMedium>,
}

impl PerspectiveCamera {
    /// Create a new perspective camera.
    ///
    /// * `eye`    - Camera position.
    /// * `look`   - Point the camera looks at.
    /// * `up`     - Up direction.
    /// * `fov`    - The field-of-view angle in degrees along the shorter image
    ///              axis.
    /// * `film`   - The film to capture the rendered image.
    /// * `medium` - Scattering medium the camera lies in.
    pub fn new(eye: Point3f, look: Point3f, up: Vector3f, fov: Float, film: Film, medium: Option<ArcMedium>) -> Self {
        let forward = (look - eye).normalize();
        let mut right = up.normalize().cross(&forward);
        if right.length_squared() == 0.0 {
            warn!("\"up\" vector and viewing direction passed to PerspectiveCamera are pointing in the same direction. Using a default frame.");
            right = coordinate_system(&forward).0;
        }
        let right = right.normalize();
        let up = forward.cross(&right);

        // Scale the image plane axes to the screen window at z = 1.
        let res = film.full_resolution;
        let aspect = res.x as Float / max(1, res.y) as Float;
        let tan_half_fov = (radians(clamp(fov, 1e-3, 179.0)) / 2.0).tan();
        let (sx, sy) = if aspect > 1.0 {
            (aspect * tan_half_fov, tan_half_fov)
        } else {
            (tan_half_fov, tan_half_fov / aspect)
        };

        Self {
            eye,
            forward,
            right: right * sx,
            up: up * sy,
            film,
            medium,
        }
    }
}

impl Camera for PerspectiveCamera {
    /// Returns a ray through the film sample point with unit weight.
    ///
    /// * `sample` - The sample.
    fn generate_ray(&self, sample: &CameraSample) -> Option<(Ray, Float)> {
        let res = self.film.full_resolution;
        if res.x <= 0 || res.y <= 0 {
            return None;
        }

        // Map raster coordinates to [-1, 1] with y pointing up.
        let x = 2.0 * sample.p_film.x / res.x as Float - 1.0;
        let y = 1.0 - 2.0 * sample.p_film.y / res.y as Float;
        let d = (self.forward + self.right * x + self.up * y).normalize();

        let ray = Ray::new(self.eye, d, INFINITY, sample.time, self.medium.clone());
        Some((ray, 1.0))
    }

    /// Returns the film.
    fn get_film(&self) -> &Film {
        &self.film
    }
}

impl From<(&ParamSet, Film, Option<ArcMedium>)> for PerspectiveCamera {
    /// Create a `PerspectiveCamera` from given parameter set, film and medium.
    ///
    /// * `p` - A tuple containing the parameter set, film and medium.
    fn from(p: (&ParamSet, Film, Option<ArcMedium>)) -> Self {
        let (params, film, medium) = p;
        let eye = params.find_one_point3f("eye", Point3f::ZERO);
        let look = params.find_one_point3f("look", Point3f::new(0.0, 0.0, 1.0));
        let up = params.find_one_point3f("up", Point3f::new(0.0, 1.0, 0.0));
        let fov = params.find_one_float("fov", 90.0);
        Self::new(eye, look, Vector3f::from(up), fov, film, medium)
    }
}

// ---- Tests ----

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    fn camera(x: Int, y: Int) -> PerspectiveCamera {
        let film = Film::new(&Point2i::new(x, y), "test.png", 1.0);
        PerspectiveCamera::new(
            Point3f::ZERO,
            Point3f::new(0.0, 0.0, 1.0),
            Vector3f::new(0.0, 1.0, 0.0),
            90.0,
            film,
            None,
        )
    }

    #[test]
    fn center_ray_looks_forward() {
        let cam = camera(4, 4);
        let (ray, weight) = cam.generate_ray(&CameraSample::new(Point2f::new(2.0, 2.0), 0.0)).expect("ray");
        assert_eq!(weight, 1.0);
        assert!(approx_eq!(f32, ray.d.z, 1.0, epsilon = 1e-6));
    }

    #[test]
    fn corners_span_field_of_view() {
        let cam = camera(8, 4);

        // Top edge of the image looks 45 degrees up.
        let (ray, _) = cam.generate_ray(&CameraSample::new(Point2f::new(4.0, 0.0), 0.0)).expect("ray");
        assert!(approx_eq!(f32, ray.d.y, ray.d.z, epsilon = 1e-5));
        assert!(ray.d.y > 0.0);

        // The wider axis is stretched by the aspect ratio.
        let (ray, _) = cam.generate_ray(&CameraSample::new(Point2f::new(8.0, 2.0), 0.0)).expect("ray");
        assert!(approx_eq!(f32, ray.d.x.abs() / ray.d.z, 2.0, epsilon = 1e-5));
    }
}
