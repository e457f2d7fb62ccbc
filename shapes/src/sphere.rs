//! Spheres

use strata_core::geometry::*;
use strata_core::interaction::*;
use strata_core::paramset::*;
use strata_core::pbrt::*;
use strata_core::sampling::*;
use strata_core::shape::*;

/// A sphere placed directly in world space.
#[derive(Clone, Debug)]
pub struct Sphere {
    /// Center.
    pub center: Point3f,

    /// Radius of sphere.
    pub radius: Float,

    /// Indicates whether surface normals point inwards.
    pub reverse_orientation: bool,
}

impl Sphere {
    /// Create a new sphere.
    ///
    /// * `center`              - Center.
    /// * `radius`              - Radius of sphere.
    /// * `reverse_orientation` - Indicates whether surface normals should point
    ///                           inwards.
    pub fn new(center: Point3f, radius: Float, reverse_orientation: bool) -> Self {
        Self {
            center,
            radius: abs(radius),
            reverse_orientation,
        }
    }

    /// Returns the nearest parametric distance along the ray in (0, t_max].
    ///
    /// * `r` - The ray.
    fn nearest_hit(&self, r: &Ray) -> Option<Float> {
        // Solve the quadratic in double precision.
        let o = r.o - self.center;
        let (ox, oy, oz) = (o.x as f64, o.y as f64, o.z as f64);
        let (dx, dy, dz) = (r.d.x as f64, r.d.y as f64, r.d.z as f64);
        let radius = self.radius as f64;

        let a = dx * dx + dy * dy + dz * dz;
        let b = 2.0 * (dx * ox + dy * oy + dz * oz);
        let c = ox * ox + oy * oy + oz * oz - radius * radius;

        let discrim = b * b - 4.0 * a * c;
        if a == 0.0 || discrim < 0.0 {
            return None;
        }
        let root_discrim = discrim.sqrt();
        let q = if b < 0.0 {
            -0.5 * (b - root_discrim)
        } else {
            -0.5 * (b + root_discrim)
        };
        let (mut t0, mut t1) = (q / a, if q != 0.0 { c / q } else { q / a });
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }

        let t_max = r.t_max as f64;
        let t = if t0 > 0.0 { t0 } else { t1 };
        if t <= 0.0 || t > t_max {
            return None;
        }

        // Reject hits that round to the ray origin.
        let t = t as Float;
        (t > 0.0).then_some(t)
    }

    /// Returns the outward (or inward when reversed) normal at a point on the
    /// surface.
    ///
    /// * `p` - Point on the surface.
    fn normal_at(&self, p: &Point3f) -> Normal3f {
        let n = Normal3f::from((*p - self.center).normalize());
        if self.reverse_orientation {
            -n
        } else {
            n
        }
    }

    /// Projects a point onto the surface and returns it with its error bounds.
    ///
    /// * `p` - A point near the surface.
    fn refine(&self, p: &Point3f) -> (Point3f, Vector3f) {
        let mut p_obj = *p - self.center;
        let len = p_obj.length();
        if len > 0.0 {
            p_obj *= self.radius / len;
        }
        if p_obj.x == 0.0 && p_obj.y == 0.0 {
            p_obj.x = 1e-5 * self.radius;
        }
        let p_error = gamma(5) * (p_obj.abs() + Vector3f::from(self.center).abs());
        (self.center + p_obj, p_error)
    }
}

impl Shape for Sphere {
    /// Returns the shape type.
    fn get_type(&self) -> &'static str {
        "sphere"
    }

    /// Returns a bounding box in the world space.
    fn world_bound(&self) -> Bounds3f {
        let r = Vector3f::new(self.radius, self.radius, self.radius);
        Bounds3f::new(self.center - r, self.center + r)
    }

    /// Returns geometric details if a ray intersects the sphere.
    ///
    /// * `r` - The ray.
    fn intersect<'scene>(&self, r: &Ray) -> Option<Intersection<'scene>> {
        let t = self.nearest_hit(r)?;
        let (p_hit, p_error) = self.refine(&r.at(t));

        // Find parametric representation of sphere hit.
        let p_obj = p_hit - self.center;
        let mut phi = p_obj.y.atan2(p_obj.x);
        if phi < 0.0 {
            phi += TWO_PI;
        }
        let theta = safe_acos(p_obj.z / self.radius);
        let uv = Point2f::new(phi * INV_TWO_PI, theta * INV_PI);
        let dpdu = Vector3f::new(-TWO_PI * p_obj.y, TWO_PI * p_obj.x, 0.0);

        let isect = SurfaceInteraction::new(p_hit, p_error, uv, -r.d, self.normal_at(&p_hit), dpdu, r.time);
        Some(Intersection::new(t, isect))
    }

    /// Returns `true` if a ray intersects the sphere.
    ///
    /// * `r` - The ray.
    fn intersect_p(&self, r: &Ray) -> bool {
        self.nearest_hit(r).is_some()
    }

    /// Returns the surface area.
    fn area(&self) -> Float {
        2.0 * TWO_PI * self.radius * self.radius
    }

    /// Sample a point uniformly on the surface.
    ///
    /// * `u` - Sample value to use.
    fn sample_area(&self, u: &Point2f) -> (Hit, Float) {
        let (p, p_error) = self.refine(&(self.center + self.radius * uniform_sample_sphere(u)));
        let hit = Hit::on_surface(p, p_error, self.normal_at(&p));
        (hit, 1.0 / self.area())
    }

    /// Sample a point on the sphere inside the cone of directions it subtends
    /// from a reference point and return the PDF with respect to solid angle.
    ///
    /// * `hit` - Reference point.
    /// * `u`   - Sample value to use.
    fn sample_solid_angle(&self, hit: &Hit, u: &Point2f) -> (Hit, Float) {
        // Sample uniformly by area when the reference point is inside.
        let dc_sq = hit.p.distance_squared(&self.center);
        if dc_sq <= self.radius * self.radius {
            let (intr, mut pdf) = self.sample_area(u);
            let wi = intr.p - hit.p;
            if wi.length_squared() == 0.0 {
                return (intr, 0.0);
            }
            let wi = wi.normalize();
            pdf *= hit.p.distance_squared(&intr.p) / intr.n.abs_dot(&(-wi));
            return (intr, if pdf.is_infinite() { 0.0 } else { pdf });
        }

        // Compute coordinate system for sphere sampling.
        let dc = dc_sq.sqrt();
        let wc = (self.center - hit.p) / dc;
        let (wc_x, wc_y) = coordinate_system(&wc);

        // Compute θ and φ values for sample in cone.
        let sin_theta_max = self.radius / dc;
        let sin_theta_max_2 = sin_theta_max * sin_theta_max;
        let cos_theta_max = safe_sqrt(1.0 - sin_theta_max_2);
        let mut cos_theta = (cos_theta_max - 1.0) * u.x + 1.0;
        let mut sin_theta_2 = 1.0 - cos_theta * cos_theta;
        if sin_theta_max_2 < 0.00068523 {
            // Fall back to a Taylor expansion for small angles.
            sin_theta_2 = sin_theta_max_2 * u.x;
            cos_theta = (1.0 - sin_theta_2).sqrt();
        }

        // Compute angle α from center of sphere to sampled point on surface.
        let cos_alpha = sin_theta_2 / sin_theta_max + cos_theta * safe_sqrt(1.0 - sin_theta_2 / sin_theta_max_2);
        let sin_alpha = safe_sqrt(1.0 - cos_alpha * cos_alpha);
        let phi = u.y * TWO_PI;

        // Compute surface point for sampled point on sphere.
        let n_obj = spherical_direction_in_frame(sin_alpha, cos_alpha, phi, &(-wc_x), &(-wc_y), &(-wc));
        let (p, p_error) = self.refine(&(self.center + self.radius * n_obj));
        let hit = Hit::on_surface(p, p_error, self.normal_at(&p));
        (hit, uniform_cone_pdf(cos_theta_max))
    }

    /// Returns the PDF with respect to solid angle.
    ///
    /// * `hit` - The interaction hit point.
    /// * `wi`  - The incident direction.
    fn pdf_solid_angle(&self, hit: &Hit, wi: &Vector3f) -> Float {
        let dc_sq = hit.p.distance_squared(&self.center);
        if dc_sq <= self.radius * self.radius {
            // Intersect sample ray with the sphere and convert the area density.
            let ray = hit.spawn_ray(wi);
            return match self.intersect(&ray) {
                Some(it) => {
                    let pdf = hit.p.distance_squared(&it.isect.hit.p)
                        / (it.isect.hit.n.abs_dot(&(-*wi)) * self.area());
                    if pdf.is_infinite() {
                        0.0
                    } else {
                        pdf
                    }
                }
                None => 0.0,
            };
        }

        // Directions outside the subtended cone cannot reach the sphere.
        let sin_theta_max_2 = self.radius * self.radius / dc_sq;
        let cos_theta_max = safe_sqrt(1.0 - sin_theta_max_2);
        let wc = (self.center - hit.p).normalize();
        if wi.dot(&wc) < cos_theta_max {
            return 0.0;
        }
        uniform_cone_pdf(cos_theta_max)
    }
}

impl From<(&ParamSet, bool)> for Sphere {
    /// Create a `Sphere` from a parameter set and whether or not surface
    /// normal orientation is reversed.
    ///
    /// * `p` - A tuple containing the parameter set and whether or not surface
    ///         normal orientation is reversed.
    fn from(p: (&ParamSet, bool)) -> Self {
        let (params, reverse_orientation) = p;
        let mut radius = params.find_one_float("radius", 1.0);
        if radius <= 0.0 {
            warn!("Sphere radius {} is not positive. Using 1.", radius);
            radius = 1.0;
        }
        let center = params.find_one_point3f("center", Point3f::ZERO);
        Self::new(center, radius, reverse_orientation)
    }
}

// ---- Tests ----

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use proptest::prelude::*;

    #[test]
    fn ray_from_outside_hits_near_side() {
        let sphere = Sphere::new(Point3f::new(0.0, 0.0, 5.0), 1.0, false);
        let ray = Ray::new(Point3f::ZERO, Vector3f::new(0.0, 0.0, 1.0), INFINITY, 0.0, None);
        let it = sphere.intersect(&ray).expect("hit");
        assert!(approx_eq!(f32, it.t, 4.0, epsilon = 1e-5));
        assert!(approx_eq!(f32, it.isect.hit.n.z, -1.0, epsilon = 1e-5));
        assert!(sphere.intersect_p(&ray));
    }

    #[test]
    fn ray_from_inside_hits_far_side() {
        let sphere = Sphere::new(Point3f::ZERO, 2.0, true);
        let ray = Ray::new(Point3f::ZERO, Vector3f::new(1.0, 0.0, 0.0), INFINITY, 0.0, None);
        let it = sphere.intersect(&ray).expect("hit");
        assert!(approx_eq!(f32, it.t, 2.0, epsilon = 1e-5));

        // Reversed orientation points the normal inwards.
        assert!(approx_eq!(f32, it.isect.hit.n.x, -1.0, epsilon = 1e-5));
    }

    #[test]
    fn misses_and_respects_t_max() {
        let sphere = Sphere::new(Point3f::new(0.0, 0.0, 5.0), 1.0, false);
        let away = Ray::new(Point3f::ZERO, Vector3f::new(0.0, 0.0, -1.0), INFINITY, 0.0, None);
        assert!(sphere.intersect(&away).is_none());

        let short = Ray::new(Point3f::ZERO, Vector3f::new(0.0, 0.0, 1.0), 3.0, 0.0, None);
        assert!(!sphere.intersect_p(&short));
    }

    // Stay clear of the cone's silhouette where the containment test rounds.
    prop_compose! {
        fn cone_sample()(x in 0.0f32..0.95f32, y in 0.0f32..1.0f32) -> Point2f {
            Point2f::new(x, y)
        }
    }

    proptest! {
        #[test]
        fn cone_samples_lie_on_visible_surface(u in cone_sample()) {
            let sphere = Sphere::new(Point3f::new(0.0, 0.0, 4.0), 1.0, false);
            let reference = Hit::new_minimal(Point3f::ZERO, 0.0, None);
            let (p, pdf) = sphere.sample_solid_angle(&reference, &u);

            prop_assert!(approx_eq!(f32, p.p.distance(&sphere.center), 1.0, epsilon = 1e-3));
            prop_assert!(p.n.dot(&(reference.p - p.p)) >= -1e-3);

            let wi = (p.p - reference.p).normalize();
            prop_assert!(approx_eq!(f32, sphere.pdf_solid_angle(&reference, &wi), pdf, epsilon = 1e-3));
        }
    }
}
