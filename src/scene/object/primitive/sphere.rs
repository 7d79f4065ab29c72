use crate::{
    math::point::Point,
    render::{intersection::HitRecord, ray::Ray},
};

#[derive(Clone, Debug, PartialEq)]
pub struct Sphere {
    pub center: Point,
    pub radius: f64,
    pub material_index: usize,
}

impl Sphere {
    /// Discriminants below this count as a miss, tangent rays included.
    const DISCRIMINANT_EPSILON: f64 = 1.0e-5;

    pub fn new(center: Point, radius: f64, material_index: usize) -> Self {
        Self {
            center,
            radius,
            material_index,
        }
    }

    /// Distance to the nearer root, if it lies in the ray's range.
    fn intersection_time(&self, ray: &Ray) -> Option<f64> {
        let center_to_origin = ray.origin() - self.center;

        let b = 2. * ray.direction().dot(center_to_origin);
        let c = center_to_origin.dot(center_to_origin) - self.radius * self.radius;

        let discriminant = b * b - 4. * c;
        if discriminant < Self::DISCRIMINANT_EPSILON {
            return None;
        }

        let t = (-b - discriminant.sqrt()) / 2.;
        ray.in_range(t).then_some(t)
    }

    pub fn hit(&self, ray: &Ray) -> Option<HitRecord> {
        let t = self.intersection_time(ray)?;
        let point = ray.position(t);

        Some(HitRecord::new(
            point,
            (point - self.center) / self.radius,
            t,
            self.material_index,
        ))
    }

    pub fn does_hit(&self, ray: &Ray) -> bool {
        self.intersection_time(ray).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        assert_approx_eq_low_prec,
        math::{tuple::Tuple, vector::Vector},
    };

    #[test]
    fn ray_from_origin_hits_distant_sphere() {
        let sphere = Sphere::new(Point::new(0., 0., 100.), 50., 3);
        let ray = Ray::new(Point::zero(), Vector::unit_z());

        let hit = sphere.hit(&ray).unwrap();
        assert!(hit.did_hit);
        assert_approx_eq_low_prec!(hit.t, 50.);
        assert_approx_eq_low_prec!(hit.point, Point::new(0., 0., 50.));
        assert_approx_eq_low_prec!(hit.normal, Vector::new(0., 0., -1.));
        assert_eq!(hit.material_index, 3);
    }

    #[test]
    fn ray_misses_sphere() {
        let sphere = Sphere::new(Point::zero(), 1., 0);
        let ray = Ray::new(Point::new(0., 2., -5.), Vector::unit_z());

        assert!(sphere.hit(&ray).is_none());
        assert!(!sphere.does_hit(&ray));
    }

    #[test]
    fn tangent_ray_is_a_miss() {
        let sphere = Sphere::new(Point::zero(), 1., 0);
        let ray = Ray::new(Point::new(0., 1., -5.), Vector::unit_z());

        assert!(sphere.hit(&ray).is_none());
    }

    #[test]
    fn sphere_behind_ray_is_a_miss() {
        let sphere = Sphere::new(Point::zero(), 1., 0);
        let ray = Ray::new(Point::new(0., 0., 5.), Vector::unit_z());

        assert!(!sphere.does_hit(&ray));
    }

    #[test]
    fn hit_beyond_ray_max_is_rejected() {
        let sphere = Sphere::new(Point::new(0., 0., 10.), 1., 0);
        let short = Ray::with_bounds(Point::zero(), Vector::unit_z(), 0.0001, 8.);
        let long = Ray::with_bounds(Point::zero(), Vector::unit_z(), 0.0001, 9.);

        assert!(sphere.hit(&short).is_none());
        assert!(sphere.hit(&long).is_some());
    }

    #[test]
    fn zero_direction_is_a_miss() {
        let sphere = Sphere::new(Point::zero(), 1., 0);
        let ray = Ray::new(Point::new(0., 0., -5.), Vector::zero());

        assert!(sphere.hit(&ray).is_none());
    }

    #[test]
    fn normals_are_unit_and_outward() {
        let sphere = Sphere::new(Point::new(1., -2., 3.), 2.5, 0);
        let origin = Point::new(-4., 3., -6.);

        for (dx, dy) in [(0., 0.), (0.3, -0.2), (-0.5, 0.4), (0.9, 0.9), (-1.1, -0.6)] {
            let target = sphere.center + Vector::new(dx, dy, 0.);
            let ray = Ray::new(origin, (target - origin).normalize());
            let hit = sphere.hit(&ray).unwrap();

            assert_approx_eq_low_prec!(hit.normal.magnitude(), 1.);
            assert!(hit.normal.dot(hit.point - sphere.center) > 0.);
        }
    }
}
