use crate::{
    math::{point::Point, vector::Vector},
    render::{intersection::HitRecord, ray::Ray},
};

#[derive(Clone, Debug, PartialEq)]
pub struct Plane {
    pub origin: Point,
    /// Unit length
    pub normal: Vector,
    pub material_index: usize,
}

impl Plane {
    pub fn new(origin: Point, normal: Vector, material_index: usize) -> Self {
        Self {
            origin,
            normal: normal.normalize(),
            material_index,
        }
    }

    /// Parallel rays divide by zero, producing an infinite or NaN time
    /// that the range check rejects.
    fn intersection_time(&self, ray: &Ray) -> Option<f64> {
        let t = (self.origin - ray.origin()).dot(self.normal) / ray.direction().dot(self.normal);
        ray.in_range(t).then_some(t)
    }

    pub fn hit(&self, ray: &Ray) -> Option<HitRecord> {
        let t = self.intersection_time(ray)?;
        Some(HitRecord::new(
            ray.position(t),
            self.normal,
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
    use crate::{assert_approx_eq_low_prec, math::tuple::Tuple};

    fn ground() -> Plane {
        Plane::new(Point::zero(), Vector::unit_y(), 1)
    }

    #[test]
    fn ray_intersecting_plane_from_above() {
        let ray = Ray::new(Point::new(0., 5., 0.), Vector::new(0., -1., 0.));

        let hit = ground().hit(&ray).unwrap();
        assert_approx_eq_low_prec!(hit.t, 5.);
        assert_approx_eq_low_prec!(hit.point, Point::zero());
        assert_approx_eq_low_prec!(hit.normal, Vector::unit_y());
        assert_eq!(hit.material_index, 1);
    }

    #[test]
    fn ray_intersecting_plane_from_below_keeps_stored_normal() {
        let ray = Ray::new(Point::new(0., -1., 0.), Vector::unit_y());

        let hit = ground().hit(&ray).unwrap();
        assert_approx_eq_low_prec!(hit.t, 1.);
        assert_approx_eq_low_prec!(hit.normal, Vector::unit_y());
    }

    #[test]
    fn parallel_ray_never_hits() {
        for origin in [Point::new(0., 1., 0.), Point::new(3., -2., 7.), Point::zero()] {
            for direction in [Vector::unit_x(), Vector::unit_z(), -Vector::unit_x()] {
                let ray = Ray::new(origin, direction);
                assert!(ground().hit(&ray).is_none());
                assert!(!ground().does_hit(&ray));
            }
        }
    }

    #[test]
    fn plane_behind_ray_is_a_miss() {
        let ray = Ray::new(Point::new(0., 5., 0.), Vector::unit_y());
        assert!(!ground().does_hit(&ray));
    }

    #[test]
    fn normal_is_stored_unit_length() {
        let plane = Plane::new(Point::zero(), Vector::new(0., 4., 0.), 0);
        assert_approx_eq_low_prec!(plane.normal, Vector::unit_y());

        let ray = Ray::new(Point::new(0., 10., 0.), -Vector::unit_y());
        let hit = plane.hit(&ray).unwrap();
        assert_approx_eq_low_prec!(hit.normal.magnitude(), 1.);
        assert_approx_eq_low_prec!(hit.t, 10.);
    }

    #[test]
    fn offset_tilted_plane() {
        let normal = Vector::new(0., 1., -1.).normalize();
        let plane = Plane::new(Point::new(0., 0., 10.), normal, 0);
        let ray = Ray::new(Point::zero(), Vector::unit_z());

        let hit = plane.hit(&ray).unwrap();
        assert_approx_eq_low_prec!(hit.t, 10.);
        assert_approx_eq_low_prec!(hit.point, Point::new(0., 0., 10.));
    }
}
