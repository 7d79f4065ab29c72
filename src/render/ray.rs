use crate::math::{point::Point, vector::Vector};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    origin: Point,
    /// Expected to be unit length, callers normalize before constructing
    direction: Vector,
    min: f64,
    max: f64,
}

impl Ray {
    pub const DEFAULT_MIN: f64 = 1.0e-4;
    pub const DEFAULT_MAX: f64 = f64::MAX;

    pub fn new(origin: Point, direction: Vector) -> Self {
        Self::with_bounds(origin, direction, Self::DEFAULT_MIN, Self::DEFAULT_MAX)
    }

    pub fn with_bounds(origin: Point, direction: Vector, min: f64, max: f64) -> Self {
        Self {
            origin,
            direction,
            min,
            max,
        }
    }

    pub fn position(&self, t: f64) -> Point {
        self.origin + self.direction * t
    }

    /// Whether `t` lies in `[min, max]`. NaN never does.
    pub fn in_range(&self, t: f64) -> bool {
        (self.min..=self.max).contains(&t)
    }

    pub fn origin(&self) -> Point {
        self.origin
    }
    pub fn direction(&self) -> Vector {
        self.direction
    }
    pub fn min(&self) -> f64 {
        self.min
    }
    pub fn max(&self) -> f64 {
        self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{assert_approx_eq_low_prec, math::tuple::Tuple};

    #[test]
    fn position() {
        let ray = Ray::new(Point::new(2., 3., 4.), Vector::new(1., 0., 0.));

        assert_approx_eq_low_prec!(ray.position(0.), Point::new(2., 3., 4.));
        assert_approx_eq_low_prec!(ray.position(1.), Point::new(3., 3., 4.));
        assert_approx_eq_low_prec!(ray.position(-1.), Point::new(1., 3., 4.));
        assert_approx_eq_low_prec!(ray.position(2.5), Point::new(4.5, 3., 4.));
    }

    #[test]
    fn default_bounds() {
        let ray = Ray::new(Point::zero(), Vector::unit_z());
        assert_eq!(ray.min(), Ray::DEFAULT_MIN);
        assert_eq!(ray.max(), f64::MAX);
    }

    #[test]
    fn range_is_inclusive_and_rejects_non_finite() {
        let ray = Ray::with_bounds(Point::zero(), Vector::unit_z(), 1., 5.);

        assert!(ray.in_range(1.));
        assert!(ray.in_range(5.));
        assert!(!ray.in_range(0.5));
        assert!(!ray.in_range(5.5));
        assert!(!ray.in_range(f64::NAN));
        assert!(!Ray::new(Point::zero(), Vector::unit_z()).in_range(f64::INFINITY));
    }
}
