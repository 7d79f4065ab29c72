use crate::math::{point::Point, vector::Vector};

/// Result of a ray query against the scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitRecord {
    pub point: Point,
    /// Unit length, facing out of the surface
    pub normal: Vector,
    pub t: f64,
    pub did_hit: bool,
    pub material_index: usize,
}

impl Default for HitRecord {
    fn default() -> Self {
        Self {
            point: Point::zero(),
            normal: Vector::zero(),
            t: f64::INFINITY,
            did_hit: false,
            material_index: 0,
        }
    }
}

impl HitRecord {
    pub fn new(point: Point, normal: Vector, t: f64, material_index: usize) -> Self {
        Self {
            point,
            normal,
            t,
            did_hit: true,
            material_index,
        }
    }

    /// Folds `candidate` into the best hit so far.
    /// On equal distances the hit seen first is kept.
    pub fn closest(best: Option<HitRecord>, candidate: HitRecord) -> Option<HitRecord> {
        match best {
            Some(best) if best.t <= candidate.t => Some(best),
            _ => Some(candidate),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::tuple::Tuple;

    fn hit_at(t: f64, material_index: usize) -> HitRecord {
        HitRecord::new(Point::new(0., 0., t), -Vector::unit_z(), t, material_index)
    }

    #[test]
    fn default_record_is_a_miss_at_infinity() {
        let record = HitRecord::default();
        assert!(!record.did_hit);
        assert_eq!(record.t, f64::INFINITY);
    }

    #[test]
    fn closest_keeps_minimum_distance() {
        let best = [hit_at(5., 0), hit_at(2., 1), hit_at(7., 2)]
            .into_iter()
            .fold(None, HitRecord::closest)
            .unwrap();

        assert_eq!(best.material_index, 1);
        assert!(best.did_hit);
    }

    #[test]
    fn closest_keeps_first_on_tie() {
        let best = [hit_at(3., 0), hit_at(3., 1)]
            .into_iter()
            .fold(None, HitRecord::closest)
            .unwrap();

        assert_eq!(best.material_index, 0);
    }
}
