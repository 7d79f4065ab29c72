use crate::{
    math::{point::Point, vector::Vector},
    render::{intersection::HitRecord, ray::Ray},
};

/// Which side of a triangle is ignored by shading queries.
/// Occlusion queries never cull, so culled faces still cast shadows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CullMode {
    #[default]
    None,
    /// Skips rays arriving against the normal
    FrontFace,
    /// Skips rays travelling along the normal
    BackFace,
}

impl CullMode {
    /// `normal_dot_dir` is the cosine between the face normal and the ray direction.
    pub fn culls(self, normal_dot_dir: f64) -> bool {
        match self {
            CullMode::None => false,
            CullMode::FrontFace => normal_dot_dir < 0.,
            CullMode::BackFace => normal_dot_dir > 0.,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Triangle {
    pub v0: Point,
    pub v1: Point,
    pub v2: Point,
    pub normal: Vector,
    pub material_index: usize,
    pub cull_mode: CullMode,
}

impl Triangle {
    /// The normal follows the winding `v0 -> v1 -> v2`.
    pub fn new(v0: Point, v1: Point, v2: Point, cull_mode: CullMode, material_index: usize) -> Self {
        let normal = Self::face_normal(v0, v1, v2);
        Self::with_normal(v0, v1, v2, normal, cull_mode, material_index)
    }

    pub fn with_normal(
        v0: Point,
        v1: Point,
        v2: Point,
        normal: Vector,
        cull_mode: CullMode,
        material_index: usize,
    ) -> Self {
        Self {
            v0,
            v1,
            v2,
            normal,
            material_index,
            cull_mode,
        }
    }

    /// Zero for degenerate triangles.
    pub fn face_normal(v0: Point, v1: Point, v2: Point) -> Vector {
        (v1 - v0).cross(v2 - v0).normalize()
    }

    pub fn centroid(&self) -> Point {
        self.v0 + ((self.v1 - self.v0) + (self.v2 - self.v0)) / 3.
    }

    fn intersect(&self, ray: &Ray, apply_culling: bool) -> Option<(f64, Point)> {
        let normal_dot_dir = self.normal.dot(ray.direction());
        if apply_culling && self.cull_mode.culls(normal_dot_dir) {
            return None;
        }

        let t = (self.centroid() - ray.origin()).dot(self.normal) / normal_dot_dir;
        if !ray.in_range(t) {
            return None;
        }

        let point = ray.position(t);
        let inside = [(self.v0, self.v1), (self.v1, self.v2), (self.v2, self.v0)]
            .into_iter()
            .all(|(from, to)| self.normal.dot((to - from).cross(point - from)) >= 0.);

        inside.then_some((t, point))
    }

    pub fn hit(&self, ray: &Ray) -> Option<HitRecord> {
        self.intersect(ray, true)
            .map(|(t, point)| HitRecord::new(point, self.normal, t, self.material_index))
    }

    pub fn does_hit(&self, ray: &Ray) -> bool {
        self.intersect(ray, false).is_some()
    }
}
