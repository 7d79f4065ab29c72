use thiserror::Error;

use crate::{
    math::{matrix::Matrix, point::Point, tuple::Tuple, vector::Vector},
    render::{intersection::HitRecord, ray::Ray},
};

use super::triangle::{CullMode, Triangle};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MeshError {
    #[error("index count {0} is not a multiple of three")]
    IndexCountNotMultipleOfThree(usize),
    #[error("index {index} is out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: usize, vertex_count: usize },
    #[error("expected {expected} face normals, found {found}")]
    NormalCountMismatch { expected: usize, found: usize },
}

/// Indexed triangle list sharing one material and one cull mode.
///
/// Positions and normals are kept in object space; intersection runs against
/// the transformed copies produced by [`TriangleMesh::update_transforms`].
#[derive(Clone, Debug, PartialEq)]
pub struct TriangleMesh {
    positions: Vec<Point>,
    /// One per triangle
    normals: Vec<Vector>,
    indices: Vec<usize>,
    pub material_index: usize,
    pub cull_mode: CullMode,

    translation: Vector,
    yaw: f64,
    scale: Vector,

    transformed_positions: Vec<Point>,
    transformed_normals: Vec<Vector>,
}

impl TriangleMesh {
    /// Face normals are derived from the triangle winding.
    pub fn new(
        positions: Vec<Point>,
        indices: Vec<usize>,
        cull_mode: CullMode,
        material_index: usize,
    ) -> Result<Self, MeshError> {
        Self::validate_indices(&indices, positions.len())?;
        let normals = Self::calculate_normals(&positions, &indices);
        Self::with_normals(positions, normals, indices, cull_mode, material_index)
    }

    pub fn with_normals(
        positions: Vec<Point>,
        normals: Vec<Vector>,
        indices: Vec<usize>,
        cull_mode: CullMode,
        material_index: usize,
    ) -> Result<Self, MeshError> {
        Self::validate_indices(&indices, positions.len())?;
        if normals.len() != indices.len() / 3 {
            return Err(MeshError::NormalCountMismatch {
                expected: indices.len() / 3,
                found: normals.len(),
            });
        }

        let degenerate = normals.iter().filter(|n| n.magnitude_squared() == 0.).count();
        if degenerate > 0 {
            log::warn!("mesh has {degenerate} degenerate triangles, they will never be hit");
        }

        let mut mesh = Self {
            positions,
            normals,
            indices,
            ..Self::empty(cull_mode, material_index)
        };
        mesh.update_transforms();
        Ok(mesh)
    }

    /// Mesh without triangles, filled with [`TriangleMesh::append_triangle`].
    pub fn empty(cull_mode: CullMode, material_index: usize) -> Self {
        Self {
            positions: Vec::new(),
            normals: Vec::new(),
            indices: Vec::new(),
            material_index,
            cull_mode,
            translation: Vector::zero(),
            yaw: 0.,
            scale: Vector::new(1., 1., 1.),
            transformed_positions: Vec::new(),
            transformed_normals: Vec::new(),
        }
    }

    fn validate_indices(indices: &[usize], vertex_count: usize) -> Result<(), MeshError> {
        if indices.len() % 3 != 0 {
            return Err(MeshError::IndexCountNotMultipleOfThree(indices.len()));
        }
        match indices.iter().find(|&&index| index >= vertex_count) {
            Some(&index) => Err(MeshError::IndexOutOfRange {
                index,
                vertex_count,
            }),
            None => Ok(()),
        }
    }

    fn calculate_normals(positions: &[Point], indices: &[usize]) -> Vec<Vector> {
        indices
            .chunks_exact(3)
            .map(|face| {
                Triangle::face_normal(positions[face[0]], positions[face[1]], positions[face[2]])
            })
            .collect()
    }

    /// Adds a triangle with its own vertices; its material and cull mode are
    /// replaced by the mesh's.
    pub fn append_triangle(&mut self, triangle: &Triangle) {
        let start = self.positions.len();
        self.positions
            .extend([triangle.v0, triangle.v1, triangle.v2]);
        self.indices.extend([start, start + 1, start + 2]);
        self.normals.push(triangle.normal);
        self.update_transforms();
    }

    pub fn translate(&mut self, translation: Vector) {
        self.translation = translation;
    }

    pub fn rotate_y(&mut self, yaw: f64) {
        self.yaw = yaw;
    }

    pub fn scale(&mut self, scale: Vector) {
        self.scale = scale;
    }

    /// Scales first, then rotates, then translates.
    pub fn transformation(&self) -> Matrix {
        Matrix::scaling(self.scale.x(), self.scale.y(), self.scale.z())
            * Matrix::rotation_y(self.yaw)
            * Matrix::translation_vec(self.translation)
    }

    /// A negative scale determinant reverses the winding of every face.
    fn is_mirrored(&self) -> bool {
        self.scale.x() * self.scale.y() * self.scale.z() < 0.
    }

    /// Regenerates the transformed positions and normals.
    /// Normals go through the inverse scale so non-uniform scaling keeps them perpendicular.
    pub fn update_transforms(&mut self) {
        let transformation = self.transformation();
        let normal_transformation = Matrix::scaling(
            1. / self.scale.x(),
            1. / self.scale.y(),
            1. / self.scale.z(),
        ) * Matrix::rotation_y(self.yaw);

        self.transformed_positions = self
            .positions
            .iter()
            .map(|&p| transformation.transform_point(p))
            .collect();
        self.transformed_normals = self
            .normals
            .iter()
            .map(|&n| normal_transformation.transform_vector(n).normalize())
            .collect();
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn transformed_positions(&self) -> &[Point] {
        &self.transformed_positions
    }

    pub fn transformed_normals(&self) -> &[Vector] {
        &self.transformed_normals
    }

    /// World-space triangles carrying the mesh's material and cull mode.
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        let mirrored = self.is_mirrored();
        self.indices
            .chunks_exact(3)
            .zip(self.transformed_normals.iter())
            .map(move |(face, &normal)| {
                let (second, third) = if mirrored {
                    (face[2], face[1])
                } else {
                    (face[1], face[2])
                };
                Triangle::with_normal(
                    self.transformed_positions[face[0]],
                    self.transformed_positions[second],
                    self.transformed_positions[third],
                    normal,
                    self.cull_mode,
                    self.material_index,
                )
            })
    }

    pub fn hit(&self, ray: &Ray) -> Option<HitRecord> {
        self.triangles()
            .filter_map(|triangle| triangle.hit(ray))
            .fold(None, HitRecord::closest)
    }

    pub fn does_hit(&self, ray: &Ray) -> bool {
        self.triangles().any(|triangle| triangle.does_hit(ray))
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use super::*;
    use crate::assert_approx_eq_low_prec;

    /// Two parallel quads facing -z, at z = 0 and z = 2.
    fn two_quads(cull_mode: CullMode) -> TriangleMesh {
        let positions = vec![
            Point::new(-1., 1., 0.),
            Point::new(1., 1., 0.),
            Point::new(1., -1., 0.),
            Point::new(-1., -1., 0.),
            Point::new(-1., 1., 2.),
            Point::new(1., 1., 2.),
            Point::new(1., -1., 2.),
            Point::new(-1., -1., 2.),
        ];
        let indices = vec![4, 5, 6, 4, 6, 7, 0, 1, 2, 0, 2, 3];
        TriangleMesh::new(positions, indices, cull_mode, 7).unwrap()
    }

    #[test]
    fn normals_are_computed_per_triangle() {
        let mesh = two_quads(CullMode::None);

        assert_eq!(mesh.transformed_normals().len(), mesh.triangle_count());
        for normal in mesh.transformed_normals() {
            assert_approx_eq_low_prec!(*normal, Vector::new(0., 0., -1.));
        }
    }

    #[test]
    fn hit_returns_closest_triangle_regardless_of_order() {
        let mesh = two_quads(CullMode::None);
        let ray = Ray::new(Point::new(0.2, 0.3, -5.), Vector::unit_z());

        let hit = mesh.hit(&ray).unwrap();
        assert_approx_eq_low_prec!(hit.t, 5.);
        assert_eq!(hit.material_index, 7);
    }

    #[test]
    fn mesh_cull_mode_applies_to_every_triangle() {
        let mesh = two_quads(CullMode::FrontFace);
        let ray = Ray::new(Point::new(0.2, 0.3, -5.), Vector::unit_z());

        assert!(mesh.hit(&ray).is_none());
        assert!(mesh.does_hit(&ray));
    }

    #[test]
    fn miss_outside_mesh() {
        let mesh = two_quads(CullMode::None);
        let ray = Ray::new(Point::new(3., 0., -5.), Vector::unit_z());

        assert!(mesh.hit(&ray).is_none());
        assert!(!mesh.does_hit(&ray));
    }

    #[test]
    fn transforms_move_positions_and_normals() {
        let mut mesh = two_quads(CullMode::None);
        mesh.scale(Vector::new(2., 2., 2.));
        mesh.rotate_y(FRAC_PI_2);
        mesh.translate(Vector::new(0., 0., 10.));
        mesh.update_transforms();

        // the quads now face +x, at x = 0 and x = -4, centered on z = 10
        for normal in mesh.transformed_normals() {
            assert_approx_eq_low_prec!(*normal, Vector::unit_x());
        }
        let ray = Ray::new(Point::new(-10., 0.5, 10.5), Vector::unit_x());
        let hit = mesh.hit(&ray).unwrap();
        assert_approx_eq_low_prec!(hit.t, 6.);
    }

    #[test]
    fn mirrored_mesh_is_still_hit() {
        let positions = vec![
            Point::new(0., 1., 0.),
            Point::new(1., 0., 0.),
            Point::new(-1., 0., 0.),
        ];
        let mut mesh = TriangleMesh::new(positions, vec![0, 1, 2], CullMode::None, 0).unwrap();
        let ray = Ray::new(Point::new(0.2, 0.25, -2.), Vector::unit_z());
        assert_approx_eq_low_prec!(mesh.hit(&ray).unwrap().t, 2.);

        mesh.scale(Vector::new(-1., 1., 1.));
        mesh.update_transforms();

        let hit = mesh.hit(&ray).unwrap();
        assert_approx_eq_low_prec!(hit.t, 2.);
        assert_approx_eq_low_prec!(hit.normal, -Vector::unit_z());
        assert!(mesh.does_hit(&ray));

        mesh.scale(Vector::new(-1., -1., -1.));
        mesh.update_transforms();
        let from_behind = Ray::new(Point::new(0.2, -0.25, 2.), -Vector::unit_z());
        assert_approx_eq_low_prec!(mesh.hit(&from_behind).unwrap().t, 2.);
    }

    #[test]
    fn append_triangle_extends_mesh() {
        let mut mesh = TriangleMesh::new(Vec::new(), Vec::new(), CullMode::None, 1).unwrap();
        mesh.append_triangle(&Triangle::new(
            Point::new(0., 1., 0.),
            Point::new(1., 0., 0.),
            Point::new(-1., 0., 0.),
            CullMode::BackFace,
            9,
        ));

        assert_eq!(mesh.triangle_count(), 1);
        let hit = mesh
            .hit(&Ray::new(Point::new(0., 0.5, -2.), Vector::unit_z()))
            .unwrap();
        assert_eq!(hit.material_index, 1);
    }

    #[test]
    fn rejects_bad_index_count() {
        let positions = vec![Point::zero(), Point::zero()];
        assert_eq!(
            TriangleMesh::new(positions, vec![0, 1], CullMode::None, 0),
            Err(MeshError::IndexCountNotMultipleOfThree(2))
        );
    }

    #[test]
    fn rejects_out_of_range_index() {
        let positions = vec![Point::zero(), Point::zero(), Point::zero()];
        assert_eq!(
            TriangleMesh::new(positions, vec![0, 1, 3], CullMode::None, 0),
            Err(MeshError::IndexOutOfRange {
                index: 3,
                vertex_count: 3
            })
        );
    }

    #[test]
    fn rejects_mismatched_normals() {
        let positions = vec![Point::zero(), Point::zero(), Point::zero()];
        assert_eq!(
            TriangleMesh::with_normals(positions, Vec::new(), vec![0, 1, 2], CullMode::None, 0),
            Err(MeshError::NormalCountMismatch {
                expected: 1,
                found: 0
            })
        );
    }
}
