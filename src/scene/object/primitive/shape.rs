use crate::render::{intersection::HitRecord, ray::Ray};

use super::{mesh::TriangleMesh, plane::Plane, sphere::Sphere, triangle::Triangle};

#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Sphere(Sphere),
    /// Infinite plane through a point
    Plane(Plane),
    Triangle(Triangle),
    Mesh(TriangleMesh),
}

impl Shape {
    pub fn hit(&self, ray: &Ray) -> Option<HitRecord> {
        match self {
            Shape::Sphere(sphere) => sphere.hit(ray),
            Shape::Plane(plane) => plane.hit(ray),
            Shape::Triangle(triangle) => triangle.hit(ray),
            Shape::Mesh(mesh) => mesh.hit(ray),
        }
    }

    /// Occlusion form of [`Shape::hit`], ignores face culling.
    pub fn does_hit(&self, ray: &Ray) -> bool {
        match self {
            Shape::Sphere(sphere) => sphere.does_hit(ray),
            Shape::Plane(plane) => plane.does_hit(ray),
            Shape::Triangle(triangle) => triangle.does_hit(ray),
            Shape::Mesh(mesh) => mesh.does_hit(ray),
        }
    }

    pub fn material_index(&self) -> usize {
        match self {
            Shape::Sphere(sphere) => sphere.material_index,
            Shape::Plane(plane) => plane.material_index,
            Shape::Triangle(triangle) => triangle.material_index,
            Shape::Mesh(mesh) => mesh.material_index,
        }
    }

    pub fn triangle_count(&self) -> usize {
        match self {
            Shape::Sphere(_) | Shape::Plane(_) => 0,
            Shape::Triangle(_) => 1,
            Shape::Mesh(mesh) => mesh.triangle_count(),
        }
    }
}

impl From<Sphere> for Shape {
    fn from(sphere: Sphere) -> Self {
        Shape::Sphere(sphere)
    }
}

impl From<Plane> for Shape {
    fn from(plane: Plane) -> Self {
        Shape::Plane(plane)
    }
}

impl From<Triangle> for Shape {
    fn from(triangle: Triangle) -> Self {
        Shape::Triangle(triangle)
    }
}

impl From<TriangleMesh> for Shape {
    fn from(mesh: TriangleMesh) -> Self {
        Shape::Mesh(mesh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        math::{point::Point, tuple::Tuple, vector::Vector},
        scene::object::primitive::triangle::CullMode,
    };

    #[test]
    fn dispatches_to_primitive() {
        let ray = Ray::new(Point::new(0., 0., -5.), Vector::unit_z());
        let sphere: Shape = Sphere::new(Point::zero(), 1., 3).into();
        let hit = sphere.hit(&ray).unwrap();

        assert_eq!(hit.material_index, 3);
        assert_eq!(sphere.material_index(), 3);
        assert!(sphere.does_hit(&ray));
    }

    #[test]
    fn culled_triangle_still_occludes() {
        let triangle: Shape = Triangle::new(
            Point::new(0., 1., 0.),
            Point::new(1., 0., 0.),
            Point::new(-1., 0., 0.),
            CullMode::FrontFace,
            0,
        )
        .into();
        let ray = Ray::new(Point::new(0., 0.5, -2.), Vector::unit_z());

        assert!(triangle.hit(&ray).is_none());
        assert!(triangle.does_hit(&ray));
        assert_eq!(triangle.triangle_count(), 1);
    }
}
