pub mod camera;
pub mod demo;
pub mod light;

pub mod io {
    pub mod obj_model;
    pub mod yaml;
}

pub mod object {
    pub mod material;
    pub mod primitive {
        pub mod mesh;
        pub mod plane;
        pub mod shape;
        pub mod sphere;
        pub mod triangle;
    }
}

use derive_builder::Builder;

use crate::{
    render::{intersection::HitRecord, ray::Ray},
    scene::{
        light::Light,
        object::{material::Material, primitive::shape::Shape},
    },
};

/// Everything a frame is rendered from: geometry, lights and the materials they reference.
#[derive(PartialEq, Debug, Clone, Default, Builder)]
#[builder(default, build_fn(validate = "Self::validate"))]
pub struct Scene {
    #[builder(setter(each(name = "shape", into)))]
    shapes: Vec<Shape>,
    #[builder(setter(each(name = "light")))]
    lights: Vec<Light>,
    /// Indexed by the primitives' `material_index`
    #[builder(setter(each(name = "material")))]
    materials: Vec<Material>,
}

impl SceneBuilder {
    fn validate(&self) -> Result<(), String> {
        let material_count = self.materials.as_ref().map_or(0, Vec::len);
        let shapes = self.shapes.as_deref().unwrap_or_default();

        match shapes
            .iter()
            .map(Shape::material_index)
            .find(|&index| index >= material_count)
        {
            Some(index) => Err(format!(
                "material index {index} is out of range for {material_count} materials"
            )),
            None => Ok(()),
        }
    }
}

impl Scene {
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Mutable access for moving geometry between frames, material indices are not revalidated.
    pub fn shapes_mut(&mut self) -> &mut [Shape] {
        &mut self.shapes
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn material(&self, index: usize) -> &Material {
        &self.materials[index]
    }

    pub fn triangle_count(&self) -> usize {
        self.shapes.iter().map(Shape::triangle_count).sum()
    }

    /// Nearest hit over all shapes in insertion order; the default (missed) record if none.
    pub fn closest_hit(&self, ray: &Ray) -> HitRecord {
        self.shapes
            .iter()
            .filter_map(|shape| shape.hit(ray))
            .fold(None, HitRecord::closest)
            .unwrap_or_default()
    }

    /// Whether anything lies within the ray's range, stopping at the first hit.
    pub fn does_hit(&self, ray: &Ray) -> bool {
        self.shapes.iter().any(|shape| shape.does_hit(ray))
    }

    pub fn log_statistics(&self) {
        log::debug!(
            "scene: {} shapes ({} triangles), {} lights, {} materials",
            self.shapes.len(),
            self.triangle_count(),
            self.lights.len(),
            self.materials.len()
        );
    }
}
