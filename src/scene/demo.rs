use std::{f64::consts::FRAC_PI_4, fmt::Display};

use clap::ValueEnum;

use crate::{
    math::{color::Color, point::Point, tuple::Tuple, vector::Vector},
    scene::{
        Scene, SceneBuilder, SceneBuilderError,
        camera::Camera,
        light::Light,
        object::{
            material::Material,
            primitive::{
                mesh::TriangleMesh,
                plane::Plane,
                sphere::Sphere,
                triangle::{CullMode, Triangle},
            },
        },
    },
};

/// Scenes that can be rendered without a scene file.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, ValueEnum)]
pub enum DemoScene {
    /// Lambert spheres in a box of planes
    SpheresRoom,
    /// Cook-Torrance spheres, culled triangle meshes and three lights
    #[default]
    Reference,
}

impl Display for DemoScene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DemoScene::SpheresRoom => write!(f, "spheres-room"),
            DemoScene::Reference => write!(f, "reference"),
        }
    }
}

impl DemoScene {
    pub fn build(self) -> Result<(Scene, Camera), SceneBuilderError> {
        match self {
            DemoScene::SpheresRoom => spheres_room(),
            DemoScene::Reference => reference(),
        }
    }
}

fn add_room(builder: &mut SceneBuilder, material_index: usize) {
    builder
        .shape(Plane::new(Point::new(-5., 0., 0.), Vector::unit_x(), material_index))
        .shape(Plane::new(Point::new(5., 0., 0.), -Vector::unit_x(), material_index))
        .shape(Plane::new(Point::new(0., 0., 0.), Vector::unit_y(), material_index))
        .shape(Plane::new(Point::new(0., 10., 0.), -Vector::unit_y(), material_index))
        .shape(Plane::new(Point::new(0., 0., 10.), -Vector::unit_z(), material_index));
}

fn spheres_room() -> Result<(Scene, Camera), SceneBuilderError> {
    let mut builder = SceneBuilder::default();
    builder
        .material(Material::lambert(Color::new(0.49, 0.57, 0.57), 1.))
        .material(Material::lambert(Color::red(), 1.))
        .material(Material::lambert(Color::blue(), 1.))
        .material(Material::lambert(Color::yellow(), 1.));
    add_room(&mut builder, 0);

    let row = [(-1.75, 1.), (0., 1.), (1.75, 1.), (-1.75, 3.), (0., 3.), (1.75, 3.)];
    for (i, (x, y)) in row.into_iter().enumerate() {
        builder.shape(Sphere::new(Point::new(x, y, 0.), 0.75, 1 + i % 3));
    }

    builder
        .light(Light::point(Point::new(0., 5., -5.), 70., Color::white()))
        .light(Light::point(Point::new(-2.5, 5., -5.), 50., Color::new(1., 0.61, 0.45)))
        .light(Light::point(Point::new(2.5, 2.5, -5.), 50., Color::new(0.34, 0.47, 0.68)));

    let camera = Camera::new(Point::new(0., 3., -9.), FRAC_PI_4, 640, 480);
    Ok((builder.build()?, camera))
}

fn triangle_mesh(x: f64, cull_mode: CullMode, material_index: usize) -> TriangleMesh {
    let base = Triangle::new(
        Point::new(-0.75, 1.5, 0.),
        Point::new(0.75, 0., 0.),
        Point::new(-0.75, 0., 0.),
        cull_mode,
        material_index,
    );
    let mut mesh = TriangleMesh::empty(cull_mode, material_index);
    mesh.append_triangle(&base);
    mesh.translate(Vector::new(x, 4.5, 0.));
    mesh.update_transforms();
    mesh
}

fn reference() -> Result<(Scene, Camera), SceneBuilderError> {
    let rough_metal = Material::cook_torrance(Color::new(0.972, 0.960, 0.915), 1., 1.);
    let medium_metal = Material::cook_torrance(Color::new(0.972, 0.960, 0.915), 1., 0.6);
    let smooth_metal = Material::cook_torrance(Color::new(0.972, 0.960, 0.915), 1., 0.1);
    let rough_plastic = Material::cook_torrance(Color::new(0.75, 0.75, 0.75), 0., 1.);
    let medium_plastic = Material::cook_torrance(Color::new(0.75, 0.75, 0.75), 0., 0.6);
    let smooth_plastic = Material::cook_torrance(Color::new(0.75, 0.75, 0.75), 0., 0.1);

    let mut builder = SceneBuilder::default();
    builder
        .material(Material::lambert(Color::new(0.49, 0.57, 0.57), 1.))
        .material(Material::lambert(Color::white(), 1.))
        .material(rough_metal)
        .material(medium_metal)
        .material(smooth_metal)
        .material(rough_plastic)
        .material(medium_plastic)
        .material(smooth_plastic);
    add_room(&mut builder, 0);

    let xs = [-1.75, 0., 1.75];
    for (i, x) in xs.into_iter().enumerate() {
        builder
            .shape(Sphere::new(Point::new(x, 1., 0.), 0.75, 2 + i))
            .shape(Sphere::new(Point::new(x, 3., 0.), 0.75, 5 + i));
    }

    let culls = [CullMode::BackFace, CullMode::FrontFace, CullMode::None];
    for (x, cull_mode) in xs.into_iter().zip(culls) {
        builder.shape(triangle_mesh(x, cull_mode, 1));
    }

    builder
        .light(Light::point(Point::new(0., 5., 5.), 50., Color::new(1., 0.61, 0.45)))
        .light(Light::point(Point::new(-2.5, 5., -5.), 70., Color::new(1., 0.8, 0.45)))
        .light(Light::point(Point::new(2.5, 2.5, -5.), 50., Color::new(0.34, 0.47, 0.68)));

    let camera = Camera::new(Point::new(0., 3., -9.), FRAC_PI_4, 640, 480);
    Ok((builder.build()?, camera))
}
