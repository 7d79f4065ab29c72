use std::f64::consts::FRAC_PI_2;

use derive_builder::Builder;

use crate::{
    math::{approx_eq::EPSILON, matrix::Matrix, point::Point, tuple::Tuple, vector::Vector},
    render::{canvas::Canvas, ray::Ray},
};

/// Accumulated camera rotation, in radians.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Orientation {
    pub total_pitch: f64,
    pub total_yaw: f64,
}

impl Orientation {
    pub fn new(total_pitch: f64, total_yaw: f64) -> Self {
        Self {
            total_pitch,
            total_yaw,
        }
    }

    /// Orientation whose forward vector points along `forward`.
    pub fn looking_along(forward: Vector) -> Self {
        let forward = forward.normalize();
        let total_pitch = forward.y().atan2(forward.x().hypot(forward.z()));
        let total_yaw = (-forward.x()).atan2(forward.z());
        Self::new(total_pitch, total_yaw)
    }

    /// Pitch tilts about the camera's own x axis, then yaw turns about world y.
    pub fn forward(&self) -> Vector {
        (Matrix::rotation_x(self.total_pitch) * Matrix::rotation_y(self.total_yaw))
            .transform_vector(Vector::unit_z())
    }
}

// camera looks toward +z from its origin, +x is right and +y is up
#[derive(PartialEq, Debug, Clone, Builder)]
#[builder(build_fn(private, name = "build_unaligned", validate = "Self::validate"))]
pub struct Camera {
    #[builder(default)]
    origin: Point,
    /// Vertical field of view in radians
    #[builder(default = "Camera::DEFAULT_FIELD_OF_VIEW")]
    field_of_view: f64,
    #[builder(default = "Camera::DEFAULT_WIDTH")]
    target_width: usize,
    #[builder(default = "Camera::DEFAULT_HEIGHT")]
    target_height: usize,
    #[builder(default)]
    orientation: Orientation,

    #[builder(setter(skip))]
    forward: Vector,
    #[builder(setter(skip))]
    up: Vector,
    #[builder(setter(skip))]
    right: Vector,
}

impl CameraBuilder {
    fn validate(&self) -> Result<(), String> {
        if self.target_width == Some(0) || self.target_height == Some(0) {
            return Err("camera target dimensions must be positive".to_string());
        }
        match self.field_of_view {
            Some(fov) if !(fov > 0. && fov < std::f64::consts::PI) => {
                Err(format!("field of view {fov} is outside (0, pi)"))
            }
            _ => Ok(()),
        }
    }

    pub fn build(&self) -> Result<Camera, CameraBuilderError> {
        let mut camera = self.build_unaligned()?;
        camera.update_basis();
        Ok(camera)
    }
}

impl Camera {
    pub const DEFAULT_FIELD_OF_VIEW: f64 = FRAC_PI_2;
    pub const DEFAULT_WIDTH: usize = 640;
    pub const DEFAULT_HEIGHT: usize = 480;

    pub fn new(origin: Point, field_of_view: f64, target_width: usize, target_height: usize) -> Self {
        let mut camera = Self {
            origin,
            field_of_view,
            target_width,
            target_height,
            orientation: Orientation::default(),
            forward: Vector::unit_z(),
            up: Vector::unit_y(),
            right: Vector::unit_x(),
        };
        camera.update_basis();
        camera
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self.update_basis();
        self
    }

    pub fn looking_along(self, forward: Vector) -> Self {
        self.with_orientation(Orientation::looking_along(forward))
    }

    /// Regenerates the forward, right and up axes from the orientation.
    pub fn update_basis(&mut self) {
        self.forward = self.orientation.forward().normalize();

        let right = Vector::unit_y().cross(self.forward);
        self.right = if right.magnitude_squared() < EPSILON {
            Vector::unit_x()
        } else {
            right.normalize()
        };
        self.up = self.forward.cross(self.right).normalize();
    }

    /// Adds to the accumulated pitch and yaw.
    pub fn rotate(&mut self, delta_pitch: f64, delta_yaw: f64) {
        self.orientation.total_pitch += delta_pitch;
        self.orientation.total_yaw += delta_yaw;
        self.update_basis();
    }

    /// Moves along the camera's own axes.
    pub fn move_local(&mut self, offset: Vector) {
        self.origin =
            self.origin + self.right * offset.x() + self.up * offset.y() + self.forward * offset.z();
    }

    pub fn camera_to_world(&self) -> Matrix {
        Matrix::from_axes(self.right, self.up, self.forward, self.origin)
    }

    /// Per-frame ray generator, the camera-to-world matrix is computed here once.
    pub fn viewport(&self) -> Viewport {
        Viewport {
            camera_to_world: self.camera_to_world(),
            origin: self.origin,
            width: self.target_width as f64,
            height: self.target_height as f64,
            aspect_ratio: self.target_width as f64 / self.target_height as f64,
            half_view: (self.field_of_view / 2.).tan(),
        }
    }

    pub fn ray_for_pixel(&self, px: usize, py: usize) -> Ray {
        self.viewport().ray_for_pixel(px, py)
    }

    pub fn canvas(&self) -> Canvas {
        Canvas::new(self.target_width, self.target_height)
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn field_of_view(&self) -> f64 {
        self.field_of_view
    }

    pub fn set_field_of_view(&mut self, field_of_view: f64) {
        self.field_of_view = field_of_view;
    }

    pub fn target_width(&self) -> usize {
        self.target_width
    }

    pub fn target_height(&self) -> usize {
        self.target_height
    }

    pub fn set_target_size(&mut self, target_width: usize, target_height: usize) {
        self.target_width = target_width;
        self.target_height = target_height;
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn forward(&self) -> Vector {
        self.forward
    }

    pub fn up(&self) -> Vector {
        self.up
    }

    pub fn right(&self) -> Vector {
        self.right
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(
            Point::zero(),
            Self::DEFAULT_FIELD_OF_VIEW,
            Self::DEFAULT_WIDTH,
            Self::DEFAULT_HEIGHT,
        )
    }
}

/// Camera state frozen for one frame, shared by all pixel workers.
#[derive(Clone, Debug, PartialEq)]
pub struct Viewport {
    camera_to_world: Matrix,
    origin: Point,
    width: f64,
    height: f64,
    aspect_ratio: f64,
    half_view: f64,
}

impl Viewport {
    pub fn ray_for_pixel(&self, px: usize, py: usize) -> Ray {
        let x = (2. * (px as f64 + 0.5) / self.width - 1.) * self.aspect_ratio * self.half_view;
        let y = (1. - 2. * (py as f64 + 0.5) / self.height) * self.half_view;

        let direction = self
            .camera_to_world
            .transform_vector(Vector::new(x, y, 1.))
            .normalize();
        Ray::new(self.origin, direction)
    }

    pub fn camera_to_world(&self) -> &Matrix {
        &self.camera_to_world
    }
}
