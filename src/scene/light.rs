use crate::math::{color::Color, point::Point, vector::Vector};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LightKind {
    /// Radiates from `origin`, falling off with squared distance
    Point,
    /// Parallel rays travelling along `direction`, no falloff
    Directional,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Light {
    kind: LightKind,
    origin: Point,
    direction: Vector,
    color: Color,
    intensity: f64,
}

impl Light {
    pub fn point(origin: Point, intensity: f64, color: Color) -> Self {
        Self {
            kind: LightKind::Point,
            origin,
            direction: Vector::zero(),
            color,
            intensity,
        }
    }

    pub fn directional(direction: Vector, intensity: f64, color: Color) -> Self {
        Self {
            kind: LightKind::Directional,
            origin: Point::zero(),
            direction: direction.normalize(),
            color,
            intensity,
        }
    }

    pub fn kind(&self) -> LightKind {
        self.kind
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn direction(&self) -> Vector {
        self.direction
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn intensity(&self) -> f64 {
        self.intensity
    }

    /// Direction from `target` to the light, not normalized for point lights.
    pub fn direction_to_light(&self, target: Point) -> Vector {
        match self.kind {
            LightKind::Point => self.origin - target,
            LightKind::Directional => -self.direction,
        }
    }

    pub fn distance_to(&self, target: Point) -> f64 {
        match self.kind {
            LightKind::Point => self.origin.distance(target),
            LightKind::Directional => f64::INFINITY,
        }
    }

    /// Light arriving at `target`. A point light sitting on the target contributes nothing.
    pub fn radiance(&self, target: Point) -> Color {
        let emitted = self.color * self.intensity;
        match self.kind {
            LightKind::Point => {
                let distance_squared = self.origin.distance_squared(target);
                if distance_squared == 0. {
                    return Color::black();
                }
                emitted / distance_squared
            }
            LightKind::Directional => emitted,
        }
    }
}
