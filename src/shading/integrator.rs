use std::fmt::Display;

use clap::ValueEnum;
use derive_builder::Builder;

use crate::{
    math::{color::Color, vector::Vector},
    render::{intersection::HitRecord, ray::Ray},
    scene::{Scene, light::Light},
};

/// Which terms of the lighting equation end up in the image.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, ValueEnum)]
pub enum LightingMode {
    /// Cosine between the normal and the light direction only
    ObservedArea,
    /// Incident light scaled by the cosine
    Radiance,
    /// Material response only
    Brdf,
    #[default]
    Combined,
}

impl LightingMode {
    /// Cycles in declaration order, wrapping back to the first mode.
    pub fn next(self) -> Self {
        match self {
            LightingMode::ObservedArea => LightingMode::Radiance,
            LightingMode::Radiance => LightingMode::Brdf,
            LightingMode::Brdf => LightingMode::Combined,
            LightingMode::Combined => LightingMode::ObservedArea,
        }
    }
}

impl Display for LightingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LightingMode::ObservedArea => write!(f, "observed-area"),
            LightingMode::Radiance => write!(f, "radiance"),
            LightingMode::Brdf => write!(f, "brdf"),
            LightingMode::Combined => write!(f, "combined"),
        }
    }
}

#[derive(PartialEq, Debug, Clone, Builder)]
#[builder(default)]
/// The integrator calculates the color for each given ray
pub struct Integrator {
    /// The scene to be rendered
    scene: Scene,
    lighting_mode: LightingMode,
    #[builder(default = "true")]
    shadows_enabled: bool,
    /// Distance along the normal that shadow rays start from,
    /// keeps surfaces from shadowing themselves
    #[builder(default = "Integrator::DEFAULT_SHADOW_BIAS")]
    shadow_bias: f64,
}

impl Default for Integrator {
    fn default() -> Self {
        Self::new(Scene::default())
    }
}

impl Integrator {
    pub const DEFAULT_SHADOW_BIAS: f64 = 0.1;

    pub fn new(scene: Scene) -> Self {
        Self {
            scene,
            lighting_mode: LightingMode::default(),
            shadows_enabled: true,
            shadow_bias: Self::DEFAULT_SHADOW_BIAS,
        }
    }

    /// The main method for calculating color for the given ray
    pub fn color_at(&self, ray: &Ray) -> Color {
        let hit = self.scene.closest_hit(ray);
        if !hit.did_hit {
            return Color::black();
        }

        self.scene
            .lights()
            .iter()
            .filter_map(|light| self.light_contribution(&hit, light, ray.direction()))
            .fold(Color::black(), |acc, color| acc + color)
            .max_to_one()
    }

    /// `None` when the light faces the back of the surface or is occluded.
    fn light_contribution(&self, hit: &HitRecord, light: &Light, view: Vector) -> Option<Color> {
        let l = light.direction_to_light(hit.point).normalize();
        let cos = hit.normal.dot(l);
        if cos < 0. {
            return None;
        }
        if self.shadows_enabled && self.is_shadowed(hit, light, l) {
            return None;
        }

        let radiance = light.radiance(hit.point);
        let material = self.scene.material(hit.material_index);

        Some(match self.lighting_mode {
            LightingMode::ObservedArea => Color::grey(cos),
            LightingMode::Radiance => radiance * cos,
            LightingMode::Brdf => material.shade(hit, l, view),
            LightingMode::Combined => radiance * material.shade(hit, l, view) * cos,
        })
    }

    fn is_shadowed(&self, hit: &HitRecord, light: &Light, l: Vector) -> bool {
        let origin = hit.point + hit.normal * self.shadow_bias;
        let max = light.distance_to(origin).min(Ray::DEFAULT_MAX);
        let shadow_ray = Ray::with_bounds(origin, l, Ray::DEFAULT_MIN, max);

        self.scene.does_hit(&shadow_ray)
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn lighting_mode(&self) -> LightingMode {
        self.lighting_mode
    }

    pub fn set_lighting_mode(&mut self, lighting_mode: LightingMode) {
        self.lighting_mode = lighting_mode;
    }

    pub fn shadows_enabled(&self) -> bool {
        self.shadows_enabled
    }

    pub fn set_shadows_enabled(&mut self, shadows_enabled: bool) {
        self.shadows_enabled = shadows_enabled;
    }

    pub fn shadow_bias(&self) -> f64 {
        self.shadow_bias
    }
}
