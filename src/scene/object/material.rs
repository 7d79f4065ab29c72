use crate::{
    math::{color::Color, vector::Vector},
    render::intersection::HitRecord,
    shading::brdf,
};

/// Surface response to a single light.
#[derive(Clone, Debug, PartialEq)]
pub enum Material {
    /// Ignores lighting entirely
    SolidColor { color: Color },
    Lambert {
        color: Color,
        /// [0;1]
        diffuse_reflectance: f64,
    },
    LambertPhong {
        color: Color,
        diffuse_reflectance: f64,  // [0;1]
        specular_reflectance: f64, // [0;1]
        phong_exponent: f64,
    },
    CookTorrance {
        albedo: Color,
        /// 0 for dielectrics, 1 for metals
        metalness: f64,
        /// [0;1]
        roughness: f64,
    },
}

impl Default for Material {
    fn default() -> Self {
        Material::lambert(Color::white(), 1.)
    }
}

impl Material {
    pub fn solid_color(color: Color) -> Self {
        Material::SolidColor { color }
    }

    pub fn lambert(color: Color, diffuse_reflectance: f64) -> Self {
        Material::Lambert {
            color,
            diffuse_reflectance,
        }
    }

    pub fn lambert_phong(
        color: Color,
        diffuse_reflectance: f64,
        specular_reflectance: f64,
        phong_exponent: f64,
    ) -> Self {
        Material::LambertPhong {
            color,
            diffuse_reflectance,
            specular_reflectance,
            phong_exponent,
        }
    }

    pub fn cook_torrance(albedo: Color, metalness: f64, roughness: f64) -> Self {
        Material::CookTorrance {
            albedo,
            metalness,
            roughness,
        }
    }

    /// `l` points towards the light, `v` is the direction of the view ray.
    pub fn shade(&self, hit: &HitRecord, l: Vector, v: Vector) -> Color {
        match *self {
            Material::SolidColor { color } => color,
            Material::Lambert {
                color,
                diffuse_reflectance,
            } => brdf::lambert(diffuse_reflectance, color),
            Material::LambertPhong {
                color,
                diffuse_reflectance,
                specular_reflectance,
                phong_exponent,
            } => {
                brdf::lambert(diffuse_reflectance, color)
                    + brdf::phong(specular_reflectance, phong_exponent, l, v, hit.normal)
            }
            Material::CookTorrance {
                albedo,
                metalness,
                roughness,
            } => brdf::cook_torrance(albedo, metalness, roughness, l, v, hit.normal),
        }
    }

    pub fn base_color(&self) -> Color {
        match *self {
            Material::SolidColor { color }
            | Material::Lambert { color, .. }
            | Material::LambertPhong { color, .. } => color,
            Material::CookTorrance { albedo, .. } => albedo,
        }
    }
}
