//! Reflectance building blocks shared by the materials.
//!
//! Directions follow one convention: `l` points from the surface to the light,
//! `v` is the incoming view ray direction (from the eye towards the surface).

use std::f64::consts::PI;

use crate::math::{color::Color, vector::Vector};

/// Reflectance of a dielectric at normal incidence.
pub const DIELECTRIC_F0: f64 = 0.04;

pub fn lambert(kd: f64, cd: Color) -> Color {
    cd * kd / PI
}

/// Lambert with a per-channel diffuse reflectance.
pub fn lambert_color(kd: Color, cd: Color) -> Color {
    cd * kd / PI
}

pub fn phong(ks: f64, exponent: f64, l: Vector, v: Vector, n: Vector) -> Color {
    let reflected = l.reflect(n);
    let cos = reflected.dot(v).max(0.);
    if cos == 0. {
        return Color::black();
    }
    Color::grey(ks * cos.powf(exponent))
}

/// `h` is the half vector, `view` points towards the eye.
pub fn fresnel_schlick(h: Vector, view: Vector, f0: Color) -> Color {
    let cos = h.dot(view).clamp(0., 1.);
    f0 + (Color::white() - f0) * (1. - cos).powi(5)
}

/// GGX normal distribution, `alpha` is the squared roughness.
pub fn normal_distribution_ggx(n: Vector, h: Vector, alpha: f64) -> f64 {
    let alpha_squared = alpha * alpha;
    let n_dot_h = n.dot(h).max(0.);
    let denominator = n_dot_h * n_dot_h * (alpha_squared - 1.) + 1.;
    let denominator = PI * denominator * denominator;
    if denominator <= 0. {
        return 0.;
    }
    alpha_squared / denominator
}

/// Schlick-GGX masking for direct lighting.
pub fn geometry_schlick_ggx(n: Vector, direction: Vector, alpha: f64) -> f64 {
    let k = (alpha + 1.).powi(2) / 8.;
    let n_dot = n.dot(direction).max(0.);
    let denominator = n_dot * (1. - k) + k;
    if denominator <= 0. {
        return 0.;
    }
    n_dot / denominator
}

/// Smith's method, combining masking towards the eye and shadowing towards the light.
pub fn geometry_smith(n: Vector, view: Vector, l: Vector, alpha: f64) -> f64 {
    geometry_schlick_ggx(n, view, alpha) * geometry_schlick_ggx(n, l, alpha)
}

/// Cook-Torrance specular plus Lambert diffuse.
/// Metals take their reflectance from `albedo` and have no diffuse part.
pub fn cook_torrance(
    albedo: Color,
    metalness: f64,
    roughness: f64,
    l: Vector,
    v: Vector,
    n: Vector,
) -> Color {
    let view = -v;
    let h = (view + l).normalize();
    let alpha = roughness * roughness;

    let f0 = if metalness > 0. {
        albedo
    } else {
        Color::grey(DIELECTRIC_F0)
    };

    let fresnel = fresnel_schlick(h, view, f0);
    let distribution = normal_distribution_ggx(n, h, alpha);
    let geometry = geometry_smith(n, view, l, alpha);

    let cos_view = n.dot(view);
    let cos_light = n.dot(l);
    let specular = if cos_view <= 0. || cos_light <= 0. {
        Color::black()
    } else {
        fresnel * (distribution * geometry / (4. * cos_view * cos_light))
    };

    let diffuse = if metalness > 0. {
        Color::black()
    } else {
        lambert_color(Color::white() - fresnel, albedo)
    };

    diffuse + specular
}

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_1_SQRT_2;

    use super::*;
    use crate::{assert_approx_eq_low_prec, math::tuple::Tuple};

    #[test]
    fn lambert_divides_by_pi() {
        assert_approx_eq_low_prec!(lambert(1., Color::white()), Color::grey(1. / PI));
        assert_approx_eq_low_prec!(
            lambert(0.5, Color::new(1., 0.5, 0.)),
            Color::new(0.5 / PI, 0.25 / PI, 0.)
        );
    }

    #[test]
    fn phong_peaks_along_mirror_direction() {
        let n = Vector::unit_y();
        let l = Vector::new(FRAC_1_SQRT_2, FRAC_1_SQRT_2, 0.);
        // viewed from the mirrored side, travelling towards the surface
        let v = Vector::new(FRAC_1_SQRT_2, -FRAC_1_SQRT_2, 0.);

        assert_approx_eq_low_prec!(phong(0.5, 20., l, v, n), Color::grey(0.5));
    }

    #[test]
    fn phong_is_black_away_from_reflection() {
        let n = Vector::unit_y();
        let l = Vector::new(FRAC_1_SQRT_2, FRAC_1_SQRT_2, 0.);
        let v = Vector::new(-FRAC_1_SQRT_2, FRAC_1_SQRT_2, 0.);

        assert_eq!(phong(1., 5., l, v, n), Color::black());
    }

    #[test]
    fn fresnel_at_normal_incidence_is_f0() {
        let f0 = Color::grey(DIELECTRIC_F0);
        assert_approx_eq_low_prec!(fresnel_schlick(Vector::unit_y(), Vector::unit_y(), f0), f0);
    }

    #[test]
    fn fresnel_at_grazing_angle_is_white() {
        let f0 = Color::grey(DIELECTRIC_F0);
        assert_approx_eq_low_prec!(
            fresnel_schlick(Vector::unit_y(), Vector::unit_x(), f0),
            Color::white()
        );
    }

    #[test]
    fn ggx_distribution_for_aligned_half_vector() {
        let n = Vector::unit_y();
        // alpha = 1 spreads uniformly over the hemisphere
        assert_approx_eq_low_prec!(normal_distribution_ggx(n, n, 1.), 1. / PI);
        let alpha: f64 = 0.25;
        assert_approx_eq_low_prec!(
            normal_distribution_ggx(n, n, alpha),
            1. / (PI * alpha * alpha)
        );
    }

    #[test]
    fn geometry_terms_stay_in_unit_range() {
        let n = Vector::unit_y();
        let l = Vector::new(0.6, 0.8, 0.);
        for alpha in [0.01, 0.25, 1.] {
            let g = geometry_smith(n, n, l, alpha);
            assert!((0. ..=1.).contains(&g));
        }
        assert_eq!(geometry_schlick_ggx(n, -n, 0.5), 0.);
    }

    #[test]
    fn cook_torrance_is_finite_for_degenerate_directions() {
        let n = Vector::unit_y();
        // light exactly opposite the view makes the half vector zero
        let l = Vector::unit_y();
        let v = Vector::unit_y();
        let color = cook_torrance(Color::red(), 0., 0.5, l, v, n);

        assert!(color.r().is_finite() && color.g().is_finite() && color.b().is_finite());
    }

    #[test]
    fn metal_has_no_diffuse() {
        let n = Vector::unit_y();
        let l = Vector::new(0.6, 0.8, 0.);
        // eye below the surface
        let v = Vector::new(-0.6, 0.8, 0.);
        let color = cook_torrance(Color::new(0.9, 0.6, 0.2), 1., 1., l, v, n);

        assert_eq!(color, Color::black());
    }

    #[test]
    fn dielectric_head_on_is_mostly_diffuse() {
        let n = Vector::unit_y();
        let v = -n;
        let color = cook_torrance(Color::white(), 0., 1., n, v, n);

        // alpha = 1: D = 1/pi, G = 1, F = f0
        let specular = DIELECTRIC_F0 / (4. * PI);
        let diffuse = (1. - DIELECTRIC_F0) / PI;
        assert_approx_eq_low_prec!(color, Color::grey(diffuse + specular));
    }
}
