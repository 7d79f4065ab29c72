use std::ops;

use super::approx_eq::ApproxEq;

#[derive(Copy, Clone, Debug, Default)]
pub struct Color {
    r: f64,
    g: f64,
    b: f64,
}

impl Color {
    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }
    pub fn grey(v: f64) -> Self {
        Self::new(v, v, v)
    }
    pub fn black() -> Self {
        Self::new(0., 0., 0.)
    }
    pub fn red() -> Self {
        Self::new(1., 0., 0.)
    }
    pub fn green() -> Self {
        Self::new(0., 1., 0.)
    }
    pub fn blue() -> Self {
        Self::new(0., 0., 1.)
    }
    pub fn yellow() -> Self {
        Self::new(1., 1., 0.)
    }
    pub fn white() -> Self {
        Self::new(1., 1., 1.)
    }
    pub fn r(&self) -> f64 {
        self.r
    }
    pub fn g(&self) -> f64 {
        self.g
    }
    pub fn b(&self) -> f64 {
        self.b
    }

    /// Caps every channel at one independently.
    pub fn max_to_one(&self) -> Self {
        Self::new(self.r.min(1.), self.g.min(1.), self.b.min(1.))
    }

    /// Saturates to [0, 1] and scales to [0, 255], truncating the fraction.
    fn scale_val_to_u8(v: f64) -> u8 {
        // NaN saturates to zero through the float-to-int cast
        let v = v.clamp(0., 1.);
        (v * 255.) as u8
    }

    pub fn as_scaled_values(&self) -> [u8; 3] {
        [
            Self::scale_val_to_u8(self.r),
            Self::scale_val_to_u8(self.g),
            Self::scale_val_to_u8(self.b),
        ]
    }
}

impl ApproxEq for Color {
    fn approx_eq_epsilon(&self, other: &Self, epsilon: f64) -> bool {
        self.r.approx_eq_epsilon(&other.r, epsilon)
            && self.g.approx_eq_epsilon(&other.g, epsilon)
            && self.b.approx_eq_epsilon(&other.b, epsilon)
    }
}

impl PartialEq for Color {
    fn eq(&self, other: &Self) -> bool {
        self.approx_eq(other)
    }
}

impl ops::Add for Color {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Color {
            r: self.r + rhs.r,
            g: self.g + rhs.g,
            b: self.b + rhs.b,
        }
    }
}

impl ops::AddAssign for Color {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl ops::Sub for Color {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Color {
            r: self.r - rhs.r,
            g: self.g - rhs.g,
            b: self.b - rhs.b,
        }
    }
}

impl ops::Mul for Color {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Color {
            r: self.r * rhs.r,
            g: self.g * rhs.g,
            b: self.b * rhs.b,
        }
    }
}

impl ops::Mul<f64> for Color {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Color {
            r: self.r * rhs,
            g: self.g * rhs,
            b: self.b * rhs,
        }
    }
}

impl ops::Mul<Color> for f64 {
    type Output = Color;

    fn mul(self, rhs: Color) -> Self::Output {
        rhs * self
    }
}

impl ops::Div<f64> for Color {
    type Output = Self;

    fn div(self, rhs: f64) -> Self::Output {
        Color {
            r: self.r / rhs,
            g: self.g / rhs,
            b: self.b / rhs,
        }
    }
}
