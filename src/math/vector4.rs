use std::ops::{self, Index, IndexMut};

use super::{approx_eq::ApproxEq, tuple::Tuple};

/// Homogeneous 4-component vector, used as a matrix row.
#[derive(Copy, Clone, Debug, Default)]
pub struct Vector4 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Vector4 {
    pub fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    pub fn zero() -> Self {
        Self::new(0., 0., 0., 0.)
    }

    pub fn from_tuple<T: Tuple>(tuple: &T) -> Self {
        Self::new(tuple.x(), tuple.y(), tuple.z(), tuple.w())
    }

    /// Drops `w`.
    pub fn xyz<T: Tuple>(&self) -> T {
        T::new(self.x, self.y, self.z)
    }

    pub fn dot(&self, rhs: Self) -> f64 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z + self.w * rhs.w
    }

    pub fn magnitude_squared(&self) -> f64 {
        self.dot(*self)
    }

    pub fn magnitude(&self) -> f64 {
        self.magnitude_squared().sqrt()
    }

    pub fn normalize(&self) -> Self {
        let len = self.magnitude();
        if len == 0. {
            return Self::zero();
        }
        *self * (1. / len)
    }

    pub fn normalize_mut(&mut self) -> f64 {
        let len = self.magnitude();
        *self = self.normalize();
        len
    }
}

impl Index<usize> for Vector4 {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        match index {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            3 => &self.w,
            _ => panic!("Vector4 index out of range: {index}"),
        }
    }
}

impl IndexMut<usize> for Vector4 {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        match index {
            0 => &mut self.x,
            1 => &mut self.y,
            2 => &mut self.z,
            3 => &mut self.w,
            _ => panic!("Vector4 index out of range: {index}"),
        }
    }
}

impl ApproxEq for Vector4 {
    fn approx_eq_epsilon(&self, other: &Self, epsilon: f64) -> bool {
        (0..4).all(|i| self[i].approx_eq_epsilon(&other[i], epsilon))
    }
}

impl PartialEq for Vector4 {
    fn eq(&self, other: &Self) -> bool {
        self.approx_eq(other)
    }
}

impl ops::Add for Vector4 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(
            self.x + rhs.x,
            self.y + rhs.y,
            self.z + rhs.z,
            self.w + rhs.w,
        )
    }
}

impl ops::Sub for Vector4 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(
            self.x - rhs.x,
            self.y - rhs.y,
            self.z - rhs.z,
            self.w - rhs.w,
        )
    }
}

impl ops::Mul<f64> for Vector4 {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs, self.w * rhs)
    }
}
