use std::ops;

use super::{
    approx_eq::ApproxEq, point::Point, tuple::Tuple, vector::Vector, vector4::Vector4,
};

/// 4x4 affine transform stored as four rows: the images of the x, y and z axes
/// followed by the translation.
///
/// Tuples are treated as row vectors, `v' = v * M`, so `a * b` applies `a`
/// first and `b` second.
#[derive(Debug, Clone, Copy)]
pub struct Matrix {
    rows: [Vector4; 4],
}

impl Default for Matrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl Matrix {
    pub fn new(rows: [Vector4; 4]) -> Self {
        Self { rows }
    }

    #[rustfmt::skip]
    pub fn from_array(data: [f64; 16]) -> Self {
        Self::new([
            Vector4::new(data[0], data[1], data[2], data[3]),
            Vector4::new(data[4], data[5], data[6], data[7]),
            Vector4::new(data[8], data[9], data[10], data[11]),
            Vector4::new(data[12], data[13], data[14], data[15]),
        ])
    }

    pub fn from_axes(x_axis: Vector, y_axis: Vector, z_axis: Vector, translation: Point) -> Self {
        Self::new([
            Vector4::from_tuple(&x_axis),
            Vector4::from_tuple(&y_axis),
            Vector4::from_tuple(&z_axis),
            Vector4::from_tuple(&translation),
        ])
    }

    pub fn empty() -> Self {
        Self::new([Vector4::zero(); 4])
    }

    pub fn identity() -> Self {
        Self::from_axes(
            Vector::unit_x(),
            Vector::unit_y(),
            Vector::unit_z(),
            Point::zero(),
        )
    }

    pub fn axis_x(&self) -> Vector {
        self.rows[0].xyz()
    }

    pub fn axis_y(&self) -> Vector {
        self.rows[1].xyz()
    }

    pub fn axis_z(&self) -> Vector {
        self.rows[2].xyz()
    }

    pub fn translation_part(&self) -> Point {
        self.rows[3].xyz()
    }

    pub fn transpose(&self) -> Self {
        let mut res = Self::empty();
        for row in 0..4 {
            for col in 0..4 {
                res[(row, col)] = self[(col, row)];
            }
        }
        res
    }

    /// Transforms a tuple according to its `w`: directions ignore the translation row.
    pub fn transform<T: Tuple>(&self, tuple: T) -> T {
        let [x_axis, y_axis, z_axis, t] = self.rows;
        let (x, y, z, w) = (tuple.x(), tuple.y(), tuple.z(), tuple.w());
        (x_axis * x + y_axis * y + z_axis * z + t * w).xyz()
    }

    pub fn transform_vector(&self, vector: Vector) -> Vector {
        self.transform(vector)
    }

    pub fn transform_point(&self, point: Point) -> Point {
        self.transform(point)
    }

    #[rustfmt::skip]
    pub fn translation(x: f64, y: f64, z: f64) -> Matrix {
        Matrix::from_array([
            1., 0., 0., 0.,
            0., 1., 0., 0.,
            0., 0., 1., 0.,
            x, y, z, 1.,
        ])
    }

    pub fn translation_vec(t: Vector) -> Matrix {
        Self::translation(t.x(), t.y(), t.z())
    }

    #[rustfmt::skip]
    pub fn scaling(x: f64, y: f64, z: f64) -> Matrix {
        Matrix::from_array([
            x, 0., 0., 0.,
            0., y, 0., 0.,
            0., 0., z, 0.,
            0., 0., 0., 1.,
        ])
    }

    #[rustfmt::skip]
    pub fn rotation_x(pitch: f64) -> Matrix {
        let (sin_r, cos_r) = pitch.sin_cos();
        Matrix::from_array([
            1., 0., 0., 0.,
            0., cos_r, -sin_r, 0.,
            0., sin_r, cos_r, 0.,
            0., 0., 0., 1.,
        ])
    }

    #[rustfmt::skip]
    pub fn rotation_y(yaw: f64) -> Matrix {
        let (sin_r, cos_r) = yaw.sin_cos();
        Matrix::from_array([
            cos_r, 0., sin_r, 0.,
            0., 1., 0., 0.,
            -sin_r, 0., cos_r, 0.,
            0., 0., 0., 1.,
        ])
    }

    #[rustfmt::skip]
    pub fn rotation_z(roll: f64) -> Matrix {
        let (sin_r, cos_r) = roll.sin_cos();
        Matrix::from_array([
            cos_r, -sin_r, 0., 0.,
            sin_r, cos_r, 0., 0.,
            0., 0., 1., 0.,
            0., 0., 0., 1.,
        ])
    }

    /// Roll is applied first, then yaw, then pitch.
    pub fn rotation(pitch: f64, yaw: f64, roll: f64) -> Matrix {
        Self::rotation_z(roll) * Self::rotation_y(yaw) * Self::rotation_x(pitch)
    }
}

impl ApproxEq for Matrix {
    fn approx_eq_epsilon(&self, other: &Self, epsilon: f64) -> bool {
        self.rows
            .iter()
            .zip(other.rows.iter())
            .all(|(a, b)| a.approx_eq_epsilon(b, epsilon))
    }
}

impl PartialEq for Matrix {
    fn eq(&self, other: &Matrix) -> bool {
        self.approx_eq(other)
    }
}

impl ops::Index<usize> for Matrix {
    type Output = Vector4;

    fn index(&self, row: usize) -> &Self::Output {
        &self.rows[row]
    }
}

impl ops::Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        debug_assert!(row < 4);
        debug_assert!(col < 4);
        &self.rows[row][col]
    }
}

impl ops::IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut Self::Output {
        debug_assert!(row < 4);
        debug_assert!(col < 4);
        &mut self.rows[row][col]
    }
}

impl ops::Mul<Matrix> for Matrix {
    type Output = Self;
    fn mul(self, rhs: Matrix) -> Self::Output {
        &self * &rhs
    }
}

impl ops::Mul<&Matrix> for &Matrix {
    type Output = Matrix;
    fn mul(self, rhs: &Matrix) -> Self::Output {
        let mut output = Self::Output::empty();
        for row in 0..4 {
            for col in 0..4 {
                output[(row, col)] = self[(row, 0)] * rhs[(0, col)]
                    + self[(row, 1)] * rhs[(1, col)]
                    + self[(row, 2)] * rhs[(2, col)]
                    + self[(row, 3)] * rhs[(3, col)];
            }
        }
        output
    }
}
