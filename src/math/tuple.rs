/// Shared interface of homogeneous 3-component values.
/// `w` is 0 for directions and 1 for positions, so a matrix knows
/// whether to apply its translation.
pub trait Tuple {
    fn new(x: f64, y: f64, z: f64) -> Self;

    fn x(&self) -> f64;
    fn y(&self) -> f64;
    fn z(&self) -> f64;
    fn w(&self) -> f64;
}
