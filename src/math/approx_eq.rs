pub const EPSILON: f64 = 1.0e-8;
pub const LOW_PREC_EPSILON: f64 = 1.0e-5;

pub trait ApproxEq<Rhs = Self> {
    fn approx_eq_epsilon(&self, other: &Rhs, epsilon: f64) -> bool;

    fn approx_eq(&self, other: &Rhs) -> bool {
        self.approx_eq_epsilon(other, EPSILON)
    }

    fn approx_eq_low_prec(&self, other: &Rhs) -> bool {
        self.approx_eq_epsilon(other, LOW_PREC_EPSILON)
    }
}

impl ApproxEq for f64 {
    fn approx_eq_epsilon(&self, other: &Self, epsilon: f64) -> bool {
        (self - other).abs() < epsilon
    }
}

#[macro_export]
macro_rules! assert_approx_eq_low_prec {
    ($lhs:expr, $rhs:expr $(,)?) => {{
        let (lhs, rhs) = (&$lhs, &$rhs);
        assert!(
            $crate::math::approx_eq::ApproxEq::approx_eq_low_prec(lhs, rhs),
            "assertion `left ≈ right` failed\n  left: {:?}\n right: {:?}",
            lhs,
            rhs
        );
    }};
}
