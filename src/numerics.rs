//! Floating-point comparison helpers shared by the matrix and projection code.

/// Relative tolerance used by approximate matrix comparisons.
pub const COMPARISON_THRESHOLD: f64 = 1e-14;

/// Exact equality on bit patterns: `NaN` equals `NaN`, but `0.0` differs from `-0.0`.
#[inline]
pub fn bits_equal(a: f64, b: f64) -> bool {
    a.to_bits() == b.to_bits()
}

/// Equality for values that failed a tolerance test: two `NaN`s, or two
/// infinities of the same sign, are still considered equal.
#[inline]
pub fn special_equal(a: f64, b: f64) -> bool {
    (a.is_nan() && b.is_nan()) || (a.is_infinite() && a == b)
}

/// Returns `true` if `value` can not be distinguished from zero relative to `scale`.
///
/// Written with `!(… > …)` so that `NaN` is reported as singular.
#[inline]
pub fn is_negligible(value: f64, scale: f64) -> bool {
    !(value.abs() > f64::EPSILON * scale)
}
