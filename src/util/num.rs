/// Largest signed integer exactly representable as an `f64` (`2^53 - 1`).
pub const MAX_SAFE_INT: i64 = 9_007_199_254_740_991;

/// Safely converts an `i64` to `f64` if and only if it is exactly
/// representable.
///
/// ## Errors
/// Returns `Err(error)` if the value exceeds `MAX_SAFE_INT` in absolute
/// value.
///
/// ## Parameters
/// - `value`: The integer to convert.
/// - `error`: The error to return if conversion is not lossless.
///
/// ## Example
/// ```
/// use cassia::util::num::{MAX_SAFE_INT, i64_to_f64_checked};
///
/// // Works for safe values
/// let result = i64_to_f64_checked(42, "too big!");
/// assert_eq!(result.unwrap(), 42.0);
///
/// // Fails for values outside the safe range
/// assert!(i64_to_f64_checked(MAX_SAFE_INT + 1, "too big!").is_err());
/// ```
#[allow(clippy::cast_precision_loss)]
pub fn i64_to_f64_checked<E>(value: i64, error: E) -> Result<f64, E> {
    if value.unsigned_abs() > MAX_SAFE_INT.unsigned_abs() {
        return Err(error);
    }
    Ok(value as f64)
}

/// Returns the integer value of an `f64` when it is integral and exactly
/// representable, `None` otherwise.
///
/// This is the gate for the exact arithmetic paths: a `Number` takes part
/// in rational arithmetic only when this returns `Some`.
///
/// ## Example
/// ```
/// use cassia::util::num::f64_as_exact_i64;
///
/// assert_eq!(f64_as_exact_i64(10.0), Some(10));
/// assert_eq!(f64_as_exact_i64(-3.0), Some(-3));
/// assert_eq!(f64_as_exact_i64(0.5), None);
/// assert_eq!(f64_as_exact_i64(1e300), None);
/// ```
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn f64_as_exact_i64(value: f64) -> Option<i64> {
    if !value.is_finite() || value.fract() != 0.0 || value.abs() > MAX_SAFE_INT as f64 {
        return None;
    }
    Some(value as i64)
}

/// Greatest common divisor of two integers, always non-negative.
///
/// `gcd(0, 0)` is defined as 1 so callers can divide by the result
/// unconditionally.
///
/// ## Example
/// ```
/// use cassia::util::num::gcd;
///
/// assert_eq!(gcd(12, 18), 6);
/// assert_eq!(gcd(-4, 6), 2);
/// assert_eq!(gcd(7, 0), 7);
/// ```
#[allow(clippy::cast_possible_wrap)]
#[must_use]
pub const fn gcd(a: i64, b: i64) -> i64 {
    let mut a = a.unsigned_abs();
    let mut b = b.unsigned_abs();
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    if a == 0 { 1 } else { a as i64 }
}
