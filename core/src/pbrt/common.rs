//! Common

use super::log2int::*;
use num_traits::{Num, Zero};

/// Use 32-bit precision for floating point numbers.
pub type Float = f32;

/// Default signed integer to 32-bit.
pub type Int = i32;

/// Square root of 2 (√2).
pub const SQRT2: Float = std::f32::consts::SQRT_2;

/// Returns the minimum of 2 numbers.
///
/// * `a` - First number.
/// * `b` - Second number.
#[inline(always)]
pub fn min<T>(a: T, b: T) -> T
where
    T: Num + PartialOrd + Copy,
{
    if a < b {
        a
    } else {
        b
    }
}

/// Returns the maximum of 2 numbers.
///
/// * `a` - First number.
/// * `b` - Second number.
#[inline(always)]
pub fn max<T>(a: T, b: T) -> T
where
    T: Num + PartialOrd + Copy,
{
    if a > b {
        a
    } else {
        b
    }
}

/// Clamps a value to the closed interval `[low, high]`.
///
/// * `val`  - The value to clamp.
/// * `low`  - Lower bound.
/// * `high` - Upper bound.
#[inline(always)]
pub fn clamp<T>(val: T, low: T, high: T) -> T
where
    T: PartialOrd,
{
    if val < low {
        low
    } else if val > high {
        high
    } else {
        val
    }
}

/// Computes a mod b (the remainder of a divided by b). This version
/// ensures that modulus of a negative number is zero or positive.
///
/// * `a` - Dividend.
/// * `b` - Divisor.
#[inline(always)]
pub fn rem<T>(a: T, b: T) -> T
where
    T: Num + Zero + PartialOrd + Copy,
{
    let result = a - (a / b) * b;
    if result < T::zero() {
        result + b
    } else {
        result
    }
}

/// Returns true if `v` is a positive power of 2.
///
/// * `v` - The value.
#[inline(always)]
pub fn is_power_of_2(v: Int) -> bool {
    v > 0 && (v & (v - 1)) == 0
}

/// Returns true if `v` is a positive power of 4.
///
/// * `v` - The value.
#[inline(always)]
pub fn is_power_of_4(v: Int) -> bool {
    if !is_power_of_2(v) {
        return false;
    }
    let l: i32 = Log2Int::log2int(v);
    l % 2 == 0
}

/// Rounds a positive value up to the next power of 2.
///
/// * `v` - The value.
#[inline(always)]
pub fn round_up_pow2(v: Int) -> Int {
    let mut v = v - 1;
    v |= v >> 1;
    v |= v >> 2;
    v |= v >> 4;
    v |= v >> 8;
    v |= v >> 16;
    v + 1
}

/// Rounds a positive value up to the next power of 4.
///
/// * `v` - The value.
pub fn round_up_pow4(v: Int) -> Int {
    let p = round_up_pow2(v);
    if is_power_of_4(p) {
        p
    } else {
        2 * p
    }
}

/// Returns the integer base 4 logarithm of a positive value.
///
/// * `v` - The value.
#[inline(always)]
pub fn log4int(v: Int) -> Int {
    let l: i32 = Log2Int::log2int(v);
    l / 2
}

/// Returns the inverse of the error function for a given floating point value.
///
/// * `x` - The floating point value.
#[inline(always)]
pub fn erf_inv(x: Float) -> Float {
    let x = clamp(x, -0.99999, 0.99999);
    let mut w = -((1.0 - x) * (1.0 + x)).ln();
    if w < 5.0 {
        w -= 2.5;

        let mut p = 2.81022636e-08;
        p = 3.43273939e-07 + p * w;
        p = -3.5233877e-06 + p * w;
        p = -4.39150654e-06 + p * w;
        p = 0.00021858087 + p * w;
        p = -0.00125372503 + p * w;
        p = -0.00417768164 + p * w;
        p = 0.246640727 + p * w;
        p = 1.50140941 + p * w;
        p * x
    } else {
        w = w.sqrt() - 3.0;

        let mut p = -0.000200214257;
        p = 0.000100950558 + p * w;
        p = 0.00134934322 + p * w;
        p = -0.00367342844 + p * w;
        p = 0.00573950773 + p * w;
        p = -0.0076224613 + p * w;
        p = 0.00943887047 + p * w;
        p = 1.00167406 + p * w;
        p = 2.83297682 + p * w;
        p * x
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
