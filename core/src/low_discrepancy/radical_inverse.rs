//! Radical Inverse

use super::DigitPermutation;
use crate::pbrt::*;
use crate::primes::*;
use crate::rng::*;

/// Returns the radical inverse of `a` in the prime base `PRIMES[base_index]`,
/// i.e. the digits of `a` mirrored around the radix point.
///
/// * `base_index` - Index of the prime base.
/// * `a`          - The value.
pub fn radical_inverse(base_index: usize, a: u64) -> Float {
    let base = PRIMES[base_index];

    // Stop before `reversed_digits` overflows 64 bits.
    let limit = u64::MAX / base - base;
    let inv_base = 1.0 / base as Float;
    let mut inv_base_m: Float = 1.0;
    let mut reversed_digits = 0_u64;

    let mut a = a;
    while a != 0 && reversed_digits < limit {
        let next = a / base;
        let digit = a - next * base;
        reversed_digits = reversed_digits * base + digit;
        inv_base_m *= inv_base;
        a = next;
    }

    min(reversed_digits as Float * inv_base_m, ONE_MINUS_EPSILON)
}

/// Recovers the integer whose first `n_digits` reversed digits in `base`
/// are `inverse`.
///
/// * `inverse`  - The reversed digits as an integer.
/// * `base`     - The base.
/// * `n_digits` - Number of digits.
pub fn inverse_radical_inverse(inverse: u64, base: u64, n_digits: u64) -> u64 {
    let mut inverse = inverse;
    let mut index = 0_u64;
    for _ in 0..n_digits {
        let digit = inverse % base;
        inverse /= base;
        index = index * base + digit;
    }
    index
}

/// Returns the radical inverse of `a` in the prime base `PRIMES[base_index]`
/// with every digit passed through `perm`. Digits beyond the most significant
/// non-zero digit are permuted too, so the result is non-zero even for `a = 0`.
///
/// * `base_index` - Index of the prime base.
/// * `a`          - The value.
/// * `perm`       - Digit permutation for the base.
pub fn scrambled_radical_inverse(base_index: usize, a: u64, perm: &DigitPermutation) -> Float {
    let base = PRIMES[base_index];
    debug_assert_eq!(base, perm.base);

    let limit = u64::MAX / base - base;
    let inv_base = 1.0 / base as Float;
    let mut inv_base_m: Float = 1.0;
    let mut reversed_digits = 0_u64;
    let mut digit_index = 0;

    let mut a = a;
    while 1.0 - (base as Float - 1.0) * inv_base_m < 1.0 && reversed_digits < limit {
        let next = a / base;
        let digit_value = a - next * base;
        reversed_digits = reversed_digits * base + perm.permute(digit_index, digit_value);
        inv_base_m *= inv_base;
        digit_index += 1;
        a = next;
    }

    min(inv_base_m * reversed_digits as Float, ONE_MINUS_EPSILON)
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    #[test]
    fn van_der_corput() {
        let expected = [0.0, 0.5, 0.25, 0.75, 0.125, 0.625, 0.375, 0.875];
        for (a, &e) in expected.iter().enumerate() {
            assert_eq!(radical_inverse(0, a as u64), e);
        }
    }

    #[test]
    fn base_three() {
        assert!(approx_eq!(f32, radical_inverse(1, 1), 1.0 / 3.0, epsilon = 1e-6));
        assert!(approx_eq!(f32, radical_inverse(1, 3), 1.0 / 9.0, epsilon = 1e-6));
        assert!(approx_eq!(f32, radical_inverse(1, 5), 7.0 / 9.0, epsilon = 1e-6));
    }

    #[test]
    fn scrambled_zero_in_range() {
        let perm = DigitPermutation::new(PRIMES[2], 0);
        let v = scrambled_radical_inverse(2, 0, &perm);
        assert!((0.0..1.0).contains(&v));
    }

    proptest! {
        #[test]
        fn inverse_round_trip_base2(x in 0..128u64) {
            // 7 digits cover [0, 128).
            let index = inverse_radical_inverse(x, 2, 7);
            prop_assert_eq!(index.reverse_bits() >> (64 - 7), x);
        }

        #[test]
        fn in_unit_interval(base_index in 0..PRIME_TABLE_SIZE, a in any::<u64>()) {
            let v = radical_inverse(base_index, a);
            prop_assert!((0.0..1.0).contains(&v));
        }

        #[test]
        fn scrambled_in_unit_interval(base_index in 0..64usize, a in any::<u64>(), seed in any::<u32>()) {
            let perm = DigitPermutation::new(PRIMES[base_index], seed);
            let v = scrambled_radical_inverse(base_index, a, &perm);
            prop_assert!((0.0..1.0).contains(&v));
        }
    }
}
