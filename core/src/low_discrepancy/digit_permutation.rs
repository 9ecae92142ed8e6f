//! Digit Permutations

use crate::hash::*;
use crate::pbrt::*;
use crate::primes::*;
use std::sync::OnceLock;

/// Random permutations of the digits `[0, base)` for every digit position
/// that is representable in `Float` precision.
#[derive(Clone, Debug)]
pub struct DigitPermutation {
    /// The base.
    pub base: u64,

    /// Number of digits.
    n_digits: usize,

    /// Permuted digit values stored as `n_digits` rows of `base` entries.
    permutations: Vec<u16>,
}

impl DigitPermutation {
    /// Creates the digit permutations for a given base.
    ///
    /// * `base` - The base; must fit in 16 bits.
    /// * `seed` - Seed used to select the permutations.
    pub fn new(base: u64, seed: u32) -> Self {
        assert!(base < 65536, "DigitPermutation base {} too large", base);

        // Count digits until their contribution falls below `Float` precision.
        let mut n_digits = 0;
        let inv_base = 1.0 / base as Float;
        let mut inv_base_m: Float = 1.0;
        while 1.0 - (base as Float - 1.0) * inv_base_m < 1.0 {
            n_digits += 1;
            inv_base_m *= inv_base;
        }

        let mut permutations = Vec::with_capacity(n_digits * base as usize);
        for digit_index in 0..n_digits {
            let digit_seed = hash_ints(&[base as i32, digit_index as i32, seed as i32]);
            for digit_value in 0..base as u32 {
                let p = permutation_element(digit_value, base as u32, digit_seed as u32);
                permutations.push(p as u16);
            }
        }

        Self {
            base,
            n_digits,
            permutations,
        }
    }

    /// Returns the number of digit positions covered.
    pub fn n_digits(&self) -> usize {
        self.n_digits
    }

    /// Returns the permuted value of a digit.
    ///
    /// * `digit_index` - Position of the digit.
    /// * `digit_value` - The digit.
    #[inline(always)]
    pub fn permute(&self, digit_index: usize, digit_value: u64) -> u64 {
        debug_assert!(digit_index < self.n_digits);
        debug_assert!(digit_value < self.base);
        self.permutations[digit_index * self.base as usize + digit_value as usize] as u64
    }
}

/// The digit permutations for all prime bases under a single seed. Each base
/// is built on first use and never changes afterwards, so the table can be
/// shared between threads.
#[derive(Debug)]
pub struct DigitPermutations {
    /// The seed.
    seed: u32,

    /// One slot per prime in `PRIMES`.
    tables: Vec<OnceLock<DigitPermutation>>,
}

impl DigitPermutations {
    /// Creates a new, empty table for the given seed.
    ///
    /// * `seed` - Seed used to select the permutations.
    pub fn new(seed: u32) -> Self {
        Self {
            seed,
            tables: (0..PRIME_TABLE_SIZE).map(|_| OnceLock::new()).collect(),
        }
    }

    /// Returns the seed.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Returns the digit permutation for the prime `PRIMES[base_index]`.
    ///
    /// * `base_index` - Index of the prime base.
    pub fn get(&self, base_index: usize) -> &DigitPermutation {
        self.tables[base_index].get_or_init(|| DigitPermutation::new(PRIMES[base_index], self.seed))
    }
}
