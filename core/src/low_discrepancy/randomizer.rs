//! Randomizers

use crate::hash::mix_bits;
use crate::pbrt::*;
use std::fmt;
use std::str::FromStr;

/// Randomizes the 32 fixed-point bits of a sample in `[0, 1)`.
pub trait Randomizer {
    /// Returns the randomized bits.
    ///
    /// * `v` - Sample bits.
    fn randomize(&self, v: u32) -> u32;
}

/// Leaves samples untouched.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoRandomizer;

impl Randomizer for NoRandomizer {
    #[inline(always)]
    fn randomize(&self, v: u32) -> u32 {
        v
    }
}

/// Adds a constant offset modulo 1.
#[derive(Copy, Clone, Debug)]
pub struct CranleyPattersonRotator {
    offset: u32,
}

impl CranleyPattersonRotator {
    /// Create a rotation by the fixed-point offset `offset / 2^32`.
    ///
    /// * `offset` - The offset bits.
    pub fn new(offset: u32) -> Self {
        Self { offset }
    }

    /// Create a rotation by an offset in `[0, 1)`.
    ///
    /// * `v` - The offset.
    pub fn from_float(v: Float) -> Self {
        Self::new((v as f64 * 4294967296.0) as u32)
    }
}

impl Randomizer for CranleyPattersonRotator {
    #[inline(always)]
    fn randomize(&self, v: u32) -> u32 {
        v.wrapping_add(self.offset)
    }
}

/// Flips a fixed set of bits. This permutes the elementary intervals of a
/// (t, m, s)-net without breaking them.
#[derive(Copy, Clone, Debug)]
pub struct XorScrambler {
    permutation: u32,
}

impl XorScrambler {
    /// Create a new `XorScrambler`.
    ///
    /// * `permutation` - The bits to flip.
    pub fn new(permutation: u32) -> Self {
        Self { permutation }
    }
}

impl Randomizer for XorScrambler {
    #[inline(always)]
    fn randomize(&self, v: u32) -> u32 {
        v ^ self.permutation
    }
}

/// Nested uniform (Owen) scrambling: each bit is flipped based on a hash of
/// all the bits above it.
#[derive(Copy, Clone, Debug)]
pub struct OwenScrambler {
    seed: u32,
}

impl OwenScrambler {
    /// Create a new `OwenScrambler`.
    ///
    /// * `seed` - The seed.
    pub fn new(seed: u32) -> Self {
        Self { seed }
    }
}

impl Randomizer for OwenScrambler {
    fn randomize(&self, v: u32) -> u32 {
        let mut v = v;
        if self.seed & 1 == 1 {
            v ^= 1 << 31;
        }
        for b in 1..32 {
            let mask = u32::MAX << (32 - b);
            if (mix_bits(((v & mask) ^ self.seed) as u64) as u32) & (1 << b) != 0 {
                v ^= 1 << (31 - b);
            }
        }
        v
    }
}

/// Approximate Owen scrambling with a Laine-Karras style hash that only
/// propagates information from higher to lower bits.
#[derive(Copy, Clone, Debug)]
pub struct FastOwenScrambler {
    seed: u32,
}

impl FastOwenScrambler {
    /// Create a new `FastOwenScrambler`.
    ///
    /// * `seed` - The seed.
    pub fn new(seed: u32) -> Self {
        Self { seed }
    }
}

impl Randomizer for FastOwenScrambler {
    #[inline(always)]
    fn randomize(&self, v: u32) -> u32 {
        let mut v = v.reverse_bits();
        v ^= v.wrapping_mul(0x3d20adea);
        v = v.wrapping_add(self.seed);
        v = v.wrapping_mul((self.seed >> 16) | 1);
        v ^= v.wrapping_mul(0x05526c56);
        v ^= v.wrapping_mul(0x53a22864);
        v.reverse_bits()
    }
}

/// How the Sobol' family of samplers decorrelates samples.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RandomizeStrategy {
    /// Raw, unscrambled samples.
    None,

    /// Cranley-Patterson rotation.
    CranleyPatterson,

    /// Random digit flipping.
    Xor,

    /// Nested uniform scrambling.
    Owen,
}

impl FromStr for RandomizeStrategy {
    type Err = String;

    /// Parse a strategy from its scene-description name.
    ///
    /// * `s` - The name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "cranleypatterson" => Ok(Self::CranleyPatterson),
            "xor" => Ok(Self::Xor),
            "owen" => Ok(Self::Owen),
            _ => Err(format!("{}: unknown randomization strategy", s)),
        }
    }
}

impl fmt::Display for RandomizeStrategy {
    /// Formats the value using the given formatter.
    ///
    /// * `f` - Formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::CranleyPatterson => "cranleypatterson",
            Self::Xor => "xor",
            Self::Owen => "owen",
        };
        write!(f, "{}", name)
    }
}
