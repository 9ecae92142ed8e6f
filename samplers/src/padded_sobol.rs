//! Padded Sobol' Sampler.

use crate::common::*;
use pbrt_core::blue_noise::*;
use pbrt_core::geometry::*;
use pbrt_core::hash::*;
use pbrt_core::low_discrepancy::*;
use pbrt_core::paramset::*;
use pbrt_core::pbrt::*;
use pbrt_core::sampler::*;
use std::fmt;

/// Implements a sampler that pads independently randomized 1D and 2D Sobol'
/// samples. Every dimension reuses the first two Sobol' dimensions with the
/// sample index shuffled per pixel and dimension.
#[derive(Clone)]
pub struct PaddedSobolSampler {
    /// Number of samples generated for each pixel.
    samples_per_pixel: usize,

    /// How sample values are randomized.
    randomize: RandomizeStrategy,

    /// Seed for the per-pixel shuffles and scramblers.
    seed: u32,

    /// The current pixel.
    pixel: Point2i,

    /// Sample index within the current pixel.
    sample_index: usize,

    /// Next dimension to return.
    dimension: usize,
}

impl PaddedSobolSampler {
    /// Create a new `PaddedSobolSampler`.
    ///
    /// * `samples_per_pixel` - Number of samples per pixel.
    /// * `randomize`         - Randomization strategy.
    /// * `seed`              - Seed for the shuffles and scramblers.
    pub fn new(samples_per_pixel: usize, randomize: RandomizeStrategy, seed: u32) -> Self {
        if !is_power_of_2(samples_per_pixel as Int) {
            warn!(
                "Sobol samplers with non power-of-two sample counts ({}) are sub-optimal.",
                samples_per_pixel
            );
        }

        Self {
            samples_per_pixel,
            randomize,
            seed,
            pixel: Point2i::zero(),
            sample_index: 0,
            dimension: 0,
        }
    }

    /// Returns the hash of the current pixel and dimension and the sample
    /// index shuffled by it.
    fn permuted_index(&self) -> (u64, u64) {
        let hash = mix_bits(
            ((self.pixel.x as u64) << 48)
                ^ ((self.pixel.y as u64) << 32)
                ^ ((self.dimension as u64) << 16)
                ^ self.seed as u64,
        );
        let index = permutation_element(
            self.sample_index as u32,
            self.samples_per_pixel as u32,
            hash as u32,
        );
        (hash, index as u64)
    }

    /// Returns a Sobol' sample scrambled with the given seed.
    ///
    /// * `dimension` - Sobol' dimension, 0 or 1.
    /// * `a`         - Sample index.
    /// * `hash`      - Scrambler seed.
    fn sample_dimension(&self, dimension: usize, a: u64, hash: u32) -> Float {
        match self.randomize {
            RandomizeStrategy::None => sobol_sample(a, dimension, &NoRandomizer),
            RandomizeStrategy::Xor => sobol_sample(a, dimension, &XorScrambler::new(hash)),
            RandomizeStrategy::Owen => sobol_sample(a, dimension, &OwenScrambler::new(hash)),
            RandomizeStrategy::CranleyPatterson => {
                unreachable!("Cranley-Patterson rotation uses blue noise offsets")
            }
        }
    }
}

impl Sampler for PaddedSobolSampler {
    fn samples_per_pixel(&self) -> usize {
        self.samples_per_pixel
    }

    fn start_pixel_sample(&mut self, p: Point2i, sample_index: usize, dimension: usize) {
        self.pixel = p;
        self.sample_index = sample_index;
        self.dimension = dimension;
    }

    fn get_1d(&mut self) -> Float {
        let (hash, index) = self.permuted_index();
        let dim = self.dimension;
        self.dimension += 1;

        if self.randomize == RandomizeStrategy::CranleyPatterson {
            let rotator = CranleyPattersonRotator::from_float(blue_noise(dim, self.pixel));
            sobol_sample(index, 0, &rotator)
        } else {
            self.sample_dimension(0, index, (hash >> 32) as u32)
        }
    }

    fn get_2d(&mut self) -> Point2f {
        let (hash, index) = self.permuted_index();
        let dim = self.dimension;
        self.dimension += 2;

        if self.randomize == RandomizeStrategy::CranleyPatterson {
            let rx = CranleyPattersonRotator::from_float(blue_noise(dim, self.pixel));
            let ry = CranleyPattersonRotator::from_float(blue_noise(dim + 1, self.pixel));
            Point2f::new(sobol_sample(index, 0, &rx), sobol_sample(index, 1, &ry))
        } else {
            Point2f::new(
                self.sample_dimension(0, index, (hash >> 8) as u32),
                self.sample_dimension(1, index, (hash >> 32) as u32),
            )
        }
    }
}

impl fmt::Display for PaddedSobolSampler {
    /// Formats the value using the given formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[ PaddedSobolSampler pixel: {} sample_index: {} dimension: {} samples_per_pixel: {} \
             seed: {} randomize: {} ]",
            self.pixel, self.sample_index, self.dimension, self.samples_per_pixel, self.seed, self.randomize
        )
    }
}

impl TryFrom<(&ParamSet, u32)> for PaddedSobolSampler {
    type Error = String;

    /// Create a `PaddedSobolSampler` from given parameter set and default seed.
    ///
    /// * `p` - A tuple containing parameter set and seed.
    fn try_from(p: (&ParamSet, u32)) -> Result<Self, Self::Error> {
        let (params, seed) = p;
        let samples_per_pixel = pixel_samples(params)?;
        let randomize = randomize_strategy(params)?;
        Ok(Self::new(samples_per_pixel, randomize, sampler_seed(params, seed)))
    }
}
