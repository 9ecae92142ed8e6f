//! Random Sampler.

use crate::common::*;
use pbrt_core::geometry::*;
use pbrt_core::paramset::*;
use pbrt_core::pbrt::*;
use pbrt_core::rng::*;
use pbrt_core::sampler::*;
use std::fmt;

/// Implements a sampler that uses a PRNG to generate uniformly random samples.
#[derive(Clone)]
pub struct RandomSampler {
    /// Number of samples generated for each pixel.
    samples_per_pixel: usize,

    /// Seed mixed into the sequence of every pixel.
    seed: u32,

    /// The random number generator.
    rng: RNG,
}

impl RandomSampler {
    /// Create a new `RandomSampler`.
    ///
    /// * `samples_per_pixel` - Number of samples to generate for each pixel.
    /// * `seed`              - Seed for the random number generator.
    pub fn new(samples_per_pixel: usize, seed: u32) -> Self {
        Self {
            samples_per_pixel,
            seed,
            rng: RNG::default(),
        }
    }
}

impl Sampler for RandomSampler {
    fn samples_per_pixel(&self) -> usize {
        self.samples_per_pixel
    }

    /// Selects the sequence of pixel `p` and skips to the values of the
    /// sample; each sample owns 65536 consecutive values.
    fn start_pixel_sample(&mut self, p: Point2i, sample_index: usize, dimension: usize) {
        self.rng.set_sequence(pixel_sequence(p, self.seed));
        self.rng
            .advance((sample_index as u64) * 65536 + dimension as u64);
    }

    fn get_1d(&mut self) -> Float {
        self.rng.uniform_float()
    }

    fn get_2d(&mut self) -> Point2f {
        Point2f::new(self.rng.uniform_float(), self.rng.uniform_float())
    }
}

impl fmt::Display for RandomSampler {
    /// Formats the value using the given formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[ RandomSampler samples_per_pixel: {} seed: {} rng: {} ]",
            self.samples_per_pixel, self.seed, self.rng
        )
    }
}

impl TryFrom<(&ParamSet, u32)> for RandomSampler {
    type Error = String;

    /// Create a `RandomSampler` from given parameter set and default seed.
    ///
    /// * `p` - A tuple containing parameter set and seed.
    fn try_from(p: (&ParamSet, u32)) -> Result<Self, Self::Error> {
        let (params, seed) = p;
        let samples_per_pixel = pixel_samples(params)?;
        Ok(Self::new(samples_per_pixel, sampler_seed(params, seed)))
    }
}

/// Returns the RNG sequence index of a pixel under a seed.
///
/// * `p`    - The pixel.
/// * `seed` - The seed.
pub(crate) fn pixel_sequence(p: Point2i, seed: u32) -> u64 {
    p.x.wrapping_add(p.y.wrapping_mul(65536)) as u64 | ((seed as u64) << 32)
}
