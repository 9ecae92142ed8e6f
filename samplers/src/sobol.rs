//! Sobol' Sampler.

use crate::common::*;
use pbrt_core::geometry::*;
use pbrt_core::hash::*;
use pbrt_core::low_discrepancy::*;
use pbrt_core::paramset::*;
use pbrt_core::pbrt::*;
use pbrt_core::rng::*;
use pbrt_core::sampler::*;
use pbrt_core::sobol_matrices::*;
use std::fmt;
use std::sync::Arc;

/// Largest distance a pixel sample may fall outside its pixel before the
/// mapping from pixels to sequence indices is considered broken.
const PIXEL_SAMPLE_TOLERANCE: Float = 1e-7;

/// Implements a sampler that draws every pixel's samples from a disjoint part
/// of one global Sobol' sequence covering the whole image.
#[derive(Clone)]
pub struct SobolSampler {
    /// Number of samples generated for each pixel.
    samples_per_pixel: usize,

    /// Smallest power of 2 covering the larger image dimension.
    scale: Int,

    /// Maps (pixel, sample index) to sequence indices; shared between clones.
    interval: Arc<SobolIntervalMapping>,

    /// How sample values are randomized.
    randomize: RandomizeStrategy,

    /// Seed for the scramblers.
    seed: u32,

    /// The current pixel.
    pixel: Point2i,

    /// Next dimension to return.
    dimension: usize,

    /// Index of the current sample in the global sequence.
    sobol_index: u64,
}

impl SobolSampler {
    /// Create a new `SobolSampler`.
    ///
    /// * `samples_per_pixel` - Number of samples per pixel.
    /// * `full_resolution`   - Resolution of the image.
    /// * `randomize`         - Randomization strategy.
    /// * `seed`              - Seed for the scramblers.
    pub fn new(
        samples_per_pixel: usize,
        full_resolution: Point2i,
        randomize: RandomizeStrategy,
        seed: u32,
    ) -> Result<Self, String> {
        let max_resolution = max(full_resolution.x, full_resolution.y);
        if max_resolution > 1 << MAX_SOBOL_INTERVAL_LOG2 {
            return Err(format!(
                "{}x{}: SobolSampler supports image resolutions up to {}.",
                full_resolution.x,
                full_resolution.y,
                1 << MAX_SOBOL_INTERVAL_LOG2
            ));
        }

        let scale = round_up_pow2(max(max_resolution, 1));
        let m: i32 = Log2Int::log2int(scale as u32);

        // Pixel bits and sample bits must fit the generator matrices.
        let sample_bits = (samples_per_pixel as u64).next_power_of_two().trailing_zeros() as usize;
        if 2 * m as usize + sample_bits > SOBOL_MATRIX_SIZE {
            return Err(format!(
                "{} samples per pixel at resolution {}x{} exceed the Sobol' sequence length.",
                samples_per_pixel, full_resolution.x, full_resolution.y
            ));
        }

        if !is_power_of_2(samples_per_pixel as Int) {
            warn!(
                "Non power-of-two sample count {} will perform sub-optimally with the SobolSampler.",
                samples_per_pixel
            );
        }

        Ok(Self {
            samples_per_pixel,
            scale,
            interval: Arc::new(SobolIntervalMapping::new(m as u32)),
            randomize,
            seed,
            pixel: Point2i::zero(),
            dimension: 0,
            sobol_index: 0,
        })
    }

    /// Returns the sample value of the current sequence index in a dimension.
    ///
    /// * `dimension` - The dimension.
    fn sample_dimension(&self, dimension: usize) -> Float {
        if dimension < 2 || self.randomize == RandomizeStrategy::None {
            return sobol_sample(self.sobol_index, dimension, &NoRandomizer);
        }

        let hash = mix_bits(((dimension as u64) << 32) ^ self.seed as u64) as u32;
        match self.randomize {
            RandomizeStrategy::CranleyPatterson => {
                sobol_sample(self.sobol_index, dimension, &CranleyPattersonRotator::new(hash))
            }
            RandomizeStrategy::Xor => {
                sobol_sample(self.sobol_index, dimension, &XorScrambler::new(hash))
            }
            _ => sobol_sample(self.sobol_index, dimension, &OwenScrambler::new(hash)),
        }
    }
}

impl Sampler for SobolSampler {
    fn samples_per_pixel(&self) -> usize {
        self.samples_per_pixel
    }

    fn start_pixel_sample(&mut self, p: Point2i, sample_index: usize, dimension: usize) {
        self.pixel = p;
        self.dimension = dimension;
        self.sobol_index = self.interval.index(sample_index as u64, p);
    }

    fn get_1d(&mut self) -> Float {
        if self.dimension >= NUM_SOBOL_DIMENSIONS {
            self.dimension = 2;
        }
        let dim = self.dimension;
        self.dimension += 1;
        self.sample_dimension(dim)
    }

    fn get_2d(&mut self) -> Point2f {
        if self.dimension + 1 >= NUM_SOBOL_DIMENSIONS {
            self.dimension = 2;
        }

        let mut u = Point2f::new(
            self.sample_dimension(self.dimension),
            self.sample_dimension(self.dimension + 1),
        );

        if self.dimension == 0 {
            // Remap the image-wide sample into the pixel.
            for dim in 0..2 {
                let v = u[dim] * self.scale as Float - self.pixel[dim] as Float;
                assert!(
                    (-PIXEL_SAMPLE_TOLERANCE..=1.0 + PIXEL_SAMPLE_TOLERANCE).contains(&v),
                    "Sobol' sample {} of pixel {} is {} outside its pixel",
                    self.sobol_index,
                    self.pixel,
                    v
                );
                u[dim] = clamp(v, 0.0, ONE_MINUS_EPSILON);
            }
        }

        self.dimension += 2;
        u
    }
}

impl fmt::Display for SobolSampler {
    /// Formats the value using the given formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[ SobolSampler pixel: {} dimension: {} samples_per_pixel: {} scale: {} sobol_index: {} \
             seed: {} randomize: {} ]",
            self.pixel,
            self.dimension,
            self.samples_per_pixel,
            self.scale,
            self.sobol_index,
            self.seed,
            self.randomize
        )
    }
}

impl TryFrom<(&ParamSet, Point2i, u32)> for SobolSampler {
    type Error = String;

    /// Create a `SobolSampler` from given parameter set, image resolution and
    /// default seed.
    ///
    /// * `p` - A tuple containing parameter set, image resolution and seed.
    fn try_from(p: (&ParamSet, Point2i, u32)) -> Result<Self, Self::Error> {
        let (params, full_resolution, seed) = p;
        let samples_per_pixel = pixel_samples(params)?;
        let randomize = randomize_strategy(params)?;
        Self::new(
            samples_per_pixel,
            full_resolution,
            randomize,
            sampler_seed(params, seed),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn pixel_samples_stay_in_pixel() {
        let mut sampler = SobolSampler::new(8, Point2i::new(8, 6), RandomizeStrategy::Owen, 1).unwrap();
        assert_eq!(sampler.scale, 8);

        let mut indices = HashSet::new();
        for y in 0..6 {
            for x in 0..8 {
                for i in 0..8 {
                    sampler.start_pixel_sample(Point2i::new(x, y), i, 0);
                    assert!(indices.insert(sampler.sobol_index));

                    // Before remapping the raw sample lies in the pixel.
                    let raw = Point2f::new(sampler.sample_dimension(0), sampler.sample_dimension(1));
                    assert_eq!((raw.x * 8.0) as i32, x);
                    assert_eq!((raw.y * 8.0) as i32, y);

                    let u = sampler.get_2d();
                    assert!((0.0..1.0).contains(&u.x) && (0.0..1.0).contains(&u.y));
                }
            }
        }
    }

    #[test]
    fn single_pixel_image_uses_plain_sequence() {
        let mut sampler = SobolSampler::new(4, Point2i::new(1, 1), RandomizeStrategy::None, 0).unwrap();
        sampler.start_pixel_sample(Point2i::zero(), 3, 2);
        assert_eq!(sampler.sobol_index, 3);
        assert_eq!(sampler.get_1d(), sobol_sample(3, 2, &NoRandomizer));
    }

    #[test]
    fn dimensions_wrap() {
        let mut sampler = SobolSampler::new(4, Point2i::new(16, 16), RandomizeStrategy::Xor, 0).unwrap();
        sampler.start_pixel_sample(Point2i::new(3, 3), 2, NUM_SOBOL_DIMENSIONS - 1);
        let wrapped = sampler.get_2d();
        sampler.start_pixel_sample(Point2i::new(3, 3), 2, 2);
        assert_eq!(sampler.get_2d(), wrapped);
    }

    #[test]
    fn pixel_dimensions_are_never_scrambled() {
        let mut a = SobolSampler::new(4, Point2i::new(4, 4), RandomizeStrategy::Owen, 1).unwrap();
        let mut b = SobolSampler::new(4, Point2i::new(4, 4), RandomizeStrategy::Owen, 2).unwrap();
        a.start_pixel_sample(Point2i::new(2, 1), 3, 0);
        b.start_pixel_sample(Point2i::new(2, 1), 3, 0);
        assert_eq!(a.get_2d(), b.get_2d());
        assert_ne!(a.get_2d(), b.get_2d());
    }

    #[test]
    fn wide_images() {
        let mut params = ParamSet::new();
        params.add_int("pixelsamples", &[16]);
        let mut sampler = SobolSampler::try_from((&params, Point2i::new(70000, 16), 0)).unwrap();
        assert_eq!(sampler.scale, 131072);
        sampler.start_pixel_sample(Point2i::new(69999, 9), 15, 0);
        let u = sampler.get_2d();
        assert!((0.0..1.0).contains(&u.x) && (0.0..1.0).contains(&u.y));

        assert!(SobolSampler::try_from((&params, Point2i::new(1 << 24, 1), 0)).is_ok());
        assert!(SobolSampler::try_from((&params, Point2i::new((1 << 24) + 1, 1), 0)).is_err());

        // 48 pixel bits leave 4 bits of sample index.
        params.add_int("pixelsamples", &[64]);
        assert!(SobolSampler::try_from((&params, Point2i::new(1 << 24, 1), 0)).is_err());
        assert!(SobolSampler::try_from((&params, Point2i::new(1 << 23, 1), 0)).is_ok());
    }

    #[test]
    #[should_panic(expected = "outside its pixel")]
    fn pixel_remap_checks_tolerance() {
        let mut sampler = SobolSampler::new(4, Point2i::new(4, 4), RandomizeStrategy::None, 0).unwrap();
        sampler.start_pixel_sample(Point2i::zero(), 1, 0);
        // The sequence index still belongs to pixel (0, 0).
        sampler.pixel = Point2i::new(2, 0);
        sampler.get_2d();
    }

    proptest! {
        #[test]
        fn deterministic_and_in_range(
            s in 0..4usize,
            x in 0..640i32,
            y in 0..480i32,
            i in 0..64usize,
        ) {
            let strategies = [
                RandomizeStrategy::None,
                RandomizeStrategy::CranleyPatterson,
                RandomizeStrategy::Xor,
                RandomizeStrategy::Owen,
            ];
            let mut a = SobolSampler::new(64, Point2i::new(640, 480), strategies[s], 7).unwrap();
            let mut b = a.clone();
            a.start_pixel_sample(Point2i::new(x, y), i, 0);
            b.start_pixel_sample(Point2i::new(x, y), i, 0);
            for _ in 0..6 {
                let (ua, ub) = (a.get_2d(), b.get_2d());
                prop_assert_eq!(ua, ub);
                prop_assert!((0.0..1.0).contains(&ua.x) && (0.0..1.0).contains(&ua.y));
                let (va, vb) = (a.get_1d(), b.get_1d());
                prop_assert_eq!(va, vb);
                prop_assert!((0.0..1.0).contains(&va));
            }
        }
    }
}
