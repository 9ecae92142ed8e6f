//! Halton Sampler.

use pbrt_core::geometry::*;
use pbrt_core::low_discrepancy::*;
use pbrt_core::paramset::*;
use pbrt_core::pbrt::*;
use pbrt_core::primes::*;
use pbrt_core::sampler::*;
use crate::common::*;
use std::fmt;
use std::sync::Arc;

/// Maximum resolution for sampling first 2 dimensions.
const MAX_HALTON_RESOLUTION: Int = 128;

/// Implements a low-discrepancy sampler using Halton sequences.
#[derive(Clone)]
pub struct HaltonSampler {
    /// Number of samples generated for each pixel.
    samples_per_pixel: usize,

    /// Digit permutations for every prime base, shared between clones.
    digit_permutations: Arc<DigitPermutations>,

    /// The scale factors `2^j` and `3^k` for corresponding exponents `j` and
    /// `k` stored in `base_exponents`.
    base_scales: [u64; 2],

    /// The exponents `j` and `k` used to compute the scale factors in `base_scales`.
    base_exponents: [u64; 2],

    /// Multiplicative inverses used to combine the two axis offsets.
    mult_inverse: [u64; 2],

    /// Index of the current sample vector in the Halton sequence.
    halton_index: u64,

    /// Next dimension to return.
    dimension: usize,
}

impl HaltonSampler {
    /// Create a new `HaltonSampler`.
    ///
    /// * `samples_per_pixel` - Number of samples per pixel.
    /// * `full_resolution`   - Resolution of the image.
    /// * `seed`              - Seed for the digit permutations.
    pub fn new(samples_per_pixel: usize, full_resolution: Point2i, seed: u32) -> Self {
        // Find base scales and exponents that cover sampling area.
        let mut base_scales = [1_u64; 2];
        let mut base_exponents = [0_u64; 2];
        for i in 0..2 {
            let base = if i == 0 { 2_u64 } else { 3_u64 };
            let mut scale = 1_u64;
            let mut exp = 0_u64;
            while (scale as Int) < min(full_resolution[i], MAX_HALTON_RESOLUTION) {
                scale *= base;
                exp += 1;
            }
            base_scales[i] = scale;
            base_exponents[i] = exp;
        }

        // Compute multiplicative inverses for `base_scales`.
        let mult_inverse = [
            multiplicative_inverse(base_scales[1] as i64, base_scales[0] as i64),
            multiplicative_inverse(base_scales[0] as i64, base_scales[1] as i64),
        ];

        Self {
            samples_per_pixel,
            digit_permutations: Arc::new(DigitPermutations::new(seed)),
            base_scales,
            base_exponents,
            mult_inverse,
            halton_index: 0,
            dimension: 0,
        }
    }
}

impl Sampler for HaltonSampler {
    fn samples_per_pixel(&self) -> usize {
        self.samples_per_pixel
    }

    /// Finds the first Halton sample inside pixel `p` and steps over the
    /// earlier samples of that pixel.
    fn start_pixel_sample(&mut self, p: Point2i, sample_index: usize, dimension: usize) {
        self.halton_index = 0;

        // Any particular pixel is visited once per `sample_stride` sample vectors.
        let sample_stride = self.base_scales[0] * self.base_scales[1];
        if sample_stride > 1 {
            let pm = Point2i::new(
                rem(p.x, MAX_HALTON_RESOLUTION),
                rem(p.y, MAX_HALTON_RESOLUTION),
            );
            for i in 0..2 {
                let base = if i == 0 { 2 } else { 3 };
                let dim_offset = inverse_radical_inverse(pm[i] as u64, base, self.base_exponents[i]);
                self.halton_index +=
                    dim_offset * (sample_stride / self.base_scales[i]) * self.mult_inverse[i];
            }
            self.halton_index %= sample_stride;
        }

        self.halton_index += sample_index as u64 * sample_stride;
        self.dimension = dimension;
    }

    fn get_1d(&mut self) -> Float {
        if self.dimension >= PRIME_TABLE_SIZE {
            self.dimension = 2;
        }
        let dim = self.dimension;
        self.dimension += 1;
        scrambled_radical_inverse(dim, self.halton_index, self.digit_permutations.get(dim))
    }

    fn get_2d(&mut self) -> Point2f {
        if self.dimension == 0 {
            // Return the offset of the sample within its pixel.
            self.dimension += 2;
            Point2f::new(
                radical_inverse(0, self.halton_index >> self.base_exponents[0]),
                radical_inverse(1, self.halton_index / self.base_scales[1]),
            )
        } else {
            if self.dimension + 1 >= PRIME_TABLE_SIZE {
                self.dimension = 2;
            }
            let dim = self.dimension;
            self.dimension += 2;
            Point2f::new(
                scrambled_radical_inverse(dim, self.halton_index, self.digit_permutations.get(dim)),
                scrambled_radical_inverse(
                    dim + 1,
                    self.halton_index,
                    self.digit_permutations.get(dim + 1),
                ),
            )
        }
    }
}

impl fmt::Display for HaltonSampler {
    /// Formats the value using the given formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[ HaltonSampler samples_per_pixel: {} seed: {} base_scales: {:?} base_exponents: {:?} \
             mult_inverse: {:?} halton_index: {} dimension: {} ]",
            self.samples_per_pixel,
            self.digit_permutations.seed(),
            self.base_scales,
            self.base_exponents,
            self.mult_inverse,
            self.halton_index,
            self.dimension
        )
    }
}

impl TryFrom<(&ParamSet, Point2i, u32)> for HaltonSampler {
    type Error = String;

    /// Create a `HaltonSampler` from given parameter set, image resolution and
    /// default seed.
    ///
    /// * `p` - A tuple containing parameter set, image resolution and seed.
    fn try_from(p: (&ParamSet, Point2i, u32)) -> Result<Self, Self::Error> {
        let (params, full_resolution, seed) = p;
        let samples_per_pixel = pixel_samples(params)?;
        let seed = sampler_seed(params, seed);
        Ok(Self::new(samples_per_pixel, full_resolution, seed))
    }
}

/// Returns `x` and `y` with `a * x + b * y = gcd(a, b)`.
///
/// * `a` - First value.
/// * `b` - Second value.
fn extended_gcd(a: i64, b: i64) -> (i64, i64) {
    let (mut old_r, mut r) = (a, b);
    let (mut old_x, mut x) = (1_i64, 0_i64);
    let (mut old_y, mut y) = (0_i64, 1_i64);
    while r != 0 {
        let q = old_r / r;
        (old_r, r) = (r, old_r - q * r);
        (old_x, x) = (x, old_x - q * x);
        (old_y, y) = (y, old_y - q * y);
    }
    (old_x, old_y)
}

/// Returns the inverse of `a` modulo `n`; `a` and `n` must be coprime.
///
/// * `a` - The value.
/// * `n` - The modulus.
fn multiplicative_inverse(a: i64, n: i64) -> u64 {
    let (x, _) = extended_gcd(a, n);
    rem(x, n) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn inverses() {
        assert_eq!(multiplicative_inverse(27, 128), 19);
        assert_eq!((27 * 19) % 128, 1);
        assert_eq!(multiplicative_inverse(128, 243), 131);
        assert_eq!((128 * 131) % 243, 1);
        assert_eq!(multiplicative_inverse(5, 1), 0);
    }

    #[test]
    fn scales_follow_resolution() {
        let sampler = HaltonSampler::new(16, Point2i::new(64, 64), 0);
        assert_eq!(sampler.base_scales, [64, 81]);
        assert_eq!(sampler.base_exponents, [6, 4]);

        let sampler = HaltonSampler::new(16, Point2i::new(1920, 1080), 0);
        assert_eq!(sampler.base_scales, [128, 243]);
    }

    #[test]
    fn first_sample_of_origin() {
        let mut sampler = HaltonSampler::new(16, Point2i::new(64, 64), 0);
        sampler.start_pixel_sample(Point2i::new(0, 0), 0, 0);
        assert_eq!(sampler.get_2d(), Point2f::new(0.0, 0.0));

        let expected = scrambled_radical_inverse(2, 0, sampler.digit_permutations.get(2));
        assert_eq!(sampler.get_1d(), expected);
    }

    #[test]
    fn sample_index_lands_in_pixel_tile() {
        let mut sampler = HaltonSampler::new(4, Point2i::new(8, 9), 0);
        for y in 0..9 {
            for x in 0..8 {
                for i in 0..4 {
                    sampler.start_pixel_sample(Point2i::new(x, y), i, 0);
                    let h = sampler.halton_index;
                    assert_eq!(h % 8, inverse_radical_inverse(x as u64, 2, 3));
                    assert_eq!(h % 9, inverse_radical_inverse(y as u64, 3, 2));
                    assert_eq!(h / 72, i as u64);
                }
            }
        }
    }

    #[test]
    fn dimensions_wrap() {
        let mut sampler = HaltonSampler::new(4, Point2i::new(16, 16), 3);
        sampler.start_pixel_sample(Point2i::new(1, 2), 1, PRIME_TABLE_SIZE - 1);
        let wrapped = sampler.get_2d();
        sampler.start_pixel_sample(Point2i::new(1, 2), 1, 2);
        assert_eq!(sampler.get_2d(), wrapped);

        sampler.start_pixel_sample(Point2i::new(1, 2), 1, PRIME_TABLE_SIZE);
        let wrapped = sampler.get_1d();
        sampler.start_pixel_sample(Point2i::new(1, 2), 1, 2);
        assert_eq!(sampler.get_1d(), wrapped);
    }

    #[test]
    fn from_params() {
        let mut params = ParamSet::new();
        params.add_int("pixelsamples", &[8]);
        params.add_int("seed", &[5]);
        let sampler = HaltonSampler::try_from((&params, Point2i::new(32, 32), 0)).unwrap();
        assert_eq!(sampler.samples_per_pixel(), 8);
        assert_eq!(sampler.digit_permutations.seed(), 5);

        params.add_int("pixelsamples", &[0]);
        assert!(HaltonSampler::try_from((&params, Point2i::new(32, 32), 0)).is_err());
    }

    proptest! {
        #[test]
        fn deterministic_and_in_range(
            x in -300..300i32,
            y in -300..300i32,
            i in 0..64usize,
            seed in any::<u32>(),
        ) {
            let mut a = HaltonSampler::new(64, Point2i::new(200, 100), seed);
            let mut b = a.clone_samplers(1).remove(0);
            a.start_pixel_sample(Point2i::new(x, y), i, 0);
            b.start_pixel_sample(Point2i::new(x, y), i, 0);
            for _ in 0..8 {
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
