//! Stratified Sampler.

use crate::common::*;
use crate::random::pixel_sequence;
use pbrt_core::geometry::*;
use pbrt_core::hash::*;
use pbrt_core::paramset::*;
use pbrt_core::pbrt::*;
use pbrt_core::rng::*;
use pbrt_core::sampler::*;
use std::fmt;

/// Implements a sampler that subdivides pixel areas into rectangular regions
/// and generates a single sample inside each region. Each pixel and dimension
/// visits the strata in its own order.
#[derive(Clone)]
pub struct StratifiedSampler {
    /// Number of strata in x-direction.
    x_pixel_samples: usize,

    /// Number of strata in y-direction.
    y_pixel_samples: usize,

    /// Seed for the stratum orders and jitter.
    seed: u32,

    /// Jitter samples within each stratum, otherwise use the stratum center.
    jitter: bool,

    /// The random number generator.
    rng: RNG,

    /// The current pixel.
    pixel: Point2i,

    /// Sample index within the current pixel.
    sample_index: usize,

    /// Next dimension to return.
    dimension: usize,
}

impl StratifiedSampler {
    /// Create a new `StratifiedSampler`.
    ///
    /// * `x_pixel_samples` - Number of strata in x-direction.
    /// * `y_pixel_samples` - Number of strata in y-direction.
    /// * `jitter`          - Jitter samples within each stratum.
    /// * `seed`            - Seed for stratum orders and jitter.
    pub fn new(x_pixel_samples: usize, y_pixel_samples: usize, jitter: bool, seed: u32) -> Self {
        Self {
            x_pixel_samples,
            y_pixel_samples,
            seed,
            jitter,
            rng: RNG::default(),
            pixel: Point2i::zero(),
            sample_index: 0,
            dimension: 0,
        }
    }

    /// Returns the stratum of the current sample in the current dimension.
    fn stratum(&self) -> usize {
        let hash = mix_bits(
            ((self.pixel.x as u64) << 48)
                ^ ((self.pixel.y as u64) << 32)
                ^ ((self.dimension as u64) << 16)
                ^ self.seed as u64,
        );
        permutation_element(
            self.sample_index as u32,
            self.samples_per_pixel() as u32,
            hash as u32,
        ) as usize
    }

    /// Returns the offset of the sample within its stratum.
    fn delta(&mut self) -> Float {
        if self.jitter {
            self.rng.uniform_float()
        } else {
            0.5
        }
    }
}

impl Sampler for StratifiedSampler {
    fn samples_per_pixel(&self) -> usize {
        self.x_pixel_samples * self.y_pixel_samples
    }

    fn start_pixel_sample(&mut self, p: Point2i, sample_index: usize, dimension: usize) {
        self.pixel = p;
        self.sample_index = sample_index;
        self.dimension = dimension;

        self.rng.set_sequence(pixel_sequence(p, self.seed));
        self.rng
            .advance((sample_index as u64) * 65536 + dimension as u64);
    }

    fn get_1d(&mut self) -> Float {
        let stratum = self.stratum();
        self.dimension += 1;

        let delta = self.delta();
        min(
            (stratum as Float + delta) / self.samples_per_pixel() as Float,
            ONE_MINUS_EPSILON,
        )
    }

    fn get_2d(&mut self) -> Point2f {
        let stratum = self.stratum();
        self.dimension += 2;

        let x = stratum % self.x_pixel_samples;
        let y = stratum / self.x_pixel_samples;
        let dx = self.delta();
        let dy = self.delta();
        Point2f::new(
            min((x as Float + dx) / self.x_pixel_samples as Float, ONE_MINUS_EPSILON),
            min((y as Float + dy) / self.y_pixel_samples as Float, ONE_MINUS_EPSILON),
        )
    }
}

impl fmt::Display for StratifiedSampler {
    /// Formats the value using the given formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[ StratifiedSampler pixel: {} sample_index: {} dimension: {} x_pixel_samples: {} \
             y_pixel_samples: {} jitter: {} seed: {} rng: {} ]",
            self.pixel,
            self.sample_index,
            self.dimension,
            self.x_pixel_samples,
            self.y_pixel_samples,
            self.jitter,
            self.seed,
            self.rng
        )
    }
}

impl TryFrom<(&ParamSet, u32)> for StratifiedSampler {
    type Error = String;

    /// Create a `StratifiedSampler` from given parameter set and default seed.
    ///
    /// * `p` - A tuple containing parameter set and seed.
    fn try_from(p: (&ParamSet, u32)) -> Result<Self, Self::Error> {
        let (params, seed) = p;
        let jitter = params.find_one_bool("jitter", true);

        // An explicit sample count overrides the strata.
        let (x_samples, y_samples) = if params.find_int("pixelsamples").is_empty() {
            let x_samples = params.find_one_int("xsamples", 4);
            let y_samples = params.find_one_int("ysamples", 4);
            if x_samples <= 0 || y_samples <= 0 {
                return Err(format!(
                    "{}x{}: \"xsamples\" and \"ysamples\" must be positive.",
                    x_samples, y_samples
                ));
            }
            (x_samples as usize, y_samples as usize)
        } else {
            strata(pixel_samples(params)?)
        };

        Ok(Self::new(x_samples, y_samples, jitter, sampler_seed(params, seed)))
    }
}

/// Splits a sample count into the most square grid of strata.
///
/// * `n` - Number of samples; must be positive.
fn strata(n: usize) -> (usize, usize) {
    let mut div = (n as f64).sqrt() as usize;
    while n % div != 0 {
        div -= 1;
    }
    (div, n / div)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn unjittered_samples_cover_every_stratum() {
        let mut sampler = StratifiedSampler::new(4, 3, false, 0);
        let n = sampler.samples_per_pixel();
        assert_eq!(n, 12);

        for dimension in [0, 2, 5] {
            let cells: HashSet<(i32, i32)> = (0..n)
                .map(|i| {
                    sampler.start_pixel_sample(Point2i::new(6, 1), i, dimension);
                    let u = sampler.get_2d();
                    // Unjittered samples sit at the stratum centers.
                    ((u.x * 4.0 - 0.5).round() as i32, (u.y * 3.0 - 0.5).round() as i32)
                })
                .collect();
            assert_eq!(cells.len(), n);
            assert!(cells.iter().all(|&(x, y)| (0..4).contains(&x) && (0..3).contains(&y)));
        }
    }

    #[test]
    fn one_dimensional_strata() {
        let mut sampler = StratifiedSampler::new(2, 4, true, 9);
        let strata: HashSet<i32> = (0..8)
            .map(|i| {
                sampler.start_pixel_sample(Point2i::new(2, 3), i, 1);
                (sampler.get_1d() * 8.0) as i32
            })
            .collect();
        assert_eq!(strata.len(), 8);
    }

    #[test]
    fn stratum_orders_differ_between_pixels() {
        let mut sampler = StratifiedSampler::new(4, 4, false, 0);
        let order = |sampler: &mut StratifiedSampler, p: Point2i| -> Vec<Point2f> {
            (0..16)
                .map(|i| {
                    sampler.start_pixel_sample(p, i, 0);
                    sampler.get_2d()
                })
                .collect()
        };
        let a = order(&mut sampler, Point2i::new(0, 0));
        let b = order(&mut sampler, Point2i::new(1, 0));
        assert_ne!(a, b);
    }

    #[test]
    fn from_params() {
        let mut params = ParamSet::new();
        params.add_int("xsamples", &[2]);
        params.add_int("ysamples", &[8]);
        params.add_bool("jitter", &[false]);
        let sampler = StratifiedSampler::try_from((&params, 0)).unwrap();
        assert_eq!(sampler.samples_per_pixel(), 16);
        assert!(!sampler.jitter);

        params.add_int("ysamples", &[0]);
        assert!(StratifiedSampler::try_from((&params, 0)).is_err());
    }

    #[test]
    fn pixel_samples_override_strata() {
        assert_eq!(strata(1), (1, 1));
        assert_eq!(strata(8), (2, 4));
        assert_eq!(strata(16), (4, 4));
        assert_eq!(strata(7), (1, 7));
        assert_eq!(strata(12), (3, 4));

        let mut params = ParamSet::new();
        params.add_int("xsamples", &[3]);
        params.add_int("pixelsamples", &[8]);
        let sampler = StratifiedSampler::try_from((&params, 0)).unwrap();
        assert_eq!(sampler.samples_per_pixel(), 8);
        assert_eq!((sampler.x_pixel_samples, sampler.y_pixel_samples), (2, 4));

        params.add_int("pixelsamples", &[0]);
        assert!(StratifiedSampler::try_from((&params, 0)).is_err());
    }

    proptest! {
        #[test]
        fn deterministic_and_in_range(
            x in -1000..1000i32,
            y in -1000..1000i32,
            i in 0..12usize,
            jitter in any::<bool>(),
            seed in any::<u32>(),
        ) {
            let mut a = StratifiedSampler::new(3, 4, jitter, seed);
            let mut b = a.clone();
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
