//! PMJ02BN Sampler.

use crate::common::*;
use pbrt_core::blue_noise::*;
use pbrt_core::geometry::*;
use pbrt_core::hash::*;
use pbrt_core::paramset::*;
use pbrt_core::pbrt::*;
use pbrt_core::pmj02_tables::*;
use pbrt_core::rng::*;
use pbrt_core::sampler::*;
use std::fmt;
use std::sync::Arc;

/// Implements a sampler based on progressive multi-jittered (0,2) point sets.
/// Pixel samples come from a tile of pixels carved out of one point set; the
/// remaining dimensions use the other sets rotated by blue noise.
#[derive(Clone)]
pub struct PMJ02BNSampler {
    /// Number of samples generated for each pixel.
    samples_per_pixel: usize,

    /// Seed for the per-pixel shuffles.
    seed: u32,

    /// Width and height of the pixel tile in pixels.
    pixel_tile_size: Int,

    /// Pixel samples for every pixel of the tile, `samples_per_pixel` each,
    /// shared between clones.
    pixel_samples: Arc<Vec<Point2f>>,

    /// The current pixel.
    pixel: Point2i,

    /// Sample index within the current pixel.
    sample_index: usize,

    /// Next dimension to return.
    dimension: usize,
}

impl PMJ02BNSampler {
    /// Create a new `PMJ02BNSampler`.
    ///
    /// * `samples_per_pixel` - Number of samples per pixel; at most the size
    ///                         of a point set.
    /// * `seed`              - Seed for the per-pixel shuffles.
    pub fn new(samples_per_pixel: usize, seed: u32) -> Result<Self, String> {
        if samples_per_pixel == 0 || samples_per_pixel > N_PMJ02BN_SAMPLES {
            return Err(format!(
                "PMJ02BNSampler only supports between 1 and {} samples per pixel ({} requested).",
                N_PMJ02BN_SAMPLES, samples_per_pixel
            ));
        }

        let spp = samples_per_pixel as Int;
        if !is_power_of_4(spp) {
            warn!(
                "PMJ02BNSampler results are best with power-of-4 samples per pixel (1, 4, 16, 64, ...), not {}.",
                samples_per_pixel
            );
        }

        // Each tile pixel holds at least `samples_per_pixel` points of the set.
        let pixel_tile_size = 1 << (log4int(N_PMJ02BN_SAMPLES as Int) - log4int(round_up_pow4(spp)));
        let n_pixels = (pixel_tile_size * pixel_tile_size) as usize;
        debug!(
            "PMJ02BNSampler using {}x{} pixel tile for {} samples per pixel",
            pixel_tile_size, pixel_tile_size, samples_per_pixel
        );

        let mut pixel_samples = vec![Point2f::zero(); n_pixels * samples_per_pixel];
        let mut n_stored = vec![0_usize; n_pixels];
        let scale = 1.0 / 4_294_967_296.0 as Float;
        let tile = pixel_tile_size as u64;
        for i in 0..N_PMJ02BN_SAMPLES {
            let [x, y] = pmj02bn_sample_bits(0, i);
            let (px, py) = (x as u64 * tile, y as u64 * tile);
            let pixel_offset = ((px >> 32) + (py >> 32) * tile) as usize;
            if n_stored[pixel_offset] == samples_per_pixel {
                continue;
            }

            let sample_offset = pixel_offset * samples_per_pixel + n_stored[pixel_offset];
            pixel_samples[sample_offset] = Point2f::new(
                min((px & 0xffff_ffff) as Float * scale, ONE_MINUS_EPSILON),
                min((py & 0xffff_ffff) as Float * scale, ONE_MINUS_EPSILON),
            );
            n_stored[pixel_offset] += 1;
        }

        Ok(Self {
            samples_per_pixel,
            seed,
            pixel_tile_size,
            pixel_samples: Arc::new(pixel_samples),
            pixel: Point2i::zero(),
            sample_index: 0,
            dimension: 0,
        })
    }

    /// Returns the sample index shuffled for the current pixel and dimension.
    fn permuted_index(&self) -> usize {
        let hash = mix_bits(
            ((self.pixel.x as u64) << 48)
                ^ ((self.pixel.y as u64) << 32)
                ^ ((self.dimension as u64) << 16)
                ^ self.seed as u64,
        );
        permutation_element(
            self.sample_index as u32,
            self.samples_per_pixel as u32,
            hash as u32,
        ) as usize
    }
}

impl Sampler for PMJ02BNSampler {
    fn samples_per_pixel(&self) -> usize {
        self.samples_per_pixel
    }

    fn start_pixel_sample(&mut self, p: Point2i, sample_index: usize, dimension: usize) {
        self.pixel = p;
        self.sample_index = sample_index;
        self.dimension = dimension;
    }

    fn get_1d(&mut self) -> Float {
        let index = self.permuted_index();
        let delta = blue_noise(self.dimension, self.pixel);
        self.dimension += 1;
        min(
            (index as Float + delta) / self.samples_per_pixel as Float,
            ONE_MINUS_EPSILON,
        )
    }

    fn get_2d(&mut self) -> Point2f {
        if self.dimension == 0 {
            let px = rem(self.pixel.x, self.pixel_tile_size);
            let py = rem(self.pixel.y, self.pixel_tile_size);
            let offset = (px + py * self.pixel_tile_size) as usize * self.samples_per_pixel;
            self.dimension += 2;
            return self.pixel_samples[offset + self.sample_index];
        }

        let pmj_instance = self.dimension / 2;
        let index = if pmj_instance >= N_PMJ02BN_SETS {
            // Reuse a point set with its samples in a different order.
            self.permuted_index()
        } else {
            self.sample_index
        };

        // Cranley-Patterson rotation decorrelates neighbouring pixels.
        let mut u = pmj02bn_sample(pmj_instance, index)
            + Point2f::new(
                blue_noise(self.dimension, self.pixel),
                blue_noise(self.dimension + 1, self.pixel),
            );
        if u.x >= 1.0 {
            u.x -= 1.0;
        }
        if u.y >= 1.0 {
            u.y -= 1.0;
        }

        self.dimension += 2;
        Point2f::new(min(u.x, ONE_MINUS_EPSILON), min(u.y, ONE_MINUS_EPSILON))
    }
}

impl fmt::Display for PMJ02BNSampler {
    /// Formats the value using the given formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[ PMJ02BNSampler pixel: {} sample_index: {} dimension: {} samples_per_pixel: {} \
             pixel_tile_size: {} seed: {} ]",
            self.pixel,
            self.sample_index,
            self.dimension,
            self.samples_per_pixel,
            self.pixel_tile_size,
            self.seed
        )
    }
}

impl TryFrom<(&ParamSet, u32)> for PMJ02BNSampler {
    type Error = String;

    /// Create a `PMJ02BNSampler` from given parameter set and default seed.
    ///
    /// * `p` - A tuple containing parameter set and seed.
    fn try_from(p: (&ParamSet, u32)) -> Result<Self, Self::Error> {
        let (params, seed) = p;
        let samples_per_pixel = pixel_samples(params)?;
        Self::new(samples_per_pixel, sampler_seed(params, seed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn tile_sizes() {
        assert_eq!(PMJ02BNSampler::new(1, 0).unwrap().pixel_tile_size, 256);
        assert_eq!(PMJ02BNSampler::new(16, 0).unwrap().pixel_tile_size, 64);
        assert_eq!(PMJ02BNSampler::new(8, 0).unwrap().pixel_tile_size, 64);
        assert_eq!(PMJ02BNSampler::new(65536, 0).unwrap().pixel_tile_size, 1);
        assert!(PMJ02BNSampler::new(65537, 0).is_err());
        assert!(PMJ02BNSampler::new(0, 0).is_err());
    }

    #[test]
    fn pixel_samples_are_stratified() {
        let mut sampler = PMJ02BNSampler::new(16, 0).unwrap();
        for (x, y) in [(0, 0), (13, 7), (63, 63), (64, 1), (-5, 200)] {
            let cells: HashSet<(i32, i32)> = (0..16)
                .map(|i| {
                    sampler.start_pixel_sample(Point2i::new(x, y), i, 0);
                    let u = sampler.get_2d();
                    ((u.x * 4.0) as i32, (u.y * 4.0) as i32)
                })
                .collect();
            assert_eq!(cells.len(), 16, "pixel ({}, {})", x, y);
        }
    }

    #[test]
    fn tile_repeats() {
        let mut sampler = PMJ02BNSampler::new(16, 0).unwrap();
        sampler.start_pixel_sample(Point2i::new(3, 4), 5, 0);
        let a = sampler.get_2d();
        sampler.start_pixel_sample(Point2i::new(3 + 64, 4 - 64), 5, 0);
        assert_eq!(sampler.get_2d(), a);
    }

    #[test]
    fn one_dimensional_samples_are_stratified() {
        let mut sampler = PMJ02BNSampler::new(16, 11).unwrap();
        let strata: HashSet<i32> = (0..16)
            .map(|i| {
                sampler.start_pixel_sample(Point2i::new(9, 2), i, 3);
                (sampler.get_1d() * 16.0) as i32
            })
            .collect();
        assert_eq!(strata.len(), 16);
    }

    #[test]
    fn reused_point_sets_stay_stratified() {
        let mut sampler = PMJ02BNSampler::new(16, 5).unwrap();
        let p = Point2i::new(21, 8);
        let dimension = 2 * N_PMJ02BN_SETS + 2;
        let set = dimension / 2;
        let offset = Point2f::new(blue_noise(dimension, p), blue_noise(dimension + 1, p));
        let rotated = |j: usize| {
            let mut u = pmj02bn_sample(set, j) + offset;
            if u.x >= 1.0 {
                u.x -= 1.0;
            }
            if u.y >= 1.0 {
                u.y -= 1.0;
            }
            Point2f::new(min(u.x, ONE_MINUS_EPSILON), min(u.y, ONE_MINUS_EPSILON))
        };

        // Every sample index maps to a distinct point of the set's first 16.
        let used: HashSet<usize> = (0..16)
            .map(|i| {
                sampler.start_pixel_sample(p, i, dimension);
                let u = sampler.get_2d();
                (0..16)
                    .find(|&j| rotated(j) == u)
                    .unwrap_or_else(|| panic!("sample {} is not from the point set", i))
            })
            .collect();
        assert_eq!(used.len(), 16);

        // Before rotation those points fill every 4x4 cell.
        let cells: HashSet<(i32, i32)> = used
            .iter()
            .map(|&j| {
                let u = pmj02bn_sample(set, j);
                ((u.x * 4.0) as i32, (u.y * 4.0) as i32)
            })
            .collect();
        assert_eq!(cells.len(), 16);
    }

    proptest! {
        #[test]
        fn deterministic_and_in_range(
            x in -500..500i32,
            y in -500..500i32,
            i in 0..16usize,
            seed in any::<u32>(),
        ) {
            let mut a = PMJ02BNSampler::new(16, seed).unwrap();
            let mut b = a.clone();
            a.start_pixel_sample(Point2i::new(x, y), i, 0);
            b.start_pixel_sample(Point2i::new(x, y), i, 0);
            // Enough 2D draws to run past the point sets.
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
