//! Progressive (0,2) point sets

use crate::geometry::*;
use crate::hash::mix_bits;
use crate::low_discrepancy::*;
use crate::pbrt::*;
use crate::rng::*;

/// Number of independent point sets.
pub const N_PMJ02BN_SETS: usize = 5;

/// Number of points in each set.
pub const N_PMJ02BN_SAMPLES: usize = 65536;

lazy_static! {
    /// Points of every set as 32-bit fixed point (x, y) pairs.
    static ref PMJ02BN_SAMPLES: Vec<[u32; 2]> = generate_sets();
}

/// Returns the raw fixed point coordinates of a point. The set index wraps
/// around; `sample_index` must be less than `N_PMJ02BN_SAMPLES`.
///
/// * `set_index`    - The point set.
/// * `sample_index` - Index of the point within the set.
pub fn pmj02bn_sample_bits(set_index: usize, sample_index: usize) -> [u32; 2] {
    let set_index = set_index % N_PMJ02BN_SETS;
    debug_assert!(sample_index < N_PMJ02BN_SAMPLES);
    PMJ02BN_SAMPLES[set_index * N_PMJ02BN_SAMPLES + sample_index]
}

/// Returns a point in `[0, 1)^2`. The set index wraps around;
/// `sample_index` must be less than `N_PMJ02BN_SAMPLES`.
///
/// * `set_index`    - The point set.
/// * `sample_index` - Index of the point within the set.
pub fn pmj02bn_sample(set_index: usize, sample_index: usize) -> Point2f {
    let [x, y] = pmj02bn_sample_bits(set_index, sample_index);
    let scale = hexf32!("0x1.0p-32") as Float;
    Point2f::new(
        min(x as Float * scale, ONE_MINUS_EPSILON),
        min(y as Float * scale, ONE_MINUS_EPSILON),
    )
}

/// Each set is the first two Sobol' dimensions under an independent nested
/// uniform scramble. Every prefix of `4^k` points, and every aligned block of
/// them, is then a (0, 2k, 2)-net: each of the `2^a x 2^b` elementary
/// rectangles with `a + b = 2k` holds one point.
fn generate_sets() -> Vec<[u32; 2]> {
    let mut points = Vec::with_capacity(N_PMJ02BN_SETS * N_PMJ02BN_SAMPLES);
    for set in 0..N_PMJ02BN_SETS {
        let hx = FastOwenScrambler::new(mix_bits((set as u64) << 1) as u32);
        let hy = FastOwenScrambler::new(mix_bits(((set as u64) << 1) | 1) as u32);
        points.extend((0..N_PMJ02BN_SAMPLES as u64).map(|i| {
            [
                hx.randomize(sobol_bits(i, 0)),
                hy.randomize(sobol_bits(i, 1)),
            ]
        }));
    }

    debug!(
        "Generated {} pmj02bn point sets of {} points",
        N_PMJ02BN_SETS, N_PMJ02BN_SAMPLES
    );

    points
}
