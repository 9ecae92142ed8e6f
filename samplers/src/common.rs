//! Common

use pbrt_core::low_discrepancy::*;
use pbrt_core::paramset::*;
use pbrt_core::pbrt::*;

/// Reads the `pixelsamples` parameter, which must be positive.
///
/// * `params` - Parameter set.
pub fn pixel_samples(params: &ParamSet) -> Result<usize, String> {
    let samples_per_pixel = params.find_one_int("pixelsamples", 16);
    if samples_per_pixel <= 0 {
        Err(format!("{}: \"pixelsamples\" must be positive.", samples_per_pixel))
    } else {
        Ok(samples_per_pixel as usize)
    }
}

/// Reads the `seed` parameter.
///
/// * `params`  - Parameter set.
/// * `default` - Seed used when the parameter set does not name one.
pub fn sampler_seed(params: &ParamSet, default: u32) -> u32 {
    params.find_one_int("seed", default as Int) as u32
}

/// Reads the `randomization` parameter of the Sobol' family of samplers.
///
/// * `params` - Parameter set.
pub fn randomize_strategy(params: &ParamSet) -> Result<RandomizeStrategy, String> {
    params
        .find_one_string("randomization", String::from("owen"))
        .parse()
}
