//! Camera Sample

use super::*;
use crate::filter::*;
use std::fmt;

/// Holds all of the sample values needed to generate a camera ray.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct CameraSample {
    /// Point on the film to which the generated ray carries radiance.
    pub p_film: Point2f,

    /// The point on the lens the ray passes through.
    pub p_lens: Point2f,

    /// The time at which the ray should sample the scene.
    pub time: Float,

    /// Weight returned by the pixel filter for the film offset.
    pub filter_weight: Float,
}

impl fmt::Display for CameraSample {
    /// Formats the value using the given formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[ CameraSample p_film: {} p_lens: {} time: {} filter_weight: {} ]",
            self.p_film, self.p_lens, self.time, self.filter_weight
        )
    }
}

/// Draws the sample values for a camera ray through a pixel. The filter
/// offset consumes one 2D sample, then time takes one 1D sample and the lens
/// one 2D sample, always in that order.
///
/// * `sampler`               - The sampler, already started on the pixel sample.
/// * `p_pixel`               - The pixel.
/// * `filter`                - The pixel reconstruction filter.
/// * `disable_pixel_jitter`  - Place every film sample at the pixel center.
pub fn get_camera_sample<S, F>(
    sampler: &mut S,
    p_pixel: Point2i,
    filter: &F,
    disable_pixel_jitter: bool,
) -> CameraSample
where
    S: Sampler + ?Sized,
    F: Filter + ?Sized,
{
    let mut fs = filter.sample(sampler.get_2d());
    if disable_pixel_jitter {
        fs.p = Point2f::zero();
        fs.weight = 1.0;
    }

    let p_film = Point2f::from(p_pixel) + fs.p + Point2f::new(0.5, 0.5);
    let time = sampler.get_1d();
    let p_lens = sampler.get_2d();

    CameraSample {
        p_film,
        p_lens,
        time,
        filter_weight: fs.weight,
    }
}
