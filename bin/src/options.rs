//! Command line options

use clap::Parser;
use pbrt_core::geometry::*;
use pbrt_core::paramset::*;

/// Options for exercising a sampler over a small image.
#[derive(Parser, Clone, Debug)]
#[clap(author, version, about = "Print or summarize the sample vectors of a pixel sampler.", long_about = None)]
pub struct Options {
    /// Sampler name.
    #[clap(
        long = "sampler",
        short = 's',
        value_name = "NAME",
        default_value = "sobol",
        help = "Sampler to use (halton, paddedsobol, sobol, pmj02bn, random, stratified)."
    )]
    pub sampler: String,

    /// Samples per pixel.
    #[clap(
        long = "spp",
        value_name = "NUM",
        help = "Number of samples taken in each pixel [default: 16, or xsamples * ysamples]."
    )]
    pub spp: Option<i32>,

    /// Seed for samplers that scramble or shuffle.
    #[clap(long = "seed", value_name = "NUM", default_value_t = 0, help = "Sampler seed.")]
    pub seed: i32,

    /// Image resolution.
    #[clap(
        long = "resolution",
        short = 'r',
        value_name = "NUM",
        num_args = 2,
        default_values_t = [16, 16],
        help = "Image resolution (width height)."
    )]
    pub resolution: Vec<i32>,

    /// Randomization strategy of the Sobol' samplers.
    #[clap(
        long = "randomization",
        value_name = "NAME",
        help = "Randomization of the Sobol' samplers (none, cranleypatterson, xor, owen)."
    )]
    pub randomization: Option<String>,

    /// Stratified sampler strata in x.
    #[clap(long = "xsamples", value_name = "NUM", help = "Strata in x for the stratified sampler.")]
    pub x_samples: Option<i32>,

    /// Stratified sampler strata in y.
    #[clap(long = "ysamples", value_name = "NUM", help = "Strata in y for the stratified sampler.")]
    pub y_samples: Option<i32>,

    /// Place film samples at pixel centers.
    #[clap(
        long = "nojitter",
        help = "Disable pixel jitter; every film sample lies at its pixel center."
    )]
    pub no_jitter: bool,

    /// The single pixel to sample.
    #[clap(
        long = "pixel",
        short = 'p',
        value_name = "NUM",
        num_args = 2,
        conflicts_with = "all_pixels",
        help = "Sample only this pixel (x y)."
    )]
    pub pixel: Vec<i32>,

    /// Sample every pixel of the image.
    #[clap(long = "all-pixels", short = 'a', help = "Sample every pixel of the image.")]
    pub all_pixels: bool,

    /// Additional 1D dimensions drawn after the camera sample.
    #[clap(
        long = "dims",
        short = 'd',
        value_name = "NUM",
        default_value_t = 4,
        help = "Number of 1D values drawn after the camera sample."
    )]
    pub dims: usize,

    /// Number of worker threads.
    #[clap(
        long = "nthreads",
        short = 't',
        value_name = "NUM",
        default_value_t = 1,
        help = "Use specified number of threads for sampling."
    )]
    n_threads: usize,

    /// Summarize instead of printing every sample.
    #[clap(long = "stats", help = "Print per-dimension mean, minimum and maximum.")]
    pub stats: bool,

    /// Comma separated sample vector to replay.
    #[clap(
        long = "debugstate",
        value_name = "VALUES",
        help = "Replay a dumped MLT sample vector instead of running a sampler."
    )]
    pub debug_state: Option<String>,

    /// Sample streams of the replayed vector.
    #[clap(
        long = "streams",
        value_name = "NUM",
        default_value_t = 1,
        help = "Number of sample streams interleaved in the replayed vector."
    )]
    pub streams: usize,
}

impl Options {
    /// Returns the number of threads to use.
    pub fn threads(&self) -> usize {
        if self.n_threads == 0 {
            warn!("--nthreads must be at least 1; using 1.");
            1
        } else {
            self.n_threads
        }
    }

    /// Returns the image resolution.
    pub fn full_resolution(&self) -> Point2i {
        match self.resolution.as_slice() {
            [x, y] => Point2i::new(*x, *y),
            _ => Point2i::new(16, 16),
        }
    }

    /// Returns the pixels to sample in scanline order.
    pub fn pixels(&self) -> Vec<Point2i> {
        let res = self.full_resolution();
        if self.all_pixels {
            itertools::iproduct!(0..res.y, 0..res.x)
                .map(|(y, x)| Point2i::new(x, y))
                .collect()
        } else {
            match self.pixel.as_slice() {
                [x, y] => vec![Point2i::new(*x, *y)],
                _ => vec![Point2i::zero()],
            }
        }
    }

    /// Returns the sampler parameters given on the command line.
    pub fn sampler_params(&self) -> ParamSet {
        let mut params = ParamSet::new();
        if let Some(spp) = self.spp {
            params.add_int("pixelsamples", &[spp]);
        }
        params.add_int("seed", &[self.seed]);
        if let Some(randomization) = &self.randomization {
            params.add_string("randomization", &[randomization.clone()]);
        }
        if let Some(x_samples) = self.x_samples {
            params.add_int("xsamples", &[x_samples]);
        }
        if let Some(y_samples) = self.y_samples {
            params.add_int("ysamples", &[y_samples]);
        }
        params.add_bool("jitter", &[!self.no_jitter]);
        params
    }
}
