//! Sampler

mod camera_sample;

use crate::geometry::*;
use crate::pbrt::*;

// Re-export
pub use camera_sample::*;

/// Sampler interface.
///
/// A sampler produces the sample vector of one path at a time. Values depend
/// only on the pixel, the sample index, the dimension reached and the seed,
/// so any two runs with the same call sequence agree bit for bit.
pub trait Sampler {
    /// Returns the number of samples taken in each pixel.
    fn samples_per_pixel(&self) -> usize;

    /// This should be called before generating the sample vector of a path.
    /// Subsequent `get_1d()`/`get_2d()` calls start at the given dimension.
    ///
    /// * `p`            - The pixel.
    /// * `sample_index` - Index of the sample within the pixel.
    /// * `dimension`    - First dimension to return.
    fn start_pixel_sample(&mut self, p: Point2i, sample_index: usize, dimension: usize);

    /// Returns the sample value for the next dimension of the current sample vector.
    fn get_1d(&mut self) -> Float;

    /// Returns the sample value for the next two dimensions of the current sample vector.
    fn get_2d(&mut self) -> Point2f;

    /// Returns `n` samplers for use by rendering threads. Only immutable
    /// tables are shared between them.
    ///
    /// * `n` - Number of samplers.
    fn clone_samplers(&self, n: usize) -> Vec<Self>
    where
        Self: Clone + Sized,
    {
        (0..n).map(|_| self.clone()).collect()
    }
}
