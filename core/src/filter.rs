//! Filter

use crate::geometry::*;
use crate::pbrt::*;

/// An offset from the pixel center drawn from a filter, and its weight.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FilterSample {
    /// Offset relative to the filter center.
    pub p: Point2f,

    /// Sample weight.
    pub weight: Float,
}

/// Filter interface.
pub trait Filter {
    /// Maps a uniform sample in `[0, 1)^2` to an offset distributed
    /// according to the filter.
    ///
    /// * `u` - The uniform sample.
    fn sample(&self, u: Point2f) -> FilterSample;
}

/// Implements a filter that weights all samples within a square region of
/// the image equally.
#[derive(Copy, Clone, Debug)]
pub struct BoxFilter {
    radius: Point2f,
}

impl BoxFilter {
    /// Returns a new instance of `BoxFilter`.
    ///
    /// * `radius` - Radius of the filter in x and y directions.
    pub fn new(radius: Point2f) -> Self {
        Self { radius }
    }
}

impl Default for BoxFilter {
    /// Returns a box filter covering exactly one pixel.
    fn default() -> Self {
        Self::new(Point2f::new(0.5, 0.5))
    }
}

impl Filter for BoxFilter {
    fn sample(&self, u: Point2f) -> FilterSample {
        let p = Point2f::new(
            (1.0 - u.x) * -self.radius.x + u.x * self.radius.x,
            (1.0 - u.y) * -self.radius.y + u.y * self.radius.y,
        );
        FilterSample { p, weight: 1.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn corners() {
        let f = BoxFilter::new(Point2f::new(1.5, 0.5));
        assert_eq!(f.sample(Point2f::zero()).p, Point2f::new(-1.5, -0.5));
        assert_eq!(f.sample(Point2f::new(0.5, 0.5)).p, Point2f::zero());
    }

    proptest! {
        #[test]
        fn samples_stay_inside(ux in 0.0..1.0f32, uy in 0.0..1.0f32) {
            let fs = BoxFilter::default().sample(Point2f::new(ux, uy));
            prop_assert_eq!(fs.weight, 1.0);
            prop_assert!(fs.p.x.abs() <= 0.5 && fs.p.y.abs() <= 0.5);
        }
    }
}
