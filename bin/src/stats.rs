//! Per-dimension sample statistics

use pbrt_core::pbrt::*;
use std::fmt;

/// Running mean, minimum and maximum of the values drawn in one dimension.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DimensionStats {
    /// Number of values seen.
    pub count: usize,

    /// Sum of the values; accumulated in double precision.
    pub sum: f64,

    /// Smallest value seen.
    pub min: Float,

    /// Largest value seen.
    pub max: Float,
}

impl DimensionStats {
    /// Add a value.
    ///
    /// * `v` - The value.
    pub fn add(&mut self, v: Float) {
        self.count += 1;
        self.sum += v as f64;
        self.min = min(self.min, v);
        self.max = max(self.max, v);
    }

    /// Returns the mean or 0 if no values were seen.
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }
}

impl Default for DimensionStats {
    fn default() -> Self {
        Self {
            count: 0,
            sum: 0.0,
            min: Float::INFINITY,
            max: -Float::INFINITY,
        }
    }
}

impl fmt::Display for DimensionStats {
    /// Formats the value using the given formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "count: {} mean: {:.6} min: {:.6} max: {:.6}",
            self.count,
            self.mean(),
            self.min,
            self.max
        )
    }
}

/// Fold sample vectors into per-dimension statistics, growing the table to
/// the longest vector seen.
///
/// * `stats`  - The statistics to update.
/// * `values` - One sample vector.
pub fn accumulate(stats: &mut Vec<DimensionStats>, values: &[Float]) {
    if stats.len() < values.len() {
        stats.resize(values.len(), DimensionStats::default());
    }
    for (s, v) in stats.iter_mut().zip(values.iter()) {
        s.add(*v);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    #[test]
    fn empty() {
        let s = DimensionStats::default();
        assert_eq!(s.count, 0);
        assert_eq!(s.mean(), 0.0);
    }

    #[test]
    fn add() {
        let mut a = DimensionStats::default();
        a.add(0.25);
        a.add(0.75);
        a.add(0.5);

        assert_eq!(a.count, 3);
        assert_eq!(a.min, 0.25);
        assert_eq!(a.max, 0.75);
        assert!(approx_eq!(f64, a.mean(), 0.5, epsilon = 1e-12));
    }

    #[test]
    fn accumulate_grows() {
        let mut stats = vec![];
        accumulate(&mut stats, &[0.5]);
        accumulate(&mut stats, &[0.25, 0.125]);
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].count, 2);
        assert_eq!(stats[1].count, 1);
        assert_eq!(stats[1].min, 0.125);
    }
}
