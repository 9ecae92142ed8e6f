//! Coordinate Sources

use super::PrimarySample;
use pbrt_core::pbrt::*;
use pbrt_core::rng::*;
use std::fmt;

/// Iteration bookkeeping of a primary sample space Markov chain.
#[derive(Clone, Debug)]
pub struct ChainIteration {
    /// The random number generator.
    pub rng: RNG,

    /// Controls the size of "small step" mutations.
    pub sigma: Float,

    /// Probability of taking a "large step" mutation.
    pub large_step_probability: Float,

    /// The current Metropolis-Hastings iteration. Rejected iterations are
    /// not counted.
    pub current_iteration: i64,

    /// Indicates if the current iteration is a "large step" mutation.
    pub large_step: bool,

    /// The last iteration where a large step was accepted.
    pub last_large_step_iteration: i64,
}

/// Supplies the value of each coordinate of the sample vector.
pub trait CoordinateSource {
    /// Name used when formatting the chain.
    const NAME: &'static str;

    /// Returns the value of a coordinate for the current iteration.
    ///
    /// * `chain` - Iteration bookkeeping.
    /// * `index` - Index of the coordinate.
    fn coordinate(&mut self, chain: &mut ChainIteration, index: usize) -> Float;

    /// Undo every modification made during an iteration.
    ///
    /// * `iteration` - The rejected iteration.
    fn restore(&mut self, iteration: i64);

    /// Returns the current coordinate values.
    fn values(&self) -> Vec<Float>;
}

/// Mutates coordinates lazily the first time they are read in an iteration.
#[derive(Clone, Debug, Default)]
pub struct MutatingSource {
    /// The current sample vector.
    x: Vec<PrimarySample>,
}

impl MutatingSource {
    /// Returns the primary samples.
    pub fn primary_samples(&self) -> &[PrimarySample] {
        &self.x
    }
}

impl CoordinateSource for MutatingSource {
    const NAME: &'static str = "MLTSampler";

    /// Brings a coordinate up to date. A coordinate that missed several
    /// small steps gets only a single perturbation of size `sigma`.
    fn coordinate(&mut self, chain: &mut ChainIteration, index: usize) -> Float {
        if index >= self.x.len() {
            self.x.resize_with(index + 1, Default::default);
        }

        let xi = &mut self.x[index];
        if xi.last_modification_iteration < chain.current_iteration {
            xi.backup();
            if chain.large_step || xi.last_modification_iteration < chain.last_large_step_iteration {
                xi.value = chain.rng.uniform_float();
            } else {
                // Sample the standard normal distribution `N(0, 1)`.
                let normal_sample = SQRT2 * erf_inv(2.0 * chain.rng.uniform_float() - 1.0);
                xi.value += normal_sample * chain.sigma;
                xi.value = min(xi.value - xi.value.floor(), ONE_MINUS_EPSILON);
            }
            xi.last_modification_iteration = chain.current_iteration;
        }
        xi.value
    }

    fn restore(&mut self, iteration: i64) {
        for xi in self.x.iter_mut() {
            if xi.last_modification_iteration == iteration {
                xi.restore();
            }
        }
    }

    fn values(&self) -> Vec<Float> {
        self.x.iter().map(|xi| xi.value).collect()
    }
}

/// Plays back a recorded sample vector.
#[derive(Clone, Debug, Default)]
pub struct ReplaySource {
    /// The recorded values.
    u: Vec<Float>,
}

impl ReplaySource {
    /// Create a new `ReplaySource`.
    ///
    /// * `u` - The recorded values.
    pub fn new(u: Vec<Float>) -> Self {
        Self { u }
    }
}

impl CoordinateSource for ReplaySource {
    const NAME: &'static str = "DebugMLTSampler";

    fn coordinate(&mut self, _chain: &mut ChainIteration, index: usize) -> Float {
        assert!(
            index < self.u.len(),
            "coordinate {} requested from a recording of {} values",
            index,
            self.u.len()
        );
        self.u[index]
    }

    fn restore(&mut self, _iteration: i64) {}

    fn values(&self) -> Vec<Float> {
        self.u.clone()
    }
}

impl fmt::Display for ChainIteration {
    /// Formats the value using the given formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rng: {} sigma: {} large_step_probability: {}",
            self.rng, self.sigma, self.large_step_probability
        )
    }
}
