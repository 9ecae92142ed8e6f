//! Primary Sample Space Chain

use super::*;
use itertools::Itertools;
use pbrt_core::geometry::*;
use pbrt_core::pbrt::*;
use pbrt_core::rng::*;
use pbrt_core::sampler::*;
use std::fmt;

/// Implements a sampler responsible for managing primary sample space state
/// vectors, mutations, and acceptance and rejection steps. Where coordinate
/// values come from is up to the source `S`.
#[derive(Clone, Debug)]
pub struct PrimarySampleChain<S: CoordinateSource> {
    /// Number of iterations that MLT (on average!) spends in each pixel.
    mutations_per_pixel: usize,

    /// Iteration bookkeeping.
    iteration: ChainIteration,

    /// Number of sample streams to request.
    stream_count: usize,

    /// Supplies coordinate values.
    source: S,

    /// Stream index.
    stream_index: usize,

    /// Index of current sample in the stream.
    sample_index: usize,
}

impl<S: CoordinateSource> PrimarySampleChain<S> {
    /// Create a new chain.
    ///
    /// * `mutations_per_pixel`    - Number of iterations that MLT (on average!)
    ///                              spends in each pixel.
    /// * `rng_sequence_index`     - Supplies a unique stream index to the
    ///                              internal random number generator.
    /// * `sigma`                  - Controls the size of "small step" mutations.
    /// * `large_step_probability` - Probability of taking a "large step" mutation.
    /// * `stream_count`           - Number of sample streams to request.
    /// * `source`                 - Supplies coordinate values.
    pub fn with_source(
        mutations_per_pixel: usize,
        rng_sequence_index: u64,
        sigma: Float,
        large_step_probability: Float,
        stream_count: usize,
        source: S,
    ) -> Self {
        Self {
            mutations_per_pixel,
            iteration: ChainIteration {
                rng: RNG::new(rng_sequence_index),
                sigma,
                large_step_probability,
                current_iteration: 0,
                large_step: true,
                last_large_step_iteration: 0,
            },
            stream_count,
            source,
            stream_index: 0,
            sample_index: 0,
        }
    }

    /// Call at the beginning of each Metropolis-Hastings iteration. It
    /// increases the current iteration counter and determines which type of
    /// mutation (small or large) should be applied to the sample vector in
    /// the current iteration.
    pub fn start_iteration(&mut self) {
        let it = &mut self.iteration;
        it.current_iteration += 1;
        it.large_step = it.rng.uniform_float() < it.large_step_probability;
        self.sample_index = 0;
    }

    /// Accept proposed mutation.
    pub fn accept(&mut self) {
        if self.iteration.large_step {
            self.iteration.last_large_step_iteration = self.iteration.current_iteration;
        }
    }

    /// Reject proposed mutation. Restores all coordinates modified in the
    /// current iteration and reverts the iteration counter.
    pub fn reject(&mut self) {
        self.source.restore(self.iteration.current_iteration);
        self.iteration.current_iteration -= 1;
    }

    /// Indicates that subsequent samples should come from the stream with
    /// the given index. It also resets `sample_index`, the index of the
    /// current sample in the stream.
    ///
    /// * `index` - The stream index to start.
    pub fn start_stream(&mut self, index: usize) {
        assert!(
            index < self.stream_count,
            "stream {} out of range for {} streams",
            index,
            self.stream_count
        );
        self.stream_index = index;
        self.sample_index = 0;
    }

    /// Performs corresponding steps through the primary sample vector
    /// components. It interleaves the streams into the global sample vector;
    /// the first `stream_count` components are respectively used for the
    /// first dimension of each of the streams, and so forth.
    pub fn get_next_index(&mut self) -> usize {
        let next_index = self.stream_index + self.stream_count * self.sample_index;
        self.sample_index += 1;
        next_index
    }

    /// Returns the current Metropolis-Hastings iteration.
    pub fn current_iteration(&self) -> i64 {
        self.iteration.current_iteration
    }

    /// Returns true if the current iteration is a large step.
    pub fn large_step(&self) -> bool {
        self.iteration.large_step
    }

    /// Returns the last iteration where a large step was accepted.
    pub fn last_large_step_iteration(&self) -> i64 {
        self.iteration.last_large_step_iteration
    }

    /// Returns the coordinate source.
    pub fn source(&self) -> &S {
        &self.source
    }
}

impl MLTSampler {
    /// Create a new `MLTSampler`.
    ///
    /// * `mutations_per_pixel`    - Number of iterations that MLT (on average!)
    ///                              spends in each pixel.
    /// * `rng_sequence_index`     - Supplies a unique stream index to the
    ///                              internal random number generator.
    /// * `sigma`                  - Controls the size of "small step" mutations.
    /// * `large_step_probability` - Probability of taking a "large step" mutation.
    /// * `stream_count`           - Number of sample streams to request.
    pub fn new(
        mutations_per_pixel: usize,
        rng_sequence_index: u64,
        sigma: Float,
        large_step_probability: Float,
        stream_count: usize,
    ) -> Self {
        Self::with_source(
            mutations_per_pixel,
            rng_sequence_index,
            sigma,
            large_step_probability,
            stream_count,
            MutatingSource::default(),
        )
    }

    /// Returns the current sample vector as comma separated values that
    /// `DebugMLTSampler::from_dump_state()` can replay.
    pub fn dump_state(&self) -> String {
        self.source.values().iter().join(",")
    }
}

impl DebugMLTSampler {
    /// Create a `DebugMLTSampler` that replays a sample vector.
    ///
    /// * `u`              - The recorded values.
    /// * `n_sample_streams` - Number of sample streams of the recording.
    pub fn new(u: Vec<Float>, n_sample_streams: usize) -> Self {
        Self::with_source(1, 0, 0.5, 0.5, n_sample_streams, ReplaySource::new(u))
    }

    /// Parse a sample vector produced by `MLTSampler::dump_state()`.
    ///
    /// * `state`            - Comma separated values.
    /// * `n_sample_streams` - Number of sample streams of the recording.
    pub fn from_dump_state(state: &str, n_sample_streams: usize) -> Result<Self, String> {
        let u = state
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<Float>()
                    .map_err(|e| format!("{}: invalid sample value. {}", s, e))
            })
            .collect::<Result<Vec<Float>, String>>()?;
        debug!("Replaying {} recorded sample values", u.len());
        Ok(Self::new(u, n_sample_streams))
    }
}

impl<S: CoordinateSource> Sampler for PrimarySampleChain<S> {
    fn samples_per_pixel(&self) -> usize {
        self.mutations_per_pixel
    }

    fn start_pixel_sample(&mut self, p: Point2i, sample_index: usize, dimension: usize) {
        let sequence = p.x.wrapping_add(p.y.wrapping_mul(65536)) as u64;
        self.iteration.rng.set_sequence(sequence);
        self.iteration
            .rng
            .advance((sample_index as u64) * 65536 + (dimension as u64) * 8192);
    }

    fn get_1d(&mut self) -> Float {
        let index = self.get_next_index();
        self.source.coordinate(&mut self.iteration, index)
    }

    fn get_2d(&mut self) -> Point2f {
        let x = self.get_1d();
        let y = self.get_1d();
        Point2f::new(x, y)
    }
}

impl<S: CoordinateSource> fmt::Display for PrimarySampleChain<S> {
    /// Formats the value using the given formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[ {} {} stream_count: {} x: [{}] current_iteration: {} large_step: {} \
             last_large_step_iteration: {} stream_index: {} sample_index: {} ]",
            S::NAME,
            self.iteration,
            self.stream_count,
            self.source.values().iter().join(", "),
            self.iteration.current_iteration,
            self.iteration.large_step,
            self.iteration.last_large_step_iteration,
            self.stream_index,
            self.sample_index
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use proptest::prelude::*;

    /// Reads `n` coordinates from every stream.
    fn read_all<S: CoordinateSource>(sampler: &mut PrimarySampleChain<S>, n: usize) -> Vec<Float> {
        let mut values = Vec::new();
        for stream in 0..N_SAMPLE_STREAMS {
            sampler.start_stream(stream);
            values.extend((0..n).map(|_| sampler.get_1d()));
        }
        values
    }

    #[test]
    fn streams_interleave() {
        let mut sampler = MLTSampler::new(4, 0, 0.01, 0.3, N_SAMPLE_STREAMS);
        sampler.start_stream(LIGHT_STREAM_INDEX);
        assert_eq!(sampler.get_next_index(), 1);
        assert_eq!(sampler.get_next_index(), 4);
        sampler.start_stream(CONNECTION_STREAM_INDEX);
        assert_eq!(sampler.get_next_index(), 2);
        sampler.start_iteration();
        assert_eq!(sampler.get_next_index(), 2);
    }

    #[test]
    #[should_panic]
    fn stream_out_of_range() {
        let mut sampler = MLTSampler::new(4, 0, 0.01, 0.3, N_SAMPLE_STREAMS);
        sampler.start_stream(N_SAMPLE_STREAMS);
    }

    #[test]
    fn values_are_stable_within_an_iteration() {
        let mut sampler = MLTSampler::new(4, 3, 0.01, 0.3, N_SAMPLE_STREAMS);
        sampler.start_iteration();
        let first = read_all(&mut sampler, 4);
        let second = read_all(&mut sampler, 4);
        assert_eq!(first, second);
    }

    #[test]
    fn reject_restores_accepted_state() {
        let mut sampler = MLTSampler::new(4, 11, 0.05, 0.3, N_SAMPLE_STREAMS);
        sampler.start_iteration();
        let accepted = read_all(&mut sampler, 5);
        sampler.accept();
        let iteration = sampler.current_iteration();
        let stamps = |sampler: &MLTSampler| -> Vec<(Float, i64)> {
            sampler
                .source()
                .primary_samples()
                .iter()
                .map(|xi| (xi.value, xi.last_modification_iteration))
                .collect()
        };
        let accepted_stamps = stamps(&sampler);

        for _ in 0..10 {
            sampler.start_iteration();
            let proposed = read_all(&mut sampler, 5);
            assert_ne!(proposed, accepted);
            sampler.reject();
            assert_eq!(sampler.current_iteration(), iteration);
            assert_eq!(sampler.source().values(), accepted);
            assert_eq!(stamps(&sampler), accepted_stamps);
        }
    }

    #[test]
    fn accept_sets_new_baseline() {
        let mut sampler = MLTSampler::new(4, 5, 0.05, 0.5, N_SAMPLE_STREAMS);
        sampler.start_iteration();
        read_all(&mut sampler, 3);
        sampler.accept();

        sampler.start_iteration();
        let proposed = read_all(&mut sampler, 3);
        sampler.accept();

        sampler.start_iteration();
        read_all(&mut sampler, 3);
        sampler.reject();
        assert_eq!(sampler.source().values(), proposed);
        assert_eq!(sampler.current_iteration(), 2);
    }

    #[test]
    fn never_large_after_first() {
        let mut sampler = MLTSampler::new(4, 2, 0.01, 0.0, N_SAMPLE_STREAMS);
        sampler.start_iteration();
        let mut previous = read_all(&mut sampler, 2);
        sampler.accept();
        for _ in 0..20 {
            sampler.start_iteration();
            assert!(!sampler.large_step());
            let current = read_all(&mut sampler, 2);
            sampler.accept();
            assert_eq!(sampler.last_large_step_iteration(), 0);

            // Small steps stay close on the unit circle.
            for (a, b) in previous.iter().zip(current.iter()) {
                let d = (a - b).abs();
                assert!(min(d, 1.0 - d) < 0.1, "{} -> {}", a, b);
            }
            previous = current;
        }
    }

    #[test]
    fn always_large() {
        let mut sampler = MLTSampler::new(4, 2, 0.01, 1.0, N_SAMPLE_STREAMS);
        let mut previous = Vec::new();
        for i in 1..=10 {
            sampler.start_iteration();
            assert!(sampler.large_step());
            let current = read_all(&mut sampler, 2);
            assert_ne!(current, previous);
            sampler.accept();
            assert_eq!(sampler.last_large_step_iteration(), i);
            previous = current;
        }
    }

    #[test]
    fn stale_coordinates_resample_after_large_step() {
        let mut sampler = MLTSampler::new(4, 8, 0.01, 0.0, 1);
        sampler.start_iteration();
        sampler.start_stream(0);
        sampler.get_1d();
        sampler.accept();

        // Pretend a large step was accepted after the coordinate was read.
        sampler.iteration.last_large_step_iteration = 2;
        sampler.iteration.current_iteration = 2;
        sampler.start_iteration();
        sampler.start_stream(0);
        let before = sampler.source().values()[0];
        let mut rng = sampler.iteration.rng.clone();
        let value = sampler.get_1d();
        assert_ne!(value, before);
        assert_eq!(value, rng.uniform_float());
    }

    #[test]
    fn replay_dump() {
        let mut sampler = MLTSampler::new(4, 21, 0.02, 0.3, N_SAMPLE_STREAMS);
        sampler.start_pixel_sample(Point2i::new(4, 5), 2, 0);
        sampler.start_iteration();
        let recorded = read_all(&mut sampler, 4);

        let state = sampler.dump_state();
        let mut debug = DebugMLTSampler::from_dump_state(&state, N_SAMPLE_STREAMS).unwrap();
        debug.start_iteration();
        assert_eq!(read_all(&mut debug, 4), recorded);
        assert_eq!(debug.samples_per_pixel(), 1);
    }

    #[test]
    fn dump_format() {
        let debug = DebugMLTSampler::from_dump_state("0.5, 0.25,,0.125,", 1).unwrap();
        assert_eq!(debug.source().values(), vec![0.5, 0.25, 0.125]);
        assert!(DebugMLTSampler::from_dump_state("0.5,abc", 1).is_err());

        let s = format!("{}", debug);
        assert!(s.starts_with("[ DebugMLTSampler rng: "));
        assert!(s.contains("x: [0.5, 0.25, 0.125]"));
    }

    #[test]
    #[should_panic]
    fn replay_past_end() {
        let mut debug = DebugMLTSampler::new(vec![0.5, 0.5], 1);
        debug.start_stream(0);
        debug.get_2d();
        debug.get_1d();
    }

    #[test]
    fn gaussian_step_scale() {
        // With a tiny sigma the wrapped step is close to the original value.
        let mut sampler = MLTSampler::new(4, 1, 1e-4, 0.0, 1);
        sampler.start_iteration();
        sampler.start_stream(0);
        let a = sampler.get_1d();
        sampler.accept();
        sampler.start_iteration();
        sampler.start_stream(0);
        let b = sampler.get_1d();
        let d = (a - b).abs();
        assert!(approx_eq!(f32, min(d, 1.0 - d), 0.0, epsilon = 1e-2));
    }

    proptest! {
        #[test]
        fn deterministic_and_in_range(
            seq in any::<u64>(),
            x in -100..100i32,
            y in -100..100i32,
            p in 0.0..1.0f32,
            steps in 1..20usize,
        ) {
            let mut a = MLTSampler::new(4, seq, 0.01, p, N_SAMPLE_STREAMS);
            let mut b = a.clone();
            a.start_pixel_sample(Point2i::new(x, y), 0, 0);
            b.start_pixel_sample(Point2i::new(x, y), 0, 0);
            for step in 0..steps {
                a.start_iteration();
                b.start_iteration();
                let (va, vb) = (read_all(&mut a, 3), read_all(&mut b, 3));
                prop_assert_eq!(&va, &vb);
                prop_assert!(va.iter().all(|v| (0.0..1.0).contains(v)));
                if step % 3 == 0 {
                    a.reject();
                    b.reject();
                } else {
                    a.accept();
                    b.accept();
                }
            }
        }
    }
}
