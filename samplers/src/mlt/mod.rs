//! MLT Samplers

mod chain;
mod coordinate_source;
mod primary_sample;

// Re-export.
pub use chain::*;
pub use coordinate_source::*;
pub use primary_sample::*;

/// MLTSampler maintains three separate sample vectors.
pub const N_SAMPLE_STREAMS: usize = 3;
/// camera subpath
pub const CAMERA_STREAM_INDEX: usize = 0;
/// light subpath
pub const LIGHT_STREAM_INDEX: usize = 1;
/// connection step
pub const CONNECTION_STREAM_INDEX: usize = 2;

/// Primary sample space sampler that mutates its sample vector.
pub type MLTSampler = PrimarySampleChain<MutatingSource>;

/// Primary sample space sampler that replays a recorded sample vector.
pub type DebugMLTSampler = PrimarySampleChain<ReplaySource>;
