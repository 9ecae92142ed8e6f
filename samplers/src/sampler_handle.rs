//! Sampler Handle

use crate::halton::*;
use crate::mlt::*;
use crate::padded_sobol::*;
use crate::pmj02bn::*;
use crate::random::*;
use crate::sobol::*;
use crate::stratified::*;
use pbrt_core::geometry::*;
use pbrt_core::paramset::*;
use pbrt_core::pbrt::*;
use pbrt_core::sampler::*;
use std::fmt;

/// Any of the available samplers. Per-sample calls dispatch with a `match`
/// over the closed set of variants.
#[derive(Clone)]
pub enum SamplerHandle {
    Halton(HaltonSampler),
    PaddedSobol(PaddedSobolSampler),
    Sobol(SobolSampler),
    PMJ02BN(PMJ02BNSampler),
    Random(RandomSampler),
    Stratified(StratifiedSampler),
    MLT(MLTSampler),
    DebugMLT(DebugMLTSampler),
}

/// Define a macro that forwards a call to the sampler of every variant.
macro_rules! dispatch {
    ($handle: expr, $s: ident => $call: expr) => {
        match $handle {
            SamplerHandle::Halton($s) => $call,
            SamplerHandle::PaddedSobol($s) => $call,
            SamplerHandle::Sobol($s) => $call,
            SamplerHandle::PMJ02BN($s) => $call,
            SamplerHandle::Random($s) => $call,
            SamplerHandle::Stratified($s) => $call,
            SamplerHandle::MLT($s) => $call,
            SamplerHandle::DebugMLT($s) => $call,
        }
    };
}

impl SamplerHandle {
    /// Returns the name of the sampler.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Halton(_) => "HaltonSampler",
            Self::PaddedSobol(_) => "PaddedSobolSampler",
            Self::Sobol(_) => "SobolSampler",
            Self::PMJ02BN(_) => "PMJ02BNSampler",
            Self::Random(_) => "RandomSampler",
            Self::Stratified(_) => "StratifiedSampler",
            Self::MLT(_) => "MLTSampler",
            Self::DebugMLT(_) => "DebugMLTSampler",
        }
    }
}

impl Sampler for SamplerHandle {
    #[inline]
    fn samples_per_pixel(&self) -> usize {
        dispatch!(self, s => s.samples_per_pixel())
    }

    #[inline]
    fn start_pixel_sample(&mut self, p: Point2i, sample_index: usize, dimension: usize) {
        dispatch!(self, s => s.start_pixel_sample(p, sample_index, dimension))
    }

    #[inline]
    fn get_1d(&mut self) -> Float {
        dispatch!(self, s => s.get_1d())
    }

    #[inline]
    fn get_2d(&mut self) -> Point2f {
        dispatch!(self, s => s.get_2d())
    }
}

impl fmt::Display for SamplerHandle {
    /// Formats the value using the given formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        dispatch!(self, s => write!(f, "{}", s))
    }
}

/// Define a macro that implements `From` for every variant.
macro_rules! handle_from {
    ($t: ty, $variant: ident) => {
        impl From<$t> for SamplerHandle {
            fn from(s: $t) -> Self {
                Self::$variant(s)
            }
        }
    };
}

handle_from!(HaltonSampler, Halton);
handle_from!(PaddedSobolSampler, PaddedSobol);
handle_from!(SobolSampler, Sobol);
handle_from!(PMJ02BNSampler, PMJ02BN);
handle_from!(RandomSampler, Random);
handle_from!(StratifiedSampler, Stratified);
handle_from!(MLTSampler, MLT);
handle_from!(DebugMLTSampler, DebugMLT);

/// Creates a sampler.
///
/// * `name`            - Name.
/// * `paramset`        - Parameter set.
/// * `full_resolution` - Resolution of the image.
pub fn make_sampler(
    name: &str,
    paramset: &ParamSet,
    full_resolution: Point2i,
) -> Result<SamplerHandle, String> {
    let sampler: SamplerHandle = match name {
        "halton" => HaltonSampler::try_from((paramset, full_resolution, 0))?.into(),
        "paddedsobol" => PaddedSobolSampler::try_from((paramset, 0))?.into(),
        "sobol" => SobolSampler::try_from((paramset, full_resolution, 0))?.into(),
        "pmj02bn" => PMJ02BNSampler::try_from((paramset, 0))?.into(),
        "random" => RandomSampler::try_from((paramset, 0))?.into(),
        "stratified" => StratifiedSampler::try_from((paramset, 0))?.into(),
        _ => return Err(format!("Sampler '{}' unknown.", name)),
    };

    info!("Created {}", sampler);
    Ok(sampler)
}
