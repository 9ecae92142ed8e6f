//! Samplers

#[macro_use]
extern crate log;

mod common;
mod halton;
mod mlt;
mod padded_sobol;
mod pmj02bn;
mod random;
mod sampler_handle;
mod sobol;
mod stratified;

// Re-export.
pub use common::*;
pub use halton::*;
pub use mlt::*;
pub use padded_sobol::*;
pub use pmj02bn::*;
pub use random::*;
pub use sampler_handle::*;
pub use sobol::*;
pub use stratified::*;
