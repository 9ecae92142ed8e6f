//! PBRT common stuff

mod common;
mod log2int;

// Re-export
pub use common::*;
pub use log2int::*;
