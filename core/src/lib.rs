//! Core

#[macro_use]
extern crate hexf;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;

// Re-export.
pub mod blue_noise;
pub mod filter;
pub mod geometry;
pub mod hash;
pub mod low_discrepancy;
pub mod paramset;
pub mod pbrt;
pub mod pmj02_tables;
pub mod primes;
pub mod rng;
pub mod sampler;
pub mod sobol_matrices;
