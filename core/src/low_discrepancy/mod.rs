//! Low Discrepancy Point Sequences

mod digit_permutation;
mod radical_inverse;
mod randomizer;
mod sobol;

// Re-export
pub use digit_permutation::*;
pub use radical_inverse::*;
pub use randomizer::*;
pub use sobol::*;
