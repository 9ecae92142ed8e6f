//! Sobol' Sequence

use super::Randomizer;
use crate::geometry::*;
use crate::pbrt::*;
use crate::rng::*;
use crate::sobol_matrices::*;

/// Returns the raw 32-bit fixed point Sobol' value of index `a` in the given
/// dimension.
///
/// * `a`         - Index into the sequence.
/// * `dimension` - The dimension.
#[inline]
pub fn sobol_bits(a: u64, dimension: usize) -> u32 {
    assert!(
        dimension < NUM_SOBOL_DIMENSIONS,
        "Sobol' dimension {} out of range",
        dimension
    );

    let matrix = sobol_matrix(dimension);
    let mut v = 0_u32;
    let mut a = a;
    let mut i = 0;
    while a != 0 && i < SOBOL_MATRIX_SIZE {
        if a & 1 == 1 {
            v ^= matrix[i];
        }
        a >>= 1;
        i += 1;
    }
    v
}

/// Returns the Sobol' sample of index `a` in the given dimension after
/// applying a randomizer.
///
/// * `a`          - Index into the sequence.
/// * `dimension`  - The dimension.
/// * `randomizer` - Randomizes the sample bits.
#[inline]
pub fn sobol_sample<R: Randomizer>(a: u64, dimension: usize, randomizer: &R) -> Float {
    let v = randomizer.randomize(sobol_bits(a, dimension));
    min(v as Float * hexf32!("0x1.0p-32") as Float, ONE_MINUS_EPSILON)
}

/// Largest log2 grid resolution an interval mapping supports. The pixel
/// takes the low `2 * m` index bits and the sample number the bits above, out
/// of `SOBOL_MATRIX_SIZE`.
pub const MAX_SOBOL_INTERVAL_LOG2: u32 = 24;

/// Maps (pixel, sample number) to an index into the global Sobol' sequence
/// so that the first two dimensions of the sample fall inside that pixel of
/// a `2^m x 2^m` grid.
///
/// Dimension 0 reverses the index bits so the low `m` bits of the index pick
/// the pixel column. The next `m` bits are solved for so that dimension 1
/// lands in the pixel row; that `m x m` system over GF(2) is invertible
/// because the first two Sobol' dimensions form a (0, 2)-sequence. Higher
/// bits carry the sample number.
#[derive(Clone, Debug)]
pub struct SobolIntervalMapping {
    /// log2 of the grid resolution.
    m: u32,

    /// Column `r` holds the middle index bits that flip only bit `r` of the
    /// dimension 1 pixel row.
    inverse: Vec<u32>,
}

impl SobolIntervalMapping {
    /// Solve the mapping for a `2^m x 2^m` grid.
    ///
    /// * `m` - log2 of the grid resolution; at most `MAX_SOBOL_INTERVAL_LOG2`.
    pub fn new(m: u32) -> Self {
        assert!(
            m <= MAX_SOBOL_INTERVAL_LOG2,
            "Sobol' interval resolution 2^{} too large",
            m
        );

        let n = m as usize;
        let matrix = sobol_matrix(1);
        let top = |v: u32| if m == 0 { 0 } else { v >> (32 - m) };

        // Row `i` of the system: bit `k` is bit `i` of the top `m` bits of
        // column `m + k`. The augmented half tracks row operations.
        let mut rows: Vec<(u32, u32)> = (0..n)
            .map(|i| {
                let coeffs = (0..n).fold(0_u32, |acc, k| acc | (((top(matrix[n + k]) >> i) & 1) << k));
                (coeffs, 1_u32 << i)
            })
            .collect();

        // Gauss-Jordan elimination.
        for col in 0..n {
            let pivot = (col..n)
                .find(|&r| (rows[r].0 >> col) & 1 == 1)
                .unwrap_or_else(|| panic!("Sobol' generator matrix is singular at column {}", col));
            rows.swap(col, pivot);

            let (pc, pa) = rows[col];
            for (r, row) in rows.iter_mut().enumerate() {
                if r != col && (row.0 >> col) & 1 == 1 {
                    row.0 ^= pc;
                    row.1 ^= pa;
                }
            }
        }

        let inverse = (0..n)
            .map(|r| (0..n).fold(0_u32, |acc, i| acc | (((rows[i].1 >> r) & 1) << i)))
            .collect();

        Self { m, inverse }
    }

    /// Returns the global Sobol' index of the `frame`-th sample in pixel `p`.
    ///
    /// * `frame` - Sample number within the pixel.
    /// * `p`     - The pixel; both coordinates must be in `[0, 2^m)`.
    pub fn index(&self, frame: u64, p: Point2i) -> u64 {
        if self.m == 0 {
            return frame;
        }

        let m = self.m;
        debug_assert!(p.x >= 0 && (p.x as u64) < (1 << m));
        debug_assert!(p.y >= 0 && (p.y as u64) < (1 << m));

        let column = (p.x as u32).reverse_bits() >> (32 - m);
        let base = (frame << (2 * m)) | column as u64;

        let rhs = (p.y as u32) ^ (sobol_bits(base, 1) >> (32 - m));
        let middle = self
            .inverse
            .iter()
            .enumerate()
            .filter(|(r, _)| (rhs >> r) & 1 == 1)
            .fold(0_u32, |acc, (_, &c)| acc ^ c);

        base | ((middle as u64) << m)
    }
}
