//! Sobol' Generator Matrices

use crate::hash::mix_bits;

/// Number of Sobol' dimensions available.
pub const NUM_SOBOL_DIMENSIONS: usize = 1024;

/// Number of columns stored per generator matrix; indices up to `2^52` are
/// supported.
pub const SOBOL_MATRIX_SIZE: usize = 52;

/// Initial direction numbers `m_1..m_s` of Joe and Kuo for the leading
/// dimensions, listed as (degree, coefficients, direction numbers) in the
/// same order the primitive polynomials are enumerated.
const JOE_KUO_INITIAL: [(u32, u32, &[u64]); 20] = [
    (1, 0, &[1]),
    (2, 1, &[1, 3]),
    (3, 1, &[1, 3, 1]),
    (3, 2, &[1, 1, 1]),
    (4, 1, &[1, 1, 3, 3]),
    (4, 4, &[1, 3, 5, 13]),
    (5, 2, &[1, 1, 5, 5, 17]),
    (5, 4, &[1, 1, 5, 5, 5]),
    (5, 7, &[1, 1, 7, 11, 19]),
    (5, 11, &[1, 1, 5, 1, 1]),
    (5, 13, &[1, 1, 1, 3, 11]),
    (5, 14, &[1, 3, 5, 5, 31]),
    (6, 1, &[1, 3, 3, 9, 7, 49]),
    (6, 13, &[1, 1, 1, 15, 21, 21]),
    (6, 16, &[1, 3, 1, 13, 27, 49]),
    (6, 19, &[1, 1, 1, 15, 7, 5]),
    (6, 22, &[1, 3, 1, 15, 13, 25]),
    (6, 25, &[1, 1, 5, 5, 19, 61]),
    (7, 1, &[1, 3, 7, 11, 23, 15, 103]),
    (7, 4, &[1, 3, 7, 13, 13, 15, 69]),
];

lazy_static! {
    /// Generator matrices for all dimensions, `SOBOL_MATRIX_SIZE` columns
    /// each. Column `j` is applied when bit `j` of the index is set.
    static ref SOBOL_MATRICES_32: Vec<u32> = generate_matrices();
}

/// Returns the columns of the generator matrix for a dimension.
///
/// * `dimension` - The dimension.
pub fn sobol_matrix(dimension: usize) -> &'static [u32] {
    let start = dimension * SOBOL_MATRIX_SIZE;
    &SOBOL_MATRICES_32[start..start + SOBOL_MATRIX_SIZE]
}

/// A primitive polynomial over GF(2) of the form
/// `x^s + a_1 x^(s-1) + ... + a_(s-1) x + 1`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct PrimitivePolynomial {
    /// The degree `s`.
    degree: u32,

    /// The inner coefficients `a_1..a_(s-1)`, `a_1` in the most significant bit.
    a: u32,
}

/// Builds the matrices for every dimension.
fn generate_matrices() -> Vec<u32> {
    let polynomials = primitive_polynomials(NUM_SOBOL_DIMENSIONS - 1);

    let mut matrices = Vec::with_capacity(NUM_SOBOL_DIMENSIONS * SOBOL_MATRIX_SIZE);

    // Dimension 0 is the van der Corput sequence.
    matrices.extend((0..SOBOL_MATRIX_SIZE).map(|j| if j < 32 { 1_u32 << (31 - j) } else { 0 }));

    for (i, poly) in polynomials.iter().enumerate() {
        let dimension = i + 1;
        let initial: Vec<u64> = match JOE_KUO_INITIAL.get(i) {
            Some(&(_, _, m)) => m.to_vec(),
            None => (1..=poly.degree as u64)
                .map(|k| (mix_bits(((dimension as u64) << 8) | k) & ((1 << k) - 1)) | 1)
                .collect(),
        };
        matrices.extend(direction_numbers(poly, &initial));
    }

    debug!(
        "Generated {} Sobol' generator matrices with {} columns",
        NUM_SOBOL_DIMENSIONS, SOBOL_MATRIX_SIZE
    );

    matrices
}

/// Extends the initial direction numbers with the polynomial recurrence and
/// returns them as 32-bit fixed point matrix columns.
///
/// * `poly`    - The primitive polynomial.
/// * `initial` - Odd initial values with `m_k < 2^k`.
fn direction_numbers(poly: &PrimitivePolynomial, initial: &[u64]) -> Vec<u32> {
    let s = poly.degree as usize;
    debug_assert_eq!(initial.len(), s);

    let mut m: Vec<u64> = Vec::with_capacity(SOBOL_MATRIX_SIZE);
    m.extend_from_slice(initial);

    for k in s..SOBOL_MATRIX_SIZE {
        let mut v = m[k - s] ^ (m[k - s] << s);
        for i in 1..s {
            if (poly.a >> (s - 1 - i)) & 1 == 1 {
                v ^= m[k - i] << i;
            }
        }
        m.push(v);
    }

    m.iter()
        .enumerate()
        .map(|(j, &mk)| {
            let k = j + 1;
            if k <= 32 {
                (mk << (32 - k)) as u32
            } else {
                (mk >> (k - 32)) as u32
            }
        })
        .collect()
}

/// Returns the first `count` primitive polynomials ordered by degree and
/// then by coefficients.
///
/// * `count` - Number of polynomials.
fn primitive_polynomials(count: usize) -> Vec<PrimitivePolynomial> {
    let mut polys = Vec::with_capacity(count);
    let mut degree = 1;
    while polys.len() < count {
        for a in 0..(1_u32 << (degree - 1)) {
            let bits = (1 << degree) | (a << 1) | 1;
            if is_primitive(bits, degree) {
                polys.push(PrimitivePolynomial { degree, a });
                if polys.len() == count {
                    break;
                }
            }
        }
        degree += 1;
    }
    polys
}

/// Multiplies two polynomials modulo `poly`.
fn mul_mod(a: u32, b: u32, poly: u32, degree: u32) -> u32 {
    let (mut a, mut b) = (a, b);
    let mut result = 0;
    while b != 0 {
        if b & 1 == 1 {
            result ^= a;
        }
        b >>= 1;
        a <<= 1;
        if (a >> degree) & 1 == 1 {
            a ^= poly;
        }
    }
    result
}

/// Computes `x^e` modulo `poly`.
fn x_pow_mod(e: u32, poly: u32, degree: u32) -> u32 {
    let mut base = if degree == 1 { 2 ^ poly } else { 2 };
    let mut result = 1;
    let mut e = e;
    while e > 0 {
        if e & 1 == 1 {
            result = mul_mod(result, base, poly, degree);
        }
        base = mul_mod(base, base, poly, degree);
        e >>= 1;
    }
    result
}

/// A polynomial of degree `s` is primitive when `x` has multiplicative
/// order exactly `2^s - 1` modulo it.
fn is_primitive(poly: u32, degree: u32) -> bool {
    let order = (1_u32 << degree) - 1;
    if x_pow_mod(order, poly, degree) != 1 {
        return false;
    }

    let mut n = order;
    let mut q = 2;
    while q * q <= n {
        if n % q == 0 {
            if x_pow_mod(order / q, poly, degree) == 1 {
                return false;
            }
            while n % q == 0 {
                n /= q;
            }
        }
        q += 1;
    }
    n <= 1 || x_pow_mod(order / n, poly, degree) != 1
}
