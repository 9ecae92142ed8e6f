//! Prime numbers

/// Number of primes available to the radical inverse functions.
pub const PRIME_TABLE_SIZE: usize = 1000;

lazy_static! {
    /// The first `PRIME_TABLE_SIZE` prime numbers.
    pub static ref PRIMES: Vec<u64> = first_primes(PRIME_TABLE_SIZE);
}

/// Returns the first `n` primes using trial division by the primes found so far.
///
/// * `n` - Number of primes.
fn first_primes(n: usize) -> Vec<u64> {
    let mut primes: Vec<u64> = Vec::with_capacity(n);
    let mut candidate = 2_u64;
    while primes.len() < n {
        if primes
            .iter()
            .take_while(|&&p| p * p <= candidate)
            .all(|&p| candidate % p != 0)
        {
            primes.push(candidate);
        }
        candidate += 1;
    }
    primes
}
