//! Hashing and index permutation.

/// Returns a well-mixed 64-bit value derived from `v`. Every input bit
/// affects every output bit.
///
/// * `v` - The value to mix.
#[inline(always)]
pub fn mix_bits(v: u64) -> u64 {
    let mut v = v;
    v ^= v >> 31;
    v = v.wrapping_mul(0x7fb5d329728ea185);
    v ^= v >> 27;
    v = v.wrapping_mul(0x81dadef4bc2dd44d);
    v ^= v >> 33;
    v
}

/// Returns the 64-bit MurmurHash2 (variant 64A) of a byte slice.
///
/// * `key`  - The bytes to hash.
/// * `seed` - Hash seed.
pub fn murmur_hash64a(key: &[u8], seed: u64) -> u64 {
    const M: u64 = 0xc6a4a7935bd1e995;
    const R: u32 = 47;

    let mut h = seed ^ (key.len() as u64).wrapping_mul(M);

    let mut blocks = key.chunks_exact(8);
    for block in &mut blocks {
        // Little-endian load.
        let mut k = block.iter().rev().fold(0_u64, |acc, &b| (acc << 8) | b as u64);
        k = k.wrapping_mul(M);
        k ^= k >> R;
        k = k.wrapping_mul(M);

        h ^= k;
        h = h.wrapping_mul(M);
    }

    let tail = blocks.remainder();
    if !tail.is_empty() {
        for (i, &b) in tail.iter().enumerate() {
            h ^= (b as u64) << (8 * i);
        }
        h = h.wrapping_mul(M);
    }

    h ^= h >> R;
    h = h.wrapping_mul(M);
    h ^= h >> R;
    h
}

/// Hashes a list of 32-bit integers packed back to back as little-endian
/// bytes.
///
/// * `values` - The values to hash.
pub fn hash_ints(values: &[i32]) -> u64 {
    let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
    murmur_hash64a(&bytes, 0)
}

/// Returns the `i`-th element of a pseudo-random permutation of `[0, l)`
/// selected by `p`. For fixed `l` and `p` the mapping is a bijection.
///
/// * `i` - Index to permute; must be less than `l`.
/// * `l` - Permutation length.
/// * `p` - Permutation seed.
pub fn permutation_element(i: u32, l: u32, p: u32) -> u32 {
    debug_assert!(i < l);

    let mut w = l - 1;
    w |= w >> 1;
    w |= w >> 2;
    w |= w >> 4;
    w |= w >> 8;
    w |= w >> 16;

    // Cycle-walk until the value lands inside `[0, l)`.
    let mut i = i;
    loop {
        i ^= p;
        i = i.wrapping_mul(0xe170893d);
        i ^= p >> 16;
        i ^= (i & w) >> 4;
        i ^= p >> 8;
        i = i.wrapping_mul(0x0929eb3f);
        i ^= p >> 23;
        i ^= (i & w) >> 1;
        i = i.wrapping_mul(1 | p >> 27);
        i = i.wrapping_mul(0x6935fa69);
        i ^= (i & w) >> 11;
        i = i.wrapping_mul(0x74dcb303);
        i ^= (i & w) >> 2;
        i = i.wrapping_mul(0x9e501cc3);
        i ^= (i & w) >> 2;
        i = i.wrapping_mul(0xc860a3df);
        i &= w;
        i ^= i >> 5;
        if i < l {
            break;
        }
    }

    ((i as u64 + p as u64) % l as u64) as u32
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn mix_bits_zero_is_fixed_point() {
        assert_eq!(mix_bits(0), 0);
        assert_ne!(mix_bits(1), 1);
    }

    #[test]
    fn murmur_depends_on_length() {
        assert_ne!(murmur_hash64a(&[0, 0, 0, 0], 0), murmur_hash64a(&[0, 0, 0, 0, 0], 0));
        assert_ne!(hash_ints(&[1, 2, 3]), hash_ints(&[3, 2, 1]));
    }

    #[test]
    fn permutation_of_one() {
        assert_eq!(permutation_element(0, 1, 0xdeadbeef), 0);
    }

    proptest! {
        #[test]
        fn permutation_is_bijection(l in 1..600u32, p in 0..u32::MAX) {
            let image: HashSet<u32> = (0..l).map(|i| permutation_element(i, l, p)).collect();
            prop_assert_eq!(image.len(), l as usize);
            prop_assert!(image.iter().all(|&v| v < l));
        }

        #[test]
        fn hash_is_deterministic(a in any::<i32>(), b in any::<i32>()) {
            prop_assert_eq!(hash_ints(&[a, b]), hash_ints(&[a, b]));
        }
    }
}
