//! Seeded hash family for the membership filter
//!
//! Every hash function is the same 32-bit DJB2 multiply-and-add loop started
//! from a different seed. Seeds are `i * SEED_MULTIPLIER` (wrapping), which
//! are distinct for every `i` because the multiplier is odd.

/// Odd 32-bit multiplier (Knuth's golden-ratio constant) used to spread seeds
pub const SEED_MULTIPLIER: u32 = 2_654_435_761;

/// Derive `hash_count` seeds deterministically
pub fn derive_seeds(hash_count: u32) -> Vec<u32> {
    (0..hash_count)
        .map(|i| i.wrapping_mul(SEED_MULTIPLIER))
        .collect()
}

/// DJB2 over `item` starting from `seed`: `h = h * 33 + byte`, wrapping
pub fn djb2_with_seed(seed: u32, item: &[u8]) -> u32 {
    item.iter().fold(seed, |hash, &byte| {
        (hash << 5).wrapping_add(hash).wrapping_add(byte as u32)
    })
}

/// MurmurHash3 32-bit finalizer
///
/// A bijection on u32; spreads DJB2 outputs of near-identical keys apart
/// before they are reduced modulo the bit count.
#[inline]
pub fn fmix32(mut h: u32) -> u32 {
    h ^= h >> 16;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2_ae35);
    h ^= h >> 16;
    h
}

/// Bit position of `item` for the hash function seeded with `seed`
///
/// Not plain `djb2 mod bit_count`: the DJB2 output goes through [`fmix32`]
/// first, so positions differ from an unfinalized DJB2 filter of the same size.
#[inline]
pub fn hash_position(seed: u32, item: &[u8], bit_count: u64) -> usize {
    (fmix32(djb2_with_seed(seed, item)) as u64 % bit_count) as usize
}

/// Iterate the positions of `item`, one per seed
///
/// Lazy so callers can stop at the first unset bit.
pub fn hash_positions<'a>(
    seeds: &'a [u32],
    item: &'a [u8],
    bit_count: u64,
) -> impl Iterator<Item = usize> + 'a {
    seeds
        .iter()
        .map(move |&seed| hash_position(seed, item, bit_count))
}
