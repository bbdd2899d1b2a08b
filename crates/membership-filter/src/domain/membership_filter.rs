//! Core membership filter
//!
//! INVARIANTS:
//! - `bit_count` and `hash_count` are fixed at construction
//! - bits only ever go from 0 to 1; nothing clears them
//! - No false negatives: after `add(x)` returns, `might_contain(x)` is true

use std::fs;
use std::path::Path;

use bitvec::prelude::*;
use tracing::{debug, info};

use super::config::FilterConfig;
use super::hash_functions::{derive_seeds, hash_positions};
use super::parameters::calculate_optimal_parameters;
use super::stats::FilterStats;
use crate::codec;
use crate::error::FilterError;

/// Fixed-capacity Bloom filter over byte strings
///
/// Answers "has this item possibly been added?" with no false negatives and a
/// false positive rate that converges to the configured target as the filter
/// approaches its design capacity. The filter never resizes; adding more than
/// `expected_items` distinct items pushes the rate above the target.
///
/// # Example
///
/// ```
/// use membership_filter::MembershipFilter;
///
/// let mut filter = MembershipFilter::new(100, 0.01).unwrap();
/// filter.add(b"apple");
///
/// assert!(filter.might_contain(b"apple"));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct MembershipFilter {
    /// Bit array storing the filter state
    bits: BitVec<u8, Lsb0>,
    /// Size in bits (m)
    bit_count: u64,
    /// One seed per hash function; `hash_seeds.len()` is k
    hash_seeds: Vec<u32>,
    /// Design capacity (n)
    expected_items: u64,
    /// Design false positive rate (p)
    target_false_positive_rate: f64,
}

impl MembershipFilter {
    /// Create a filter sized for `expected_items` at `target_false_positive_rate`
    ///
    /// # Errors
    /// - `InvalidCapacity` if `expected_items == 0` or the design needs more than 2^32 bits
    /// - `InvalidRate` if the rate is not strictly between 0 and 1
    pub fn new(expected_items: u64, target_false_positive_rate: f64) -> Result<Self, FilterError> {
        let params = calculate_optimal_parameters(expected_items, target_false_positive_rate)?;

        debug!(
            expected_items,
            target_false_positive_rate,
            bit_count = params.bit_count,
            hash_count = params.hash_count,
            "Creating membership filter"
        );

        Ok(Self {
            bits: bitvec![u8, Lsb0; 0; params.bit_count as usize],
            bit_count: params.bit_count,
            hash_seeds: derive_seeds(params.hash_count),
            expected_items,
            target_false_positive_rate,
        })
    }

    /// Create a filter from a validated configuration
    pub fn from_config(config: &FilterConfig) -> Result<Self, FilterError> {
        Self::new(config.expected_items, config.target_false_positive_rate)
    }

    /// Add an item. Idempotent; the empty slice is a valid item.
    pub fn add(&mut self, item: &[u8]) {
        for pos in hash_positions(&self.hash_seeds, item, self.bit_count) {
            self.bits.set(pos, true);
        }
    }

    /// Test whether an item might have been added
    ///
    /// Returns:
    /// - `true` if the item might be in the set (could be a false positive)
    /// - `false` if the item was definitely never added
    ///
    /// Stops at the first unset position.
    pub fn might_contain(&self, item: &[u8]) -> bool {
        hash_positions(&self.hash_seeds, item, self.bit_count).all(|pos| self.bits[pos])
    }

    /// Current false positive estimate: `fill_ratio ^ hash_count`
    ///
    /// Computed from the live bit vector on every call. This is an operational
    /// estimate and differs from [`target_false_positive_rate`](Self::target_false_positive_rate),
    /// which is the design target fixed at construction.
    pub fn false_positive_rate(&self) -> f64 {
        self.fill_ratio().powi(self.hash_count() as i32)
    }

    /// Snapshot of size, fill and estimated false positive rate
    pub fn stats(&self) -> FilterStats {
        FilterStats::from_counts(self.bit_count, self.hash_count(), self.filled_bits())
    }

    /// Number of bits set
    pub fn filled_bits(&self) -> u64 {
        self.bits.count_ones() as u64
    }

    /// `filled_bits / bit_count`
    pub fn fill_ratio(&self) -> f64 {
        self.filled_bits() as f64 / self.bit_count as f64
    }

    /// Filter size in bits (m)
    pub fn bit_count(&self) -> u64 {
        self.bit_count
    }

    /// Number of hash functions (k)
    pub fn hash_count(&self) -> u32 {
        self.hash_seeds.len() as u32
    }

    /// Seeds of the hash family, in evaluation order
    pub fn hash_seeds(&self) -> &[u32] {
        &self.hash_seeds
    }

    /// Capacity the filter was designed for
    pub fn expected_items(&self) -> u64 {
        self.expected_items
    }

    /// False positive rate the filter was designed for
    pub fn target_false_positive_rate(&self) -> f64 {
        self.target_false_positive_rate
    }

    /// True when no bit is set
    pub fn is_empty(&self) -> bool {
        self.bits.not_any()
    }

    /// Length of the packed bitmap in bytes
    pub fn size_in_bytes(&self) -> usize {
        self.bits.as_raw_slice().len()
    }

    /// Packed bitmap, LSB-first, final byte zero-padded
    pub(crate) fn raw_bitmap(&self) -> &[u8] {
        self.bits.as_raw_slice()
    }

    /// Serialize the filter to the versioned binary layout
    pub fn to_bytes(&self) -> Vec<u8> {
        codec::encode(self)
    }

    /// Deserialize a filter from bytes produced by [`to_bytes`](Self::to_bytes)
    ///
    /// # Errors
    /// `FilterError::Deserialize` if the blob is truncated, carries an unknown
    /// format marker or version, fails its checksum, or has a bitmap
    /// inconsistent with its declared bit count.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FilterError> {
        let parts = codec::decode(bytes)?;
        Ok(Self {
            bits: parts.bits,
            bit_count: parts.bit_count,
            hash_seeds: parts.seeds,
            expected_items: parts.expected_items,
            target_false_positive_rate: parts.target_false_positive_rate,
        })
    }

    /// Write the serialized filter to `path`
    ///
    /// I/O failures surface as `FilterError::Io`.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), FilterError> {
        let path = path.as_ref();
        let bytes = self.to_bytes();
        fs::write(path, &bytes)?;
        info!(path = %path.display(), bytes = bytes.len(), "Saved membership filter");
        Ok(())
    }

    /// Read a filter previously written with [`save_to_file`](Self::save_to_file)
    ///
    /// I/O failures surface as `FilterError::Io`, malformed content as
    /// `FilterError::Deserialize`.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, FilterError> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let filter = Self::from_bytes(&bytes)?;
        info!(
            path = %path.display(),
            bit_count = filter.bit_count,
            filled_bits = filter.filled_bits(),
            "Loaded membership filter"
        );
        Ok(filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_creates_empty_filter() {
        let filter = MembershipFilter::new(100, 0.01).unwrap();

        assert_eq!(filter.bit_count(), 959);
        assert_eq!(filter.hash_count(), 7);
        assert_eq!(filter.hash_seeds().len(), 7);
        assert_eq!(filter.filled_bits(), 0);
        assert!(filter.is_empty());
        assert_eq!(filter.size_in_bytes(), 120);
    }

    #[test]
    fn test_construction_rejects_degenerate_inputs() {
        assert!(matches!(
            MembershipFilter::new(0, 0.01),
            Err(FilterError::InvalidCapacity { expected_items: 0 })
        ));
        assert!(matches!(
            MembershipFilter::new(100, 0.0),
            Err(FilterError::InvalidRate { .. })
        ));
        assert!(matches!(
            MembershipFilter::new(100, 1.0),
            Err(FilterError::InvalidRate { .. })
        ));
    }

    #[test]
    fn test_add_sets_at_most_k_bits() {
        let mut filter = MembershipFilter::new(100, 0.01).unwrap();
        filter.add(b"test_element_0xABCD1234");

        assert!(filter.filled_bits() > 0);
        assert!(filter.filled_bits() <= filter.hash_count() as u64);
        assert!(!filter.is_empty());
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut once = MembershipFilter::new(100, 0.01).unwrap();
        once.add(b"apple");

        let mut twice = MembershipFilter::new(100, 0.01).unwrap();
        twice.add(b"apple");
        twice.add(b"apple");

        assert_eq!(once, twice, "Adding twice must leave identical bits");
    }

    #[test]
    fn test_might_contain_after_add() {
        let mut filter = MembershipFilter::new(100, 0.01).unwrap();
        filter.add(b"apple");
        filter.add(b"banana");
        filter.add(b"cherry");

        assert!(filter.might_contain(b"apple"));
        assert!(filter.might_contain(b"banana"));
        assert!(filter.might_contain(b"cherry"));
        // Not guaranteed in general, holds for this design and input
        assert!(!filter.might_contain(b"grape"));
    }

    #[test]
    fn test_empty_item() {
        let mut filter = MembershipFilter::new(10, 0.1).unwrap();
        assert!(!filter.might_contain(b""));
        filter.add(b"");
        assert!(filter.might_contain(b""));
    }

    #[test]
    fn test_false_positive_rate_tracks_fill() {
        let mut filter = MembershipFilter::new(100, 0.01).unwrap();
        assert_eq!(filter.false_positive_rate(), 0.0);

        for i in 0..100 {
            filter.add(format!("item_{}", i).as_bytes());
        }

        let expected = filter.fill_ratio().powi(filter.hash_count() as i32);
        assert_eq!(filter.false_positive_rate(), expected);
        assert_eq!(filter.target_false_positive_rate(), 0.01);
    }

    #[test]
    fn test_stats() {
        let mut filter = MembershipFilter::new(100, 0.01).unwrap();
        filter.add(b"apple");

        let stats = filter.stats();
        assert_eq!(stats.bit_count, 959);
        assert_eq!(stats.hash_count, 7);
        assert_eq!(stats.filled_bits, filter.filled_bits());
        assert_eq!(stats.fill_ratio, filter.fill_ratio());
        assert_eq!(
            stats.estimated_false_positive_rate,
            filter.false_positive_rate()
        );
    }

    #[test]
    fn test_from_config() {
        let config = FilterConfig::new(1000, 0.01).unwrap();
        let filter = MembershipFilter::from_config(&config).unwrap();
        assert_eq!(filter.expected_items(), 1000);
        assert_eq!(filter.bit_count(), 9586);
    }

    #[test]
    fn test_bytes_round_trip() {
        let mut filter = MembershipFilter::new(100, 0.01).unwrap();
        filter.add(b"element_1");
        filter.add(b"element_2");

        let restored = MembershipFilter::from_bytes(&filter.to_bytes()).unwrap();
        assert_eq!(restored, filter);
        assert!(restored.might_contain(b"element_1"));
        assert!(restored.might_contain(b"element_2"));
    }

    #[test]
    fn test_from_bytes_rejects_garbage() {
        let err = MembershipFilter::from_bytes(b"definitely not a filter").unwrap_err();
        assert!(err.is_format());
    }

    #[test]
    fn test_fully_saturated_filter() {
        let mut filter = MembershipFilter::new(1, 0.5).unwrap();
        for i in 0..1000 {
            filter.add(format!("flood_{}", i).as_bytes());
        }

        assert_eq!(filter.filled_bits(), filter.bit_count());
        assert_eq!(filter.false_positive_rate(), 1.0);
        assert!(filter.might_contain(b"never added"));
    }
}
