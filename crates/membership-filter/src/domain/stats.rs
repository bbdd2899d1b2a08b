//! Point-in-time filter statistics

use serde::{Deserialize, Serialize};

/// Statistics computed from the live bit vector
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FilterStats {
    /// Total bits in the filter (m)
    pub bit_count: u64,
    /// Number of hash functions (k)
    pub hash_count: u32,
    /// Bits currently set
    pub filled_bits: u64,
    /// `filled_bits / bit_count`
    pub fill_ratio: f64,
    /// `fill_ratio ^ hash_count`
    pub estimated_false_positive_rate: f64,
}

impl FilterStats {
    pub(crate) fn from_counts(bit_count: u64, hash_count: u32, filled_bits: u64) -> Self {
        let fill_ratio = filled_bits as f64 / bit_count as f64;
        Self {
            bit_count,
            hash_count,
            filled_bits,
            fill_ratio,
            estimated_false_positive_rate: fill_ratio.powi(hash_count as i32),
        }
    }
}
