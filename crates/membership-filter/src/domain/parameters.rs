//! Filter sizing math
//!
//! Formulas:
//! - m = ceil(-n * ln(p) / (ln 2)^2)  -- bits
//! - k = ceil((m / n) * ln 2)         -- hash functions
//! - FPR = (1 - e^(-kn/m))^k          -- theoretical rate after n inserts

use std::f64::consts::LN_2;

use crate::error::FilterError;

/// Largest supported bit vector; positions come from a 32-bit hash
pub const MAX_BIT_COUNT: u64 = 1 << 32;

/// Derived filter design
#[derive(Clone, Debug, PartialEq)]
pub struct FilterParams {
    /// Number of bits in the filter (m)
    pub bit_count: u64,
    /// Number of hash functions (k)
    pub hash_count: u32,
    /// Theoretical false positive rate once `expected_items` are inserted
    pub expected_fpr: f64,
}

/// Check that a false positive rate lies in the open interval (0, 1)
pub fn validate_rate(rate: f64) -> Result<(), FilterError> {
    // Written this way so NaN is rejected too
    if rate > 0.0 && rate < 1.0 {
        Ok(())
    } else {
        Err(FilterError::InvalidRate { rate })
    }
}

/// Calculate the filter design for `expected_items` at `target_fpr`
///
/// # Errors
/// - `InvalidCapacity` if `expected_items == 0` or the design exceeds [`MAX_BIT_COUNT`]
/// - `InvalidRate` if `target_fpr` is not strictly between 0 and 1
pub fn calculate_optimal_parameters(
    expected_items: u64,
    target_fpr: f64,
) -> Result<FilterParams, FilterError> {
    if expected_items == 0 {
        return Err(FilterError::InvalidCapacity { expected_items });
    }
    validate_rate(target_fpr)?;

    let bits = optimal_bit_count(expected_items, target_fpr);
    if !bits.is_finite() || bits > MAX_BIT_COUNT as f64 {
        return Err(FilterError::InvalidCapacity { expected_items });
    }
    // n > 0 and 0 < p < 1 make the ceiling at least 1
    let bit_count = (bits as u64).max(1);
    let hash_count = optimal_hash_count(bit_count, expected_items);

    Ok(FilterParams {
        bit_count,
        hash_count,
        expected_fpr: theoretical_fpr(bit_count, expected_items, hash_count),
    })
}

/// m = ceil(-n * ln(p) / (ln 2)^2), unclamped
fn optimal_bit_count(expected_items: u64, target_fpr: f64) -> f64 {
    (-(expected_items as f64) * target_fpr.ln() / (LN_2 * LN_2)).ceil()
}

/// k = ceil((m / n) * ln 2), never below 1
pub fn optimal_hash_count(bit_count: u64, expected_items: u64) -> u32 {
    if expected_items == 0 {
        return 1;
    }
    let k = ((bit_count as f64 / expected_items as f64) * LN_2).ceil();
    (k as u32).max(1)
}

/// Theoretical false positive rate after `inserted` distinct items
///
/// Formula: FPR = (1 - e^(-kn/m))^k
pub fn theoretical_fpr(bit_count: u64, inserted: u64, hash_count: u32) -> f64 {
    if bit_count == 0 {
        return 1.0;
    }
    let exponent = -(hash_count as f64) * (inserted as f64) / (bit_count as f64);
    (1.0 - exponent.exp()).powi(hash_count as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameters_n100_p001() {
        // -100 * ln(0.01) / ln(2)^2 = 958.5 -> 959 bits, ceil(9.59 * ln 2) = 7
        let params = calculate_optimal_parameters(100, 0.01).unwrap();
        assert_eq!(params.bit_count, 959);
        assert_eq!(params.hash_count, 7);
    }

    #[test]
    fn test_parameters_n1000_p001() {
        let params = calculate_optimal_parameters(1000, 0.01).unwrap();
        assert_eq!(params.bit_count, 9586);
        assert_eq!(params.hash_count, 7);
    }

    #[test]
    fn test_expected_fpr_near_target() {
        let params = calculate_optimal_parameters(1000, 0.01).unwrap();
        assert!(
            params.expected_fpr <= 0.011,
            "Expected FPR {} should be close to the 0.01 target",
            params.expected_fpr
        );
    }

    #[test]
    fn test_zero_items_rejected() {
        assert!(matches!(
            calculate_optimal_parameters(0, 0.01),
            Err(FilterError::InvalidCapacity { expected_items: 0 })
        ));
    }

    #[test]
    fn test_rate_bounds_rejected() {
        for rate in [0.0, 1.0, -0.5, 1.5, f64::NAN, f64::INFINITY] {
            assert!(
                matches!(
                    calculate_optimal_parameters(10, rate),
                    Err(FilterError::InvalidRate { .. })
                ),
                "rate {} should be rejected",
                rate
            );
        }
    }

    #[test]
    fn test_oversized_design_rejected() {
        assert!(matches!(
            calculate_optimal_parameters(u64::MAX, 0.01),
            Err(FilterError::InvalidCapacity { .. })
        ));
    }

    #[test]
    fn test_rate_near_one_still_yields_one_bit_and_hash() {
        let params = calculate_optimal_parameters(1, 0.99).unwrap();
        assert_eq!(params.bit_count, 1);
        assert_eq!(params.hash_count, 1);
    }

    #[test]
    fn test_lower_fpr_needs_more_bits_and_hashes() {
        let loose = calculate_optimal_parameters(100, 0.1).unwrap();
        let tight = calculate_optimal_parameters(100, 0.001).unwrap();

        assert!(tight.bit_count > loose.bit_count);
        assert!(tight.hash_count > loose.hash_count);
    }

    #[test]
    fn test_theoretical_fpr() {
        // m=1000, n=100, k=7 gives roughly 0.008
        let fpr = theoretical_fpr(1000, 100, 7);
        assert!(fpr > 0.005 && fpr < 0.02, "Expected FPR≈0.008, got {}", fpr);
        assert_eq!(theoretical_fpr(1000, 0, 7), 0.0);
    }
}
