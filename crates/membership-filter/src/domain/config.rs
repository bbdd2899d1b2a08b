//! Filter configuration and validation
//!
//! # Example
//!
//! ```
//! use membership_filter::FilterConfigBuilder;
//!
//! let config = FilterConfigBuilder::new()
//!     .expected_items(10_000)
//!     .target_false_positive_rate(0.001)
//!     .build()
//!     .expect("Valid config");
//! assert_eq!(config.expected_items, 10_000);
//! ```

use std::env;

use serde::{Deserialize, Serialize};

use super::parameters::{calculate_optimal_parameters, validate_rate, FilterParams};
use crate::error::FilterError;

/// Environment variable holding the expected item count
pub const ENV_EXPECTED_ITEMS: &str = "MEMBERSHIP_FILTER_EXPECTED_ITEMS";
/// Environment variable holding the target false positive rate
pub const ENV_TARGET_FPR: &str = "MEMBERSHIP_FILTER_TARGET_FPR";

const DEFAULT_EXPECTED_ITEMS: u64 = 1000;
const DEFAULT_TARGET_FPR: f64 = 0.01;

/// Capacity and accuracy a filter is designed for
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Number of distinct items the filter is sized for (n)
    pub expected_items: u64,
    /// Target false positive rate at design capacity (p)
    pub target_false_positive_rate: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            expected_items: DEFAULT_EXPECTED_ITEMS,
            target_false_positive_rate: DEFAULT_TARGET_FPR,
        }
    }
}

impl FilterConfig {
    /// Create a new configuration with validation
    pub fn new(expected_items: u64, target_false_positive_rate: f64) -> Result<Self, FilterError> {
        let config = Self {
            expected_items,
            target_false_positive_rate,
        };
        config.validate()?;
        Ok(config)
    }

    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `MEMBERSHIP_FILTER_EXPECTED_ITEMS`: expected item count (default: 1000)
    /// - `MEMBERSHIP_FILTER_TARGET_FPR`: target false positive rate (default: 0.01)
    ///
    /// Absent or unparsable values fall back to the defaults. The result is
    /// not validated; call [`FilterConfig::validate`] before use.
    pub fn from_env() -> Self {
        Self {
            expected_items: env::var(ENV_EXPECTED_ITEMS)
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(DEFAULT_EXPECTED_ITEMS),

            target_false_positive_rate: env::var(ENV_TARGET_FPR)
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(DEFAULT_TARGET_FPR),
        }
    }

    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self, FilterError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the same bounds filter construction enforces
    pub fn validate(&self) -> Result<(), FilterError> {
        if self.expected_items == 0 {
            return Err(FilterError::InvalidCapacity {
                expected_items: self.expected_items,
            });
        }
        validate_rate(self.target_false_positive_rate)?;
        Ok(())
    }

    /// Derived filter design for this configuration
    pub fn params(&self) -> Result<FilterParams, FilterError> {
        calculate_optimal_parameters(self.expected_items, self.target_false_positive_rate)
    }

    /// Builder-style method to set the expected item count
    pub fn with_expected_items(mut self, expected_items: u64) -> Self {
        self.expected_items = expected_items;
        self
    }

    /// Builder-style method to set the target false positive rate
    pub fn with_target_false_positive_rate(mut self, rate: f64) -> Self {
        self.target_false_positive_rate = rate;
        self
    }
}

/// Fluent builder for [`FilterConfig`]; unset fields take the defaults
#[derive(Default)]
pub struct FilterConfigBuilder {
    expected_items: Option<u64>,
    target_false_positive_rate: Option<f64>,
}

impl FilterConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the expected number of distinct items (must be > 0)
    pub fn expected_items(mut self, expected_items: u64) -> Self {
        self.expected_items = Some(expected_items);
        self
    }

    /// Set the target false positive rate (must be in (0, 1))
    pub fn target_false_positive_rate(mut self, rate: f64) -> Self {
        self.target_false_positive_rate = Some(rate);
        self
    }

    /// Build with validation
    pub fn build(self) -> Result<FilterConfig, FilterError> {
        let defaults = FilterConfig::default();
        let config = FilterConfig {
            expected_items: self.expected_items.unwrap_or(defaults.expected_items),
            target_false_positive_rate: self
                .target_false_positive_rate
                .unwrap_or(defaults.target_false_positive_rate),
        };

        config.validate()?;
        Ok(config)
    }
}
