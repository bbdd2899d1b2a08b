//! Operation counters for membership filters
//!
//! ## Usage
//!
//! ```
//! use membership_filter::metrics::Metrics;
//!
//! let metrics = Metrics::new();
//! metrics.record_filter_created(959);
//! metrics.record_lookup(true);
//! assert_eq!(metrics.snapshot().lookups_positive, 1);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Thread-safe counters for filter activity
#[derive(Debug, Default)]
pub struct Metrics {
    /// Total filters created or restored
    pub filters_created: AtomicU64,
    /// Total `add` calls
    pub items_added: AtomicU64,
    /// Total `might_contain` calls
    pub lookups_performed: AtomicU64,
    /// Lookups that answered "might contain"
    pub lookups_positive: AtomicU64,
    /// Bytes of bitmap currently allocated
    pub bytes_allocated: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a filter of `bit_count` bits coming into use
    pub fn record_filter_created(&self, bit_count: u64) {
        self.filters_created.fetch_add(1, Ordering::Relaxed);
        self.bytes_allocated
            .fetch_add(bit_count.div_ceil(8), Ordering::Relaxed);
    }

    /// Record a filter of `bit_count` bits being dropped
    ///
    /// Saturates at zero, so a gauge set by hand never wraps around.
    pub fn record_filter_freed(&self, bit_count: u64) {
        let bytes = bit_count.div_ceil(8);
        let _ = self
            .bytes_allocated
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |current| {
                Some(current.saturating_sub(bytes))
            });
    }

    pub fn record_add(&self) {
        self.items_added.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_lookup(&self, found: bool) {
        self.lookups_performed.fetch_add(1, Ordering::Relaxed);
        if found {
            self.lookups_positive.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Ratio of positive lookups to all lookups
    ///
    /// Includes true positives, so it is an upper bound on the observed
    /// false positive rate only when querying items never added.
    pub fn observed_positive_rate(&self) -> f64 {
        let total = self.lookups_performed.load(Ordering::Relaxed);
        let positive = self.lookups_positive.load(Ordering::Relaxed);
        if total > 0 {
            positive as f64 / total as f64
        } else {
            0.0
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            filters_created: self.filters_created.load(Ordering::Relaxed),
            items_added: self.items_added.load(Ordering::Relaxed),
            lookups_performed: self.lookups_performed.load(Ordering::Relaxed),
            lookups_positive: self.lookups_positive.load(Ordering::Relaxed),
            bytes_allocated: self.bytes_allocated.load(Ordering::Relaxed),
        }
    }

    /// Reset the event counters to zero
    ///
    /// `bytes_allocated` is a gauge of live filters, not an event count, and
    /// is left as is.
    pub fn reset(&self) {
        self.filters_created.store(0, Ordering::Relaxed);
        self.items_added.store(0, Ordering::Relaxed);
        self.lookups_performed.store(0, Ordering::Relaxed);
        self.lookups_positive.store(0, Ordering::Relaxed);
    }
}

/// Point-in-time copy of [`Metrics`]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub filters_created: u64,
    pub items_added: u64,
    pub lookups_performed: u64,
    pub lookups_positive: u64,
    pub bytes_allocated: u64,
}
