//! # Membership Filter
//!
//! Fixed-capacity Bloom filter answering "has this item possibly been added?"
//! with zero false negatives and a bounded false positive rate, plus a
//! versioned binary persistence format.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): the filter, hash family, sizing math,
//!   configuration and statistics
//! - **Codec** (`codec/`): explicit little-endian layout with a CRC-32 trailer
//! - **Ports Layer** (`ports/`): `FilterStore` persistence port
//! - **Adapters Layer** (`adapters/`): `FileFilterStore`, `InMemoryFilterStore`
//! - **Shared** (`shared`): `SharedMembershipFilter` for concurrent callers
//! - **Metrics** (`metrics`): lock-free operation counters
//!
//! ## Invariants
//!
//! - m = ceil(-n ln p / (ln 2)^2), k = ceil((m / n) ln 2), both fixed at construction
//! - Bits are only ever set, never cleared
//! - No false negatives: once `add(x)` returns, `might_contain(x)` is true
//!
//! ## Usage Example
//!
//! ```
//! use membership_filter::MembershipFilter;
//!
//! let mut filter = MembershipFilter::new(100, 0.01)?;
//! filter.add(b"apple");
//! filter.add(b"banana");
//!
//! assert!(filter.might_contain(b"apple"));
//!
//! let restored = MembershipFilter::from_bytes(&filter.to_bytes())?;
//! assert!(restored.might_contain(b"banana"));
//! # Ok::<(), membership_filter::FilterError>(())
//! ```

pub mod adapters;
pub mod codec;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod shared;

// Re-exports for convenience
pub use adapters::{FileFilterStore, InMemoryFilterStore};
pub use domain::{FilterConfig, FilterConfigBuilder, FilterParams, FilterStats, MembershipFilter};
pub use error::{DecodeError, FilterError};
pub use metrics::{Metrics, MetricsSnapshot};
pub use ports::FilterStore;
pub use shared::SharedMembershipFilter;
