//! Domain Layer - Pure filter logic
//!
//! This layer contains:
//! - The membership filter itself
//! - The seeded hash family
//! - Sizing math
//! - Configuration
//! - Statistics
//!
//! RULES:
//! - No async code
//! - The only I/O is the `save_to_file`/`load_from_file` convenience pair

pub mod config;
pub mod hash_functions;
pub mod membership_filter;
pub mod parameters;
pub mod stats;

pub use config::{FilterConfig, FilterConfigBuilder};
pub use membership_filter::MembershipFilter;
pub use parameters::{calculate_optimal_parameters, theoretical_fpr, FilterParams, MAX_BIT_COUNT};
pub use stats::FilterStats;
