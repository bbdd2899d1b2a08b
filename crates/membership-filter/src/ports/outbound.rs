//! Outbound Ports (Driven Ports)

use crate::domain::MembershipFilter;
use crate::error::FilterError;

/// Durable home for a single serialized filter (Driven Port)
///
/// Implementations must keep storage failures (`FilterError::Io`) distinct
/// from corrupt content (`FilterError::Deserialize`) so callers can retry
/// the former without discarding the data.
pub trait FilterStore: Send + Sync {
    /// Persist the filter, replacing any previous copy
    fn save(&self, filter: &MembershipFilter) -> Result<(), FilterError>;

    /// Load the most recently saved filter
    fn load(&self) -> Result<MembershipFilter, FilterError>;
}
