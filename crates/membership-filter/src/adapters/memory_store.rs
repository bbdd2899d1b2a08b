//! In-memory filter store

use parking_lot::Mutex;

use crate::domain::MembershipFilter;
use crate::error::FilterError;
use crate::ports::FilterStore;

/// Holds the last saved blob in memory
///
/// Stores encoded bytes rather than the filter itself so loads go through
/// the same decoder as the file store.
#[derive(Debug, Default)]
pub struct InMemoryFilterStore {
    bytes: Mutex<Option<Vec<u8>>>,
}

impl InMemoryFilterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with raw bytes, e.g. a blob received from elsewhere
    pub fn with_bytes(bytes: Vec<u8>) -> Self {
        Self {
            bytes: Mutex::new(Some(bytes)),
        }
    }

    /// Copy of the stored blob, if any
    pub fn bytes(&self) -> Option<Vec<u8>> {
        self.bytes.lock().clone()
    }
}

impl FilterStore for InMemoryFilterStore {
    fn save(&self, filter: &MembershipFilter) -> Result<(), FilterError> {
        *self.bytes.lock() = Some(filter.to_bytes());
        Ok(())
    }

    fn load(&self) -> Result<MembershipFilter, FilterError> {
        let guard = self.bytes.lock();
        let bytes = guard.as_deref().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "no filter has been saved")
        })?;
        MembershipFilter::from_bytes(bytes)
    }
}
