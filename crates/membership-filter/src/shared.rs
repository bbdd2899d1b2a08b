//! Lock-guarded filter for concurrent callers
//!
//! `add` takes the write lock so concurrent inserts never lose a bit;
//! `might_contain` and the read-only operations share the read lock. An item
//! whose `add` has returned is visible to every later `might_contain`.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::domain::{FilterStats, MembershipFilter};
use crate::metrics::Metrics;

struct Inner {
    filter: RwLock<MembershipFilter>,
    metrics: Arc<Metrics>,
}

impl Drop for Inner {
    fn drop(&mut self) {
        self.metrics.record_filter_freed(self.filter.get_mut().bit_count());
    }
}

/// Cloneable handle to a filter shared between threads
///
/// Clones refer to the same filter.
#[derive(Clone)]
pub struct SharedMembershipFilter {
    inner: Arc<Inner>,
}

impl SharedMembershipFilter {
    /// Share `filter`, recording activity in a fresh [`Metrics`]
    pub fn new(filter: MembershipFilter) -> Self {
        Self::with_metrics(filter, Arc::new(Metrics::new()))
    }

    /// Share `filter`, recording activity in `metrics`
    pub fn with_metrics(filter: MembershipFilter, metrics: Arc<Metrics>) -> Self {
        metrics.record_filter_created(filter.bit_count());
        Self {
            inner: Arc::new(Inner {
                filter: RwLock::new(filter),
                metrics,
            }),
        }
    }

    pub fn add(&self, item: &[u8]) {
        self.inner.filter.write().add(item);
        self.inner.metrics.record_add();
    }

    pub fn might_contain(&self, item: &[u8]) -> bool {
        let found = self.inner.filter.read().might_contain(item);
        self.inner.metrics.record_lookup(found);
        found
    }

    pub fn stats(&self) -> FilterStats {
        self.inner.filter.read().stats()
    }

    pub fn false_positive_rate(&self) -> f64 {
        self.inner.filter.read().false_positive_rate()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.inner.filter.read().to_bytes()
    }

    /// Independent copy of the current filter state
    pub fn snapshot(&self) -> MembershipFilter {
        self.inner.filter.read().clone()
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.inner.metrics
    }
}

impl From<MembershipFilter> for SharedMembershipFilter {
    fn from(filter: MembershipFilter) -> Self {
        Self::new(filter)
    }
}
