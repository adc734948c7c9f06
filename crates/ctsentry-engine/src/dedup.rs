//! The `seen_alerts` bounded FIFO (§3): suppresses re-alerting on the
//! same `(candidate, brand)` pair within the last `N` alerts. Shared
//! across all workers, so every operation takes the internal mutex.

use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;

type DedupKey = (String, String);

struct Inner {
    order: VecDeque<DedupKey>,
    members: HashSet<DedupKey>,
    capacity: usize,
}

/// Bounded, thread-safe `(candidate, brand)` dedup window. Insertion
/// evicts the oldest entry once `capacity` is reached, matching the
/// "last N=10,000 pairs" FIFO described in the data model.
pub struct SeenAlerts {
    inner: Mutex<Inner>,
}

impl SeenAlerts {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                order: VecDeque::with_capacity(capacity.min(4096)),
                members: HashSet::with_capacity(capacity.min(4096)),
                capacity: capacity.max(1),
            }),
        }
    }

    /// Atomically check-and-insert: returns `true` if `key` was newly
    /// inserted (i.e. this alert should be emitted), `false` if it was
    /// already present (i.e. this alert is a duplicate and must be
    /// suppressed).
    pub fn insert_if_absent(&self, key: DedupKey) -> bool {
        let mut inner = self.inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner);

        if inner.members.contains(&key) {
            return false;
        }

        if inner.order.len() >= inner.capacity {
            if let Some(oldest) = inner.order.pop_front() {
                inner.members.remove(&oldest);
            }
        }

        inner.order.push_back(key.clone());
        inner.members.insert(key);
        true
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner).order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
