use std::collections::{HashSet, VecDeque};

use tracing::debug;

/// Default number of message ids remembered for deduplication.
pub const DEFAULT_DEDUP_CAPACITY: usize = 100;

/// Bounded FIFO set of processed message ids.
///
/// Insertion order is eviction order: once the set grows past its capacity the
/// oldest id is dropped. Not persisted, so a restart forgets every id.
#[derive(Debug)]
pub struct ProcessedMessageSet {
    capacity: usize,
    order: VecDeque<String>,
    members: HashSet<String>,
}

impl ProcessedMessageSet {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            order: VecDeque::with_capacity(capacity + 1),
            members: HashSet::with_capacity(capacity + 1),
        }
    }

    /// Record `id` and report whether it was new.
    ///
    /// Contains, insert, and evict happen together; callers sharing the set across
    /// tasks must hold one lock around this call.
    pub fn check_and_insert(&mut self, id: &str) -> bool {
        if self.members.contains(id) {
            return false;
        }
        self.members.insert(id.to_string());
        self.order.push_back(id.to_string());

        if self.order.len() > self.capacity {
            if let Some(evicted) = self.order.pop_front() {
                self.members.remove(&evicted);
                debug!(evicted = %evicted, "Dedup set evicted oldest message id");
            }
        }
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.members.contains(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Remembered ids, oldest first.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }
}

impl Default for ProcessedMessageSet {
    fn default() -> Self {
        Self::new(DEFAULT_DEDUP_CAPACITY)
    }
}
