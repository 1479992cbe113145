//! Insertion Order Module
//!
//! Tracks the order in which keys were created so the store can evict the
//! oldest entry without scanning every entry's timestamp.

use std::collections::VecDeque;

// == Insertion Order ==
/// Keys ordered by creation time.
///
/// Keys are stored in a VecDeque where:
/// - Front = Oldest insertion (next eviction candidate)
/// - Back = Most recent insertion or overwrite
///
/// Reads never reorder keys: eviction is by creation, not by recency.
#[derive(Debug, Default)]
pub struct InsertionOrder {
    order: VecDeque<String>,
}

impl InsertionOrder {
    // == Constructor ==
    /// Creates a new empty tracker.
    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }

    // == Record Insert ==
    /// Marks a key as just created.
    ///
    /// An overwrite resets the key's creation time, so an existing
    /// occurrence is dropped before the key is appended.
    pub fn record_insert(&mut self, key: &str) {
        self.remove(key);
        self.order.push_back(key.to_string());
    }

    // == Remove ==
    /// Removes a key from the tracker.
    pub fn remove(&mut self, key: &str) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            self.order.remove(pos);
        }
    }

    /// Removes every key starting with `prefix`.
    pub fn remove_prefix(&mut self, prefix: &str) {
        self.order.retain(|k| !k.starts_with(prefix));
    }

    // == Pop Oldest ==
    /// Returns and removes the oldest key.
    ///
    /// Returns None if tracker is empty.
    pub fn pop_oldest(&mut self) -> Option<String> {
        self.order.pop_front()
    }

    pub fn clear(&mut self) {
        self.order.clear();
    }
}
