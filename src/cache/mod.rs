//! Cache Module
//!
//! Bounded in-memory store with per-entry TTL, lazy expiry and
//! oldest-first eviction.

mod entry;
mod order;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use order::InsertionOrder;
pub use stats::CacheStats;
pub use store::CacheStore;
