//! Scoped Cache - in-process bounded TTL caching
//!
//! A generic store with lazy expiry and oldest-first eviction, plus
//! read-through adapters that key cached views by the caller's
//! authorization scope.

pub mod adapters;
pub mod cache;
pub mod config;
pub mod error;
pub mod keys;

pub use adapters::{AggregateCache, ScopedCache};
pub use cache::{CacheStats, CacheStore};
pub use config::Config;
pub use error::{CacheError, Result};
pub use keys::{CallerScope, KeyScheme};
