//! Adapters Module
//!
//! Read-through caches for concrete domains. Each adapter owns exactly one
//! [`CacheStore`](crate::cache::CacheStore), derives its keys through a
//! [`KeyScheme`](crate::keys::KeyScheme) and never writes to the source of
//! truth. Callers that mutate the underlying data are responsible for
//! calling the adapter's `invalidate` afterwards.
//!
//! # Adapters
//! - [`ScopedCache`]: per-caller list views plus by-identifier detail views
//! - [`AggregateCache`]: one caller-independent aggregate under a fixed key

mod aggregate;
mod scoped;

pub use aggregate::AggregateCache;
pub use scoped::ScopedCache;
