//! Error types for the cache engine
//!
//! Loader failures are never wrapped here: they are handed back to the
//! caller exactly as the loader produced them. This enum only covers the
//! crate's own failures.

use thiserror::Error;

// == Cache Error Enum ==
/// Errors raised by the cache itself.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// A configuration value is out of range or unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// An environment variable was present but could not be parsed
    #[error("Invalid value for {name}: {value:?}")]
    InvalidEnv { name: &'static str, value: String },
}

// == Result Type Alias ==
/// Convenience Result type for the cache engine.
pub type Result<T> = std::result::Result<T, CacheError>;
