//! Error types for the memoization caches
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for cache construction.
///
/// Lookup misses are not errors: `get`/`peek` return `Option`, so a miss is
/// always distinguishable from any stored value. Fetch and retry failures
/// keep the caller's own error type and pass through untouched.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CacheError {
    /// Cache constructed with a capacity of zero
    #[error("cache capacity must be at least 1")]
    ZeroCapacity,
}

// == Result Type Alias ==
/// Convenience Result type for the cache crate.
pub type Result<T> = std::result::Result<T, CacheError>;
