//! Error types for the cache storage layer
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Storage Error Enum ==
/// Unified error type for all storage backends.
#[derive(Error, Debug)]
pub enum StorageError {
    /// No live entry exists for the key: it was never set, was deleted,
    /// or its TTL elapsed. Callers cannot distinguish these cases.
    #[error("key not found or expired: {0}")]
    NotFoundOrExpired(String),

    /// The backing medium (file, Redis, object store) could not be read
    /// or written.
    #[error("backing store unavailable: {0}")]
    Unavailable(String),
}

// == Result Type Alias ==
/// Convenience Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
