//! Stashkv - a pluggable key-value cache with TTL expiry
//!
//! One uniform contract (get, put, delete, stop) over four
//! interchangeable backends: process memory, a local file mirror, a
//! remote Redis service, and an S3 object mirror. Callers pick a backend
//! at construction time and stay backend-agnostic afterwards.
//!
//! Expiry is lazy: an expired entry is detected and removed only when it
//! is read. There is no background sweeper, so an expired entry that is
//! never read again stays resident (and, for the durable backends,
//! persisted) until some other mutation happens to rewrite the mirror.

pub mod config;
pub mod error;
pub mod storage;

pub use config::{BackendKind, Config};
pub use error::{Result, StorageError};
pub use storage::{
    from_config, CacheEntry, CacheStorage, FileStorage, MemoryStorage, ObjectClient, RedisRemote,
    RedisStorage, RemoteKv, S3ObjectClient, S3Storage,
};
