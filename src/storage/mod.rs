//! Storage Module
//!
//! The storage contract shared by every cache backend, plus the four
//! interchangeable backend implementations: process memory, local file
//! mirror, remote Redis service, and S3 object mirror.

mod entry;
mod file;
mod memory;
mod redis;
mod remote;
mod s3;
mod table;

#[cfg(test)]
mod property_tests;

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::{BackendKind, Config};
use crate::error::Result;

// Re-export public types
pub use entry::CacheEntry;
pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use remote::{ObjectClient, RemoteKv};
pub use s3::{S3ObjectClient, S3Storage};
pub use self::redis::{RedisRemote, RedisStorage};

// == Storage Contract ==
/// The uniform contract all backends satisfy.
///
/// Callers select one backend at construction time and thereafter hold a
/// `Box<dyn CacheStorage<V>>`, staying agnostic to where entries live.
/// Expiry semantics are identical across backends; durability, locking,
/// and failure behavior differ and are documented on each backend.
#[async_trait]
pub trait CacheStorage<V>: Send + Sync
where
    V: Send + Sync + 'static,
{
    /// Returns the value for `key` if a live entry exists.
    ///
    /// Fails with [`crate::StorageError::NotFoundOrExpired`] whether the
    /// key was never set, was deleted, or outlived its TTL; callers must
    /// not rely on distinguishing those cases. Reading an expired entry
    /// eagerly removes it from the backing store.
    async fn get(&self, key: &str) -> Result<V>;

    /// Inserts or unconditionally overwrites the entry for `key` with a
    /// value expiring `ttl` from now.
    async fn put(&self, key: &str, value: V, ttl: Duration) -> Result<()>;

    /// Removes the entry for `key`. Absence is not an error.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Releases backend resources and flushes any pending persistence.
    ///
    /// Call exactly once per instance before discarding it.
    async fn stop(&self) -> Result<()>;
}

// == Backend Factory ==
/// Constructs the backend selected by `config`.
///
/// # Errors
/// Fails only when the Redis backend cannot establish its connection;
/// the file and S3 backends tolerate an unreachable or empty mirror.
pub async fn from_config<V>(config: &Config) -> Result<Box<dyn CacheStorage<V>>>
where
    V: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    let storage: Box<dyn CacheStorage<V>> = match config.backend {
        BackendKind::Memory => Box::new(MemoryStorage::new()),
        BackendKind::File => Box::new(FileStorage::new(&config.file_path).await),
        BackendKind::Redis => Box::new(
            RedisStorage::connect(
                &config.redis_addr,
                config.redis_password.as_deref(),
                config.redis_db,
            )
            .await?,
        ),
        BackendKind::S3 => Box::new(
            S3Storage::connect(&config.s3_bucket, &config.s3_object_key, &config.s3_region)
                .await,
        ),
    };

    Ok(storage)
}
