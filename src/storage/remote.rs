//! Remote Collaborator Traits
//!
//! Opaque capability sets for the two external services the remote
//! backends delegate to. The concrete clients live in the sibling
//! `redis` and `s3` modules; tests substitute in-memory fakes, which is
//! the whole point of keeping the seam this narrow.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;

// == Remote Key-Value Collaborator ==
/// Capability set of an external key-value service.
///
/// Payload contents are opaque to the service; it applies its own TTL
/// to stored values independently of whatever the payload encodes.
#[async_trait]
pub trait RemoteKv: Send + Sync {
    /// Stores `payload` under `key`, expiring server-side after `ttl`.
    async fn set(&self, key: &str, payload: String, ttl: Duration) -> Result<()>;

    /// Fetches the payload for `key`, `None` if the service holds no value.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Removes `key`; absence is not an error.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Releases the client connection.
    async fn close(&self) -> Result<()>;
}

// == Remote Object-Store Collaborator ==
/// Capability set of an external object store holding opaque blobs.
#[async_trait]
pub trait ObjectClient: Send + Sync {
    /// Fetches an object, `None` if it does not exist.
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Option<Vec<u8>>>;

    /// Creates or overwrites an object.
    async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<()>;
}
