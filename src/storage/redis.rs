//! Redis Backend Module
//!
//! Delegates storage to an external Redis-compatible service. Each
//! entry is serialized whole (value plus expiry) into the remote value,
//! and the service's own TTL is set alongside it, so the two expiry
//! mechanisms normally agree. On read the locally stored expiry wins: an
//! entry the service still holds but whose expiry has passed is deleted
//! remotely and reported as a miss.
//!
//! Unlike the other backends there is no local lock or table: the
//! service is the single source of truth and serializes its own
//! operations per key. Concurrent puts to one key race at the service,
//! last-write-wins. This backend propagates remote client errors to the
//! caller instead of absorbing them.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Result, StorageError};
use crate::storage::remote::RemoteKv;
use crate::storage::{CacheEntry, CacheStorage};

// == Redis Client ==
/// [`RemoteKv`] implementation over a multiplexed Redis connection.
pub struct RedisRemote {
    manager: ConnectionManager,
}

impl RedisRemote {
    // == Constructor ==
    /// Connects to the Redis service at `addr`.
    ///
    /// # Arguments
    /// * `addr` - `host:port` of the service (port defaults to 6379)
    /// * `password` - optional AUTH credential
    /// * `db` - database index to select
    pub async fn connect(addr: &str, password: Option<&str>, db: i64) -> Result<Self> {
        let (host, port) = match addr.rsplit_once(':') {
            Some((host, port)) => {
                let port = port.parse().map_err(|_| {
                    StorageError::Unavailable(format!("invalid redis address: {addr}"))
                })?;
                (host.to_string(), port)
            }
            None => (addr.to_string(), 6379),
        };

        let info = redis::ConnectionInfo {
            addr: redis::ConnectionAddr::Tcp(host, port),
            redis: redis::RedisConnectionInfo {
                db,
                password: password.map(str::to_string),
                ..Default::default()
            },
        };

        let client = redis::Client::open(info)
            .map_err(|err| StorageError::Unavailable(err.to_string()))?;
        let manager = client
            .get_connection_manager()
            .await
            .map_err(|err| StorageError::Unavailable(err.to_string()))?;

        Ok(Self { manager })
    }
}

#[async_trait]
impl RemoteKv for RedisRemote {
    async fn set(&self, key: &str, payload: String, ttl: Duration) -> Result<()> {
        let mut con = self.manager.clone();
        // PSETEX rejects a zero expiry; clamp to the shortest it accepts
        let millis = (ttl.as_millis() as u64).max(1);
        con.pset_ex::<_, _, ()>(key, payload, millis)
            .await
            .map_err(|err| StorageError::Unavailable(err.to_string()))
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut con = self.manager.clone();
        con.get(key)
            .await
            .map_err(|err| StorageError::Unavailable(err.to_string()))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut con = self.manager.clone();
        con.del::<_, ()>(key)
            .await
            .map_err(|err| StorageError::Unavailable(err.to_string()))
    }

    /// The connection manager has no explicit close; connections are
    /// dropped with the last clone of the client.
    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

// == Redis Storage ==
/// Cache backend delegating to a remote key-value service.
///
/// Not generic over the value type itself: one instance can serve any
/// serializable payload, since entries only exist remotely.
pub struct RedisStorage {
    remote: Box<dyn RemoteKv>,
}

impl RedisStorage {
    // == Constructor ==
    /// Creates a backend over any remote key-value collaborator.
    pub fn new(remote: Box<dyn RemoteKv>) -> Self {
        Self { remote }
    }

    /// Connects to a Redis service and wraps it.
    ///
    /// # Arguments
    /// * `addr` - `host:port` of the service
    /// * `password` - optional AUTH credential
    /// * `db` - database index to select
    pub async fn connect(addr: &str, password: Option<&str>, db: i64) -> Result<Self> {
        let remote = RedisRemote::connect(addr, password, db).await?;

        Ok(Self::new(Box::new(remote)))
    }
}

#[async_trait]
impl<V> CacheStorage<V> for RedisStorage
where
    V: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    async fn get(&self, key: &str) -> Result<V> {
        let payload = match self.remote.get(key).await? {
            Some(payload) => payload,
            None => return Err(StorageError::NotFoundOrExpired(key.to_string())),
        };

        // The service TTL and the stored expiry are independent; the
        // stored expiry wins. An undecodable payload counts as dead.
        match serde_json::from_str::<CacheEntry<V>>(&payload) {
            Ok(entry) if entry.is_live() => Ok(entry.value),
            _ => {
                self.remote.delete(key).await?;
                Err(StorageError::NotFoundOrExpired(key.to_string()))
            }
        }
    }

    async fn put(&self, key: &str, value: V, ttl: Duration) -> Result<()> {
        let entry = CacheEntry::new(value, ttl);
        let payload = serde_json::to_string(&entry)
            .map_err(|err| StorageError::Unavailable(err.to_string()))?;

        self.remote.set(key, payload, ttl).await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.remote.delete(key).await
    }

    /// Closes the remote client connection.
    async fn stop(&self) -> Result<()> {
        self.remote.close().await
    }
}
