//! S3 Backend Module
//!
//! Keeps the full table in process memory as a cache-of-the-cache,
//! backed by a single JSON blob in a remote object store. The blob is
//! fetched once at construction and the whole table is re-uploaded on
//! every mutation while the lock is held (read-modify-write of the
//! entire object, never per-key). This mirrors the file backend's
//! whole-table-rewrite strategy over an object-store API, with the added
//! latency and availability exposure of the remote medium.
//!
//! The same best-effort persistence policy applies: load and upload
//! failures are absorbed (with a warning) and the instance keeps serving
//! from memory.

use std::time::Duration;

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::{Result, StorageError};
use crate::storage::remote::ObjectClient;
use crate::storage::table::{self, KeyedTable, Lookup};
use crate::storage::{CacheEntry, CacheStorage};

// == S3 Client ==
/// [`ObjectClient`] implementation over the AWS S3 API.
pub struct S3ObjectClient {
    client: Client,
}

impl S3ObjectClient {
    // == Constructor ==
    /// Builds a client for `region` using the ambient AWS credential
    /// chain (environment, profile, instance role).
    pub async fn new(region: &str) -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .load()
            .await;

        Self {
            client: Client::new(&config),
        }
    }
}

#[async_trait]
impl ObjectClient for S3ObjectClient {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Option<Vec<u8>>> {
        let response = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await;

        match response {
            Ok(output) => {
                let bytes = output
                    .body
                    .collect()
                    .await
                    .map_err(|err| StorageError::Unavailable(err.to_string()))?;
                Ok(Some(bytes.into_bytes().to_vec()))
            }
            Err(err) if err.as_service_error().is_some_and(|e| e.is_no_such_key()) => Ok(None),
            Err(err) => Err(StorageError::Unavailable(err.to_string())),
        }
    }

    async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<()> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body.into())
            .send()
            .await
            .map_err(|err| StorageError::Unavailable(err.to_string()))?;

        Ok(())
    }
}

// == S3 Storage ==
/// Cache backend mirrored to a single remote object.
pub struct S3Storage<V> {
    /// Object-store collaborator
    client: Box<dyn ObjectClient>,
    /// Bucket holding the mirror object
    bucket: String,
    /// Key of the mirror object within the bucket
    object_key: String,
    /// Key-to-entry table; the mutex serializes table access and uploads
    table: Mutex<KeyedTable<V>>,
}

impl<V> S3Storage<V>
where
    V: Serialize + DeserializeOwned + Clone + Send + Sync,
{
    // == Constructor ==
    /// Creates a backend over any object-store collaborator, loading the
    /// existing mirror object if one is present.
    ///
    /// A missing, malformed, or unreachable object is not an error: the
    /// table starts empty and the object is rewritten on the next
    /// mutation.
    pub async fn new(client: Box<dyn ObjectClient>, bucket: &str, object_key: &str) -> Self {
        let table = match client.get_object(bucket, object_key).await {
            Ok(Some(bytes)) => match serde_json::from_slice(&bytes) {
                Ok(table) => table,
                Err(err) => {
                    warn!(bucket, object_key, "ignoring malformed cache object: {err}");
                    KeyedTable::new()
                }
            },
            Ok(None) => {
                debug!(bucket, object_key, "no cache object loaded");
                KeyedTable::new()
            }
            Err(err) => {
                warn!(bucket, object_key, "failed to load cache object: {err}");
                KeyedTable::new()
            }
        };

        Self {
            client,
            bucket: bucket.to_string(),
            object_key: object_key.to_string(),
            table: Mutex::new(table),
        }
    }

    /// Connects to S3 in `region` and mirrors to `bucket`/`object_key`.
    pub async fn connect(bucket: &str, object_key: &str, region: &str) -> Self {
        let client = S3ObjectClient::new(region).await;

        Self::new(Box::new(client), bucket, object_key).await
    }

    // == Save ==
    /// Re-uploads the whole mirror object from `table`.
    ///
    /// Failures are absorbed: persistence is best-effort and the
    /// in-memory table stays authoritative for this instance.
    async fn save(&self, table: &KeyedTable<V>) {
        let bytes = match serde_json::to_vec(table) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(
                    bucket = %self.bucket,
                    object_key = %self.object_key,
                    "failed to serialize cache object: {err}"
                );
                return;
            }
        };

        if let Err(err) = self
            .client
            .put_object(&self.bucket, &self.object_key, bytes)
            .await
        {
            warn!(
                bucket = %self.bucket,
                object_key = %self.object_key,
                "failed to upload cache object: {err}"
            );
        }
    }
}

#[async_trait]
impl<V> CacheStorage<V> for S3Storage<V>
where
    V: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    async fn get(&self, key: &str) -> Result<V> {
        let mut table = self.table.lock().await;

        match table::lookup(&mut table, key) {
            Lookup::Live(value) => Ok(value),
            Lookup::Expired => {
                // The eager removal mutated the table, so the object is
                // re-uploaded before the lock is released.
                self.save(&table).await;
                Err(StorageError::NotFoundOrExpired(key.to_string()))
            }
            Lookup::Missing => Err(StorageError::NotFoundOrExpired(key.to_string())),
        }
    }

    async fn put(&self, key: &str, value: V, ttl: Duration) -> Result<()> {
        let mut table = self.table.lock().await;
        table.insert(key.to_string(), CacheEntry::new(value, ttl));
        self.save(&table).await;

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut table = self.table.lock().await;
        table.remove(key);
        self.save(&table).await;

        Ok(())
    }

    /// Performs one final upload of the mirror object.
    async fn stop(&self) -> Result<()> {
        let table = self.table.lock().await;
        self.save(&table).await;

        Ok(())
    }
}
