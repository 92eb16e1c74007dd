//! File Backend Module
//!
//! The same table as the memory backend, additionally mirrored to a
//! local JSON file. The entire table is re-serialized on every mutation
//! while the lock is held, which trades write amplification for
//! simplicity; acceptable for low-throughput use, a documented
//! limitation otherwise.
//!
//! Persistence is best-effort: load and save failures are absorbed (with
//! a warning) and the instance degrades to memory-only behavior instead
//! of failing its callers. The mirror is written by direct overwrite,
//! not temp-file-and-rename, so a crash mid-write can corrupt it; a
//! corrupt or missing mirror is tolerated at construction and the table
//! starts empty.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::{Result, StorageError};
use crate::storage::table::{self, KeyedTable, Lookup};
use crate::storage::{CacheEntry, CacheStorage};

// == File Storage ==
/// Cache backend durably mirrored to a single local file.
#[derive(Debug)]
pub struct FileStorage<V> {
    /// Path of the JSON mirror
    path: PathBuf,
    /// Key-to-entry table; the mutex serializes table access and mirror I/O
    table: Mutex<KeyedTable<V>>,
}

impl<V> FileStorage<V>
where
    V: Serialize + DeserializeOwned + Clone + Send + Sync,
{
    // == Constructor ==
    /// Creates a file backend, loading any existing mirror at `path`.
    ///
    /// A missing or malformed mirror is not an error: the table starts
    /// empty and the mirror is rewritten on the next mutation.
    pub async fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let table = match tokio::fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(table) => table,
                Err(err) => {
                    warn!(path = %path.display(), "ignoring malformed cache mirror: {err}");
                    KeyedTable::new()
                }
            },
            Err(err) => {
                debug!(path = %path.display(), "no cache mirror loaded: {err}");
                KeyedTable::new()
            }
        };

        Self {
            path,
            table: Mutex::new(table),
        }
    }

    // == Save ==
    /// Rewrites the whole mirror file from `table`.
    ///
    /// Failures are absorbed: persistence is best-effort and the
    /// in-memory table stays authoritative for this instance.
    async fn save(&self, table: &KeyedTable<V>) {
        let bytes = match serde_json::to_vec(table) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(path = %self.path.display(), "failed to serialize cache mirror: {err}");
                return;
            }
        };

        if let Err(err) = tokio::fs::write(&self.path, bytes).await {
            warn!(path = %self.path.display(), "failed to write cache mirror: {err}");
        }
    }
}

#[async_trait]
impl<V> CacheStorage<V> for FileStorage<V>
where
    V: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    async fn get(&self, key: &str) -> Result<V> {
        let mut table = self.table.lock().await;

        match table::lookup(&mut table, key) {
            Lookup::Live(value) => Ok(value),
            Lookup::Expired => {
                // The eager removal mutated the table, so the mirror is
                // rewritten before the lock is released.
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

    /// Performs one final mirror rewrite.
    async fn stop(&self) -> Result<()> {
        let table = self.table.lock().await;
        self.save(&table).await;

        Ok(())
    }
}
