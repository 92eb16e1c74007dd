//! Memory Backend Module
//!
//! Entries held in a process-local table guarded by a mutex. No
//! durability: the table dies with the instance. This backend is the
//! semantics reference for the other three, which must behave
//! identically with respect to expiry and return values.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::{Result, StorageError};
use crate::storage::table::{self, KeyedTable, Lookup};
use crate::storage::{CacheEntry, CacheStorage};

// == Memory Storage ==
/// In-process cache backend with no backing medium.
#[derive(Debug)]
pub struct MemoryStorage<V> {
    /// Key-to-entry table; the mutex serializes all access
    table: Mutex<KeyedTable<V>>,
}

impl<V> MemoryStorage<V> {
    // == Constructor ==
    /// Creates an empty memory backend.
    pub fn new() -> Self {
        Self {
            table: Mutex::new(KeyedTable::new()),
        }
    }
}

impl<V> Default for MemoryStorage<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<V> CacheStorage<V> for MemoryStorage<V>
where
    V: Clone + Send + Sync + 'static,
{
    async fn get(&self, key: &str) -> Result<V> {
        let mut table = self.table.lock().await;

        match table::lookup(&mut table, key) {
            Lookup::Live(value) => Ok(value),
            Lookup::Expired | Lookup::Missing => {
                Err(StorageError::NotFoundOrExpired(key.to_string()))
            }
        }
    }

    async fn put(&self, key: &str, value: V, ttl: Duration) -> Result<()> {
        let mut table = self.table.lock().await;
        table.insert(key.to_string(), CacheEntry::new(value, ttl));

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut table = self.table.lock().await;
        table.remove(key);

        Ok(())
    }

    /// No external resource to release.
    async fn stop(&self) -> Result<()> {
        Ok(())
    }
}
