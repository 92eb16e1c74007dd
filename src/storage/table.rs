//! Keyed Table Module
//!
//! The per-backend key-to-entry mapping, plus the shared lookup routine
//! that applies eager expiry so every backend removes dead entries the
//! same way.

use std::collections::HashMap;

use crate::storage::CacheEntry;

/// Mapping from string key to cache entry.
///
/// Each backend instance exclusively owns one of these; the file and S3
/// backends additionally mirror it to their backing medium.
pub type KeyedTable<V> = HashMap<String, CacheEntry<V>>;

// == Lookup Outcome ==
/// Result of a table lookup with eager expiry applied.
#[derive(Debug)]
pub enum Lookup<V> {
    /// A live entry was found; the value is cloned out.
    Live(V),
    /// An entry was found but its TTL had elapsed. The entry has been
    /// removed from the table, so durable backends must re-persist.
    Expired,
    /// No entry for the key; the table is untouched.
    Missing,
}

// == Lookup With Eager Expiry ==
/// Looks up `key`, removing the entry as a side effect if it is dead.
///
/// The memory, file, and S3 backends all funnel `get` through this
/// routine; the Redis backend holds no table but applies the same
/// [`CacheEntry::is_live`] predicate to the entry it fetches.
pub fn lookup<V: Clone>(table: &mut KeyedTable<V>, key: &str) -> Lookup<V> {
    match table.get(key) {
        Some(entry) if entry.is_live() => Lookup::Live(entry.value.clone()),
        Some(_) => {
            table.remove(key);
            Lookup::Expired
        }
        None => Lookup::Missing,
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn test_lookup_live_entry() {
        let mut table = KeyedTable::new();
        table.insert(
            "key1".to_string(),
            CacheEntry::new("value1".to_string(), Duration::from_secs(60)),
        );

        assert!(matches!(
            lookup(&mut table, "key1"),
            Lookup::Live(value) if value == "value1"
        ));
        assert_eq!(table.len(), 1, "live lookup must not remove the entry");
    }

    #[test]
    fn test_lookup_expired_entry_removed() {
        let mut table = KeyedTable::new();
        table.insert(
            "key1".to_string(),
            CacheEntry::new("value1".to_string(), Duration::from_millis(20)),
        );

        sleep(Duration::from_millis(50));

        assert!(matches!(lookup(&mut table, "key1"), Lookup::Expired));
        assert!(
            !table.contains_key("key1"),
            "expired entry must be eagerly removed"
        );
    }

    #[test]
    fn test_lookup_missing_key() {
        let mut table: KeyedTable<String> = KeyedTable::new();

        assert!(matches!(lookup(&mut table, "nonexistent"), Lookup::Missing));
        assert!(table.is_empty());
    }
}
