//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

// == Cache Entry ==
/// A stored value together with its absolute expiry timestamp.
///
/// The payload is opaque to the cache; it only needs to round-trip
/// through serde for the backends that persist their table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Absolute timestamp after which the entry is no longer valid
    pub expiry: DateTime<Utc>,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry expiring `ttl` from now.
    ///
    /// The expiry saturates at the maximum representable timestamp, so
    /// an absurdly large TTL behaves like "never expires in practice".
    pub fn new(value: V, ttl: Duration) -> Self {
        let delta = TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX);
        let expiry = Utc::now()
            .checked_add_signed(delta)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        Self { value, expiry }
    }

    // == Is Live ==
    /// Checks whether the entry is still valid.
    ///
    /// Boundary condition: an entry is live strictly before its expiry.
    /// At the expiry instant and after it the entry is dead, which means
    /// a zero TTL produces an entry that is never readable.
    ///
    /// Every backend decides expiry through this single predicate.
    pub fn is_live(&self) -> bool {
        Utc::now() < self.expiry
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_entry_live_within_ttl() {
        let entry = CacheEntry::new("test_value".to_string(), Duration::from_secs(60));

        assert_eq!(entry.value, "test_value");
        assert!(entry.is_live());
    }

    #[test]
    fn test_entry_dead_after_ttl() {
        let entry = CacheEntry::new("test_value".to_string(), Duration::from_millis(50));

        assert!(entry.is_live());
        sleep(Duration::from_millis(80));
        assert!(!entry.is_live());
    }

    #[test]
    fn test_entry_zero_ttl_never_live() {
        let entry = CacheEntry::new("test_value".to_string(), Duration::ZERO);

        assert!(!entry.is_live());
    }

    #[test]
    fn test_entry_huge_ttl_saturates() {
        let entry = CacheEntry::new("test_value".to_string(), Duration::MAX);

        assert!(entry.is_live());
        assert_eq!(entry.expiry, DateTime::<Utc>::MAX_UTC);
    }

    #[test]
    fn test_expiry_boundary_condition() {
        // An entry expiring exactly now must already be dead
        let entry = CacheEntry {
            value: "test".to_string(),
            expiry: Utc::now(),
        };

        assert!(!entry.is_live(), "entry should be dead at the boundary");
    }

    #[test]
    fn test_entry_serde_round_trip() {
        let entry = CacheEntry::new(42u32, Duration::from_secs(10));

        let json = serde_json::to_string(&entry).unwrap();
        let back: CacheEntry<u32> = serde_json::from_str(&json).unwrap();

        assert_eq!(back.value, 42);
        assert_eq!(back.expiry, entry.expiry);
    }
}
