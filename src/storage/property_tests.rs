//! Property-Based Tests for the Storage Contract
//!
//! Uses proptest to verify contract properties against the memory
//! backend, which is the semantics reference for the other backends.

use proptest::prelude::*;
use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use crate::storage::{CacheStorage, MemoryStorage};

// == Test Configuration ==
/// Long enough that nothing expires mid-property
const TEST_TTL: Duration = Duration::from_secs(300);

/// Drives an async test body on a fresh single-threaded runtime.
fn block_on<F: Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to build test runtime")
        .block_on(future)
}

// == Strategies ==
/// Generates valid cache keys (non-empty, bounded length)
fn valid_key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_]{1,64}"
}

/// Generates valid cache values (bounded length)
fn valid_value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{1,256}"
}

/// A single operation against the contract
#[derive(Debug, Clone)]
enum CacheOp {
    Put { key: String, value: String },
    Get { key: String },
    Delete { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (valid_key_strategy(), valid_value_strategy())
            .prop_map(|(key, value)| CacheOp::Put { key, value }),
        valid_key_strategy().prop_map(|key| CacheOp::Get { key }),
        valid_key_strategy().prop_map(|key| CacheOp::Delete { key }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // For any valid key-value pair, a put followed by a get before the
    // TTL elapses returns the exact value that was stored.
    #[test]
    fn prop_roundtrip_storage(key in valid_key_strategy(), value in valid_value_strategy()) {
        block_on(async {
            let storage = MemoryStorage::new();

            storage.put(&key, value.clone(), TEST_TTL).await.unwrap();

            assert_eq!(storage.get(&key).await.unwrap(), value);
        });
    }

    // For any key, a delete followed by a get reports a miss,
    // regardless of prior state.
    #[test]
    fn prop_delete_removes_entry(key in valid_key_strategy(), value in valid_value_strategy()) {
        block_on(async {
            let storage = MemoryStorage::new();

            storage.put(&key, value, TEST_TTL).await.unwrap();
            assert!(storage.get(&key).await.is_ok());

            storage.delete(&key).await.unwrap();
            assert!(storage.get(&key).await.is_err());
        });
    }

    // For any key, putting v1 then v2 makes get return v2 only.
    #[test]
    fn prop_overwrite_semantics(
        key in valid_key_strategy(),
        v1 in valid_value_strategy(),
        v2 in valid_value_strategy(),
    ) {
        block_on(async {
            let storage = MemoryStorage::new();

            storage.put(&key, v1, TEST_TTL).await.unwrap();
            storage.put(&key, v2.clone(), TEST_TTL).await.unwrap();

            assert_eq!(storage.get(&key).await.unwrap(), v2);
        });
    }

    // For any sequence of operations, the backend agrees with a plain
    // map model (expiry never fires at this TTL).
    #[test]
    fn prop_matches_model(ops in prop::collection::vec(cache_op_strategy(), 1..50)) {
        block_on(async {
            let storage = MemoryStorage::new();
            let mut model: HashMap<String, String> = HashMap::new();

            for op in ops {
                match op {
                    CacheOp::Put { key, value } => {
                        storage.put(&key, value.clone(), TEST_TTL).await.unwrap();
                        model.insert(key, value);
                    }
                    CacheOp::Get { key } => {
                        match storage.get(&key).await {
                            Ok(value) => assert_eq!(Some(&value), model.get(&key)),
                            Err(_) => assert!(!model.contains_key(&key)),
                        }
                    }
                    CacheOp::Delete { key } => {
                        storage.delete(&key).await.unwrap();
                        model.remove(&key);
                    }
                }
            }
        });
    }
}
