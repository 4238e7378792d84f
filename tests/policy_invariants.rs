// ==============================================
// CROSS-POLICY INVARIANT TESTS (integration)
// ==============================================
//
// Behavior both eviction backends must share: byte accounting, the
// one-eviction-per-insert rule, listener delivery and the oversized-entry
// boundary. Driven through `Cache` so the same code exercises LRU and LFU.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use bytecache::builder::{Cache, CacheBuilder, CachePolicy};
use bytecache::traits::ByteCache;
use proptest::prelude::*;

const POLICIES: [CachePolicy; 2] = [CachePolicy::Lru, CachePolicy::Lfu];

type Log = Arc<Mutex<Vec<(u8, Vec<u8>)>>>;

fn recorded(policy: CachePolicy, capacity_bytes: usize) -> (Log, Cache<u8, Vec<u8>>) {
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    let cache = CacheBuilder::new(capacity_bytes)
        .on_evicted(move |k, v| sink.lock().unwrap().push((k, v)))
        .build(policy);
    (log, cache)
}

fn drain(log: &Log) -> Vec<(u8, Vec<u8>)> {
    std::mem::take(&mut *log.lock().unwrap())
}

// ==============================================
// Scenarios
// ==============================================

mod scenarios {
    use super::*;

    #[test]
    fn lru_recency_scenario() {
        let (log, mut cache) = recorded(CachePolicy::Lru, 2);
        cache.insert(b'a', vec![1]);
        cache.insert(b'b', vec![2]);
        cache.insert(b'c', vec![3]);
        assert_eq!(drain(&log), vec![(b'a', vec![1])]);

        cache.get(&b'b');
        cache.insert(b'd', vec![4]);
        assert_eq!(drain(&log), vec![(b'c', vec![3])]);

        let mut stored: Vec<u8> = [b'a', b'b', b'c', b'd']
            .into_iter()
            .filter(|k| cache.contains(k))
            .collect();
        stored.sort_unstable();
        assert_eq!(stored, vec![b'b', b'd']);
    }

    #[test]
    fn lfu_frequency_scenario() {
        let (log, mut cache) = recorded(CachePolicy::Lfu, 2);
        cache.insert(b'x', vec![0]);
        cache.insert(b'y', vec![0]);
        cache.insert(b'z', vec![0]);

        let evicted = drain(&log);
        assert_eq!(evicted.len(), 1);
        assert_eq!(evicted[0].0, b'x');
        assert_eq!(cache.len(), 2);

        for _ in 0..10 {
            cache.get(&b'y');
        }
        for key in 0..20u8 {
            cache.insert(key, vec![0]);
            assert!(cache.contains(&b'y'));
        }
        assert!(drain(&log).iter().all(|(k, _)| *k != b'y'));
        cache.check_invariants().unwrap();
    }

    #[test]
    fn oversized_entry_in_empty_cache_is_kept() {
        for policy in POLICIES {
            let (log, mut cache) = recorded(policy, 10);
            cache.insert(1, vec![0; 20]);
            assert!(cache.contains(&1));
            assert_eq!(cache.used_bytes(), 20);
            assert!(drain(&log).is_empty());

            // The next insert has something else to evict.
            cache.insert(2, vec![0; 1]);
            assert_eq!(cache.len(), 1);
            assert_eq!(drain(&log).len(), 1);
            cache.check_invariants().unwrap();
        }
    }

    #[test]
    fn listener_receives_last_set_value() {
        for policy in POLICIES {
            let (log, mut cache) = recorded(policy, 0);
            cache.insert(1, vec![1]);
            cache.insert(1, vec![2, 2]);
            cache.insert(1, vec![3, 3, 3]);
            assert!(cache.remove(&1));
            assert_eq!(drain(&log), vec![(1, vec![3, 3, 3])]);
            assert_eq!(cache.used_bytes(), 0);
        }
    }

    #[test]
    fn noop_operations_leave_state_untouched() {
        for policy in POLICIES {
            let (log, mut cache) = recorded(policy, 8);
            assert!(!cache.remove_oldest());
            assert!(!cache.remove(&9));

            cache.insert(1, vec![0; 3]);
            assert!(!cache.remove(&9));
            assert_eq!(cache.len(), 1);
            assert_eq!(cache.used_bytes(), 3);
            assert!(drain(&log).is_empty());
        }
    }

    #[test]
    fn zero_sized_values_are_accepted() {
        for policy in POLICIES {
            let (log, mut cache) = recorded(policy, 1);
            for key in 0..10 {
                cache.insert(key, Vec::new());
            }
            assert_eq!(cache.len(), 10);
            assert_eq!(cache.used_bytes(), 0);
            assert!(drain(&log).is_empty());
        }
    }
}

// ==============================================
// Model-based property tests
// ==============================================

#[derive(Debug, Clone)]
enum Op {
    Insert(u8, usize),
    Get(u8),
    Peek(u8),
    Remove(u8),
    RemoveOldest,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0u8..12, 0usize..16).prop_map(|(k, s)| Op::Insert(k, s)),
        3 => (0u8..12).prop_map(Op::Get),
        1 => (0u8..12).prop_map(Op::Peek),
        1 => (0u8..12).prop_map(Op::Remove),
        1 => Just(Op::RemoveOldest),
    ]
}

fn policy_strategy() -> impl Strategy<Value = CachePolicy> {
    prop_oneof![Just(CachePolicy::Lru), Just(CachePolicy::Lfu)]
}

proptest! {
    /// Property: byte accounting, key sets and listener delivery match a plain
    /// map model under any operation sequence.
    #[cfg_attr(miri, ignore)]
    #[test]
    fn prop_backends_match_size_model(
        policy in policy_strategy(),
        capacity in 0usize..48,
        ops in prop::collection::vec(op_strategy(), 0..150),
    ) {
        let (log, mut cache) = recorded(policy, capacity);
        let mut model: HashMap<u8, usize> = HashMap::new();

        for (step, op) in ops.into_iter().enumerate() {
            let used_before = cache.used_bytes();
            match op {
                Op::Insert(key, size) => {
                    let previous = model.insert(key, size);
                    let used_after_write: usize = model.values().sum();
                    let expected = usize::from(
                        capacity > 0 && used_after_write > capacity && model.len() > 1,
                    );

                    let returned = cache.insert(key, vec![step as u8; size]);
                    prop_assert_eq!(returned.map(|v| v.len()), previous);

                    let evicted = drain(&log);
                    prop_assert_eq!(evicted.len(), expected);
                    for (k, v) in evicted {
                        prop_assert_eq!(model.remove(&k), Some(v.len()));
                    }
                },
                Op::Get(key) => {
                    let hit = cache.get(&key).map(|v| v.len());
                    prop_assert_eq!(hit, model.get(&key).copied());
                    prop_assert_eq!(cache.used_bytes(), used_before);
                    prop_assert!(drain(&log).is_empty());
                },
                Op::Peek(key) => {
                    prop_assert_eq!(cache.peek(&key).map(|v| v.len()), model.get(&key).copied());
                },
                Op::Remove(key) => {
                    let expected = model.remove(&key);
                    prop_assert_eq!(cache.remove(&key), expected.is_some());
                    let evicted = drain(&log);
                    match expected {
                        Some(size) => {
                            prop_assert_eq!(evicted.len(), 1);
                            prop_assert_eq!(evicted[0].0, key);
                            prop_assert_eq!(evicted[0].1.len(), size);
                        },
                        None => prop_assert!(evicted.is_empty()),
                    }
                },
                Op::RemoveOldest => {
                    let was_empty = model.is_empty();
                    prop_assert_eq!(cache.remove_oldest(), !was_empty);
                    let evicted = drain(&log);
                    prop_assert_eq!(evicted.len(), usize::from(!was_empty));
                    for (k, v) in evicted {
                        prop_assert_eq!(model.remove(&k), Some(v.len()));
                    }
                },
            }

            prop_assert!(cache.check_invariants().is_ok());
            prop_assert_eq!(cache.len(), model.len());
            prop_assert_eq!(cache.used_bytes(), model.values().sum::<usize>());
            for key in model.keys() {
                prop_assert!(cache.contains(key));
            }
        }
    }

    /// Property: every removal path for LRU takes the least recently touched key.
    #[cfg_attr(miri, ignore)]
    #[test]
    fn prop_lru_evicts_least_recent(
        keys in prop::collection::vec(0u8..8, 1..100),
    ) {
        let (log, mut cache) = recorded(CachePolicy::Lru, 4);
        let mut recency: Vec<u8> = Vec::new();

        for key in keys {
            if cache.contains(&key) && key % 2 == 0 {
                cache.get(&key);
            } else {
                cache.insert(key, vec![key]);
            }
            recency.retain(|k| *k != key);
            recency.push(key);

            for (evicted, _) in drain(&log) {
                prop_assert_eq!(recency.first().copied(), Some(evicted));
                recency.remove(0);
            }
            prop_assert_eq!(cache.len(), recency.len());
        }
    }
}
