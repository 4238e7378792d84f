//! # Least Frequently Used (LFU) Cache
//!
//! Byte-budgeted cache that evicts the entry with the lowest access weight.
//! Entries sit in an [`IndexedHeap`] so that both eviction and reweighting of
//! an arbitrary entry are O(log n), with no stale heap entries to skip.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │                          LfuCache<K, V>                              │
//!   │                                                                      │
//!   │   ┌───────────────────────────┐                                      │
//!   │   │  FxHashMap<K, SlotId>     │                                      │
//!   │   │   "a" → id_0              │                                      │
//!   │   │   "b" → id_1              │                                      │
//!   │   │   "c" → id_2              │                                      │
//!   │   └─────────────┬─────────────┘                                      │
//!   │                 ▼                                                    │
//!   │   ┌──────────────────────────────────────────────────────────────┐   │
//!   │   │  IndexedHeap<Entry<K, V>>                                    │   │
//!   │   │                                                              │   │
//!   │   │  id_0: { key: "a", value, size, weight: 4, pos: 2 }          │   │
//!   │   │  id_1: { key: "b", value, size, weight: 0, pos: 0 } ← min    │   │
//!   │   │  id_2: { key: "c", value, size, weight: 1, pos: 1 }          │   │
//!   │   └──────────────────────────────────────────────────────────────┘   │
//!   │                                                                      │
//!   │   used_bytes / capacity_bytes (0 = unbounded)                        │
//!   └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Weight
//!
//! - A new entry starts at weight 0: storing a value is not an access.
//! - `get` on a hit and `insert` over an existing key each add 1.
//! - The entry with the smallest weight is evicted first.
//!
//! Among equal weights the victim is whichever element the heap array holds
//! at the root. That depends on the history of pushes, pops and removals and
//! is **not** insertion order; treat it as unspecified.
//!
//! ## Methods
//!
//! | Method              | Complexity | Description                            |
//! |---------------------|------------|----------------------------------------|
//! | `get(&k)`           | O(log n)   | Get value, weight + 1                  |
//! | `peek(&k)`          | O(1)       | Get value, weight unchanged            |
//! | `insert(k, v)`      | O(log n)   | Insert (weight 0) or update (+1)       |
//! | `remove(&k)`        | O(log n)   | Remove at stored heap index            |
//! | `remove_oldest()`   | O(log n)   | Pop the minimum-weight entry           |
//! | `weight(&k)`        | O(1)       | Current access weight                  |
//!
//! ## Thread Safety
//!
//! `LfuCache` is **not** thread-safe; share it through
//! `ConcurrentCache` (feature `concurrency`).

use std::fmt;
use std::hash::Hash;

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::ds::{IndexedHeap, SlotId};
use crate::error::InvariantError;
#[cfg(feature = "metrics")]
use crate::metrics::{
    CacheMetrics, CacheMetricsSnapshot, CoreMetricsRecorder, MetricsSnapshotProvider,
};
use crate::traits::{ByteCache, EvictionListener};
use crate::weigh::{ByteSize, Weigher, byte_size_weigher};

/// Weight assigned to a freshly inserted entry.
pub const INITIAL_WEIGHT: u64 = 0;

#[derive(Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
    size: usize,
}

/// Byte-budgeted LFU cache.
///
/// # Example
///
/// ```
/// use bytecache::policy::lfu::LfuCache;
/// use bytecache::traits::ByteCache;
///
/// let mut cache: LfuCache<&str, String> = LfuCache::new(10, None);
/// cache.insert("hot", "hhhh".to_string());
/// cache.insert("cold", "cccc".to_string());
/// cache.get(&"hot");
/// cache.get(&"hot");
///
/// cache.insert("new", "nnnn".to_string());
/// assert!(cache.contains(&"hot"));
/// assert_eq!(cache.weight(&"hot"), Some(2));
/// assert_eq!(cache.len(), 2);
/// ```
pub struct LfuCache<K, V> {
    map: FxHashMap<K, SlotId>,
    queue: IndexedHeap<Entry<K, V>>,
    capacity_bytes: usize,
    used_bytes: usize,
    weigher: Weigher<V>,
    on_evicted: Option<EvictionListener<K, V>>,
    #[cfg(feature = "metrics")]
    metrics: CacheMetrics,
}

impl<K, V> LfuCache<K, V>
where
    K: Eq + Hash + Clone,
    V: ByteSize + 'static,
{
    /// Creates a cache measuring values with [`ByteSize`].
    ///
    /// `capacity_bytes == 0` disables the budget entirely.
    pub fn new(capacity_bytes: usize, on_evicted: Option<EvictionListener<K, V>>) -> Self {
        Self::with_weigher(capacity_bytes, byte_size_weigher(), on_evicted)
    }
}

impl<K, V> LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a cache measuring values with `weigher`.
    pub fn with_weigher(
        capacity_bytes: usize,
        weigher: Weigher<V>,
        on_evicted: Option<EvictionListener<K, V>>,
    ) -> Self {
        Self {
            map: FxHashMap::default(),
            queue: IndexedHeap::new(),
            capacity_bytes,
            used_bytes: 0,
            weigher,
            on_evicted,
            #[cfg(feature = "metrics")]
            metrics: CacheMetrics::default(),
        }
    }

    /// Current access weight of `key`.
    pub fn weight(&self, key: &K) -> Option<u64> {
        let id = *self.map.get(key)?;
        self.queue.weight(id)
    }

    /// Borrows the entry that would be evicted next.
    pub fn peek_oldest(&self) -> Option<(&K, &V)> {
        self.queue
            .peek_min()
            .map(|(entry, _)| (&entry.key, &entry.value))
    }

    /// Checks heap order, stored heap indices, map/heap agreement and the
    /// byte total.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.queue.validate()?;

        if self.map.len() != self.queue.len() {
            return Err(InvariantError::new(format!(
                "map holds {} entries but heap holds {}",
                self.map.len(),
                self.queue.len()
            )));
        }

        let mut total = 0usize;
        for (id, entry, _) in self.queue.iter() {
            match self.map.get(&entry.key) {
                Some(&mapped) if mapped == id => {},
                Some(&mapped) => {
                    return Err(InvariantError::new(format!(
                        "map points at {:?} but heap element lives in {:?}",
                        mapped, id
                    )));
                },
                None => {
                    return Err(InvariantError::new(format!(
                        "heap element {:?} is unreachable from the map",
                        id
                    )));
                },
            }
            total += entry.size;
        }

        if total != self.used_bytes {
            return Err(InvariantError::new(format!(
                "used_bytes {} != sum of entry sizes {}",
                self.used_bytes, total
            )));
        }
        Ok(())
    }

    fn pop_min(&mut self) -> Option<(K, V)> {
        let (entry, _) = self.queue.pop_min()?;
        self.map.remove(&entry.key);
        self.used_bytes -= entry.size;
        Some((entry.key, entry.value))
    }

    fn notify(&mut self, key: K, value: V) {
        if let Some(listener) = self.on_evicted.as_mut() {
            listener(key, value);
        }
    }

    /// Evicts at most one entry if the byte total is over budget.
    fn enforce_budget(&mut self) {
        if self.capacity_bytes == 0 || self.used_bytes <= self.capacity_bytes {
            return;
        }

        #[cfg(feature = "metrics")]
        self.metrics.record_evict_call();

        if self.map.len() <= 1 {
            #[cfg(feature = "metrics")]
            self.metrics.record_over_budget_kept();
            debug!(
                used_bytes = self.used_bytes,
                capacity_bytes = self.capacity_bytes,
                "lfu entry exceeds byte budget on its own; keeping it"
            );
            return;
        }

        if let Some((key, value)) = self.pop_min() {
            #[cfg(feature = "metrics")]
            self.metrics.record_evicted_entry();
            trace!(
                used_bytes = self.used_bytes,
                capacity_bytes = self.capacity_bytes,
                "lfu evicted least frequently used entry"
            );
            self.notify(key, value);
        }
    }
}

impl<K, V> ByteCache<K, V> for LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn get(&mut self, key: &K) -> Option<&V> {
        let Some(&id) = self.map.get(key) else {
            #[cfg(feature = "metrics")]
            self.metrics.record_get_miss();
            return None;
        };

        #[cfg(feature = "metrics")]
        self.metrics.record_get_hit();

        self.queue.increment(id);
        self.queue.get(id).map(|entry| &entry.value)
    }

    fn peek(&self, key: &K) -> Option<&V> {
        let id = *self.map.get(key)?;
        self.queue.get(id).map(|entry| &entry.value)
    }

    fn insert(&mut self, key: K, value: V) -> Option<V> {
        #[cfg(feature = "metrics")]
        self.metrics.record_insert_call();

        let size = (self.weigher)(&value);

        // Update in place and return: an existing key never gets a second
        // heap element.
        if let Some(&id) = self.map.get(&key) {
            #[cfg(feature = "metrics")]
            self.metrics.record_insert_update();

            let entry = self.queue.get_mut(id)?;
            self.used_bytes = self.used_bytes - entry.size + size;
            entry.size = size;
            let previous = std::mem::replace(&mut entry.value, value);
            self.queue.increment(id);
            self.enforce_budget();
            return Some(previous);
        }

        #[cfg(feature = "metrics")]
        self.metrics.record_insert_new();

        let id = self.queue.push(
            Entry {
                key: key.clone(),
                value,
                size,
            },
            INITIAL_WEIGHT,
        );
        self.map.insert(key, id);
        self.used_bytes += size;
        self.enforce_budget();
        None
    }

    fn remove(&mut self, key: &K) -> bool {
        #[cfg(feature = "metrics")]
        self.metrics.record_remove_call();

        let Some(id) = self.map.remove(key) else {
            return false;
        };
        if let Some(entry) = self.queue.remove(id) {
            self.used_bytes -= entry.size;
            #[cfg(feature = "metrics")]
            self.metrics.record_remove_found();
            self.notify(entry.key, entry.value);
        }
        true
    }

    fn remove_oldest(&mut self) -> bool {
        #[cfg(feature = "metrics")]
        self.metrics.record_remove_oldest_call();

        match self.pop_min() {
            Some((key, value)) => {
                #[cfg(feature = "metrics")]
                self.metrics.record_remove_oldest_found();
                self.notify(key, value);
                true
            },
            None => false,
        }
    }

    fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    fn len(&self) -> usize {
        self.map.len()
    }

    fn used_bytes(&self) -> usize {
        self.used_bytes
    }

    fn capacity_bytes(&self) -> usize {
        self.capacity_bytes
    }

    fn clear(&mut self) {
        #[cfg(feature = "metrics")]
        self.metrics.record_clear();

        self.map.clear();
        self.queue.clear();
        self.used_bytes = 0;
    }
}

#[cfg(feature = "metrics")]
impl<K, V> MetricsSnapshotProvider<CacheMetricsSnapshot> for LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn snapshot(&self) -> CacheMetricsSnapshot {
        CacheMetricsSnapshot::capture(
            &self.metrics,
            self.map.len(),
            self.used_bytes,
            self.capacity_bytes,
        )
    }
}

impl<K, V> fmt::Debug for LfuCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LfuCache")
            .field("len", &self.map.len())
            .field("used_bytes", &self.used_bytes)
            .field("capacity_bytes", &self.capacity_bytes)
            .finish_non_exhaustive()
    }
}

impl<K, V> Extend<(K, V)> for LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weigh::unit_weigher;
    use std::sync::{Arc, Mutex};

    type Log<K, V> = Arc<Mutex<Vec<(K, V)>>>;

    fn unit_cache(capacity: usize) -> (Log<&'static str, i32>, LfuCache<&'static str, i32>) {
        let log: Log<&'static str, i32> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        let listener: EvictionListener<&'static str, i32> =
            Box::new(move |k, v| sink.lock().unwrap().push((k, v)));
        (log, LfuCache::with_weigher(capacity, unit_weigher(), Some(listener)))
    }

    mod basic_behavior {
        use super::*;

        #[test]
        fn insert_then_get_round_trips() {
            let mut cache: LfuCache<String, Vec<u8>> = LfuCache::new(0, None);
            cache.insert("k".to_string(), vec![1, 2, 3]);
            assert_eq!(cache.get(&"k".to_string()), Some(&vec![1, 2, 3]));
            assert_eq!(cache.used_bytes(), 3);
            cache.check_invariants().unwrap();
        }

        #[test]
        fn new_entries_start_at_initial_weight() {
            let (_, mut cache) = unit_cache(0);
            cache.insert("a", 1);
            assert_eq!(cache.weight(&"a"), Some(INITIAL_WEIGHT));
            assert_eq!(cache.weight(&"b"), None);
        }

        #[test]
        fn get_increments_weight_peek_does_not() {
            let (_, mut cache) = unit_cache(0);
            cache.insert("a", 1);
            cache.get(&"a");
            cache.get(&"a");
            assert_eq!(cache.weight(&"a"), Some(2));

            assert_eq!(cache.peek(&"a"), Some(&1));
            assert_eq!(cache.weight(&"a"), Some(2));
            assert_eq!(cache.get(&"missing"), None);
        }

        #[test]
        fn update_is_single_in_place_change() {
            let (_, mut cache) = unit_cache(0);
            cache.insert("a", 1);
            cache.insert("b", 2);

            let mut previous = 1;
            for round in 0..50 {
                assert_eq!(cache.insert("a", round + 10), Some(previous));
                previous = round + 10;
                assert_eq!(cache.len(), 2);
                cache.check_invariants().unwrap();
            }
            assert_eq!(cache.weight(&"a"), Some(50));
            assert_eq!(cache.peek(&"a"), Some(&59));
        }

        #[test]
        fn update_adjusts_bytes() {
            let mut cache: LfuCache<&str, String> = LfuCache::new(0, None);
            cache.insert("a", "1234".to_string());
            cache.insert("b", "12".to_string());
            cache.insert("a", "1".to_string());
            assert_eq!(cache.used_bytes(), 3);
            cache.insert("b", "123456789".to_string());
            assert_eq!(cache.used_bytes(), 10);
            cache.check_invariants().unwrap();
        }
    }

    mod eviction {
        use super::*;

        #[test]
        fn frequency_scenario() {
            let (log, mut cache) = unit_cache(2);
            cache.insert("x", 1);
            cache.insert("y", 2);
            cache.insert("z", 3);

            // One eviction among the three weight-0 entries. With this heap the
            // root is still "x"; the tie order is not part of the contract.
            assert_eq!(cache.len(), 2);
            assert_eq!(log.lock().unwrap().len(), 1);
            assert_eq!(log.lock().unwrap()[0].0, "x");
            assert!(cache.contains(&"y"));
            cache.check_invariants().unwrap();

            for _ in 0..5 {
                cache.get(&"y");
            }
            cache.insert("w", 4);
            cache.insert("v", 5);
            assert!(cache.contains(&"y"));
            assert_eq!(log.lock().unwrap().len(), 3);
            assert!(log.lock().unwrap().iter().all(|(k, _)| *k != "y"));
            cache.check_invariants().unwrap();
        }

        #[test]
        fn lowest_weight_goes_first() {
            let (log, mut cache) = unit_cache(3);
            cache.insert("a", 1);
            cache.insert("b", 2);
            cache.insert("c", 3);
            cache.get(&"a");
            cache.get(&"a");
            cache.get(&"c");

            assert_eq!(cache.peek_oldest(), Some((&"b", &2)));
            cache.get(&"b");
            cache.get(&"b");
            cache.get(&"b");

            // New entry has weight 0 and is the lightest: it evicts itself.
            cache.insert("d", 4);
            assert_eq!(*log.lock().unwrap(), vec![("d", 4)]);
            assert_eq!(cache.len(), 3);
        }

        #[test]
        fn single_oversized_entry_is_kept() {
            let mut cache: LfuCache<&str, Vec<u8>> = LfuCache::new(10, None);
            cache.insert("k", vec![0u8; 20]);
            assert!(cache.contains(&"k"));
            assert_eq!(cache.used_bytes(), 20);
            assert_eq!(cache.len(), 1);
            cache.check_invariants().unwrap();
        }

        #[test]
        fn growing_update_evicts_lightest_other_entry() {
            let evicted = Arc::new(Mutex::new(Vec::new()));
            let sink = Arc::clone(&evicted);
            let listener: EvictionListener<&str, String> =
                Box::new(move |k, _| sink.lock().unwrap().push(k));
            let mut cache = LfuCache::new(6, Some(listener));
            cache.insert("a", "aa".to_string());
            cache.insert("b", "bb".to_string());
            cache.insert("b", "bbbbb".to_string());

            assert_eq!(*evicted.lock().unwrap(), vec!["a"]);
            assert_eq!(cache.used_bytes(), 5);
            assert_eq!(cache.weight(&"b"), Some(1));
        }
    }

    mod removal {
        use super::*;

        #[test]
        fn remove_from_middle_of_heap() {
            let (log, mut cache) = unit_cache(0);
            for (i, key) in ["a", "b", "c", "d", "e", "f"].into_iter().enumerate() {
                cache.insert(key, i as i32);
                for _ in 0..i {
                    cache.get(&key);
                }
            }

            assert!(cache.remove(&"c"));
            assert!(cache.remove(&"a"));
            assert_eq!(*log.lock().unwrap(), vec![("c", 2), ("a", 0)]);
            assert_eq!(cache.len(), 4);
            assert_eq!(cache.used_bytes(), 4);
            cache.check_invariants().unwrap();

            assert!(cache.remove_oldest());
            assert_eq!(log.lock().unwrap().last(), Some(&("b", 1)));
        }

        #[test]
        fn remove_absent_and_empty_pop_are_noops() {
            let (log, mut cache) = unit_cache(0);
            assert!(!cache.remove_oldest());
            cache.insert("a", 1);
            assert!(!cache.remove(&"zz"));
            assert_eq!(cache.len(), 1);
            assert_eq!(cache.used_bytes(), 1);
            assert_eq!(cache.weight(&"a"), Some(0));
            assert!(log.lock().unwrap().is_empty());
        }

        #[test]
        fn clear_resets_everything() {
            let (log, mut cache) = unit_cache(0);
            cache.extend([("a", 1), ("b", 2)]);
            cache.clear();
            assert!(cache.is_empty());
            assert_eq!(cache.used_bytes(), 0);
            assert_eq!(cache.peek_oldest(), None);
            assert!(log.lock().unwrap().is_empty());
            cache.check_invariants().unwrap();
        }
    }

    #[cfg(feature = "metrics")]
    mod metrics {
        use super::*;

        #[test]
        fn oversized_entry_is_counted_as_kept() {
            let mut cache: LfuCache<&str, Vec<u8>> = LfuCache::new(4, None);
            cache.insert("big", vec![0; 8]);
            let snap = cache.snapshot();
            assert_eq!(snap.evict_calls, 1);
            assert_eq!(snap.over_budget_kept, 1);
            assert_eq!(snap.evicted_entries, 0);
            assert_eq!(snap.used_bytes, 8);
        }
    }
}
