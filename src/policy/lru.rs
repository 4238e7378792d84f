//! # Least Recently Used (LRU) Cache
//!
//! Byte-budgeted cache that evicts the entry touched longest ago.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │                          LruCache<K, V>                              │
//!   │                                                                      │
//!   │   ┌──────────────────────────────────────────────────────────────┐   │
//!   │   │  FxHashMap<K, Entry<V>>                                      │   │
//!   │   │                                                              │   │
//!   │   │  ┌─────────┬───────────────────────────────────────────┐     │   │
//!   │   │  │   Key   │  Entry { value, size, node: SlotId }      │     │   │
//!   │   │  ├─────────┼───────────────────────────────────────────┤     │   │
//!   │   │  │  "a"    │  { .., size: 5, node: id_1 } ─────────┐   │     │   │
//!   │   │  │  "b"    │  { .., size: 3, node: id_2 } ───────┐ │   │     │   │
//!   │   │  └─────────┴─────────────────────────────────────┼─┼───┘     │   │
//!   │   └──────────────────────────────────────────────────┼─┼─────────┘   │
//!   │                                                      ▼ ▼             │
//!   │   ┌──────────────────────────────────────────────────────────────┐   │
//!   │   │  IntrusiveList<K> (recency order)                            │   │
//!   │   │                                                              │   │
//!   │   │  head ──► [id_1:"a"] ◄──► [id_2:"b"] ◄── tail                │   │
//!   │   │  (oldest, evicted first)        (most recently touched)      │   │
//!   │   └──────────────────────────────────────────────────────────────┘   │
//!   │                                                                      │
//!   │   used_bytes: 8            capacity_bytes: 16 (0 = unbounded)        │
//!   └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operations Flow
//!
//! ```text
//!   insert(c, size 9) with capacity 16
//!   ═══════════════════════════════════════════════════════════════════════
//!     1. push [c] at tail            head ─► [a] ◄─► [b] ◄─► [c] ◄─ tail
//!     2. used_bytes = 17 > 16
//!     3. evict head [a]              head ─► [b] ◄─► [c] ◄─ tail
//!     4. used_bytes = 12, listener("a", value)
//!
//!   get(b)
//!   ═══════════════════════════════════════════════════════════════════════
//!     move [b] to tail               head ─► [c] ◄─► [b] ◄─ tail
//! ```
//!
//! ## Methods
//!
//! | Method              | Complexity | Description                            |
//! |---------------------|------------|----------------------------------------|
//! | `get(&k)`           | O(1)       | Get value, move to tail                |
//! | `peek(&k)`          | O(1)       | Get value without reordering           |
//! | `insert(k, v)`      | O(1)       | Insert or update, may evict one entry  |
//! | `remove(&k)`        | O(1)       | Remove entry, notify listener          |
//! | `remove_oldest()`   | O(1)       | Remove head, notify listener           |
//! | `peek_oldest()`     | O(1)       | Borrow head without removing           |
//! | `keys()`            | O(n)       | Keys from oldest to newest             |
//! | `recency_rank(&k)`  | O(n)       | Position from the head (0 = oldest)    |
//!
//! ## Thread Safety
//!
//! `LruCache` is **not** thread-safe; share it through
//! `ConcurrentCache` (feature `concurrency`).

use std::fmt;
use std::hash::Hash;

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::ds::{IntrusiveList, SlotId};
use crate::error::InvariantError;
#[cfg(feature = "metrics")]
use crate::metrics::{
    CacheMetrics, CacheMetricsSnapshot, CoreMetricsRecorder, MetricsSnapshotProvider,
};
use crate::traits::{ByteCache, EvictionListener};
use crate::weigh::{ByteSize, Weigher, byte_size_weigher};

#[derive(Debug)]
struct Entry<V> {
    value: V,
    size: usize,
    node: SlotId,
}

/// Byte-budgeted LRU cache.
///
/// # Example
///
/// ```
/// use bytecache::policy::lru::LruCache;
/// use bytecache::traits::ByteCache;
///
/// let mut cache: LruCache<&str, String> = LruCache::new(10, None);
/// cache.insert("a", "aaaa".to_string());
/// cache.insert("b", "bbbb".to_string());
/// cache.get(&"a");
///
/// // 12 bytes > 10: the least recently used entry ("b") goes.
/// cache.insert("c", "cccc".to_string());
/// assert!(cache.contains(&"a"));
/// assert!(!cache.contains(&"b"));
/// assert_eq!(cache.used_bytes(), 8);
/// ```
pub struct LruCache<K, V> {
    map: FxHashMap<K, Entry<V>>,
    order: IntrusiveList<K>,
    capacity_bytes: usize,
    used_bytes: usize,
    weigher: Weigher<V>,
    on_evicted: Option<EvictionListener<K, V>>,
    #[cfg(feature = "metrics")]
    metrics: CacheMetrics,
}

impl<K, V> LruCache<K, V>
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

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a cache measuring values with `weigher`.
    ///
    /// # Example
    ///
    /// ```
    /// use bytecache::policy::lru::LruCache;
    /// use bytecache::traits::ByteCache;
    ///
    /// // Every value costs one unit: a two-entry cache.
    /// let mut cache = LruCache::with_weigher(2, Box::new(|_: &u32| 1), None);
    /// cache.insert(1, 10);
    /// cache.insert(2, 20);
    /// cache.insert(3, 30);
    /// assert_eq!(cache.len(), 2);
    /// assert!(!cache.contains(&1));
    /// ```
    pub fn with_weigher(
        capacity_bytes: usize,
        weigher: Weigher<V>,
        on_evicted: Option<EvictionListener<K, V>>,
    ) -> Self {
        Self {
            map: FxHashMap::default(),
            order: IntrusiveList::new(),
            capacity_bytes,
            used_bytes: 0,
            weigher,
            on_evicted,
            #[cfg(feature = "metrics")]
            metrics: CacheMetrics::default(),
        }
    }

    /// Borrows the entry that would be evicted next.
    pub fn peek_oldest(&self) -> Option<(&K, &V)> {
        let key = self.order.front()?;
        self.map.get(key).map(|entry| (key, &entry.value))
    }

    /// Keys from oldest to most recently touched.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.order.iter()
    }

    /// Distance of `key` from the head of the recency order (0 = oldest).
    pub fn recency_rank(&self, key: &K) -> Option<usize> {
        let node = self.map.get(key)?.node;
        self.order.iter_entries().position(|(id, _)| id == node)
    }

    /// Checks that the map, the recency list and the byte total agree.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.map.len() != self.order.len() {
            return Err(InvariantError::new(format!(
                "map holds {} entries but recency list holds {}",
                self.map.len(),
                self.order.len()
            )));
        }

        let mut total = 0usize;
        for (position, (id, key)) in self.order.iter_entries().enumerate() {
            let entry = self.map.get(key).ok_or_else(|| {
                InvariantError::new(format!("list position {} has no map entry", position))
            })?;
            if entry.node != id {
                return Err(InvariantError::new(format!(
                    "entry at list position {} records stale node {:?} (actual {:?})",
                    position, entry.node, id
                )));
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

    fn pop_head(&mut self) -> Option<(K, V)> {
        let key = self.order.pop_front()?;
        let entry = self.map.remove(&key)?;
        self.used_bytes -= entry.size;
        Some((key, entry.value))
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
                "lru entry exceeds byte budget on its own; keeping it"
            );
            return;
        }

        if let Some((key, value)) = self.pop_head() {
            #[cfg(feature = "metrics")]
            self.metrics.record_evicted_entry();
            trace!(
                used_bytes = self.used_bytes,
                capacity_bytes = self.capacity_bytes,
                "lru evicted least recently used entry"
            );
            self.notify(key, value);
        }
    }
}

impl<K, V> ByteCache<K, V> for LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn get(&mut self, key: &K) -> Option<&V> {
        match self.map.get(key) {
            Some(entry) => {
                #[cfg(feature = "metrics")]
                self.metrics.record_get_hit();
                self.order.move_to_back(entry.node);
                Some(&entry.value)
            },
            None => {
                #[cfg(feature = "metrics")]
                self.metrics.record_get_miss();
                None
            },
        }
    }

    fn peek(&self, key: &K) -> Option<&V> {
        self.map.get(key).map(|entry| &entry.value)
    }

    fn insert(&mut self, key: K, value: V) -> Option<V> {
        #[cfg(feature = "metrics")]
        self.metrics.record_insert_call();

        let size = (self.weigher)(&value);

        if let Some(entry) = self.map.get_mut(&key) {
            #[cfg(feature = "metrics")]
            self.metrics.record_insert_update();

            self.used_bytes = self.used_bytes - entry.size + size;
            entry.size = size;
            let previous = std::mem::replace(&mut entry.value, value);
            self.order.move_to_back(entry.node);
            self.enforce_budget();
            return Some(previous);
        }

        #[cfg(feature = "metrics")]
        self.metrics.record_insert_new();

        let node = self.order.push_back(key.clone());
        self.map.insert(key, Entry { value, size, node });
        self.used_bytes += size;
        self.enforce_budget();
        None
    }

    fn remove(&mut self, key: &K) -> bool {
        #[cfg(feature = "metrics")]
        self.metrics.record_remove_call();

        let Some(entry) = self.map.remove(key) else {
            return false;
        };
        self.used_bytes -= entry.size;
        if let Some(owned_key) = self.order.remove(entry.node) {
            #[cfg(feature = "metrics")]
            self.metrics.record_remove_found();
            self.notify(owned_key, entry.value);
        }
        true
    }

    fn remove_oldest(&mut self) -> bool {
        #[cfg(feature = "metrics")]
        self.metrics.record_remove_oldest_call();

        match self.pop_head() {
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
        self.order.clear();
        self.used_bytes = 0;
    }
}

#[cfg(feature = "metrics")]
impl<K, V> MetricsSnapshotProvider<CacheMetricsSnapshot> for LruCache<K, V>
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

impl<K, V> fmt::Debug for LruCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("len", &self.map.len())
            .field("used_bytes", &self.used_bytes)
            .field("capacity_bytes", &self.capacity_bytes)
            .finish_non_exhaustive()
    }
}

impl<K, V> Extend<(K, V)> for LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}
