//! # Cache Contract
//!
//! Defines [`ByteCache`], the single contract both eviction policies implement,
//! so callers can swap LRU for LFU without touching call sites.
//!
//! ## Architecture
//!
//! ```text
//!                    ┌──────────────────────────────────────────┐
//!                    │            ByteCache<K, V>               │
//!                    │                                          │
//!                    │  get(&mut, &K) → Option<&V>              │
//!                    │  peek(&, &K) → Option<&V>                │
//!                    │  insert(&mut, K, V) → Option<V>          │
//!                    │  remove(&mut, &K) → bool                 │
//!                    │  remove_oldest(&mut) → bool              │
//!                    │  len / used_bytes / capacity_bytes       │
//!                    └────────────────────┬─────────────────────┘
//!                                         │
//!                    ┌────────────────────┴────────────────────┐
//!                    ▼                                         ▼
//!        ┌───────────────────────┐                 ┌───────────────────────┐
//!        │   LruCache<K, V>      │                 │   LfuCache<K, V>      │
//!        │   IntrusiveList order │                 │   IndexedHeap order   │
//!        │   O(1) everywhere     │                 │   O(log n) reorder    │
//!        └───────────────────────┘                 └───────────────────────┘
//! ```
//!
//! ## Byte Budget
//!
//! Every entry is charged the size reported by the cache's weigher. After an
//! `insert` leaves `used_bytes > capacity_bytes` (with `capacity_bytes > 0`),
//! exactly one entry is evicted: the policy's weakest. A single oversized value
//! therefore does not drain the whole cache, and a cache holding nothing but
//! that value stays over budget until later inserts give it something else to
//! evict.
//!
//! ## Eviction Listener
//!
//! The optional [`EvictionListener`] receives ownership of each removed entry,
//! whether it left through capacity pressure, [`remove`](ByteCache::remove) or
//! [`remove_oldest`](ByteCache::remove_oldest). It runs synchronously after the
//! entry has left the map, the ordering structure and the byte total.
//! [`clear`](ByteCache::clear) drops entries without notifying it.
//!
//! ## Thread Safety
//!
//! Implementations are plain single-threaded structures. Wrap them in
//! `ConcurrentCache` (feature `concurrency`) to share across threads.

/// Callback invoked with each removed `(key, value)` pair.
pub type EvictionListener<K, V> = Box<dyn FnMut(K, V) + Send + Sync>;

/// Byte-budgeted key/value cache with a policy-defined eviction order.
pub trait ByteCache<K, V> {
    /// Returns the value for `key` and records the access for the policy.
    ///
    /// Never evicts and never changes the byte total.
    fn get(&mut self, key: &K) -> Option<&V>;

    /// Returns the value for `key` without recording an access.
    fn peek(&self, key: &K) -> Option<&V>;

    /// Inserts or replaces the value for `key`.
    ///
    /// Replacing an existing value updates it in place, adjusts the byte total
    /// by the size difference, records an access and returns the old value.
    /// Afterwards at most one entry is evicted if the cache is over budget.
    fn insert(&mut self, key: K, value: V) -> Option<V>;

    /// Removes `key`, notifying the listener. Returns `false` if absent.
    fn remove(&mut self, key: &K) -> bool;

    /// Removes the entry the policy considers weakest, notifying the listener.
    ///
    /// Returns `false` on an empty cache.
    fn remove_oldest(&mut self) -> bool;

    fn contains(&self, key: &K) -> bool;

    /// Number of stored entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sum of the sizes of all stored entries.
    fn used_bytes(&self) -> usize;

    /// Configured byte budget; 0 means unbounded.
    fn capacity_bytes(&self) -> usize;

    /// Drops every entry without notifying the listener.
    fn clear(&mut self);
}
