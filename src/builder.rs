//! Policy selection and cache construction.
//!
//! [`CacheBuilder`] collects the byte budget, the weigher and the eviction
//! listener, then builds a [`Cache`] for the chosen [`CachePolicy`]. Call
//! sites only see [`Cache`], so swapping LRU for LFU is a one-word change
//! (or a config string, via [`CachePolicy`]'s `FromStr`).
//!
//! ## Example
//!
//! ```rust
//! use bytecache::builder::{Cache, CacheBuilder, CachePolicy};
//! use bytecache::traits::ByteCache;
//!
//! let policy: CachePolicy = "LFU".parse().unwrap();
//! let mut cache: Cache<u64, String> = CacheBuilder::new(64).build(policy);
//! cache.insert(1, "hello".to_string());
//! assert_eq!(cache.get(&1), Some(&"hello".to_string()));
//! assert_eq!(cache.used_bytes(), 5);
//! ```

use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use crate::error::{ConfigError, InvariantError};
#[cfg(feature = "metrics")]
use crate::metrics::{CacheMetricsSnapshot, MetricsSnapshotProvider};
use crate::policy::lfu::LfuCache;
use crate::policy::lru::LruCache;
use crate::traits::{ByteCache, EvictionListener};
use crate::weigh::{ByteSize, Weigher, byte_size_weigher};

/// Available eviction policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CachePolicy {
    /// Least Recently Used eviction.
    #[default]
    Lru,
    /// Least Frequently Used eviction (indexed heap).
    Lfu,
}

impl CachePolicy {
    /// Canonical lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            CachePolicy::Lru => "lru",
            CachePolicy::Lfu => "lfu",
        }
    }
}

impl fmt::Display for CachePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CachePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        if name.eq_ignore_ascii_case("lru") {
            Ok(CachePolicy::Lru)
        } else if name.eq_ignore_ascii_case("lfu") {
            Ok(CachePolicy::Lfu)
        } else {
            Err(ConfigError::new(format!(
                "unknown cache policy `{}` (expected `lru` or `lfu`)",
                name
            )))
        }
    }
}

/// Cache wrapper that dispatches to the backend chosen at build time.
pub struct Cache<K, V> {
    inner: CacheInner<K, V>,
}

enum CacheInner<K, V> {
    Lru(LruCache<K, V>),
    Lfu(LfuCache<K, V>),
}

impl<K, V> Cache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Policy this cache was built with.
    pub fn policy(&self) -> CachePolicy {
        match &self.inner {
            CacheInner::Lru(_) => CachePolicy::Lru,
            CacheInner::Lfu(_) => CachePolicy::Lfu,
        }
    }

    /// Borrows the entry `remove_oldest` would take next.
    pub fn peek_oldest(&self) -> Option<(&K, &V)> {
        match &self.inner {
            CacheInner::Lru(lru) => lru.peek_oldest(),
            CacheInner::Lfu(lfu) => lfu.peek_oldest(),
        }
    }

    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        match &self.inner {
            CacheInner::Lru(lru) => lru.check_invariants(),
            CacheInner::Lfu(lfu) => lfu.check_invariants(),
        }
    }
}

impl<K, V> ByteCache<K, V> for Cache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn get(&mut self, key: &K) -> Option<&V> {
        match &mut self.inner {
            CacheInner::Lru(lru) => lru.get(key),
            CacheInner::Lfu(lfu) => lfu.get(key),
        }
    }

    fn peek(&self, key: &K) -> Option<&V> {
        match &self.inner {
            CacheInner::Lru(lru) => lru.peek(key),
            CacheInner::Lfu(lfu) => lfu.peek(key),
        }
    }

    fn insert(&mut self, key: K, value: V) -> Option<V> {
        match &mut self.inner {
            CacheInner::Lru(lru) => lru.insert(key, value),
            CacheInner::Lfu(lfu) => lfu.insert(key, value),
        }
    }

    fn remove(&mut self, key: &K) -> bool {
        match &mut self.inner {
            CacheInner::Lru(lru) => lru.remove(key),
            CacheInner::Lfu(lfu) => lfu.remove(key),
        }
    }

    fn remove_oldest(&mut self) -> bool {
        match &mut self.inner {
            CacheInner::Lru(lru) => lru.remove_oldest(),
            CacheInner::Lfu(lfu) => lfu.remove_oldest(),
        }
    }

    fn contains(&self, key: &K) -> bool {
        match &self.inner {
            CacheInner::Lru(lru) => lru.contains(key),
            CacheInner::Lfu(lfu) => lfu.contains(key),
        }
    }

    fn len(&self) -> usize {
        match &self.inner {
            CacheInner::Lru(lru) => lru.len(),
            CacheInner::Lfu(lfu) => lfu.len(),
        }
    }

    fn used_bytes(&self) -> usize {
        match &self.inner {
            CacheInner::Lru(lru) => lru.used_bytes(),
            CacheInner::Lfu(lfu) => lfu.used_bytes(),
        }
    }

    fn capacity_bytes(&self) -> usize {
        match &self.inner {
            CacheInner::Lru(lru) => lru.capacity_bytes(),
            CacheInner::Lfu(lfu) => lfu.capacity_bytes(),
        }
    }

    fn clear(&mut self) {
        match &mut self.inner {
            CacheInner::Lru(lru) => lru.clear(),
            CacheInner::Lfu(lfu) => lfu.clear(),
        }
    }
}

#[cfg(feature = "metrics")]
impl<K, V> MetricsSnapshotProvider<CacheMetricsSnapshot> for Cache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn snapshot(&self) -> CacheMetricsSnapshot {
        match &self.inner {
            CacheInner::Lru(lru) => lru.snapshot(),
            CacheInner::Lfu(lfu) => lfu.snapshot(),
        }
    }
}

impl<K, V> fmt::Debug for Cache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner {
            CacheInner::Lru(lru) => f.debug_tuple("Cache").field(lru).finish(),
            CacheInner::Lfu(lfu) => f.debug_tuple("Cache").field(lfu).finish(),
        }
    }
}

/// Builder for [`Cache`] instances.
pub struct CacheBuilder<K, V> {
    capacity_bytes: usize,
    weigher: Weigher<V>,
    on_evicted: Option<EvictionListener<K, V>>,
}

impl<K, V> CacheBuilder<K, V>
where
    V: ByteSize + 'static,
{
    /// Starts a builder that measures values with [`ByteSize`].
    ///
    /// `capacity_bytes == 0` builds an unbounded cache.
    pub fn new(capacity_bytes: usize) -> Self {
        Self::with_weigher(capacity_bytes, byte_size_weigher())
    }
}

impl<K, V> CacheBuilder<K, V> {
    /// Starts a builder for values without a [`ByteSize`] impl.
    pub fn with_weigher(capacity_bytes: usize, weigher: Weigher<V>) -> Self {
        Self {
            capacity_bytes,
            weigher,
            on_evicted: None,
        }
    }

    /// Replaces the size function.
    ///
    /// ```
    /// use bytecache::builder::{Cache, CacheBuilder, CachePolicy};
    /// use bytecache::traits::ByteCache;
    ///
    /// // Count entries instead of bytes.
    /// let mut cache: Cache<&str, String> = CacheBuilder::new(2)
    ///     .weigher(|_: &String| 1)
    ///     .build(CachePolicy::Lru);
    /// cache.insert("a", "a long value".into());
    /// cache.insert("b", "another long value".into());
    /// cache.insert("c", "c".into());
    /// assert_eq!(cache.len(), 2);
    /// assert!(!cache.contains(&"a"));
    /// ```
    pub fn weigher<F>(mut self, weigher: F) -> Self
    where
        F: Fn(&V) -> usize + Send + Sync + 'static,
    {
        self.weigher = Box::new(weigher);
        self
    }

    /// Registers a listener called with every removed `(key, value)`.
    pub fn on_evicted<F>(mut self, listener: F) -> Self
    where
        F: FnMut(K, V) + Send + Sync + 'static,
    {
        self.on_evicted = Some(Box::new(listener));
        self
    }

    pub fn capacity_bytes(&self) -> usize {
        self.capacity_bytes
    }

    /// Builds a cache with the given policy.
    pub fn build(self, policy: CachePolicy) -> Cache<K, V>
    where
        K: Eq + Hash + Clone,
    {
        let inner = match policy {
            CachePolicy::Lru => CacheInner::Lru(LruCache::with_weigher(
                self.capacity_bytes,
                self.weigher,
                self.on_evicted,
            )),
            CachePolicy::Lfu => CacheInner::Lfu(LfuCache::with_weigher(
                self.capacity_bytes,
                self.weigher,
                self.on_evicted,
            )),
        };

        Cache { inner }
    }
}

impl<K, V> fmt::Debug for CacheBuilder<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheBuilder")
            .field("capacity_bytes", &self.capacity_bytes)
            .field("on_evicted", &self.on_evicted.is_some())
            .finish_non_exhaustive()
    }
}
