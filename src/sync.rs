//! Thread-safe wrapper around any [`ByteCache`] backend.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────┐
//!   │               ConcurrentCache<C> (Clone)                  │
//!   │                                                          │
//!   │   Arc<RwLock<C>>                                         │
//!   │                                                          │
//!   │   write lock: get, insert, remove, remove_oldest,        │
//!   │               clear, get_or_insert_with                  │
//!   │   read lock:  peek, contains, len, used_bytes            │
//!   └──────────────────────────────────────────────────────────┘
//! ```
//!
//! `get` takes the write lock because a hit reorders the backend (recency
//! move or weight bump). Values leave the lock by clone; store `Arc<T>` when
//! values are large.
//!
//! The eviction listener runs on the calling thread while the write lock is
//! held. A listener that calls back into the same `ConcurrentCache` deadlocks.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use std::thread;
//!
//! use bytecache::builder::{CacheBuilder, CachePolicy};
//! use bytecache::sync::ConcurrentCache;
//!
//! let cache = ConcurrentCache::new(CacheBuilder::<u32, String>::new(1024).build(CachePolicy::Lru));
//!
//! let handles: Vec<_> = (0..4)
//!     .map(|t| {
//!         let cache = cache.clone();
//!         thread::spawn(move || {
//!             for i in 0..10 {
//!                 cache.insert(t * 100 + i, format!("v{i}"));
//!             }
//!         })
//!     })
//!     .collect();
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//! assert_eq!(cache.len(), 40);
//! ```

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::traits::ByteCache;

/// Shared, lock-protected cache handle.
pub struct ConcurrentCache<C, K, V> {
    inner: Arc<RwLock<C>>,
    _marker: PhantomData<fn(K, V)>,
}

impl<C, K, V> Clone for ConcurrentCache<C, K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            _marker: PhantomData,
        }
    }
}

impl<C, K, V> ConcurrentCache<C, K, V>
where
    C: ByteCache<K, V>,
{
    pub fn new(cache: C) -> Self {
        Self {
            inner: Arc::new(RwLock::new(cache)),
            _marker: PhantomData,
        }
    }

    /// Returns a clone of the value and records the access.
    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        let mut cache = self.inner.write();
        cache.get(key).cloned()
    }

    /// Returns a clone of the value without recording an access.
    pub fn peek(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        let cache = self.inner.read();
        cache.peek(key).cloned()
    }

    pub fn insert(&self, key: K, value: V) -> Option<V> {
        let mut cache = self.inner.write();
        cache.insert(key, value)
    }

    /// Returns the cached value for `key`, or computes it with `loader`,
    /// stores it and returns it.
    ///
    /// The lookup and the store happen under one write lock, so concurrent
    /// callers for the same key run `loader` at most once between them.
    ///
    /// ```
    /// use bytecache::policy::lru::LruCache;
    /// use bytecache::sync::ConcurrentCache;
    ///
    /// let cache = ConcurrentCache::new(LruCache::<&str, String>::new(0, None));
    /// let v = cache.get_or_insert_with("k", || "loaded".to_string());
    /// assert_eq!(v, "loaded");
    /// let v = cache.get_or_insert_with("k", || unreachable!());
    /// assert_eq!(v, "loaded");
    /// ```
    pub fn get_or_insert_with<F>(&self, key: K, loader: F) -> V
    where
        K: Clone,
        V: Clone,
        F: FnOnce() -> V,
    {
        let mut cache = self.inner.write();
        if let Some(value) = cache.get(&key) {
            return value.clone();
        }
        let value = loader();
        cache.insert(key, value.clone());
        value
    }

    pub fn remove(&self, key: &K) -> bool {
        let mut cache = self.inner.write();
        cache.remove(key)
    }

    pub fn remove_oldest(&self) -> bool {
        let mut cache = self.inner.write();
        cache.remove_oldest()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.inner.read().contains(key)
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn used_bytes(&self) -> usize {
        self.inner.read().used_bytes()
    }

    pub fn capacity_bytes(&self) -> usize {
        self.inner.read().capacity_bytes()
    }

    pub fn clear(&self) {
        self.inner.write().clear();
    }

    /// Runs `f` with shared access to the backend.
    pub fn with_read<R>(&self, f: impl FnOnce(&C) -> R) -> R {
        f(&self.inner.read())
    }

    /// Runs `f` with exclusive access to the backend.
    pub fn with_write<R>(&self, f: impl FnOnce(&mut C) -> R) -> R {
        f(&mut self.inner.write())
    }
}

impl<C, K, V> From<C> for ConcurrentCache<C, K, V>
where
    C: ByteCache<K, V>,
{
    fn from(cache: C) -> Self {
        Self::new(cache)
    }
}

impl<C, K, V> fmt::Debug for ConcurrentCache<C, K, V>
where
    C: ByteCache<K, V>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cache = self.inner.read();
        f.debug_struct("ConcurrentCache")
            .field("len", &cache.len())
            .field("used_bytes", &cache.used_bytes())
            .field("capacity_bytes", &cache.capacity_bytes())
            .finish_non_exhaustive()
    }
}
