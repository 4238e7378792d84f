//! bytecache: byte-budgeted in-memory caches with LRU and LFU eviction.
//!
//! Both backends implement [`traits::ByteCache`], charge every entry the size
//! reported by a weigher, and evict at most one entry per insert once the
//! byte total exceeds the budget.
//!
//! ## Modules
//!
//! | Module     | Contents                                                  |
//! |------------|-----------------------------------------------------------|
//! | `policy`   | [`LruCache`](policy::lru::LruCache), [`LfuCache`](policy::lfu::LfuCache) |
//! | `builder`  | `CachePolicy` selection and the dispatching `Cache`       |
//! | `ds`       | Slot arena, intrusive list, indexed heap                  |
//! | `weigh`    | `ByteSize` and weigher helpers                            |
//! | `sync`     | `ConcurrentCache` (feature `concurrency`)                 |
//! | `metrics`  | Operation counters and snapshots (feature `metrics`)      |
//!
//! ## Example
//!
//! ```
//! use bytecache::prelude::*;
//!
//! let mut cache: LruCache<&str, String> = LruCache::new(16, None);
//! cache.insert("greeting", "hello".to_string());
//! assert_eq!(cache.get(&"greeting").map(String::as_str), Some("hello"));
//! assert_eq!(cache.used_bytes(), 5);
//! ```

pub mod builder;
pub mod ds;
pub mod error;
pub mod policy;

#[cfg(feature = "metrics")]
pub mod metrics;

pub mod prelude;
#[cfg(feature = "concurrency")]
pub mod sync;
pub mod traits;
pub mod weigh;
