//! Operation counters for the cache policies (feature `metrics`).
//!
//! Recording is split from reading: policies hold a [`CacheMetrics`] and feed
//! it through [`CoreMetricsRecorder`]; callers read a
//! [`CacheMetricsSnapshot`] through [`MetricsSnapshotProvider`].
//!
//! ```
//! use bytecache::metrics::MetricsSnapshotProvider;
//! use bytecache::policy::lru::LruCache;
//! use bytecache::traits::ByteCache;
//!
//! let mut cache: LruCache<&str, String> = LruCache::new(0, None);
//! cache.insert("a", "alpha".to_string());
//! cache.get(&"a");
//! cache.get(&"b");
//!
//! let snap = cache.snapshot();
//! assert_eq!(snap.get_hits, 1);
//! assert_eq!(snap.get_misses, 1);
//! assert_eq!(snap.used_bytes, 5);
//! ```

pub mod recorder;
pub mod snapshot;
pub mod traits;

pub use recorder::CacheMetrics;
pub use snapshot::CacheMetricsSnapshot;
pub use traits::{CoreMetricsRecorder, MetricsSnapshotProvider};
