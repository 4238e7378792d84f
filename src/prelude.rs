pub use crate::builder::{Cache, CacheBuilder, CachePolicy};
pub use crate::error::{ConfigError, InvariantError};
#[cfg(feature = "metrics")]
pub use crate::metrics::{CacheMetricsSnapshot, MetricsSnapshotProvider};
pub use crate::policy::lfu::LfuCache;
pub use crate::policy::lru::LruCache;
#[cfg(feature = "concurrency")]
pub use crate::sync::ConcurrentCache;
pub use crate::traits::{ByteCache, EvictionListener};
pub use crate::weigh::{ByteSize, Weigher, byte_size_weigher, unit_weigher};
