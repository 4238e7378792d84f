//! Eviction backends.

pub mod lfu;
pub mod lru;
