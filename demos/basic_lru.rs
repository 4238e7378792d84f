//! Byte-budgeted LRU cache with an eviction listener.
//!
//! Run with: `cargo run --example basic_lru`

use bytecache::policy::lru::LruCache;
use bytecache::traits::ByteCache;

fn main() {
    // Room for 16 bytes of string payload.
    let mut cache: LruCache<&str, String> = LruCache::new(
        16,
        Some(Box::new(|key: &str, value: String| {
            println!("evicted {key} ({} bytes)", value.len());
        })),
    );

    cache.insert("alpha", "aaaaaa".to_string());
    cache.insert("beta", "bbbbbb".to_string());
    println!("used {} of {} bytes", cache.used_bytes(), cache.capacity_bytes());

    // Touch alpha so beta becomes the least recently used entry.
    cache.get(&"alpha");
    cache.insert("gamma", "gggggg".to_string());

    println!("recency order (oldest first): {:?}", cache.keys().collect::<Vec<_>>());
    println!("used {} of {} bytes", cache.used_bytes(), cache.capacity_bytes());
}
