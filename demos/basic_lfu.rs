//! LFU cache: frequently read entries survive a stream of one-off inserts.
//!
//! Run with: `cargo run --example basic_lfu`

use bytecache::policy::lfu::LfuCache;
use bytecache::traits::ByteCache;

fn main() {
    let mut cache: LfuCache<u32, Vec<u8>> = LfuCache::new(4 * 1024, None);

    for page in 0..4 {
        cache.insert(page, vec![0; 1024]);
    }
    for _ in 0..3 {
        cache.get(&0);
        cache.get(&1);
    }

    // A scan of cold pages only ever displaces the lightest entry.
    for page in 100..110 {
        cache.insert(page, vec![0; 1024]);
    }

    for page in [0, 1, 2, 3] {
        println!(
            "page {page}: cached={} weight={:?}",
            cache.contains(&page),
            cache.weight(&page)
        );
    }
    println!("{} entries, {} bytes", cache.len(), cache.used_bytes());
}
