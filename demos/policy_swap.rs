//! Choose the eviction policy at runtime from a string.
//!
//! Run with: `cargo run --example policy_swap -- lfu`

use std::env;

use bytecache::builder::{Cache, CacheBuilder, CachePolicy};
use bytecache::traits::ByteCache;

fn run(cache: &mut Cache<u64, String>) {
    for i in 0..20u64 {
        cache.insert(i % 8, format!("value-{i}"));
        if i % 3 == 0 {
            cache.get(&0);
        }
    }
}

fn main() {
    let name = env::args().nth(1).unwrap_or_else(|| "lru".to_string());
    let policy: CachePolicy = match name.parse() {
        Ok(policy) => policy,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        },
    };

    let mut cache: Cache<u64, String> = CacheBuilder::new(48)
        .on_evicted(|key, _| println!("evicted {key}"))
        .build(policy);
    run(&mut cache);

    println!(
        "{policy}: {} entries, {} / {} bytes, next victim {:?}",
        cache.len(),
        cache.used_bytes(),
        cache.capacity_bytes(),
        cache.peek_oldest().map(|(k, _)| *k)
    );
}
