#![no_main]

use std::sync::{Arc, Mutex};

use bytecache::builder::{CacheBuilder, CachePolicy};
use bytecache::traits::ByteCache;
use libfuzzer_sys::fuzz_target;

// Fuzz arbitrary operation sequences on both eviction policies
//
// The first byte picks the policy and the byte budget; the rest drives
// insert/get/remove/remove_oldest. Invariants and the one-eviction-per-insert
// rule are checked after every step.
fuzz_target!(|data: &[u8]| {
    let Some((&header, ops)) = data.split_first() else {
        return;
    };
    let policy = if header & 1 == 0 {
        CachePolicy::Lru
    } else {
        CachePolicy::Lfu
    };
    let capacity = usize::from(header >> 1);

    let evicted = Arc::new(Mutex::new(0usize));
    let sink = Arc::clone(&evicted);
    let mut cache = CacheBuilder::<u8, Vec<u8>>::new(capacity)
        .on_evicted(move |_, _| *sink.lock().unwrap() += 1)
        .build(policy);

    for chunk in ops.chunks_exact(3) {
        let key = chunk[1] % 32;
        let before = *evicted.lock().unwrap();
        let len_before = cache.len();

        match chunk[0] % 4 {
            0 => {
                cache.insert(key, vec![0; usize::from(chunk[2] % 64)]);
                assert!(*evicted.lock().unwrap() - before <= 1);
            },
            1 => {
                let used = cache.used_bytes();
                let _ = cache.get(&key);
                assert_eq!(cache.used_bytes(), used);
                assert_eq!(cache.len(), len_before);
            },
            2 => {
                let present = cache.contains(&key);
                assert_eq!(cache.remove(&key), present);
            },
            _ => {
                assert_eq!(cache.remove_oldest(), len_before > 0);
            },
        }

        cache.check_invariants().unwrap();
    }
});
