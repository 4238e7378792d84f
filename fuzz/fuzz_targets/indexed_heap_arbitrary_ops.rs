#![no_main]

use bytecache::ds::{IndexedHeap, SlotId};
use libfuzzer_sys::fuzz_target;

// Fuzz arbitrary operation sequences on IndexedHeap
//
// Tests random sequences of push, pop_min, remove, set_weight and increment,
// validating heap order and stored positions after every step.
fuzz_target!(|data: &[u8]| {
    let mut heap: IndexedHeap<u32> = IndexedHeap::new();
    let mut live: Vec<SlotId> = Vec::new();

    for chunk in data.chunks_exact(3) {
        let op = chunk[0] % 5;
        let pick = usize::from(chunk[1]);
        let weight = u64::from(chunk[2]);

        match op {
            0 => {
                let id = heap.push(u32::from(chunk[1]), weight);
                live.push(id);
                assert_eq!(heap.weight(id), Some(weight));
            },
            1 => {
                let min = live.iter().filter_map(|&id| heap.weight(id)).min();
                let popped = heap.pop_min();
                assert_eq!(popped.as_ref().map(|&(_, w)| w), min);
                live.retain(|&id| heap.contains(id));
            },
            2 if !live.is_empty() => {
                let id = live.swap_remove(pick % live.len());
                assert!(heap.remove(id).is_some());
                assert!(!heap.contains(id));
            },
            3 if !live.is_empty() => {
                let id = live[pick % live.len()];
                assert!(heap.set_weight(id, weight));
                assert_eq!(heap.weight(id), Some(weight));
            },
            4 if !live.is_empty() => {
                let id = live[pick % live.len()];
                let before = heap.weight(id).unwrap();
                assert_eq!(heap.increment(id), Some(before + 1));
            },
            _ => {},
        }

        assert_eq!(heap.len(), live.len());
        heap.validate().unwrap();
    }
});
