//! Indexed binary min-heap with O(log n) arbitrary removal.
//!
//! Unlike `std::collections::BinaryHeap`, every element knows where it sits in
//! the heap array. Items live in a [`SlotArena`] next to their weight and their
//! current heap position; the heap array itself only holds [`SlotId`]s. Every
//! swap rewrites the `pos` field of both records, so a handle can always be
//! turned back into a heap position without searching.
//!
//! ## Architecture
//!
//! ```text
//!   slots (SlotArena<HeapSlot<T>>)          order (Vec<SlotId>)
//!   ┌────────┬──────────────────────────┐   ┌───────┬────────┐
//!   │ SlotId │ { item, weight, pos }    │   │ index │ SlotId │
//!   ├────────┼──────────────────────────┤   ├───────┼────────┤
//!   │ id_0   │ { A, weight: 3, pos: 2 } │   │   0   │ id_1   │  ← min
//!   │ id_1   │ { B, weight: 0, pos: 0 } │   │   1   │ id_2   │
//!   │ id_2   │ { C, weight: 1, pos: 1 } │   │   2   │ id_0   │
//!   └────────┴──────────────────────────┘   └───────┴────────┘
//!
//!   invariant: order[slots[id].pos] == id  for every live id
//! ```
//!
//! ## Operations
//!
//! | Operation     | Description                              | Complexity |
//! |---------------|------------------------------------------|------------|
//! | `push`        | Insert item with a weight                | O(log n)   |
//! | `pop_min`     | Remove the minimum-weight item           | O(log n)   |
//! | `remove`      | Remove the item behind a handle          | O(log n)   |
//! | `set_weight`  | Change a weight and restore heap order   | O(log n)   |
//! | `increment`   | `set_weight(weight + 1)`                 | O(log n)   |
//! | `peek_min`    | Borrow the minimum-weight item           | O(1)       |
//! | `get/get_mut` | Borrow an item by handle                 | O(1)       |
//!
//! ## Ties
//!
//! Children only move above a parent when strictly lighter, so equal weights
//! keep whatever relative placement the array already had. The resulting
//! order among ties is an artifact of the push/pop/remove history, not of
//! insertion order, and callers must not depend on it.
//!
//! ## Example
//!
//! ```
//! use bytecache::ds::IndexedHeap;
//!
//! let mut heap = IndexedHeap::new();
//! let a = heap.push("a", 5);
//! let b = heap.push("b", 2);
//! heap.push("c", 8);
//!
//! heap.set_weight(a, 1);
//! assert_eq!(heap.pop_min(), Some(("a", 1)));
//!
//! assert_eq!(heap.remove(b), Some("b"));
//! assert_eq!(heap.pop_min(), Some(("c", 8)));
//! assert!(heap.is_empty());
//! ```
use crate::ds::slot_arena::{SlotArena, SlotId};
use crate::error::InvariantError;

#[derive(Debug)]
struct HeapSlot<T> {
    item: T,
    weight: u64,
    pos: usize,
}

/// Binary min-heap keyed by `u64` weight with stable element handles.
#[derive(Debug)]
pub struct IndexedHeap<T> {
    slots: SlotArena<HeapSlot<T>>,
    order: Vec<SlotId>,
}

impl<T> IndexedHeap<T> {
    pub fn new() -> Self {
        Self {
            slots: SlotArena::new(),
            order: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: SlotArena::with_capacity(capacity),
            order: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, id: SlotId) -> bool {
        self.slots.contains(id)
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.slots.get(id).map(|slot| &slot.item)
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.slots.get_mut(id).map(|slot| &mut slot.item)
    }

    pub fn weight(&self, id: SlotId) -> Option<u64> {
        self.slots.get(id).map(|slot| slot.weight)
    }

    /// Current index of `id` in the heap array (0 = root).
    pub fn position(&self, id: SlotId) -> Option<usize> {
        self.slots.get(id).map(|slot| slot.pos)
    }

    /// Handle of the minimum-weight item.
    pub fn peek_min_id(&self) -> Option<SlotId> {
        self.order.first().copied()
    }

    pub fn peek_min(&self) -> Option<(&T, u64)> {
        let slot = self.slots.get(self.peek_min_id()?)?;
        Some((&slot.item, slot.weight))
    }

    /// Inserts `item` with `weight` and returns its handle.
    pub fn push(&mut self, item: T, weight: u64) -> SlotId {
        let pos = self.order.len();
        let id = self.slots.insert(HeapSlot { item, weight, pos });
        self.order.push(id);
        self.sift_up(pos);
        id
    }

    /// Removes the minimum-weight item.
    pub fn pop_min(&mut self) -> Option<(T, u64)> {
        let id = self.peek_min_id()?;
        self.remove_entry(id)
    }

    /// Removes the item behind `id`, wherever it sits in the heap.
    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        self.remove_entry(id).map(|(item, _)| item)
    }

    /// Replaces the weight of `id` and restores heap order.
    ///
    /// Returns `false` if `id` is not in the heap.
    pub fn set_weight(&mut self, id: SlotId, weight: u64) -> bool {
        let Some(slot) = self.slots.get_mut(id) else {
            return false;
        };
        slot.weight = weight;
        let pos = slot.pos;
        self.fix(pos);
        true
    }

    /// Adds one to the weight of `id` and returns the new weight.
    pub fn increment(&mut self, id: SlotId) -> Option<u64> {
        let weight = self.weight(id)?.saturating_add(1);
        self.set_weight(id, weight);
        Some(weight)
    }

    /// Iterates `(SlotId, &T, weight)` in heap-array order.
    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &T, u64)> + '_ {
        self.order.iter().filter_map(move |&id| {
            self.slots
                .get(id)
                .map(|slot| (id, &slot.item, slot.weight))
        })
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.order.clear();
    }

    /// Verifies the heap property and that every stored position is current.
    pub fn validate(&self) -> Result<(), InvariantError> {
        if self.slots.len() != self.order.len() {
            return Err(InvariantError::new(format!(
                "heap holds {} slots but {} array entries",
                self.slots.len(),
                self.order.len()
            )));
        }
        for (idx, &id) in self.order.iter().enumerate() {
            let slot = self.slots.get(id).ok_or_else(|| {
                InvariantError::new(format!("heap index {} points at vacant slot {:?}", idx, id))
            })?;
            if slot.pos != idx {
                return Err(InvariantError::new(format!(
                    "slot {:?} records heap index {} but sits at {}",
                    id, slot.pos, idx
                )));
            }
            if idx > 0 {
                let parent = self.weight_at((idx - 1) / 2);
                if parent > slot.weight {
                    return Err(InvariantError::new(format!(
                        "heap order broken at index {}: parent weight {} > child weight {}",
                        idx, parent, slot.weight
                    )));
                }
            }
        }
        Ok(())
    }

    fn remove_entry(&mut self, id: SlotId) -> Option<(T, u64)> {
        let pos = self.slots.get(id)?.pos;
        let last = self.order.len() - 1;
        if pos != last {
            self.swap(pos, last);
        }
        self.order.pop();
        let slot = self.slots.remove(id)?;
        if pos < self.order.len() {
            self.fix(pos);
        }
        Some((slot.item, slot.weight))
    }

    fn weight_at(&self, pos: usize) -> u64 {
        self.slots
            .get(self.order[pos])
            .map_or(u64::MAX, |slot| slot.weight)
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.order.swap(a, b);
        for pos in [a, b] {
            if let Some(slot) = self.slots.get_mut(self.order[pos]) {
                slot.pos = pos;
            }
        }
    }

    /// Moves the element at `pos` up or down until its parent is no heavier
    /// and neither child is lighter.
    fn fix(&mut self, pos: usize) {
        if !self.sift_down(pos) {
            self.sift_up(pos);
        }
    }

    fn sift_up(&mut self, mut pos: usize) {
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if self.weight_at(pos) >= self.weight_at(parent) {
                break;
            }
            self.swap(pos, parent);
            pos = parent;
        }
    }

    /// Returns `true` if the element moved.
    fn sift_down(&mut self, start: usize) -> bool {
        let len = self.order.len();
        let mut pos = start;
        loop {
            let left = 2 * pos + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let mut child = left;
            if right < len && self.weight_at(right) < self.weight_at(left) {
                child = right;
            }
            if self.weight_at(child) >= self.weight_at(pos) {
                break;
            }
            self.swap(pos, child);
            pos = child;
        }
        pos > start
    }
}

impl<T> Default for IndexedHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn drain<T>(heap: &mut IndexedHeap<T>) -> Vec<u64> {
        std::iter::from_fn(|| heap.pop_min().map(|(_, w)| w)).collect()
    }

    #[test]
    fn pops_in_weight_order() {
        let mut heap = IndexedHeap::new();
        for (item, weight) in [("e", 9), ("a", 1), ("d", 7), ("b", 3), ("c", 5)] {
            heap.push(item, weight);
            heap.validate().unwrap();
        }
        assert_eq!(heap.peek_min(), Some((&"a", 1)));
        assert_eq!(drain(&mut heap), vec![1, 3, 5, 7, 9]);
        assert_eq!(heap.pop_min(), None);
    }

    #[test]
    fn remove_arbitrary_element_keeps_order() {
        let mut heap = IndexedHeap::new();
        let ids: Vec<_> = (0..10u64).map(|w| heap.push(w, w)).collect();

        assert_eq!(heap.remove(ids[4]), Some(4));
        assert_eq!(heap.remove(ids[0]), Some(0));
        assert_eq!(heap.remove(ids[9]), Some(9));
        heap.validate().unwrap();

        assert!(!heap.contains(ids[4]));
        assert_eq!(heap.remove(ids[4]), None);
        assert_eq!(drain(&mut heap), vec![1, 2, 3, 5, 6, 7, 8]);
    }

    #[test]
    fn set_weight_moves_element_both_ways() {
        let mut heap = IndexedHeap::new();
        let a = heap.push('a', 10);
        let b = heap.push('b', 20);
        let c = heap.push('c', 30);

        assert!(heap.set_weight(c, 1));
        heap.validate().unwrap();
        assert_eq!(heap.peek_min_id(), Some(c));
        assert_eq!(heap.position(c), Some(0));

        assert!(heap.set_weight(c, 25));
        heap.validate().unwrap();
        assert_eq!(heap.peek_min_id(), Some(a));

        assert_eq!(heap.increment(a), Some(11));
        assert_eq!(heap.weight(a), Some(11));
        assert_eq!(heap.weight(b), Some(20));
        assert_eq!(drain(&mut heap), vec![11, 20, 25]);
        assert!(!heap.set_weight(a, 0));
    }

    #[test]
    fn equal_weights_keep_root_on_push() {
        let mut heap = IndexedHeap::new();
        let x = heap.push("x", 0);
        heap.push("y", 0);
        heap.push("z", 0);
        // A pushed tie never displaces its parent.
        assert_eq!(heap.peek_min_id(), Some(x));
    }

    #[test]
    fn handles_survive_reuse() {
        let mut heap = IndexedHeap::with_capacity(2);
        let a = heap.push(String::from("a"), 1);
        heap.remove(a);
        let b = heap.push(String::from("b"), 2);
        heap.get_mut(b).unwrap().push('!');
        assert_eq!(heap.get(b).map(String::as_str), Some("b!"));
        assert_eq!(heap.iter().count(), 1);

        heap.clear();
        assert!(heap.is_empty());
        heap.validate().unwrap();
    }

    #[derive(Debug, Clone)]
    enum Op {
        Push(u64),
        Pop,
        Remove(usize),
        Bump(usize),
        Set(usize, u64),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0u64..20).prop_map(Op::Push),
            Just(Op::Pop),
            any::<usize>().prop_map(Op::Remove),
            any::<usize>().prop_map(Op::Bump),
            (any::<usize>(), 0u64..20).prop_map(|(i, w)| Op::Set(i, w)),
        ]
    }

    proptest! {
        /// Property: any interleaving keeps positions in sync and pops the global minimum.
        #[cfg_attr(miri, ignore)]
        #[test]
        fn prop_heap_matches_model(ops in prop::collection::vec(op_strategy(), 0..200)) {
            let mut heap = IndexedHeap::new();
            let mut live: Vec<(SlotId, u64)> = Vec::new();

            for op in ops {
                match op {
                    Op::Push(w) => {
                        let id = heap.push(w, w);
                        live.push((id, w));
                    }
                    Op::Pop => {
                        let expected = live.iter().map(|&(_, w)| w).min();
                        let popped = heap.pop_min().map(|(_, w)| w);
                        prop_assert_eq!(popped, expected);
                        if let Some(w) = popped {
                            let idx = live.iter().position(|&(id, lw)| lw == w && !heap.contains(id)).unwrap();
                            live.swap_remove(idx);
                        }
                    }
                    Op::Remove(i) if !live.is_empty() => {
                        let (id, _) = live.swap_remove(i % live.len());
                        prop_assert!(heap.remove(id).is_some());
                    }
                    Op::Bump(i) if !live.is_empty() => {
                        let idx = i % live.len();
                        live[idx].1 += 1;
                        prop_assert_eq!(heap.increment(live[idx].0), Some(live[idx].1));
                    }
                    Op::Set(i, w) if !live.is_empty() => {
                        let idx = i % live.len();
                        live[idx].1 = w;
                        prop_assert!(heap.set_weight(live[idx].0, w));
                    }
                    _ => {}
                }
                prop_assert!(heap.validate().is_ok());
                prop_assert_eq!(heap.len(), live.len());
            }
        }
    }
}
