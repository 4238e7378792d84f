//! Ordering structures shared by the cache policies.
//!
//! - [`SlotArena`]: vector-backed storage handing out stable [`SlotId`]s.
//! - [`IntrusiveList`]: doubly linked list over a `SlotArena` (recency order).
//! - [`IndexedHeap`]: min-heap whose elements track their own heap index
//!   (frequency order).

pub mod indexed_heap;
pub mod intrusive_list;
pub mod slot_arena;

pub use indexed_heap::IndexedHeap;
pub use intrusive_list::IntrusiveList;
pub use slot_arena::{SlotArena, SlotId};
