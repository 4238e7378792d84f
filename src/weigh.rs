//! Byte-size measurement for cached values.
//!
//! The caches charge every entry against their byte budget using a weigher:
//! any `Fn(&V) -> usize`. [`ByteSize`] provides a default weigher for common
//! value types so that `LruCache::new` / `LfuCache::new` work out of the box.
//!
//! | Type                          | Reported size                        |
//! |-------------------------------|--------------------------------------|
//! | `str`, `String`               | UTF-8 length in bytes                |
//! | `[T]`, `Vec<T>`, `VecDeque<T>`| sum of element sizes                 |
//! | `u8`, `i32`, `f64`, ...       | `size_of::<T>()`                     |
//! | `bool`, `char`                | `size_of::<T>()`                     |
//! | `Box<T>`, `Arc<T>`, `Rc<T>`   | size of the pointee                  |
//! | `Option<T>`                   | size of the payload, 0 for `None`    |
//! | `(A, B)`, `(A, B, C)`         | sum of the parts                     |
//!
//! Sizes describe payload bytes, not allocator overhead. The caches do not
//! validate the result; a zero-sized value is stored and charged 0 bytes.
//!
//! ## Example
//!
//! ```
//! use bytecache::weigh::ByteSize;
//!
//! assert_eq!("hello".byte_size(), 5);
//! assert_eq!(vec![0u8; 100].byte_size(), 100);
//! assert_eq!(42u64.byte_size(), 8);
//! assert_eq!(Some(String::from("ab")).byte_size(), 2);
//! ```

use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::Arc;

/// Boxed weigher used by the caches.
pub type Weigher<V> = Box<dyn Fn(&V) -> usize + Send + Sync>;

/// Payload size of a value in bytes.
pub trait ByteSize {
    fn byte_size(&self) -> usize;
}

/// Returns a [`Weigher`] backed by [`ByteSize`].
pub fn byte_size_weigher<V>() -> Weigher<V>
where
    V: ByteSize + 'static,
{
    Box::new(|value: &V| value.byte_size())
}

/// Returns a [`Weigher`] that charges every value one unit.
///
/// Turns the byte budget into an entry-count budget.
pub fn unit_weigher<V>() -> Weigher<V>
where
    V: 'static,
{
    Box::new(|_: &V| 1)
}

macro_rules! fixed_size {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ByteSize for $ty {
                #[inline]
                fn byte_size(&self) -> usize {
                    std::mem::size_of::<$ty>()
                }
            }
        )*
    };
}

fixed_size!(
    u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64, bool, char,
);

impl ByteSize for () {
    fn byte_size(&self) -> usize {
        0
    }
}

impl ByteSize for str {
    #[inline]
    fn byte_size(&self) -> usize {
        self.len()
    }
}

impl ByteSize for String {
    #[inline]
    fn byte_size(&self) -> usize {
        self.len()
    }
}

impl<T: ByteSize> ByteSize for [T] {
    fn byte_size(&self) -> usize {
        self.iter().map(ByteSize::byte_size).sum()
    }
}

impl<T: ByteSize, const N: usize> ByteSize for [T; N] {
    fn byte_size(&self) -> usize {
        self.as_slice().byte_size()
    }
}

impl<T: ByteSize> ByteSize for Vec<T> {
    fn byte_size(&self) -> usize {
        self.as_slice().byte_size()
    }
}

impl<T: ByteSize> ByteSize for VecDeque<T> {
    fn byte_size(&self) -> usize {
        self.iter().map(ByteSize::byte_size).sum()
    }
}

impl<T: ByteSize + ?Sized> ByteSize for &T {
    fn byte_size(&self) -> usize {
        (**self).byte_size()
    }
}

impl<T: ByteSize + ?Sized> ByteSize for Box<T> {
    fn byte_size(&self) -> usize {
        (**self).byte_size()
    }
}

impl<T: ByteSize + ?Sized> ByteSize for Arc<T> {
    fn byte_size(&self) -> usize {
        (**self).byte_size()
    }
}

impl<T: ByteSize + ?Sized> ByteSize for Rc<T> {
    fn byte_size(&self) -> usize {
        (**self).byte_size()
    }
}

impl<T: ByteSize> ByteSize for Option<T> {
    fn byte_size(&self) -> usize {
        self.as_ref().map_or(0, ByteSize::byte_size)
    }
}

impl<A: ByteSize, B: ByteSize> ByteSize for (A, B) {
    fn byte_size(&self) -> usize {
        self.0.byte_size() + self.1.byte_size()
    }
}

impl<A: ByteSize, B: ByteSize, C: ByteSize> ByteSize for (A, B, C) {
    fn byte_size(&self) -> usize {
        self.0.byte_size() + self.1.byte_size() + self.2.byte_size()
    }
}
