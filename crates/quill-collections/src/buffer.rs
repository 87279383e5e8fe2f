//! Growable typed buffer with explicit doubling growth.
//!
//! [`GrowableBuffer`] keeps its own notion of capacity so the growth policy
//! is exact and observable: capacity starts where the caller puts it and
//! doubles whenever a push would exceed it.

use std::ops::{Index, IndexMut};

/// Capacity used by [`GrowableBuffer::new`].
pub const DEFAULT_CAPACITY: usize = 16;

/// Contiguous, growable sequence of `T`.
///
/// The element stride is `size_of::<T>()`, fixed by the type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrowableBuffer<T> {
    items: Vec<T>,
    /// Logical capacity. The backing `Vec` always has at least this much room.
    capacity: usize,
}

impl<T> GrowableBuffer<T> {
    /// Create an empty buffer with [`DEFAULT_CAPACITY`] slots.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create an empty buffer with room for `capacity` elements.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero: doubling growth needs a non-zero start.
    #[track_caller]
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "buffer capacity is 0");
        Self {
            items: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an element, doubling capacity first if the buffer is full.
    pub fn push(&mut self, value: T) {
        if self.items.len() + 1 > self.capacity {
            self.resize(self.capacity * 2);
        }
        self.items.push(value);
    }

    /// Remove and return the last element.
    pub fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    /// Bounds-checked access.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// Bounds-checked mutable access.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    /// Set the capacity to exactly `new_capacity`.
    ///
    /// # Panics
    ///
    /// Panics if `new_capacity` is zero or smaller than the current length.
    #[track_caller]
    pub fn resize(&mut self, new_capacity: usize) {
        assert!(new_capacity > 0, "new capacity is 0");
        assert!(
            new_capacity >= self.items.len(),
            "new capacity {new_capacity} cannot hold {} elements",
            self.items.len(),
        );
        if new_capacity > self.items.capacity() {
            self.items.reserve_exact(new_capacity - self.items.len());
        } else {
            self.items.shrink_to(new_capacity);
        }
        self.capacity = new_capacity;
    }

    /// Remove every element, keeping the capacity.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the buffer holds no elements.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of elements the buffer can hold before growing.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Size of one element in bytes.
    pub fn stride(&self) -> usize {
        std::mem::size_of::<T>()
    }

    /// The last element, if any.
    pub fn last(&self) -> Option<&T> {
        self.items.last()
    }

    /// View the elements as a slice.
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// View the elements as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.items
    }

    /// Iterate over the elements.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Iterate mutably over the elements.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }
}

impl<T> Default for GrowableBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<usize> for GrowableBuffer<T> {
    type Output = T;

    #[track_caller]
    fn index(&self, index: usize) -> &T {
        let len = self.items.len();
        self.items
            .get(index)
            .unwrap_or_else(|| panic!("index {index} out of bounds for buffer of length {len}"))
    }
}

impl<T> IndexMut<usize> for GrowableBuffer<T> {
    #[track_caller]
    fn index_mut(&mut self, index: usize) -> &mut T {
        let len = self.items.len();
        self.items
            .get_mut(index)
            .unwrap_or_else(|| panic!("index {index} out of bounds for buffer of length {len}"))
    }
}

impl<T> Extend<T> for GrowableBuffer<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}

impl<T> FromIterator<T> for GrowableBuffer<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut buffer = Self::new();
        buffer.extend(iter);
        buffer
    }
}

impl<'a, T> IntoIterator for &'a GrowableBuffer<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_uses_default_capacity() {
        let buf: GrowableBuffer<u32> = GrowableBuffer::new();
        assert_eq!(buf.capacity(), DEFAULT_CAPACITY);
        assert!(buf.is_empty());
        assert_eq!(buf.stride(), 4);
    }

    #[test]
    fn push_doubles_when_full() {
        let mut buf = GrowableBuffer::with_capacity(2);
        buf.push(1u8);
        buf.push(2);
        assert_eq!(buf.capacity(), 2);
        buf.push(3);
        assert_eq!(buf.capacity(), 4);
        buf.push(4);
        buf.push(5);
        assert_eq!(buf.capacity(), 8);
        assert_eq!(buf.as_slice(), &[1, 2, 3, 4, 5]);
    }

    #[test]
    fn pop_removes_last() {
        let mut buf: GrowableBuffer<i32> = [1, 2, 3].into_iter().collect();
        assert_eq!(buf.pop(), Some(3));
        assert_eq!(buf.len(), 2);
        assert_eq!(buf.last(), Some(&2));
        buf.clear();
        assert_eq!(buf.pop(), None);
    }

    #[test]
    fn get_is_bounds_checked() {
        let mut buf: GrowableBuffer<i32> = [10, 20].into_iter().collect();
        assert_eq!(buf.get(1), Some(&20));
        assert_eq!(buf.get(2), None);
        *buf.get_mut(0).unwrap() = 11;
        buf[1] += 1;
        assert_eq!(buf[0], 11);
        assert_eq!(buf[1], 21);
    }

    #[test]
    #[should_panic(expected = "index 2 out of bounds for buffer of length 2")]
    fn index_past_end_panics() {
        let buf: GrowableBuffer<i32> = [10, 20].into_iter().collect();
        let _value = buf[2];
    }

    #[test]
    #[should_panic(expected = "buffer capacity is 0")]
    fn zero_capacity_rejected() {
        let _ = GrowableBuffer::<u8>::with_capacity(0);
    }

    #[test]
    fn resize_can_shrink_to_len() {
        let mut buf: GrowableBuffer<u16> = (0..5).collect();
        assert_eq!(buf.capacity(), DEFAULT_CAPACITY);
        buf.resize(5);
        assert_eq!(buf.capacity(), 5);
        buf.push(5);
        assert_eq!(buf.capacity(), 10);
    }

    #[test]
    #[should_panic(expected = "cannot hold 3 elements")]
    fn resize_below_len_panics() {
        let mut buf: GrowableBuffer<u8> = (0..3).collect();
        buf.resize(2);
    }

    #[test]
    fn iterators_visit_in_order() {
        let mut buf: GrowableBuffer<u32> = (1..=4).collect();
        for v in buf.iter_mut() {
            *v *= 10;
        }
        let seen: Vec<u32> = (&buf).into_iter().copied().collect();
        assert_eq!(seen, vec![10, 20, 30, 40]);
        assert_eq!(buf.iter().sum::<u32>(), 100);
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn matches_vec_model(
                start in 1usize..8,
                ops in proptest::collection::vec(proptest::option::of(any::<u16>()), 0..100),
            ) {
                let mut buf = GrowableBuffer::with_capacity(start);
                let mut model = Vec::new();
                for op in ops {
                    match op {
                        Some(v) => {
                            buf.push(v);
                            model.push(v);
                        }
                        None => prop_assert_eq!(buf.pop(), model.pop()),
                    }
                    prop_assert!(buf.len() <= buf.capacity());
                    prop_assert!(buf.capacity() >= start);
                    // Capacity only ever takes values start * 2^k.
                    prop_assert!((buf.capacity() / start).is_power_of_two());
                    prop_assert_eq!(buf.capacity() % start, 0);
                }
                prop_assert_eq!(buf.as_slice(), model.as_slice());
            }
        }
    }
}
