//! Array-backed binary heap
//!
//! The classic implicit binary min-heap: keys live in a `Vec` in level
//! order, the children of index `i` are at `2i + 1` and `2i + 2`, and its
//! parent at `(i - 1) / 2`.
//!
//! # Time Complexity
//!
//! | Operation     | Complexity |
//! |---------------|------------|
//! | `insert`      | O(log n)   |
//! | `build_from`  | O(n)       |
//! | `extract_min` | O(log n)   |
//! | `peek`        | O(1)       |
//! | `merge`       | O(n + m)   |
//!
//! Merging concatenates both backing vectors and re-heapifies, so it is
//! linear in the combined size. [`BinomialHeap`](crate::binomial::BinomialHeap)
//! exists for the logarithmic case.
//!
//! # Example
//!
//! ```rust
//! use mergeable_heaps::{ArrayHeap, Key, PriorityQueue};
//!
//! let mut heap = ArrayHeap::new();
//! heap.build_from([30, 10, 20].map(|lo| Key::new(0, lo)));
//!
//! assert_eq!(heap.extract_min(), Some(Key::new(0, 10)));
//! assert_eq!(heap.extract_min(), Some(Key::new(0, 20)));
//! assert_eq!(heap.extract_min(), Some(Key::new(0, 30)));
//! assert_eq!(heap.extract_min(), None);
//! ```

use std::fmt;

use crate::key::Key;
use crate::traits::{write_bracketed, PriorityQueue};

/// A binary min-heap stored in a contiguous vector
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArrayHeap {
    /// Keys in implicit complete-binary-tree order
    data: Vec<Key>,
}

impl PriorityQueue for ArrayHeap {
    fn new() -> Self {
        Self { data: Vec::new() }
    }

    fn len(&self) -> usize {
        self.data.len()
    }

    fn insert(&mut self, key: Key) {
        self.data.push(key);
        self.sift_up(self.data.len() - 1);
    }

    /// Floyd's bottom-up construction
    ///
    /// Loads all keys, then sifts down every internal node from the last one
    /// back to the root. O(n) overall.
    fn build_from<I: IntoIterator<Item = Key>>(&mut self, keys: I) {
        self.data.clear();
        self.data.extend(keys);
        self.heapify();
        tracing::trace!(len = self.data.len(), "array heap built");
    }

    fn peek(&self) -> Option<&Key> {
        self.data.first()
    }

    /// Moves the last key to the root and sinks it
    fn extract_min(&mut self) -> Option<Key> {
        if self.data.is_empty() {
            return None;
        }

        let min = self.data.swap_remove(0);
        if !self.data.is_empty() {
            let settled = self.sift_down(0);
            debug_assert!(
                self.is_ordered_at(settled),
                "array heap order violated at index {}",
                settled
            );
        }

        Some(min)
    }

    fn merge(&mut self, other: Self) {
        if other.data.is_empty() {
            return;
        }
        let (left, right) = (self.data.len(), other.data.len());
        self.data.extend(other.data);
        self.heapify();
        tracing::trace!(left, right, "array heaps merged");
    }

    fn to_debug_string(&self) -> String {
        self.to_string()
    }
}

impl ArrayHeap {
    /// Creates an empty heap that can hold `capacity` keys without reallocating
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// The backing vector in level order
    pub fn as_slice(&self) -> &[Key] {
        &self.data
    }

    /// Checks that every key is <= both of its children
    pub fn is_heap_ordered(&self) -> bool {
        (1..self.data.len()).all(|i| self.data[parent(i)] <= self.data[i])
    }

    fn heapify(&mut self) {
        let len = self.data.len();
        if len < 2 {
            return;
        }
        for index in (0..=parent(len - 1)).rev() {
            self.sift_down(index);
        }
    }

    /// Move key at index up while it is smaller than its parent
    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = parent(index);
            if self.data[index] < self.data[parent] {
                self.data.swap(index, parent);
                index = parent;
            } else {
                break;
            }
        }
    }

    /// Move key at index down, swapping with the smaller child each step
    ///
    /// Returns the index the key settles at.
    fn sift_down(&mut self, mut index: usize) -> usize {
        let len = self.data.len();
        loop {
            let left = 2 * index + 1;
            let right = left + 1;
            let mut smallest = index;

            if left < len && self.data[left] < self.data[smallest] {
                smallest = left;
            }
            if right < len && self.data[right] < self.data[smallest] {
                smallest = right;
            }

            if smallest == index {
                return index;
            }
            self.data.swap(index, smallest);
            index = smallest;
        }
    }

    /// Checks the key at `index` against its parent and children only
    fn is_ordered_at(&self, index: usize) -> bool {
        let key = self.data[index];
        let above = index == 0 || self.data[parent(index)] <= key;
        let below = [2 * index + 1, 2 * index + 2]
            .into_iter()
            .filter_map(|child| self.data.get(child))
            .all(|child| key <= *child);
        above && below
    }
}

#[inline]
fn parent(index: usize) -> usize {
    (index - 1) / 2
}

impl fmt::Display for ArrayHeap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_bracketed(f, &self.data)
    }
}

impl FromIterator<Key> for ArrayHeap {
    fn from_iter<I: IntoIterator<Item = Key>>(iter: I) -> Self {
        let mut heap = Self::new();
        heap.build_from(iter);
        heap
    }
}

impl Extend<Key> for ArrayHeap {
    fn extend<I: IntoIterator<Item = Key>>(&mut self, iter: I) {
        self.insert_many(iter);
    }
}
