//! The priority-queue contract shared by every heap variant
//!
//! [`PriorityQueue`] is the common capability set of [`ArrayHeap`],
//! [`TreeHeap`] and [`BinomialHeap`]. All three are min-heaps over [`Key`]
//! and must yield identical extraction sequences for the same multiset of
//! keys, which lets tests drive them side by side.
//!
//! # Union ownership
//!
//! [`merge`](PriorityQueue::merge) and [`union`](PriorityQueue::union) take
//! the other heap by value. Its contents move into the result; nothing is
//! deep-copied. Clone a heap first if it must stay usable.
//!
//! [`ArrayHeap`]: crate::array::ArrayHeap
//! [`TreeHeap`]: crate::tree::TreeHeap
//! [`BinomialHeap`]: crate::binomial::BinomialHeap

use crate::key::Key;

/// Base trait for min-heaps over [`Key`]
///
/// # Example
///
/// ```rust
/// use mergeable_heaps::{ArrayHeap, Key, PriorityQueue};
///
/// let mut heap = ArrayHeap::new();
/// heap.insert(Key::new(0, 30));
/// heap.insert(Key::new(0, 10));
/// heap.insert(Key::new(0, 20));
///
/// assert_eq!(heap.peek(), Some(&Key::new(0, 10)));
/// assert_eq!(heap.extract_min(), Some(Key::new(0, 10)));
/// assert_eq!(heap.to_debug_string(), "[0-20, 0-30]");
/// ```
pub trait PriorityQueue: Sized {
    /// Creates a new empty heap
    fn new() -> Self;

    /// Returns the number of keys in the heap
    fn len(&self) -> usize;

    /// Returns true if the heap holds no keys
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Inserts a key
    ///
    /// # Time Complexity
    /// O(log n) for the binary variants, O(1) amortized for the binomial heap.
    fn insert(&mut self, key: Key);

    /// Inserts keys one at a time, in iteration order
    fn insert_many<I: IntoIterator<Item = Key>>(&mut self, keys: I) {
        for key in keys {
            self.insert(key);
        }
    }

    /// Replaces the heap contents with `keys`
    ///
    /// Variants with a bulk-construction algorithm override this.
    fn build_from<I: IntoIterator<Item = Key>>(&mut self, keys: I) {
        *self = Self::new();
        self.insert_many(keys);
    }

    /// Returns the minimum key without removing it
    fn peek(&self) -> Option<&Key>;

    /// Removes and returns the minimum key
    ///
    /// Returns `None` on an empty heap; this is the normal end of a drain loop
    /// and leaves the heap untouched.
    fn extract_min(&mut self) -> Option<Key>;

    /// Moves every key of `other` into this heap
    ///
    /// # Time Complexity
    /// O(n) rebuild for the binary variants, O(log n) for the binomial heap.
    fn merge(&mut self, other: Self);

    /// Combines two heaps into one, consuming both
    fn union(mut self, other: Self) -> Self {
        self.merge(other);
        self
    }

    /// Bracketed, comma-separated dump of the internal layout
    ///
    /// The binary variants list keys in level order (`"[0-10, 0-20]"`), the
    /// binomial heap lists its trees (`"[(0-30), (0-10, (0-20))]"`).
    fn to_debug_string(&self) -> String;

    /// Extracts every key, smallest first
    fn drain_sorted(&mut self) -> Vec<Key> {
        let mut out = Vec::with_capacity(self.len());
        while let Some(key) = self.extract_min() {
            out.push(key);
        }
        out
    }
}

/// Writes `items` as `"[a, b, c]"`
pub(crate) fn write_bracketed<I, T>(f: &mut std::fmt::Formatter<'_>, items: I) -> std::fmt::Result
where
    I: IntoIterator<Item = T>,
    T: std::fmt::Display,
{
    f.write_str("[")?;
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", item)?;
    }
    f.write_str("]")
}
