//! Mergeable min-heaps over 128-bit keys
//!
//! This crate provides three priority-queue implementations over [`Key`],
//! a 128-bit unsigned value, all behind the [`PriorityQueue`] trait so they
//! can be swapped and cross-checked against each other.
//!
//! # Variants
//!
//! - **Array Heap**: implicit binary heap in a `Vec`; O(log n) insert and
//!   extract_min, O(n) bulk build; union re-heapifies in O(n)
//! - **Tree Heap**: the same binary heap as linked nodes with parent links,
//!   navigated by level-order position; union rebuilds in O(n)
//! - **Binomial Heap**: forest of binomial trees; O(log n) union by carry
//!   propagation, O(1) amortized insert, O(log n) extract_min
//!
//! Every union takes both heaps by value. Their keys move into the result.
//!
//! # Example
//!
//! ```rust
//! use mergeable_heaps::binomial::BinomialHeap;
//! use mergeable_heaps::{Key, PriorityQueue};
//!
//! let mut heap = BinomialHeap::new();
//! heap.insert(Key::from_hex("0xdf6943ba6d51464f6b02157933bdd9ad").unwrap());
//! heap.insert(Key::new(0, 10));
//!
//! assert_eq!(heap.extract_min(), Some(Key::new(0, 10)));
//! assert_eq!(heap.len(), 1);
//! ```

pub mod array;
pub mod binomial;
pub mod key;
pub mod traits;
pub mod tree;

pub use array::ArrayHeap;
pub use binomial::BinomialHeap;
pub use key::{Key, KeyParseError};
pub use traits::PriorityQueue;
pub use tree::TreeHeap;
