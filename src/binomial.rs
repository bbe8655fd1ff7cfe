//! Binomial Heap implementation
//!
//! A binomial heap is a forest of heap-ordered binomial trees with:
//! - O(log n) union, the reason this variant exists
//! - O(1) amortized, O(log n) worst-case insert
//! - O(log n) extract_min
//!
//! # Algorithm Overview
//!
//! **Binomial Tree Bₖ**: Recursively defined:
//! - B₀ is a single node
//! - Bₖ is formed by linking two B_{k-1} trees: the root that is not smaller
//!   becomes the last child of the other
//! - Bₖ has exactly 2ᵏ nodes and k children, of orders 0, 1, ..., k-1 in
//!   attachment order
//!
//! **Invariant**: The root list holds at most one tree per order, sorted by
//! strictly increasing order. The orders present are exactly the set bits of
//! `len`, the same way the digits of a binary number are.
//!
//! **Union** is binary addition over that representation:
//! 1. Merge both root lists into one list sorted by order (stable)
//! 2. Walk it with a scratch array indexed by order. A tree landing on an
//!    occupied slot is linked with the occupant, producing a tree one order
//!    higher that moves on to the next slot (the carry)
//! 3. Read the occupied slots back out in ascending order
//!
//! **Insert** is a union with a one-node heap. **Extract-min** removes the
//! root with the smallest key; its children already form a valid root list
//! and are unioned back in.
//!
//! # Ties
//!
//! When two linked roots hold equal keys, the left operand stays the root.
//! During union the left operand is the tree that reached the scratch slot
//! first, so trees from the receiving heap win over trees from the merged-in
//! one. Extract-min picks the lowest-order root among equal minimums.
//!
//! # Example
//!
//! ```rust
//! use mergeable_heaps::binomial::BinomialHeap;
//! use mergeable_heaps::{Key, PriorityQueue};
//!
//! let mut left = BinomialHeap::new();
//! left.insert_many([10, 20].map(|lo| Key::new(0, lo)));
//! let mut right = BinomialHeap::new();
//! right.insert_many([30, 40, 50].map(|lo| Key::new(0, lo)));
//!
//! let mut heap = left.union(right);
//! assert_eq!(heap.len(), 5);
//! assert_eq!(heap.orders().collect::<Vec<_>>(), vec![0, 2]);
//! assert_eq!(heap.extract_min(), Some(Key::new(0, 10)));
//! ```

use std::fmt;

use smallvec::SmallVec;

use crate::key::Key;
use crate::traits::{write_bracketed, PriorityQueue};

/// Scratch slots kept inline during union; enough for heaps of up to 2¹⁵ keys.
const INLINE_ORDERS: usize = 16;

/// A heap-ordered binomial tree
///
/// A tree of order k holds exactly 2ᵏ keys. Its size is always derived from
/// `order` and never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinomialTree {
    key: Key,
    order: u32,
    /// Subtrees in attachment order, which is ascending order
    children: Vec<BinomialTree>,
}

impl BinomialTree {
    /// A one-node tree of order 0
    pub fn singleton(key: Key) -> Self {
        BinomialTree {
            key,
            order: 0,
            children: Vec::new(),
        }
    }

    /// The root key, the minimum of the tree
    pub fn key(&self) -> &Key {
        &self.key
    }

    pub fn order(&self) -> u32 {
        self.order
    }

    /// Number of keys in the tree, 2^order
    pub fn len(&self) -> usize {
        1 << self.order
    }

    /// A binomial tree is never empty
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn children(&self) -> &[BinomialTree] {
        &self.children
    }

    /// Checks the heap-order property over the whole tree
    pub fn is_heap_ordered(&self) -> bool {
        self.children
            .iter()
            .all(|child| self.key <= child.key && child.is_heap_ordered())
    }

    /// Checks heap order plus binomial shape: k children of orders 0..k-1
    pub fn is_well_formed(&self) -> bool {
        self.children.len() == self.order as usize
            && self.children.iter().enumerate().all(|(i, child)| {
                child.order as usize == i && self.key <= child.key && child.is_well_formed()
            })
    }

    fn attach(&mut self, child: BinomialTree) {
        self.children.push(child);
        self.order += 1;
    }
}

/// Links two trees of equal order into one tree of the next order
///
/// The root that is not smaller becomes the last child of the other. On
/// equal keys `left` stays the root.
///
/// # Panics
///
/// Panics if the orders differ. Only the heap's own union calls this with
/// trees it has paired by order, so a mismatch is a bug.
pub fn tree_merge(left: BinomialTree, right: BinomialTree) -> BinomialTree {
    assert_eq!(
        left.order, right.order,
        "tree_merge requires trees of equal order"
    );

    let (mut parent, child) = if right.key < left.key {
        (right, left)
    } else {
        (left, right)
    };
    parent.attach(child);
    parent
}

impl fmt::Display for BinomialTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}", self.key)?;
        for child in &self.children {
            write!(f, ", {}", child)?;
        }
        f.write_str(")")
    }
}

/// Binomial Heap
///
/// # Example
///
/// ```rust
/// use mergeable_heaps::binomial::BinomialHeap;
/// use mergeable_heaps::{Key, PriorityQueue};
///
/// let mut heap = BinomialHeap::new();
/// for lo in [80, 70, 60, 50, 40, 30, 20, 10] {
///     heap.insert(Key::new(0, lo));
/// }
/// assert_eq!(heap.roots().len(), 1);
/// assert_eq!(heap.roots()[0].order(), 3);
/// assert_eq!(heap.peek(), Some(&Key::new(0, 10)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BinomialHeap {
    /// Root list sorted by strictly increasing order
    trees: Vec<BinomialTree>,
    /// Number of keys, the sum of 2^order over `trees`
    len: usize,
}

impl PriorityQueue for BinomialHeap {
    fn new() -> Self {
        Self {
            trees: Vec::new(),
            len: 0,
        }
    }

    fn len(&self) -> usize {
        self.len
    }

    /// Unions a one-node heap into this one
    ///
    /// **Time Complexity**: O(1) amortized, O(log n) worst-case when every
    /// order from 0 up is occupied and the carry ripples through all of them.
    fn insert(&mut self, key: Key) {
        self.merge(BinomialHeap {
            trees: vec![BinomialTree::singleton(key)],
            len: 1,
        });
    }

    /// Scans the O(log n) roots
    fn peek(&self) -> Option<&Key> {
        self.trees.iter().map(BinomialTree::key).min()
    }

    /// Removes the minimum root and unions its children back in
    ///
    /// **Time Complexity**: O(log n)
    ///
    /// The children of a Bₖ root are B₀, B₁, ..., B_{k-1} in that order, so
    /// they are already a valid root list holding 2ᵏ - 1 keys.
    fn extract_min(&mut self) -> Option<Key> {
        let index = self.min_root_index()?;
        let BinomialTree {
            key,
            order,
            children,
        } = self.trees.remove(index);
        self.len -= 1 << order;

        self.merge(BinomialHeap {
            trees: children,
            len: (1 << order) - 1,
        });

        Some(key)
    }

    /// Carry-propagating union
    ///
    /// **Time Complexity**: O(log n)
    ///
    /// Both root lists are sorted by order, so step 1 is a linear stable
    /// merge. Each link in step 2 removes one tree, which bounds the links by
    /// the number of input roots.
    fn merge(&mut self, other: Self) {
        if other.trees.is_empty() {
            return;
        }
        if self.trees.is_empty() {
            *self = other;
            return;
        }

        let len = self.len + other.len;
        let (left_roots, right_roots) = (self.trees.len(), other.trees.len());
        let roots = merge_root_lists(std::mem::take(&mut self.trees), other.trees);

        // The largest order that fits in len is bit_length(len) - 1.
        let slots = (usize::BITS - len.leading_zeros()) as usize;
        let mut scratch: SmallVec<[Option<BinomialTree>; INLINE_ORDERS]> =
            (0..slots).map(|_| None).collect();
        let mut carries = 0usize;

        for mut tree in roots {
            let mut order = tree.order as usize;
            while let Some(occupant) = scratch[order].take() {
                tree = tree_merge(occupant, tree);
                carries += 1;
                order += 1;
            }
            scratch[order] = Some(tree);
        }

        self.trees = scratch.into_iter().flatten().collect();
        self.len = len;

        tracing::trace!(
            left_roots,
            right_roots,
            carries,
            roots = self.trees.len(),
            len,
            "binomial union"
        );

        debug_assert!(
            self.root_orders_match_len(),
            "binomial root orders {:?} do not spell len {}",
            self.orders().collect::<Vec<_>>(),
            self.len
        );
    }

    fn to_debug_string(&self) -> String {
        self.to_string()
    }
}

impl BinomialHeap {
    /// The root list, in ascending order
    pub fn roots(&self) -> &[BinomialTree] {
        &self.trees
    }

    /// Orders of the roots, strictly increasing
    pub fn orders(&self) -> impl Iterator<Item = u32> + '_ {
        self.trees.iter().map(BinomialTree::order)
    }

    /// Checks the heap-order property of every tree
    pub fn is_heap_ordered(&self) -> bool {
        self.trees.iter().all(BinomialTree::is_heap_ordered)
    }

    /// Checks every structural invariant
    ///
    /// - each tree is heap-ordered and binomially shaped
    /// - root orders are strictly increasing
    /// - the orders are exactly the set bits of `len`
    pub fn is_well_formed(&self) -> bool {
        self.root_orders_match_len() && self.trees.iter().all(BinomialTree::is_well_formed)
    }

    fn root_orders_match_len(&self) -> bool {
        let increasing = self.trees.windows(2).all(|w| w[0].order < w[1].order);
        let bits = self
            .trees
            .iter()
            .fold(0usize, |bits, tree| bits | (1 << tree.order));
        increasing && bits == self.len
    }

    /// Index of the root with the smallest key, the first one on ties
    fn min_root_index(&self) -> Option<usize> {
        let mut best: Option<(usize, &Key)> = None;
        for (i, tree) in self.trees.iter().enumerate() {
            match best {
                Some((_, key)) if !tree.key.less_than(key) => {}
                _ => best = Some((i, &tree.key)),
            }
        }
        best.map(|(i, _)| i)
    }
}

/// Stable merge of two root lists sorted by order
///
/// On equal orders the tree from `left` comes first.
fn merge_root_lists(left: Vec<BinomialTree>, right: Vec<BinomialTree>) -> Vec<BinomialTree> {
    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();

    loop {
        let take_left = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => l.order <= r.order,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => break,
        };
        let next = if take_left { left.next() } else { right.next() };
        merged.extend(next);
    }

    merged
}

impl fmt::Display for BinomialHeap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_bracketed(f, &self.trees)
    }
}

impl FromIterator<Key> for BinomialHeap {
    fn from_iter<I: IntoIterator<Item = Key>>(iter: I) -> Self {
        let mut heap = Self::new();
        heap.build_from(iter);
        heap
    }
}

impl Extend<Key> for BinomialHeap {
    fn extend<I: IntoIterator<Item = Key>>(&mut self, iter: I) {
        self.insert_many(iter);
    }
}
