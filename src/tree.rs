//! Pointer-linked binary heap
//!
//! The same complete binary min-heap as [`ArrayHeap`](crate::array::ArrayHeap),
//! but stored as linked nodes with parent back-references instead of an
//! implicit array layout. Nodes live in a [`SlotMap`] arena and refer to each
//! other by arena handles, so parent links never form ownership cycles; removed
//! slots are reused by later inserts.
//!
//! # Navigation
//!
//! Positions are numbered 1..=n in level order. The path from the root to
//! position `p` is spelled by the bits of `p` below its leading one, most
//! significant first: `0` goes left, `1` goes right. The next free slot is
//! position `len + 1` and the last occupied one is position `len`.
//!
//! ```text
//!            1
//!        2       3        6 = 0b110 -> right, left
//!      4   5   6   7
//! ```
//!
//! # Time Complexity
//!
//! | Operation     | Complexity |
//! |---------------|------------|
//! | `insert`      | O(log n)   |
//! | `build_from`  | O(n)       |
//! | `extract_min` | O(log n)   |
//! | `merge`       | O(n + m)   |

use std::collections::VecDeque;
use std::fmt;

use slotmap::{new_key_type, SlotMap};

use crate::key::Key;
use crate::traits::{write_bracketed, PriorityQueue};

new_key_type! {
    /// Arena handle of a [`TreeHeap`] node
    struct NodeId;
}

#[derive(Debug, Clone)]
struct Node {
    key: Key,
    parent: Option<NodeId>,
    left: Option<NodeId>,
    right: Option<NodeId>,
}

impl Node {
    fn leaf(key: Key, parent: Option<NodeId>) -> Self {
        Node {
            key,
            parent,
            left: None,
            right: None,
        }
    }
}

/// A binary min-heap stored as a linked tree
///
/// The heap size is the arena's node count, so the fill position can never
/// drift from the actual shape.
#[derive(Debug, Clone, Default)]
pub struct TreeHeap {
    nodes: SlotMap<NodeId, Node>,
    root: Option<NodeId>,
}

impl PriorityQueue for TreeHeap {
    fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            root: None,
        }
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Attaches a leaf at the next level-order slot and bubbles it up
    fn insert(&mut self, key: Key) {
        let position = self.len() + 1;
        let Some(root) = self.root else {
            self.root = Some(self.nodes.insert(Node::leaf(key, None)));
            return;
        };

        let parent = self.node_at(root, position / 2);
        let id = self.nodes.insert(Node::leaf(key, Some(parent)));
        if position % 2 == 0 {
            self.nodes[parent].left = Some(id);
        } else {
            self.nodes[parent].right = Some(id);
        }

        self.bubble_up(id);
    }

    /// Level-order load followed by bottom-up sinking
    fn build_from<I: IntoIterator<Item = Key>>(&mut self, keys: I) {
        self.nodes.clear();
        self.root = None;

        // ids[p - 1] is the node at level-order position p
        let mut ids: Vec<NodeId> = Vec::new();
        for key in keys {
            let position = ids.len() + 1;
            let parent = (position > 1).then(|| ids[position / 2 - 1]);
            let id = self.nodes.insert(Node::leaf(key, parent));
            match parent {
                Some(parent) if position % 2 == 0 => self.nodes[parent].left = Some(id),
                Some(parent) => self.nodes[parent].right = Some(id),
                None => self.root = Some(id),
            }
            ids.push(id);
        }

        for &id in ids[..ids.len() / 2].iter().rev() {
            self.sink(id);
        }

        tracing::trace!(len = ids.len(), "tree heap built");
    }

    fn peek(&self) -> Option<&Key> {
        self.root.map(|root| &self.nodes[root].key)
    }

    /// Moves the last node's key to the root, unlinks the last node and sinks
    fn extract_min(&mut self) -> Option<Key> {
        let root = self.root?;
        let last = self.node_at(root, self.len());

        let removed = self
            .nodes
            .remove(last)
            .unwrap_or_else(|| panic!("tree heap: last node {:?} missing from arena", last));

        let min = match removed.parent {
            None => {
                self.root = None;
                removed.key
            }
            Some(parent) => {
                let parent_node = &mut self.nodes[parent];
                if parent_node.right == Some(last) {
                    parent_node.right = None;
                } else {
                    parent_node.left = None;
                }
                let min = std::mem::replace(&mut self.nodes[root].key, removed.key);
                let settled = self.sink(root);
                debug_assert!(
                    self.is_consistent_at(settled),
                    "tree heap links or order broken at {:?}",
                    settled
                );
                min
            }
        };

        Some(min)
    }

    fn merge(&mut self, other: Self) {
        if other.is_empty() {
            return;
        }
        let (left, right) = (self.len(), other.len());
        let keys: Vec<Key> = self
            .level_order()
            .chain(other.level_order())
            .collect();
        self.build_from(keys);
        tracing::trace!(left, right, "tree heaps merged");
    }

    fn to_debug_string(&self) -> String {
        self.to_string()
    }
}

impl TreeHeap {
    /// Creates an empty heap whose arena can hold `capacity` nodes without reallocating
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: SlotMap::with_capacity_and_key(capacity),
            root: None,
        }
    }

    /// Number of levels in the tree
    pub fn height(&self) -> usize {
        (usize::BITS - self.len().leading_zeros()) as usize
    }

    /// Keys in level order
    pub fn level_order(&self) -> impl Iterator<Item = Key> + '_ {
        let mut queue: VecDeque<NodeId> = self.root.into_iter().collect();
        std::iter::from_fn(move || {
            let id = queue.pop_front()?;
            let node = &self.nodes[id];
            queue.extend(node.left);
            queue.extend(node.right);
            Some(node.key)
        })
    }

    /// Checks that every node's key is >= its parent's key
    pub fn is_heap_ordered(&self) -> bool {
        self.nodes.values().all(|node| match node.parent {
            Some(parent) => self.nodes[parent].key <= node.key,
            None => true,
        })
    }

    /// Follows the level-order path from `root` to `position` (1-based)
    fn node_at(&self, root: NodeId, position: usize) -> NodeId {
        debug_assert!(position >= 1 && position <= self.len());
        let depth = usize::BITS - 1 - position.leading_zeros();
        let mut current = root;
        for shift in (0..depth).rev() {
            let node = &self.nodes[current];
            let next = if (position >> shift) & 1 == 0 {
                node.left
            } else {
                node.right
            };
            current = next.unwrap_or_else(|| {
                panic!("tree heap: no node at position {} of {}", position, self.len())
            });
        }
        current
    }

    fn swap_keys(&mut self, a: NodeId, b: NodeId) {
        let key_a = self.nodes[a].key;
        let key_b = std::mem::replace(&mut self.nodes[b].key, key_a);
        self.nodes[a].key = key_b;
    }

    /// Swap with parent while smaller than it
    fn bubble_up(&mut self, mut id: NodeId) {
        while let Some(parent) = self.nodes[id].parent {
            if self.nodes[id].key < self.nodes[parent].key {
                self.swap_keys(id, parent);
                id = parent;
            } else {
                break;
            }
        }
    }

    /// Swap with the smaller child while it is smaller than the node
    ///
    /// Returns the node the sunk key ends up in.
    fn sink(&mut self, mut id: NodeId) -> NodeId {
        loop {
            let node = &self.nodes[id];
            let mut smallest = id;
            let mut smallest_key = node.key;

            for child in [node.left, node.right].into_iter().flatten() {
                let child_key = self.nodes[child].key;
                if child_key < smallest_key {
                    smallest = child;
                    smallest_key = child_key;
                }
            }

            if smallest == id {
                return id;
            }
            self.swap_keys(id, smallest);
            id = smallest;
        }
    }

    /// Checks one node against its neighbours: links agree both ways and the
    /// key sits between its parent's and its children's keys
    fn is_consistent_at(&self, id: NodeId) -> bool {
        let node = &self.nodes[id];
        let above = match node.parent {
            Some(parent) => {
                let p = &self.nodes[parent];
                (p.left == Some(id) || p.right == Some(id)) && p.key <= node.key
            }
            None => self.root == Some(id),
        };
        let below = [node.left, node.right].into_iter().flatten().all(|child| {
            let c = &self.nodes[child];
            c.parent == Some(id) && node.key <= c.key
        });
        above && below
    }
}

impl fmt::Display for TreeHeap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_bracketed(f, self.level_order())
    }
}

impl FromIterator<Key> for TreeHeap {
    fn from_iter<I: IntoIterator<Item = Key>>(iter: I) -> Self {
        let mut heap = Self::new();
        heap.build_from(iter);
        heap
    }
}

impl Extend<Key> for TreeHeap {
    fn extend<I: IntoIterator<Item = Key>>(&mut self, iter: I) {
        self.insert_many(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::ArrayHeap;

    fn keys(values: &[u64]) -> Vec<Key> {
        values.iter().map(|&lo| Key::new(0, lo)).collect()
    }

    #[test]
    fn test_insert_ascending_layout() {
        let mut heap = TreeHeap::new();
        assert_eq!(heap.to_debug_string(), "[]");
        heap.insert(Key::new(0, 10));
        assert_eq!(heap.to_debug_string(), "[0-10]");
        heap.insert(Key::new(0, 20));
        assert_eq!(heap.to_debug_string(), "[0-10, 0-20]");
        heap.insert(Key::new(0, 30));
        assert_eq!(heap.to_debug_string(), "[0-10, 0-20, 0-30]");
        heap.insert(Key::new(0, 50));
        assert_eq!(heap.to_debug_string(), "[0-10, 0-20, 0-30, 0-50]");
        heap.insert(Key::new(0, 40));
        assert_eq!(heap.to_debug_string(), "[0-10, 0-20, 0-30, 0-50, 0-40]");
    }

    #[test]
    fn test_insert_descending_bubbles() {
        let mut heap = TreeHeap::new();
        heap.insert(Key::new(0, 50));
        heap.insert(Key::new(0, 40));
        assert_eq!(heap.to_debug_string(), "[0-40, 0-50]");
        heap.insert(Key::new(0, 30));
        assert_eq!(heap.to_debug_string(), "[0-30, 0-50, 0-40]");
        assert_eq!(heap.height(), 2);
    }

    #[test]
    fn test_extract_min_order() {
        let mut heap = TreeHeap::new();
        heap.insert_many(keys(&[50, 40, 30, 10, 20]));

        assert_eq!(heap.drain_sorted(), keys(&[10, 20, 30, 40, 50]));
        assert_eq!(heap.extract_min(), None);
        assert!(heap.is_empty());
        assert_eq!(heap.peek(), None);
    }

    #[test]
    fn test_layout_matches_array_heap() {
        let input = keys(&[13, 2, 99, 41, 7, 7, 60, 1, 38, 25, 5, 80]);
        let mut tree = TreeHeap::new();
        let mut array = ArrayHeap::new();
        tree.insert_many(input.clone());
        array.insert_many(input.clone());
        assert_eq!(tree.to_debug_string(), array.to_debug_string());

        for _ in 0..5 {
            assert_eq!(tree.extract_min(), array.extract_min());
            assert_eq!(tree.to_debug_string(), array.to_debug_string());
        }

        tree.build_from(input.clone());
        array.build_from(input);
        assert_eq!(tree.to_debug_string(), array.to_debug_string());
    }

    #[test]
    fn test_build_from_replaces_contents() {
        let mut heap = TreeHeap::new();
        heap.insert(Key::new(0, 1));
        heap.build_from(keys(&[50, 40, 30, 20, 10]));
        assert_eq!(heap.len(), 5);
        assert_eq!(heap.to_debug_string(), "[0-10, 0-20, 0-30, 0-50, 0-40]");
        assert!(heap.is_heap_ordered());
    }

    #[test]
    fn test_merge() {
        let mut heap1: TreeHeap = keys(&[10, 20]).into_iter().collect();
        let heap2: TreeHeap = keys(&[30, 40, 50]).into_iter().collect();

        let mut merged = heap1.clone().union(heap2);
        assert_eq!(merged.len(), 5);
        assert_eq!(merged.drain_sorted(), keys(&[10, 20, 30, 40, 50]));

        heap1.merge(TreeHeap::new());
        assert_eq!(heap1.len(), 2);
    }

    #[test]
    fn test_slots_reused_after_extract() {
        let mut heap = TreeHeap::with_capacity(8);
        for round in 0..3 {
            heap.insert_many(keys(&[8, 6, 4, 2]));
            assert_eq!(heap.drain_sorted(), keys(&[2, 4, 6, 8]), "round {}", round);
        }
        assert!(heap.is_empty());
    }

    #[test]
    fn test_sink_reports_settled_node() {
        let mut heap: TreeHeap = keys(&[1, 2, 3, 4, 5]).into_iter().collect();
        let root = heap.root.unwrap();

        heap.nodes[root].key = Key::new(0, 9);
        assert!(!heap.is_consistent_at(root));

        let settled = heap.sink(root);
        assert_eq!(heap.nodes[settled].key, Key::new(0, 9));
        assert!(heap.is_consistent_at(settled));
        assert!(heap.is_consistent_at(root));
        assert_eq!(heap.to_debug_string(), "[0-2, 0-4, 0-3, 0-9, 0-5]");
    }

    #[test]
    fn test_extract_keeps_links_consistent() {
        let mut heap: TreeHeap = keys(&[13, 2, 99, 41, 7, 7, 60, 1]).into_iter().collect();
        while heap.extract_min().is_some() {
            let ids: Vec<NodeId> = heap.nodes.keys().collect();
            assert!(ids.into_iter().all(|id| heap.is_consistent_at(id)));
        }
    }

    #[test]
    fn test_height() {
        let mut heap = TreeHeap::new();
        assert_eq!(heap.height(), 0);
        heap.insert_many(keys(&[1, 2, 3, 4]));
        assert_eq!(heap.height(), 3);
    }
}
