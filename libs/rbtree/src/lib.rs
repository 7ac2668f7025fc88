//! # An arena-backed red-black tree.
//!
//! A Rust implementation of classical red-black trees (as described by Cormen, Leiserson, Rivest
//! & Stein) that owns its entries and orders them with a caller-supplied comparator.
//!
//! Red-black trees are *self-balancing binary search trees*: every node is colored red or black,
//! and by keeping the root black, forbidding red nodes with red children, and requiring every
//! path from a node to its leaves to pass the same number of black nodes, the height of a tree
//! with `n` entries is bounded by `2log2(n + 1)`. Insertion, removal and lookup are all O(log n).
//!
//! Nodes live in an arena and refer to each other by index, with slot 0 reserved as the shared
//! black sentinel that stands in for every missing child and for the root's parent. Entries are
//! identified from the outside by [`NodeRef`] handles, which stay valid across rebalancing and are
//! detected as stale once their entry is removed.
//!
//! This crate is self-contained, contains no `unsafe`, and is fully `no_std` (it requires
//! `alloc`).
//!
//! ## map and multiset mode
//!
//! Trees are created either with *unique* keys, in which case inserting an existing key replaces
//! its value in place (like `BTreeMap`), or with duplicate keys allowed, in which case equal keys
//! coexist as a contiguous run in sorted order (later insertions sort after earlier ones).
//!
//! ```
//! use rbtree::RbTree;
//!
//! let mut tree = RbTree::new(false);
//! for key in [10, 3, 17, 7, 1, 0, 10, 12, 4, 5] {
//!     tree.insert(key, ());
//! }
//!
//! let keys: Vec<_> = tree.keys().copied().collect();
//! assert_eq!(keys, [0, 1, 3, 4, 5, 7, 10, 10, 12, 17]);
//!
//! assert_eq!(tree.find(&10).len(), 2);
//! assert_eq!(tree.remove(&10), 2);
//! assert_eq!(tree.size(), 8);
//! ```
//!
//! ## when not to use this
//!
//! - **no duplicate keys and no custom comparator** - `alloc::collections::BTreeMap` is faster for
//!   plain `Ord` maps thanks to its cache-friendly node layout.
//! - **concurrent mutation** - the tree has no interior synchronization; wrap it in a lock.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

mod balance;
mod compare;
mod cursors;
mod node;
mod utils;
mod validate;

use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt;

use crate::node::{Idx, NodePool, SENTINEL};
use crate::utils::Side;

pub use compare::{Compare, NaturalOrder};
pub use cursors::{Cursor, Iter, Keys, Values};
pub use node::{Color, NodeRef};
pub use validate::Violation;

/// A red-black tree mapping keys of type `K` to values of type `V`, ordered by `C`.
///
/// See the [crate-level documentation](crate) for an overview.
pub struct RbTree<K, V, C = NaturalOrder> {
    pub(crate) nodes: NodePool<K, V>,
    pub(crate) root: Idx,
    size: usize,
    unique: bool,
    cmp: C,
}

impl<K: Ord, V> Default for RbTree<K, V, NaturalOrder> {
    fn default() -> Self {
        Self::new(true)
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for RbTree<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Ord, V> RbTree<K, V, NaturalOrder> {
    /// Creates a new, empty tree ordered by `K`'s [`Ord`] implementation.
    ///
    /// With `unique` set, inserting a key that is already present replaces its value; otherwise
    /// equal keys are kept side by side.
    #[must_use]
    pub fn new(unique: bool) -> Self {
        Self::with_comparator(NaturalOrder, unique)
    }
}

impl<K, V, C> RbTree<K, V, C>
where
    C: Compare<K>,
{
    /// Creates a new, empty tree ordered by `cmp`.
    ///
    /// `cmp` must be a consistent total order, see [`Compare`].
    #[must_use]
    pub fn with_comparator(cmp: C, unique: bool) -> Self {
        Self::with_capacity_and_comparator(0, cmp, unique)
    }

    /// Creates a new, empty tree ordered by `cmp` with room for `capacity` entries before the
    /// node arena reallocates.
    #[must_use]
    pub fn with_capacity_and_comparator(capacity: usize, cmp: C, unique: bool) -> Self {
        Self {
            nodes: NodePool::with_capacity(capacity),
            root: SENTINEL,
            size: 0,
            unique,
            cmp,
        }
    }

    /// Inserts an entry into the tree, returning a handle to the node now holding `value`.
    ///
    /// If the tree has unique keys and `key` is already present, the existing node's value is
    /// overwritten and no node is created. Otherwise a new node is linked in after all entries
    /// comparing equal to `key`.
    ///
    /// # Panics
    ///
    /// Panics if the tree would hold more than `u32::MAX - 1` nodes.
    pub fn insert(&mut self, key: K, value: V) -> NodeRef {
        self.replace(key, value).0
    }

    /// Like [`insert`](Self::insert), but also returns the value that was overwritten, if any.
    ///
    /// The old value can only be `Some` for trees with unique keys.
    ///
    /// # Panics
    ///
    /// Panics if the tree would hold more than `u32::MAX - 1` nodes.
    pub fn replace(&mut self, key: K, value: V) -> (NodeRef, Option<V>) {
        let mut parent = SENTINEL;
        let mut curr = self.root;
        let mut side = Side::Left;

        while curr != SENTINEL {
            parent = curr;
            side = match self.cmp.compare(&key, self.nodes.key(curr)) {
                Ordering::Less => Side::Left,
                Ordering::Equal if self.unique => {
                    let old = self.nodes.replace_value(curr, value);
                    return (self.nodes.handle(curr), Some(old));
                }
                // ties descend right so equal keys keep their insertion order
                Ordering::Equal | Ordering::Greater => Side::Right,
            };
            curr = self.nodes.child(curr, side);
        }

        let z = self.nodes.alloc(key, value);
        self.nodes.set_parent(z, parent);
        if parent == SENTINEL {
            self.root = z;
        } else {
            self.nodes.set_child(parent, side, z);
        }

        self.size += 1;
        self.balance_after_insert(z);

        (self.nodes.handle(z), None)
    }

    /// Returns handles to every node whose key compares equal to `key`.
    ///
    /// The first handle is the node the search landed on, followed by its equal successors in
    /// ascending order and then its equal predecessors in descending order. The result is empty
    /// if no entry matches.
    pub fn find(&self, key: &K) -> Vec<NodeRef> {
        let hit = self.find_internal(key);
        if hit == SENTINEL {
            return Vec::new();
        }

        let mut found = Vec::new();
        found.push(self.nodes.handle(hit));

        let mut next = self.nodes.successor(hit);
        while next != SENTINEL && self.cmp.compare(key, self.nodes.key(next)).is_eq() {
            found.push(self.nodes.handle(next));
            next = self.nodes.successor(next);
        }

        let mut prev = self.nodes.predecessor(hit);
        while prev != SENTINEL && self.cmp.compare(key, self.nodes.key(prev)).is_eq() {
            found.push(self.nodes.handle(prev));
            prev = self.nodes.predecessor(prev);
        }

        found
    }

    /// Returns a handle to *a* node with the given key, without collecting its duplicates.
    pub fn find_first(&self, key: &K) -> Option<NodeRef> {
        self.nodes.link(self.find_internal(key))
    }

    /// Returns the value of a node with the given key.
    ///
    /// With duplicate keys, which of the equal entries is returned is unspecified.
    pub fn get(&self, key: &K) -> Option<&V> {
        let idx = self.find_internal(key);
        (idx != SENTINEL).then(|| &self.nodes.entry(idx).1)
    }

    /// Returns `true` if an entry with the given key is present.
    pub fn contains_key(&self, key: &K) -> bool {
        self.find_internal(key) != SENTINEL
    }

    /// Removes every entry whose key compares equal to `key`, returning how many were removed.
    ///
    /// Removing a key that is not present leaves the tree untouched and returns 0.
    pub fn remove(&mut self, key: &K) -> usize {
        let doomed = self.find(key);
        if doomed.len() > 1 {
            tracing::debug!(count = doomed.len(), "removing run of duplicate keys");
        }

        // handles survive the removal of their neighbours, so no re-search is needed
        for node in &doomed {
            let removed = self.remove_node(*node);
            debug_assert!(removed.is_some(), "duplicate run contained a stale handle");
        }

        doomed.len()
    }

    fn find_internal(&self, key: &K) -> Idx {
        let mut curr = self.root;
        while curr != SENTINEL {
            match self.cmp.compare(key, self.nodes.key(curr)) {
                Ordering::Less => curr = self.nodes.left(curr),
                Ordering::Greater => curr = self.nodes.right(curr),
                Ordering::Equal => return curr,
            }
        }
        SENTINEL
    }
}

impl<K, V, C> RbTree<K, V, C> {
    /// Returns the number of entries in the tree.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the number of entries in the tree. Same as [`size`](Self::size).
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if the tree contains no entries.
    pub fn is_empty(&self) -> bool {
        debug_assert_eq!(self.root == SENTINEL, self.size == 0);
        self.size == 0
    }

    /// Returns `true` if inserting an existing key replaces its value.
    pub fn has_unique_keys(&self) -> bool {
        self.unique
    }

    /// Returns the comparator ordering this tree.
    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    /// Removes the entry behind `node` and returns it.
    ///
    /// Returns `None` without touching the tree if `node` is stale, i.e. its entry was already
    /// removed.
    pub fn remove_node(&mut self, node: NodeRef) -> Option<(K, V)> {
        let idx = self.nodes.resolve(node)?;

        self.unlink(idx);
        self.size -= 1;

        Some(self.nodes.free(idx))
    }

    /// Removes all entries from the tree, keeping the allocated node storage.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = SENTINEL;
        self.size = 0;
    }

    /// Returns the key stored at `node`, or `None` if the handle is stale.
    pub fn key(&self, node: NodeRef) -> Option<&K> {
        self.entry(node).map(|(key, _)| key)
    }

    /// Returns the value stored at `node`, or `None` if the handle is stale.
    pub fn value(&self, node: NodeRef) -> Option<&V> {
        self.entry(node).map(|(_, value)| value)
    }

    /// Returns a mutable reference to the value stored at `node`, or `None` if the handle is
    /// stale.
    ///
    /// Keys are never handed out mutably since changing them would break the tree's ordering.
    pub fn value_mut(&mut self, node: NodeRef) -> Option<&mut V> {
        let idx = self.nodes.resolve(node)?;
        Some(self.nodes.value_mut(idx))
    }

    /// Returns the key and value stored at `node`, or `None` if the handle is stale.
    pub fn entry(&self, node: NodeRef) -> Option<(&K, &V)> {
        let idx = self.nodes.resolve(node)?;
        let (key, value) = self.nodes.entry(idx);
        Some((key, value))
    }

    /// Returns the color of `node`, or `None` if the handle is stale.
    pub fn color(&self, node: NodeRef) -> Option<Color> {
        let idx = self.nodes.resolve(node)?;
        Some(self.nodes.color(idx))
    }

    /// Returns `true` if `node` refers to an entry currently in this tree.
    pub fn contains_node(&self, node: NodeRef) -> bool {
        self.nodes.resolve(node).is_some()
    }
}

impl<K, V, C> Extend<(K, V)> for RbTree<K, V, C>
where
    C: Compare<K>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for RbTree<K, V, NaturalOrder> {
    /// Collects into a tree with unique keys, later pairs overwriting earlier ones.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = Self::default();
        tree.extend(iter);
        tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use rand::prelude::SliceRandom;

    #[test]
    fn random_inserts_and_removals() {
        let mut tree: RbTree<usize, usize> = RbTree::new(true);

        let mut rng = rand::rng();

        let mut nums = (0..50).collect::<Vec<_>>();
        nums.shuffle(&mut rng);

        for i in nums.clone() {
            tree.insert(i, i * 2);
            tree.assert_valid();
        }
        assert_eq!(tree.size(), 50);

        nums.shuffle(&mut rng);

        for i in nums {
            assert_eq!(tree.remove(&i), 1);
            tree.assert_valid();
        }
        assert!(tree.is_empty());
        assert_eq!(tree.first(), None);
    }

    #[test]
    fn random_inserts_and_searches() {
        let mut tree: RbTree<usize, usize> = RbTree::new(true);

        let mut rng = rand::rng();

        let mut nums = (0..50).collect::<Vec<_>>();
        nums.shuffle(&mut rng);

        for i in nums.clone() {
            tree.insert(i, i * 2);
        }

        nums.shuffle(&mut rng);

        for i in nums {
            assert_eq!(tree.get(&i), Some(&(i * 2)));
            let found = tree.find(&i);
            assert_eq!(found.len(), 1);
            assert_eq!(tree.key(found[0]), Some(&i));
        }
        assert!(tree.get(&50).is_none());
        assert!(tree.find(&50).is_empty());
    }

    #[test]
    fn unique_keys_overwrite_in_place() {
        let mut tree = RbTree::new(true);

        let first = tree.insert("a", 1);
        let (second, old) = tree.replace("a", 2);

        assert_eq!(first, second);
        assert_eq!(old, Some(1));
        assert_eq!(tree.size(), 1);
        assert_eq!(tree.value(first), Some(&2));
        tree.assert_valid();
    }

    #[test]
    fn duplicate_keys_keep_insertion_order() {
        let mut tree = RbTree::new(false);

        let a = tree.insert(5, 'a');
        let b = tree.insert(5, 'b');
        let c = tree.insert(5, 'c');
        tree.insert(1, 'x');
        tree.insert(9, 'y');

        assert_eq!(tree.size(), 5);
        let values: Vec<_> = tree.values().copied().collect();
        assert_eq!(values, ['x', 'a', 'b', 'c', 'y']);

        assert_eq!(tree.next(a), Some(b));
        assert_eq!(tree.next(b), Some(c));
        tree.assert_valid();
    }

    #[test]
    fn remove_node_returns_entry_and_invalidates_handle() {
        let mut tree = RbTree::new(true);
        let handles: Vec<_> = (0..16).map(|i| tree.insert(i, i * 10)).collect();

        assert_eq!(tree.remove_node(handles[7]), Some((7, 70)));
        assert_eq!(tree.remove_node(handles[7]), None);
        assert_eq!(tree.value(handles[7]), None);
        assert!(!tree.contains_node(handles[7]));

        // the freed slot gets reused, the stale handle must not alias the new entry
        let fresh = tree.insert(100, 1000);
        assert_eq!(fresh.index(), handles[7].index());
        assert_ne!(fresh, handles[7]);
        assert_eq!(tree.remove_node(handles[7]), None);
        assert_eq!(tree.size(), 16);

        // everything else survived the rebalancing untouched
        for (i, handle) in handles.iter().enumerate().filter(|(i, _)| *i != 7) {
            assert_eq!(tree.entry(*handle), Some((&i, &(i * 10))));
        }
        tree.assert_valid();
    }

    #[test]
    fn value_mut_updates_in_place() {
        let mut tree = RbTree::new(true);
        let node = tree.insert(3, String::from("three"));

        if let Some(value) = tree.value_mut(node) {
            value.push('!');
        }

        assert_eq!(tree.get(&3).map(String::as_str), Some("three!"));
    }

    #[test]
    fn clear_resets_tree() {
        let mut tree: RbTree<u32, ()> = (0..100).map(|i| (i, ())).collect();
        let node = tree.find_first(&42).unwrap();

        tree.clear();

        assert!(tree.is_empty());
        assert_eq!(tree.size(), 0);
        assert_eq!(tree.first(), None);
        assert_eq!(tree.last(), None);
        assert!(!tree.contains_node(node));
        tree.assert_valid();

        tree.insert(1, ());
        assert_eq!(tree.size(), 1);
        tree.assert_valid();
    }

    #[test]
    fn root_is_black_after_every_insert() {
        let mut tree = RbTree::new(false);
        for i in 0..32 {
            tree.insert(i, ());
            let root = tree.nodes.link(tree.root).unwrap();
            assert_eq!(tree.color(root), Some(Color::Black));
        }
    }

    #[test]
    fn debug_formats_as_map() {
        let tree: RbTree<u8, char> = [(2, 'b'), (1, 'a')].into_iter().collect();
        assert_eq!(alloc::format!("{tree:?}"), "{1: 'a', 2: 'b'}");
    }
}
