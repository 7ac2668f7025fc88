use core::iter::FusedIterator;

use crate::RbTree;
use crate::node::{Idx, NodePool, NodeRef, SENTINEL};

impl<K, V> NodePool<K, V> {
    /// Leftmost node of the subtree rooted at `curr`.
    pub(crate) fn minimum(&self, mut curr: Idx) -> Idx {
        while self.left(curr) != SENTINEL {
            curr = self.left(curr);
        }
        curr
    }

    /// Rightmost node of the subtree rooted at `curr`.
    pub(crate) fn maximum(&self, mut curr: Idx) -> Idx {
        while self.right(curr) != SENTINEL {
            curr = self.right(curr);
        }
        curr
    }

    /// In-order successor of `node`, or the sentinel if `node` is the last node.
    pub(crate) fn successor(&self, node: Idx) -> Idx {
        // If we have a right child, its least descendant is our next node
        if self.right(node) != SENTINEL {
            return self.minimum(self.right(node));
        }

        // otherwise climb until we leave a left subtree, that parent is our next node
        let mut curr = node;
        let mut parent = self.parent(curr);
        while parent != SENTINEL && self.right(parent) == curr {
            curr = parent;
            parent = self.parent(curr);
        }
        parent
    }

    /// In-order predecessor of `node`, or the sentinel if `node` is the first node.
    pub(crate) fn predecessor(&self, node: Idx) -> Idx {
        // If we have a left child, its greatest descendant is our previous node
        if self.left(node) != SENTINEL {
            return self.maximum(self.left(node));
        }

        let mut curr = node;
        let mut parent = self.parent(curr);
        while parent != SENTINEL && self.left(parent) == curr {
            curr = parent;
            parent = self.parent(curr);
        }
        parent
    }
}

impl<K, V, C> RbTree<K, V, C> {
    /// Returns the node with the smallest key, or `None` if the tree is empty.
    ///
    /// With duplicate keys this is the earliest inserted of the smallest ones.
    pub fn first(&self) -> Option<NodeRef> {
        self.nodes.link(self.first_internal())
    }

    /// Returns the node with the greatest key, or `None` if the tree is empty.
    ///
    /// With duplicate keys this is the latest inserted of the greatest ones.
    pub fn last(&self) -> Option<NodeRef> {
        self.nodes.link(self.last_internal())
    }

    /// Returns the node following `node` in sorted order.
    ///
    /// Returns `None` if `node` is the last node, or if the handle is stale.
    pub fn next(&self, node: NodeRef) -> Option<NodeRef> {
        let idx = self.nodes.resolve(node)?;
        self.nodes.link(self.nodes.successor(idx))
    }

    /// Returns the node preceding `node` in sorted order.
    ///
    /// Returns `None` if `node` is the first node, or if the handle is stale.
    pub fn prev(&self, node: NodeRef) -> Option<NodeRef> {
        let idx = self.nodes.resolve(node)?;
        self.nodes.link(self.nodes.predecessor(idx))
    }

    /// Returns a [`Cursor`] pointing at `node`.
    ///
    /// A stale handle yields a cursor that points at nothing.
    pub fn cursor(&self, node: NodeRef) -> Cursor<'_, K, V, C> {
        Cursor {
            current: self.nodes.resolve(node).unwrap_or(SENTINEL),
            tree: self,
        }
    }

    /// Returns a [`Cursor`] pointing at the first node.
    pub fn cursor_front(&self) -> Cursor<'_, K, V, C> {
        Cursor {
            current: self.first_internal(),
            tree: self,
        }
    }

    /// Returns a [`Cursor`] pointing at the last node.
    pub fn cursor_back(&self) -> Cursor<'_, K, V, C> {
        Cursor {
            current: self.last_internal(),
            tree: self,
        }
    }

    /// Gets an iterator over the entries in the tree, sorted by their key.
    pub fn iter(&self) -> Iter<'_, K, V, C> {
        Iter {
            head: self.first_internal(),
            tail: self.last_internal(),
            remaining: self.size(),
            tree: self,
        }
    }

    /// Gets an iterator over the keys in the tree, in sorted order.
    pub fn keys(&self) -> Keys<'_, K, V, C> {
        Keys { inner: self.iter() }
    }

    /// Gets an iterator over the values in the tree, in the sorted order of their keys.
    pub fn values(&self) -> Values<'_, K, V, C> {
        Values { inner: self.iter() }
    }

    fn first_internal(&self) -> Idx {
        if self.root == SENTINEL {
            SENTINEL
        } else {
            self.nodes.minimum(self.root)
        }
    }

    fn last_internal(&self) -> Idx {
        if self.root == SENTINEL {
            SENTINEL
        } else {
            self.nodes.maximum(self.root)
        }
    }
}

impl<'a, K, V, C> IntoIterator for &'a RbTree<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A cursor which provides read-only access to a [`RbTree`].
///
/// Once a cursor moves past either end of the tree it points at nothing and stays there.
pub struct Cursor<'a, K, V, C> {
    current: Idx,
    tree: &'a RbTree<K, V, C>,
}

impl<K, V, C> Clone for Cursor<'_, K, V, C> {
    fn clone(&self) -> Self {
        Self {
            current: self.current,
            tree: self.tree,
        }
    }
}

impl<'a, K, V, C> Cursor<'a, K, V, C> {
    /// Returns the handle of the current node.
    pub fn node(&self) -> Option<NodeRef> {
        self.tree.nodes.link(self.current)
    }
    /// Returns the entry at the current node.
    pub fn get(&self) -> Option<(&'a K, &'a V)> {
        self.entry_at(self.current)
    }
    pub fn move_next(&mut self) {
        if self.current != SENTINEL {
            self.current = self.tree.nodes.successor(self.current);
        }
    }
    pub fn move_prev(&mut self) {
        if self.current != SENTINEL {
            self.current = self.tree.nodes.predecessor(self.current);
        }
    }
    /// Returns the entry after the current node without moving the cursor.
    pub fn peek_next(&self) -> Option<(&'a K, &'a V)> {
        if self.current == SENTINEL {
            return None;
        }
        self.entry_at(self.tree.nodes.successor(self.current))
    }
    /// Returns the entry before the current node without moving the cursor.
    pub fn peek_prev(&self) -> Option<(&'a K, &'a V)> {
        if self.current == SENTINEL {
            return None;
        }
        self.entry_at(self.tree.nodes.predecessor(self.current))
    }

    fn entry_at(&self, idx: Idx) -> Option<(&'a K, &'a V)> {
        let tree: &'a RbTree<K, V, C> = self.tree;
        (idx != SENTINEL).then(|| {
            let (key, value) = tree.nodes.entry(idx);
            (key, value)
        })
    }
}

/// An iterator over references to the entries of a [`RbTree`].
pub struct Iter<'a, K, V, C> {
    head: Idx,
    tail: Idx,
    remaining: usize,
    tree: &'a RbTree<K, V, C>,
}

impl<K, V, C> Clone for Iter<'_, K, V, C> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            head: self.head,
            tail: self.tail,
            remaining: self.remaining,
            tree: self.tree,
        }
    }
}

impl<'a, K, V, C> Iterator for Iter<'a, K, V, C> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let head = self.head;
        self.remaining -= 1;
        self.head = self.tree.nodes.successor(head);

        let (key, value) = self.tree.nodes.entry(head);
        Some((key, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V, C> DoubleEndedIterator for Iter<'_, K, V, C> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let tail = self.tail;
        self.remaining -= 1;
        self.tail = self.tree.nodes.predecessor(tail);

        let (key, value) = self.tree.nodes.entry(tail);
        Some((key, value))
    }
}

impl<K, V, C> ExactSizeIterator for Iter<'_, K, V, C> {}
impl<K, V, C> FusedIterator for Iter<'_, K, V, C> {}

/// An iterator over the keys of a [`RbTree`].
pub struct Keys<'a, K, V, C> {
    inner: Iter<'a, K, V, C>,
}

impl<'a, K, V, C> Iterator for Keys<'a, K, V, C> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, C> DoubleEndedIterator for Keys<'_, K, V, C> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(key, _)| key)
    }
}

impl<K, V, C> ExactSizeIterator for Keys<'_, K, V, C> {}
impl<K, V, C> FusedIterator for Keys<'_, K, V, C> {}

/// An iterator over the values of a [`RbTree`].
pub struct Values<'a, K, V, C> {
    inner: Iter<'a, K, V, C>,
}

impl<'a, K, V, C> Iterator for Values<'a, K, V, C> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, C> DoubleEndedIterator for Values<'_, K, V, C> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, value)| value)
    }
}

impl<K, V, C> ExactSizeIterator for Values<'_, K, V, C> {}
impl<K, V, C> FusedIterator for Values<'_, K, V, C> {}
