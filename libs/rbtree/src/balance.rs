//! Structural primitives and the red-black repair loops.
//!
//! Every loop here is written for one orientation only. The mirrored orientation falls out of
//! swapping `side` and `side.opposite()`, which is why none of these functions mention `left` or
//! `right` directly.

use crate::RbTree;
use crate::node::{Color, Idx, SENTINEL};
use crate::utils::Side;

impl<K, V, C> RbTree<K, V, C> {
    /// Rotates `x` down towards `side`, promoting its child on the opposite side.
    ///
    /// ```text
    ///      |                            |
    ///      y                            x
    ///     / \   <--- rotate(x, Left) --- / \
    ///    x   γ  --- rotate(y, Right) -> α   y
    ///   / \                                / \
    ///  α   β                              β   γ
    /// ```
    ///
    /// The in-order sequence of the subtree is unchanged. If `x` was the root, the promoted child
    /// becomes the new root.
    pub(crate) fn rotate(&mut self, x: Idx, side: Side) {
        let up = side.opposite();
        let y = self.nodes.child(x, up);
        debug_assert_ne!(y, SENTINEL, "cannot rotate {side} at {x} without a {up} child");

        // β moves from y over to x
        let beta = self.nodes.child(y, side);
        self.nodes.set_child(x, up, beta);
        if beta != SENTINEL {
            self.nodes.set_parent(beta, x);
        }

        // y takes x's place under x's parent
        let parent = self.nodes.parent(x);
        self.nodes.set_parent(y, parent);
        self.replace_child(parent, x, y);

        self.nodes.set_child(y, side, x);
        self.nodes.set_parent(x, y);
    }

    /// Points whichever edge of `parent` referenced `old` at `new` instead.
    ///
    /// A sentinel `parent` means `old` was the root.
    fn replace_child(&mut self, parent: Idx, old: Idx, new: Idx) {
        if parent == SENTINEL {
            self.root = new;
        } else if self.nodes.left(parent) == old {
            self.nodes.set_child(parent, Side::Left, new);
        } else {
            debug_assert_eq!(self.nodes.right(parent), old);
            self.nodes.set_child(parent, Side::Right, new);
        }
    }

    /// Replaces the subtree rooted at `u` with the subtree rooted at `v`.
    ///
    /// `v`'s parent link is written even when `v` is the sentinel; deletion fixup relies on that
    /// to climb out of an empty slot.
    pub(crate) fn transplant(&mut self, u: Idx, v: Idx) {
        let parent = self.nodes.parent(u);
        self.replace_child(parent, u, v);
        self.nodes.set_parent(v, parent);
    }

    /// Restores the red-black rules after `z` was linked in as a red leaf.
    pub(crate) fn balance_after_insert(&mut self, mut z: Idx) {
        while self.nodes.is_red(self.nodes.parent(z)) {
            // a red parent is never the root, so the grandparent is a real node
            let parent = self.nodes.parent(z);
            let grandparent = self.nodes.parent(parent);
            let side = self.nodes.side_of(parent);
            let uncle = self.nodes.child(grandparent, side.opposite());

            if self.nodes.is_red(uncle) {
                tracing::trace!(node = z, grandparent, "red uncle, recoloring");
                self.nodes.set_color(parent, Color::Black);
                self.nodes.set_color(uncle, Color::Black);
                self.nodes.set_color(grandparent, Color::Red);
                z = grandparent;
                continue;
            }

            if z == self.nodes.child(parent, side.opposite()) {
                // inner grandchild, straighten it out into the outer case
                tracing::trace!(node = z, "black uncle, inner grandchild, rotating {side} at parent");
                z = parent;
                self.rotate(z, side);
            }

            let parent = self.nodes.parent(z);
            let grandparent = self.nodes.parent(parent);
            tracing::trace!(node = z, grandparent, "black uncle, outer grandchild, rotating at grandparent");
            self.nodes.set_color(parent, Color::Black);
            self.nodes.set_color(grandparent, Color::Red);
            self.rotate(grandparent, side.opposite());
        }

        self.nodes.set_color(self.root, Color::Black);
    }

    /// Restores black-height uniformity after a black node was spliced out above `x`.
    ///
    /// `x` carries an "extra black" that is pushed up the tree until it can be absorbed by a red
    /// node, resolved by rotations, or reaches the root.
    pub(crate) fn balance_after_remove(&mut self, mut x: Idx) {
        while x != self.root && self.nodes.is_black(x) {
            let parent = self.nodes.parent(x);
            let side = if self.nodes.left(parent) == x {
                Side::Left
            } else {
                Side::Right
            };
            let mut sibling = self.nodes.child(parent, side.opposite());

            if self.nodes.is_red(sibling) {
                tracing::trace!(node = x, sibling, "red sibling, rotating {side} at parent");
                self.nodes.set_color(sibling, Color::Black);
                self.nodes.set_color(parent, Color::Red);
                self.rotate(parent, side);
                sibling = self.nodes.child(parent, side.opposite());
            }

            let near = self.nodes.child(sibling, side);
            let far = self.nodes.child(sibling, side.opposite());

            if self.nodes.is_black(near) && self.nodes.is_black(far) {
                tracing::trace!(node = x, sibling, "black sibling with black children, moving up");
                self.nodes.set_color(sibling, Color::Red);
                x = parent;
                continue;
            }

            if self.nodes.is_black(far) {
                tracing::trace!(node = x, sibling, "red near nephew, rotating at sibling");
                self.nodes.set_color(near, Color::Black);
                self.nodes.set_color(sibling, Color::Red);
                self.rotate(sibling, side.opposite());
                sibling = self.nodes.child(parent, side.opposite());
            }

            tracing::trace!(node = x, sibling, "red far nephew, rotating {side} at parent");
            self.nodes.set_color(sibling, self.nodes.color(parent));
            self.nodes.set_color(parent, Color::Black);
            self.nodes
                .set_color(self.nodes.child(sibling, side.opposite()), Color::Black);
            self.rotate(parent, side);
            x = self.root;
        }

        self.nodes.set_color(x, Color::Black);
    }

    /// Unlinks `z` from the tree structure and rebalances. The slot itself is left for the caller
    /// to free.
    pub(crate) fn unlink(&mut self, z: Idx) {
        let mut removed_color = self.nodes.color(z);
        let x;

        if self.nodes.left(z) == SENTINEL {
            x = self.nodes.right(z);
            self.transplant(z, x);
        } else if self.nodes.right(z) == SENTINEL {
            x = self.nodes.left(z);
            self.transplant(z, x);
        } else {
            // two children: the successor takes z's place, and its own slot is what we remove
            let y = self.nodes.minimum(self.nodes.right(z));
            removed_color = self.nodes.color(y);
            x = self.nodes.right(y);

            if self.nodes.parent(y) == z {
                self.nodes.set_parent(x, y);
            } else {
                self.transplant(y, x);
                let right = self.nodes.right(z);
                self.nodes.set_child(y, Side::Right, right);
                self.nodes.set_parent(right, y);
            }

            self.transplant(z, y);
            let left = self.nodes.left(z);
            self.nodes.set_child(y, Side::Left, left);
            self.nodes.set_parent(left, y);
            self.nodes.set_color(y, self.nodes.color(z));
        }

        if removed_color == Color::Black {
            self.balance_after_remove(x);
        }

        // the sentinel may have been used as a temporary anchor above
        self.nodes.set_parent(SENTINEL, SENTINEL);
    }
}
