use core::cmp::Ordering;
use core::fmt;

use crate::node::{Color, Idx, SENTINEL};
use crate::{Compare, NodeRef, RbTree};

/// A broken tree invariant, reported by [`RbTree::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    /// The sentinel was colored red or given children.
    CorruptSentinel,
    /// The root node is red.
    RedRoot,
    /// A red node has a red child.
    RedChildOfRed {
        /// The red child.
        node: NodeRef,
    },
    /// Two paths from `node` down to the sentinel pass a different number of black nodes.
    BlackHeightMismatch {
        /// The node whose subtrees disagree.
        node: NodeRef,
        /// Black height of the left subtree.
        left: usize,
        /// Black height of the right subtree.
        right: usize,
    },
    /// A child does not point back at its parent, or the root has a parent.
    BrokenParentLink {
        /// The node with the wrong parent link.
        node: NodeRef,
    },
    /// `node` sorts after its in-order successor.
    OutOfOrder {
        /// The node that is out of place.
        node: NodeRef,
    },
    /// The recorded size does not match the number of reachable nodes.
    SizeMismatch {
        /// What [`RbTree::size`] reports.
        recorded: usize,
        /// How many nodes are actually linked into the tree.
        reachable: usize,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::CorruptSentinel => write!(f, "sentinel must be a childless black node"),
            Violation::RedRoot => write!(f, "root must be black"),
            Violation::RedChildOfRed { node } => {
                write!(f, "red node {node:?} has a red parent")
            }
            Violation::BlackHeightMismatch { node, left, right } => write!(
                f,
                "black height mismatch below {node:?}: left subtree {left}, right subtree {right}"
            ),
            Violation::BrokenParentLink { node } => {
                write!(f, "parent link of {node:?} does not match the tree structure")
            }
            Violation::OutOfOrder { node } => {
                write!(f, "{node:?} compares greater than its in-order successor")
            }
            Violation::SizeMismatch {
                recorded,
                reachable,
            } => write!(
                f,
                "tree records {recorded} entries but {reachable} are reachable"
            ),
        }
    }
}

impl core::error::Error for Violation {}

impl<K, V, C> RbTree<K, V, C>
where
    C: Compare<K>,
{
    /// Checks every red-black and binary-search-tree invariant, returning the black height of
    /// the tree (the number of black nodes on any path from the root down to, but excluding, the
    /// sentinel).
    ///
    /// # Errors
    ///
    /// Returns the first [`Violation`] found.
    pub fn validate(&self) -> Result<usize, Violation> {
        let sentinel = self.nodes.links(SENTINEL);
        if sentinel.color != Color::Black || sentinel.left != SENTINEL || sentinel.right != SENTINEL
        {
            return Err(Violation::CorruptSentinel);
        }

        if self.root == SENTINEL {
            return if self.size() == 0 {
                Ok(0)
            } else {
                Err(Violation::SizeMismatch {
                    recorded: self.size(),
                    reachable: 0,
                })
            };
        }

        if self.nodes.is_red(self.root) {
            return Err(Violation::RedRoot);
        }
        if self.nodes.parent(self.root) != SENTINEL {
            return Err(Violation::BrokenParentLink {
                node: self.nodes.handle(self.root),
            });
        }

        let black_height = self.validate_subtree(self.root)?;

        // walk the whole sequence to check ordering across subtrees, not just parent/child pairs
        let mut reachable = 1;
        let mut curr = self.nodes.minimum(self.root);
        let mut next = self.nodes.successor(curr);
        while next != SENTINEL {
            if self.cmp.compare(self.nodes.key(curr), self.nodes.key(next)) == Ordering::Greater {
                return Err(Violation::OutOfOrder {
                    node: self.nodes.handle(curr),
                });
            }
            reachable += 1;
            curr = next;
            next = self.nodes.successor(curr);
        }

        if reachable != self.size() {
            return Err(Violation::SizeMismatch {
                recorded: self.size(),
                reachable,
            });
        }

        Ok(black_height)
    }

    /// Asserts as many of the tree's invariants as possible.
    ///
    /// # Panics
    ///
    /// Panics with a description of the first [`Violation`] found.
    #[track_caller]
    pub fn assert_valid(&self) {
        if let Err(violation) = self.validate() {
            panic!("red-black tree invariant violated: {violation}");
        }
    }

    /// Returns the black height of the subtree rooted at `node`, counting `node` itself if it is
    /// black but not the sentinel.
    fn validate_subtree(&self, node: Idx) -> Result<usize, Violation> {
        if node == SENTINEL {
            return Ok(0);
        }

        let links = self.nodes.links(node);

        for child in [links.left, links.right] {
            if child == SENTINEL {
                continue;
            }
            if self.nodes.parent(child) != node {
                return Err(Violation::BrokenParentLink {
                    node: self.nodes.handle(child),
                });
            }
            if links.color == Color::Red && self.nodes.is_red(child) {
                return Err(Violation::RedChildOfRed {
                    node: self.nodes.handle(child),
                });
            }
        }

        let left = self.validate_subtree(links.left)?;
        let right = self.validate_subtree(links.right)?;
        if left != right {
            return Err(Violation::BlackHeightMismatch {
                node: self.nodes.handle(node),
                left,
                right,
            });
        }

        Ok(left + usize::from(links.color == Color::Black))
    }
}

impl<K, V, C> RbTree<K, V, C> {
    /// Returns the number of nodes on the longest path from the root to a leaf, or 0 for an empty
    /// tree.
    ///
    /// For a valid tree this never exceeds `2log2(size + 1)`.
    pub fn height(&self) -> usize {
        self.height_of(self.root)
    }

    fn height_of(&self, node: Idx) -> usize {
        if node == SENTINEL {
            return 0;
        }
        1 + self
            .height_of(self.nodes.left(node))
            .max(self.height_of(self.nodes.right(node)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::Side;

    #[test]
    fn empty_tree_is_valid() {
        let tree: RbTree<u32, ()> = RbTree::new(true);
        assert_eq!(tree.validate(), Ok(0));
        assert_eq!(tree.height(), 0);
    }

    #[test]
    fn detects_red_root() {
        let mut tree = RbTree::new(true);
        let node = tree.insert(1, ());
        tree.nodes.set_color(node.index(), Color::Red);

        assert_eq!(tree.validate(), Err(Violation::RedRoot));
    }

    #[test]
    fn detects_black_height_mismatch() {
        let mut tree = RbTree::new(true);
        for i in [2, 1, 3] {
            tree.insert(i, ());
        }
        let left = tree.find_first(&1).unwrap();
        tree.nodes.set_color(left.index(), Color::Black);

        let root = tree.find_first(&2).unwrap();
        assert_eq!(
            tree.validate(),
            Err(Violation::BlackHeightMismatch {
                node: root,
                left: 1,
                right: 0
            })
        );
    }

    #[test]
    fn detects_out_of_order_keys() {
        let mut tree = RbTree::new(true);
        for i in [2, 1, 3] {
            tree.insert(i, ());
        }
        // swap the children so 3 sits left of 2
        let root = tree.root;
        let (l, r) = (tree.nodes.left(root), tree.nodes.right(root));
        tree.nodes.set_child(root, Side::Left, r);
        tree.nodes.set_child(root, Side::Right, l);

        assert!(matches!(
            tree.validate(),
            Err(Violation::OutOfOrder { .. })
        ));
    }

    #[test]
    fn violation_messages_are_readable() {
        let msg = alloc::format!(
            "{}",
            Violation::SizeMismatch {
                recorded: 3,
                reachable: 2
            }
        );
        assert_eq!(msg, "tree records 3 entries but 2 are reachable");
    }

    #[test]
    #[should_panic(expected = "root must be black")]
    fn assert_valid_panics_on_violation() {
        let mut tree = RbTree::new(true);
        let node = tree.insert(1, ());
        tree.nodes.set_color(node.index(), Color::Red);
        tree.assert_valid();
    }
}
