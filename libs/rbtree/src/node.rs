use alloc::vec::Vec;
use core::mem;

use crate::utils::Side;

/// Offset of a slot inside a [`NodePool`].
///
/// This is a `u32` to keep [`Links`] small; the pool refuses to grow past `u32::MAX` slots.
pub(crate) type Idx = u32;

/// The shared "absent" node.
///
/// Slot 0 of every pool is reserved for it. It is always black, never carries an entry, and is
/// used for every missing child as well as the parent of the root, so rotation and fixup code
/// never has to special-case a missing edge. Deletion may transiently write its parent link.
pub(crate) const SENTINEL: Idx = 0;

/// The color of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Black,
}

/// A stable handle to an entry in an [`RbTree`](crate::RbTree).
///
/// Handles are returned by insertion, lookup and navigation, and stay valid across rotations
/// and the removal of *other* entries. Once the entry itself is removed the handle becomes stale
/// and every method taking it returns `None`, even after its slot has been reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef {
    idx: Idx,
    generation: u32,
}

impl NodeRef {
    #[inline]
    pub(crate) fn index(self) -> Idx {
        self.idx
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Links {
    pub(crate) parent: Idx,
    pub(crate) left: Idx,
    pub(crate) right: Idx,
    pub(crate) color: Color,
}

impl Links {
    const DETACHED: Self = Self {
        parent: SENTINEL,
        left: SENTINEL,
        right: SENTINEL,
        color: Color::Black,
    };
}

struct Slot<K, V> {
    links: Links,
    generation: u32,
    entry: Option<(K, V)>,
}

/// Arena of tree nodes addressed by [`Idx`], with a free list of vacated slots.
pub(crate) struct NodePool<K, V> {
    slots: Vec<Slot<K, V>>,
    free: Vec<Idx>,
}

impl<K, V> NodePool<K, V> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity.saturating_add(1));
        slots.push(Slot {
            links: Links::DETACHED,
            generation: 0,
            entry: None,
        });

        Self {
            slots,
            free: Vec::new(),
        }
    }

    /// Allocates a new red, childless node holding `key` and `value`.
    ///
    /// # Panics
    ///
    /// Panics if the pool would need more than `u32::MAX` slots.
    pub(crate) fn alloc(&mut self, key: K, value: V) -> Idx {
        let links = Links {
            color: Color::Red,
            ..Links::DETACHED
        };

        if let Some(idx) = self.free.pop() {
            let slot = &mut self.slots[idx as usize];
            debug_assert!(slot.entry.is_none(), "free list handed out occupied slot {idx}");
            slot.links = links;
            slot.entry = Some((key, value));
            return idx;
        }

        let Ok(idx) = Idx::try_from(self.slots.len()) else {
            panic!("node pool exhausted: cannot address more than {} nodes", Idx::MAX);
        };
        self.slots.push(Slot {
            links,
            generation: 0,
            entry: Some((key, value)),
        });
        idx
    }

    /// Vacates the slot at `idx`, returning its entry.
    ///
    /// Bumping the generation is what turns outstanding [`NodeRef`]s to this slot stale.
    pub(crate) fn free(&mut self, idx: Idx) -> (K, V) {
        debug_assert_ne!(idx, SENTINEL, "attempted to free the sentinel");
        let slot = &mut self.slots[idx as usize];
        let Some(entry) = slot.entry.take() else {
            unreachable!("slot {idx} freed twice");
        };
        slot.links = Links::DETACHED;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(idx);
        entry
    }

    /// Vacates every occupied slot while keeping the allocation around.
    pub(crate) fn clear(&mut self) {
        self.free.clear();
        for (idx, slot) in (0..).zip(self.slots.iter_mut()).skip(1) {
            if slot.entry.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
            slot.links = Links::DETACHED;
            self.free.push(idx);
        }
        // hand out low indices first
        self.free.reverse();
        self.slots[SENTINEL as usize].links = Links::DETACHED;
    }

    /// Returns the slot index behind `node`, or `None` if the handle is stale.
    #[inline]
    pub(crate) fn resolve(&self, node: NodeRef) -> Option<Idx> {
        let idx = node.index();
        if idx == SENTINEL {
            return None;
        }
        let slot = self.slots.get(idx as usize)?;
        (slot.generation == node.generation && slot.entry.is_some()).then_some(idx)
    }

    #[inline]
    pub(crate) fn handle(&self, idx: Idx) -> NodeRef {
        debug_assert_ne!(idx, SENTINEL, "the sentinel has no public handle");
        NodeRef {
            idx,
            generation: self.slots[idx as usize].generation,
        }
    }

    /// Converts an index into a handle, mapping the sentinel to `None`.
    #[inline]
    pub(crate) fn link(&self, idx: Idx) -> Option<NodeRef> {
        (idx != SENTINEL).then(|| self.handle(idx))
    }

    #[inline]
    pub(crate) fn entry(&self, idx: Idx) -> &(K, V) {
        let Some(entry) = &self.slots[idx as usize].entry else {
            unreachable!("slot {idx} is linked into the tree but vacant");
        };
        entry
    }

    #[inline]
    pub(crate) fn key(&self, idx: Idx) -> &K {
        &self.entry(idx).0
    }

    #[inline]
    pub(crate) fn value_mut(&mut self, idx: Idx) -> &mut V {
        let Some((_, value)) = &mut self.slots[idx as usize].entry else {
            unreachable!("slot {idx} is linked into the tree but vacant");
        };
        value
    }

    pub(crate) fn replace_value(&mut self, idx: Idx, value: V) -> V {
        mem::replace(self.value_mut(idx), value)
    }

    #[inline]
    pub(crate) fn links(&self, idx: Idx) -> &Links {
        &self.slots[idx as usize].links
    }

    #[inline]
    fn links_mut(&mut self, idx: Idx) -> &mut Links {
        &mut self.slots[idx as usize].links
    }

    #[inline]
    pub(crate) fn parent(&self, idx: Idx) -> Idx {
        self.links(idx).parent
    }
    #[inline]
    pub(crate) fn left(&self, idx: Idx) -> Idx {
        self.links(idx).left
    }
    #[inline]
    pub(crate) fn right(&self, idx: Idx) -> Idx {
        self.links(idx).right
    }
    #[inline]
    pub(crate) fn child(&self, idx: Idx, side: Side) -> Idx {
        match side {
            Side::Left => self.left(idx),
            Side::Right => self.right(idx),
        }
    }
    #[inline]
    pub(crate) fn color(&self, idx: Idx) -> Color {
        self.links(idx).color
    }
    #[inline]
    pub(crate) fn is_red(&self, idx: Idx) -> bool {
        self.color(idx) == Color::Red
    }
    #[inline]
    pub(crate) fn is_black(&self, idx: Idx) -> bool {
        self.color(idx) == Color::Black
    }

    /// Which side of its parent `idx` hangs off. Meaningless for the root.
    #[inline]
    pub(crate) fn side_of(&self, idx: Idx) -> Side {
        if self.left(self.parent(idx)) == idx {
            Side::Left
        } else {
            Side::Right
        }
    }

    #[inline]
    pub(crate) fn set_parent(&mut self, idx: Idx, parent: Idx) {
        self.links_mut(idx).parent = parent;
    }
    #[inline]
    pub(crate) fn set_child(&mut self, idx: Idx, side: Side, child: Idx) {
        debug_assert_ne!(idx, SENTINEL, "the sentinel never has children");
        let links = self.links_mut(idx);
        match side {
            Side::Left => links.left = child,
            Side::Right => links.right = child,
        }
    }
    #[inline]
    pub(crate) fn set_color(&mut self, idx: Idx, color: Color) {
        debug_assert!(
            idx != SENTINEL || color == Color::Black,
            "the sentinel must stay black"
        );
        self.links_mut(idx).color = color;
    }
}
