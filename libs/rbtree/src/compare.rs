use core::cmp::Ordering;

/// A total order over keys of type `K`, injected into an [`RbTree`](crate::RbTree).
///
/// The tree never inspects keys itself; every placement and lookup decision is delegated to
/// `compare`. Implementations **must** describe a consistent total order for as long as the
/// tree holds any entries. An inconsistent comparator (one that changes its answer for the same
/// pair of keys, or is not transitive) is a logic error: lookups may miss entries and
/// [`RbTree::validate`](crate::RbTree::validate) may report ordering violations, though no
/// memory unsafety results.
///
/// Any closure `Fn(&K, &K) -> Ordering` is a comparator:
///
/// ```
/// use rbtree::RbTree;
///
/// let mut tree = RbTree::with_comparator(|a: &i32, b: &i32| b.cmp(a), false);
/// tree.insert(1, "one");
/// tree.insert(3, "three");
/// tree.insert(2, "two");
///
/// let keys: Vec<_> = tree.keys().copied().collect();
/// assert_eq!(keys, [3, 2, 1]);
/// ```
pub trait Compare<K: ?Sized> {
    /// Compares `a` against `b`.
    fn compare(&self, a: &K, b: &K) -> Ordering;
}

impl<K, F> Compare<K> for F
where
    K: ?Sized,
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self(a, b)
    }
}

/// Orders keys by their [`Ord`] implementation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NaturalOrder;

impl<K: Ord + ?Sized> Compare<K> for NaturalOrder {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}
