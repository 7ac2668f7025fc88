#![allow(unused, reason = "not used by all tests")]

use rbtree::{Compare, RbTree};
use tracing_subscriber::EnvFilter;

/// Routes the tree's `trace!` output through the test harness, filtered by `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Keys in the order produced by walking `next` from `first`.
pub fn keys_forward<K: Copy, V, C>(tree: &RbTree<K, V, C>) -> Vec<K> {
    let mut keys = Vec::with_capacity(tree.size());
    let mut curr = tree.first();
    while let Some(node) = curr {
        keys.push(*tree.key(node).unwrap());
        curr = tree.next(node);
    }
    keys
}

/// Keys in the order produced by walking `prev` from `last`.
pub fn keys_backward<K: Copy, V, C>(tree: &RbTree<K, V, C>) -> Vec<K> {
    let mut keys = Vec::with_capacity(tree.size());
    let mut curr = tree.last();
    while let Some(node) = curr {
        keys.push(*tree.key(node).unwrap());
        curr = tree.prev(node);
    }
    keys
}

/// Upper bound on the height of a red-black tree with `len` entries, `floor(2log2(len + 1))`.
pub fn max_height(len: usize) -> usize {
    // floor(2log2(x)) == floor(log2(x²))
    let x = u128::try_from(len).unwrap() + 1;
    (u128::BITS - (x * x).leading_zeros() - 1) as usize
}

pub fn assert_sorted<K: Ord + core::fmt::Debug, V, C: Compare<K>>(tree: &RbTree<K, V, C>) {
    let keys: Vec<_> = tree.keys().collect();
    assert!(
        keys.windows(2).all(|w| w[0] <= w[1]),
        "keys out of order: {keys:?}"
    );
}
