mod common;

use std::collections::HashSet;

use rand::Rng;
use rand::seq::SliceRandom;
use rbtree::RbTree;

use crate::common::{assert_sorted, keys_forward};

#[test]
fn find_returns_every_duplicate() {
    let mut tree = RbTree::new(false);
    for key in [4, 8, 8, 1, 8, 9] {
        tree.insert(key, ());
    }

    let found = tree.find(&8);
    assert_eq!(found.len(), 3);
    assert!(found.iter().all(|node| tree.key(*node) == Some(&8)));

    // no handle is reported twice
    let distinct: HashSet<_> = found.iter().copied().collect();
    assert_eq!(distinct.len(), 3);

    assert_eq!(tree.remove(&8), 3);
    assert_eq!(tree.size(), 3);
    assert!(tree.find(&8).is_empty());
    assert_eq!(keys_forward(&tree), [1, 4, 9]);
    tree.assert_valid();
}

#[test]
fn find_lists_match_then_successors_then_predecessors() {
    let mut tree = RbTree::new(false);
    let handles: Vec<_> = (0..7).map(|value| tree.insert(5, value)).collect();

    let found = tree.find(&5);
    assert_eq!(found.len(), handles.len());

    let hit = found[0];
    let pos = handles.iter().position(|h| *h == hit).unwrap();
    let mut expected = vec![hit];
    expected.extend_from_slice(&handles[pos + 1..]);
    expected.extend(handles[..pos].iter().rev());
    assert_eq!(found, expected);
}

#[test]
fn unique_tree_never_holds_duplicates() {
    let mut tree = RbTree::new(true);
    for (value, key) in [3, 3, 1, 3, 2, 1].into_iter().enumerate() {
        tree.insert(key, value);
    }

    assert_eq!(tree.size(), 3);
    assert_eq!(tree.get(&3), Some(&3));
    assert_eq!(tree.get(&1), Some(&5));
    assert_eq!(tree.find(&3).len(), 1);
    tree.assert_valid();
}

#[test]
fn map_mode_second_insert_wins() {
    let mut tree = RbTree::new(true);
    tree.insert("key", "first");
    tree.insert("key", "second");

    assert_eq!(tree.size(), 1);
    let found = tree.find(&"key");
    assert_eq!(found.len(), 1);
    assert_eq!(tree.value(found[0]), Some(&"second"));
}

#[test]
fn triple_insert_then_remove() {
    let mut tree = RbTree::new(false);
    for value in 0..3 {
        tree.insert('k', value);
    }

    assert_eq!(tree.find(&'k').len(), 3);
    assert_eq!(tree.remove(&'k'), 3);
    assert!(tree.is_empty());
    tree.assert_valid();
}

#[test]
fn duplicate_runs_stay_contiguous_under_churn() {
    let mut rng = rand::rng();
    let mut tree = RbTree::new(false);

    // lots of collisions across a small key space, inserted in random order and partially removed
    let mut keys: Vec<u8> = (0..2_000).map(|_| rng.random_range(0..16)).collect();
    keys.shuffle(&mut rng);
    for (value, key) in keys.iter().enumerate() {
        tree.insert(*key, value);
    }
    for key in [3, 7, 11] {
        tree.remove(&key);
    }
    tree.assert_valid();
    assert_sorted(&tree);

    for key in 0..16u8 {
        let expected = if [3, 7, 11].contains(&key) {
            0
        } else {
            keys.iter().filter(|k| **k == key).count()
        };
        assert_eq!(tree.find(&key).len(), expected, "key {key}");
    }
}
