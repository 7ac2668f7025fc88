#![no_main]

use std::fmt::Debug;

use libfuzzer_sys::arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use rbtree::{NodeRef, RbTree};

#[derive(Debug, Arbitrary)]
enum Action<Key, Value> {
    Clear,
    Insert(Key, Value),
    Get(Key),
    Find(Key),
    Remove(Key),
    /// Remove a previously returned handle, which may be stale by now.
    RemoveHandle(usize),
    Cursor(Option<Key>, Vec<CursorAction>),
}

#[derive(Arbitrary, Debug)]
enum CursorAction {
    Next,
    Prev,
}

#[derive(Arbitrary, Debug)]
enum KeyType<Value> {
    U8(Vec<Action<u8, Value>>),
    U16(Vec<Action<u16, Value>>),
    U64(Vec<Action<u64, Value>>),
}

#[derive(Arbitrary, Debug)]
struct Input {
    unique: bool,
    actions: KeyType<u16>,
}

fn run<Key, Value>(actions: Vec<Action<Key, Value>>, unique: bool)
where
    Key: Ord + Copy + Debug,
    Value: Eq + Copy + Debug,
{
    let mut tree = RbTree::new(unique);
    // sorted by key, equal keys in insertion order
    let mut vec: Vec<(Key, Value, NodeRef)> = vec![];
    let mut handles: Vec<NodeRef> = vec![];

    for action in actions {
        match action {
            Action::Clear => {
                tree.clear();
                vec.clear();
            }
            Action::Insert(key, value) => {
                let (node, old) = tree.replace(key, value);
                handles.push(node);

                let index = vec.partition_point(|(k, _, _)| *k <= key);
                if unique && index > 0 && vec[index - 1].0 == key {
                    assert_eq!(old, Some(vec[index - 1].1));
                    assert_eq!(node, vec[index - 1].2);
                    vec[index - 1].1 = value;
                } else {
                    assert_eq!(old, None);
                    vec.insert(index, (key, value, node));
                }
            }
            Action::Get(key) => {
                let expected = vec.iter().any(|(k, _, _)| *k == key);
                assert_eq!(tree.get(&key).is_some(), expected);
                assert_eq!(tree.contains_key(&key), expected);
            }
            Action::Find(key) => {
                let mut found = tree.find(&key);
                let mut expected: Vec<_> = vec
                    .iter()
                    .filter(|(k, _, _)| *k == key)
                    .map(|(_, _, node)| *node)
                    .collect();
                assert_eq!(found.len(), expected.len());
                found.sort_unstable_by_key(|n| vec.iter().position(|(_, _, m)| m == n));
                expected.sort_unstable_by_key(|n| vec.iter().position(|(_, _, m)| m == n));
                assert_eq!(found, expected);
            }
            Action::Remove(key) => {
                let expected = vec.iter().filter(|(k, _, _)| *k == key).count();
                assert_eq!(tree.remove(&key), expected);
                vec.retain(|(k, _, _)| *k != key);
            }
            Action::RemoveHandle(i) => {
                if handles.is_empty() {
                    continue;
                }
                let node = handles[i % handles.len()];
                let removed = tree.remove_node(node);
                match vec.iter().position(|(_, _, n)| *n == node) {
                    Some(index) => {
                        let (key, value, _) = vec.remove(index);
                        assert_eq!(removed, Some((key, value)));
                    }
                    None => assert_eq!(removed, None),
                }
            }
            Action::Cursor(start, cursor_actions) => {
                let mut index = start
                    .and_then(|key| vec.iter().position(|(k, _, _)| *k >= key))
                    .unwrap_or(0);
                let mut cursor = match vec.get(index) {
                    Some((_, _, node)) => tree.cursor(*node),
                    None => tree.cursor_front(),
                };

                for action in cursor_actions {
                    if cursor.node().is_none() {
                        break;
                    }
                    match action {
                        CursorAction::Next => {
                            cursor.move_next();
                            index += 1;
                        }
                        CursorAction::Prev => {
                            cursor.move_prev();
                            index = index.wrapping_sub(1);
                        }
                    }
                    assert_eq!(
                        cursor.get().map(|(k, v)| (*k, *v)),
                        vec.get(index).map(|(k, v, _)| (*k, *v))
                    );
                }
            }
        }

        tree.assert_valid();
        assert_eq!(tree.size(), vec.len());
    }

    let entries: Vec<_> = tree.iter().map(|(k, v)| (*k, *v)).collect();
    let expected: Vec<_> = vec.iter().map(|(k, v, _)| (*k, *v)).collect();
    assert_eq!(entries, expected);
}

fuzz_target!(|input: Input| {
    match input.actions {
        KeyType::U8(actions) => run(actions, input.unique),
        KeyType::U16(actions) => run(actions, input.unique),
        KeyType::U64(actions) => run(actions, input.unique),
    }
});
