// SPDX-License-Identifier: MIT OR Apache-2.0

use chronoline_collections::SortedList;
use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;
use std::cmp::Ordering;

#[derive(Debug, Clone)]
enum Op {
    Insert(i16, u16),
    Remove(i16, u16),
    RemoveAt(usize),
    Get(usize),
    Set(usize, i16),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (-20i16..20, any::<u16>()).prop_map(|(key, tag)| Op::Insert(key, tag)),
        1 => (-20i16..20, any::<u16>()).prop_map(|(key, tag)| Op::Remove(key, tag)),
        1 => (0usize..48).prop_map(Op::RemoveAt),
        2 => (0usize..48).prop_map(Op::Get),
        1 => (0usize..48, -20i16..20).prop_map(|(index, key)| Op::Set(index, key)),
    ]
}

fn by_key(a: &(i16, u16), b: &(i16, u16)) -> Ordering {
    a.0.cmp(&b.0)
}

/// Stable-sorted model: new items go after every existing item with a key <= theirs
fn model_insert(model: &mut Vec<(i16, u16)>, item: (i16, u16)) {
    let position = model.partition_point(|existing| existing.0 <= item.0);
    model.insert(position, item);
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn sorted_list_matches_stable_model(ops in prop::collection::vec(op_strategy(), 1..96)) {
        let mut list = SortedList::new(by_key);
        let mut model: Vec<(i16, u16)> = Vec::new();

        for op in ops {
            match op {
                Op::Insert(key, tag) => {
                    let landed = list.insert((key, tag));
                    model_insert(&mut model, (key, tag));
                    prop_assert_eq!(model[landed], (key, tag));
                }
                Op::Remove(key, tag) => {
                    let expected = model.iter().position(|item| *item == (key, tag));
                    let removed = list.remove(&(key, tag));
                    prop_assert_eq!(removed, expected.is_some());
                    if let Some(position) = expected {
                        model.remove(position);
                    }
                }
                Op::RemoveAt(index) => {
                    let result = list.remove_at(index);
                    if index < model.len() {
                        prop_assert_eq!(result.ok(), Some(model.remove(index)));
                    } else {
                        prop_assert!(result.is_err());
                    }
                }
                Op::Get(index) => {
                    prop_assert_eq!(list.get(index).copied(), model.get(index).copied());
                }
                Op::Set(index, key) => {
                    let result = list.set(index, (key, 0));
                    if index < model.len() {
                        let old = model.remove(index);
                        model_insert(&mut model, (key, 0));
                        prop_assert_eq!(result.ok(), Some(old));
                    } else {
                        prop_assert!(result.is_err());
                    }
                }
            }

            prop_assert!(list.valid_prefix() <= list.len());
            prop_assert_eq!(list.len(), model.len());
        }

        let walked: Vec<_> = list.iter().copied().collect();
        prop_assert_eq!(&walked, &model);
        prop_assert!(walked.windows(2).all(|pair| pair[0].0 <= pair[1].0));

        for (position, expected) in model.iter().enumerate() {
            prop_assert_eq!(list.get(position), Some(expected));
        }
    }
}
