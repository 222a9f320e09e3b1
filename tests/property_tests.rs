//! Property-based tests using proptest
//!
//! These tests generate random sequences of operations and verify that the
//! heap invariants hold after every step, comparing against a sorted model.

use proptest::prelude::*;
use rust_binomial_heap::{BinomialHeap, HeapError};

/// One step of a random workload
#[derive(Debug, Clone)]
enum Op {
    Insert(i64),
    ExtractMin,
    /// Decrease the key found by searching for `model[index % len]`
    Decrease { index: usize, by: i64 },
    /// Delete the key found by searching for `model[index % len]`
    Delete { index: usize },
    /// Union with a heap built from these keys
    Union(Vec<i64>),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (-100i64..100).prop_map(Op::Insert),
        2 => Just(Op::ExtractMin),
        1 => (any::<usize>(), 0i64..50).prop_map(|(index, by)| Op::Decrease { index, by }),
        1 => any::<usize>().prop_map(|index| Op::Delete { index }),
        1 => prop::collection::vec(-100i64..100, 0..10).prop_map(Op::Union),
    ]
}

/// Removes one occurrence of `key` from a sorted model
fn remove_one(model: &mut Vec<i64>, key: i64) {
    if let Ok(pos) = model.binary_search(&key) {
        model.remove(pos);
    }
}

fn insert_sorted(model: &mut Vec<i64>, key: i64) {
    let pos = model.partition_point(|&k| k <= key);
    model.insert(pos, key);
}

/// Runs a workload, checking the heap against the model after every step
fn check_ops(ops: Vec<Op>) -> Result<(), TestCaseError> {
    let mut heap = BinomialHeap::new();
    let mut model: Vec<i64> = Vec::new();

    for op in ops {
        match op {
            Op::Insert(key) => {
                heap.insert(key);
                insert_sorted(&mut model, key);
            }
            Op::ExtractMin => {
                let expected = if model.is_empty() {
                    Err(HeapError::EmptyHeap)
                } else {
                    Ok(model.remove(0))
                };
                prop_assert_eq!(heap.extract_minimum(), expected);
            }
            Op::Decrease { index, by } => {
                if model.is_empty() {
                    continue;
                }
                let old = model[index % model.len()];
                let node = heap.search(old);
                prop_assert!(node.is_some(), "key {} present but not found", old);
                let node = node.unwrap();
                prop_assert_eq!(heap.get(node), Some(old));

                let new = old - by;
                prop_assert_eq!(heap.decrease_key(node, new), Ok(()));
                remove_one(&mut model, old);
                insert_sorted(&mut model, new);
                prop_assert!(heap.minimum().unwrap() <= new);
            }
            Op::Delete { index } => {
                if model.is_empty() {
                    continue;
                }
                let key = model[index % model.len()];
                let node = heap.search(key).unwrap();
                prop_assert_eq!(heap.delete(node), Ok(key));
                remove_one(&mut model, key);
            }
            Op::Union(keys) => {
                let other: BinomialHeap = keys.iter().copied().collect();
                let before = heap.len();
                heap = BinomialHeap::union(heap, other);
                prop_assert_eq!(heap.len(), before + keys.len());
                for key in keys {
                    insert_sorted(&mut model, key);
                }
            }
        }

        prop_assert!(heap.verify_internal_structure());
        prop_assert_eq!(heap.len(), model.len());
        prop_assert_eq!(heap.minimum(), model.first().copied());
    }

    Ok(())
}

/// Test that all extracted keys come out in non-decreasing order
fn check_extraction_order(values: Vec<i64>) -> Result<(), TestCaseError> {
    let mut heap: BinomialHeap = values.iter().copied().collect();
    prop_assert_eq!(heap.len(), values.len());

    let mut sorted = values;
    sorted.sort_unstable();

    let mut extracted = Vec::with_capacity(sorted.len());
    while let Ok(key) = heap.extract_minimum() {
        extracted.push(key);
    }
    prop_assert_eq!(extracted, sorted);
    prop_assert!(heap.is_empty());

    Ok(())
}

/// Test that the root list mirrors the binary representation of the size
fn check_root_degrees(values: Vec<i64>) -> Result<(), TestCaseError> {
    let heap: BinomialHeap = values.iter().copied().collect();

    let expected: Vec<usize> = (0..usize::BITS as usize)
        .filter(|bit| values.len() & (1 << bit) != 0)
        .collect();
    let degrees: Vec<usize> = heap.roots().map(|(_, d)| d).collect();
    prop_assert_eq!(degrees, expected);

    Ok(())
}

/// Test union conserves counts and keeps invariants
fn check_union(left: Vec<i64>, right: Vec<i64>) -> Result<(), TestCaseError> {
    let a: BinomialHeap = left.iter().copied().collect();
    let b: BinomialHeap = right.iter().copied().collect();

    let mut merged = BinomialHeap::union(a, b);
    prop_assert!(merged.verify_internal_structure());
    prop_assert_eq!(merged.len(), left.len() + right.len());

    let mut expected: Vec<i64> = left.into_iter().chain(right).collect();
    expected.sort_unstable();
    prop_assert_eq!(merged.minimum(), expected.first().copied());

    let mut extracted = Vec::new();
    while let Ok(key) = merged.extract_minimum() {
        extracted.push(key);
    }
    prop_assert_eq!(extracted, expected);

    Ok(())
}

proptest! {
    #[test]
    fn test_random_operations(ops in prop::collection::vec(op_strategy(), 0..200)) {
        check_ops(ops)?;
    }

    #[test]
    fn test_extraction_order(values in prop::collection::vec(any::<i64>(), 0..200)) {
        check_extraction_order(values)?;
    }

    #[test]
    fn test_root_degrees_match_size_bits(values in prop::collection::vec(-1000i64..1000, 0..300)) {
        check_root_degrees(values)?;
    }

    #[test]
    fn test_union_invariant(
        left in prop::collection::vec(-100i64..100, 0..64),
        right in prop::collection::vec(-100i64..100, 0..64)
    ) {
        check_union(left, right)?;
    }

    #[test]
    fn test_increase_is_rejected(values in prop::collection::vec(-100i64..100, 1..50), pick in any::<usize>(), up in 1i64..100) {
        let mut heap: BinomialHeap = values.iter().copied().collect();
        let key = values[pick % values.len()];
        let node = heap.search(key).unwrap();

        prop_assert_eq!(heap.decrease_key(node, key + up), Err(HeapError::InvalidKeyIncrease));
        prop_assert_eq!(heap.get(node), Some(key));
        prop_assert!(heap.verify_internal_structure());
        prop_assert_eq!(heap.len(), values.len());
    }
}
