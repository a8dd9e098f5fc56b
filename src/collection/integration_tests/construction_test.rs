// Copyright (c) The lazyseq contributors.
// Licensed under the MIT License.

//! Tests for collection construction and laziness

use crate::LazyCollection;
use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use alloc::vec;
use alloc::vec::Vec;
use core::cell::Cell;

#[test]
fn test_can_create_empty_collection() {
    assert_eq!(LazyCollection::<usize, i64>::empty().all(), vec![]);
    assert_eq!(LazyCollection::<usize, i64>::default().all(), vec![]);
}

#[test]
fn test_can_create_collection_from_values() {
    let data: LazyCollection<usize, i64> = LazyCollection::make(vec![1, 2, 3]);
    assert_eq!(data.all(), vec![(0, 1), (1, 2), (2, 3)]);

    let data: LazyCollection<usize, i64> = LazyCollection::make([1, 2, 3]);
    assert_eq!(data.all(), vec![(0, 1), (1, 2), (2, 3)]);
}

#[test]
fn test_can_create_collection_from_entries() {
    let data: LazyCollection<&str, i64> =
        LazyCollection::make(vec![("a", 1), ("b", 2), ("c", 3)]);
    assert_eq!(data.all(), vec![("a", 1), ("b", 2), ("c", 3)]);

    let data: LazyCollection<&str, i64> =
        LazyCollection::make([("a", 1), ("b", 2), ("c", 3)]);
    assert_eq!(data.all(), vec![("a", 1), ("b", 2), ("c", 3)]);
}

#[test]
fn test_can_create_collection_from_map() {
    // The convertible-object form behaves exactly like its entry form.
    let map = BTreeMap::from([("a", 1), ("b", 2), ("c", 3)]);

    let data = LazyCollection::make(map);
    assert_eq!(data.all(), vec![("a", 1), ("b", 2), ("c", 3)]);
}

#[test]
fn test_can_create_collection_from_producer() {
    let data = LazyCollection::defer(|| [1, 2, 3].into_iter().enumerate());
    assert_eq!(data.all(), vec![(0, 1), (1, 2), (2, 3)]);

    // Explicit keys come through in yield order.
    let data = LazyCollection::defer(|| {
        [("a", 1), ("b", 2), ("c", 3)].into_iter()
    });
    assert_eq!(data.all(), vec![("a", 1), ("b", 2), ("c", 3)]);
}

#[test]
fn test_pipeline_construction_runs_no_producer_code() {
    let calls = Rc::new(Cell::new(0usize));

    let counter = calls.clone();
    let data = LazyCollection::defer(move || {
        counter.set(counter.get() + 1);
        (1..=10i64).enumerate()
    });

    let pipeline = data
        .filter(|value, _| value % 2 == 1)
        .map(|value, _| value * 2)
        .tap_each(|_, _| {})
        .take(3);
    assert_eq!(calls.get(), 0);

    assert_eq!(pipeline.all(), vec![(0, 2), (2, 6), (4, 10)]);
    assert_eq!(calls.get(), 1);
}

#[test]
fn test_unmemoized_drains_rerun_the_producer() {
    let calls = Rc::new(Cell::new(0usize));

    let counter = calls.clone();
    let data = LazyCollection::defer(move || {
        let counter = counter.clone();
        (1..=4i64)
            .map(move |item| {
                counter.set(counter.get() + 1);
                item
            })
            .enumerate()
    });

    let _ = data.all();
    let _ = data.all();

    // Each full drain re-invokes the source from the beginning.
    assert_eq!(calls.get(), 8);
}

#[test]
fn test_producer_yielding_nothing_is_empty() {
    let data = LazyCollection::defer(|| Vec::<(usize, i64)>::new().into_iter());
    assert_eq!(data.all(), vec![]);
    assert!(data.is_empty());
}
