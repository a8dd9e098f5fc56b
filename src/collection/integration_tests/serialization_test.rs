// Copyright (c) The lazyseq contributors.
// Licensed under the MIT License.

//! Tests for JSON serialization of drained pipelines

use crate::LazyCollection;
use alloc::rc::Rc;
use alloc::vec;
use core::cell::Cell;
use serde::Serialize;

#[test]
fn test_to_json_preserves_entry_order() -> anyhow::Result<()> {
    let data: LazyCollection<&str, i64> =
        LazyCollection::make(vec![("a", 1), ("b", 2), ("c", 3)]);

    assert_eq!(data.to_json()?, r#"{"a":1,"b":2,"c":3}"#);
    Ok(())
}

#[test]
fn test_to_json_serializes_the_pipeline_output() -> anyhow::Result<()> {
    let json = LazyCollection::times(10)
        .filter(|value, _| value % 2 == 0)
        .values()
        .take(3)
        .to_json()?;

    assert_eq!(json, r#"{"0":2,"1":4,"2":6}"#);
    Ok(())
}

#[test]
fn test_serialize_is_a_terminal_operation() -> anyhow::Result<()> {
    let calls = Rc::new(Cell::new(0usize));

    let counter = calls.clone();
    let data = LazyCollection::defer(move || {
        let counter = counter.clone();
        (1..=3i64)
            .map(move |item| {
                counter.set(counter.get() + 1);
                item
            })
            .enumerate()
    })
    .remember();

    assert_eq!(calls.get(), 0);

    let json = serde_json::to_string(&data)?;
    assert_eq!(json, r#"{"0":1,"1":2,"2":3}"#);
    assert_eq!(calls.get(), 3);

    // A remembered collection serializes again from its cache.
    let json = serde_json::to_string(&data)?;
    assert_eq!(json, r#"{"0":1,"1":2,"2":3}"#);
    assert_eq!(calls.get(), 3);
    Ok(())
}

#[test]
fn test_to_json_with_derived_values() -> anyhow::Result<()> {
    #[derive(Clone, Serialize)]
    struct Row {
        id: u32,
        name: &'static str,
    }

    let data: LazyCollection<&str, Row> = LazyCollection::make(vec![
        ("first", Row { id: 1, name: "a" }),
        ("second", Row { id: 2, name: "b" }),
    ]);

    assert_eq!(
        data.to_json()?,
        r#"{"first":{"id":1,"name":"a"},"second":{"id":2,"name":"b"}}"#
    );
    Ok(())
}
