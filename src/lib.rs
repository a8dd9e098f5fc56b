// Copyright (c) The lazyseq contributors.
// Licensed under the MIT License.

//! Lazy, memoizing keyed-sequence collections
//!
//! This crate provides [`LazyCollection`], a pull-based sequence wrapper that
//! defers all work until a terminal operation consumes it.
//!
//! # Key Concepts
//!
//! - **LazyCollection**: a keyed sequence whose elements are computed on demand
//! - **Producer**: a zero-argument callable that re-creates the element
//!   iterator for each consumption
//! - **remember()**: interposes a shared, incrementally filled cache so that
//!   divergent downstream consumers replay cached elements instead of
//!   re-running the producer
//! - **eager()**: drains the pipeline now and detaches the result from any
//!   external state the producer captured
//!
//! # Example
//!
//! ```rust,ignore
//! use lazyseq::LazyCollection;
//!
//! // Nothing runs at construction time.
//! let evens = LazyCollection::times(1_000_000)
//!     .filter(|n, _| n % 2 == 0)
//!     .values()
//!     .take(3);
//!
//! // The producer is pulled just far enough to satisfy the request.
//! assert_eq!(evens.all(), vec![(0, 2), (1, 4), (2, 6)]);
//!
//! // A remembered pipeline runs its producer at most once per position,
//! // no matter how many consumers drain it.
//! let data = LazyCollection::defer(|| expensive_rows()).remember();
//! let head = data.take(10).all();
//! let odd = data.filter(|row, _| row.id % 2 == 1).take(10).all();
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod collection;
mod source;

pub use collection::{Iter, LazyCollection};
pub use source::{CachedSequence, EntryIter, Producer, Replay, Source};
