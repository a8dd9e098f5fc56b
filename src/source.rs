// Copyright (c) The lazyseq contributors.
// Licensed under the MIT License.

//! Sequence sources for lazy collections
//!
//! A [`Source`] is the single thing a collection owns: a fixed entry list, a
//! deferred producer, or a producer behind a shared memoization cache.
//! Every pipeline stage clones the previous stage's source, so sources are
//! cheap to clone and never evaluated until someone pulls on an iterator.

use alloc::{boxed::Box, rc::Rc, vec::Vec};
use core::cell::RefCell;
use core::fmt;

/// Boxed entry iterator handed out by sources and producers.
pub type EntryIter<K, V> = Box<dyn Iterator<Item = (K, V)>>;

// ============================================================================
// Producers
// ============================================================================

/// A zero-argument callable that creates a fresh entry iterator per
/// consumption.
///
/// Each call to [`produce`](Producer::produce) restarts the sequence from the
/// beginning, re-running any side effects in the producer. Memoization is
/// layered on top by [`CachedSequence`], not baked into producers.
pub trait Producer<K, V> {
    /// Create a new iterator over the sequence.
    fn produce(&self) -> EntryIter<K, V>;
}

impl<K, V, F, I> Producer<K, V> for F
where
    F: Fn() -> I,
    I: Iterator<Item = (K, V)> + 'static,
{
    fn produce(&self) -> EntryIter<K, V> {
        Box::new((self)())
    }
}

// ============================================================================
// Source
// ============================================================================

/// Where a collection's entries come from.
pub enum Source<K, V> {
    /// No entries.
    Empty,

    /// A fixed, in-memory ordered entry list.
    Fixed(Rc<Vec<(K, V)>>),

    /// A producer invoked anew for every consumption.
    Deferred(Rc<dyn Producer<K, V>>),

    /// A producer behind a shared, incrementally filled cache.
    Cached(CachedSequence<K, V>),
}

impl<K, V> Clone for Source<K, V> {
    fn clone(&self) -> Self {
        match self {
            Source::Empty => Source::Empty,
            Source::Fixed(entries) => Source::Fixed(entries.clone()),
            Source::Deferred(producer) => Source::Deferred(producer.clone()),
            Source::Cached(cached) => Source::Cached(cached.clone()),
        }
    }
}

impl<K, V> Source<K, V>
where
    K: Clone + 'static,
    V: Clone + 'static,
{
    /// Start a new pull over this source.
    pub fn iter(&self) -> EntryIter<K, V> {
        match self {
            Source::Empty => Box::new(core::iter::empty()),
            Source::Fixed(entries) => Box::new(FixedIter {
                entries: entries.clone(),
                pos: 0,
            }),
            Source::Deferred(producer) => producer.produce(),
            Source::Cached(cached) => Box::new(cached.replay()),
        }
    }

    /// The memoized form of this source.
    ///
    /// Fixed and empty sources already replay without side effects, so only a
    /// deferred producer gains a cache. A cached source is returned as-is so
    /// repeated `remember()` calls share one cache.
    pub fn remembered(&self) -> Self {
        match self {
            Source::Deferred(producer) => {
                Source::Cached(CachedSequence::new(producer.clone()))
            }
            other => other.clone(),
        }
    }
}

impl<K, V> fmt::Debug for Source<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Empty => f.write_str("Empty"),
            Source::Fixed(entries) => {
                f.debug_struct("Fixed").field("len", &entries.len()).finish()
            }
            Source::Deferred(_) => f.write_str("Deferred"),
            Source::Cached(cached) => cached.fmt(f),
        }
    }
}

/// Iterator over a fixed entry list.
struct FixedIter<K, V> {
    entries: Rc<Vec<(K, V)>>,
    pos: usize,
}

impl<K: Clone, V: Clone> Iterator for FixedIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        let entry = self.entries.get(self.pos)?.clone();
        self.pos += 1;
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.entries.len().saturating_sub(self.pos);
        (remaining, Some(remaining))
    }
}

// ============================================================================
// Memoization cache
// ============================================================================

/// A producer behind a shared, incrementally filled cache.
///
/// The cache state is jointly owned by every pipeline stage derived from the
/// remembered collection. Each consumer replays the cached prefix and only
/// positions beyond it pull the producer's single live iterator, so side
/// effects occur at most once per position across all consumers.
pub struct CachedSequence<K, V> {
    producer: Rc<dyn Producer<K, V>>,
    state: Rc<RefCell<CacheState<K, V>>>,
}

struct CacheState<K, V> {
    /// Ordered prefix of the sequence produced so far.
    entries: Vec<(K, V)>,

    /// The single live iterator over the producer, kept between pulls.
    /// `None` before the first pull, after exhaustion, and while one element
    /// is being pulled.
    live: Option<EntryIter<K, V>>,

    started: bool,
    exhausted: bool,
}

impl<K, V> Clone for CachedSequence<K, V> {
    fn clone(&self) -> Self {
        Self {
            producer: self.producer.clone(),
            state: self.state.clone(),
        }
    }
}

impl<K, V> CachedSequence<K, V>
where
    K: Clone + 'static,
    V: Clone + 'static,
{
    pub fn new(producer: Rc<dyn Producer<K, V>>) -> Self {
        Self {
            producer,
            state: Rc::new(RefCell::new(CacheState {
                entries: Vec::new(),
                live: None,
                started: false,
                exhausted: false,
            })),
        }
    }

    /// Start a consumer at position zero of the shared cache.
    pub fn replay(&self) -> Replay<K, V> {
        Replay {
            cache: self.clone(),
            pos: 0,
        }
    }

    /// Number of positions cached so far.
    pub fn cached_len(&self) -> usize {
        self.state.borrow().entries.len()
    }

    /// Entry at `pos`, extending the cache if the position has not been
    /// produced yet. Returns `None` once the sequence ends before `pos`.
    fn pull(&self, pos: usize) -> Option<(K, V)> {
        // Fast path: already cached.
        {
            let state = self.state.borrow();
            if let Some(entry) = state.entries.get(pos) {
                return Some(entry.clone());
            }
            if state.exhausted {
                return None;
            }
        }

        // Extend the cache one element at a time until `pos` is covered.
        loop {
            let mut live = {
                let mut state = self.state.borrow_mut();
                if let Some(entry) = state.entries.get(pos) {
                    return Some(entry.clone());
                }
                if state.exhausted {
                    return None;
                }
                match state.live.take() {
                    Some(iter) => iter,
                    None if !state.started => {
                        state.started = true;
                        drop(state);
                        self.producer.produce()
                    }
                    // A pull on this cache is already in flight higher up the
                    // call stack. End the sequence for this consumer instead
                    // of invoking the producer a second time.
                    None => return None,
                }
            };

            // The borrow is released while the element is pulled, so a
            // producer that reads the remembered collection re-entrantly
            // observes a consistent cache.
            let item = live.next();

            let mut state = self.state.borrow_mut();
            match item {
                Some(entry) => {
                    state.entries.push(entry);
                    state.live = Some(live);
                }
                None => {
                    state.exhausted = true;
                }
            }
        }
    }
}

impl<K, V> fmt::Debug for CachedSequence<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Cached")
            .field("cached_entries", &state.entries.len())
            .field("exhausted", &state.exhausted)
            .finish()
    }
}

/// One consumer's view of a [`CachedSequence`].
pub struct Replay<K, V> {
    cache: CachedSequence<K, V>,
    pos: usize,
}

impl<K, V> Iterator for Replay<K, V>
where
    K: Clone + 'static,
    V: Clone + 'static,
{
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        let entry = self.cache.pull(self.pos)?;
        self.pos += 1;
        Some(entry)
    }
}

// ============================================================================
// Tests
// ============================================================================
