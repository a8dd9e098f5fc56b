// Copyright (c) The lazyseq contributors.
// Licensed under the MIT License.

//! Lazy keyed-sequence collections
//!
//! [`LazyCollection`] wraps a [`Source`] and builds pull-based pipelines over
//! it. Adapters like [`filter`](LazyCollection::filter) and
//! [`take`](LazyCollection::take) return new collections wrapping a producer
//! that composes over a clone of the previous source; no producer code runs
//! until a terminal operation such as [`all`](LazyCollection::all) drains the
//! pipeline.
//!
//! Keys travel with their values through every stage. Adapters preserve the
//! original keys unless they re-index explicitly
//! ([`values`](LazyCollection::values), [`keys`](LazyCollection::keys)).

use alloc::{collections::BTreeMap, rc::Rc, string::String, vec::Vec};
use anyhow::Result;
use core::fmt;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::source::{Producer, Source};

/// A lazily evaluated, keyed sequence.
///
/// A collection owns exactly one sequence source and is otherwise stateless.
/// Cloning is cheap and shares the source, including any memoization cache
/// installed by [`remember`](LazyCollection::remember).
pub struct LazyCollection<K, V> {
    source: Source<K, V>,
}

impl<K, V> Clone for LazyCollection<K, V> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
        }
    }
}

impl<K, V> fmt::Debug for LazyCollection<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyCollection")
            .field("source", &self.source)
            .finish()
    }
}

// ============================================================================
// Construction
// ============================================================================

impl<K, V> LazyCollection<K, V> {
    pub(crate) fn from_source(source: Source<K, V>) -> Self {
        Self { source }
    }

    /// The empty sequence.
    pub fn empty() -> Self {
        Self::from_source(Source::Empty)
    }

    /// The source backing this collection.
    pub fn source(&self) -> &Source<K, V> {
        &self.source
    }
}

impl<K, V> Default for LazyCollection<K, V> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<K, V> LazyCollection<K, V>
where
    K: Clone + 'static,
    V: Clone + 'static,
{
    /// Wrap anything convertible into a collection: entry lists, value lists
    /// (keyed sequentially from zero), or maps.
    ///
    /// Producer callables are wrapped by [`defer`](LazyCollection::defer)
    /// instead; a single conversion covering both containers and callables
    /// would not pass trait coherence.
    pub fn make(source: impl Into<Self>) -> Self {
        source.into()
    }

    /// Wrap a zero-argument producer that creates the entry iterator on
    /// demand.
    ///
    /// The producer is not invoked here. Every unmemoized consumption invokes
    /// it again from the beginning, so side effects inside it re-occur; see
    /// [`remember`](LazyCollection::remember). Errors raised by the producer
    /// surface at consumption time, not construction time.
    pub fn defer<P>(producer: P) -> Self
    where
        P: Producer<K, V> + 'static,
    {
        Self::from_source(Source::Deferred(Rc::new(producer)))
    }

    /// Wrap a fixed, in-memory entry list.
    pub fn from_entries(entries: Vec<(K, V)>) -> Self {
        Self::from_source(Source::Fixed(Rc::new(entries)))
    }
}

impl LazyCollection<usize, u64> {
    /// The integers `1..=count`, keyed sequentially from zero.
    pub fn times(count: u64) -> Self {
        Self::defer(move || (1..=count).enumerate())
    }
}

// ============================================================================
// Lazy adapters
// ============================================================================

impl<K, V> LazyCollection<K, V>
where
    K: Clone + 'static,
    V: Clone + 'static,
{
    /// The first `count` entries. Does not advance the underlying source past
    /// the `count`-th element.
    pub fn take(&self, count: usize) -> Self {
        let inner = self.source.clone();
        Self::defer(move || inner.iter().take(count))
    }

    /// Everything after the first `count` entries.
    pub fn skip(&self, count: usize) -> Self {
        let inner = self.source.clone();
        Self::defer(move || inner.iter().skip(count))
    }

    /// Entries whose `(value, key)` satisfy the predicate, keys preserved.
    pub fn filter<P>(&self, predicate: P) -> Self
    where
        P: Fn(&V, &K) -> bool + 'static,
    {
        let inner = self.source.clone();
        let predicate = Rc::new(predicate);
        Self::defer(move || {
            let predicate = predicate.clone();
            inner
                .iter()
                .filter(move |(key, value)| predicate(value, key))
        })
    }

    /// Transform each value, keys preserved.
    pub fn map<T, F>(&self, transform: F) -> LazyCollection<K, T>
    where
        T: Clone + 'static,
        F: Fn(V, &K) -> T + 'static,
    {
        let inner = self.source.clone();
        let transform = Rc::new(transform);
        LazyCollection::defer(move || {
            let transform = transform.clone();
            inner.iter().map(move |(key, value)| {
                let value = transform(value, &key);
                (key, value)
            })
        })
    }

    /// Values only, re-indexed sequentially from zero.
    pub fn values(&self) -> LazyCollection<usize, V> {
        let inner = self.source.clone();
        LazyCollection::defer(move || {
            inner.iter().map(|(_, value)| value).enumerate()
        })
    }

    /// Keys as values, re-indexed sequentially from zero.
    pub fn keys(&self) -> LazyCollection<usize, K> {
        let inner = self.source.clone();
        LazyCollection::defer(move || {
            inner.iter().map(|(key, _)| key).enumerate()
        })
    }

    /// Observe each `(value, key)` as it is pulled through downstream
    /// consumption, without altering it.
    ///
    /// The callback never runs at construction time; an unconsumed pipeline
    /// taps nothing.
    pub fn tap_each<F>(&self, callback: F) -> Self
    where
        F: Fn(&V, &K) + 'static,
    {
        let inner = self.source.clone();
        let callback = Rc::new(callback);
        Self::defer(move || {
            let callback = callback.clone();
            inner
                .iter()
                .inspect(move |(key, value)| callback(value, key))
        })
    }

    /// Memoize this pipeline behind a shared, incrementally filled cache.
    ///
    /// Every consumer derived from the returned collection replays the cached
    /// prefix and only extends the cache for positions not yet produced, so
    /// producer side effects occur at most once per position across all
    /// consumers. Keys are preserved through cache replay. Remembering an
    /// already-remembered collection shares the same cache.
    pub fn remember(&self) -> Self {
        Self::from_source(self.source.remembered())
    }
}

// ============================================================================
// Terminal operations
// ============================================================================

impl<K, V> LazyCollection<K, V>
where
    K: Clone + 'static,
    V: Clone + 'static,
{
    /// Start a pull over the pipeline.
    pub fn iter(&self) -> Iter<K, V> {
        Iter {
            inner: self.source.iter(),
        }
    }

    /// Fully drain into an ordered entry list, preserving keys and order.
    pub fn all(&self) -> Vec<(K, V)> {
        self.iter().collect()
    }

    /// Drain now and return a collection backed by the fixed snapshot.
    ///
    /// Later mutation of external state captured by the original producer no
    /// longer affects the returned collection.
    pub fn eager(&self) -> Self {
        Self::from_entries(self.all())
    }

    /// First value, if any. Pulls at most one element.
    pub fn first(&self) -> Option<V> {
        self.iter().next().map(|(_, value)| value)
    }

    /// Last value, if any. Drains the whole sequence.
    pub fn last(&self) -> Option<V> {
        self.iter().last().map(|(_, value)| value)
    }

    /// Number of entries. Drains the whole sequence.
    pub fn count(&self) -> usize {
        self.iter().count()
    }

    /// Whether the sequence has no entries. Pulls at most one element.
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Run the callback for every `(value, key)`.
    pub fn each<F>(&self, mut callback: F)
    where
        F: FnMut(&V, &K),
    {
        for (key, value) in self.iter() {
            callback(&value, &key);
        }
    }

    /// Run the fallible callback for every `(value, key)`, stopping at and
    /// propagating the first error unchanged.
    pub fn try_each<F>(&self, mut callback: F) -> Result<()>
    where
        F: FnMut(&V, &K) -> Result<()>,
    {
        for (key, value) in self.iter() {
            callback(&value, &key)?;
        }
        Ok(())
    }

    /// Drain into a JSON map in entry order.
    pub fn to_json(&self) -> Result<String>
    where
        K: Serialize,
        V: Serialize,
    {
        serde_json::to_string(self).map_err(anyhow::Error::msg)
    }
}

// ============================================================================
// Iteration
// ============================================================================

/// Pull-based iterator over a collection's entries.
pub struct Iter<K, V> {
    inner: crate::source::EntryIter<K, V>,
}

impl<K, V> Iterator for Iter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> IntoIterator for LazyCollection<K, V>
where
    K: Clone + 'static,
    V: Clone + 'static,
{
    type Item = (K, V);
    type IntoIter = Iter<K, V>;

    fn into_iter(self) -> Iter<K, V> {
        self.iter()
    }
}

impl<K, V> IntoIterator for &LazyCollection<K, V>
where
    K: Clone + 'static,
    V: Clone + 'static,
{
    type Item = (K, V);
    type IntoIter = Iter<K, V>;

    fn into_iter(self) -> Iter<K, V> {
        self.iter()
    }
}

// ============================================================================
// Conversions
// ============================================================================

impl<K, V> From<Vec<(K, V)>> for LazyCollection<K, V>
where
    K: Clone + 'static,
    V: Clone + 'static,
{
    fn from(entries: Vec<(K, V)>) -> Self {
        Self::from_entries(entries)
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for LazyCollection<K, V>
where
    K: Clone + 'static,
    V: Clone + 'static,
{
    fn from(entries: [(K, V); N]) -> Self {
        Self::from_entries(entries.into_iter().collect())
    }
}

impl<K, V> From<BTreeMap<K, V>> for LazyCollection<K, V>
where
    K: Clone + Ord + 'static,
    V: Clone + 'static,
{
    fn from(map: BTreeMap<K, V>) -> Self {
        Self::from_entries(map.into_iter().collect())
    }
}

impl<V> From<Vec<V>> for LazyCollection<usize, V>
where
    V: Clone + 'static,
{
    fn from(values: Vec<V>) -> Self {
        Self::from_entries(values.into_iter().enumerate().collect())
    }
}

impl<V, const N: usize> From<[V; N]> for LazyCollection<usize, V>
where
    V: Clone + 'static,
{
    fn from(values: [V; N]) -> Self {
        Self::from_entries(values.into_iter().enumerate().collect())
    }
}

impl<K, V> FromIterator<(K, V)> for LazyCollection<K, V>
where
    K: Clone + 'static,
    V: Clone + 'static,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_entries(iter.into_iter().collect())
    }
}

// ============================================================================
// Serialization
// ============================================================================

/// Serializing is a terminal operation: the pipeline is drained in entry
/// order, with the same remember/eager semantics as any other drain.
impl<K, V> Serialize for LazyCollection<K, V>
where
    K: Clone + Serialize + 'static,
    V: Clone + Serialize + 'static,
{
    fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        for (key, value) in self.iter() {
            map.serialize_entry(&key, &value)?;
        }
        map.end()
    }
}

// ============================================================================
// Tests
// ============================================================================


// Integration tests in separate files
#[cfg(test)]
mod integration_tests;
