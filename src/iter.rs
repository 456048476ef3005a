//! Iterator types for CHAMP containers.
//!
//! All iterators walk the trie lazily in preorder (inline entries of a node
//! before its children) and borrow the container they were created from, so
//! they always observe the snapshot they started on.

use std::iter::FusedIterator;
use std::slice;
use std::sync::Arc;

use crate::multimap::Payload;
use crate::node::{Entry, Node};

/// One level of the traversal stack.
struct Frame<'a, K, P> {
    entries: slice::Iter<'a, Entry<K, P>>,
    children: slice::Iter<'a, Arc<Node<K, P>>>,
}

impl<'a, K, P> Frame<'a, K, P> {
    fn new(node: &'a Node<K, P>) -> Self {
        Self {
            entries: node.entries().iter(),
            children: node.children().iter(),
        }
    }
}

/// Lazy preorder walk over every inline entry of a trie.
pub(crate) struct Entries<'a, K, P> {
    stack: Vec<Frame<'a, K, P>>,
}

impl<'a, K, P> Entries<'a, K, P> {
    pub(crate) fn new(root: &'a Node<K, P>) -> Self {
        Self {
            stack: vec![Frame::new(root)],
        }
    }
}

impl<'a, K, P> Iterator for Entries<'a, K, P> {
    type Item = &'a Entry<K, P>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let top = self.stack.last_mut()?;
            if let Some(entry) = top.entries.next() {
                return Some(entry);
            }
            if let Some(child) = top.children.next() {
                self.stack.push(Frame::new(child));
            } else {
                self.stack.pop();
            }
        }
    }
}

impl<K, P> FusedIterator for Entries<'_, K, P> {}

// ---------------------------------------------------------------------------
// Sets
// ---------------------------------------------------------------------------

/// Iterator over the elements of a [`ChampSet`](crate::ChampSet).
pub struct Iter<'a, T> {
    entries: Entries<'a, T, ()>,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(root: &'a Node<T, ()>, len: usize) -> Self {
        Self {
            entries: Entries::new(root),
            remaining: len,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let entry = self.entries.next()?;
        self.remaining -= 1;
        Some(&entry.key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

// ---------------------------------------------------------------------------
// Maps
// ---------------------------------------------------------------------------

/// Iterator over `(&K, &V)` pairs of a [`ChampMap`](crate::ChampMap).
pub struct MapIter<'a, K, V> {
    entries: Entries<'a, K, V>,
    remaining: usize,
}

impl<'a, K, V> MapIter<'a, K, V> {
    pub(crate) fn new(root: &'a Node<K, V>, len: usize) -> Self {
        Self {
            entries: Entries::new(root),
            remaining: len,
        }
    }
}

impl<'a, K, V> Iterator for MapIter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.entries.next()?;
        self.remaining -= 1;
        Some((&entry.key, &entry.payload))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for MapIter<'_, K, V> {}
impl<K, V> FusedIterator for MapIter<'_, K, V> {}

/// Iterator over the distinct keys of a map or multimap.
pub struct Keys<'a, K, P> {
    entries: Entries<'a, K, P>,
}

impl<'a, K, P> Keys<'a, K, P> {
    pub(crate) fn new(root: &'a Node<K, P>) -> Self {
        Self {
            entries: Entries::new(root),
        }
    }
}

impl<'a, K, P> Iterator for Keys<'a, K, P> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.entries.next().map(|entry| &entry.key)
    }
}

impl<K, P> FusedIterator for Keys<'_, K, P> {}

/// Iterator over the values of a [`ChampMap`](crate::ChampMap).
pub struct Values<'a, K, V> {
    inner: MapIter<'a, K, V>,
}

impl<'a, K, V> Values<'a, K, V> {
    pub(crate) fn new(root: &'a Node<K, V>, len: usize) -> Self {
        Self {
            inner: MapIter::new(root, len),
        }
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}
impl<K, V> FusedIterator for Values<'_, K, V> {}

// ---------------------------------------------------------------------------
// Multimaps
// ---------------------------------------------------------------------------

/// Iterator over the values held under one multimap key.
pub enum PayloadIter<'a, V> {
    /// Single-value payload, yielded once.
    Single(Option<&'a V>),
    /// Multi-value payload.
    Multi(Iter<'a, V>),
}

impl<'a, V> Iterator for PayloadIter<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        match self {
            Self::Single(value) => value.take(),
            Self::Multi(iter) => iter.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Self::Single(value) => {
                let n = usize::from(value.is_some());
                (n, Some(n))
            }
            Self::Multi(iter) => iter.size_hint(),
        }
    }
}

impl<V> ExactSizeIterator for PayloadIter<'_, V> {}
impl<V> FusedIterator for PayloadIter<'_, V> {}

/// Iterator over the `(key, value)` tuples of a
/// [`ChampSetMultimap`](crate::ChampSetMultimap).
///
/// Values of one key are yielded consecutively.
pub struct Tuples<'a, K, V> {
    entries: Entries<'a, K, Payload<V>>,
    current: Option<(&'a K, PayloadIter<'a, V>)>,
    remaining: usize,
}

impl<'a, K, V> Tuples<'a, K, V> {
    pub(crate) fn new(root: &'a Node<K, Payload<V>>, len: usize) -> Self {
        Self {
            entries: Entries::new(root),
            current: None,
            remaining: len,
        }
    }
}

impl<'a, K, V> Iterator for Tuples<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((key, values)) = &mut self.current
                && let Some(value) = values.next()
            {
                self.remaining -= 1;
                return Some((*key, value));
            }
            let entry = self.entries.next()?;
            self.current = Some((&entry.key, entry.payload.iter()));
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Tuples<'_, K, V> {}
impl<K, V> FusedIterator for Tuples<'_, K, V> {}
