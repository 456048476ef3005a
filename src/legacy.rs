//! Adapter exposing a [`ChampSet`] under the older set interface.
//!
//! Mutation semantics are those of [`ChampSet`]. Two parts of the older
//! interface are not bridged:
//!
//! - bulk retain and transient access report [`Error::Unsupported`];
//! - equality is not unified. The older interface compares against any
//!   collection while [`ChampSet`] compares sets of elements, so
//!   [`LegacySet`] implements no `PartialEq` and
//!   [`try_eq`](LegacySet::try_eq) reports the mismatch instead of
//!   guessing.

use std::hash::Hash;

use crate::error::{Error, Result};
use crate::iter::Iter;
use crate::set::{ChampSet, TransientSet};

/// A [`ChampSet`] behind the older set interface.
#[derive(Debug)]
pub struct LegacySet<T> {
    inner: ChampSet<T>,
}

fn unsupported(operation: &'static str) -> Error {
    tracing::debug!(operation, "unsupported operation on legacy set");
    Error::Unsupported(operation)
}

impl<T> LegacySet<T> {
    /// Wraps `set`.
    #[must_use]
    pub const fn adapt(set: ChampSet<T>) -> Self {
        Self { inner: set }
    }

    /// Returns the wrapped set.
    #[must_use]
    pub fn into_inner(self) -> ChampSet<T> {
        self.inner
    }

    /// Returns the number of elements.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if the set contains no elements.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns an iterator over the elements.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, T> {
        self.inner.iter()
    }

    /// Always `false`.
    #[must_use]
    pub const fn is_transient_supported(&self) -> bool {
        false
    }

    /// Transient access is not offered through this interface.
    ///
    /// # Errors
    ///
    /// Always returns [`Error::Unsupported`].
    pub fn as_transient(&self) -> Result<TransientSet<T>> {
        Err(unsupported("as_transient"))
    }

    /// Equality check against another legacy set.
    ///
    /// # Errors
    ///
    /// Always returns [`Error::Unsupported`]: the two interfaces disagree on
    /// what equality means.
    pub fn try_eq(&self, _other: &Self) -> Result<bool> {
        Err(unsupported("equality between legacy and persistent sets"))
    }
}

impl<T: Hash + Eq> LegacySet<T> {
    /// Returns `true` if the set contains `element`.
    #[must_use]
    pub fn contains(&self, element: &T) -> bool {
        self.inner.contains(element)
    }

    /// Returns `true` if the set contains every element of `elements`.
    pub fn contains_all<'a>(&self, elements: impl IntoIterator<Item = &'a T>) -> bool
    where
        T: 'a,
    {
        elements.into_iter().all(|e| self.inner.contains(e))
    }

    /// Returns the stored element equal to `element`.
    #[must_use]
    pub fn get(&self, element: &T) -> Option<&T> {
        self.inner.get(element)
    }

    /// Sum of the element hashes.
    #[must_use]
    pub fn content_hash(&self) -> u64 {
        self.inner.content_hash()
    }
}

impl<T: Hash + Eq + Clone> LegacySet<T> {
    /// Returns a set that also contains `element`.
    #[must_use]
    pub fn insert(&self, element: T) -> Self {
        Self::adapt(self.inner.insert(element))
    }

    /// Returns a set that also contains every element of `elements`.
    #[must_use]
    pub fn insert_all(&self, elements: impl IntoIterator<Item = T>) -> Self {
        Self::adapt(self.inner.insert_all(elements))
    }

    /// Returns a set without `element`.
    #[must_use]
    pub fn remove(&self, element: &T) -> Self {
        Self::adapt(self.inner.remove(element))
    }

    /// Returns a set without any element of `elements`.
    #[must_use]
    pub fn remove_all<'a>(&self, elements: impl IntoIterator<Item = &'a T>) -> Self
    where
        T: 'a,
    {
        Self::adapt(self.inner.remove_all(elements))
    }

    /// Bulk retain.
    ///
    /// # Errors
    ///
    /// Always returns [`Error::Unsupported`].
    pub fn retain_all<'a>(&self, _elements: impl IntoIterator<Item = &'a T>) -> Result<Self>
    where
        T: 'a,
    {
        Err(unsupported("retain_all"))
    }
}

impl<T> Clone for LegacySet<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, T> IntoIterator for &'a LegacySet<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T> From<ChampSet<T>> for LegacySet<T> {
    fn from(set: ChampSet<T>) -> Self {
        Self::adapt(set)
    }
}
