//! Persistent set-multimap: each key maps to a non-empty set of values.
//!
//! A key holding one value stores it inline as [`Payload::Single`]; only a
//! second distinct value upgrades the slot to a nested [`ChampSet`]. Removal
//! downgrades back to `Single` as soon as one value is left, so the two
//! representations of a one-value key can never coexist.
//!
//! Sizes count `(key, value)` tuples. Equality and hashing are defined over
//! the tuple set, which makes a multimap interchangeable with the
//! `ChampSet<(K, V)>` of its tuples for `==` and
//! [`content_hash`](ChampSetMultimap::content_hash).

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::adhash;
use crate::error::{Error, Result};
use crate::iter::{Keys, PayloadIter, Tuples};
use crate::node::Node;
use crate::ops::get::get_recursive;
use crate::ops::insert::insert_recursive;
use crate::ops::remove::remove_recursive;
use crate::owner::{Edit, Owner};
use crate::result::{self, Detail, Details, MutationResult, Removal, Resolution};
use crate::set::ChampSet;

/// Values stored under one multimap key.
#[derive(Clone)]
pub enum Payload<V> {
    /// Exactly one value.
    Single(V),
    /// Two or more values.
    Multi(ChampSet<V>),
}

impl<V> Payload<V> {
    /// Number of values under the key.
    #[must_use]
    pub const fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Multi(set) => set.len(),
        }
    }

    /// Always `false`: a key without values is not stored.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Iterates the values.
    #[must_use]
    pub fn iter(&self) -> PayloadIter<'_, V> {
        match self {
            Self::Single(value) => PayloadIter::Single(Some(value)),
            Self::Multi(set) => PayloadIter::Multi(set.iter()),
        }
    }
}

impl<V: Hash + Eq> Payload<V> {
    /// Returns `true` if `value` is one of the values.
    #[must_use]
    pub fn contains(&self, value: &V) -> bool {
        match self {
            Self::Single(v) => v == value,
            Self::Multi(set) => set.contains(value),
        }
    }
}

impl<V: Hash + Eq + Clone> Payload<V> {
    /// The values as a set.
    #[must_use]
    pub fn to_set(&self) -> ChampSet<V> {
        match self {
            Self::Single(value) => ChampSet::new().insert(value.clone()),
            Self::Multi(set) => set.clone(),
        }
    }
}

impl<V: Hash + Eq> PartialEq for Payload<V> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Single(a), Self::Single(b)) => a == b,
            (Self::Multi(a), Self::Multi(b)) => a == b,
            _ => false,
        }
    }
}

impl<V: Hash + Eq> Eq for Payload<V> {}

impl<V: fmt::Debug> fmt::Debug for Payload<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(value) => f.debug_tuple("Single").field(value).finish(),
            Self::Multi(set) => f.debug_tuple("Multi").field(set).finish(),
        }
    }
}

impl<'a, V> IntoIterator for &'a Payload<V> {
    type Item = &'a V;
    type IntoIter = PayloadIter<'a, V>;

    fn into_iter(self) -> PayloadIter<'a, V> {
        self.iter()
    }
}

// ---------------------------------------------------------------------------
// Slot resolutions
// ---------------------------------------------------------------------------

type Root<K, V> = Arc<Node<K, Payload<V>>>;

fn insert_tuple<K, V>(root: &mut Root<K, V>, edit: Edit, key: K, value: V) -> MutationResult<Payload<V>>
where
    K: Hash + Eq + Clone,
    V: Hash + Eq + Clone,
{
    let hash = adhash::hash_one(&key);
    insert_recursive(root, edit, hash, key, 0, |existing| match existing {
        None => Resolution::Store {
            payload: Payload::Single(value),
            details: Details::of(Detail::KeyAdded).with(Detail::ValueAdded),
            size_delta: 1,
        },
        Some(Payload::Single(current)) if *current == value => Resolution::Unchanged,
        Some(Payload::Single(current)) => Resolution::Store {
            payload: Payload::Multi(ChampSet::new().insert(current.clone()).insert(value)),
            details: Details::of(Detail::ValueAdded),
            size_delta: 1,
        },
        Some(Payload::Multi(set)) if set.contains(&value) => Resolution::Unchanged,
        Some(Payload::Multi(set)) => Resolution::Store {
            payload: Payload::Multi(set.insert(value)),
            details: Details::of(Detail::ValueAdded),
            size_delta: 1,
        },
    })
}

fn put_single<K, V>(root: &mut Root<K, V>, edit: Edit, key: K, value: V) -> MutationResult<Payload<V>>
where
    K: Hash + Eq + Clone,
    V: Hash + Eq + Clone,
{
    let hash = adhash::hash_one(&key);
    insert_recursive(root, edit, hash, key, 0, |existing| match existing {
        None => Resolution::Store {
            payload: Payload::Single(value),
            details: Details::of(Detail::KeyAdded).with(Detail::ValueAdded),
            size_delta: 1,
        },
        Some(Payload::Single(current)) if *current == value => Resolution::Unchanged,
        Some(previous) => Resolution::Store {
            payload: Payload::Single(value),
            details: Details::of(Detail::ValueReplaced),
            size_delta: 1 - result::count(previous.len()),
        },
    })
}

fn remove_key<K, V>(root: &mut Root<K, V>, edit: Edit, key: &K) -> MutationResult<Payload<V>>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    let hash = adhash::hash_one(key);
    remove_recursive(root, edit, hash, key, 0, |payload| Removal::Evict {
        details: Details::of(Detail::KeyRemoved).with(Detail::LastValueRemoved),
        size_delta: -result::count(payload.len()),
    })
}

fn remove_tuple<K, V>(root: &mut Root<K, V>, edit: Edit, key: &K, value: &V) -> MutationResult<Payload<V>>
where
    K: Hash + Eq + Clone,
    V: Hash + Eq + Clone,
{
    let hash = adhash::hash_one(key);
    remove_recursive(root, edit, hash, key, 0, |payload| match payload {
        Payload::Single(current) if current == value => Removal::Evict {
            details: Details::of(Detail::KeyRemoved).with(Detail::LastValueRemoved),
            size_delta: -1,
        },
        Payload::Multi(set) if set.contains(value) => {
            let shrunk = set.remove(value);
            // Multi → Single once one value is left.
            let payload = match (shrunk.len(), shrunk.iter().next()) {
                (1, Some(last)) => Payload::Single(last.clone()),
                _ => Payload::Multi(shrunk),
            };
            Removal::Replace {
                payload,
                details: Details::of(Detail::ValueRemoved),
                size_delta: -1,
            }
        }
        Payload::Single(_) | Payload::Multi(_) => Removal::Unchanged,
    })
}

// ---------------------------------------------------------------------------
// Immutable multimap
// ---------------------------------------------------------------------------

/// Persistent set-multimap based on a CHAMP trie.
///
/// Mutating methods return a new multimap; `self` is never modified.
pub struct ChampSetMultimap<K, V> {
    root: Root<K, V>,
    size: usize,
}

impl<K, V> ChampSetMultimap<K, V> {
    /// Creates an empty multimap.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: Arc::new(Node::empty()),
            size: 0,
        }
    }

    /// Returns the number of `(key, value)` tuples.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.size
    }

    /// Returns the number of distinct keys. Linear in the key count.
    #[must_use]
    pub fn len_distinct(&self) -> usize {
        self.keys().count()
    }

    /// Returns `true` if the multimap holds no tuples.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns an iterator over the `(key, value)` tuples.
    #[must_use]
    pub fn iter(&self) -> Tuples<'_, K, V> {
        Tuples::new(&self.root, self.size)
    }

    /// Returns an iterator over the distinct keys.
    #[must_use]
    pub fn keys(&self) -> Keys<'_, K, Payload<V>> {
        Keys::new(&self.root)
    }

    /// Returns an iterator over the values of every tuple.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, value)| value)
    }

    /// Returns `true` if both multimaps share the same root node.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.root, &other.root)
    }

    /// Always `true`: the multimap can be edited through a transient.
    #[must_use]
    pub const fn is_transient_supported(&self) -> bool {
        true
    }

    #[cfg(test)]
    pub(crate) const fn root_node(&self) -> &Arc<Node<K, Payload<V>>> {
        &self.root
    }
}

impl<K: Hash + Eq, V> ChampSetMultimap<K, V> {
    /// Returns the payload stored under `key`.
    #[must_use]
    pub fn get_payload(&self, key: &K) -> Option<&Payload<V>> {
        get_recursive(&self.root, adhash::hash_one(key), key, 0).map(|e| &e.payload)
    }

    /// Returns `true` if `key` has at least one value.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.get_payload(key).is_some()
    }

    /// Returns `true` if some key holds `value`. Linear in the tuple count.
    #[must_use]
    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.values().any(|v| v == value)
    }
}

impl<K: Hash + Eq, V: Hash + Eq> ChampSetMultimap<K, V> {
    /// Returns `true` if the tuple `(key, value)` is present.
    #[must_use]
    pub fn contains_entry(&self, key: &K, value: &V) -> bool {
        self.get_payload(key).is_some_and(|payload| payload.contains(value))
    }

    /// Order-independent hash of the tuple set; equal to the content hash
    /// of the `ChampSet<(K, V)>` holding the same tuples.
    #[must_use]
    pub fn content_hash(&self) -> u64 {
        adhash::adhash(self.iter())
    }
}

impl<K, V> ChampSetMultimap<K, V>
where
    K: Hash + Eq + Clone,
    V: Hash + Eq + Clone,
{
    /// Returns the values under `key`; empty if the key is absent.
    #[must_use]
    pub fn get(&self, key: &K) -> ChampSet<V> {
        self.get_payload(key).map_or_else(ChampSet::new, Payload::to_set)
    }

    /// Returns a multimap that also holds the tuple `(key, value)`.
    #[must_use]
    pub fn insert(&self, key: K, value: V) -> Self {
        self.insert_with_result(key, value).0
    }

    /// Like [`insert`](Self::insert), also returning the mutation report.
    #[must_use]
    pub fn insert_with_result(&self, key: K, value: V) -> (Self, MutationResult<Payload<V>>) {
        self.apply(|root| insert_tuple(root, Edit::Persistent, key, value))
    }

    /// Returns a multimap where `value` is the only value under `key`.
    #[must_use]
    pub fn put(&self, key: K, value: V) -> Self {
        self.put_with_result(key, value).0
    }

    /// Like [`put`](Self::put), also returning the mutation report.
    #[must_use]
    pub fn put_with_result(&self, key: K, value: V) -> (Self, MutationResult<Payload<V>>) {
        self.apply(|root| put_single(root, Edit::Persistent, key, value))
    }

    /// Returns a multimap without any tuple for `key`.
    #[must_use]
    pub fn remove(&self, key: &K) -> Self {
        self.apply(|root| remove_key(root, Edit::Persistent, key)).0
    }

    /// Returns a multimap without the tuple `(key, value)`.
    #[must_use]
    pub fn remove_entry(&self, key: &K, value: &V) -> Self {
        self.remove_entry_with_result(key, value).0
    }

    /// Like [`remove_entry`](Self::remove_entry), also returning the
    /// mutation report.
    #[must_use]
    pub fn remove_entry_with_result(
        &self,
        key: &K,
        value: &V,
    ) -> (Self, MutationResult<Payload<V>>) {
        self.apply(|root| remove_tuple(root, Edit::Persistent, key, value))
    }

    /// Returns a multimap holding the tuples of both `self` and `other`.
    ///
    /// The size grows by the number of tuples of `other` not already here.
    #[must_use]
    pub fn insert_all(&self, other: &Self) -> Self {
        self.insert_tuples(other.iter().map(|(k, v)| (k.clone(), v.clone())))
    }

    fn insert_tuples(&self, tuples: impl IntoIterator<Item = (K, V)>) -> Self {
        let edit = Edit::Transient(Owner::mint());
        let mut root = Arc::clone(&self.root);
        let mut size = self.size;
        for (key, value) in tuples {
            size = insert_tuple(&mut root, edit, key, value).resize(size);
        }
        Self { root, size }
    }

    /// Opens a transient builder over this multimap's contents.
    #[must_use]
    pub fn as_transient(&self) -> TransientSetMultimap<K, V> {
        TransientSetMultimap {
            root: Arc::clone(&self.root),
            size: self.size,
            owner: Some(Owner::mint()),
        }
    }

    fn apply<F>(&self, op: F) -> (Self, MutationResult<Payload<V>>)
    where
        F: FnOnce(&mut Root<K, V>) -> MutationResult<Payload<V>>,
    {
        let mut root = Arc::clone(&self.root);
        let result = op(&mut root);
        if !result.is_modified() {
            return (self.clone(), result);
        }
        let map = Self {
            root,
            size: result.resize(self.size),
        };
        (map, result)
    }
}

// ---------------------------------------------------------------------------
// Transient multimap
// ---------------------------------------------------------------------------

/// Batch-mutable builder for a [`ChampSetMultimap`].
///
/// Every mutating call reports whether the contents changed and fails with
/// [`Error::InvalidState`] once the builder is frozen.
pub struct TransientSetMultimap<K, V> {
    root: Root<K, V>,
    size: usize,
    owner: Option<Owner>,
}

impl<K, V> TransientSetMultimap<K, V> {
    /// Returns the number of `(key, value)` tuples.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if the builder holds no tuples.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the number of distinct keys. Linear in the key count.
    #[must_use]
    pub fn len_distinct(&self) -> usize {
        self.keys().count()
    }

    /// Returns an iterator over the current `(key, value)` tuples.
    #[must_use]
    pub fn iter(&self) -> Tuples<'_, K, V> {
        Tuples::new(&self.root, self.size)
    }

    /// Returns an iterator over the current distinct keys.
    #[must_use]
    pub fn keys(&self) -> Keys<'_, K, Payload<V>> {
        Keys::new(&self.root)
    }

    /// Returns an iterator over the values of every current tuple.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, value)| value)
    }

    fn edit(&self) -> Result<Edit> {
        self.owner.map(Edit::Transient).ok_or_else(|| {
            tracing::debug!("mutation rejected by frozen transient multimap");
            Error::InvalidState("transient multimap is frozen")
        })
    }

    /// Ends transient mode, returning the contents as an immutable multimap.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] if the builder is already frozen.
    pub fn freeze(&mut self) -> Result<ChampSetMultimap<K, V>> {
        let owner = self
            .owner
            .take()
            .ok_or(Error::InvalidState("transient multimap is already frozen"))?;
        tracing::trace!(owner = owner.id(), "transient multimap frozen");
        Ok(ChampSetMultimap {
            root: Arc::clone(&self.root),
            size: self.size,
        })
    }

    fn apply<F>(&mut self, op: F) -> Result<bool>
    where
        F: FnOnce(&mut Root<K, V>, Edit) -> MutationResult<Payload<V>>,
    {
        let edit = self.edit()?;
        let result = op(&mut self.root, edit);
        self.size = result.resize(self.size);
        Ok(result.is_modified())
    }
}

impl<K: Hash + Eq, V> TransientSetMultimap<K, V> {
    /// Returns the payload currently stored under `key`.
    #[must_use]
    pub fn get_payload(&self, key: &K) -> Option<&Payload<V>> {
        get_recursive(&self.root, adhash::hash_one(key), key, 0).map(|e| &e.payload)
    }

    /// Returns `true` if `key` has at least one value.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.get_payload(key).is_some()
    }

    /// Returns `true` if some key holds `value`. Linear in the tuple count.
    #[must_use]
    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.values().any(|v| v == value)
    }
}

impl<K: Hash + Eq, V: Hash + Eq> TransientSetMultimap<K, V> {
    /// Returns `true` if the tuple `(key, value)` is present.
    #[must_use]
    pub fn contains_entry(&self, key: &K, value: &V) -> bool {
        self.get_payload(key).is_some_and(|payload| payload.contains(value))
    }
}

impl<K, V> TransientSetMultimap<K, V>
where
    K: Hash + Eq + Clone,
    V: Hash + Eq + Clone,
{
    /// Returns the current values under `key`; empty if the key is absent.
    #[must_use]
    pub fn get(&self, key: &K) -> ChampSet<V> {
        self.get_payload(key).map_or_else(ChampSet::new, Payload::to_set)
    }

    /// Adds the tuple `(key, value)`. Returns `true` if it was new.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] if the builder is frozen.
    pub fn insert(&mut self, key: K, value: V) -> Result<bool> {
        self.apply(|root, edit| insert_tuple(root, edit, key, value))
    }

    /// Adds every tuple of `other`. Returns `true` if any was new.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] if the builder is frozen.
    pub fn insert_all(&mut self, other: &ChampSetMultimap<K, V>) -> Result<bool> {
        let edit = self.edit()?;
        let mut changed = false;
        for (key, value) in other {
            let result = insert_tuple(&mut self.root, edit, key.clone(), value.clone());
            self.size = result.resize(self.size);
            changed |= result.is_modified();
        }
        Ok(changed)
    }

    /// Makes `value` the only value under `key`. Returns `true` if the
    /// contents changed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] if the builder is frozen.
    pub fn put(&mut self, key: K, value: V) -> Result<bool> {
        self.apply(|root, edit| put_single(root, edit, key, value))
    }

    /// Removes every tuple for `key`. Returns `true` if the key was present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] if the builder is frozen.
    pub fn remove(&mut self, key: &K) -> Result<bool> {
        self.apply(|root, edit| remove_key(root, edit, key))
    }

    /// Removes the tuple `(key, value)`. Returns `true` if it was present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] if the builder is frozen.
    pub fn remove_entry(&mut self, key: &K, value: &V) -> Result<bool> {
        self.apply(|root, edit| remove_tuple(root, edit, key, value))
    }
}

impl<'a, K, V> IntoIterator for &'a TransientSetMultimap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Tuples<'a, K, V>;

    fn into_iter(self) -> Tuples<'a, K, V> {
        self.iter()
    }
}

impl<K, V> fmt::Debug for TransientSetMultimap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransientSetMultimap")
            .field("len", &self.size)
            .field("owner", &self.owner.map(Owner::id))
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Trait impls
// ---------------------------------------------------------------------------

impl<K, V> Clone for ChampSetMultimap<K, V> {
    fn clone(&self) -> Self {
        Self {
            root: Arc::clone(&self.root),
            size: self.size,
        }
    }
}

impl<K, V> Default for ChampSetMultimap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for ChampSetMultimap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K: Hash + Eq, V: Hash + Eq> PartialEq for ChampSetMultimap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size
            && (self.ptr_eq(other) || self.iter().all(|(k, v)| other.contains_entry(k, v)))
    }
}

impl<K: Hash + Eq, V: Hash + Eq> Eq for ChampSetMultimap<K, V> {}

impl<K: Hash + Eq, V: Hash + Eq> Hash for ChampSetMultimap<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.content_hash());
    }
}

impl<K: Hash + Eq, V: Hash + Eq> PartialEq<ChampSet<(K, V)>> for ChampSetMultimap<K, V> {
    fn eq(&self, other: &ChampSet<(K, V)>) -> bool {
        // Both sides hold distinct tuples, so equal sizes plus inclusion
        // is equality.
        self.size == other.len() && other.iter().all(|(k, v)| self.contains_entry(k, v))
    }
}

impl<K: Hash + Eq, V: Hash + Eq> PartialEq<ChampSetMultimap<K, V>> for ChampSet<(K, V)> {
    fn eq(&self, other: &ChampSetMultimap<K, V>) -> bool {
        other == self
    }
}

impl<K, V> FromIterator<(K, V)> for ChampSetMultimap<K, V>
where
    K: Hash + Eq + Clone,
    V: Hash + Eq + Clone,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new().insert_tuples(iter)
    }
}

impl<'a, K, V> IntoIterator for &'a ChampSetMultimap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Tuples<'a, K, V>;

    fn into_iter(self) -> Tuples<'a, K, V> {
        self.iter()
    }
}
