//! Persistent hash map and its transient builder.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops;
use std::sync::Arc;

use crate::adhash;
use crate::error::{Error, Result};
use crate::iter::{Keys, MapIter, Values};
use crate::node::Node;
use crate::ops::get::get_recursive;
use crate::ops::insert::insert_recursive;
use crate::ops::remove::remove_recursive;
use crate::owner::{Edit, Owner};
use crate::result::{Detail, Details, MutationResult, Removal, Resolution};

/// Persistent hash map based on a CHAMP trie.
///
/// Same set of key-value pairs always produces the same trie structure
/// (canonical form). Mutations return a new map sharing untouched nodes.
pub struct ChampMap<K, V> {
    root: Arc<Node<K, V>>,
    size: usize,
}

fn put_value<K, V>(root: &mut Arc<Node<K, V>>, edit: Edit, key: K, value: V) -> MutationResult<V>
where
    K: Hash + Eq + Clone,
    V: Clone + PartialEq,
{
    let hash = adhash::hash_one(&key);
    insert_recursive(root, edit, hash, key, 0, |existing| match existing {
        Some(old) if *old == value => Resolution::Unchanged,
        Some(_) => Resolution::Store {
            payload: value,
            details: Details::of(Detail::ValueReplaced),
            size_delta: 0,
        },
        None => Resolution::Store {
            payload: value,
            details: Details::of(Detail::KeyAdded).with(Detail::ValueAdded),
            size_delta: 1,
        },
    })
}

fn remove_key<K, V>(root: &mut Arc<Node<K, V>>, edit: Edit, key: &K) -> MutationResult<V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    let hash = adhash::hash_one(key);
    remove_recursive(root, edit, hash, key, 0, |_| Removal::Evict {
        details: Details::of(Detail::KeyRemoved).with(Detail::LastValueRemoved),
        size_delta: -1,
    })
}

// ---------------------------------------------------------------------------
// Construction & accessors: no trait bounds
// ---------------------------------------------------------------------------

impl<K, V> ChampMap<K, V> {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: Arc::new(Node::empty()),
            size: 0,
        }
    }

    /// Returns the number of key-value pairs.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if the map contains no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns an iterator over `(&K, &V)` pairs.
    #[must_use]
    pub fn iter(&self) -> MapIter<'_, K, V> {
        MapIter::new(&self.root, self.size)
    }

    /// Returns an iterator over the keys.
    #[must_use]
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys::new(&self.root)
    }

    /// Returns an iterator over the values.
    #[must_use]
    pub fn values(&self) -> Values<'_, K, V> {
        Values::new(&self.root, self.size)
    }

    /// Returns `true` if both maps share the same root node.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.root, &other.root)
    }

    /// Always `true`: the map can be edited through a transient.
    #[must_use]
    pub const fn is_transient_supported(&self) -> bool {
        true
    }

    #[cfg(test)]
    pub(crate) const fn root_node(&self) -> &Arc<Node<K, V>> {
        &self.root
    }
}

// ---------------------------------------------------------------------------
// Read operations: K: Hash + Eq
// ---------------------------------------------------------------------------

impl<K: Hash + Eq, V> ChampMap<K, V> {
    /// Returns a reference to the value associated with `key`.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        get_recursive(&self.root, adhash::hash_one(key), key, 0).map(|e| &e.payload)
    }

    /// Returns `true` if the map contains the given key.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Returns `true` if some key maps to `value`. Linear in the map size.
    #[must_use]
    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.values().any(|v| v == value)
    }

    /// Order-independent hash of the contents: the wrapping sum of the
    /// `(key, value)` pair hashes.
    #[must_use]
    pub fn content_hash(&self) -> u64
    where
        V: Hash,
    {
        adhash::adhash(self.iter())
    }
}

// ---------------------------------------------------------------------------
// Write operations: K: Hash + Eq + Clone, V: Clone + PartialEq
// ---------------------------------------------------------------------------

impl<K, V> ChampMap<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone + PartialEq,
{
    /// Returns a map where `key` is associated with `value`.
    ///
    /// Storing a value equal to the current one returns a map sharing this
    /// map's root.
    #[must_use]
    pub fn insert(&self, key: K, value: V) -> Self {
        self.replace(key, value).0
    }

    /// Like [`insert`](Self::insert), also returning the replaced value.
    ///
    /// The second element is `None` both when `key` was absent and when it
    /// already held a value equal to `value`; in the latter case the map is
    /// returned unchanged and shares this map's root.
    #[must_use]
    pub fn replace(&self, key: K, value: V) -> (Self, Option<V>) {
        let mut root = Arc::clone(&self.root);
        let result = put_value(&mut root, Edit::Persistent, key, value);
        let map = self.with(root, &result);
        (map, result.into_evicted())
    }

    /// Returns a map without `key`.
    #[must_use]
    pub fn remove(&self, key: &K) -> Self {
        let mut root = Arc::clone(&self.root);
        let result = remove_key(&mut root, Edit::Persistent, key);
        self.with(root, &result)
    }

    /// Returns a map extended with every pair of `entries`; later pairs win.
    #[must_use]
    pub fn insert_all(&self, entries: impl IntoIterator<Item = (K, V)>) -> Self {
        let edit = Edit::Transient(Owner::mint());
        let mut root = Arc::clone(&self.root);
        let mut size = self.size;
        for (key, value) in entries {
            size = put_value(&mut root, edit, key, value).resize(size);
        }
        Self { root, size }
    }

    /// Opens a transient builder over this map's contents.
    #[must_use]
    pub fn as_transient(&self) -> TransientMap<K, V> {
        TransientMap {
            root: Arc::clone(&self.root),
            size: self.size,
            owner: Some(Owner::mint()),
        }
    }

    fn with(&self, root: Arc<Node<K, V>>, result: &MutationResult<V>) -> Self {
        if result.is_modified() {
            Self {
                root,
                size: result.resize(self.size),
            }
        } else {
            self.clone()
        }
    }
}

// ---------------------------------------------------------------------------
// Transient
// ---------------------------------------------------------------------------

/// Batch-mutable builder for a [`ChampMap`].
pub struct TransientMap<K, V> {
    root: Arc<Node<K, V>>,
    size: usize,
    owner: Option<Owner>,
}

impl<K, V> TransientMap<K, V> {
    /// Returns the number of key-value pairs.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if the builder holds no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns an iterator over the current `(&K, &V)` pairs.
    #[must_use]
    pub fn iter(&self) -> MapIter<'_, K, V> {
        MapIter::new(&self.root, self.size)
    }

    /// Returns an iterator over the current keys.
    #[must_use]
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys::new(&self.root)
    }

    /// Returns an iterator over the current values.
    #[must_use]
    pub fn values(&self) -> Values<'_, K, V> {
        Values::new(&self.root, self.size)
    }

    fn edit(&self) -> Result<Edit> {
        self.owner.map(Edit::Transient).ok_or_else(|| {
            tracing::debug!("mutation rejected by frozen transient map");
            Error::InvalidState("transient map is frozen")
        })
    }

    /// Ends transient mode, returning the contents as an immutable map.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] if the builder is already frozen.
    pub fn freeze(&mut self) -> Result<ChampMap<K, V>> {
        let owner = self
            .owner
            .take()
            .ok_or(Error::InvalidState("transient map is already frozen"))?;
        tracing::trace!(owner = owner.id(), "transient map frozen");
        Ok(ChampMap {
            root: Arc::clone(&self.root),
            size: self.size,
        })
    }
}

impl<K: Hash + Eq, V> TransientMap<K, V> {
    /// Returns a reference to the value associated with `key`.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        get_recursive(&self.root, adhash::hash_one(key), key, 0).map(|e| &e.payload)
    }

    /// Returns `true` if the builder contains the given key.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Returns `true` if some key maps to `value`.
    #[must_use]
    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.values().any(|v| v == value)
    }
}

impl<K, V> TransientMap<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone + PartialEq,
{
    /// Associates `key` with `value`. Returns `true` if the map changed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] if the builder is frozen.
    pub fn insert(&mut self, key: K, value: V) -> Result<bool> {
        let edit = self.edit()?;
        let result = put_value(&mut self.root, edit, key, value);
        self.size = result.resize(self.size);
        Ok(result.is_modified())
    }

    /// Removes `key`. Returns `true` if it was present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] if the builder is frozen.
    pub fn remove(&mut self, key: &K) -> Result<bool> {
        let edit = self.edit()?;
        let result = remove_key(&mut self.root, edit, key);
        self.size = result.resize(self.size);
        Ok(result.is_modified())
    }
}

impl<'a, K, V> IntoIterator for &'a TransientMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = MapIter<'a, K, V>;

    fn into_iter(self) -> MapIter<'a, K, V> {
        self.iter()
    }
}

impl<K, V> fmt::Debug for TransientMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransientMap")
            .field("len", &self.size)
            .field("owner", &self.owner.map(Owner::id))
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Trait impls
// ---------------------------------------------------------------------------

impl<K, V> Clone for ChampMap<K, V> {
    fn clone(&self) -> Self {
        Self {
            root: Arc::clone(&self.root),
            size: self.size,
        }
    }
}

impl<K, V> Default for ChampMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for ChampMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Hash + Eq, V: PartialEq> PartialEq for ChampMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size
            && (self.ptr_eq(other) || self.iter().all(|(k, v)| other.get(k) == Some(v)))
    }
}

impl<K: Hash + Eq, V: Eq> Eq for ChampMap<K, V> {}

impl<K: Hash + Eq, V: Hash> Hash for ChampMap<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.content_hash());
    }
}

impl<K, V> FromIterator<(K, V)> for ChampMap<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone + PartialEq,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new().insert_all(iter)
    }
}

impl<K: Hash + Eq, V> ops::Index<&K> for ChampMap<K, V> {
    type Output = V;

    fn index(&self, key: &K) -> &V {
        self.get(key).expect("key not found")
    }
}

impl<'a, K, V> IntoIterator for &'a ChampMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = MapIter<'a, K, V>;

    fn into_iter(self) -> MapIter<'a, K, V> {
        self.iter()
    }
}
