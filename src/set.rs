//! Persistent hash set and its transient builder.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::adhash;
use crate::error::{Error, Result};
use crate::iter::Iter;
use crate::node::Node;
use crate::ops::get::get_recursive;
use crate::ops::insert::insert_recursive;
use crate::ops::remove::remove_recursive;
use crate::owner::{Edit, Owner};
use crate::result::{Detail, Details, MutationResult, Removal, Resolution};

/// Persistent hash set based on a CHAMP trie.
///
/// Every mutating method returns a new set and leaves `self` untouched;
/// the two share every node the mutation did not touch. Cloning is O(1).
pub struct ChampSet<T> {
    root: Arc<Node<T, ()>>,
    size: usize,
}

// ---------------------------------------------------------------------------
// Shared trie edits (immutable and transient)
// ---------------------------------------------------------------------------

fn insert_element<T: Hash + Eq + Clone>(
    root: &mut Arc<Node<T, ()>>,
    edit: Edit,
    element: T,
) -> MutationResult<()> {
    let hash = adhash::hash_one(&element);
    insert_recursive(root, edit, hash, element, 0, |existing| match existing {
        Some(()) => Resolution::Unchanged,
        None => Resolution::Store {
            payload: (),
            details: Details::of(Detail::KeyAdded),
            size_delta: 1,
        },
    })
}

fn remove_element<T: Hash + Eq + Clone>(
    root: &mut Arc<Node<T, ()>>,
    edit: Edit,
    element: &T,
) -> MutationResult<()> {
    let hash = adhash::hash_one(element);
    remove_recursive(root, edit, hash, element, 0, |()| Removal::Evict {
        details: Details::of(Detail::KeyRemoved),
        size_delta: -1,
    })
}

// ---------------------------------------------------------------------------
// Construction & accessors: no trait bounds
// ---------------------------------------------------------------------------

impl<T> ChampSet<T> {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: Arc::new(Node::empty()),
            size: 0,
        }
    }

    /// Returns the number of elements.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if the set contains no elements.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns an iterator over the elements, in trie order.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(&self.root, self.size)
    }

    /// Returns `true` if both sets share the same root node.
    ///
    /// A no-op mutation returns a set for which this holds.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.root, &other.root)
    }

    /// Always `true`: the set can be edited through a transient.
    #[must_use]
    pub const fn is_transient_supported(&self) -> bool {
        true
    }

    #[cfg(test)]
    pub(crate) const fn root_node(&self) -> &Arc<Node<T, ()>> {
        &self.root
    }
}

// ---------------------------------------------------------------------------
// Read operations: T: Hash + Eq
// ---------------------------------------------------------------------------

impl<T: Hash + Eq> ChampSet<T> {
    /// Returns `true` if the set contains `element`.
    #[must_use]
    pub fn contains(&self, element: &T) -> bool {
        self.get(element).is_some()
    }

    /// Returns the stored element equal to `element`.
    #[must_use]
    pub fn get(&self, element: &T) -> Option<&T> {
        get_recursive(&self.root, adhash::hash_one(element), element, 0).map(|e| &e.key)
    }

    /// Order-independent hash of the contents: the wrapping sum of the
    /// element hashes.
    #[must_use]
    pub fn content_hash(&self) -> u64 {
        adhash::adhash(self.iter())
    }
}

// ---------------------------------------------------------------------------
// Write operations: T: Hash + Eq + Clone
// ---------------------------------------------------------------------------

impl<T: Hash + Eq + Clone> ChampSet<T> {
    /// Returns a set that also contains `element`.
    ///
    /// If `element` is already present the result shares this set's root.
    #[must_use]
    pub fn insert(&self, element: T) -> Self {
        let mut root = Arc::clone(&self.root);
        let result = insert_element(&mut root, Edit::Persistent, element);
        self.with(root, &result)
    }

    /// Returns a set without `element`.
    #[must_use]
    pub fn remove(&self, element: &T) -> Self {
        let mut root = Arc::clone(&self.root);
        let result = remove_element(&mut root, Edit::Persistent, element);
        self.with(root, &result)
    }

    /// Returns a set that also contains every element of `elements`.
    ///
    /// The batch runs under a private transient owner.
    #[must_use]
    pub fn insert_all(&self, elements: impl IntoIterator<Item = T>) -> Self {
        let edit = Edit::Transient(Owner::mint());
        let mut root = Arc::clone(&self.root);
        let mut size = self.size;
        for element in elements {
            size = insert_element(&mut root, edit, element).resize(size);
        }
        Self { root, size }
    }

    /// Returns a set without any element of `elements`.
    #[must_use]
    pub fn remove_all<'a>(&self, elements: impl IntoIterator<Item = &'a T>) -> Self
    where
        T: 'a,
    {
        let edit = Edit::Transient(Owner::mint());
        let mut root = Arc::clone(&self.root);
        let mut size = self.size;
        for element in elements {
            size = remove_element(&mut root, edit, element).resize(size);
        }
        Self { root, size }
    }

    /// Opens a transient builder over this set's contents.
    #[must_use]
    pub fn as_transient(&self) -> TransientSet<T> {
        TransientSet {
            root: Arc::clone(&self.root),
            size: self.size,
            owner: Some(Owner::mint()),
        }
    }

    fn with(&self, root: Arc<Node<T, ()>>, result: &MutationResult<()>) -> Self {
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

/// Batch-mutable builder for a [`ChampSet`].
///
/// Nodes created or copied by this builder are stamped with its owner
/// token and edited in place by later calls. After [`freeze`](Self::freeze)
/// every mutating call fails with [`Error::InvalidState`]. Not meant to be
/// shared between writers.
pub struct TransientSet<T> {
    root: Arc<Node<T, ()>>,
    size: usize,
    owner: Option<Owner>,
}

impl<T> TransientSet<T> {
    /// Returns the number of elements.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if the builder holds no elements.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns `true` once [`freeze`](Self::freeze) has been called.
    #[must_use]
    pub const fn is_frozen(&self) -> bool {
        self.owner.is_none()
    }

    /// Returns an iterator over the current elements.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(&self.root, self.size)
    }

    #[cfg(test)]
    pub(crate) const fn root_node(&self) -> &Arc<Node<T, ()>> {
        &self.root
    }

    fn edit(&self) -> Result<Edit> {
        self.owner.map(Edit::Transient).ok_or_else(|| {
            tracing::debug!("mutation rejected by frozen transient set");
            Error::InvalidState("transient set is frozen")
        })
    }

    /// Ends transient mode, returning the contents as an immutable set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] if the builder is already frozen.
    pub fn freeze(&mut self) -> Result<ChampSet<T>> {
        let owner = self
            .owner
            .take()
            .ok_or(Error::InvalidState("transient set is already frozen"))?;
        tracing::trace!(owner = owner.id(), "transient set frozen");
        Ok(ChampSet {
            root: Arc::clone(&self.root),
            size: self.size,
        })
    }
}

impl<T: Hash + Eq> TransientSet<T> {
    /// Returns `true` if the builder contains `element`.
    #[must_use]
    pub fn contains(&self, element: &T) -> bool {
        get_recursive(&self.root, adhash::hash_one(element), element, 0).is_some()
    }
}

impl<T: Hash + Eq + Clone> TransientSet<T> {
    /// Adds `element`. Returns `true` if it was not present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] if the builder is frozen.
    pub fn insert(&mut self, element: T) -> Result<bool> {
        let edit = self.edit()?;
        Ok(self.apply(edit, |root, edit| insert_element(root, edit, element)))
    }

    /// Removes `element`. Returns `true` if it was present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] if the builder is frozen.
    pub fn remove(&mut self, element: &T) -> Result<bool> {
        let edit = self.edit()?;
        Ok(self.apply(edit, |root, edit| remove_element(root, edit, element)))
    }

    /// Adds every element of `elements`. Returns `true` if any was new.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] if the builder is frozen.
    pub fn insert_all(&mut self, elements: impl IntoIterator<Item = T>) -> Result<bool> {
        let edit = self.edit()?;
        let mut changed = false;
        for element in elements {
            changed |= self.apply(edit, |root, edit| insert_element(root, edit, element));
        }
        Ok(changed)
    }

    /// Removes every element of `elements`. Returns `true` if any was
    /// present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] if the builder is frozen.
    pub fn remove_all<'a>(&mut self, elements: impl IntoIterator<Item = &'a T>) -> Result<bool>
    where
        T: 'a,
    {
        let edit = self.edit()?;
        let mut changed = false;
        for element in elements {
            changed |= self.apply(edit, |root, edit| remove_element(root, edit, element));
        }
        Ok(changed)
    }

    fn apply<F>(&mut self, edit: Edit, op: F) -> bool
    where
        F: FnOnce(&mut Arc<Node<T, ()>>, Edit) -> MutationResult<()>,
    {
        let result = op(&mut self.root, edit);
        self.size = result.resize(self.size);
        result.is_modified()
    }
}

impl<'a, T> IntoIterator for &'a TransientSet<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T> fmt::Debug for TransientSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransientSet")
            .field("len", &self.size)
            .field("owner", &self.owner.map(Owner::id))
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Trait impls
// ---------------------------------------------------------------------------

impl<T> Clone for ChampSet<T> {
    fn clone(&self) -> Self {
        Self {
            root: Arc::clone(&self.root),
            size: self.size,
        }
    }
}

impl<T> Default for ChampSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for ChampSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T: Hash + Eq> PartialEq for ChampSet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size && (self.ptr_eq(other) || self.iter().all(|e| other.contains(e)))
    }
}

impl<T: Hash + Eq> Eq for ChampSet<T> {}

impl<T: Hash + Eq> Hash for ChampSet<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.content_hash());
    }
}

impl<T: Hash + Eq + Clone> FromIterator<T> for ChampSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new().insert_all(iter)
    }
}

impl<'a, T> IntoIterator for &'a ChampSet<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}
