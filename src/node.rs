//! CHAMP trie node types and bitmap helpers.

use std::fmt;
use std::sync::Arc;

use crate::owner::Owner;

/// Bits per trie level (5 → 32-way branching).
pub const BITS_PER_LEVEL: u32 = 5;

/// Maximum bit-shift value (depth 12, last level uses 4 bits).
pub const MAX_SHIFT: u32 = 60;

/// Inline entry storing a key, its payload and the precomputed key hash.
///
/// The payload is `()` for sets, the value for maps and a
/// [`Payload`](crate::Payload) for set-multimaps.
#[derive(Clone)]
pub struct Entry<K, P> {
    /// Precomputed 64-bit hash of the key.
    pub hash: u64,
    /// The key.
    pub key: K,
    /// The payload stored under the key.
    pub payload: P,
}

/// Bitmap-compressed node for one 5-bit hash fragment at one depth.
///
/// Invariants: `data_map & node_map == 0`, `entries.len() ==
/// data_map.count_ones()`, `children.len() == node_map.count_ones()`, both
/// sequences ordered by ascending bit position.
pub struct InnerNode<K, P> {
    /// Bitmap of positions occupied by inline entries.
    pub data_map: u32,
    /// Bitmap of positions occupied by child subtrees.
    pub node_map: u32,
    /// Dense inline entries.
    pub entries: Vec<Entry<K, P>>,
    /// Dense child subtrees.
    pub children: Vec<Arc<Node<K, P>>>,
    /// Transient allowed to edit this node in place.
    pub owner: Option<Owner>,
}

/// Terminal node for keys whose full 64-bit hashes are equal.
///
/// Invariant: `entries.len() >= 2`, lookups compare keys linearly.
pub struct CollisionNode<K, P> {
    /// The shared 64-bit hash value.
    pub hash: u64,
    /// Colliding entries in insertion order.
    pub entries: Vec<Entry<K, P>>,
    /// Transient allowed to edit this node in place.
    pub owner: Option<Owner>,
}

/// CHAMP trie node.
pub enum Node<K, P> {
    /// Bitmap-compressed inner node.
    Inner(InnerNode<K, P>),
    /// Collision node below [`MAX_SHIFT`].
    Collision(CollisionNode<K, P>),
}

// ---------------------------------------------------------------------------
// Bitmap helpers
// ---------------------------------------------------------------------------

/// Extracts the 5-bit hash fragment at the given bit-shift depth.
#[inline]
#[must_use]
pub const fn fragment(hash: u64, shift: u32) -> u32 {
    ((hash >> shift) & 0x1F) as u32
}

/// Returns the single-bit mask for the given fragment (0..31).
#[inline]
#[must_use]
pub const fn mask(frag: u32) -> u32 {
    1 << frag
}

/// Returns the compact index of `bit` within `bitmap`.
///
/// Counts the number of set bits below `bit`.
#[inline]
#[must_use]
pub const fn index(bitmap: u32, bit: u32) -> usize {
    (bitmap & (bit - 1)).count_ones() as usize
}

// ---------------------------------------------------------------------------
// Inner node edits
// ---------------------------------------------------------------------------

impl<K, P> InnerNode<K, P> {
    /// Creates a node with no entries and no children.
    pub const fn empty() -> Self {
        Self {
            data_map: 0,
            node_map: 0,
            entries: Vec::new(),
            children: Vec::new(),
            owner: None,
        }
    }

    /// Wraps the last survivor of a collision node.
    ///
    /// Its bit position is irrelevant: the parent inlines it immediately.
    pub fn singleton(entries: Vec<Entry<K, P>>, owner: Option<Owner>) -> Self {
        let data_map = entries.first().map_or(0, |e| mask(fragment(e.hash, 0)));
        Self {
            data_map,
            node_map: 0,
            entries,
            children: Vec::new(),
            owner,
        }
    }

    /// Adds an inline entry at the empty position `bit`.
    pub fn insert_entry(&mut self, bit: u32, entry: Entry<K, P>) {
        self.data_map |= bit;
        self.entries.insert(index(self.data_map, bit), entry);
    }

    /// Removes and returns the inline entry at `bit`.
    pub fn remove_entry(&mut self, bit: u32) -> Entry<K, P> {
        let entry = self.entries.remove(index(self.data_map, bit));
        self.data_map &= !bit;
        entry
    }

    /// Adds a child subtree at the empty position `bit`.
    pub fn insert_child(&mut self, bit: u32, child: Arc<Node<K, P>>) {
        self.node_map |= bit;
        self.children.insert(index(self.node_map, bit), child);
    }

    /// Removes and returns the child subtree at `bit`.
    pub fn remove_child(&mut self, bit: u32) -> Arc<Node<K, P>> {
        let child = self.children.remove(index(self.node_map, bit));
        self.node_map &= !bit;
        child
    }
}

impl<K: Clone, P: Clone> InnerNode<K, P> {
    /// Canonical form: replaces the single-entry child at `bit` with its
    /// sole entry, inlined into this node.
    pub fn inline_child(&mut self, bit: u32) {
        let child = Arc::unwrap_or_clone(self.remove_child(bit));
        let entry = child
            .into_entries()
            .pop()
            .expect("inlined child holds exactly one entry");
        self.insert_entry(bit, entry);
    }
}

// ---------------------------------------------------------------------------
// Node accessors
// ---------------------------------------------------------------------------

impl<K, P> Node<K, P> {
    /// Creates the empty root node.
    pub const fn empty() -> Self {
        Self::Inner(InnerNode::empty())
    }

    /// Returns the owner stamp of this node.
    pub const fn owner(&self) -> Option<Owner> {
        match self {
            Self::Inner(inner) => inner.owner,
            Self::Collision(collision) => collision.owner,
        }
    }

    /// Replaces the owner stamp of this node.
    pub const fn set_owner(&mut self, owner: Option<Owner>) {
        match self {
            Self::Inner(inner) => inner.owner = owner,
            Self::Collision(collision) => collision.owner = owner,
        }
    }

    /// Inline entries of this node, in iteration order.
    pub fn entries(&self) -> &[Entry<K, P>] {
        match self {
            Self::Inner(inner) => &inner.entries,
            Self::Collision(collision) => &collision.entries,
        }
    }

    /// Child subtrees of this node (always empty for collision nodes).
    pub fn children(&self) -> &[Arc<Self>] {
        match self {
            Self::Inner(inner) => &inner.children,
            Self::Collision(_) => &[],
        }
    }

    /// `true` if this node holds exactly one entry and no children, and
    /// must therefore be inlined into its parent.
    pub const fn is_singleton(&self) -> bool {
        match self {
            Self::Inner(inner) => inner.data_map.is_power_of_two() && inner.node_map == 0,
            Self::Collision(_) => false,
        }
    }

    /// Consumes the node, returning its inline entries.
    pub fn into_entries(self) -> Vec<Entry<K, P>> {
        match self {
            Self::Inner(inner) => inner.entries,
            Self::Collision(collision) => collision.entries,
        }
    }
}

// ---------------------------------------------------------------------------
// Manual trait impls: a copy of a node is owned by nobody.
// ---------------------------------------------------------------------------

impl<K: Clone, P: Clone> Clone for InnerNode<K, P> {
    fn clone(&self) -> Self {
        Self {
            data_map: self.data_map,
            node_map: self.node_map,
            entries: self.entries.clone(),
            children: self.children.clone(),
            owner: None,
        }
    }
}

impl<K: Clone, P: Clone> Clone for CollisionNode<K, P> {
    fn clone(&self) -> Self {
        Self {
            hash: self.hash,
            entries: self.entries.clone(),
            owner: None,
        }
    }
}

impl<K: Clone, P: Clone> Clone for Node<K, P> {
    fn clone(&self) -> Self {
        match self {
            Self::Inner(inner) => Self::Inner(inner.clone()),
            Self::Collision(collision) => Self::Collision(collision.clone()),
        }
    }
}

impl<K, P> fmt::Debug for Node<K, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inner(inner) => f
                .debug_struct("Inner")
                .field("data_map", &format_args!("{:#034b}", inner.data_map))
                .field("node_map", &format_args!("{:#034b}", inner.node_map))
                .field("owner", &inner.owner.map(Owner::id))
                .finish(),
            Self::Collision(collision) => f
                .debug_struct("Collision")
                .field("hash", &collision.hash)
                .field("entries_len", &collision.entries.len())
                .field("owner", &collision.owner.map(Owner::id))
                .finish(),
        }
    }
}
