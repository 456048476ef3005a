//! Owner tokens and edit modes for transient (batch-mutable) containers.
//!
//! Every node carries an optional [`Owner`]. A transient container mints a
//! fresh token and may mutate a node in place only while the node's stamp
//! equals that token; any other node is copied, stamped, and substituted
//! along the path first. Persistent edits never own anything and always
//! path-copy.
//!
//! Tokens are never reused, so a node stamped by a transient that has since
//! been frozen can never match again and is safely shareable.

use std::num::NonZeroU64;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::node::{CollisionNode, InnerNode, Node};

static NEXT_OWNER: AtomicU64 = AtomicU64::new(0);

/// Identity of a transient container, stamped on the nodes it may edit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Owner(NonZeroU64);

impl Owner {
    /// Mints a token distinct from every token minted before.
    #[must_use]
    pub fn mint() -> Self {
        let owner = Self(NonZeroU64::MIN.saturating_add(NEXT_OWNER.fetch_add(1, Ordering::Relaxed)));
        tracing::trace!(owner = owner.id(), "minted transient owner");
        owner
    }

    /// Raw token value.
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0.get()
    }
}

/// How a mutating trie operation may treat the nodes on its path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edit {
    /// Copy-on-write: shared nodes are never touched.
    Persistent,
    /// In-place edits on nodes stamped with this owner, copy elsewhere.
    Transient(Owner),
}

impl Edit {
    /// The stamp for nodes created under this edit.
    pub const fn owner(self) -> Option<Owner> {
        match self {
            Self::Persistent => None,
            Self::Transient(owner) => Some(owner),
        }
    }

    /// `true` if `node` may be mutated in place under this edit.
    pub fn owns<K, P>(self, node: &Node<K, P>) -> bool {
        match self {
            Self::Persistent => false,
            Self::Transient(owner) => node.owner() == Some(owner),
        }
    }

    /// Returns a mutable view of the node in `slot`, first replacing it with
    /// a stamped copy when this edit does not own it.
    ///
    /// Under [`Persistent`](Self::Persistent) edits `Arc::make_mut` copies
    /// any node that is still shared; a node already copied earlier in the
    /// same operation is uniquely held and is edited directly.
    pub fn node_mut<K: Clone, P: Clone>(self, slot: &mut Arc<Node<K, P>>) -> &mut Node<K, P> {
        if let Self::Transient(owner) = self
            && slot.owner() != Some(owner)
        {
            let mut copy = Node::clone(slot);
            copy.set_owner(Some(owner));
            *slot = Arc::new(copy);
        }
        Arc::make_mut(slot)
    }

    /// [`node_mut`](Self::node_mut) for a slot known to hold a bitmap node.
    pub fn inner_mut<K: Clone, P: Clone>(self, slot: &mut Arc<Node<K, P>>) -> &mut InnerNode<K, P> {
        match self.node_mut(slot) {
            Node::Inner(inner) => inner,
            Node::Collision(_) => unreachable!("bitmap edit on a collision node"),
        }
    }

    /// [`node_mut`](Self::node_mut) for a slot known to hold a collision node.
    pub fn collision_mut<K: Clone, P: Clone>(
        self,
        slot: &mut Arc<Node<K, P>>,
    ) -> &mut CollisionNode<K, P> {
        match self.node_mut(slot) {
            Node::Collision(collision) => collision,
            Node::Inner(_) => unreachable!("collision edit on a bitmap node"),
        }
    }
}
