//! Insertion operation: path-copy (or owned in-place) insert/update.

use std::mem;
use std::sync::Arc;

use crate::node::{self, CollisionNode, Entry, InnerNode, Node};
use crate::owner::{Edit, Owner};
use crate::result::{MutationResult, Resolution};

/// Inserts or updates `key` in the subtree held by `slot`.
///
/// `resolve` is called exactly once, with the payload currently stored
/// under `key` (or `None`), and decides what ends up in the slot. The
/// returned result is the one produced at that slot.
pub fn insert_recursive<K, P, F>(
    slot: &mut Arc<Node<K, P>>,
    edit: Edit,
    hash: u64,
    key: K,
    shift: u32,
    resolve: F,
) -> MutationResult<P>
where
    K: Eq + Clone,
    P: Clone,
    F: FnOnce(Option<&P>) -> Resolution<P>,
{
    match **slot {
        Node::Inner(InnerNode {
            data_map, node_map, ..
        }) => insert_into_inner(slot, edit, data_map, node_map, hash, key, shift, resolve),
        Node::Collision(_) => insert_into_collision(slot, edit, hash, key, resolve),
    }
}

// ---------------------------------------------------------------------------
// Inner node insert
// ---------------------------------------------------------------------------

#[allow(clippy::too_many_arguments)]
fn insert_into_inner<K, P, F>(
    slot: &mut Arc<Node<K, P>>,
    edit: Edit,
    data_map: u32,
    node_map: u32,
    hash: u64,
    key: K,
    shift: u32,
    resolve: F,
) -> MutationResult<P>
where
    K: Eq + Clone,
    P: Clone,
    F: FnOnce(Option<&P>) -> Resolution<P>,
{
    let bit = node::mask(node::fragment(hash, shift));

    if data_map & bit != 0 {
        let pos = node::index(data_map, bit);
        let (same_key, resolution) = {
            let existing = &slot.entries()[pos];
            if existing.hash == hash && existing.key == key {
                (true, resolve(Some(&existing.payload)))
            } else {
                (false, resolve(None))
            }
        };

        match (resolution, same_key) {
            (Resolution::Unchanged, _) => MutationResult::nothing(),
            (Resolution::Store { payload, details, size_delta }, true) => {
                // Same key → replace payload.
                let inner = edit.inner_mut(slot);
                let evicted = mem::replace(&mut inner.entries[pos].payload, payload);
                MutationResult::updated(details, size_delta, evicted)
            }
            (Resolution::Store { payload, details, size_delta }, false) => {
                // Different key at same position → push both into a subtree.
                let owner = edit.owner();
                let inner = edit.inner_mut(slot);
                let existing = inner.remove_entry(bit);
                let subtree = create_subtree(
                    existing,
                    Entry { hash, key, payload },
                    shift + node::BITS_PER_LEVEL,
                    owner,
                );
                inner.insert_child(bit, subtree);
                MutationResult::inserted(details, size_delta)
            }
        }
    } else if node_map & bit != 0 {
        // Position has child subtree → recurse.
        let pos = node::index(node_map, bit);
        super::descend(slot, edit, pos, |child| {
            insert_recursive(child, edit, hash, key, shift + node::BITS_PER_LEVEL, resolve)
        })
    } else {
        // Position empty → add inline entry.
        match resolve(None) {
            Resolution::Unchanged => MutationResult::nothing(),
            Resolution::Store { payload, details, size_delta } => {
                edit.inner_mut(slot).insert_entry(bit, Entry { hash, key, payload });
                MutationResult::inserted(details, size_delta)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Collision node insert
// ---------------------------------------------------------------------------

fn insert_into_collision<K, P, F>(
    slot: &mut Arc<Node<K, P>>,
    edit: Edit,
    hash: u64,
    key: K,
    resolve: F,
) -> MutationResult<P>
where
    K: Eq + Clone,
    P: Clone,
    F: FnOnce(Option<&P>) -> Resolution<P>,
{
    let found = slot.entries().iter().position(|e| e.key == key);
    let resolution = resolve(found.map(|pos| &slot.entries()[pos].payload));

    match (resolution, found) {
        (Resolution::Unchanged, _) => MutationResult::nothing(),
        (Resolution::Store { payload, details, size_delta }, Some(pos)) => {
            let collision = edit.collision_mut(slot);
            let evicted = mem::replace(&mut collision.entries[pos].payload, payload);
            MutationResult::updated(details, size_delta, evicted)
        }
        (Resolution::Store { payload, details, size_delta }, None) => {
            // Key not found → append.
            edit.collision_mut(slot)
                .entries
                .push(Entry { hash, key, payload });
            MutationResult::inserted(details, size_delta)
        }
    }
}

// ---------------------------------------------------------------------------
// Subtree creation
// ---------------------------------------------------------------------------

/// Creates a subtree from two entries that collide at the current depth.
///
/// Recursively descends until hash fragments differ, or creates a collision
/// node past `MAX_SHIFT`. New nodes carry `owner` so that a transient can
/// keep editing them in place.
fn create_subtree<K, P>(
    e1: Entry<K, P>,
    e2: Entry<K, P>,
    shift: u32,
    owner: Option<Owner>,
) -> Arc<Node<K, P>> {
    if shift > node::MAX_SHIFT {
        tracing::trace!(hash = e1.hash, "full hash collision, creating collision node");
        return Arc::new(Node::Collision(CollisionNode {
            hash: e1.hash,
            entries: vec![e1, e2],
            owner,
        }));
    }

    let f1 = node::fragment(e1.hash, shift);
    let f2 = node::fragment(e2.hash, shift);

    if f1 == f2 {
        let child = create_subtree(e1, e2, shift + node::BITS_PER_LEVEL, owner);
        Arc::new(Node::Inner(InnerNode {
            data_map: 0,
            node_map: node::mask(f1),
            entries: Vec::new(),
            children: vec![child],
            owner,
        }))
    } else {
        let entries = if f1 < f2 { vec![e1, e2] } else { vec![e2, e1] };
        Arc::new(Node::Inner(InnerNode {
            data_map: node::mask(f1) | node::mask(f2),
            node_map: 0,
            entries,
            children: Vec::new(),
            owner,
        }))
    }
}
