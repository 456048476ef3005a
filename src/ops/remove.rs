//! Removal operation: path-copy delete with canonical inlining.

use std::mem;
use std::sync::Arc;

use crate::node::{self, InnerNode, Node};
use crate::owner::Edit;
use crate::result::{MutationResult, Removal};

/// Removes or shrinks the payload stored under `key` in the subtree held by
/// `slot`.
///
/// `resolve` is called only if the key is present, with its current
/// payload. A child left holding a single entry is inlined into its parent,
/// so the trie stays canonical after every call.
pub fn remove_recursive<K, P, F>(
    slot: &mut Arc<Node<K, P>>,
    edit: Edit,
    hash: u64,
    key: &K,
    shift: u32,
    resolve: F,
) -> MutationResult<P>
where
    K: Eq + Clone,
    P: Clone,
    F: FnOnce(&P) -> Removal<P>,
{
    match **slot {
        Node::Inner(InnerNode {
            data_map, node_map, ..
        }) => remove_from_inner(slot, edit, data_map, node_map, hash, key, shift, resolve),
        Node::Collision(ref collision) if collision.hash != hash => MutationResult::nothing(),
        Node::Collision(_) => remove_from_collision(slot, edit, key, resolve),
    }
}

// ---------------------------------------------------------------------------
// Inner node remove
// ---------------------------------------------------------------------------

#[allow(clippy::too_many_arguments)]
fn remove_from_inner<K, P, F>(
    slot: &mut Arc<Node<K, P>>,
    edit: Edit,
    data_map: u32,
    node_map: u32,
    hash: u64,
    key: &K,
    shift: u32,
    resolve: F,
) -> MutationResult<P>
where
    K: Eq + Clone,
    P: Clone,
    F: FnOnce(&P) -> Removal<P>,
{
    let bit = node::mask(node::fragment(hash, shift));

    if data_map & bit != 0 {
        let pos = node::index(data_map, bit);
        let removal = {
            let existing = &slot.entries()[pos];
            if existing.hash != hash || existing.key != *key {
                return MutationResult::nothing();
            }
            resolve(&existing.payload)
        };

        match removal {
            Removal::Unchanged => MutationResult::nothing(),
            Removal::Evict { details, size_delta } => {
                let entry = edit.inner_mut(slot).remove_entry(bit);
                MutationResult::removed(details, size_delta, entry.payload)
            }
            Removal::Replace {
                payload,
                details,
                size_delta,
            } => {
                let inner = edit.inner_mut(slot);
                let evicted = mem::replace(&mut inner.entries[pos].payload, payload);
                MutationResult::removed(details, size_delta, evicted)
            }
        }
    } else if node_map & bit != 0 {
        let pos = node::index(node_map, bit);
        let result = super::descend(slot, edit, pos, |child| {
            remove_recursive(child, edit, hash, key, shift + node::BITS_PER_LEVEL, resolve)
        });
        if result.is_modified() && slot.children()[pos].is_singleton() {
            // Canonical form: a lone entry moves up into this node.
            edit.inner_mut(slot).inline_child(bit);
        }
        result
    } else {
        MutationResult::nothing()
    }
}

// ---------------------------------------------------------------------------
// Collision node remove
// ---------------------------------------------------------------------------

fn remove_from_collision<K, P, F>(
    slot: &mut Arc<Node<K, P>>,
    edit: Edit,
    key: &K,
    resolve: F,
) -> MutationResult<P>
where
    K: Eq + Clone,
    P: Clone,
    F: FnOnce(&P) -> Removal<P>,
{
    let Some(pos) = slot.entries().iter().position(|e| e.key == *key) else {
        return MutationResult::nothing();
    };

    match resolve(&slot.entries()[pos].payload) {
        Removal::Unchanged => MutationResult::nothing(),
        Removal::Evict { details, size_delta } => {
            let owner = edit.owner();
            let collision = edit.collision_mut(slot);
            let entry = collision.entries.remove(pos);
            if collision.entries.len() == 1 {
                // Last survivor → singleton bitmap node, inlined by the parent.
                let survivors = mem::take(&mut collision.entries);
                *slot = Arc::new(Node::Inner(InnerNode::singleton(survivors, owner)));
            }
            MutationResult::removed(details, size_delta, entry.payload)
        }
        Removal::Replace {
            payload,
            details,
            size_delta,
        } => {
            let collision = edit.collision_mut(slot);
            let evicted = mem::replace(&mut collision.entries[pos].payload, payload);
            MutationResult::removed(details, size_delta, evicted)
        }
    }
}
