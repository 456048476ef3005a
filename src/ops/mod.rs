//! Recursive trie algorithms.

use std::sync::Arc;

use crate::node::Node;
use crate::owner::Edit;
use crate::result::MutationResult;

pub mod get;
pub mod insert;
pub mod remove;

/// Runs `op` on the child at position `pos` of the node in `slot`.
///
/// An owned node is descended in place. Otherwise the operation runs on a
/// shared handle to the child and the node is copied only if the child
/// actually changed, so a no-op leaves `slot` reference-identical.
fn descend<K, P, F>(slot: &mut Arc<Node<K, P>>, edit: Edit, pos: usize, op: F) -> MutationResult<P>
where
    K: Clone,
    P: Clone,
    F: FnOnce(&mut Arc<Node<K, P>>) -> MutationResult<P>,
{
    if edit.owns(slot) {
        return op(&mut edit.inner_mut(slot).children[pos]);
    }

    let mut child = Arc::clone(&slot.children()[pos]);
    let result = op(&mut child);
    if result.is_modified() {
        edit.inner_mut(slot).children[pos] = child;
    }
    result
}
