//! Lookup operation: traverses the trie to find a key.

use crate::node::{self, Entry, Node};

/// Searches for `key` in the subtree rooted at `node`.
///
/// Returns the inline entry holding the key if found.
pub fn get_recursive<'a, K, P>(
    node: &'a Node<K, P>,
    hash: u64,
    key: &K,
    shift: u32,
) -> Option<&'a Entry<K, P>>
where
    K: Eq,
{
    match node {
        Node::Inner(inner) => {
            let frag = node::fragment(hash, shift);
            let bit = node::mask(frag);

            if inner.data_map & bit != 0 {
                // Position has an inline entry.
                let entry = &inner.entries[node::index(inner.data_map, bit)];
                (entry.hash == hash && entry.key == *key).then_some(entry)
            } else if inner.node_map & bit != 0 {
                // Position has a child subtree: recurse.
                let child = &inner.children[node::index(inner.node_map, bit)];
                get_recursive(child, hash, key, shift + node::BITS_PER_LEVEL)
            } else {
                None
            }
        }
        Node::Collision(collision) => {
            if hash != collision.hash {
                return None;
            }
            // Linear search through collision entries.
            collision.entries.iter().find(|entry| entry.key == *key)
        }
    }
}
