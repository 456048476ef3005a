mod adhash;
mod codec;
mod collision;
mod multimap;
mod result;
mod sync;

use std::fmt::Write;
use std::hash::{Hash, Hasher};

use crate::node::{self, Node};

/// A key type with a controllable hash value for testing hash collisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollidingKey {
    pub id: u32,
    pub forced_hash: u64,
}

impl CollidingKey {
    pub const fn new(id: u32, hash: u64) -> Self {
        Self {
            id,
            forced_hash: hash,
        }
    }
}

impl Hash for CollidingKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.forced_hash.hash(state);
    }
}

/// Walks the trie asserting every structural invariant and returns the
/// number of inline entries.
pub fn validate<K, P>(root: &Node<K, P>) -> usize {
    validate_node(root, 0, true)
}

fn validate_node<K, P>(node: &Node<K, P>, shift: u32, is_root: bool) -> usize {
    match node {
        Node::Inner(inner) => {
            assert_eq!(inner.data_map & inner.node_map, 0, "slot is both data and node");
            assert_eq!(inner.entries.len(), inner.data_map.count_ones() as usize);
            assert_eq!(inner.children.len(), inner.node_map.count_ones() as usize);
            assert!(!is_root || shift == 0);
            if !is_root {
                // Canonical form: no child is a lone entry or empty.
                let arity = inner.entries.len() + inner.children.len();
                assert!(arity > 0, "empty child node");
                assert!(!node.is_singleton(), "single-entry child was not inlined");
            }
            for entry in &inner.entries {
                let bit = node::mask(node::fragment(entry.hash, shift));
                assert_ne!(inner.data_map & bit, 0, "entry stored at the wrong position");
            }
            inner
                .children
                .iter()
                .map(|child| validate_node(child, shift + node::BITS_PER_LEVEL, false))
                .sum::<usize>()
                + inner.entries.len()
        }
        Node::Collision(collision) => {
            assert!(shift > node::MAX_SHIFT, "collision node above the hash width");
            assert!(collision.entries.len() >= 2, "collision node with one entry");
            for entry in &collision.entries {
                assert_eq!(entry.hash, collision.hash);
            }
            collision.entries.len()
        }
    }
}

/// Renders the trie shape (bitmaps only) for structural comparison.
pub fn shape<K, P>(root: &Node<K, P>) -> String {
    let mut out = String::new();
    write_shape(root, &mut out);
    out
}

fn write_shape<K, P>(node: &Node<K, P>, out: &mut String) {
    match node {
        Node::Inner(inner) => {
            let _ = write!(out, "[{:x}/{:x}", inner.data_map, inner.node_map);
            for child in &inner.children {
                write_shape(child, out);
            }
            out.push(']');
        }
        Node::Collision(collision) => {
            let _ = write!(out, "<{}>", collision.entries.len());
        }
    }
}
