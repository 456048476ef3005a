//! `AdHash`: order-independent content hashing.
//!
//! Computes `φ(S) = Σ h(e)` over all elements using wrapping arithmetic, so
//! the result depends only on the contents and never on trie shape or
//! iteration order. Maps and multimaps hash their `(key, value)` pairs as
//! tuples, which makes a multimap hash equal to the hash of the set of its
//! tuples.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Computes the 64-bit hash of a value using the standard hasher.
///
/// This is also the hash that positions keys in the trie.
#[must_use]
pub fn hash_one<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Computes `φ` over a sequence of elements.
#[must_use]
pub fn adhash<T: Hash>(items: impl IntoIterator<Item = T>) -> u64 {
    items
        .into_iter()
        .fold(0, |acc: u64, item| acc.wrapping_add(hash_one(&item)))
}
