//! Persistent hash sets, maps and set-multimaps based on CHAMP.
//!
//! CHAMP (Compressed Hash-Array Mapped Prefix-tree) is a refined HAMT that
//! stores entries inline in compacted node arrays and keeps the trie in
//! **canonical form**: a child left with a single entry is always inlined
//! into its parent, so content-equal containers converge in shape.
//!
//! # Key properties
//!
//! - **Structural sharing**: a mutation copies only the path it touches;
//!   every snapshot stays valid and unchanged
//! - **Transients**: batch builders edit nodes they own in place, guarded by
//!   an owner token that is retired on [`freeze`](TransientSet::freeze)
//! - **Set-multimap**: one-value keys are stored inline, multi-value keys
//!   hold a nested [`ChampSet`]
//! - **Mutation reports**: [`MutationResult`] says what an operation did
//!   and what it evicted
//! - **Zero `unsafe`**: enforced by `#![forbid(unsafe_code)]`
//!
//! Keys are hashed with the standard library's `DefaultHasher`. Keys whose
//! full 64-bit hashes are equal share a collision node and are compared
//! linearly, so lookups degrade to O(k) for k genuinely colliding keys.
//!
//! # Example
//!
//! ```
//! use champ_multimap::ChampSetMultimap;
//!
//! let m = ChampSetMultimap::new().insert(1, "x").insert(1, "y");
//! assert_eq!(m.len(), 2);
//! assert!(m.get(&1).contains(&"y"));
//!
//! let m = m.remove_entry(&1, &"x").remove_entry(&1, &"y");
//! assert!(!m.contains_key(&1));
//! ```
//!
//! # References
//!
//! - Steindorfer & Vinju, 2015, "Optimizing Hash-Array Mapped Tries
//!   for Fast and Lean Immutable JVM Collections", OOPSLA 2015
//! - Steindorfer & Vinju, 2016, "Fast and Lean Immutable Multi-Maps on
//!   the JVM based on Heterogeneous Hash-Array Mapped Tries"
//! - Bagwell, 2001, "Ideal Hash Trees"

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod adhash;
pub mod codec;
pub mod iter;

mod error;
mod legacy;
mod map;
mod multimap;
mod node;
mod ops;
mod owner;
mod result;
mod serialize;
mod set;

#[cfg(test)]
mod tests;

pub use error::{Error, Result};
pub use legacy::LegacySet;
pub use map::{ChampMap, TransientMap};
pub use multimap::{ChampSetMultimap, Payload, TransientSetMultimap};
pub use result::{Detail, Details, Effect, MutationResult};
pub use set::{ChampSet, TransientSet};
