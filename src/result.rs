//! Mutation results threaded through recursive node operations.
//!
//! Every mutating trie operation returns a [`MutationResult`] alongside the
//! (possibly unchanged) node. The result is produced once, at the slot where
//! the change happens, and forwarded unchanged to the container, which folds
//! the size delta into its cached size instead of re-traversing the trie.

use std::fmt;

/// Kind of change a mutation made.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Effect {
    /// Nothing changed; the trie is reference-identical to the input.
    Nothing,
    /// A new key slot was created.
    Inserted,
    /// The payload of an existing key was replaced or extended.
    Updated,
    /// A key or some of its values were removed.
    Removed,
}

/// Qualifier of an [`Effect`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Detail {
    /// The key was not present before.
    KeyAdded,
    /// A value was added under the key.
    ValueAdded,
    /// The value(s) under the key were replaced.
    ValueReplaced,
    /// The key was evicted.
    KeyRemoved,
    /// A value was removed under the key.
    ValueRemoved,
    /// The removed value was the last one under its key.
    LastValueRemoved,
}

impl Detail {
    const ALL: [Self; 6] = [
        Self::KeyAdded,
        Self::ValueAdded,
        Self::ValueReplaced,
        Self::KeyRemoved,
        Self::ValueRemoved,
        Self::LastValueRemoved,
    ];

    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Set of [`Detail`] flags.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Details(u8);

impl Details {
    /// The empty set.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// A set holding one detail.
    #[must_use]
    pub const fn of(detail: Detail) -> Self {
        Self(detail.bit())
    }

    /// This set with `detail` added.
    #[must_use]
    pub const fn with(self, detail: Detail) -> Self {
        Self(self.0 | detail.bit())
    }

    /// `true` if `detail` is in the set.
    #[must_use]
    pub const fn contains(self, detail: Detail) -> bool {
        self.0 & detail.bit() != 0
    }

    /// `true` if no detail is set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterates the details in the set.
    pub fn iter(self) -> impl Iterator<Item = Detail> {
        Detail::ALL.into_iter().filter(move |d| self.contains(*d))
    }
}

impl fmt::Debug for Details {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Report of one node-level mutation.
///
/// `P` is the payload type of the trie: the evicted payload is the previous
/// content of the affected slot (the old value of a map, the old
/// [`Payload`](crate::Payload) of a multimap key).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MutationResult<P> {
    effect: Effect,
    details: Details,
    size_delta: Option<isize>,
    evicted: Option<P>,
}

impl<P> MutationResult<P> {
    pub(crate) const fn nothing() -> Self {
        Self {
            effect: Effect::Nothing,
            details: Details::empty(),
            size_delta: None,
            evicted: None,
        }
    }

    pub(crate) const fn inserted(details: Details, size_delta: isize) -> Self {
        Self {
            effect: Effect::Inserted,
            details,
            size_delta: Some(size_delta),
            evicted: None,
        }
    }

    pub(crate) const fn updated(details: Details, size_delta: isize, evicted: P) -> Self {
        Self {
            effect: Effect::Updated,
            details,
            size_delta: Some(size_delta),
            evicted: Some(evicted),
        }
    }

    pub(crate) const fn removed(details: Details, size_delta: isize, evicted: P) -> Self {
        Self {
            effect: Effect::Removed,
            details,
            size_delta: Some(size_delta),
            evicted: Some(evicted),
        }
    }

    /// Kind of change.
    #[must_use]
    pub const fn effect(&self) -> Effect {
        self.effect
    }

    /// Flags qualifying the effect.
    #[must_use]
    pub const fn details(&self) -> Details {
        self.details
    }

    /// Change in container size, `None` when nothing changed.
    #[must_use]
    pub const fn size_delta(&self) -> Option<isize> {
        self.size_delta
    }

    /// Previous payload of the affected slot, if one was replaced or removed.
    #[must_use]
    pub const fn evicted(&self) -> Option<&P> {
        self.evicted.as_ref()
    }

    /// Consumes the result, returning the evicted payload.
    #[must_use]
    pub fn into_evicted(self) -> Option<P> {
        self.evicted
    }

    /// `true` unless the effect is [`Effect::Nothing`].
    #[must_use]
    pub fn is_modified(&self) -> bool {
        self.effect != Effect::Nothing
    }

    /// Applies the size delta to a cached container size.
    pub(crate) fn resize(&self, size: usize) -> usize {
        self.size_delta.map_or(size, |delta| size.wrapping_add_signed(delta))
    }
}

/// Decision taken at the slot of an insert, given the payload already
/// stored under the key (if any).
pub enum Resolution<P> {
    /// Leave the trie untouched.
    Unchanged,
    /// Store `payload` under the key.
    Store {
        payload: P,
        details: Details,
        size_delta: isize,
    },
}

/// Decision taken at the slot of a remove, given the stored payload.
pub enum Removal<P> {
    /// Leave the trie untouched.
    Unchanged,
    /// Drop the key and its payload.
    Evict { details: Details, size_delta: isize },
    /// Keep the key with a reduced payload.
    Replace {
        payload: P,
        details: Details,
        size_delta: isize,
    },
}

/// Converts a payload length into a signed size delta.
pub fn count(len: usize) -> isize {
    isize::try_from(len).unwrap_or(isize::MAX)
}
