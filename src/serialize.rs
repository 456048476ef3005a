//! `serde` support.
//!
//! Sets serialize as sequences, maps as maps and multimaps as sequences of
//! `(key, value)` tuples. Deserialization builds through a transient and
//! only hands out the container once the whole input has been read.

use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, Serializer};

use crate::map::ChampMap;
use crate::multimap::ChampSetMultimap;
use crate::set::ChampSet;

impl<T: Serialize> Serialize for ChampSet<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self)
    }
}

impl<K: Serialize, V: Serialize> Serialize for ChampMap<K, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self)
    }
}

impl<K: Serialize, V: Serialize> Serialize for ChampSetMultimap<K, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self)
    }
}

// ---------------------------------------------------------------------------
// Sets
// ---------------------------------------------------------------------------

struct SetVisitor<T> {
    marker: PhantomData<T>,
}

impl<'de, T> Visitor<'de> for SetVisitor<T>
where
    T: Hash + Eq + Clone + Deserialize<'de>,
{
    type Value = ChampSet<T>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a sequence of set elements")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut transient = ChampSet::new().as_transient();
        while let Some(element) = seq.next_element()? {
            transient.insert(element).map_err(de::Error::custom)?;
        }
        transient.freeze().map_err(de::Error::custom)
    }
}

impl<'de, T> Deserialize<'de> for ChampSet<T>
where
    T: Hash + Eq + Clone + Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_seq(SetVisitor {
            marker: PhantomData,
        })
    }
}

// ---------------------------------------------------------------------------
// Maps
// ---------------------------------------------------------------------------

struct MapVisitor<K, V> {
    marker: PhantomData<(K, V)>,
}

impl<'de, K, V> Visitor<'de> for MapVisitor<K, V>
where
    K: Hash + Eq + Clone + Deserialize<'de>,
    V: Clone + PartialEq + Deserialize<'de>,
{
    type Value = ChampMap<K, V>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut transient = ChampMap::new().as_transient();
        while let Some((key, value)) = map.next_entry()? {
            transient.insert(key, value).map_err(de::Error::custom)?;
        }
        transient.freeze().map_err(de::Error::custom)
    }
}

impl<'de, K, V> Deserialize<'de> for ChampMap<K, V>
where
    K: Hash + Eq + Clone + Deserialize<'de>,
    V: Clone + PartialEq + Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(MapVisitor {
            marker: PhantomData,
        })
    }
}

// ---------------------------------------------------------------------------
// Multimaps
// ---------------------------------------------------------------------------

struct MultimapVisitor<K, V> {
    marker: PhantomData<(K, V)>,
}

impl<'de, K, V> Visitor<'de> for MultimapVisitor<K, V>
where
    K: Hash + Eq + Clone + Deserialize<'de>,
    V: Hash + Eq + Clone + Deserialize<'de>,
{
    type Value = ChampSetMultimap<K, V>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a sequence of (key, value) tuples")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut transient = ChampSetMultimap::new().as_transient();
        while let Some((key, value)) = seq.next_element()? {
            transient.insert(key, value).map_err(de::Error::custom)?;
        }
        transient.freeze().map_err(de::Error::custom)
    }
}

impl<'de, K, V> Deserialize<'de> for ChampSetMultimap<K, V>
where
    K: Hash + Eq + Clone + Deserialize<'de>,
    V: Hash + Eq + Clone + Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_seq(MultimapVisitor {
            marker: PhantomData,
        })
    }
}
