use crate::adhash::{adhash, hash_one};
use crate::{ChampMap, ChampSet, ChampSetMultimap};

/// φ(∅) = 0.
#[test]
fn empty_content_hash_is_zero() {
    assert_eq!(ChampSet::<String>::new().content_hash(), 0);
    assert_eq!(ChampMap::<String, u8>::new().content_hash(), 0);
    assert_eq!(ChampSetMultimap::<String, u8>::new().content_hash(), 0);
}

/// φ(S ∪ {e}) = φ(S) + h(e).
#[test]
fn incremental_insert() {
    let s0 = ChampSet::new();
    let s1 = s0.insert("a");
    let s2 = s1.insert("b");
    assert_eq!(s1.content_hash(), s0.content_hash().wrapping_add(hash_one(&"a")));
    assert_eq!(s2.content_hash(), s1.content_hash().wrapping_add(hash_one(&"b")));
}

/// Insert + remove roundtrip: φ returns to 0.
#[test]
fn roundtrip_to_zero() {
    let map = ChampMap::new().insert(1, 100).insert(2, 200).insert(3, 300);
    let map = map.remove(&1).remove(&2).remove(&3);
    assert_eq!(map.content_hash(), 0);
}

/// Commutativity: φ({a,b}) = φ({b,a}).
#[test]
fn commutativity() {
    assert_eq!(adhash([1, 2, 3]), adhash([3, 1, 2]));

    let m1 = ChampMap::new().insert("x", 10).insert("y", 20);
    let m2 = ChampMap::new().insert("y", 20).insert("x", 10);
    assert_eq!(m1.content_hash(), m2.content_hash());
}

/// Map pairs hash as tuples.
#[test]
fn map_hashes_pairs() {
    let map = ChampMap::new().insert("key", 1);
    assert_eq!(map.content_hash(), hash_one(&("key", 1)));
}

/// Overwrite changes the content hash.
#[test]
fn overwrite_changes_content_hash() {
    let m1 = ChampMap::new().insert("key", 1);
    let m2 = m1.insert("key", 2);
    assert_ne!(m1.content_hash(), m2.content_hash());
}

/// Multimap hash is the sum over tuples.
#[test]
fn multimap_hashes_tuples() {
    let m = ChampSetMultimap::new().insert(1, 'a').insert(1, 'b').insert(2, 'a');
    let expected = adhash([(1, 'a'), (1, 'b'), (2, 'a')]);
    assert_eq!(m.content_hash(), expected);
}

/// Wrapping addition never overflows.
#[test]
fn wrapping_sum() {
    let set: ChampSet<u64> = (0..10_000).collect();
    let expected = (0_u64..10_000).fold(0_u64, |acc, i| acc.wrapping_add(hash_one(&i)));
    assert_eq!(set.content_hash(), expected);
}
