use super::{CollidingKey, validate};
use crate::{ChampMap, ChampSetMultimap};

/// Two keys with the same 64-bit hash create a collision node.
#[test]
fn two_colliding_keys() {
    let k1 = CollidingKey::new(1, 0xDEAD_BEEF);
    let k2 = CollidingKey::new(2, 0xDEAD_BEEF);

    let map = ChampMap::new()
        .insert(k1.clone(), "first")
        .insert(k2.clone(), "second");

    assert_eq!(map.len(), 2);
    assert_eq!(map.get(&k1), Some(&"first"));
    assert_eq!(map.get(&k2), Some(&"second"));
    assert_eq!(validate(map.root_node()), 2);
}

/// Three keys with the same hash.
#[test]
fn three_colliding_keys() {
    let keys: Vec<CollidingKey> = (0..3).map(|i| CollidingKey::new(i, 0xCAFE)).collect();

    let map: ChampMap<CollidingKey, usize> =
        keys.iter().cloned().enumerate().map(|(i, k)| (k, i)).collect();

    assert_eq!(map.len(), 3);
    for (i, k) in keys.iter().enumerate() {
        assert_eq!(map.get(k), Some(&i));
    }
}

/// Remove from collision node.
#[test]
fn remove_from_collision() {
    let k1 = CollidingKey::new(1, 0xAAAA);
    let k2 = CollidingKey::new(2, 0xAAAA);
    let k3 = CollidingKey::new(3, 0xAAAA);

    let map = ChampMap::new()
        .insert(k1.clone(), 10)
        .insert(k2.clone(), 20)
        .insert(k3.clone(), 30);

    let map = map.remove(&k2);
    assert_eq!(map.len(), 2);
    assert_eq!(map.get(&k1), Some(&10));
    assert_eq!(map.get(&k2), None);
    assert_eq!(map.get(&k3), Some(&30));
    assert_eq!(validate(map.root_node()), 2);
}

/// Removing a key with a colliding hash but absent from the node is a no-op.
#[test]
fn remove_absent_colliding_key() {
    let k1 = CollidingKey::new(1, 0xAAAA);
    let k2 = CollidingKey::new(2, 0xAAAA);
    let ghost = CollidingKey::new(9, 0xAAAA);

    let map = ChampMap::new().insert(k1, 1).insert(k2, 2);
    assert!(map.remove(&ghost).ptr_eq(&map));
}

/// Overwrite in collision node.
#[test]
fn overwrite_in_collision() {
    let k1 = CollidingKey::new(1, 0xBBBB);
    let k2 = CollidingKey::new(2, 0xBBBB);

    let map = ChampMap::new()
        .insert(k1.clone(), "old")
        .insert(k2, "val2");
    let (map, old) = map.replace(k1.clone(), "new");

    assert_eq!(old, Some("old"));
    assert_eq!(map.len(), 2);
    assert_eq!(map.get(&k1), Some(&"new"));
}

/// Collision node with remove-all returns to empty.
#[test]
fn collision_remove_all() {
    let k1 = CollidingKey::new(1, 0xCCCC);
    let k2 = CollidingKey::new(2, 0xCCCC);

    let map = ChampMap::new().insert(k1.clone(), 1).insert(k2.clone(), 2);
    let map = map.remove(&k1).remove(&k2);
    assert!(map.is_empty());
    assert_eq!(validate(map.root_node()), 0);
}

/// Mixed: some keys collide, some don't.
#[test]
fn mixed_collisions_and_normal() {
    let collide_a = CollidingKey::new(1, 0xDDDD);
    let collide_b = CollidingKey::new(2, 0xDDDD);
    let normal = CollidingKey::new(3, 0xEEEE);

    let map = ChampMap::new()
        .insert(collide_a.clone(), "a")
        .insert(collide_b.clone(), "b")
        .insert(normal.clone(), "c");

    assert_eq!(map.len(), 3);
    assert_eq!(map.get(&collide_a), Some(&"a"));
    assert_eq!(map.get(&collide_b), Some(&"b"));
    assert_eq!(map.get(&normal), Some(&"c"));
}

/// Multimap payloads work the same inside a collision node.
#[test]
fn multimap_values_under_colliding_keys() {
    let k1 = CollidingKey::new(1, 0xFACE);
    let k2 = CollidingKey::new(2, 0xFACE);

    let m = ChampSetMultimap::new()
        .insert(k1.clone(), 'x')
        .insert(k2.clone(), 'y')
        .insert(k1.clone(), 'z');

    assert_eq!(m.len(), 3);
    assert_eq!(m.len_distinct(), 2);
    assert!(m.contains_entry(&k1, &'x'));
    assert!(m.contains_entry(&k1, &'z'));
    assert!(!m.contains_entry(&k2, &'x'));

    let m = m.remove_entry(&k1, &'x').remove_entry(&k1, &'z');
    assert_eq!(m.len(), 1);
    assert!(!m.contains_key(&k1));
    assert_eq!(validate(m.root_node()), 1);
}
