use super::validate;
use crate::iter::Entries;
use crate::{ChampSet, ChampSetMultimap, Payload};

/// Every key holds `Single` or a `Multi` of at least two values.
fn assert_payloads_canonical<K, V: std::hash::Hash + Eq>(m: &ChampSetMultimap<K, V>) {
    for entry in Entries::new(m.root_node()) {
        if let Payload::Multi(set) = &entry.payload {
            assert!(set.len() >= 2, "multi payload with fewer than two values");
        }
    }
}

#[test]
fn insert_two_values_then_remove_each() {
    let m = ChampSetMultimap::new().insert(1, "x").insert(1, "y");
    assert_eq!(m.len(), 2);
    assert!(m.contains_key(&1));
    assert_eq!(m.get(&1), ChampSet::new().insert("x").insert("y"));

    let m = m.remove_entry(&1, &"x");
    assert_eq!(m.len(), 1);
    assert!(m.contains_key(&1));
    assert_eq!(m.get(&1), ChampSet::new().insert("y"));
    assert!(matches!(m.get_payload(&1), Some(Payload::Single("y"))));

    let m = m.remove_entry(&1, &"y");
    assert_eq!(m.len(), 0);
    assert!(!m.contains_key(&1));
}

#[test]
fn get_absent_key_is_empty_set() {
    let m: ChampSetMultimap<i32, i32> = ChampSetMultimap::new().insert(1, 1);
    assert!(m.get(&2).is_empty());
}

#[test]
fn duplicate_tuple_is_noop() {
    let m = ChampSetMultimap::new().insert(1, 'a').insert(1, 'b');
    let same = m.insert(1, 'a').insert(1, 'b');
    assert!(same.ptr_eq(&m));
    assert_eq!(same.len(), 2);
}

#[test]
fn payload_upgrades_and_downgrades() {
    let m = ChampSetMultimap::new().insert("k", 1);
    assert!(matches!(m.get_payload(&"k"), Some(Payload::Single(1))));

    let m = m.insert("k", 2).insert("k", 3);
    assert!(matches!(m.get_payload(&"k"), Some(Payload::Multi(s)) if s.len() == 3));
    assert_payloads_canonical(&m);

    let m = m.remove_entry(&"k", &3);
    assert!(matches!(m.get_payload(&"k"), Some(Payload::Multi(s)) if s.len() == 2));
    let m = m.remove_entry(&"k", &1);
    assert!(matches!(m.get_payload(&"k"), Some(Payload::Single(2))));
}

#[test]
fn remove_entry_with_wrong_value_is_noop() {
    let m = ChampSetMultimap::new().insert(1, 10).insert(2, 20).insert(2, 21);
    assert!(m.remove_entry(&1, &11).ptr_eq(&m));
    assert!(m.remove_entry(&2, &22).ptr_eq(&m));
    assert!(m.remove_entry(&3, &30).ptr_eq(&m));
}

#[test]
fn remove_drops_all_values() {
    let m = ChampSetMultimap::new()
        .insert(1, 'a')
        .insert(1, 'b')
        .insert(1, 'c')
        .insert(2, 'a');
    let m = m.remove(&1);
    assert_eq!(m.len(), 1);
    assert!(!m.contains_key(&1));
    assert!(m.contains_entry(&2, &'a'));
    assert!(m.remove(&1).ptr_eq(&m));
}

#[test]
fn put_replaces_all_values() {
    let m = ChampSetMultimap::new()
        .insert(1, 'a')
        .insert(1, 'b')
        .insert(1, 'c');
    let m = m.put(1, 'z');
    assert_eq!(m.len(), 1);
    assert_eq!(m.get(&1), ChampSet::new().insert('z'));

    let m = m.put(2, 'y');
    assert_eq!(m.len(), 2);
    assert!(m.put(2, 'y').ptr_eq(&m));
}

#[test]
fn put_over_single_other_value() {
    let m = ChampSetMultimap::new().insert(1, 'a').put(1, 'b');
    assert_eq!(m.len(), 1);
    assert!(m.contains_entry(&1, &'b'));
    assert!(!m.contains_entry(&1, &'a'));
}

#[test]
fn contains_value_and_entry() {
    let m = ChampSetMultimap::new().insert("a", 1).insert("b", 2).insert("b", 3);
    assert!(m.contains_value(&3));
    assert!(!m.contains_value(&4));
    assert!(m.contains_entry(&"b", &2));
    assert!(!m.contains_entry(&"a", &2));
    assert!(!m.contains_entry(&"c", &1));
}

#[test]
fn len_distinct_counts_keys() {
    let m: ChampSetMultimap<u32, u32> = (0..100).map(|i| (i % 10, i)).collect();
    assert_eq!(m.len(), 100);
    assert_eq!(m.len_distinct(), 10);
    assert_eq!(m.keys().count(), 10);
    assert_eq!(m.values().count(), 100);
    assert_eq!(m.iter().len(), 100);
    assert_payloads_canonical(&m);
    assert_eq!(validate(m.root_node()), 10);
}

#[test]
fn insert_all_counts_only_new_tuples() {
    let a = ChampSetMultimap::new().insert(1, 'a').insert(2, 'b');
    let b = ChampSetMultimap::new().insert(1, 'a').insert(1, 'c').insert(3, 'd');
    let merged = a.insert_all(&b);
    assert_eq!(merged.len(), 4);
    assert!(merged.contains_entry(&1, &'c'));
    assert!(merged.contains_entry(&3, &'d'));
    assert_eq!(a.len(), 2);
    assert!(a.insert_all(&ChampSetMultimap::new()).ptr_eq(&a));
}

#[test]
fn equality_is_over_tuples() {
    let a = ChampSetMultimap::new().insert(1, 'a').insert(1, 'b').insert(2, 'c');
    let b = ChampSetMultimap::new().insert(2, 'c').insert(1, 'b').insert(1, 'a');
    let c = a.remove_entry(&1, &'b');
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(a.content_hash(), b.content_hash());
}

#[test]
fn cross_representation_matches_tuple_set() {
    let m: ChampSetMultimap<u8, u8> = (0..60).map(|i| (i % 7, i)).collect();
    let tuples: ChampSet<(u8, u8)> = m.iter().map(|(k, v)| (*k, *v)).collect();

    assert_eq!(m.len(), tuples.len());
    assert_eq!(m.content_hash(), tuples.content_hash());
    assert!(m == tuples);
    assert!(tuples == m);

    let fewer = tuples.remove(&(0, 0));
    assert!(m != fewer);
    assert!(fewer != m);
}

#[test]
fn snapshots_are_unaffected() {
    let v1 = ChampSetMultimap::new().insert(1, 'a');
    let v2 = v1.insert(1, 'b');
    let v3 = v2.remove(&1);
    assert_eq!(v1.len(), 1);
    assert_eq!(v2.len(), 2);
    assert_eq!(v3.len(), 0);
    assert_eq!(v1.get(&1), ChampSet::new().insert('a'));
}

#[test]
fn payload_iterates_by_reference() {
    let m = ChampSetMultimap::new().insert(1, 10).insert(1, 20).insert(2, 5);
    let mut sum = 0;
    for v in m.get_payload(&1).unwrap() {
        sum += v;
    }
    assert_eq!(sum, 30);
    assert_eq!(m.get_payload(&2).unwrap().into_iter().len(), 1);
}
