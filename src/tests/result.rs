use crate::{ChampSetMultimap, Detail, Details, Effect, Payload};

#[test]
fn new_key_is_inserted() {
    let (m, result) = ChampSetMultimap::new().insert_with_result(1, 'a');
    assert_eq!(result.effect(), Effect::Inserted);
    assert!(result.details().contains(Detail::KeyAdded));
    assert!(result.details().contains(Detail::ValueAdded));
    assert_eq!(result.size_delta(), Some(1));
    assert!(result.evicted().is_none());
    assert_eq!(m.len(), 1);
}

#[test]
fn second_value_is_update() {
    let m = ChampSetMultimap::new().insert(1, 'a');
    let (m, result) = m.insert_with_result(1, 'b');
    assert_eq!(result.effect(), Effect::Updated);
    assert_eq!(result.details(), Details::of(Detail::ValueAdded));
    assert_eq!(result.size_delta(), Some(1));
    assert_eq!(result.evicted(), Some(&Payload::Single('a')));
    assert_eq!(m.len(), 2);
}

#[test]
fn duplicate_is_nothing() {
    let m = ChampSetMultimap::new().insert(1, 'a');
    let (same, result) = m.insert_with_result(1, 'a');
    assert_eq!(result.effect(), Effect::Nothing);
    assert!(result.details().is_empty());
    assert_eq!(result.size_delta(), None);
    assert!(!result.is_modified());
    assert!(same.ptr_eq(&m));
}

#[test]
fn last_value_removed() {
    let m = ChampSetMultimap::new().insert(1, 'a');
    let (m, result) = m.remove_entry_with_result(&1, &'a');
    assert_eq!(result.effect(), Effect::Removed);
    assert!(result.details().contains(Detail::LastValueRemoved));
    assert!(result.details().contains(Detail::KeyRemoved));
    assert_eq!(result.size_delta(), Some(-1));
    assert_eq!(result.into_evicted(), Some(Payload::Single('a')));
    assert!(m.is_empty());
}

#[test]
fn one_of_many_values_removed() {
    let m = ChampSetMultimap::new().insert(1, 'a').insert(1, 'b');
    let (m, result) = m.remove_entry_with_result(&1, &'a');
    assert_eq!(result.effect(), Effect::Removed);
    assert_eq!(result.details(), Details::of(Detail::ValueRemoved));
    assert_eq!(result.size_delta(), Some(-1));
    assert!(matches!(result.evicted(), Some(Payload::Multi(s)) if s.len() == 2));
    assert!(m.contains_key(&1));
}

#[test]
fn absent_tuple_removal_is_nothing() {
    let m = ChampSetMultimap::new().insert(1, 'a');
    let (_, result) = m.remove_entry_with_result(&1, &'z');
    assert_eq!(result.effect(), Effect::Nothing);
    let (_, result) = m.remove_entry_with_result(&2, &'a');
    assert_eq!(result.effect(), Effect::Nothing);
}

#[test]
fn put_reports_bulk_delta() {
    let m = ChampSetMultimap::new().insert(1, 'a').insert(1, 'b').insert(1, 'c');
    let (m, result) = m.put_with_result(1, 'z');
    assert_eq!(result.effect(), Effect::Updated);
    assert_eq!(result.details(), Details::of(Detail::ValueReplaced));
    assert_eq!(result.size_delta(), Some(-2));
    assert_eq!(result.evicted().map(Payload::len), Some(3));
    assert_eq!(m.len(), 1);
}

#[test]
fn details_set_operations() {
    let details = Details::empty()
        .with(Detail::KeyAdded)
        .with(Detail::ValueAdded)
        .with(Detail::KeyAdded);
    assert!(details.contains(Detail::KeyAdded));
    assert!(!details.contains(Detail::KeyRemoved));
    assert_eq!(
        details.iter().collect::<Vec<_>>(),
        vec![Detail::KeyAdded, Detail::ValueAdded]
    );
    assert_eq!(format!("{details:?}"), "{KeyAdded, ValueAdded}");
}
