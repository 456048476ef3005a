use std::thread;

use crate::{ChampMap, ChampSet, ChampSetMultimap, TransientSet};

#[test]
fn immutables_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ChampSet<String>>();
    assert_send_sync::<ChampMap<String, i32>>();
    assert_send_sync::<ChampSetMultimap<String, i32>>();
}

#[test]
fn transient_is_send() {
    fn assert_send<T: Send>() {}
    assert_send::<TransientSet<String>>();
}

/// Many threads read one snapshot while another derives new versions.
#[test]
fn concurrent_readers_see_their_snapshot() {
    let snapshot: ChampSetMultimap<u32, u32> = (0..1000).map(|i| (i % 100, i)).collect();

    thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                assert_eq!(snapshot.len(), 1000);
                for i in 0..1000 {
                    assert!(snapshot.contains_entry(&(i % 100), &i));
                }
            });
        }
        scope.spawn(|| {
            let mut derived = snapshot.clone();
            for k in 0..100 {
                derived = derived.remove(&k);
            }
            assert!(derived.is_empty());
        });
    });

    assert_eq!(snapshot.len(), 1000);
}

/// A transient can be moved to another thread and frozen there.
#[test]
fn transient_moves_across_threads() {
    let base: ChampSet<u64> = (0..100).collect();
    let mut transient = base.as_transient();
    let frozen = thread::spawn(move || {
        transient.insert_all(100..200).unwrap();
        transient.freeze().unwrap()
    })
    .join()
    .unwrap();

    assert_eq!(frozen.len(), 200);
    assert_eq!(base.len(), 100);
}
