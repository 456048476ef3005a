use crate::codec::{from_bytes, to_bytes};
use crate::{ChampMap, ChampSet, ChampSetMultimap, Error};

#[test]
fn set_round_trip() {
    let set: ChampSet<String> = (0..100).map(|i| format!("item-{i}")).collect();
    let bytes = to_bytes(&set).unwrap();
    let back: ChampSet<String> = from_bytes(&bytes).unwrap();
    assert_eq!(back, set);
}

#[test]
fn map_round_trip() {
    let map: ChampMap<u32, String> = (0..50).map(|i| (i, i.to_string())).collect();
    let bytes = to_bytes(&map).unwrap();
    let back: ChampMap<u32, String> = from_bytes(&bytes).unwrap();
    assert_eq!(back, map);
}

#[test]
fn multimap_round_trip() {
    let m: ChampSetMultimap<u16, u16> = (0..300).map(|i| (i % 17, i)).collect();
    let bytes = to_bytes(&m).unwrap();
    let back: ChampSetMultimap<u16, u16> = from_bytes(&bytes).unwrap();
    assert_eq!(back, m);
    assert_eq!(back.len(), 300);
    assert_eq!(back.content_hash(), m.content_hash());
}

#[test]
fn empty_round_trip() {
    let m: ChampSetMultimap<u8, u8> = ChampSetMultimap::new();
    let back: ChampSetMultimap<u8, u8> = from_bytes(&to_bytes(&m).unwrap()).unwrap();
    assert!(back.is_empty());
}

#[test]
fn header_is_checked() {
    let bytes = to_bytes(&ChampSet::new().insert(1_u8)).unwrap();
    assert_eq!(&bytes[..4], b"CHMP");

    let mut bad_magic = bytes.clone();
    bad_magic[0] = b'X';
    assert!(matches!(
        from_bytes::<ChampSet<u8>>(&bad_magic),
        Err(Error::InvalidFormat(_))
    ));

    let mut newer = bytes;
    newer[4] = 9;
    assert!(matches!(
        from_bytes::<ChampSet<u8>>(&newer),
        Err(Error::UnsupportedVersion {
            version: 9,
            max_supported: 1
        })
    ));

    assert!(matches!(
        from_bytes::<ChampSet<u8>>(b"CH"),
        Err(Error::InvalidFormat(_))
    ));
}

#[test]
fn truncated_input_fails() {
    let set: ChampSet<u64> = (0..64).collect();
    let bytes = to_bytes(&set).unwrap();
    let err = from_bytes::<ChampSet<u64>>(&bytes[..bytes.len() - 3]).unwrap_err();
    assert!(err.is_io());
}

#[test]
fn trailing_bytes_fail() {
    let mut bytes = to_bytes(&ChampSet::new().insert(5_u32)).unwrap();
    bytes.push(0);
    let err = from_bytes::<ChampSet<u32>>(&bytes).unwrap_err();
    assert!(matches!(err, Error::InvalidFormat(_)));
}

#[test]
fn duplicate_tuples_in_input_are_merged() {
    // Hand-built body: a length prefix of 3 followed by three tuples.
    let mut bytes = b"CHMP\x01".to_vec();
    bytes.extend_from_slice(&[3, 1, 2, 1, 2, 1, 3]);
    let m: ChampSetMultimap<u8, u8> = from_bytes(&bytes).unwrap();
    assert_eq!(m.len(), 2);
    assert!(m.contains_entry(&1, &2));
    assert!(m.contains_entry(&1, &3));
}
