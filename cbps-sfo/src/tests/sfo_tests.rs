use super::*;
use std::io::{Cursor, Seek, SeekFrom};

// -- Test helpers --

/// One hand-laid index entry: (key, format code, raw value bytes, max length).
struct RawEntry<'a> {
    key: &'a str,
    format: u16,
    value: &'a [u8],
    max_len: u32,
}

/// Build a PSF blob by hand.
///
/// Values are laid out in the data table in *reverse* index order, and
/// `padding` extra bytes are inserted between the index and key tables,
/// so the reader has to follow offsets rather than assume a layout.
fn make_sfo(entries: &[RawEntry], padding: usize) -> Vec<u8> {
    let mut keys = Vec::new();
    let mut key_offsets = Vec::new();
    for e in entries {
        key_offsets.push(keys.len() as u16);
        keys.extend_from_slice(e.key.as_bytes());
        keys.push(0);
    }

    let mut data = Vec::new();
    let mut data_offsets = vec![0u32; entries.len()];
    for (i, e) in entries.iter().enumerate().rev() {
        data_offsets[i] = data.len() as u32;
        let start = data.len();
        data.extend_from_slice(e.value);
        data.resize(start + e.max_len as usize, 0);
    }

    let key_table_start = 20 + 16 * entries.len() + padding;
    let data_table_start = key_table_start + keys.len();

    let mut out = Vec::new();
    out.extend_from_slice(b"\0PSF");
    out.extend_from_slice(&0x0101u32.to_le_bytes());
    out.extend_from_slice(&(key_table_start as u32).to_le_bytes());
    out.extend_from_slice(&(data_table_start as u32).to_le_bytes());
    out.extend_from_slice(&(entries.len() as u32).to_le_bytes());
    for (i, e) in entries.iter().enumerate() {
        out.extend_from_slice(&key_offsets[i].to_le_bytes());
        out.extend_from_slice(&e.format.to_le_bytes());
        out.extend_from_slice(&(e.value.len() as u32).to_le_bytes());
        out.extend_from_slice(&e.max_len.to_le_bytes());
        out.extend_from_slice(&data_offsets[i].to_le_bytes());
    }
    // Fill padding with junk that must not be interpreted.
    out.extend(std::iter::repeat_n(0xAA, padding));
    out.extend_from_slice(&keys);
    out.extend_from_slice(&data);
    out
}

fn vita_entries() -> Vec<RawEntry<'static>> {
    vec![
        RawEntry {
            key: "APP_VER",
            format: 0x0204,
            value: b"01.00\0",
            max_len: 8,
        },
        RawEntry {
            key: "ATTRIBUTE",
            format: 0x0404,
            value: &[0x00, 0x80, 0x00, 0x00],
            max_len: 4,
        },
        RawEntry {
            key: "TITLE",
            format: 0x0204,
            value: b"VitaShell\0",
            max_len: 128,
        },
        RawEntry {
            key: "TITLE_ID",
            format: 0x0204,
            value: b"VITASHELL\0",
            max_len: 12,
        },
    ]
}

// -- Reading --

#[test]
fn test_read_hand_built_table() {
    let blob = make_sfo(&vita_entries(), 0);
    let sfo = read_sfo(&mut Cursor::new(blob)).unwrap();

    assert_eq!(sfo.len(), 4);
    assert_eq!(sfo.version(), 0x0101);
    assert_eq!(sfo.get_str("TITLE"), Some("VitaShell"));
    assert_eq!(sfo.get_str("TITLE_ID"), Some("VITASHELL"));
    assert_eq!(sfo.get_str("APP_VER"), Some("01.00"));
    assert_eq!(sfo.get_u32("ATTRIBUTE"), Some(0x8000));
}

#[test]
fn test_iteration_follows_index_order() {
    let blob = make_sfo(&vita_entries(), 0);
    let sfo = read_sfo(&mut Cursor::new(blob)).unwrap();

    let keys: Vec<&str> = sfo.iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["APP_VER", "ATTRIBUTE", "TITLE", "TITLE_ID"]);
}

#[test]
fn test_padding_before_key_table_is_skipped() {
    let blob = make_sfo(&vita_entries(), 12);
    let sfo = read_sfo(&mut Cursor::new(blob)).unwrap();
    assert_eq!(sfo.get_str("TITLE_ID"), Some("VITASHELL"));
    assert_eq!(sfo.get_u32("ATTRIBUTE"), Some(0x8000));
}

#[test]
fn test_repeated_key_keeps_later_value() {
    let entries = [
        RawEntry {
            key: "TITLE",
            format: 0x0204,
            value: b"Old\0",
            max_len: 8,
        },
        RawEntry {
            key: "TITLE_ID",
            format: 0x0204,
            value: b"ABCD00001\0",
            max_len: 12,
        },
        RawEntry {
            key: "TITLE",
            format: 0x0204,
            value: b"New\0",
            max_len: 8,
        },
    ];
    let sfo = read_sfo(&mut Cursor::new(make_sfo(&entries, 0))).unwrap();

    assert_eq!(sfo.len(), 2);
    assert_eq!(sfo.get_str("TITLE"), Some("New"));
    let keys: Vec<&str> = sfo.iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["TITLE", "TITLE_ID"]);
}

#[test]
fn test_special_utf8_format_is_decoded() {
    let entries = [RawEntry {
        key: "CATEGORY",
        format: 0x0004,
        value: b"gd",
        max_len: 4,
    }];
    let sfo = read_sfo(&mut Cursor::new(make_sfo(&entries, 0))).unwrap();
    assert_eq!(sfo.get_str("CATEGORY"), Some("gd"));
}

#[test]
fn test_utf8_title_with_multibyte_chars() {
    let title = "ぷよぷよ\0".as_bytes();
    let entries = [RawEntry {
        key: "TITLE",
        format: 0x0204,
        value: title,
        max_len: 32,
    }];
    let sfo = read_sfo(&mut Cursor::new(make_sfo(&entries, 0))).unwrap();
    assert_eq!(sfo.get_str("TITLE"), Some("ぷよぷよ"));
}

#[test]
fn test_offsets_are_relative_to_blob_start() {
    let mut data = vec![0xEE; 37];
    data.extend_from_slice(&make_sfo(&vita_entries(), 4));

    let mut cursor = Cursor::new(data);
    cursor.seek(SeekFrom::Start(37)).unwrap();
    let sfo = read_sfo(&mut cursor).unwrap();
    assert_eq!(sfo.get_str("TITLE"), Some("VitaShell"));
}

#[test]
fn test_empty_table() {
    let sfo = read_sfo(&mut Cursor::new(make_sfo(&[], 0))).unwrap();
    assert!(sfo.is_empty());
}

// -- Errors --

#[test]
fn test_bad_magic_fails() {
    let mut blob = make_sfo(&vita_entries(), 0);
    blob[1] = b'X';
    let err = read_sfo(&mut Cursor::new(blob)).unwrap_err();
    assert!(matches!(err, SfoError::InvalidMagic(m) if m == *b"\0XSF"));
}

#[test]
fn test_zip_magic_fails() {
    let mut blob = b"PK\x03\x04".to_vec();
    blob.resize(64, 0);
    assert!(matches!(
        read_sfo(&mut Cursor::new(blob)),
        Err(SfoError::InvalidMagic(_))
    ));
}

#[test]
fn test_short_header_fails() {
    let err = read_sfo(&mut Cursor::new(b"\0PSF\x01\x01".to_vec())).unwrap_err();
    assert!(matches!(err, SfoError::InvalidFormat(_)));
}

#[test]
fn test_unsupported_value_format_fails() {
    let entries = [RawEntry {
        key: "WEIRD",
        format: 0x0804,
        value: &[1, 2, 3, 4],
        max_len: 4,
    }];
    let err = read_sfo(&mut Cursor::new(make_sfo(&entries, 0))).unwrap_err();
    match err {
        SfoError::UnsupportedValueFormat(code, key) => {
            assert_eq!(code, 0x0804);
            assert_eq!(key, "WEIRD");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_key_table_overlapping_index_fails() {
    let mut blob = make_sfo(&vita_entries(), 0);
    // Point the key table into the middle of the index table.
    blob[8..12].copy_from_slice(&24u32.to_le_bytes());
    let err = read_sfo(&mut Cursor::new(blob)).unwrap_err();
    assert!(matches!(err, SfoError::InvalidFormat(_)));
}

#[test]
fn test_truncated_value_fails() {
    let mut blob = make_sfo(&vita_entries(), 0);
    blob.truncate(blob.len() - 2);
    let err = read_sfo(&mut Cursor::new(blob)).unwrap_err();
    assert!(matches!(err, SfoError::InvalidFormat(_)));
}

#[test]
fn test_integer_with_wrong_length_fails() {
    let entries = [RawEntry {
        key: "PARENTAL_LEVEL",
        format: 0x0404,
        value: &[1, 0, 0, 0],
        max_len: 8,
    }];
    let err = read_sfo(&mut Cursor::new(make_sfo(&entries, 0))).unwrap_err();
    assert!(matches!(err, SfoError::InvalidFormat(_)));
}

// -- Writing --

#[test]
fn test_serialized_table_reads_back() {
    let mut sfo = ParamSfo::new();
    sfo.insert("TITLE", "Adrenaline");
    sfo.insert("TITLE_ID", "ADRENALINE");
    sfo.insert("PARENTAL_LEVEL", 1u32);
    sfo.insert("STITLE", "");

    let blob = sfo.to_bytes().unwrap();
    assert_eq!(&blob[..4], b"\0PSF");

    let read = read_sfo(&mut Cursor::new(blob)).unwrap();
    assert_eq!(read, sfo);
}

#[test]
fn test_insert_replaces_in_place() {
    let mut sfo = ParamSfo::new();
    sfo.insert("TITLE", "Old");
    sfo.insert("TITLE_ID", "ABCD00001");
    sfo.insert("TITLE", "New");

    let keys: Vec<&str> = sfo.iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["TITLE", "TITLE_ID"]);
    assert_eq!(sfo.get_str("TITLE"), Some("New"));
}

#[test]
fn test_value_type_accessors() {
    let mut sfo = ParamSfo::new();
    sfo.insert("TITLE", "Name");
    sfo.insert("ATTRIBUTE", 7u32);

    assert_eq!(sfo.get_u32("TITLE"), None);
    assert_eq!(sfo.get_str("ATTRIBUTE"), None);
    assert_eq!(sfo.get("ATTRIBUTE").map(|v| v.to_string()).as_deref(), Some("7"));
}
