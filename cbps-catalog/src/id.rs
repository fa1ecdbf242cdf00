//! Entry identifiers.

use crate::record::Record;

/// Identifier for an entry whose package carries no title id.
///
/// The CRC-32 of the UTF-8 title, as the lowercase hex of its little-endian
/// bytes.
pub fn synthesize_id(title: &str) -> String {
    crc32fast::hash(title.as_bytes())
        .to_le_bytes()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

/// Pick an id for `title` that no entry with a different title uses.
///
/// Ids may repeat across rows only when the titles match (the same entry
/// re-added). On a clash the smallest free `{candidate}_{n}`, n ≥ 1, is used.
pub fn resolve_id_collision(records: &[Record], candidate: &str, title: &str) -> String {
    let taken = |id: &str| records.iter().any(|r| r.id() == id && r.title() != title);

    if !taken(candidate) {
        return candidate.to_string();
    }

    let mut n = 1u32;
    loop {
        let id = format!("{candidate}_{n}");
        if !taken(&id) {
            log::debug!("id {} is taken, using {}", candidate, id);
            return id;
        }
        n += 1;
    }
}
