//! PSF (`param.sfo`) key/value table parsing.
//!
//! Layout, all integers little-endian:
//!
//! ```text
//! 0x00  magic "\0PSF"
//! 0x04  version
//! 0x08  key table offset
//! 0x0C  data table offset
//! 0x10  index entry count
//! 0x14  index entries, 16 bytes each
//!       (key offset u16, format u16, length u32, max length u32, data offset u32)
//! ....  padding up to the key table
//! ....  key table: NUL-terminated ASCII names
//! ....  data table: values, each occupying `max length` bytes
//! ```
//!
//! Offsets are relative to the start of the blob. Values are not stored in
//! index order, so every entry is resolved with explicit seeks.

use std::io::{Read, Seek, SeekFrom};

use crate::ReadSeek;
use crate::error::SfoError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Magic bytes at the start of every PSF blob.
pub const PSF_MAGIC: [u8; 4] = *b"\0PSF";

/// Fixed header size.
const HEADER_SIZE: u64 = 20;

/// Size of one index table entry.
const INDEX_ENTRY_SIZE: u64 = 16;

/// Version written by [`ParamSfo::to_bytes`] when none was read (1.1).
const DEFAULT_VERSION: u32 = 0x0101;

// ---------------------------------------------------------------------------
// Value types
// ---------------------------------------------------------------------------

/// Storage format of a PSF value, from the index entry's format code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueFormat {
    /// 0x0004: UTF-8 without NUL terminator (system-reserved strings).
    Utf8Special,
    /// 0x0204: NUL-terminated UTF-8.
    Utf8,
    /// 0x0404: 32-bit little-endian unsigned integer.
    Integer,
}

impl ValueFormat {
    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            0x0004 => Some(Self::Utf8Special),
            0x0204 => Some(Self::Utf8),
            0x0404 => Some(Self::Integer),
            _ => None,
        }
    }

    pub fn code(&self) -> u16 {
        match self {
            Self::Utf8Special => 0x0004,
            Self::Utf8 => 0x0204,
            Self::Integer => 0x0404,
        }
    }
}

/// A decoded PSF value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SfoValue {
    Str(String),
    Integer(u32),
}

impl SfoValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            Self::Integer(_) => None,
        }
    }

    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Self::Integer(v) => Some(*v),
            Self::Str(_) => None,
        }
    }
}

impl std::fmt::Display for SfoValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Str(s) => write!(f, "{}", s),
            Self::Integer(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for SfoValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for SfoValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<u32> for SfoValue {
    fn from(v: u32) -> Self {
        Self::Integer(v)
    }
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// A parsed PSF table.
///
/// Iteration follows index-table order; lookups are by key name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSfo {
    version: u32,
    entries: Vec<(String, SfoValue)>,
}

impl Default for ParamSfo {
    fn default() -> Self {
        Self {
            version: DEFAULT_VERSION,
            entries: Vec::new(),
        }
    }
}

impl ParamSfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    /// Set `key` to `value`, keeping the original position of an existing key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<SfoValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&SfoValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(SfoValue::as_str)
    }

    pub fn get_u32(&self, key: &str) -> Option<u32> {
        self.get(key).and_then(SfoValue::as_u32)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SfoValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize the table into a PSF blob.
    ///
    /// Strings are written as NUL-terminated UTF-8 (0x0204) and every value
    /// slot is padded to a 4-byte boundary.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SfoError> {
        let mut keys = Vec::new();
        let mut data = Vec::new();
        let mut index = Vec::with_capacity(self.entries.len() * INDEX_ENTRY_SIZE as usize);

        for (key, value) in &self.entries {
            let key_offset = u16::try_from(keys.len()).map_err(|_| {
                SfoError::invalid_format("key table exceeds 65535 bytes")
            })?;
            keys.extend_from_slice(key.as_bytes());
            keys.push(0);

            let (format, bytes) = match value {
                SfoValue::Str(s) => {
                    let mut bytes = s.as_bytes().to_vec();
                    bytes.push(0);
                    (ValueFormat::Utf8, bytes)
                }
                SfoValue::Integer(v) => (ValueFormat::Integer, v.to_le_bytes().to_vec()),
            };
            let len = bytes.len();
            let max_len = align4(len);
            let data_offset = data.len();
            data.extend_from_slice(&bytes);
            data.resize(data_offset + max_len, 0);

            index.extend_from_slice(&key_offset.to_le_bytes());
            index.extend_from_slice(&format.code().to_le_bytes());
            index.extend_from_slice(&to_u32(len)?.to_le_bytes());
            index.extend_from_slice(&to_u32(max_len)?.to_le_bytes());
            index.extend_from_slice(&to_u32(data_offset)?.to_le_bytes());
        }
        keys.resize(align4(keys.len()), 0);

        let key_table_start = HEADER_SIZE as usize + index.len();
        let data_table_start = key_table_start + keys.len();

        let mut out = Vec::with_capacity(data_table_start + data.len());
        out.extend_from_slice(&PSF_MAGIC);
        out.extend_from_slice(&self.version.to_le_bytes());
        out.extend_from_slice(&to_u32(key_table_start)?.to_le_bytes());
        out.extend_from_slice(&to_u32(data_table_start)?.to_le_bytes());
        out.extend_from_slice(&to_u32(self.entries.len())?.to_le_bytes());
        out.extend_from_slice(&index);
        out.extend_from_slice(&keys);
        out.extend_from_slice(&data);
        Ok(out)
    }
}

fn align4(n: usize) -> usize {
    n.div_ceil(4) * 4
}

fn to_u32(n: usize) -> Result<u32, SfoError> {
    u32::try_from(n).map_err(|_| SfoError::invalid_format(format!("offset {} exceeds u32", n)))
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

/// Parsed fixed-size PSF header.
#[derive(Debug, Clone, Copy)]
struct SfoHeader {
    version: u32,
    key_table_start: u32,
    data_table_start: u32,
    entry_count: u32,
}

/// One 16-byte index table entry.
#[derive(Debug, Clone, Copy)]
struct IndexEntry {
    key_offset: u16,
    format_code: u16,
    data_max_len: u32,
    data_offset: u32,
}

/// Read a PSF table from a reader positioned at the start of the blob.
pub fn read_sfo(reader: &mut dyn ReadSeek) -> Result<ParamSfo, SfoError> {
    let base = reader.stream_position()?;
    let header = read_header(reader)?;

    let index_end = HEADER_SIZE + u64::from(header.entry_count) * INDEX_ENTRY_SIZE;
    if u64::from(header.key_table_start) < index_end {
        return Err(SfoError::invalid_format(format!(
            "key table at 0x{:X} overlaps index table ending at 0x{:X}",
            header.key_table_start, index_end
        )));
    }

    let key_table = base + u64::from(header.key_table_start);
    let data_table = base + u64::from(header.data_table_start);

    let mut sfo = ParamSfo {
        version: header.version,
        entries: Vec::with_capacity(header.entry_count.min(256) as usize),
    };

    for _ in 0..header.entry_count {
        let entry = read_index_entry(reader)?;
        let resume = reader.stream_position()?;

        let key = read_key(reader, key_table + u64::from(entry.key_offset))?;
        let value = read_value(reader, data_table + u64::from(entry.data_offset), &entry, &key)?;
        log::trace!("param.sfo {} = {}", key, value);
        if sfo.get(&key).is_some() {
            log::debug!("param.sfo repeats key {key}; keeping the later value");
        }
        sfo.insert(key, value);

        reader.seek(SeekFrom::Start(resume))?;
    }

    // Skip the padding between the index and key tables.
    reader.seek(SeekFrom::Start(key_table))?;

    Ok(sfo)
}

fn read_header(reader: &mut dyn ReadSeek) -> Result<SfoHeader, SfoError> {
    let mut buf = [0u8; HEADER_SIZE as usize];
    reader.read_exact(&mut buf).map_err(|e| {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            SfoError::invalid_format("blob is shorter than the 20-byte header")
        } else {
            SfoError::Io(e)
        }
    })?;

    let magic = [buf[0], buf[1], buf[2], buf[3]];
    if magic != PSF_MAGIC {
        return Err(SfoError::InvalidMagic(magic));
    }

    Ok(SfoHeader {
        version: le_u32(&buf[4..8]),
        key_table_start: le_u32(&buf[8..12]),
        data_table_start: le_u32(&buf[12..16]),
        entry_count: le_u32(&buf[16..20]),
    })
}

fn read_index_entry(reader: &mut dyn ReadSeek) -> Result<IndexEntry, SfoError> {
    let mut buf = [0u8; INDEX_ENTRY_SIZE as usize];
    reader.read_exact(&mut buf).map_err(|e| {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            SfoError::invalid_format("index table is truncated")
        } else {
            SfoError::Io(e)
        }
    })?;

    // Bytes 4..8 hold the used length, which is not needed to decode a value.
    Ok(IndexEntry {
        key_offset: u16::from_le_bytes([buf[0], buf[1]]),
        format_code: u16::from_le_bytes([buf[2], buf[3]]),
        data_max_len: le_u32(&buf[8..12]),
        data_offset: le_u32(&buf[12..16]),
    })
}

/// Read a NUL-terminated ASCII key starting at `offset`.
fn read_key(reader: &mut dyn ReadSeek, offset: u64) -> Result<String, SfoError> {
    reader.seek(SeekFrom::Start(offset))?;

    let mut name = Vec::new();
    let mut byte = [0u8; 1];
    loop {
        if reader.read(&mut byte)? == 0 {
            return Err(SfoError::invalid_format(format!(
                "unterminated key at 0x{:X}",
                offset
            )));
        }
        if byte[0] == 0 {
            break;
        }
        name.push(byte[0]);
    }

    if !name.is_ascii() {
        return Err(SfoError::invalid_format(format!(
            "non-ASCII key at 0x{:X}",
            offset
        )));
    }
    // ASCII is valid UTF-8.
    String::from_utf8(name).map_err(|e| SfoError::invalid_format(e.to_string()))
}

/// Read `data_max_len` bytes at `offset` and decode them per the format code.
fn read_value(
    reader: &mut dyn ReadSeek,
    offset: u64,
    entry: &IndexEntry,
    key: &str,
) -> Result<SfoValue, SfoError> {
    let format = ValueFormat::from_code(entry.format_code)
        .ok_or_else(|| SfoError::UnsupportedValueFormat(entry.format_code, key.to_string()))?;

    reader.seek(SeekFrom::Start(offset))?;
    let mut buf = Vec::new();
    (&mut *reader)
        .take(u64::from(entry.data_max_len))
        .read_to_end(&mut buf)?;
    if buf.len() != entry.data_max_len as usize {
        return Err(SfoError::invalid_format(format!(
            "value for {} is truncated: expected {} bytes, got {}",
            key,
            entry.data_max_len,
            buf.len()
        )));
    }

    match format {
        ValueFormat::Utf8 | ValueFormat::Utf8Special => {
            while buf.last() == Some(&0) {
                buf.pop();
            }
            String::from_utf8(buf)
                .map(SfoValue::Str)
                .map_err(|e| SfoError::invalid_format(format!("value for {}: {}", key, e)))
        }
        ValueFormat::Integer => {
            if buf.len() != 4 {
                return Err(SfoError::invalid_format(format!(
                    "integer value for {} has length {}, expected 4",
                    key,
                    buf.len()
                )));
            }
            Ok(SfoValue::Integer(le_u32(&buf)))
        }
    }
}

fn le_u32(buf: &[u8]) -> u32 {
    u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]])
}

#[cfg(test)]
#[path = "tests/sfo_tests.rs"]
mod tests;
