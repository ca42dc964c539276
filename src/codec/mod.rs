//! Self-describing binary codec for top-K tables.
//!
//! Works on the ordered `(key, count)` sequence that every store exposes, so
//! the array and list stores share one wire format.
//!
//! ## Layout
//!
//! ```text
//!   ordered (current)
//!   ┌────────┬──────────┬──────┬──────────┬──────────┬──────────┬──────────┬──────────┬─────
//!   │ size   │ len(k0)  │ 0x80 │ k0 bytes │ count(0) │ len(k1)  │ k1 bytes │ count(1) │ ...
//!   │ varint │ varint   │ mark │ utf-8    │ varint   │ varint   │ utf-8    │ varint   │
//!   └────────┴──────────┴──────┴──────────┴──────────┴──────────┴──────────┴──────────┴─────
//!
//!   legacy (unordered): identical, without the marker byte.
//! ```
//!
//! The marker is a UTF-8 continuation byte (`10xxxxxx`). No valid UTF-8
//! string starts with one, so peeking the byte after the first key's length
//! tells the layouts apart without a version field. The one ambiguity is a
//! legacy payload whose first key is empty and whose first count's low byte
//! happens to start with `10`; such payloads are read as ordered, as they
//! always have been.
//!
//! Entries in the ordered layout are taken in file order. An array table
//! whose present key was overwritten by `update` can emit a payload that is
//! not fully descending; such runs are stably re-sorted on decode so file
//! order still breaks ties. Legacy entries are sorted by count descending
//! (ties by key).
//! The concurrent producer emits the ordered layout and needs no special case.
//!
//! An empty table encodes to zero bytes, and zero bytes decode to an empty
//! table.
//!
//! ## Example
//!
//! ```
//! use topkit::codec;
//! use topkit::store::array::ArrayTopK;
//! use topkit::traits::{ReadOnlyTopK, TopK};
//!
//! let mut table = ArrayTopK::with_seed(1);
//! table.increment_by("a", 3, 4).unwrap();
//! table.increment_by("b", 5, 4).unwrap();
//!
//! let bytes = table.encode();
//! assert_eq!(bytes[2], codec::CONTINUATION_MARKER);
//!
//! let entries = codec::decode(&bytes).unwrap();
//! assert_eq!(entries, table.sorted_entries());
//! ```

pub mod legacy;
pub mod varint;

use bytes::BufMut;
use rustc_hash::FxHashSet;

use crate::error::DecodeError;
use crate::traits::Entry;
use varint::Reader;

pub use legacy::LegacyRecord;

/// Marker written after the first key's length in the ordered layout.
pub const CONTINUATION_MARKER: u8 = 0b1000_0000;

/// Which layout a payload was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Ordered,
    Legacy,
}

/// Returns `true` for UTF-8 continuation bytes (`10xxxxxx`).
#[inline]
pub const fn is_continuation(byte: u8) -> bool {
    byte >> 6 == 0b10
}

/// Encodes entries, given largest count first, in the ordered layout.
///
/// The size prefix always matches the number of entries written, even if
/// the iterator misreports its length.
pub fn encode<'a, I>(entries: I) -> Vec<u8>
where
    I: IntoIterator<Item = (&'a str, u64)>,
    I::IntoIter: ExactSizeIterator,
{
    let entries = entries.into_iter();
    let len = entries.len();
    if len == 0 {
        return Vec::new();
    }
    let header = varint::encoded_len(len as u64);
    let mut buf = Vec::with_capacity(header + 1 + len * 8);
    varint::put_u64(&mut buf, len as u64);
    let mut written = 0usize;
    for (key, count) in entries.take(len) {
        varint::put_u64(&mut buf, key.len() as u64);
        if written == 0 {
            buf.put_u8(CONTINUATION_MARKER);
        }
        buf.put_slice(key.as_bytes());
        varint::put_u64(&mut buf, count);
        written += 1;
    }
    if written == len {
        return buf;
    }
    tracing::debug!(declared = len, written, "entry iterator ended early");
    if written == 0 {
        return Vec::new();
    }
    let mut fixed = Vec::with_capacity(buf.len());
    varint::put_u64(&mut fixed, written as u64);
    fixed.put_slice(&buf[header..]);
    fixed
}

/// Encodes entries in the legacy unordered layout (no marker byte).
///
/// Kept for producing fixtures that exercise the upgrade path.
pub fn encode_legacy<'a, I>(entries: I) -> Vec<u8>
where
    I: IntoIterator<Item = (&'a str, u64)>,
    I::IntoIter: ExactSizeIterator,
{
    let entries = entries.into_iter();
    let len = entries.len();
    if len == 0 {
        return Vec::new();
    }
    let mut buf = Vec::with_capacity(varint::encoded_len(len as u64) + len * 8);
    varint::put_u64(&mut buf, len as u64);
    for (key, count) in entries {
        varint::put_u64(&mut buf, key.len() as u64);
        buf.put_slice(key.as_bytes());
        varint::put_u64(&mut buf, count);
    }
    buf
}

/// Decodes a payload in either layout into entries sorted descending.
pub fn decode(bytes: &[u8]) -> Result<Vec<Entry>, DecodeError> {
    decode_with_layout(bytes).map(|(entries, _)| entries)
}

/// Like [`decode`], also reporting the detected layout.
///
/// An empty payload reports [`Layout::Ordered`].
pub fn decode_with_layout(bytes: &[u8]) -> Result<(Vec<Entry>, Layout), DecodeError> {
    if bytes.is_empty() {
        return Ok((Vec::new(), Layout::Ordered));
    }
    let mut reader = Reader::new(bytes);
    let size = reader.read_len()?;
    if size == 0 {
        reader.finish()?;
        return Ok((Vec::new(), Layout::Ordered));
    }

    let first_len = reader.read_len()?;
    let layout = if is_continuation(reader.peek_u8()?) {
        reader.skip(1)?;
        Layout::Ordered
    } else {
        Layout::Legacy
    };

    // Every entry needs at least two bytes, which bounds a hostile size prefix.
    let mut entries = Vec::with_capacity(size.min(reader.remaining() / 2 + 1));
    entries.push(read_entry(&mut reader, first_len)?);
    for _ in 1..size {
        let len = reader.read_len()?;
        entries.push(read_entry(&mut reader, len)?);
    }
    reader.finish()?;
    check_unique(&entries)?;

    match layout {
        Layout::Ordered => restore_descending(&mut entries),
        Layout::Legacy => legacy::sort_descending(&mut entries),
    }
    tracing::debug!(entries = entries.len(), layout = ?layout, "decoded top-k payload");
    Ok((entries, layout))
}

fn read_entry(reader: &mut Reader<'_>, key_len: usize) -> Result<Entry, DecodeError> {
    let key = reader.read_str(key_len)?;
    let count = reader.read_u64()?;
    Ok(Entry { key, count })
}

fn check_unique(entries: &[Entry]) -> Result<(), DecodeError> {
    let mut seen = FxHashSet::with_capacity_and_hasher(entries.len(), Default::default());
    for entry in entries {
        if !seen.insert(entry.key.as_str()) {
            return Err(DecodeError::DuplicateKey {
                key: entry.key.clone(),
            });
        }
    }
    Ok(())
}

fn restore_descending(entries: &mut [Entry]) {
    if entries.windows(2).any(|pair| pair[1].count > pair[0].count) {
        tracing::debug!(entries = entries.len(), "re-sorting unordered entries in ordered payload");
        entries.sort_by(|a, b| b.count.cmp(&a.count));
    }
}
