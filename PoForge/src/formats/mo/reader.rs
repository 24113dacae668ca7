//! MO file reading and parsing
//!
//! Strings are sliced straight out of the input buffer at the offsets the
//! tables declare. The hash table is only needed for keyed lookups
//! ([`MoView::lookup`]); sequential decoding ignores it.

use std::cmp::Ordering;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use serde::Serialize;

use super::hash_table;
use super::{DecodeOptions, Endian, HEADER_SIZE, MO_MAGIC, MO_MAGIC_SWAPPED};
use crate::catalog::{CONTEXT_SEPARATOR, Entry, PluralEntry, hash_key};
use crate::error::{Error, Result};

/// The seven header words of an MO file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MoHeader {
    /// Byte order detected from the magic number (`Little` or `Big`)
    pub byte_order: Endian,
    pub revision: u32,
    pub count: u32,
    pub ids_offset: u32,
    pub translations_offset: u32,
    pub hash_size: u32,
    pub hash_offset: u32,
}

impl MoHeader {
    pub fn major_revision(&self) -> u32 {
        self.revision >> 16
    }

    pub fn minor_revision(&self) -> u32 {
        self.revision & 0xffff
    }
}

/// Result of decoding an MO buffer
#[derive(Debug)]
pub struct Decoded {
    pub header: MoHeader,
    /// Entries in file order
    pub entries: Vec<Entry>,
    /// Non-fatal findings (e.g. an unknown revision)
    pub warnings: Vec<String>,
    /// Per-entry errors skipped under `ignore_errors`
    pub errors: Vec<Error>,
}

/// Read an MO file from disk
///
/// # Errors
/// Returns [`Error::Io`] if the file cannot be read, or any error from
/// [`decode`].
pub fn read_mo<P: AsRef<Path>>(path: P, options: &DecodeOptions) -> Result<Decoded> {
    let mut file = File::open(path)?;
    let mut buffer = Vec::new();
    file.read_to_end(&mut buffer)?;
    decode(&buffer, options)
}

/// Decode MO bytes into entries
///
/// # Errors
/// Returns [`Error::InvalidMoMagic`] or [`Error::TruncatedMo`] when the header
/// or string tables cannot be read. A string pointing outside the buffer
/// fails the call with [`Error::MoOffsetOutOfRange`], unless
/// `ignore_errors` is set, in which case that entry is skipped and the error
/// collected in [`Decoded::errors`].
pub fn decode(data: &[u8], options: &DecodeOptions) -> Result<Decoded> {
    let view = MoView::new(data)?;
    let header = view.header;

    let mut warnings = Vec::new();
    if header.major_revision() > 1 || header.minor_revision() > 1 {
        let message = format!(
            "unexpected MO revision {}.{}",
            header.major_revision(),
            header.minor_revision()
        );
        tracing::warn!("{}", message);
        warnings.push(message);
    }

    let mut entries = Vec::with_capacity(view.len());
    let mut errors = Vec::new();

    for index in 0..view.len() {
        let strings = view
            .original(index)
            .and_then(|id| view.translation(index).map(|tr| (id, tr)));
        match strings {
            Ok((id, translation)) => entries.push(build_entry(id, translation)),
            Err(err) if options.ignore_errors => {
                tracing::warn!("Skipping entry {}: {}", index, err);
                errors.push(err);
            }
            Err(err) => return Err(err),
        }
    }

    tracing::debug!(
        "Decoded {} entries ({:?}, hash table size {})",
        entries.len(),
        header.byte_order,
        header.hash_size
    );

    Ok(Decoded {
        header,
        entries,
        warnings,
        errors,
    })
}

/// Split a stored id/translation pair back into an entry
fn build_entry(id_bytes: &[u8], tr_bytes: &[u8]) -> Entry {
    let (context, rest) = match id_bytes.iter().position(|&b| b == CONTEXT_SEPARATOR as u8) {
        Some(pos) => (&id_bytes[..pos], &id_bytes[pos + 1..]),
        None => (&[][..], id_bytes),
    };
    let (id, plural) = match rest.iter().position(|&b| b == 0) {
        Some(pos) => (&rest[..pos], &rest[pos + 1..]),
        None => (rest, &[][..]),
    };

    let mut entry = Entry {
        id: lossy(id),
        context: lossy(context),
        plural: lossy(plural),
        ..Default::default()
    };

    let parts: Vec<&[u8]> = tr_bytes.split(|&b| b == 0).collect();
    if parts.len() > 1 || !entry.plural.is_empty() {
        entry.plurals = (0u32..)
            .zip(parts)
            .map(|(i, text)| PluralEntry::new(i, lossy(text)))
            .collect();
    } else {
        entry.translation = lossy(tr_bytes);
    }

    entry
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Zero-copy access to an MO buffer
///
/// Validates the header and table bounds up front; individual strings are
/// bounds-checked when accessed.
#[derive(Debug, Clone, Copy)]
pub struct MoView<'a> {
    data: &'a [u8],
    pub header: MoHeader,
}

impl<'a> MoView<'a> {
    /// Parse the header of an MO buffer
    ///
    /// # Errors
    /// Returns [`Error::InvalidMoMagic`] for an unknown magic number and
    /// [`Error::TruncatedMo`] if the header or either string table does not
    /// fit in the buffer.
    pub fn new(data: &'a [u8]) -> Result<Self> {
        let magic_bytes = slice(data, 0, 4)?;
        let byte_order = match LittleEndian::read_u32(magic_bytes) {
            MO_MAGIC => Endian::Little,
            MO_MAGIC_SWAPPED => Endian::Big,
            other => return Err(Error::InvalidMoMagic(other)),
        };

        let words = slice(data, 0, HEADER_SIZE as usize)?;
        let word = |i: usize| read_word(byte_order, &words[i * 4..i * 4 + 4]);
        let header = MoHeader {
            byte_order,
            revision: word(1),
            count: word(2),
            ids_offset: word(3),
            translations_offset: word(4),
            hash_size: word(5),
            hash_offset: word(6),
        };

        let table_len = (header.count as usize)
            .checked_mul(8)
            .ok_or(Error::MoTooLarge {
                size: header.count as usize,
            })?;
        slice(data, header.ids_offset as usize, table_len)?;
        slice(data, header.translations_offset as usize, table_len)?;

        Ok(Self { data, header })
    }

    /// Number of messages
    pub fn len(&self) -> usize {
        self.header.count as usize
    }

    pub fn is_empty(&self) -> bool {
        self.header.count == 0
    }

    /// Raw original string (unified id) at `index`
    ///
    /// # Errors
    /// Returns [`Error::MoOffsetOutOfRange`] if the string lies outside the
    /// buffer.
    pub fn original(&self, index: usize) -> Result<&'a [u8]> {
        self.string(self.header.ids_offset, index)
    }

    /// Raw translation string at `index`
    ///
    /// # Errors
    /// Returns [`Error::MoOffsetOutOfRange`] if the string lies outside the
    /// buffer.
    pub fn translation(&self, index: usize) -> Result<&'a [u8]> {
        self.string(self.header.translations_offset, index)
    }

    /// Find a message through the hash index (or binary search without one)
    ///
    /// Returns the decoded entry for `context`/`id`; plural source text is
    /// not part of the key.
    pub fn lookup(&self, context: &str, id: &str) -> Option<Entry> {
        let mut key = Vec::with_capacity(context.len() + id.len() + 1);
        if !context.is_empty() {
            key.extend_from_slice(context.as_bytes());
            key.push(CONTEXT_SEPARATOR as u8);
        }
        key.extend_from_slice(id.as_bytes());

        let index = if self.header.hash_size >= hash_table::MIN_SIZE {
            self.hash_lookup(&key)?
        } else {
            self.binary_search(&key)?
        };

        let id_bytes = self.original(index).ok()?;
        let tr_bytes = self.translation(index).ok()?;
        Some(build_entry(id_bytes, tr_bytes))
    }

    fn hash_lookup(&self, key: &[u8]) -> Option<usize> {
        let size = self.header.hash_size;
        for idx in hash_table::slot_sequence(hash_key(key), size) {
            let offset = self.header.hash_offset as usize + idx as usize * 4;
            let slot = read_word(self.header.byte_order, slice(self.data, offset, 4).ok()?);
            if slot == 0 {
                return None;
            }
            let index = slot as usize - 1;
            if self.original(index).ok().map(until_nul) == Some(key) {
                return Some(index);
            }
        }
        None
    }

    fn binary_search(&self, key: &[u8]) -> Option<usize> {
        let (mut low, mut high) = (0, self.len());
        while low < high {
            let mid = low + (high - low) / 2;
            match until_nul(self.original(mid).ok()?).cmp(key) {
                Ordering::Less => low = mid + 1,
                Ordering::Greater => high = mid,
                Ordering::Equal => return Some(mid),
            }
        }
        None
    }

    fn string(&self, table: u32, index: usize) -> Result<&'a [u8]> {
        let record = slice(self.data, table as usize + index * 8, 8)?;
        let length = read_word(self.header.byte_order, &record[..4]);
        let offset = read_word(self.header.byte_order, &record[4..]);
        slice(self.data, offset as usize, length as usize).map_err(|_| Error::MoOffsetOutOfRange {
            index,
            offset,
            length,
            len: self.data.len(),
        })
    }
}

fn until_nul(bytes: &[u8]) -> &[u8] {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    &bytes[..end]
}

fn read_word(order: Endian, bytes: &[u8]) -> u32 {
    if order.is_big_endian() {
        BigEndian::read_u32(bytes)
    } else {
        LittleEndian::read_u32(bytes)
    }
}

/// Bounds-checked `data[offset..offset + len]`
fn slice(data: &[u8], offset: usize, len: usize) -> Result<&[u8]> {
    offset
        .checked_add(len)
        .and_then(|end| data.get(offset..end))
        .ok_or(Error::TruncatedMo {
            offset,
            needed: len,
            len: data.len(),
        })
}
