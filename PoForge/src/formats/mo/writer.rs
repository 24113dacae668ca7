//! MO file writing
//!
//! Layout: 7-word header, original-string table, translation table, optional
//! hash table, then the two NUL-terminated string blobs.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use byteorder::{BigEndian, LittleEndian, WriteBytesExt};

use super::hash_table;
use super::{EncodeOptions, HEADER_SIZE, HashTableSize, MO_MAGIC};
use crate::catalog::Entry;
use crate::collate::{self, SortMode};
use crate::error::{Error, Result};

/// Write entries to an MO file on disk
///
/// # Errors
/// Returns an error if encoding fails (see [`encode`]) or the file cannot be
/// written.
pub fn write_mo<P: AsRef<Path>>(path: P, entries: &[Entry], options: &EncodeOptions) -> Result<()> {
    let bytes = encode(entries, options)?;
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

/// The entries exactly as they will be stored
///
/// Duplicates are resolved, fuzzy and obsolete entries dropped, and the rest
/// sorted by unified id. The caller's slice is left untouched.
///
/// # Errors
/// Returns [`Error::Validation`] for the first entry that is both singular
/// and plural, unless `ignore_errors` is set, in which case it is skipped.
pub fn prepare_entries(entries: &[Entry], options: &EncodeOptions) -> Result<Vec<Entry>> {
    let mut prepared = Vec::with_capacity(entries.len());

    for entry in collate::solve(entries) {
        if entry.is_fuzzy() || entry.obsolete {
            continue;
        }
        if options.skip_untranslated && !entry.is_header() && !entry.is_translated() {
            continue;
        }
        if let Some(err) = entry.validate().into_iter().next() {
            if options.ignore_errors {
                tracing::warn!("Skipping invalid entry: {}", err);
                continue;
            }
            return Err(err.into());
        }
        prepared.push(entry);
    }

    collate::sort_entries(&mut prepared, SortMode::ById);
    Ok(prepared)
}

/// Encode entries into MO bytes
///
/// Output is fully determined by the set of entries and the options: input
/// order does not matter.
///
/// # Errors
/// Returns an error if an entry fails validation (see [`prepare_entries`]),
/// a fixed hash table is too small, or the data exceeds 32-bit offsets.
pub fn encode(entries: &[Entry], options: &EncodeOptions) -> Result<Vec<u8>> {
    let prepared = prepare_entries(entries, options)?;
    encode_prepared(&prepared, options)
}

/// Encode the output of [`prepare_entries`] as is
///
/// # Errors
/// Returns an error if a fixed hash table is too small or the data exceeds
/// 32-bit offsets.
pub fn encode_prepared(prepared: &[Entry], options: &EncodeOptions) -> Result<Vec<u8>> {
    let count = to_u32(prepared.len())?;

    // String blobs and (offset-within-blob, length) records
    let mut id_blob = Vec::new();
    let mut tr_blob = Vec::new();
    let mut id_spans = Vec::with_capacity(prepared.len());
    let mut tr_spans = Vec::with_capacity(prepared.len());
    for entry in prepared {
        id_spans.push(append_string(&mut id_blob, entry.unified_id().as_bytes())?);
        tr_spans.push(append_string(&mut tr_blob, entry.unified_translation().as_bytes())?);
    }

    let hash_size = match options.hash_table {
        HashTableSize::None => 0,
        HashTableSize::Auto => hash_table::auto_size(count),
        HashTableSize::Fixed(size) => {
            let size = hash_table::next_prime(size.max(hash_table::MIN_SIZE));
            if size <= count {
                return Err(Error::Configuration(format!(
                    "hash table size {size} is too small for {count} entries"
                )));
            }
            size
        }
    };

    let ids_offset = HEADER_SIZE;
    let translations_offset = to_u32(ids_offset as usize + 8 * prepared.len())?;
    let hash_offset = to_u32(translations_offset as usize + 8 * prepared.len())?;
    let id_blob_start = to_u32(hash_offset as usize + 4 * hash_size as usize)?;
    let tr_blob_start = to_u32(id_blob_start as usize + id_blob.len())?;
    to_u32(tr_blob_start as usize + tr_blob.len())?;

    tracing::debug!(
        "Encoding {} entries, hash table size {}",
        count,
        hash_size
    );

    let mut out = WordWriter::new(options.byte_order.is_big_endian());

    // Header
    out.put(MO_MAGIC)?;
    out.put(0)?; // revision
    out.put(count)?;
    out.put(ids_offset)?;
    out.put(translations_offset)?;
    out.put(hash_size)?;
    out.put(hash_offset)?;

    // String tables, rebased onto the blob positions
    for &(offset, length) in &id_spans {
        out.put(length)?;
        out.put(id_blob_start + offset)?;
    }
    for &(offset, length) in &tr_spans {
        out.put(length)?;
        out.put(tr_blob_start + offset)?;
    }

    if hash_size > 0 {
        let hashes: Vec<u32> = prepared.iter().map(Entry::hash).collect();
        for slot in hash_table::build(&hashes, hash_size) {
            out.put(slot)?;
        }
    }

    let mut bytes = out.into_inner();
    debug_assert_eq!(bytes.len(), id_blob_start as usize);
    bytes.extend_from_slice(&id_blob);
    bytes.extend_from_slice(&tr_blob);
    Ok(bytes)
}

/// Append a NUL-terminated string, returning its (offset, length)
fn append_string(blob: &mut Vec<u8>, bytes: &[u8]) -> Result<(u32, u32)> {
    let offset = to_u32(blob.len())?;
    let length = to_u32(bytes.len())?;
    blob.extend_from_slice(bytes);
    blob.push(0);
    Ok((offset, length))
}

fn to_u32(size: usize) -> Result<u32> {
    u32::try_from(size).map_err(|_| Error::MoTooLarge { size })
}

/// Buffer that writes 32-bit words in one fixed byte order
struct WordWriter {
    buf: Vec<u8>,
    big_endian: bool,
}

impl WordWriter {
    fn new(big_endian: bool) -> Self {
        Self {
            buf: Vec::new(),
            big_endian,
        }
    }

    fn put(&mut self, value: u32) -> Result<()> {
        if self.big_endian {
            self.buf.write_u32::<BigEndian>(value)?;
        } else {
            self.buf.write_u32::<LittleEndian>(value)?;
        }
        Ok(())
    }

    fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}
