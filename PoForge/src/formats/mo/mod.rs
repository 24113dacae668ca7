//! Binary MO catalog format
//!
//! Compatible with GNU gettext `.mo` files: a 7-word header, two
//! `(length, offset)` string tables, an optional open-addressing hash index,
//! and the NUL-terminated strings. Every word uses the byte order announced
//! by the magic number.

mod hash_table;
mod reader;
mod writer;

pub use hash_table::{auto_size, next_prime, slot_sequence};
pub use reader::{Decoded, MoHeader, MoView, decode, read_mo};
pub use writer::{encode, encode_prepared, prepare_entries, write_mo};

use serde::{Deserialize, Serialize};

/// Magic number as written in the file's own byte order
pub const MO_MAGIC: u32 = 0x950412de;

/// The magic number as seen when read with the opposite byte order
pub const MO_MAGIC_SWAPPED: u32 = 0xde120495;

/// Size of the fixed header (7 words)
pub const HEADER_SIZE: u32 = 28;

/// Byte order of all words in a file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Endian {
    /// Whatever the running machine uses
    #[default]
    Native,
    Little,
    Big,
}

impl Endian {
    pub fn is_big_endian(self) -> bool {
        match self {
            Self::Native => cfg!(target_endian = "big"),
            Self::Little => false,
            Self::Big => true,
        }
    }
}

/// Whether and how large to build the hash index
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HashTableSize {
    /// No hash table (size and offset still written, size 0)
    None,
    /// `max(3, next_prime(count * 4 / 3))`
    #[default]
    Auto,
    /// At least this many slots, rounded up to a prime
    Fixed(u32),
}

/// Options for [`encode`]
#[derive(Debug, Clone, Default)]
pub struct EncodeOptions {
    /// Byte order of the output
    pub byte_order: Endian,
    /// Hash index size
    pub hash_table: HashTableSize,
    /// Skip invalid entries (with a warning) instead of failing
    pub ignore_errors: bool,
    /// Leave out entries without any translation (the header is always kept)
    pub skip_untranslated: bool,
}

impl EncodeOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_byte_order(mut self, byte_order: Endian) -> Self {
        self.byte_order = byte_order;
        self
    }

    #[must_use]
    pub fn with_hash_table(mut self, hash_table: HashTableSize) -> Self {
        self.hash_table = hash_table;
        self
    }

    #[must_use]
    pub fn with_ignore_errors(mut self, ignore_errors: bool) -> Self {
        self.ignore_errors = ignore_errors;
        self
    }

    #[must_use]
    pub fn with_skip_untranslated(mut self, skip_untranslated: bool) -> Self {
        self.skip_untranslated = skip_untranslated;
        self
    }
}

/// Options for [`decode`]
#[derive(Debug, Clone, Default)]
pub struct DecodeOptions {
    /// Skip entries whose strings are out of range instead of failing
    pub ignore_errors: bool,
}

impl DecodeOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_ignore_errors(mut self, ignore_errors: bool) -> Self {
        self.ignore_errors = ignore_errors;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Entry, Location, PluralEntry};
    use pretty_assertions::assert_eq;

    fn catalog() -> Vec<Entry> {
        vec![
            Entry {
                id: "apple".into(),
                plurals: vec![PluralEntry::new(0, "manzana"), PluralEntry::new(1, "manzanas")],
                ..Default::default()
            },
            Entry {
                id: "hi".into(),
                context: "casual".into(),
                translation: "hola".into(),
                ..Default::default()
            },
        ]
    }

    #[test]
    fn test_round_trip_example() {
        let bytes = encode(&catalog(), &EncodeOptions::default()).unwrap();
        let decoded = decode(&bytes, &DecodeOptions::default()).unwrap();
        assert_eq!(decoded.entries, catalog());
    }

    #[test]
    fn test_round_trip_drops_unpersisted_fields() {
        let mut entry = Entry::new("Quit", "Salir");
        entry.locations.push(Location::new("main.rs", 3));
        entry.comments.push("menu item".into());
        entry.flags.push("c-format".into());

        let bytes = encode(&[entry], &EncodeOptions::default()).unwrap();
        let decoded = decode(&bytes, &DecodeOptions::default()).unwrap();
        assert_eq!(decoded.entries, vec![Entry::new("Quit", "Salir")]);
    }

    #[test]
    fn test_encode_is_order_independent() {
        let forward = catalog();
        let mut backward = catalog();
        backward.reverse();
        let options = EncodeOptions::new().with_byte_order(Endian::Big);
        let a = encode(&forward, &options).unwrap();
        let b = encode(&backward, &options).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, encode(&forward, &options).unwrap());
    }

    #[test]
    fn test_native_matches_target() {
        let native = encode(&catalog(), &EncodeOptions::default()).unwrap();
        let explicit = if cfg!(target_endian = "big") {
            Endian::Big
        } else {
            Endian::Little
        };
        let expected = encode(&catalog(), &EncodeOptions::new().with_byte_order(explicit)).unwrap();
        assert_eq!(native, expected);
    }
}
