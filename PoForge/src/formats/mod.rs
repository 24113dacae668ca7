//! File format handlers for gettext catalogs
//!
//! - `mo` - binary catalogs with the optional hash lookup index
//! - `po` - the human-readable text format

pub mod mo;
pub mod po;

pub use mo::{
    DecodeOptions, Decoded, EncodeOptions, Endian, HashTableSize, MoView, decode, encode,
    encode_prepared, prepare_entries, read_mo, write_mo,
};
pub use po::{LocationMode, PoWriteOptions, parse_po, read_po, write_po, format_po};
