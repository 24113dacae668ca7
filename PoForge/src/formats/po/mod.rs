//! PO text format
//!
//! Parsing is split into a line tokenizer and a normalizer that assembles
//! tokens into entries. The writer prints entries back with GNU-style
//! wrapping.

mod lexer;
mod parser;
mod writer;

pub use parser::{parse_po, read_po};
pub use writer::{DEFAULT_WRAP_WIDTH, LocationMode, PoWriteOptions, format_po, write_po};
