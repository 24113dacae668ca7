//! # PoForge
//!
//! A pure-Rust engine for gettext translation catalogs.
//!
//! ## Components
//!
//! - **Entry model** - messages, plural forms, locations and the catalog header
//! - **MO codec** - bit-exact binary catalogs in either byte order, with the
//!   open-addressed hash lookup index
//! - **PO text format** - parser and pretty-printer
//! - **Merges** - template merge with fuzzy matching, and N-way concatenation
//! - **Collation** - canonical ordering and duplicate resolution
//!
//! ## Quick Start
//!
//! ### Compiling a Catalog
//!
//! ```no_run
//! use poforge::formats::{read_po, write_mo, EncodeOptions};
//!
//! let catalog = read_po("es.po")?;
//! write_mo("es.mo", &catalog.entries, &EncodeOptions::default())?;
//! # Ok::<(), poforge::Error>(())
//! ```
//!
//! ### Looking Up a Message
//!
//! ```no_run
//! use poforge::formats::MoView;
//!
//! let data = std::fs::read("es.mo")?;
//! let view = MoView::new(&data)?;
//! if let Some(entry) = view.lookup("", "Hello") {
//!     println!("{}", entry.translation);
//! }
//! # Ok::<(), poforge::Error>(())
//! ```
//!
//! ### Using the Prelude
//!
//! ```
//! use poforge::prelude::*;
//!
//! let entries = vec![Entry::new("apple", "manzana")];
//! let bytes = encode(&entries, &EncodeOptions::default())?;
//! let decoded = decode(&bytes, &DecodeOptions::default())?;
//! assert_eq!(decoded.entries[0].translation, "manzana");
//! # Ok::<(), poforge::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `poforge` command-line binary

pub mod batch;
pub mod catalog;
pub mod collate;
pub mod error;
pub mod formats;
pub mod merge;

// Re-exports for convenience
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Error, Result};

    pub use crate::catalog::{Catalog, Entry, Header, Location, PluralEntry};
    pub use crate::collate::{SortMode, clean_duplicates, solve, sort_entries};

    pub use crate::formats::{
        DecodeOptions, EncodeOptions, Endian, HashTableSize, LocationMode, MoView,
        PoWriteOptions, decode, encode, format_po, parse_po, read_mo, read_po, write_mo,
        write_po,
    };

    pub use crate::merge::{
        ConcatOptions, TemplateMergeOptions, concatenate, merge_catalogs, merge_template,
    };

    pub use crate::batch::{BatchCompileResult, batch_compile, find_po_files};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
