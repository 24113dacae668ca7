//! Catalog merge operations
//!
//! # Template Merge
//!
//! Bring an existing translation up to date with a new template.
//!
//! ```no_run
//! use poforge::formats::{read_po, write_po, PoWriteOptions};
//! use poforge::merge::{merge_catalogs, TemplateMergeOptions};
//!
//! let translated = read_po("es.po")?;
//! let template = read_po("messages.pot")?;
//! let merged = merge_catalogs(&translated, &template, &TemplateMergeOptions::default());
//!
//! let fuzzy = merged.entries.iter().filter(|e| e.is_fuzzy()).count();
//! println!("{fuzzy} messages need review");
//! write_po("es.po", &merged.entries, &PoWriteOptions::default())?;
//! # Ok::<(), poforge::Error>(())
//! ```
//!
//! # Concatenation
//!
//! ```no_run
//! use poforge::formats::read_po;
//! use poforge::merge::{concatenate, ConcatOptions};
//!
//! let catalogs = vec![read_po("core.po")?, read_po("plugin.po")?];
//!
//! // Messages that only one of the catalogs defines
//! let unique = concatenate(&catalogs, &ConcatOptions::new().unique());
//! # Ok::<(), poforge::Error>(())
//! ```

mod concat;
mod template;
mod types;

pub use concat::{SOURCE_MARKER, concatenate, concatenate_catalogs};
pub use template::{merge_catalogs, merge_template};
pub use types::{ConcatOptions, TemplateMergeOptions};
