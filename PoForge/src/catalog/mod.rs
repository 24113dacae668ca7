//! Catalog data model
//!
//! A [`Catalog`] is a named, ordered list of [`Entry`] values, optionally
//! including one header entry (empty id and context) whose translation holds
//! the `Key: Value` metadata described by [`Header`].

mod entry;
mod header;

pub use entry::{
    CONTEXT_SEPARATOR, Entry, FUZZY_FLAG, Location, PLURAL_SEPARATOR, PluralEntry, hash_key,
};
pub use header::{DEFAULT_NPLURALS, Header};

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A named collection of entries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    /// Source name (usually the file path)
    pub name: String,
    pub entries: Vec<Entry>,
}

impl Catalog {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    pub fn with_entries(name: impl Into<String>, entries: Vec<Entry>) -> Self {
        Self {
            name: name.into(),
            entries,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The header entry, if any
    pub fn header_entry(&self) -> Option<&Entry> {
        self.entries.iter().find(|e| e.is_header())
    }

    /// Parsed header, if any
    pub fn header(&self) -> Option<Header> {
        self.header_entry().map(Header::from_entry)
    }

    /// Plural-rule arity declared by the header, or the default of 2
    pub fn nplurals(&self) -> usize {
        self.header()
            .and_then(|h| h.nplurals())
            .unwrap_or(DEFAULT_NPLURALS)
    }

    /// Find a message by context and id (plural text ignored)
    pub fn find(&self, context: &str, id: &str) -> Option<&Entry> {
        self.entries
            .iter()
            .find(|e| e.context == context && e.id == id && !e.is_header())
    }

    /// Validation errors of every entry, in entry order
    pub fn validate(&self) -> Vec<ValidationError> {
        self.entries.iter().flat_map(Entry::validate).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nplurals_default_and_header() {
        let mut catalog = Catalog::new("es.po");
        assert_eq!(catalog.nplurals(), DEFAULT_NPLURALS);

        let mut header = Header::new();
        header.set("Plural-Forms", "nplurals=1; plural=0;");
        catalog.entries.push(header.to_entry());
        catalog.entries.push(Entry::new("hi", "hola"));
        assert_eq!(catalog.nplurals(), 1);
        assert_eq!(catalog.find("", "hi").map(|e| e.translation.as_str()), Some("hola"));
        assert!(catalog.find("", "").is_none());
    }

    #[test]
    fn test_catalog_validate() {
        let bad = Entry {
            id: "x".into(),
            translation: "y".into(),
            plurals: vec![PluralEntry::new(0, "z")],
            ..Default::default()
        };
        let catalog = Catalog::with_entries("t", vec![Entry::new("ok", "ok"), bad]);
        assert_eq!(catalog.validate().len(), 1);
    }
}
