//! Message entries and their derived identities

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationReason};

/// Separator between the context and the id in a unified id (EOT)
pub const CONTEXT_SEPARATOR: char = '\u{4}';

/// Separator between the id and the plural source text, and between plural
/// translations (NUL)
pub const PLURAL_SEPARATOR: char = '\0';

/// Flag marking an entry whose translation needs review
pub const FUZZY_FLAG: &str = "fuzzy";

/// A source occurrence of a message
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// Source file path
    pub file: String,
    /// Line number, `-1` when only the file is known
    pub line: i64,
}

impl Location {
    /// Line value for "file only" references
    pub const UNKNOWN_LINE: i64 = -1;

    pub fn new(file: impl Into<String>, line: i64) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }

    /// A reference that only names the file
    pub fn file_only(file: impl Into<String>) -> Self {
        Self::new(file, Self::UNKNOWN_LINE)
    }

    pub fn has_line(&self) -> bool {
        self.line >= 0
    }
}

impl Ord for Location {
    fn cmp(&self, other: &Self) -> Ordering {
        self.file
            .cmp(&other.file)
            .then_with(|| self.line.cmp(&other.line))
    }
}

impl PartialOrd for Location {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_line() {
            write!(f, "{}:{}", self.file, self.line)
        } else {
            f.write_str(&self.file)
        }
    }
}

/// One translated plural form
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PluralEntry {
    /// Plural-form index
    pub id: u32,
    /// Translated text for this form
    pub text: String,
}

impl PluralEntry {
    pub fn new(id: u32, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
        }
    }
}

/// A translatable message
///
/// Entries are plain values: build them with struct literals and
/// `..Default::default()`. Everything derived from the fields (unified id,
/// hash, plural-ness) is recomputed on every call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Source text
    pub id: String,
    /// Disambiguation namespace, empty for none
    #[serde(default)]
    pub context: String,
    /// Source plural text, empty for singular messages
    #[serde(default)]
    pub plural: String,
    /// Singular translation
    #[serde(default)]
    pub translation: String,
    /// Plural translations keyed by form index
    #[serde(default)]
    pub plurals: Vec<PluralEntry>,
    /// Source occurrences in insertion order
    #[serde(default)]
    pub locations: Vec<Location>,
    /// Translator comments
    #[serde(default)]
    pub comments: Vec<String>,
    /// Comments extracted from source code
    #[serde(default)]
    pub extracted_comments: Vec<String>,
    /// Previous ids (`#|` lines)
    #[serde(default)]
    pub previous: Vec<String>,
    /// Flags such as `fuzzy` or `c-format`
    #[serde(default)]
    pub flags: Vec<String>,
    /// Kept for reference only, no longer in the template
    #[serde(default)]
    pub obsolete: bool,
}

impl Entry {
    /// A singular entry with a translation
    pub fn new(id: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            translation: translation.into(),
            ..Default::default()
        }
    }

    /// The identity key: `context EOT id NUL plural`, empty parts omitted
    pub fn unified_id(&self) -> String {
        let mut key = String::with_capacity(
            self.context.len() + self.id.len() + self.plural.len() + 2,
        );
        if self.has_context() {
            key.push_str(&self.context);
            key.push(CONTEXT_SEPARATOR);
        }
        key.push_str(&self.id);
        if !self.plural.is_empty() {
            key.push(PLURAL_SEPARATOR);
            key.push_str(&self.plural);
        }
        key
    }

    /// The singular translation, or all plural forms NUL-joined by form index
    pub fn unified_translation(&self) -> String {
        if self.plurals.is_empty() {
            return self.translation.clone();
        }
        self.sorted_plurals()
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\0")
    }

    /// Lookup hash over `context EOT id` (plural text excluded)
    pub fn hash(&self) -> u32 {
        let prefix = if self.has_context() {
            let h = hash_bytes(0, self.context.as_bytes());
            hash_bytes(h, &[CONTEXT_SEPARATOR as u8])
        } else {
            0
        };
        hash_bytes(prefix, self.id.as_bytes())
    }

    pub fn is_plural(&self) -> bool {
        !self.plural.is_empty() || !self.plurals.is_empty()
    }

    pub fn has_context(&self) -> bool {
        !self.context.is_empty()
    }

    pub fn is_fuzzy(&self) -> bool {
        self.has_flag(FUZZY_FLAG)
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.iter().any(|f| f == flag)
    }

    /// The header entry has neither id nor context
    pub fn is_header(&self) -> bool {
        self.id.is_empty() && self.context.is_empty()
    }

    /// True when any translated text is present
    pub fn is_translated(&self) -> bool {
        !self.translation.is_empty() || self.plurals.iter().any(|p| !p.text.is_empty())
    }

    /// Add a flag unless already present
    pub fn add_flag(&mut self, flag: &str) {
        if !self.has_flag(flag) {
            self.flags.push(flag.to_string());
        }
    }

    pub fn mark_fuzzy(&mut self) {
        self.add_flag(FUZZY_FLAG);
    }

    pub fn unmark_fuzzy(&mut self) {
        self.flags.retain(|f| f != FUZZY_FLAG);
    }

    pub fn first_location(&self) -> Option<&Location> {
        self.locations.first()
    }

    /// Plural forms ordered by form index
    pub fn sorted_plurals(&self) -> Vec<&PluralEntry> {
        let mut plurals: Vec<_> = self.plurals.iter().collect();
        plurals.sort_by_key(|p| p.id);
        plurals
    }

    /// Text of the lowest-indexed plural form
    pub fn first_plural_text(&self) -> Option<&str> {
        self.plurals
            .iter()
            .min_by_key(|p| p.id)
            .map(|p| p.text.as_str())
    }

    /// Check the model invariants
    ///
    /// Returns one error per broken rule; an empty list means the entry can
    /// be encoded.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if !self.translation.is_empty() && !self.plurals.is_empty() {
            errors.push(ValidationError {
                unified_id: self.unified_id(),
                reason: ValidationReason::SingularAndPlural,
            });
        }
        errors
    }
}

/// PJW/ELF rolling hash continued from `hval`
///
/// Same function GNU gettext uses for the MO lookup index; the arithmetic is
/// kept in 32 bits.
pub(crate) fn hash_bytes(mut hval: u32, bytes: &[u8]) -> u32 {
    for &byte in bytes {
        hval = (hval << 4).wrapping_add(u32::from(byte));
        let g = hval & (0xf << 28);
        if g != 0 {
            hval ^= g >> 24;
            hval ^= g;
        }
    }
    hval
}

/// Hash a raw key as stored in an MO id table (stops at the first NUL)
pub fn hash_key(key: &[u8]) -> u32 {
    let end = key.iter().position(|&b| b == 0).unwrap_or(key.len());
    hash_bytes(0, &key[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unified_id_parts() {
        let plain = Entry::new("Open", "");
        assert_eq!(plain.unified_id(), "Open");

        let with_ctx = Entry {
            id: "Open".into(),
            context: "menu".into(),
            ..Default::default()
        };
        assert_eq!(with_ctx.unified_id(), "menu\u{4}Open");

        let plural = Entry {
            id: "file".into(),
            plural: "files".into(),
            context: "disk".into(),
            ..Default::default()
        };
        assert_eq!(plural.unified_id(), "disk\u{4}file\0files");
    }

    #[test]
    fn test_unified_translation_orders_plurals() {
        let entry = Entry {
            id: "apple".into(),
            plurals: vec![PluralEntry::new(1, "manzanas"), PluralEntry::new(0, "manzana")],
            ..Default::default()
        };
        assert_eq!(entry.unified_translation(), "manzana\0manzanas");
        assert_eq!(entry.first_plural_text(), Some("manzana"));
    }

    #[test]
    fn test_hash_ignores_plural() {
        let singular = Entry::new("file", "");
        let plural = Entry {
            id: "file".into(),
            plural: "files".into(),
            ..Default::default()
        };
        assert_eq!(singular.hash(), plural.hash());
        assert_eq!(singular.hash(), hash_key(b"file"));
    }

    #[test]
    fn test_hash_includes_context() {
        let entry = Entry {
            id: "Open".into(),
            context: "menu".into(),
            ..Default::default()
        };
        assert_eq!(entry.hash(), hash_key(b"menu\x04Open"));
        assert_ne!(entry.hash(), Entry::new("Open", "").hash());
    }

    #[test]
    fn test_pjw_known_values() {
        assert_eq!(hash_key(b""), 0);
        assert_eq!(hash_key(b"a"), 0x61);
        assert_eq!(hash_key(b"ab"), 0x61 * 16 + 0x62);
        // Long keys fold the high nibble back in and never set bits 28..31
        assert_eq!(hash_key(b"abcdefghijklmnop") & 0xf000_0000, 0);
    }

    #[test]
    fn test_validate_singular_and_plural() {
        let mut entry = Entry::new("apple", "manzana");
        assert!(entry.validate().is_empty());

        entry.plurals.push(PluralEntry::new(0, "manzana"));
        let errors = entry.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].reason, ValidationReason::SingularAndPlural);
    }

    #[test]
    fn test_fuzzy_flag() {
        let mut entry = Entry::new("a", "b");
        assert!(!entry.is_fuzzy());
        entry.mark_fuzzy();
        entry.mark_fuzzy();
        assert_eq!(entry.flags, vec!["fuzzy".to_string()]);
        entry.unmark_fuzzy();
        assert!(entry.flags.is_empty());
    }

    #[test]
    fn test_location_order() {
        let mut locs = vec![
            Location::new("b.rs", 1),
            Location::new("a.rs", 10),
            Location::file_only("a.rs"),
            Location::new("a.rs", 2),
        ];
        locs.sort();
        assert_eq!(locs[0], Location::file_only("a.rs"));
        assert_eq!(locs[1], Location::new("a.rs", 2));
        assert_eq!(locs[3].to_string(), "b.rs:1");
        assert_eq!(locs[0].to_string(), "a.rs");
    }
}
