//! Error types for `PoForge`

use std::fmt;

use thiserror::Error;

/// The error type for `PoForge` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ==================== MO Format Errors ====================
    /// The data is not a binary catalog (neither byte order of the magic matched).
    #[error("invalid MO magic: 0x{0:08x}")]
    InvalidMoMagic(u32),

    /// The buffer ended before a complete structure could be read.
    #[error("truncated MO data: needed {needed} bytes at offset {offset}, buffer has {len}")]
    TruncatedMo {
        /// Offset where the read started.
        offset: usize,
        /// Number of bytes required.
        needed: usize,
        /// Total buffer length.
        len: usize,
    },

    /// A string table entry points outside the buffer.
    #[error("string {index} out of range: offset {offset} + length {length} exceeds {len} bytes")]
    MoOffsetOutOfRange {
        /// Index of the entry in the string table.
        index: usize,
        /// Declared offset.
        offset: u32,
        /// Declared length.
        length: u32,
        /// Total buffer length.
        len: usize,
    },

    /// The catalog does not fit in the 32-bit offsets of the format.
    #[error("catalog too large for MO format: {size} bytes")]
    MoTooLarge {
        /// The size that overflowed.
        size: usize,
    },

    // ==================== Entry Errors ====================
    /// An entry breaks a model invariant.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    // ==================== Configuration Errors ====================
    /// Incompatible options were requested.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    // ==================== PO Parsing Errors ====================
    /// The PO text could not be parsed.
    #[error("{name}:{line}: {message}")]
    PoSyntax {
        /// Source name of the catalog.
        name: String,
        /// 1-based line number.
        line: usize,
        /// What went wrong.
        message: String,
    },
}

/// An entry that violates the singular/plural exclusivity rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Unified id of the offending entry (separators shown escaped).
    pub unified_id: String,
    /// What is wrong with it.
    pub reason: ValidationReason,
}

/// Reasons an entry can fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationReason {
    /// Both `translation` and `plurals` are populated.
    SingularAndPlural,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = self.unified_id.replace('\u{4}', "\\x04").replace('\0', "\\0");
        match self.reason {
            ValidationReason::SingularAndPlural => write!(
                f,
                "entry \"{id}\" has both a singular translation and plural forms"
            ),
        }
    }
}

impl std::error::Error for ValidationError {}

/// A specialized Result type for `PoForge` operations.
pub type Result<T> = std::result::Result<T, Error>;
