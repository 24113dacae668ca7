use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::collate::SortMode;
use crate::formats::{Endian, LocationMode};

pub mod batch;
pub mod compile;
pub mod concat;
pub mod decompile;
mod execute;
pub mod inspect;
pub mod merge;
pub mod output;

/// Byte order of a written MO file
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum EndianArg {
    Native,
    Little,
    Big,
}

impl From<EndianArg> for Endian {
    fn from(arg: EndianArg) -> Self {
        match arg {
            EndianArg::Native => Endian::Native,
            EndianArg::Little => Endian::Little,
            EndianArg::Big => Endian::Big,
        }
    }
}

/// Output ordering
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortArg {
    /// Live, reviewed messages first, then by location and id
    Canonical,
    /// By message id
    Id,
    /// By source file, then id
    File,
    /// Keep input order
    None,
}

impl From<SortArg> for SortMode {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Canonical => SortMode::Canonical,
            SortArg::Id => SortMode::ById,
            SortArg::File => SortMode::ByFile,
            SortArg::None => SortMode::None,
        }
    }
}

/// Form of `#:` reference comments
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LocationArg {
    Full,
    File,
    Never,
}

impl From<LocationArg> for LocationMode {
    fn from(arg: LocationArg) -> Self {
        match arg {
            LocationArg::Full => LocationMode::Full,
            LocationArg::File => LocationMode::File,
            LocationArg::Never => LocationMode::Never,
        }
    }
}

/// MO writing flags shared by `compile` and `batch`
#[derive(Debug, Clone, Args)]
pub struct MoArgs {
    /// Byte order of the output
    #[arg(long, value_enum, default_value = "native")]
    pub endian: EndianArg,

    /// Do not write the hash lookup table
    #[arg(long)]
    pub no_hash: bool,

    /// Hash table size (rounded up to a prime)
    #[arg(long, conflicts_with = "no_hash")]
    pub hash_size: Option<u32>,

    /// Skip invalid messages instead of failing
    #[arg(long)]
    pub ignore_errors: bool,

    /// Leave out messages without a translation
    #[arg(long)]
    pub skip_untranslated: bool,
}

/// PO printing flags shared by every command writing PO text
#[derive(Debug, Clone, Args)]
pub struct PoArgs {
    /// Line width for wrapping (0 disables wrapping)
    #[arg(short, long, default_value_t = crate::formats::po::DEFAULT_WRAP_WIDTH)]
    pub width: usize,

    /// Do not write `#:` reference comments
    #[arg(long)]
    pub no_location: bool,

    /// Reference comment form
    #[arg(long, value_enum, num_args = 0..=1, default_missing_value = "full")]
    pub add_location: Option<LocationArg>,

    /// Output ordering
    #[arg(long, value_enum)]
    pub sort: Option<SortArg>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compile a PO file to MO
    Compile {
        /// Source PO file
        source: PathBuf,

        /// Output MO file (`-` for stdout)
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        mo: MoArgs,
    },

    /// Decompile an MO file to PO
    Decompile {
        /// Source MO file
        source: PathBuf,

        /// Output PO file (`-` for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Skip unreadable messages instead of failing
        #[arg(long)]
        ignore_errors: bool,

        #[command(flatten)]
        po: PoArgs,
    },

    /// Update a translated catalog from a new template
    Merge {
        /// Translated PO file
        def: PathBuf,

        /// Template (POT) file
        reference: PathBuf,

        /// Output PO file (`-` for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Do not pair changed messages by similarity
        #[arg(short = 'N', long)]
        no_fuzzy_matching: bool,

        /// Keep previous ids of fuzzy messages
        #[arg(long)]
        previous: bool,

        /// Minimum similarity (0-100) for a fuzzy pairing
        #[arg(long, default_value_t = crate::collate::MERGE_THRESHOLD)]
        threshold: u8,

        /// Stop fuzzy matching after this many seconds
        #[arg(long)]
        timeout: Option<u64>,

        #[command(flatten)]
        po: PoArgs,
    },

    /// Concatenate several catalogs
    Concat {
        /// Input PO files, in priority order
        #[arg(required = true, num_args = 1..)]
        sources: Vec<PathBuf>,

        /// Output PO file (`-` for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Keep messages found in more than this many inputs
        #[arg(long, default_value_t = 0)]
        more_than: usize,

        /// Keep messages found in fewer than this many inputs
        #[arg(long)]
        less_than: Option<usize>,

        /// Keep messages found in exactly one input
        #[arg(short, long, conflicts_with = "less_than")]
        unique: bool,

        /// Take the first input's content for repeated messages
        #[arg(long)]
        use_first: bool,

        /// Do not mark conflicting messages fuzzy
        #[arg(long)]
        no_conflict_fuzzy: bool,

        #[command(flatten)]
        po: PoArgs,
    },

    /// Compile every PO file under a directory
    Batch {
        /// Directory to search for PO files
        source: PathBuf,

        /// Output directory for MO files
        destination: PathBuf,

        #[command(flatten)]
        mo: MoArgs,

        /// Suppress progress bar
        #[arg(short, long)]
        quiet: bool,
    },

    /// Print an MO file's header and messages as JSON
    Inspect {
        /// Source MO file
        source: PathBuf,

        /// Include every message
        #[arg(long)]
        entries: bool,

        /// Look up one message id through the hash table
        #[arg(long)]
        lookup: Option<String>,

        /// Context for --lookup
        #[arg(long, requires = "lookup")]
        context: Option<String>,
    },
}
