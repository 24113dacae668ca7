//! Concatenation command

use std::path::{Path, PathBuf};

use crate::collate::SortMode;
use crate::formats::{format_po, read_po};
use crate::merge::{ConcatOptions, concatenate};

use super::PoArgs;
use super::output::write_output;

/// Concatenation flags from the command line
pub struct ConcatFlags {
    pub more_than: usize,
    pub less_than: Option<usize>,
    pub use_first: bool,
    pub conflict_fuzzy: bool,
}

pub fn execute(
    sources: &[PathBuf],
    output: &Path,
    flags: &ConcatFlags,
    po: &PoArgs,
) -> anyhow::Result<()> {
    let write_options = po.write_options()?;

    let options = ConcatOptions::new()
        .with_more_than(flags.more_than)
        .with_less_than(flags.less_than.unwrap_or(usize::MAX))
        .with_use_first(flags.use_first)
        .with_mark_conflicts_fuzzy(flags.conflict_fuzzy)
        .with_sort(po.sort.map_or(SortMode::None, Into::into));

    let catalogs = sources
        .iter()
        .map(read_po)
        .collect::<crate::Result<Vec<_>>>()?;
    let entries = concatenate(&catalogs, &options);

    write_output(output, format_po(&entries, &write_options).as_bytes())?;
    Ok(())
}
