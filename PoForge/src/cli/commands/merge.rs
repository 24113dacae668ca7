//! Template merge command

use std::path::Path;
use std::time::{Duration, Instant};

use crate::collate::SortMode;
use crate::formats::{format_po, read_po};
use crate::merge::{TemplateMergeOptions, merge_catalogs};

use super::PoArgs;
use super::output::{is_stdout, write_output};

/// Merge behaviour flags from the command line
pub struct MergeFlags {
    pub fuzzy_matching: bool,
    pub previous: bool,
    pub threshold: u8,
    pub timeout: Option<u64>,
}

pub fn execute(
    def: &Path,
    reference: &Path,
    output: &Path,
    flags: &MergeFlags,
    po: &PoArgs,
) -> anyhow::Result<()> {
    let write_options = po.write_options()?;

    let mut options = TemplateMergeOptions::new()
        .with_fuzzy_matching(flags.fuzzy_matching)
        .with_keep_previous(flags.previous)
        .with_threshold(flags.threshold)
        .with_sort(po.sort.map_or(SortMode::Canonical, Into::into));
    if let Some(secs) = flags.timeout {
        options = options.with_deadline(Instant::now() + Duration::from_secs(secs));
    }

    let translated = read_po(def)?;
    let template = read_po(reference)?;
    let merged = merge_catalogs(&translated, &template, &options);

    write_output(output, format_po(&merged.entries, &write_options).as_bytes())?;

    if !is_stdout(output) {
        let fuzzy = merged.entries.iter().filter(|e| e.is_fuzzy()).count();
        let obsolete = merged.entries.iter().filter(|e| e.obsolete).count();
        println!(
            "{} messages, {fuzzy} fuzzy, {obsolete} obsolete",
            merged.len()
        );
    }
    Ok(())
}
