//! MO to PO decompilation

use std::path::Path;

use crate::collate::{SortMode, sort_entries};
use crate::formats::{DecodeOptions, format_po, read_mo};

use super::PoArgs;
use super::output::write_output;

pub fn execute(source: &Path, output: &Path, ignore_errors: bool, po: &PoArgs) -> anyhow::Result<()> {
    let write_options = po.write_options()?;
    let options = DecodeOptions::new().with_ignore_errors(ignore_errors);

    let mut decoded = read_mo(source, &options)?;
    for error in &decoded.errors {
        tracing::warn!("{}", error);
    }

    sort_entries(&mut decoded.entries, po.sort.map_or(SortMode::None, Into::into));
    write_output(output, format_po(&decoded.entries, &write_options).as_bytes())?;
    Ok(())
}
