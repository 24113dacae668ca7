//! PO to MO compilation

use std::path::Path;
use std::time::Instant;

use crate::cli::progress::{DISK, LOOKING_GLASS, print_done, print_step};
use crate::formats::{encode_prepared, prepare_entries, read_po};

use super::MoArgs;
use super::output::{is_stdout, write_output};

pub fn execute(source: &Path, output: &Path, mo: &MoArgs) -> anyhow::Result<()> {
    let start = Instant::now();
    let quiet = is_stdout(output);
    let options = mo.encode_options();

    if !quiet {
        print_step(1, 2, LOOKING_GLASS, &format!("Reading {}...", source.display()));
    }
    let catalog = read_po(source)?;
    let prepared = prepare_entries(&catalog.entries, &options)?;
    let bytes = encode_prepared(&prepared, &options)?;

    if !quiet {
        print_step(2, 2, DISK, &format!("Writing {}...", output.display()));
    }
    write_output(output, &bytes)?;

    if !quiet {
        println!(
            "{} of {} messages compiled ({} bytes)",
            prepared.len(),
            catalog.len(),
            bytes.len()
        );
        print_done(start.elapsed());
    }
    Ok(())
}
