//! Batch compile command

use std::path::Path;
use std::time::Instant;

use indicatif::ProgressBar;

use crate::batch::{batch_compile, find_po_files};
use crate::cli::progress::{LOOKING_GLASS, TRUCK, bar_style, print_done, print_step};

use super::MoArgs;

pub fn execute(source: &Path, destination: &Path, mo: &MoArgs, quiet: bool) -> anyhow::Result<()> {
    let start = Instant::now();
    let options = mo.encode_options();

    print_step(1, 2, LOOKING_GLASS, &format!("Scanning {}...", source.display()));
    let files = find_po_files(source);
    if files.is_empty() {
        println!("No PO files found in: {}", source.display());
        return Ok(());
    }

    print_step(2, 2, TRUCK, &format!("Compiling {} catalogs...", files.len()));
    let pb = if quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(files.len() as u64)
    };
    pb.set_style(bar_style());

    let result = batch_compile(&files, source, destination, &options, |progress| {
        pb.set_position(progress.current as u64);
        pb.set_message(progress.current_file.clone());
    });
    pb.finish_and_clear();

    println!();
    println!("Compilation complete:");
    println!("  Success: {}", result.success_count);
    println!("  Failed: {}", result.fail_count);

    if result.has_failures() {
        println!();
        println!("Failures:");
        for msg in result.results.iter().filter(|m| m.starts_with("Failed")) {
            println!("  {msg}");
        }
        anyhow::bail!("{} of {} catalogs failed", result.fail_count, files.len());
    }

    print_done(start.elapsed());
    Ok(())
}
