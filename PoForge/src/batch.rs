//! Batch catalog compilation
//!
//! Finds PO files under a directory and compiles them to MO in parallel.
//! Every file is compiled independently; a failure is recorded for that
//! file and the rest carry on.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use walkdir::WalkDir;

use crate::error::Result;
use crate::formats::{EncodeOptions, read_po, write_mo};

/// Progress update sent once per file, before it is compiled
#[derive(Debug, Clone)]
pub struct BatchProgress {
    /// Current item number (1-indexed)
    pub current: usize,
    pub total: usize,
    /// Path of the file, relative to the source directory
    pub current_file: String,
}

/// Result of a batch compile
#[derive(Debug, Clone, Default)]
pub struct BatchCompileResult {
    pub success_count: usize,
    pub fail_count: usize,
    /// One message per processed file, in input order
    pub results: Vec<String>,
}

impl BatchCompileResult {
    pub fn has_failures(&self) -> bool {
        self.fail_count > 0
    }
}

/// Find all `.po` files in a directory recursively, sorted
pub fn find_po_files<P: AsRef<Path>>(dir: P) -> Vec<PathBuf> {
    let mut po_files: Vec<_> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| {
            e.path().is_file()
                && e.path()
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("po"))
        })
        .map(|e| e.path().to_path_buf())
        .collect();

    po_files.sort();
    po_files
}

/// Output path for `po_path`: same relative location under `dest_base`,
/// with an `.mo` extension
pub fn mo_output_path(po_path: &Path, source_base: &Path, dest_base: &Path) -> PathBuf {
    let relative = po_path.strip_prefix(source_base).unwrap_or(po_path);
    dest_base.join(relative).with_extension("mo")
}

/// Compile PO files to MO in parallel
///
/// Each output keeps the file's path relative to `source_base`, placed
/// under `dest_base`.
pub fn batch_compile<F>(
    po_files: &[PathBuf],
    source_base: &Path,
    dest_base: &Path,
    options: &EncodeOptions,
    progress: F,
) -> BatchCompileResult
where
    F: Fn(&BatchProgress) + Send + Sync,
{
    let success_counter = AtomicUsize::new(0);
    let fail_counter = AtomicUsize::new(0);
    let processed = AtomicUsize::new(0);
    let total = po_files.len();

    let results: Vec<String> = po_files
        .par_iter()
        .map(|po_path| {
            let display_path = po_path
                .strip_prefix(source_base)
                .unwrap_or(po_path.as_path())
                .to_string_lossy()
                .to_string();

            let current = processed.fetch_add(1, Ordering::SeqCst) + 1;
            progress(&BatchProgress {
                current,
                total,
                current_file: display_path.clone(),
            });

            let output = mo_output_path(po_path, source_base, dest_base);
            match compile_one(po_path, &output, options) {
                Ok(count) => {
                    success_counter.fetch_add(1, Ordering::SeqCst);
                    format!("Compiled: {display_path} ({count} messages)")
                }
                Err(e) => {
                    fail_counter.fetch_add(1, Ordering::SeqCst);
                    tracing::warn!("Failed to compile {}: {}", display_path, e);
                    format!("Failed {display_path}: {e}")
                }
            }
        })
        .collect();

    BatchCompileResult {
        success_count: success_counter.load(Ordering::SeqCst),
        fail_count: fail_counter.load(Ordering::SeqCst),
        results,
    }
}

fn compile_one(po_path: &Path, output: &Path, options: &EncodeOptions) -> Result<usize> {
    let catalog = read_po(po_path)?;
    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)?;
    }
    write_mo(output, &catalog.entries, options)?;
    Ok(catalog.len())
}
