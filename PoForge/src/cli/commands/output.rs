//! Shared output helpers

use std::fs;
use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::formats::{EncodeOptions, HashTableSize, PoWriteOptions};

use super::{MoArgs, PoArgs};

/// Write bytes to `path`, or to stdout when `path` is `-`
pub fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    if path.as_os_str() == "-" {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(bytes)?;
        stdout.flush()?;
    } else {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, bytes)?;
    }
    Ok(())
}

pub fn is_stdout(path: &Path) -> bool {
    path.as_os_str() == "-"
}

impl MoArgs {
    pub fn encode_options(&self) -> EncodeOptions {
        let hash_table = match (self.no_hash, self.hash_size) {
            (true, _) => HashTableSize::None,
            (false, Some(size)) => HashTableSize::Fixed(size),
            (false, None) => HashTableSize::Auto,
        };
        EncodeOptions::new()
            .with_byte_order(self.endian.into())
            .with_hash_table(hash_table)
            .with_ignore_errors(self.ignore_errors)
            .with_skip_untranslated(self.skip_untranslated)
    }
}

impl PoArgs {
    /// Printer options; fails on contradicting location flags
    pub fn write_options(&self) -> Result<PoWriteOptions> {
        let options = PoWriteOptions::from_location_flags(
            self.no_location,
            self.add_location.map(Into::into),
        )?;
        Ok(options.with_wrap_width(self.width))
    }
}
