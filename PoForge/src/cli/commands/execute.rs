//! Command execution implementations

use super::Commands;
use super::{batch, compile, concat, decompile, inspect, merge};

impl Commands {
    /// Execute the selected command.
    ///
    /// # Errors
    /// Returns an error if the underlying command fails.
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            Commands::Compile { source, output, mo } => compile::execute(source, output, mo),
            Commands::Decompile {
                source,
                output,
                ignore_errors,
                po,
            } => decompile::execute(source, output, *ignore_errors, po),
            Commands::Merge {
                def,
                reference,
                output,
                no_fuzzy_matching,
                previous,
                threshold,
                timeout,
                po,
            } => merge::execute(
                def,
                reference,
                output,
                &merge::MergeFlags {
                    fuzzy_matching: !*no_fuzzy_matching,
                    previous: *previous,
                    threshold: *threshold,
                    timeout: *timeout,
                },
                po,
            ),
            Commands::Concat {
                sources,
                output,
                more_than,
                less_than,
                unique,
                use_first,
                no_conflict_fuzzy,
                po,
            } => concat::execute(
                sources,
                output,
                &concat::ConcatFlags {
                    more_than: *more_than,
                    less_than: if *unique { Some(2) } else { *less_than },
                    use_first: *use_first,
                    conflict_fuzzy: !*no_conflict_fuzzy,
                },
                po,
            ),
            Commands::Batch {
                source,
                destination,
                mo,
                quiet,
            } => batch::execute(source, destination, mo, *quiet),
            Commands::Inspect {
                source,
                entries,
                lookup,
                context,
            } => inspect::execute(source, *entries, lookup.as_deref(), context.as_deref()),
        }
    }
}
