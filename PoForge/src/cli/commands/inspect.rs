//! MO inspection as JSON

use std::path::Path;

use crate::formats::{DecodeOptions, MoView, decode};

pub fn execute(
    source: &Path,
    include_entries: bool,
    lookup: Option<&str>,
    context: Option<&str>,
) -> anyhow::Result<()> {
    let data = std::fs::read(source)?;
    let decoded = decode(&data, &DecodeOptions::new().with_ignore_errors(true))?;

    let mut report = serde_json::json!({
        "file": source.display().to_string(),
        "header": decoded.header,
        "revision": format!(
            "{}.{}",
            decoded.header.major_revision(),
            decoded.header.minor_revision()
        ),
        "messages": decoded.entries.len(),
        "warnings": decoded.warnings,
        "errors": decoded.errors.iter().map(ToString::to_string).collect::<Vec<_>>(),
    });

    if let Some(id) = lookup {
        let view = MoView::new(&data)?;
        report["lookup"] = serde_json::to_value(view.lookup(context.unwrap_or_default(), id))?;
    }
    if include_entries {
        report["entries"] = serde_json::to_value(&decoded.entries)?;
    }

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
