//! PO pretty-printer

use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::{DEFAULT_NPLURALS, Entry, Header, PluralEntry};
use crate::error::{Error, Result};

/// Default line width, as GNU gettext
pub const DEFAULT_WRAP_WIDTH: usize = 79;

/// How `#:` reference comments are written
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocationMode {
    /// `file:line`
    #[default]
    Full,
    /// `file` only, each file once per entry
    File,
    /// No reference comments
    Never,
}

/// Options for [`format_po`]
#[derive(Debug, Clone)]
pub struct PoWriteOptions {
    /// Maximum line width; 0 disables wrapping
    pub wrap_width: usize,
    pub location_mode: LocationMode,
    /// Forms printed for an untranslated plural; `None` reads the header
    pub nplurals: Option<usize>,
}

impl Default for PoWriteOptions {
    fn default() -> Self {
        Self {
            wrap_width: DEFAULT_WRAP_WIDTH,
            location_mode: LocationMode::Full,
            nplurals: None,
        }
    }
}

impl PoWriteOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_wrap_width(mut self, wrap_width: usize) -> Self {
        self.wrap_width = wrap_width;
        self
    }

    #[must_use]
    pub fn with_location_mode(mut self, location_mode: LocationMode) -> Self {
        self.location_mode = location_mode;
        self
    }

    #[must_use]
    pub fn with_nplurals(mut self, nplurals: usize) -> Self {
        self.nplurals = Some(nplurals);
        self
    }

    /// Build options from the `--no-location` / `--add-location` flag pair
    ///
    /// # Errors
    /// Returns [`Error::Configuration`] when `no_location` is combined with
    /// an explicit `add_location` other than `Never`.
    pub fn from_location_flags(no_location: bool, add_location: Option<LocationMode>) -> Result<Self> {
        let location_mode = match (no_location, add_location) {
            (true, Some(mode)) if mode != LocationMode::Never => {
                return Err(Error::Configuration(format!(
                    "--no-location conflicts with --add-location={}",
                    mode.as_str()
                )));
            }
            (true, _) => LocationMode::Never,
            (false, mode) => mode.unwrap_or_default(),
        };
        Ok(Self::default().with_location_mode(location_mode))
    }
}

impl LocationMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::File => "file",
            Self::Never => "never",
        }
    }
}

/// Write entries to a PO file
///
/// # Errors
/// Returns an error if the file cannot be written.
pub fn write_po<P: AsRef<Path>>(path: P, entries: &[Entry], options: &PoWriteOptions) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(format_po(entries, options).as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Render entries as PO text, header first
///
/// Only the first live header is written.
pub fn format_po(entries: &[Entry], options: &PoWriteOptions) -> String {
    let headers: Vec<&Entry> = entries.iter().filter(|e| e.is_header() && !e.obsolete).collect();
    if headers.len() > 1 {
        tracing::warn!("Dropping {} duplicate header entries", headers.len() - 1);
    }
    let header = headers.first().copied();
    let rest = entries.iter().filter(|e| !e.is_header() || e.obsolete);

    let nplurals = options
        .nplurals
        .or_else(|| header.and_then(|h| Header::from_entry(h).nplurals()))
        .unwrap_or(DEFAULT_NPLURALS)
        .max(1);

    let mut out = String::new();
    for (i, entry) in header.into_iter().chain(rest).enumerate() {
        if i > 0 {
            out.push('\n');
        }
        write_entry(&mut out, entry, options, nplurals);
    }
    out
}

fn write_entry(out: &mut String, entry: &Entry, options: &PoWriteOptions, nplurals: usize) {
    for comment in &entry.comments {
        write_comment(out, "#", comment);
    }
    for comment in &entry.extracted_comments {
        write_comment(out, "#.", comment);
    }
    write_references(out, entry, options);
    if !entry.flags.is_empty() {
        let _ = writeln!(out, "#, {}", entry.flags.join(", "));
    }
    let previous_marker = if entry.obsolete { "#~|" } else { "#|" };
    for previous in &entry.previous {
        write_comment(out, previous_marker, previous);
    }

    let prefix = if entry.obsolete { "#~ " } else { "" };
    let width = options.wrap_width;
    if entry.has_context() {
        write_keyword(out, prefix, "msgctxt", &entry.context, width);
    }
    write_keyword(out, prefix, "msgid", &entry.id, width);
    if !entry.plural.is_empty() {
        write_keyword(out, prefix, "msgid_plural", &entry.plural, width);
    }

    if entry.plurals.is_empty() && !entry.plural.is_empty() {
        for n in 0..nplurals {
            write_keyword(out, prefix, &format!("msgstr[{n}]"), "", width);
        }
    } else if entry.plurals.is_empty() {
        write_keyword(out, prefix, "msgstr", &entry.translation, width);
    } else {
        for PluralEntry { id, text } in entry.sorted_plurals() {
            write_keyword(out, prefix, &format!("msgstr[{id}]"), text, width);
        }
    }
}

fn write_comment(out: &mut String, marker: &str, text: &str) {
    if text.is_empty() {
        let _ = writeln!(out, "{marker}");
    } else {
        let _ = writeln!(out, "{marker} {text}");
    }
}

fn write_references(out: &mut String, entry: &Entry, options: &PoWriteOptions) {
    let refs: Vec<String> = match options.location_mode {
        LocationMode::Never => return,
        LocationMode::Full => entry.locations.iter().map(ToString::to_string).collect(),
        LocationMode::File => {
            let mut files: Vec<String> = Vec::new();
            for loc in &entry.locations {
                if !files.contains(&loc.file) {
                    files.push(loc.file.clone());
                }
            }
            files
        }
    };
    if refs.is_empty() {
        return;
    }

    let mut line = String::from("#:");
    for reference in refs {
        if options.wrap_width > 0
            && line.len() > 2
            && line.len() + 1 + reference.len() > options.wrap_width
        {
            let _ = writeln!(out, "{line}");
            line = String::from("#:");
        }
        line.push(' ');
        line.push_str(&reference);
    }
    let _ = writeln!(out, "{line}");
}

/// `keyword "value"`, switching to the `""` + continuation form when the
/// value spans several lines or does not fit the width
fn write_keyword(out: &mut String, prefix: &str, keyword: &str, value: &str, width: usize) {
    let segments: Vec<String> = value.split_inclusive('\n').map(escape).collect();
    let single = segments.first().map_or("", String::as_str);
    let fits = width == 0 || prefix.len() + keyword.len() + single.len() + 3 <= width;

    if segments.len() <= 1 && fits {
        let _ = writeln!(out, "{prefix}{keyword} \"{single}\"");
        return;
    }

    let _ = writeln!(out, "{prefix}{keyword} \"\"");
    let room = width.saturating_sub(prefix.len() + 2);
    for segment in &segments {
        for line in wrap(segment, room) {
            let _ = writeln!(out, "{prefix}\"{line}\"");
        }
    }
}

/// Greedy word wrap after spaces; `room == 0` means unlimited
fn wrap(text: &str, room: usize) -> Vec<&str> {
    if room == 0 || text.len() <= room {
        return vec![text];
    }

    let mut lines = Vec::new();
    let mut start = 0;
    let mut end = 0;
    for word in text.split_inclusive(' ') {
        let word_end = end + word.len();
        if word_end - start > room && end > start {
            lines.push(&text[start..end]);
            start = end;
        }
        end = word_end;
    }
    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            '\r' => escaped.push_str("\\r"),
            '\u{7}' => escaped.push_str("\\a"),
            '\u{8}' => escaped.push_str("\\b"),
            '\u{b}' => escaped.push_str("\\v"),
            '\u{c}' => escaped.push_str("\\f"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Location;
    use crate::formats::po::parse_po;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_simple_entry() {
        let mut entry = Entry::new("Hello", "Hola");
        entry.locations.push(Location::new("main.rs", 3));
        entry.mark_fuzzy();
        let text = format_po(&[entry], &PoWriteOptions::default());
        assert_eq!(text, "#: main.rs:3\n#, fuzzy\nmsgid \"Hello\"\nmsgstr \"Hola\"\n");
    }

    #[test]
    fn test_header_goes_first() {
        let mut header = Header::new();
        header.set("Language", "es");
        let entries = vec![Entry::new("a", "b"), header.to_entry()];
        let text = format_po(&entries, &PoWriteOptions::default());
        assert!(text.starts_with("msgid \"\"\nmsgstr \"Language: es\\n\"\n\nmsgid \"a\""));
    }

    #[test]
    fn test_multiline_and_wrap() {
        let entry = Entry::new("first line\nsecond line", "");
        let text = format_po(&[entry], &PoWriteOptions::default());
        assert_eq!(
            text,
            "msgid \"\"\n\"first line\\n\"\n\"second line\"\nmsgstr \"\"\n"
        );

        let long = Entry::new("aaaa bbbb cccc dddd", "");
        let text = format_po(&[long], &PoWriteOptions::new().with_wrap_width(14));
        assert_eq!(
            text,
            "msgid \"\"\n\"aaaa bbbb \"\n\"cccc dddd\"\nmsgstr \"\"\n"
        );
    }

    #[test]
    fn test_location_modes() {
        let mut entry = Entry::new("x", "");
        entry.locations = vec![
            Location::new("a.rs", 1),
            Location::new("a.rs", 9),
            Location::file_only("b.rs"),
        ];
        let full = format_po(&[entry.clone()], &PoWriteOptions::default());
        assert!(full.starts_with("#: a.rs:1 a.rs:9 b.rs\n"));

        let file = PoWriteOptions::new().with_location_mode(LocationMode::File);
        assert!(format_po(&[entry.clone()], &file).starts_with("#: a.rs b.rs\n"));

        let never = PoWriteOptions::new().with_location_mode(LocationMode::Never);
        assert!(format_po(&[entry], &never).starts_with("msgid"));
    }

    #[test]
    fn test_location_flag_conflict() {
        assert!(matches!(
            PoWriteOptions::from_location_flags(true, Some(LocationMode::Full)),
            Err(Error::Configuration(_))
        ));
        let options = PoWriteOptions::from_location_flags(true, None).unwrap();
        assert_eq!(options.location_mode, LocationMode::Never);
        let options = PoWriteOptions::from_location_flags(false, Some(LocationMode::File)).unwrap();
        assert_eq!(options.location_mode, LocationMode::File);
    }

    #[test]
    fn test_obsolete_and_plural_output() {
        let obsolete = Entry {
            obsolete: true,
            ..Entry::new("old", "viejo")
        };
        let plural = Entry {
            id: "file".into(),
            plural: "files".into(),
            plurals: vec![PluralEntry::new(1, "archivos"), PluralEntry::new(0, "archivo")],
            ..Default::default()
        };
        let text = format_po(&[plural, obsolete], &PoWriteOptions::default());
        assert_eq!(
            text,
            "msgid \"file\"\nmsgid_plural \"files\"\nmsgstr[0] \"archivo\"\nmsgstr[1] \"archivos\"\n\n\
             #~ msgid \"old\"\n#~ msgstr \"viejo\"\n"
        );
    }

    #[test]
    fn test_untranslated_plural_follows_arity() {
        let plural = Entry {
            id: "day".into(),
            plural: "days".into(),
            ..Default::default()
        };
        let text = format_po(std::slice::from_ref(&plural), &PoWriteOptions::default());
        assert_eq!(text.matches("msgstr[").count(), 2);

        let mut header = Header::new();
        header.set("Plural-Forms", "nplurals=3; plural=(n==1 ? 0 : n<5 ? 1 : 2);");
        let entries = vec![header.to_entry(), plural.clone()];
        let text = format_po(&entries, &PoWriteOptions::default());
        assert!(text.ends_with("msgstr[0] \"\"\nmsgstr[1] \"\"\nmsgstr[2] \"\"\n"));

        let text = format_po(&[plural], &PoWriteOptions::new().with_nplurals(1));
        assert!(text.ends_with("msgid_plural \"days\"\nmsgstr[0] \"\"\n"));
    }

    #[test]
    fn test_only_first_header_written() {
        let entries = vec![
            Entry::new("", "Language: es\n"),
            Entry::new("a", "b"),
            Entry::new("", "Language: fr\n"),
        ];
        let text = format_po(&entries, &PoWriteOptions::default());
        assert_eq!(text.matches("msgid \"\"").count(), 1);
        assert!(text.contains("Language: es"));
        assert!(!text.contains("Language: fr"));
    }

    #[test]
    fn test_print_then_parse() {
        let mut entry = Entry::new("say \"hi\"\tnow", "di \"hola\"\\");
        entry.context = "ctx".into();
        entry.comments.push("note".into());
        entry.locations.push(Location::new("a.rs", 2));
        let text = format_po(std::slice::from_ref(&entry), &PoWriteOptions::default());
        let parsed = parse_po(text.as_bytes(), "t.po").unwrap();
        assert_eq!(parsed.entries, vec![entry]);
    }
}
