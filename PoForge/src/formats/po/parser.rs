//! Assemble PO tokens into entries
//!
//! The normalizer walks the token stream once. An entry is complete when the
//! next token can only start a new one: a comment, `msgctxt` or `msgid`
//! after the current entry already has its `msgid`.

use std::fs;
use std::path::Path;

use super::lexer::{Token, TokenKind, syntax, tokenize};
use crate::catalog::{Catalog, Entry, Location, PluralEntry};
use crate::error::Result;

/// Read and parse a PO file; the path becomes the catalog name
///
/// # Errors
/// Returns an error if the file cannot be read or is not valid PO.
pub fn read_po<P: AsRef<Path>>(path: P) -> Result<Catalog> {
    let path = path.as_ref();
    let data = fs::read(path)?;
    parse_po(&data, &path.to_string_lossy())
}

/// Parse PO bytes into a catalog named `name`
///
/// Invalid UTF-8 is replaced (with a warning) rather than rejected.
///
/// # Errors
/// Returns [`Error::PoSyntax`](crate::Error::PoSyntax) with the line of the
/// first problem.
pub fn parse_po(data: &[u8], name: &str) -> Result<Catalog> {
    let source = String::from_utf8_lossy(data);
    if matches!(source, std::borrow::Cow::Owned(_)) {
        tracing::warn!("{}: invalid UTF-8 replaced", name);
    }
    let tokens = tokenize(&source, name)?;
    let entries = Normalizer::new(name).run(tokens)?;
    tracing::debug!("Parsed {} entries from {}", entries.len(), name);
    Ok(Catalog::with_entries(name, entries))
}

/// Which field the next string token continues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    None,
    Context,
    Id,
    Plural,
    Translation,
    PluralForm(usize),
}

struct Normalizer<'a> {
    name: &'a str,
    entries: Vec<Entry>,
    current: Entry,
    target: Target,
    has_context: bool,
    has_id: bool,
    has_translation: bool,
    start_line: usize,
}

impl<'a> Normalizer<'a> {
    fn new(name: &'a str) -> Self {
        Self {
            name,
            entries: Vec::new(),
            current: Entry::default(),
            target: Target::None,
            has_context: false,
            has_id: false,
            has_translation: false,
            start_line: 0,
        }
    }

    fn run(mut self, tokens: Vec<Token>) -> Result<Vec<Entry>> {
        for token in tokens {
            self.accept(token)?;
        }
        if self.has_id || self.has_context {
            self.finish()?;
        } else if self.start_line != 0 {
            tracing::warn!("{}:{}: trailing comments ignored", self.name, self.start_line);
        }
        Ok(self.entries)
    }

    fn accept(&mut self, token: Token) -> Result<()> {
        let line = token.line;
        let obsolete = token.obsolete;

        match token.kind {
            TokenKind::Comment(text) => {
                self.start_comment(line)?;
                self.current.comments.push(text);
            }
            TokenKind::ExtractedComment(text) => {
                self.start_comment(line)?;
                self.current.extracted_comments.push(text);
            }
            TokenKind::Reference(text) => {
                self.start_comment(line)?;
                self.current
                    .locations
                    .extend(text.split_whitespace().map(parse_location));
            }
            TokenKind::Flags(text) => {
                self.start_comment(line)?;
                for flag in text.split(',').map(str::trim).filter(|f| !f.is_empty()) {
                    self.current.add_flag(flag);
                }
            }
            TokenKind::Previous(text) => {
                self.start_comment(line)?;
                self.current.previous.push(text);
            }
            TokenKind::Msgctxt => {
                if self.has_id || self.has_context {
                    self.finish()?;
                }
                self.mark_start(line);
                self.has_context = true;
                self.target = Target::Context;
            }
            TokenKind::Msgid => {
                if self.has_id {
                    self.finish()?;
                }
                self.mark_start(line);
                self.has_id = true;
                self.target = Target::Id;
            }
            TokenKind::MsgidPlural => {
                if !self.has_id || self.has_translation {
                    return Err(syntax(self.name, line, "'msgid_plural' must follow 'msgid'"));
                }
                self.target = Target::Plural;
            }
            TokenKind::Msgstr(index) => {
                if !self.has_id {
                    return Err(syntax(self.name, line, "'msgstr' without 'msgid'"));
                }
                self.has_translation = true;
                self.target = match index {
                    None => Target::Translation,
                    Some(n) => {
                        self.current.plurals.push(PluralEntry::new(n, ""));
                        Target::PluralForm(self.current.plurals.len() - 1)
                    }
                };
            }
            TokenKind::Str(value) => {
                let field = match self.target {
                    Target::None => {
                        return Err(syntax(self.name, line, "string without a keyword"));
                    }
                    Target::Context => &mut self.current.context,
                    Target::Id => &mut self.current.id,
                    Target::Plural => &mut self.current.plural,
                    Target::Translation => &mut self.current.translation,
                    Target::PluralForm(i) => &mut self.current.plurals[i].text,
                };
                field.push_str(&value);
            }
        }

        // The token may have closed the previous entry above
        if obsolete {
            self.current.obsolete = true;
        }
        Ok(())
    }

    /// A comment closes a complete entry and opens the next one
    fn start_comment(&mut self, line: usize) -> Result<()> {
        if self.has_id || self.has_context {
            self.finish()?;
        }
        self.target = Target::None;
        self.mark_start(line);
        Ok(())
    }

    fn mark_start(&mut self, line: usize) {
        if self.start_line == 0 {
            self.start_line = line;
        }
    }

    fn finish(&mut self) -> Result<()> {
        if !self.has_id {
            return Err(syntax(self.name, self.start_line, "entry without 'msgid'"));
        }
        if !self.has_translation {
            return Err(syntax(self.name, self.start_line, "entry without 'msgstr'"));
        }

        let entry = std::mem::take(&mut self.current);
        self.entries.push(entry);
        self.target = Target::None;
        self.has_context = false;
        self.has_id = false;
        self.has_translation = false;
        self.start_line = 0;
        Ok(())
    }
}

/// `file:line` -> Location; anything without a numeric suffix is file-only
fn parse_location(reference: &str) -> Location {
    match reference.rsplit_once(':') {
        Some((file, line)) if !file.is_empty() => match line.parse() {
            Ok(line) => Location::new(file, line),
            Err(_) => Location::file_only(reference),
        },
        _ => Location::file_only(reference),
    }
}
