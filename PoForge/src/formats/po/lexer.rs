//! Line-oriented PO tokenizer
//!
//! Every non-blank line becomes one comment token, or a keyword token
//! followed by a string token, or a bare continuation string token.

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// `# text`
    Comment(String),
    /// `#. text`
    ExtractedComment(String),
    /// `#: file:line ...`
    Reference(String),
    /// `#, flag, flag`
    Flags(String),
    /// `#| msgid "..."`
    Previous(String),
    Msgctxt,
    Msgid,
    MsgidPlural,
    /// `msgstr` or `msgstr[n]`
    Msgstr(Option<u32>),
    /// A quoted string with escapes decoded
    Str(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// 1-based source line
    pub line: usize,
    /// The line carried the `#~` obsolete marker
    pub obsolete: bool,
}

/// Split PO source text into tokens
///
/// # Errors
/// Returns [`Error::PoSyntax`] for an unknown keyword, a malformed string or
/// an unknown escape sequence.
pub fn tokenize(source: &str, name: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();

    for (index, raw) in source.lines().enumerate() {
        let line = index + 1;
        let mut text = raw.trim();
        if text.is_empty() {
            continue;
        }

        let obsolete = if let Some(rest) = text.strip_prefix("#~") {
            text = rest.trim_start();
            if text.is_empty() {
                continue;
            }
            true
        } else {
            false
        };

        let push = |tokens: &mut Vec<Token>, kind| {
            tokens.push(Token {
                kind,
                line,
                obsolete,
            });
        };

        if obsolete {
            if let Some(previous) = text.strip_prefix('|') {
                push(&mut tokens, TokenKind::Previous(comment_body(previous)));
                continue;
            }
        }

        if let Some(comment) = text.strip_prefix('#') {
            let kind = match comment.chars().next() {
                Some('.') => TokenKind::ExtractedComment(comment_body(&comment[1..])),
                Some(':') => TokenKind::Reference(comment_body(&comment[1..])),
                Some(',') => TokenKind::Flags(comment_body(&comment[1..])),
                Some('|') => TokenKind::Previous(comment_body(&comment[1..])),
                _ => TokenKind::Comment(comment_body(comment)),
            };
            push(&mut tokens, kind);
            continue;
        }

        if text.starts_with('"') {
            let value = parse_string(text, name, line)?;
            push(&mut tokens, TokenKind::Str(value));
            continue;
        }

        let (keyword, rest) = text
            .split_once(|c: char| c.is_whitespace())
            .map(|(k, r)| (k, r.trim_start()))
            .unwrap_or((text, ""));
        let kind = match keyword {
            "msgctxt" => TokenKind::Msgctxt,
            "msgid" => TokenKind::Msgid,
            "msgid_plural" => TokenKind::MsgidPlural,
            "msgstr" => TokenKind::Msgstr(None),
            other => match plural_index(other) {
                Some(n) => TokenKind::Msgstr(Some(n)),
                None => return Err(syntax(name, line, format!("unknown keyword '{other}'"))),
            },
        };
        if !rest.starts_with('"') {
            return Err(syntax(name, line, format!("expected a string after '{keyword}'")));
        }
        let value = parse_string(rest, name, line)?;
        push(&mut tokens, kind);
        push(&mut tokens, TokenKind::Str(value));
    }

    Ok(tokens)
}

/// Comment text without the single space that follows the marker
fn comment_body(text: &str) -> String {
    text.strip_prefix(' ').unwrap_or(text).trim_end().to_string()
}

/// `msgstr[3]` -> 3
fn plural_index(keyword: &str) -> Option<u32> {
    keyword
        .strip_prefix("msgstr[")?
        .strip_suffix(']')?
        .trim()
        .parse()
        .ok()
}

/// Decode one `"..."` literal; only whitespace may follow it
fn parse_string(text: &str, name: &str, line: usize) -> Result<String> {
    let mut chars = text.chars();
    if chars.next() != Some('"') {
        return Err(syntax(name, line, "expected '\"'"));
    }

    let mut value = String::new();
    loop {
        match chars.next() {
            None => return Err(syntax(name, line, "unterminated string")),
            Some('"') => break,
            Some('\\') => value.push(parse_escape(&mut chars, name, line)?),
            Some(c) => value.push(c),
        }
    }

    if !chars.as_str().trim().is_empty() {
        return Err(syntax(name, line, "unexpected text after string"));
    }
    Ok(value)
}

fn parse_escape(chars: &mut std::str::Chars<'_>, name: &str, line: usize) -> Result<char> {
    let c = chars
        .next()
        .ok_or_else(|| syntax(name, line, "unterminated escape sequence"))?;
    let decoded = match c {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        'a' => '\u{7}',
        'b' => '\u{8}',
        'f' => '\u{c}',
        'v' => '\u{b}',
        '\\' | '"' | '\'' | '?' => c,
        '0'..='7' => {
            let mut code = c.to_digit(8).unwrap_or(0);
            for _ in 0..2 {
                match chars.clone().next().and_then(|d| d.to_digit(8)) {
                    Some(d) => {
                        code = code * 8 + d;
                        chars.next();
                    }
                    None => break,
                }
            }
            char::from_u32(code).ok_or_else(|| syntax(name, line, "invalid octal escape"))?
        }
        'x' => {
            let mut code = 0u32;
            let mut digits = 0;
            while let Some(d) = chars.clone().next().and_then(|d| d.to_digit(16)) {
                code = code * 16 + d;
                digits += 1;
                chars.next();
                if digits == 2 {
                    break;
                }
            }
            if digits == 0 {
                return Err(syntax(name, line, "invalid hex escape"));
            }
            char::from_u32(code).ok_or_else(|| syntax(name, line, "invalid hex escape"))?
        }
        other => return Err(syntax(name, line, format!("unknown escape sequence '\\{other}'"))),
    };
    Ok(decoded)
}

pub(crate) fn syntax(name: &str, line: usize, message: impl Into<String>) -> Error {
    Error::PoSyntax {
        name: name.to_string(),
        line,
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source, "test.po")
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_comments() {
        assert_eq!(
            kinds("# hello\n#. extracted\n#: a.rs:1 b.rs\n#, fuzzy\n#| msgid \"old\"\n#\n"),
            vec![
                TokenKind::Comment("hello".into()),
                TokenKind::ExtractedComment("extracted".into()),
                TokenKind::Reference("a.rs:1 b.rs".into()),
                TokenKind::Flags("fuzzy".into()),
                TokenKind::Previous("msgid \"old\"".into()),
                TokenKind::Comment(String::new()),
            ]
        );
    }

    #[test]
    fn test_keywords_and_continuations() {
        assert_eq!(
            kinds("msgid \"\"\n\"a\\n\"\nmsgid_plural \"b\"\nmsgstr[1] \"c\"\nmsgstr \"\"\n"),
            vec![
                TokenKind::Msgid,
                TokenKind::Str(String::new()),
                TokenKind::Str("a\n".into()),
                TokenKind::MsgidPlural,
                TokenKind::Str("b".into()),
                TokenKind::Msgstr(Some(1)),
                TokenKind::Str("c".into()),
                TokenKind::Msgstr(None),
                TokenKind::Str(String::new()),
            ]
        );
    }

    #[test]
    fn test_obsolete_marker() {
        let tokens = tokenize("#~ msgid \"gone\"\n#~ msgstr \"ido\"\n", "t").unwrap();
        assert_eq!(tokens.len(), 4);
        assert!(tokens.iter().all(|t| t.obsolete));
        assert_eq!(tokens[3].line, 2);
    }

    #[test]
    fn test_escapes() {
        assert_eq!(
            kinds(r#""tab\there \"q\" back\\slash \101\x42""#),
            vec![TokenKind::Str("tab\there \"q\" back\\slash AB".into())]
        );
    }

    #[test]
    fn test_errors_carry_line() {
        let err = tokenize("msgid \"ok\"\nmsgfoo \"x\"\n", "bad.po").unwrap_err();
        assert_eq!(err.to_string(), "bad.po:2: unknown keyword 'msgfoo'");
        assert!(tokenize("msgid \"open", "t").is_err());
        assert!(tokenize("msgid \"a\" trailing", "t").is_err());
        assert!(tokenize("msgid \"\\q\"", "t").is_err());
    }
}
