//! Catalog header (the entry with an empty id)

use indexmap::IndexMap;

use super::Entry;

/// Plural-rule arity assumed when no header declares one
pub const DEFAULT_NPLURALS: usize = 2;

/// Parsed `Key: Value` metadata of a catalog
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header {
    /// Fields in their original order
    pub fields: IndexMap<String, String>,
}

impl Header {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the translation body of a header entry
    ///
    /// Lines without a `:` are ignored; later duplicates overwrite earlier
    /// values but keep the first position.
    pub fn parse(body: &str) -> Self {
        let mut fields = IndexMap::new();
        for line in body.lines() {
            if let Some((key, value)) = line.split_once(':') {
                let key = key.trim();
                if key.is_empty() {
                    continue;
                }
                fields.insert(key.to_string(), value.trim().to_string());
            }
        }
        Self { fields }
    }

    pub fn from_entry(entry: &Entry) -> Self {
        Self::parse(&entry.translation)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Render back to the `Key: Value\n` body
    pub fn to_body(&self) -> String {
        self.fields
            .iter()
            .map(|(k, v)| format!("{k}: {v}\n"))
            .collect()
    }

    pub fn to_entry(&self) -> Entry {
        Entry {
            translation: self.to_body(),
            ..Default::default()
        }
    }

    /// Number of plural forms from `Plural-Forms: nplurals=N; ...`
    pub fn nplurals(&self) -> Option<usize> {
        let forms = self.get("Plural-Forms")?;
        forms
            .split(';')
            .filter_map(|part| part.split_once('='))
            .find(|(k, _)| k.trim() == "nplurals")
            .and_then(|(_, v)| v.trim().parse().ok())
    }

    /// Charset from `Content-Type: text/plain; charset=...`
    pub fn charset(&self) -> Option<&str> {
        let content_type = self.get("Content-Type")?;
        content_type
            .split(';')
            .filter_map(|part| part.split_once('='))
            .find(|(k, _)| k.trim().eq_ignore_ascii_case("charset"))
            .map(|(_, v)| v.trim())
    }

    pub fn language(&self) -> Option<&str> {
        self.get("Language").filter(|l| !l.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = "Project-Id-Version: demo 1.0\n\
                        Language: es\n\
                        Content-Type: text/plain; charset=UTF-8\n\
                        Plural-Forms: nplurals=3; plural=(n==1 ? 0 : n==2 ? 1 : 2);\n";

    #[test]
    fn test_parse_fields() {
        let header = Header::parse(BODY);
        assert_eq!(header.fields.len(), 4);
        assert_eq!(header.get("Project-Id-Version"), Some("demo 1.0"));
        assert_eq!(header.language(), Some("es"));
        assert_eq!(header.charset(), Some("UTF-8"));
        assert_eq!(header.nplurals(), Some(3));
    }

    #[test]
    fn test_missing_plural_forms() {
        let header = Header::parse("Language: de\n");
        assert_eq!(header.nplurals(), None);
        assert_eq!(header.charset(), None);
    }

    #[test]
    fn test_round_trip_body() {
        let header = Header::parse(BODY);
        let entry = header.to_entry();
        assert!(entry.is_header());
        assert_eq!(Header::from_entry(&entry), header);
    }
}
