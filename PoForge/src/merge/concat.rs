//! Combine several catalogs into one

use indexmap::IndexMap;

use crate::catalog::{Catalog, Entry, PluralEntry};
use crate::collate::{solve, sort_entries};

use super::types::ConcatOptions;

/// Prefix of the line that labels each source of a conflicting value
pub const SOURCE_MARKER: &str = "#-#-#-#-#";

/// Where a message landed in the output and how often it was seen
struct Occurrence {
    index: usize,
    first_name: String,
    count: usize,
}

/// Concatenate catalogs into a new catalog named `name`
pub fn concatenate_catalogs(name: &str, catalogs: &[Catalog], options: &ConcatOptions) -> Catalog {
    Catalog::with_entries(name, concatenate(catalogs, options))
}

/// Concatenate catalogs in order
///
/// Each message appears once, at the position of its first occurrence.
/// Later occurrences are folded into it unless `use_first` is set: values
/// that differ between sources are kept side by side, each under a
/// `#-#-#-#-#  <catalog name>  #-#-#-#-#` line. The header is always kept;
/// other messages are filtered by the number of catalogs containing them.
pub fn concatenate(catalogs: &[Catalog], options: &ConcatOptions) -> Vec<Entry> {
    let mut seen: IndexMap<String, Occurrence> = IndexMap::new();
    let mut out: Vec<Entry> = Vec::new();
    let mut conflicts = 0usize;

    for catalog in catalogs {
        for entry in solve(&catalog.entries) {
            let key = entry.unified_id();
            let Some(occurrence) = seen.get_mut(&key) else {
                seen.insert(
                    key,
                    Occurrence {
                        index: out.len(),
                        first_name: catalog.name.clone(),
                        count: 1,
                    },
                );
                out.push(entry);
                continue;
            };

            occurrence.count += 1;
            if options.use_first {
                continue;
            }

            let existing = &mut out[occurrence.index];
            if fold_occurrence(existing, &occurrence.first_name, &entry, &catalog.name) {
                conflicts += 1;
                if options.mark_conflicts_fuzzy {
                    existing.mark_fuzzy();
                }
            }
        }
    }

    let total = out.len();
    let mut kept = Vec::with_capacity(total);
    for occurrence in seen.values() {
        let entry = &mut out[occurrence.index];
        if entry.is_header() || options.keeps(occurrence.count) {
            kept.push(std::mem::take(entry));
        }
    }

    tracing::debug!(
        "Concatenated {} catalogs: {} messages, {} kept, {} conflicts",
        catalogs.len(),
        total,
        kept.len(),
        conflicts
    );

    sort_entries(&mut kept, options.sort);
    kept
}

/// Fold a later occurrence into the first one; true when translations clash
fn fold_occurrence(existing: &mut Entry, first_name: &str, incoming: &Entry, name: &str) -> bool {
    merge_lines(&mut existing.comments, first_name, &incoming.comments, name);
    append_missing(&mut existing.extracted_comments, &incoming.extracted_comments);
    append_missing(&mut existing.previous, &incoming.previous);
    existing.locations.extend(incoming.locations.iter().cloned());
    for flag in &incoming.flags {
        existing.add_flag(flag);
    }
    existing.obsolete &= incoming.obsolete;

    // The first occurrence keeps its shape unless it has no translation yet
    let mut conflict = false;
    match (existing.plurals.is_empty(), incoming.plurals.is_empty()) {
        (true, true) => {
            conflict |= merge_text(&mut existing.translation, first_name, &incoming.translation, name);
        }
        (true, false) if existing.translation.is_empty() => {
            existing.plurals.clone_from(&incoming.plurals);
        }
        (true, false) => {
            let text = incoming.first_plural_text().unwrap_or_default();
            conflict |= merge_text(&mut existing.translation, first_name, text, name);
        }
        (false, true) => {
            let form = PluralEntry::new(0, incoming.translation.clone());
            conflict |= merge_form(&mut existing.plurals, first_name, &form, name);
        }
        (false, false) => {
            for form in &incoming.plurals {
                conflict |= merge_form(&mut existing.plurals, first_name, form, name);
            }
        }
    }
    conflict
}

fn merge_form(existing: &mut Vec<PluralEntry>, first_name: &str, form: &PluralEntry, name: &str) -> bool {
    match existing.iter_mut().find(|p| p.id == form.id) {
        Some(slot) => merge_text(&mut slot.text, first_name, &form.text, name),
        None => {
            if !form.text.is_empty() {
                existing.push(form.clone());
            }
            false
        }
    }
}

fn marker(name: &str) -> String {
    format!("{SOURCE_MARKER}  {name}  {SOURCE_MARKER}")
}

/// Merge one text value; true when both sides were non-empty and different
fn merge_text(existing: &mut String, first_name: &str, incoming: &str, name: &str) -> bool {
    if incoming.is_empty() || existing == incoming {
        return false;
    }
    if existing.is_empty() {
        incoming.clone_into(existing);
        return false;
    }

    if !existing.starts_with(SOURCE_MARKER) {
        *existing = format!("{}\n{existing}", marker(first_name));
    }
    existing.push('\n');
    existing.push_str(&marker(name));
    existing.push('\n');
    existing.push_str(incoming);
    true
}

/// Line-list variant of [`merge_text`]
fn merge_lines(existing: &mut Vec<String>, first_name: &str, incoming: &[String], name: &str) {
    if incoming.is_empty() || existing.as_slice() == incoming {
        return;
    }
    if existing.is_empty() {
        existing.extend_from_slice(incoming);
        return;
    }

    if !existing.first().is_some_and(|l| l.starts_with(SOURCE_MARKER)) {
        existing.insert(0, marker(first_name));
    }
    existing.push(marker(name));
    existing.extend_from_slice(incoming);
}

fn append_missing(existing: &mut Vec<String>, incoming: &[String]) {
    for line in incoming {
        if !existing.contains(line) {
            existing.push(line.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Location;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    fn catalog(name: &str, entries: Vec<Entry>) -> Catalog {
        Catalog::with_entries(name, entries)
    }

    fn ids(entries: &[Entry]) -> Vec<&str> {
        entries.iter().map(|e| e.id.as_str()).collect()
    }

    fn three_catalogs() -> Vec<Catalog> {
        vec![
            catalog("a.po", vec![Entry::new("all", "x"), Entry::new("two", "y")]),
            catalog("b.po", vec![Entry::new("all", "x"), Entry::new("two", "y")]),
            catalog("c.po", vec![Entry::new("all", "x"), Entry::new("one", "z")]),
        ]
    }

    #[test]
    fn test_thresholds() {
        let catalogs = three_catalogs();
        assert_eq!(ids(&concatenate(&catalogs, &ConcatOptions::default())), ["all", "two", "one"]);
        assert_eq!(ids(&concatenate(&catalogs, &ConcatOptions::new().unique())), ["one"]);
        assert_eq!(
            ids(&concatenate(&catalogs, &ConcatOptions::new().with_more_than(1))),
            ["all", "two"]
        );
        let options = ConcatOptions::new().with_more_than(1).with_less_than(3);
        assert_eq!(ids(&concatenate(&catalogs, &options)), ["two"]);
    }

    #[test]
    fn test_unique_means_exactly_one_input() {
        let catalogs = vec![
            catalog("a.po", vec![Entry::new("p", ""), Entry::new("q", ""), Entry::new("p", "")]),
            catalog("b.po", vec![Entry::new("q", ""), Entry::new("r", "")]),
            catalog("c.po", vec![Entry::new("s", "")]),
        ];
        let out = concatenate(&catalogs, &ConcatOptions::new().unique());
        let got: HashSet<&str> = out.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(got, HashSet::from(["p", "r", "s"]));
    }

    #[test]
    fn test_conflicting_translations_annotated() {
        let catalogs = vec![
            catalog("a.po", vec![Entry::new("Hi", "Hola")]),
            catalog("b.po", vec![Entry::new("Hi", "Buenas")]),
            catalog("c.po", vec![Entry::new("Hi", "Hey")]),
        ];
        let out = concatenate(&catalogs, &ConcatOptions::default());
        assert_eq!(
            out[0].translation,
            "#-#-#-#-#  a.po  #-#-#-#-#\nHola\n\
             #-#-#-#-#  b.po  #-#-#-#-#\nBuenas\n\
             #-#-#-#-#  c.po  #-#-#-#-#\nHey"
        );
        assert!(out[0].is_fuzzy());

        let quiet = ConcatOptions::new().with_mark_conflicts_fuzzy(false);
        assert!(!concatenate(&catalogs, &quiet)[0].is_fuzzy());
    }

    #[test]
    fn test_empty_side_takes_other_and_locations_concatenate() {
        let mut first = Entry::new("Hi", "");
        first.locations.push(Location::new("a.rs", 1));
        let mut second = Entry::new("Hi", "Hola");
        second.locations.push(Location::new("b.rs", 2));
        second.comments.push("greeting".into());

        let out = concatenate(
            &[catalog("a.po", vec![first]), catalog("b.po", vec![second])],
            &ConcatOptions::default(),
        );
        assert_eq!(out[0].translation, "Hola");
        assert_eq!(out[0].comments, vec!["greeting".to_string()]);
        assert_eq!(
            out[0].locations,
            vec![Location::new("a.rs", 1), Location::new("b.rs", 2)]
        );
        assert!(!out[0].is_fuzzy());
    }

    #[test]
    fn test_use_first_keeps_first_content() {
        let catalogs = vec![
            catalog("a.po", vec![Entry::new("Hi", "Hola")]),
            catalog("b.po", vec![Entry::new("Hi", "Buenas")]),
        ];
        let options = ConcatOptions::new().with_use_first(true);
        assert_eq!(concatenate(&catalogs, &options), vec![Entry::new("Hi", "Hola")]);
        assert!(concatenate(&catalogs, &options.unique()).is_empty());
    }

    #[test]
    fn test_plural_slots_merge_separately() {
        let plural = |forms: &[(u32, &str)]| Entry {
            id: "file".into(),
            plural: "files".into(),
            plurals: forms.iter().map(|&(i, t)| PluralEntry::new(i, t)).collect(),
            ..Default::default()
        };
        let catalogs = vec![
            catalog("a.po", vec![plural(&[(0, "archivo"), (1, "archivos")])]),
            catalog("b.po", vec![plural(&[(0, "archivo"), (1, "ficheros")])]),
        ];
        let out = concatenate(&catalogs, &ConcatOptions::default());
        assert_eq!(out[0].plurals[0].text, "archivo");
        assert_eq!(
            out[0].plurals[1].text,
            "#-#-#-#-#  a.po  #-#-#-#-#\narchivos\n#-#-#-#-#  b.po  #-#-#-#-#\nficheros"
        );
    }

    #[test]
    fn test_mixed_shapes_keep_first_shape() {
        let forms = |text: &str| Entry {
            id: "x".into(),
            plurals: vec![PluralEntry::new(0, text)],
            ..Default::default()
        };

        let out = concatenate(
            &[
                catalog("a.po", vec![Entry::new("x", "uno")]),
                catalog("b.po", vec![forms("dos")]),
            ],
            &ConcatOptions::default(),
        );
        assert!(out[0].validate().is_empty());
        assert!(out[0].plurals.is_empty());
        assert_eq!(
            out[0].translation,
            "#-#-#-#-#  a.po  #-#-#-#-#\nuno\n#-#-#-#-#  b.po  #-#-#-#-#\ndos"
        );
        assert!(out[0].is_fuzzy());

        let out = concatenate(
            &[
                catalog("a.po", vec![forms("uno")]),
                catalog("b.po", vec![Entry::new("x", "uno")]),
            ],
            &ConcatOptions::default(),
        );
        assert!(out[0].validate().is_empty());
        assert_eq!(out[0].translation, "");
        assert_eq!(out[0].plurals, vec![PluralEntry::new(0, "uno")]);
        assert!(!out[0].is_fuzzy());
    }

    #[test]
    fn test_header_survives_thresholds() {
        let header = Entry::new("", "Language: es\n");
        let catalogs = vec![
            catalog("a.po", vec![header.clone(), Entry::new("x", "")]),
            catalog("b.po", vec![header.clone()]),
        ];
        let out = concatenate(&catalogs, &ConcatOptions::new().unique());
        assert_eq!(out, vec![header, Entry::new("x", "")]);
    }
}
