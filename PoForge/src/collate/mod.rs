//! Ordering and duplicate resolution shared by the codec and the merges

pub mod fuzzy;

use std::cmp::Ordering;
use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::catalog::{Entry, PluralEntry};

pub use fuzzy::{EQUALITY_THRESHOLD, MERGE_THRESHOLD, fuzzy_eq, ratio};

/// How a merged or printed catalog is ordered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortMode {
    /// Live before obsolete, reviewed before fuzzy, then by first location
    /// and unified id
    #[default]
    Canonical,
    /// By unified id only
    ById,
    /// By first location, then unified id
    ByFile,
    /// Keep the input order
    None,
}

/// The canonical comparator
///
/// Orders by (not obsolete, obsolete), then (not fuzzy, fuzzy), then first
/// location (entries without one first), then unified id.
pub fn compare_canonical(a: &Entry, b: &Entry) -> Ordering {
    a.obsolete
        .cmp(&b.obsolete)
        .then_with(|| a.is_fuzzy().cmp(&b.is_fuzzy()))
        .then_with(|| a.first_location().cmp(&b.first_location()))
        .then_with(|| a.unified_id().cmp(&b.unified_id()))
}

pub fn compare_by_id(a: &Entry, b: &Entry) -> Ordering {
    a.unified_id().cmp(&b.unified_id())
}

pub fn compare_by_file(a: &Entry, b: &Entry) -> Ordering {
    a.first_location()
        .cmp(&b.first_location())
        .then_with(|| compare_by_id(a, b))
}

/// Stable in-place sort
pub fn sort_entries(entries: &mut [Entry], mode: SortMode) {
    match mode {
        SortMode::Canonical => entries.sort_by(compare_canonical),
        SortMode::ById => entries.sort_by(compare_by_id),
        SortMode::ByFile => entries.sort_by(compare_by_file),
        SortMode::None => {}
    }
}

/// Sorted copy
pub fn sorted(entries: &[Entry], mode: SortMode) -> Vec<Entry> {
    let mut out = entries.to_vec();
    sort_entries(&mut out, mode);
    out
}

/// Collapse entries sharing a unified id
///
/// The first occurrence keeps its fields; locations of later duplicates are
/// appended to it in the order they were seen.
pub fn clean_duplicates(entries: &[Entry]) -> Vec<Entry> {
    let mut seen: IndexMap<String, usize> = IndexMap::with_capacity(entries.len());
    let mut out: Vec<Entry> = Vec::with_capacity(entries.len());

    for entry in entries {
        let key = entry.unified_id();
        if let Some(&idx) = seen.get(&key) {
            out[idx].locations.extend(entry.locations.iter().cloned());
        } else {
            seen.insert(key, out.len());
            out.push(entry.clone());
        }
    }

    out
}

/// Collapse duplicates, preferring translated content
///
/// When one duplicate is translated and the kept one is not, the translated
/// one replaces it. Locations are always merged. When both carry plural
/// forms, the forms are concatenated and deduplicated by `(id, text)`.
pub fn solve(entries: &[Entry]) -> Vec<Entry> {
    let mut seen: IndexMap<String, usize> = IndexMap::with_capacity(entries.len());
    let mut out: Vec<Entry> = Vec::with_capacity(entries.len());

    for entry in entries {
        let key = entry.unified_id();
        let Some(&idx) = seen.get(&key) else {
            seen.insert(key, out.len());
            out.push(entry.clone());
            continue;
        };

        let existing = &mut out[idx];
        if !existing.is_translated() && entry.is_translated() {
            let mut locations = std::mem::take(&mut existing.locations);
            locations.extend(entry.locations.iter().cloned());
            *existing = entry.clone();
            existing.locations = locations;
        } else {
            existing.locations.extend(entry.locations.iter().cloned());
            if !existing.plurals.is_empty() && !entry.plurals.is_empty() {
                existing.plurals = resolve_plurals(&existing.plurals, &entry.plurals);
            }
        }
    }

    out
}

/// Concatenate two plural sets, dropping repeated `(id, text)` pairs
pub fn resolve_plurals(first: &[PluralEntry], second: &[PluralEntry]) -> Vec<PluralEntry> {
    let mut seen: HashSet<(u32, &str)> = HashSet::new();
    first
        .iter()
        .chain(second)
        .filter(|p| seen.insert((p.id, p.text.as_str())))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Location;
    use pretty_assertions::assert_eq;

    fn located(id: &str, translation: &str, file: &str, line: i64) -> Entry {
        Entry {
            id: id.into(),
            translation: translation.into(),
            locations: vec![Location::new(file, line)],
            ..Default::default()
        }
    }

    #[test]
    fn test_canonical_tiers() {
        let mut obsolete = located("a", "", "a.rs", 1);
        obsolete.obsolete = true;
        let mut fuzzy = located("b", "", "a.rs", 1);
        fuzzy.mark_fuzzy();
        let late = located("c", "", "b.rs", 1);
        let early = located("d", "", "a.rs", 5);
        let no_loc = Entry::new("z", "");

        let sorted = sorted(
            &[obsolete, fuzzy, late, early, no_loc],
            SortMode::Canonical,
        );
        let ids: Vec<_> = sorted.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["z", "d", "c", "b", "a"]);
    }

    #[test]
    fn test_sort_by_id_and_none() {
        let entries = vec![Entry::new("b", ""), Entry::new("a", "")];
        let by_id = sorted(&entries, SortMode::ById);
        assert_eq!(by_id[0].id, "a");
        let untouched = sorted(&entries, SortMode::None);
        assert_eq!(untouched, entries);
    }

    #[test]
    fn test_clean_duplicates_merges_locations() {
        let entries = vec![
            located("hi", "hola", "a.rs", 1),
            located("bye", "", "a.rs", 2),
            located("hi", "buenas", "b.rs", 3),
        ];
        let cleaned = clean_duplicates(&entries);
        assert_eq!(cleaned.len(), 2);
        assert_eq!(cleaned[0].translation, "hola");
        assert_eq!(
            cleaned[0].locations,
            vec![Location::new("a.rs", 1), Location::new("b.rs", 3)]
        );
        assert_eq!(clean_duplicates(&cleaned), cleaned);
    }

    #[test]
    fn test_context_keeps_entries_apart() {
        let mut a = Entry::new("Open", "");
        a.context = "menu".into();
        let b = Entry::new("Open", "");
        assert_eq!(clean_duplicates(&[a, b]).len(), 2);
    }

    #[test]
    fn test_solve_prefers_translated() {
        let entries = vec![
            located("hi", "", "a.rs", 1),
            located("hi", "hola", "b.rs", 2),
        ];
        let solved = solve(&entries);
        assert_eq!(solved.len(), 1);
        assert_eq!(solved[0].translation, "hola");
        assert_eq!(
            solved[0].locations,
            vec![Location::new("a.rs", 1), Location::new("b.rs", 2)]
        );
    }

    #[test]
    fn test_solve_keeps_first_translation() {
        let entries = vec![Entry::new("hi", "hola"), Entry::new("hi", "buenas")];
        assert_eq!(solve(&entries)[0].translation, "hola");
    }

    #[test]
    fn test_solve_concatenates_plurals() {
        let a = Entry {
            id: "apple".into(),
            plural: "apples".into(),
            plurals: vec![PluralEntry::new(0, "manzana"), PluralEntry::new(1, "manzanas")],
            ..Default::default()
        };
        let b = Entry {
            plurals: vec![PluralEntry::new(1, "manzanas"), PluralEntry::new(2, "muchas")],
            ..a.clone()
        };
        let solved = solve(&[a, b]);
        assert_eq!(
            solved[0].plurals,
            vec![
                PluralEntry::new(0, "manzana"),
                PluralEntry::new(1, "manzanas"),
                PluralEntry::new(2, "muchas"),
            ]
        );
    }
}
