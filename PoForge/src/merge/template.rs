//! Merge a translated catalog against a freshly extracted template

use std::collections::HashSet;

use crate::catalog::{Catalog, DEFAULT_NPLURALS, Entry, Header, PluralEntry};
use crate::collate::{ratio, solve, sort_entries};

use super::types::TemplateMergeOptions;

/// Merge two catalogs; the result takes the translated catalog's name
pub fn merge_catalogs(def: &Catalog, reference: &Catalog, options: &TemplateMergeOptions) -> Catalog {
    Catalog::with_entries(
        def.name.clone(),
        merge_template(&def.entries, &reference.entries, options),
    )
}

/// Reconcile translated entries (`def`) with template entries (`reference`)
///
/// Messages present in both are carried over unchanged. Messages only in
/// `def` are stale: they are paired with a similar new template message and
/// marked fuzzy, or else marked obsolete. Messages only in `reference` are
/// new: they borrow the translation of a similar translated message, are
/// marked fuzzy, and are appended after the `def` entries.
pub fn merge_template(def: &[Entry], reference: &[Entry], options: &TemplateMergeOptions) -> Vec<Entry> {
    let mut merged = solve(def);
    let reference = solve(reference);

    let nplurals = options.nplurals.unwrap_or_else(|| {
        header_nplurals(&merged)
            .or_else(|| header_nplurals(&reference))
            .unwrap_or(DEFAULT_NPLURALS)
    });

    let ref_ids: HashSet<String> = reference.iter().map(Entry::unified_id).collect();

    // Obsolete messages the template brings back are live again
    let mut revived = 0usize;
    for entry in &mut merged {
        if entry.obsolete && ref_ids.contains(&entry.unified_id()) {
            entry.obsolete = false;
            revived += 1;
        }
    }
    if revived > 0 {
        tracing::debug!("Revived {} obsolete messages", revived);
    }

    let def_ids: HashSet<String> = merged.iter().map(Entry::unified_id).collect();

    // Template messages with no exact translated counterpart
    let new_messages: Vec<&Entry> = reference
        .iter()
        .filter(|e| !e.is_header() && !def_ids.contains(&e.unified_id()))
        .collect();

    let mut claimed: HashSet<String> = HashSet::new();
    let mut rewritten = 0usize;
    let mut obsoleted = 0usize;

    for entry in &mut merged {
        if entry.is_header() || entry.obsolete || ref_ids.contains(&entry.unified_id()) {
            continue;
        }

        let fuzzy = options.fuzzy_matching && !options.expired();
        let best = if fuzzy {
            best_match(&entry.id, new_messages.iter().copied(), options.threshold)
        } else {
            None
        };

        match best {
            Some(target) if claimed.insert(target.unified_id()) => {
                rewrite_identity(entry, target, options.keep_previous);
                rewritten += 1;
            }
            None if !options.fuzzy_matching && options.keep_previous => entry.mark_fuzzy(),
            _ => {
                entry.obsolete = true;
                obsoleted += 1;
            }
        }
    }

    let live_ids: HashSet<String> = merged
        .iter()
        .filter(|e| !e.obsolete)
        .map(Entry::unified_id)
        .collect();

    let mut appended = Vec::new();
    for template in new_messages {
        if live_ids.contains(&template.unified_id()) {
            continue;
        }

        let mut entry = template.clone();
        let fuzzy = options.fuzzy_matching && !options.expired();
        let best = if fuzzy {
            let candidates = merged
                .iter()
                .filter(|e| !e.is_header() && !e.obsolete && e.is_translated());
            best_match(&entry.id, candidates, options.threshold)
        } else {
            None
        };

        match best {
            Some(source) => {
                adapt_translation(&mut entry, source);
                entry.mark_fuzzy();
            }
            None if !fuzzy && entry.is_plural() && entry.plurals.is_empty() => {
                entry.translation.clear();
                entry.plurals = (0..nplurals)
                    .map(|n| PluralEntry::new(n as u32, entry.id.clone()))
                    .collect();
            }
            None => {}
        }
        appended.push(entry);
    }

    tracing::debug!(
        "Template merge: {} rewritten, {} obsolete, {} new",
        rewritten,
        obsoleted,
        appended.len()
    );

    merged.extend(appended);

    if !merged.iter().any(Entry::is_header) {
        if let Some(header) = reference.iter().find(|e| e.is_header()) {
            merged.insert(0, header.clone());
        }
    }

    sort_entries(&mut merged, options.sort);
    merged
}

fn header_nplurals(entries: &[Entry]) -> Option<usize> {
    entries
        .iter()
        .find(|e| e.is_header())
        .and_then(|e| Header::from_entry(e).nplurals())
}

/// Highest-ratio candidate at or above `threshold`; the first wins ties
fn best_match<'a, I>(id: &str, candidates: I, threshold: u8) -> Option<&'a Entry>
where
    I: IntoIterator<Item = &'a Entry>,
{
    let mut best: Option<(&'a Entry, u8)> = None;
    for candidate in candidates {
        let score = ratio(id, &candidate.id);
        if score >= threshold && best.is_none_or(|(_, s)| score > s) {
            best = Some((candidate, score));
        }
    }
    best.map(|(entry, _)| entry)
}

/// Give a stale entry the identity of the template message it matched
fn rewrite_identity(entry: &mut Entry, target: &Entry, keep_previous: bool) {
    if keep_previous {
        let mut previous = Vec::new();
        if entry.has_context() {
            previous.push(format!("msgctxt \"{}\"", entry.context));
        }
        previous.push(format!("msgid \"{}\"", entry.id));
        if !entry.plural.is_empty() {
            previous.push(format!("msgid_plural \"{}\"", entry.plural));
        }
        entry.previous = previous;
    }

    let source = entry.clone();
    entry.id.clone_from(&target.id);
    entry.context.clone_from(&target.context);
    entry.plural.clone_from(&target.plural);
    entry.locations.clone_from(&target.locations);
    entry.extracted_comments.clone_from(&target.extracted_comments);
    adapt_translation(entry, &source);
    entry.mark_fuzzy();
}

/// Copy translated content from `source` into the shape `target` expects
///
/// plural from plural copies every form, plural from singular fills form 0,
/// singular from plural takes the first form, singular from singular copies.
fn adapt_translation(target: &mut Entry, source: &Entry) {
    let target_plural = !target.plural.is_empty();
    let source_plural = !source.plurals.is_empty();

    match (target_plural, source_plural) {
        (true, true) => {
            target.translation.clear();
            target.plurals.clone_from(&source.plurals);
        }
        (true, false) => {
            target.translation.clear();
            target.plurals = vec![PluralEntry::new(0, source.translation.clone())];
        }
        (false, true) => {
            target.plurals.clear();
            target.translation = source.first_plural_text().unwrap_or_default().to_string();
        }
        (false, false) => {
            target.plurals.clear();
            target.translation.clone_from(&source.translation);
        }
    }
}
