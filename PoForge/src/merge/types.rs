//! Options for the merge operations

use std::time::Instant;

use crate::collate::{MERGE_THRESHOLD, SortMode};

/// Options for [`merge_template`](super::merge_template)
#[derive(Debug, Clone)]
pub struct TemplateMergeOptions {
    /// Pair stale and new messages by id similarity
    pub fuzzy_matching: bool,
    /// With fuzzy matching: record the replaced id as a `#|` comment.
    /// Without it: keep stale messages as fuzzy instead of obsolete.
    pub keep_previous: bool,
    /// Minimum similarity ratio (0-100) for a fuzzy pairing
    pub threshold: u8,
    /// Ordering of the result; `SortMode::None` keeps merge order
    pub sort: SortMode,
    /// Plural-form count for placeholders; defaults to the header's
    pub nplurals: Option<usize>,
    /// After this instant, remaining messages skip fuzzy matching
    pub deadline: Option<Instant>,
}

impl Default for TemplateMergeOptions {
    fn default() -> Self {
        Self {
            fuzzy_matching: true,
            keep_previous: false,
            threshold: MERGE_THRESHOLD,
            sort: SortMode::Canonical,
            nplurals: None,
            deadline: None,
        }
    }
}

impl TemplateMergeOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_fuzzy_matching(mut self, fuzzy_matching: bool) -> Self {
        self.fuzzy_matching = fuzzy_matching;
        self
    }

    #[must_use]
    pub fn with_keep_previous(mut self, keep_previous: bool) -> Self {
        self.keep_previous = keep_previous;
        self
    }

    #[must_use]
    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold.min(100);
        self
    }

    #[must_use]
    pub fn with_sort(mut self, sort: SortMode) -> Self {
        self.sort = sort;
        self
    }

    #[must_use]
    pub fn with_nplurals(mut self, nplurals: usize) -> Self {
        self.nplurals = Some(nplurals);
        self
    }

    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Whether the deadline, if any, has passed
    pub(crate) fn expired(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

/// Options for [`concatenate`](super::concatenate)
///
/// A message is kept iff `more_than < count < less_than`, where `count` is
/// the number of input catalogs that contain it.
#[derive(Debug, Clone)]
pub struct ConcatOptions {
    pub more_than: usize,
    pub less_than: usize,
    /// Keep the first occurrence's content and ignore later ones
    pub use_first: bool,
    /// Mark messages fuzzy when their sources disagree
    pub mark_conflicts_fuzzy: bool,
    pub sort: SortMode,
}

impl Default for ConcatOptions {
    fn default() -> Self {
        Self {
            more_than: 0,
            less_than: usize::MAX,
            use_first: false,
            mark_conflicts_fuzzy: true,
            sort: SortMode::None,
        }
    }
}

impl ConcatOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_more_than(mut self, more_than: usize) -> Self {
        self.more_than = more_than;
        self
    }

    #[must_use]
    pub fn with_less_than(mut self, less_than: usize) -> Self {
        self.less_than = less_than;
        self
    }

    /// Keep only messages found in exactly one catalog
    #[must_use]
    pub fn unique(self) -> Self {
        self.with_less_than(2)
    }

    #[must_use]
    pub fn with_use_first(mut self, use_first: bool) -> Self {
        self.use_first = use_first;
        self
    }

    #[must_use]
    pub fn with_mark_conflicts_fuzzy(mut self, mark_conflicts_fuzzy: bool) -> Self {
        self.mark_conflicts_fuzzy = mark_conflicts_fuzzy;
        self
    }

    #[must_use]
    pub fn with_sort(mut self, sort: SortMode) -> Self {
        self.sort = sort;
        self
    }

    pub(crate) fn keeps(&self, count: usize) -> bool {
        count > self.more_than && count < self.less_than
    }
}
