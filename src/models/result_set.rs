//! Result entries and the pagination state over them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default number of entries per page.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// One line of a backend response: an opaque identifier, usually a file path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultEntry(String);

impl ResultEntry {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResultEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResultEntry {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A snapshot of one page of a [`ResultSet`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Entries on this page, in response order
    pub entries: Vec<ResultEntry>,

    /// Global index of the first entry on this page
    pub offset: usize,

    /// 1-based page number
    pub page_number: usize,

    /// Total number of pages; 1 for an empty result set
    pub total_pages: usize,

    pub has_prev: bool,

    pub has_next: bool,
}

/// Ordered result entries plus pagination state.
///
/// The set is rebuilt by [`ResultSet::load`] for each new response and then
/// navigated with [`ResultSet::next`] and [`ResultSet::prev`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSet {
    entries: Vec<ResultEntry>,
    page_size: usize,
    page_index: usize,
}

impl Default for ResultSet {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl ResultSet {
    /// Create an empty result set. A page size of zero is treated as one.
    pub fn new(page_size: usize) -> Self {
        Self {
            entries: Vec::new(),
            page_size: page_size.max(1),
            page_index: 0,
        }
    }

    /// Build a result set directly from response text.
    pub fn from_response(text: &str, page_size: usize) -> Self {
        let mut set = Self::new(page_size);
        set.load(text);
        set
    }

    /// Replace the entries with the non-blank lines of `text` and go back to
    /// the first page.
    ///
    /// Lines are split on `\n` (a trailing `\r` is dropped with the rest of the
    /// surrounding whitespace) and lines that are empty after trimming are
    /// discarded.
    pub fn load(&mut self, text: &str) {
        self.entries = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(ResultEntry::from)
            .collect();
        self.page_index = 0;
    }

    pub fn entries(&self) -> &[ResultEntry] {
        &self.entries
    }

    /// Look up an entry by its global index.
    pub fn entry(&self, index: usize) -> Option<&ResultEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// 0-based index of the current page
    pub fn page_index(&self) -> usize {
        self.page_index
    }

    /// Number of pages, never less than one so an empty set reads "Page 1 of 1".
    pub fn total_pages(&self) -> usize {
        self.entries.len().div_ceil(self.page_size).max(1)
    }

    pub fn has_prev(&self) -> bool {
        self.page_index > 0
    }

    pub fn has_next(&self) -> bool {
        (self.page_index + 1) * self.page_size < self.entries.len()
    }

    /// Advance one page; a no-op on the last page.
    pub fn next(&mut self) {
        if self.has_next() {
            self.page_index += 1;
        }
    }

    /// Go back one page; a no-op on the first page.
    pub fn prev(&mut self) {
        if self.has_prev() {
            self.page_index -= 1;
        }
    }

    /// Entries of the current page.
    pub fn current_entries(&self) -> &[ResultEntry] {
        let start = (self.page_index * self.page_size).min(self.entries.len());
        let end = (start + self.page_size).min(self.entries.len());
        &self.entries[start..end]
    }

    /// Snapshot of the current page.
    pub fn page(&self) -> Page {
        Page {
            entries: self.current_entries().to_vec(),
            offset: (self.page_index * self.page_size).min(self.entries.len()),
            page_number: self.page_index + 1,
            total_pages: self.total_pages(),
            has_prev: self.has_prev(),
            has_next: self.has_next(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(n: usize) -> String {
        (0..n).map(|i| format!("docs/{}.json\n", i)).collect()
    }

    #[test]
    fn test_load_drops_blank_lines() {
        let set = ResultSet::from_response("a.json\n\n  \nb.json\r\n\nc.json", 10);
        let ids: Vec<&str> = set.entries().iter().map(|e| e.as_str()).collect();
        assert_eq!(ids, vec!["a.json", "b.json", "c.json"]);
    }

    #[test]
    fn test_load_resets_page() {
        let mut set = ResultSet::from_response(&numbered(25), 10);
        set.next();
        set.next();
        assert_eq!(set.page_index(), 2);

        set.load(&numbered(5));
        assert_eq!(set.page_index(), 0);
        assert_eq!(set.len(), 5);
    }

    #[test]
    fn test_empty_set_is_one_page() {
        let set = ResultSet::from_response("\n\n", 100);
        let page = set.page();
        assert!(page.entries.is_empty());
        assert_eq!(page.page_number, 1);
        assert_eq!(page.total_pages, 1);
        assert!(!page.has_prev);
        assert!(!page.has_next);
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(ResultSet::from_response(&numbered(1), 10).total_pages(), 1);
        assert_eq!(ResultSet::from_response(&numbered(10), 10).total_pages(), 1);
        assert_eq!(ResultSet::from_response(&numbered(11), 10).total_pages(), 2);
        assert_eq!(ResultSet::from_response(&numbered(250), 100).total_pages(), 3);
    }

    #[test]
    fn test_pages_reconstruct_entries() {
        let mut set = ResultSet::from_response(&numbered(23), 5);
        let mut seen = Vec::new();

        loop {
            let page = set.page();
            assert!(page.entries.len() <= 5);
            assert_eq!(page.offset, seen.len());
            seen.extend(page.entries);
            if !page.has_next {
                break;
            }
            set.next();
        }

        assert_eq!(seen, set.entries());
        assert_eq!(set.page().page_number, 5);
        assert_eq!(set.page().entries.len(), 3);
    }

    #[test]
    fn test_next_is_noop_on_last_page() {
        let mut set = ResultSet::from_response(&numbered(10), 5);
        set.next();
        assert_eq!(set.page_index(), 1);
        set.next();
        assert_eq!(set.page_index(), 1);
    }

    #[test]
    fn test_prev_is_noop_on_first_page() {
        let mut set = ResultSet::from_response(&numbered(10), 5);
        set.prev();
        assert_eq!(set.page_index(), 0);
    }

    #[test]
    fn test_next_then_prev_returns_to_start() {
        let mut set = ResultSet::from_response(&numbered(50), 7);
        set.next();
        let start = set.page_index();

        for _ in 0..3 {
            set.next();
        }
        for _ in 0..3 {
            set.prev();
        }
        assert_eq!(set.page_index(), start);
    }

    #[test]
    fn test_zero_page_size_is_clamped() {
        let set = ResultSet::from_response(&numbered(3), 0);
        assert_eq!(set.page_size(), 1);
        assert_eq!(set.total_pages(), 3);
    }

    #[test]
    fn test_entry_lookup() {
        let set = ResultSet::from_response("x\ny\n", 1);
        assert_eq!(set.entry(1), Some(&ResultEntry::new("y")));
        assert_eq!(set.entry(2), None);
    }
}
