//! Pure pagination over an ordered in-memory collection. The pager owns
//! nothing but the current 1-based page index; slicing is recomputed from
//! the collection on every call.

use crate::config::ITEMS_PER_PAGE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    page: usize,
    per_page: usize,
}

impl Default for Pager {
    fn default() -> Self {
        Self::new(ITEMS_PER_PAGE)
    }
}

impl Pager {
    pub fn new(per_page: usize) -> Self {
        assert!(per_page > 0, "page size must be positive");
        Self { page: 1, per_page }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    /// Total page count; at least 1 so an empty collection still renders
    /// as "page 1 of 1".
    pub fn total_pages(&self, len: usize) -> usize {
        len.div_ceil(self.per_page).max(1)
    }

    /// Start/end slice bounds for the current page, clamped to `len`.
    pub fn bounds(&self, len: usize) -> (usize, usize) {
        let start = (self.page - 1).saturating_mul(self.per_page).min(len);
        let end = (start + self.per_page).min(len);
        (start, end)
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let (start, end) = self.bounds(items.len());
        &items[start..end]
    }

    /// Advance one page; no-op on the last page.
    pub fn next(&mut self, len: usize) {
        self.page = (self.page + 1).min(self.total_pages(len));
    }

    /// Go back one page; no-op on page 1.
    pub fn prev(&mut self) {
        self.page = (self.page - 1).max(1);
    }

    /// Back to page 1. Called on user-triggered refreshes; background
    /// refreshes leave the index alone to preserve the operator's place.
    pub fn reset(&mut self) {
        self.page = 1;
    }

    /// Clamp the index into `[1, total_pages]` after the collection shrank.
    pub fn clamp(&mut self, len: usize) {
        self.page = self.page.min(self.total_pages(len)).max(1);
    }
}
