//! One window of results.

use crate::request::PageRequest;

/// A page of items plus the total number of matching rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    items: Vec<T>,
    total: u64,
    request: PageRequest,
}

impl<T> Page<T> {
    /// Wrap the rows fetched for `request`.
    #[must_use]
    pub const fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            request,
        }
    }

    /// An empty first page.
    #[must_use]
    pub const fn empty(request: PageRequest) -> Self {
        Self::new(Vec::new(), 0, request)
    }

    /// Items in this window.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Total rows across all pages.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// The window that produced this page.
    #[must_use]
    pub const fn request(&self) -> PageRequest {
        self.request
    }

    /// Whether rows remain after this window.
    #[must_use]
    pub fn has_next(&self) -> bool {
        let seen = self.request.offset() + self.items.len() as u64;
        seen < self.total
    }

    /// Whether a window precedes this one.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.request.page() > 1
    }

    /// Transform every item while keeping the window metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            request: self.request,
        }
    }

    /// Consume the page, returning its items.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}
