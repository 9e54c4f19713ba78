//! Requested page window.

use crate::error::PaginationError;

/// Page size used when a client does not send `limit`.
pub const DEFAULT_PAGE_SIZE: u32 = 6;

/// Largest page size a client may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Query parameter carrying the 1-based page number.
pub const PAGE_PARAM: &str = "page";

/// Query parameter carrying the page size.
pub const LIMIT_PARAM: &str = "limit";

/// A validated `(page, limit)` window.
///
/// Pages are 1-based. `limit` is always within `1..=MAX_PAGE_SIZE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Build a window, rejecting page zero and out-of-range sizes.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError`] when either bound is violated.
    pub fn new(page: u32, limit: u32) -> Result<Self, PaginationError> {
        if page == 0 {
            return Err(PaginationError::InvalidPage {
                value: page.to_string(),
            });
        }
        if limit == 0 || limit > MAX_PAGE_SIZE {
            return Err(PaginationError::InvalidLimit {
                value: limit.to_string(),
                max: MAX_PAGE_SIZE,
            });
        }
        Ok(Self { page, limit })
    }

    /// Parse raw query values, falling back to page 1 and `default_limit`.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError`] when a value is present but not a valid
    /// number within bounds.
    ///
    /// # Example
    ///
    /// ```
    /// use pagination::PageRequest;
    ///
    /// let request = PageRequest::parse(Some("3"), None, 6).expect("valid");
    /// assert_eq!(request.page(), 3);
    /// assert_eq!(request.limit(), 6);
    /// assert_eq!(request.offset(), 12);
    /// ```
    pub fn parse(
        page: Option<&str>,
        limit: Option<&str>,
        default_limit: u32,
    ) -> Result<Self, PaginationError> {
        let page_number = match page {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .map_err(|_| PaginationError::InvalidPage {
                    value: raw.to_owned(),
                })?,
            None => 1,
        };
        let page_size = match limit {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .map_err(|_| PaginationError::InvalidLimit {
                    value: raw.to_owned(),
                    max: MAX_PAGE_SIZE,
                })?,
            None => default_limit.clamp(1, MAX_PAGE_SIZE),
        };
        Self::new(page_number, page_size)
    }

    /// The 1-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// The page size.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of rows to skip before this page.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.limit as u64
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}
