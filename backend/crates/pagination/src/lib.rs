//! Page-number pagination shared by Foodgram list endpoints.
//!
//! The crate is transport agnostic: [`PageRequest`] validates the requested
//! window, [`Page`] carries one window of results together with the total row
//! count, and [`PageEnvelope`] renders the `{count, next, previous, results}`
//! body returned to HTTP clients.
//!
//! # Example
//!
//! ```
//! use pagination::{Page, PageEnvelope, PageRequest};
//! use url::Url;
//!
//! let request = PageRequest::new(1, 2).expect("valid window");
//! let page = Page::new(vec!["a", "b"], 3, request);
//! let base = Url::parse("https://example.test/api/recipes/?limit=2").expect("url");
//! let envelope = PageEnvelope::from_page(page, &base);
//!
//! assert_eq!(envelope.count, 3);
//! assert_eq!(
//!     envelope.next.as_deref(),
//!     Some("https://example.test/api/recipes/?limit=2&page=2")
//! );
//! assert!(envelope.previous.is_none());
//! ```

mod envelope;
mod error;
mod page;
mod request;

pub use envelope::PageEnvelope;
pub use error::PaginationError;
pub use page::Page;
pub use request::{DEFAULT_PAGE_SIZE, LIMIT_PARAM, MAX_PAGE_SIZE, PAGE_PARAM, PageRequest};
