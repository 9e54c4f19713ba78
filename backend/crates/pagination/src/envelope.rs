//! JSON response envelope with neighbour links.

use serde::Serialize;
use url::Url;

use crate::page::Page;
use crate::request::PAGE_PARAM;

/// Paginated response body: `{count, next, previous, results}`.
///
/// `next` and `previous` are absolute URLs derived from the request URL, so
/// filters and the page size carried in the query string survive navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageEnvelope<T> {
    /// Total rows across all pages.
    pub count: u64,
    /// Link to the following page, if any.
    pub next: Option<String>,
    /// Link to the preceding page, if any.
    pub previous: Option<String>,
    /// Items of the current page.
    pub results: Vec<T>,
}

impl<T> PageEnvelope<T> {
    /// Render `page` using `request_url` as the template for neighbour links.
    #[must_use]
    pub fn from_page(page: Page<T>, request_url: &Url) -> Self {
        let current = page.request().page();
        let next = page
            .has_next()
            .then(|| link_to(request_url, Some(current + 1)));
        let previous = page.has_previous().then(|| {
            // The first page is addressed without an explicit page number.
            let target = current - 1;
            link_to(request_url, (target > 1).then_some(target))
        });

        Self {
            count: page.total(),
            next,
            previous,
            results: page.into_items(),
        }
    }
}

fn link_to(request_url: &Url, page: Option<u32>) -> String {
    let mut url = request_url.clone();
    let retained: Vec<(String, String)> = request_url
        .query_pairs()
        .filter(|(key, _)| key != PAGE_PARAM)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    if retained.is_empty() && page.is_none() {
        url.set_query(None);
        return url.into();
    }

    {
        let mut pairs = url.query_pairs_mut();
        pairs.clear();
        pairs.extend_pairs(retained.iter());
        if let Some(number) = page {
            pairs.append_pair(PAGE_PARAM, &number.to_string());
        }
    }
    url.into()
}
