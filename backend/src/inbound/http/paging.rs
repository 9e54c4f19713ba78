//! Rendering domain pages as `{count, next, previous, results}` envelopes.

use actix_web::HttpRequest;
use pagination::{Page, PageEnvelope};

/// Wrap `page` using the request URL for neighbour links.
pub(crate) fn envelope<T>(page: Page<T>, req: &HttpRequest) -> PageEnvelope<T> {
    PageEnvelope::from_page(page, &req.full_url())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use pagination::PageRequest;
    use rstest::rstest;

    #[rstest]
    fn links_keep_filters() {
        let req = TestRequest::get()
            .uri("/api/recipes/?tags=soup&page=2&limit=2")
            .insert_header(("host", "foodgram.test"))
            .to_http_request();
        let request = PageRequest::new(2, 2).expect("window");

        let body = envelope(Page::new(vec![3, 4], 5, request), &req);

        assert_eq!(body.count, 5);
        assert_eq!(body.results, vec![3, 4]);
        let next = body.next.expect("third page exists");
        assert!(next.contains("page=3"), "{next}");
        assert!(next.contains("tags=soup"), "{next}");
        let previous = body.previous.expect("first page exists");
        assert!(!previous.contains("page="), "{previous}");
    }
}
