//! Paginated responses.
//!
//! Collection endpoints report their position through headers:
//!
//! | Header | Meaning |
//! |--------|---------|
//! | `X-Page` | current page (default 1) |
//! | `X-Prev-Page` | previous page, if any |
//! | `X-Next-Page` | next page, if any |
//! | `X-Total` | total item count |
//! | `X-Per-Page` | items per page |
//! | `X-Total-Pages` | total page count (default 1) |
//!
//! A [`PaginatedResponse`] keeps the client and the request that produced it,
//! so it can fetch its neighbours. Pages are fetched one after the other.

use std::fmt;
use std::sync::OnceLock;

use serde::de::DeserializeOwned;

use crate::{ApiRequest, Error, Response, RestClient, RestClientExt, Result};

/// Header carrying the current page.
pub const PAGE_HEADER: &str = "X-Page";
/// Header carrying the previous page.
pub const PREV_PAGE_HEADER: &str = "X-Prev-Page";
/// Header carrying the next page.
pub const NEXT_PAGE_HEADER: &str = "X-Next-Page";
/// Header carrying the total item count.
pub const TOTAL_HEADER: &str = "X-Total";
/// Header carrying the page size.
pub const PER_PAGE_HEADER: &str = "X-Per-Page";
/// Header carrying the total page count.
pub const TOTAL_PAGES_HEADER: &str = "X-Total-Pages";

/// Pagination state read from response headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    current_page: u32,
    next_page: Option<u32>,
    prev_page: Option<u32>,
    total_pages: u32,
    total_items: Option<u64>,
    per_page: Option<u32>,
}

impl Default for PageInfo {
    fn default() -> Self {
        Self {
            current_page: 1,
            next_page: None,
            prev_page: None,
            total_pages: 1,
            total_items: None,
            per_page: None,
        }
    }
}

impl PageInfo {
    /// Read the pagination headers. Absent or non-numeric headers fall back
    /// to their defaults.
    #[must_use]
    pub fn from_response(response: &Response) -> Self {
        fn number<N: std::str::FromStr>(response: &Response, name: &str) -> Option<N> {
            response.header(name)?.trim().parse().ok()
        }

        Self {
            current_page: number(response, PAGE_HEADER).unwrap_or(1),
            next_page: number(response, NEXT_PAGE_HEADER),
            prev_page: number(response, PREV_PAGE_HEADER),
            total_pages: number(response, TOTAL_PAGES_HEADER).unwrap_or(1),
            total_items: number(response, TOTAL_HEADER),
            per_page: number(response, PER_PAGE_HEADER),
        }
    }

    /// Current page.
    #[must_use]
    pub const fn current_page(&self) -> u32 {
        self.current_page
    }

    /// Next page, as announced by the server.
    #[must_use]
    pub const fn next_page(&self) -> Option<u32> {
        self.next_page
    }

    /// Previous page, as announced by the server.
    #[must_use]
    pub const fn prev_page(&self) -> Option<u32> {
        self.prev_page
    }

    /// Total number of pages.
    #[must_use]
    pub const fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Total number of items.
    #[must_use]
    pub const fn total_items(&self) -> Option<u64> {
        self.total_items
    }

    /// Items per page.
    #[must_use]
    pub const fn per_page(&self) -> Option<u32> {
        self.per_page
    }

    /// Returns `true` when there is no page after this one.
    #[must_use]
    pub const fn is_last_page(&self) -> bool {
        self.current_page >= self.total_pages
    }
}

/// Turns a response body into `T`.
pub trait Decoder<T>: Send + Sync {
    /// Decode a non-empty body.
    ///
    /// # Errors
    ///
    /// Returns the decoding error.
    fn decode(&self, body: &[u8]) -> Result<T>;
}

/// JSON decoder with path-aware errors.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDecoder;

impl<T: DeserializeOwned> Decoder<T> for JsonDecoder {
    fn decode(&self, body: &[u8]) -> Result<T> {
        crate::from_json(body)
    }
}

/// A response page, its decoded value and the means to fetch adjacent pages.
pub struct PaginatedResponse<T, C, D = JsonDecoder> {
    response: Response,
    page_info: PageInfo,
    decoder: D,
    decoded: OnceLock<T>,
    origin: Option<(C, ApiRequest)>,
}

impl<T, C, D> fmt::Debug for PaginatedResponse<T, C, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaginatedResponse")
            .field("status", &self.response.status())
            .field("page_info", &self.page_info)
            .field("decoded", &self.decoded.get().is_some())
            .field("has_origin", &self.origin.is_some())
            .finish_non_exhaustive()
    }
}

impl<T, C, D> PaginatedResponse<T, C, D>
where
    D: Decoder<T>,
{
    /// Wrap `response`. `origin` is the client and request that produced it.
    #[must_use]
    pub fn new(response: Response, decoder: D, origin: Option<(C, ApiRequest)>) -> Self {
        let page_info = PageInfo::from_response(&response);
        Self {
            response,
            page_info,
            decoder,
            decoded: OnceLock::new(),
            origin,
        }
    }

    /// Decoded body. The body is decoded on the first call only.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoData`] for an empty body, or the decoding error.
    pub fn decode(&self) -> Result<&T> {
        if let Some(value) = self.decoded.get() {
            return Ok(value);
        }
        if self.response.body().is_empty() {
            return Err(Error::NoData);
        }
        let value = self.decoder.decode(self.response.body())?;
        Ok(self.decoded.get_or_init(|| value))
    }

    /// Consume into the decoded body.
    ///
    /// # Errors
    ///
    /// See [`PaginatedResponse::decode`].
    pub fn into_value(mut self) -> Result<T> {
        if let Some(value) = self.decoded.take() {
            return Ok(value);
        }
        if self.response.body().is_empty() {
            return Err(Error::NoData);
        }
        self.decoder.decode(self.response.body())
    }

    /// Raw response.
    #[must_use]
    pub const fn response(&self) -> &Response {
        &self.response
    }

    /// Pagination state.
    #[must_use]
    pub const fn page_info(&self) -> &PageInfo {
        &self.page_info
    }

    /// Current page (default 1).
    #[must_use]
    pub const fn current_page(&self) -> u32 {
        self.page_info.current_page
    }

    /// Total number of pages (default 1).
    #[must_use]
    pub const fn total_pages(&self) -> u32 {
        self.page_info.total_pages
    }

    /// Total number of items.
    #[must_use]
    pub const fn total_items(&self) -> Option<u64> {
        self.page_info.total_items
    }

    /// Items per page.
    #[must_use]
    pub const fn per_page(&self) -> Option<u32> {
        self.page_info.per_page
    }

    /// Request that produced this page, if known.
    #[must_use]
    pub fn origin_request(&self) -> Option<&ApiRequest> {
        self.origin.as_ref().map(|(_, request)| request)
    }
}

impl<T, C, D> PaginatedResponse<T, C, D>
where
    T: Send,
    C: RestClient,
    D: Decoder<T> + Clone,
{
    /// Fetch the page after this one.
    ///
    /// # Errors
    ///
    /// [`Error::MissingOrigin`] without an origin request,
    /// [`Error::PageLimitReached`] on the last page (no request is sent),
    /// or the request error.
    pub async fn next_page(&self) -> Result<Self> {
        let (client, request) = self.origin.as_ref().ok_or(Error::MissingOrigin)?;
        let info = &self.page_info;
        if info.is_last_page() {
            return Err(Error::PageLimitReached {
                page: info.current_page,
                total_pages: info.total_pages,
            });
        }
        self.fetch_page(client, request, info.current_page + 1).await
    }

    /// Fetch the page before this one.
    ///
    /// # Errors
    ///
    /// [`Error::MissingOrigin`] without an origin request,
    /// [`Error::NoPreviousPage`] on the first page (no request is sent),
    /// or the request error.
    pub async fn prev_page(&self) -> Result<Self> {
        let (client, request) = self.origin.as_ref().ok_or(Error::MissingOrigin)?;
        let current = self.page_info.current_page;
        if current <= 1 {
            return Err(Error::NoPreviousPage { page: current });
        }
        self.fetch_page(client, request, current - 1).await
    }

    /// Fetch up to `count` following pages, in order, one at a time.
    ///
    /// Without `count`, fetches every remaining page. Stops early at the
    /// last page; on the last page the result is empty.
    ///
    /// # Errors
    ///
    /// The first failing fetch aborts the walk and is returned.
    pub async fn next_pages(&self, count: Option<u32>) -> Result<Vec<Self>> {
        let remaining = self
            .page_info
            .total_pages
            .saturating_sub(self.page_info.current_page);
        let count = count.unwrap_or(remaining);

        let mut pages: Vec<Self> = Vec::new();
        for _ in 0..count {
            let latest = pages.last().unwrap_or(self);
            if latest.page_info.is_last_page() {
                break;
            }
            let next = latest.next_page().await?;
            pages.push(next);
        }
        Ok(pages)
    }

    async fn fetch_page(&self, client: &C, request: &ApiRequest, page: u32) -> Result<Self> {
        tracing::debug!(
            endpoint = %request.endpoint(),
            from = self.page_info.current_page,
            to = page,
            "fetching page"
        );
        client
            .fetch_with(request.with_page(page), self.decoder.clone())
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use assert2::{check, let_assert};
    use bytes::Bytes;
    use url::Url;

    use super::*;
    use crate::Request;

    /// Serves `/items` with `total_pages` pages; each body is `[page]`.
    #[derive(Clone)]
    struct StubClient {
        base_url: Url,
        total_pages: u32,
        requests: Arc<Mutex<Vec<String>>>,
    }

    impl StubClient {
        fn new(total_pages: u32) -> Self {
            Self {
                base_url: Url::parse("https://gitlab.example.com/api/v4").expect("valid URL"),
                total_pages,
                requests: Arc::default(),
            }
        }

        fn requests(&self) -> Vec<String> {
            self.requests.lock().expect("lock").clone()
        }
    }

    impl RestClient for StubClient {
        async fn execute(&self, request: Request) -> Result<Response> {
            let url = request.full_url();
            self.requests.lock().expect("lock").push(url.to_string());

            let page = request
                .query_items()
                .iter()
                .find(|(name, _)| name == "page")
                .map_or(1, |(_, value)| value.parse::<u32>().expect("page number"));

            let mut headers = HashMap::new();
            headers.insert("x-page".to_string(), page.to_string());
            headers.insert("x-total-pages".to_string(), self.total_pages.to_string());
            headers.insert("x-total".to_string(), (self.total_pages * 2).to_string());
            headers.insert("x-per-page".to_string(), "2".to_string());
            if page > 1 {
                headers.insert("x-prev-page".to_string(), (page - 1).to_string());
            }
            Ok(Response::new(200, headers, Bytes::from(format!("[{page}]"))))
        }

        fn base_url(&self) -> &Url {
            &self.base_url
        }
    }

    #[derive(Clone, Default)]
    struct CountingDecoder(Arc<AtomicUsize>);

    impl Decoder<Vec<u32>> for CountingDecoder {
        fn decode(&self, body: &[u8]) -> Result<Vec<u32>> {
            self.0.fetch_add(1, Ordering::SeqCst);
            crate::from_json(body)
        }
    }

    fn response(headers: &[(&str, &str)], body: &'static str) -> Response {
        Response::new(
            200,
            headers
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
            Bytes::from(body),
        )
    }

    #[test]
    fn page_info_defaults() {
        let info = PageInfo::from_response(&response(&[("X-Page", "abc")], "[]"));
        check!(info.current_page() == 1);
        check!(info.total_pages() == 1);
        check!(info.next_page().is_none());
        check!(info.prev_page().is_none());
        check!(info.total_items().is_none());
        check!(info.per_page().is_none());
        check!(info.is_last_page());
    }

    #[test]
    fn page_info_from_headers() {
        let info = PageInfo::from_response(&response(
            &[
                ("X-Page", "2"),
                ("X-Next-Page", "3"),
                ("X-Prev-Page", "1"),
                ("X-Total", "98"),
                ("X-Per-Page", "20"),
                ("X-Total-Pages", "5"),
            ],
            "[]",
        ));
        check!(info.current_page() == 2);
        check!(info.next_page() == Some(3));
        check!(info.prev_page() == Some(1));
        check!(info.total_items() == Some(98));
        check!(info.per_page() == Some(20));
        check!(info.total_pages() == 5);
        check!(!info.is_last_page());
    }

    #[test]
    fn decode_is_memoized() {
        let decoder = CountingDecoder::default();
        let calls = Arc::clone(&decoder.0);
        let page: PaginatedResponse<Vec<u32>, StubClient, _> =
            PaginatedResponse::new(response(&[], "[1,2,3]"), decoder, None);

        let first = page.decode().expect("decode");
        let second = page.decode().expect("decode");
        check!(first == &vec![1, 2, 3]);
        check!(std::ptr::eq(first, second));
        check!(calls.load(Ordering::SeqCst) == 1);
    }

    #[test]
    fn decode_empty_body_is_no_data() {
        let page: PaginatedResponse<Vec<u32>, StubClient> =
            PaginatedResponse::new(response(&[], ""), JsonDecoder, None);
        let_assert!(Err(Error::NoData) = page.decode());
    }

    #[test]
    fn decode_error_propagates() {
        let page: PaginatedResponse<Vec<u32>, StubClient> =
            PaginatedResponse::new(response(&[], r#"{"id":1}"#), JsonDecoder, None);
        let_assert!(Err(Error::JsonDeserialization { .. }) = page.decode());
    }

    #[tokio::test]
    async fn next_and_prev_change_only_the_page() {
        let client = StubClient::new(5);
        let request = ApiRequest::get("/items").page(2).per_page(2);
        let page = client.fetch::<Vec<u32>>(request).await.expect("fetch");
        check!(page.current_page() == 2);

        let next = page.next_page().await.expect("next");
        check!(next.decode().expect("decode") == &vec![3]);
        check!(next.origin_request().and_then(|r| r.options().page()) == Some(3));

        let prev = page.prev_page().await.expect("prev");
        check!(prev.decode().expect("decode") == &vec![1]);

        check!(
            client.requests()
                == vec![
                    "https://gitlab.example.com/api/v4/items?page=2&per_page=2".to_string(),
                    "https://gitlab.example.com/api/v4/items?page=3&per_page=2".to_string(),
                    "https://gitlab.example.com/api/v4/items?page=1&per_page=2".to_string(),
                ]
        );
    }

    #[tokio::test]
    async fn next_page_on_last_page_sends_nothing() {
        let client = StubClient::new(5);
        let page = client
            .fetch::<Vec<u32>>(ApiRequest::get("/items").page(5))
            .await
            .expect("fetch");
        let sent = client.requests().len();

        let_assert!(Err(err) = page.next_page().await);
        check!(err.is_page_limit());
        check!(matches!(err, Error::PageLimitReached { page: 5, total_pages: 5 }));
        check!(client.requests().len() == sent);
    }

    #[tokio::test]
    async fn prev_page_on_first_page_sends_nothing() {
        let client = StubClient::new(3);
        let page = client
            .fetch::<Vec<u32>>(ApiRequest::get("/items"))
            .await
            .expect("fetch");

        let_assert!(Err(Error::NoPreviousPage { page: 1 }) = page.prev_page().await);
        check!(client.requests().len() == 1);
    }

    #[tokio::test]
    async fn cursor_without_origin_cannot_paginate() {
        let client = StubClient::new(3);
        let url = Url::parse("https://gitlab.example.com/api/v4/items?page=1").expect("valid URL");
        let page = client.fetch_url::<Vec<u32>>(url).await.expect("fetch");

        let_assert!(Err(Error::MissingOrigin) = page.next_page().await);
        let_assert!(Err(Error::MissingOrigin) = page.prev_page().await);
    }

    #[tokio::test]
    async fn next_pages_walks_the_rest_in_order() {
        let client = StubClient::new(4);
        let page = client
            .fetch::<Vec<u32>>(ApiRequest::get("/items"))
            .await
            .expect("fetch");

        let pages = page.next_pages(None).await.expect("pages");
        let numbers: Vec<u32> = pages.iter().map(PaginatedResponse::current_page).collect();
        check!(numbers == vec![2, 3, 4]);

        let pages = page.next_pages(Some(10)).await.expect("pages");
        check!(pages.len() == 3);

        let pages = page.next_pages(Some(1)).await.expect("pages");
        check!(pages.len() == 1);
    }

    #[tokio::test]
    async fn next_pages_on_last_page_is_empty() {
        let client = StubClient::new(2);
        let page = client
            .fetch::<Vec<u32>>(ApiRequest::get("/items").page(2))
            .await
            .expect("fetch");

        let pages = page.next_pages(None).await.expect("pages");
        check!(pages.is_empty());
        check!(client.requests().len() == 1);
    }

    #[tokio::test]
    async fn custom_decoder_is_carried_to_next_page() {
        let client = StubClient::new(2);
        let decoder = CountingDecoder::default();
        let calls = Arc::clone(&decoder.0);

        let page = client
            .fetch_with::<Vec<u32>, _>(ApiRequest::get("/items"), decoder)
            .await
            .expect("fetch");
        let next = page.next_page().await.expect("next");
        next.decode().expect("decode");
        page.decode().expect("decode");

        check!(calls.load(Ordering::SeqCst) == 2);
    }
}
