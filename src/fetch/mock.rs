use super::{FetchError, FetchRequest, Fetcher, PageResponse};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;

const HTML: &str = "text/html; charset=utf-8";

/// In-memory fetcher serving canned responses keyed by URL.
///
/// Unknown URLs answer 404 unless a fallback body is set. Every request is
/// recorded so callers can assert on what was asked for, and in what order.
#[derive(Debug, Default)]
pub struct MockFetcher {
    responses: HashMap<String, PageResponse>,
    fallback: Option<String>,
    requests: Mutex<Vec<FetchRequest>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` as an HTML 200.
    pub fn with_body(self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.with_response(url, 200, HTML, body.into().into_bytes())
    }

    pub fn with_status(self, url: impl Into<String>, status: u16) -> Self {
        self.with_response(url, status, "text/plain", Vec::new())
    }

    pub fn with_response(
        mut self,
        url: impl Into<String>,
        status: u16,
        content_type: &str,
        body: impl Into<Vec<u8>>,
    ) -> Self {
        let response = PageResponse {
            status,
            content_type: Some(content_type.to_string()),
            body: body.into(),
        };
        self.responses.insert(url.into(), response);
        self
    }

    /// Body served for any URL without a canned response.
    pub fn with_fallback(mut self, body: impl Into<String>) -> Self {
        self.fallback = Some(body.into());
        self
    }

    pub fn requests(&self) -> Vec<FetchRequest> {
        match self.requests.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn urls(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.url).collect()
    }

    fn respond(&self, request: &FetchRequest) -> PageResponse {
        match self.requests.lock() {
            Ok(mut guard) => guard.push(request.clone()),
            Err(poisoned) => poisoned.into_inner().push(request.clone()),
        }

        match (self.responses.get(&request.url), &self.fallback) {
            (Some(response), _) => response.clone(),
            (None, Some(body)) => PageResponse {
                status: 200,
                content_type: Some(HTML.to_string()),
                body: body.clone().into_bytes(),
            },
            (None, None) => PageResponse {
                status: 404,
                content_type: Some("text/plain".to_string()),
                body: b"Not Found".to_vec(),
            },
        }
    }
}

impl Fetcher for MockFetcher {
    fn get(&self, request: &FetchRequest) -> impl Future<Output = Result<String, FetchError>> + Send {
        let response = self.respond(request);
        let result = if response.status == 200 {
            Ok(String::from_utf8_lossy(&response.body).into_owned())
        } else {
            Err(FetchError::Status {
                what: request.what,
                status: response.status,
            })
        };
        async move { result }
    }

    fn fetch_page(
        &self,
        request: &FetchRequest,
    ) -> impl Future<Output = Result<PageResponse, FetchError>> + Send {
        let response = self.respond(request);
        async move { Ok(response) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_serves_and_records() {
        let fetcher = MockFetcher::new()
            .with_body("https://x/a", "hello")
            .with_status("https://x/b", 500);

        let ok = fetcher.get(&FetchRequest::new("https://x/a", "page")).await;
        assert_eq!(ok.unwrap(), "hello");

        let err = fetcher
            .get(&FetchRequest::new("https://x/b", "page"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Failed to load page: 500");

        let missing = fetcher.get(&FetchRequest::new("https://x/c", "events")).await;
        assert_eq!(missing.unwrap_err().to_string(), "Failed to load events: 404");

        assert_eq!(fetcher.urls(), vec!["https://x/a", "https://x/b", "https://x/c"]);
    }

    #[tokio::test]
    async fn test_fetch_page_returns_non_success_as_data() {
        let fetcher = MockFetcher::new().with_response(
            "https://x/data.json",
            200,
            "application/json",
            r#"{"a":1}"#,
        );

        let json = fetcher
            .fetch_page(&FetchRequest::new("https://x/data.json", "page"))
            .await
            .unwrap();
        assert_eq!(json.content_type.as_deref(), Some("application/json"));

        let missing = fetcher
            .fetch_page(&FetchRequest::new("https://x/none", "page"))
            .await
            .unwrap();
        assert_eq!(missing.status, 404);
    }
}
