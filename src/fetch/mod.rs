//! Network transport for pulling pages and JSON from GitHub.
//!
//! The `Fetcher` trait keeps the pipeline independent from reqwest so the
//! data sources can be driven by canned responses in tests.

mod http;
mod mock;

pub use http::HttpFetcher;
pub use mock::MockFetcher;

use std::future::Future;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    /// The server answered with something other than 200.
    #[error("Failed to load {what}: {status}")]
    Status { what: &'static str, status: u16 },

    /// The request never produced a response.
    #[error("Failed to load {what}: {message}")]
    Transport { what: &'static str, message: String },
}

/// A single GET request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub url: String,
    /// Value for the `Accept` header, if the endpoint wants one.
    pub accept: Option<&'static str>,
    /// Noun used in error messages ("repositories", "events", "page").
    pub what: &'static str,
}

impl FetchRequest {
    pub fn new(url: impl Into<String>, what: &'static str) -> Self {
        Self {
            url: url.into(),
            accept: None,
            what,
        }
    }

    pub fn accept(mut self, accept: &'static str) -> Self {
        self.accept = Some(accept);
        self
    }
}

/// An upstream response passed through as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl PageResponse {
    pub fn is_html(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.trim_start().to_ascii_lowercase().starts_with("text/html"))
    }
}

pub trait Fetcher: Send + Sync {
    /// Fetch the body of `request` as text. Anything but a 200 is an error.
    fn get(&self, request: &FetchRequest) -> impl Future<Output = Result<String, FetchError>> + Send;

    /// Fetch `request` keeping status, content type and raw bytes. Only
    /// transport failures are errors.
    fn fetch_page(
        &self,
        request: &FetchRequest,
    ) -> impl Future<Output = Result<PageResponse, FetchError>> + Send;
}
