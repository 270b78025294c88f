use super::{FetchError, FetchRequest, Fetcher, PageResponse};
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use std::future::Future;
use std::time::Duration;

/// reqwest-backed fetcher. No retries; a timeout only if one is configured.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    token: Option<String>,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder().user_agent(user_agent);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            token: None,
        })
    }

    /// Send `token` as a bearer credential on every request.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }

    fn request(&self, request: &FetchRequest) -> reqwest::RequestBuilder {
        let mut builder = self.client.get(&request.url);
        if let Some(accept) = request.accept {
            builder = builder.header(ACCEPT, accept);
        }
        if let Some(token) = &self.token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
        }
        builder
    }
}

fn transport(what: &'static str) -> impl Fn(reqwest::Error) -> FetchError {
    move |e| FetchError::Transport {
        what,
        message: e.to_string(),
    }
}

impl Fetcher for HttpFetcher {
    fn get(&self, request: &FetchRequest) -> impl Future<Output = Result<String, FetchError>> + Send {
        let builder = self.request(request);
        let what = request.what;
        let url = request.url.clone();

        async move {
            tracing::debug!(%url, "GET");
            let response = builder.send().await.map_err(transport(what))?;
            let status = response.status();
            if status != StatusCode::OK {
                tracing::debug!(%url, status = status.as_u16(), "non-success response");
                return Err(FetchError::Status {
                    what,
                    status: status.as_u16(),
                });
            }

            response.text().await.map_err(transport(what))
        }
    }

    fn fetch_page(
        &self,
        request: &FetchRequest,
    ) -> impl Future<Output = Result<PageResponse, FetchError>> + Send {
        let builder = self.request(request);
        let what = request.what;
        let url = request.url.clone();

        async move {
            tracing::debug!(%url, "GET (pass-through)");
            let response = builder.send().await.map_err(transport(what))?;
            let status = response.status().as_u16();
            let content_type = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let body = response.bytes().await.map_err(transport(what))?.to_vec();

            Ok(PageResponse {
                status,
                content_type,
                body,
            })
        }
    }
}
