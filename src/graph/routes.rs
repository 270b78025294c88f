use super::data::GraphData;
use crate::config::Config;
use crate::fetch::{FetchRequest, Fetcher, PageResponse};
use crate::page::{self, PageMode, ToolView};
use crate::pipeline::{Pipeline, Progress};
use crate::source::Source;
use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::{HeaderValue, StatusCode, Uri, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tower_http::cors::{Any, CorsLayer};

/// Application state for single-graph mode
pub struct AppState {
    pub graph_data: GraphData,
}

/// Start the HTTP server for one already built graph
pub async fn serve(
    graph_data: GraphData,
    port: u16,
    open_browser: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let state = Arc::new(AppState { graph_data });

    let app = Router::new()
        .route("/", get(index_handler))
        .route("/api/graph", get(graph_handler))
        .layer(cors())
        .with_state(state);

    listen(app, port, open_browser, "/").await
}

/// Latest loading text per user, read by the browser while a run is going.
#[derive(Debug, Clone, Default)]
pub struct StatusBoard {
    inner: Arc<Mutex<HashMap<String, String>>>,
}

impl StatusBoard {
    pub fn set(&self, user: &str, text: &str) {
        let mut map = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        map.insert(user.to_string(), text.to_string());
    }

    pub fn get(&self, user: &str) -> Option<String> {
        let map = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        map.get(user).cloned()
    }

    /// Forget `user` once their run has finished.
    pub fn clear(&self, user: &str) {
        let mut map = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        map.remove(user);
    }

    pub fn slot(&self, user: &str) -> StatusSlot {
        StatusSlot {
            board: self.clone(),
            user: user.to_string(),
        }
    }
}

/// Progress sink writing into one user's entry on the board.
pub struct StatusSlot {
    board: StatusBoard,
    user: String,
}

impl Progress for StatusSlot {
    fn update(&self, text: &str) {
        tracing::debug!(user = %self.user, status = text, "progress");
        self.board.set(&self.user, text);
    }
}

/// State for proxy mode: browse GitHub with the tool wired in.
pub struct ProxyState<F> {
    pub fetcher: F,
    pub config: Config,
    pub default_source: Source,
    pub status: StatusBoard,
}

impl<F: Fetcher> ProxyState<F> {
    pub fn new(fetcher: F, config: Config, default_source: Source) -> Self {
        Self {
            fetcher,
            config,
            default_source,
            status: StatusBoard::default(),
        }
    }

    fn pipeline(&self, user: &str, source: Source) -> Pipeline {
        let today = chrono::Utc::now().date_naive();
        Pipeline::new(user, source, &self.config, today)
    }
}

pub fn proxy_router<F: Fetcher + 'static>(state: Arc<ProxyState<F>>) -> Router {
    Router::new()
        .route("/api/users/{user}/graph", get(user_graph_handler::<F>))
        .route("/api/users/{user}/status", get(user_status_handler::<F>))
        .fallback(page_handler::<F>)
        .layer(cors())
        .with_state(state)
}

/// Start the proxy on localhost
pub async fn serve_proxy<F: Fetcher + 'static>(
    state: ProxyState<F>,
    port: u16,
    open_browser: bool,
    start_path: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = proxy_router(Arc::new(state));
    listen(app, port, open_browser, start_path).await
}

async fn listen(
    app: Router,
    port: u16,
    open_browser: bool,
    start_path: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("127.0.0.1:{}", port);
    let url = format!("http://{}{}", addr, start_path);

    crate::style::header("Starting linkrepo server...");
    crate::style::status(&format!("Open in browser: {}", crate::style::url(&url)));
    crate::style::hint("Press Ctrl+C to stop");

    if open_browser {
        if let Err(e) = open::that(&url) {
            crate::style::warning(&format!("Could not open browser: {}", e));
        }
    }

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn cors() -> CorsLayer {
    CorsLayer::new().allow_origin(Any).allow_methods(Any)
}

async fn index_handler(State(state): State<Arc<AppState>>) -> Response {
    match ToolView::embedded(state.graph_data.clone()).render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

async fn graph_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.graph_data.clone())
}

#[derive(Debug, Deserialize)]
pub struct SourceQuery {
    source: Option<Source>,
}

async fn user_graph_handler<F: Fetcher + 'static>(
    State(state): State<Arc<ProxyState<F>>>,
    Path(user): Path<String>,
    query: Result<Query<SourceQuery>, QueryRejection>,
) -> Response {
    let source = match query {
        Ok(Query(query)) => query.source.unwrap_or(state.default_source),
        Err(e) => {
            return (StatusCode::BAD_REQUEST, Json(json!({ "error": e.body_text() })))
                .into_response();
        }
    };

    let slot = state.status.slot(&user);
    let result = state.pipeline(&user, source).run(&state.fetcher, &slot).await;
    state.status.clear(&user);

    match result {
        Ok(graph) => Json(graph).into_response(),
        Err(e) => {
            crate::style::error(&e.display_message());
            (StatusCode::BAD_GATEWAY, Json(json!({ "error": e.to_string() }))).into_response()
        }
    }
}

async fn user_status_handler<F: Fetcher + 'static>(
    State(state): State<Arc<ProxyState<F>>>,
    Path(user): Path<String>,
) -> impl IntoResponse {
    let status = state.status.get(&user).unwrap_or_default();
    Json(json!({ "status": status }))
}

/// Every other path: the tool view, or a GitHub page passed through with
/// the navigation link added when it's a profile.
async fn page_handler<F: Fetcher + 'static>(
    State(state): State<Arc<ProxyState<F>>>,
    query: Result<Query<SourceQuery>, QueryRejection>,
    uri: Uri,
) -> Response {
    let path = uri.path();

    if page::detect(path, None) == PageMode::ToolView {
        let source = match query {
            Ok(Query(query)) => query.source.unwrap_or(state.default_source),
            Err(e) => return (StatusCode::BAD_REQUEST, e.body_text()).into_response(),
        };
        return match tool_view_for(&state, path, source) {
            Some(view) => match view.render() {
                Ok(html) => Html(html).into_response(),
                Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
            },
            None => (StatusCode::NOT_FOUND, "No user in path").into_response(),
        };
    }

    let path_and_query = uri.path_and_query().map_or(path, |pq| pq.as_str());
    let upstream = format!("{}{}", state.config.github.web_url, path_and_query);
    match state.fetcher.fetch_page(&FetchRequest::new(upstream, "page")).await {
        Ok(page) => pass_through(path, page),
        Err(e) => (StatusCode::BAD_GATEWAY, e.to_string()).into_response(),
    }
}

/// Relay an upstream response with its status and content type. Only HTML
/// goes through page rewriting; everything else is sent byte-for-byte.
fn pass_through(path: &str, page: PageResponse) -> Response {
    let status = StatusCode::from_u16(page.status).unwrap_or(StatusCode::BAD_GATEWAY);
    let is_html = page.is_html();

    let body = if is_html {
        match String::from_utf8(page.body) {
            Ok(text) => rewrite_page(path, &text).into_bytes(),
            Err(e) => e.into_bytes(),
        }
    } else {
        page.body
    };

    let mut response = (status, body).into_response();
    if let Some(value) = page
        .content_type
        .as_deref()
        .and_then(|ct| HeaderValue::from_str(ct).ok())
    {
        response.headers_mut().insert(header::CONTENT_TYPE, value);
    }
    response
}

fn tool_view_for<F: Fetcher>(state: &ProxyState<F>, path: &str, source: Source) -> Option<ToolView> {
    let user = page::username_from_path(path)?;
    let pipeline = state.pipeline(user, source);
    state.status.set(user, source.initial_status());

    Some(ToolView::live(
        user,
        pipeline.title(),
        source.initial_status(),
        format!("/api/users/{}/graph?source={}", user, source),
        format!("/api/users/{}/status", user),
    ))
}

/// Run page-mode detection on a fetched page and apply it.
pub fn rewrite_page(path: &str, body: &str) -> String {
    let document = scraper::Html::parse_document(body);
    match page::detect(path, Some(&document)) {
        PageMode::Profile => {
            let injected = page::username_from_path(path)
                .and_then(|user| page::inject_nav_item(body, user));
            injected.unwrap_or_else(|| body.to_string())
        }
        PageMode::ToolView | PageMode::None => body.to_string(),
    }
}
