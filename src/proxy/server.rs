use super::params::ProxyParams;
use crate::util::{
    read_limited_body, validate_upstream_base, BodyError, UrlValidationError, MAX_BODY_SIZE,
};
use axum::{
    extract::{RawQuery, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use secrecy::{ExposeSecret, SecretString};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::net::TcpListener;
use url::Url;

/// Default upstream API base.
pub const DEFAULT_UPSTREAM_URL: &str = "https://newsapi.org/v2";

/// Route the reader calls.
pub const NEWS_ROUTE: &str = "/api/news";

/// Timeout for the upstream call.
const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors building the relay.
#[derive(Debug, Error)]
pub enum ProxySetupError {
    #[error(transparent)]
    Upstream(#[from] UrlValidationError),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Per-request failures, rendered as JSON error bodies.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("NewsAPI key is not configured. Set NEWSAPI_KEY in the relay's environment.")]
    MissingKey,

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("Upstream response too large (exceeds {0} bytes)")]
    ResponseTooLarge(usize),
}

impl From<BodyError> for ProxyError {
    fn from(err: BodyError) -> Self {
        match err {
            BodyError::TooLarge(limit) => ProxyError::ResponseTooLarge(limit),
            BodyError::Transport(e) => ProxyError::Upstream(e),
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ProxyError::MissingKey => (
                StatusCode::INTERNAL_SERVER_ERROR,
                serde_json::json!({ "error": self.to_string() }),
            ),
            ProxyError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                serde_json::json!({ "error": "Method not allowed" }),
            ),
            ProxyError::Upstream(_) | ProxyError::ResponseTooLarge(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                serde_json::json!({
                    "error": "Internal server error",
                    "message": self.to_string(),
                }),
            ),
        };
        (status, Json(body)).into_response()
    }
}

/// Shared state for the relay: upstream location, credential, HTTP client.
///
/// The credential lives only here; it is never written to responses or logs.
pub struct ProxyState {
    http: reqwest::Client,
    upstream: Url,
    api_key: Option<SecretString>,
}

impl std::fmt::Debug for ProxyState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxyState")
            .field("upstream", &self.upstream.as_str())
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl ProxyState {
    /// Build relay state. `upstream` must be HTTPS (plain HTTP only for localhost).
    pub fn new(upstream: &str, api_key: Option<SecretString>) -> Result<Self, ProxySetupError> {
        let upstream = validate_upstream_base(upstream)?;
        let http = reqwest::Client::builder()
            .user_agent(concat!("newsdesk-relay/", env!("CARGO_PKG_VERSION")))
            .timeout(UPSTREAM_TIMEOUT)
            .build()?;
        if api_key.is_none() {
            tracing::warn!("No NewsAPI key configured; news requests will fail with 500");
        }
        Ok(Self {
            http,
            upstream,
            api_key,
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn upstream(&self) -> &Url {
        &self.upstream
    }
}

/// Build the relay router: `GET /api/news` and `GET /health`, CORS on every response.
pub fn router(state: Arc<ProxyState>) -> Router {
    Router::new()
        .route(NEWS_ROUTE, any(news))
        .route("/health", get(health))
        .layer(middleware::map_response(add_cors_headers))
        .with_state(state)
}

/// Serve the relay on `listener` until `shutdown` resolves.
pub async fn serve(
    listener: TcpListener,
    state: Arc<ProxyState>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, upstream = %state.upstream, "Relay listening");
    }
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}

async fn add_cors_headers(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, PUT, DELETE, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type, Authorization"),
    );
    response
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn news(
    State(state): State<Arc<ProxyState>>,
    method: Method,
    RawQuery(query): RawQuery,
) -> Response {
    if method == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    if method != Method::GET {
        tracing::debug!(method = %method, "Rejecting non-GET request");
        return ProxyError::MethodNotAllowed.into_response();
    }

    let params = ProxyParams::from_query(query.as_deref());
    match relay(&state, &params).await {
        Ok(response) => response,
        Err(e) => {
            if matches!(e, ProxyError::Upstream(_) | ProxyError::ResponseTooLarge(_)) {
                tracing::error!(error = %e, "Relay request failed");
            }
            e.into_response()
        }
    }
}

/// Forward one request upstream and hand back its status and body unchanged.
async fn relay(state: &ProxyState, params: &ProxyParams) -> Result<Response, ProxyError> {
    let key = state.api_key.as_ref().ok_or(ProxyError::MissingKey)?;
    let url = params.upstream_url(&state.upstream);
    let started = Instant::now();

    let upstream = state
        .http
        .get(url)
        .header("X-Api-Key", key.expose_secret())
        .header("Content-Type", "application/json")
        .send()
        .await?;

    let status = StatusCode::from_u16(upstream.status().as_u16())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    // Passed through as-is, JSON or not
    let body = read_limited_body(upstream, MAX_BODY_SIZE).await?;

    tracing::info!(
        status = status.as_u16(),
        category = %params.category,
        page = params.page,
        search = params.q.is_some(),
        bytes = body.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Relayed news request"
    );

    Ok((status, [(header::CONTENT_TYPE, "application/json")], body).into_response())
}
