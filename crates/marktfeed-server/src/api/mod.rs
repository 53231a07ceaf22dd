use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use marktfeed_core::AppConfig;
use marktfeed_feed::{parse_source_feed, transcode, FeedClient, FeedError};

const XML_CONTENT_TYPE: &str = "application/xml; charset=utf-8";

#[derive(Clone)]
pub struct AppState {
    pub client: FeedClient,
    pub config: Arc<AppConfig>,
}

/// Error response for the feed routes: status plus an XML-wrapped body.
///
/// Whole-document failures map to distinct statuses (504 upstream
/// unreachable, 502 upstream error or malformed source, 500 otherwise);
/// per-field parse failures never reach this — they are handled by
/// omission inside the transcoder.
pub struct FeedErrorResponse {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl FeedErrorResponse {
    fn from_error(error: &FeedError) -> Self {
        let (status, code) = match error {
            FeedError::Http(_) => (StatusCode::GATEWAY_TIMEOUT, "upstream_unreachable"),
            FeedError::UpstreamStatus { .. } => (StatusCode::BAD_GATEWAY, "upstream_http_error"),
            FeedError::Xml(_) => (StatusCode::BAD_GATEWAY, "malformed_source"),
            FeedError::Write(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };
        Self {
            status,
            code,
            message: error.to_string(),
        }
    }
}

impl IntoResponse for FeedErrorResponse {
    fn into_response(self) -> axum::response::Response {
        let body = format!(
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<error><code>{}</code><message>{}</message></error>",
            self.code,
            escape_xml_text(&self.message)
        );
        (
            self.status,
            [(header::CONTENT_TYPE, XML_CONTENT_TYPE)],
            body,
        )
            .into_response()
    }
}

/// Minimal text escaping for the error body.
fn escape_xml_text(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/feed", get(serve_feed))
        .route("/feed.xml", get(serve_feed))
        .route("/api/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Fetch the upstream feed, transcode it, and serve the result.
///
/// One fetch-transcode-respond sequence per request; no shared mutable
/// state, no caching, all-or-nothing output.
async fn serve_feed(State(state): State<AppState>) -> Result<impl IntoResponse, FeedErrorResponse> {
    let body = run_pipeline(&state).await.map_err(|e| {
        tracing::warn!(error = %e, "feed transcoding failed");
        FeedErrorResponse::from_error(&e)
    })?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, XML_CONTENT_TYPE)],
        body,
    ))
}

async fn run_pipeline(state: &AppState) -> Result<Vec<u8>, FeedError> {
    let body = state.client.fetch(&state.config.feed_url).await?;
    let items = parse_source_feed(&body)?;
    tracing::debug!(items = items.len(), "transcoding source feed");
    transcode(&items, &state.config.listing)
}

/// Liveness only: answers 200 regardless of upstream reachability.
async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthData { status: "ok" }))
}

async fn index() -> &'static str {
    "marktfeed: republishes a product feed as a classifieds ad feed. GET /feed for the transcoded document."
}
