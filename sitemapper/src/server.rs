use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{any, post},
};
use sitemapper_core::extract::{ExtractError, Extractor, RequestKind, parse_request_payload};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub const USAGE: &str = "To request URLs, POST the link to /sitemap as \
{\"sitemap\":\"https://stackovercode.com/sitemap.xml\"} or a domain to /domain as \
{\"domain\":\"stackovercode.com\"}";

#[derive(Clone)]
pub struct AppState {
    extractor: Arc<Extractor>,
}

impl AppState {
    pub fn new(extractor: Extractor) -> Self {
        Self {
            extractor: Arc::new(extractor),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/sitemap",
            post(handle_sitemap).fallback(method_not_allowed),
        )
        .route("/domain", post(handle_domain).fallback(method_not_allowed))
        .route("/ping", any(ping))
        .route("/", any(usage))
        .fallback(usage)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn handle_sitemap(State(state): State<AppState>, body: Bytes) -> Response {
    handle_request(&state, RequestKind::Sitemap, &body).await
}

async fn handle_domain(State(state): State<AppState>, body: Bytes) -> Response {
    handle_request(&state, RequestKind::Domain, &body).await
}

async fn handle_request(state: &AppState, kind: RequestKind, body: &[u8]) -> Response {
    let value = match parse_request_payload(kind, body) {
        Ok(value) => value,
        Err(e) => return error_response(&e),
    };

    match state.extractor.extract(kind, &value).await {
        Ok(response) => {
            info!("Extracted {} entries for {}", response.urls.len(), value);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            warn!("Extraction failed for {}: {}", value, e);
            error_response(&e)
        }
    }
}

/// Client mistakes are 400s; anything that went wrong talking to the remote site is a 500.
pub fn error_status(error: &ExtractError) -> StatusCode {
    match error {
        ExtractError::InvalidPayload(_)
        | ExtractError::MissingField(_)
        | ExtractError::InvalidAddress(_) => StatusCode::BAD_REQUEST,
        ExtractError::Locate(_) | ExtractError::Resolve(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn error_message(error: &ExtractError) -> String {
    match error {
        ExtractError::InvalidPayload(_) => "Invalid JSON payload".to_string(),
        ExtractError::MissingField(_) => error.to_string(),
        ExtractError::InvalidAddress(_) => "Invalid URL".to_string(),
        ExtractError::Locate(inner) => inner.to_string(),
        ExtractError::Resolve(_) => "Failed to parse sitemap".to_string(),
    }
}

fn error_response(error: &ExtractError) -> Response {
    (error_status(error), error_message(error)).into_response()
}

async fn method_not_allowed() -> (StatusCode, &'static str) {
    (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}

async fn ping() -> &'static str {
    "Pong!"
}

async fn usage() -> &'static str {
    USAGE
}
