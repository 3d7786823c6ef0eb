//! Service index and health check

use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::server::negotiate::Representation;
use crate::server::render::render_index;

/// Link document returned at `/`
pub const INDEX_LINKS_KEY: &str = "Metadata v1. Links";

/// `GET /`
pub async fn index(headers: HeaderMap) -> Response {
    match Representation::from_headers(&headers) {
        Representation::Json => Json(json!({ INDEX_LINKS_KEY: "/db" })).into_response(),
        Representation::Html => Html(render_index()).into_response(),
    }
}

/// `GET /health`
pub async fn health() -> &'static str {
    "OK"
}
