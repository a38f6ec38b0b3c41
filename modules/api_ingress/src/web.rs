use std::sync::Arc;

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};
use serde_json::{json, Value};

pub async fn health_check(service: Arc<str>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": &*service
    }))
}

/// The document is rendered once at startup and served as-is.
pub async fn openapi_json(doc: Arc<Value>) -> impl IntoResponse {
    (
        [(header::CACHE_CONTROL, "no-store")],
        Json((*doc).clone()),
    )
}

/// Unknown routes answer with the same `{error}` body as the API.
pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" })))
}
