/*
 * Responsibility
 * - GET /health (liveness)
 * - on the default allow-list, so it answers without a token
 */
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}
