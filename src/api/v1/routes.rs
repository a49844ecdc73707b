/*
 * Responsibility
 * - the v1 URL layout
 * - /health, /user/permissions
 * - token verification is applied by app.rs on the whole router (allow-list decides what is public)
 */
use axum::{Router, routing::get};

use crate::state::AppState;

use crate::api::v1::handlers::{health::health, permissions::list_permissions};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/user/permissions", get(list_permissions))
}
