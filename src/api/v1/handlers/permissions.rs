/*
 * Responsibility
 * - GET /user/permissions
 * - the caller's identity comes from AuthCtx (put there by the access middleware)
 * - repository errors are logged and answered with a generic 500
 */
use axum::{Json, extract::State};

use crate::{api::v1::extractors::AuthCtxExtractor, error::AppError, state::AppState};

pub async fn list_permissions(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
) -> Result<Json<Vec<String>>, AppError> {
    let permissions = state
        .permissions
        .fetch_permissions(&ctx.user_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, user_id = %ctx.user_id, "permission lookup failed");
            AppError::from(e)
        })?;

    Ok(Json(permissions))
}
