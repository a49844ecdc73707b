use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::state::AppState;

use super::AuthCtx;

/// Extractor that hands `AuthCtx` to handlers.
/// Assumes the access middleware has already inserted `AuthCtx` into request.extensions().
/// Missing means the route was wired without the middleware: a server bug, so 500 rather than 401.
pub struct AuthCtxExtractor(pub AuthCtx);

impl FromRequestParts<AppState> for AuthCtxExtractor
where
    AppState: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthCtx>()
            .cloned()
            .map(AuthCtxExtractor)
            .ok_or_else(|| {
                tracing::error!(path = %parts.uri.path(), "AuthCtx missing: access middleware not applied");
                AppError::IdentityMissing
            })
    }
}
