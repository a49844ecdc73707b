//! access token (opaque, introspected) verification -> put AuthCtx into extensions
//!
//! Per request:
//! 1. allow-listed path        -> forward untouched
//! 2. no `Authorization`       -> 401 MISSING_AUTHORIZATION
//! 3. not `Bearer <credential>` -> 401 INVALID_ACCESS_TOKEN
//! 4. introspection verdict:
//!    - inactive               -> 401 INACTIVE_ACCESS_TOKEN
//!    - upstream failure       -> 500 (detail is logged only)
//!    - subject                -> AuthCtx in extensions, then `next`
//!
//! The token itself is never logged.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::services::introspection::IntrospectionError;
use crate::state::AppState;

/// Apply the access middleware to every route of `router`.
///
/// Apply it to the fully nested router so the allow-list sees full paths:
/// ```ignore
/// let router = Router::new().nest("/api/v1", api::v1::routes());
/// let router = middleware::auth::access::apply(router, state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 `from_fn` cannot take a State extractor, so pass it explicitly
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    if state.public_paths.contains(req.uri().path()) {
        return Ok(next.run(req).await);
    }

    // Owned: the request (and its !Sync body) must not be borrowed across the await.
    let token = bearer_credential(req.headers())?.to_owned();

    let user_id = match state.identity.resolve_identity(&token).await {
        Ok(user_id) => user_id,
        Err(err) => {
            // The detail stays in the log; the client only sees the AppError code.
            match &err {
                IntrospectionError::Inactive => {
                    tracing::warn!(path = %req.uri().path(), "inactive access token rejected")
                }
                _ => tracing::error!(
                    path = %req.uri().path(),
                    error = %err,
                    "token introspection failed"
                ),
            }
            return Err(AppError::from(err));
        }
    };

    // middleware -> extractor handoff
    req.extensions_mut().insert(AuthCtx::new(user_id));

    Ok(next.run(req).await)
}

/// `Authorization: <scheme> <credential>` split on single spaces into exactly two parts.
fn bearer_credential(headers: &HeaderMap) -> Result<&str, AppError> {
    let value = headers.get(header::AUTHORIZATION).ok_or_else(|| {
        tracing::warn!("missing Authorization header");
        AppError::MissingToken
    })?;

    let value = value.to_str().map_err(|_| {
        tracing::warn!("Authorization header is not visible ASCII");
        AppError::MalformedToken
    })?;

    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(credential), None)
            if scheme.eq_ignore_ascii_case("bearer") && !credential.is_empty() =>
        {
            Ok(credential)
        }
        _ => {
            tracing::warn!("malformed Authorization header");
            Err(AppError::MalformedToken)
        }
    }
}
