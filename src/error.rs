/*
 * Responsibility
 * - the application-wide AppError
 * - IntoResponse (HTTP status / JSON error body)
 * - collapse introspection / repository errors into 401 or 500
 *
 * Internal detail (driver errors, upstream bodies) is logged where it happens
 * and never rendered into the response.
 */
use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::repos::error::RepoError;
use crate::services::introspection::IntrospectionError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("require authorization")]
    MissingToken,
    #[error("invalid access token")]
    MalformedToken,
    #[error("access token is not active")]
    InactiveToken,
    // Middleware/handler wiring bug: a protected handler ran without AuthCtx.
    #[error("identity missing from request")]
    IdentityMissing,
    #[error("internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::MissingToken => (StatusCode::UNAUTHORIZED, "MISSING_AUTHORIZATION"),
            AppError::MalformedToken => (StatusCode::UNAUTHORIZED, "INVALID_ACCESS_TOKEN"),
            AppError::InactiveToken => (StatusCode::UNAUTHORIZED, "INACTIVE_ACCESS_TOKEN"),
            AppError::IdentityMissing | AppError::Internal => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_SERVER_ERROR")
            }
        };

        // IdentityMissing must not tell the client anything beyond a plain 500
        let message = match &self {
            AppError::IdentityMissing => AppError::Internal.to_string(),
            other => other.to_string(),
        };

        let body = ErrorResponse {
            error: ErrorBody { code, message },
        };

        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static("Bearer"),
            );
        }
        response
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::Db(_) => AppError::Internal,
        }
    }
}

impl From<IntrospectionError> for AppError {
    fn from(e: IntrospectionError) -> Self {
        match e {
            IntrospectionError::Inactive => AppError::InactiveToken,
            IntrospectionError::Unavailable(_) | IntrospectionError::Malformed(_) => {
                AppError::Internal
            }
        }
    }
}
