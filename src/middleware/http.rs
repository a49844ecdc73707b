//! HTTP-level middleware (cross-cutting concerns).
//!
//! Responsibility:
//! - Request-Id generation + propagation (X-Request-Id)
//! - Access logging / request tracing (TraceLayer)
//! - Body size limit (the gateway only serves GETs)
//! - Global timeout
//!
//! A client disconnect drops the whole service future, which also drops any
//! in-flight introspection call and database query. The timeout covers clients
//! that stay connected.

use std::time::Duration;

use axum::Router;
use axum::error_handling::HandleErrorLayer;
use axum::http::{StatusCode, header::HeaderName};
use tower::timeout::TimeoutLayer;
use tower::{BoxError, ServiceBuilder};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

const REQUEST_ID_HEADER: &str = "x-request-id";

const BODY_LIMIT_BYTES: usize = 16 * 1024;

/// Apply transport-level middleware to the given Router.
pub fn apply(router: Router, request_timeout: Duration) -> Router {
    let request_id_header = HeaderName::from_static(REQUEST_ID_HEADER);

    let layers = ServiceBuilder::new()
        // Make the service error `Infallible` by converting errors into responses.
        .layer(HandleErrorLayer::new(|err: BoxError| async move {
            if err.is::<tower::timeout::error::Elapsed>() {
                tracing::warn!("request timed out");
                StatusCode::REQUEST_TIMEOUT
            } else {
                tracing::error!(error = %err, "unhandled middleware error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }))
        .layer(SetRequestIdLayer::new(
            request_id_header.clone(),
            MakeRequestUuid,
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header))
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http());

    router.layer(layers)
}
