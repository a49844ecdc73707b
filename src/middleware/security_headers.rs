//! Response headers for an authorization API.
//!
//! Permission lists are per-user and must not be stored by shared caches or
//! sniffed as anything but JSON.

use axum::Router;
use axum::http::header::{self, HeaderValue};
use tower_http::set_header::SetResponseHeaderLayer;

pub fn apply(router: Router) -> Router {
    router
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
}
