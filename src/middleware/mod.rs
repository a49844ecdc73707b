/*
 * Responsibility
 * - public interface of the middleware layer
 * - auth::access (bearer + introspection), http (transport), security_headers
 */
pub mod auth;
pub mod http;
pub mod security_headers;
