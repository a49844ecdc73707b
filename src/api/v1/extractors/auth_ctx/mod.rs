/*!
 * Authentication context extractor
 *
 * Responsibility:
 * - provide the authenticated request context (AuthCtx) to handlers
 * - axum-specific code stays in core; the type lives in types
 *
 * Public API:
 * - AuthCtx
 * - AuthCtxExtractor
 */

mod core;
mod types;

pub use core::AuthCtxExtractor;
pub use types::AuthCtx;
