/*
 * Responsibility
 * - the "authenticated context" type as seen by handlers
 * - the middleware verifies the token and stores it in request extensions;
 *   handlers only ever receive this type
 *
 * Notes
 * - token introspection is the middleware/services responsibility
 * - kept as a fixed contract, separate from how the identity is obtained
 */

/// Context attached to an authenticated request.
///
/// - `user_id` is the `sub` returned by the introspection endpoint, verbatim
/// - one per request; it is never stored in shared state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthCtx {
    pub user_id: String,
}

impl AuthCtx {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}
