/*
 * Responsibility
 * - the shared context attached to the Router (AppState)
 *   - identity resolver (introspection), permission store (PgPool), allow-list
 * - cheap to Clone (everything inside is Arc)
 * - read-only after startup; nothing request-specific lives here
 */
use std::sync::Arc;

use crate::middleware::auth::PublicPaths;
use crate::repos::PermissionStore;
use crate::services::introspection::IdentityResolver;

#[derive(Clone)]
pub struct AppState {
    pub identity: Arc<dyn IdentityResolver>,
    pub permissions: Arc<dyn PermissionStore>,
    pub public_paths: Arc<PublicPaths>,
}

impl AppState {
    pub fn new(
        identity: Arc<dyn IdentityResolver>,
        permissions: Arc<dyn PermissionStore>,
        public_paths: PublicPaths,
    ) -> Self {
        Self {
            identity,
            permissions,
            public_paths: Arc::new(public_paths),
        }
    }
}
