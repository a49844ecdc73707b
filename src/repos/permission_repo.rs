/*
 * Responsibility
 * - resolve a user id to the permission names granted through their roles
 * - schema: permission(id, name), role_permission(role_id, permission_id), user_role(user_id, role_id)
 * - DB errors are returned as RepoError (the handler decides the HTTP meaning)
 */
use async_trait::async_trait;
use sqlx::PgPool;

use crate::repos::error::{RepoError, RepoResult};

/// Read-only access to a user's effective permissions.
///
/// Implementations must be safe to share between concurrent requests.
#[async_trait]
pub trait PermissionStore: Send + Sync + 'static {
    /// Distinct permission names for `user_id`, ordered by name.
    ///
    /// An unknown user or a user without roles yields `Ok(vec![])`.
    async fn fetch_permissions(&self, user_id: &str) -> RepoResult<Vec<String>>;
}

#[derive(Clone, Debug)]
pub struct PgPermissionRepo {
    pool: PgPool,
}

impl PgPermissionRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PermissionStore for PgPermissionRepo {
    async fn fetch_permissions(&self, user_id: &str) -> RepoResult<Vec<String>> {
        // A permission reachable through several roles must appear once.
        let names = sqlx::query_scalar::<_, String>(
            r#"
            SELECT DISTINCT p.name
            FROM permission p
            JOIN role_permission rp ON rp.permission_id = p.id
            JOIN user_role ur ON ur.role_id = rp.role_id
            WHERE ur.user_id = $1
            ORDER BY p.name
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(RepoError::Db)?;

        Ok(names)
    }
}
