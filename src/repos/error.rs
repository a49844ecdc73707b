/*
 * Responsibility
 * - what the repository layer reports upward
 */
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    // Connection loss, pool timeout, bad SQL and row decode failures all land here.
    #[error("db error: {0}")]
    Db(#[from] sqlx::Error),
}

pub type RepoResult<T> = Result<T, RepoError>;
