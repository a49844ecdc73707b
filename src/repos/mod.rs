pub mod error;
pub mod permission_repo;

pub use permission_repo::{PermissionStore, PgPermissionRepo};
