//! OAuth2 token introspection (RFC 7662): access token -> subject.
pub mod client;
pub mod factory;
pub mod types;

pub use client::IntrospectionClient;
pub use factory::build_identity_resolver;
pub use types::{IdentityResolver, IntrospectionError};
