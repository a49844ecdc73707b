use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors returned while turning an access token into a subject.
///
/// Only `Inactive` is the client's fault; the other two mean the
/// authorization server could not be used and are reported as 500.
#[derive(Debug, Error)]
pub enum IntrospectionError {
    #[error("introspection endpoint unavailable: {0}")]
    Unavailable(String),
    #[error("malformed introspection response: {0}")]
    Malformed(String),
    #[error("token is not active")]
    Inactive,
}

/// Resolves a bearer token to the user identity it was issued for.
///
/// The middleware only depends on this trait; `IntrospectionClient` is the
/// production implementation.
#[async_trait]
pub trait IdentityResolver: Send + Sync + 'static {
    async fn resolve_identity(&self, token: &str) -> Result<String, IntrospectionError>;
}

/// The part of an introspection response this service cares about.
///
/// `subject` is only meaningful when `active` is true.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntrospectionResult {
    pub active: bool,
    pub subject: Option<String>,
}

impl IntrospectionResult {
    /// Parse a raw response body.
    ///
    /// The body must be a JSON object. A token counts as inactive only when
    /// `active` is literally `false`; a missing `active` falls through to the
    /// `sub` check.
    pub fn from_body(body: &[u8]) -> Result<Self, IntrospectionError> {
        let object: Map<String, Value> = serde_json::from_slice(body)
            .map_err(|e| IntrospectionError::Malformed(format!("body is not a JSON object: {e}")))?;

        let active = !matches!(object.get("active"), Some(Value::Bool(false)));

        let subject = object
            .get("sub")
            .and_then(Value::as_str)
            .map(str::to_owned);

        Ok(Self { active, subject })
    }

    pub fn into_subject(self) -> Result<String, IntrospectionError> {
        if !self.active {
            return Err(IntrospectionError::Inactive);
        }

        match self.subject {
            Some(sub) if !sub.trim().is_empty() => Ok(sub),
            Some(_) => Err(IntrospectionError::Malformed("empty 'sub' claim".into())),
            None => Err(IntrospectionError::Malformed(
                "missing or non-string 'sub' claim".into(),
            )),
        }
    }
}
