use async_trait::async_trait;
use reqwest::{Client, Response};
use url::Url;

use crate::services::introspection::types::{
    IdentityResolver, IntrospectionError, IntrospectionResult,
};

// A real verdict is a few hundred bytes; anything near this is not one.
const MAX_RESPONSE_BYTES: usize = 64 * 1024;

/// HTTP client for an RFC 7662 introspection endpoint (e.g. Hydra admin API).
///
/// - `http` is built once at startup and carries the request timeout.
/// - No retries: any transport or status failure goes straight to the caller.
#[derive(Clone, Debug)]
pub struct IntrospectionClient {
    http: Client,
    endpoint: Url,
}

impl IntrospectionClient {
    pub fn new(http: Client, endpoint: Url) -> Self {
        Self { http, endpoint }
    }

    /// POST `token=<token>&scope=` and parse the verdict.
    pub async fn introspect(&self, token: &str) -> Result<IntrospectionResult, IntrospectionError> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .form(&[("token", token), ("scope", "")])
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, endpoint = %self.endpoint, "introspection request failed");
                IntrospectionError::Unavailable(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(%status, endpoint = %self.endpoint, "introspection endpoint returned an error status");
            return Err(IntrospectionError::Unavailable(format!("status {status}")));
        }

        let body = read_capped(response).await.inspect_err(|e| {
            tracing::error!(error = %e, endpoint = %self.endpoint, "failed to read introspection response body");
        })?;

        IntrospectionResult::from_body(&body).inspect_err(|e| {
            tracing::error!(error = %e, "introspection response could not be parsed");
        })
    }
}

/// Read the body chunk by chunk, giving up once it passes `MAX_RESPONSE_BYTES`.
async fn read_capped(mut response: Response) -> Result<Vec<u8>, IntrospectionError> {
    let too_large =
        || IntrospectionError::Malformed(format!("body exceeds {MAX_RESPONSE_BYTES} bytes"));

    if response
        .content_length()
        .is_some_and(|len| len > MAX_RESPONSE_BYTES as u64)
    {
        return Err(too_large());
    }

    let mut body = Vec::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| IntrospectionError::Unavailable(e.to_string()))?
    {
        if body.len() + chunk.len() > MAX_RESPONSE_BYTES {
            return Err(too_large());
        }
        body.extend_from_slice(&chunk);
    }

    Ok(body)
}

#[async_trait]
impl IdentityResolver for IntrospectionClient {
    async fn resolve_identity(&self, token: &str) -> Result<String, IntrospectionError> {
        let subject = self.introspect(token).await?.into_subject()?;
        tracing::debug!(sub = %subject, "access token resolved");
        Ok(subject)
    }
}
