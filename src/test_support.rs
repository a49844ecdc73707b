//! In-memory stand-ins for the introspection endpoint and the permission store.
//!
//! Both count their calls so tests can assert that a request never reached them.
use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use crate::middleware::auth::PublicPaths;
use crate::repos::PermissionStore;
use crate::repos::error::{RepoError, RepoResult};
use crate::services::introspection::{IdentityResolver, IntrospectionError};
use crate::state::AppState;

#[derive(Debug, Clone)]
pub enum Verdict {
    Subject(&'static str),
    Inactive,
    Unavailable,
    Malformed,
}

#[derive(Default)]
pub struct StubResolver {
    verdicts: HashMap<String, Verdict>,
    calls: AtomicUsize,
}

impl StubResolver {
    pub fn with(mut self, token: &str, verdict: Verdict) -> Self {
        self.verdicts.insert(token.to_string(), verdict);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityResolver for StubResolver {
    async fn resolve_identity(&self, token: &str) -> Result<String, IntrospectionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        // Unknown tokens behave like the real endpoint: `{"active": false}`
        match self.verdicts.get(token).cloned().unwrap_or(Verdict::Inactive) {
            Verdict::Subject(sub) => Ok(sub.to_string()),
            Verdict::Inactive => Err(IntrospectionError::Inactive),
            Verdict::Unavailable => Err(IntrospectionError::Unavailable(
                "connect error: 10.0.0.7:4445 refused".into(),
            )),
            Verdict::Malformed => Err(IntrospectionError::Malformed(
                "missing or non-string 'sub' claim".into(),
            )),
        }
    }
}

#[derive(Default)]
pub struct StubPermissions {
    grants: HashMap<String, Vec<&'static str>>,
    fail: bool,
    calls: AtomicUsize,
}

impl StubPermissions {
    pub fn grant(mut self, user_id: &str, permissions: &[&'static str]) -> Self {
        self.grants.insert(user_id.to_string(), permissions.to_vec());
        self
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PermissionStore for StubPermissions {
    async fn fetch_permissions(&self, user_id: &str) -> RepoResult<Vec<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.fail {
            return Err(RepoError::Db(sqlx::Error::Protocol(
                "server closed the connection unexpectedly (10.0.0.9:5432)".into(),
            )));
        }

        Ok(self
            .grants
            .get(user_id)
            .map(|names| names.iter().map(|n| n.to_string()).collect())
            .unwrap_or_default())
    }
}

pub fn test_state(
    resolver: Arc<StubResolver>,
    permissions: Arc<StubPermissions>,
    public_paths: &[&str],
) -> AppState {
    AppState::new(
        resolver,
        permissions,
        PublicPaths::new(public_paths.iter().copied()),
    )
}

/// Send a GET through `app` and return status + body text.
pub async fn get(app: &Router, uri: &str, authorization: Option<&str>) -> (StatusCode, String) {
    let mut builder = Request::builder().uri(uri);
    if let Some(value) = authorization {
        builder = builder.header("Authorization", value);
    }
    let request = builder.body(Body::empty()).expect("failed to build request");

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("failed to send request");

    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("failed to read response body")
        .to_bytes();

    (
        status,
        String::from_utf8(bytes.to_vec()).expect("response body is not utf-8"),
    )
}

/// In-memory sink for formatted `tracing` output.
///
/// Install with `tracing::subscriber::set_default(logs.subscriber())`; the
/// guard scopes it to the current thread, which is where `#[tokio::test]`
/// runs everything.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync + use<> {
        let sink = self.clone();
        tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || sink.clone())
            .finish()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().expect("log buffer poisoned")).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .expect("log buffer poisoned")
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
