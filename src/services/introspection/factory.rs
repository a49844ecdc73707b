/// Factory: build the introspection-backed `IdentityResolver` from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::introspection::{IdentityResolver, IntrospectionClient};

pub fn build_identity_resolver(config: &Config) -> Result<Arc<dyn IdentityResolver>, reqwest::Error> {
    let http = reqwest::Client::builder()
        .timeout(config.introspection_timeout)
        .build()?;

    Ok(Arc::new(IntrospectionClient::new(
        http,
        config.introspection_url.clone(),
    )))
}
