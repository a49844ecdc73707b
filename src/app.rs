/*
 * Responsibility
 * - load Config -> build dependencies -> assemble the Router
 * - apply middleware (access token, transport, security headers)
 * - start with axum::serve()
 */
use std::{panic, process, sync::Arc};

use anyhow::{Context, Result};
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::middleware::{self, auth::PublicPaths};
use crate::repos::PgPermissionRepo;
use crate::services::introspection::build_identity_resolver;
use crate::state::AppState;
use crate::api;

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,permission_gateway=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // stderr can be hidden depending on how the process is launched
        tracing::error!(?info, "panic");

        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        introspection = %config.introspection_url,
        public_paths = ?config.public_paths,
        "starting permission gateway in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn build_state(config: &Config) -> Result<AppState> {
    // Process-level services are built once here and injected; nothing is global.
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .acquire_timeout(config.database_acquire_timeout)
        .connect(&config.database_url)
        .await
        .context("failed to connect to the database")?;

    let identity =
        build_identity_resolver(config).context("failed to build the introspection client")?;

    Ok(AppState::new(
        identity,
        Arc::new(PgPermissionRepo::new(pool)),
        PublicPaths::new(config.public_paths.iter().cloned()),
    ))
}

fn build_router(state: AppState, config: &Config) -> Router {
    let router = Router::new().nest("/api/v1", api::v1::routes());

    // Outermost last: transport layers wrap the access check.
    let router = middleware::auth::access::apply(router, state.clone()).with_state(state);
    let router = middleware::security_headers::apply(router);
    middleware::http::apply(router, config.request_timeout)
}
