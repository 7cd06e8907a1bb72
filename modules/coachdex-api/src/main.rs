#![feature(int_roundings)]

use std::sync::Arc;

use anyhow::Result;
use axum::{
    http::{header, HeaderValue},
    routing::{get, post},
    Router,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use coachdex_common::Config;
use coachdex_ingest::{provider_from_config, Ingestor};
use coachdex_store::{AccountStore, ProfileStore};
use mailer::{MailerClient, MailerOptions};
use supabase_storage::StorageClient;

mod auth;
mod rest;

/// Shared server state. Everything in here is constructed once in `main`
/// and injected; there are no module-level singletons.
pub struct AppState {
    pub profiles: ProfileStore,
    pub accounts: AccountStore,
    pub ingestor: Ingestor,
    pub mailer: MailerClient,
    pub session_secret: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("coachdex=info".parse()?))
        .init();

    let config = Config::from_env();

    let pool = coachdex_store::connect(&config.database_url).await?;

    // The factory validates the selected provider's credential here, at
    // startup, so a misconfigured key never surfaces mid-request.
    let provider = provider_from_config(&config)?;
    info!(provider = provider.name(), "Profile provider configured");

    let storage = StorageClient::new(
        &config.supabase_url,
        config.supabase_service_key.clone(),
        config.storage_bucket.clone(),
    );
    let ingestor = Ingestor::new(provider, ProfileStore::new(pool.clone()), storage);

    let mail = MailerClient::new(MailerOptions {
        base_url: config.mail_api_url.clone(),
        api_key: config.mail_api_key.clone(),
        from: config.mail_from.clone(),
    });

    let state = Arc::new(AppState {
        profiles: ProfileStore::new(pool.clone()),
        accounts: AccountStore::new(pool),
        ingestor,
        mailer: mail,
        session_secret: config.session_secret.clone(),
    });

    let app = Router::new()
        // Health check
        .route("/", get(|| async { "ok" }))
        // Public directory
        .route("/api/coaches", get(rest::directory::api_coaches))
        // Admin ingestion
        .route(
            "/api/profiles",
            get(rest::ingest::api_ingest_profiles).post(rest::ingest::api_ingest_profile),
        )
        // Accounts
        .route("/api/auth/signup", post(rest::account::api_signup))
        .route("/api/auth/login", post(rest::account::api_login))
        .route("/api/auth/logout", post(rest::account::api_logout))
        .route(
            "/api/auth/forgot-password",
            post(rest::account::api_forgot_password),
        )
        .route(
            "/api/auth/reset-password",
            post(rest::account::api_reset_password),
        )
        .with_state(state)
        // CORS
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        // API responses are always fresh; the directory changes with every
        // ingestion run.
        .layer(tower_http::set_header::SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        // Logging layer: method + path + status + latency only
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        );

    let addr = format!("{}:{}", config.web_host, config.web_port);
    info!("Coachdex API starting on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
