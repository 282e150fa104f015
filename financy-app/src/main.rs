//! # Financy Application
//!
//! Binary that wires together all the components:
//! - Load configuration from environment
//! - Initialize logging
//! - Initialize the repository adapter and credential services
//! - Start the HTTP server

mod config;

use std::sync::Arc;

use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use financy_hex::{Services, inbound::HttpServer};
use financy_repo::{Argon2Hasher, JwtTokenService, build_repo};

use config::{Config, LogFormat};

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,financy_app=debug,financy_hex=debug".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

fn cors_layer(origin: Option<&str>) -> anyhow::Result<Option<CorsLayer>> {
    let Some(origin) = origin else {
        return Ok(None);
    };

    let origin: HeaderValue = origin
        .parse()
        .map_err(|e| anyhow::anyhow!("CORS_ALLOW_ORIGIN is not a valid origin: {}", e))?;

    Ok(Some(
        CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(Any)
            .allow_headers(Any),
    ))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    init_tracing(config.log_format);

    tracing::info!("Starting Financy server on port {}", config.port);
    tracing::info!("Using database: {}", config.database_url);

    // Build repository (handles connection and migration)
    let repo = build_repo(&config.database_url).await?;

    let tokens = JwtTokenService::new(&config.jwt_secret)?;
    let services = Services::new(repo, Arc::new(Argon2Hasher), Arc::new(tokens));

    // Create and run the HTTP server
    let mut server = HttpServer::new(services);
    if let Some(cors) = cors_layer(config.cors_allow_origin.as_deref())? {
        server = server.with_cors(cors);
    }

    let addr = format!("0.0.0.0:{}", config.port);
    server.run(&addr).await
}
