//! QBR Builder API Server implementation
//!
//! HTTP API using Axum for the account selection flow and report generation.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::handlers;
use crate::config::ReportConfig;
use crate::data::Roster;

/// API Server configuration
#[derive(Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Shared application state, read-only after startup
pub struct AppState {
    pub version: String,
    pub config: ReportConfig,
    pub roster: Roster,
}

impl AppState {
    pub fn new(config: ReportConfig, roster: Roster) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            config,
            roster,
        }
    }
}

/// Build the router with every endpoint and middleware layer
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health and info endpoints
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/version", get(handlers::version))
        // Selection flow
        .route("/api/v1/login", post(handlers::login))
        .route("/api/v1/assignees", post(handlers::assignees))
        .route("/api/v1/partners", post(handlers::partners))
        .route("/api/v1/accounts", post(handlers::accounts))
        .route("/api/v1/generate", post(handlers::generate))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Run the API server
pub async fn run_api_server(config: ApiConfig, report: ReportConfig) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "qbr_builder=info,tower_http=info".into()),
        )
        .init();

    let roster = Roster::load(&report.roster_path)?;
    if report.allowed_emails.is_empty() {
        tracing::warn!("allowed_emails is empty; every login will be rejected");
    }
    let app = router(Arc::new(AppState::new(report, roster)));

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("📊 QBR Builder API Server starting on http://{}", addr);
    info!("   Endpoints: /api/v1/login, /api/v1/assignees, /api/v1/partners, /api/v1/accounts, /api/v1/generate");
    info!("   Health: /health, Version: /version");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("QBR Builder API Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, stopping server...");
}
