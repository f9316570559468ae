//! Axum server setup
//!
//! Server skeleton with:
//! - Localhost-only CORS by default
//! - Tracing middleware
//! - Graceful shutdown on SIGTERM/Ctrl+C followed by a pool close

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use contractorpay_core::config::AdminSeedConfig;
use contractorpay_core::AppConfig;

use crate::auth::SessionSigner;
use crate::db::{self, migrations};
use crate::storage::ReceiptStore;

use super::routes;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:3050)
    pub bind_addr: SocketAddr,

    /// Allow permissive CORS (default: false = localhost only)
    ///
    /// WARNING: Setting this to true allows any origin.
    pub cors_permissive: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3050)),
            cors_permissive: false,
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    pool: PgPool,
    signer: SessionSigner,
    receipts: ReceiptStore,
    admin_seed: AdminSeedConfig,
}

impl AppState {
    pub fn new(
        pool: PgPool,
        signer: SessionSigner,
        receipts: ReceiptStore,
        admin_seed: AdminSeedConfig,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                pool,
                signer,
                receipts,
                admin_seed,
            }),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    pub fn signer(&self) -> &SessionSigner {
        &self.inner.signer
    }

    pub fn receipts(&self) -> &ReceiptStore {
        &self.inner.receipts
    }

    pub fn admin_seed(&self) -> &AdminSeedConfig {
        &self.inner.admin_seed
    }
}

/// Build the application router with all routes.
pub fn build_router(state: AppState, cors_permissive: bool) -> Router {
    let cors = if cors_permissive {
        tracing::warn!("CORS: Permissive mode enabled - all origins allowed");
        CorsLayer::permissive()
    } else {
        // Localhost only
        CorsLayer::new()
            .allow_origin([
                "http://localhost:3000".parse().unwrap(),
                "http://localhost:3050".parse().unwrap(),
                "http://127.0.0.1:3000".parse().unwrap(),
                "http://127.0.0.1:3050".parse().unwrap(),
            ])
            .allow_methods(Any)
            .allow_headers(Any)
    };

    Router::new()
        .merge(routes::health::router())
        .merge(routes::auth::router())
        .merge(routes::workers::router())
        .merge(routes::clients::router())
        .merge(routes::transactions::router())
        .merge(routes::dashboard::router())
        .merge(routes::users::router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the HTTP server.
///
/// Opens the shared pool (first caller wins, everyone else shares the
/// attempt), synchronizes the schema, serves until a shutdown signal,
/// then closes the pool.
pub async fn run_server(app_config: AppConfig, config: ServerConfig) -> Result<(), ServerError> {
    let pool = db::acquire(&app_config.database).await?;
    migrations::run(pool).await?;

    if app_config.admin_seed.is_default() {
        tracing::warn!(
            "ADMIN_USERNAME/ADMIN_PASSWORD not set; first-run seed will use default credentials"
        );
    }

    let state = AppState::new(
        pool.clone(),
        SessionSigner::new(&app_config.session),
        ReceiptStore::new(app_config.receipts.clone()),
        app_config.admin_seed.clone(),
    );

    let app = build_router(state, config.cors_permissive);

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db::shutdown().await;
    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("schema error: {0}")]
    Schema(#[from] crate::db::DbError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr.port(), 3050);
        assert!(!config.cors_permissive);
    }
}
