//! JSON API server for the payments dashboard
//!
//! Routes are organized into modules:
//! - routes::auth: login and logout
//! - routes::transactions: overview table (all schools)
//! - routes::schools: single-school table
//! - routes::status: order status lookup
//! - routes::preferences: saved display and table preferences

pub mod error;
pub mod routes;

use axum::{
    routing::{get, post},
    Router,
};
use paydash_client::TransactionSource;
use paydash_config::Config;
use paydash_core::SessionStore;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;

pub use error::{ApiError, ApiResult};

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<RwLock<SessionStore>>,
    pub source: Arc<dyn TransactionSource>,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config, source: Arc<dyn TransactionSource>) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(SessionStore::new(&config))),
            source,
            config,
        }
    }
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    use routes::auth::{api_login, api_logout};
    use routes::preferences::{api_preferences, api_update_preferences};
    use routes::schools::{
        api_school_filter, api_school_page, api_school_refresh, api_school_reset, api_school_sort,
        api_school_summary, api_school_toggle_school, api_school_toggle_status, api_school_view,
    };
    use routes::status::api_transaction_status;
    use routes::transactions::{
        api_transactions, api_transactions_filter, api_transactions_page, api_transactions_refresh,
        api_transactions_reset, api_transactions_schools, api_transactions_sort,
        api_transactions_summary, api_transactions_toggle_school, api_transactions_toggle_status,
    };

    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/login", post(api_login))
        .route("/api/logout", post(api_logout))
        // Overview table
        .route("/api/transactions", get(api_transactions))
        .route("/api/transactions/refresh", post(api_transactions_refresh))
        .route("/api/transactions/filter", post(api_transactions_filter))
        .route("/api/transactions/filter/status", post(api_transactions_toggle_status))
        .route("/api/transactions/filter/school", post(api_transactions_toggle_school))
        .route("/api/transactions/sort", post(api_transactions_sort))
        .route("/api/transactions/page", post(api_transactions_page))
        .route("/api/transactions/reset", post(api_transactions_reset))
        .route("/api/transactions/schools", get(api_transactions_schools))
        .route("/api/transactions/summary", get(api_transactions_summary))
        // School table
        .route("/api/schools/:school_id/refresh", post(api_school_refresh))
        .route("/api/schools/transactions", get(api_school_view))
        .route("/api/schools/transactions/filter", post(api_school_filter))
        .route("/api/schools/transactions/filter/status", post(api_school_toggle_status))
        .route("/api/schools/transactions/filter/school", post(api_school_toggle_school))
        .route("/api/schools/transactions/sort", post(api_school_sort))
        .route("/api/schools/transactions/page", post(api_school_page))
        .route("/api/schools/transactions/reset", post(api_school_reset))
        .route("/api/schools/transactions/summary", get(api_school_summary))
        // Status lookup and preferences
        .route("/api/status/:order_id", get(api_transaction_status))
        .route("/api/preferences", get(api_preferences).put(api_update_preferences))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Start the HTTP server
///
/// Binds to the configured address and serves until the process is
/// interrupted.
pub async fn start_server(config: Config, source: Arc<dyn TransactionSource>) -> std::io::Result<()> {
    let addr = config.bind_address();
    log::info!("Upstream payments API: {}", config.upstream.base_url);
    let router = create_router(AppState::new(config, source));

    let listener = TcpListener::bind(&addr).await?;
    log::info!("Starting paydash server on http://{}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    log::info!("Server stopped gracefully");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
