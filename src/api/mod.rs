//! Console HTTP Server
//!
//! Serves the server-rendered console, built with Axum.
//!
//! # Endpoints
//!
//! ## Console
//! - `GET /` - Current view for the caller's session
//! - `POST /login` - Authenticate against a WordPress site
//! - `POST /logout` - Reset the session
//! - `POST /dashboard` - Show the dashboard
//! - `POST /types/:type_key` - Open the entry list of a content type
//! - `POST /types/:type_key/new` - Open a blank editor for a content type
//! - `POST /entries/new` - Open a blank editor for the current content type
//! - `POST /entries/:id/edit` - Load an entry into the editor
//! - `POST /entries/:id/delete` - Permanently delete an entry
//! - `POST /editor/save` - Create or update the edited entry
//! - `POST /editor/cancel` - Leave the editor without saving
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health` - Full health status
//!
//! # Example
//!
//! ```rust,no_run
//! use cpt_console::api::{serve, AppState, ServerConfig};
//! use cpt_console::wp::{WpClient, WpClientConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = WpClient::new(WpClientConfig::default())?;
//!     let config = ServerConfig::default();
//!
//!     let state = AppState::new(client, config.clone());
//!     serve(state, &config).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::{AppState, ServerConfig};

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Build the router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let console_routes = Router::new()
        .route("/", get(routes::console::index))
        .route("/login", post(routes::console::login))
        .route("/logout", post(routes::console::logout))
        .route("/dashboard", post(routes::console::dashboard))
        .route("/types/:type_key", post(routes::console::open_list))
        .route("/types/:type_key/new", post(routes::console::new_for_type))
        .route("/entries/new", post(routes::console::new_entry))
        .route("/entries/:id/edit", post(routes::console::edit_entry))
        .route("/entries/:id/delete", post(routes::console::delete_entry))
        .route("/editor/save", post(routes::console::save_entry))
        .route("/editor/cancel", post(routes::console::cancel));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/", get(routes::health::full_health));

    let shared_state = Arc::new(state);

    Router::new()
        .merge(console_routes)
        .nest("/health", health_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(shared_state)
}

/// Start the console server
pub async fn serve(state: AppState, config: &ServerConfig) -> Result<(), ApiError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("CPT Console listening on http://{}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("CPT Console shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
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
                tracing::error!(error = %e, "Failed to install signal handler");
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

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
