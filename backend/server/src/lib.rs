//! Documentation of the secret mission check-in site.
//!
//! # Flow
//! - Participant opens `/`, enters a name and ticks the missions they finished
//! - `POST /result` appends one record to the store and shows a confirmation
//! - Admins browse `/admin/summary`, optionally narrowed by `q` (exact name, any case)
//!   and `date` (timestamp prefix) and ordered by `sort=time|name`
//! - Each summary row can be renamed or deleted by its original index
//! - `/admin/export` downloads the same view as CSV in the configured encoding
//!
//!
//!
//! # Notes
//!
//! ## Indices
//! Rows are addressed by their position in the store. A delete shifts every later
//! row down by one, so an open summary page holds stale indices after someone
//! else deletes. Reload before editing.
//!
//! ## Writes
//! The whole store is rewritten on every submission, edit and delete. Fine for a
//! classroom worth of writes, one writer at a time inside the process.
//!
//!
//!
//! # Setup
//!
//! Environment
//! - `RUST_PORT`: listen port, default `1111`
//! - `DATA_FILE`: store path, default `data.json`
//! - `UTC_OFFSET_HOURS`: civil offset for timestamps, default `9`
//! - `MISSIONS_FILE`: JSON mission list, built-in list when unset
//! - `EXPORT_ENCODING`: CSV encoding label, default `euc-kr`
//! - `RUST_LOG`: log filter, e.g. `info,tower_http=debug`
//!
//! Run the server.
//! ```sh
//! RUST_LOG=info cargo run -p mission
//! ```
use std::sync::Arc;

use anyhow::Result;
use axum::{
    Router,
    routing::{get, post},
};

use signal::ctrl_c;
#[cfg(unix)]
use signal::unix::{SignalKind, signal};
use tokio::{net::TcpListener, signal};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod error;
pub mod pages;
pub mod routes;
pub mod state;
pub mod utils;

use config::Config;
use routes::{
    admin_handler, delete_handler, edit_handler, export_handler, index_handler, result_handler,
    summary_handler,
};
use state::AppState;

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/result", post(result_handler))
        .route("/admin", get(admin_handler))
        .route("/admin/summary", get(summary_handler))
        .route("/admin/edit/{index}", post(edit_handler))
        .route("/admin/delete/{index}", post(delete_handler))
        .route("/admin/export", get(export_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = AppState::new(Config::load()?)?;

    info!("Starting server...");

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
