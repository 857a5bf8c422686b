pub mod error;
pub mod handlers;
pub mod render;

use crate::cache::DEFAULT_DEDUP_WINDOW;
use crate::catalog::CatalogSource;
use crate::config::SearchConfig;
use crate::search::Layout;
use anyhow::{Context, Result};
use axum::{routing::get, Router};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use handlers::*;

/// Shared per-process state; every request reads it, none mutates it
pub struct AppState {
    pub catalog: Arc<dyn CatalogSource>,
    pub settings: PageSettings,
}

/// Rendering options for the search page
#[derive(Debug, Clone, Copy)]
pub struct PageSettings {
    pub layout: Layout,
    /// Deduplication window the page script applies to model fetches
    pub dedup_window: Duration,
    pub snap_model_to_all: bool,
}

impl Default for PageSettings {
    fn default() -> Self {
        Self {
            layout: Layout::default(),
            dedup_window: DEFAULT_DEDUP_WINDOW,
            snap_model_to_all: false,
        }
    }
}

impl From<&SearchConfig> for PageSettings {
    fn from(config: &SearchConfig) -> Self {
        Self {
            layout: Layout::from_single_column(config.single_column),
            dedup_window: config.dedup_window(),
            snap_model_to_all: config.snap_model_to_all,
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(search_page))
        .route("/assets/search.js", get(search_script))
        .route("/api/makes", get(api_makes))
        .route("/api/models", get(api_models))
        .route("/health", get(api_health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the search page on an already bound listener until shutdown
pub async fn serve(listener: TcpListener, state: Arc<AppState>) -> Result<()> {
    let addr = listener.local_addr().context("Listener has no local address")?;
    info!(source = state.catalog.source_name(), "Serving search page");
    info!("http://{}", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutting down"),
        Err(err) => {
            warn!(error = %err, "Unable to listen for Ctrl+C, running until killed");
            std::future::pending::<()>().await;
        }
    }
}
