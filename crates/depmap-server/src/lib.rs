//! Depmap Server
//!
//! HTTP surface for the dependency elicitation protocol: session creation,
//! variable submission, the pairwise yes/no interview, graph rendering, and
//! finalization.

#![warn(missing_docs)]

pub mod config;
pub mod handlers;
pub mod render;
pub mod sessions;

use config::ServerConfig;
use depmap_store::JsonResultsStore;
use handlers::{create_router, AppState};
use render::DotRenderer;
use sessions::SessionStore;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Results store could not be initialized
    #[error("Results store error: {0}")]
    Store(#[from] depmap_store::StoreError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Start the elicitation HTTP server
///
/// Initializes the session store, renderer, and results store, then serves
/// the protocol with axum.
pub async fn start_server(config: ServerConfig) -> Result<(), ServerError> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting Depmap elicitation server");
    info!("Bind address: {}", config.bind_addr());
    info!("Results directory: {}", config.results_dir.display());

    let state = AppState {
        sessions: Arc::new(SessionStore::new()),
        renderer: Arc::new(DotRenderer::new()),
        results: Arc::new(JsonResultsStore::new(&config.results_dir)?),
    };

    let app = create_router(state);

    // Bind and serve
    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Server listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config() {
        let config = ServerConfig::default_test_config();
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
    }
}
