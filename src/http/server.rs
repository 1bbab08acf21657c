//! HTTP server
//!
//! Binds the configured address and serves the web UI until ctrl-c.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::ServerConfig;
use crate::service::Analyzer;

use super::handlers::AppState;
use super::routes::create_router;

/// Web UI server
pub struct HttpServer {
    config: ServerConfig,
    analyzer: Arc<Analyzer>,
}

impl HttpServer {
    pub fn new(config: ServerConfig, analyzer: Arc<Analyzer>) -> Self {
        Self { config, analyzer }
    }

    /// Run the server until shutdown
    pub async fn run(&self) -> Result<()> {
        let addr: SocketAddr = self
            .config
            .listen_addr
            .parse()
            .context("Invalid listen address")?;

        let app = create_router(AppState {
            analyzer: self.analyzer.clone(),
        })
        .layer(TraceLayer::new_for_http());

        let listener = TcpListener::bind(&addr)
            .await
            .context("Failed to bind HTTP server")?;

        info!("PageCheck listening on http://{}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
                info!("HTTP server shutting down");
            })
            .await
            .context("HTTP server error")?;

        Ok(())
    }
}
