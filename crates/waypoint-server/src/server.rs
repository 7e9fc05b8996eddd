//! Main Waypoint Server implementation
//!
//! This module contains the WaypointServer implementation.

use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use waypoint_core::WorkflowEngine;

use crate::config::ServerConfig;
use crate::error::ServerResult;

/// Main server implementation
#[derive(Clone)]
pub struct WaypointServer {
    /// Configuration
    pub config: ServerConfig,

    /// Workflow engine shared by every request
    engine: WorkflowEngine,
}

impl std::fmt::Debug for WaypointServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WaypointServer")
            .field("config", &self.config)
            .finish()
    }
}

impl WaypointServer {
    /// Create a server over the in-memory engine configured from `config`
    pub fn new(config: ServerConfig) -> Self {
        let engine = WorkflowEngine::in_memory_with_options(config.engine_options());
        Self::with_engine(config, engine)
    }

    /// Create a server over an existing engine
    pub fn with_engine(config: ServerConfig, engine: WorkflowEngine) -> Self {
        Self { config, engine }
    }

    /// The workflow engine
    pub fn engine(&self) -> &WorkflowEngine {
        &self.engine
    }

    /// Build the HTTP router for this server
    pub fn router(&self) -> Router {
        crate::api::build_router(Arc::new(self.clone()))
    }

    /// Run the server until the process receives ctrl-c
    pub async fn run(self) -> ServerResult<()> {
        info!("Starting Waypoint Server");

        let app = self.router();

        let listener =
            TcpListener::bind((self.config.bind_address.as_str(), self.config.port)).await?;
        let addr: SocketAddr = listener.local_addr()?;
        info!(%addr, "Listening");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Waypoint Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(?err, "Failed to listen for shutdown signal");
    }
}
