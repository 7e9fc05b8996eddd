//!
//! Waypoint Server - HTTP front end for the Waypoint workflow engine
//!
//! This module exports all the components of the Waypoint Server.

/// API module
pub mod api;

/// Server module
pub mod server;

/// Configuration module
pub mod config;

/// Error module
pub mod error;

// Re-export key types
pub use config::{LogSettings, ServerConfig};
pub use error::{ServerError, ServerResult};
pub use server::WaypointServer;

/// Run function
///
/// Installs a subscriber from `config` unless one is already installed.
pub async fn run(config: ServerConfig) -> ServerResult<()> {
    init_logging(&config.log_settings());

    let server = WaypointServer::new(config);
    server.run().await
}

/// Initialize logging
pub fn init_logging(settings: &LogSettings) {
    use tracing_subscriber::{fmt, EnvFilter};

    // Create filter based on config
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.level));

    // Initialize subscriber; a second call is a no-op
    let builder = fmt().with_env_filter(filter).with_target(true);
    let _ = if settings.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}
