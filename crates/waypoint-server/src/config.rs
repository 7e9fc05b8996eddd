//! Configuration for the Waypoint Server
//!
//! This module contains the configuration types and loading functionality.

use serde::{Deserialize, Serialize};
use std::env;
use tracing::{info, warn};
use waypoint_core::{EngineOptions, UnknownStatePolicy};

use crate::error::{ServerError, ServerResult};

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Host to bind to
    #[serde(default = "default_host")]
    pub bind_address: String,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit logs as JSON lines instead of human-readable text
    #[serde(default)]
    pub log_json: bool,

    /// Handling of instances whose present state is missing from their definition
    #[serde(default)]
    pub unknown_state_policy: UnknownStatePolicy,
}

fn default_port() -> u16 {
    8080
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Logging settings, readable before the rest of the configuration so that
/// configuration warnings reach an installed subscriber
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogSettings {
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,

    /// Emit JSON lines instead of human-readable text
    pub json: bool,
}

impl LogSettings {
    /// Read `LOG_LEVEL` and `LOG_FORMAT`
    pub fn from_env() -> Self {
        let mut settings = Self::default();
        if let Ok(level) = env::var("LOG_LEVEL") {
            settings.level = level;
        }
        if let Ok(format) = env::var("LOG_FORMAT") {
            settings.json = format.eq_ignore_ascii_case("json");
        }
        settings
    }
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn load() -> ServerResult<Self> {
        let mut config = Self::default();

        if let Ok(port) = env::var("SERVER_PORT") {
            if let Ok(port) = port.parse::<u16>() {
                config.port = port;
            } else {
                warn!("Invalid SERVER_PORT value: {}", port);
            }
        }

        if let Ok(host) = env::var("SERVER_HOST") {
            config.bind_address = host;
        }

        let logging = LogSettings::from_env();
        config.log_level = logging.level;
        config.log_json = logging.json;

        if let Ok(policy) = env::var("WAYPOINT_UNKNOWN_STATE_POLICY") {
            match policy.parse::<UnknownStatePolicy>() {
                Ok(policy) => config.unknown_state_policy = policy,
                Err(err) => warn!("Invalid WAYPOINT_UNKNOWN_STATE_POLICY value: {}", err),
            }
        }

        if config.bind_address.trim().is_empty() {
            return Err(ServerError::ConfigError(
                "Bind address must not be empty".to_string(),
            ));
        }

        info!("Loaded server configuration");
        Ok(config)
    }

    /// Logging part of this configuration
    pub fn log_settings(&self) -> LogSettings {
        LogSettings {
            level: self.log_level.clone(),
            json: self.log_json,
        }
    }

    /// Engine options derived from this configuration
    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            unknown_present_state: self.unknown_state_policy,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind_address: default_host(),
            log_level: default_log_level(),
            log_json: false,
            unknown_state_policy: UnknownStatePolicy::default(),
        }
    }
}
