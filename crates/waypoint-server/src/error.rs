//! Error types for the Waypoint Server
//!
//! This module contains the error types used throughout the server.

use thiserror::Error;
use waypoint_core::CoreError;

/// Server error types
#[derive(Error, Debug)]
pub enum ServerError {
    /// Error raised by the workflow engine
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Internal server error
    #[error("Internal server error: {0}")]
    InternalError(String),
}

/// Result type for server operations
pub type ServerResult<T> = Result<T, ServerError>;

impl From<std::io::Error> for ServerError {
    fn from(err: std::io::Error) -> Self {
        ServerError::InternalError(format!("IO error: {}", err))
    }
}
