//! Health check endpoint for the Waypoint Server

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

use crate::server::WaypointServer;

/// Health check handler
///
/// Reports the server as up together with the crate version and the
/// transition policy the engine runs with.
pub async fn health_check(State(server): State<Arc<WaypointServer>>) -> impl IntoResponse {
    debug!("Health check requested");

    let response = json!({
        "status": "UP",
        "version": env!("CARGO_PKG_VERSION"),
        "unknownStatePolicy": server.engine().options().unknown_present_state,
    });

    (StatusCode::OK, Json(response))
}
