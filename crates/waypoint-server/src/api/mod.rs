//! API module for the Waypoint Server
//!
//! This module contains the API routes and handlers for the Waypoint Server.

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod definitions;
pub mod errors;
pub mod health;
pub mod instances;

use crate::server::WaypointServer;

/// Build the router for API endpoints
pub fn build_router(server: Arc<WaypointServer>) -> Router {
    Router::new()
        // Workflow definitions
        .route(
            "/api/definitions",
            post(definitions::create_definition_handler).get(definitions::list_definitions_handler),
        )
        .route("/api/definitions/:id", get(definitions::get_definition_handler))
        // Workflow instances
        .route(
            "/api/instances",
            post(instances::start_instance_handler).get(instances::list_instances_handler),
        )
        .route("/api/instances/:id", get(instances::get_instance_handler))
        .route(
            "/api/instances/:id/execute",
            post(instances::execute_action_handler),
        )
        // Health check
        .route("/health", get(health::health_check))
        .layer(TraceLayer::new_for_http())
        // Shared state
        .with_state(server)
}

pub use errors::ApiError;
