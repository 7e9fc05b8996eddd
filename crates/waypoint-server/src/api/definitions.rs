//! Workflow definition endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::{error, info};
use waypoint_core::{DefinitionId, WorkflowDefinition};

use crate::api::errors::ApiError;
use crate::server::WaypointServer;

/// Handler for creating a workflow definition
pub async fn create_definition_handler(
    State(server): State<Arc<WaypointServer>>,
    payload: Result<Json<WorkflowDefinition>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(definition) = payload?;
    info!(definition_id = %definition.id, "Creating workflow definition");

    let created = server.engine().create_definition(definition).await?;
    let location = format!("/api/definitions/{}", created.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(created)))
}

/// Handler for getting a workflow definition by ID
pub async fn get_definition_handler(
    State(server): State<Arc<WaypointServer>>,
    Path(id): Path<String>,
) -> Result<Json<WorkflowDefinition>, ApiError> {
    let definition = server.engine().get_definition(&DefinitionId(id)).await?;
    Ok(Json(definition))
}

/// Handler for listing workflow definitions
pub async fn list_definitions_handler(
    State(server): State<Arc<WaypointServer>>,
) -> Result<Json<Vec<WorkflowDefinition>>, ApiError> {
    let definitions = server.engine().list_definitions().await.map_err(|err| {
        error!(?err, "Failed to list workflow definitions");
        ApiError::from(err)
    })?;
    Ok(Json(definitions))
}
