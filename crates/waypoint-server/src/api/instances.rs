//! Workflow instance endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};
use waypoint_core::{
    ActionId, Change, DefinitionId, InstanceId, InstanceSummary, StateId, WorkflowInstance,
};

use crate::api::errors::ApiError;
use crate::server::WaypointServer;

/// Request body for starting an instance
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartInstanceRequest {
    /// Definition to instantiate; missing or null reads as blank
    #[serde(default)]
    pub definition_id: Option<String>,
}

/// Request body for executing an action
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteActionRequest {
    /// Action to apply; missing or null reads as blank
    #[serde(default)]
    pub action_id: Option<String>,
}

/// Present state and history of one instance
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceView {
    /// Instance identifier
    pub id: InstanceId,
    /// Current state
    pub present_state: StateId,
    /// Applied transitions, oldest first
    pub history: Vec<Change>,
}

impl From<WorkflowInstance> for InstanceView {
    fn from(instance: WorkflowInstance) -> Self {
        Self {
            id: instance.id(),
            present_state: instance.present_state().clone(),
            history: instance.history().to_vec(),
        }
    }
}

fn parse_instance_id(raw: &str) -> Result<InstanceId, ApiError> {
    raw.parse::<InstanceId>()
        .map_err(|_| ApiError::bad_request(format!("Invalid instance ID '{}'.", raw)))
}

/// Handler for starting an instance of a definition
pub async fn start_instance_handler(
    State(server): State<Arc<WaypointServer>>,
    payload: Result<Json<StartInstanceRequest>, JsonRejection>,
) -> Result<Json<WorkflowInstance>, ApiError> {
    let Json(request) = payload?;
    let definition_id = DefinitionId(request.definition_id.unwrap_or_default());
    info!(%definition_id, "Starting workflow instance");

    let instance = server
        .engine()
        .start_instance(&definition_id)
        .await
        .map_err(|err| ApiError::with_client_status(err, StatusCode::NOT_FOUND))?;
    Ok(Json(instance))
}

/// Handler for getting an instance by ID
pub async fn get_instance_handler(
    State(server): State<Arc<WaypointServer>>,
    Path(id): Path<String>,
) -> Result<Json<InstanceView>, ApiError> {
    let id = parse_instance_id(&id)?;
    let instance = server.engine().get_instance(&id).await?;
    Ok(Json(instance.into()))
}

/// Handler for listing instance summaries
pub async fn list_instances_handler(
    State(server): State<Arc<WaypointServer>>,
) -> Result<Json<Vec<InstanceSummary>>, ApiError> {
    let instances = server.engine().list_instances().await.map_err(|err| {
        error!(?err, "Failed to list workflow instances");
        ApiError::from(err)
    })?;
    Ok(Json(instances))
}

/// Handler for executing an action against an instance
pub async fn execute_action_handler(
    State(server): State<Arc<WaypointServer>>,
    Path(id): Path<String>,
    payload: Result<Json<ExecuteActionRequest>, JsonRejection>,
) -> Result<Json<WorkflowInstance>, ApiError> {
    let id = parse_instance_id(&id)?;
    let Json(request) = payload?;
    let action_id = ActionId(request.action_id.unwrap_or_default());

    let instance = server
        .engine()
        .execute_action(&id, &action_id)
        .await
        .map_err(|err| ApiError::with_client_status(err, StatusCode::BAD_REQUEST))?;
    Ok(Json(instance))
}
