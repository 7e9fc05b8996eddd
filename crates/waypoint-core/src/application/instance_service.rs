use crate::{
    domain::repository::{WorkflowDefinitionRepository, WorkflowInstanceRepository},
    domain::workflow_definition::DefinitionId,
    domain::workflow_instance::{InstanceId, InstanceSummary, WorkflowInstance},
    CoreError,
};
use std::sync::Arc;
use tracing::{error, info};

/// Service for starting and reading workflow instances
pub struct InstanceService {
    /// Repository for workflow definitions
    definition_repo: Arc<dyn WorkflowDefinitionRepository>,

    /// Repository for workflow instances
    instance_repo: Arc<dyn WorkflowInstanceRepository>,
}

impl InstanceService {
    /// Create a new instance service
    pub fn new(
        definition_repo: Arc<dyn WorkflowDefinitionRepository>,
        instance_repo: Arc<dyn WorkflowInstanceRepository>,
    ) -> Self {
        Self {
            definition_repo,
            instance_repo,
        }
    }

    /// Start a new instance of a definition at its initial state
    pub async fn start_instance(
        &self,
        definition_id: &DefinitionId,
    ) -> Result<WorkflowInstance, CoreError> {
        let definition = self
            .definition_repo
            .find_by_id(definition_id)
            .await?
            .ok_or_else(|| CoreError::DefinitionNotFound(definition_id.0.clone()))?;

        let initial_state = match definition.initial_state() {
            Some(state) => state.id.clone(),
            None => {
                error!(definition_id = %definition_id, "Stored definition has no unique initial state");
                return Err(CoreError::InvalidDefinition(definition_id.0.clone()));
            }
        };

        let instance = WorkflowInstance::new(definition_id.clone(), initial_state);
        if !self.instance_repo.insert_if_absent(&instance).await? {
            return Err(CoreError::StateStoreError(format!(
                "Instance ID {} is already in use",
                instance.id()
            )));
        }

        info!(
            definition_id = %definition_id,
            instance_id = %instance.id(),
            present_state = %instance.present_state(),
            "Workflow instance started"
        );
        Ok(instance)
    }

    /// Get an instance by identifier
    pub async fn get_instance(&self, id: &InstanceId) -> Result<WorkflowInstance, CoreError> {
        self.instance_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| CoreError::InstanceNotFound(id.to_string()))
    }

    /// List all instances
    pub async fn list_instances(&self) -> Result<Vec<InstanceSummary>, CoreError> {
        let instances = self.instance_repo.find_all().await?;
        Ok(instances.iter().map(WorkflowInstance::summary).collect())
    }
}
