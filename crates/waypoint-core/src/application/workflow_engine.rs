use crate::{
    application::definition_service::DefinitionService,
    application::instance_service::InstanceService,
    application::transition_engine::{EngineOptions, TransitionEngine},
    domain::repository::{WorkflowDefinitionRepository, WorkflowInstanceRepository},
    domain::workflow_definition::{ActionId, DefinitionId, WorkflowDefinition},
    domain::workflow_instance::{InstanceId, InstanceSummary, WorkflowInstance},
    CoreError,
};
use std::sync::Arc;

/// The main API provided by Waypoint Core to external systems
#[derive(Clone)]
pub struct WorkflowEngine {
    definition_service: Arc<DefinitionService>,
    instance_service: Arc<InstanceService>,
    transition_engine: Arc<TransitionEngine>,
}

impl WorkflowEngine {
    /// Create a new engine over externally-provided repositories
    ///
    /// This is the preferred way to build an engine. Any catalog implementing
    /// the repository traits can be plugged in without touching validation or
    /// transition logic.
    pub fn new(
        definition_repo: Arc<dyn WorkflowDefinitionRepository>,
        instance_repo: Arc<dyn WorkflowInstanceRepository>,
        options: EngineOptions,
    ) -> Self {
        Self {
            definition_service: Arc::new(DefinitionService::new(definition_repo.clone())),
            instance_service: Arc::new(InstanceService::new(
                definition_repo.clone(),
                instance_repo.clone(),
            )),
            transition_engine: Arc::new(TransitionEngine::new(
                definition_repo,
                instance_repo,
                options,
            )),
        }
    }

    /// Create an engine backed by the in-memory catalog
    #[cfg(feature = "memory")]
    pub fn in_memory() -> Self {
        Self::in_memory_with_options(EngineOptions::default())
    }

    /// Create an engine backed by the in-memory catalog with custom options
    #[cfg(feature = "memory")]
    pub fn in_memory_with_options(options: EngineOptions) -> Self {
        use crate::domain::repository::memory::{
            MemoryWorkflowDefinitionRepository, MemoryWorkflowInstanceRepository,
        };

        Self::new(
            Arc::new(MemoryWorkflowDefinitionRepository::new()),
            Arc::new(MemoryWorkflowInstanceRepository::new()),
            options,
        )
    }

    /// Options the transition engine runs with
    pub fn options(&self) -> EngineOptions {
        self.transition_engine.options()
    }

    /// Validate and store a workflow definition
    pub async fn create_definition(
        &self,
        definition: WorkflowDefinition,
    ) -> Result<WorkflowDefinition, CoreError> {
        self.definition_service.create_definition(definition).await
    }

    /// Get a workflow definition
    pub async fn get_definition(&self, id: &DefinitionId) -> Result<WorkflowDefinition, CoreError> {
        self.definition_service.get_definition(id).await
    }

    /// List all workflow definitions
    pub async fn list_definitions(&self) -> Result<Vec<WorkflowDefinition>, CoreError> {
        self.definition_service.list_definitions().await
    }

    /// Start an instance of a definition
    pub async fn start_instance(
        &self,
        definition_id: &DefinitionId,
    ) -> Result<WorkflowInstance, CoreError> {
        self.instance_service.start_instance(definition_id).await
    }

    /// Get a workflow instance
    pub async fn get_instance(&self, id: &InstanceId) -> Result<WorkflowInstance, CoreError> {
        self.instance_service.get_instance(id).await
    }

    /// List all workflow instances
    pub async fn list_instances(&self) -> Result<Vec<InstanceSummary>, CoreError> {
        self.instance_service.list_instances().await
    }

    /// Execute an action against an instance
    pub async fn execute_action(
        &self,
        instance_id: &InstanceId,
        action_id: &ActionId,
    ) -> Result<WorkflowInstance, CoreError> {
        self.transition_engine
            .execute_action(instance_id, action_id)
            .await
    }
}
