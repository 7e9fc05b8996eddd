use crate::{
    domain::repository::WorkflowDefinitionRepository,
    domain::workflow_definition::{DefinitionId, WorkflowDefinition},
    CoreError,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Service for validating and storing workflow definitions
pub struct DefinitionService {
    /// Repository for workflow definitions
    definition_repo: Arc<dyn WorkflowDefinitionRepository>,
}

impl DefinitionService {
    /// Create a new definition service
    pub fn new(definition_repo: Arc<dyn WorkflowDefinitionRepository>) -> Self {
        Self { definition_repo }
    }

    /// Validate a definition and store it under its identifier.
    ///
    /// Nothing is stored when any check fails. Uniqueness is decided by the
    /// repository's atomic conditional insert, so two concurrent creations
    /// with the same identifier cannot both succeed.
    pub async fn create_definition(
        &self,
        definition: WorkflowDefinition,
    ) -> Result<WorkflowDefinition, CoreError> {
        let result = self.try_create(&definition).await;
        if let Err(err) = &result {
            debug!(definition_id = %definition.id, error = %err, "Workflow definition rejected");
        }
        result.map(|_| definition)
    }

    async fn try_create(&self, definition: &WorkflowDefinition) -> Result<(), CoreError> {
        definition.validate_id()?;

        // Report a conflict ahead of structural problems
        if self.definition_repo.find_by_id(&definition.id).await?.is_some() {
            return Err(CoreError::DefinitionAlreadyExists(definition.id.0.clone()));
        }

        definition.validate_structure()?;

        let duplicates = definition.duplicate_action_ids();
        if !duplicates.is_empty() {
            warn!(
                definition_id = %definition.id,
                action_ids = ?duplicates,
                "Duplicate action IDs; only the first declaration of each is reachable"
            );
        }

        if !self.definition_repo.insert_if_absent(definition).await? {
            return Err(CoreError::DefinitionAlreadyExists(definition.id.0.clone()));
        }

        info!(
            definition_id = %definition.id,
            states = definition.states.len(),
            actions = definition.actions.len(),
            "Workflow definition created"
        );
        Ok(())
    }

    /// Get a definition by identifier
    pub async fn get_definition(&self, id: &DefinitionId) -> Result<WorkflowDefinition, CoreError> {
        self.definition_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| CoreError::DefinitionNotFound(id.0.clone()))
    }

    /// List all stored definitions
    pub async fn list_definitions(&self) -> Result<Vec<WorkflowDefinition>, CoreError> {
        self.definition_repo.find_all().await
    }
}
