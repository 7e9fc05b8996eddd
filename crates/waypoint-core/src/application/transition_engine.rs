use crate::{
    domain::repository::{WorkflowDefinitionRepository, WorkflowInstanceRepository},
    domain::workflow_definition::ActionId,
    domain::workflow_instance::{Change, InstanceId, WorkflowInstance},
    CoreError,
};
use chrono::Utc;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// What to do when an instance's present state is not declared by its definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownStatePolicy {
    /// Skip the final-state check and keep evaluating the action
    #[default]
    Permissive,
    /// Reject the transition as a corrupt instance
    Reject,
}

impl std::str::FromStr for UnknownStatePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "permissive" => Ok(UnknownStatePolicy::Permissive),
            "reject" => Ok(UnknownStatePolicy::Reject),
            other => Err(format!("unknown state policy: {}", other)),
        }
    }
}

/// Tunables for the transition engine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineOptions {
    /// Handling of present states missing from the definition
    #[serde(default)]
    pub unknown_present_state: UnknownStatePolicy,
}

/// Applies actions to workflow instances
pub struct TransitionEngine {
    /// Repository for workflow definitions
    definition_repo: Arc<dyn WorkflowDefinitionRepository>,

    /// Repository for workflow instances
    instance_repo: Arc<dyn WorkflowInstanceRepository>,

    /// One lock per instance; serialises read-modify-write of a single instance
    instance_locks: DashMap<InstanceId, Arc<Mutex<()>>>,

    options: EngineOptions,
}

impl TransitionEngine {
    /// Create a new transition engine
    pub fn new(
        definition_repo: Arc<dyn WorkflowDefinitionRepository>,
        instance_repo: Arc<dyn WorkflowInstanceRepository>,
        options: EngineOptions,
    ) -> Self {
        Self {
            definition_repo,
            instance_repo,
            instance_locks: DashMap::new(),
            options,
        }
    }

    /// Engine options
    pub fn options(&self) -> EngineOptions {
        self.options
    }

    /// Execute `action_id` against an instance.
    ///
    /// On success the returned instance has one more history entry and sits
    /// in the action's destination state. On failure the stored instance is
    /// untouched.
    pub async fn execute_action(
        &self,
        instance_id: &InstanceId,
        action_id: &ActionId,
    ) -> Result<WorkflowInstance, CoreError> {
        if instance_id.is_nil() {
            return Err(CoreError::InvalidInput("Instance ID cannot be empty.".to_string()));
        }
        if action_id.0.trim().is_empty() {
            return Err(CoreError::InvalidInput(
                "Action ID cannot be null or empty.".to_string(),
            ));
        }

        let lock = self.lock_for(instance_id);
        let result = {
            let _guard = lock.lock().await;
            self.apply(instance_id, action_id).await
        };
        self.release_lock(instance_id, lock);

        match &result {
            Ok(instance) => info!(
                instance_id = %instance_id,
                action_id = %action_id,
                present_state = %instance.present_state(),
                "Action executed"
            ),
            Err(err) => debug!(
                instance_id = %instance_id,
                action_id = %action_id,
                error = %err,
                "Action rejected"
            ),
        }
        result
    }

    fn lock_for(&self, instance_id: &InstanceId) -> Arc<Mutex<()>> {
        self.instance_locks
            .entry(*instance_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Drop the table entry once no other caller holds or waits on it
    fn release_lock(&self, instance_id: &InstanceId, lock: Arc<Mutex<()>>) {
        drop(lock);
        self.instance_locks
            .remove_if(instance_id, |_, entry| Arc::strong_count(entry) == 1);
    }

    async fn apply(
        &self,
        instance_id: &InstanceId,
        action_id: &ActionId,
    ) -> Result<WorkflowInstance, CoreError> {
        let mut instance = self
            .instance_repo
            .find_by_id(instance_id)
            .await?
            .ok_or_else(|| CoreError::InstanceNotFound(instance_id.to_string()))?;

        let definition = self
            .definition_repo
            .find_by_id(instance.definition_id())
            .await?
            .ok_or_else(|| CoreError::DanglingDefinition(instance.definition_id().0.clone()))?;

        match definition.find_state(instance.present_state()) {
            Some(state) if state.is_final => {
                return Err(CoreError::FinalState(state.id.0.clone()));
            }
            Some(_) => {}
            None => match self.options.unknown_present_state {
                UnknownStatePolicy::Permissive => warn!(
                    instance_id = %instance_id,
                    present_state = %instance.present_state(),
                    "Present state not declared by definition; skipping final-state check"
                ),
                UnknownStatePolicy::Reject => {
                    return Err(CoreError::UnknownPresentState(
                        instance.present_state().0.clone(),
                    ));
                }
            },
        }

        let action = definition
            .find_action(action_id)
            .ok_or_else(|| CoreError::ActionNotFound(action_id.0.clone()))?;

        if !action.origin_states.contains(instance.present_state()) {
            return Err(CoreError::ActionNotValidForState(action_id.0.clone()));
        }

        if !action.enabled {
            return Err(CoreError::ActionDisabled(action_id.0.clone()));
        }

        // The destination is trusted as declared and not checked against the state list
        let change = Change {
            action_taken: action.name.clone(),
            previous_state: instance.present_state().clone(),
            next_state: action.destination_state.clone(),
            timestamp: Utc::now(),
        };
        instance.record_transition(change);

        self.instance_repo.save(&instance).await?;
        Ok(instance)
    }
}
