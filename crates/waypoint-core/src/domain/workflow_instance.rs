use crate::domain::workflow_definition::{DefinitionId, StateId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Value object: Workflow instance ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstanceId(pub Uuid);

impl InstanceId {
    /// Generate a fresh random identifier
    pub fn generate() -> Self {
        InstanceId(Uuid::new_v4())
    }

    /// True for the all-zero identifier, which never names an instance
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for InstanceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(InstanceId)
    }
}

/// Audit record of a single transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Change {
    /// Display name of the action that fired
    pub action_taken: String,

    /// State before the transition
    pub previous_state: StateId,

    /// State after the transition
    pub next_state: StateId,

    /// When the transition happened
    pub timestamp: DateTime<Utc>,
}

/// Aggregate: a running execution of a workflow definition
///
/// The present state and history change only through the transition engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowInstance {
    id: InstanceId,
    definition_id: DefinitionId,
    present_state: StateId,
    history: Vec<Change>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl WorkflowInstance {
    /// Create a new instance positioned at `initial_state` with an empty history
    pub fn new(definition_id: DefinitionId, initial_state: StateId) -> Self {
        let now = Utc::now();
        Self {
            id: InstanceId::generate(),
            definition_id,
            present_state: initial_state,
            history: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Unique identifier
    pub fn id(&self) -> InstanceId {
        self.id
    }

    /// Identifier of the definition this instance executes
    pub fn definition_id(&self) -> &DefinitionId {
        &self.definition_id
    }

    /// Current state
    pub fn present_state(&self) -> &StateId {
        &self.present_state
    }

    /// Transitions in the order they occurred
    pub fn history(&self) -> &[Change] {
        &self.history
    }

    /// Creation timestamp
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Timestamp of the last transition, or creation
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// List projection of this instance
    pub fn summary(&self) -> InstanceSummary {
        InstanceSummary {
            id: self.id,
            definition_id: self.definition_id.clone(),
            present_state: self.present_state.clone(),
        }
    }

    /// Append `change` and move to its next state in one step
    pub(crate) fn record_transition(&mut self, change: Change) {
        self.present_state = change.next_state.clone();
        self.updated_at = change.timestamp;
        self.history.push(change);
    }
}

/// Summary information about a workflow instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceSummary {
    /// Instance ID
    pub id: InstanceId,

    /// Definition ID
    pub definition_id: DefinitionId,

    /// Current state
    pub present_state: StateId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_instance_starts_at_initial_state() {
        let instance = WorkflowInstance::new(
            DefinitionId("leave_request".to_string()),
            StateId::from("draft"),
        );

        assert!(!instance.id().is_nil());
        assert_eq!(instance.definition_id().0, "leave_request");
        assert_eq!(instance.present_state().0, "draft");
        assert!(instance.history().is_empty());
        assert_eq!(instance.created_at(), instance.updated_at());
    }

    #[test]
    fn test_record_transition_moves_state_and_appends() {
        let mut instance = WorkflowInstance::new(
            DefinitionId("leave_request".to_string()),
            StateId::from("draft"),
        );
        let change = Change {
            action_taken: "Approve".to_string(),
            previous_state: StateId::from("draft"),
            next_state: StateId::from("approved"),
            timestamp: Utc::now(),
        };

        instance.record_transition(change.clone());

        assert_eq!(instance.present_state().0, "approved");
        assert_eq!(instance.history(), &[change.clone()]);
        assert_eq!(instance.updated_at(), change.timestamp);
    }

    #[test]
    fn test_instance_ids_are_unique() {
        let a = InstanceId::generate();
        let b = InstanceId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_parse_instance_id() {
        let id = InstanceId::generate();
        let parsed: InstanceId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert!("not-a-uuid".parse::<InstanceId>().is_err());
    }

    #[test]
    fn test_serialized_shape() {
        let instance = WorkflowInstance::new(
            DefinitionId("leave_request".to_string()),
            StateId::from("draft"),
        );
        let value = serde_json::to_value(&instance).unwrap();

        assert_eq!(value["definitionId"], "leave_request");
        assert_eq!(value["presentState"], "draft");
        assert!(value["history"].as_array().unwrap().is_empty());
        assert_eq!(value["id"], instance.id().to_string());
    }
}
