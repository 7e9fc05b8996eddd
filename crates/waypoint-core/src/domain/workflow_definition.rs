use crate::CoreError;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Value object: Workflow definition ID
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DefinitionId(pub String);

/// Value object: State ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StateId(pub String);

/// Value object: Action ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionId(pub String);

impl fmt::Display for DefinitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StateId {
    fn from(value: &str) -> Self {
        StateId(value.to_string())
    }
}

/// A node in the workflow graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateDefinition {
    /// Identifier, unique within a definition
    pub id: StateId,

    /// Display name
    pub name: String,

    /// Description of the state
    #[serde(default)]
    pub description: String,

    /// Whether instances start here
    #[serde(default)]
    pub is_initial: bool,

    /// Whether this state admits no further actions
    #[serde(default)]
    pub is_final: bool,

    /// Whether the state is enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

/// A labeled transition with one or more origin states and a single destination
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionDefinition {
    /// Identifier of the action
    pub id: ActionId,

    /// Display name, recorded in the instance history
    pub name: String,

    /// Description of what the action does
    #[serde(default)]
    pub description: String,

    /// States from which the action may fire
    pub origin_states: Vec<StateId>,

    /// State the instance moves to
    pub destination_state: StateId,

    /// Whether the action may currently fire
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Immutable workflow template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowDefinition {
    /// Globally unique identifier, also the catalog key.
    ///
    /// A missing or null identifier decodes as blank and is rejected by
    /// [`WorkflowDefinition::validate_id`].
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: DefinitionId,

    /// Human-readable name
    pub name: String,

    /// Description of the workflow
    #[serde(default)]
    pub description: String,

    /// States in declaration order
    pub states: Vec<StateDefinition>,

    /// Actions in declaration order
    #[serde(default)]
    pub actions: Vec<ActionDefinition>,
}

impl WorkflowDefinition {
    /// The single initial state, or `None` if there are zero or several
    pub fn initial_state(&self) -> Option<&StateDefinition> {
        let mut initial = self.states.iter().filter(|s| s.is_initial);
        match (initial.next(), initial.next()) {
            (Some(state), None) => Some(state),
            _ => None,
        }
    }

    /// First state with the given identifier
    pub fn find_state(&self, id: &StateId) -> Option<&StateDefinition> {
        self.states.iter().find(|s| &s.id == id)
    }

    /// First action with the given identifier
    pub fn find_action(&self, id: &ActionId) -> Option<&ActionDefinition> {
        self.actions.iter().find(|a| &a.id == id)
    }

    /// Validate the definition on its own, without consulting the catalog.
    ///
    /// Checks, stopping at the first failure: the identifier is non-blank,
    /// exactly one state is initial, and state identifiers are distinct.
    pub fn validate_structure(&self) -> Result<(), CoreError> {
        self.validate_id()?;

        if self.states.iter().filter(|s| s.is_initial).count() != 1 {
            return Err(CoreError::ValidationError(
                "A workflow definition must have exactly one initial state.".to_string(),
            ));
        }

        let mut state_ids = HashSet::with_capacity(self.states.len());
        if !self.states.iter().all(|s| state_ids.insert(&s.id)) {
            return Err(CoreError::ValidationError(
                "State IDs within a definition must be unique.".to_string(),
            ));
        }

        Ok(())
    }

    /// Check that the identifier is present and non-blank
    pub fn validate_id(&self) -> Result<(), CoreError> {
        if self.id.0.trim().is_empty() {
            return Err(CoreError::InvalidInput(
                "Workflow definition ID cannot be null or empty.".to_string(),
            ));
        }
        Ok(())
    }

    /// Action identifiers declared more than once.
    ///
    /// Lookups resolve to the first declaration, so later duplicates are unreachable.
    pub fn duplicate_action_ids(&self) -> Vec<&ActionId> {
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        for action in &self.actions {
            if !seen.insert(&action.id) && !duplicates.contains(&&action.id) {
                duplicates.push(&action.id);
            }
        }
        duplicates
    }
}
