use thiserror::Error;

/// Broad classification of a [`CoreError`], used by transports to pick a status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Blank or empty identifiers
    MalformedInput,
    /// Definition, instance or action absent
    NotFound,
    /// Duplicate definition identifier
    Conflict,
    /// Definition breaks a structural rule
    InvalidStructure,
    /// Transition not permitted from the current state
    IllegalTransition,
    /// Catalog failure
    Storage,
}

/// Core error type for the Waypoint engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Malformed input
    #[error("{0}")]
    InvalidInput(String),

    /// Workflow definition not found
    #[error("Workflow definition with ID '{0}' not found.")]
    DefinitionNotFound(String),

    /// Workflow instance not found
    #[error("Workflow instance not found.")]
    InstanceNotFound(String),

    /// The instance references a definition that is no longer in the catalog
    #[error("Underlying workflow definition for this instance not found.")]
    DanglingDefinition(String),

    /// Action not declared by the definition
    #[error("Action not found in workflow definition.")]
    ActionNotFound(String),

    /// A definition already occupies the identifier
    #[error("Workflow definition with ID '{0}' already exists.")]
    DefinitionAlreadyExists(String),

    /// Structural validation error
    #[error("{0}")]
    ValidationError(String),

    /// A stored definition lacks its initial state
    #[error("Cannot start instance: Definition is invalid and lacks an initial state.")]
    InvalidDefinition(String),

    /// The instance has reached a final state
    #[error("Action cannot be executed as the workflow instance is in a final state.")]
    FinalState(String),

    /// The action does not list the present state as an origin
    #[error("Action is not valid for the current state of the workflow instance.")]
    ActionNotValidForState(String),

    /// The action is disabled
    #[error("This action is currently disabled.")]
    ActionDisabled(String),

    /// The present state is not declared by the definition
    #[error("Present state '{0}' is not declared by the workflow definition.")]
    UnknownPresentState(String),

    /// State store error
    #[error("State store error: {0}")]
    StateStoreError(String),
}

impl CoreError {
    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::InvalidInput(_) => ErrorKind::MalformedInput,
            CoreError::DefinitionNotFound(_)
            | CoreError::InstanceNotFound(_)
            | CoreError::DanglingDefinition(_)
            | CoreError::ActionNotFound(_) => ErrorKind::NotFound,
            CoreError::DefinitionAlreadyExists(_) => ErrorKind::Conflict,
            CoreError::ValidationError(_)
            | CoreError::InvalidDefinition(_)
            | CoreError::UnknownPresentState(_) => ErrorKind::InvalidStructure,
            CoreError::FinalState(_)
            | CoreError::ActionNotValidForState(_)
            | CoreError::ActionDisabled(_) => ErrorKind::IllegalTransition,
            CoreError::StateStoreError(_) => ErrorKind::Storage,
        }
    }
}
