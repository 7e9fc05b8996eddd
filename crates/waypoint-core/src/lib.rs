//!
//! Waypoint Core - workflow state-machine engine for the Waypoint Platform
//!
//! This crate defines workflow definitions (named states joined by named
//! actions), running workflow instances, the repository interfaces they are
//! stored behind, and the services that validate definitions, start
//! instances and move them from state to state.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Domain layer - core business models, entities, and rules
pub mod domain;

/// Application services - core application logic
pub mod application;

/// Error types
pub mod error;

pub use error::{CoreError, ErrorKind};

// Re-export main API types for easy use
pub use application::transition_engine::{EngineOptions, UnknownStatePolicy};
pub use application::workflow_engine::WorkflowEngine;
pub use domain::repository::{WorkflowDefinitionRepository, WorkflowInstanceRepository};
pub use domain::workflow_definition::{
    ActionDefinition, ActionId, DefinitionId, StateDefinition, StateId, WorkflowDefinition,
};
pub use domain::workflow_instance::{Change, InstanceId, InstanceSummary, WorkflowInstance};
