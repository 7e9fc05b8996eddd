/// Workflow definition domain models
pub mod workflow_definition;

/// Workflow instance domain models
pub mod workflow_instance;

/// Repository interfaces
pub mod repository;
