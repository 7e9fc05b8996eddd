/// Definition validation and storage
pub mod definition_service;

/// Instance lifecycle
pub mod instance_service;

/// State-machine transitions
pub mod transition_engine;

/// Engine facade for external systems
pub mod workflow_engine;
