//! Repository traits for the Waypoint engine
//!
//! The catalog is two independent keyed collections: workflow definitions
//! keyed by their string identifier and workflow instances keyed by their
//! generated identifier. External crates can implement these traits to
//! provide different persistence mechanisms.

use async_trait::async_trait;

use super::workflow_definition::{DefinitionId, WorkflowDefinition};
use super::workflow_instance::{InstanceId, WorkflowInstance};
use crate::CoreError;

/// Repository for workflow definitions
#[async_trait]
pub trait WorkflowDefinitionRepository: Send + Sync {
    /// Find a workflow definition by ID
    async fn find_by_id(&self, id: &DefinitionId) -> Result<Option<WorkflowDefinition>, CoreError>;

    /// Store a definition unless its ID is already taken.
    ///
    /// Returns `false` without storing anything when the ID is occupied. The
    /// check and the insert must be a single atomic step.
    async fn insert_if_absent(&self, definition: &WorkflowDefinition) -> Result<bool, CoreError>;

    /// Store a definition, replacing any previous value under its ID
    async fn save(&self, definition: &WorkflowDefinition) -> Result<(), CoreError>;

    /// Get all workflow definitions
    async fn find_all(&self) -> Result<Vec<WorkflowDefinition>, CoreError>;
}

/// Repository for workflow instances
#[async_trait]
pub trait WorkflowInstanceRepository: Send + Sync {
    /// Find a workflow instance by ID
    async fn find_by_id(&self, id: &InstanceId) -> Result<Option<WorkflowInstance>, CoreError>;

    /// Store an instance unless its ID is already taken
    async fn insert_if_absent(&self, instance: &WorkflowInstance) -> Result<bool, CoreError>;

    /// Store an instance, replacing any previous value under its ID
    async fn save(&self, instance: &WorkflowInstance) -> Result<(), CoreError>;

    /// Get all workflow instances
    async fn find_all(&self) -> Result<Vec<WorkflowInstance>, CoreError>;
}

/// In-memory implementations using concurrent maps
#[cfg(feature = "memory")]
pub mod memory {
    use super::*;
    use dashmap::mapref::entry::Entry;
    use dashmap::DashMap;
    use std::sync::Arc;

    /// In-memory implementation of the workflow definition repository
    #[derive(Clone)]
    pub struct MemoryWorkflowDefinitionRepository {
        definitions: Arc<DashMap<String, WorkflowDefinition>>,
    }

    impl MemoryWorkflowDefinitionRepository {
        /// Create a new memory workflow definition repository
        pub fn new() -> Self {
            Self {
                definitions: Arc::new(DashMap::with_capacity(16)),
            }
        }

        /// Number of stored definitions
        pub fn len(&self) -> usize {
            self.definitions.len()
        }

        /// True when no definitions are stored
        pub fn is_empty(&self) -> bool {
            self.definitions.is_empty()
        }
    }

    impl Default for MemoryWorkflowDefinitionRepository {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl WorkflowDefinitionRepository for MemoryWorkflowDefinitionRepository {
        async fn find_by_id(&self, id: &DefinitionId) -> Result<Option<WorkflowDefinition>, CoreError> {
            Ok(self.definitions.get(&id.0).map(|definition| definition.clone()))
        }

        async fn insert_if_absent(&self, definition: &WorkflowDefinition) -> Result<bool, CoreError> {
            // The entry guard holds the shard lock across the check and the insert
            match self.definitions.entry(definition.id.0.clone()) {
                Entry::Occupied(_) => Ok(false),
                Entry::Vacant(slot) => {
                    slot.insert(definition.clone());
                    Ok(true)
                }
            }
        }

        async fn save(&self, definition: &WorkflowDefinition) -> Result<(), CoreError> {
            self.definitions
                .insert(definition.id.0.clone(), definition.clone());
            Ok(())
        }

        async fn find_all(&self) -> Result<Vec<WorkflowDefinition>, CoreError> {
            Ok(self
                .definitions
                .iter()
                .map(|entry| entry.value().clone())
                .collect())
        }
    }

    /// In-memory implementation of the workflow instance repository
    #[derive(Clone)]
    pub struct MemoryWorkflowInstanceRepository {
        instances: Arc<DashMap<InstanceId, WorkflowInstance>>,
    }

    impl MemoryWorkflowInstanceRepository {
        /// Create a new memory workflow instance repository
        pub fn new() -> Self {
            Self {
                instances: Arc::new(DashMap::with_capacity(64)),
            }
        }

        /// Number of stored instances
        pub fn len(&self) -> usize {
            self.instances.len()
        }

        /// True when no instances are stored
        pub fn is_empty(&self) -> bool {
            self.instances.is_empty()
        }
    }

    impl Default for MemoryWorkflowInstanceRepository {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl WorkflowInstanceRepository for MemoryWorkflowInstanceRepository {
        async fn find_by_id(&self, id: &InstanceId) -> Result<Option<WorkflowInstance>, CoreError> {
            Ok(self.instances.get(id).map(|instance| instance.clone()))
        }

        async fn insert_if_absent(&self, instance: &WorkflowInstance) -> Result<bool, CoreError> {
            match self.instances.entry(instance.id()) {
                Entry::Occupied(_) => Ok(false),
                Entry::Vacant(slot) => {
                    slot.insert(instance.clone());
                    Ok(true)
                }
            }
        }

        async fn save(&self, instance: &WorkflowInstance) -> Result<(), CoreError> {
            self.instances.insert(instance.id(), instance.clone());
            Ok(())
        }

        async fn find_all(&self) -> Result<Vec<WorkflowInstance>, CoreError> {
            Ok(self
                .instances
                .iter()
                .map(|entry| entry.value().clone())
                .collect())
        }
    }

}
