use std::sync::Arc;

use async_trait::async_trait;
use mockall::mock;
use waypoint_core::{
    domain::repository::memory::MemoryWorkflowInstanceRepository, ActionDefinition, ActionId,
    CoreError, DefinitionId, EngineOptions, ErrorKind, InstanceId, StateDefinition, StateId,
    WorkflowDefinition, WorkflowDefinitionRepository, WorkflowEngine, WorkflowInstance,
};

fn state(id: &str, is_initial: bool, is_final: bool) -> StateDefinition {
    StateDefinition {
        id: StateId::from(id),
        name: id.to_string(),
        description: String::new(),
        is_initial,
        is_final,
        enabled: true,
    }
}

fn leave_request() -> WorkflowDefinition {
    WorkflowDefinition {
        id: DefinitionId("leave_request".to_string()),
        name: "Leave Request".to_string(),
        description: "Employee leave approval".to_string(),
        states: vec![
            state("draft", true, false),
            state("approved", false, true),
            state("rejected", false, true),
        ],
        actions: vec![
            ActionDefinition {
                id: ActionId("approve".to_string()),
                name: "Approve".to_string(),
                description: String::new(),
                origin_states: vec![StateId::from("draft")],
                destination_state: StateId::from("approved"),
                enabled: true,
            },
            ActionDefinition {
                id: ActionId("reject".to_string()),
                name: "Reject".to_string(),
                description: String::new(),
                origin_states: vec![StateId::from("draft")],
                destination_state: StateId::from("rejected"),
                enabled: true,
            },
        ],
    }
}

fn approve() -> ActionId {
    ActionId("approve".to_string())
}

#[tokio::test]
async fn test_leave_request_scenario() {
    let engine = WorkflowEngine::in_memory();
    engine.create_definition(leave_request()).await.unwrap();

    let instance = engine
        .start_instance(&DefinitionId("leave_request".to_string()))
        .await
        .unwrap();
    assert_eq!(instance.present_state().0, "draft");
    assert!(instance.history().is_empty());

    let approved = engine.execute_action(&instance.id(), &approve()).await.unwrap();
    assert_eq!(approved.present_state().0, "approved");
    assert_eq!(approved.history().len(), 1);
    assert_eq!(approved.history()[0].action_taken, "Approve");
    assert_eq!(approved.history()[0].previous_state.0, "draft");
    assert_eq!(approved.history()[0].next_state.0, "approved");

    // Approved is final, so a repeat is refused and nothing changes
    let again = engine.execute_action(&instance.id(), &approve()).await;
    assert!(matches!(again, Err(CoreError::FinalState(_))));
    assert_eq!(again.unwrap_err().kind(), ErrorKind::IllegalTransition);

    let stored = engine.get_instance(&instance.id()).await.unwrap();
    assert_eq!(stored, approved);
}

#[tokio::test]
async fn test_action_valid_only_from_origin_fails_second_time() {
    let engine = WorkflowEngine::in_memory();
    let mut definition = leave_request();
    definition.id = DefinitionId("two_step".to_string());
    definition.states.push(state("review", false, false));
    definition.actions[0].destination_state = StateId::from("review");
    engine.create_definition(definition).await.unwrap();

    let instance = engine
        .start_instance(&DefinitionId("two_step".to_string()))
        .await
        .unwrap();

    let first = engine.execute_action(&instance.id(), &approve()).await.unwrap();
    assert_eq!(first.present_state().0, "review");

    let second = engine.execute_action(&instance.id(), &approve()).await;
    assert_eq!(
        second,
        Err(CoreError::ActionNotValidForState("approve".to_string()))
    );
    assert_eq!(
        engine.get_instance(&instance.id()).await.unwrap().history().len(),
        1
    );
}

#[tokio::test]
async fn test_instances_are_independent() {
    let engine = WorkflowEngine::in_memory();
    engine.create_definition(leave_request()).await.unwrap();
    let id = DefinitionId("leave_request".to_string());

    let a = engine.start_instance(&id).await.unwrap();
    let b = engine.start_instance(&id).await.unwrap();

    engine.execute_action(&a.id(), &approve()).await.unwrap();
    engine
        .execute_action(&b.id(), &ActionId("reject".to_string()))
        .await
        .unwrap();

    let mut states: Vec<String> = engine
        .list_instances()
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.present_state.0)
        .collect();
    states.sort();
    assert_eq!(states, vec!["approved".to_string(), "rejected".to_string()]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_executions_on_one_instance_are_serialised() {
    let engine = WorkflowEngine::in_memory();
    engine.create_definition(leave_request()).await.unwrap();
    let instance = engine
        .start_instance(&DefinitionId("leave_request".to_string()))
        .await
        .unwrap();

    let mut handles = Vec::new();
    for i in 0..32 {
        let engine = engine.clone();
        let id = instance.id();
        let action = if i % 2 == 0 { "approve" } else { "reject" };
        handles.push(tokio::spawn(async move {
            engine.execute_action(&id, &ActionId(action.to_string())).await
        }));
    }

    let results = futures::future::join_all(handles).await;
    let successes = results
        .into_iter()
        .map(|joined| joined.unwrap())
        .filter(|result| result.is_ok())
        .count();
    assert_eq!(successes, 1);

    let stored = engine.get_instance(&instance.id()).await.unwrap();
    assert_eq!(stored.history().len(), 1);
    assert_eq!(stored.history()[0].next_state, *stored.present_state());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_definition_creation_single_winner() {
    let engine = WorkflowEngine::in_memory();

    let mut handles = Vec::new();
    for i in 0..16 {
        let engine = engine.clone();
        handles.push(tokio::spawn(async move {
            let mut definition = leave_request();
            definition.name = format!("writer-{}", i);
            engine.create_definition(definition).await
        }));
    }

    let results = futures::future::join_all(handles).await;
    let (ok, err): (Vec<_>, Vec<_>) = results
        .into_iter()
        .map(|joined| joined.unwrap())
        .partition(|result| result.is_ok());

    assert_eq!(ok.len(), 1);
    assert!(err
        .iter()
        .all(|result| matches!(result, Err(CoreError::DefinitionAlreadyExists(_)))));
    assert_eq!(engine.list_definitions().await.unwrap().len(), 1);
}

mock! {
    pub DefinitionCatalog {}

    #[async_trait]
    impl WorkflowDefinitionRepository for DefinitionCatalog {
        async fn find_by_id(&self, id: &DefinitionId) -> Result<Option<WorkflowDefinition>, CoreError>;
        async fn insert_if_absent(&self, definition: &WorkflowDefinition) -> Result<bool, CoreError>;
        async fn save(&self, definition: &WorkflowDefinition) -> Result<(), CoreError>;
        async fn find_all(&self) -> Result<Vec<WorkflowDefinition>, CoreError>;
    }
}

#[tokio::test]
async fn test_catalog_failure_is_propagated() {
    let mut catalog = MockDefinitionCatalog::new();
    catalog
        .expect_find_by_id()
        .returning(|_| Err(CoreError::StateStoreError("catalog offline".to_string())));
    catalog.expect_insert_if_absent().times(0);

    let engine = WorkflowEngine::new(
        Arc::new(catalog),
        Arc::new(MemoryWorkflowInstanceRepository::new()),
        EngineOptions::default(),
    );

    let created = engine.create_definition(leave_request()).await;
    assert_eq!(
        created,
        Err(CoreError::StateStoreError("catalog offline".to_string()))
    );

    let started = engine
        .start_instance(&DefinitionId("leave_request".to_string()))
        .await;
    assert_eq!(started.unwrap_err().kind(), ErrorKind::Storage);
}

#[tokio::test]
async fn test_lost_insert_race_reports_conflict() {
    // The fast-path lookup misses but the conditional insert finds the slot taken
    let mut catalog = MockDefinitionCatalog::new();
    catalog.expect_find_by_id().returning(|_| Ok(None));
    catalog.expect_insert_if_absent().times(1).returning(|_| Ok(false));

    let instances = Arc::new(MemoryWorkflowInstanceRepository::new());
    let engine = WorkflowEngine::new(Arc::new(catalog), instances.clone(), EngineOptions::default());

    let created = engine.create_definition(leave_request()).await;
    assert_eq!(
        created,
        Err(CoreError::DefinitionAlreadyExists("leave_request".to_string()))
    );
    assert!(instances.is_empty());
}

#[tokio::test]
async fn test_execute_on_unknown_instance() {
    let engine = WorkflowEngine::in_memory();
    let result = engine
        .execute_action(&InstanceId::generate(), &approve())
        .await;
    assert_eq!(result.unwrap_err().kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_instance_roundtrips_through_json() {
    let engine = WorkflowEngine::in_memory();
    engine.create_definition(leave_request()).await.unwrap();
    let instance = engine
        .start_instance(&DefinitionId("leave_request".to_string()))
        .await
        .unwrap();
    let approved = engine.execute_action(&instance.id(), &approve()).await.unwrap();

    let json = serde_json::to_string(&approved).unwrap();
    let decoded: WorkflowInstance = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, approved);
}

#[tokio::test]
async fn test_execute_succeeds_exactly_when_guards_hold() {
    let mut definition = leave_request();
    definition.id = DefinitionId("guarded".to_string());
    definition.states.push(state("review", false, false));
    definition.actions.push(ActionDefinition {
        id: ActionId("escalate".to_string()),
        name: "Escalate".to_string(),
        description: String::new(),
        origin_states: vec![StateId::from("draft"), StateId::from("review")],
        destination_state: StateId::from("review"),
        enabled: true,
    });
    definition.actions.push(ActionDefinition {
        id: ActionId("withdraw".to_string()),
        name: "Withdraw".to_string(),
        description: String::new(),
        origin_states: vec![StateId::from("draft")],
        destination_state: StateId::from("rejected"),
        enabled: false,
    });

    let engine = WorkflowEngine::in_memory();
    engine.create_definition(definition.clone()).await.unwrap();
    let id = DefinitionId("guarded".to_string());

    for action in &definition.actions {
        // Each probe starts from draft, optionally moved to review first
        for via_review in [false, true] {
            let instance = engine.start_instance(&id).await.unwrap();
            if via_review {
                engine
                    .execute_action(&instance.id(), &ActionId("escalate".to_string()))
                    .await
                    .unwrap();
            }
            let before = engine.get_instance(&instance.id()).await.unwrap();
            let present = definition.find_state(before.present_state()).unwrap();

            let expected = !present.is_final
                && action.origin_states.contains(before.present_state())
                && action.enabled;

            let result = engine.execute_action(&instance.id(), &action.id).await;
            assert_eq!(
                result.is_ok(),
                expected,
                "action {} from {}",
                action.id,
                before.present_state()
            );

            let after = engine.get_instance(&instance.id()).await.unwrap();
            if expected {
                assert_eq!(after.present_state(), &action.destination_state);
                assert_eq!(after.history().len(), before.history().len() + 1);
            } else {
                assert_eq!(after, before);
            }
        }
    }
}
