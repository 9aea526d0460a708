//! Integration tests for workflow execution and history.

use async_trait::async_trait;
use dealflow_orchestrator::{
    Agent, AgentError, ErrorKind, Orchestrator, Payload, Task, Workflow, WorkflowStatus,
    WorkflowStep,
};
use futures::future::join_all;
use serde_json::json;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Echoes its task back, optionally cancelling a token first.
struct EchoAgent {
    name: &'static str,
    required: &'static [&'static str],
    cancel: Option<CancellationToken>,
    broken_validation: bool,
}

impl EchoAgent {
    fn new(name: &'static str) -> Self {
        Self { name, required: &[], cancel: None, broken_validation: false }
    }

    /// Panics in `validate`, which runs before the execution wrapper's guard.
    fn with_broken_validation(mut self) -> Self {
        self.broken_validation = true;
        self
    }

    fn requiring(mut self, keys: &'static [&'static str]) -> Self {
        self.required = keys;
        self
    }

    fn cancelling(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

#[async_trait]
impl Agent for EchoAgent {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        "Echoes its task"
    }

    fn validate(&self, task: &Task) -> bool {
        assert!(!self.broken_validation, "validation table missing for {}", self.name);
        task.has_keys(self.required)
    }

    async fn execute(&self, task: &Task) -> Result<Payload, AgentError> {
        if let Some(token) = &self.cancel {
            token.cancel();
        }
        let mut payload = Payload::new();
        payload.insert("echo".to_string(), json!(self.name));
        payload.insert("task".to_string(), task.clone().into_value());
        payload.insert("tokens_used".to_string(), json!(10));
        Ok(payload)
    }
}

async fn orchestrator_with(agents: Vec<EchoAgent>) -> Orchestrator {
    let orchestrator = Orchestrator::default();
    for agent in agents {
        orchestrator.register(Arc::new(agent)).await;
    }
    orchestrator
}

fn step(agent: &str) -> WorkflowStep {
    WorkflowStep::new(agent, Task::new().with("input", agent))
}

#[tokio::test]
async fn test_failed_step_stops_workflow() {
    let orchestrator = orchestrator_with(vec![EchoAgent::new("A"), EchoAgent::new("C")]).await;
    let workflow = Workflow::new(vec![step("A"), step("B"), step("C")]);

    let result = orchestrator.execute_workflow(&workflow).await;

    assert_eq!(result.status, WorkflowStatus::Failed);
    assert_eq!(result.steps.len(), 2);
    assert!(result.steps[0].is_success());
    assert_eq!(result.steps[1].error_kind, Some(ErrorKind::NotFound));
    assert_eq!(result.steps[1].error.as_deref(), Some("Agent 'B' not found"));
    assert_eq!(result.steps[1].step_number, Some(2));
    assert!(result.workflow_id.starts_with("workflow_"));
    assert!(result.completed_at.is_some());
    assert_eq!(orchestrator.agent_stats("C").await.unwrap().execution_count, 0);
}

#[tokio::test]
async fn test_continue_on_error_runs_every_step() {
    let orchestrator = orchestrator_with(vec![EchoAgent::new("A"), EchoAgent::new("C")]).await;
    let workflow = Workflow::new(vec![step("A"), step("B").continue_on_error(), step("C")]);

    let result = orchestrator.execute_workflow(&workflow).await;

    assert_eq!(result.status, WorkflowStatus::Completed);
    assert_eq!(result.steps.len(), 3);
    assert!(!result.steps[1].is_success());
    assert!(result.steps[2].is_success());
    let numbers: Vec<_> = result.steps.iter().map(|s| s.step_number).collect();
    assert_eq!(numbers, vec![Some(1), Some(2), Some(3)]);
}

#[tokio::test]
async fn test_validation_failure_is_a_step_error() {
    let orchestrator =
        orchestrator_with(vec![EchoAgent::new("Strict").requiring(&["address"])]).await;
    let workflow = Workflow::new(vec![step("Strict")]);

    let result = orchestrator.execute_workflow(&workflow).await;

    assert_eq!(result.status, WorkflowStatus::Failed);
    assert_eq!(result.steps[0].error_kind, Some(ErrorKind::Validation));
    assert_eq!(result.steps[0].error.as_deref(), Some("Task validation failed"));
    assert_eq!(orchestrator.agent_stats("Strict").await.unwrap().execution_count, 0);
}

#[tokio::test]
async fn test_context_injection() {
    let orchestrator = orchestrator_with(vec![EchoAgent::new("A"), EchoAgent::new("B")]).await;
    let workflow = Workflow::new(vec![step("A"), step("B").use_previous_results()]);

    let result = orchestrator.execute_workflow(&workflow).await;

    assert!(result.is_completed());
    assert!(result.steps[0].get("task").unwrap().get("context").is_none());

    let context = &result.steps[1].get("task").unwrap()["context"];
    assert_eq!(context["agent"], json!("A"));
    assert_eq!(context["status"], json!("success"));
    assert_eq!(context["echo"], json!("A"));
    assert_eq!(context["step_number"], json!(1));
    assert_eq!(context["execution_id"], json!(result.steps[0].execution_id.clone().unwrap()));
}

#[tokio::test]
async fn test_first_step_gets_no_context() {
    let orchestrator = orchestrator_with(vec![EchoAgent::new("A")]).await;
    let workflow = Workflow::new(vec![step("A").use_previous_results()]);

    let result = orchestrator.execute_workflow(&workflow).await;
    assert!(result.steps[0].get("task").unwrap().get("context").is_none());
}

#[tokio::test]
async fn test_empty_workflow_completes() {
    let orchestrator = Orchestrator::default();
    let result = orchestrator.execute_workflow(&Workflow::named("noop", Vec::new())).await;

    assert_eq!(result.status, WorkflowStatus::Completed);
    assert_eq!(result.name.as_deref(), Some("noop"));
    assert!(result.steps.is_empty());
}

#[tokio::test]
async fn test_cancellation_between_steps() {
    let token = CancellationToken::new();
    let orchestrator = orchestrator_with(vec![
        EchoAgent::new("A").cancelling(token.clone()),
        EchoAgent::new("B"),
    ])
    .await;
    let workflow = Workflow::new(vec![step("A"), step("B")]);

    let result = orchestrator.execute_workflow_with_cancel(&workflow, &token).await;

    assert_eq!(result.status, WorkflowStatus::Cancelled);
    assert_eq!(result.steps.len(), 1);
    assert!(result.steps[0].is_success());
    assert_eq!(result.error.as_deref(), Some("Workflow cancelled before step 2"));
    assert_eq!(orchestrator.agent_stats("B").await.unwrap().execution_count, 0);

    let history = orchestrator.history().await;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].status, WorkflowStatus::Cancelled);
}

#[tokio::test]
async fn test_cancelled_before_start() {
    let token = CancellationToken::new();
    token.cancel();
    let orchestrator = orchestrator_with(vec![EchoAgent::new("A")]).await;

    let result = orchestrator
        .execute_workflow_with_cancel(&Workflow::new(vec![step("A")]), &token)
        .await;

    assert_eq!(result.status, WorkflowStatus::Cancelled);
    assert!(result.steps.is_empty());
}

#[tokio::test]
async fn test_history_records_every_run() {
    let orchestrator = Arc::new(orchestrator_with(vec![EchoAgent::new("A")]).await);
    let workflow = Workflow::new(vec![step("A")]);

    let runs = (0..10).map(|_| {
        let orchestrator = Arc::clone(&orchestrator);
        let workflow = workflow.clone();
        tokio::spawn(async move { orchestrator.execute_workflow(&workflow).await })
    });
    let results: Vec<_> = join_all(runs).await.into_iter().map(Result::unwrap).collect();

    let history = orchestrator.history().await;
    assert_eq!(history.len(), 10);
    for result in &results {
        assert!(history.iter().any(|h| h.workflow_id == result.workflow_id));
    }

    let stats = orchestrator.agent_stats("A").await.unwrap();
    assert_eq!(stats.execution_count, 10);
    assert_eq!(stats.total_tokens_used, 100);
}

#[tokio::test]
async fn test_sequential_runs_are_recorded_in_order() {
    let orchestrator = orchestrator_with(vec![EchoAgent::new("A")]).await;
    let workflow = Workflow::new(vec![step("A"), step("B")]);

    let mut submitted = Vec::new();
    for _ in 0..5 {
        submitted.push(orchestrator.execute_workflow(&workflow).await.workflow_id.clone());
    }

    let recorded: Vec<String> =
        orchestrator.history().await.iter().map(|h| h.workflow_id.clone()).collect();
    assert_eq!(recorded, submitted);
}

#[tokio::test]
async fn test_loop_panic_sets_error_status() {
    let orchestrator = orchestrator_with(vec![
        EchoAgent::new("A"),
        EchoAgent::new("Broken").with_broken_validation(),
        EchoAgent::new("C"),
    ])
    .await;
    let workflow = Workflow::new(vec![step("A"), step("Broken").continue_on_error(), step("C")]);

    let result = orchestrator.execute_workflow(&workflow).await;

    assert_eq!(result.status, WorkflowStatus::Error);
    assert_eq!(result.steps.len(), 1);
    assert!(result.steps[0].is_success());
    let error = result.error.as_deref().unwrap();
    assert!(error.starts_with("Workflow panicked:"), "{error}");
    assert!(error.contains("validation table missing for Broken"));
    assert!(result.completed_at.is_some());
    assert_eq!(orchestrator.agent_stats("C").await.unwrap().execution_count, 0);

    let history = orchestrator.history().await;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].workflow_id, result.workflow_id);
    assert_eq!(history[0].status, WorkflowStatus::Error);
}

#[tokio::test]
async fn test_workflow_from_json() {
    let orchestrator = orchestrator_with(vec![EchoAgent::new("A"), EchoAgent::new("B")]).await;
    let workflow: Workflow = serde_json::from_value(json!({
        "name": "from-file",
        "steps": [
            {"agent": "A", "task": {"lead_id": "lead_1"}},
            {"agent": "B", "use_previous_results": true}
        ]
    }))
    .unwrap();

    let result = orchestrator.execute_workflow(&workflow).await;
    assert!(result.is_completed());
    assert_eq!(result.steps[1].get("task").unwrap()["context"]["task"]["lead_id"], json!("lead_1"));
}
