//! Caller-defined workflows.
//!
//! Steps run strictly in order. A step may receive the previous step's full
//! result under the `context` key. The first error on a step without
//! `continue_on_error` stops the workflow.

use crate::Orchestrator;
use crate::error::{OrchestrationError, Result};
use crate::executor::panic_message;
use crate::result::AgentResult;
use crate::task::Task;
use chrono::{DateTime, Utc};
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// One step of a workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowStep {
    pub agent: String,
    #[serde(default)]
    pub task: Task,
    #[serde(default)]
    pub use_previous_results: bool,
    #[serde(default)]
    pub continue_on_error: bool,
}

impl WorkflowStep {
    #[must_use]
    pub fn new(agent: impl Into<String>, task: Task) -> Self {
        Self { agent: agent.into(), task, use_previous_results: false, continue_on_error: false }
    }

    /// Injects the previous step's result as `context`.
    #[must_use]
    pub const fn use_previous_results(mut self) -> Self {
        self.use_previous_results = true;
        self
    }

    /// Lets the workflow continue if this step fails.
    #[must_use]
    pub const fn continue_on_error(mut self) -> Self {
        self.continue_on_error = true;
        self
    }
}

/// An ordered list of steps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub steps: Vec<WorkflowStep>,
}

impl Workflow {
    #[must_use]
    pub fn new(steps: Vec<WorkflowStep>) -> Self {
        Self { name: None, steps }
    }

    #[must_use]
    pub fn named(name: impl Into<String>, steps: Vec<WorkflowStep>) -> Self {
        Self { name: Some(name.into()), steps }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowStatus {
    /// Still executing; never observed in history.
    Running,
    /// Every step succeeded or was allowed to fail.
    Completed,
    /// A step failed without `continue_on_error`.
    Failed,
    /// The workflow loop itself faulted.
    Error,
    /// Cancelled before all steps started.
    Cancelled,
}

/// The outcome of one workflow run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowResult {
    pub workflow_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub status: WorkflowStatus,
    pub steps: Vec<AgentResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub started_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl WorkflowResult {
    #[must_use]
    pub fn new(workflow_id: String) -> Self {
        Self {
            workflow_id,
            name: None,
            status: WorkflowStatus::Running,
            steps: Vec::new(),
            error: None,
            started_at: Utc::now(),
            completed_at: None,
        }
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == WorkflowStatus::Completed
    }
}

impl Orchestrator {
    /// Runs a workflow to completion and records it in history.
    pub async fn execute_workflow(&self, workflow: &Workflow) -> Arc<WorkflowResult> {
        self.execute_workflow_with_cancel(workflow, &CancellationToken::new()).await
    }

    /// Runs a workflow, checking `cancel` before every step.
    ///
    /// A step already running when cancellation is requested finishes
    /// normally; no later step starts. A panic in the step loop itself ends
    /// the workflow with `status = error`. The result is recorded in history
    /// whatever the outcome.
    pub async fn execute_workflow_with_cancel(
        &self,
        workflow: &Workflow,
        cancel: &CancellationToken,
    ) -> Arc<WorkflowResult> {
        let mut result = WorkflowResult::new(format!("workflow_{}", Uuid::new_v4().simple()));
        result.name.clone_from(&workflow.name);

        info!(
            workflow_id = %result.workflow_id,
            steps = workflow.steps.len(),
            "Starting workflow"
        );

        let outcome = AssertUnwindSafe(self.run_steps(workflow, cancel, &mut result))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| {
                Err(OrchestrationError::Panicked(panic_message(panic.as_ref())))
            });

        match outcome {
            Ok(status) => result.status = status,
            Err(OrchestrationError::Cancelled { before_step }) => {
                info!(workflow_id = %result.workflow_id, before_step, "Workflow cancelled");
                result.status = WorkflowStatus::Cancelled;
                result.error = Some(OrchestrationError::Cancelled { before_step }.to_string());
            }
            Err(e) => {
                error!(workflow_id = %result.workflow_id, error = %e, "Workflow faulted");
                result.status = WorkflowStatus::Error;
                result.error = Some(e.to_string());
            }
        }
        result.completed_at = Some(Utc::now());

        info!(
            workflow_id = %result.workflow_id,
            status = ?result.status,
            recorded_steps = result.steps.len(),
            "Workflow finished"
        );

        self.history.append(result).await
    }

    async fn run_steps(
        &self,
        workflow: &Workflow,
        cancel: &CancellationToken,
        result: &mut WorkflowResult,
    ) -> Result<WorkflowStatus> {
        for (index, step) in workflow.steps.iter().enumerate() {
            let step_number = index + 1;

            if cancel.is_cancelled() {
                return Err(OrchestrationError::Cancelled { before_step: step_number });
            }

            let task = match (step.use_previous_results, result.steps.last()) {
                (true, Some(previous)) => {
                    let context = serde_json::to_value(previous).map_err(|e| {
                        OrchestrationError::ContextInjection { step: step_number, reason: e.to_string() }
                    })?;
                    step.task.with_context(context)
                }
                _ => step.task.clone(),
            };

            debug!(
                workflow_id = %result.workflow_id,
                step_number,
                agent = %step.agent,
                "Running workflow step"
            );

            let mut outcome = self.run_agent(&step.agent, &task).await;
            outcome.step_number = Some(step_number);
            let failed = !outcome.is_success();
            result.steps.push(outcome);

            if failed && !step.continue_on_error {
                warn!(
                    workflow_id = %result.workflow_id,
                    step_number,
                    agent = %step.agent,
                    "Workflow step failed; stopping"
                );
                return Ok(WorkflowStatus::Failed);
            }
        }

        Ok(WorkflowStatus::Completed)
    }
}
