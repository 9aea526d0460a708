//! Workflow command implementation.

use super::exit_code;
use crate::app::build_orchestrator;
use crate::input::{print_json, read_as};
use dealflow_core::Settings;
use dealflow_orchestrator::{Workflow, WorkflowStatus};
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Run a workflow. The first Ctrl-C stops it before its next step.
pub async fn execute(settings: Arc<Settings>, workflow: &str) -> anyhow::Result<ExitCode> {
    let workflow: Workflow = read_as(workflow, "workflow")?;
    let orchestrator = build_orchestrator(&settings).await?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received; cancelling before the next step");
            on_interrupt.cancel();
        }
    });

    let result = orchestrator.execute_workflow_with_cancel(&workflow, &cancel).await;
    watcher.abort();

    print_json(result.as_ref())?;
    Ok(exit_code(result.status == WorkflowStatus::Completed))
}
