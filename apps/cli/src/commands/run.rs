use super::exit_code;
use crate::app::build_orchestrator;
use crate::input::{print_json, read_json};
use dealflow_core::Settings;
use dealflow_orchestrator::Task;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::warn;

/// Run one agent and print its result.
pub async fn execute(settings: Arc<Settings>, agent: &str, task: &str) -> anyhow::Result<ExitCode> {
    let task = Task::try_from(read_json(task)?)?;
    let orchestrator = build_orchestrator(&settings).await?;

    let result = orchestrator.run_agent(agent, &task).await;
    if let Some(error) = &result.error {
        warn!(agent, error = %error, "Agent run failed");
    }
    print_json(&result)?;

    Ok(exit_code(result.is_success()))
}
