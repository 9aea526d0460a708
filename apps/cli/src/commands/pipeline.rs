use super::exit_code;
use crate::app::build_orchestrator;
use crate::input::{print_json, read_json};
use dealflow_core::Settings;
use dealflow_orchestrator::{LeadToContractPipeline, PipelineStatus, Task};
use std::process::ExitCode;
use std::sync::Arc;

/// Run the lead-to-contract pipeline. A rejected lead is not a failure.
pub async fn execute(settings: Arc<Settings>, deal: &str) -> anyhow::Result<ExitCode> {
    let deal = Task::try_from(read_json(deal)?)?;
    let orchestrator = build_orchestrator(&settings).await?;

    let report = LeadToContractPipeline::new(orchestrator).run(&deal).await;
    print_json(&report)?;

    Ok(exit_code(report.status != PipelineStatus::Failed))
}
