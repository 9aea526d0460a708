//! Agents command implementation.

use super::exit_code;
use crate::app::build_orchestrator;
use crate::input::print_json;
use colored::Colorize;
use dealflow_core::Settings;
use dealflow_orchestrator::AgentStats;
use std::process::ExitCode;
use std::sync::Arc;
use tabled::{Table, Tabled, settings::Style};

#[derive(Tabled)]
struct AgentRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "Runs")]
    executions: u64,
    #[tabled(rename = "Description")]
    description: String,
}

impl From<&AgentStats> for AgentRow {
    fn from(stats: &AgentStats) -> Self {
        Self {
            name: stats.name.clone(),
            model: stats.model.clone(),
            executions: stats.execution_count,
            description: stats.description.clone(),
        }
    }
}

/// List every registered agent.
pub async fn execute(settings: Arc<Settings>, json: bool) -> anyhow::Result<ExitCode> {
    let orchestrator = build_orchestrator(&settings).await?;
    let agents = orchestrator.list_agents().await;

    if json {
        print_json(&agents)?;
        return Ok(exit_code(true));
    }

    println!();
    println!("{}", format!("{} agents registered", agents.len()).bold().green());
    println!();
    let rows: Vec<AgentRow> = agents.iter().map(AgentRow::from).collect();
    println!("{}", Table::new(rows).with(Style::rounded()));

    Ok(exit_code(true))
}
