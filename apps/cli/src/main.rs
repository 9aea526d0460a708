//! Dealflow CLI - command-line interface for the Dealflow agent orchestrator
//!
//! Provides a `dealflow` command that lists agents, runs single agents,
//! workflows and the lead-to-contract pipeline, and exposes the scoring and
//! pricing functions directly.

mod app;
mod commands;
mod input;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Dealflow - agent orchestration for real estate wholesaling
#[derive(Parser, Debug)]
#[command(
    name = "dealflow",
    author,
    version,
    about = "Dealflow - agent orchestration for real estate wholesaling"
)]
struct Args {
    /// Log level (trace, debug, info, warn, error). RUST_LOG takes precedence.
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    /// Configuration file (skips ~/.dealflow/config.toml and ./dealflow.toml discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List registered agents and their statistics
    Agents {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run one agent
    Run {
        /// Agent name (e.g. LeadScout)
        agent: String,

        /// Task as a JSON file path or inline JSON object
        #[arg(short, long, default_value = "{}")]
        task: String,
    },

    /// Run a workflow definition
    ///
    /// Steps run in order; Ctrl-C cancels before the next step starts.
    Workflow {
        /// Workflow as a JSON file path or inline JSON object
        workflow: String,
    },

    /// Run the lead-to-contract pipeline for one deal
    Pipeline {
        /// Deal as a JSON file path or inline JSON object
        deal: String,
    },

    /// Score one lead record, or an array of them
    ScoreLead {
        /// Lead as a JSON file path or inline JSON
        lead: String,
    },

    /// Price a cash offer from after-repair value
    PriceOffer {
        /// After-repair value
        #[arg(long)]
        arv: f64,

        /// Repair cost (defaults to the configured value)
        #[arg(long)]
        repair_cost: Option<f64>,

        /// Holding cost (defaults to the configured value)
        #[arg(long)]
        holding_cost: Option<f64>,

        /// Property address for the contract terms
        #[arg(long, default_value = "")]
        address: String,

        /// Lead identifier recorded on the offer
        #[arg(long, default_value = "manual")]
        lead_id: String,
    },

    /// Rank cash buyers for a property
    MatchBuyers {
        /// Property as a JSON file path or inline JSON object
        property: String,
    },
}

fn init_tracing(level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    init_tracing(&args.log_level)?;

    let settings = app::load_settings(args.config.as_deref())?;

    match args.command {
        Command::Agents { json } => commands::agents::execute(settings, json).await,
        Command::Run { agent, task } => commands::run::execute(settings, &agent, &task).await,
        Command::Workflow { workflow } => commands::workflow::execute(settings, &workflow).await,
        Command::Pipeline { deal } => commands::pipeline::execute(settings, &deal).await,
        Command::ScoreLead { lead } => commands::scoring::score_lead(&settings, &lead),
        Command::PriceOffer { arv, repair_cost, holding_cost, address, lead_id } => {
            commands::scoring::price_offer(
                &settings,
                &lead_id,
                commands::scoring::OfferInputs { arv, repair_cost, holding_cost, address },
            )
        }
        Command::MatchBuyers { property } => {
            commands::scoring::match_buyers(settings, &property).await
        }
    }
}
