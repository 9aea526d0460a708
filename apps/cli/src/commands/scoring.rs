//! Direct access to the scoring and pricing functions.

use super::exit_code;
use crate::app::build_orchestrator;
use crate::input::{print_json, read_json};
use anyhow::Context;
use dealflow_core::providers::standardize_record;
use dealflow_core::scoring::{assess_lead, build_offer};
use dealflow_core::{PropertyDetails, ScoredLead, Settings};
use dealflow_orchestrator::Task;
use serde_json::{Value, json};
use std::process::ExitCode;
use std::sync::Arc;

const BUYER_MATCHER: &str = "BuyerMatcher";

/// Command-line inputs for offer pricing.
#[derive(Debug, Clone)]
pub struct OfferInputs {
    pub arv: f64,
    pub repair_cost: Option<f64>,
    pub holding_cost: Option<f64>,
    pub address: String,
}

fn score_one(settings: &Settings, raw: &Value) -> anyhow::Result<ScoredLead> {
    let lead = standardize_record(raw, None, None).context("unusable lead record")?;
    Ok(assess_lead(lead, &settings.business))
}

/// Scores a lead object, or each lead in an array.
pub fn score_lead(settings: &Settings, lead: &str) -> anyhow::Result<ExitCode> {
    match read_json(lead)? {
        Value::Array(records) => {
            let scored = records
                .iter()
                .map(|raw| score_one(settings, raw))
                .collect::<anyhow::Result<Vec<_>>>()?;
            print_json(&scored)?;
        }
        raw => print_json(&score_one(settings, &raw)?)?,
    }
    Ok(exit_code(true))
}

/// Prices an offer with the configured pricing defaults.
pub fn price_offer(
    settings: &Settings,
    lead_id: &str,
    inputs: OfferInputs,
) -> anyhow::Result<ExitCode> {
    let details = PropertyDetails {
        address: inputs.address,
        estimated_after_repair_value: inputs.arv,
        estimated_repair_cost: inputs.repair_cost,
        estimated_holding_cost: inputs.holding_cost,
    };
    print_json(&build_offer(lead_id, &details, &settings.pricing))?;
    Ok(exit_code(true))
}

/// Ranks buyers for a property through the buyer matcher agent.
///
/// Accepts either a full task (with a `property` key) or a bare property.
pub async fn match_buyers(settings: Arc<Settings>, property: &str) -> anyhow::Result<ExitCode> {
    let input = read_json(property)?;
    let task = if input.get("property").is_some() { input } else { json!({ "property": input }) };
    let task = Task::try_from(task)?;

    let orchestrator = build_orchestrator(&settings).await?;
    let result = orchestrator.run_agent(BUYER_MATCHER, &task).await;
    print_json(&result)?;

    Ok(exit_code(result.is_success()))
}
