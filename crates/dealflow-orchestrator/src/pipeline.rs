//! The lead-to-contract pipeline.
//!
//! Qualification gates the rest of the pipeline. Market analysis, rehab
//! estimation and financing are independent of each other and run
//! concurrently; the contract stage receives all three under `context`.
//! Every stage goes through [`Orchestrator::run_agent`], so stages get the
//! same validation, timeout and statistics as direct runs.

use crate::Orchestrator;
use crate::result::AgentResult;
use crate::task::Task;
use chrono::{DateTime, Utc};
use dealflow_core::Recommendation;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

const QUALIFIER: &str = "LeadQualifier";
const ANALYST: &str = "DataAnalyst";
const REHAB: &str = "RehabEstimator";
const FINANCING: &str = "FinancingAdvisor";
const CONTRACT: &str = "ContractAutomation";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineStatus {
    /// A contract was drafted.
    Completed,
    /// The lead did not qualify; nothing after qualification ran.
    Rejected,
    /// A stage returned an error result.
    Failed,
}

/// Outcome of one pipeline run. Stages that never ran are absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineReport {
    pub pipeline_id: String,
    pub status: PipelineStatus,
    pub qualification: AgentResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_analysis: Option<AgentResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rehab_estimate: Option<AgentResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub financing: Option<AgentResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract: Option<AgentResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

impl PipelineReport {
    fn new(pipeline_id: String, started_at: DateTime<Utc>, qualification: AgentResult) -> Self {
        Self {
            pipeline_id,
            status: PipelineStatus::Failed,
            qualification,
            market_analysis: None,
            rehab_estimate: None,
            financing: None,
            contract: None,
            error: None,
            started_at,
            completed_at: started_at,
        }
    }

    fn finish(mut self, status: PipelineStatus, error: Option<String>) -> Self {
        self.status = status;
        self.error = error;
        self.completed_at = Utc::now();
        self
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == PipelineStatus::Completed
    }
}

/// Runs a deal from qualification to a drafted contract.
#[derive(Debug, Clone)]
pub struct LeadToContractPipeline {
    orchestrator: Arc<Orchestrator>,
}

fn stage_error(result: &AgentResult) -> String {
    format!(
        "{} failed: {}",
        result.agent,
        result.error.as_deref().unwrap_or("unknown error")
    )
}

/// The financing stage needs `loan_amount`; an offer price stands in for it.
fn financing_task(deal: &Task) -> Task {
    match (deal.get("loan_amount"), deal.get("offer_price")) {
        (None, Some(price)) => deal.clone().with("loan_amount", price.clone()),
        _ => deal.clone(),
    }
}

impl LeadToContractPipeline {
    #[must_use]
    pub const fn new(orchestrator: Arc<Orchestrator>) -> Self {
        Self { orchestrator }
    }

    /// Runs every stage for `deal`.
    ///
    /// `deal` must carry the keys each stage requires: `address` and
    /// `data_source` for qualification, `loan_amount` (or `offer_price`) for
    /// financing and `state` for the contract. A missing key surfaces as a
    /// failed stage rather than an error.
    pub async fn run(&self, deal: &Task) -> PipelineReport {
        let pipeline_id = format!("pipeline_{}", Uuid::new_v4().simple());
        let started_at = Utc::now();
        info!(pipeline_id = %pipeline_id, "Pipeline started");

        let qualification = self.orchestrator.run_agent(QUALIFIER, deal).await;
        let report = PipelineReport::new(pipeline_id, started_at, qualification);

        if !report.qualification.is_success() {
            let error = stage_error(&report.qualification);
            warn!(pipeline_id = %report.pipeline_id, error = %error, "Qualification failed");
            return report.finish(PipelineStatus::Failed, Some(error));
        }

        let recommendation = report
            .qualification
            .get("recommendation")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        if recommendation != Recommendation::Qualify.as_str() {
            warn!(
                pipeline_id = %report.pipeline_id,
                recommendation = %recommendation,
                "Lead not qualified"
            );
            let error = format!("Lead not qualified: {recommendation}");
            return report.finish(PipelineStatus::Rejected, Some(error));
        }

        self.run_deal_stages(deal, report).await
    }

    async fn run_deal_stages(&self, deal: &Task, mut report: PipelineReport) -> PipelineReport {
        let financing_task = financing_task(deal);
        let (market_analysis, rehab_estimate, financing) = tokio::join!(
            self.orchestrator.run_agent(ANALYST, deal),
            self.orchestrator.run_agent(REHAB, deal),
            self.orchestrator.run_agent(FINANCING, &financing_task),
        );

        let failure = [&market_analysis, &rehab_estimate, &financing]
            .into_iter()
            .find(|r| !r.is_success())
            .map(stage_error);

        let context = json!({
            "market_analysis": market_analysis.to_value(),
            "rehab_estimate": rehab_estimate.to_value(),
            "financing": financing.to_value(),
        });
        report.market_analysis = Some(market_analysis);
        report.rehab_estimate = Some(rehab_estimate);
        report.financing = Some(financing);

        if let Some(error) = failure {
            warn!(pipeline_id = %report.pipeline_id, error = %error, "Analysis stage failed");
            return report.finish(PipelineStatus::Failed, Some(error));
        }

        let contract = self.orchestrator.run_agent(CONTRACT, &deal.with_context(context)).await;
        let outcome = if contract.is_success() {
            (PipelineStatus::Completed, None)
        } else {
            (PipelineStatus::Failed, Some(stage_error(&contract)))
        };
        report.contract = Some(contract);

        let report = report.finish(outcome.0, outcome.1);
        info!(pipeline_id = %report.pipeline_id, status = ?report.status, "Pipeline finished");
        report
    }
}
